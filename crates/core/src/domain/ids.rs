use std::fmt;
use std::num::ParseIntError;
use std::str::FromStr;

macro_rules! define_id_type {
    ($name:ident) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
        pub struct $name(i32);

        impl $name {
            pub fn new(value: i32) -> Self {
                Self(value)
            }

            pub fn into_inner(self) -> i32 {
                self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                self.0.fmt(f)
            }
        }

        impl FromStr for $name {
            type Err = ParseIntError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                s.trim().parse::<i32>().map(Self)
            }
        }

        impl From<i32> for $name {
            fn from(value: i32) -> Self {
                Self::new(value)
            }
        }

        impl From<$name> for i32 {
            fn from(value: $name) -> Self {
                value.into_inner()
            }
        }
    };
}

define_id_type!(UserId);
define_id_type!(SemesterId);
define_id_type!(WeekId);
define_id_type!(AssignmentId);
define_id_type!(SubmissionId);
define_id_type!(FeedbackId);
define_id_type!(DocumentId);
define_id_type!(AnnouncementId);

#[cfg(test)]
mod tests {
    use super::{SemesterId, UserId};

    #[test]
    fn user_id_can_roundtrip_from_string() {
        let id = UserId::new(42);
        let parsed: UserId = id
            .to_string()
            .parse()
            .expect("formatted user id should parse");

        assert_eq!(id, parsed);
    }

    #[test]
    fn semester_id_parse_tolerates_whitespace() {
        let parsed: SemesterId = " 7 ".parse().expect("padded id should parse");

        assert_eq!(parsed.into_inner(), 7);
        assert!("seven".parse::<SemesterId>().is_err());
    }
}
