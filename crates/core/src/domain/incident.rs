use std::fmt;

use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct IncidentNumber(u32);

impl IncidentNumber {
    pub const MIN: u32 = 1 << 8;
    pub const MAX: u32 = 1 << 16;

    pub fn random() -> Self {
        let bytes = Uuid::new_v4().into_bytes();
        let raw = u32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]);
        Self(Self::MIN + raw % (Self::MAX - Self::MIN + 1))
    }

    pub fn value(self) -> u32 {
        self.0
    }
}

impl fmt::Display for IncidentNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

#[cfg(test)]
mod tests {
    use super::IncidentNumber;

    #[test]
    fn random_incident_is_in_range() {
        for _ in 0..1_000 {
            let incident = IncidentNumber::random();
            assert!((IncidentNumber::MIN..=IncidentNumber::MAX).contains(&incident.value()));
        }
    }
}
