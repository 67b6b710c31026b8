use std::fmt;

use super::DomainError;

#[derive(Clone, PartialEq, Eq)]
pub struct NewPassword(String);

impl NewPassword {
    pub const MIN_LEN: usize = 8;

    pub fn new(password: &str, confirmation: &str) -> Result<Self, DomainError> {
        if password.is_empty() {
            return Err(DomainError::Required);
        }
        if password.chars().count() < Self::MIN_LEN {
            return Err(DomainError::PasswordTooShort { min: Self::MIN_LEN });
        }
        if password != confirmation {
            return Err(DomainError::PasswordMismatch);
        }

        Ok(Self(password.to_string()))
    }

    pub fn optional(password: &str, confirmation: &str) -> Result<Option<Self>, DomainError> {
        if password.is_empty() && confirmation.is_empty() {
            return Ok(None);
        }
        Self::new(password, confirmation).map(Some)
    }

    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for NewPassword {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("NewPassword(***)")
    }
}
