use super::DomainError;

fn bounded(value: String, max: usize) -> Result<String, DomainError> {
    let trimmed = value.trim();

    if trimmed.is_empty() {
        return Err(DomainError::Required);
    }

    let len = trimmed.chars().count();
    if len > max {
        return Err(DomainError::TooLong { max, actual: len });
    }

    Ok(trimmed.to_string())
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PersonName(String);

impl PersonName {
    pub const MAX_LEN: usize = 100;

    pub fn new(value: impl Into<String>) -> Result<Self, DomainError> {
        bounded(value.into(), Self::MAX_LEN).map(Self)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_inner(self) -> String {
        self.0
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Heading(String);

impl Heading {
    pub const MAX_LEN: usize = 200;

    pub fn new(value: impl Into<String>) -> Result<Self, DomainError> {
        bounded(value.into(), Self::MAX_LEN).map(Self)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_inner(self) -> String {
        self.0
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct Body(String);

impl Body {
    pub const MAX_LEN: usize = 100_000;

    pub fn new(value: impl Into<String>) -> Result<Self, DomainError> {
        let value = value.into();
        let trimmed = value.trim();

        let len = trimmed.chars().count();
        if len > Self::MAX_LEN {
            return Err(DomainError::TooLong {
                max: Self::MAX_LEN,
                actual: len,
            });
        }

        Ok(Self(trimmed.to_string()))
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_inner(self) -> String {
        self.0
    }
}
