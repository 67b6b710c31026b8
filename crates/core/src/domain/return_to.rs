#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReturnTo(String);

impl ReturnTo {
    pub fn parse(raw: &str) -> Option<Self> {
        let raw = raw.trim();

        let local = raw.starts_with('/')
            && !raw.starts_with("//")
            && !raw.contains('\\')
            && !raw.chars().any(char::is_control);

        local.then(|| Self(raw.to_string()))
    }

    pub fn first_or<'a>(candidates: impl IntoIterator<Item = Option<&'a str>>, fallback: &str) -> Self {
        candidates
            .into_iter()
            .flatten()
            .find_map(Self::parse)
            .unwrap_or_else(|| Self(fallback.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}
