//! Form bodies accepted by the server.
//!
//! Each struct lists exactly the fields one form context may set. Fields that
//! are not declared here are dropped during decoding, so a crafted request
//! cannot reach a field its sender is not allowed to change.

use serde::{Deserialize, Deserializer};

/// HTML checkbox semantics: present means checked unless the value is an
/// explicit negative.
fn checkbox<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<String>::deserialize(deserializer)?;
    Ok(match value {
        None => false,
        Some(raw) => !matches!(
            raw.trim().to_ascii_lowercase().as_str(),
            "" | "false" | "0" | "off" | "n" | "no"
        ),
    })
}

/// `?returnto=` / `?next=` query accepted by pages that redirect afterwards.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ReturnToQuery {
    pub returnto: Option<String>,
    pub next: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct LoginForm {
    pub email: String,
    pub password: String,
}

/// First-run setup. There is no `admin` field: the created
/// account is always an admin.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct SetupForm {
    pub setup_key: String,
    pub name: String,
    pub email: String,
    pub password: String,
    pub password_confirm: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct AdminCreateAccountForm {
    pub name: String,
    pub email: String,
    pub password: String,
    pub password_confirm: String,
    #[serde(deserialize_with = "checkbox")]
    pub admin: bool,
    /// Comma separated mentor emails.
    pub mentors: String,
    /// Comma separated semester ids.
    pub semesters: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct AdminEditAccountForm {
    pub name: String,
    pub email: String,
    pub password: String,
    pub password_confirm: String,
    #[serde(deserialize_with = "checkbox")]
    pub admin: bool,
    pub mentors: String,
    pub semesters: String,
    #[serde(deserialize_with = "checkbox")]
    pub delete: bool,
}

/// What a non-admin may change on their own account.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct SelfAccountForm {
    pub name: String,
    pub password: String,
    pub password_confirm: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct AnnouncementForm {
    pub title: String,
    pub content: String,
    #[serde(deserialize_with = "checkbox")]
    pub delete: bool,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct SemesterForm {
    pub name: String,
    pub order: String,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SemesterAction {
    #[default]
    Update,
    Delete,
    AddWeek,
}

/// The semester page hosts two forms: one editing the semester itself and one
/// appending a week. `action` says which was submitted.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct SemesterPageForm {
    pub action: SemesterAction,
    pub name: String,
    pub order: String,
    pub header: String,
    pub intro: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct WeekForm {
    pub header: String,
    pub intro: String,
    pub assignment_name: String,
    pub assignment_instructions: String,
    #[serde(deserialize_with = "checkbox")]
    pub delete: bool,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct FeedbackForm {
    pub feedback: String,
    /// Hidden field carrying the page's `returnto`.
    pub returnto: Option<String>,
}
