//! JSON documents returned by page handlers.

use std::collections::BTreeMap;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserSummary {
    pub id: i32,
    pub name: String,
    pub email: String,
    pub admin: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnnouncementView {
    pub id: i32,
    pub author: String,
    pub title: String,
    pub content: String,
    pub timestamp: NaiveDateTime,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FrontPage {
    pub announcements: Vec<AnnouncementView>,
    /// First-run setup is waiting for the initial admin account.
    pub setup_open: bool,
    pub current_user: Option<UserSummary>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoginPage {
    pub returnto: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnnouncementListPage {
    pub announcements: Vec<AnnouncementView>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnnouncementEditPage {
    pub announcement_id: Option<i32>,
    pub author: String,
    pub title: String,
    pub content: String,
    pub can_delete: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountPage {
    pub user: UserSummary,
    pub mentors: Vec<String>,
    pub mentees: Vec<String>,
    pub semesters: Vec<i32>,
    /// Form fields the viewer may submit on this page.
    pub editable_fields: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountsPage {
    pub users: Vec<UserSummary>,
    pub semesters: Vec<SemesterSummary>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SemesterSummary {
    pub id: i32,
    pub name: String,
    pub order: i32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SyllabusPage {
    pub semesters: Vec<SemesterSummary>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WeekSummary {
    pub id: i32,
    pub week_num: i32,
    pub header: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SemesterPage {
    pub semester: SemesterSummary,
    pub weeks: Vec<WeekSummary>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssignmentView {
    pub id: i32,
    pub name: String,
    pub instructions: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentSummary {
    pub id: i32,
    pub name: String,
    pub size: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WeekView {
    pub id: i32,
    pub semester_id: i32,
    pub week_num: i32,
    pub header: String,
    pub intro: String,
    pub assignment: Option<AssignmentView>,
    pub documents: Vec<DocumentSummary>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubmissionSummary {
    pub id: i32,
    pub assignment_id: i32,
    pub author: UserSummary,
    pub timestamp: NaiveDateTime,
    pub text: String,
    pub attachment_name: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WeekPage {
    pub week: WeekView,
    pub can_submit: bool,
    pub submissions: Vec<SubmissionSummary>,
    pub submissions_to_grade: Vec<SubmissionSummary>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeedbackView {
    pub id: i32,
    pub author: String,
    pub text: String,
    pub timestamp: NaiveDateTime,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubmissionPage {
    pub submission: SubmissionSummary,
    pub assignment_name: String,
    pub feedback: Vec<FeedbackView>,
    pub returnto: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DatabasePage {
    /// Row count per table.
    pub tables: BTreeMap<String, u64>,
}
