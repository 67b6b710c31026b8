mod account_form;
mod email;
mod error;
mod ids;
mod incident;
mod password;
pub mod policy;
mod return_to;
mod text;
mod week_order;

pub use account_form::{AccountField, AccountFormContext};
pub use email::Email;
pub use error::DomainError;
pub use ids::{
    AnnouncementId, AssignmentId, DocumentId, FeedbackId, SemesterId, SubmissionId, UserId,
    WeekId,
};
pub use incident::IncidentNumber;
pub use password::NewPassword;
pub use policy::{AccessDenied, Action, Relation, Resource, Viewer};
pub use return_to::ReturnTo;
pub use text::{Body, Heading, PersonName};
pub use week_order::{Renumber, next_week_num, renumber_after_removal};
