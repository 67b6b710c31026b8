pub mod announcement_repository;
pub mod session_repository;
pub mod submission_repository;
pub mod syllabus_repository;
pub mod user_repository;

pub use announcement_repository::{AnnouncementContent, AnnouncementRecord, AnnouncementRepository};
pub use session_repository::SessionRepository;
pub use submission_repository::{
    Attachment, FeedbackRecord, NewSubmission, SubmissionRecord, SubmissionRepository,
};
pub use syllabus_repository::{
    AssignmentContent, AssignmentRecord, DocumentFile, DocumentRecord, SemesterRecord,
    SyllabusRepository, WeekRecord,
};
pub use user_repository::{NewUser, UserRecord, UserRepository, UserUpdate};
