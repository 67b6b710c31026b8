pub mod announcement;
pub mod assignment;
pub mod document;
pub mod enrollment;
pub mod feedback;
pub mod mentorship;
pub mod semester;
pub mod session;
pub mod submission;
pub mod user;
pub mod week;
