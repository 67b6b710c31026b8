use anyhow::Result;
use collegejump_core::domain::{Relation, SemesterId, UserId, Viewer};
use sea_orm::ConnectionTrait;

use crate::auth::SessionUser;
use crate::repository::{SubmissionRecord, UserRepository};

pub fn account_viewer(session: &SessionUser, target: UserId) -> Viewer {
    session
        .viewer()
        .with_if(session.user.id == target, Relation::Owner)
}

/// 选修该学期或指导选修者的用户视为相关者。
pub async fn week_viewer<C: ConnectionTrait>(
    conn: &C,
    session: &SessionUser,
    semester_id: SemesterId,
) -> Result<Viewer> {
    let viewer = session.viewer();
    if session.user.admin {
        return Ok(viewer.with(Relation::Interested));
    }

    let interested = UserRepository::new(conn)
        .interested_semesters(session.user.id)
        .await?
        .contains(&semester_id);

    Ok(viewer.with_if(interested, Relation::Interested))
}

pub async fn submission_viewer<C: ConnectionTrait>(
    conn: &C,
    session: &SessionUser,
    submission: &SubmissionRecord,
) -> Result<Viewer> {
    let me = session.user.id;
    let mentor = UserRepository::new(conn)
        .is_mentor_of(me, submission.author_id)
        .await?;

    Ok(session
        .viewer()
        .with_if(submission.author_id == me, Relation::Owner)
        .with_if(mentor, Relation::Mentor))
}
