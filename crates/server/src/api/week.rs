//! 学生视角的周页面与作业提交。

use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Multipart, Path, State},
    response::Redirect,
    routing::get,
};
use collegejump_api_types::views::{SubmissionSummary, WeekPage};
use collegejump_core::domain::{
    Action, Body, Resource, SemesterId, UserId,
    policy::{allows, authorize},
};
use sea_orm::{ConnectionTrait, TransactionTrait};
use tracing::info;

use super::error::AppError;
use super::state::AppState;
use super::upload::MultipartForm;
use super::validation::FormErrors;
use super::views::{submission_summary, week_path, week_view};
use crate::access::week_viewer;
use crate::auth::CurrentUser;
use crate::repository::{
    AssignmentRecord, Attachment, NewSubmission, SubmissionRepository, SyllabusRepository,
    UserRecord, UserRepository,
};

pub fn router() -> Router<Arc<AppState>> {
    Router::new().route(
        "/semester/{semester_id}/week/{week_num}",
        get(show_week).post(submit),
    )
}

/// `authors` 对该作业的提交，按时间倒序，附带作者信息。
async fn submissions_by<C: ConnectionTrait>(
    conn: &C,
    assignment: Option<&AssignmentRecord>,
    authors: &[UserRecord],
) -> Result<Vec<SubmissionSummary>, AppError> {
    let Some(assignment) = assignment else {
        return Ok(Vec::new());
    };

    let ids: Vec<UserId> = authors.iter().map(|author| author.id).collect();
    let submissions = SubmissionRepository::new(conn)
        .list_by_authors(assignment.id, &ids)
        .await?;

    Ok(submissions
        .into_iter()
        .filter_map(|submission| {
            let author = authors.iter().find(|author| author.id == submission.author_id)?;
            Some(submission_summary(submission, author))
        })
        .collect())
}

/// 周页面：内容、自己的提交，以及所指导学生的提交。
async fn show_week(
    State(state): State<Arc<AppState>>,
    CurrentUser(session): CurrentUser,
    Path((semester_id, week_num)): Path<(i32, i32)>,
) -> Result<Json<WeekPage>, AppError> {
    let semester_id = SemesterId::new(semester_id);
    let viewer = week_viewer(&state.db, &session, semester_id).await?;
    authorize(&viewer, Resource::Week, Action::View)?;

    let syllabus = SyllabusRepository::new(&state.db);
    let week = syllabus
        .find_week(semester_id, week_num)
        .await?
        .ok_or(AppError::NotFound)?;
    let assignment = syllabus.assignment_of(week.id).await?;
    let documents = syllabus.documents_of(week.id).await?;

    let mentees = UserRepository::new(&state.db)
        .mentees_of(session.user.id)
        .await?;
    let submissions = submissions_by(
        &state.db,
        assignment.as_ref(),
        std::slice::from_ref(&session.user),
    )
    .await?;
    let submissions_to_grade = submissions_by(&state.db, assignment.as_ref(), &mentees).await?;

    let can_submit = assignment.is_some() && allows(&viewer, Resource::Week, Action::Submit);

    Ok(Json(WeekPage {
        week: week_view(week, assignment, documents),
        can_submit,
        submissions,
        submissions_to_grade,
    }))
}

/// 提交作业。multipart 字段：`text` 为正文，`attachment` 为可选附件。
async fn submit(
    State(state): State<Arc<AppState>>,
    CurrentUser(session): CurrentUser,
    Path((semester_id, week_num)): Path<(i32, i32)>,
    multipart: Multipart,
) -> Result<Redirect, AppError> {
    let semester = SemesterId::new(semester_id);
    let viewer = week_viewer(&state.db, &session, semester).await?;
    authorize(&viewer, Resource::Week, Action::Submit)?;

    let mut form = MultipartForm::read(multipart).await?;
    let attachment = form.take_file("attachment");

    let mut errors = FormErrors::new();
    let text = errors.check("text", Body::new(form.text("text")));
    if text.as_ref().is_some_and(Body::is_empty) && attachment.is_none() {
        errors.add("text", "write an answer or attach a file");
    }
    errors.finish()?;
    let Some(text) = text else {
        return Err(AppError::field("text", "invalid submission"));
    };

    let txn = state.db.begin().await?;
    let syllabus = SyllabusRepository::new(&txn);
    let week = syllabus
        .find_week(semester, week_num)
        .await?
        .ok_or(AppError::NotFound)?;
    let Some(assignment) = syllabus.assignment_of(week.id).await? else {
        return Err(AppError::field("text", "this week has no assignment"));
    };

    let submission = SubmissionRepository::new(&txn)
        .create(NewSubmission {
            assignment_id: assignment.id,
            author_id: session.user.id,
            text,
            attachment: attachment.map(|file| Attachment {
                filename: file.filename,
                data: file.data,
            }),
        })
        .await?;
    txn.commit().await?;

    info!(
        submission_id = %submission.id,
        assignment_id = %assignment.id,
        author_id = %session.user.id,
        has_attachment = submission.filename.is_some(),
        "assignment submitted"
    );
    Ok(Redirect::to(&week_path(semester_id, week_num)))
}
