//! 提交详情、反馈与附件下载。

use std::sync::Arc;

use axum::{
    Form, Json, Router,
    extract::{Path, Query, State},
    response::{Redirect, Response},
    routing::get,
};
use collegejump_api_types::{
    forms::{FeedbackForm, ReturnToQuery},
    views::{FeedbackView, SubmissionPage},
};
use collegejump_core::domain::{
    Action, Body, DomainError, Resource, ReturnTo, SubmissionId, policy::authorize,
};
use sea_orm::TransactionTrait;
use tracing::info;

use super::error::AppError;
use super::state::AppState;
use super::upload::download;
use super::validation::FormErrors;
use super::views::{submission_summary, week_path};
use crate::access::submission_viewer;
use crate::auth::CurrentUser;
use crate::repository::{SubmissionRecord, SubmissionRepository, SyllabusRepository, UserRepository};

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route(
            "/submission/{submission_id}",
            get(show_submission).post(give_feedback),
        )
        .route(
            "/submission/{submission_id}/attachment",
            get(download_attachment),
        )
}

async fn load(state: &AppState, submission_id: i32) -> Result<SubmissionRecord, AppError> {
    SubmissionRepository::new(&state.db)
        .find_by_id(SubmissionId::new(submission_id))
        .await?
        .ok_or(AppError::NotFound)
}

/// 提交详情及其全部反馈。仅作者的导师与管理员可见。
async fn show_submission(
    State(state): State<Arc<AppState>>,
    CurrentUser(session): CurrentUser,
    Path(submission_id): Path<i32>,
    Query(query): Query<ReturnToQuery>,
) -> Result<Json<SubmissionPage>, AppError> {
    let submission = load(&state, submission_id).await?;
    let viewer = submission_viewer(&state.db, &session, &submission).await?;
    authorize(&viewer, Resource::Submission, Action::View)?;

    let users = UserRepository::new(&state.db);
    let syllabus = SyllabusRepository::new(&state.db);

    let author = users
        .find_by_id(submission.author_id)
        .await?
        .ok_or(AppError::NotFound)?;
    let assignment = syllabus
        .find_assignment(submission.assignment_id)
        .await?
        .ok_or(AppError::NotFound)?;
    let week = syllabus
        .find_week_by_id(assignment.week_id)
        .await?
        .ok_or(AppError::NotFound)?;

    let mut feedback = Vec::new();
    for entry in SubmissionRepository::new(&state.db)
        .feedback_for(submission.id)
        .await?
    {
        let author = users
            .find_by_id(entry.author_id)
            .await?
            .map_or_else(|| "(deleted)".to_string(), |user| user.name);
        feedback.push(FeedbackView {
            id: entry.id.into_inner(),
            author,
            text: entry.text,
            timestamp: entry.timestamp,
        });
    }

    let fallback = week_path(week.semester_id.into_inner(), week.week_num);
    let returnto = ReturnTo::first_or(
        [query.returnto.as_deref(), query.next.as_deref()],
        &fallback,
    );

    Ok(Json(SubmissionPage {
        submission: submission_summary(submission, &author),
        assignment_name: assignment.name,
        feedback,
        returnto: returnto.as_str().to_string(),
    }))
}

/// 添加反馈后回到 `returnto`（表单字段或查询参数）指定的本站页面，默认首页。
async fn give_feedback(
    State(state): State<Arc<AppState>>,
    CurrentUser(session): CurrentUser,
    Path(submission_id): Path<i32>,
    Query(query): Query<ReturnToQuery>,
    Form(form): Form<FeedbackForm>,
) -> Result<Redirect, AppError> {
    let submission = load(&state, submission_id).await?;
    let viewer = submission_viewer(&state.db, &session, &submission).await?;
    authorize(&viewer, Resource::Submission, Action::GiveFeedback)?;

    let mut errors = FormErrors::new();
    let text = errors.check(
        "feedback",
        Body::new(form.feedback).and_then(|body| {
            if body.is_empty() {
                Err(DomainError::Required)
            } else {
                Ok(body)
            }
        }),
    );
    errors.finish()?;
    let Some(text) = text else {
        return Err(AppError::field("feedback", "invalid feedback"));
    };

    let txn = state.db.begin().await?;
    let feedback = SubmissionRepository::new(&txn)
        .add_feedback(submission.id, session.user.id, text)
        .await?;
    txn.commit().await?;

    info!(
        feedback_id = %feedback.id,
        submission_id = %submission.id,
        author_id = %session.user.id,
        "feedback added"
    );
    let target = ReturnTo::first_or(
        [
            form.returnto.as_deref(),
            query.returnto.as_deref(),
            query.next.as_deref(),
        ],
        "/",
    );
    Ok(Redirect::to(target.as_str()))
}

/// 附件只对作者本人、作者的导师和管理员开放。
async fn download_attachment(
    State(state): State<Arc<AppState>>,
    CurrentUser(session): CurrentUser,
    Path(submission_id): Path<i32>,
) -> Result<Response, AppError> {
    let submission = load(&state, submission_id).await?;
    let viewer = submission_viewer(&state.db, &session, &submission).await?;
    authorize(&viewer, Resource::SubmissionAttachment, Action::Download)?;

    let attachment = SubmissionRepository::new(&state.db)
        .attachment(submission.id)
        .await?
        .ok_or(AppError::NotFound)?;

    Ok(download(
        &attachment.filename,
        "application/octet-stream",
        attachment.data,
    ))
}
