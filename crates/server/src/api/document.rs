//! 课程资料的下载与删除。

use std::sync::Arc;

use axum::{
    Router,
    extract::{Path, Query, State},
    response::{Redirect, Response},
    routing::{get, post},
};
use collegejump_api_types::forms::ReturnToQuery;
use collegejump_core::domain::{Action, DocumentId, Resource, ReturnTo, policy::authorize};
use sea_orm::TransactionTrait;
use tracing::info;

use super::error::AppError;
use super::state::AppState;
use super::upload::download;
use crate::auth::CurrentUser;
use crate::repository::SyllabusRepository;

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/document/{document_id}", get(download_document))
        .route("/document/{document_id}/remove", post(remove_document))
}

async fn download_document(
    State(state): State<Arc<AppState>>,
    CurrentUser(session): CurrentUser,
    Path(document_id): Path<i32>,
) -> Result<Response, AppError> {
    authorize(&session.viewer(), Resource::Document, Action::Download)?;

    let document = SyllabusRepository::new(&state.db)
        .find_document(DocumentId::new(document_id))
        .await?
        .ok_or(AppError::NotFound)?;

    Ok(download(
        &document.name,
        "application/octet-stream",
        document.data,
    ))
}

/// 删除资料后回到 `returnto` 指定的本站页面。
async fn remove_document(
    State(state): State<Arc<AppState>>,
    CurrentUser(session): CurrentUser,
    Path(document_id): Path<i32>,
    Query(query): Query<ReturnToQuery>,
) -> Result<Redirect, AppError> {
    authorize(&session.viewer(), Resource::Document, Action::Delete)?;
    let document_id = DocumentId::new(document_id);

    let txn = state.db.begin().await?;
    if !SyllabusRepository::new(&txn)
        .delete_document(document_id)
        .await?
    {
        return Err(AppError::NotFound);
    }
    txn.commit().await?;

    info!(document_id = %document_id, user_id = %session.user.id, "document removed");

    let target = ReturnTo::first_or(
        [query.returnto.as_deref(), query.next.as_deref()],
        "/syllabus/",
    );
    Ok(Redirect::to(target.as_str()))
}
