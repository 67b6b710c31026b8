//! 数据库导出与导入。

use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Multipart, State},
    response::{Redirect, Response},
    routing::get,
};
use chrono::Utc;
use collegejump_api_types::views::DatabasePage;
use collegejump_core::domain::{Action, Resource, policy::authorize};
use sea_orm::TransactionTrait;
use tracing::{info, warn};

use super::error::AppError;
use super::state::AppState;
use super::upload::{MultipartForm, download};
use crate::archive::{ArchiveError, Snapshot, table_counts};
use crate::auth::CurrentUser;

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/database/", get(database_page).post(import))
        .route("/database/export", get(export))
}

async fn database_page(
    State(state): State<Arc<AppState>>,
    CurrentUser(session): CurrentUser,
) -> Result<Json<DatabasePage>, AppError> {
    authorize(&session.viewer(), Resource::Database, Action::View)?;

    Ok(Json(DatabasePage {
        tables: table_counts(&state.db).await?,
    }))
}

/// 下载整个数据库的 zip 归档。
async fn export(
    State(state): State<Arc<AppState>>,
    CurrentUser(session): CurrentUser,
) -> Result<Response, AppError> {
    authorize(&session.viewer(), Resource::Database, Action::Export)?;

    let snapshot = Snapshot::load(&state.db).await?;
    let bytes = snapshot.to_zip()?;
    let filename = format!("collegejump-export-{}.zip", Utc::now().format("%Y%m%d"));

    info!(
        user_id = %session.user.id,
        bytes = bytes.len(),
        filename = %filename,
        "database exported"
    );
    Ok(download(&filename, "application/zip", bytes))
}

/// 用上传的归档替换整个数据库。归档先完整校验，
/// 之后在单个事务中删除并写入所有数据。
async fn import(
    State(state): State<Arc<AppState>>,
    CurrentUser(session): CurrentUser,
    multipart: Multipart,
) -> Result<Redirect, AppError> {
    authorize(&session.viewer(), Resource::Database, Action::Import)?;

    let mut form = MultipartForm::read(multipart).await?;
    let Some(file) = form.take_file("zipfile") else {
        return Err(AppError::field("zipfile", "choose an archive to import"));
    };

    let snapshot = match Snapshot::from_zip(&file.data) {
        Ok(snapshot) => snapshot,
        Err(ArchiveError::Malformed(reason)) => {
            warn!(user_id = %session.user.id, %reason, "rejected database import");
            return Err(AppError::field("zipfile", reason));
        }
        Err(ArchiveError::Internal(err)) => return Err(err.into()),
    };
    let counts = snapshot.counts();

    let txn = state.db.begin().await?;
    snapshot.restore(&txn).await?;
    txn.commit().await?;

    info!(user_id = %session.user.id, tables = ?counts, "database imported");
    Ok(Redirect::to("/"))
}
