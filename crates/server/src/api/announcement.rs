//! 公告的浏览与管理。

use std::sync::Arc;

use anyhow::Context;
use axum::{
    Form, Json, Router,
    extract::{Path, State},
    response::Redirect,
    routing::get,
};
use collegejump_api_types::{
    forms::AnnouncementForm,
    views::{AnnouncementEditPage, AnnouncementListPage, AnnouncementView},
};
use collegejump_core::domain::{
    Action, AnnouncementId, Body, Email, Heading, Resource,
    policy::{allows, authorize},
};
use sea_orm::TransactionTrait;
use tracing::info;

use super::error::AppError;
use super::state::AppState;
use super::validation::FormErrors;
use super::views::announcement_view;
use crate::auth::{CurrentUser, MaybeUser};
use crate::repository::{AnnouncementContent, AnnouncementRepository};

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/announcement/", get(list_announcements))
        .route("/announcement/new", get(new_page).post(create_announcement))
        .route("/announcement/{id}", get(show_announcement))
        .route(
            "/announcement/{id}/edit",
            get(edit_page).post(edit_announcement),
        )
}

async fn list_announcements(
    State(state): State<Arc<AppState>>,
    viewer: MaybeUser,
) -> Result<Json<AnnouncementListPage>, AppError> {
    authorize(&viewer.viewer(), Resource::Announcement, Action::View)?;

    let announcements = AnnouncementRepository::new(&state.db)
        .list_recent(None)
        .await?;

    Ok(Json(AnnouncementListPage {
        announcements: announcements.into_iter().map(announcement_view).collect(),
    }))
}

async fn show_announcement(
    State(state): State<Arc<AppState>>,
    viewer: MaybeUser,
    Path(id): Path<i32>,
) -> Result<Json<AnnouncementView>, AppError> {
    authorize(&viewer.viewer(), Resource::Announcement, Action::View)?;

    let announcement = AnnouncementRepository::new(&state.db)
        .find_by_id(AnnouncementId::new(id))
        .await?
        .ok_or(AppError::NotFound)?;

    Ok(Json(announcement_view(announcement)))
}

fn validate(form: AnnouncementForm) -> Result<AnnouncementContent, AppError> {
    let mut errors = FormErrors::new();
    let title = errors.check("title", Heading::new(form.title));
    let content = errors.check("content", Body::new(form.content));
    errors.finish()?;

    match (title, content) {
        (Some(title), Some(content)) => Ok(AnnouncementContent { title, content }),
        _ => Err(AppError::field("title", "invalid announcement")),
    }
}

async fn new_page(CurrentUser(session): CurrentUser) -> Result<Json<AnnouncementEditPage>, AppError> {
    authorize(&session.viewer(), Resource::Announcement, Action::Create)?;

    Ok(Json(AnnouncementEditPage {
        announcement_id: None,
        author: session.user.email,
        title: String::new(),
        content: String::new(),
        can_delete: false,
    }))
}

async fn create_announcement(
    State(state): State<Arc<AppState>>,
    CurrentUser(session): CurrentUser,
    Form(form): Form<AnnouncementForm>,
) -> Result<Redirect, AppError> {
    authorize(&session.viewer(), Resource::Announcement, Action::Create)?;
    let content = validate(form)?;
    let author = Email::parse(&session.user.email).context("stored account email is invalid")?;

    let txn = state.db.begin().await?;
    let announcement = AnnouncementRepository::new(&txn)
        .create(&author, content)
        .await?;
    txn.commit().await?;

    info!(announcement_id = %announcement.id, author = %author, "announcement posted");
    Ok(Redirect::to("/"))
}

async fn edit_page(
    State(state): State<Arc<AppState>>,
    CurrentUser(session): CurrentUser,
    Path(id): Path<i32>,
) -> Result<Json<AnnouncementEditPage>, AppError> {
    let viewer = session.viewer();
    authorize(&viewer, Resource::Announcement, Action::Edit)?;

    let announcement = AnnouncementRepository::new(&state.db)
        .find_by_id(AnnouncementId::new(id))
        .await?
        .ok_or(AppError::NotFound)?;

    Ok(Json(AnnouncementEditPage {
        announcement_id: Some(announcement.id.into_inner()),
        author: announcement.author,
        title: announcement.title,
        content: announcement.content,
        can_delete: allows(&viewer, Resource::Announcement, Action::Delete),
    }))
}

async fn edit_announcement(
    State(state): State<Arc<AppState>>,
    CurrentUser(session): CurrentUser,
    Path(id): Path<i32>,
    Form(form): Form<AnnouncementForm>,
) -> Result<Redirect, AppError> {
    let viewer = session.viewer();
    let id = AnnouncementId::new(id);

    if form.delete {
        authorize(&viewer, Resource::Announcement, Action::Delete)?;

        let txn = state.db.begin().await?;
        if !AnnouncementRepository::new(&txn).delete(id).await? {
            return Err(AppError::NotFound);
        }
        txn.commit().await?;

        info!(announcement_id = %id, user_id = %session.user.id, "announcement deleted");
        return Ok(Redirect::to("/"));
    }

    authorize(&viewer, Resource::Announcement, Action::Edit)?;
    let content = validate(form)?;

    let txn = state.db.begin().await?;
    AnnouncementRepository::new(&txn)
        .update(id, content)
        .await?
        .ok_or(AppError::NotFound)?;
    txn.commit().await?;

    info!(announcement_id = %id, user_id = %session.user.id, "announcement updated");
    Ok(Redirect::to("/"))
}
