//! 首页、首次安装、登录与注销。

use std::sync::Arc;

use axum::{
    Form, Json, Router,
    extract::{Query, State},
    http::header::SET_COOKIE,
    response::{IntoResponse, Redirect, Response},
    routing::get,
};
use collegejump_api_types::{
    HealthCheckResponse,
    forms::{LoginForm, ReturnToQuery, SetupForm},
    views::{FrontPage, LoginPage},
};
use collegejump_core::domain::{AccessDenied, AccountFormContext, Email, ReturnTo};
use sea_orm::TransactionTrait;
use subtle::ConstantTimeEq;
use tracing::info;

use super::error::AppError;
use super::state::AppState;
use super::validation::{AccountInput, FormErrors, validate_account};
use super::views::{announcement_view, user_summary};
use crate::auth::{
    CurrentUser, MaybeUser, clear_session_cookie, hash_password, session_cookie, verify_password,
};
use crate::repository::{AnnouncementRepository, NewUser, SessionRepository, UserRepository};

/// 首页展示的公告数量。
const FRONT_PAGE_ANNOUNCEMENTS: u64 = 10;

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/", get(front_page).post(first_setup))
        .route("/login", get(login_page).post(login))
        .route("/logout", get(logout).post(logout))
        .route("/health", get(health))
}

async fn health() -> Json<HealthCheckResponse> {
    Json(HealthCheckResponse::ok())
}

/// 首页：最新公告，以及是否仍在等待首次安装。
async fn front_page(
    State(state): State<Arc<AppState>>,
    viewer: MaybeUser,
) -> Result<Json<FrontPage>, AppError> {
    let announcements = AnnouncementRepository::new(&state.db)
        .list_recent(Some(FRONT_PAGE_ANNOUNCEMENTS))
        .await?;

    Ok(Json(FrontPage {
        announcements: announcements.into_iter().map(announcement_view).collect(),
        setup_open: state.setup_open().await,
        current_user: viewer.user().map(user_summary),
    }))
}

fn setup_key_matches(given: &str, expected: &str) -> bool {
    bool::from(given.trim().as_bytes().ct_eq(expected.as_bytes()))
}

/// 首次安装：凭安装密钥创建第一个管理员并直接登录。
async fn first_setup(
    State(state): State<Arc<AppState>>,
    Form(form): Form<SetupForm>,
) -> Result<Response, AppError> {
    let mut setup_key = state.lock_setup().await;
    let Some(expected) = setup_key.as_deref() else {
        return Err(AccessDenied::Forbidden.into());
    };

    if !setup_key_matches(&form.setup_key, expected) {
        return Err(AppError::field("setup_key", "setup key does not match"));
    }

    let txn = state.db.begin().await?;
    let account = validate_account(
        &txn,
        AccountFormContext::FirstSetup,
        AccountInput {
            name: form.name,
            email: Some(form.email),
            password: form.password,
            password_confirm: form.password_confirm,
            ..Default::default()
        },
        None,
    )
    .await?;

    let (Some(email), Some(password)) = (account.email, account.password) else {
        return Err(AppError::field("email", "email is required"));
    };

    let user = UserRepository::new(&txn)
        .create(NewUser {
            name: account.name,
            email,
            password_hash: hash_password(&password)?,
            admin: true,
        })
        .await?;
    let token = SessionRepository::new(&txn).create(user.id).await?;
    txn.commit().await?;

    *setup_key = None;
    info!(user_id = %user.id, email = %user.email, "initial admin account created");

    Ok((
        [(SET_COOKIE, session_cookie(&token, state.config.secure_cookies))],
        Redirect::to("/"),
    )
        .into_response())
}

fn return_target(query: &ReturnToQuery) -> ReturnTo {
    ReturnTo::first_or([query.returnto.as_deref(), query.next.as_deref()], "/")
}

async fn login_page(
    viewer: MaybeUser,
    Query(query): Query<ReturnToQuery>,
) -> Response {
    let target = return_target(&query);
    if viewer.0.is_some() {
        return Redirect::to(target.as_str()).into_response();
    }

    Json(LoginPage {
        returnto: target.as_str().to_string(),
    })
    .into_response()
}

async fn login(
    State(state): State<Arc<AppState>>,
    Query(query): Query<ReturnToQuery>,
    Form(form): Form<LoginForm>,
) -> Result<Response, AppError> {
    let mut errors = FormErrors::new();
    let email = errors.check("email", Email::parse(&form.email));
    if form.password.is_empty() {
        errors.add("password", "this field is required");
    }
    errors.finish()?;

    let credentials = match &email {
        Some(email) => UserRepository::new(&state.db).find_credentials(email).await?,
        None => None,
    };

    let Some((user, _)) = credentials.filter(|(_, hash)| verify_password(&form.password, hash))
    else {
        info!(email = %form.email.trim(), "failed login attempt");
        return Err(AppError::field("password", "invalid email or password"));
    };

    let token = SessionRepository::new(&state.db).create(user.id).await?;
    info!(user_id = %user.id, "user logged in");

    Ok((
        [(SET_COOKIE, session_cookie(&token, state.config.secure_cookies))],
        Redirect::to(return_target(&query).as_str()),
    )
        .into_response())
}

async fn logout(
    State(state): State<Arc<AppState>>,
    CurrentUser(session): CurrentUser,
) -> Result<Response, AppError> {
    SessionRepository::new(&state.db)
        .delete(&session.token)
        .await?;
    info!(user_id = %session.user.id, "user logged out");

    Ok(([(SET_COOKIE, clear_session_cookie())], Redirect::to("/")).into_response())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn setup_key_comparison() {
        assert!(setup_key_matches("secret-key", "secret-key"));
        assert!(setup_key_matches("  secret-key\n", "secret-key"));
        assert!(!setup_key_matches("secret-kez", "secret-key"));
        assert!(!setup_key_matches("secret", "secret-key"));
        assert!(!setup_key_matches("", "secret-key"));
    }
}
