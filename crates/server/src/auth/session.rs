use std::sync::Arc;

use axum::extract::FromRequestParts;
use axum::http::header::COOKIE;
use axum::http::request::Parts;
use axum::http::{HeaderMap, HeaderValue};
use collegejump_core::domain::{AccessDenied, Viewer};

use crate::api::{AppError, AppState};
use crate::repository::{SessionRepository, UserRecord, UserRepository};

pub const SESSION_COOKIE: &str = "collegejump_session";

#[derive(Debug, Clone)]
pub struct SessionUser {
    pub user: UserRecord,
    pub token: String,
}

impl SessionUser {
    pub fn viewer(&self) -> Viewer {
        Viewer::authenticated(self.user.admin)
    }
}

/// 未登录时不拒绝的提取器。
#[derive(Debug, Clone)]
pub struct MaybeUser(pub Option<SessionUser>);

impl MaybeUser {
    pub fn viewer(&self) -> Viewer {
        self.0
            .as_ref()
            .map_or_else(Viewer::anonymous, SessionUser::viewer)
    }

    pub fn user(&self) -> Option<&UserRecord> {
        self.0.as_ref().map(|session| &session.user)
    }
}

/// 未登录时以 401 拒绝。
#[derive(Debug, Clone)]
pub struct CurrentUser(pub SessionUser);

impl CurrentUser {
    pub fn user(&self) -> &UserRecord {
        &self.0.user
    }

    pub fn viewer(&self) -> Viewer {
        self.0.viewer()
    }
}

impl FromRequestParts<Arc<AppState>> for MaybeUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<AppState>,
    ) -> Result<Self, Self::Rejection> {
        let Some(token) = session_token(&parts.headers) else {
            return Ok(Self(None));
        };

        let Some(user_id) = SessionRepository::new(&state.db).find_user(&token).await? else {
            return Ok(Self(None));
        };

        let user = UserRepository::new(&state.db).find_by_id(user_id).await?;
        Ok(Self(user.map(|user| SessionUser { user, token })))
    }
}

impl FromRequestParts<Arc<AppState>> for CurrentUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<AppState>,
    ) -> Result<Self, Self::Rejection> {
        match MaybeUser::from_request_parts(parts, state).await? {
            MaybeUser(Some(session)) => Ok(Self(session)),
            MaybeUser(None) => Err(AppError::Denied(AccessDenied::Unauthenticated)),
        }
    }
}

pub fn session_token(headers: &HeaderMap) -> Option<String> {
    headers
        .get_all(COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|header| header.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(name, _)| *name == SESSION_COOKIE)
        .map(|(_, value)| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

pub fn session_cookie(token: &str, secure: bool) -> HeaderValue {
    let mut cookie = format!("{SESSION_COOKIE}={token}; HttpOnly; SameSite=Lax; Path=/");
    if secure {
        cookie.push_str("; Secure");
    }
    // uuid tokens are plain ASCII.
    HeaderValue::from_str(&cookie).unwrap_or_else(|_| HeaderValue::from_static(""))
}

pub fn clear_session_cookie() -> HeaderValue {
    HeaderValue::from_static(
        "collegejump_session=; HttpOnly; SameSite=Lax; Path=/; Max-Age=0",
    )
}
