//! API 错误类型与未处理错误的记录。

use std::any::Any;
use std::sync::Arc;

use axum::{
    Json,
    extract::{Request, State},
    http::StatusCode,
    middleware::Next,
    response::{IntoResponse, Response},
};
use collegejump_api_types::{ErrorResponse, FieldError};
use collegejump_core::domain::{AccessDenied, IncidentNumber};
use sea_orm::DbErr;
use thiserror::Error;
use tracing::error;

use super::state::AppState;

/// 处理器返回的错误。
#[derive(Debug, Error)]
pub enum AppError {
    #[error(transparent)]
    Denied(#[from] AccessDenied),
    #[error("not found")]
    NotFound,
    /// 表单校验失败，按字段列出原因。
    #[error("validation failed")]
    Validation(Vec<FieldError>),
    #[error("bad request: {0}")]
    BadRequest(String),
    /// 意外错误，响应中只带事故编号。
    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl AppError {
    pub fn field(field: &str, message: impl Into<String>) -> Self {
        Self::Validation(vec![FieldError {
            field: field.to_string(),
            message: message.into(),
        }])
    }
}

impl From<DbErr> for AppError {
    fn from(err: DbErr) -> Self {
        Self::Internal(err.into())
    }
}

/// 附加在 500 响应上的事故信息，由 [`log_incidents`] 记录。
#[derive(Debug, Clone)]
pub struct IncidentReport {
    pub number: IncidentNumber,
    pub detail: String,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, body) = match self {
            AppError::Denied(AccessDenied::Unauthenticated) => (
                StatusCode::UNAUTHORIZED,
                ErrorResponse::new("UNAUTHENTICATED", "You need to log in to see this page"),
            ),
            AppError::Denied(AccessDenied::Forbidden) => (
                StatusCode::FORBIDDEN,
                ErrorResponse::new("FORBIDDEN", "You do not have access to this page"),
            ),
            AppError::NotFound => (
                StatusCode::NOT_FOUND,
                ErrorResponse::new("NOT_FOUND", "The requested resource does not exist"),
            ),
            AppError::Validation(fields) => {
                let mut body = ErrorResponse::new("VALIDATION_FAILED", "Please correct the form");
                body.fields = fields;
                (StatusCode::UNPROCESSABLE_ENTITY, body)
            }
            AppError::BadRequest(message) => {
                (StatusCode::BAD_REQUEST, ErrorResponse::new("BAD_REQUEST", message))
            }
            AppError::Internal(err) => {
                let number = IncidentNumber::random();
                let mut body = ErrorResponse::new(
                    "INTERNAL_ERROR",
                    format!("An unexpected error occurred (incident {number})"),
                );
                body.incident_number = Some(number.value());

                let mut response = (StatusCode::INTERNAL_SERVER_ERROR, Json(body)).into_response();
                response.extensions_mut().insert(IncidentReport {
                    number,
                    detail: format!("{err:#}"),
                });
                return response;
            }
        };

        (status, Json(body)).into_response()
    }
}

/// 处理器 panic 时的响应，与其他未处理错误一样带事故编号。
pub fn panic_response(payload: Box<dyn Any + Send + 'static>) -> Response {
    let message = if let Some(message) = payload.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "unknown panic payload".to_string()
    };

    AppError::Internal(anyhow::anyhow!("handler panicked: {message}")).into_response()
}

/// 记录带事故编号的响应，方便用户报告问题时对照日志。
pub async fn log_incidents(
    State(state): State<Arc<AppState>>,
    request: Request,
    next: Next,
) -> Response {
    let method = request.method().clone();
    let uri = request.uri().clone();

    let response = next.run(request).await;

    if let Some(report) = response.extensions().get::<IncidentReport>() {
        error!(
            incident = %report.number,
            %method,
            %uri,
            error = %report.detail,
            report_to = %state.config.repository_issues,
            "unhandled error while serving request"
        );
    }

    response
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn access_denied_maps_to_status() {
        let unauthenticated = AppError::from(AccessDenied::Unauthenticated).into_response();
        let forbidden = AppError::from(AccessDenied::Forbidden).into_response();

        assert_eq!(unauthenticated.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(forbidden.status(), StatusCode::FORBIDDEN);
    }

    #[test]
    fn internal_error_carries_incident() {
        let response = AppError::from(anyhow::anyhow!("disk on fire")).into_response();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let report = response
            .extensions()
            .get::<IncidentReport>()
            .expect("incident report attached");
        assert!(report.detail.contains("disk on fire"));
        assert!((IncidentNumber::MIN..=IncidentNumber::MAX).contains(&report.number.value()));
    }

    #[test]
    fn panic_becomes_incident() {
        let response = panic_response(Box::new("index out of bounds"));

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let report = response
            .extensions()
            .get::<IncidentReport>()
            .expect("incident report attached");
        assert!(report.detail.contains("index out of bounds"));
    }

    #[test]
    fn validation_is_unprocessable() {
        let response = AppError::field("email", "taken").into_response();
        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    }
}
