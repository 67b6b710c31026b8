//! API 路由模块。
//!
//! 每个子模块提供一组页面的路由，页面以 JSON 文档返回，
//! 表单提交成功后以 303 重定向回应。

pub mod account;
pub mod announcement;
pub mod database;
pub mod document;
pub mod error;
pub mod front;
pub mod state;
pub mod submission;
pub mod syllabus;
pub mod upload;
pub mod validation;
pub mod views;
pub mod week;

use std::sync::Arc;

use axum::{Router, extract::DefaultBodyLimit, middleware};
use tower_http::{catch_panic::CatchPanicLayer, trace::TraceLayer};

pub use error::{AppError, IncidentReport, log_incidents, panic_response};
pub use state::AppState;

/// 组装完整的应用路由。
pub fn create_app(state: Arc<AppState>) -> Router {
    let routes = Router::new()
        .merge(front::router())
        .merge(announcement::router())
        .merge(account::router())
        .merge(syllabus::router())
        .merge(document::router())
        .merge(week::router())
        .merge(submission::router())
        .merge(database::router());

    with_layers(routes, state)
}

/// 公共中间件。panic 在事故记录之内被捕获，因此同样会写入错误日志。
fn with_layers(routes: Router<Arc<AppState>>, state: Arc<AppState>) -> Router {
    let body_limit = state.config.max_upload_bytes;

    routes
        .layer(CatchPanicLayer::custom(panic_response))
        .layer(middleware::from_fn_with_state(state.clone(), log_incidents))
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
