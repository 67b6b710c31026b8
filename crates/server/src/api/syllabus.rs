//! 教学大纲管理：学期、周、作业与资料。

use std::sync::Arc;

use axum::{
    Form, Json, Router,
    extract::{Multipart, Path, State},
    response::Redirect,
    routing::{get, post},
};
use collegejump_api_types::{
    forms::{SemesterAction, SemesterForm, SemesterPageForm, WeekForm},
    views::{SemesterPage, SyllabusPage, WeekView},
};
use collegejump_core::domain::{
    Action, Body, DomainError, Heading, Resource, SemesterId, policy::authorize,
};
use sea_orm::TransactionTrait;
use tracing::info;

use super::error::AppError;
use super::state::AppState;
use super::upload::MultipartForm;
use super::validation::FormErrors;
use super::views::{semester_summary, week_path, week_summary, week_view};
use crate::auth::CurrentUser;
use crate::repository::{AssignmentContent, DocumentFile, SyllabusRepository};

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/syllabus/", get(list_semesters).post(create_semester))
        .route(
            "/syllabus/semester/{semester_id}",
            get(show_semester).post(edit_semester),
        )
        .route(
            "/syllabus/semester/{semester_id}/week/{week_num}",
            get(show_week).post(edit_week),
        )
        .route(
            "/syllabus/semester/{semester_id}/week/{week_num}/document",
            post(upload_document),
        )
}

fn parse_order(raw: &str) -> Result<i32, DomainError> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Err(DomainError::Required);
    }
    raw.parse()
        .map_err(|_| DomainError::InvalidNumber(raw.to_string()))
}

fn validate_semester(name: String, order: &str) -> Result<(Heading, i32), AppError> {
    let mut errors = FormErrors::new();
    let name = errors.check("name", Heading::new(name));
    let order = errors.check("order", parse_order(order));
    errors.finish()?;

    name.zip(order)
        .ok_or_else(|| AppError::field("name", "invalid semester"))
}

fn validate_week_heading(header: String, intro: String) -> Result<(Heading, Body), AppError> {
    let mut errors = FormErrors::new();
    let header = errors.check("header", Heading::new(header));
    let intro = errors.check("intro", Body::new(intro));
    errors.finish()?;

    header
        .zip(intro)
        .ok_or_else(|| AppError::field("header", "invalid week"))
}

/// 学期列表，按排序键升序。
async fn list_semesters(
    State(state): State<Arc<AppState>>,
    CurrentUser(session): CurrentUser,
) -> Result<Json<SyllabusPage>, AppError> {
    authorize(&session.viewer(), Resource::Syllabus, Action::View)?;

    let semesters = SyllabusRepository::new(&state.db).list_semesters().await?;
    Ok(Json(SyllabusPage {
        semesters: semesters.iter().map(semester_summary).collect(),
    }))
}

async fn create_semester(
    State(state): State<Arc<AppState>>,
    CurrentUser(session): CurrentUser,
    Form(form): Form<SemesterForm>,
) -> Result<Redirect, AppError> {
    authorize(&session.viewer(), Resource::Syllabus, Action::Create)?;
    let (name, order) = validate_semester(form.name, &form.order)?;

    let txn = state.db.begin().await?;
    let semester = SyllabusRepository::new(&txn)
        .create_semester(name, order)
        .await?;
    txn.commit().await?;

    info!(semester_id = %semester.id, name = %semester.name, "semester created");
    Ok(Redirect::to("/syllabus/"))
}

async fn show_semester(
    State(state): State<Arc<AppState>>,
    CurrentUser(session): CurrentUser,
    Path(semester_id): Path<i32>,
) -> Result<Json<SemesterPage>, AppError> {
    authorize(&session.viewer(), Resource::Syllabus, Action::View)?;

    let syllabus = SyllabusRepository::new(&state.db);
    let semester_id = SemesterId::new(semester_id);
    let semester = syllabus
        .find_semester(semester_id)
        .await?
        .ok_or(AppError::NotFound)?;
    let weeks = syllabus.weeks_of(semester_id).await?;

    Ok(Json(SemesterPage {
        semester: semester_summary(&semester),
        weeks: weeks.iter().map(week_summary).collect(),
    }))
}

/// 学期页面承载两个表单：修改/删除学期，以及追加新的一周。
async fn edit_semester(
    State(state): State<Arc<AppState>>,
    CurrentUser(session): CurrentUser,
    Path(semester_id): Path<i32>,
    Form(form): Form<SemesterPageForm>,
) -> Result<Redirect, AppError> {
    let viewer = session.viewer();
    let semester_id = SemesterId::new(semester_id);

    match form.action {
        SemesterAction::Update => {
            authorize(&viewer, Resource::Syllabus, Action::Edit)?;
            let (name, order) = validate_semester(form.name, &form.order)?;

            let txn = state.db.begin().await?;
            SyllabusRepository::new(&txn)
                .update_semester(semester_id, name, order)
                .await?
                .ok_or(AppError::NotFound)?;
            txn.commit().await?;

            info!(semester_id = %semester_id, "semester updated");
            Ok(Redirect::to(&format!("/syllabus/semester/{semester_id}")))
        }
        SemesterAction::Delete => {
            authorize(&viewer, Resource::Syllabus, Action::Delete)?;

            let txn = state.db.begin().await?;
            if !SyllabusRepository::new(&txn)
                .delete_semester(semester_id)
                .await?
            {
                return Err(AppError::NotFound);
            }
            txn.commit().await?;

            info!(semester_id = %semester_id, "semester deleted");
            Ok(Redirect::to("/syllabus/"))
        }
        SemesterAction::AddWeek => {
            authorize(&viewer, Resource::Syllabus, Action::Create)?;
            let (header, intro) = validate_week_heading(form.header, form.intro)?;

            let txn = state.db.begin().await?;
            let syllabus = SyllabusRepository::new(&txn);
            syllabus
                .find_semester(semester_id)
                .await?
                .ok_or(AppError::NotFound)?;
            let week = syllabus.append_week(semester_id, header, intro).await?;
            txn.commit().await?;

            info!(semester_id = %semester_id, week_num = week.week_num, "week added");
            Ok(Redirect::to(&format!("/syllabus/semester/{semester_id}")))
        }
    }
}

async fn show_week(
    State(state): State<Arc<AppState>>,
    CurrentUser(session): CurrentUser,
    Path((semester_id, week_num)): Path<(i32, i32)>,
) -> Result<Json<WeekView>, AppError> {
    authorize(&session.viewer(), Resource::Syllabus, Action::View)?;

    let syllabus = SyllabusRepository::new(&state.db);
    let week = syllabus
        .find_week(SemesterId::new(semester_id), week_num)
        .await?
        .ok_or(AppError::NotFound)?;
    let assignment = syllabus.assignment_of(week.id).await?;
    let documents = syllabus.documents_of(week.id).await?;

    Ok(Json(week_view(week, assignment, documents)))
}

fn validate_assignment(
    errors: &mut FormErrors,
    name: String,
    instructions: String,
) -> Option<Option<AssignmentContent>> {
    if name.trim().is_empty() && instructions.trim().is_empty() {
        return Some(None);
    }

    let name = errors.check("assignment_name", Heading::new(name));
    let instructions = errors.check("assignment_instructions", Body::new(instructions));
    let (name, instructions) = name.zip(instructions)?;

    Some(Some(AssignmentContent { name, instructions }))
}

/// 修改周的标题、简介和作业；勾选 `delete` 时删除该周并重新编号。
async fn edit_week(
    State(state): State<Arc<AppState>>,
    CurrentUser(session): CurrentUser,
    Path((semester_id, week_num)): Path<(i32, i32)>,
    Form(form): Form<WeekForm>,
) -> Result<Redirect, AppError> {
    let viewer = session.viewer();
    let semester_id = SemesterId::new(semester_id);

    if form.delete {
        authorize(&viewer, Resource::Syllabus, Action::Delete)?;

        let txn = state.db.begin().await?;
        let syllabus = SyllabusRepository::new(&txn);
        let week = syllabus
            .find_week(semester_id, week_num)
            .await?
            .ok_or(AppError::NotFound)?;
        let moved = syllabus.delete_week(&week).await?;
        txn.commit().await?;

        info!(semester_id = %semester_id, week_num, renumbered = moved, "week deleted");
        return Ok(Redirect::to(&format!("/syllabus/semester/{semester_id}")));
    }

    authorize(&viewer, Resource::Syllabus, Action::Edit)?;

    let mut errors = FormErrors::new();
    let header = errors.check("header", Heading::new(form.header));
    let intro = errors.check("intro", Body::new(form.intro));
    let assignment = validate_assignment(
        &mut errors,
        form.assignment_name,
        form.assignment_instructions,
    );
    errors.finish()?;
    let (Some(header), Some(intro), Some(assignment)) = (header, intro, assignment) else {
        return Err(AppError::field("header", "invalid week"));
    };

    let txn = state.db.begin().await?;
    let syllabus = SyllabusRepository::new(&txn);
    let week = syllabus
        .find_week(semester_id, week_num)
        .await?
        .ok_or(AppError::NotFound)?;
    syllabus.update_week(week.id, header, intro).await?;
    syllabus.set_assignment(week.id, assignment).await?;
    txn.commit().await?;

    info!(semester_id = %semester_id, week_num, "week updated");
    Ok(Redirect::to(&week_path(semester_id.into_inner(), week_num)))
}

/// 为某周上传资料，文件字段名为 `document`。
async fn upload_document(
    State(state): State<Arc<AppState>>,
    CurrentUser(session): CurrentUser,
    Path((semester_id, week_num)): Path<(i32, i32)>,
    multipart: Multipart,
) -> Result<Redirect, AppError> {
    authorize(&session.viewer(), Resource::Syllabus, Action::Edit)?;

    let mut form = MultipartForm::read(multipart).await?;
    let Some(file) = form.take_file("document") else {
        return Err(AppError::field("document", "choose a file to upload"));
    };

    let txn = state.db.begin().await?;
    let syllabus = SyllabusRepository::new(&txn);
    let week = syllabus
        .find_week(SemesterId::new(semester_id), week_num)
        .await?
        .ok_or(AppError::NotFound)?;
    let document = syllabus
        .add_document(
            week.id,
            DocumentFile {
                name: file.filename,
                data: file.data,
            },
        )
        .await?;
    txn.commit().await?;

    info!(
        document_id = %document.id,
        week_id = %week.id,
        size = document.size,
        "document uploaded"
    );
    Ok(Redirect::to(&week_path(semester_id, week_num)))
}
