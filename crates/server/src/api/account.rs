//! 账户的查看、创建、编辑与删除。
//!
//! 编辑表单的结构由调用者的角色决定：管理员解码
//! [`AdminEditAccountForm`]，普通用户只能解码 [`SelfAccountForm`]，
//! 因此请求中多出的字段（如 `admin`）会被直接丢弃。

use std::sync::Arc;

use axum::{
    Form, Json, Router,
    extract::{FromRequest, Path, Request, State},
    response::Redirect,
    routing::get,
};
use collegejump_api_types::{
    forms::{AdminCreateAccountForm, AdminEditAccountForm, SelfAccountForm},
    views::{AccountPage, AccountsPage},
};
use collegejump_core::domain::{
    AccountField, AccountFormContext, Action, Resource, UserId, policy::authorize,
};
use sea_orm::{DatabaseTransaction, TransactionTrait};
use serde::de::DeserializeOwned;
use tracing::info;

use super::error::AppError;
use super::state::AppState;
use super::validation::{AccountInput, validate_account};
use super::views::{semester_summary, user_summary};
use crate::access::account_viewer;
use crate::auth::{CurrentUser, SessionUser, hash_password};
use crate::repository::{NewUser, SyllabusRepository, UserRepository, UserUpdate};

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/account/all", get(list_accounts).post(create_account))
        .route("/account/{user_id}", get(show_account).post(edit_account))
}

fn field_name(field: AccountField) -> &'static str {
    match field {
        AccountField::SetupKey => "setup_key",
        AccountField::Name => "name",
        AccountField::Email => "email",
        AccountField::Password => "password",
        AccountField::PasswordConfirm => "password_confirm",
        AccountField::Admin => "admin",
        AccountField::Mentors => "mentors",
        AccountField::Semesters => "semesters",
        AccountField::Delete => "delete",
    }
}

/// 所有账户及可选学期。
async fn list_accounts(
    State(state): State<Arc<AppState>>,
    CurrentUser(session): CurrentUser,
) -> Result<Json<AccountsPage>, AppError> {
    authorize(&session.viewer(), Resource::AccountDirectory, Action::View)?;

    let users = UserRepository::new(&state.db).list_all().await?;
    let semesters = SyllabusRepository::new(&state.db).list_semesters().await?;

    Ok(Json(AccountsPage {
        users: users.iter().map(user_summary).collect(),
        semesters: semesters.iter().map(semester_summary).collect(),
    }))
}

/// 管理员创建账户。
async fn create_account(
    State(state): State<Arc<AppState>>,
    CurrentUser(session): CurrentUser,
    Form(form): Form<AdminCreateAccountForm>,
) -> Result<Redirect, AppError> {
    authorize(&session.viewer(), Resource::AccountDirectory, Action::Create)?;

    let txn = state.db.begin().await?;
    let account = validate_account(
        &txn,
        AccountFormContext::AdminCreate,
        AccountInput {
            name: form.name,
            email: Some(form.email),
            password: form.password,
            password_confirm: form.password_confirm,
            admin: Some(form.admin),
            mentors: Some(form.mentors),
            semesters: Some(form.semesters),
        },
        None,
    )
    .await?;

    let (Some(email), Some(password)) = (account.email, account.password) else {
        return Err(AppError::field("email", "email is required"));
    };

    let users = UserRepository::new(&txn);
    let user = users
        .create(NewUser {
            name: account.name,
            email,
            password_hash: hash_password(&password)?,
            admin: account.admin.unwrap_or(false),
        })
        .await?;
    users
        .set_mentors(user.id, &account.mentors.unwrap_or_default())
        .await?;
    users
        .set_enrollments(user.id, &account.semesters.unwrap_or_default())
        .await?;
    txn.commit().await?;

    info!(
        user_id = %user.id,
        email = %user.email,
        admin = user.admin,
        created_by = %session.user.id,
        "account created"
    );
    Ok(Redirect::to("/account/all"))
}

async fn show_account(
    State(state): State<Arc<AppState>>,
    CurrentUser(session): CurrentUser,
    Path(user_id): Path<i32>,
) -> Result<Json<AccountPage>, AppError> {
    let target = UserId::new(user_id);
    authorize(&account_viewer(&session, target), Resource::Account, Action::View)?;

    let users = UserRepository::new(&state.db);
    let user = users.find_by_id(target).await?.ok_or(AppError::NotFound)?;
    let mentors = users.mentors_of(target).await?;
    let mentees = users.mentees_of(target).await?;
    let semesters = users.enrolled_semesters(target).await?;

    let context = AccountFormContext::for_edit(session.user.admin);

    Ok(Json(AccountPage {
        user: user_summary(&user),
        mentors: mentors.into_iter().map(|mentor| mentor.email).collect(),
        mentees: mentees.into_iter().map(|mentee| mentee.email).collect(),
        semesters: semesters.into_iter().map(|id| id.into_inner()).collect(),
        editable_fields: context
            .fields()
            .iter()
            .map(|field| field_name(*field).to_string())
            .collect(),
    }))
}

async fn decode<T>(request: Request, state: &Arc<AppState>) -> Result<T, AppError>
where
    T: DeserializeOwned + Send,
{
    let Form(form) = Form::<T>::from_request(request, state)
        .await
        .map_err(|rejection| AppError::BadRequest(rejection.body_text()))?;
    Ok(form)
}

/// 编辑账户。表单上下文在解码请求体之前按调用者角色选定。
async fn edit_account(
    State(state): State<Arc<AppState>>,
    CurrentUser(session): CurrentUser,
    Path(user_id): Path<i32>,
    request: Request,
) -> Result<Redirect, AppError> {
    let target = UserId::new(user_id);
    let viewer = account_viewer(&session, target);
    authorize(&viewer, Resource::Account, Action::Edit)?;

    match AccountFormContext::for_edit(session.user.admin) {
        AccountFormContext::AdminEdit => {
            let form: AdminEditAccountForm = decode(request, &state).await?;
            if form.delete {
                authorize(&viewer, Resource::Account, Action::Delete)?;
                return delete_account(&state, &session, target).await;
            }
            admin_edit(&state, &session, target, form).await
        }
        _ => {
            let form: SelfAccountForm = decode(request, &state).await?;
            self_edit(&state, target, form).await
        }
    }
}

async fn delete_account(
    state: &AppState,
    session: &SessionUser,
    target: UserId,
) -> Result<Redirect, AppError> {
    let txn = state.db.begin().await?;
    if !UserRepository::new(&txn).delete(target).await? {
        return Err(AppError::NotFound);
    }
    txn.commit().await?;

    info!(user_id = %target, deleted_by = %session.user.id, "account deleted");
    Ok(Redirect::to("/"))
}

async fn ensure_exists(txn: &DatabaseTransaction, target: UserId) -> Result<(), AppError> {
    UserRepository::new(txn)
        .find_by_id(target)
        .await?
        .map(|_| ())
        .ok_or(AppError::NotFound)
}

async fn admin_edit(
    state: &AppState,
    session: &SessionUser,
    target: UserId,
    form: AdminEditAccountForm,
) -> Result<Redirect, AppError> {
    let txn = state.db.begin().await?;
    ensure_exists(&txn, target).await?;

    let account = validate_account(
        &txn,
        AccountFormContext::AdminEdit,
        AccountInput {
            name: form.name,
            email: Some(form.email),
            password: form.password,
            password_confirm: form.password_confirm,
            admin: Some(form.admin),
            mentors: Some(form.mentors),
            semesters: Some(form.semesters),
        },
        Some(target),
    )
    .await?;

    let password_hash = account.password.as_ref().map(hash_password).transpose()?;

    let users = UserRepository::new(&txn);
    users
        .update(
            target,
            UserUpdate {
                name: Some(account.name),
                email: account.email,
                password_hash,
                admin: account.admin,
            },
        )
        .await?;
    if let Some(mentors) = &account.mentors {
        users.set_mentors(target, mentors).await?;
    }
    if let Some(semesters) = &account.semesters {
        users.set_enrollments(target, semesters).await?;
    }
    txn.commit().await?;

    info!(user_id = %target, edited_by = %session.user.id, "account updated");
    Ok(Redirect::to(&format!("/account/{target}")))
}

async fn self_edit(
    state: &AppState,
    target: UserId,
    form: SelfAccountForm,
) -> Result<Redirect, AppError> {
    let txn = state.db.begin().await?;
    ensure_exists(&txn, target).await?;

    let account = validate_account(
        &txn,
        AccountFormContext::SelfEdit,
        AccountInput {
            name: form.name,
            password: form.password,
            password_confirm: form.password_confirm,
            ..Default::default()
        },
        Some(target),
    )
    .await?;

    let password_hash = account.password.as_ref().map(hash_password).transpose()?;

    UserRepository::new(&txn)
        .update(
            target,
            UserUpdate {
                name: Some(account.name),
                password_hash,
                ..Default::default()
            },
        )
        .await?;
    txn.commit().await?;

    info!(user_id = %target, "account updated by owner");
    Ok(Redirect::to(&format!("/account/{target}")))
}
