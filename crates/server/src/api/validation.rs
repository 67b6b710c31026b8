//! 表单校验。

use collegejump_api_types::FieldError;
use collegejump_core::domain::{
    AccountField, AccountFormContext, DomainError, Email, NewPassword, PersonName, SemesterId,
    UserId,
};
use sea_orm::ConnectionTrait;

use super::error::AppError;
use crate::repository::{SyllabusRepository, UserRepository};

/// 按字段收集校验错误。
#[derive(Debug, Default)]
pub struct FormErrors {
    errors: Vec<FieldError>,
}

impl FormErrors {
    pub fn new() -> Self {
        Self::default()
    }

    /// 记录失败原因并返回 `None`，成功时返回值本身。
    pub fn check<T>(&mut self, field: &str, result: Result<T, DomainError>) -> Option<T> {
        match result {
            Ok(value) => Some(value),
            Err(err) => {
                self.add(field, err.to_string());
                None
            }
        }
    }

    pub fn add(&mut self, field: &str, message: impl Into<String>) {
        self.errors.push(FieldError {
            field: field.to_string(),
            message: message.into(),
        });
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn finish(self) -> Result<(), AppError> {
        if self.errors.is_empty() {
            Ok(())
        } else {
            Err(AppError::Validation(self.errors))
        }
    }
}

/// 账户表单的原始输入。不在当前表单上下文中的字段为 `None`。
#[derive(Debug, Default)]
pub struct AccountInput {
    pub name: String,
    pub email: Option<String>,
    pub password: String,
    pub password_confirm: String,
    pub admin: Option<bool>,
    pub mentors: Option<String>,
    pub semesters: Option<String>,
}

/// 校验通过的账户字段。
#[derive(Debug)]
pub struct ValidAccount {
    pub name: PersonName,
    pub email: Option<Email>,
    pub password: Option<NewPassword>,
    pub admin: Option<bool>,
    pub mentors: Option<Vec<UserId>>,
    pub semesters: Option<Vec<SemesterId>>,
}

/// 校验账户表单，包括邮箱唯一性以及导师、学期是否存在。
///
/// `editing` 为正在编辑的账户；新建账户时为 `None`。
pub async fn validate_account<C: ConnectionTrait>(
    conn: &C,
    context: AccountFormContext,
    input: AccountInput,
    editing: Option<UserId>,
) -> Result<ValidAccount, AppError> {
    let mut errors = FormErrors::new();
    let users = UserRepository::new(conn);

    let name = errors.check("name", PersonName::new(input.name));

    let mut email = None;
    if let Some(raw) = input.email.filter(|_| context.has(AccountField::Email)) {
        if let Some(parsed) = errors.check("email", Email::parse(&raw)) {
            match users.find_by_email(&parsed).await? {
                Some(existing) if Some(existing.id) != editing => {
                    errors.add("email", "an account with this email already exists");
                }
                _ => email = Some(parsed),
            }
        }
    }

    let password = if context.requires_password() {
        errors
            .check(
                "password",
                NewPassword::new(&input.password, &input.password_confirm),
            )
            .map(Some)
    } else {
        errors.check(
            "password",
            NewPassword::optional(&input.password, &input.password_confirm),
        )
    };

    let mut mentors = None;
    if let Some(raw) = input.mentors.filter(|_| context.has(AccountField::Mentors)) {
        if let Some(emails) = errors.check("mentors", Email::parse_list(&raw)) {
            let mut ids = Vec::with_capacity(emails.len());
            for mentor_email in emails {
                match users.find_by_email(&mentor_email).await? {
                    Some(mentor) if Some(mentor.id) == editing => {
                        errors.add("mentors", "a user cannot mentor themselves");
                    }
                    Some(mentor) => ids.push(mentor.id),
                    None => errors.add("mentors", format!("no account with email {mentor_email}")),
                }
            }
            mentors = Some(ids);
        }
    }

    let mut semesters = None;
    if let Some(raw) = input.semesters.filter(|_| context.has(AccountField::Semesters)) {
        let syllabus = SyllabusRepository::new(conn);
        let mut ids = Vec::new();
        for part in raw.split(',').map(str::trim).filter(|part| !part.is_empty()) {
            let Ok(id) = part.parse::<SemesterId>() else {
                errors.add("semesters", DomainError::InvalidNumber(part.to_string()).to_string());
                continue;
            };
            if syllabus.find_semester(id).await?.is_some() {
                ids.push(id);
            } else {
                errors.add("semesters", format!("semester {id} does not exist"));
            }
        }
        semesters = Some(ids);
    }

    let admin = input.admin.filter(|_| context.has(AccountField::Admin));

    errors.finish()?;

    let (Some(name), Some(password)) = (name, password) else {
        return Err(AppError::field("name", "invalid account form"));
    };

    Ok(ValidAccount {
        name,
        email,
        password,
        admin,
        mentors,
        semesters,
    })
}
