use std::collections::BTreeSet;

use crate::entity::{enrollment, mentorship, user};
use anyhow::Result;
use chrono::Utc;
use collegejump_core::domain::{Email, PersonName, SemesterId, UserId};
use sea_orm::{
    ActiveModelTrait, ActiveValue::Set, ColumnTrait, ConnectionTrait, EntityTrait,
    PaginatorTrait, QueryFilter, QueryOrder,
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserRecord {
    pub id: UserId,
    pub name: String,
    pub email: String,
    pub admin: bool,
}

#[derive(Debug, Clone)]
pub struct NewUser {
    pub name: PersonName,
    pub email: Email,
    pub password_hash: String,
    pub admin: bool,
}

#[derive(Debug, Clone, Default)]
pub struct UserUpdate {
    pub name: Option<PersonName>,
    pub email: Option<Email>,
    pub password_hash: Option<String>,
    pub admin: Option<bool>,
}

pub struct UserRepository<'c, C> {
    conn: &'c C,
}

impl<'c, C: ConnectionTrait> UserRepository<'c, C> {
    pub fn new(conn: &'c C) -> Self {
        Self { conn }
    }

    fn map_model(model: user::Model) -> UserRecord {
        UserRecord {
            id: UserId::new(model.id),
            name: model.name,
            email: model.email,
            admin: model.admin,
        }
    }

    pub async fn create(&self, new_user: NewUser) -> Result<UserRecord> {
        let active_model = user::ActiveModel {
            name: Set(new_user.name.into_inner()),
            email: Set(new_user.email.as_str().to_string()),
            password_hash: Set(new_user.password_hash),
            admin: Set(new_user.admin),
            created_at: Set(Utc::now().naive_utc()),
            ..Default::default()
        };

        let model = active_model.insert(self.conn).await?;
        Ok(Self::map_model(model))
    }

    pub async fn find_by_id(&self, user_id: UserId) -> Result<Option<UserRecord>> {
        let model = user::Entity::find_by_id(user_id.into_inner())
            .one(self.conn)
            .await?;

        Ok(model.map(Self::map_model))
    }

    pub async fn find_by_email(&self, email: &Email) -> Result<Option<UserRecord>> {
        let model = user::Entity::find()
            .filter(user::Column::Email.eq(email.as_str()))
            .one(self.conn)
            .await?;

        Ok(model.map(Self::map_model))
    }

    pub async fn find_credentials(&self, email: &Email) -> Result<Option<(UserRecord, String)>> {
        let model = user::Entity::find()
            .filter(user::Column::Email.eq(email.as_str()))
            .one(self.conn)
            .await?;

        Ok(model.map(|model| {
            let hash = model.password_hash.clone();
            (Self::map_model(model), hash)
        }))
    }

    pub async fn list_all(&self) -> Result<Vec<UserRecord>> {
        let models = user::Entity::find()
            .order_by_asc(user::Column::Id)
            .all(self.conn)
            .await?;

        Ok(models.into_iter().map(Self::map_model).collect())
    }

    pub async fn count(&self) -> Result<u64> {
        Ok(user::Entity::find().count(self.conn).await?)
    }

    pub async fn update(&self, user_id: UserId, update: UserUpdate) -> Result<Option<UserRecord>> {
        let Some(model) = user::Entity::find_by_id(user_id.into_inner())
            .one(self.conn)
            .await?
        else {
            return Ok(None);
        };

        let mut active_model: user::ActiveModel = model.into();
        if let Some(name) = update.name {
            active_model.name = Set(name.into_inner());
        }
        if let Some(email) = update.email {
            active_model.email = Set(email.as_str().to_string());
        }
        if let Some(password_hash) = update.password_hash {
            active_model.password_hash = Set(password_hash);
        }
        if let Some(admin) = update.admin {
            active_model.admin = Set(admin);
        }

        let updated = active_model.update(self.conn).await?;
        Ok(Some(Self::map_model(updated)))
    }

    pub async fn delete(&self, user_id: UserId) -> Result<bool> {
        let result = user::Entity::delete_by_id(user_id.into_inner())
            .exec(self.conn)
            .await?;

        Ok(result.rows_affected > 0)
    }

    pub async fn mentors_of(&self, mentee: UserId) -> Result<Vec<UserRecord>> {
        let mentor_ids: Vec<i32> = mentorship::Entity::find()
            .filter(mentorship::Column::MenteeId.eq(mentee.into_inner()))
            .all(self.conn)
            .await?
            .into_iter()
            .map(|row| row.mentor_id)
            .collect();

        self.find_many(mentor_ids).await
    }

    pub async fn mentees_of(&self, mentor: UserId) -> Result<Vec<UserRecord>> {
        let mentee_ids: Vec<i32> = mentorship::Entity::find()
            .filter(mentorship::Column::MentorId.eq(mentor.into_inner()))
            .all(self.conn)
            .await?
            .into_iter()
            .map(|row| row.mentee_id)
            .collect();

        self.find_many(mentee_ids).await
    }

    pub async fn is_mentor_of(&self, mentor: UserId, mentee: UserId) -> Result<bool> {
        let row = mentorship::Entity::find_by_id((mentor.into_inner(), mentee.into_inner()))
            .one(self.conn)
            .await?;

        Ok(row.is_some())
    }

    pub async fn set_mentors(&self, mentee: UserId, mentors: &[UserId]) -> Result<()> {
        mentorship::Entity::delete_many()
            .filter(mentorship::Column::MenteeId.eq(mentee.into_inner()))
            .exec(self.conn)
            .await?;

        let unique: BTreeSet<UserId> = mentors.iter().copied().collect();
        for mentor in unique {
            mentorship::ActiveModel {
                mentor_id: Set(mentor.into_inner()),
                mentee_id: Set(mentee.into_inner()),
            }
            .insert(self.conn)
            .await?;
        }

        Ok(())
    }

    pub async fn enrolled_semesters(&self, user_id: UserId) -> Result<Vec<SemesterId>> {
        let rows = enrollment::Entity::find()
            .filter(enrollment::Column::UserId.eq(user_id.into_inner()))
            .order_by_asc(enrollment::Column::SemesterId)
            .all(self.conn)
            .await?;

        Ok(rows
            .into_iter()
            .map(|row| SemesterId::new(row.semester_id))
            .collect())
    }

    pub async fn set_enrollments(&self, user_id: UserId, semesters: &[SemesterId]) -> Result<()> {
        enrollment::Entity::delete_many()
            .filter(enrollment::Column::UserId.eq(user_id.into_inner()))
            .exec(self.conn)
            .await?;

        let unique: BTreeSet<SemesterId> = semesters.iter().copied().collect();
        for semester in unique {
            enrollment::ActiveModel {
                user_id: Set(user_id.into_inner()),
                semester_id: Set(semester.into_inner()),
            }
            .insert(self.conn)
            .await?;
        }

        Ok(())
    }

    pub async fn interested_semesters(&self, user_id: UserId) -> Result<BTreeSet<SemesterId>> {
        let mut people = vec![user_id.into_inner()];
        people.extend(
            mentorship::Entity::find()
                .filter(mentorship::Column::MentorId.eq(user_id.into_inner()))
                .all(self.conn)
                .await?
                .into_iter()
                .map(|row| row.mentee_id),
        );

        let rows = enrollment::Entity::find()
            .filter(enrollment::Column::UserId.is_in(people))
            .all(self.conn)
            .await?;

        Ok(rows
            .into_iter()
            .map(|row| SemesterId::new(row.semester_id))
            .collect())
    }

    async fn find_many(&self, ids: Vec<i32>) -> Result<Vec<UserRecord>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let models = user::Entity::find()
            .filter(user::Column::Id.is_in(ids))
            .order_by_asc(user::Column::Email)
            .all(self.conn)
            .await?;

        Ok(models.into_iter().map(Self::map_model).collect())
    }
}
