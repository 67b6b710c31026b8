use crate::entity::session;
use anyhow::Result;
use chrono::Utc;
use collegejump_core::domain::UserId;
use sea_orm::{ActiveModelTrait, ActiveValue::Set, ConnectionTrait, EntityTrait};
use uuid::Uuid;

pub struct SessionRepository<'c, C> {
    conn: &'c C,
}

impl<'c, C: ConnectionTrait> SessionRepository<'c, C> {
    pub fn new(conn: &'c C) -> Self {
        Self { conn }
    }

    pub async fn create(&self, user_id: UserId) -> Result<String> {
        let token = Uuid::new_v4().to_string();

        session::ActiveModel {
            token: Set(token.clone()),
            user_id: Set(user_id.into_inner()),
            created_at: Set(Utc::now().naive_utc()),
        }
        .insert(self.conn)
        .await?;

        Ok(token)
    }

    pub async fn find_user(&self, token: &str) -> Result<Option<UserId>> {
        let model = session::Entity::find_by_id(token.to_string())
            .one(self.conn)
            .await?;

        Ok(model.map(|model| UserId::new(model.user_id)))
    }

    pub async fn delete(&self, token: &str) -> Result<()> {
        session::Entity::delete_by_id(token.to_string())
            .exec(self.conn)
            .await?;

        Ok(())
    }
}
