use crate::entity::announcement;
use anyhow::Result;
use chrono::{NaiveDateTime, Utc};
use collegejump_core::domain::{AnnouncementId, Body, Email, Heading};
use sea_orm::{
    ActiveModelTrait, ActiveValue::Set, ConnectionTrait, EntityTrait, QueryOrder, QuerySelect,
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnnouncementRecord {
    pub id: AnnouncementId,
    pub author: String,
    pub title: String,
    pub content: String,
    pub timestamp: NaiveDateTime,
}

#[derive(Debug, Clone)]
pub struct AnnouncementContent {
    pub title: Heading,
    pub content: Body,
}

pub struct AnnouncementRepository<'c, C> {
    conn: &'c C,
}

impl<'c, C: ConnectionTrait> AnnouncementRepository<'c, C> {
    pub fn new(conn: &'c C) -> Self {
        Self { conn }
    }

    fn map_model(model: announcement::Model) -> AnnouncementRecord {
        AnnouncementRecord {
            id: AnnouncementId::new(model.id),
            author: model.author,
            title: model.title,
            content: model.content,
            timestamp: model.timestamp,
        }
    }

    pub async fn list_recent(&self, limit: Option<u64>) -> Result<Vec<AnnouncementRecord>> {
        let models = announcement::Entity::find()
            .order_by_desc(announcement::Column::Timestamp)
            .order_by_desc(announcement::Column::Id)
            .limit(limit)
            .all(self.conn)
            .await?;

        Ok(models.into_iter().map(Self::map_model).collect())
    }

    pub async fn find_by_id(&self, id: AnnouncementId) -> Result<Option<AnnouncementRecord>> {
        let model = announcement::Entity::find_by_id(id.into_inner())
            .one(self.conn)
            .await?;

        Ok(model.map(Self::map_model))
    }

    pub async fn create(&self, author: &Email, content: AnnouncementContent) -> Result<AnnouncementRecord> {
        let model = announcement::ActiveModel {
            author: Set(author.as_str().to_string()),
            title: Set(content.title.into_inner()),
            content: Set(content.content.into_inner()),
            timestamp: Set(Utc::now().naive_utc()),
            ..Default::default()
        }
        .insert(self.conn)
        .await?;

        Ok(Self::map_model(model))
    }

    pub async fn update(
        &self,
        id: AnnouncementId,
        content: AnnouncementContent,
    ) -> Result<Option<AnnouncementRecord>> {
        let Some(model) = announcement::Entity::find_by_id(id.into_inner())
            .one(self.conn)
            .await?
        else {
            return Ok(None);
        };

        let mut active_model: announcement::ActiveModel = model.into();
        active_model.title = Set(content.title.into_inner());
        active_model.content = Set(content.content.into_inner());

        let updated = active_model.update(self.conn).await?;
        Ok(Some(Self::map_model(updated)))
    }

    pub async fn delete(&self, id: AnnouncementId) -> Result<bool> {
        let result = announcement::Entity::delete_by_id(id.into_inner())
            .exec(self.conn)
            .await?;

        Ok(result.rows_affected > 0)
    }
}
