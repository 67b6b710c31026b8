use crate::entity::{feedback, submission};
use anyhow::Result;
use chrono::{NaiveDateTime, Utc};
use collegejump_core::domain::{AssignmentId, Body, FeedbackId, SubmissionId, UserId};
use sea_orm::{
    ActiveModelTrait, ActiveValue::Set, ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter,
    QueryOrder,
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmissionRecord {
    pub id: SubmissionId,
    pub assignment_id: AssignmentId,
    pub author_id: UserId,
    pub timestamp: NaiveDateTime,
    pub text: String,
    pub filename: Option<String>,
}

#[derive(Debug, Clone)]
pub struct Attachment {
    pub filename: String,
    pub data: Vec<u8>,
}

#[derive(Debug, Clone)]
pub struct NewSubmission {
    pub assignment_id: AssignmentId,
    pub author_id: UserId,
    pub text: Body,
    pub attachment: Option<Attachment>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeedbackRecord {
    pub id: FeedbackId,
    pub submission_id: SubmissionId,
    pub author_id: UserId,
    pub text: String,
    pub timestamp: NaiveDateTime,
}

pub struct SubmissionRepository<'c, C> {
    conn: &'c C,
}

impl<'c, C: ConnectionTrait> SubmissionRepository<'c, C> {
    pub fn new(conn: &'c C) -> Self {
        Self { conn }
    }

    fn map_model(model: submission::Model) -> SubmissionRecord {
        SubmissionRecord {
            id: SubmissionId::new(model.id),
            assignment_id: AssignmentId::new(model.assignment_id),
            author_id: UserId::new(model.author_id),
            timestamp: model.timestamp,
            text: model.text,
            filename: model.filename,
        }
    }

    fn map_feedback(model: feedback::Model) -> FeedbackRecord {
        FeedbackRecord {
            id: FeedbackId::new(model.id),
            submission_id: SubmissionId::new(model.submission_id),
            author_id: UserId::new(model.author_id),
            text: model.text,
            timestamp: model.timestamp,
        }
    }

    pub async fn create(&self, new_submission: NewSubmission) -> Result<SubmissionRecord> {
        let (filename, attachment) = match new_submission.attachment {
            Some(file) => (Some(file.filename), Some(file.data)),
            None => (None, None),
        };

        let model = submission::ActiveModel {
            assignment_id: Set(new_submission.assignment_id.into_inner()),
            author_id: Set(new_submission.author_id.into_inner()),
            timestamp: Set(Utc::now().naive_utc()),
            text: Set(new_submission.text.into_inner()),
            filename: Set(filename),
            attachment: Set(attachment),
            ..Default::default()
        }
        .insert(self.conn)
        .await?;

        Ok(Self::map_model(model))
    }

    pub async fn find_by_id(&self, submission_id: SubmissionId) -> Result<Option<SubmissionRecord>> {
        let model = submission::Entity::find_by_id(submission_id.into_inner())
            .one(self.conn)
            .await?;

        Ok(model.map(Self::map_model))
    }

    pub async fn attachment(&self, submission_id: SubmissionId) -> Result<Option<Attachment>> {
        let model = submission::Entity::find_by_id(submission_id.into_inner())
            .one(self.conn)
            .await?;

        Ok(model.and_then(|model| match (model.filename, model.attachment) {
            (Some(filename), Some(data)) => Some(Attachment { filename, data }),
            _ => None,
        }))
    }

    pub async fn list_by_authors(
        &self,
        assignment_id: AssignmentId,
        authors: &[UserId],
    ) -> Result<Vec<SubmissionRecord>> {
        if authors.is_empty() {
            return Ok(Vec::new());
        }

        let models = submission::Entity::find()
            .filter(submission::Column::AssignmentId.eq(assignment_id.into_inner()))
            .filter(
                submission::Column::AuthorId
                    .is_in(authors.iter().map(|author| author.into_inner())),
            )
            .order_by_desc(submission::Column::Timestamp)
            .order_by_desc(submission::Column::Id)
            .all(self.conn)
            .await?;

        Ok(models.into_iter().map(Self::map_model).collect())
    }

    pub async fn add_feedback(
        &self,
        submission_id: SubmissionId,
        author_id: UserId,
        text: Body,
    ) -> Result<FeedbackRecord> {
        let model = feedback::ActiveModel {
            submission_id: Set(submission_id.into_inner()),
            author_id: Set(author_id.into_inner()),
            text: Set(text.into_inner()),
            timestamp: Set(Utc::now().naive_utc()),
            ..Default::default()
        }
        .insert(self.conn)
        .await?;

        Ok(Self::map_feedback(model))
    }

    pub async fn feedback_for(&self, submission_id: SubmissionId) -> Result<Vec<FeedbackRecord>> {
        let models = feedback::Entity::find()
            .filter(feedback::Column::SubmissionId.eq(submission_id.into_inner()))
            .order_by_asc(feedback::Column::Timestamp)
            .order_by_asc(feedback::Column::Id)
            .all(self.conn)
            .await?;

        Ok(models.into_iter().map(Self::map_feedback).collect())
    }
}
