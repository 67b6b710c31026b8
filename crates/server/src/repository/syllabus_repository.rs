use crate::entity::{assignment, document, semester, week};
use anyhow::{Result, anyhow};
use collegejump_core::domain::{
    AssignmentId, Body, DocumentId, Heading, SemesterId, WeekId, next_week_num,
    renumber_after_removal,
};
use sea_orm::{
    ActiveModelTrait, ActiveValue::Set, ColumnTrait, ConnectionTrait, EntityTrait,
    PaginatorTrait, QueryFilter, QueryOrder,
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SemesterRecord {
    pub id: SemesterId,
    pub name: String,
    pub order: i32,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WeekRecord {
    pub id: WeekId,
    pub semester_id: SemesterId,
    pub week_num: i32,
    pub header: String,
    pub intro: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssignmentRecord {
    pub id: AssignmentId,
    pub week_id: WeekId,
    pub name: String,
    pub instructions: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentRecord {
    pub id: DocumentId,
    pub week_id: WeekId,
    pub name: String,
    pub size: usize,
}

#[derive(Debug, Clone)]
pub struct DocumentFile {
    pub name: String,
    pub data: Vec<u8>,
}

#[derive(Debug, Clone)]
pub struct AssignmentContent {
    pub name: Heading,
    pub instructions: Body,
}

pub struct SyllabusRepository<'c, C> {
    conn: &'c C,
}

impl<'c, C: ConnectionTrait> SyllabusRepository<'c, C> {
    pub fn new(conn: &'c C) -> Self {
        Self { conn }
    }

    fn map_semester(model: semester::Model) -> SemesterRecord {
        SemesterRecord {
            id: SemesterId::new(model.id),
            name: model.name,
            order: model.sort_order,
        }
    }

    fn map_week(model: week::Model) -> WeekRecord {
        WeekRecord {
            id: WeekId::new(model.id),
            semester_id: SemesterId::new(model.semester_id),
            week_num: model.week_num,
            header: model.header,
            intro: model.intro,
        }
    }

    fn map_assignment(model: assignment::Model) -> AssignmentRecord {
        AssignmentRecord {
            id: AssignmentId::new(model.id),
            week_id: WeekId::new(model.week_id),
            name: model.name,
            instructions: model.instructions,
        }
    }

    fn map_document(model: document::Model) -> DocumentRecord {
        DocumentRecord {
            id: DocumentId::new(model.id),
            week_id: WeekId::new(model.week_id),
            name: model.name,
            size: model.data.len(),
        }
    }

    pub async fn list_semesters(&self) -> Result<Vec<SemesterRecord>> {
        let models = semester::Entity::find()
            .order_by_asc(semester::Column::SortOrder)
            .order_by_asc(semester::Column::Id)
            .all(self.conn)
            .await?;

        Ok(models.into_iter().map(Self::map_semester).collect())
    }

    pub async fn find_semester(&self, semester_id: SemesterId) -> Result<Option<SemesterRecord>> {
        let model = semester::Entity::find_by_id(semester_id.into_inner())
            .one(self.conn)
            .await?;

        Ok(model.map(Self::map_semester))
    }

    pub async fn create_semester(&self, name: Heading, order: i32) -> Result<SemesterRecord> {
        let model = semester::ActiveModel {
            name: Set(name.into_inner()),
            sort_order: Set(order),
            ..Default::default()
        }
        .insert(self.conn)
        .await?;

        Ok(Self::map_semester(model))
    }

    pub async fn update_semester(
        &self,
        semester_id: SemesterId,
        name: Heading,
        order: i32,
    ) -> Result<Option<SemesterRecord>> {
        let Some(model) = semester::Entity::find_by_id(semester_id.into_inner())
            .one(self.conn)
            .await?
        else {
            return Ok(None);
        };

        let mut active_model: semester::ActiveModel = model.into();
        active_model.name = Set(name.into_inner());
        active_model.sort_order = Set(order);

        let updated = active_model.update(self.conn).await?;
        Ok(Some(Self::map_semester(updated)))
    }

    pub async fn delete_semester(&self, semester_id: SemesterId) -> Result<bool> {
        let result = semester::Entity::delete_by_id(semester_id.into_inner())
            .exec(self.conn)
            .await?;

        Ok(result.rows_affected > 0)
    }

    pub async fn weeks_of(&self, semester_id: SemesterId) -> Result<Vec<WeekRecord>> {
        let models = week::Entity::find()
            .filter(week::Column::SemesterId.eq(semester_id.into_inner()))
            .order_by_asc(week::Column::WeekNum)
            .all(self.conn)
            .await?;

        Ok(models.into_iter().map(Self::map_week).collect())
    }

    pub async fn find_week(
        &self,
        semester_id: SemesterId,
        week_num: i32,
    ) -> Result<Option<WeekRecord>> {
        let model = week::Entity::find()
            .filter(week::Column::SemesterId.eq(semester_id.into_inner()))
            .filter(week::Column::WeekNum.eq(week_num))
            .one(self.conn)
            .await?;

        Ok(model.map(Self::map_week))
    }

    pub async fn find_week_by_id(&self, week_id: WeekId) -> Result<Option<WeekRecord>> {
        let model = week::Entity::find_by_id(week_id.into_inner())
            .one(self.conn)
            .await?;

        Ok(model.map(Self::map_week))
    }

    pub async fn append_week(
        &self,
        semester_id: SemesterId,
        header: Heading,
        intro: Body,
    ) -> Result<WeekRecord> {
        let existing = week::Entity::find()
            .filter(week::Column::SemesterId.eq(semester_id.into_inner()))
            .count(self.conn)
            .await?;
        let existing = usize::try_from(existing)?;

        let model = week::ActiveModel {
            semester_id: Set(semester_id.into_inner()),
            week_num: Set(next_week_num(existing)),
            header: Set(header.into_inner()),
            intro: Set(intro.into_inner()),
            ..Default::default()
        }
        .insert(self.conn)
        .await?;

        Ok(Self::map_week(model))
    }

    pub async fn update_week(&self, week_id: WeekId, header: Heading, intro: Body) -> Result<WeekRecord> {
        let model = week::Entity::find_by_id(week_id.into_inner())
            .one(self.conn)
            .await?
            .ok_or_else(|| anyhow!("week {week_id} disappeared during update"))?;

        let mut active_model: week::ActiveModel = model.into();
        active_model.header = Set(header.into_inner());
        active_model.intro = Set(intro.into_inner());

        let updated = active_model.update(self.conn).await?;
        Ok(Self::map_week(updated))
    }

    pub async fn delete_week(&self, target: &WeekRecord) -> Result<usize> {
        week::Entity::delete_by_id(target.id.into_inner())
            .exec(self.conn)
            .await?;

        let remaining: Vec<(WeekId, i32)> = self
            .weeks_of(target.semester_id)
            .await?
            .into_iter()
            .map(|week| (week.id, week.week_num))
            .collect();

        let updates = renumber_after_removal(target.week_num, &remaining);
        for update in &updates {
            week::ActiveModel {
                id: Set(update.week_id.into_inner()),
                week_num: Set(update.week_num),
                ..Default::default()
            }
            .update(self.conn)
            .await?;
        }

        Ok(updates.len())
    }

    pub async fn assignment_of(&self, week_id: WeekId) -> Result<Option<AssignmentRecord>> {
        let model = assignment::Entity::find()
            .filter(assignment::Column::WeekId.eq(week_id.into_inner()))
            .order_by_asc(assignment::Column::Id)
            .one(self.conn)
            .await?;

        Ok(model.map(Self::map_assignment))
    }

    pub async fn find_assignment(
        &self,
        assignment_id: AssignmentId,
    ) -> Result<Option<AssignmentRecord>> {
        let model = assignment::Entity::find_by_id(assignment_id.into_inner())
            .one(self.conn)
            .await?;

        Ok(model.map(Self::map_assignment))
    }

    pub async fn set_assignment(
        &self,
        week_id: WeekId,
        content: Option<AssignmentContent>,
    ) -> Result<Option<AssignmentRecord>> {
        let existing = assignment::Entity::find()
            .filter(assignment::Column::WeekId.eq(week_id.into_inner()))
            .order_by_asc(assignment::Column::Id)
            .one(self.conn)
            .await?;

        match (existing, content) {
            (None, None) => Ok(None),
            (Some(_), None) => {
                assignment::Entity::delete_many()
                    .filter(assignment::Column::WeekId.eq(week_id.into_inner()))
                    .exec(self.conn)
                    .await?;
                Ok(None)
            }
            (None, Some(content)) => {
                let model = assignment::ActiveModel {
                    week_id: Set(week_id.into_inner()),
                    name: Set(content.name.into_inner()),
                    instructions: Set(content.instructions.into_inner()),
                    ..Default::default()
                }
                .insert(self.conn)
                .await?;
                Ok(Some(Self::map_assignment(model)))
            }
            (Some(model), Some(content)) => {
                let mut active_model: assignment::ActiveModel = model.into();
                active_model.name = Set(content.name.into_inner());
                active_model.instructions = Set(content.instructions.into_inner());
                let updated = active_model.update(self.conn).await?;
                Ok(Some(Self::map_assignment(updated)))
            }
        }
    }

    pub async fn documents_of(&self, week_id: WeekId) -> Result<Vec<DocumentRecord>> {
        let models = document::Entity::find()
            .filter(document::Column::WeekId.eq(week_id.into_inner()))
            .order_by_asc(document::Column::Id)
            .all(self.conn)
            .await?;

        Ok(models.into_iter().map(Self::map_document).collect())
    }

    pub async fn add_document(&self, week_id: WeekId, file: DocumentFile) -> Result<DocumentRecord> {
        let model = document::ActiveModel {
            week_id: Set(week_id.into_inner()),
            name: Set(file.name),
            data: Set(file.data),
            ..Default::default()
        }
        .insert(self.conn)
        .await?;

        Ok(Self::map_document(model))
    }

    pub async fn find_document(&self, document_id: DocumentId) -> Result<Option<DocumentFile>> {
        let model = document::Entity::find_by_id(document_id.into_inner())
            .one(self.conn)
            .await?;

        Ok(model.map(|model| DocumentFile {
            name: model.name,
            data: model.data,
        }))
    }

    pub async fn delete_document(&self, document_id: DocumentId) -> Result<bool> {
        let result = document::Entity::delete_by_id(document_id.into_inner())
            .exec(self.conn)
            .await?;

        Ok(result.rows_affected > 0)
    }
}
