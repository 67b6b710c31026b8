use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "document")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub week_id: i32,
    pub name: String,
    #[serde(skip)]
    pub data: Vec<u8>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::week::Entity",
        from = "Column::WeekId",
        to = "super::week::Column::Id",
        on_update = "NoAction",
        on_delete = "Cascade"
    )]
    Week,
}

impl Related<super::week::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Week.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
