//! Row-to-row link entity model
//!
//! One record per linked (source row, target row) pair under a [`super::table_link`].
//! The pair is unique per link and disappears when either row is deleted.

use sea_orm::ActiveModelBehavior;
use sea_orm::entity::prelude::*;
use sea_orm::prelude::DateTimeWithTimeZone;
use serde_json::Value as JsonValue;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "table_row_links")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub link_id: Uuid,
    pub source_row_id: Uuid,
    pub target_row_id: Uuid,
    #[sea_orm(column_type = "JsonBinary")]
    pub metadata: JsonValue,
    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::table_link::Entity",
        from = "Column::LinkId",
        to = "super::table_link::Column::Id",
        on_delete = "Cascade"
    )]
    TableLink,
}

impl Related<super::table_link::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::TableLink.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
