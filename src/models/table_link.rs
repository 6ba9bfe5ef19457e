//! Table link entity model
//!
//! Declares that a link column of `source_table_id` points at rows of `target_table_id`.
//! There is at most one link per source column.

use sea_orm::ActiveModelBehavior;
use sea_orm::entity::prelude::*;
use sea_orm::prelude::DateTimeWithTimeZone;
use serde_json::Value as JsonValue;

/// Allowed values of [`Model::link_type`]
pub const LINK_TYPES: &[&str] = &["one_to_one", "one_to_many", "many_to_many"];

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "table_links")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub source_table_id: Uuid,
    #[sea_orm(unique)]
    pub source_column_id: Uuid,
    pub target_table_id: Uuid,
    pub target_column_id: Option<Uuid>,
    pub link_type: String,
    #[sea_orm(column_type = "JsonBinary")]
    pub settings: JsonValue,
    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::table_row_link::Entity")]
    TableRowLink,
}

impl Related<super::table_row_link::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::TableRowLink.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
