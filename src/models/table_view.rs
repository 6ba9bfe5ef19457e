//! Table view entity model

use sea_orm::ActiveModelBehavior;
use sea_orm::entity::prelude::*;
use sea_orm::prelude::DateTimeWithTimeZone;
use serde_json::Value as JsonValue;

/// Allowed values of [`Model::view_type`]
pub const VIEW_TYPES: &[&str] = &["grid", "kanban", "calendar", "gallery", "timeline", "form"];

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "table_views")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub table_id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub view_type: String,
    #[sea_orm(column_type = "JsonBinary")]
    pub settings: JsonValue,
    #[sea_orm(column_type = "JsonBinary")]
    pub filters: JsonValue,
    #[sea_orm(column_type = "JsonBinary")]
    pub sorts: JsonValue,
    #[sea_orm(column_type = "JsonBinary")]
    pub grouping: JsonValue,
    pub is_shared: bool,
    pub is_locked: bool,
    pub created_by: Option<Uuid>,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::data_table::Entity",
        from = "Column::TableId",
        to = "super::data_table::Column::Id",
        on_delete = "Cascade"
    )]
    DataTable,
}

impl Related<super::data_table::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::DataTable.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
