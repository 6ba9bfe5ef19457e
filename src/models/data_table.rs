//! Data table entity model
//!
//! A data table is a spreadsheet-like container: its columns describe the shape of the
//! open JSON `data` map carried by each of its rows.

use sea_orm::ActiveModelBehavior;
use sea_orm::entity::prelude::*;
use sea_orm::prelude::DateTimeWithTimeZone;
use serde_json::Value as JsonValue;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "data_tables")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,

    /// Owning workspace
    pub workspace_id: Uuid,

    pub name: String,

    pub slug: String,

    pub description: Option<String>,

    pub icon: String,

    pub color: String,

    #[sea_orm(column_type = "JsonBinary")]
    pub settings: JsonValue,

    /// Where the table was imported from (`csv`, `excel`, ...), if anywhere
    pub import_source: Option<String>,

    #[sea_orm(column_type = "JsonBinary")]
    pub import_metadata: JsonValue,

    pub is_archived: bool,

    /// Number of rows, kept current by row inserts and deletes
    pub row_count: i32,

    pub created_by: Option<Uuid>,

    pub created_at: DateTimeWithTimeZone,

    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::workspace::Entity",
        from = "Column::WorkspaceId",
        to = "super::workspace::Column::Id",
        on_delete = "Cascade"
    )]
    Workspace,
    #[sea_orm(has_many = "super::table_column::Entity")]
    TableColumn,
    #[sea_orm(has_many = "super::table_row::Entity")]
    TableRow,
    #[sea_orm(has_many = "super::table_view::Entity")]
    TableView,
}

impl Related<super::workspace::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Workspace.def()
    }
}

impl Related<super::table_column::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::TableColumn.def()
    }
}

impl Related<super::table_row::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::TableRow.def()
    }
}

impl Related<super::table_view::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::TableView.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
