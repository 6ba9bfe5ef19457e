//! Table row entity model

use sea_orm::ActiveModelBehavior;
use sea_orm::entity::prelude::*;
use sea_orm::prelude::DateTimeWithTimeZone;
use serde_json::Value as JsonValue;

/// A row of a data table. `data` is an open map keyed by column name.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "table_rows")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,

    pub table_id: Uuid,

    #[sea_orm(column_type = "JsonBinary")]
    pub data: JsonValue,

    #[sea_orm(column_type = "JsonBinary")]
    pub metadata: JsonValue,

    pub is_archived: bool,

    /// Fractional ordering key so rows can be inserted between neighbours
    pub position: Option<f64>,

    pub created_by: Option<Uuid>,

    pub updated_by: Option<Uuid>,

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
    #[sea_orm(has_many = "super::table_comment::Entity")]
    TableComment,
}

impl Related<super::data_table::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::DataTable.def()
    }
}

impl Related<super::table_comment::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::TableComment.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
