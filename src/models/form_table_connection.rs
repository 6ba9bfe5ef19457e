//! Form-to-table connection entity model
//!
//! A `write` connection copies every new submission into the connected data table,
//! translating form field names to column names through `field_mappings`.

use sea_orm::ActiveModelBehavior;
use sea_orm::entity::prelude::*;
use sea_orm::prelude::DateTimeWithTimeZone;
use serde_json::Value as JsonValue;

/// Allowed values of [`Model::connection_type`]
pub const CONNECTION_TYPES: &[&str] = &["write", "read", "update"];

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "form_table_connections")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub form_id: Uuid,
    pub table_id: Uuid,
    pub connection_type: String,
    /// JSON object of form field name to column name
    #[sea_orm(column_type = "JsonBinary")]
    pub field_mappings: JsonValue,
    #[sea_orm(column_type = "JsonBinary")]
    pub filters: JsonValue,
    #[sea_orm(column_type = "JsonBinary")]
    pub settings: JsonValue,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::form::Entity",
        from = "Column::FormId",
        to = "super::form::Column::Id",
        on_delete = "Cascade"
    )]
    Form,
    #[sea_orm(
        belongs_to = "super::data_table::Entity",
        from = "Column::TableId",
        to = "super::data_table::Column::Id",
        on_delete = "Cascade"
    )]
    DataTable,
}

impl Related<super::form::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Form.def()
    }
}

impl Related<super::data_table::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::DataTable.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
