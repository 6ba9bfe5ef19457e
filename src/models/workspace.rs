//! Workspace entity model
//!
//! A workspace is the tenant-scoped container for forms, data tables and request hubs.
//! Deleting a workspace cascades to everything it owns.

use sea_orm::ActiveModelBehavior;
use sea_orm::entity::prelude::*;
use sea_orm::prelude::DateTimeWithTimeZone;
use serde_json::Value as JsonValue;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "workspaces")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,

    /// Owning organization
    pub organization_id: Uuid,

    pub name: String,

    pub slug: String,

    pub description: Option<String>,

    /// Hex color used by clients, e.g. `#3B82F6`
    pub color: String,

    pub icon: String,

    #[sea_orm(column_type = "JsonBinary")]
    pub settings: JsonValue,

    /// Soft-delete flag honoured by list endpoints
    pub is_archived: bool,

    pub created_by: Option<Uuid>,

    pub created_at: DateTimeWithTimeZone,

    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::organization::Entity",
        from = "Column::OrganizationId",
        to = "super::organization::Column::Id",
        on_delete = "Cascade"
    )]
    Organization,
    #[sea_orm(has_many = "super::form::Entity")]
    Form,
    #[sea_orm(has_many = "super::data_table::Entity")]
    DataTable,
    #[sea_orm(has_many = "super::request_hub::Entity")]
    RequestHub,
}

impl Related<super::organization::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Organization.def()
    }
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

impl Related<super::request_hub::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::RequestHub.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
