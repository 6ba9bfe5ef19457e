//! Form entity model

use sea_orm::ActiveModelBehavior;
use sea_orm::entity::prelude::*;
use sea_orm::prelude::DateTimeWithTimeZone;
use serde_json::Value as JsonValue;

/// Allowed values of [`Model::status`]
pub const FORM_STATUSES: &[&str] = &["draft", "published", "archived", "paused"];

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "forms")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub workspace_id: Uuid,
    pub name: String,
    pub slug: String,
    pub description: Option<String>,
    #[sea_orm(column_type = "JsonBinary")]
    pub settings: JsonValue,
    #[sea_orm(column_type = "JsonBinary")]
    pub submit_settings: JsonValue,
    pub status: String,
    /// Bumped every time the form is (re)published
    pub version: i32,
    pub is_public: bool,
    pub created_by: Option<Uuid>,
    pub published_at: Option<DateTimeWithTimeZone>,
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
    #[sea_orm(has_many = "super::form_field::Entity")]
    FormField,
    #[sea_orm(has_many = "super::form_submission::Entity")]
    FormSubmission,
}

impl Related<super::workspace::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Workspace.def()
    }
}

impl Related<super::form_field::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::FormField.def()
    }
}

impl Related<super::form_submission::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::FormSubmission.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
