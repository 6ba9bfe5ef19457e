//! Form field entity model

use sea_orm::ActiveModelBehavior;
use sea_orm::entity::prelude::*;
use sea_orm::prelude::DateTimeWithTimeZone;
use serde_json::Value as JsonValue;

/// Allowed values of [`Model::width`]
pub const FIELD_WIDTHS: &[&str] = &["full", "half", "third", "quarter"];

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "form_fields")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub form_id: Uuid,
    /// Key under which the submitted value is stored in `form_submissions.data`
    pub name: String,
    pub label: String,
    pub placeholder: Option<String>,
    pub description: Option<String>,
    pub field_type: String,
    #[sea_orm(column_type = "JsonBinary")]
    pub settings: JsonValue,
    #[sea_orm(column_type = "JsonBinary")]
    pub validation: JsonValue,
    /// Choice options for select-like fields (JSON array)
    #[sea_orm(column_type = "JsonBinary")]
    pub options: JsonValue,
    pub position: i32,
    pub width: String,
    pub is_visible: bool,
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
}

impl Related<super::form::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Form.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
