//! Request hub tab entity model. Slugs are unique within a hub.

use sea_orm::ActiveModelBehavior;
use sea_orm::entity::prelude::*;
use sea_orm::prelude::DateTimeWithTimeZone;
use serde_json::Value as JsonValue;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "request_hub_tabs")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub hub_id: Uuid,
    pub name: String,
    pub slug: String,
    pub tab_type: String,
    pub icon: Option<String>,
    pub position: i32,
    pub is_visible: bool,
    #[sea_orm(column_type = "JsonBinary")]
    pub config: JsonValue,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::request_hub::Entity",
        from = "Column::HubId",
        to = "super::request_hub::Column::Id",
        on_delete = "Cascade"
    )]
    RequestHub,
}

impl Related<super::request_hub::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::RequestHub.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
