//! Table column entity model
//!
//! Row values are bound to a column by key name: a row's `data[column.name]`.
//! Columns of type [`LINK_COLUMN_TYPE`] point at another table through `linked_table_id`.

use sea_orm::ActiveModelBehavior;
use sea_orm::entity::prelude::*;
use sea_orm::prelude::DateTimeWithTimeZone;
use serde_json::Value as JsonValue;

/// Column type whose values are links to rows of `linked_table_id`
pub const LINK_COLUMN_TYPE: &str = "link";

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "table_columns")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,

    pub table_id: Uuid,

    /// Key of this column inside each row's `data` map
    pub name: String,

    pub label: String,

    pub description: Option<String>,

    pub column_type: String,

    #[sea_orm(column_type = "JsonBinary")]
    pub settings: JsonValue,

    #[sea_orm(column_type = "JsonBinary")]
    pub validation: JsonValue,

    pub formula: Option<String>,

    /// Names of the columns a formula reads (JSON array of strings)
    #[sea_orm(column_type = "JsonBinary")]
    pub formula_dependencies: JsonValue,

    pub linked_table_id: Option<Uuid>,

    pub linked_column_id: Option<Uuid>,

    pub rollup_function: Option<String>,

    pub position: i32,

    pub width: i32,

    pub is_visible: bool,

    pub is_primary: bool,

    pub created_at: DateTimeWithTimeZone,

    pub updated_at: DateTimeWithTimeZone,
}

impl Model {
    pub fn is_link(&self) -> bool {
        self.column_type == LINK_COLUMN_TYPE
    }
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
    #[sea_orm(
        belongs_to = "super::data_table::Entity",
        from = "Column::LinkedTableId",
        to = "super::data_table::Column::Id",
        on_delete = "SetNull"
    )]
    LinkedTable,
}

impl Related<super::data_table::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::DataTable.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
