//! Data table, column and view DTOs.

use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

use super::common::{PageLimits, default_true, empty_array, empty_object};
use crate::models::{data_table, table_column, table_view};

pub const DATA_TABLE_PAGE: PageLimits = PageLimits::new(100, 500);

/// Request payload for creating a table together with its columns
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct DataTableCreate {
    pub workspace_id: Uuid,
    #[schema(example = "Guest List")]
    pub name: String,
    pub slug: Option<String>,
    pub description: Option<String>,
    pub icon: Option<String>,
    pub color: Option<String>,
    #[serde(default = "empty_object")]
    pub settings: Value,
    pub import_source: Option<String>,
    #[serde(default = "empty_object")]
    pub import_metadata: Value,
    pub created_by: Option<Uuid>,
    /// Each column's position is its index in this list
    #[serde(default)]
    pub columns: Vec<ColumnCreate>,
}

/// Partial update; `PUT` is accepted as an alias of `PATCH`
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
pub struct DataTableUpdate {
    /// Renaming regenerates the slug unless one is given
    pub name: Option<String>,
    pub slug: Option<String>,
    pub description: Option<String>,
    pub icon: Option<String>,
    pub color: Option<String>,
    pub settings: Option<Value>,
    pub is_archived: Option<bool>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct DataTableResponse {
    pub id: Uuid,
    pub workspace_id: Uuid,
    pub name: String,
    pub slug: String,
    pub description: Option<String>,
    pub icon: String,
    pub color: String,
    pub settings: Value,
    pub import_source: Option<String>,
    pub import_metadata: Value,
    pub is_archived: bool,
    pub row_count: i32,
    pub created_by: Option<Uuid>,
    pub created_at: DateTime<FixedOffset>,
    pub updated_at: DateTime<FixedOffset>,
    /// Ordered by position
    pub columns: Vec<ColumnResponse>,
}

impl DataTableResponse {
    pub fn new(table: data_table::Model, columns: Vec<table_column::Model>) -> Self {
        Self {
            id: table.id,
            workspace_id: table.workspace_id,
            name: table.name,
            slug: table.slug,
            description: table.description,
            icon: table.icon,
            color: table.color,
            settings: table.settings,
            import_source: table.import_source,
            import_metadata: table.import_metadata,
            is_archived: table.is_archived,
            row_count: table.row_count,
            created_by: table.created_by,
            created_at: table.created_at,
            updated_at: table.updated_at,
            columns: columns.into_iter().map(Into::into).collect(),
        }
    }
}

#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ListDataTablesQuery {
    pub workspace_id: Option<Uuid>,
    #[serde(default)]
    pub include_archived: bool,
    /// Page size (default 100, max 500)
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct ColumnCreate {
    /// Key of the column's value in each row's data
    #[schema(example = "email")]
    pub name: String,
    pub label: String,
    pub description: Option<String>,
    #[schema(example = "text")]
    pub column_type: String,
    #[serde(default = "empty_object")]
    pub settings: Value,
    #[serde(default = "empty_object")]
    pub validation: Value,
    pub formula: Option<String>,
    #[serde(default)]
    pub formula_dependencies: Vec<String>,
    /// Target table of a `link` column
    pub linked_table_id: Option<Uuid>,
    pub linked_column_id: Option<Uuid>,
    pub rollup_function: Option<String>,
    /// Ignored on table create; otherwise defaults to the end of the list
    pub position: Option<i32>,
    pub width: Option<i32>,
    #[serde(default = "default_true")]
    pub is_visible: bool,
    #[serde(default)]
    pub is_primary: bool,
}

#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
pub struct ColumnUpdate {
    pub name: Option<String>,
    pub label: Option<String>,
    pub description: Option<String>,
    pub column_type: Option<String>,
    pub settings: Option<Value>,
    pub validation: Option<Value>,
    pub formula: Option<String>,
    pub formula_dependencies: Option<Vec<String>>,
    pub linked_table_id: Option<Uuid>,
    pub linked_column_id: Option<Uuid>,
    pub rollup_function: Option<String>,
    pub position: Option<i32>,
    pub width: Option<i32>,
    pub is_visible: Option<bool>,
    pub is_primary: Option<bool>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ColumnResponse {
    pub id: Uuid,
    pub table_id: Uuid,
    pub name: String,
    pub label: String,
    pub description: Option<String>,
    pub column_type: String,
    pub settings: Value,
    pub validation: Value,
    pub formula: Option<String>,
    pub formula_dependencies: Value,
    pub linked_table_id: Option<Uuid>,
    pub linked_column_id: Option<Uuid>,
    pub rollup_function: Option<String>,
    pub position: i32,
    pub width: i32,
    pub is_visible: bool,
    pub is_primary: bool,
    pub created_at: DateTime<FixedOffset>,
    pub updated_at: DateTime<FixedOffset>,
}

impl From<table_column::Model> for ColumnResponse {
    fn from(model: table_column::Model) -> Self {
        Self {
            id: model.id,
            table_id: model.table_id,
            name: model.name,
            label: model.label,
            description: model.description,
            column_type: model.column_type,
            settings: model.settings,
            validation: model.validation,
            formula: model.formula,
            formula_dependencies: model.formula_dependencies,
            linked_table_id: model.linked_table_id,
            linked_column_id: model.linked_column_id,
            rollup_function: model.rollup_function,
            position: model.position,
            width: model.width,
            is_visible: model.is_visible,
            is_primary: model.is_primary,
            created_at: model.created_at,
            updated_at: model.updated_at,
        }
    }
}

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct ViewCreate {
    #[schema(example = "By status")]
    pub name: String,
    pub description: Option<String>,
    /// `grid` unless given
    pub view_type: Option<String>,
    #[serde(default = "empty_object")]
    pub settings: Value,
    #[serde(default = "empty_array")]
    pub filters: Value,
    #[serde(default = "empty_array")]
    pub sorts: Value,
    #[serde(default = "empty_object")]
    pub grouping: Value,
    #[serde(default)]
    pub is_shared: bool,
    #[serde(default)]
    pub is_locked: bool,
    pub created_by: Option<Uuid>,
}

#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
pub struct ViewUpdate {
    pub name: Option<String>,
    pub description: Option<String>,
    pub view_type: Option<String>,
    pub settings: Option<Value>,
    pub filters: Option<Value>,
    pub sorts: Option<Value>,
    pub grouping: Option<Value>,
    pub is_shared: Option<bool>,
    pub is_locked: Option<bool>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ViewResponse {
    pub id: Uuid,
    pub table_id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub view_type: String,
    pub settings: Value,
    pub filters: Value,
    pub sorts: Value,
    pub grouping: Value,
    pub is_shared: bool,
    pub is_locked: bool,
    pub created_by: Option<Uuid>,
    pub created_at: DateTime<FixedOffset>,
    pub updated_at: DateTime<FixedOffset>,
}

impl From<table_view::Model> for ViewResponse {
    fn from(model: table_view::Model) -> Self {
        Self {
            id: model.id,
            table_id: model.table_id,
            name: model.name,
            description: model.description,
            view_type: model.view_type,
            settings: model.settings,
            filters: model.filters,
            sorts: model.sorts,
            grouping: model.grouping,
            is_shared: model.is_shared,
            is_locked: model.is_locked,
            created_by: model.created_by,
            created_at: model.created_at,
            updated_at: model.updated_at,
        }
    }
}
