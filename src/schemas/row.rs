//! Table row, bulk insert and row comment DTOs.

use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

use super::common::{PageLimits, empty_object};
use crate::models::{table_comment, table_row};

pub const ROW_PAGE: PageLimits = PageLimits::new(100, 1000);

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct RowCreate {
    /// Cell values keyed by column name; stored exactly as sent
    #[serde(default = "empty_object")]
    pub data: Value,
    #[serde(default = "empty_object")]
    pub metadata: Value,
    pub position: Option<f64>,
    pub created_by: Option<Uuid>,
}

/// Partial update; `PUT` is accepted as an alias of `PATCH`
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
pub struct RowUpdate {
    /// Replaces the whole data map
    pub data: Option<Value>,
    pub metadata: Option<Value>,
    pub is_archived: Option<bool>,
    pub position: Option<f64>,
    pub updated_by: Option<Uuid>,
}

/// Inserts many rows in one transaction; positions follow list order
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct RowBulkCreate {
    pub rows: Vec<Value>,
    pub created_by: Option<Uuid>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct RowResponse {
    pub id: Uuid,
    pub table_id: Uuid,
    pub data: Value,
    pub metadata: Value,
    pub is_archived: bool,
    pub position: Option<f64>,
    pub created_by: Option<Uuid>,
    pub updated_by: Option<Uuid>,
    pub created_at: DateTime<FixedOffset>,
    pub updated_at: DateTime<FixedOffset>,
}

impl From<table_row::Model> for RowResponse {
    fn from(model: table_row::Model) -> Self {
        Self {
            id: model.id,
            table_id: model.table_id,
            data: model.data,
            metadata: model.metadata,
            is_archived: model.is_archived,
            position: model.position,
            created_by: model.created_by,
            updated_by: model.updated_by,
            created_at: model.created_at,
            updated_at: model.updated_at,
        }
    }
}

#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ListRowsQuery {
    #[serde(default)]
    pub include_archived: bool,
    /// Page size (default 100, max 1000)
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct CommentCreate {
    pub content: String,
    /// Parent comment on the same row, for replies
    pub parent_comment_id: Option<Uuid>,
    pub created_by: Option<Uuid>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct CommentResponse {
    pub id: Uuid,
    pub table_id: Uuid,
    pub row_id: Uuid,
    pub content: String,
    pub parent_comment_id: Option<Uuid>,
    pub created_by: Option<Uuid>,
    pub created_at: DateTime<FixedOffset>,
    pub updated_at: DateTime<FixedOffset>,
}

impl From<table_comment::Model> for CommentResponse {
    fn from(model: table_comment::Model) -> Self {
        Self {
            id: model.id,
            table_id: model.table_id,
            row_id: model.row_id,
            content: model.content,
            parent_comment_id: model.parent_comment_id,
            created_by: model.created_by,
            created_at: model.created_at,
            updated_at: model.updated_at,
        }
    }
}
