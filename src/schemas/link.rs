//! Table link and row link DTOs.

use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

use super::common::{PageLimits, empty_object};
use crate::models::{table_link, table_row};

pub const ROW_LINK_PAGE: PageLimits = PageLimits::new(50, 200);
pub const AVAILABLE_RECORDS_PAGE: PageLimits = PageLimits::new(50, 200);

/// Declares a link from a `link` column of this table to another table
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct TableLinkCreate {
    pub source_column_id: Uuid,
    pub target_table_id: Uuid,
    pub target_column_id: Option<Uuid>,
    /// `one_to_many` unless given
    pub link_type: Option<String>,
    #[serde(default = "empty_object")]
    pub settings: Value,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct TableLinkResponse {
    pub id: Uuid,
    pub source_table_id: Uuid,
    pub source_column_id: Uuid,
    pub target_table_id: Uuid,
    pub target_column_id: Option<Uuid>,
    pub link_type: String,
    pub settings: Value,
    pub created_at: DateTime<FixedOffset>,
}

impl From<table_link::Model> for TableLinkResponse {
    fn from(model: table_link::Model) -> Self {
        Self {
            id: model.id,
            source_table_id: model.source_table_id,
            source_column_id: model.source_column_id,
            target_table_id: model.target_table_id,
            target_column_id: model.target_column_id,
            link_type: model.link_type,
            settings: model.settings,
            created_at: model.created_at,
        }
    }
}

/// Links or unlinks one target row through a link column
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct RowLinkRequest {
    pub column_id: Uuid,
    pub target_row_id: Uuid,
}

#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct RowLinkColumnQuery {
    /// The link column the target was linked through
    pub column_id: Uuid,
}

/// Result of a link mutation: the row's linked target ids in link order
#[derive(Debug, Serialize, ToSchema)]
pub struct RowLinkMutationResponse {
    pub success: bool,
    pub links: Vec<String>,
}

#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ListRowLinksQuery {
    /// Restrict to one link column; without it every link column of the table is used
    pub column_id: Option<Uuid>,
    /// Page size (default 50, max 200)
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct LinkedRecord {
    pub id: Uuid,
    pub data: Value,
    pub created_at: DateTime<FixedOffset>,
    pub updated_at: DateTime<FixedOffset>,
}

impl From<table_row::Model> for LinkedRecord {
    fn from(row: table_row::Model) -> Self {
        Self {
            id: row.id,
            data: row.data,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct LinkedRecordsResponse {
    pub records: Vec<LinkedRecord>,
    pub total_count: u64,
    pub has_more: bool,
}

#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct AvailableRecordsQuery {
    /// Case-insensitive match over the string values of each record
    pub search: Option<String>,
    /// When given, each record reports whether this row already links to it
    pub row_id: Option<Uuid>,
    /// Page size (default 50, max 200)
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct AvailableRecord {
    pub id: Uuid,
    /// First non-empty string value of the record, else `Record <id prefix>`
    pub display_name: String,
    pub data: Value,
    pub is_linked: bool,
    pub created_at: DateTime<FixedOffset>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct AvailableRecordsResponse {
    pub records: Vec<AvailableRecord>,
    pub total_count: u64,
    pub has_more: bool,
}
