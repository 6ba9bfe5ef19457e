//! Scan history DTOs.

use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

use super::common::{PageLimits, empty_array, empty_object};
use super::row::RowResponse;
use crate::models::scan_history;

pub const SCAN_HISTORY_PAGE: PageLimits = PageLimits::new(100, 500);

/// Appends a scan attempt to the audit log
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct ScanRecordCreate {
    pub workspace_id: Option<Uuid>,
    pub table_id: Option<Uuid>,
    pub column_name: Option<String>,
    #[schema(example = "TKT-00042")]
    pub barcode: String,
    #[serde(default)]
    pub found: bool,
    #[serde(default = "empty_array")]
    pub matched_row_ids: Value,
    pub scanned_by: Option<Uuid>,
    pub device_id: Option<String>,
    #[serde(default = "empty_object")]
    pub metadata: Value,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ScanRecordResponse {
    pub id: Uuid,
    pub workspace_id: Option<Uuid>,
    pub table_id: Option<Uuid>,
    pub column_name: Option<String>,
    pub barcode: String,
    pub found: bool,
    pub matched_row_ids: Value,
    pub scanned_by: Option<Uuid>,
    pub device_id: Option<String>,
    pub metadata: Value,
    pub scanned_at: DateTime<FixedOffset>,
}

impl From<scan_history::Model> for ScanRecordResponse {
    fn from(model: scan_history::Model) -> Self {
        Self {
            id: model.id,
            workspace_id: model.workspace_id,
            table_id: model.table_id,
            column_name: model.column_name,
            barcode: model.barcode,
            found: model.found,
            matched_row_ids: model.matched_row_ids,
            scanned_by: model.scanned_by,
            device_id: model.device_id,
            metadata: model.metadata,
            scanned_at: model.scanned_at,
        }
    }
}

#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ListScanHistoryQuery {
    pub workspace_id: Option<Uuid>,
    pub table_id: Option<Uuid>,
    pub barcode: Option<String>,
    /// Page size (default 100, max 500)
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

/// Looks a barcode up in a table and logs the attempt
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct TableScanRequest {
    pub barcode: String,
    /// Row data key to match; defaults to the Pulse check-in column, then the primary column
    pub column_name: Option<String>,
    pub scanned_by: Option<Uuid>,
    pub device_id: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct TableScanResponse {
    pub scan: ScanRecordResponse,
    pub rows: Vec<RowResponse>,
}
