//! Pulse check-in DTOs.

use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

use super::common::{PageLimits, empty_array, empty_object};
use crate::models::{pulse_check_in, pulse_enabled_table, pulse_scanner_session};

pub const CHECK_IN_PAGE: PageLimits = PageLimits::new(100, 500);
pub const RECENT_CHECK_INS: PageLimits = PageLimits::new(10, 50);

/// Enables Pulse on a table
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct PulseEnable {
    pub table_id: Uuid,
    /// Defaults to the table's workspace
    pub workspace_id: Option<Uuid>,
    pub check_in_column_id: Option<Uuid>,
    #[serde(default = "empty_array")]
    pub display_columns: Value,
    /// Merged over the default settings
    #[serde(default = "empty_object")]
    pub settings: Value,
    pub created_by: Option<Uuid>,
}

#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
pub struct PulseUpdate {
    pub enabled: Option<bool>,
    pub check_in_column_id: Option<Uuid>,
    pub display_columns: Option<Value>,
    /// Keys merged over the stored settings
    pub settings: Option<Value>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct PulseConfigResponse {
    pub id: Uuid,
    pub table_id: Uuid,
    pub workspace_id: Uuid,
    pub enabled: bool,
    pub check_in_column_id: Option<Uuid>,
    pub display_columns: Value,
    pub settings: Value,
    pub total_rsvps: i32,
    pub checked_in_count: i32,
    pub walk_in_count: i32,
    pub last_check_in_at: Option<DateTime<FixedOffset>>,
    pub created_by: Option<Uuid>,
    pub created_at: DateTime<FixedOffset>,
    pub updated_at: DateTime<FixedOffset>,
}

impl From<pulse_enabled_table::Model> for PulseConfigResponse {
    fn from(model: pulse_enabled_table::Model) -> Self {
        Self {
            id: model.id,
            table_id: model.table_id,
            workspace_id: model.workspace_id,
            enabled: model.enabled,
            check_in_column_id: model.check_in_column_id,
            display_columns: model.display_columns,
            settings: model.settings,
            total_rsvps: model.total_rsvps,
            checked_in_count: model.checked_in_count,
            walk_in_count: model.walk_in_count,
            last_check_in_at: model.last_check_in_at,
            created_by: model.created_by,
            created_at: model.created_at,
            updated_at: model.updated_at,
        }
    }
}

/// A scan of one row by a scanner
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct CheckInCreate {
    pub pulse_table_id: Uuid,
    pub row_id: Uuid,
    pub barcode_scanned: Option<String>,
    pub scanner_user_name: Option<String>,
    pub scanner_user_email: Option<String>,
    pub scanner_device_id: Option<String>,
    /// Snapshot of the row; the stored row data is used when omitted
    pub row_data: Option<Value>,
    #[serde(default)]
    pub is_walk_in: bool,
    pub notes: Option<String>,
    pub created_by: Option<Uuid>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct CheckInResponse {
    pub id: Uuid,
    pub pulse_table_id: Uuid,
    pub table_id: Uuid,
    pub row_id: Uuid,
    pub barcode_scanned: Option<String>,
    pub scanner_user_name: Option<String>,
    pub scanner_user_email: Option<String>,
    pub scanner_device_id: Option<String>,
    pub check_in_time: DateTime<FixedOffset>,
    pub check_in_count: i32,
    pub row_data: Value,
    pub is_walk_in: bool,
    pub notes: Option<String>,
    pub created_by: Option<Uuid>,
    pub created_at: DateTime<FixedOffset>,
}

impl From<pulse_check_in::Model> for CheckInResponse {
    fn from(model: pulse_check_in::Model) -> Self {
        Self {
            id: model.id,
            pulse_table_id: model.pulse_table_id,
            table_id: model.table_id,
            row_id: model.row_id,
            barcode_scanned: model.barcode_scanned,
            scanner_user_name: model.scanner_user_name,
            scanner_user_email: model.scanner_user_email,
            scanner_device_id: model.scanner_device_id,
            check_in_time: model.check_in_time,
            check_in_count: model.check_in_count,
            row_data: model.row_data,
            is_walk_in: model.is_walk_in,
            notes: model.notes,
            created_by: model.created_by,
            created_at: model.created_at,
        }
    }
}

#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ListCheckInsQuery {
    /// Page size (default 100, max 500)
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct ScannerSessionCreate {
    pub pulse_table_id: Uuid,
    pub pairing_code: Option<String>,
    #[schema(example = "Front door")]
    pub scanner_name: String,
    pub scanner_email: Option<String>,
    pub device_id: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
pub struct ScannerSessionUpdate {
    /// `false` ends the session
    pub is_active: Option<bool>,
    pub total_scans: Option<i32>,
    pub last_scan_at: Option<DateTime<FixedOffset>>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ScannerSessionResponse {
    pub id: Uuid,
    pub pulse_table_id: Uuid,
    pub pairing_code: Option<String>,
    pub scanner_name: String,
    pub scanner_email: Option<String>,
    pub device_id: Option<String>,
    pub is_active: bool,
    pub last_scan_at: Option<DateTime<FixedOffset>>,
    pub total_scans: i32,
    pub started_at: DateTime<FixedOffset>,
    pub ended_at: Option<DateTime<FixedOffset>>,
}

impl From<pulse_scanner_session::Model> for ScannerSessionResponse {
    fn from(model: pulse_scanner_session::Model) -> Self {
        Self {
            id: model.id,
            pulse_table_id: model.pulse_table_id,
            pairing_code: model.pairing_code,
            scanner_name: model.scanner_name,
            scanner_email: model.scanner_email,
            device_id: model.device_id,
            is_active: model.is_active,
            last_scan_at: model.last_scan_at,
            total_scans: model.total_scans,
            started_at: model.started_at,
            ended_at: model.ended_at,
        }
    }
}

#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ListSessionsQuery {
    #[serde(default)]
    pub active_only: bool,
}

#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct DashboardQuery {
    /// Number of recent check-ins (default 10, max 50)
    pub recent_limit: Option<i64>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct DashboardResponse {
    pub total_rsvps: i32,
    pub checked_in_count: i32,
    pub walk_in_count: i32,
    /// Percentage of RSVPs checked in, one decimal
    #[schema(example = 42.5)]
    pub check_in_rate: f64,
    pub last_check_in_at: Option<DateTime<FixedOffset>>,
    pub active_scanners: u64,
    pub recent_check_ins: Vec<CheckInResponse>,
}

/// `checked / total * 100` rounded to one decimal; zero without RSVPs.
pub fn check_in_rate(checked_in: i32, total_rsvps: i32) -> f64 {
    if total_rsvps <= 0 {
        return 0.0;
    }
    let rate = f64::from(checked_in) / f64::from(total_rsvps) * 100.0;
    (rate * 10.0).round() / 10.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rate_rounds_to_one_decimal() {
        assert_eq!(check_in_rate(1, 3), 33.3);
        assert_eq!(check_in_rate(2, 3), 66.7);
        assert_eq!(check_in_rate(5, 5), 100.0);
    }

    #[test]
    fn rate_is_zero_without_rsvps() {
        assert_eq!(check_in_rate(4, 0), 0.0);
    }
}
