//! Pulse configuration entity model
//!
//! Enables barcode check-in tracking on one data table. The cached counters are written
//! only by the application: fresh check-ins bump them and a stats refresh recomputes them.

use sea_orm::ActiveModelBehavior;
use sea_orm::entity::prelude::*;
use sea_orm::prelude::DateTimeWithTimeZone;
use serde_json::{Value as JsonValue, json};

/// Settings applied when a table is enabled, before caller overrides are merged in.
pub fn default_settings() -> JsonValue {
    json!({
        "show_popup": true,
        "play_sound": false,
        "highlight_checked_in": true,
        "allow_duplicate_scans": false,
        "scan_mode": "rapid",
        "offline_mode": true,
        "guest_scanning_enabled": true
    })
}

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "pulse_enabled_tables")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,

    /// The tracked data table; at most one configuration per table
    #[sea_orm(unique)]
    pub table_id: Uuid,

    pub workspace_id: Uuid,

    pub enabled: bool,

    /// Column whose value is matched against scanned barcodes
    pub check_in_column_id: Option<Uuid>,

    /// Column ids shown on the scanner popup (JSON array)
    #[sea_orm(column_type = "JsonBinary")]
    pub display_columns: JsonValue,

    #[sea_orm(column_type = "JsonBinary")]
    pub settings: JsonValue,

    pub total_rsvps: i32,

    pub checked_in_count: i32,

    pub walk_in_count: i32,

    pub last_check_in_at: Option<DateTimeWithTimeZone>,

    pub created_by: Option<Uuid>,

    pub created_at: DateTimeWithTimeZone,

    pub updated_at: DateTimeWithTimeZone,
}

impl Model {
    /// Whether repeated scans of one row create separate check-ins.
    pub fn allows_duplicate_scans(&self) -> bool {
        self.settings
            .get("allow_duplicate_scans")
            .and_then(JsonValue::as_bool)
            .unwrap_or(false)
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
    #[sea_orm(has_many = "super::pulse_check_in::Entity")]
    PulseCheckIn,
    #[sea_orm(has_many = "super::pulse_scanner_session::Entity")]
    PulseScannerSession,
}

impl Related<super::data_table::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::DataTable.def()
    }
}

impl Related<super::pulse_check_in::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::PulseCheckIn.def()
    }
}

impl Related<super::pulse_scanner_session::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::PulseScannerSession.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
