//! Pulse check-in entity model

use sea_orm::ActiveModelBehavior;
use sea_orm::entity::prelude::*;
use sea_orm::prelude::DateTimeWithTimeZone;
use serde_json::Value as JsonValue;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "pulse_check_ins")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub pulse_table_id: Uuid,
    pub table_id: Uuid,
    pub row_id: Uuid,
    pub barcode_scanned: Option<String>,
    pub scanner_user_name: Option<String>,
    pub scanner_user_email: Option<String>,
    pub scanner_device_id: Option<String>,
    /// Time of the latest scan of this row
    pub check_in_time: DateTimeWithTimeZone,
    /// Number of scans folded into this record when duplicates are suppressed
    pub check_in_count: i32,
    /// Snapshot of the row's data at check-in
    #[sea_orm(column_type = "JsonBinary")]
    pub row_data: JsonValue,
    pub is_walk_in: bool,
    pub notes: Option<String>,
    pub created_by: Option<Uuid>,
    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::pulse_enabled_table::Entity",
        from = "Column::PulseTableId",
        to = "super::pulse_enabled_table::Column::Id",
        on_delete = "Cascade"
    )]
    PulseEnabledTable,
}

impl Related<super::pulse_enabled_table::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::PulseEnabledTable.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
