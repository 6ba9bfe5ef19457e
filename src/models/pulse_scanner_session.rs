//! Pulse scanner session entity model

use sea_orm::ActiveModelBehavior;
use sea_orm::entity::prelude::*;
use sea_orm::prelude::DateTimeWithTimeZone;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "pulse_scanner_sessions")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub pulse_table_id: Uuid,
    pub pairing_code: Option<String>,
    pub scanner_name: String,
    pub scanner_email: Option<String>,
    pub device_id: Option<String>,
    pub is_active: bool,
    pub last_scan_at: Option<DateTimeWithTimeZone>,
    pub total_scans: i32,
    pub started_at: DateTimeWithTimeZone,
    pub ended_at: Option<DateTimeWithTimeZone>,
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
