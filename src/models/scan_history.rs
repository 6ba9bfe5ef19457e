//! Scan history entity model
//!
//! Append-only audit log of barcode scan attempts. Records are never updated.

use sea_orm::ActiveModelBehavior;
use sea_orm::entity::prelude::*;
use sea_orm::prelude::DateTimeWithTimeZone;
use serde_json::Value as JsonValue;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "scan_history")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub workspace_id: Option<Uuid>,
    pub table_id: Option<Uuid>,
    /// Row data key the barcode was matched against
    pub column_name: Option<String>,
    #[sea_orm(column_type = "Text")]
    pub barcode: String,
    pub found: bool,
    /// Ids of the rows that matched (JSON array of strings)
    #[sea_orm(column_type = "JsonBinary")]
    pub matched_row_ids: JsonValue,
    pub scanned_by: Option<Uuid>,
    pub device_id: Option<String>,
    #[sea_orm(column_type = "JsonBinary")]
    pub metadata: JsonValue,
    pub scanned_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
