//! # Pulse Repository
//!
//! Check-in tracking on top of a data table. The configuration row caches four counters
//! (`total_rsvps`, `checked_in_count`, `walk_in_count`, `last_check_in_at`) which this
//! repository is the only writer of; `refresh_stats` recomputes them from source data.
//!
//! A check-in locks the configuration row for the rest of its transaction so concurrent
//! scans of one row serialize. With duplicate scans disallowed, a repeat scan folds into
//! the existing check-in by incrementing `check_in_count` in the database.

use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait,
    IntoActiveModel, ModelTrait, PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, Set,
    TransactionTrait,
};
use serde_json::Value;
use uuid::Uuid;

use super::data_table::find_table;
use super::{for_update, now};
use crate::error::RepositoryError;
use crate::models::pulse_check_in::{self, Entity as PulseCheckIn};
use crate::models::pulse_enabled_table::{self, Entity as PulseEnabledTable, default_settings};
use crate::models::pulse_scanner_session::{self, Entity as PulseScannerSession};
use crate::models::table_column::{self, Entity as TableColumn};
use crate::models::table_row::{self, Entity as TableRow};
use crate::schemas::Page;
use crate::schemas::common::{require_object, require_text};
use crate::schemas::pulse::{
    CheckInCreate, PulseEnable, PulseUpdate, ScannerSessionCreate, ScannerSessionUpdate,
};

/// Result of recording a scan
#[derive(Debug, Clone)]
pub struct CheckInOutcome {
    pub check_in: pulse_check_in::Model,
    /// False when the scan folded into an existing check-in
    pub created: bool,
}

/// Everything the dashboard shows, read in one pass
#[derive(Debug, Clone)]
pub struct DashboardSnapshot {
    pub config: pulse_enabled_table::Model,
    pub active_scanners: u64,
    pub recent_check_ins: Vec<pulse_check_in::Model>,
}

/// Repository for Pulse configuration, check-ins and scanner sessions
pub struct PulseRepository<'a> {
    db: &'a DatabaseConnection,
}

impl<'a> PulseRepository<'a> {
    pub fn new(db: &'a DatabaseConnection) -> Self {
        Self { db }
    }

    /// Enables Pulse on a table; a table can only be enabled once
    pub async fn enable(&self, request: PulseEnable) -> Result<pulse_enabled_table::Model, RepositoryError> {
        let table = find_table(self.db, request.table_id).await?;

        let existing = PulseEnabledTable::find()
            .filter(pulse_enabled_table::Column::TableId.eq(table.id))
            .one(self.db)
            .await?;
        if existing.is_some() {
            return Err(RepositoryError::conflict("Pulse already enabled for this table"));
        }

        if request
            .workspace_id
            .is_some_and(|workspace_id| workspace_id != table.workspace_id)
        {
            return Err(RepositoryError::validation_error(
                "workspace_id does not match the table's workspace",
            ));
        }
        if let Some(column_id) = request.check_in_column_id {
            ensure_table_column(self.db, table.id, column_id).await?;
        }
        if !request.display_columns.is_array() {
            return Err(RepositoryError::validation_error(
                "display_columns must be a JSON array",
            ));
        }
        let settings = merge_settings(&default_settings(), &request.settings)?;
        let total_rsvps = count_rsvps(self.db, table.id).await?;

        let timestamp = now();
        let config = pulse_enabled_table::ActiveModel {
            id: Set(Uuid::new_v4()),
            table_id: Set(table.id),
            workspace_id: Set(table.workspace_id),
            enabled: Set(true),
            check_in_column_id: Set(request.check_in_column_id),
            display_columns: Set(request.display_columns),
            settings: Set(settings),
            total_rsvps: Set(total_rsvps),
            checked_in_count: Set(0),
            walk_in_count: Set(0),
            last_check_in_at: Set(None),
            created_by: Set(request.created_by),
            created_at: Set(timestamp),
            updated_at: Set(timestamp),
        }
        .insert(self.db)
        .await?;

        tracing::info!(table_id = %config.table_id, total_rsvps, "Pulse enabled");
        Ok(config)
    }

    pub async fn get_by_table(&self, table_id: Uuid) -> Result<pulse_enabled_table::Model, RepositoryError> {
        find_config(self.db, table_id).await
    }

    /// Partial update; settings keys are merged over the stored settings
    pub async fn update(
        &self,
        table_id: Uuid,
        update: PulseUpdate,
    ) -> Result<pulse_enabled_table::Model, RepositoryError> {
        let existing = self.get_by_table(table_id).await?;
        if let Some(column_id) = update.check_in_column_id {
            ensure_table_column(self.db, table_id, column_id).await?;
        }
        let settings = match &update.settings {
            Some(overrides) => Some(merge_settings(&existing.settings, overrides)?),
            None => None,
        };

        let mut active = existing.into_active_model();
        if let Some(enabled) = update.enabled {
            active.enabled = Set(enabled);
        }
        if let Some(column_id) = update.check_in_column_id {
            active.check_in_column_id = Set(Some(column_id));
        }
        if let Some(display_columns) = update.display_columns {
            if !display_columns.is_array() {
                return Err(RepositoryError::validation_error(
                    "display_columns must be a JSON array",
                ));
            }
            active.display_columns = Set(display_columns);
        }
        if let Some(settings) = settings {
            active.settings = Set(settings);
        }
        active.updated_at = Set(now());

        Ok(active.update(self.db).await?)
    }

    /// Disables Pulse, dropping its check-ins and sessions
    pub async fn disable(&self, table_id: Uuid) -> Result<(), RepositoryError> {
        let config = self.get_by_table(table_id).await?;
        config.delete(self.db).await?;
        Ok(())
    }

    /// Recomputes the cached counters from rows and check-ins
    pub async fn refresh_stats(&self, table_id: Uuid) -> Result<pulse_enabled_table::Model, RepositoryError> {
        let config = self.get_by_table(table_id).await?;

        let total_rsvps = count_rsvps(self.db, table_id).await?;
        let check_ins = PulseCheckIn::find()
            .filter(pulse_check_in::Column::PulseTableId.eq(config.id));
        let checked_in = check_ins.clone().count(self.db).await?;
        let walk_ins = check_ins
            .clone()
            .filter(pulse_check_in::Column::IsWalkIn.eq(true))
            .count(self.db)
            .await?;
        let last_check_in_at = check_ins
            .order_by_desc(pulse_check_in::Column::CheckInTime)
            .one(self.db)
            .await?
            .map(|latest| latest.check_in_time);

        let mut active = config.into_active_model();
        active.total_rsvps = Set(total_rsvps);
        active.checked_in_count = Set(clamp_count(checked_in));
        active.walk_in_count = Set(clamp_count(walk_ins));
        active.last_check_in_at = Set(last_check_in_at);
        active.updated_at = Set(now());

        Ok(active.update(self.db).await?)
    }

    /// Records a scan of a row
    pub async fn create_check_in(&self, request: CheckInCreate) -> Result<CheckInOutcome, RepositoryError> {
        let txn = self.db.begin().await?;

        let config = for_update(PulseEnabledTable::find_by_id(request.pulse_table_id), &txn)
            .one(&txn)
            .await?
            .filter(|config| config.enabled)
            .ok_or_else(|| RepositoryError::validation_error("Pulse not enabled for this table"))?;

        let row = TableRow::find_by_id(request.row_id)
            .filter(table_row::Column::TableId.eq(config.table_id))
            .one(&txn)
            .await?
            .ok_or_else(|| {
                RepositoryError::validation_error("Row does not belong to this Pulse table")
            })?;

        let timestamp = now();
        let existing = if config.allows_duplicate_scans() {
            None
        } else {
            PulseCheckIn::find()
                .filter(pulse_check_in::Column::PulseTableId.eq(config.id))
                .filter(pulse_check_in::Column::RowId.eq(row.id))
                .one(&txn)
                .await?
        };

        let outcome = match existing {
            Some(previous) => {
                PulseCheckIn::update_many()
                    .col_expr(
                        pulse_check_in::Column::CheckInCount,
                        Expr::col(pulse_check_in::Column::CheckInCount).add(1),
                    )
                    .col_expr(pulse_check_in::Column::CheckInTime, Expr::value(timestamp))
                    .filter(pulse_check_in::Column::Id.eq(previous.id))
                    .exec(&txn)
                    .await?;
                PulseEnabledTable::update_many()
                    .col_expr(
                        pulse_enabled_table::Column::LastCheckInAt,
                        Expr::value(Some(timestamp)),
                    )
                    .col_expr(pulse_enabled_table::Column::UpdatedAt, Expr::value(timestamp))
                    .filter(pulse_enabled_table::Column::Id.eq(config.id))
                    .exec(&txn)
                    .await?;

                let check_in = PulseCheckIn::find_by_id(previous.id)
                    .one(&txn)
                    .await?
                    .ok_or_else(|| RepositoryError::not_found("Check-in"))?;
                CheckInOutcome {
                    check_in,
                    created: false,
                }
            }
            None => {
                let check_in = pulse_check_in::ActiveModel {
                    id: Set(Uuid::new_v4()),
                    pulse_table_id: Set(config.id),
                    table_id: Set(config.table_id),
                    row_id: Set(row.id),
                    barcode_scanned: Set(request.barcode_scanned),
                    scanner_user_name: Set(request.scanner_user_name),
                    scanner_user_email: Set(request.scanner_user_email),
                    scanner_device_id: Set(request.scanner_device_id),
                    check_in_time: Set(timestamp),
                    check_in_count: Set(1),
                    row_data: Set(request.row_data.unwrap_or(row.data)),
                    is_walk_in: Set(request.is_walk_in),
                    notes: Set(request.notes),
                    created_by: Set(request.created_by),
                    created_at: Set(timestamp),
                }
                .insert(&txn)
                .await?;

                let walk_in_delta = i32::from(check_in.is_walk_in);
                PulseEnabledTable::update_many()
                    .col_expr(
                        pulse_enabled_table::Column::CheckedInCount,
                        Expr::col(pulse_enabled_table::Column::CheckedInCount).add(1),
                    )
                    .col_expr(
                        pulse_enabled_table::Column::WalkInCount,
                        Expr::col(pulse_enabled_table::Column::WalkInCount).add(walk_in_delta),
                    )
                    .col_expr(
                        pulse_enabled_table::Column::LastCheckInAt,
                        Expr::value(Some(timestamp)),
                    )
                    .col_expr(pulse_enabled_table::Column::UpdatedAt, Expr::value(timestamp))
                    .filter(pulse_enabled_table::Column::Id.eq(config.id))
                    .exec(&txn)
                    .await?;

                CheckInOutcome {
                    check_in,
                    created: true,
                }
            }
        };
        txn.commit().await?;

        let kind = if outcome.created { "new" } else { "repeat" };
        metrics::counter!("pulse_check_ins_total", "kind" => kind).increment(1);
        tracing::debug!(
            pulse_table_id = %config.id,
            row_id = %outcome.check_in.row_id,
            check_in_count = outcome.check_in.check_in_count,
            "Check-in recorded"
        );

        Ok(outcome)
    }

    /// Check-ins of a table, newest first
    pub async fn list_check_ins(
        &self,
        table_id: Uuid,
        page: Page,
    ) -> Result<Vec<pulse_check_in::Model>, RepositoryError> {
        let config = self.get_by_table(table_id).await?;
        recent_check_ins(self.db, config.id, page.limit, page.offset).await
    }

    pub async fn get_check_in(&self, check_in_id: Uuid) -> Result<pulse_check_in::Model, RepositoryError> {
        PulseCheckIn::find_by_id(check_in_id)
            .one(self.db)
            .await?
            .ok_or_else(|| RepositoryError::not_found("Check-in"))
    }

    pub async fn create_session(
        &self,
        request: ScannerSessionCreate,
    ) -> Result<pulse_scanner_session::Model, RepositoryError> {
        PulseEnabledTable::find_by_id(request.pulse_table_id)
            .one(self.db)
            .await?
            .ok_or_else(|| RepositoryError::not_found("Pulse configuration"))?;
        let scanner_name = require_text(&request.scanner_name, "Scanner name")?;

        let session = pulse_scanner_session::ActiveModel {
            id: Set(Uuid::new_v4()),
            pulse_table_id: Set(request.pulse_table_id),
            pairing_code: Set(request.pairing_code),
            scanner_name: Set(scanner_name),
            scanner_email: Set(request.scanner_email),
            device_id: Set(request.device_id),
            is_active: Set(true),
            last_scan_at: Set(None),
            total_scans: Set(0),
            started_at: Set(now()),
            ended_at: Set(None),
        };
        Ok(session.insert(self.db).await?)
    }

    pub async fn list_sessions(
        &self,
        table_id: Uuid,
        active_only: bool,
    ) -> Result<Vec<pulse_scanner_session::Model>, RepositoryError> {
        let config = self.get_by_table(table_id).await?;

        let mut query = PulseScannerSession::find()
            .filter(pulse_scanner_session::Column::PulseTableId.eq(config.id));
        if active_only {
            query = query.filter(pulse_scanner_session::Column::IsActive.eq(true));
        }

        let sessions = query
            .order_by_desc(pulse_scanner_session::Column::StartedAt)
            .all(self.db)
            .await?;
        Ok(sessions)
    }

    /// Ending a session (`is_active = false`) stamps `ended_at`; reactivating clears it
    pub async fn update_session(
        &self,
        session_id: Uuid,
        update: ScannerSessionUpdate,
    ) -> Result<pulse_scanner_session::Model, RepositoryError> {
        let existing = PulseScannerSession::find_by_id(session_id)
            .one(self.db)
            .await?
            .ok_or_else(|| RepositoryError::not_found("Scanner session"))?;

        let mut active = existing.into_active_model();
        if let Some(is_active) = update.is_active {
            active.is_active = Set(is_active);
            active.ended_at = Set(if is_active { None } else { Some(now()) });
        }
        if let Some(total_scans) = update.total_scans {
            active.total_scans = Set(total_scans);
        }
        if let Some(last_scan_at) = update.last_scan_at {
            active.last_scan_at = Set(Some(last_scan_at));
        }

        Ok(active.update(self.db).await?)
    }

    pub async fn dashboard(
        &self,
        table_id: Uuid,
        recent_limit: u64,
    ) -> Result<DashboardSnapshot, RepositoryError> {
        let config = self.get_by_table(table_id).await?;

        let active_scanners = PulseScannerSession::find()
            .filter(pulse_scanner_session::Column::PulseTableId.eq(config.id))
            .filter(pulse_scanner_session::Column::IsActive.eq(true))
            .count(self.db)
            .await?;
        let recent_check_ins = recent_check_ins(self.db, config.id, recent_limit, 0).await?;

        Ok(DashboardSnapshot {
            config,
            active_scanners,
            recent_check_ins,
        })
    }
}

async fn find_config<C: ConnectionTrait>(
    conn: &C,
    table_id: Uuid,
) -> Result<pulse_enabled_table::Model, RepositoryError> {
    PulseEnabledTable::find()
        .filter(pulse_enabled_table::Column::TableId.eq(table_id))
        .one(conn)
        .await?
        .ok_or_else(|| RepositoryError::NotFound("Pulse not enabled for this table".to_string()))
}

/// The Pulse configuration of a table, if any
pub(crate) async fn find_config_opt<C: ConnectionTrait>(
    conn: &C,
    table_id: Uuid,
) -> Result<Option<pulse_enabled_table::Model>, RepositoryError> {
    let config = PulseEnabledTable::find()
        .filter(pulse_enabled_table::Column::TableId.eq(table_id))
        .one(conn)
        .await?;
    Ok(config)
}

async fn recent_check_ins<C: ConnectionTrait>(
    conn: &C,
    pulse_table_id: Uuid,
    limit: u64,
    offset: u64,
) -> Result<Vec<pulse_check_in::Model>, RepositoryError> {
    let check_ins = PulseCheckIn::find()
        .filter(pulse_check_in::Column::PulseTableId.eq(pulse_table_id))
        .order_by_desc(pulse_check_in::Column::CheckInTime)
        .limit(limit)
        .offset(offset)
        .all(conn)
        .await?;
    Ok(check_ins)
}

async fn ensure_table_column<C: ConnectionTrait>(
    conn: &C,
    table_id: Uuid,
    column_id: Uuid,
) -> Result<(), RepositoryError> {
    let belongs = TableColumn::find_by_id(column_id)
        .filter(table_column::Column::TableId.eq(table_id))
        .one(conn)
        .await?
        .is_some();
    if !belongs {
        return Err(RepositoryError::validation_error(
            "Check-in column does not belong to the table",
        ));
    }
    Ok(())
}

async fn count_rsvps<C: ConnectionTrait>(conn: &C, table_id: Uuid) -> Result<i32, RepositoryError> {
    let count = TableRow::find()
        .filter(table_row::Column::TableId.eq(table_id))
        .filter(table_row::Column::IsArchived.eq(false))
        .count(conn)
        .await?;
    Ok(clamp_count(count))
}

fn clamp_count(count: u64) -> i32 {
    i32::try_from(count).unwrap_or(i32::MAX)
}

/// Shallow merge of `overrides` into `base`; keys in `overrides` win
fn merge_settings(base: &Value, overrides: &Value) -> Result<Value, RepositoryError> {
    require_object(overrides, "settings")?;
    let mut merged = base.as_object().cloned().unwrap_or_default();
    if let Some(overrides) = overrides.as_object() {
        for (key, value) in overrides {
            merged.insert(key.clone(), value.clone());
        }
    }
    Ok(Value::Object(merged))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn settings_merge_keeps_unrelated_defaults() {
        let merged = merge_settings(&default_settings(), &json!({"allow_duplicate_scans": true}))
            .unwrap();
        assert_eq!(merged["allow_duplicate_scans"], json!(true));
        assert_eq!(merged["scan_mode"], json!("rapid"));
        assert!(merge_settings(&default_settings(), &json!(["nope"])).is_err());
    }
}
