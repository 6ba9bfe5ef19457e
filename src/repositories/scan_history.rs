//! # Scan History Repository
//!
//! Append-only log of barcode scans. Records are never updated or deleted through the API.

use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder,
    QuerySelect, Set,
};
use serde_json::{Value, json};
use uuid::Uuid;

use super::data_table::{DataTableRepository, find_table};
use super::now;
use super::pulse::find_config_opt;
use super::table_row::TableRowRepository;
use crate::error::RepositoryError;
use crate::models::scan_history::{self, Entity as ScanHistory};
use crate::models::table_row;
use crate::schemas::Page;
use crate::schemas::common::require_text;
use crate::schemas::scan::{ScanRecordCreate, TableScanRequest};

/// Filters for listing scan records
#[derive(Debug, Clone, Default)]
pub struct ScanHistoryFilter {
    pub workspace_id: Option<Uuid>,
    pub table_id: Option<Uuid>,
    pub barcode: Option<String>,
}

/// Repository for ScanHistory operations
pub struct ScanHistoryRepository<'a> {
    db: &'a DatabaseConnection,
}

impl<'a> ScanHistoryRepository<'a> {
    pub fn new(db: &'a DatabaseConnection) -> Self {
        Self { db }
    }

    pub async fn create(&self, request: ScanRecordCreate) -> Result<scan_history::Model, RepositoryError> {
        let barcode = require_text(&request.barcode, "Barcode")?;
        if !request.matched_row_ids.is_array() {
            return Err(RepositoryError::validation_error(
                "matched_row_ids must be a JSON array",
            ));
        }

        let record = scan_history::ActiveModel {
            id: Set(Uuid::new_v4()),
            workspace_id: Set(request.workspace_id),
            table_id: Set(request.table_id),
            column_name: Set(request.column_name),
            barcode: Set(barcode),
            found: Set(request.found),
            matched_row_ids: Set(request.matched_row_ids),
            scanned_by: Set(request.scanned_by),
            device_id: Set(request.device_id),
            metadata: Set(request.metadata),
            scanned_at: Set(now()),
        };
        Ok(record.insert(self.db).await?)
    }

    /// Lists scans newest first
    pub async fn list(
        &self,
        filter: ScanHistoryFilter,
        page: Page,
    ) -> Result<Vec<scan_history::Model>, RepositoryError> {
        let mut query = ScanHistory::find();
        if let Some(workspace_id) = filter.workspace_id {
            query = query.filter(scan_history::Column::WorkspaceId.eq(workspace_id));
        }
        if let Some(table_id) = filter.table_id {
            query = query.filter(scan_history::Column::TableId.eq(table_id));
        }
        if let Some(barcode) = filter.barcode {
            query = query.filter(scan_history::Column::Barcode.eq(barcode));
        }

        let records = query
            .order_by_desc(scan_history::Column::ScannedAt)
            .limit(page.limit)
            .offset(page.offset)
            .all(self.db)
            .await?;
        Ok(records)
    }

    pub async fn get(&self, scan_id: Uuid) -> Result<scan_history::Model, RepositoryError> {
        ScanHistory::find_by_id(scan_id)
            .one(self.db)
            .await?
            .ok_or_else(|| RepositoryError::not_found("Scan record"))
    }

    /// Looks a barcode up in a table and logs the attempt, found or not
    pub async fn scan_table(
        &self,
        table_id: Uuid,
        request: TableScanRequest,
    ) -> Result<(scan_history::Model, Vec<table_row::Model>), RepositoryError> {
        let table = find_table(self.db, table_id).await?;
        let barcode = require_text(&request.barcode, "Barcode")?;
        let column_name = match request.column_name.filter(|name| !name.trim().is_empty()) {
            Some(name) => name,
            None => self.default_scan_column(table_id).await?,
        };

        let rows = TableRowRepository::new(self.db)
            .find_by_cell(table_id, &column_name, &barcode)
            .await?;
        let matched: Vec<Value> = rows.iter().map(|row| json!(row.id)).collect();

        let record = self
            .create(ScanRecordCreate {
                workspace_id: Some(table.workspace_id),
                table_id: Some(table_id),
                column_name: Some(column_name),
                barcode,
                found: !rows.is_empty(),
                matched_row_ids: Value::Array(matched),
                scanned_by: request.scanned_by,
                device_id: request.device_id,
                metadata: json!({}),
            })
            .await?;

        metrics::counter!("barcode_scans_total", "found" => record.found.to_string()).increment(1);
        Ok((record, rows))
    }

    /// The Pulse check-in column, else the table's primary column
    async fn default_scan_column(&self, table_id: Uuid) -> Result<String, RepositoryError> {
        let columns = DataTableRepository::new(self.db).columns(table_id).await?;

        let check_in_column = find_config_opt(self.db, table_id)
            .await?
            .and_then(|config| config.check_in_column_id);
        check_in_column
            .and_then(|id| columns.iter().find(|column| column.id == id))
            .or_else(|| columns.iter().find(|column| column.is_primary))
            .map(|column| column.name.clone())
            .ok_or_else(|| {
                RepositoryError::validation_error(
                    "column_name is required: the table has no check-in or primary column",
                )
            })
    }
}
