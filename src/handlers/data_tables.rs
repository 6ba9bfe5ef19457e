//! # Data Tables API Handlers
//!
//! Tables, their columns, and barcode lookups against a table.

use axum::{
    extract::{
        Path, Query, State,
        rejection::{JsonRejection, QueryRejection},
    },
    http::StatusCode,
    response::Json,
};
use uuid::Uuid;

use super::broadcast_rebuilt_rows;
use crate::error::ApiError;
use crate::repositories::data_table::DataTableFilter;
use crate::repositories::{DataTableRepository, ScanHistoryRepository};
use crate::schemas::data_table::{
    ColumnCreate, ColumnResponse, ColumnUpdate, DATA_TABLE_PAGE, DataTableCreate,
    DataTableResponse, DataTableUpdate, ListDataTablesQuery,
};
use crate::schemas::scan::{TableScanRequest, TableScanResponse};
use crate::schemas::{MessageResponse, Page};
use crate::server::AppState;

#[utoipa::path(
    get,
    path = "/data-tables",
    params(ListDataTablesQuery),
    responses(
        (status = 200, description = "Tables with their columns, newest first", body = [DataTableResponse]),
        (status = 400, description = "Invalid pagination", body = ApiError)
    ),
    tag = "data-tables"
)]
pub async fn list_tables(
    State(state): State<AppState>,
    query: Result<Query<ListDataTablesQuery>, QueryRejection>,
) -> Result<Json<Vec<DataTableResponse>>, ApiError> {
    let Query(query) = query?;
    let page = Page::resolve(query.limit, query.offset, DATA_TABLE_PAGE)?;
    let filter = DataTableFilter {
        workspace_id: query.workspace_id,
        include_archived: query.include_archived,
    };

    let tables = DataTableRepository::new(&state.db).list(filter, page).await?;
    Ok(Json(
        tables
            .into_iter()
            .map(|(table, columns)| DataTableResponse::new(table, columns))
            .collect(),
    ))
}

/// Create a table and its columns atomically
#[utoipa::path(
    post,
    path = "/data-tables",
    request_body = DataTableCreate,
    responses(
        (status = 201, description = "Table created", body = DataTableResponse),
        (status = 400, description = "Validation failed", body = ApiError),
        (status = 404, description = "Workspace not found", body = ApiError)
    ),
    tag = "data-tables"
)]
pub async fn create_table(
    State(state): State<AppState>,
    payload: Result<Json<DataTableCreate>, JsonRejection>,
) -> Result<(StatusCode, Json<DataTableResponse>), ApiError> {
    let Json(payload) = payload?;

    let (table, columns) = DataTableRepository::new(&state.db).create(payload).await?;
    Ok((StatusCode::CREATED, Json(DataTableResponse::new(table, columns))))
}

#[utoipa::path(
    get,
    path = "/data-tables/{table_id}",
    params(("table_id" = Uuid, Path, description = "Data table ID")),
    responses(
        (status = 200, description = "Table with columns ordered by position", body = DataTableResponse),
        (status = 404, description = "Data table not found", body = ApiError)
    ),
    tag = "data-tables"
)]
pub async fn get_table(
    State(state): State<AppState>,
    Path(table_id): Path<Uuid>,
) -> Result<Json<DataTableResponse>, ApiError> {
    let (table, columns) = DataTableRepository::new(&state.db).get(table_id).await?;
    Ok(Json(DataTableResponse::new(table, columns)))
}

/// Partial update; also served on `PUT`
#[utoipa::path(
    patch,
    path = "/data-tables/{table_id}",
    params(("table_id" = Uuid, Path, description = "Data table ID")),
    request_body = DataTableUpdate,
    responses(
        (status = 200, description = "Table updated", body = DataTableResponse),
        (status = 400, description = "Validation failed", body = ApiError),
        (status = 404, description = "Data table not found", body = ApiError)
    ),
    tag = "data-tables"
)]
pub async fn update_table(
    State(state): State<AppState>,
    Path(table_id): Path<Uuid>,
    payload: Result<Json<DataTableUpdate>, JsonRejection>,
) -> Result<Json<DataTableResponse>, ApiError> {
    let Json(payload) = payload?;

    let (table, columns) = DataTableRepository::new(&state.db)
        .update(table_id, payload)
        .await?;
    Ok(Json(DataTableResponse::new(table, columns)))
}

#[utoipa::path(
    delete,
    path = "/data-tables/{table_id}",
    params(("table_id" = Uuid, Path, description = "Data table ID")),
    responses(
        (status = 200, description = "Table deleted", body = MessageResponse),
        (status = 404, description = "Data table not found", body = ApiError)
    ),
    tag = "data-tables"
)]
pub async fn delete_table(
    State(state): State<AppState>,
    Path(table_id): Path<Uuid>,
) -> Result<Json<MessageResponse>, ApiError> {
    let rebuilt = DataTableRepository::new(&state.db).delete(table_id).await?;
    tracing::info!(%table_id, rebuilt = rebuilt.len(), "Data table deleted");
    broadcast_rebuilt_rows(&state, rebuilt).await;
    Ok(Json(MessageResponse::new("Data table deleted successfully")))
}

/// Add a column; without a position it is appended
#[utoipa::path(
    post,
    path = "/data-tables/{table_id}/columns",
    params(("table_id" = Uuid, Path, description = "Data table ID")),
    request_body = ColumnCreate,
    responses(
        (status = 201, description = "Column created", body = ColumnResponse),
        (status = 400, description = "Validation failed or linked table missing", body = ApiError),
        (status = 404, description = "Data table not found", body = ApiError)
    ),
    tag = "data-tables"
)]
pub async fn create_column(
    State(state): State<AppState>,
    Path(table_id): Path<Uuid>,
    payload: Result<Json<ColumnCreate>, JsonRejection>,
) -> Result<(StatusCode, Json<ColumnResponse>), ApiError> {
    let Json(payload) = payload?;

    let column = DataTableRepository::new(&state.db)
        .add_column(table_id, payload)
        .await?;
    Ok((StatusCode::CREATED, Json(column.into())))
}

#[utoipa::path(
    patch,
    path = "/data-tables/{table_id}/columns/{column_id}",
    params(
        ("table_id" = Uuid, Path, description = "Data table ID"),
        ("column_id" = Uuid, Path, description = "Column ID")
    ),
    request_body = ColumnUpdate,
    responses(
        (status = 200, description = "Column updated", body = ColumnResponse),
        (status = 400, description = "Validation failed", body = ApiError),
        (status = 404, description = "Column not found", body = ApiError)
    ),
    tag = "data-tables"
)]
pub async fn update_column(
    State(state): State<AppState>,
    Path((table_id, column_id)): Path<(Uuid, Uuid)>,
    payload: Result<Json<ColumnUpdate>, JsonRejection>,
) -> Result<Json<ColumnResponse>, ApiError> {
    let Json(payload) = payload?;

    let column = DataTableRepository::new(&state.db)
        .update_column(table_id, column_id, payload)
        .await?;
    Ok(Json(column.into()))
}

#[utoipa::path(
    delete,
    path = "/data-tables/{table_id}/columns/{column_id}",
    params(
        ("table_id" = Uuid, Path, description = "Data table ID"),
        ("column_id" = Uuid, Path, description = "Column ID")
    ),
    responses(
        (status = 200, description = "Column deleted", body = MessageResponse),
        (status = 404, description = "Column not found", body = ApiError)
    ),
    tag = "data-tables"
)]
pub async fn delete_column(
    State(state): State<AppState>,
    Path((table_id, column_id)): Path<(Uuid, Uuid)>,
) -> Result<Json<MessageResponse>, ApiError> {
    DataTableRepository::new(&state.db)
        .delete_column(table_id, column_id)
        .await?;
    Ok(Json(MessageResponse::new("Column deleted successfully")))
}

/// Look a barcode up in the table and log the scan
#[utoipa::path(
    post,
    path = "/data-tables/{table_id}/scan",
    params(("table_id" = Uuid, Path, description = "Data table ID")),
    request_body = TableScanRequest,
    responses(
        (status = 200, description = "Scan logged with any matching rows", body = TableScanResponse),
        (status = 400, description = "No column to match against", body = ApiError),
        (status = 404, description = "Data table not found", body = ApiError)
    ),
    tag = "scan-history"
)]
pub async fn scan_table(
    State(state): State<AppState>,
    Path(table_id): Path<Uuid>,
    payload: Result<Json<TableScanRequest>, JsonRejection>,
) -> Result<Json<TableScanResponse>, ApiError> {
    let Json(payload) = payload?;

    let (scan, rows) = ScanHistoryRepository::new(&state.db)
        .scan_table(table_id, payload)
        .await?;
    Ok(Json(TableScanResponse {
        scan: scan.into(),
        rows: rows.into_iter().map(Into::into).collect(),
    }))
}
