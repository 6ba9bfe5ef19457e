//! # Scan History API Handlers
//!
//! Append-only audit log of barcode scans. Table lookups that log a scan live in
//! [`super::data_tables::scan_table`].

use axum::{
    extract::{
        Path, Query, State,
        rejection::{JsonRejection, QueryRejection},
    },
    http::StatusCode,
    response::Json,
};
use uuid::Uuid;

use crate::error::ApiError;
use crate::repositories::ScanHistoryRepository;
use crate::repositories::scan_history::ScanHistoryFilter;
use crate::schemas::Page;
use crate::schemas::scan::{
    ListScanHistoryQuery, SCAN_HISTORY_PAGE, ScanRecordCreate, ScanRecordResponse,
};
use crate::server::AppState;

#[utoipa::path(
    post,
    path = "/scan-history",
    request_body = ScanRecordCreate,
    responses(
        (status = 201, description = "Scan recorded", body = ScanRecordResponse),
        (status = 400, description = "Validation failed", body = ApiError)
    ),
    tag = "scan-history"
)]
pub async fn create_scan(
    State(state): State<AppState>,
    payload: Result<Json<ScanRecordCreate>, JsonRejection>,
) -> Result<(StatusCode, Json<ScanRecordResponse>), ApiError> {
    let Json(payload) = payload?;

    let record = ScanHistoryRepository::new(&state.db).create(payload).await?;
    Ok((StatusCode::CREATED, Json(record.into())))
}

#[utoipa::path(
    get,
    path = "/scan-history",
    params(ListScanHistoryQuery),
    responses(
        (status = 200, description = "Scans, newest first", body = [ScanRecordResponse]),
        (status = 400, description = "Invalid pagination", body = ApiError)
    ),
    tag = "scan-history"
)]
pub async fn list_scans(
    State(state): State<AppState>,
    query: Result<Query<ListScanHistoryQuery>, QueryRejection>,
) -> Result<Json<Vec<ScanRecordResponse>>, ApiError> {
    let Query(query) = query?;
    let page = Page::resolve(query.limit, query.offset, SCAN_HISTORY_PAGE)?;
    let filter = ScanHistoryFilter {
        workspace_id: query.workspace_id,
        table_id: query.table_id,
        barcode: query.barcode,
    };

    let records = ScanHistoryRepository::new(&state.db).list(filter, page).await?;
    Ok(Json(records.into_iter().map(Into::into).collect()))
}

#[utoipa::path(
    get,
    path = "/scan-history/{scan_id}",
    params(("scan_id" = Uuid, Path, description = "Scan record ID")),
    responses(
        (status = 200, description = "Scan record", body = ScanRecordResponse),
        (status = 404, description = "Scan record not found", body = ApiError)
    ),
    tag = "scan-history"
)]
pub async fn get_scan(
    State(state): State<AppState>,
    Path(scan_id): Path<Uuid>,
) -> Result<Json<ScanRecordResponse>, ApiError> {
    let record = ScanHistoryRepository::new(&state.db).get(scan_id).await?;
    Ok(Json(record.into()))
}
