//! # Table Link API Handlers
//!
//! Table-level link declarations and row-to-row links. Row links live in `table_row_links`;
//! every mutation also rewrites the source row's JSON value under the link column's name,
//! then notifies the table's WebSocket subscribers once the transaction has committed.

use axum::{
    extract::{
        Path, Query, State,
        rejection::{JsonRejection, QueryRejection},
    },
    http::StatusCode,
    response::Json,
};
use serde_json::json;
use uuid::Uuid;

use crate::error::ApiError;
use crate::repositories::TableLinkRepository;
use crate::repositories::table_link::LinkMutation;
use crate::schemas::Page;
use crate::schemas::link::{
    AVAILABLE_RECORDS_PAGE, AvailableRecordsQuery, AvailableRecordsResponse, LinkedRecordsResponse,
    ListRowLinksQuery, ROW_LINK_PAGE, RowLinkColumnQuery, RowLinkMutationResponse, RowLinkRequest,
    TableLinkCreate, TableLinkResponse,
};
use crate::server::AppState;

#[utoipa::path(
    get,
    path = "/data-tables/{table_id}/links",
    params(("table_id" = Uuid, Path, description = "Data table ID")),
    responses(
        (status = 200, description = "Links where the table is source or target", body = [TableLinkResponse]),
        (status = 404, description = "Data table not found", body = ApiError)
    ),
    tag = "links"
)]
pub async fn list_links(
    State(state): State<AppState>,
    Path(table_id): Path<Uuid>,
) -> Result<Json<Vec<TableLinkResponse>>, ApiError> {
    let links = TableLinkRepository::new(&state.db).list_links(table_id).await?;
    Ok(Json(links.into_iter().map(Into::into).collect()))
}

#[utoipa::path(
    post,
    path = "/data-tables/{table_id}/links",
    params(("table_id" = Uuid, Path, description = "Data table ID")),
    request_body = TableLinkCreate,
    responses(
        (status = 201, description = "Link created", body = TableLinkResponse),
        (status = 400, description = "Invalid link column or target column", body = ApiError),
        (status = 404, description = "Data table not found", body = ApiError),
        (status = 409, description = "Column already has a link", body = ApiError)
    ),
    tag = "links"
)]
pub async fn create_link(
    State(state): State<AppState>,
    Path(table_id): Path<Uuid>,
    payload: Result<Json<TableLinkCreate>, JsonRejection>,
) -> Result<(StatusCode, Json<TableLinkResponse>), ApiError> {
    let Json(payload) = payload?;

    let link = TableLinkRepository::new(&state.db)
        .create_link(table_id, payload)
        .await?;
    Ok((StatusCode::CREATED, Json(link.into())))
}

/// Target rows linked from a row, in link order
#[utoipa::path(
    get,
    path = "/data-tables/{table_id}/rows/{row_id}/links",
    params(
        ("table_id" = Uuid, Path, description = "Data table ID"),
        ("row_id" = Uuid, Path, description = "Source row ID"),
        ListRowLinksQuery
    ),
    responses(
        (status = 200, description = "Linked records", body = LinkedRecordsResponse),
        (status = 400, description = "Invalid pagination", body = ApiError),
        (status = 404, description = "Row not found", body = ApiError)
    ),
    tag = "links"
)]
pub async fn list_row_links(
    State(state): State<AppState>,
    Path((table_id, row_id)): Path<(Uuid, Uuid)>,
    query: Result<Query<ListRowLinksQuery>, QueryRejection>,
) -> Result<Json<LinkedRecordsResponse>, ApiError> {
    let Query(query) = query?;
    let page = Page::resolve(query.limit, query.offset, ROW_LINK_PAGE)?;

    let (records, total_count) = TableLinkRepository::new(&state.db)
        .list_row_links(table_id, row_id, query.column_id, page)
        .await?;
    let has_more = page.offset + (records.len() as u64) < total_count;

    Ok(Json(LinkedRecordsResponse {
        records: records.into_iter().map(Into::into).collect(),
        total_count,
        has_more,
    }))
}

#[utoipa::path(
    post,
    path = "/data-tables/{table_id}/rows/{row_id}/links",
    params(
        ("table_id" = Uuid, Path, description = "Data table ID"),
        ("row_id" = Uuid, Path, description = "Source row ID")
    ),
    request_body = RowLinkRequest,
    responses(
        (status = 200, description = "Row linked; links lists every target id", body = RowLinkMutationResponse),
        (status = 400, description = "Invalid link column or target in another table", body = ApiError),
        (status = 404, description = "Row or target row not found", body = ApiError)
    ),
    tag = "links"
)]
pub async fn link_row(
    State(state): State<AppState>,
    Path((table_id, row_id)): Path<(Uuid, Uuid)>,
    payload: Result<Json<RowLinkRequest>, JsonRejection>,
) -> Result<Json<RowLinkMutationResponse>, ApiError> {
    let Json(payload) = payload?;

    let mutation = TableLinkRepository::new(&state.db)
        .link_row(table_id, row_id, payload.column_id, payload.target_row_id)
        .await?;
    tracing::debug!(
        %table_id,
        %row_id,
        target_row_id = %payload.target_row_id,
        changed = mutation.changed,
        "Row linked"
    );

    notify_row_updated(&state, &mutation, "linked_row_id", payload.target_row_id).await;
    Ok(Json(RowLinkMutationResponse {
        success: true,
        links: mutation.links,
    }))
}

#[utoipa::path(
    delete,
    path = "/data-tables/{table_id}/rows/{row_id}/links/{target_row_id}",
    params(
        ("table_id" = Uuid, Path, description = "Data table ID"),
        ("row_id" = Uuid, Path, description = "Source row ID"),
        ("target_row_id" = Uuid, Path, description = "Linked target row ID"),
        RowLinkColumnQuery
    ),
    responses(
        (status = 200, description = "Row unlinked; links lists the remaining target ids", body = RowLinkMutationResponse),
        (status = 400, description = "Invalid link column", body = ApiError),
        (status = 404, description = "Row not found", body = ApiError)
    ),
    tag = "links"
)]
pub async fn unlink_row(
    State(state): State<AppState>,
    Path((table_id, row_id, target_row_id)): Path<(Uuid, Uuid, Uuid)>,
    query: Result<Query<RowLinkColumnQuery>, QueryRejection>,
) -> Result<Json<RowLinkMutationResponse>, ApiError> {
    let Query(query) = query?;

    let mutation = TableLinkRepository::new(&state.db)
        .unlink_row(table_id, row_id, query.column_id, target_row_id)
        .await?;

    notify_row_updated(&state, &mutation, "unlinked_row_id", target_row_id).await;
    Ok(Json(RowLinkMutationResponse {
        success: true,
        links: mutation.links,
    }))
}

/// Rows of the column's linked table that can be picked as link targets
#[utoipa::path(
    get,
    path = "/data-tables/{table_id}/columns/{column_id}/available-records",
    params(
        ("table_id" = Uuid, Path, description = "Data table ID"),
        ("column_id" = Uuid, Path, description = "Link column ID"),
        AvailableRecordsQuery
    ),
    responses(
        (status = 200, description = "Candidate records", body = AvailableRecordsResponse),
        (status = 400, description = "Invalid link column or pagination", body = ApiError)
    ),
    tag = "links"
)]
pub async fn available_records(
    State(state): State<AppState>,
    Path((table_id, column_id)): Path<(Uuid, Uuid)>,
    query: Result<Query<AvailableRecordsQuery>, QueryRejection>,
) -> Result<Json<AvailableRecordsResponse>, ApiError> {
    let Query(query) = query?;
    let page = Page::resolve(query.limit, query.offset, AVAILABLE_RECORDS_PAGE)?;

    let (records, total_count) = TableLinkRepository::new(&state.db)
        .available_records(table_id, column_id, query.search.as_deref(), query.row_id, page)
        .await?;
    let has_more = page.offset + (records.len() as u64) < total_count;

    Ok(Json(AvailableRecordsResponse {
        records,
        total_count,
        has_more,
    }))
}

async fn notify_row_updated(state: &AppState, mutation: &LinkMutation, key: &str, target_row_id: Uuid) {
    let mut event = json!({
        "type": "row_updated",
        "table_id": mutation.row.table_id,
        "row_id": mutation.row.id,
        "data": mutation.row.data,
        "column_id": mutation.column.id,
    });
    event[key] = json!(target_row_id);

    state
        .broadcaster
        .broadcast_json(mutation.row.table_id, &event)
        .await;
}
