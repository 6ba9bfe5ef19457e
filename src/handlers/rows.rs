//! # Table Rows API Handlers
//!
//! Rows, bulk inserts and row comments.

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
use crate::repositories::TableRowRepository;
use crate::schemas::row::{
    CommentCreate, CommentResponse, ListRowsQuery, ROW_PAGE, RowBulkCreate, RowCreate,
    RowResponse, RowUpdate,
};
use crate::schemas::{MessageResponse, Page};
use crate::server::AppState;

#[utoipa::path(
    get,
    path = "/data-tables/{table_id}/rows",
    params(("table_id" = Uuid, Path, description = "Data table ID"), ListRowsQuery),
    responses(
        (status = 200, description = "Rows ordered by position, then creation time", body = [RowResponse]),
        (status = 400, description = "Invalid pagination", body = ApiError),
        (status = 404, description = "Data table not found", body = ApiError)
    ),
    tag = "rows"
)]
pub async fn list_rows(
    State(state): State<AppState>,
    Path(table_id): Path<Uuid>,
    query: Result<Query<ListRowsQuery>, QueryRejection>,
) -> Result<Json<Vec<RowResponse>>, ApiError> {
    let Query(query) = query?;
    let page = Page::resolve(query.limit, query.offset, ROW_PAGE)?;

    let rows = TableRowRepository::new(&state.db)
        .list(table_id, query.include_archived, page)
        .await?;
    Ok(Json(rows.into_iter().map(Into::into).collect()))
}

#[utoipa::path(
    post,
    path = "/data-tables/{table_id}/rows",
    params(("table_id" = Uuid, Path, description = "Data table ID")),
    request_body = RowCreate,
    responses(
        (status = 201, description = "Row created", body = RowResponse),
        (status = 400, description = "Row data is not an object", body = ApiError),
        (status = 404, description = "Data table not found", body = ApiError)
    ),
    tag = "rows"
)]
pub async fn create_row(
    State(state): State<AppState>,
    Path(table_id): Path<Uuid>,
    payload: Result<Json<RowCreate>, JsonRejection>,
) -> Result<(StatusCode, Json<RowResponse>), ApiError> {
    let Json(payload) = payload?;

    let row = TableRowRepository::new(&state.db)
        .create(table_id, payload)
        .await?;
    Ok((StatusCode::CREATED, Json(row.into())))
}

/// Insert many rows in one transaction
#[utoipa::path(
    post,
    path = "/data-tables/{table_id}/rows/bulk",
    params(("table_id" = Uuid, Path, description = "Data table ID")),
    request_body = RowBulkCreate,
    responses(
        (status = 201, description = "Rows created in request order", body = [RowResponse]),
        (status = 400, description = "A row is not an object", body = ApiError),
        (status = 404, description = "Data table not found", body = ApiError)
    ),
    tag = "rows"
)]
pub async fn bulk_create_rows(
    State(state): State<AppState>,
    Path(table_id): Path<Uuid>,
    payload: Result<Json<RowBulkCreate>, JsonRejection>,
) -> Result<(StatusCode, Json<Vec<RowResponse>>), ApiError> {
    let Json(payload) = payload?;

    let rows = TableRowRepository::new(&state.db)
        .bulk_create(table_id, payload)
        .await?;
    Ok((
        StatusCode::CREATED,
        Json(rows.into_iter().map(Into::into).collect()),
    ))
}

#[utoipa::path(
    get,
    path = "/data-tables/{table_id}/rows/{row_id}",
    params(
        ("table_id" = Uuid, Path, description = "Data table ID"),
        ("row_id" = Uuid, Path, description = "Row ID")
    ),
    responses(
        (status = 200, description = "Row", body = RowResponse),
        (status = 404, description = "Row not found", body = ApiError)
    ),
    tag = "rows"
)]
pub async fn get_row(
    State(state): State<AppState>,
    Path((table_id, row_id)): Path<(Uuid, Uuid)>,
) -> Result<Json<RowResponse>, ApiError> {
    let row = TableRowRepository::new(&state.db)
        .get(table_id, row_id)
        .await?;
    Ok(Json(row.into()))
}

/// Partial update; also served on `PUT`
#[utoipa::path(
    patch,
    path = "/data-tables/{table_id}/rows/{row_id}",
    params(
        ("table_id" = Uuid, Path, description = "Data table ID"),
        ("row_id" = Uuid, Path, description = "Row ID")
    ),
    request_body = RowUpdate,
    responses(
        (status = 200, description = "Row updated", body = RowResponse),
        (status = 400, description = "Row data is not an object", body = ApiError),
        (status = 404, description = "Row not found", body = ApiError)
    ),
    tag = "rows"
)]
pub async fn update_row(
    State(state): State<AppState>,
    Path((table_id, row_id)): Path<(Uuid, Uuid)>,
    payload: Result<Json<RowUpdate>, JsonRejection>,
) -> Result<Json<RowResponse>, ApiError> {
    let Json(payload) = payload?;

    let row = TableRowRepository::new(&state.db)
        .update(table_id, row_id, payload)
        .await?;
    Ok(Json(row.into()))
}

/// Delete a row; rows that linked to it get their link lists rebuilt
#[utoipa::path(
    delete,
    path = "/data-tables/{table_id}/rows/{row_id}",
    params(
        ("table_id" = Uuid, Path, description = "Data table ID"),
        ("row_id" = Uuid, Path, description = "Row ID")
    ),
    responses(
        (status = 200, description = "Row deleted", body = MessageResponse),
        (status = 404, description = "Row not found", body = ApiError)
    ),
    tag = "rows"
)]
pub async fn delete_row(
    State(state): State<AppState>,
    Path((table_id, row_id)): Path<(Uuid, Uuid)>,
) -> Result<Json<MessageResponse>, ApiError> {
    let rebuilt = TableRowRepository::new(&state.db)
        .delete(table_id, row_id)
        .await?;

    for source in rebuilt {
        let event = json!({
            "type": "row_updated",
            "table_id": source.table_id,
            "row_id": source.id,
            "data": source.data,
            "unlinked_row_id": row_id,
        });
        state.broadcaster.broadcast_json(source.table_id, &event).await;
    }

    Ok(Json(MessageResponse::new("Row deleted successfully")))
}

#[utoipa::path(
    get,
    path = "/data-tables/{table_id}/rows/{row_id}/comments",
    params(
        ("table_id" = Uuid, Path, description = "Data table ID"),
        ("row_id" = Uuid, Path, description = "Row ID")
    ),
    responses(
        (status = 200, description = "Comments, oldest first", body = [CommentResponse]),
        (status = 404, description = "Row not found", body = ApiError)
    ),
    tag = "rows"
)]
pub async fn list_comments(
    State(state): State<AppState>,
    Path((table_id, row_id)): Path<(Uuid, Uuid)>,
) -> Result<Json<Vec<CommentResponse>>, ApiError> {
    let comments = TableRowRepository::new(&state.db)
        .list_comments(table_id, row_id)
        .await?;
    Ok(Json(comments.into_iter().map(Into::into).collect()))
}

#[utoipa::path(
    post,
    path = "/data-tables/{table_id}/rows/{row_id}/comments",
    params(
        ("table_id" = Uuid, Path, description = "Data table ID"),
        ("row_id" = Uuid, Path, description = "Row ID")
    ),
    request_body = CommentCreate,
    responses(
        (status = 201, description = "Comment created", body = CommentResponse),
        (status = 400, description = "Empty content or parent on another row", body = ApiError),
        (status = 404, description = "Row not found", body = ApiError)
    ),
    tag = "rows"
)]
pub async fn create_comment(
    State(state): State<AppState>,
    Path((table_id, row_id)): Path<(Uuid, Uuid)>,
    payload: Result<Json<CommentCreate>, JsonRejection>,
) -> Result<(StatusCode, Json<CommentResponse>), ApiError> {
    let Json(payload) = payload?;

    let comment = TableRowRepository::new(&state.db)
        .create_comment(table_id, row_id, payload)
        .await?;
    Ok((StatusCode::CREATED, Json(comment.into())))
}
