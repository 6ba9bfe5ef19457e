//! # Table Views API Handlers

use axum::{
    extract::{Path, State, rejection::JsonRejection},
    http::StatusCode,
    response::Json,
};
use uuid::Uuid;

use crate::error::ApiError;
use crate::repositories::TableViewRepository;
use crate::schemas::MessageResponse;
use crate::schemas::data_table::{ViewCreate, ViewResponse, ViewUpdate};
use crate::server::AppState;

#[utoipa::path(
    get,
    path = "/data-tables/{table_id}/views",
    params(("table_id" = Uuid, Path, description = "Data table ID")),
    responses(
        (status = 200, description = "Saved views", body = [ViewResponse]),
        (status = 404, description = "Data table not found", body = ApiError)
    ),
    tag = "views"
)]
pub async fn list_views(
    State(state): State<AppState>,
    Path(table_id): Path<Uuid>,
) -> Result<Json<Vec<ViewResponse>>, ApiError> {
    let views = TableViewRepository::new(&state.db).list(table_id).await?;
    Ok(Json(views.into_iter().map(Into::into).collect()))
}

#[utoipa::path(
    post,
    path = "/data-tables/{table_id}/views",
    params(("table_id" = Uuid, Path, description = "Data table ID")),
    request_body = ViewCreate,
    responses(
        (status = 201, description = "View created", body = ViewResponse),
        (status = 400, description = "Validation failed", body = ApiError),
        (status = 404, description = "Data table not found", body = ApiError)
    ),
    tag = "views"
)]
pub async fn create_view(
    State(state): State<AppState>,
    Path(table_id): Path<Uuid>,
    payload: Result<Json<ViewCreate>, JsonRejection>,
) -> Result<(StatusCode, Json<ViewResponse>), ApiError> {
    let Json(payload) = payload?;

    let view = TableViewRepository::new(&state.db)
        .create(table_id, payload)
        .await?;
    Ok((StatusCode::CREATED, Json(view.into())))
}

/// Partial update; also served on `PUT`
#[utoipa::path(
    patch,
    path = "/data-tables/{table_id}/views/{view_id}",
    params(
        ("table_id" = Uuid, Path, description = "Data table ID"),
        ("view_id" = Uuid, Path, description = "View ID")
    ),
    request_body = ViewUpdate,
    responses(
        (status = 200, description = "View updated", body = ViewResponse),
        (status = 400, description = "Validation failed", body = ApiError),
        (status = 404, description = "View not found", body = ApiError)
    ),
    tag = "views"
)]
pub async fn update_view(
    State(state): State<AppState>,
    Path((table_id, view_id)): Path<(Uuid, Uuid)>,
    payload: Result<Json<ViewUpdate>, JsonRejection>,
) -> Result<Json<ViewResponse>, ApiError> {
    let Json(payload) = payload?;

    let view = TableViewRepository::new(&state.db)
        .update(table_id, view_id, payload)
        .await?;
    Ok(Json(view.into()))
}

#[utoipa::path(
    delete,
    path = "/data-tables/{table_id}/views/{view_id}",
    params(
        ("table_id" = Uuid, Path, description = "Data table ID"),
        ("view_id" = Uuid, Path, description = "View ID")
    ),
    responses(
        (status = 200, description = "View deleted", body = MessageResponse),
        (status = 404, description = "View not found", body = ApiError)
    ),
    tag = "views"
)]
pub async fn delete_view(
    State(state): State<AppState>,
    Path((table_id, view_id)): Path<(Uuid, Uuid)>,
) -> Result<Json<MessageResponse>, ApiError> {
    TableViewRepository::new(&state.db)
        .delete(table_id, view_id)
        .await?;
    Ok(Json(MessageResponse::new("View deleted successfully")))
}
