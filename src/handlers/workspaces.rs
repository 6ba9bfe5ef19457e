//! # Workspaces API Handlers

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
use crate::repositories::WorkspaceRepository;
use crate::repositories::workspace::WorkspaceFilter;
use crate::schemas::Page;
use crate::schemas::organization::{
    ListWorkspacesQuery, WORKSPACE_PAGE, WorkspaceCreate, WorkspaceResponse, WorkspaceUpdate,
};
use crate::server::AppState;

/// List workspaces, optionally scoped to an organization
#[utoipa::path(
    get,
    path = "/workspaces",
    params(ListWorkspacesQuery),
    responses(
        (status = 200, description = "Workspaces, newest first", body = [WorkspaceResponse]),
        (status = 400, description = "Invalid pagination", body = ApiError)
    ),
    tag = "workspaces"
)]
pub async fn list_workspaces(
    State(state): State<AppState>,
    query: Result<Query<ListWorkspacesQuery>, QueryRejection>,
) -> Result<Json<Vec<WorkspaceResponse>>, ApiError> {
    let Query(query) = query?;
    let page = Page::resolve(query.limit, query.offset, WORKSPACE_PAGE)?;
    let filter = WorkspaceFilter {
        organization_id: query.organization_id,
        include_archived: query.include_archived,
    };

    let workspaces = WorkspaceRepository::new(&state.db).list(filter, page).await?;
    Ok(Json(workspaces.into_iter().map(Into::into).collect()))
}

#[utoipa::path(
    post,
    path = "/workspaces",
    request_body = WorkspaceCreate,
    responses(
        (status = 201, description = "Workspace created", body = WorkspaceResponse),
        (status = 400, description = "Validation failed", body = ApiError),
        (status = 404, description = "Organization not found", body = ApiError)
    ),
    tag = "workspaces"
)]
pub async fn create_workspace(
    State(state): State<AppState>,
    payload: Result<Json<WorkspaceCreate>, JsonRejection>,
) -> Result<(StatusCode, Json<WorkspaceResponse>), ApiError> {
    let Json(payload) = payload?;

    let workspace = WorkspaceRepository::new(&state.db).create(payload).await?;
    Ok((StatusCode::CREATED, Json(workspace.into())))
}

#[utoipa::path(
    get,
    path = "/workspaces/{workspace_id}",
    params(("workspace_id" = Uuid, Path, description = "Workspace ID")),
    responses(
        (status = 200, description = "Workspace", body = WorkspaceResponse),
        (status = 404, description = "Workspace not found", body = ApiError)
    ),
    tag = "workspaces"
)]
pub async fn get_workspace(
    State(state): State<AppState>,
    Path(workspace_id): Path<Uuid>,
) -> Result<Json<WorkspaceResponse>, ApiError> {
    let workspace = WorkspaceRepository::new(&state.db).get(workspace_id).await?;
    Ok(Json(workspace.into()))
}

#[utoipa::path(
    patch,
    path = "/workspaces/{workspace_id}",
    params(("workspace_id" = Uuid, Path, description = "Workspace ID")),
    request_body = WorkspaceUpdate,
    responses(
        (status = 200, description = "Workspace updated", body = WorkspaceResponse),
        (status = 400, description = "Validation failed", body = ApiError),
        (status = 404, description = "Workspace not found", body = ApiError)
    ),
    tag = "workspaces"
)]
pub async fn update_workspace(
    State(state): State<AppState>,
    Path(workspace_id): Path<Uuid>,
    payload: Result<Json<WorkspaceUpdate>, JsonRejection>,
) -> Result<Json<WorkspaceResponse>, ApiError> {
    let Json(payload) = payload?;

    let workspace = WorkspaceRepository::new(&state.db)
        .update(workspace_id, payload)
        .await?;
    Ok(Json(workspace.into()))
}

/// Delete a workspace; forms, data tables and request hubs cascade
#[utoipa::path(
    delete,
    path = "/workspaces/{workspace_id}",
    params(("workspace_id" = Uuid, Path, description = "Workspace ID")),
    responses(
        (status = 204, description = "Workspace deleted"),
        (status = 404, description = "Workspace not found", body = ApiError)
    ),
    tag = "workspaces"
)]
pub async fn delete_workspace(
    State(state): State<AppState>,
    Path(workspace_id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    let rebuilt = WorkspaceRepository::new(&state.db).delete(workspace_id).await?;
    broadcast_rebuilt_rows(&state, rebuilt).await;
    Ok(StatusCode::NO_CONTENT)
}
