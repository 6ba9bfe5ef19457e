//! # Request Hub API Handlers
//!
//! Hubs and their tabs, nested under a workspace.

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
use crate::repositories::RequestHubRepository;
use crate::schemas::request_hub::{
    HubTabCreate, HubTabResponse, HubTabUpdate, ListHubsQuery, ListTabsQuery, RequestHubCreate,
    RequestHubResponse, RequestHubUpdate, TabReorder,
};
use crate::server::AppState;

#[utoipa::path(
    get,
    path = "/workspaces/{workspace_id}/request-hubs",
    params(("workspace_id" = Uuid, Path, description = "Workspace ID"), ListHubsQuery),
    responses(
        (status = 200, description = "Hubs, newest first", body = [RequestHubResponse]),
        (status = 404, description = "Workspace not found", body = ApiError)
    ),
    tag = "request-hubs"
)]
pub async fn list_hubs(
    State(state): State<AppState>,
    Path(workspace_id): Path<Uuid>,
    query: Result<Query<ListHubsQuery>, QueryRejection>,
) -> Result<Json<Vec<RequestHubResponse>>, ApiError> {
    let Query(query) = query?;

    let hubs = RequestHubRepository::new(&state.db)
        .list(workspace_id, query.include_inactive)
        .await?;
    Ok(Json(hubs.into_iter().map(Into::into).collect()))
}

/// Create a hub, optionally with its tabs
#[utoipa::path(
    post,
    path = "/workspaces/{workspace_id}/request-hubs",
    params(("workspace_id" = Uuid, Path, description = "Workspace ID")),
    request_body = RequestHubCreate,
    responses(
        (status = 201, description = "Hub created", body = RequestHubResponse),
        (status = 400, description = "Validation failed or workspace mismatch", body = ApiError),
        (status = 404, description = "Workspace not found", body = ApiError),
        (status = 409, description = "Slug already used in the workspace", body = ApiError)
    ),
    tag = "request-hubs"
)]
pub async fn create_hub(
    State(state): State<AppState>,
    Path(workspace_id): Path<Uuid>,
    payload: Result<Json<RequestHubCreate>, JsonRejection>,
) -> Result<(StatusCode, Json<RequestHubResponse>), ApiError> {
    let Json(payload) = payload?;

    let (hub, tabs) = RequestHubRepository::new(&state.db)
        .create(workspace_id, payload)
        .await?;
    Ok((
        StatusCode::CREATED,
        Json(RequestHubResponse::with_tabs(hub, tabs)),
    ))
}

#[utoipa::path(
    get,
    path = "/workspaces/{workspace_id}/request-hubs/{hub_id}",
    params(
        ("workspace_id" = Uuid, Path, description = "Workspace ID"),
        ("hub_id" = Uuid, Path, description = "Request hub ID")
    ),
    responses(
        (status = 200, description = "Hub with tabs ordered by position", body = RequestHubResponse),
        (status = 404, description = "Request hub not found", body = ApiError)
    ),
    tag = "request-hubs"
)]
pub async fn get_hub(
    State(state): State<AppState>,
    Path((workspace_id, hub_id)): Path<(Uuid, Uuid)>,
) -> Result<Json<RequestHubResponse>, ApiError> {
    let (hub, tabs) = RequestHubRepository::new(&state.db)
        .get(workspace_id, hub_id)
        .await?;
    Ok(Json(RequestHubResponse::with_tabs(hub, tabs)))
}

#[utoipa::path(
    get,
    path = "/workspaces/{workspace_id}/request-hubs/by-slug/{slug}",
    params(
        ("workspace_id" = Uuid, Path, description = "Workspace ID"),
        ("slug" = String, Path, description = "Hub slug")
    ),
    responses(
        (status = 200, description = "Hub with tabs ordered by position", body = RequestHubResponse),
        (status = 404, description = "Request hub not found", body = ApiError)
    ),
    tag = "request-hubs"
)]
pub async fn get_hub_by_slug(
    State(state): State<AppState>,
    Path((workspace_id, slug)): Path<(Uuid, String)>,
) -> Result<Json<RequestHubResponse>, ApiError> {
    let (hub, tabs) = RequestHubRepository::new(&state.db)
        .get_by_slug(workspace_id, &slug)
        .await?;
    Ok(Json(RequestHubResponse::with_tabs(hub, tabs)))
}

#[utoipa::path(
    patch,
    path = "/workspaces/{workspace_id}/request-hubs/{hub_id}",
    params(
        ("workspace_id" = Uuid, Path, description = "Workspace ID"),
        ("hub_id" = Uuid, Path, description = "Request hub ID")
    ),
    request_body = RequestHubUpdate,
    responses(
        (status = 200, description = "Hub updated", body = RequestHubResponse),
        (status = 400, description = "Validation failed", body = ApiError),
        (status = 404, description = "Request hub not found", body = ApiError),
        (status = 409, description = "Slug already used in the workspace", body = ApiError)
    ),
    tag = "request-hubs"
)]
pub async fn update_hub(
    State(state): State<AppState>,
    Path((workspace_id, hub_id)): Path<(Uuid, Uuid)>,
    payload: Result<Json<RequestHubUpdate>, JsonRejection>,
) -> Result<Json<RequestHubResponse>, ApiError> {
    let Json(payload) = payload?;

    let hub = RequestHubRepository::new(&state.db)
        .update(workspace_id, hub_id, payload)
        .await?;
    Ok(Json(hub.into()))
}

#[utoipa::path(
    delete,
    path = "/workspaces/{workspace_id}/request-hubs/{hub_id}",
    params(
        ("workspace_id" = Uuid, Path, description = "Workspace ID"),
        ("hub_id" = Uuid, Path, description = "Request hub ID")
    ),
    responses(
        (status = 204, description = "Hub and its tabs deleted"),
        (status = 404, description = "Request hub not found", body = ApiError)
    ),
    tag = "request-hubs"
)]
pub async fn delete_hub(
    State(state): State<AppState>,
    Path((workspace_id, hub_id)): Path<(Uuid, Uuid)>,
) -> Result<StatusCode, ApiError> {
    RequestHubRepository::new(&state.db)
        .delete(workspace_id, hub_id)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

#[utoipa::path(
    get,
    path = "/workspaces/{workspace_id}/request-hubs/{hub_id}/tabs",
    params(
        ("workspace_id" = Uuid, Path, description = "Workspace ID"),
        ("hub_id" = Uuid, Path, description = "Request hub ID"),
        ListTabsQuery
    ),
    responses(
        (status = 200, description = "Tabs ordered by position", body = [HubTabResponse]),
        (status = 404, description = "Request hub not found", body = ApiError)
    ),
    tag = "request-hubs"
)]
pub async fn list_tabs(
    State(state): State<AppState>,
    Path((workspace_id, hub_id)): Path<(Uuid, Uuid)>,
    query: Result<Query<ListTabsQuery>, QueryRejection>,
) -> Result<Json<Vec<HubTabResponse>>, ApiError> {
    let Query(query) = query?;

    let tabs = RequestHubRepository::new(&state.db)
        .list_tabs(workspace_id, hub_id, query.include_hidden)
        .await?;
    Ok(Json(tabs.into_iter().map(Into::into).collect()))
}

#[utoipa::path(
    post,
    path = "/workspaces/{workspace_id}/request-hubs/{hub_id}/tabs",
    params(
        ("workspace_id" = Uuid, Path, description = "Workspace ID"),
        ("hub_id" = Uuid, Path, description = "Request hub ID")
    ),
    request_body = HubTabCreate,
    responses(
        (status = 201, description = "Tab created", body = HubTabResponse),
        (status = 400, description = "Validation failed", body = ApiError),
        (status = 404, description = "Request hub not found", body = ApiError),
        (status = 409, description = "Slug already used in the hub", body = ApiError)
    ),
    tag = "request-hubs"
)]
pub async fn create_tab(
    State(state): State<AppState>,
    Path((workspace_id, hub_id)): Path<(Uuid, Uuid)>,
    payload: Result<Json<HubTabCreate>, JsonRejection>,
) -> Result<(StatusCode, Json<HubTabResponse>), ApiError> {
    let Json(payload) = payload?;

    let tab = RequestHubRepository::new(&state.db)
        .create_tab(workspace_id, hub_id, payload)
        .await?;
    Ok((StatusCode::CREATED, Json(tab.into())))
}

#[utoipa::path(
    patch,
    path = "/workspaces/{workspace_id}/request-hubs/{hub_id}/tabs/{tab_id}",
    params(
        ("workspace_id" = Uuid, Path, description = "Workspace ID"),
        ("hub_id" = Uuid, Path, description = "Request hub ID"),
        ("tab_id" = Uuid, Path, description = "Tab ID")
    ),
    request_body = HubTabUpdate,
    responses(
        (status = 200, description = "Tab updated", body = HubTabResponse),
        (status = 400, description = "Validation failed", body = ApiError),
        (status = 404, description = "Tab not found", body = ApiError),
        (status = 409, description = "Slug already used in the hub", body = ApiError)
    ),
    tag = "request-hubs"
)]
pub async fn update_tab(
    State(state): State<AppState>,
    Path((workspace_id, hub_id, tab_id)): Path<(Uuid, Uuid, Uuid)>,
    payload: Result<Json<HubTabUpdate>, JsonRejection>,
) -> Result<Json<HubTabResponse>, ApiError> {
    let Json(payload) = payload?;

    let tab = RequestHubRepository::new(&state.db)
        .update_tab(workspace_id, hub_id, tab_id, payload)
        .await?;
    Ok(Json(tab.into()))
}

#[utoipa::path(
    delete,
    path = "/workspaces/{workspace_id}/request-hubs/{hub_id}/tabs/{tab_id}",
    params(
        ("workspace_id" = Uuid, Path, description = "Workspace ID"),
        ("hub_id" = Uuid, Path, description = "Request hub ID"),
        ("tab_id" = Uuid, Path, description = "Tab ID")
    ),
    responses(
        (status = 204, description = "Tab deleted"),
        (status = 404, description = "Tab not found", body = ApiError)
    ),
    tag = "request-hubs"
)]
pub async fn delete_tab(
    State(state): State<AppState>,
    Path((workspace_id, hub_id, tab_id)): Path<(Uuid, Uuid, Uuid)>,
) -> Result<StatusCode, ApiError> {
    RequestHubRepository::new(&state.db)
        .delete_tab(workspace_id, hub_id, tab_id)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Apply new tab positions atomically
#[utoipa::path(
    post,
    path = "/workspaces/{workspace_id}/request-hubs/{hub_id}/tabs/reorder",
    params(
        ("workspace_id" = Uuid, Path, description = "Workspace ID"),
        ("hub_id" = Uuid, Path, description = "Request hub ID")
    ),
    request_body = TabReorder,
    responses(
        (status = 200, description = "Tabs in their new order", body = [HubTabResponse]),
        (status = 404, description = "Hub or tab not found", body = ApiError)
    ),
    tag = "request-hubs"
)]
pub async fn reorder_tabs(
    State(state): State<AppState>,
    Path((workspace_id, hub_id)): Path<(Uuid, Uuid)>,
    payload: Result<Json<TabReorder>, JsonRejection>,
) -> Result<Json<Vec<HubTabResponse>>, ApiError> {
    let Json(payload) = payload?;

    let tabs = RequestHubRepository::new(&state.db)
        .reorder_tabs(workspace_id, hub_id, payload.tabs)
        .await?;
    Ok(Json(tabs.into_iter().map(Into::into).collect()))
}
