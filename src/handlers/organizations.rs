//! # Organizations API Handlers

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
use crate::repositories::OrganizationRepository;
use crate::schemas::Page;
use crate::schemas::organization::{
    ListOrganizationsQuery, ORGANIZATION_PAGE, OrganizationCreate, OrganizationResponse,
    OrganizationUpdate,
};
use crate::server::AppState;

/// List organizations, newest first
#[utoipa::path(
    get,
    path = "/organizations",
    params(ListOrganizationsQuery),
    responses(
        (status = 200, description = "Organizations", body = [OrganizationResponse]),
        (status = 400, description = "Invalid pagination", body = ApiError)
    ),
    tag = "organizations"
)]
pub async fn list_organizations(
    State(state): State<AppState>,
    query: Result<Query<ListOrganizationsQuery>, QueryRejection>,
) -> Result<Json<Vec<OrganizationResponse>>, ApiError> {
    let Query(query) = query?;
    let page = Page::resolve(query.limit, query.offset, ORGANIZATION_PAGE)?;

    let organizations = OrganizationRepository::new(&state.db).list(page).await?;
    Ok(Json(organizations.into_iter().map(Into::into).collect()))
}

/// Create an organization
#[utoipa::path(
    post,
    path = "/organizations",
    request_body = OrganizationCreate,
    responses(
        (status = 201, description = "Organization created", body = OrganizationResponse),
        (status = 400, description = "Validation failed", body = ApiError),
        (status = 409, description = "Slug already in use", body = ApiError)
    ),
    tag = "organizations"
)]
pub async fn create_organization(
    State(state): State<AppState>,
    payload: Result<Json<OrganizationCreate>, JsonRejection>,
) -> Result<(StatusCode, Json<OrganizationResponse>), ApiError> {
    let Json(payload) = payload?;

    let organization = OrganizationRepository::new(&state.db).create(payload).await?;
    tracing::info!(organization_id = %organization.id, slug = %organization.slug, "Organization created");
    Ok((StatusCode::CREATED, Json(organization.into())))
}

#[utoipa::path(
    get,
    path = "/organizations/{organization_id}",
    params(("organization_id" = Uuid, Path, description = "Organization ID")),
    responses(
        (status = 200, description = "Organization", body = OrganizationResponse),
        (status = 404, description = "Organization not found", body = ApiError)
    ),
    tag = "organizations"
)]
pub async fn get_organization(
    State(state): State<AppState>,
    Path(organization_id): Path<Uuid>,
) -> Result<Json<OrganizationResponse>, ApiError> {
    let organization = OrganizationRepository::new(&state.db)
        .get(organization_id)
        .await?;
    Ok(Json(organization.into()))
}

#[utoipa::path(
    patch,
    path = "/organizations/{organization_id}",
    params(("organization_id" = Uuid, Path, description = "Organization ID")),
    request_body = OrganizationUpdate,
    responses(
        (status = 200, description = "Organization updated", body = OrganizationResponse),
        (status = 400, description = "Validation failed", body = ApiError),
        (status = 404, description = "Organization not found", body = ApiError),
        (status = 409, description = "Slug already in use", body = ApiError)
    ),
    tag = "organizations"
)]
pub async fn update_organization(
    State(state): State<AppState>,
    Path(organization_id): Path<Uuid>,
    payload: Result<Json<OrganizationUpdate>, JsonRejection>,
) -> Result<Json<OrganizationResponse>, ApiError> {
    let Json(payload) = payload?;

    let organization = OrganizationRepository::new(&state.db)
        .update(organization_id, payload)
        .await?;
    Ok(Json(organization.into()))
}

/// Delete an organization and everything it owns
#[utoipa::path(
    delete,
    path = "/organizations/{organization_id}",
    params(("organization_id" = Uuid, Path, description = "Organization ID")),
    responses(
        (status = 204, description = "Organization deleted"),
        (status = 404, description = "Organization not found", body = ApiError)
    ),
    tag = "organizations"
)]
pub async fn delete_organization(
    State(state): State<AppState>,
    Path(organization_id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    let rebuilt = OrganizationRepository::new(&state.db)
        .delete(organization_id)
        .await?;
    broadcast_rebuilt_rows(&state, rebuilt).await;
    Ok(StatusCode::NO_CONTENT)
}
