//! Organization and workspace DTOs.

use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

use super::common::{PageLimits, empty_object};
use crate::models::{organization, workspace};

pub const ORGANIZATION_PAGE: PageLimits = PageLimits::new(50, 200);
pub const WORKSPACE_PAGE: PageLimits = PageLimits::new(50, 200);

/// Request payload for creating an organization
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct OrganizationCreate {
    #[schema(example = "Acme Events")]
    pub name: String,
    /// Derived from `name` when omitted
    pub slug: Option<String>,
    pub description: Option<String>,
    pub logo_url: Option<String>,
    #[serde(default = "empty_object")]
    pub settings: Value,
    pub subscription_tier: Option<String>,
}

/// Partial update; omitted fields are left untouched
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
pub struct OrganizationUpdate {
    pub name: Option<String>,
    pub slug: Option<String>,
    pub description: Option<String>,
    pub logo_url: Option<String>,
    pub settings: Option<Value>,
    pub subscription_tier: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct OrganizationResponse {
    pub id: Uuid,
    pub name: String,
    pub slug: String,
    pub description: Option<String>,
    pub logo_url: Option<String>,
    pub settings: Value,
    pub subscription_tier: String,
    pub created_at: DateTime<FixedOffset>,
    pub updated_at: DateTime<FixedOffset>,
}

impl From<organization::Model> for OrganizationResponse {
    fn from(model: organization::Model) -> Self {
        Self {
            id: model.id,
            name: model.name,
            slug: model.slug,
            description: model.description,
            logo_url: model.logo_url,
            settings: model.settings,
            subscription_tier: model.subscription_tier,
            created_at: model.created_at,
            updated_at: model.updated_at,
        }
    }
}

#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ListOrganizationsQuery {
    /// Page size (default 50, max 200)
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

/// Request payload for creating a workspace
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct WorkspaceCreate {
    pub organization_id: Uuid,
    #[schema(example = "Spring Gala")]
    pub name: String,
    pub slug: Option<String>,
    pub description: Option<String>,
    pub color: Option<String>,
    pub icon: Option<String>,
    #[serde(default = "empty_object")]
    pub settings: Value,
    pub created_by: Option<Uuid>,
}

#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
pub struct WorkspaceUpdate {
    pub name: Option<String>,
    pub slug: Option<String>,
    pub description: Option<String>,
    pub color: Option<String>,
    pub icon: Option<String>,
    pub settings: Option<Value>,
    pub is_archived: Option<bool>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct WorkspaceResponse {
    pub id: Uuid,
    pub organization_id: Uuid,
    pub name: String,
    pub slug: String,
    pub description: Option<String>,
    pub color: String,
    pub icon: String,
    pub settings: Value,
    pub is_archived: bool,
    pub created_by: Option<Uuid>,
    pub created_at: DateTime<FixedOffset>,
    pub updated_at: DateTime<FixedOffset>,
}

impl From<workspace::Model> for WorkspaceResponse {
    fn from(model: workspace::Model) -> Self {
        Self {
            id: model.id,
            organization_id: model.organization_id,
            name: model.name,
            slug: model.slug,
            description: model.description,
            color: model.color,
            icon: model.icon,
            settings: model.settings,
            is_archived: model.is_archived,
            created_by: model.created_by,
            created_at: model.created_at,
            updated_at: model.updated_at,
        }
    }
}

#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ListWorkspacesQuery {
    pub organization_id: Option<Uuid>,
    /// Include archived workspaces (default false)
    #[serde(default)]
    pub include_archived: bool,
    /// Page size (default 50, max 200)
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}
