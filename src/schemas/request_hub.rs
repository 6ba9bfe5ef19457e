//! Request hub and hub tab DTOs.

use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

use super::common::{default_true, empty_object};
use crate::models::{request_hub, request_hub_tab};

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct RequestHubCreate {
    /// Must match the workspace in the path when present
    pub workspace_id: Option<Uuid>,
    #[schema(example = "IT Requests")]
    pub name: String,
    pub slug: Option<String>,
    pub description: Option<String>,
    #[serde(default = "empty_object")]
    pub settings: Value,
    #[serde(default = "default_true")]
    pub is_active: bool,
    pub created_by: Option<Uuid>,
    /// Tabs created with the hub, positioned in list order unless given
    #[serde(default)]
    pub tabs: Vec<HubTabCreate>,
}

#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
pub struct RequestHubUpdate {
    pub name: Option<String>,
    pub slug: Option<String>,
    pub description: Option<String>,
    pub settings: Option<Value>,
    pub is_active: Option<bool>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct RequestHubResponse {
    pub id: Uuid,
    pub workspace_id: Uuid,
    pub name: String,
    pub slug: String,
    pub description: Option<String>,
    pub settings: Value,
    pub is_active: bool,
    pub created_by: Option<Uuid>,
    pub created_at: DateTime<FixedOffset>,
    pub updated_at: DateTime<FixedOffset>,
    /// Present on single-hub responses, ordered by position
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tabs: Option<Vec<HubTabResponse>>,
}

impl RequestHubResponse {
    pub fn with_tabs(hub: request_hub::Model, tabs: Vec<request_hub_tab::Model>) -> Self {
        Self {
            tabs: Some(tabs.into_iter().map(Into::into).collect()),
            ..hub.into()
        }
    }
}

impl From<request_hub::Model> for RequestHubResponse {
    fn from(model: request_hub::Model) -> Self {
        Self {
            id: model.id,
            workspace_id: model.workspace_id,
            name: model.name,
            slug: model.slug,
            description: model.description,
            settings: model.settings,
            is_active: model.is_active,
            created_by: model.created_by,
            created_at: model.created_at,
            updated_at: model.updated_at,
            tabs: None,
        }
    }
}

#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ListHubsQuery {
    #[serde(default)]
    pub include_inactive: bool,
}

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct HubTabCreate {
    #[schema(example = "Open requests")]
    pub name: String,
    pub slug: Option<String>,
    /// `requests` unless given
    pub tab_type: Option<String>,
    pub icon: Option<String>,
    pub position: Option<i32>,
    #[serde(default = "default_true")]
    pub is_visible: bool,
    #[serde(default = "empty_object")]
    pub config: Value,
}

#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
pub struct HubTabUpdate {
    pub name: Option<String>,
    pub slug: Option<String>,
    pub tab_type: Option<String>,
    pub icon: Option<String>,
    pub position: Option<i32>,
    pub is_visible: Option<bool>,
    pub config: Option<Value>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct HubTabResponse {
    pub id: Uuid,
    pub hub_id: Uuid,
    pub name: String,
    pub slug: String,
    pub tab_type: String,
    pub icon: Option<String>,
    pub position: i32,
    pub is_visible: bool,
    pub config: Value,
    pub created_at: DateTime<FixedOffset>,
    pub updated_at: DateTime<FixedOffset>,
}

impl From<request_hub_tab::Model> for HubTabResponse {
    fn from(model: request_hub_tab::Model) -> Self {
        Self {
            id: model.id,
            hub_id: model.hub_id,
            name: model.name,
            slug: model.slug,
            tab_type: model.tab_type,
            icon: model.icon,
            position: model.position,
            is_visible: model.is_visible,
            config: model.config,
            created_at: model.created_at,
            updated_at: model.updated_at,
        }
    }
}

#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ListTabsQuery {
    #[serde(default)]
    pub include_hidden: bool,
}

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct TabPosition {
    pub id: Uuid,
    pub position: i32,
}

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct TabReorder {
    pub tabs: Vec<TabPosition>,
}
