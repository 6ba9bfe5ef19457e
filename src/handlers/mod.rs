//! # API Handlers
//!
//! HTTP endpoint handlers for the workspace hub. Each submodule owns one resource family;
//! handlers stay thin and delegate to the repositories.

use crate::models::{ServiceInfo, table_row};
use crate::server::AppState;
use axum::response::Json;
use serde_json::json;

pub mod data_tables;
pub mod forms;
pub mod health;
pub mod organizations;
pub mod pulse;
pub mod realtime;
pub mod request_hubs;
pub mod rows;
pub mod scan_history;
pub mod table_links;
pub mod views;
pub mod workspaces;

/// Root handler that returns basic service information
#[utoipa::path(
    get,
    path = "/",
    responses(
        (status = 200, description = "Service information", body = ServiceInfo)
    ),
    tag = "root"
)]
pub async fn root() -> Json<ServiceInfo> {
    Json(ServiceInfo::default())
}

/// Announces rows whose link lists were rebuilt after a delete elsewhere
pub(crate) async fn broadcast_rebuilt_rows(state: &AppState, rows: Vec<table_row::Model>) {
    for row in rows {
        let event = json!({
            "type": "row_updated",
            "table_id": row.table_id,
            "row_id": row.id,
            "data": row.data,
        });
        state.broadcaster.broadcast_json(row.table_id, &event).await;
    }
}
