//! Test utilities for database and router testing.
//!
//! Every test gets its own in-memory SQLite database with all migrations applied and
//! foreign keys enforced, so cascades behave as they do in production.

#![allow(dead_code)]

use anyhow::Result;
use axum::{
    Router,
    body::{Body, to_bytes},
    http::{Method, Request, StatusCode, header},
};
use migration::{Migrator, MigratorTrait};
use sea_orm::{ConnectionTrait, Database, DatabaseConnection, Statement};
use serde::de::DeserializeOwned;
use serde_json::{Value, json};
use tower::ServiceExt;
use uuid::Uuid;
use workspace_hub::{
    config::AppConfig,
    models::{data_table, table_column},
    repositories::{DataTableRepository, OrganizationRepository, WorkspaceRepository},
    server::{AppState, create_app},
};

/// Sets up an in-memory SQLite database with all migrations applied.
pub async fn setup_test_db() -> Result<DatabaseConnection> {
    let db = Database::connect("sqlite::memory:").await?;

    Migrator::up(&db, None).await?;

    db.execute(Statement::from_string(
        db.get_database_backend(),
        "PRAGMA foreign_keys = ON".to_string(),
    ))
    .await?;

    Ok(db)
}

/// Application state over a fresh database with default configuration.
pub async fn setup_test_state() -> Result<AppState> {
    let db = setup_test_db().await?;
    Ok(AppState::new(AppConfig::default(), db))
}

/// Router plus the state it shares, for tests that also inspect the database.
pub async fn setup_test_app() -> Result<(Router, AppState)> {
    let state = setup_test_state().await?;
    Ok((create_app(state.clone()), state))
}

/// Deserializes a request DTO from JSON, the way the router would.
pub fn payload<T: DeserializeOwned>(value: Value) -> T {
    serde_json::from_value(value).expect("payload matches DTO")
}

/// Sends one request through the router and returns the status and JSON body
/// (`Value::Null` for empty bodies).
pub async fn send(app: &Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(body) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&bytes).into_owned()))
    };
    (status, value)
}

/// Creates an organization with one workspace and returns the workspace id.
pub async fn seed_workspace(db: &DatabaseConnection) -> Result<Uuid> {
    let organization = OrganizationRepository::new(db)
        .create(payload(json!({"name": format!("Org {}", Uuid::new_v4())})))
        .await?;
    let workspace = WorkspaceRepository::new(db)
        .create(payload(json!({
            "organization_id": organization.id,
            "name": "Main workspace",
        })))
        .await?;
    Ok(workspace.id)
}

/// Creates a table in the workspace with `(name, column_type)` columns.
pub async fn seed_table(
    db: &DatabaseConnection,
    workspace_id: Uuid,
    name: &str,
    columns: &[(&str, &str)],
) -> Result<(data_table::Model, Vec<table_column::Model>)> {
    let columns: Vec<Value> = columns
        .iter()
        .map(|(name, column_type)| {
            json!({"name": name, "label": name, "column_type": column_type})
        })
        .collect();

    let table = DataTableRepository::new(db)
        .create(payload(json!({
            "workspace_id": workspace_id,
            "name": name,
            "columns": columns,
        })))
        .await?;
    Ok(table)
}
