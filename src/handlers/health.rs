//! # Health API Handlers
//!
//! Liveness, database readiness and a detailed probe with pool occupancy.

use axum::{extract::State, http::StatusCode, response::Json};
use sea_orm::{ConnectionTrait, DatabaseBackend};
use serde::Serialize;
use utoipa::ToSchema;

use crate::db::{self, PoolStatus};
use crate::server::AppState;

/// Liveness response
#[derive(Debug, Serialize, ToSchema)]
pub struct HealthResponse {
    #[schema(example = "ok")]
    pub status: String,
}

/// Database readiness response
#[derive(Debug, Serialize, ToSchema)]
pub struct DatabaseHealthResponse {
    #[schema(example = "ok")]
    pub status: String,
    #[schema(example = "connected")]
    pub database: String,
}

/// Detailed health response
#[derive(Debug, Serialize, ToSchema)]
pub struct DetailedHealthResponse {
    pub status: String,
    pub database: String,
    /// Database backend in use (`postgres`, `sqlite`)
    pub backend: String,
    pub pool: PoolStatus,
    pub environment: String,
    pub version: String,
    /// Tables with at least one open realtime connection
    pub realtime_tables: usize,
}

/// Liveness probe
#[utoipa::path(
    get,
    path = "/health",
    responses(
        (status = 200, description = "Service is running", body = HealthResponse)
    ),
    tag = "health"
)]
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
    })
}

/// Database readiness probe (`SELECT 1`)
#[utoipa::path(
    get,
    path = "/health/db",
    responses(
        (status = 200, description = "Database reachable", body = DatabaseHealthResponse),
        (status = 503, description = "Database unreachable", body = DatabaseHealthResponse)
    ),
    tag = "health"
)]
pub async fn database_health(
    State(state): State<AppState>,
) -> (StatusCode, Json<DatabaseHealthResponse>) {
    match db::health_check(&state.db).await {
        Ok(()) => (
            StatusCode::OK,
            Json(DatabaseHealthResponse {
                status: "ok".to_string(),
                database: "connected".to_string(),
            }),
        ),
        Err(error) => {
            tracing::warn!(error = %error, "Database health check failed");
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(DatabaseHealthResponse {
                    status: "error".to_string(),
                    database: "disconnected".to_string(),
                }),
            )
        }
    }
}

/// Database status, backend, pool occupancy, environment and version
#[utoipa::path(
    get,
    path = "/health/detailed",
    responses(
        (status = 200, description = "All dependencies healthy", body = DetailedHealthResponse),
        (status = 503, description = "Database unreachable", body = DetailedHealthResponse)
    ),
    tag = "health"
)]
pub async fn detailed_health(
    State(state): State<AppState>,
) -> (StatusCode, Json<DetailedHealthResponse>) {
    let healthy = db::health_check(&state.db).await.is_ok();
    let backend = match state.db.get_database_backend() {
        DatabaseBackend::Postgres => "postgres",
        DatabaseBackend::Sqlite => "sqlite",
        _ => "other",
    };

    let status = if healthy {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };
    let body = DetailedHealthResponse {
        status: if healthy { "ok" } else { "degraded" }.to_string(),
        database: if healthy { "connected" } else { "disconnected" }.to_string(),
        backend: backend.to_string(),
        pool: db::pool_status(&state.db, state.config.db_max_connections),
        environment: state.config.environment.clone(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        realtime_tables: state.broadcaster.table_count().await,
    };

    (status, Json(body))
}
