//! # Pulse API Handlers
//!
//! Check-in tracking for data tables: configuration, check-ins, scanner sessions and the
//! live dashboard.

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
use crate::repositories::PulseRepository;
use crate::schemas::pulse::{
    CHECK_IN_PAGE, CheckInCreate, CheckInResponse, DashboardQuery, DashboardResponse,
    ListCheckInsQuery, ListSessionsQuery, PulseConfigResponse, PulseEnable, PulseUpdate,
    RECENT_CHECK_INS, ScannerSessionCreate, ScannerSessionResponse, ScannerSessionUpdate,
    check_in_rate,
};
use crate::schemas::{MessageResponse, Page};
use crate::server::AppState;

/// Enable Pulse on a table
#[utoipa::path(
    post,
    path = "/pulse",
    request_body = PulseEnable,
    responses(
        (status = 201, description = "Pulse enabled", body = PulseConfigResponse),
        (status = 400, description = "Check-in column outside the table", body = ApiError),
        (status = 404, description = "Data table not found", body = ApiError),
        (status = 409, description = "Pulse already enabled for this table", body = ApiError)
    ),
    tag = "pulse"
)]
pub async fn enable_pulse(
    State(state): State<AppState>,
    payload: Result<Json<PulseEnable>, JsonRejection>,
) -> Result<(StatusCode, Json<PulseConfigResponse>), ApiError> {
    let Json(payload) = payload?;

    let config = PulseRepository::new(&state.db).enable(payload).await?;
    Ok((StatusCode::CREATED, Json(config.into())))
}

#[utoipa::path(
    get,
    path = "/pulse/tables/{table_id}",
    params(("table_id" = Uuid, Path, description = "Data table ID")),
    responses(
        (status = 200, description = "Pulse configuration", body = PulseConfigResponse),
        (status = 404, description = "Pulse not enabled for this table", body = ApiError)
    ),
    tag = "pulse"
)]
pub async fn get_pulse(
    State(state): State<AppState>,
    Path(table_id): Path<Uuid>,
) -> Result<Json<PulseConfigResponse>, ApiError> {
    let config = PulseRepository::new(&state.db).get_by_table(table_id).await?;
    Ok(Json(config.into()))
}

#[utoipa::path(
    patch,
    path = "/pulse/tables/{table_id}",
    params(("table_id" = Uuid, Path, description = "Data table ID")),
    request_body = PulseUpdate,
    responses(
        (status = 200, description = "Configuration updated", body = PulseConfigResponse),
        (status = 400, description = "Validation failed", body = ApiError),
        (status = 404, description = "Pulse not enabled for this table", body = ApiError)
    ),
    tag = "pulse"
)]
pub async fn update_pulse(
    State(state): State<AppState>,
    Path(table_id): Path<Uuid>,
    payload: Result<Json<PulseUpdate>, JsonRejection>,
) -> Result<Json<PulseConfigResponse>, ApiError> {
    let Json(payload) = payload?;

    let config = PulseRepository::new(&state.db)
        .update(table_id, payload)
        .await?;
    Ok(Json(config.into()))
}

/// Disable Pulse; check-ins and scanner sessions go with the configuration
#[utoipa::path(
    delete,
    path = "/pulse/tables/{table_id}",
    params(("table_id" = Uuid, Path, description = "Data table ID")),
    responses(
        (status = 200, description = "Pulse disabled", body = MessageResponse),
        (status = 404, description = "Pulse not enabled for this table", body = ApiError)
    ),
    tag = "pulse"
)]
pub async fn disable_pulse(
    State(state): State<AppState>,
    Path(table_id): Path<Uuid>,
) -> Result<Json<MessageResponse>, ApiError> {
    PulseRepository::new(&state.db).disable(table_id).await?;
    Ok(Json(MessageResponse::new("Pulse disabled successfully")))
}

/// Recompute the counters from rows and check-ins
#[utoipa::path(
    post,
    path = "/pulse/tables/{table_id}/refresh-stats",
    params(("table_id" = Uuid, Path, description = "Data table ID")),
    responses(
        (status = 200, description = "Counters recomputed", body = PulseConfigResponse),
        (status = 404, description = "Pulse not enabled for this table", body = ApiError)
    ),
    tag = "pulse"
)]
pub async fn refresh_stats(
    State(state): State<AppState>,
    Path(table_id): Path<Uuid>,
) -> Result<Json<PulseConfigResponse>, ApiError> {
    let config = PulseRepository::new(&state.db).refresh_stats(table_id).await?;
    Ok(Json(config.into()))
}

/// Record a scan; a repeat scan of the same row is folded into its existing check-in
/// when duplicate scans are disallowed
#[utoipa::path(
    post,
    path = "/pulse/check-ins",
    request_body = CheckInCreate,
    responses(
        (status = 201, description = "Row checked in", body = CheckInResponse),
        (status = 200, description = "Repeat scan counted on the existing check-in", body = CheckInResponse),
        (status = 400, description = "Pulse not enabled or row outside the table", body = ApiError)
    ),
    tag = "pulse"
)]
pub async fn create_check_in(
    State(state): State<AppState>,
    payload: Result<Json<CheckInCreate>, JsonRejection>,
) -> Result<(StatusCode, Json<CheckInResponse>), ApiError> {
    let Json(payload) = payload?;

    let outcome = PulseRepository::new(&state.db)
        .create_check_in(payload)
        .await?;
    let status = if outcome.created {
        StatusCode::CREATED
    } else {
        StatusCode::OK
    };
    Ok((status, Json(outcome.check_in.into())))
}

#[utoipa::path(
    get,
    path = "/pulse/tables/{table_id}/check-ins",
    params(("table_id" = Uuid, Path, description = "Data table ID"), ListCheckInsQuery),
    responses(
        (status = 200, description = "Check-ins, newest first", body = [CheckInResponse]),
        (status = 400, description = "Invalid pagination", body = ApiError),
        (status = 404, description = "Pulse not enabled for this table", body = ApiError)
    ),
    tag = "pulse"
)]
pub async fn list_check_ins(
    State(state): State<AppState>,
    Path(table_id): Path<Uuid>,
    query: Result<Query<ListCheckInsQuery>, QueryRejection>,
) -> Result<Json<Vec<CheckInResponse>>, ApiError> {
    let Query(query) = query?;
    let page = Page::resolve(query.limit, query.offset, CHECK_IN_PAGE)?;

    let check_ins = PulseRepository::new(&state.db)
        .list_check_ins(table_id, page)
        .await?;
    Ok(Json(check_ins.into_iter().map(Into::into).collect()))
}

#[utoipa::path(
    get,
    path = "/pulse/check-ins/{check_in_id}",
    params(("check_in_id" = Uuid, Path, description = "Check-in ID")),
    responses(
        (status = 200, description = "Check-in", body = CheckInResponse),
        (status = 404, description = "Check-in not found", body = ApiError)
    ),
    tag = "pulse"
)]
pub async fn get_check_in(
    State(state): State<AppState>,
    Path(check_in_id): Path<Uuid>,
) -> Result<Json<CheckInResponse>, ApiError> {
    let check_in = PulseRepository::new(&state.db)
        .get_check_in(check_in_id)
        .await?;
    Ok(Json(check_in.into()))
}

#[utoipa::path(
    post,
    path = "/pulse/sessions",
    request_body = ScannerSessionCreate,
    responses(
        (status = 201, description = "Scanner session started", body = ScannerSessionResponse),
        (status = 400, description = "Validation failed", body = ApiError),
        (status = 404, description = "Pulse configuration not found", body = ApiError)
    ),
    tag = "pulse"
)]
pub async fn create_session(
    State(state): State<AppState>,
    payload: Result<Json<ScannerSessionCreate>, JsonRejection>,
) -> Result<(StatusCode, Json<ScannerSessionResponse>), ApiError> {
    let Json(payload) = payload?;

    let session = PulseRepository::new(&state.db).create_session(payload).await?;
    Ok((StatusCode::CREATED, Json(session.into())))
}

#[utoipa::path(
    get,
    path = "/pulse/tables/{table_id}/sessions",
    params(("table_id" = Uuid, Path, description = "Data table ID"), ListSessionsQuery),
    responses(
        (status = 200, description = "Scanner sessions, newest first", body = [ScannerSessionResponse]),
        (status = 404, description = "Pulse not enabled for this table", body = ApiError)
    ),
    tag = "pulse"
)]
pub async fn list_sessions(
    State(state): State<AppState>,
    Path(table_id): Path<Uuid>,
    query: Result<Query<ListSessionsQuery>, QueryRejection>,
) -> Result<Json<Vec<ScannerSessionResponse>>, ApiError> {
    let Query(query) = query?;

    let sessions = PulseRepository::new(&state.db)
        .list_sessions(table_id, query.active_only)
        .await?;
    Ok(Json(sessions.into_iter().map(Into::into).collect()))
}

#[utoipa::path(
    patch,
    path = "/pulse/sessions/{session_id}",
    params(("session_id" = Uuid, Path, description = "Scanner session ID")),
    request_body = ScannerSessionUpdate,
    responses(
        (status = 200, description = "Session updated", body = ScannerSessionResponse),
        (status = 404, description = "Scanner session not found", body = ApiError)
    ),
    tag = "pulse"
)]
pub async fn update_session(
    State(state): State<AppState>,
    Path(session_id): Path<Uuid>,
    payload: Result<Json<ScannerSessionUpdate>, JsonRejection>,
) -> Result<Json<ScannerSessionResponse>, ApiError> {
    let Json(payload) = payload?;

    let session = PulseRepository::new(&state.db)
        .update_session(session_id, payload)
        .await?;
    Ok(Json(session.into()))
}

#[utoipa::path(
    get,
    path = "/pulse/tables/{table_id}/dashboard",
    params(("table_id" = Uuid, Path, description = "Data table ID"), DashboardQuery),
    responses(
        (status = 200, description = "Live check-in statistics", body = DashboardResponse),
        (status = 400, description = "recent_limit out of range", body = ApiError),
        (status = 404, description = "Pulse not enabled for this table", body = ApiError)
    ),
    tag = "pulse"
)]
pub async fn dashboard(
    State(state): State<AppState>,
    Path(table_id): Path<Uuid>,
    query: Result<Query<DashboardQuery>, QueryRejection>,
) -> Result<Json<DashboardResponse>, ApiError> {
    let Query(query) = query?;
    let recent = Page::resolve(query.recent_limit, None, RECENT_CHECK_INS)?;

    let snapshot = PulseRepository::new(&state.db)
        .dashboard(table_id, recent.limit)
        .await?;
    let config = snapshot.config;

    Ok(Json(DashboardResponse {
        total_rsvps: config.total_rsvps,
        checked_in_count: config.checked_in_count,
        walk_in_count: config.walk_in_count,
        check_in_rate: check_in_rate(config.checked_in_count, config.total_rsvps),
        last_check_in_at: config.last_check_in_at,
        active_scanners: snapshot.active_scanners,
        recent_check_ins: snapshot
            .recent_check_ins
            .into_iter()
            .map(Into::into)
            .collect(),
    }))
}
