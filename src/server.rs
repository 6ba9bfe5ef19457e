//! # Server Configuration
//!
//! Router, shared state and OpenAPI document for the workspace hub API.

use std::sync::Arc;

use anyhow::Context;
use axum::{
    Router,
    http::HeaderValue,
    middleware,
    routing::{delete, get, patch, post},
};
use sea_orm::DatabaseConnection;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::config::AppConfig;
use crate::handlers::{
    self, data_tables, forms, health, organizations, pulse, realtime, request_hubs, rows,
    scan_history, table_links, views, workspaces,
};
use crate::realtime::TableBroadcaster;
use crate::telemetry::trace_id_middleware;

/// Application state containing shared resources
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub db: DatabaseConnection,
    pub broadcaster: TableBroadcaster,
}

impl AppState {
    pub fn new(config: AppConfig, db: DatabaseConnection) -> Self {
        Self {
            config: Arc::new(config),
            db,
            broadcaster: TableBroadcaster::new(),
        }
    }
}

/// Creates and configures the Axum application router
pub fn create_app(state: AppState) -> Router {
    let cors = cors_layer(&state.config);

    Router::new()
        .route("/", get(handlers::root))
        .route("/health", get(health::health))
        .route("/health/db", get(health::database_health))
        .route("/health/detailed", get(health::detailed_health))
        .merge(organization_routes())
        .merge(form_routes())
        .merge(data_table_routes())
        .merge(pulse_routes())
        .route(
            "/scan-history",
            get(scan_history::list_scans).post(scan_history::create_scan),
        )
        .route("/scan-history/{scan_id}", get(scan_history::get_scan))
        .route("/ws/tables/{table_id}", get(realtime::table_socket))
        .with_state(state)
        .merge(SwaggerUi::new("/docs").url("/openapi.json", ApiDoc::openapi()))
        .layer(middleware::from_fn(trace_id_middleware))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
}

fn organization_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/organizations",
            get(organizations::list_organizations).post(organizations::create_organization),
        )
        .route(
            "/organizations/{organization_id}",
            get(organizations::get_organization)
                .patch(organizations::update_organization)
                .delete(organizations::delete_organization),
        )
        .route(
            "/workspaces",
            get(workspaces::list_workspaces).post(workspaces::create_workspace),
        )
        .route(
            "/workspaces/{workspace_id}",
            get(workspaces::get_workspace)
                .patch(workspaces::update_workspace)
                .delete(workspaces::delete_workspace),
        )
        .route(
            "/workspaces/{workspace_id}/request-hubs",
            get(request_hubs::list_hubs).post(request_hubs::create_hub),
        )
        .route(
            "/workspaces/{workspace_id}/request-hubs/by-slug/{slug}",
            get(request_hubs::get_hub_by_slug),
        )
        .route(
            "/workspaces/{workspace_id}/request-hubs/{hub_id}",
            get(request_hubs::get_hub)
                .patch(request_hubs::update_hub)
                .delete(request_hubs::delete_hub),
        )
        .route(
            "/workspaces/{workspace_id}/request-hubs/{hub_id}/tabs",
            get(request_hubs::list_tabs).post(request_hubs::create_tab),
        )
        .route(
            "/workspaces/{workspace_id}/request-hubs/{hub_id}/tabs/reorder",
            post(request_hubs::reorder_tabs),
        )
        .route(
            "/workspaces/{workspace_id}/request-hubs/{hub_id}/tabs/{tab_id}",
            patch(request_hubs::update_tab).delete(request_hubs::delete_tab),
        )
}

fn form_routes() -> Router<AppState> {
    Router::new()
        .route("/forms", get(forms::list_forms).post(forms::create_form))
        .route(
            "/forms/{form_id}",
            get(forms::get_form)
                .patch(forms::update_form)
                .delete(forms::delete_form),
        )
        .route(
            "/forms/{form_id}/fields",
            get(forms::list_fields).post(forms::create_field),
        )
        .route(
            "/forms/{form_id}/fields/{field_id}",
            patch(forms::update_field).delete(forms::delete_field),
        )
        .route(
            "/forms/{form_id}/submissions",
            get(forms::list_submissions).post(forms::create_submission),
        )
        .route(
            "/forms/{form_id}/submissions/{submission_id}",
            get(forms::get_submission).patch(forms::review_submission),
        )
        .route(
            "/forms/{form_id}/connections",
            get(forms::list_connections).post(forms::create_connection),
        )
        .route(
            "/forms/{form_id}/connections/{connection_id}",
            delete(forms::delete_connection),
        )
}

fn data_table_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/data-tables",
            get(data_tables::list_tables).post(data_tables::create_table),
        )
        .route(
            "/data-tables/{table_id}",
            get(data_tables::get_table)
                .patch(data_tables::update_table)
                .put(data_tables::update_table)
                .delete(data_tables::delete_table),
        )
        .route(
            "/data-tables/{table_id}/columns",
            post(data_tables::create_column),
        )
        .route(
            "/data-tables/{table_id}/columns/{column_id}",
            patch(data_tables::update_column).delete(data_tables::delete_column),
        )
        .route(
            "/data-tables/{table_id}/columns/{column_id}/available-records",
            get(table_links::available_records),
        )
        .route("/data-tables/{table_id}/scan", post(data_tables::scan_table))
        .route(
            "/data-tables/{table_id}/rows",
            get(rows::list_rows).post(rows::create_row),
        )
        .route(
            "/data-tables/{table_id}/rows/bulk",
            post(rows::bulk_create_rows),
        )
        .route(
            "/data-tables/{table_id}/rows/{row_id}",
            get(rows::get_row)
                .patch(rows::update_row)
                .put(rows::update_row)
                .delete(rows::delete_row),
        )
        .route(
            "/data-tables/{table_id}/rows/{row_id}/comments",
            get(rows::list_comments).post(rows::create_comment),
        )
        .route(
            "/data-tables/{table_id}/rows/{row_id}/links",
            get(table_links::list_row_links).post(table_links::link_row),
        )
        .route(
            "/data-tables/{table_id}/rows/{row_id}/links/{target_row_id}",
            delete(table_links::unlink_row),
        )
        .route(
            "/data-tables/{table_id}/links",
            get(table_links::list_links).post(table_links::create_link),
        )
        .route(
            "/data-tables/{table_id}/views",
            get(views::list_views).post(views::create_view),
        )
        .route(
            "/data-tables/{table_id}/views/{view_id}",
            patch(views::update_view)
                .put(views::update_view)
                .delete(views::delete_view),
        )
}

fn pulse_routes() -> Router<AppState> {
    Router::new()
        .route("/pulse", post(pulse::enable_pulse))
        .route(
            "/pulse/tables/{table_id}",
            get(pulse::get_pulse)
                .patch(pulse::update_pulse)
                .delete(pulse::disable_pulse),
        )
        .route(
            "/pulse/tables/{table_id}/refresh-stats",
            post(pulse::refresh_stats),
        )
        .route(
            "/pulse/tables/{table_id}/check-ins",
            get(pulse::list_check_ins),
        )
        .route("/pulse/tables/{table_id}/sessions", get(pulse::list_sessions))
        .route("/pulse/tables/{table_id}/dashboard", get(pulse::dashboard))
        .route("/pulse/check-ins", post(pulse::create_check_in))
        .route("/pulse/check-ins/{check_in_id}", get(pulse::get_check_in))
        .route("/pulse/sessions", post(pulse::create_session))
        .route("/pulse/sessions/{session_id}", patch(pulse::update_session))
}

/// Any origin when none are configured; origins that are not valid header values are skipped.
fn cors_layer(config: &AppConfig) -> CorsLayer {
    let layer = CorsLayer::new().allow_methods(Any).allow_headers(Any);
    if config.cors_allowed_origins.is_empty() {
        return layer.allow_origin(Any);
    }

    let origins: Vec<HeaderValue> = config
        .cors_allowed_origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!(%origin, "Ignoring invalid CORS origin");
                None
            }
        })
        .collect();
    layer.allow_origin(AllowOrigin::list(origins))
}

/// Starts the server with the given configuration
pub async fn run_server(config: AppConfig, db: DatabaseConnection) -> anyhow::Result<()> {
    let addr = config
        .bind_addr()
        .with_context(|| format!("Invalid server address: {}", config.api_bind_addr))?;
    let environment = config.environment.clone();

    let app = create_app(AppState::new(config, db));

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;
    tracing::info!(%addr, %environment, "Server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(error) = tokio::signal::ctrl_c().await {
            tracing::error!(%error, "Failed to listen for Ctrl-C");
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(error) => {
                tracing::error!(%error, "Failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
    tracing::info!("Shutdown signal received");
}

/// OpenAPI documentation
#[derive(OpenApi)]
#[openapi(
    paths(
        crate::handlers::root,
        crate::handlers::health::health,
        crate::handlers::health::database_health,
        crate::handlers::health::detailed_health,
        crate::handlers::organizations::list_organizations,
        crate::handlers::organizations::create_organization,
        crate::handlers::organizations::get_organization,
        crate::handlers::organizations::update_organization,
        crate::handlers::organizations::delete_organization,
        crate::handlers::workspaces::list_workspaces,
        crate::handlers::workspaces::create_workspace,
        crate::handlers::workspaces::get_workspace,
        crate::handlers::workspaces::update_workspace,
        crate::handlers::workspaces::delete_workspace,
        crate::handlers::request_hubs::list_hubs,
        crate::handlers::request_hubs::create_hub,
        crate::handlers::request_hubs::get_hub,
        crate::handlers::request_hubs::get_hub_by_slug,
        crate::handlers::request_hubs::update_hub,
        crate::handlers::request_hubs::delete_hub,
        crate::handlers::request_hubs::list_tabs,
        crate::handlers::request_hubs::create_tab,
        crate::handlers::request_hubs::update_tab,
        crate::handlers::request_hubs::delete_tab,
        crate::handlers::request_hubs::reorder_tabs,
        crate::handlers::forms::list_forms,
        crate::handlers::forms::create_form,
        crate::handlers::forms::get_form,
        crate::handlers::forms::update_form,
        crate::handlers::forms::delete_form,
        crate::handlers::forms::list_fields,
        crate::handlers::forms::create_field,
        crate::handlers::forms::update_field,
        crate::handlers::forms::delete_field,
        crate::handlers::forms::list_submissions,
        crate::handlers::forms::create_submission,
        crate::handlers::forms::get_submission,
        crate::handlers::forms::review_submission,
        crate::handlers::forms::list_connections,
        crate::handlers::forms::create_connection,
        crate::handlers::forms::delete_connection,
        crate::handlers::data_tables::list_tables,
        crate::handlers::data_tables::create_table,
        crate::handlers::data_tables::get_table,
        crate::handlers::data_tables::update_table,
        crate::handlers::data_tables::delete_table,
        crate::handlers::data_tables::create_column,
        crate::handlers::data_tables::update_column,
        crate::handlers::data_tables::delete_column,
        crate::handlers::data_tables::scan_table,
        crate::handlers::rows::list_rows,
        crate::handlers::rows::create_row,
        crate::handlers::rows::bulk_create_rows,
        crate::handlers::rows::get_row,
        crate::handlers::rows::update_row,
        crate::handlers::rows::delete_row,
        crate::handlers::rows::list_comments,
        crate::handlers::rows::create_comment,
        crate::handlers::views::list_views,
        crate::handlers::views::create_view,
        crate::handlers::views::update_view,
        crate::handlers::views::delete_view,
        crate::handlers::table_links::list_links,
        crate::handlers::table_links::create_link,
        crate::handlers::table_links::list_row_links,
        crate::handlers::table_links::link_row,
        crate::handlers::table_links::unlink_row,
        crate::handlers::table_links::available_records,
        crate::handlers::pulse::enable_pulse,
        crate::handlers::pulse::get_pulse,
        crate::handlers::pulse::update_pulse,
        crate::handlers::pulse::disable_pulse,
        crate::handlers::pulse::refresh_stats,
        crate::handlers::pulse::create_check_in,
        crate::handlers::pulse::list_check_ins,
        crate::handlers::pulse::get_check_in,
        crate::handlers::pulse::create_session,
        crate::handlers::pulse::list_sessions,
        crate::handlers::pulse::update_session,
        crate::handlers::pulse::dashboard,
        crate::handlers::scan_history::create_scan,
        crate::handlers::scan_history::list_scans,
        crate::handlers::scan_history::get_scan,
        crate::handlers::realtime::table_socket,
    ),
    components(
        schemas(
            crate::models::ServiceInfo,
            crate::error::ApiError,
            crate::db::PoolStatus,
            crate::handlers::health::HealthResponse,
            crate::handlers::health::DatabaseHealthResponse,
            crate::handlers::health::DetailedHealthResponse,
            crate::schemas::MessageResponse,
            crate::schemas::organization::OrganizationCreate,
            crate::schemas::organization::OrganizationUpdate,
            crate::schemas::organization::OrganizationResponse,
            crate::schemas::organization::WorkspaceCreate,
            crate::schemas::organization::WorkspaceUpdate,
            crate::schemas::organization::WorkspaceResponse,
            crate::schemas::request_hub::RequestHubCreate,
            crate::schemas::request_hub::RequestHubUpdate,
            crate::schemas::request_hub::RequestHubResponse,
            crate::schemas::request_hub::HubTabCreate,
            crate::schemas::request_hub::HubTabUpdate,
            crate::schemas::request_hub::HubTabResponse,
            crate::schemas::request_hub::TabPosition,
            crate::schemas::request_hub::TabReorder,
            crate::schemas::form::FormCreate,
            crate::schemas::form::FormUpdate,
            crate::schemas::form::FormResponse,
            crate::schemas::form::FormFieldCreate,
            crate::schemas::form::FormFieldUpdate,
            crate::schemas::form::FormFieldResponse,
            crate::schemas::form::SubmissionCreate,
            crate::schemas::form::SubmissionReview,
            crate::schemas::form::SubmissionResponse,
            crate::schemas::form::FormConnectionCreate,
            crate::schemas::form::FormConnectionResponse,
            crate::schemas::data_table::DataTableCreate,
            crate::schemas::data_table::DataTableUpdate,
            crate::schemas::data_table::DataTableResponse,
            crate::schemas::data_table::ColumnCreate,
            crate::schemas::data_table::ColumnUpdate,
            crate::schemas::data_table::ColumnResponse,
            crate::schemas::data_table::ViewCreate,
            crate::schemas::data_table::ViewUpdate,
            crate::schemas::data_table::ViewResponse,
            crate::schemas::row::RowCreate,
            crate::schemas::row::RowUpdate,
            crate::schemas::row::RowBulkCreate,
            crate::schemas::row::RowResponse,
            crate::schemas::row::CommentCreate,
            crate::schemas::row::CommentResponse,
            crate::schemas::link::TableLinkCreate,
            crate::schemas::link::TableLinkResponse,
            crate::schemas::link::RowLinkRequest,
            crate::schemas::link::RowLinkMutationResponse,
            crate::schemas::link::LinkedRecord,
            crate::schemas::link::LinkedRecordsResponse,
            crate::schemas::link::AvailableRecord,
            crate::schemas::link::AvailableRecordsResponse,
            crate::schemas::pulse::PulseEnable,
            crate::schemas::pulse::PulseUpdate,
            crate::schemas::pulse::PulseConfigResponse,
            crate::schemas::pulse::CheckInCreate,
            crate::schemas::pulse::CheckInResponse,
            crate::schemas::pulse::ScannerSessionCreate,
            crate::schemas::pulse::ScannerSessionUpdate,
            crate::schemas::pulse::ScannerSessionResponse,
            crate::schemas::pulse::DashboardResponse,
            crate::schemas::scan::ScanRecordCreate,
            crate::schemas::scan::ScanRecordResponse,
            crate::schemas::scan::TableScanRequest,
            crate::schemas::scan::TableScanResponse,
        )
    ),
    tags(
        (name = "health", description = "Service and database health"),
        (name = "organizations", description = "Organizations"),
        (name = "workspaces", description = "Workspaces within an organization"),
        (name = "request-hubs", description = "Request hubs and their tabs"),
        (name = "forms", description = "Forms, fields, submissions and table connections"),
        (name = "data-tables", description = "Data tables and columns"),
        (name = "rows", description = "Table rows and comments"),
        (name = "views", description = "Saved table views"),
        (name = "links", description = "Table links and row links"),
        (name = "pulse", description = "Check-in tracking"),
        (name = "scan-history", description = "Barcode scan log"),
        (name = "realtime", description = "Table WebSocket subscriptions"),
    ),
    info(
        title = "Workspace Hub API",
        description = "Workspaces, forms, data tables, request hubs and check-in tracking",
        version = env!("CARGO_PKG_VERSION"),
    )
)]
pub struct ApiDoc;
