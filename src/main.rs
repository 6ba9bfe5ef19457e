//! # Workspace Hub Main Entry Point
//!
//! `serve` (the default) migrates the database and starts the API; `migrate` only applies
//! pending migrations.

use anyhow::Context;
use clap::{Parser, Subcommand};
use workspace_hub::{
    config::settings,
    db::init_pool,
    migration::{Migrator, MigratorTrait},
    server::run_server,
    telemetry::init_tracing,
};

#[derive(Debug, Parser)]
#[command(name = "workspace-hub", version, about = "Workspace hub API service")]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Apply pending migrations and serve the HTTP API
    Serve,
    /// Apply pending migrations and exit
    Migrate,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let config = settings().context("loading configuration")?;
    init_tracing(config).context("initializing telemetry")?;

    if let Ok(redacted_json) = config.redacted_json() {
        tracing::debug!(config = %redacted_json, "Loaded configuration");
    }
    tracing::info!(environment = %config.environment, "Configuration loaded");

    let db = init_pool(config)
        .await
        .context("initializing database connection pool")?;
    Migrator::up(&db, None)
        .await
        .context("applying database migrations")?;
    tracing::info!("Database migrations applied");

    match cli.command.unwrap_or(Command::Serve) {
        Command::Serve => run_server(config.clone(), db).await,
        Command::Migrate => Ok(()),
    }
}
