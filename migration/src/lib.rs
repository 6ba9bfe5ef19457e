//! Database migrations for the workspace hub.
//!
//! Migrations are ordered parent-first so every foreign key can be declared inline,
//! which SQLite requires.

pub use sea_orm_migration::prelude::*;

mod m2025_12_01_000100_create_organizations_and_workspaces;
mod m2025_12_01_000200_create_forms;
mod m2025_12_01_000300_create_data_tables;
mod m2025_12_01_000400_create_table_links;
mod m2025_12_01_000500_create_form_table_connections;
mod m2025_12_01_000600_create_request_hubs;
mod m2025_12_01_000700_create_pulse;
mod m2025_12_01_000800_create_scan_history;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m2025_12_01_000100_create_organizations_and_workspaces::Migration),
            Box::new(m2025_12_01_000200_create_forms::Migration),
            Box::new(m2025_12_01_000300_create_data_tables::Migration),
            Box::new(m2025_12_01_000400_create_table_links::Migration),
            Box::new(m2025_12_01_000500_create_form_table_connections::Migration),
            Box::new(m2025_12_01_000600_create_request_hubs::Migration),
            Box::new(m2025_12_01_000700_create_pulse::Migration),
            Box::new(m2025_12_01_000800_create_scan_history::Migration),
        ]
    }
}
