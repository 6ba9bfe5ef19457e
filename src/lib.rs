//! # Workspace Hub Library
//!
//! Multi-tenant workspace backend: organizations and workspaces, form builder with
//! table write-back, spreadsheet-style data tables with row links, request hubs,
//! Pulse check-in tracking and per-table realtime fan-out.

pub mod config;
pub mod db;
pub mod error;
pub mod handlers;
pub mod models;
pub mod realtime;
pub mod repositories;
pub mod schemas;
pub mod server;
pub mod slug;
pub mod telemetry;
pub use migration;
