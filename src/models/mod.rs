//! # Data Models
//!
//! SeaORM entities for every persisted table of the workspace hub.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

pub mod data_table;
pub mod form;
pub mod form_field;
pub mod form_submission;
pub mod form_table_connection;
pub mod organization;
pub mod pulse_check_in;
pub mod pulse_enabled_table;
pub mod pulse_scanner_session;
pub mod request_hub;
pub mod request_hub_tab;
pub mod scan_history;
pub mod table_column;
pub mod table_comment;
pub mod table_link;
pub mod table_row;
pub mod table_row_link;
pub mod table_view;
pub mod workspace;

pub use data_table::Entity as DataTable;
pub use form::Entity as Form;
pub use form_field::Entity as FormField;
pub use form_submission::Entity as FormSubmission;
pub use form_table_connection::Entity as FormTableConnection;
pub use organization::Entity as Organization;
pub use pulse_check_in::Entity as PulseCheckIn;
pub use pulse_enabled_table::Entity as PulseEnabledTable;
pub use pulse_scanner_session::Entity as PulseScannerSession;
pub use request_hub::Entity as RequestHub;
pub use request_hub_tab::Entity as RequestHubTab;
pub use scan_history::Entity as ScanHistory;
pub use table_column::Entity as TableColumn;
pub use table_comment::Entity as TableComment;
pub use table_link::Entity as TableLink;
pub use table_row::Entity as TableRow;
pub use table_row_link::Entity as TableRowLink;
pub use table_view::Entity as TableView;
pub use workspace::Entity as Workspace;

/// Basic service information response
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ServiceInfo {
    /// The name of the service
    pub service: String,
    /// The version of the service
    pub version: String,
}

impl Default for ServiceInfo {
    fn default() -> Self {
        Self {
            service: "workspace-hub".to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }
}
