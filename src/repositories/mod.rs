//! # Repository Layer
//!
//! Repositories encapsulate the SeaORM queries and multi-statement transactions behind
//! each aggregate. Every method returns [`RepositoryError`](crate::error::RepositoryError)
//! so handlers can propagate failures with `?`.

use chrono::Utc;
use sea_orm::prelude::DateTimeWithTimeZone;
use sea_orm::sea_query::{NullOrdering, Order};
use sea_orm::{ConnectionTrait, DatabaseBackend, EntityTrait, QueryOrder, QuerySelect, Select};

use crate::models::TableRow;
use crate::models::table_row::Column as RowColumn;

pub mod data_table;
pub mod form;
pub mod organization;
pub mod pulse;
pub mod request_hub;
pub mod scan_history;
pub mod table_link;
pub mod table_row;
pub mod table_view;
pub mod workspace;

pub use data_table::DataTableRepository;
pub use form::FormRepository;
pub use organization::OrganizationRepository;
pub use pulse::PulseRepository;
pub use request_hub::RequestHubRepository;
pub use scan_history::ScanHistoryRepository;
pub use table_link::TableLinkRepository;
pub use table_row::TableRowRepository;
pub use table_view::TableViewRepository;
pub use workspace::WorkspaceRepository;

pub(crate) fn now() -> DateTimeWithTimeZone {
    Utc::now().into()
}

/// Row display order: position with unpositioned rows last, then creation time
pub(crate) fn in_row_order(select: Select<TableRow>) -> Select<TableRow> {
    select
        .order_by_with_nulls(RowColumn::Position, Order::Asc, NullOrdering::Last)
        .order_by_asc(RowColumn::CreatedAt)
}

/// Adds `FOR UPDATE` on backends with row locks. SQLite already serializes writers.
pub(crate) fn for_update<E, C>(select: Select<E>, conn: &C) -> Select<E>
where
    E: EntityTrait,
    C: ConnectionTrait,
{
    match conn.get_database_backend() {
        DatabaseBackend::Postgres | DatabaseBackend::MySql => select.lock_exclusive(),
        _ => select,
    }
}

/// Slug to store after an update: an explicit slug wins, a rename regenerates it, otherwise
/// the current slug is kept.
pub(crate) fn updated_slug(
    current_name: &str,
    new_name: Option<&str>,
    new_slug: Option<&str>,
) -> Result<Option<String>, crate::error::RepositoryError> {
    match (new_name, new_slug) {
        (_, Some(slug)) => {
            crate::slug::resolve_slug(new_name.unwrap_or(current_name), Some(slug)).map(Some)
        }
        (Some(name), None) if name.trim() != current_name => {
            crate::slug::resolve_slug(name, None).map(Some)
        }
        _ => Ok(None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rename_regenerates_slug_unless_given() {
        assert_eq!(
            updated_slug("Guests", Some("VIP Guests"), None).unwrap(),
            Some("vip-guests".to_string())
        );
        assert_eq!(
            updated_slug("Guests", Some("VIP Guests"), Some("vips")).unwrap(),
            Some("vips".to_string())
        );
        assert_eq!(updated_slug("Guests", None, None).unwrap(), None);
        assert_eq!(updated_slug("Guests", Some("Guests"), None).unwrap(), None);
    }
}
