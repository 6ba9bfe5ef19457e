//! # Table Link Repository
//!
//! Row-to-row links between data tables. `TableRowLink` rows are the source of truth; the
//! source row's JSON data keeps a mirror of the linked target ids under the link column's
//! name so clients that only read the data map keep working.
//!
//! Every link mutation runs in one transaction with the source row locked, and rebuilds the
//! mirror from `TableRowLink` instead of patching the JSON array in place.

use std::collections::HashSet;

use sea_orm::sea_query::OnConflict;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, ConnectionTrait, DatabaseConnection, EntityTrait,
    IntoActiveModel, PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, Set, TransactionTrait,
};
use serde_json::{Map, Value};
use uuid::Uuid;

use super::data_table::find_table;
use super::{for_update, in_row_order, now};
use crate::error::RepositoryError;
use crate::models::table_column::{self, Entity as TableColumn};
use crate::models::table_link::{self, Entity as TableLink, LINK_TYPES};
use crate::models::table_row::{self, Entity as TableRow};
use crate::models::table_row_link::{self, Entity as TableRowLink};
use crate::schemas::Page;
use crate::schemas::common::require_choice;
use crate::schemas::link::{AvailableRecord, TableLinkCreate};

/// Outcome of a link or unlink on one source row
#[derive(Debug, Clone)]
pub struct LinkMutation {
    /// The source row after its JSON mirror was rebuilt
    pub row: table_row::Model,
    pub column: table_column::Model,
    /// Linked target ids in link order
    pub links: Vec<String>,
    /// False when the pair already existed (link) or was already absent (unlink)
    pub changed: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LinkAction {
    Link,
    Unlink,
}

/// Repository for TableLink and TableRowLink operations
pub struct TableLinkRepository<'a> {
    db: &'a DatabaseConnection,
}

impl<'a> TableLinkRepository<'a> {
    pub fn new(db: &'a DatabaseConnection) -> Self {
        Self { db }
    }

    /// Links where the table is the source or the target
    pub async fn list_links(&self, table_id: Uuid) -> Result<Vec<table_link::Model>, RepositoryError> {
        find_table(self.db, table_id).await?;

        let links = TableLink::find()
            .filter(
                Condition::any()
                    .add(table_link::Column::SourceTableId.eq(table_id))
                    .add(table_link::Column::TargetTableId.eq(table_id)),
            )
            .order_by_asc(table_link::Column::CreatedAt)
            .all(self.db)
            .await?;
        Ok(links)
    }

    /// Creates the link definition for a `link` column
    pub async fn create_link(
        &self,
        table_id: Uuid,
        request: TableLinkCreate,
    ) -> Result<table_link::Model, RepositoryError> {
        find_table(self.db, table_id).await?;
        let column = TableColumn::find_by_id(request.source_column_id)
            .filter(table_column::Column::TableId.eq(table_id))
            .one(self.db)
            .await?
            .filter(|column| column.is_link())
            .ok_or_else(invalid_link_column)?;

        find_table(self.db, request.target_table_id).await?;
        if let Some(target_column_id) = request.target_column_id {
            let belongs = TableColumn::find_by_id(target_column_id)
                .filter(table_column::Column::TableId.eq(request.target_table_id))
                .one(self.db)
                .await?
                .is_some();
            if !belongs {
                return Err(RepositoryError::validation_error(
                    "Target column does not belong to the target table",
                ));
            }
        }
        match column.linked_table_id {
            Some(linked) if linked != request.target_table_id => {
                return Err(RepositoryError::validation_error(
                    "Column is already linked to a different table",
                ));
            }
            _ => {}
        }

        let link_type = request
            .link_type
            .unwrap_or_else(|| "one_to_many".to_string());
        require_choice(&link_type, LINK_TYPES, "link_type")?;

        let existing = TableLink::find()
            .filter(table_link::Column::SourceColumnId.eq(column.id))
            .one(self.db)
            .await?;
        if existing.is_some() {
            return Err(RepositoryError::conflict("A link already exists for this column"));
        }

        let txn = self.db.begin().await?;
        let link = table_link::ActiveModel {
            id: Set(Uuid::new_v4()),
            source_table_id: Set(table_id),
            source_column_id: Set(column.id),
            target_table_id: Set(request.target_table_id),
            target_column_id: Set(request.target_column_id),
            link_type: Set(link_type),
            settings: Set(request.settings),
            created_at: Set(now()),
        }
        .insert(&txn)
        .await?;

        if column.linked_table_id.is_none() {
            let mut active = column.into_active_model();
            active.linked_table_id = Set(Some(request.target_table_id));
            active.updated_at = Set(now());
            active.update(&txn).await?;
        }
        txn.commit().await?;

        Ok(link)
    }

    /// Links `target_row_id` to the row through a `link` column; linking twice is a no-op
    pub async fn link_row(
        &self,
        table_id: Uuid,
        row_id: Uuid,
        column_id: Uuid,
        target_row_id: Uuid,
    ) -> Result<LinkMutation, RepositoryError> {
        self.mutate(table_id, row_id, column_id, target_row_id, LinkAction::Link)
            .await
    }

    /// Removes a link; removing a pair that is not linked is a no-op
    pub async fn unlink_row(
        &self,
        table_id: Uuid,
        row_id: Uuid,
        column_id: Uuid,
        target_row_id: Uuid,
    ) -> Result<LinkMutation, RepositoryError> {
        self.mutate(table_id, row_id, column_id, target_row_id, LinkAction::Unlink)
            .await
    }

    async fn mutate(
        &self,
        table_id: Uuid,
        row_id: Uuid,
        column_id: Uuid,
        target_row_id: Uuid,
        action: LinkAction,
    ) -> Result<LinkMutation, RepositoryError> {
        let txn = self.db.begin().await?;

        let select = TableRow::find_by_id(row_id).filter(table_row::Column::TableId.eq(table_id));
        let row = for_update(select, &txn)
            .one(&txn)
            .await?
            .ok_or_else(|| RepositoryError::not_found("Row"))?;

        let (column, linked_table_id) = link_column(&txn, table_id, column_id).await?;

        if action == LinkAction::Link {
            let target = TableRow::find_by_id(target_row_id)
                .one(&txn)
                .await?
                .ok_or_else(|| RepositoryError::not_found("Target row"))?;
            if target.table_id != linked_table_id {
                return Err(RepositoryError::validation_error(
                    "Target row does not belong to the linked table",
                ));
            }
        }

        let link = link_for_column(&txn, &column, linked_table_id).await?;
        adopt_legacy_links(&txn, &link, &row, &column.name).await?;

        let pair = Condition::all()
            .add(table_row_link::Column::LinkId.eq(link.id))
            .add(table_row_link::Column::SourceRowId.eq(row.id))
            .add(table_row_link::Column::TargetRowId.eq(target_row_id));

        let changed = match action {
            LinkAction::Link => {
                let existing = TableRowLink::find().filter(pair).one(&txn).await?;
                if existing.is_none() {
                    insert_row_link(&txn, link.id, row.id, target_row_id).await?;
                }
                existing.is_none()
            }
            LinkAction::Unlink => {
                let result = TableRowLink::delete_many().filter(pair).exec(&txn).await?;
                result.rows_affected > 0
            }
        };

        let (row, links) = rebuild_link_mirror(&txn, row, link.id, &column.name).await?;
        txn.commit().await?;

        tracing::debug!(
            %table_id,
            %row_id,
            %target_row_id,
            ?action,
            changed,
            "Row link mutation applied"
        );

        Ok(LinkMutation {
            row,
            column,
            links,
            changed,
        })
    }

    /// Target rows linked from a row, in link order, with the total count
    pub async fn list_row_links(
        &self,
        table_id: Uuid,
        row_id: Uuid,
        column_id: Option<Uuid>,
        page: Page,
    ) -> Result<(Vec<table_row::Model>, u64), RepositoryError> {
        TableRow::find_by_id(row_id)
            .filter(table_row::Column::TableId.eq(table_id))
            .one(self.db)
            .await?
            .ok_or_else(|| RepositoryError::not_found("Row"))?;

        let mut links = TableLink::find().filter(table_link::Column::SourceTableId.eq(table_id));
        if let Some(column_id) = column_id {
            links = links.filter(table_link::Column::SourceColumnId.eq(column_id));
        }
        let link_ids: Vec<Uuid> = links.all(self.db).await?.into_iter().map(|l| l.id).collect();
        if link_ids.is_empty() {
            return Ok((Vec::new(), 0));
        }

        let row_links = TableRowLink::find()
            .filter(table_row_link::Column::LinkId.is_in(link_ids))
            .filter(table_row_link::Column::SourceRowId.eq(row_id));
        let total = row_links.clone().count(self.db).await?;
        let target_ids: Vec<Uuid> = row_links
            .order_by_asc(table_row_link::Column::CreatedAt)
            .limit(page.limit)
            .offset(page.offset)
            .all(self.db)
            .await?
            .into_iter()
            .map(|row_link| row_link.target_row_id)
            .collect();

        let mut targets = TableRow::find()
            .filter(table_row::Column::Id.is_in(target_ids.clone()))
            .all(self.db)
            .await?;
        targets.sort_by_key(|row| target_ids.iter().position(|id| *id == row.id));

        Ok((targets, total))
    }

    /// Candidate rows of a link column's target table, with the total after filtering
    pub async fn available_records(
        &self,
        table_id: Uuid,
        column_id: Uuid,
        search: Option<&str>,
        row_id: Option<Uuid>,
        page: Page,
    ) -> Result<(Vec<AvailableRecord>, u64), RepositoryError> {
        let (column, linked_table_id) = link_column(self.db, table_id, column_id).await?;

        let mut linked: HashSet<Uuid> = HashSet::new();
        if let Some(row_id) = row_id {
            let link = TableLink::find()
                .filter(table_link::Column::SourceColumnId.eq(column.id))
                .one(self.db)
                .await?;
            if let Some(link) = link {
                linked = TableRowLink::find()
                    .filter(table_row_link::Column::LinkId.eq(link.id))
                    .filter(table_row_link::Column::SourceRowId.eq(row_id))
                    .all(self.db)
                    .await?
                    .into_iter()
                    .map(|row_link| row_link.target_row_id)
                    .collect();
            }
        }

        let needle = search
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_lowercase);
        let select = TableRow::find()
            .filter(table_row::Column::TableId.eq(linked_table_id))
            .filter(table_row::Column::IsArchived.eq(false));
        let candidates: Vec<table_row::Model> = in_row_order(select)
            .all(self.db)
            .await?
            .into_iter()
            .filter(|row| match &needle {
                Some(needle) => matches_search(&row.data, needle),
                None => true,
            })
            .collect();

        let total = candidates.len() as u64;
        let records = candidates
            .into_iter()
            .skip(page.offset as usize)
            .take(page.limit as usize)
            .map(|row| AvailableRecord {
                id: row.id,
                display_name: display_name(row.id, &row.data),
                is_linked: linked.contains(&row.id),
                data: row.data,
                created_at: row.created_at,
            })
            .collect();

        Ok((records, total))
    }
}

fn invalid_link_column() -> RepositoryError {
    RepositoryError::validation_error("Invalid link column")
}

/// A column of `table_id` that is a `link` column with a target table
async fn link_column<C: ConnectionTrait>(
    conn: &C,
    table_id: Uuid,
    column_id: Uuid,
) -> Result<(table_column::Model, Uuid), RepositoryError> {
    let column = TableColumn::find_by_id(column_id)
        .filter(table_column::Column::TableId.eq(table_id))
        .one(conn)
        .await?
        .filter(|column| column.is_link())
        .ok_or_else(invalid_link_column)?;

    match column.linked_table_id {
        Some(linked_table_id) => Ok((column, linked_table_id)),
        None => Err(invalid_link_column()),
    }
}

async fn link_for_column<C: ConnectionTrait>(
    conn: &C,
    column: &table_column::Model,
    linked_table_id: Uuid,
) -> Result<table_link::Model, RepositoryError> {
    let existing = TableLink::find()
        .filter(table_link::Column::SourceColumnId.eq(column.id))
        .one(conn)
        .await?;
    match existing {
        Some(link) => Ok(link),
        None => insert_link_if_absent(conn, column, linked_table_id).await,
    }
}

/// Inserts the link definition for `column` unless a concurrent writer already did, then
/// reads back whichever definition won.
async fn insert_link_if_absent<C: ConnectionTrait>(
    conn: &C,
    column: &table_column::Model,
    linked_table_id: Uuid,
) -> Result<table_link::Model, RepositoryError> {
    let link = table_link::ActiveModel {
        id: Set(Uuid::new_v4()),
        source_table_id: Set(column.table_id),
        source_column_id: Set(column.id),
        target_table_id: Set(linked_table_id),
        target_column_id: Set(column.linked_column_id),
        link_type: Set("one_to_many".to_string()),
        settings: Set(Value::Object(Map::new())),
        created_at: Set(now()),
    };
    let inserted = TableLink::insert(link)
        .on_conflict(
            OnConflict::column(table_link::Column::SourceColumnId)
                .do_nothing()
                .to_owned(),
        )
        .exec_without_returning(conn)
        .await?;
    if inserted == 0 {
        tracing::debug!(column_id = %column.id, "Link definition created concurrently");
    }

    TableLink::find()
        .filter(table_link::Column::SourceColumnId.eq(column.id))
        .one(conn)
        .await?
        .ok_or_else(|| RepositoryError::not_found("Table link"))
}

async fn insert_row_link<C: ConnectionTrait>(
    conn: &C,
    link_id: Uuid,
    source_row_id: Uuid,
    target_row_id: Uuid,
) -> Result<(), RepositoryError> {
    table_row_link::ActiveModel {
        id: Set(Uuid::new_v4()),
        link_id: Set(link_id),
        source_row_id: Set(source_row_id),
        target_row_id: Set(target_row_id),
        metadata: Set(Value::Object(Map::new())),
        created_at: Set(now()),
    }
    .insert(conn)
    .await?;
    Ok(())
}

/// Ids stored in the JSON map before link rows existed become real links, as long as they
/// still point at rows of the target table.
async fn adopt_legacy_links<C: ConnectionTrait>(
    conn: &C,
    link: &table_link::Model,
    row: &table_row::Model,
    column_name: &str,
) -> Result<(), RepositoryError> {
    let stored: Vec<Uuid> = mirrored_ids(row.data.get(column_name))
        .iter()
        .filter_map(|id| Uuid::parse_str(id).ok())
        .collect();
    if stored.is_empty() {
        return Ok(());
    }

    let known: HashSet<Uuid> = TableRowLink::find()
        .filter(table_row_link::Column::LinkId.eq(link.id))
        .filter(table_row_link::Column::SourceRowId.eq(row.id))
        .all(conn)
        .await?
        .into_iter()
        .map(|row_link| row_link.target_row_id)
        .collect();
    let missing: Vec<Uuid> = stored.into_iter().filter(|id| !known.contains(id)).collect();
    if missing.is_empty() {
        return Ok(());
    }

    let valid: HashSet<Uuid> = TableRow::find()
        .filter(table_row::Column::Id.is_in(missing.clone()))
        .filter(table_row::Column::TableId.eq(link.target_table_id))
        .all(conn)
        .await?
        .into_iter()
        .map(|target| target.id)
        .collect();

    let mut adopted = HashSet::new();
    for target_id in missing {
        if valid.contains(&target_id) && adopted.insert(target_id) {
            insert_row_link(conn, link.id, row.id, target_id).await?;
        }
    }
    Ok(())
}

/// Rewrites `row.data[column_name]` as the list of linked target ids read back from
/// `TableRowLink` in insertion order.
pub(crate) async fn rebuild_link_mirror<C: ConnectionTrait>(
    conn: &C,
    row: table_row::Model,
    link_id: Uuid,
    column_name: &str,
) -> Result<(table_row::Model, Vec<String>), RepositoryError> {
    let links: Vec<String> = TableRowLink::find()
        .filter(table_row_link::Column::LinkId.eq(link_id))
        .filter(table_row_link::Column::SourceRowId.eq(row.id))
        .order_by_asc(table_row_link::Column::CreatedAt)
        .all(conn)
        .await?
        .into_iter()
        .map(|row_link| row_link.target_row_id.to_string())
        .collect();

    let mut data = match &row.data {
        Value::Object(map) => map.clone(),
        _ => Map::new(),
    };
    data.insert(
        column_name.to_string(),
        Value::Array(links.iter().cloned().map(Value::String).collect()),
    );

    let mut active = row.into_active_model();
    active.data = Set(Value::Object(data));
    active.updated_at = Set(now());
    let row = active.update(conn).await?;

    Ok((row, links))
}

/// Removes every link pointing at `target_row_id` and rebuilds the mirrors of the rows that
/// pointed at it. Returns the rebuilt source rows.
pub(crate) async fn detach_target_row<C: ConnectionTrait>(
    conn: &C,
    target_row_id: Uuid,
) -> Result<Vec<table_row::Model>, RepositoryError> {
    let incoming = TableRowLink::find()
        .filter(table_row_link::Column::TargetRowId.eq(target_row_id))
        .all(conn)
        .await?;

    TableRowLink::delete_many()
        .filter(
            Condition::any()
                .add(table_row_link::Column::SourceRowId.eq(target_row_id))
                .add(table_row_link::Column::TargetRowId.eq(target_row_id)),
        )
        .exec(conn)
        .await?;

    let mut seen = HashSet::new();
    let mut rebuilt = Vec::new();
    for row_link in incoming {
        if row_link.source_row_id == target_row_id
            || !seen.insert((row_link.link_id, row_link.source_row_id))
        {
            continue;
        }
        let Some(link) = TableLink::find_by_id(row_link.link_id).one(conn).await? else {
            continue;
        };
        let Some(column) = TableColumn::find_by_id(link.source_column_id).one(conn).await? else {
            continue;
        };
        let Some(source) = TableRow::find_by_id(row_link.source_row_id).one(conn).await? else {
            continue;
        };
        let (row, _) = rebuild_link_mirror(conn, source, link.id, &column.name).await?;
        rebuilt.push(row);
    }

    Ok(rebuilt)
}

/// Removes every link from a row outside `table_ids` into a row of those tables, ahead of
/// deleting the tables, and rebuilds the affected mirrors. Returns the rebuilt source rows,
/// one entry per row.
pub(crate) async fn detach_target_tables<C: ConnectionTrait>(
    conn: &C,
    table_ids: &[Uuid],
) -> Result<Vec<table_row::Model>, RepositoryError> {
    if table_ids.is_empty() {
        return Ok(Vec::new());
    }

    let incoming_links = TableLink::find()
        .filter(table_link::Column::TargetTableId.is_in(table_ids.to_vec()))
        .filter(table_link::Column::SourceTableId.is_not_in(table_ids.to_vec()))
        .all(conn)
        .await?;

    let mut rebuilt: Vec<table_row::Model> = Vec::new();
    for link in incoming_links {
        let source_ids: Vec<Uuid> = TableRowLink::find()
            .filter(table_row_link::Column::LinkId.eq(link.id))
            .all(conn)
            .await?
            .into_iter()
            .map(|row_link| row_link.source_row_id)
            .collect();
        TableRowLink::delete_many()
            .filter(table_row_link::Column::LinkId.eq(link.id))
            .exec(conn)
            .await?;

        let Some(column) = TableColumn::find_by_id(link.source_column_id).one(conn).await? else {
            continue;
        };
        let sources = TableRow::find()
            .filter(table_row::Column::Id.is_in(source_ids))
            .all(conn)
            .await?;
        for source in sources {
            // A row with two link columns into the deleted tables is rebuilt twice; keep the last.
            let source = match rebuilt.iter().position(|row| row.id == source.id) {
                Some(index) => rebuilt.remove(index),
                None => source,
            };
            let (row, _) = rebuild_link_mirror(conn, source, link.id, &column.name).await?;
            rebuilt.push(row);
        }
    }

    Ok(rebuilt)
}

/// Re-applies the link mirrors of `row` after its data map was replaced. A link column is
/// rewritten when the row has links through it or the new data carries its key.
pub(crate) async fn restore_link_mirrors<C: ConnectionTrait>(
    conn: &C,
    mut row: table_row::Model,
) -> Result<table_row::Model, RepositoryError> {
    let links = TableLink::find()
        .filter(table_link::Column::SourceTableId.eq(row.table_id))
        .all(conn)
        .await?;

    for link in links {
        let Some(column) = TableColumn::find_by_id(link.source_column_id).one(conn).await? else {
            continue;
        };
        let linked = TableRowLink::find()
            .filter(table_row_link::Column::LinkId.eq(link.id))
            .filter(table_row_link::Column::SourceRowId.eq(row.id))
            .count(conn)
            .await?;
        if linked == 0 && row.data.get(&column.name).is_none() {
            continue;
        }
        (row, _) = rebuild_link_mirror(conn, row, link.id, &column.name).await?;
    }

    Ok(row)
}

/// Link ids held in a JSON cell: an array of strings, or a legacy scalar string
fn mirrored_ids(value: Option<&Value>) -> Vec<String> {
    match value {
        Some(Value::Array(items)) => items
            .iter()
            .filter_map(|item| item.as_str().map(str::to_string))
            .collect(),
        Some(Value::String(id)) if !id.is_empty() => vec![id.clone()],
        _ => Vec::new(),
    }
}

/// First non-empty string value of the row, else `Record <first 8 chars of id>`
pub fn display_name(id: Uuid, data: &Value) -> String {
    data.as_object()
        .and_then(|map| {
            map.values()
                .filter_map(Value::as_str)
                .map(str::trim)
                .find(|value| !value.is_empty())
        })
        .map(str::to_string)
        .unwrap_or_else(|| format!("Record {}", &id.to_string()[..8]))
}

fn matches_search(data: &Value, needle: &str) -> bool {
    data.as_object().is_some_and(|map| {
        map.values()
            .filter_map(Value::as_str)
            .any(|value| value.to_lowercase().contains(needle))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn display_name_prefers_first_non_empty_string() {
        let id = Uuid::parse_str("12345678-90ab-cdef-1234-567890abcdef").unwrap();
        assert_eq!(display_name(id, &json!({"a_name": "", "b_title": "Ada"})), "Ada");
        assert_eq!(display_name(id, &json!({"count": 3})), "Record 12345678");
        assert_eq!(display_name(id, &json!(null)), "Record 12345678");
    }

    #[test]
    fn mirrored_ids_normalizes_scalars() {
        assert_eq!(mirrored_ids(Some(&json!("abc"))), vec!["abc".to_string()]);
        assert_eq!(
            mirrored_ids(Some(&json!(["a", 1, "b"]))),
            vec!["a".to_string(), "b".to_string()]
        );
        assert!(mirrored_ids(Some(&json!(""))).is_empty());
        assert!(mirrored_ids(None).is_empty());
    }

    #[tokio::test]
    async fn existing_link_definition_is_reused_on_insert() {
        use crate::repositories::{DataTableRepository, OrganizationRepository, WorkspaceRepository};
        use migration::{Migrator, MigratorTrait};
        use sea_orm::Database;

        let db = Database::connect("sqlite::memory:").await.unwrap();
        Migrator::up(&db, None).await.unwrap();
        let organization = OrganizationRepository::new(&db)
            .create(serde_json::from_value(json!({"name": "Acme"})).unwrap())
            .await
            .unwrap();
        let workspace = WorkspaceRepository::new(&db)
            .create(
                serde_json::from_value(json!({"organization_id": organization.id, "name": "Ops"}))
                    .unwrap(),
            )
            .await
            .unwrap();
        let tables = DataTableRepository::new(&db);
        let (customers, _) = tables
            .create(serde_json::from_value(json!({"workspace_id": workspace.id, "name": "Customers"})).unwrap())
            .await
            .unwrap();
        let (_, columns) = tables
            .create(
                serde_json::from_value(json!({
                    "workspace_id": workspace.id,
                    "name": "Orders",
                    "columns": [{
                        "name": "customer",
                        "label": "Customer",
                        "column_type": "link",
                        "linked_table_id": customers.id,
                    }],
                }))
                .unwrap(),
            )
            .await
            .unwrap();
        let column = &columns[0];

        // Both writers missed the lookup; the second insert must yield the first definition.
        let first = insert_link_if_absent(&db, column, customers.id).await.unwrap();
        let second = insert_link_if_absent(&db, column, customers.id).await.unwrap();
        assert_eq!(first.id, second.id);
        assert_eq!(TableLink::find().count(&db).await.unwrap(), 1);

        let found = link_for_column(&db, column, customers.id).await.unwrap();
        assert_eq!(found.id, first.id);
    }

    #[test]
    fn search_is_case_insensitive_over_strings() {
        let data = json!({"name": "Grace Hopper", "age": 85});
        assert!(matches_search(&data, "hopper"));
        assert!(!matches_search(&data, "85"));
    }
}
