//! # Data Table Repository
//!
//! Tables and their column definitions. A table is always created together with its
//! columns in one transaction so a failed column never leaves a half-built table behind.

use std::collections::HashMap;

use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait,
    IntoActiveModel, ModelTrait, PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, Set,
    TransactionTrait,
};
use sea_orm::sea_query::Expr;
use serde_json::Value;
use uuid::Uuid;

use super::table_link::detach_target_tables;
use super::{now, updated_slug};
use crate::error::RepositoryError;
use crate::models::data_table::{self, Entity as DataTable};
use crate::models::table_column::{self, Entity as TableColumn};
use crate::models::table_row;
use crate::models::Workspace;
use crate::schemas::Page;
use crate::schemas::common::{require_object, require_text};
use crate::schemas::data_table::{ColumnCreate, ColumnUpdate, DataTableCreate, DataTableUpdate};
use crate::slug::resolve_slug;

const DEFAULT_COLUMN_WIDTH: i32 = 150;

/// Filters for listing data tables
#[derive(Debug, Clone, Default)]
pub struct DataTableFilter {
    pub workspace_id: Option<Uuid>,
    pub include_archived: bool,
}

/// A table with its columns ordered by position
pub type TableWithColumns = (data_table::Model, Vec<table_column::Model>);

/// Repository for DataTable and TableColumn database operations
pub struct DataTableRepository<'a> {
    db: &'a DatabaseConnection,
}

impl<'a> DataTableRepository<'a> {
    pub fn new(db: &'a DatabaseConnection) -> Self {
        Self { db }
    }

    /// Lists tables newest first, each with its columns
    pub async fn list(
        &self,
        filter: DataTableFilter,
        page: Page,
    ) -> Result<Vec<TableWithColumns>, RepositoryError> {
        let mut query = DataTable::find();
        if let Some(workspace_id) = filter.workspace_id {
            query = query.filter(data_table::Column::WorkspaceId.eq(workspace_id));
        }
        if !filter.include_archived {
            query = query.filter(data_table::Column::IsArchived.eq(false));
        }

        let tables = query
            .order_by_desc(data_table::Column::CreatedAt)
            .limit(page.limit)
            .offset(page.offset)
            .all(self.db)
            .await?;
        if tables.is_empty() {
            return Ok(Vec::new());
        }

        let table_ids: Vec<Uuid> = tables.iter().map(|table| table.id).collect();
        let mut columns_by_table: HashMap<Uuid, Vec<table_column::Model>> = HashMap::new();
        for column in TableColumn::find()
            .filter(table_column::Column::TableId.is_in(table_ids))
            .order_by_asc(table_column::Column::Position)
            .all(self.db)
            .await?
        {
            columns_by_table.entry(column.table_id).or_default().push(column);
        }

        Ok(tables
            .into_iter()
            .map(|table| {
                let columns = columns_by_table.remove(&table.id).unwrap_or_default();
                (table, columns)
            })
            .collect())
    }

    pub async fn find(&self, table_id: Uuid) -> Result<data_table::Model, RepositoryError> {
        find_table(self.db, table_id).await
    }

    /// Gets a table with its columns ordered by position
    pub async fn get(&self, table_id: Uuid) -> Result<TableWithColumns, RepositoryError> {
        let table = self.find(table_id).await?;
        let columns = self.columns(table_id).await?;
        Ok((table, columns))
    }

    pub async fn columns(&self, table_id: Uuid) -> Result<Vec<table_column::Model>, RepositoryError> {
        let columns = TableColumn::find()
            .filter(table_column::Column::TableId.eq(table_id))
            .order_by_asc(table_column::Column::Position)
            .all(self.db)
            .await?;
        Ok(columns)
    }

    /// Creates a table and its columns atomically; column positions follow list order
    pub async fn create(&self, request: DataTableCreate) -> Result<TableWithColumns, RepositoryError> {
        Workspace::find_by_id(request.workspace_id)
            .one(self.db)
            .await?
            .ok_or_else(|| RepositoryError::not_found("Workspace"))?;

        let name = require_text(&request.name, "Table name")?;
        let slug = resolve_slug(&name, request.slug.as_deref())?;
        require_object(&request.settings, "settings")?;

        let txn = self.db.begin().await?;
        let timestamp = now();
        let table = data_table::ActiveModel {
            id: Set(Uuid::new_v4()),
            workspace_id: Set(request.workspace_id),
            name: Set(name),
            slug: Set(slug),
            description: Set(request.description),
            icon: Set(request.icon.unwrap_or_else(|| "table".to_string())),
            color: Set(request.color.unwrap_or_else(|| "#10B981".to_string())),
            settings: Set(request.settings),
            import_source: Set(request.import_source),
            import_metadata: Set(request.import_metadata),
            is_archived: Set(false),
            row_count: Set(0),
            created_by: Set(request.created_by),
            created_at: Set(timestamp),
            updated_at: Set(timestamp),
        }
        .insert(&txn)
        .await?;

        let mut columns = Vec::with_capacity(request.columns.len());
        for (index, column) in request.columns.into_iter().enumerate() {
            let position = i32::try_from(index).unwrap_or(i32::MAX);
            columns.push(insert_column(&txn, table.id, column, position).await?);
        }

        txn.commit().await?;

        tracing::info!(table_id = %table.id, columns = columns.len(), "Data table created");
        Ok((table, columns))
    }

    pub async fn update(
        &self,
        table_id: Uuid,
        update: DataTableUpdate,
    ) -> Result<TableWithColumns, RepositoryError> {
        let existing = self.find(table_id).await?;
        let slug = updated_slug(&existing.name, update.name.as_deref(), update.slug.as_deref())?;

        let mut active = existing.into_active_model();
        if let Some(name) = update.name {
            active.name = Set(require_text(&name, "Table name")?);
        }
        if let Some(slug) = slug {
            active.slug = Set(slug);
        }
        if let Some(description) = update.description {
            active.description = Set(Some(description));
        }
        if let Some(icon) = update.icon {
            active.icon = Set(icon);
        }
        if let Some(color) = update.color {
            active.color = Set(color);
        }
        if let Some(settings) = update.settings {
            require_object(&settings, "settings")?;
            active.settings = Set(settings);
        }
        if let Some(is_archived) = update.is_archived {
            active.is_archived = Set(is_archived);
        }
        active.updated_at = Set(now());

        let table = active.update(self.db).await?;
        let columns = self.columns(table_id).await?;
        Ok((table, columns))
    }

    /// Deletes a table; columns, rows, views and links cascade. Rows of other tables that
    /// linked into it get their link lists rebuilt and are returned.
    pub async fn delete(&self, table_id: Uuid) -> Result<Vec<table_row::Model>, RepositoryError> {
        let table = self.find(table_id).await?;

        let txn = self.db.begin().await?;
        let rebuilt = detach_target_tables(&txn, &[table.id]).await?;
        table.delete(&txn).await?;
        txn.commit().await?;

        Ok(rebuilt)
    }

    /// Appends a column, or places it at the requested position
    pub async fn add_column(
        &self,
        table_id: Uuid,
        request: ColumnCreate,
    ) -> Result<table_column::Model, RepositoryError> {
        self.find(table_id).await?;

        let position = match request.position {
            Some(position) => position,
            None => {
                let count = TableColumn::find()
                    .filter(table_column::Column::TableId.eq(table_id))
                    .count(self.db)
                    .await?;
                i32::try_from(count).unwrap_or(i32::MAX)
            }
        };

        insert_column(self.db, table_id, request, position).await
    }

    pub async fn get_column(
        &self,
        table_id: Uuid,
        column_id: Uuid,
    ) -> Result<table_column::Model, RepositoryError> {
        find_column(self.db, table_id, column_id).await
    }

    pub async fn update_column(
        &self,
        table_id: Uuid,
        column_id: Uuid,
        update: ColumnUpdate,
    ) -> Result<table_column::Model, RepositoryError> {
        let existing = self.get_column(table_id, column_id).await?;
        if let Some(linked_table_id) = update.linked_table_id {
            ensure_linked_table(self.db, linked_table_id).await?;
        }

        let mut active = existing.into_active_model();
        if let Some(name) = update.name {
            active.name = Set(require_text(&name, "Column name")?);
        }
        if let Some(label) = update.label {
            active.label = Set(label);
        }
        if let Some(description) = update.description {
            active.description = Set(Some(description));
        }
        if let Some(column_type) = update.column_type {
            active.column_type = Set(require_text(&column_type, "Column type")?);
        }
        if let Some(settings) = update.settings {
            require_object(&settings, "settings")?;
            active.settings = Set(settings);
        }
        if let Some(validation) = update.validation {
            require_object(&validation, "validation")?;
            active.validation = Set(validation);
        }
        if let Some(formula) = update.formula {
            active.formula = Set(Some(formula));
        }
        if let Some(dependencies) = update.formula_dependencies {
            active.formula_dependencies = Set(Value::from(dependencies));
        }
        if let Some(linked_table_id) = update.linked_table_id {
            active.linked_table_id = Set(Some(linked_table_id));
        }
        if let Some(linked_column_id) = update.linked_column_id {
            active.linked_column_id = Set(Some(linked_column_id));
        }
        if let Some(rollup_function) = update.rollup_function {
            active.rollup_function = Set(Some(rollup_function));
        }
        if let Some(position) = update.position {
            active.position = Set(position);
        }
        if let Some(width) = update.width {
            active.width = Set(width);
        }
        if let Some(is_visible) = update.is_visible {
            active.is_visible = Set(is_visible);
        }
        if let Some(is_primary) = update.is_primary {
            active.is_primary = Set(is_primary);
        }
        active.updated_at = Set(now());

        Ok(active.update(self.db).await?)
    }

    pub async fn delete_column(&self, table_id: Uuid, column_id: Uuid) -> Result<(), RepositoryError> {
        let column = self.get_column(table_id, column_id).await?;
        column.delete(self.db).await?;
        Ok(())
    }
}

pub(crate) async fn find_table<C: ConnectionTrait>(
    conn: &C,
    table_id: Uuid,
) -> Result<data_table::Model, RepositoryError> {
    DataTable::find_by_id(table_id)
        .one(conn)
        .await?
        .ok_or_else(|| RepositoryError::not_found("Data table"))
}

/// Finds a column scoped to its table; a column of another table is "not found"
pub(crate) async fn find_column<C: ConnectionTrait>(
    conn: &C,
    table_id: Uuid,
    column_id: Uuid,
) -> Result<table_column::Model, RepositoryError> {
    TableColumn::find_by_id(column_id)
        .filter(table_column::Column::TableId.eq(table_id))
        .one(conn)
        .await?
        .ok_or_else(|| RepositoryError::not_found("Column"))
}

/// Shifts the cached row count by `delta` with an in-database increment
pub(crate) async fn adjust_row_count<C: ConnectionTrait>(
    conn: &C,
    table_id: Uuid,
    delta: i32,
) -> Result<(), RepositoryError> {
    DataTable::update_many()
        .col_expr(
            data_table::Column::RowCount,
            Expr::col(data_table::Column::RowCount).add(delta),
        )
        .col_expr(data_table::Column::UpdatedAt, Expr::value(now()))
        .filter(data_table::Column::Id.eq(table_id))
        .exec(conn)
        .await?;
    Ok(())
}

async fn ensure_linked_table<C: ConnectionTrait>(
    conn: &C,
    linked_table_id: Uuid,
) -> Result<(), RepositoryError> {
    if DataTable::find_by_id(linked_table_id).one(conn).await?.is_none() {
        return Err(RepositoryError::validation_error(format!(
            "Linked table {linked_table_id} does not exist"
        )));
    }
    Ok(())
}

async fn insert_column<C: ConnectionTrait>(
    conn: &C,
    table_id: Uuid,
    request: ColumnCreate,
    position: i32,
) -> Result<table_column::Model, RepositoryError> {
    let name = require_text(&request.name, "Column name")?;
    let column_type = require_text(&request.column_type, "Column type")?;
    require_object(&request.settings, "settings")?;
    require_object(&request.validation, "validation")?;
    if let Some(linked_table_id) = request.linked_table_id {
        ensure_linked_table(conn, linked_table_id).await?;
    }

    let timestamp = now();
    let column = table_column::ActiveModel {
        id: Set(Uuid::new_v4()),
        table_id: Set(table_id),
        name: Set(name),
        label: Set(request.label),
        description: Set(request.description),
        column_type: Set(column_type),
        settings: Set(request.settings),
        validation: Set(request.validation),
        formula: Set(request.formula),
        formula_dependencies: Set(Value::from(request.formula_dependencies)),
        linked_table_id: Set(request.linked_table_id),
        linked_column_id: Set(request.linked_column_id),
        rollup_function: Set(request.rollup_function),
        position: Set(position),
        width: Set(request.width.unwrap_or(DEFAULT_COLUMN_WIDTH)),
        is_visible: Set(request.is_visible),
        is_primary: Set(request.is_primary),
        created_at: Set(timestamp),
        updated_at: Set(timestamp),
    };

    Ok(column.insert(conn).await?)
}
