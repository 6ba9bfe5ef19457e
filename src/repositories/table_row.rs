//! # Table Row Repository
//!
//! Row inserts and deletes adjust the owning table's `row_count` in the same transaction.
//! Row `data` is stored exactly as sent, apart from link columns, whose values always mirror
//! the row's links.

use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, IntoActiveModel, ModelTrait,
    QueryFilter, QueryOrder, QuerySelect, Set, TransactionTrait,
};
use serde_json::Value;
use uuid::Uuid;

use super::data_table::{adjust_row_count, find_table};
use super::table_link::{detach_target_row, restore_link_mirrors};
use super::{in_row_order, now};
use crate::error::RepositoryError;
use crate::models::table_comment::{self, Entity as TableComment};
use crate::models::table_row::{self, Entity as TableRow};
use crate::schemas::Page;
use crate::schemas::common::{require_object, require_text};
use crate::schemas::row::{CommentCreate, RowBulkCreate, RowCreate, RowUpdate};

/// Repository for TableRow and TableComment database operations
pub struct TableRowRepository<'a> {
    db: &'a DatabaseConnection,
}

impl<'a> TableRowRepository<'a> {
    pub fn new(db: &'a DatabaseConnection) -> Self {
        Self { db }
    }

    /// Lists rows ordered by position, then creation time
    pub async fn list(
        &self,
        table_id: Uuid,
        include_archived: bool,
        page: Page,
    ) -> Result<Vec<table_row::Model>, RepositoryError> {
        find_table(self.db, table_id).await?;

        let mut query = TableRow::find().filter(table_row::Column::TableId.eq(table_id));
        if !include_archived {
            query = query.filter(table_row::Column::IsArchived.eq(false));
        }

        let rows = in_row_order(query)
            .limit(page.limit)
            .offset(page.offset)
            .all(self.db)
            .await?;
        Ok(rows)
    }

    pub async fn get(&self, table_id: Uuid, row_id: Uuid) -> Result<table_row::Model, RepositoryError> {
        TableRow::find_by_id(row_id)
            .filter(table_row::Column::TableId.eq(table_id))
            .one(self.db)
            .await?
            .ok_or_else(|| RepositoryError::not_found("Row"))
    }

    pub async fn create(
        &self,
        table_id: Uuid,
        request: RowCreate,
    ) -> Result<table_row::Model, RepositoryError> {
        find_table(self.db, table_id).await?;
        require_object(&request.data, "data")?;

        let txn = self.db.begin().await?;
        let row = new_row(table_id, request.data, request.metadata, request.position, request.created_by)
            .insert(&txn)
            .await?;
        adjust_row_count(&txn, table_id, 1).await?;
        txn.commit().await?;

        Ok(row)
    }

    /// Inserts every row or none; each row's position is its index in the request
    pub async fn bulk_create(
        &self,
        table_id: Uuid,
        request: RowBulkCreate,
    ) -> Result<Vec<table_row::Model>, RepositoryError> {
        find_table(self.db, table_id).await?;
        for (index, data) in request.rows.iter().enumerate() {
            if !data.is_object() {
                return Err(RepositoryError::validation_error(format!(
                    "rows[{index}] must be a JSON object"
                )));
            }
        }

        let txn = self.db.begin().await?;
        let mut rows = Vec::with_capacity(request.rows.len());
        for (index, data) in request.rows.into_iter().enumerate() {
            let metadata = Value::Object(Default::default());
            let row = new_row(table_id, data, metadata, Some(index as f64), request.created_by)
                .insert(&txn)
                .await?;
            rows.push(row);
        }
        let inserted = i32::try_from(rows.len()).unwrap_or(i32::MAX);
        adjust_row_count(&txn, table_id, inserted).await?;
        txn.commit().await?;

        tracing::info!(%table_id, rows = rows.len(), "Bulk rows inserted");
        Ok(rows)
    }

    /// Partial update. A replaced data map keeps the link lists derived from the row's links.
    pub async fn update(
        &self,
        table_id: Uuid,
        row_id: Uuid,
        update: RowUpdate,
    ) -> Result<table_row::Model, RepositoryError> {
        let existing = self.get(table_id, row_id).await?;

        let mut active = existing.into_active_model();
        let replaces_data = update.data.is_some();
        if let Some(data) = update.data {
            require_object(&data, "data")?;
            active.data = Set(data);
        }
        if let Some(metadata) = update.metadata {
            active.metadata = Set(metadata);
        }
        if let Some(is_archived) = update.is_archived {
            active.is_archived = Set(is_archived);
        }
        if let Some(position) = update.position {
            active.position = Set(Some(position));
        }
        if let Some(updated_by) = update.updated_by {
            active.updated_by = Set(Some(updated_by));
        }
        active.updated_at = Set(now());

        let txn = self.db.begin().await?;
        let mut row = active.update(&txn).await?;
        if replaces_data {
            row = restore_link_mirrors(&txn, row).await?;
        }
        txn.commit().await?;

        Ok(row)
    }

    /// Deletes a row and its links, rebuilding the link mirrors of rows that pointed at it.
    /// Returns the rebuilt source rows.
    pub async fn delete(
        &self,
        table_id: Uuid,
        row_id: Uuid,
    ) -> Result<Vec<table_row::Model>, RepositoryError> {
        let row = self.get(table_id, row_id).await?;

        let txn = self.db.begin().await?;
        let rebuilt = detach_target_row(&txn, row.id).await?;
        row.delete(&txn).await?;
        adjust_row_count(&txn, table_id, -1).await?;
        txn.commit().await?;

        Ok(rebuilt)
    }

    pub async fn list_comments(
        &self,
        table_id: Uuid,
        row_id: Uuid,
    ) -> Result<Vec<table_comment::Model>, RepositoryError> {
        self.get(table_id, row_id).await?;

        let comments = TableComment::find()
            .filter(table_comment::Column::RowId.eq(row_id))
            .order_by_asc(table_comment::Column::CreatedAt)
            .all(self.db)
            .await?;
        Ok(comments)
    }

    pub async fn create_comment(
        &self,
        table_id: Uuid,
        row_id: Uuid,
        request: CommentCreate,
    ) -> Result<table_comment::Model, RepositoryError> {
        self.get(table_id, row_id).await?;
        let content = require_text(&request.content, "Comment content")?;

        if let Some(parent_id) = request.parent_comment_id {
            let parent_on_row = TableComment::find_by_id(parent_id)
                .filter(table_comment::Column::RowId.eq(row_id))
                .one(self.db)
                .await?
                .is_some();
            if !parent_on_row {
                return Err(RepositoryError::validation_error(
                    "Parent comment does not belong to this row",
                ));
            }
        }

        let timestamp = now();
        let comment = table_comment::ActiveModel {
            id: Set(Uuid::new_v4()),
            table_id: Set(table_id),
            row_id: Set(row_id),
            content: Set(content),
            parent_comment_id: Set(request.parent_comment_id),
            created_by: Set(request.created_by),
            created_at: Set(timestamp),
            updated_at: Set(timestamp),
        };
        Ok(comment.insert(self.db).await?)
    }

    /// Non-archived rows whose `data[column_name]` equals `barcode`, ignoring case.
    /// Numbers match by their decimal text.
    pub async fn find_by_cell(
        &self,
        table_id: Uuid,
        column_name: &str,
        barcode: &str,
    ) -> Result<Vec<table_row::Model>, RepositoryError> {
        let needle = barcode.trim().to_lowercase();
        let select = TableRow::find()
            .filter(table_row::Column::TableId.eq(table_id))
            .filter(table_row::Column::IsArchived.eq(false));
        let rows = in_row_order(select)
            .all(self.db)
            .await?
            .into_iter()
            .filter(|row| cell_matches(row.data.get(column_name), &needle))
            .collect();
        Ok(rows)
    }
}

fn new_row(
    table_id: Uuid,
    data: Value,
    metadata: Value,
    position: Option<f64>,
    created_by: Option<Uuid>,
) -> table_row::ActiveModel {
    let timestamp = now();
    table_row::ActiveModel {
        id: Set(Uuid::new_v4()),
        table_id: Set(table_id),
        data: Set(data),
        metadata: Set(metadata),
        is_archived: Set(false),
        position: Set(position),
        created_by: Set(created_by),
        updated_by: Set(None),
        created_at: Set(timestamp),
        updated_at: Set(timestamp),
    }
}

fn cell_matches(cell: Option<&Value>, needle: &str) -> bool {
    match cell {
        Some(Value::String(value)) => value.trim().to_lowercase() == needle,
        Some(Value::Number(number)) => number.to_string() == needle,
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn cell_match_ignores_case_and_accepts_numbers() {
        assert!(cell_matches(Some(&json!("TKT-0042")), "tkt-0042"));
        assert!(cell_matches(Some(&json!(42)), "42"));
        assert!(!cell_matches(Some(&json!(true)), "true"));
        assert!(!cell_matches(None, "tkt-0042"));
    }
}
