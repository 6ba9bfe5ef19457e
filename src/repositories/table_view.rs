use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, IntoActiveModel, ModelTrait,
    QueryFilter, QueryOrder, Set,
};
use uuid::Uuid;

use super::data_table::find_table;
use super::now;
use crate::error::RepositoryError;
use crate::models::table_view::{self, Entity as TableView, VIEW_TYPES};
use crate::schemas::common::{require_choice, require_text};
use crate::schemas::data_table::{ViewCreate, ViewUpdate};

/// Repository for saved table views
pub struct TableViewRepository<'a> {
    db: &'a DatabaseConnection,
}

impl<'a> TableViewRepository<'a> {
    pub fn new(db: &'a DatabaseConnection) -> Self {
        Self { db }
    }

    pub async fn list(&self, table_id: Uuid) -> Result<Vec<table_view::Model>, RepositoryError> {
        find_table(self.db, table_id).await?;

        let views = TableView::find()
            .filter(table_view::Column::TableId.eq(table_id))
            .order_by_asc(table_view::Column::CreatedAt)
            .all(self.db)
            .await?;
        Ok(views)
    }

    pub async fn create(
        &self,
        table_id: Uuid,
        request: ViewCreate,
    ) -> Result<table_view::Model, RepositoryError> {
        find_table(self.db, table_id).await?;

        let name = require_text(&request.name, "View name")?;
        let view_type = request.view_type.unwrap_or_else(|| "grid".to_string());
        require_choice(&view_type, VIEW_TYPES, "view_type")?;

        let timestamp = now();
        let view = table_view::ActiveModel {
            id: Set(Uuid::new_v4()),
            table_id: Set(table_id),
            name: Set(name),
            description: Set(request.description),
            view_type: Set(view_type),
            settings: Set(request.settings),
            filters: Set(request.filters),
            sorts: Set(request.sorts),
            grouping: Set(request.grouping),
            is_shared: Set(request.is_shared),
            is_locked: Set(request.is_locked),
            created_by: Set(request.created_by),
            created_at: Set(timestamp),
            updated_at: Set(timestamp),
        };

        Ok(view.insert(self.db).await?)
    }

    pub async fn get(
        &self,
        table_id: Uuid,
        view_id: Uuid,
    ) -> Result<table_view::Model, RepositoryError> {
        TableView::find_by_id(view_id)
            .filter(table_view::Column::TableId.eq(table_id))
            .one(self.db)
            .await?
            .ok_or_else(|| RepositoryError::not_found("View"))
    }

    pub async fn update(
        &self,
        table_id: Uuid,
        view_id: Uuid,
        update: ViewUpdate,
    ) -> Result<table_view::Model, RepositoryError> {
        let existing = self.get(table_id, view_id).await?;

        let mut active = existing.into_active_model();
        if let Some(name) = update.name {
            active.name = Set(require_text(&name, "View name")?);
        }
        if let Some(description) = update.description {
            active.description = Set(Some(description));
        }
        if let Some(view_type) = update.view_type {
            require_choice(&view_type, VIEW_TYPES, "view_type")?;
            active.view_type = Set(view_type);
        }
        if let Some(settings) = update.settings {
            active.settings = Set(settings);
        }
        if let Some(filters) = update.filters {
            active.filters = Set(filters);
        }
        if let Some(sorts) = update.sorts {
            active.sorts = Set(sorts);
        }
        if let Some(grouping) = update.grouping {
            active.grouping = Set(grouping);
        }
        if let Some(is_shared) = update.is_shared {
            active.is_shared = Set(is_shared);
        }
        if let Some(is_locked) = update.is_locked {
            active.is_locked = Set(is_locked);
        }
        active.updated_at = Set(now());

        Ok(active.update(self.db).await?)
    }

    pub async fn delete(&self, table_id: Uuid, view_id: Uuid) -> Result<(), RepositoryError> {
        let view = self.get(table_id, view_id).await?;
        view.delete(self.db).await?;
        Ok(())
    }
}
