//! # Workspace Repository
//!
//! Workspaces own forms, data tables and request hubs; deleting one cascades through
//! the foreign keys to everything beneath it.

use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait,
    IntoActiveModel, ModelTrait, QueryFilter, QueryOrder, QuerySelect, Set, TransactionTrait,
};
use uuid::Uuid;

use super::table_link::detach_target_tables;
use super::{now, updated_slug};
use crate::error::RepositoryError;
use crate::models::data_table::{self, Entity as DataTable};
use crate::models::table_row;
use crate::models::workspace::{self, Entity as Workspace};
use crate::models::Organization;
use crate::schemas::Page;
use crate::schemas::common::require_text;
use crate::schemas::organization::{WorkspaceCreate, WorkspaceUpdate};
use crate::slug::resolve_slug;

/// Filters for listing workspaces
#[derive(Debug, Clone, Default)]
pub struct WorkspaceFilter {
    pub organization_id: Option<Uuid>,
    pub include_archived: bool,
}

/// Repository for Workspace database operations
pub struct WorkspaceRepository<'a> {
    db: &'a DatabaseConnection,
}

impl<'a> WorkspaceRepository<'a> {
    pub fn new(db: &'a DatabaseConnection) -> Self {
        Self { db }
    }

    /// Lists workspaces, newest first; archived ones only when asked for
    pub async fn list(
        &self,
        filter: WorkspaceFilter,
        page: Page,
    ) -> Result<Vec<workspace::Model>, RepositoryError> {
        let mut query = Workspace::find();
        if let Some(organization_id) = filter.organization_id {
            query = query.filter(workspace::Column::OrganizationId.eq(organization_id));
        }
        if !filter.include_archived {
            query = query.filter(workspace::Column::IsArchived.eq(false));
        }

        let workspaces = query
            .order_by_desc(workspace::Column::CreatedAt)
            .limit(page.limit)
            .offset(page.offset)
            .all(self.db)
            .await?;

        Ok(workspaces)
    }

    pub async fn get(&self, workspace_id: Uuid) -> Result<workspace::Model, RepositoryError> {
        Workspace::find_by_id(workspace_id)
            .one(self.db)
            .await?
            .ok_or_else(|| RepositoryError::not_found("Workspace"))
    }

    pub async fn create(&self, request: WorkspaceCreate) -> Result<workspace::Model, RepositoryError> {
        Organization::find_by_id(request.organization_id)
            .one(self.db)
            .await?
            .ok_or_else(|| RepositoryError::not_found("Organization"))?;

        let name = require_text(&request.name, "Workspace name")?;
        let slug = resolve_slug(&name, request.slug.as_deref())?;

        let timestamp = now();
        let workspace = workspace::ActiveModel {
            id: Set(Uuid::new_v4()),
            organization_id: Set(request.organization_id),
            name: Set(name),
            slug: Set(slug),
            description: Set(request.description),
            color: Set(request.color.unwrap_or_else(|| "#3B82F6".to_string())),
            icon: Set(request.icon.unwrap_or_else(|| "folder".to_string())),
            settings: Set(request.settings),
            is_archived: Set(false),
            created_by: Set(request.created_by),
            created_at: Set(timestamp),
            updated_at: Set(timestamp),
        };

        Ok(workspace.insert(self.db).await?)
    }

    pub async fn update(
        &self,
        workspace_id: Uuid,
        update: WorkspaceUpdate,
    ) -> Result<workspace::Model, RepositoryError> {
        let existing = self.get(workspace_id).await?;
        let slug = updated_slug(&existing.name, update.name.as_deref(), update.slug.as_deref())?;

        let mut active = existing.into_active_model();
        if let Some(name) = update.name {
            active.name = Set(require_text(&name, "Workspace name")?);
        }
        if let Some(slug) = slug {
            active.slug = Set(slug);
        }
        if let Some(description) = update.description {
            active.description = Set(Some(description));
        }
        if let Some(color) = update.color {
            active.color = Set(color);
        }
        if let Some(icon) = update.icon {
            active.icon = Set(icon);
        }
        if let Some(settings) = update.settings {
            active.settings = Set(settings);
        }
        if let Some(is_archived) = update.is_archived {
            active.is_archived = Set(is_archived);
        }
        active.updated_at = Set(now());

        Ok(active.update(self.db).await?)
    }

    /// Hard delete; forms, data tables and request hubs go with it. Rows elsewhere that
    /// linked into its tables get their link lists rebuilt and are returned.
    pub async fn delete(&self, workspace_id: Uuid) -> Result<Vec<table_row::Model>, RepositoryError> {
        let workspace = self.get(workspace_id).await?;

        let txn = self.db.begin().await?;
        let table_ids = tables_in_workspaces(&txn, vec![workspace.id]).await?;
        let rebuilt = detach_target_tables(&txn, &table_ids).await?;
        workspace.delete(&txn).await?;
        txn.commit().await?;

        tracing::info!(%workspace_id, tables = table_ids.len(), "Workspace deleted");
        Ok(rebuilt)
    }
}

/// Ids of every data table in the given workspaces
pub(crate) async fn tables_in_workspaces<C: ConnectionTrait>(
    conn: &C,
    workspace_ids: Vec<Uuid>,
) -> Result<Vec<Uuid>, RepositoryError> {
    let tables = DataTable::find()
        .filter(data_table::Column::WorkspaceId.is_in(workspace_ids))
        .all(conn)
        .await?;
    Ok(tables.into_iter().map(|table| table.id).collect())
}
