//! # Request Hub Repository
//!
//! Request hubs are scoped to a workspace, and every lookup takes the workspace id so a hub
//! of another workspace is reported as not found. Slugs are unique per workspace for hubs
//! and per hub for tabs.

use std::collections::HashSet;

use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait,
    IntoActiveModel, ModelTrait, PaginatorTrait, QueryFilter, QueryOrder, Set, TransactionTrait,
};
use uuid::Uuid;

use super::{now, updated_slug};
use crate::error::RepositoryError;
use crate::models::Workspace;
use crate::models::request_hub::{self, Entity as RequestHub};
use crate::models::request_hub_tab::{self, Entity as RequestHubTab};
use crate::schemas::common::require_text;
use crate::schemas::request_hub::{
    HubTabCreate, HubTabUpdate, RequestHubCreate, RequestHubUpdate, TabPosition,
};
use crate::slug::resolve_slug;

/// A hub with its tabs ordered by position
pub type HubWithTabs = (request_hub::Model, Vec<request_hub_tab::Model>);

/// Repository for RequestHub and RequestHubTab operations
pub struct RequestHubRepository<'a> {
    db: &'a DatabaseConnection,
}

impl<'a> RequestHubRepository<'a> {
    pub fn new(db: &'a DatabaseConnection) -> Self {
        Self { db }
    }

    pub async fn list(
        &self,
        workspace_id: Uuid,
        include_inactive: bool,
    ) -> Result<Vec<request_hub::Model>, RepositoryError> {
        ensure_workspace(self.db, workspace_id).await?;

        let mut query = RequestHub::find().filter(request_hub::Column::WorkspaceId.eq(workspace_id));
        if !include_inactive {
            query = query.filter(request_hub::Column::IsActive.eq(true));
        }

        let hubs = query
            .order_by_desc(request_hub::Column::CreatedAt)
            .all(self.db)
            .await?;
        Ok(hubs)
    }

    pub async fn find(&self, workspace_id: Uuid, hub_id: Uuid) -> Result<request_hub::Model, RepositoryError> {
        RequestHub::find_by_id(hub_id)
            .filter(request_hub::Column::WorkspaceId.eq(workspace_id))
            .one(self.db)
            .await?
            .ok_or_else(|| RepositoryError::not_found("Request hub"))
    }

    pub async fn get(&self, workspace_id: Uuid, hub_id: Uuid) -> Result<HubWithTabs, RepositoryError> {
        let hub = self.find(workspace_id, hub_id).await?;
        let tabs = self.tabs(hub.id, true).await?;
        Ok((hub, tabs))
    }

    pub async fn get_by_slug(&self, workspace_id: Uuid, slug: &str) -> Result<HubWithTabs, RepositoryError> {
        let hub = RequestHub::find()
            .filter(request_hub::Column::WorkspaceId.eq(workspace_id))
            .filter(request_hub::Column::Slug.eq(slug))
            .one(self.db)
            .await?
            .ok_or_else(|| RepositoryError::not_found("Request hub"))?;
        let tabs = self.tabs(hub.id, true).await?;
        Ok((hub, tabs))
    }

    /// Creates a hub and its inline tabs in one transaction
    pub async fn create(
        &self,
        workspace_id: Uuid,
        request: RequestHubCreate,
    ) -> Result<HubWithTabs, RepositoryError> {
        if request.workspace_id.is_some_and(|id| id != workspace_id) {
            return Err(RepositoryError::validation_error(
                "workspace_id in the body does not match the path",
            ));
        }
        ensure_workspace(self.db, workspace_id).await?;

        let name = require_text(&request.name, "Hub name")?;
        let slug = resolve_slug(&name, request.slug.as_deref())?;
        ensure_hub_slug_free(self.db, workspace_id, &slug, None).await?;

        let txn = self.db.begin().await?;
        let timestamp = now();
        let hub = request_hub::ActiveModel {
            id: Set(Uuid::new_v4()),
            workspace_id: Set(workspace_id),
            name: Set(name),
            slug: Set(slug),
            description: Set(request.description),
            settings: Set(request.settings),
            is_active: Set(request.is_active),
            created_by: Set(request.created_by),
            created_at: Set(timestamp),
            updated_at: Set(timestamp),
        }
        .insert(&txn)
        .await?;

        let mut slugs = HashSet::new();
        let mut tabs = Vec::with_capacity(request.tabs.len());
        for (index, tab) in request.tabs.into_iter().enumerate() {
            let default_position = i32::try_from(index).unwrap_or(i32::MAX);
            let (slug, tab) = build_tab(hub.id, tab, default_position)?;
            if !slugs.insert(slug.clone()) {
                return Err(duplicate_tab_slug(&slug));
            }
            tabs.push(tab.insert(&txn).await?);
        }
        txn.commit().await?;

        tabs.sort_by_key(|tab| tab.position);
        Ok((hub, tabs))
    }

    pub async fn update(
        &self,
        workspace_id: Uuid,
        hub_id: Uuid,
        update: RequestHubUpdate,
    ) -> Result<request_hub::Model, RepositoryError> {
        let existing = self.find(workspace_id, hub_id).await?;
        let slug = updated_slug(&existing.name, update.name.as_deref(), update.slug.as_deref())?;
        if let Some(slug) = &slug {
            ensure_hub_slug_free(self.db, workspace_id, slug, Some(hub_id)).await?;
        }

        let mut active = existing.into_active_model();
        if let Some(name) = update.name {
            active.name = Set(require_text(&name, "Hub name")?);
        }
        if let Some(slug) = slug {
            active.slug = Set(slug);
        }
        if let Some(description) = update.description {
            active.description = Set(Some(description));
        }
        if let Some(settings) = update.settings {
            active.settings = Set(settings);
        }
        if let Some(is_active) = update.is_active {
            active.is_active = Set(is_active);
        }
        active.updated_at = Set(now());

        Ok(active.update(self.db).await?)
    }

    pub async fn delete(&self, workspace_id: Uuid, hub_id: Uuid) -> Result<(), RepositoryError> {
        let hub = self.find(workspace_id, hub_id).await?;
        hub.delete(self.db).await?;
        Ok(())
    }

    pub async fn list_tabs(
        &self,
        workspace_id: Uuid,
        hub_id: Uuid,
        include_hidden: bool,
    ) -> Result<Vec<request_hub_tab::Model>, RepositoryError> {
        let hub = self.find(workspace_id, hub_id).await?;
        self.tabs(hub.id, include_hidden).await
    }

    pub async fn create_tab(
        &self,
        workspace_id: Uuid,
        hub_id: Uuid,
        request: HubTabCreate,
    ) -> Result<request_hub_tab::Model, RepositoryError> {
        let hub = self.find(workspace_id, hub_id).await?;

        let count = RequestHubTab::find()
            .filter(request_hub_tab::Column::HubId.eq(hub.id))
            .count(self.db)
            .await?;
        let (slug, tab) = build_tab(hub.id, request, i32::try_from(count).unwrap_or(i32::MAX))?;
        ensure_tab_slug_free(self.db, hub.id, &slug, None).await?;

        Ok(tab.insert(self.db).await?)
    }

    pub async fn update_tab(
        &self,
        workspace_id: Uuid,
        hub_id: Uuid,
        tab_id: Uuid,
        update: HubTabUpdate,
    ) -> Result<request_hub_tab::Model, RepositoryError> {
        let existing = self.find_tab(workspace_id, hub_id, tab_id).await?;
        let slug = updated_slug(&existing.name, update.name.as_deref(), update.slug.as_deref())?;
        if let Some(slug) = &slug {
            ensure_tab_slug_free(self.db, hub_id, slug, Some(tab_id)).await?;
        }

        let mut active = existing.into_active_model();
        if let Some(name) = update.name {
            active.name = Set(require_text(&name, "Tab name")?);
        }
        if let Some(slug) = slug {
            active.slug = Set(slug);
        }
        if let Some(tab_type) = update.tab_type {
            active.tab_type = Set(require_text(&tab_type, "Tab type")?);
        }
        if let Some(icon) = update.icon {
            active.icon = Set(Some(icon));
        }
        if let Some(position) = update.position {
            active.position = Set(position);
        }
        if let Some(is_visible) = update.is_visible {
            active.is_visible = Set(is_visible);
        }
        if let Some(config) = update.config {
            active.config = Set(config);
        }
        active.updated_at = Set(now());

        Ok(active.update(self.db).await?)
    }

    pub async fn delete_tab(&self, workspace_id: Uuid, hub_id: Uuid, tab_id: Uuid) -> Result<(), RepositoryError> {
        let tab = self.find_tab(workspace_id, hub_id, tab_id).await?;
        tab.delete(self.db).await?;
        Ok(())
    }

    /// Applies new positions in one transaction and returns all tabs in their new order
    pub async fn reorder_tabs(
        &self,
        workspace_id: Uuid,
        hub_id: Uuid,
        positions: Vec<TabPosition>,
    ) -> Result<Vec<request_hub_tab::Model>, RepositoryError> {
        let hub = self.find(workspace_id, hub_id).await?;

        let txn = self.db.begin().await?;
        let timestamp = now();
        for entry in positions {
            let tab = RequestHubTab::find_by_id(entry.id)
                .filter(request_hub_tab::Column::HubId.eq(hub.id))
                .one(&txn)
                .await?
                .ok_or_else(|| RepositoryError::not_found("Tab"))?;
            let mut active = tab.into_active_model();
            active.position = Set(entry.position);
            active.updated_at = Set(timestamp);
            active.update(&txn).await?;
        }
        txn.commit().await?;

        self.tabs(hub.id, true).await
    }

    async fn find_tab(
        &self,
        workspace_id: Uuid,
        hub_id: Uuid,
        tab_id: Uuid,
    ) -> Result<request_hub_tab::Model, RepositoryError> {
        let hub = self.find(workspace_id, hub_id).await?;
        RequestHubTab::find_by_id(tab_id)
            .filter(request_hub_tab::Column::HubId.eq(hub.id))
            .one(self.db)
            .await?
            .ok_or_else(|| RepositoryError::not_found("Tab"))
    }

    async fn tabs(&self, hub_id: Uuid, include_hidden: bool) -> Result<Vec<request_hub_tab::Model>, RepositoryError> {
        let mut query = RequestHubTab::find().filter(request_hub_tab::Column::HubId.eq(hub_id));
        if !include_hidden {
            query = query.filter(request_hub_tab::Column::IsVisible.eq(true));
        }

        let tabs = query
            .order_by_asc(request_hub_tab::Column::Position)
            .order_by_asc(request_hub_tab::Column::CreatedAt)
            .all(self.db)
            .await?;
        Ok(tabs)
    }
}

/// Validated tab insert, returned with its resolved slug
fn build_tab(
    hub_id: Uuid,
    request: HubTabCreate,
    default_position: i32,
) -> Result<(String, request_hub_tab::ActiveModel), RepositoryError> {
    let name = require_text(&request.name, "Tab name")?;
    let slug = resolve_slug(&name, request.slug.as_deref())?;

    let timestamp = now();
    let tab = request_hub_tab::ActiveModel {
        id: Set(Uuid::new_v4()),
        hub_id: Set(hub_id),
        name: Set(name),
        slug: Set(slug.clone()),
        tab_type: Set(request.tab_type.unwrap_or_else(|| "requests".to_string())),
        icon: Set(request.icon),
        position: Set(request.position.unwrap_or(default_position)),
        is_visible: Set(request.is_visible),
        config: Set(request.config),
        created_at: Set(timestamp),
        updated_at: Set(timestamp),
    };
    Ok((slug, tab))
}

async fn ensure_workspace<C: ConnectionTrait>(conn: &C, workspace_id: Uuid) -> Result<(), RepositoryError> {
    Workspace::find_by_id(workspace_id)
        .one(conn)
        .await?
        .ok_or_else(|| RepositoryError::not_found("Workspace"))?;
    Ok(())
}

async fn ensure_hub_slug_free<C: ConnectionTrait>(
    conn: &C,
    workspace_id: Uuid,
    slug: &str,
    except: Option<Uuid>,
) -> Result<(), RepositoryError> {
    let mut query = RequestHub::find()
        .filter(request_hub::Column::WorkspaceId.eq(workspace_id))
        .filter(request_hub::Column::Slug.eq(slug));
    if let Some(id) = except {
        query = query.filter(request_hub::Column::Id.ne(id));
    }
    if query.one(conn).await?.is_some() {
        return Err(RepositoryError::conflict(format!(
            "A request hub with slug '{slug}' already exists in this workspace"
        )));
    }
    Ok(())
}

async fn ensure_tab_slug_free<C: ConnectionTrait>(
    conn: &C,
    hub_id: Uuid,
    slug: &str,
    except: Option<Uuid>,
) -> Result<(), RepositoryError> {
    let mut query = RequestHubTab::find()
        .filter(request_hub_tab::Column::HubId.eq(hub_id))
        .filter(request_hub_tab::Column::Slug.eq(slug));
    if let Some(id) = except {
        query = query.filter(request_hub_tab::Column::Id.ne(id));
    }
    if query.one(conn).await?.is_some() {
        return Err(duplicate_tab_slug(slug));
    }
    Ok(())
}

fn duplicate_tab_slug(slug: &str) -> RepositoryError {
    RepositoryError::conflict(format!("A tab with slug '{slug}' already exists in this hub"))
}
