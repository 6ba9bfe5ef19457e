//! # Organization Repository
//!
//! CRUD for organizations, the root of the tenant hierarchy.

use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, IntoActiveModel, ModelTrait,
    QueryFilter, QueryOrder, QuerySelect, Set, TransactionTrait,
};
use uuid::Uuid;

use super::table_link::detach_target_tables;
use super::workspace::tables_in_workspaces;
use super::{now, updated_slug};
use crate::error::RepositoryError;
use crate::models::organization::{self, Entity as Organization};
use crate::models::table_row;
use crate::models::workspace::{self, Entity as Workspace};
use crate::schemas::Page;
use crate::schemas::common::require_text;
use crate::schemas::organization::{OrganizationCreate, OrganizationUpdate};
use crate::slug::resolve_slug;

/// Repository for Organization database operations
pub struct OrganizationRepository<'a> {
    db: &'a DatabaseConnection,
}

impl<'a> OrganizationRepository<'a> {
    pub fn new(db: &'a DatabaseConnection) -> Self {
        Self { db }
    }

    /// Lists organizations, newest first
    pub async fn list(&self, page: Page) -> Result<Vec<organization::Model>, RepositoryError> {
        let organizations = Organization::find()
            .order_by_desc(organization::Column::CreatedAt)
            .limit(page.limit)
            .offset(page.offset)
            .all(self.db)
            .await?;

        Ok(organizations)
    }

    pub async fn get(&self, organization_id: Uuid) -> Result<organization::Model, RepositoryError> {
        Organization::find_by_id(organization_id)
            .one(self.db)
            .await?
            .ok_or_else(|| RepositoryError::not_found("Organization"))
    }

    /// Creates an organization; slugs are globally unique
    pub async fn create(
        &self,
        request: OrganizationCreate,
    ) -> Result<organization::Model, RepositoryError> {
        let name = require_text(&request.name, "Organization name")?;
        let slug = resolve_slug(&name, request.slug.as_deref())?;
        self.ensure_slug_free(&slug, None).await?;

        let timestamp = now();
        let organization = organization::ActiveModel {
            id: Set(Uuid::new_v4()),
            name: Set(name),
            slug: Set(slug),
            description: Set(request.description),
            logo_url: Set(request.logo_url),
            settings: Set(request.settings),
            subscription_tier: Set(request
                .subscription_tier
                .unwrap_or_else(|| "free".to_string())),
            created_at: Set(timestamp),
            updated_at: Set(timestamp),
        };

        Ok(organization.insert(self.db).await?)
    }

    pub async fn update(
        &self,
        organization_id: Uuid,
        update: OrganizationUpdate,
    ) -> Result<organization::Model, RepositoryError> {
        let existing = self.get(organization_id).await?;
        let slug = updated_slug(&existing.name, update.name.as_deref(), update.slug.as_deref())?;
        if let Some(slug) = &slug {
            self.ensure_slug_free(slug, Some(organization_id)).await?;
        }

        let mut active = existing.into_active_model();
        if let Some(name) = update.name {
            active.name = Set(require_text(&name, "Organization name")?);
        }
        if let Some(slug) = slug {
            active.slug = Set(slug);
        }
        if let Some(description) = update.description {
            active.description = Set(Some(description));
        }
        if let Some(logo_url) = update.logo_url {
            active.logo_url = Set(Some(logo_url));
        }
        if let Some(settings) = update.settings {
            active.settings = Set(settings);
        }
        if let Some(tier) = update.subscription_tier {
            active.subscription_tier = Set(tier);
        }
        active.updated_at = Set(now());

        Ok(active.update(self.db).await?)
    }

    /// Deletes an organization together with its workspaces. Returns rows of other
    /// organizations whose link lists were rebuilt.
    pub async fn delete(
        &self,
        organization_id: Uuid,
    ) -> Result<Vec<table_row::Model>, RepositoryError> {
        let organization = self.get(organization_id).await?;

        let txn = self.db.begin().await?;
        let workspace_ids: Vec<Uuid> = Workspace::find()
            .filter(workspace::Column::OrganizationId.eq(organization.id))
            .all(&txn)
            .await?
            .into_iter()
            .map(|workspace| workspace.id)
            .collect();
        let table_ids = tables_in_workspaces(&txn, workspace_ids).await?;
        let rebuilt = detach_target_tables(&txn, &table_ids).await?;
        organization.delete(&txn).await?;
        txn.commit().await?;

        Ok(rebuilt)
    }

    async fn ensure_slug_free(
        &self,
        slug: &str,
        except: Option<Uuid>,
    ) -> Result<(), RepositoryError> {
        let mut query = Organization::find().filter(organization::Column::Slug.eq(slug));
        if let Some(id) = except {
            query = query.filter(organization::Column::Id.ne(id));
        }

        if query.one(self.db).await?.is_some() {
            return Err(RepositoryError::conflict(format!(
                "Organization slug '{slug}' already exists"
            )));
        }
        Ok(())
    }
}
