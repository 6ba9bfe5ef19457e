//! Creates the tenant hierarchy: organizations and the workspaces they own.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Organizations::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Organizations::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Organizations::Name).string_len(255).not_null())
                    .col(
                        ColumnDef::new(Organizations::Slug)
                            .string_len(255)
                            .not_null()
                            .unique_key(),
                    )
                    .col(ColumnDef::new(Organizations::Description).text().null())
                    .col(ColumnDef::new(Organizations::LogoUrl).text().null())
                    .col(ColumnDef::new(Organizations::Settings).json_binary().not_null())
                    .col(
                        ColumnDef::new(Organizations::SubscriptionTier)
                            .string_len(50)
                            .not_null()
                            .default("free"),
                    )
                    .col(
                        ColumnDef::new(Organizations::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        ColumnDef::new(Organizations::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Workspaces::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Workspaces::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Workspaces::OrganizationId).uuid().not_null())
                    .col(ColumnDef::new(Workspaces::Name).string_len(255).not_null())
                    .col(ColumnDef::new(Workspaces::Slug).string_len(255).not_null())
                    .col(ColumnDef::new(Workspaces::Description).text().null())
                    .col(
                        ColumnDef::new(Workspaces::Color)
                            .string_len(7)
                            .not_null()
                            .default("#3B82F6"),
                    )
                    .col(
                        ColumnDef::new(Workspaces::Icon)
                            .string_len(50)
                            .not_null()
                            .default("folder"),
                    )
                    .col(ColumnDef::new(Workspaces::Settings).json_binary().not_null())
                    .col(
                        ColumnDef::new(Workspaces::IsArchived)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(ColumnDef::new(Workspaces::CreatedBy).uuid().null())
                    .col(
                        ColumnDef::new(Workspaces::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        ColumnDef::new(Workspaces::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_workspaces_organization_id")
                            .from(Workspaces::Table, Workspaces::OrganizationId)
                            .to(Organizations::Table, Organizations::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_workspaces_organization_id")
                    .table(Workspaces::Table)
                    .col(Workspaces::OrganizationId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Workspaces::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Organizations::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum Organizations {
    Table,
    Id,
    Name,
    Slug,
    Description,
    LogoUrl,
    Settings,
    SubscriptionTier,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum Workspaces {
    Table,
    Id,
    OrganizationId,
    Name,
    Slug,
    Description,
    Color,
    Icon,
    Settings,
    IsArchived,
    CreatedBy,
    CreatedAt,
    UpdatedAt,
}
