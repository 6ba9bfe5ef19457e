//! Creates request hubs and their tabs.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(RequestHubs::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(RequestHubs::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(RequestHubs::WorkspaceId).uuid().not_null())
                    .col(ColumnDef::new(RequestHubs::Name).string_len(255).not_null())
                    .col(ColumnDef::new(RequestHubs::Slug).string_len(255).not_null())
                    .col(ColumnDef::new(RequestHubs::Description).text().null())
                    .col(ColumnDef::new(RequestHubs::Settings).json_binary().not_null())
                    .col(
                        ColumnDef::new(RequestHubs::IsActive)
                            .boolean()
                            .not_null()
                            .default(true),
                    )
                    .col(ColumnDef::new(RequestHubs::CreatedBy).uuid().null())
                    .col(
                        ColumnDef::new(RequestHubs::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        ColumnDef::new(RequestHubs::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_request_hubs_workspace_id")
                            .from(RequestHubs::Table, RequestHubs::WorkspaceId)
                            .to(Workspaces::Table, Workspaces::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_request_hubs_workspace_slug")
                    .table(RequestHubs::Table)
                    .col(RequestHubs::WorkspaceId)
                    .col(RequestHubs::Slug)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(RequestHubTabs::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(RequestHubTabs::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(RequestHubTabs::HubId).uuid().not_null())
                    .col(ColumnDef::new(RequestHubTabs::Name).string_len(255).not_null())
                    .col(ColumnDef::new(RequestHubTabs::Slug).string_len(255).not_null())
                    .col(
                        ColumnDef::new(RequestHubTabs::TabType)
                            .string_len(50)
                            .not_null()
                            .default("requests"),
                    )
                    .col(ColumnDef::new(RequestHubTabs::Icon).string_len(50).null())
                    .col(
                        ColumnDef::new(RequestHubTabs::Position)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(RequestHubTabs::IsVisible)
                            .boolean()
                            .not_null()
                            .default(true),
                    )
                    .col(ColumnDef::new(RequestHubTabs::Config).json_binary().not_null())
                    .col(
                        ColumnDef::new(RequestHubTabs::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        ColumnDef::new(RequestHubTabs::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_request_hub_tabs_hub_id")
                            .from(RequestHubTabs::Table, RequestHubTabs::HubId)
                            .to(RequestHubs::Table, RequestHubs::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_request_hub_tabs_hub_slug")
                    .table(RequestHubTabs::Table)
                    .col(RequestHubTabs::HubId)
                    .col(RequestHubTabs::Slug)
                    .unique()
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(RequestHubTabs::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(RequestHubs::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum RequestHubs {
    Table,
    Id,
    WorkspaceId,
    Name,
    Slug,
    Description,
    Settings,
    IsActive,
    CreatedBy,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum RequestHubTabs {
    Table,
    Id,
    HubId,
    Name,
    Slug,
    TabType,
    Icon,
    Position,
    IsVisible,
    Config,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum Workspaces {
    Table,
    Id,
}
