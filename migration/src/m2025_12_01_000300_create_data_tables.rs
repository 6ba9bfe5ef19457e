//! Creates spreadsheet-like data tables: tables, columns, rows, views and row comments.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(DataTables::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(DataTables::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(DataTables::WorkspaceId).uuid().not_null())
                    .col(ColumnDef::new(DataTables::Name).string_len(255).not_null())
                    .col(ColumnDef::new(DataTables::Slug).string_len(255).not_null())
                    .col(ColumnDef::new(DataTables::Description).text().null())
                    .col(
                        ColumnDef::new(DataTables::Icon)
                            .string_len(50)
                            .not_null()
                            .default("table"),
                    )
                    .col(
                        ColumnDef::new(DataTables::Color)
                            .string_len(7)
                            .not_null()
                            .default("#10B981"),
                    )
                    .col(ColumnDef::new(DataTables::Settings).json_binary().not_null())
                    .col(ColumnDef::new(DataTables::ImportSource).string_len(50).null())
                    .col(
                        ColumnDef::new(DataTables::ImportMetadata)
                            .json_binary()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(DataTables::IsArchived)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(
                        ColumnDef::new(DataTables::RowCount)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .col(ColumnDef::new(DataTables::CreatedBy).uuid().null())
                    .col(
                        ColumnDef::new(DataTables::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        ColumnDef::new(DataTables::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_data_tables_workspace_id")
                            .from(DataTables::Table, DataTables::WorkspaceId)
                            .to(Workspaces::Table, Workspaces::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_data_tables_workspace_id")
                    .table(DataTables::Table)
                    .col(DataTables::WorkspaceId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(TableColumns::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(TableColumns::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(TableColumns::TableId).uuid().not_null())
                    .col(ColumnDef::new(TableColumns::Name).string_len(255).not_null())
                    .col(ColumnDef::new(TableColumns::Label).string_len(255).not_null())
                    .col(ColumnDef::new(TableColumns::Description).text().null())
                    .col(
                        ColumnDef::new(TableColumns::ColumnType)
                            .string_len(50)
                            .not_null(),
                    )
                    .col(ColumnDef::new(TableColumns::Settings).json_binary().not_null())
                    .col(
                        ColumnDef::new(TableColumns::Validation)
                            .json_binary()
                            .not_null(),
                    )
                    .col(ColumnDef::new(TableColumns::Formula).text().null())
                    .col(
                        ColumnDef::new(TableColumns::FormulaDependencies)
                            .json_binary()
                            .not_null(),
                    )
                    .col(ColumnDef::new(TableColumns::LinkedTableId).uuid().null())
                    .col(ColumnDef::new(TableColumns::LinkedColumnId).uuid().null())
                    .col(
                        ColumnDef::new(TableColumns::RollupFunction)
                            .string_len(50)
                            .null(),
                    )
                    .col(
                        ColumnDef::new(TableColumns::Position)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(TableColumns::Width)
                            .integer()
                            .not_null()
                            .default(150),
                    )
                    .col(
                        ColumnDef::new(TableColumns::IsVisible)
                            .boolean()
                            .not_null()
                            .default(true),
                    )
                    .col(
                        ColumnDef::new(TableColumns::IsPrimary)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(
                        ColumnDef::new(TableColumns::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        ColumnDef::new(TableColumns::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_table_columns_table_id")
                            .from(TableColumns::Table, TableColumns::TableId)
                            .to(DataTables::Table, DataTables::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_table_columns_linked_table_id")
                            .from(TableColumns::Table, TableColumns::LinkedTableId)
                            .to(DataTables::Table, DataTables::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_table_columns_linked_column_id")
                            .from(TableColumns::Table, TableColumns::LinkedColumnId)
                            .to(TableColumns::Table, TableColumns::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_table_columns_table_id")
                    .table(TableColumns::Table)
                    .col(TableColumns::TableId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(TableRows::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(TableRows::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(TableRows::TableId).uuid().not_null())
                    .col(ColumnDef::new(TableRows::Data).json_binary().not_null())
                    .col(ColumnDef::new(TableRows::Metadata).json_binary().not_null())
                    .col(
                        ColumnDef::new(TableRows::IsArchived)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(ColumnDef::new(TableRows::Position).double().null())
                    .col(ColumnDef::new(TableRows::CreatedBy).uuid().null())
                    .col(ColumnDef::new(TableRows::UpdatedBy).uuid().null())
                    .col(
                        ColumnDef::new(TableRows::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        ColumnDef::new(TableRows::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_table_rows_table_id")
                            .from(TableRows::Table, TableRows::TableId)
                            .to(DataTables::Table, DataTables::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_table_rows_table_id")
                    .table(TableRows::Table)
                    .col(TableRows::TableId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(TableViews::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(TableViews::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(TableViews::TableId).uuid().not_null())
                    .col(ColumnDef::new(TableViews::Name).string_len(255).not_null())
                    .col(ColumnDef::new(TableViews::Description).text().null())
                    .col(
                        ColumnDef::new(TableViews::ViewType)
                            .string_len(50)
                            .not_null()
                            .default("grid")
                            .check(Expr::col(TableViews::ViewType).is_in([
                                "grid", "kanban", "calendar", "gallery", "timeline", "form",
                            ])),
                    )
                    .col(ColumnDef::new(TableViews::Settings).json_binary().not_null())
                    .col(ColumnDef::new(TableViews::Filters).json_binary().not_null())
                    .col(ColumnDef::new(TableViews::Sorts).json_binary().not_null())
                    .col(ColumnDef::new(TableViews::Grouping).json_binary().not_null())
                    .col(
                        ColumnDef::new(TableViews::IsShared)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(
                        ColumnDef::new(TableViews::IsLocked)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(ColumnDef::new(TableViews::CreatedBy).uuid().null())
                    .col(
                        ColumnDef::new(TableViews::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        ColumnDef::new(TableViews::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_table_views_table_id")
                            .from(TableViews::Table, TableViews::TableId)
                            .to(DataTables::Table, DataTables::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_table_views_table_id")
                    .table(TableViews::Table)
                    .col(TableViews::TableId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(TableComments::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(TableComments::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(TableComments::TableId).uuid().not_null())
                    .col(ColumnDef::new(TableComments::RowId).uuid().not_null())
                    .col(ColumnDef::new(TableComments::Content).text().not_null())
                    .col(ColumnDef::new(TableComments::ParentCommentId).uuid().null())
                    .col(ColumnDef::new(TableComments::CreatedBy).uuid().null())
                    .col(
                        ColumnDef::new(TableComments::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        ColumnDef::new(TableComments::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_table_comments_table_id")
                            .from(TableComments::Table, TableComments::TableId)
                            .to(DataTables::Table, DataTables::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_table_comments_row_id")
                            .from(TableComments::Table, TableComments::RowId)
                            .to(TableRows::Table, TableRows::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_table_comments_parent_comment_id")
                            .from(TableComments::Table, TableComments::ParentCommentId)
                            .to(TableComments::Table, TableComments::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_table_comments_row_id")
                    .table(TableComments::Table)
                    .col(TableComments::RowId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(TableComments::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(TableViews::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(TableRows::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(TableColumns::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(DataTables::Table).to_owned())
            .await?;
        Ok(())
    }
}

#[derive(DeriveIden)]
enum DataTables {
    Table,
    Id,
    WorkspaceId,
    Name,
    Slug,
    Description,
    Icon,
    Color,
    Settings,
    ImportSource,
    ImportMetadata,
    IsArchived,
    RowCount,
    CreatedBy,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum TableColumns {
    Table,
    Id,
    TableId,
    Name,
    Label,
    Description,
    ColumnType,
    Settings,
    Validation,
    Formula,
    FormulaDependencies,
    LinkedTableId,
    LinkedColumnId,
    RollupFunction,
    Position,
    Width,
    IsVisible,
    IsPrimary,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum TableRows {
    Table,
    Id,
    TableId,
    Data,
    Metadata,
    IsArchived,
    Position,
    CreatedBy,
    UpdatedBy,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum TableViews {
    Table,
    Id,
    TableId,
    Name,
    Description,
    ViewType,
    Settings,
    Filters,
    Sorts,
    Grouping,
    IsShared,
    IsLocked,
    CreatedBy,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum TableComments {
    Table,
    Id,
    TableId,
    RowId,
    Content,
    ParentCommentId,
    CreatedBy,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum Workspaces {
    Table,
    Id,
}
