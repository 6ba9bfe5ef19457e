//! Creates the relational link entities between tables and between individual rows.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(TableLinks::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(TableLinks::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(TableLinks::SourceTableId).uuid().not_null())
                    .col(ColumnDef::new(TableLinks::SourceColumnId).uuid().not_null())
                    .col(ColumnDef::new(TableLinks::TargetTableId).uuid().not_null())
                    .col(ColumnDef::new(TableLinks::TargetColumnId).uuid().null())
                    .col(
                        ColumnDef::new(TableLinks::LinkType)
                            .string_len(50)
                            .not_null()
                            .default("one_to_many")
                            .check(Expr::col(TableLinks::LinkType).is_in([
                                "one_to_one",
                                "one_to_many",
                                "many_to_many",
                            ])),
                    )
                    .col(ColumnDef::new(TableLinks::Settings).json_binary().not_null())
                    .col(
                        ColumnDef::new(TableLinks::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_table_links_source_table_id")
                            .from(TableLinks::Table, TableLinks::SourceTableId)
                            .to(DataTables::Table, DataTables::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_table_links_source_column_id")
                            .from(TableLinks::Table, TableLinks::SourceColumnId)
                            .to(TableColumns::Table, TableColumns::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_table_links_target_table_id")
                            .from(TableLinks::Table, TableLinks::TargetTableId)
                            .to(DataTables::Table, DataTables::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_table_links_target_column_id")
                            .from(TableLinks::Table, TableLinks::TargetColumnId)
                            .to(TableColumns::Table, TableColumns::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .to_owned(),
            )
            .await?;

        // One link definition per link column
        manager
            .create_index(
                Index::create()
                    .name("idx_table_links_source_column_id")
                    .table(TableLinks::Table)
                    .col(TableLinks::SourceColumnId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_table_links_target_table_id")
                    .table(TableLinks::Table)
                    .col(TableLinks::TargetTableId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(TableRowLinks::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(TableRowLinks::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(TableRowLinks::LinkId).uuid().not_null())
                    .col(ColumnDef::new(TableRowLinks::SourceRowId).uuid().not_null())
                    .col(ColumnDef::new(TableRowLinks::TargetRowId).uuid().not_null())
                    .col(ColumnDef::new(TableRowLinks::Metadata).json_binary().not_null())
                    .col(
                        ColumnDef::new(TableRowLinks::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_table_row_links_link_id")
                            .from(TableRowLinks::Table, TableRowLinks::LinkId)
                            .to(TableLinks::Table, TableLinks::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_table_row_links_source_row_id")
                            .from(TableRowLinks::Table, TableRowLinks::SourceRowId)
                            .to(TableRows::Table, TableRows::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_table_row_links_target_row_id")
                            .from(TableRowLinks::Table, TableRowLinks::TargetRowId)
                            .to(TableRows::Table, TableRows::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_table_row_links_unique_pair")
                    .table(TableRowLinks::Table)
                    .col(TableRowLinks::LinkId)
                    .col(TableRowLinks::SourceRowId)
                    .col(TableRowLinks::TargetRowId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_table_row_links_target_row_id")
                    .table(TableRowLinks::Table)
                    .col(TableRowLinks::TargetRowId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(TableRowLinks::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(TableLinks::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum TableLinks {
    Table,
    Id,
    SourceTableId,
    SourceColumnId,
    TargetTableId,
    TargetColumnId,
    LinkType,
    Settings,
    CreatedAt,
}

#[derive(DeriveIden)]
enum TableRowLinks {
    Table,
    Id,
    LinkId,
    SourceRowId,
    TargetRowId,
    Metadata,
    CreatedAt,
}

#[derive(DeriveIden)]
enum DataTables {
    Table,
    Id,
}

#[derive(DeriveIden)]
enum TableColumns {
    Table,
    Id,
}

#[derive(DeriveIden)]
enum TableRows {
    Table,
    Id,
}
