//! Creates the append-only barcode scan audit log.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(ScanHistory::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(ScanHistory::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(ScanHistory::WorkspaceId).uuid().null())
                    .col(ColumnDef::new(ScanHistory::TableId).uuid().null())
                    .col(ColumnDef::new(ScanHistory::ColumnName).string_len(255).null())
                    .col(ColumnDef::new(ScanHistory::Barcode).text().not_null())
                    .col(
                        ColumnDef::new(ScanHistory::Found)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(
                        ColumnDef::new(ScanHistory::MatchedRowIds)
                            .json_binary()
                            .not_null(),
                    )
                    .col(ColumnDef::new(ScanHistory::ScannedBy).uuid().null())
                    .col(ColumnDef::new(ScanHistory::DeviceId).string_len(255).null())
                    .col(ColumnDef::new(ScanHistory::Metadata).json_binary().not_null())
                    .col(
                        ColumnDef::new(ScanHistory::ScannedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_scan_history_workspace_id")
                            .from(ScanHistory::Table, ScanHistory::WorkspaceId)
                            .to(Workspaces::Table, Workspaces::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_scan_history_table_id")
                            .from(ScanHistory::Table, ScanHistory::TableId)
                            .to(DataTables::Table, DataTables::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_scan_history_barcode")
                    .table(ScanHistory::Table)
                    .col(ScanHistory::Barcode)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_scan_history_table_id")
                    .table(ScanHistory::Table)
                    .col(ScanHistory::TableId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_scan_history_scanned_at")
                    .table(ScanHistory::Table)
                    .col(ScanHistory::ScannedAt)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(ScanHistory::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum ScanHistory {
    Table,
    Id,
    WorkspaceId,
    TableId,
    ColumnName,
    Barcode,
    Found,
    MatchedRowIds,
    ScannedBy,
    DeviceId,
    Metadata,
    ScannedAt,
}

#[derive(DeriveIden)]
enum Workspaces {
    Table,
    Id,
}

#[derive(DeriveIden)]
enum DataTables {
    Table,
    Id,
}
