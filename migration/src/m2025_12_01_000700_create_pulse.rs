//! Creates the Pulse check-in tables: per-table configuration, check-ins and scanner sessions.
//!
//! Aggregate counters on `pulse_enabled_tables` are maintained by the application; no trigger
//! is installed here.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(PulseEnabledTables::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(PulseEnabledTables::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(PulseEnabledTables::TableId)
                            .uuid()
                            .not_null()
                            .unique_key(),
                    )
                    .col(ColumnDef::new(PulseEnabledTables::WorkspaceId).uuid().not_null())
                    .col(
                        ColumnDef::new(PulseEnabledTables::Enabled)
                            .boolean()
                            .not_null()
                            .default(true),
                    )
                    .col(ColumnDef::new(PulseEnabledTables::CheckInColumnId).uuid().null())
                    .col(
                        ColumnDef::new(PulseEnabledTables::DisplayColumns)
                            .json_binary()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(PulseEnabledTables::Settings)
                            .json_binary()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(PulseEnabledTables::TotalRsvps)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(PulseEnabledTables::CheckedInCount)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(PulseEnabledTables::WalkInCount)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(PulseEnabledTables::LastCheckInAt)
                            .timestamp_with_time_zone()
                            .null(),
                    )
                    .col(ColumnDef::new(PulseEnabledTables::CreatedBy).uuid().null())
                    .col(
                        ColumnDef::new(PulseEnabledTables::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        ColumnDef::new(PulseEnabledTables::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_pulse_enabled_tables_table_id")
                            .from(PulseEnabledTables::Table, PulseEnabledTables::TableId)
                            .to(DataTables::Table, DataTables::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_pulse_enabled_tables_workspace_id")
                            .from(PulseEnabledTables::Table, PulseEnabledTables::WorkspaceId)
                            .to(Workspaces::Table, Workspaces::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_pulse_enabled_tables_check_in_column_id")
                            .from(PulseEnabledTables::Table, PulseEnabledTables::CheckInColumnId)
                            .to(TableColumns::Table, TableColumns::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_pulse_enabled_tables_workspace_id")
                    .table(PulseEnabledTables::Table)
                    .col(PulseEnabledTables::WorkspaceId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(PulseCheckIns::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(PulseCheckIns::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(PulseCheckIns::PulseTableId).uuid().not_null())
                    .col(ColumnDef::new(PulseCheckIns::TableId).uuid().not_null())
                    .col(ColumnDef::new(PulseCheckIns::RowId).uuid().not_null())
                    .col(ColumnDef::new(PulseCheckIns::BarcodeScanned).text().null())
                    .col(
                        ColumnDef::new(PulseCheckIns::ScannerUserName)
                            .string_len(255)
                            .null(),
                    )
                    .col(
                        ColumnDef::new(PulseCheckIns::ScannerUserEmail)
                            .string_len(255)
                            .null(),
                    )
                    .col(
                        ColumnDef::new(PulseCheckIns::ScannerDeviceId)
                            .string_len(255)
                            .null(),
                    )
                    .col(
                        ColumnDef::new(PulseCheckIns::CheckInTime)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        ColumnDef::new(PulseCheckIns::CheckInCount)
                            .integer()
                            .not_null()
                            .default(1),
                    )
                    .col(ColumnDef::new(PulseCheckIns::RowData).json_binary().not_null())
                    .col(
                        ColumnDef::new(PulseCheckIns::IsWalkIn)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(ColumnDef::new(PulseCheckIns::Notes).text().null())
                    .col(ColumnDef::new(PulseCheckIns::CreatedBy).uuid().null())
                    .col(
                        ColumnDef::new(PulseCheckIns::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_pulse_check_ins_pulse_table_id")
                            .from(PulseCheckIns::Table, PulseCheckIns::PulseTableId)
                            .to(PulseEnabledTables::Table, PulseEnabledTables::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_pulse_check_ins_table_id")
                            .from(PulseCheckIns::Table, PulseCheckIns::TableId)
                            .to(DataTables::Table, DataTables::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_pulse_check_ins_row_id")
                            .from(PulseCheckIns::Table, PulseCheckIns::RowId)
                            .to(TableRows::Table, TableRows::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_pulse_check_ins_table_id")
                    .table(PulseCheckIns::Table)
                    .col(PulseCheckIns::TableId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_pulse_check_ins_row_id")
                    .table(PulseCheckIns::Table)
                    .col(PulseCheckIns::RowId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_pulse_check_ins_check_in_time")
                    .table(PulseCheckIns::Table)
                    .col(PulseCheckIns::CheckInTime)
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(PulseScannerSessions::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(PulseScannerSessions::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(PulseScannerSessions::PulseTableId)
                            .uuid()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(PulseScannerSessions::PairingCode)
                            .string_len(20)
                            .null(),
                    )
                    .col(
                        ColumnDef::new(PulseScannerSessions::ScannerName)
                            .string_len(255)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(PulseScannerSessions::ScannerEmail)
                            .string_len(255)
                            .null(),
                    )
                    .col(
                        ColumnDef::new(PulseScannerSessions::DeviceId)
                            .string_len(255)
                            .null(),
                    )
                    .col(
                        ColumnDef::new(PulseScannerSessions::IsActive)
                            .boolean()
                            .not_null()
                            .default(true),
                    )
                    .col(
                        ColumnDef::new(PulseScannerSessions::LastScanAt)
                            .timestamp_with_time_zone()
                            .null(),
                    )
                    .col(
                        ColumnDef::new(PulseScannerSessions::TotalScans)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(PulseScannerSessions::StartedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        ColumnDef::new(PulseScannerSessions::EndedAt)
                            .timestamp_with_time_zone()
                            .null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_pulse_scanner_sessions_pulse_table_id")
                            .from(PulseScannerSessions::Table, PulseScannerSessions::PulseTableId)
                            .to(PulseEnabledTables::Table, PulseEnabledTables::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_pulse_scanner_sessions_pulse_table_id")
                    .table(PulseScannerSessions::Table)
                    .col(PulseScannerSessions::PulseTableId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(PulseScannerSessions::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(PulseCheckIns::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(PulseEnabledTables::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum PulseEnabledTables {
    Table,
    Id,
    TableId,
    WorkspaceId,
    Enabled,
    CheckInColumnId,
    DisplayColumns,
    Settings,
    TotalRsvps,
    CheckedInCount,
    WalkInCount,
    LastCheckInAt,
    CreatedBy,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum PulseCheckIns {
    Table,
    Id,
    PulseTableId,
    TableId,
    RowId,
    BarcodeScanned,
    ScannerUserName,
    ScannerUserEmail,
    ScannerDeviceId,
    CheckInTime,
    CheckInCount,
    RowData,
    IsWalkIn,
    Notes,
    CreatedBy,
    CreatedAt,
}

#[derive(DeriveIden)]
enum PulseScannerSessions {
    Table,
    Id,
    PulseTableId,
    PairingCode,
    ScannerName,
    ScannerEmail,
    DeviceId,
    IsActive,
    LastScanAt,
    TotalScans,
    StartedAt,
    EndedAt,
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

#[derive(DeriveIden)]
enum Workspaces {
    Table,
    Id,
}
