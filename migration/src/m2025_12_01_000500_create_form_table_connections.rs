//! Creates the mapping between forms and the data tables their submissions write into.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(FormTableConnections::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(FormTableConnections::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(FormTableConnections::FormId).uuid().not_null())
                    .col(ColumnDef::new(FormTableConnections::TableId).uuid().not_null())
                    .col(
                        ColumnDef::new(FormTableConnections::ConnectionType)
                            .string_len(50)
                            .not_null()
                            .default("write")
                            .check(Expr::col(FormTableConnections::ConnectionType).is_in([
                                "write", "read", "update",
                            ])),
                    )
                    .col(
                        ColumnDef::new(FormTableConnections::FieldMappings)
                            .json_binary()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(FormTableConnections::Filters)
                            .json_binary()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(FormTableConnections::Settings)
                            .json_binary()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(FormTableConnections::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        ColumnDef::new(FormTableConnections::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_form_table_connections_form_id")
                            .from(FormTableConnections::Table, FormTableConnections::FormId)
                            .to(Forms::Table, Forms::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_form_table_connections_table_id")
                            .from(FormTableConnections::Table, FormTableConnections::TableId)
                            .to(DataTables::Table, DataTables::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_form_table_connections_form_id")
                    .table(FormTableConnections::Table)
                    .col(FormTableConnections::FormId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_form_table_connections_table_id")
                    .table(FormTableConnections::Table)
                    .col(FormTableConnections::TableId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(FormTableConnections::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum FormTableConnections {
    Table,
    Id,
    FormId,
    TableId,
    ConnectionType,
    FieldMappings,
    Filters,
    Settings,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum Forms {
    Table,
    Id,
}

#[derive(DeriveIden)]
enum DataTables {
    Table,
    Id,
}
