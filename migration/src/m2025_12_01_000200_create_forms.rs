//! Creates forms together with their fields and submissions.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Forms::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Forms::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(Forms::WorkspaceId).uuid().not_null())
                    .col(ColumnDef::new(Forms::Name).string_len(255).not_null())
                    .col(ColumnDef::new(Forms::Slug).string_len(255).not_null())
                    .col(ColumnDef::new(Forms::Description).text().null())
                    .col(ColumnDef::new(Forms::Settings).json_binary().not_null())
                    .col(ColumnDef::new(Forms::SubmitSettings).json_binary().not_null())
                    .col(
                        ColumnDef::new(Forms::Status)
                            .string_len(50)
                            .not_null()
                            .default("draft")
                            .check(Expr::col(Forms::Status).is_in([
                                "draft",
                                "published",
                                "archived",
                                "paused",
                            ])),
                    )
                    .col(ColumnDef::new(Forms::Version).integer().not_null().default(1))
                    .col(
                        ColumnDef::new(Forms::IsPublic)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(ColumnDef::new(Forms::CreatedBy).uuid().null())
                    .col(
                        ColumnDef::new(Forms::PublishedAt)
                            .timestamp_with_time_zone()
                            .null(),
                    )
                    .col(
                        ColumnDef::new(Forms::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        ColumnDef::new(Forms::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_forms_workspace_id")
                            .from(Forms::Table, Forms::WorkspaceId)
                            .to(Workspaces::Table, Workspaces::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_forms_workspace_id")
                    .table(Forms::Table)
                    .col(Forms::WorkspaceId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(FormFields::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(FormFields::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(FormFields::FormId).uuid().not_null())
                    .col(ColumnDef::new(FormFields::Name).string_len(255).not_null())
                    .col(ColumnDef::new(FormFields::Label).string_len(255).not_null())
                    .col(ColumnDef::new(FormFields::Placeholder).text().null())
                    .col(ColumnDef::new(FormFields::Description).text().null())
                    .col(ColumnDef::new(FormFields::FieldType).string_len(50).not_null())
                    .col(ColumnDef::new(FormFields::Settings).json_binary().not_null())
                    .col(ColumnDef::new(FormFields::Validation).json_binary().not_null())
                    .col(ColumnDef::new(FormFields::Options).json_binary().not_null())
                    .col(
                        ColumnDef::new(FormFields::Position)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(FormFields::Width)
                            .string_len(20)
                            .not_null()
                            .default("full")
                            .check(Expr::col(FormFields::Width).is_in([
                                "full", "half", "third", "quarter",
                            ])),
                    )
                    .col(
                        ColumnDef::new(FormFields::IsVisible)
                            .boolean()
                            .not_null()
                            .default(true),
                    )
                    .col(
                        ColumnDef::new(FormFields::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        ColumnDef::new(FormFields::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_form_fields_form_id")
                            .from(FormFields::Table, FormFields::FormId)
                            .to(Forms::Table, Forms::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_form_fields_form_id")
                    .table(FormFields::Table)
                    .col(FormFields::FormId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(FormSubmissions::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(FormSubmissions::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(FormSubmissions::FormId).uuid().not_null())
                    .col(ColumnDef::new(FormSubmissions::Data).json_binary().not_null())
                    .col(
                        ColumnDef::new(FormSubmissions::Metadata)
                            .json_binary()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(FormSubmissions::Status)
                            .string_len(50)
                            .not_null()
                            .default("submitted")
                            .check(Expr::col(FormSubmissions::Status).is_in([
                                "submitted",
                                "reviewed",
                                "approved",
                                "rejected",
                            ])),
                    )
                    .col(ColumnDef::new(FormSubmissions::SubmittedBy).uuid().null())
                    .col(ColumnDef::new(FormSubmissions::Email).string_len(255).null())
                    .col(
                        ColumnDef::new(FormSubmissions::SubmittedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        ColumnDef::new(FormSubmissions::ReviewedAt)
                            .timestamp_with_time_zone()
                            .null(),
                    )
                    .col(ColumnDef::new(FormSubmissions::ReviewedBy).uuid().null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_form_submissions_form_id")
                            .from(FormSubmissions::Table, FormSubmissions::FormId)
                            .to(Forms::Table, Forms::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_form_submissions_form_id")
                    .table(FormSubmissions::Table)
                    .col(FormSubmissions::FormId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(FormSubmissions::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(FormFields::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Forms::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum Forms {
    Table,
    Id,
    WorkspaceId,
    Name,
    Slug,
    Description,
    Settings,
    SubmitSettings,
    Status,
    Version,
    IsPublic,
    CreatedBy,
    PublishedAt,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum FormFields {
    Table,
    Id,
    FormId,
    Name,
    Label,
    Placeholder,
    Description,
    FieldType,
    Settings,
    Validation,
    Options,
    Position,
    Width,
    IsVisible,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum FormSubmissions {
    Table,
    Id,
    FormId,
    Data,
    Metadata,
    Status,
    SubmittedBy,
    Email,
    SubmittedAt,
    ReviewedAt,
    ReviewedBy,
}

#[derive(DeriveIden)]
enum Workspaces {
    Table,
    Id,
}
