//! Migration: Create notices table. A NULL property marks a global notice.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Notices::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Notices::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(Notices::PropertyId).uuid().null())
                    .col(ColumnDef::new(Notices::CreatedBy).uuid().not_null())
                    .col(ColumnDef::new(Notices::Title).string_len(200).not_null())
                    .col(ColumnDef::new(Notices::Content).text().not_null())
                    .col(ColumnDef::new(Notices::Category).string_len(16).not_null())
                    .col(ColumnDef::new(Notices::Priority).string_len(16).not_null())
                    .col(
                        ColumnDef::new(Notices::TargetAudience)
                            .string_len(20)
                            .not_null(),
                    )
                    .col(ColumnDef::new(Notices::TargetFloor).integer().null())
                    .col(
                        ColumnDef::new(Notices::ValidFrom)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Notices::ValidTill)
                            .timestamp_with_time_zone()
                            .null(),
                    )
                    .col(ColumnDef::new(Notices::Status).string_len(16).not_null())
                    .col(ColumnDef::new(Notices::Attachments).json_binary().not_null())
                    .col(ColumnDef::new(Notices::ReadBy).json_binary().not_null())
                    .col(
                        ColumnDef::new(Notices::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Notices::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_notices_property_id")
                    .table(Notices::Table)
                    .col(Notices::PropertyId)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Notices::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum Notices {
    Table,
    Id,
    PropertyId,
    CreatedBy,
    Title,
    Content,
    Category,
    Priority,
    TargetAudience,
    TargetFloor,
    ValidFrom,
    ValidTill,
    Status,
    Attachments,
    ReadBy,
    CreatedAt,
    UpdatedAt,
}
