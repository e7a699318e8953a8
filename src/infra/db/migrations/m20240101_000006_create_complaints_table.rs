//! Migration: Create complaints table.

use sea_orm_migration::prelude::*;

use super::m20240101_000004_create_tenants_table::Tenants;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Complaints::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Complaints::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Complaints::TenantId).uuid().not_null())
                    .col(ColumnDef::new(Complaints::PropertyId).uuid().not_null())
                    .col(ColumnDef::new(Complaints::RoomId).uuid().not_null())
                    .col(ColumnDef::new(Complaints::Title).string_len(200).not_null())
                    .col(ColumnDef::new(Complaints::Description).text().not_null())
                    .col(ColumnDef::new(Complaints::Category).string_len(16).not_null())
                    .col(ColumnDef::new(Complaints::Priority).string_len(16).not_null())
                    .col(ColumnDef::new(Complaints::Status).string_len(16).not_null())
                    .col(ColumnDef::new(Complaints::Images).json_binary().not_null())
                    .col(ColumnDef::new(Complaints::AssignedTo).string().null())
                    .col(ColumnDef::new(Complaints::Response).text().null())
                    .col(
                        ColumnDef::new(Complaints::ResolvedAt)
                            .timestamp_with_time_zone()
                            .null(),
                    )
                    .col(ColumnDef::new(Complaints::ResolvedBy).uuid().null())
                    .col(ColumnDef::new(Complaints::Timeline).json_binary().not_null())
                    .col(
                        ColumnDef::new(Complaints::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Complaints::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_complaints_tenant")
                            .from(Complaints::Table, Complaints::TenantId)
                            .to(Tenants::Table, Tenants::Id),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_complaints_property_status")
                    .table(Complaints::Table)
                    .col(Complaints::PropertyId)
                    .col(Complaints::Status)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Complaints::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum Complaints {
    Table,
    Id,
    TenantId,
    PropertyId,
    RoomId,
    Title,
    Description,
    Category,
    Priority,
    Status,
    Images,
    AssignedTo,
    Response,
    ResolvedAt,
    ResolvedBy,
    Timeline,
    CreatedAt,
    UpdatedAt,
}
