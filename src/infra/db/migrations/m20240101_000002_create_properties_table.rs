//! Migration: Create properties table.

use sea_orm_migration::prelude::*;

use super::m20240101_000001_create_users_table::Users;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Properties::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Properties::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Properties::OwnerId).uuid().not_null())
                    .col(ColumnDef::new(Properties::Name).string_len(100).not_null())
                    .col(
                        ColumnDef::new(Properties::PropertyType)
                            .string_len(16)
                            .not_null(),
                    )
                    .col(ColumnDef::new(Properties::Address).json_binary().not_null())
                    .col(ColumnDef::new(Properties::Contact).json_binary().not_null())
                    .col(ColumnDef::new(Properties::Amenities).json_binary().not_null())
                    .col(ColumnDef::new(Properties::Description).text().null())
                    .col(ColumnDef::new(Properties::Rules).text().null())
                    .col(ColumnDef::new(Properties::Images).json_binary().not_null())
                    .col(
                        ColumnDef::new(Properties::TotalRooms)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(Properties::OccupiedRooms)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .col(ColumnDef::new(Properties::Status).string_len(16).not_null())
                    .col(
                        ColumnDef::new(Properties::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Properties::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_properties_owner")
                            .from(Properties::Table, Properties::OwnerId)
                            .to(Users::Table, Users::Id),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_properties_owner_id")
                    .table(Properties::Table)
                    .col(Properties::OwnerId)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Properties::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
pub(super) enum Properties {
    Table,
    Id,
    OwnerId,
    Name,
    PropertyType,
    Address,
    Contact,
    Amenities,
    Description,
    Rules,
    Images,
    TotalRooms,
    OccupiedRooms,
    Status,
    CreatedAt,
    UpdatedAt,
}
