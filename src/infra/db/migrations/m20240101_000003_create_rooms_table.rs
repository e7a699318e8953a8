//! Migration: Create rooms table with a per-property unique room number.

use sea_orm_migration::prelude::*;

use super::m20240101_000002_create_properties_table::Properties;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Rooms::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Rooms::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(Rooms::PropertyId).uuid().not_null())
                    .col(ColumnDef::new(Rooms::RoomNumber).string_len(32).not_null())
                    .col(ColumnDef::new(Rooms::Floor).integer().not_null())
                    .col(ColumnDef::new(Rooms::RoomType).string_len(16).not_null())
                    .col(ColumnDef::new(Rooms::Capacity).integer().not_null())
                    .col(
                        ColumnDef::new(Rooms::CurrentOccupancy)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .col(ColumnDef::new(Rooms::Rent).big_integer().not_null())
                    .col(
                        ColumnDef::new(Rooms::SecurityDeposit)
                            .big_integer()
                            .not_null()
                            .default(0),
                    )
                    .col(ColumnDef::new(Rooms::Area).integer().null())
                    .col(ColumnDef::new(Rooms::Furnishing).string_len(20).not_null())
                    .col(ColumnDef::new(Rooms::Amenities).json_binary().not_null())
                    .col(ColumnDef::new(Rooms::Status).string_len(16).not_null())
                    .col(ColumnDef::new(Rooms::Images).json_binary().not_null())
                    .col(ColumnDef::new(Rooms::Description).text().null())
                    .col(
                        ColumnDef::new(Rooms::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Rooms::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_rooms_property")
                            .from(Rooms::Table, Rooms::PropertyId)
                            .to(Properties::Table, Properties::Id),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_rooms_property_room_number")
                    .table(Rooms::Table)
                    .col(Rooms::PropertyId)
                    .col(Rooms::RoomNumber)
                    .unique()
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Rooms::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
pub(super) enum Rooms {
    Table,
    Id,
    PropertyId,
    RoomNumber,
    Floor,
    RoomType,
    Capacity,
    CurrentOccupancy,
    Rent,
    SecurityDeposit,
    Area,
    Furnishing,
    Amenities,
    Status,
    Images,
    Description,
    CreatedAt,
    UpdatedAt,
}
