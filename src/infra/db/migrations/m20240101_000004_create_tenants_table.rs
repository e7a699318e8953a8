//! Migration: Create tenants table.

use sea_orm_migration::prelude::*;

use super::m20240101_000001_create_users_table::Users;
use super::m20240101_000002_create_properties_table::Properties;
use super::m20240101_000003_create_rooms_table::Rooms;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Tenants::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Tenants::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(Tenants::UserId).uuid().not_null())
                    .col(ColumnDef::new(Tenants::PropertyId).uuid().not_null())
                    .col(ColumnDef::new(Tenants::RoomId).uuid().not_null())
                    .col(ColumnDef::new(Tenants::FullName).string_len(100).not_null())
                    .col(ColumnDef::new(Tenants::Email).string().not_null())
                    .col(ColumnDef::new(Tenants::Phone).string_len(16).not_null())
                    .col(ColumnDef::new(Tenants::AlternatePhone).string_len(16).null())
                    .col(ColumnDef::new(Tenants::EmergencyContact).json_binary().null())
                    .col(ColumnDef::new(Tenants::IdProof).json_binary().null())
                    .col(ColumnDef::new(Tenants::Occupation).json_binary().null())
                    .col(ColumnDef::new(Tenants::PermanentAddress).json_binary().null())
                    .col(ColumnDef::new(Tenants::MoveInDate).date().not_null())
                    .col(ColumnDef::new(Tenants::MoveOutDate).date().null())
                    .col(ColumnDef::new(Tenants::RentAmount).big_integer().not_null())
                    .col(
                        ColumnDef::new(Tenants::SecurityDeposit)
                            .big_integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(Tenants::SecurityDepositPaid)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(ColumnDef::new(Tenants::Status).string_len(16).not_null())
                    .col(ColumnDef::new(Tenants::NoticePeriod).json_binary().null())
                    .col(ColumnDef::new(Tenants::Agreement).json_binary().null())
                    .col(
                        ColumnDef::new(Tenants::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Tenants::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_tenants_user")
                            .from(Tenants::Table, Tenants::UserId)
                            .to(Users::Table, Users::Id),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_tenants_property")
                            .from(Tenants::Table, Tenants::PropertyId)
                            .to(Properties::Table, Properties::Id),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_tenants_room")
                            .from(Tenants::Table, Tenants::RoomId)
                            .to(Rooms::Table, Rooms::Id),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_tenants_room_status")
                    .table(Tenants::Table)
                    .col(Tenants::RoomId)
                    .col(Tenants::Status)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_tenants_user_id")
                    .table(Tenants::Table)
                    .col(Tenants::UserId)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Tenants::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
pub(super) enum Tenants {
    Table,
    Id,
    UserId,
    PropertyId,
    RoomId,
    FullName,
    Email,
    Phone,
    AlternatePhone,
    EmergencyContact,
    IdProof,
    Occupation,
    PermanentAddress,
    MoveInDate,
    MoveOutDate,
    RentAmount,
    SecurityDeposit,
    SecurityDepositPaid,
    Status,
    NoticePeriod,
    Agreement,
    CreatedAt,
    UpdatedAt,
}
