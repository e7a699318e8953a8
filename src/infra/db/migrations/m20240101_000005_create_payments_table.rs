//! Migration: Create payments table, one row per tenant and month.

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
                    .table(Payments::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Payments::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(Payments::TenantId).uuid().not_null())
                    .col(ColumnDef::new(Payments::PropertyId).uuid().not_null())
                    .col(ColumnDef::new(Payments::RoomId).uuid().not_null())
                    .col(ColumnDef::new(Payments::Month).string_len(7).not_null())
                    .col(ColumnDef::new(Payments::Amount).big_integer().not_null())
                    .col(
                        ColumnDef::new(Payments::LateFee)
                            .big_integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(Payments::Discount)
                            .big_integer()
                            .not_null()
                            .default(0),
                    )
                    .col(ColumnDef::new(Payments::TotalAmount).big_integer().not_null())
                    .col(ColumnDef::new(Payments::DueDate).date().not_null())
                    .col(ColumnDef::new(Payments::PaymentDate).date().null())
                    .col(ColumnDef::new(Payments::PaymentMethod).string_len(16).null())
                    .col(ColumnDef::new(Payments::TransactionId).string().null())
                    .col(ColumnDef::new(Payments::Status).string_len(16).not_null())
                    .col(ColumnDef::new(Payments::Receipt).string().null())
                    .col(ColumnDef::new(Payments::Notes).text().null())
                    .col(ColumnDef::new(Payments::RecordedBy).uuid().null())
                    .col(
                        ColumnDef::new(Payments::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Payments::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_payments_tenant")
                            .from(Payments::Table, Payments::TenantId)
                            .to(Tenants::Table, Tenants::Id),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_payments_tenant_month")
                    .table(Payments::Table)
                    .col(Payments::TenantId)
                    .col(Payments::Month)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_payments_property_status")
                    .table(Payments::Table)
                    .col(Payments::PropertyId)
                    .col(Payments::Status)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Payments::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum Payments {
    Table,
    Id,
    TenantId,
    PropertyId,
    RoomId,
    Month,
    Amount,
    LateFee,
    Discount,
    TotalAmount,
    DueDate,
    PaymentDate,
    PaymentMethod,
    TransactionId,
    Status,
    Receipt,
    Notes,
    RecordedBy,
    CreatedAt,
    UpdatedAt,
}
