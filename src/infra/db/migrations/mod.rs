//! Database migrations.
//!
//! Each migration is a separate module following SeaORM conventions.
//! Migration names follow the pattern: m{YYYYMMDD}_{NNNNNN}_{description}

use sea_orm_migration::prelude::*;

mod m20240101_000001_create_users_table;
mod m20240101_000002_create_properties_table;
mod m20240101_000003_create_rooms_table;
mod m20240101_000004_create_tenants_table;
mod m20240101_000005_create_payments_table;
mod m20240101_000006_create_complaints_table;
mod m20240101_000007_create_notices_table;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20240101_000001_create_users_table::Migration),
            Box::new(m20240101_000002_create_properties_table::Migration),
            Box::new(m20240101_000003_create_rooms_table::Migration),
            Box::new(m20240101_000004_create_tenants_table::Migration),
            Box::new(m20240101_000005_create_payments_table::Migration),
            Box::new(m20240101_000006_create_complaints_table::Migration),
            Box::new(m20240101_000007_create_notices_table::Migration),
        ]
    }
}
