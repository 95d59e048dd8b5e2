//! Database migrations.
//!
//! Each migration is a separate module following SeaORM conventions.
//! Migration names follow the pattern: m{YYYYMMDD}_{NNNNNN}_{description}

use sea_orm_migration::prelude::*;

mod m20240101_000001_create_reference_tables;
mod m20240101_000002_create_users_table;
mod m20240102_000001_create_listing_tables;
mod m20240103_000001_create_interactions_table;
mod m20240104_000001_add_user_soft_delete;
mod m20240105_000001_unique_active_email;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20240101_000001_create_reference_tables::Migration),
            Box::new(m20240101_000002_create_users_table::Migration),
            Box::new(m20240102_000001_create_listing_tables::Migration),
            Box::new(m20240103_000001_create_interactions_table::Migration),
            Box::new(m20240104_000001_add_user_soft_delete::Migration),
            Box::new(m20240105_000001_unique_active_email::Migration),
        ]
    }
}
