//! Migration: One active user per email, compared case-insensitively.
//!
//! Soft-deleted rows and blank emails are outside the index, so a deleted
//! user's address can be registered again.

use sea_orm::Statement;
use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Expression and partial indexes share this syntax on PostgreSQL and SQLite
        let db = manager.get_connection();
        db.execute(Statement::from_string(
            manager.get_database_backend(),
            "CREATE UNIQUE INDEX IF NOT EXISTS idx_users_active_email \
             ON users (UPPER(email)) \
             WHERE deleted_at IS NULL AND email <> ''",
        ))
        .await?;
        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let db = manager.get_connection();
        db.execute(Statement::from_string(
            manager.get_database_backend(),
            "DROP INDEX IF EXISTS idx_users_active_email",
        ))
        .await?;
        Ok(())
    }
}
