//! Migration: Create roles and the lookup tables.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Roles::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Roles::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Roles::Name).string_len(20).not_null())
                    .col(ColumnDef::new(Roles::DisplayName).string_len(50).not_null())
                    .to_owned(),
            )
            .await?;

        // Role names are machine keys
        manager
            .create_index(
                Index::create()
                    .name("idx_roles_name")
                    .table(Roles::Table)
                    .col(Roles::Name)
                    .unique()
                    .to_owned(),
            )
            .await?;

        for table in [
            Lookup::Streets,
            Lookup::Districts,
            Lookup::RealEstateTypes,
            Lookup::InteractionStatuses,
        ] {
            manager
                .create_table(
                    Table::create()
                        .table(table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(Lookup::Id)
                                .integer()
                                .not_null()
                                .auto_increment()
                                .primary_key(),
                        )
                        .col(ColumnDef::new(Lookup::Name).string_len(100).not_null())
                        .to_owned(),
                )
                .await?;
        }

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        for table in [
            Lookup::InteractionStatuses,
            Lookup::RealEstateTypes,
            Lookup::Districts,
            Lookup::Streets,
        ] {
            manager
                .drop_table(Table::drop().table(table).to_owned())
                .await?;
        }

        manager
            .drop_table(Table::drop().table(Roles::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum Roles {
    Table,
    Id,
    Name,
    DisplayName,
}

/// Id/name tables share one shape.
#[derive(DeriveIden)]
enum Lookup {
    Streets,
    Districts,
    RealEstateTypes,
    InteractionStatuses,
    Id,
    Name,
}
