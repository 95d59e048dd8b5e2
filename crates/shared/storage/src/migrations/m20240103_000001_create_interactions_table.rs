//! Migration: Create interactions table.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Interactions::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Interactions::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Interactions::ClientId).integer().not_null())
                    .col(ColumnDef::new(Interactions::AgentId).integer().not_null())
                    .col(ColumnDef::new(Interactions::RealEstateId).integer().not_null())
                    .col(ColumnDef::new(Interactions::StatusId).integer().not_null())
                    .col(
                        ColumnDef::new(Interactions::ContactedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Interactions::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(ColumnDef::new(Interactions::Notes).string_len(500).null())
                    .col(
                        ColumnDef::new(Interactions::DeletedAt)
                            .timestamp_with_time_zone()
                            .null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_interactions_client")
                            .from(Interactions::Table, Interactions::ClientId)
                            .to(Users::Table, Users::Id),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_interactions_agent")
                            .from(Interactions::Table, Interactions::AgentId)
                            .to(Users::Table, Users::Id),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_interactions_real_estate")
                            .from(Interactions::Table, Interactions::RealEstateId)
                            .to(RealEstates::Table, RealEstates::Id),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_interactions_status")
                            .from(Interactions::Table, Interactions::StatusId)
                            .to(InteractionStatuses::Table, InteractionStatuses::Id),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_interactions_agent")
                    .table(Interactions::Table)
                    .col(Interactions::AgentId)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Interactions::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum Interactions {
    Table,
    Id,
    ClientId,
    AgentId,
    RealEstateId,
    StatusId,
    ContactedAt,
    UpdatedAt,
    Notes,
    DeletedAt,
}

#[derive(DeriveIden)]
enum Users {
    Table,
    Id,
}

#[derive(DeriveIden)]
enum RealEstates {
    Table,
    Id,
}

#[derive(DeriveIden)]
enum InteractionStatuses {
    Table,
    Id,
}
