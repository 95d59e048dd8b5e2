//! Migration: Create houses, listings and listing photos.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Houses::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Houses::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Houses::StreetId).integer().not_null())
                    .col(ColumnDef::new(Houses::DistrictId).integer().not_null())
                    .col(ColumnDef::new(Houses::Number).string_len(20).not_null())
                    .col(ColumnDef::new(Houses::TotalFloors).integer().not_null())
                    .col(
                        ColumnDef::new(Houses::HasParking)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(
                        ColumnDef::new(Houses::HasElevator)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(ColumnDef::new(Houses::BuildingYear).integer().null())
                    .col(ColumnDef::new(Houses::Latitude).decimal_len(10, 7).null())
                    .col(ColumnDef::new(Houses::Longitude).decimal_len(10, 7).null())
                    .col(
                        ColumnDef::new(Houses::DeletedAt)
                            .timestamp_with_time_zone()
                            .null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_houses_street")
                            .from(Houses::Table, Houses::StreetId)
                            .to(Streets::Table, Streets::Id),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_houses_district")
                            .from(Houses::Table, Houses::DistrictId)
                            .to(Districts::Table, Districts::Id),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(RealEstates::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(RealEstates::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(RealEstates::AgentId).integer().not_null())
                    .col(ColumnDef::new(RealEstates::TypeId).integer().not_null())
                    .col(ColumnDef::new(RealEstates::HouseId).integer().not_null())
                    .col(ColumnDef::new(RealEstates::Description).text().null())
                    .col(ColumnDef::new(RealEstates::Price).decimal_len(12, 2).not_null())
                    .col(ColumnDef::new(RealEstates::Rooms).integer().not_null())
                    .col(ColumnDef::new(RealEstates::Area).decimal_len(8, 2).not_null())
                    .col(ColumnDef::new(RealEstates::Floor).integer().not_null())
                    .col(
                        ColumnDef::new(RealEstates::HasBalcony)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(
                        ColumnDef::new(RealEstates::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(RealEstates::DeletedAt)
                            .timestamp_with_time_zone()
                            .null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_real_estates_agent")
                            .from(RealEstates::Table, RealEstates::AgentId)
                            .to(Users::Table, Users::Id),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_real_estates_type")
                            .from(RealEstates::Table, RealEstates::TypeId)
                            .to(RealEstateTypes::Table, RealEstateTypes::Id),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_real_estates_house")
                            .from(RealEstates::Table, RealEstates::HouseId)
                            .to(Houses::Table, Houses::Id),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(RealEstatePhotos::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(RealEstatePhotos::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(RealEstatePhotos::RealEstateId)
                            .integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(RealEstatePhotos::FilePath).string_len(500).not_null())
                    .col(ColumnDef::new(RealEstatePhotos::FileName).string_len(255).not_null())
                    .col(
                        ColumnDef::new(RealEstatePhotos::IsPrimary)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(
                        ColumnDef::new(RealEstatePhotos::DeletedAt)
                            .timestamp_with_time_zone()
                            .null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_real_estate_photos_real_estate")
                            .from(RealEstatePhotos::Table, RealEstatePhotos::RealEstateId)
                            .to(RealEstates::Table, RealEstates::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_real_estate_photos_real_estate")
                    .table(RealEstatePhotos::Table)
                    .col(RealEstatePhotos::RealEstateId)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(RealEstatePhotos::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(RealEstates::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Houses::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum Houses {
    Table,
    Id,
    StreetId,
    DistrictId,
    Number,
    TotalFloors,
    HasParking,
    HasElevator,
    BuildingYear,
    Latitude,
    Longitude,
    DeletedAt,
}

#[derive(DeriveIden)]
enum RealEstates {
    Table,
    Id,
    AgentId,
    TypeId,
    HouseId,
    Description,
    Price,
    Rooms,
    Area,
    Floor,
    HasBalcony,
    CreatedAt,
    DeletedAt,
}

#[derive(DeriveIden)]
enum RealEstatePhotos {
    Table,
    Id,
    RealEstateId,
    FilePath,
    FileName,
    IsPrimary,
    DeletedAt,
}

#[derive(DeriveIden)]
enum Streets {
    Table,
    Id,
}

#[derive(DeriveIden)]
enum Districts {
    Table,
    Id,
}

#[derive(DeriveIden)]
enum RealEstateTypes {
    Table,
    Id,
}

#[derive(DeriveIden)]
enum Users {
    Table,
    Id,
}
