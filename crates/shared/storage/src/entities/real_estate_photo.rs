//! Listing photo metadata. Files themselves live outside the database.

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "real_estate_photos")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub real_estate_id: i32,
    pub file_path: String,
    pub file_name: String,
    pub is_primary: bool,
    pub deleted_at: Option<DateTimeWithTimeZone>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::real_estate::Entity",
        from = "Column::RealEstateId",
        to = "super::real_estate::Column::Id"
    )]
    RealEstate,
}

impl Related<super::real_estate::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::RealEstate.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
