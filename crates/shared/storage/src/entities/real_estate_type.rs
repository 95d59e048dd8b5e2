//! Listing type reference table (flat, house, commercial...).

use sea_orm::entity::prelude::*;

use domain::LookupItem;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "real_estate_types")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub name: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::real_estate::Entity")]
    RealEstates,
}

impl Related<super::real_estate::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::RealEstates.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for LookupItem {
    fn from(model: Model) -> Self {
        LookupItem {
            id: model.id,
            name: model.name,
        }
    }
}
