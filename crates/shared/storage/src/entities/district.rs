//! District reference table.

use sea_orm::entity::prelude::*;

use domain::LookupItem;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "districts")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub name: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::house::Entity")]
    Houses,
}

impl Related<super::house::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Houses.def()
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
