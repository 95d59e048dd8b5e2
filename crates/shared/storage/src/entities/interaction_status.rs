//! Interaction workflow statuses; the lowest id is the initial status.

use sea_orm::entity::prelude::*;

use domain::LookupItem;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "interaction_statuses")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub name: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for LookupItem {
    fn from(model: Model) -> Self {
        LookupItem {
            id: model.id,
            name: model.name,
        }
    }
}
