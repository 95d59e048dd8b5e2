//! Listing database entity.

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "real_estates")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    /// Owning agent (users.id)
    pub agent_id: i32,
    pub type_id: i32,
    pub house_id: i32,
    pub description: Option<String>,
    #[sea_orm(column_type = "Decimal(Some((12, 2)))")]
    pub price: Decimal,
    pub rooms: i32,
    #[sea_orm(column_type = "Decimal(Some((8, 2)))")]
    pub area: Decimal,
    pub floor: i32,
    pub has_balcony: bool,
    pub created_at: DateTimeWithTimeZone,
    /// Soft delete timestamp (NULL = active, set = deleted)
    pub deleted_at: Option<DateTimeWithTimeZone>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::house::Entity",
        from = "Column::HouseId",
        to = "super::house::Column::Id"
    )]
    House,
    #[sea_orm(
        belongs_to = "super::real_estate_type::Entity",
        from = "Column::TypeId",
        to = "super::real_estate_type::Column::Id"
    )]
    Type,
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::AgentId",
        to = "super::user::Column::Id"
    )]
    Agent,
    #[sea_orm(has_many = "super::real_estate_photo::Entity")]
    Photos,
}

impl Related<super::house::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::House.def()
    }
}

impl Related<super::real_estate_type::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Type.def()
    }
}

impl Related<super::user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Agent.def()
    }
}

impl Related<super::real_estate_photo::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Photos.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
