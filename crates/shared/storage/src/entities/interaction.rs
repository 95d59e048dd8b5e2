//! Interaction database entity: a client's inquiry about a listing.

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "interactions")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub client_id: i32,
    pub agent_id: i32,
    pub real_estate_id: i32,
    pub status_id: i32,
    pub contacted_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
    pub notes: Option<String>,
    pub deleted_at: Option<DateTimeWithTimeZone>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::ClientId",
        to = "super::user::Column::Id"
    )]
    Client,
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::AgentId",
        to = "super::user::Column::Id"
    )]
    Agent,
    #[sea_orm(
        belongs_to = "super::real_estate::Entity",
        from = "Column::RealEstateId",
        to = "super::real_estate::Column::Id"
    )]
    RealEstate,
    #[sea_orm(
        belongs_to = "super::interaction_status::Entity",
        from = "Column::StatusId",
        to = "super::interaction_status::Column::Id"
    )]
    Status,
}

impl Related<super::real_estate::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::RealEstate.def()
    }
}

impl Related<super::interaction_status::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Status.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
