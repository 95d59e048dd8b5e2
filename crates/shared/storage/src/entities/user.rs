//! User database entity for SeaORM.

use sea_orm::entity::prelude::*;

use domain::User;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "users")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub last_name: String,
    pub first_name: String,
    pub middle_name: Option<String>,
    pub phone: String,
    pub email: String,
    pub password_hash: String,
    pub role_id: i32,
    pub created_at: DateTimeWithTimeZone,
    /// Soft delete timestamp (NULL = active, set = deleted)
    pub deleted_at: Option<DateTimeWithTimeZone>,
    pub phone_verified: bool,
    pub email_verified: bool,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::role::Entity",
        from = "Column::RoleId",
        to = "super::role::Column::Id"
    )]
    Role,
}

impl Related<super::role::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Role.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

/// Convert database model to domain entity
impl From<Model> for User {
    fn from(model: Model) -> Self {
        User {
            id: model.id,
            last_name: model.last_name,
            first_name: model.first_name,
            middle_name: model.middle_name,
            phone: model.phone,
            email: model.email,
            password_hash: model.password_hash,
            role_id: model.role_id,
            created_at: model.created_at,
            deleted_at: model.deleted_at,
            phone_verified: model.phone_verified,
            email_verified: model.email_verified,
        }
    }
}
