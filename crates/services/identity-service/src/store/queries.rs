//! Lookups shared by the store adapters.
//!
//! Every helper is generic over [`ConnectionTrait`] so it runs on the pool or
//! inside an open transaction. The schema has no normalized columns; names and
//! emails are upper-cased on both sides at comparison time.
//!
//! SQLite's `UPPER` folds ASCII letters only, so on SQLite the bound value is
//! folded the same way and non-ASCII letters compare case-sensitively.
//! PostgreSQL folds the full Unicode range on both sides.

use sea_orm::sea_query::{Expr, Func, Order, SimpleExpr};
use sea_orm::{
    ColumnTrait, Condition, ConnectionTrait, DbBackend, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder,
};

use common::{AppError, AppResult};
use domain::{mapper, Principal, Role, User};
use storage::entities::{role, user};

/// Upper-case `value` the way `backend` upper-cases a stored column.
pub(crate) fn fold_for(backend: DbBackend, value: &str) -> String {
    match backend {
        DbBackend::Sqlite => value.to_ascii_uppercase(),
        _ => mapper::normalize(value),
    }
}

/// `UPPER(users.email) = <folded>`
pub(crate) fn email_matches(backend: DbBackend, email: &str) -> SimpleExpr {
    Expr::expr(Func::upper(Expr::col((user::Entity, user::Column::Email))))
        .eq(fold_for(backend, email))
}

/// `UPPER(roles.name) = <folded>`
pub(crate) fn role_name_matches(backend: DbBackend, name: &str) -> SimpleExpr {
    Expr::expr(Func::upper(Expr::col((role::Entity, role::Column::Name))))
        .eq(fold_for(backend, name))
}

pub(crate) fn to_principal(model: user::Model, role: Option<role::Model>) -> Principal {
    let role = role.map(Role::from);
    mapper::to_principal(User::from(model), role.as_ref())
}

/// First user matching `condition`, with its role. Active rows sort ahead of
/// deleted ones, then lower ids first.
pub(crate) async fn find_principal<C: ConnectionTrait>(
    db: &C,
    condition: Condition,
) -> AppResult<Option<Principal>> {
    let row = user::Entity::find()
        .filter(condition)
        .order_by(
            Expr::col((user::Entity, user::Column::DeletedAt)).is_null(),
            Order::Desc,
        )
        .order_by_asc(user::Column::Id)
        .find_also_related(role::Entity)
        .one(db)
        .await
        .map_err(AppError::from)?;

    Ok(row.map(|(model, role)| to_principal(model, role)))
}

pub(crate) async fn role_by_id<C: ConnectionTrait>(
    db: &C,
    role_id: i32,
) -> AppResult<Option<role::Model>> {
    role::Entity::find_by_id(role_id)
        .one(db)
        .await
        .map_err(AppError::from)
}

pub(crate) async fn role_by_name<C: ConnectionTrait>(
    db: &C,
    role_name: &str,
) -> AppResult<Option<role::Model>> {
    role::Entity::find()
        .filter(role_name_matches(db.get_database_backend(), role_name))
        .order_by_asc(role::Column::Id)
        .one(db)
        .await
        .map_err(AppError::from)
}

/// True if an active user other than `except_id` owns `email`.
pub(crate) async fn email_in_use<C: ConnectionTrait>(
    db: &C,
    email: &str,
    except_id: Option<i32>,
) -> AppResult<bool> {
    let mut query = user::Entity::find()
        .filter(email_matches(db.get_database_backend(), email))
        .filter(user::Column::DeletedAt.is_null());
    if let Some(id) = except_id {
        query = query.filter(user::Column::Id.ne(id));
    }

    let count = query.count(db).await.map_err(AppError::from)?;
    Ok(count > 0)
}
