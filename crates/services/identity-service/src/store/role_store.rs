//! Role store adapter backed by the `roles` table.

use async_trait::async_trait;
use sea_orm::{ActiveModelTrait, ConnectionTrait, EntityTrait, QueryOrder, Set};

use common::{AppError, AppResult};
use domain::{mapper, AppRole, IdentityError, IdentityResult, Role};
use storage::entities::role;
use storage::{with_transaction, Persistence};

use super::queries;
use super::RoleStore;

#[derive(Clone)]
pub struct RoleStoreAdapter {
    persistence: Persistence,
}

impl RoleStoreAdapter {
    pub fn new(persistence: Persistence) -> Self {
        Self { persistence }
    }

    /// Every role, in creation order.
    pub async fn list(&self) -> AppResult<Vec<Role>> {
        let roles = role::Entity::find()
            .order_by_asc(role::Column::Id)
            .all(self.persistence.connection())
            .await
            .map_err(AppError::from)?;

        Ok(roles.into_iter().map(Role::from).collect())
    }
}

async fn update_role<C: ConnectionTrait>(db: &C, candidate: AppRole) -> AppResult<IdentityResult> {
    let Some(existing) = queries::role_by_id(db, candidate.id).await? else {
        return Ok(IdentityResult::failed([IdentityError::role_not_found(
            candidate.id,
        )]));
    };

    let mut active: role::ActiveModel = existing.into();
    if let Some(name) = candidate.name {
        active.name = Set(name);
    }
    active.display_name = Set(candidate.display_name);
    active.update(db).await.map_err(AppError::from)?;

    Ok(IdentityResult::success())
}

#[async_trait]
impl RoleStore for RoleStoreAdapter {
    async fn create(&self, role: &mut AppRole) -> AppResult<IdentityResult> {
        let name = role.name.clone().unwrap_or_default();
        let model = role::ActiveModel {
            name: Set(name),
            display_name: Set(role.display_name.clone()),
            ..Default::default()
        }
        .insert(self.persistence.connection())
        .await
        .map_err(AppError::from)?;

        role.id = model.id;
        role.normalized_name = Some(mapper::normalize(&model.name));
        tracing::info!("Created role {} ({})", model.name, model.id);
        Ok(IdentityResult::success())
    }

    async fn update(&self, role: &AppRole) -> AppResult<IdentityResult> {
        let candidate = role.clone();
        with_transaction!(self.persistence, |txn| update_role(txn, candidate).await)
    }

    async fn delete(&self, role: &AppRole) -> AppResult<IdentityResult> {
        let result = role::Entity::delete_by_id(role.id)
            .exec(self.persistence.connection())
            .await
            .map_err(AppError::from)?;

        if result.rows_affected > 0 {
            tracing::info!("Deleted role {}", role.id);
        }
        Ok(IdentityResult::success())
    }

    async fn find_by_id(&self, role_id: &str) -> AppResult<Option<AppRole>> {
        let Ok(id) = role_id.trim().parse::<i32>() else {
            return Ok(None);
        };

        let role = queries::role_by_id(self.persistence.connection(), id).await?;
        Ok(role.map(|model| mapper::to_app_role(Role::from(model))))
    }

    async fn find_by_name(&self, normalized_role_name: &str) -> AppResult<Option<AppRole>> {
        let role = queries::role_by_name(self.persistence.connection(), normalized_role_name).await?;
        Ok(role.map(|model| mapper::to_app_role(Role::from(model))))
    }

    fn get_role_id(&self, role: &AppRole) -> String {
        role.id.to_string()
    }

    fn get_role_name(&self, role: &AppRole) -> Option<String> {
        role.name.clone()
    }

    fn set_role_name(&self, role: &mut AppRole, role_name: Option<String>) {
        role.name = role_name;
    }

    fn get_normalized_role_name(&self, role: &AppRole) -> Option<String> {
        role.normalized_name.clone()
    }

    fn set_normalized_role_name(&self, role: &mut AppRole, normalized_name: Option<String>) {
        role.normalized_name = normalized_name;
    }
}
