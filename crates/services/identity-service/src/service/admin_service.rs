//! Administrator user management: the user table, role changes and
//! accounts created on someone's behalf.

use async_trait::async_trait;
use sea_orm::{EntityTrait, QueryOrder};
use validator::Validate;

use common::{AppError, AppResult};
use domain::{
    mapper, IdentityErrorCode, IdentityResult, Password, Principal, Role, User, UserListItem,
    Visibility,
};
use storage::entities::{role, user};
use storage::Persistence;

use crate::dto::AdminUserCreate;
use crate::store::{
    RoleStore, RoleStoreAdapter, UserEmailStore, UserPasswordStore, UserPhoneNumberStore,
    UserRoleStore, UserStore, UserStoreAdapter,
};

#[async_trait]
pub trait AdminUserService: Send + Sync {
    /// Every user, oldest first, soft-deleted ones included and flagged.
    async fn list_users(&self) -> AppResult<Vec<UserListItem>>;

    /// Roles an administrator can assign.
    async fn list_roles(&self) -> AppResult<Vec<Role>>;

    /// Move an active user into `role_name`. Same role is a no-op.
    async fn update_user_role(&self, user_id: i32, role_name: &str) -> AppResult<()>;

    /// Create an account in the requested role.
    async fn create_user(&self, form: AdminUserCreate) -> AppResult<Principal>;
}

pub struct AdminUsers {
    persistence: Persistence,
    users: UserStoreAdapter,
    roles: RoleStoreAdapter,
}

impl AdminUsers {
    pub fn new(persistence: Persistence, users: UserStoreAdapter, roles: RoleStoreAdapter) -> Self {
        Self {
            persistence,
            users,
            roles,
        }
    }
}

fn joined_descriptions(result: &IdentityResult) -> String {
    result
        .errors()
        .iter()
        .map(|e| e.description.as_str())
        .collect::<Vec<_>>()
        .join("; ")
}

/// Turn a refused store mutation into a service error.
pub(crate) fn refusal(result: &IdentityResult) -> AppError {
    let message = joined_descriptions(result);
    if result.has(IdentityErrorCode::DuplicateEmail) {
        AppError::Conflict(message)
    } else {
        AppError::Validation(message)
    }
}

#[async_trait]
impl AdminUserService for AdminUsers {
    async fn list_users(&self) -> AppResult<Vec<UserListItem>> {
        let rows = user::Entity::find()
            .order_by_asc(user::Column::CreatedAt)
            .order_by_asc(user::Column::Id)
            .find_also_related(role::Entity)
            .all(self.persistence.connection())
            .await
            .map_err(AppError::from)?;

        Ok(rows
            .into_iter()
            .map(|(model, role)| {
                let role = role.map(Role::from);
                mapper::to_list_item(User::from(model), role.as_ref())
            })
            .collect())
    }

    async fn list_roles(&self) -> AppResult<Vec<Role>> {
        self.roles.list().await
    }

    async fn update_user_role(&self, user_id: i32, role_name: &str) -> AppResult<()> {
        let mut user = self
            .users
            .find_by_id_with(user_id, Visibility::ActiveOnly)
            .await?
            .ok_or(AppError::NotFound)?;

        let role = self
            .roles
            .find_by_name(role_name)
            .await?
            .ok_or_else(|| AppError::validation("The selected role is not available"))?;

        if user.role_id == role.id {
            return Ok(());
        }

        let target = role.name.unwrap_or_else(|| role_name.to_string());
        let result = self.users.add_to_role(&mut user, &target).await?;
        if !result.succeeded() {
            let message = joined_descriptions(&result);
            tracing::warn!("Failed to change role of user {}: {}", user_id, message);
            return Err(AppError::Validation(message));
        }

        tracing::info!("User {} moved to role {}", user_id, target);
        Ok(())
    }

    async fn create_user(&self, form: AdminUserCreate) -> AppResult<Principal> {
        form.validate()?;

        let role = self
            .roles
            .find_by_name(&form.role_name)
            .await?
            .ok_or_else(|| AppError::validation("The selected role is not available"))?;

        let password = Password::new(&form.password)?;

        let mut principal = Principal::new(form.last_name.trim(), form.first_name.trim(), role.id);
        principal.middle_name = form
            .middle_name
            .map(|m| m.trim().to_string())
            .filter(|m| !m.is_empty());
        self.users.set_email(&mut principal, Some(form.email.trim().to_string()));
        self.users.set_phone_number(&mut principal, form.phone);
        self.users
            .set_password_hash(&mut principal, Some(password.into_string()));

        let result = UserStore::create(&self.users, &mut principal).await?;
        if !result.succeeded() {
            return Err(refusal(&result));
        }

        tracing::info!(
            "Administrator created user {} in role {}",
            principal.id,
            form.role_name
        );
        Ok(principal)
    }
}
