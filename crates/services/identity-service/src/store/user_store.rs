//! User store adapter backed by the `users` and `roles` tables.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, FixedOffset};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, ConnectionTrait, EntityTrait, QueryFilter,
    QueryOrder, Set,
};

use common::{AppError, AppResult};
use domain::{
    mapper, Clock, IdentityError, IdentityErrorCode, IdentityResult, Principal, Visibility,
};
use storage::entities::{role, user};
use storage::{with_transaction, Persistence};

use super::queries;
use super::{
    UserEmailStore, UserPasswordStore, UserPhoneNumberStore, UserRoleStore, UserStore,
    FALLBACK_ROLE,
};

type Outcome<T> = Result<T, IdentityError>;

/// Columns written back to the principal after a successful insert.
struct Inserted {
    id: i32,
    role_name: String,
    created_at: DateTime<FixedOffset>,
}

/// Identity store over the registry database.
///
/// Every storage-touching call runs in its own transaction. The business
/// clock stamps creation and deletion times.
#[derive(Clone)]
pub struct UserStoreAdapter {
    persistence: Persistence,
    clock: Arc<dyn Clock>,
}

impl UserStoreAdapter {
    pub fn new(persistence: Persistence, clock: Arc<dyn Clock>) -> Self {
        Self { persistence, clock }
    }

    /// Lookup by numeric id with explicit soft-delete visibility.
    pub async fn find_by_id_with(
        &self,
        user_id: i32,
        visibility: Visibility,
    ) -> AppResult<Option<Principal>> {
        let mut condition = Condition::all().add(user::Column::Id.eq(user_id));
        if visibility == Visibility::ActiveOnly {
            condition = condition.add(user::Column::DeletedAt.is_null());
        }
        queries::find_principal(self.persistence.connection(), condition).await
    }

    /// Case-insensitive email lookup that skips soft-deleted users.
    pub async fn find_active_by_email(&self, email: &str) -> AppResult<Option<Principal>> {
        let db = self.persistence.connection();
        let condition = Condition::all()
            .add(queries::email_matches(db.get_database_backend(), email))
            .add(user::Column::DeletedAt.is_null());
        queries::find_principal(db, condition).await
    }
}

async fn insert_user<C: ConnectionTrait>(
    db: &C,
    candidate: Principal,
    now: DateTime<FixedOffset>,
) -> AppResult<Outcome<Inserted>> {
    let Some(role) = queries::role_by_id(db, candidate.role_id).await? else {
        return Ok(Err(IdentityError::role_not_found(candidate.role_id)));
    };

    let email = candidate.email.unwrap_or_default();
    if !email.is_empty() && queries::email_in_use(db, &email, None).await? {
        return Ok(Err(IdentityError::duplicate_email(&email)));
    }

    let model = user::ActiveModel {
        last_name: Set(candidate.last_name),
        first_name: Set(candidate.first_name),
        middle_name: Set(candidate.middle_name),
        phone: Set(candidate.phone_number.unwrap_or_default()),
        email: Set(email),
        password_hash: Set(candidate.password_hash.unwrap_or_default()),
        role_id: Set(role.id),
        created_at: Set(now),
        deleted_at: Set(None),
        phone_verified: Set(candidate.phone_number_confirmed),
        email_verified: Set(candidate.email_confirmed),
        ..Default::default()
    }
    .insert(db)
    .await
    .map_err(AppError::from)?;

    Ok(Ok(Inserted {
        id: model.id,
        role_name: role.name,
        created_at: model.created_at,
    }))
}

/// Overwrite names, flags and role; a `None` middle name, email, phone or
/// password hash keeps the stored value.
/// Returns the name of the role the row now points at.
async fn update_user<C: ConnectionTrait>(db: &C, candidate: Principal) -> AppResult<Outcome<String>> {
    let Some(existing) = user::Entity::find_by_id(candidate.id)
        .one(db)
        .await
        .map_err(AppError::from)?
    else {
        return Ok(Err(IdentityError::user_not_found()));
    };

    let Some(role) = queries::role_by_id(db, candidate.role_id).await? else {
        return Ok(Err(IdentityError::role_not_found(candidate.role_id)));
    };

    if let Some(email) = candidate.email.as_deref() {
        if queries::email_in_use(db, email, Some(candidate.id)).await? {
            return Ok(Err(IdentityError::duplicate_email(email)));
        }
    }

    let mut active: user::ActiveModel = existing.into();
    active.last_name = Set(candidate.last_name);
    active.first_name = Set(candidate.first_name);
    if let Some(middle_name) = candidate.middle_name {
        active.middle_name = Set(Some(middle_name));
    }
    if let Some(email) = candidate.email {
        active.email = Set(email);
    }
    if let Some(phone) = candidate.phone_number {
        active.phone = Set(phone);
    }
    if let Some(password_hash) = candidate.password_hash {
        active.password_hash = Set(password_hash);
    }
    active.role_id = Set(role.id);
    active.email_verified = Set(candidate.email_confirmed);
    active.phone_verified = Set(candidate.phone_number_confirmed);

    active.update(db).await.map_err(AppError::from)?;
    Ok(Ok(role.name))
}

async fn soft_delete_user<C: ConnectionTrait>(
    db: &C,
    user_id: i32,
    now: DateTime<FixedOffset>,
) -> AppResult<()> {
    let existing = user::Entity::find_by_id(user_id)
        .one(db)
        .await
        .map_err(AppError::from)?;

    if let Some(existing) = existing {
        let mut active: user::ActiveModel = existing.into();
        active.deleted_at = Set(Some(now));
        active.update(db).await.map_err(AppError::from)?;
    }
    Ok(())
}

/// Resolve `role_name` and move the user into it. Returns the new role's id and name.
async fn assign_role<C: ConnectionTrait>(
    db: &C,
    mut candidate: Principal,
    role_name: String,
) -> AppResult<Outcome<(i32, String)>> {
    let Some(role) = queries::role_by_name(db, &role_name).await? else {
        return Ok(Err(IdentityError::role_not_found(&role_name)));
    };

    candidate.role_id = role.id;
    match update_user(db, candidate).await? {
        Ok(name) => Ok(Ok((role.id, name))),
        Err(error) => {
            let folded = IdentityResult::failed([error]).aggregate();
            Ok(Err(IdentityError::new(IdentityErrorCode::Aggregated, folded.describe())))
        }
    }
}

#[async_trait]
impl UserStore for UserStoreAdapter {
    async fn find_by_id(&self, user_id: &str) -> AppResult<Option<Principal>> {
        match user_id.trim().parse::<i32>() {
            Ok(id) => self.find_by_id_with(id, Visibility::All).await,
            Err(_) => Ok(None),
        }
    }

    async fn find_by_name(&self, normalized_user_name: &str) -> AppResult<Option<Principal>> {
        self.find_by_email(normalized_user_name).await
    }

    async fn create(&self, user: &mut Principal) -> AppResult<IdentityResult> {
        let candidate = user.clone();
        let now = self.clock.now();

        let outcome =
            with_transaction!(self.persistence, |txn| insert_user(txn, candidate, now).await)?;

        match outcome {
            Ok(inserted) => {
                user.id = inserted.id;
                user.role_name = Some(inserted.role_name);
                user.created_at = Some(inserted.created_at);
                tracing::info!("Created user {} in role {:?}", user.id, user.role_name);
                Ok(IdentityResult::success())
            }
            Err(error) => {
                tracing::debug!("User creation refused: {}", error.description);
                Ok(IdentityResult::failed([error]))
            }
        }
    }

    async fn update(&self, user: &mut Principal) -> AppResult<IdentityResult> {
        let candidate = user.clone();

        let outcome = with_transaction!(self.persistence, |txn| update_user(txn, candidate).await)?;

        match outcome {
            Ok(role_name) => {
                user.role_name = Some(role_name);
                Ok(IdentityResult::success())
            }
            Err(error) => Ok(IdentityResult::failed([error])),
        }
    }

    async fn delete(&self, user: &Principal) -> AppResult<IdentityResult> {
        let user_id = user.id;
        let now = self.clock.now();

        with_transaction!(self.persistence, |txn| soft_delete_user(txn, user_id, now).await)?;

        tracing::info!("Soft deleted user {}", user_id);
        Ok(IdentityResult::success())
    }

    fn get_user_id(&self, user: &Principal) -> String {
        user.id.to_string()
    }

    fn get_user_name(&self, user: &Principal) -> Option<String> {
        user.email.clone()
    }

    fn set_user_name(&self, user: &mut Principal, user_name: Option<String>) {
        user.user_name = user_name;
    }

    fn get_normalized_user_name(&self, user: &Principal) -> Option<String> {
        user.normalized_user_name.clone()
    }

    fn set_normalized_user_name(&self, user: &mut Principal, normalized_name: Option<String>) {
        user.normalized_user_name = normalized_name;
    }
}

impl UserPasswordStore for UserStoreAdapter {
    fn set_password_hash(&self, user: &mut Principal, password_hash: Option<String>) {
        user.password_hash = password_hash;
    }

    fn get_password_hash(&self, user: &Principal) -> Option<String> {
        user.password_hash.clone()
    }

    fn has_password(&self, user: &Principal) -> bool {
        user.password_hash
            .as_deref()
            .map(|hash| !hash.is_empty())
            .unwrap_or(false)
    }
}

#[async_trait]
impl UserEmailStore for UserStoreAdapter {
    async fn find_by_email(&self, normalized_email: &str) -> AppResult<Option<Principal>> {
        let db = self.persistence.connection();
        let condition = Condition::all()
            .add(queries::email_matches(db.get_database_backend(), normalized_email));
        queries::find_principal(db, condition).await
    }

    fn set_email(&self, user: &mut Principal, email: Option<String>) {
        let normalized = email.as_deref().map(mapper::normalize);
        user.user_name = email.clone();
        user.email = email;
        user.normalized_user_name = normalized.clone();
        user.normalized_email = normalized;
    }

    fn get_email(&self, user: &Principal) -> Option<String> {
        user.email.clone()
    }

    fn get_email_confirmed(&self, user: &Principal) -> bool {
        user.email_confirmed
    }

    fn set_email_confirmed(&self, user: &mut Principal, confirmed: bool) {
        user.email_confirmed = confirmed;
    }

    fn get_normalized_email(&self, user: &Principal) -> Option<String> {
        user.normalized_email
            .clone()
            .or_else(|| user.email.as_deref().map(mapper::normalize))
    }

    fn set_normalized_email(&self, user: &mut Principal, normalized_email: Option<String>) {
        user.normalized_email = normalized_email;
    }
}

impl UserPhoneNumberStore for UserStoreAdapter {
    fn set_phone_number(&self, user: &mut Principal, phone_number: Option<String>) {
        user.phone_number = phone_number;
    }

    fn get_phone_number(&self, user: &Principal) -> Option<String> {
        user.phone_number.clone()
    }

    fn get_phone_number_confirmed(&self, user: &Principal) -> bool {
        user.phone_number_confirmed
    }

    fn set_phone_number_confirmed(&self, user: &mut Principal, confirmed: bool) {
        user.phone_number_confirmed = confirmed;
    }
}

#[async_trait]
impl UserRoleStore for UserStoreAdapter {
    async fn add_to_role(&self, user: &mut Principal, role_name: &str) -> AppResult<IdentityResult> {
        let candidate = user.clone();
        let role_name = role_name.to_string();

        let outcome = with_transaction!(self.persistence, |txn| {
            assign_role(txn, candidate, role_name).await
        })?;

        match outcome {
            Ok((role_id, role_name)) => {
                user.role_id = role_id;
                user.role_name = Some(role_name);
                Ok(IdentityResult::success())
            }
            Err(error) => Ok(IdentityResult::failed([error])),
        }
    }

    async fn remove_from_role(
        &self,
        user: &mut Principal,
        role_name: &str,
    ) -> AppResult<IdentityResult> {
        let is_current = user
            .role_name
            .as_deref()
            .map(|current| mapper::same_name(current, role_name))
            .unwrap_or(false);
        if !is_current {
            return Ok(IdentityResult::success());
        }

        let result = self.add_to_role(user, FALLBACK_ROLE).await?;
        if result.has(IdentityErrorCode::RoleNotFound) {
            tracing::warn!(
                "Cannot remove user {} from role {}: no {} role",
                user.id,
                role_name,
                FALLBACK_ROLE
            );
            return Ok(IdentityResult::failed([IdentityError::no_fallback_role(
                FALLBACK_ROLE,
            )]));
        }
        Ok(result)
    }

    fn get_roles(&self, user: &Principal) -> Vec<String> {
        user.role_name
            .iter()
            .filter(|name| !name.trim().is_empty())
            .cloned()
            .collect()
    }

    fn is_in_role(&self, user: &Principal, role_name: &str) -> bool {
        user.role_name
            .as_deref()
            .map(|current| mapper::same_name(current, role_name))
            .unwrap_or(false)
    }

    async fn get_users_in_role(&self, role_name: &str) -> AppResult<Vec<Principal>> {
        let db = self.persistence.connection();
        let rows = user::Entity::find()
            .find_also_related(role::Entity)
            .filter(queries::role_name_matches(db.get_database_backend(), role_name))
            .order_by_asc(user::Column::Id)
            .all(db)
            .await
            .map_err(AppError::from)?;

        Ok(rows
            .into_iter()
            .map(|(model, role)| queries::to_principal(model, role))
            .collect())
    }
}
