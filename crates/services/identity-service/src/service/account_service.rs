//! Self-service accounts: registration and sign-in credential checks.

use async_trait::async_trait;
use validator::Validate;

use common::{AppError, AppResult};
use domain::{mapper, FieldViolation, Password, Principal, ROLE_CLIENT};

use crate::dto::Registration;
use crate::service::admin_service::refusal;
use crate::store::{
    RoleStore, RoleStoreAdapter, UserEmailStore, UserPasswordStore, UserPhoneNumberStore,
    UserStore, UserStoreAdapter,
};

#[async_trait]
pub trait AccountService: Send + Sync {
    /// Register a new client account.
    async fn register(&self, form: Registration) -> AppResult<Principal>;

    /// Resolve an active user by email and password.
    ///
    /// Unknown emails, deleted accounts and wrong passwords are indistinguishable.
    async fn check_credentials(&self, email: &str, password: &str) -> AppResult<Principal>;
}

pub struct Accounts {
    users: UserStoreAdapter,
    roles: RoleStoreAdapter,
}

impl Accounts {
    pub fn new(users: UserStoreAdapter, roles: RoleStoreAdapter) -> Self {
        Self { users, roles }
    }
}

#[async_trait]
impl AccountService for Accounts {
    async fn register(&self, form: Registration) -> AppResult<Principal> {
        let form = form.sanitized();
        form.validate()?;
        if !form.password.chars().any(char::is_uppercase) {
            return Err(AppError::InvalidFields(vec![FieldViolation::new(
                "password",
                "Password must contain an uppercase letter, a lowercase letter and a digit",
            )]));
        }
        let password = Password::new(&form.password)?;

        let role = self
            .roles
            .find_by_name(ROLE_CLIENT)
            .await?
            .ok_or_else(|| AppError::internal("Client role is missing; seed reference data"))?;

        let mut principal = Principal::new(form.last_name.trim(), form.first_name.trim(), role.id);
        principal.middle_name = form
            .middle_name
            .map(|m| m.trim().to_string())
            .filter(|m| !m.is_empty());
        self.users.set_email(&mut principal, Some(form.email.trim().to_string()));
        self.users.set_phone_number(&mut principal, Some(form.phone.trim().to_string()));
        self.users
            .set_password_hash(&mut principal, Some(password.into_string()));

        let result = UserStore::create(&self.users, &mut principal).await?;
        if !result.succeeded() {
            return Err(refusal(&result));
        }

        tracing::info!("Registered client {}", principal.id);
        Ok(principal)
    }

    async fn check_credentials(&self, email: &str, password: &str) -> AppResult<Principal> {
        let normalized = mapper::normalize(email.trim());
        let Some(principal) = self.users.find_active_by_email(&normalized).await? else {
            tracing::debug!("Sign-in rejected: no active account");
            return Err(AppError::InvalidCredentials);
        };

        let verified = self
            .users
            .get_password_hash(&principal)
            .map(|hash| Password::from_hash(hash).verify(password))
            .unwrap_or(false);
        if !verified {
            tracing::debug!("Sign-in rejected for user {}", principal.id);
            return Err(AppError::InvalidCredentials);
        }

        Ok(principal)
    }
}
