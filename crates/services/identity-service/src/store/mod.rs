//! Identity store capabilities.
//!
//! The authentication framework talks to the registry through these traits.
//! Methods that touch storage are async and return [`AppResult`]; pure
//! accessors on the in-memory principal are sync.
//!
//! A successful [`AppResult`] may still carry a failed [`IdentityResult`]:
//! the outer result reports storage failures, the inner one reports refusals
//! the framework is expected to show to the user.

mod queries;
mod role_store;
mod user_store;

use async_trait::async_trait;

use common::AppResult;
use domain::{AppRole, IdentityResult, Principal};

pub use role_store::RoleStoreAdapter;
pub use user_store::UserStoreAdapter;

/// Role every user falls back to when their current role is removed
pub const FALLBACK_ROLE: &str = domain::ROLE_CLIENT;

/// Core user persistence.
#[async_trait]
pub trait UserStore: Send + Sync {
    /// Find a user by its textual id. Non-numeric ids yield `None`.
    async fn find_by_id(&self, user_id: &str) -> AppResult<Option<Principal>>;

    /// Find a user by normalized user name (the upper-cased email).
    async fn find_by_name(&self, normalized_user_name: &str) -> AppResult<Option<Principal>>;

    /// Insert the principal; on success its id, role name and creation time are written back.
    async fn create(&self, user: &mut Principal) -> AppResult<IdentityResult>;

    /// Persist the principal's mutable fields and refresh its cached role name.
    async fn update(&self, user: &mut Principal) -> AppResult<IdentityResult>;

    /// Soft delete. Deleting an absent user succeeds.
    async fn delete(&self, user: &Principal) -> AppResult<IdentityResult>;

    fn get_user_id(&self, user: &Principal) -> String;
    fn get_user_name(&self, user: &Principal) -> Option<String>;
    fn set_user_name(&self, user: &mut Principal, user_name: Option<String>);
    fn get_normalized_user_name(&self, user: &Principal) -> Option<String>;
    fn set_normalized_user_name(&self, user: &mut Principal, normalized_name: Option<String>);
}

/// Password hash accessors. The hash is produced by the caller.
pub trait UserPasswordStore: Send + Sync {
    fn set_password_hash(&self, user: &mut Principal, password_hash: Option<String>);
    fn get_password_hash(&self, user: &Principal) -> Option<String>;
    fn has_password(&self, user: &Principal) -> bool;
}

#[async_trait]
pub trait UserEmailStore: Send + Sync {
    /// Case-insensitive lookup; `normalized_email` is already upper-cased.
    async fn find_by_email(&self, normalized_email: &str) -> AppResult<Option<Principal>>;

    /// Sets the email, the user name and both normalized forms.
    fn set_email(&self, user: &mut Principal, email: Option<String>);
    fn get_email(&self, user: &Principal) -> Option<String>;
    fn get_email_confirmed(&self, user: &Principal) -> bool;
    fn set_email_confirmed(&self, user: &mut Principal, confirmed: bool);
    fn get_normalized_email(&self, user: &Principal) -> Option<String>;
    fn set_normalized_email(&self, user: &mut Principal, normalized_email: Option<String>);
}

pub trait UserPhoneNumberStore: Send + Sync {
    fn set_phone_number(&self, user: &mut Principal, phone_number: Option<String>);
    fn get_phone_number(&self, user: &Principal) -> Option<String>;
    fn get_phone_number_confirmed(&self, user: &Principal) -> bool;
    fn set_phone_number_confirmed(&self, user: &mut Principal, confirmed: bool);
}

/// Single-role membership. Adding a role replaces the current one.
#[async_trait]
pub trait UserRoleStore: Send + Sync {
    async fn add_to_role(&self, user: &mut Principal, role_name: &str) -> AppResult<IdentityResult>;

    /// Move the user to [`FALLBACK_ROLE`] if `role_name` is the current role.
    async fn remove_from_role(
        &self,
        user: &mut Principal,
        role_name: &str,
    ) -> AppResult<IdentityResult>;

    /// Zero or one role names, from the cached role name.
    fn get_roles(&self, user: &Principal) -> Vec<String>;

    fn is_in_role(&self, user: &Principal, role_name: &str) -> bool;

    async fn get_users_in_role(&self, role_name: &str) -> AppResult<Vec<Principal>>;
}

#[async_trait]
pub trait RoleStore: Send + Sync {
    async fn create(&self, role: &mut AppRole) -> AppResult<IdentityResult>;
    async fn update(&self, role: &AppRole) -> AppResult<IdentityResult>;

    /// Hard delete. Deleting an absent role succeeds.
    async fn delete(&self, role: &AppRole) -> AppResult<IdentityResult>;

    async fn find_by_id(&self, role_id: &str) -> AppResult<Option<AppRole>>;
    async fn find_by_name(&self, normalized_role_name: &str) -> AppResult<Option<AppRole>>;

    fn get_role_id(&self, role: &AppRole) -> String;
    fn get_role_name(&self, role: &AppRole) -> Option<String>;
    fn set_role_name(&self, role: &mut AppRole, role_name: Option<String>);
    fn get_normalized_role_name(&self, role: &AppRole) -> Option<String>;
    fn set_normalized_role_name(&self, role: &mut AppRole, normalized_name: Option<String>);
}
