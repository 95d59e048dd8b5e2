//! Framework-facing identity shapes.
//!
//! A [`Principal`] is the authentication framework's in-memory view of a
//! registry user; an [`AppRole`] is its view of a role. Neither is persisted
//! on its own: the store adapters derive them from the `users` and `roles`
//! rows and write the mutable parts back.

use chrono::{DateTime, FixedOffset};
use serde::Serialize;

use crate::format;

/// Which rows a lookup may return.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Visibility {
    /// Soft-deleted rows included
    #[default]
    All,
    /// Only rows without a deletion mark
    ActiveOnly,
}

/// Framework-facing user.
///
/// `email`, `phone_number` and `password_hash` are optional so an update can
/// leave the stored value untouched by passing `None`. `role_name` is a cache of
/// the role referenced by `role_id`, refreshed by the store on every read and write.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Principal {
    pub id: i32,
    pub email: Option<String>,
    pub normalized_email: Option<String>,
    pub user_name: Option<String>,
    pub normalized_user_name: Option<String>,
    pub phone_number: Option<String>,
    pub phone_number_confirmed: bool,
    pub email_confirmed: bool,
    #[serde(skip_serializing)]
    pub password_hash: Option<String>,
    pub last_name: String,
    pub first_name: String,
    pub middle_name: Option<String>,
    pub role_id: i32,
    pub role_name: Option<String>,
    pub created_at: Option<DateTime<FixedOffset>>,
}

impl Principal {
    /// Unsaved principal in the given role.
    pub fn new(last_name: impl Into<String>, first_name: impl Into<String>, role_id: i32) -> Self {
        Self {
            last_name: last_name.into(),
            first_name: first_name.into(),
            role_id,
            ..Default::default()
        }
    }

    pub fn full_name(&self) -> String {
        format::full_name(&self.last_name, &self.first_name, self.middle_name.as_deref())
    }

    /// True once the store has assigned an id.
    pub fn is_persisted(&self) -> bool {
        self.id > 0
    }
}

/// Framework-facing role.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct AppRole {
    pub id: i32,
    /// Machine key; `None` on update keeps the stored name
    pub name: Option<String>,
    pub normalized_name: Option<String>,
    pub display_name: String,
}

impl AppRole {
    pub fn new(name: impl Into<String>, display_name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            display_name: display_name.into(),
            ..Default::default()
        }
    }
}

/// Stable identity failure codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum IdentityErrorCode {
    RoleNotFound,
    UserNotFound,
    DuplicateEmail,
    NoFallbackRole,
    /// Several failures folded into one, e.g. a failed update inside a role change
    Aggregated,
}

impl IdentityErrorCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            IdentityErrorCode::RoleNotFound => "RoleNotFound",
            IdentityErrorCode::UserNotFound => "UserNotFound",
            IdentityErrorCode::DuplicateEmail => "DuplicateEmail",
            IdentityErrorCode::NoFallbackRole => "NoFallbackRole",
            IdentityErrorCode::Aggregated => "Aggregated",
        }
    }
}

impl std::fmt::Display for IdentityErrorCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One reason a store mutation was refused.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IdentityError {
    pub code: IdentityErrorCode,
    pub description: String,
}

impl IdentityError {
    pub fn new(code: IdentityErrorCode, description: impl Into<String>) -> Self {
        Self {
            code,
            description: description.into(),
        }
    }

    pub fn role_not_found(role: impl std::fmt::Display) -> Self {
        Self::new(
            IdentityErrorCode::RoleNotFound,
            format!("Role {} was not found", role),
        )
    }

    pub fn user_not_found() -> Self {
        Self::new(IdentityErrorCode::UserNotFound, "User was not found")
    }

    pub fn duplicate_email(email: &str) -> Self {
        Self::new(
            IdentityErrorCode::DuplicateEmail,
            format!("A user with email {} is already registered", email),
        )
    }

    pub fn no_fallback_role(role: &str) -> Self {
        Self::new(
            IdentityErrorCode::NoFallbackRole,
            format!("Fallback role {} does not exist; the current role was kept", role),
        )
    }
}

/// Outcome of a store mutation: success, or every reason it was refused.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct IdentityResult {
    errors: Vec<IdentityError>,
}

impl IdentityResult {
    pub fn success() -> Self {
        Self::default()
    }

    pub fn failed(errors: impl IntoIterator<Item = IdentityError>) -> Self {
        Self {
            errors: errors.into_iter().collect(),
        }
    }

    pub fn succeeded(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn errors(&self) -> &[IdentityError] {
        &self.errors
    }

    /// True if any error carries `code`.
    pub fn has(&self, code: IdentityErrorCode) -> bool {
        self.errors.iter().any(|e| e.code == code)
    }

    /// Descriptions joined with `;`.
    pub fn describe(&self) -> String {
        self.errors
            .iter()
            .map(|e| e.description.as_str())
            .collect::<Vec<_>>()
            .join(";")
    }

    /// Fold every error into a single aggregated failure.
    pub fn aggregate(self) -> Self {
        if self.succeeded() {
            return self;
        }
        let description = self.describe();
        Self::failed([IdentityError::new(IdentityErrorCode::Aggregated, description)])
    }
}
