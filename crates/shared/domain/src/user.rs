//! User and role domain entities.

use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};

use crate::format;

/// Registry user (agent, client or administrator)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: i32,
    pub last_name: String,
    pub first_name: String,
    pub middle_name: Option<String>,
    pub phone: String,
    pub email: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub role_id: i32,
    pub created_at: DateTime<FixedOffset>,
    /// Soft delete timestamp (None = active, Some = deleted)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub deleted_at: Option<DateTime<FixedOffset>>,
    pub phone_verified: bool,
    pub email_verified: bool,
}

impl User {
    pub fn full_name(&self) -> String {
        format::full_name(&self.last_name, &self.first_name, self.middle_name.as_deref())
    }

    /// Check if user is soft deleted
    pub fn is_deleted(&self) -> bool {
        self.deleted_at.is_some()
    }

    /// Check if user is active (not deleted)
    pub fn is_active(&self) -> bool {
        self.deleted_at.is_none()
    }
}

/// Role a user holds; every user holds exactly one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Role {
    pub id: i32,
    /// Machine key used in authorization checks
    pub name: String,
    /// Human label
    pub display_name: String,
}

/// Row of the administrator's user table
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UserListItem {
    pub id: i32,
    pub full_name: String,
    pub email: String,
    pub phone: String,
    pub role_name: String,
    pub role_display_name: String,
    pub created_at: DateTime<FixedOffset>,
    pub deleted: bool,
}
