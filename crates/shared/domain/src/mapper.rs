//! Identity record mapper.
//!
//! Pure conversions from persisted users and roles to the framework-facing
//! [`Principal`] and [`AppRole`]. The schema has no normalized columns, so the
//! normalized forms are computed here and by the stores at comparison time.

use crate::format;
use crate::identity::{AppRole, Principal};
use crate::user::{Role, User, UserListItem};

/// Placeholder shown when a user's role has no usable label
pub const MISSING_ROLE_LABEL: &str = "—";

/// Framework normalization for user names, emails and role names.
pub fn normalize(value: &str) -> String {
    value.to_uppercase()
}

/// Case-insensitive equality under [`normalize`].
pub fn same_name(left: &str, right: &str) -> bool {
    normalize(left) == normalize(right)
}

/// Build the principal for `user`; `role` is the row `user.role_id` points at.
pub fn to_principal(user: User, role: Option<&Role>) -> Principal {
    let normalized = normalize(&user.email);
    Principal {
        id: user.id,
        user_name: Some(user.email.clone()),
        normalized_user_name: Some(normalized.clone()),
        normalized_email: Some(normalized),
        email: Some(user.email),
        phone_number: Some(user.phone),
        phone_number_confirmed: user.phone_verified,
        email_confirmed: user.email_verified,
        password_hash: Some(user.password_hash),
        last_name: user.last_name,
        first_name: user.first_name,
        middle_name: user.middle_name,
        role_id: user.role_id,
        role_name: role.map(|r| r.name.clone()),
        created_at: Some(user.created_at),
    }
}

pub fn to_app_role(role: Role) -> AppRole {
    AppRole {
        id: role.id,
        normalized_name: Some(normalize(&role.name)),
        name: Some(role.name),
        display_name: role.display_name,
    }
}

/// Administrator table row; the display name falls back to the machine name.
pub fn to_list_item(user: User, role: Option<&Role>) -> UserListItem {
    let role_name = role.map(|r| r.name.clone()).unwrap_or_default();
    let role_display_name = role
        .map(|r| {
            if r.display_name.trim().is_empty() {
                r.name.clone()
            } else {
                r.display_name.clone()
            }
        })
        .filter(|label| !label.trim().is_empty())
        .unwrap_or_else(|| MISSING_ROLE_LABEL.to_string());

    UserListItem {
        id: user.id,
        full_name: format::full_name(&user.last_name, &user.first_name, user.middle_name.as_deref()),
        deleted: user.is_deleted(),
        email: user.email,
        phone: user.phone,
        role_name,
        role_display_name,
        created_at: user.created_at,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::DateTime;

    fn sample_user() -> User {
        User {
            id: 5,
            last_name: "Sidorov".to_string(),
            first_name: "Oleg".to_string(),
            middle_name: None,
            phone: "+7 900 000-00-00".to_string(),
            email: "Oleg@Example.com".to_string(),
            password_hash: "hash".to_string(),
            role_id: 2,
            created_at: DateTime::parse_from_rfc3339("2024-01-10T09:00:00+03:00").unwrap(),
            deleted_at: None,
            phone_verified: true,
            email_verified: false,
        }
    }

    fn agent_role() -> Role {
        Role {
            id: 2,
            name: "agent".to_string(),
            display_name: "Agent".to_string(),
        }
    }

    #[test]
    fn test_principal_uses_email_as_user_name() {
        let principal = to_principal(sample_user(), Some(&agent_role()));

        assert_eq!(principal.user_name.as_deref(), Some("Oleg@Example.com"));
        assert_eq!(principal.normalized_email.as_deref(), Some("OLEG@EXAMPLE.COM"));
        assert_eq!(principal.normalized_user_name, principal.normalized_email);
        assert_eq!(principal.role_name.as_deref(), Some("agent"));
        assert!(principal.phone_number_confirmed);
        assert!(!principal.email_confirmed);
    }

    #[test]
    fn test_principal_without_role_has_no_role_name() {
        let principal = to_principal(sample_user(), None);
        assert_eq!(principal.role_name, None);
    }

    #[test]
    fn test_app_role_normalized_name() {
        let role = to_app_role(agent_role());
        assert_eq!(role.name.as_deref(), Some("agent"));
        assert_eq!(role.normalized_name.as_deref(), Some("AGENT"));
    }

    #[test]
    fn test_list_item_role_label_fallbacks() {
        let mut role = agent_role();
        role.display_name = String::new();
        assert_eq!(to_list_item(sample_user(), Some(&role)).role_display_name, "agent");
        assert_eq!(to_list_item(sample_user(), None).role_display_name, MISSING_ROLE_LABEL);
        assert_eq!(to_list_item(sample_user(), None).role_name, "");
    }

    #[test]
    fn test_same_name_ignores_case() {
        assert!(same_name("Admin", "ADMIN"));
        assert!(!same_name("admin", "agent"));
    }
}
