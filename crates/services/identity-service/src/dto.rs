//! Validated input for account and administrator operations.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Deserialize;
use validator::Validate;

/// 10 to 20 digits, spaces, `+`, parentheses or hyphens
static PHONE_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[0-9+()\-\s]{10,20}$").expect("valid phone pattern"));

static PHONE_NOISE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[^0-9+()\-\s]").expect("valid phone pattern"));

/// Drop every character a phone number may not contain.
pub fn sanitize_phone(raw: &str) -> String {
    PHONE_NOISE.replace_all(raw, "").into_owned()
}

/// Self-service registration form.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct Registration {
    #[validate(length(min = 1, max = 50, message = "Last name is required (at most 50 characters)"))]
    pub last_name: String,

    #[validate(length(min = 1, max = 50, message = "First name is required (at most 50 characters)"))]
    pub first_name: String,

    #[validate(length(max = 50, message = "Middle name must be at most 50 characters"))]
    pub middle_name: Option<String>,

    #[validate(email(message = "Invalid email format"))]
    pub email: String,

    #[validate(regex(
        path = *PHONE_PATTERN,
        message = "Phone must have 10 to 20 digits and may include +, spaces, parentheses and hyphens"
    ))]
    pub phone: String,

    #[validate(length(min = 6, max = 100, message = "Password must be 6 to 100 characters"))]
    pub password: String,
}

impl Registration {
    /// Strip stray characters from the phone number, as the form does on input.
    pub fn sanitized(mut self) -> Self {
        self.phone = sanitize_phone(&self.phone);
        self
    }
}

/// Administrator "add user" form.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct AdminUserCreate {
    #[validate(length(min = 1, max = 100, message = "Last name is required (at most 100 characters)"))]
    pub last_name: String,

    #[validate(length(min = 1, max = 100, message = "First name is required (at most 100 characters)"))]
    pub first_name: String,

    #[validate(length(max = 100, message = "Middle name must be at most 100 characters"))]
    pub middle_name: Option<String>,

    #[validate(email(message = "Invalid email format"))]
    pub email: String,

    #[validate(regex(path = *PHONE_PATTERN, message = "Invalid phone number"))]
    pub phone: Option<String>,

    #[validate(length(min = 6, max = 100, message = "Password must be 6 to 100 characters"))]
    pub password: String,

    #[validate(length(min = 1, message = "Role is required"))]
    pub role_name: String,
}
