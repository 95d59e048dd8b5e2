//! Password value object.
//!
//! Hashing uses Argon2 with a random salt; the stored PHC string is what the
//! user store keeps in `password_hash`.

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};

use crate::constants::{MAX_PASSWORD_LENGTH, MIN_PASSWORD_LENGTH};
use crate::error::{DomainError, DomainResult};

/// Hashed password.
#[derive(Clone, PartialEq, Eq)]
pub struct Password {
    hash: String,
}

impl std::fmt::Debug for Password {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Password")
            .field("hash", &"[REDACTED]")
            .finish()
    }
}

impl Password {
    /// Check the plain text against the account password policy and hash it.
    ///
    /// # Errors
    /// Returns a password error naming every unmet rule.
    pub fn new(plain_text: &str) -> DomainResult<Self> {
        let problems = Self::policy_violations(plain_text);
        if !problems.is_empty() {
            return Err(DomainError::password(problems.join("; ")));
        }

        let hash = Self::hash(plain_text)?;
        Ok(Self { hash })
    }

    /// Wrap a hash loaded from storage.
    pub fn from_hash(hash: String) -> Self {
        Self { hash }
    }

    /// Rules the plain text breaks: length, at least one digit, at least one lowercase letter.
    pub fn policy_violations(plain_text: &str) -> Vec<String> {
        let mut problems = Vec::new();
        let length = plain_text.chars().count();
        if length < MIN_PASSWORD_LENGTH {
            problems.push(format!(
                "Password must be at least {} characters",
                MIN_PASSWORD_LENGTH
            ));
        }
        if length > MAX_PASSWORD_LENGTH {
            problems.push(format!(
                "Password must be at most {} characters",
                MAX_PASSWORD_LENGTH
            ));
        }
        if !plain_text.chars().any(|c| c.is_ascii_digit()) {
            problems.push("Password must contain at least one digit (0-9)".to_string());
        }
        if !plain_text.chars().any(char::is_lowercase) {
            problems.push("Password must contain at least one lowercase letter".to_string());
        }
        problems
    }

    pub fn as_str(&self) -> &str {
        &self.hash
    }

    pub fn into_string(self) -> String {
        self.hash
    }

    /// Verify a plain text password against this hash.
    ///
    /// A malformed stored hash never verifies.
    pub fn verify(&self, plain_text: &str) -> bool {
        match PasswordHash::new(&self.hash) {
            Ok(parsed) => Argon2::default()
                .verify_password(plain_text.as_bytes(), &parsed)
                .is_ok(),
            Err(_) => false,
        }
    }

    fn hash(plain_text: &str) -> DomainResult<String> {
        let salt = SaltString::generate(&mut OsRng);
        let hash = Argon2::default()
            .hash_password(plain_text.as_bytes(), &salt)
            .map_err(|e| DomainError::internal(format!("Password hash failed: {}", e)))?;
        Ok(hash.to_string())
    }
}

impl From<Password> for String {
    fn from(password: Password) -> Self {
        password.hash
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_password_hash_and_verify() {
        let password = Password::new("secret42").unwrap();

        assert!(password.verify("secret42"));
        assert!(!password.verify("secret43"));
    }

    #[test]
    fn test_password_from_hash() {
        let password = Password::new("agent007").unwrap();
        let restored = Password::from_hash(password.as_str().to_string());

        assert!(restored.verify("agent007"));
    }

    #[test]
    fn test_same_password_different_salts() {
        let first = Password::new("samepass1").unwrap();
        let second = Password::new("samepass1").unwrap();

        assert_ne!(first.as_str(), second.as_str());
        assert!(first.verify("samepass1"));
        assert!(second.verify("samepass1"));
    }

    #[test]
    fn test_policy_reports_every_rule() {
        let problems = Password::policy_violations("ABC");
        assert_eq!(problems.len(), 3);
        assert!(matches!(Password::new("ABC"), Err(DomainError::Password(_))));
    }

    #[test]
    fn test_minimum_policy_passes() {
        assert!(Password::policy_violations("abcde1").is_empty());
    }

    #[test]
    fn test_garbage_hash_never_verifies() {
        let password = Password::from_hash("not-a-phc-string".to_string());
        assert!(!password.verify("anything1"));
    }

    #[test]
    fn test_debug_redacts_hash() {
        let password = Password::new("secret42").unwrap();
        assert!(!format!("{:?}", password).contains("argon2"));
    }
}
