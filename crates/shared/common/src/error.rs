//! Unified error handling for the registry services.
//!
//! Every service returns [`AppError`]. Callers render it with [`AppError::code`]
//! and [`AppError::user_message`]; internal details are logged, never shown.

use domain::{DomainError, FieldViolation};
use thiserror::Error;

/// Application error types.
#[derive(Error, Debug)]
pub enum AppError {
    // Authentication & Authorization
    #[error("Access denied")]
    Forbidden,

    #[error("Invalid credentials")]
    InvalidCredentials,

    // Resource errors
    #[error("Resource not found")]
    NotFound,

    #[error("{0} already exists")]
    Conflict(String),

    // Validation
    #[error("{0}")]
    Validation(String),

    #[error("Validation failed for {} field(s)", .0.len())]
    InvalidFields(Vec<FieldViolation>),

    // External service errors
    #[cfg(feature = "database")]
    #[error("Database error")]
    Database(sea_orm::DbErr),

    #[cfg(feature = "cache")]
    #[error("Cache error")]
    Cache(#[from] redis::RedisError),

    #[error("Storage unavailable")]
    StorageUnavailable(String),

    // Internal
    #[error("Internal server error")]
    Internal(String),
}

impl AppError {
    /// Get error code for client
    pub fn code(&self) -> &'static str {
        match self {
            AppError::Forbidden => "FORBIDDEN",
            AppError::InvalidCredentials => "INVALID_CREDENTIALS",
            AppError::NotFound => "NOT_FOUND",
            AppError::Conflict(_) => "CONFLICT",
            AppError::Validation(_) => "VALIDATION_ERROR",
            AppError::InvalidFields(_) => "VALIDATION_ERROR",
            #[cfg(feature = "database")]
            AppError::Database(_) => "DATABASE_ERROR",
            #[cfg(feature = "cache")]
            AppError::Cache(_) => "CACHE_ERROR",
            AppError::StorageUnavailable(_) => "STORAGE_UNAVAILABLE",
            AppError::Internal(_) => "INTERNAL_ERROR",
        }
    }

    /// Get user-facing message (hides internal details)
    pub fn user_message(&self) -> String {
        match self {
            // Show full message for client errors
            AppError::Validation(msg) => msg.clone(),
            AppError::InvalidFields(violations) => violations
                .iter()
                .map(FieldViolation::to_string)
                .collect::<Vec<_>>()
                .join("; "),
            AppError::Conflict(msg) => {
                if msg.ends_with("already exists") {
                    msg.clone()
                } else {
                    format!("{} already exists", msg)
                }
            }

            // Hide details for internal errors
            #[cfg(feature = "database")]
            AppError::Database(e) => {
                tracing::error!("Database error: {:?}", e);
                database_message(e).to_string()
            }
            #[cfg(feature = "cache")]
            AppError::Cache(e) => {
                tracing::error!("Cache error: {:?}", e);
                "Saved data could not be read or written. Changes may be lost on reload".to_string()
            }
            AppError::StorageUnavailable(detail) => {
                tracing::error!("Storage unavailable: {}", detail);
                "Could not connect to the database. Check the connection settings and that the server is running"
                    .to_string()
            }
            AppError::Internal(msg) => {
                tracing::error!("Internal error: {}", msg);
                "An internal error occurred".to_string()
            }

            // Use default message for others
            _ => self.to_string(),
        }
    }

    /// Field violations carried by a validation failure.
    pub fn violations(&self) -> Vec<FieldViolation> {
        match self {
            AppError::InvalidFields(violations) => violations.clone(),
            AppError::Validation(msg) => vec![FieldViolation::new("", msg.clone())],
            _ => Vec::new(),
        }
    }
}

// =============================================================================
// Database Error Conversion
// =============================================================================

#[cfg(feature = "database")]
impl From<sea_orm::DbErr> for AppError {
    fn from(err: sea_orm::DbErr) -> Self {
        use sea_orm::{DbErr, SqlErr};

        match err.sql_err() {
            Some(SqlErr::UniqueConstraintViolation(detail)) => {
                tracing::debug!("Unique constraint violation: {}", detail);
                return AppError::Conflict("A record with the same key".to_string());
            }
            Some(SqlErr::ForeignKeyConstraintViolation(detail)) => {
                tracing::debug!("Foreign key violation: {}", detail);
                return AppError::Validation("Referenced record does not exist".to_string());
            }
            _ => {}
        }

        match err {
            DbErr::Conn(e) => AppError::StorageUnavailable(e.to_string()),
            DbErr::ConnectionAcquire(e) => AppError::StorageUnavailable(e.to_string()),
            other => AppError::Database(other),
        }
    }
}

/// User-facing text for a storage failure.
#[cfg(feature = "database")]
pub fn database_message(err: &sea_orm::DbErr) -> &'static str {
    use sea_orm::DbErr;

    match err {
        DbErr::Conn(_) | DbErr::ConnectionAcquire(_) => {
            "Could not connect to the database. Check the connection settings and that the server is running"
        }
        DbErr::Migration(_) => {
            "The database schema does not match the application. Check that migrations were applied"
        }
        DbErr::Type(_) | DbErr::Json(_) | DbErr::TryIntoErr { .. } => {
            "The database returned data of an unexpected type. Check field values and constraints"
        }
        DbErr::RecordNotFound(_) | DbErr::RecordNotUpdated => "The record no longer exists",
        _ => "An unexpected database error occurred. Contact the administrator",
    }
}

// =============================================================================
// Domain and Validation Error Conversion
// =============================================================================

impl From<DomainError> for AppError {
    fn from(err: DomainError) -> Self {
        match err {
            DomainError::Validation(msg) => AppError::Validation(msg),
            DomainError::Password(msg) => AppError::Validation(msg),
            DomainError::Internal(msg) => AppError::Internal(msg),
        }
    }
}

impl From<validator::ValidationErrors> for AppError {
    fn from(errors: validator::ValidationErrors) -> Self {
        let mut violations: Vec<FieldViolation> = errors
            .field_errors()
            .into_iter()
            .flat_map(|(field, field_errors)| {
                let field = field.to_string();
                field_errors.iter().map(move |error| {
                    let message = error
                        .message
                        .as_ref()
                        .map(|m| m.to_string())
                        .unwrap_or_else(|| error.code.to_string());
                    FieldViolation::new(field.clone(), message)
                })
            })
            .collect();
        violations.sort_by(|a, b| a.field.cmp(&b.field));
        AppError::InvalidFields(violations)
    }
}

/// Result type alias
pub type AppResult<T> = Result<T, AppError>;

/// Convenience constructors
impl AppError {
    pub fn validation(msg: impl Into<String>) -> Self {
        AppError::Validation(msg.into())
    }

    pub fn internal(msg: impl Into<String>) -> Self {
        AppError::Internal(msg.into())
    }

    pub fn storage_unavailable(detail: impl Into<String>) -> Self {
        AppError::StorageUnavailable(detail.into())
    }
}
