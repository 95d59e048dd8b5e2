//! Common utilities shared across the registry services.
//!
//! This crate provides:
//! - Unified error handling with stable error codes
//! - Configuration structures loaded from the environment

pub mod config;
pub mod error;

pub use config::*;
pub use error::{AppError, AppResult};
