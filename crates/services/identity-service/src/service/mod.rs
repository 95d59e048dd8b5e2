//! Identity use cases built on the store adapters.

mod account_service;
mod admin_service;

pub use account_service::{AccountService, Accounts};
pub use admin_service::{AdminUserService, AdminUsers};
