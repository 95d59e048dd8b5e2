//! Identity Service Library
//!
//! Store adapters that let the authentication framework read and write
//! registry users and roles, plus the account and administrator use cases
//! built on them.

pub mod dto;
pub mod service;
pub mod store;

use std::sync::Arc;

use domain::Clock;
use storage::Persistence;

use crate::service::{Accounts, AdminUsers};
use crate::store::{RoleStoreAdapter, UserStoreAdapter};

/// Identity components wired over one database handle.
pub struct IdentityModule {
    pub users: UserStoreAdapter,
    pub roles: RoleStoreAdapter,
    pub accounts: Accounts,
    pub admin: AdminUsers,
}

impl IdentityModule {
    pub fn new(persistence: Persistence, clock: Arc<dyn Clock>) -> Self {
        let users = UserStoreAdapter::new(persistence.clone(), clock);
        let roles = RoleStoreAdapter::new(persistence.clone());
        Self {
            accounts: Accounts::new(users.clone(), roles.clone()),
            admin: AdminUsers::new(persistence, users.clone(), roles.clone()),
            users,
            roles,
        }
    }
}
