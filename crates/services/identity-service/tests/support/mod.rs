//! Shared fixtures: a migrated in-memory database with seeded roles.

#![allow(dead_code)]

use std::sync::Arc;

use chrono::{DateTime, FixedOffset};

use domain::{Clock, FixedClock, Principal};
use identity_service::store::{RoleStoreAdapter, UserEmailStore, UserStoreAdapter};
use identity_service::IdentityModule;
use storage::seed::seed_reference_data;
use storage::{Database, Persistence};

pub const CLIENT_ROLE_ID: i32 = 1;
pub const AGENT_ROLE_ID: i32 = 2;
pub const ADMIN_ROLE_ID: i32 = 3;

pub struct TestContext {
    pub db: Database,
    pub persistence: Persistence,
    pub identity: IdentityModule,
}

impl TestContext {
    pub fn users(&self) -> &UserStoreAdapter {
        &self.identity.users
    }

    pub fn roles(&self) -> &RoleStoreAdapter {
        &self.identity.roles
    }
}

pub fn now() -> DateTime<FixedOffset> {
    DateTime::parse_from_rfc3339("2024-05-01T10:00:00+03:00").unwrap()
}

pub async fn setup() -> TestContext {
    let db = Database::in_memory().await.unwrap();
    seed_reference_data(db.connection()).await.unwrap();

    let persistence = Persistence::new(db.get_connection());
    let clock: Arc<dyn Clock> = Arc::new(FixedClock(now()));
    let identity = IdentityModule::new(persistence.clone(), clock);

    TestContext {
        db,
        persistence,
        identity,
    }
}

/// Unsaved principal with an email and phone.
pub fn principal(ctx: &TestContext, email: &str, role_id: i32) -> Principal {
    let mut principal = Principal::new("Petrova", "Anna", role_id);
    ctx.users().set_email(&mut principal, Some(email.to_string()));
    principal.phone_number = Some("+7 900 123-45-67".to_string());
    principal.password_hash = Some("hash".to_string());
    principal
}
