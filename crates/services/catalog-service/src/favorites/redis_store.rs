//! Redis-backed client store.
//!
//! Each session gets its own key prefix, so two browser sessions never share
//! a slot. Every write refreshes the TTL.

use async_trait::async_trait;
use redis::{aio::ConnectionManager, AsyncCommands, RedisError};
use tracing::{debug, warn};
use uuid::Uuid;

use common::{AppError, AppResult, CacheConfig};

use super::client_store::ClientStore;

/// Key prefix for session slots
const SESSION_PREFIX: &str = "session:";

pub struct RedisClientStore {
    conn: ConnectionManager,
    prefix: String,
    ttl_seconds: u64,
}

impl RedisClientStore {
    /// Connect and open a fresh session.
    pub async fn connect(config: &CacheConfig) -> Result<Self, RedisError> {
        Self::connect_session(config, Uuid::new_v4()).await
    }

    /// Connect and resume an existing session.
    pub async fn connect_session(config: &CacheConfig, session_id: Uuid) -> Result<Self, RedisError> {
        debug!("Connecting to Redis for session {}", session_id);
        let client = redis::Client::open(config.url.as_str())?;
        let conn = ConnectionManager::new(client).await?;
        Ok(Self {
            conn,
            prefix: format!("{}{}:", SESSION_PREFIX, session_id),
            ttl_seconds: config.default_ttl_seconds,
        })
    }

    fn slot(&self, key: &str) -> String {
        format!("{}{}", self.prefix, key)
    }
}

fn cache_error(op: &str, key: &str, e: RedisError) -> AppError {
    warn!("Redis {} error for key {}: {}", op, key, e);
    AppError::Cache(e)
}

#[async_trait]
impl ClientStore for RedisClientStore {
    async fn get(&self, key: &str) -> AppResult<Option<String>> {
        let slot = self.slot(key);
        let mut conn = self.conn.clone();
        conn.get(&slot).await.map_err(|e| cache_error("get", &slot, e))
    }

    async fn set(&self, key: &str, value: &str) -> AppResult<()> {
        let slot = self.slot(key);
        let mut conn = self.conn.clone();
        conn.set_ex::<_, _, ()>(&slot, value, self.ttl_seconds)
            .await
            .map_err(|e| cache_error("set", &slot, e))
    }

    async fn delete(&self, key: &str) -> AppResult<()> {
        let slot = self.slot(key);
        let mut conn = self.conn.clone();
        conn.del::<_, ()>(&slot)
            .await
            .map_err(|e| cache_error("delete", &slot, e))
    }
}
