//! Per-session favorite listings kept in a client-side key-value slot.

mod cache;
mod client_store;
mod redis_store;

pub use cache::{FavoritesCache, FAVORITES_KEY};
pub use client_store::{ClientStore, MemoryClientStore};
#[cfg(any(test, feature = "test-utils"))]
pub use client_store::MockClientStore;
pub use redis_store::RedisClientStore;
