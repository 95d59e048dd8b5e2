//! Catalog Service Library
//!
//! Listing search, summaries and editing, per-session favorites, the
//! client-to-agent interaction workflow and the administrator report.

pub mod favorites;
pub mod interaction_service;
pub mod listing;
pub mod report;

use std::sync::Arc;

use domain::Clock;
use storage::Persistence;

pub use favorites::{ClientStore, FavoritesCache, MemoryClientStore, RedisClientStore};
pub use interaction_service::{InteractionService, Interactions};
pub use listing::{ListingCatalog, ListingEditor, ListingRegistry, ListingSearch};
pub use report::{ReportService, Reports};

/// Catalog components wired over one database handle.
pub struct CatalogModule {
    pub listings: ListingCatalog,
    pub editor: ListingRegistry,
    pub interactions: Interactions,
    pub reports: Reports,
}

impl CatalogModule {
    pub fn new(persistence: Persistence, clock: Arc<dyn Clock>) -> Self {
        Self {
            listings: ListingCatalog::new(persistence.clone()),
            editor: ListingRegistry::new(persistence.clone(), clock.clone()),
            interactions: Interactions::new(persistence.clone(), clock),
            reports: Reports::new(persistence),
        }
    }
}
