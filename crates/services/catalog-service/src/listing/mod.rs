//! Listing catalog: filtered search, summaries and agent editing.

mod editor;
mod search;
mod summary;

pub use editor::{ListingEditor, ListingRegistry};
pub(crate) use search::active_listings;
pub use search::{ListingCatalog, ListingSearch};
