//! Relational access layer for the registry.
//!
//! SeaORM entities for every table, schema migrations, the [`Database`]
//! connection wrapper and the [`Persistence`] unit of work that hands out
//! one transaction per operation.

mod db;
pub mod entities;
pub mod migrations;
pub mod seed;
mod unit_of_work;

pub use db::Database;
pub use migrations::Migrator;
pub use unit_of_work::{Persistence, TxFuture};
