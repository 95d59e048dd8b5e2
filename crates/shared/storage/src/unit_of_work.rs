//! Unit of work: one database transaction per store operation.
//!
//! The closure receives the open transaction; every statement it issues is
//! part of that transaction. `Ok` commits, `Err` rolls back. A dropped
//! (cancelled) operation rolls back when the transaction is dropped.

use futures::future::BoxFuture;
use sea_orm::{DatabaseConnection, DatabaseTransaction, TransactionTrait};

use common::{AppError, AppResult};

/// Future returned by a transaction body.
pub type TxFuture<'a, T> = BoxFuture<'a, AppResult<T>>;

/// Shared handle that begins transactions on the registry database.
#[derive(Clone)]
pub struct Persistence {
    db: DatabaseConnection,
}

impl Persistence {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Connection for single-statement reads outside a transaction.
    pub fn connection(&self) -> &DatabaseConnection {
        &self.db
    }

    /// Execute a closure within a transaction.
    ///
    /// The body must issue every statement through the transaction it is
    /// given; touching the pool directly from inside can deadlock a
    /// single-connection pool.
    pub async fn transaction<F, T>(&self, f: F) -> AppResult<T>
    where
        F: for<'a> FnOnce(&'a DatabaseTransaction) -> TxFuture<'a, T> + Send,
        T: Send,
    {
        let txn = self.db.begin().await.map_err(AppError::from)?;

        match f(&txn).await {
            Ok(result) => {
                txn.commit().await.map_err(AppError::from)?;
                Ok(result)
            }
            Err(e) => {
                if let Err(rollback_err) = txn.rollback().await {
                    tracing::error!("Transaction rollback failed: {}", rollback_err);
                }
                Err(e)
            }
        }
    }
}

/// Run a block inside [`Persistence::transaction`].
///
/// The block is moved into the transaction body, so it may only capture owned
/// values.
#[macro_export]
macro_rules! with_transaction {
    ($persistence:expr, |$txn:ident| $body:expr) => {
        $persistence
            .transaction(move |$txn| Box::pin(async move { $body }))
            .await
    };
}
