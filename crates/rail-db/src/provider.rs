//! # Connection Provider
//!
//! The one collaborator the ticket service needs: something that hands out a
//! fresh transaction per call.
//!
//! ## Why a Trait?
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Injected, Not Global                               │
//! │                                                                         │
//! │  TicketService<P: ConnectionProvider>                                  │
//! │       │                                                                 │
//! │       │  provider.begin()  ── one transaction per purchase / cancel     │
//! │       ▼                                                                 │
//! │  ┌──────────────┐   ┌──────────────┐   ┌─────────────────────────┐     │
//! │  │  Database    │   │  SqlitePool  │   │  test providers         │     │
//! │  │  (app)       │   │  (raw pool)  │   │  (fail / count begins)  │     │
//! │  └──────────────┘   └──────────────┘   └─────────────────────────┘     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Isolation Precondition
//! SQLite admits one writer per database at a time. Transactions start
//! deferred: the availability read takes a read snapshot, the first write
//! upgrades to the write lock. If another writer got in between, the upgrade
//! fails with `SQLITE_BUSY` (surfaced as a store fault), and the seat
//! decrement itself is guarded (`... WHERE nPlazasLibres >= n`), so a trip is
//! never oversold whatever the interleaving.

use std::future::Future;

use sqlx::{Sqlite, SqlitePool, Transaction};

/// A transaction on a pooled SQLite connection.
///
/// Dropping it without `commit()` rolls it back and returns the connection
/// to the pool.
pub type SqliteTx = Transaction<'static, Sqlite>;

/// Hands out one transaction per unit of work.
///
/// ## Contract
/// - Every call returns a transaction on a connection nobody else is using
/// - The connection goes back to the provider when the transaction is
///   committed, rolled back, or dropped
pub trait ConnectionProvider: Send + Sync {
    /// Acquires a connection and opens a transaction on it.
    fn begin(&self) -> impl Future<Output = Result<SqliteTx, sqlx::Error>> + Send;
}

impl ConnectionProvider for SqlitePool {
    fn begin(&self) -> impl Future<Output = Result<SqliteTx, sqlx::Error>> + Send {
        SqlitePool::begin(self)
    }
}
