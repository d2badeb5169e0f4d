//! # rail-db: Database Layer for the Rail Ticket Counter
//!
//! This crate provides database access and the two transactional writes of
//! the counter: buying and cancelling tickets. It uses SQLite for storage
//! with sqlx for async operations.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                       Rail Counter Data Flow                            │
//! │                                                                         │
//! │  counter purchase --from Burgos --to Madrid ...                        │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                     rail-db (THIS CRATE)                        │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────────┐    ┌───────────────┐    ┌──────────────┐  │   │
//! │  │   │ TicketService │    │  Repositories │    │  Migrations  │  │   │
//! │  │   │ (service.rs)  │───►│  (trip.rs)    │    │  (embedded)  │  │   │
//! │  │   │               │    │  (ticket.rs)  │    │              │  │   │
//! │  │   └───────┬───────┘    └───────────────┘    │ 001_init.sql │  │   │
//! │  │           │ ConnectionProvider              └──────────────┘  │   │
//! │  │           ▼                                                    │   │
//! │  │   ┌───────────────┐                                            │   │
//! │  │   │   Database    │                                            │   │
//! │  │   │   (pool.rs)   │                                            │   │
//! │  │   └───────────────┘                                            │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │          SQLite Database (recorridos, viajes, tickets)          │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Module Organization
//!
//! - [`pool`] - Connection pool creation and configuration
//! - [`provider`] - The `ConnectionProvider` seam the service depends on
//! - [`service`] - Purchase and cancellation transactions
//! - [`migrations`] - Embedded database migrations
//! - [`error`] - Database and ticket error types
//! - [`repository`] - Trip and ticket SQL
//!
//! ## Usage
//!
//! ```rust,ignore
//! use rail_core::{PurchaseRequest, TripQuery};
//! use rail_db::{Database, DbConfig};
//!
//! let db = Database::new(DbConfig::new("counter.db")).await?;
//!
//! let query = TripQuery::new("Burgos", "Madrid", date, departure);
//! let ticket = db
//!     .ticket_service()
//!     .purchase_ticket(&PurchaseRequest::new(query, 2))
//!     .await?;
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod migrations;
pub mod pool;
pub mod provider;
pub mod repository;
pub mod service;

// =============================================================================
// Re-exports
// =============================================================================

pub use error::{DbError, DbResult, TicketError, TicketResult};
pub use pool::{Database, DbConfig};
pub use provider::{ConnectionProvider, SqliteTx};
pub use service::TicketService;

// Repository re-exports for convenience
pub use repository::ticket::TicketRepository;
pub use repository::trip::TripRepository;
