//! # Repository Module
//!
//! Database repository implementations for the rail counter.
//!
//! ## Repository Pattern
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Repository Pattern Explained                         │
//! │                                                                         │
//! │  Reads (CLI, tests)                 Writes (TicketService)              │
//! │       │                                  │                              │
//! │       │  db.trips().list_by_date(d)      │  trip::reserve_seats(tx, ..) │
//! │       ▼                                  ▼                              │
//! │  TripRepository / TicketRepository   free functions generic over        │
//! │  (own a pool handle)                 SqliteExecutor: pool or &mut tx    │
//! │       │                                  │                              │
//! │       └──────────────┬───────────────────┘                              │
//! │                      ▼                                                  │
//! │               SQLite Database                                           │
//! │                                                                         │
//! │  SQL lives in one place per table, whoever runs it.                     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Available Repositories
//!
//! - [`TripRepository`](trip::TripRepository) - Routes, trips, seat counters
//! - [`TicketRepository`](ticket::TicketRepository) - Tickets

pub mod ticket;
pub mod trip;
