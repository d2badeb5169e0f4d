//! # rail-core: Pure Domain Logic for the Rail Ticket Counter
//!
//! This crate holds the rules of the counter as pure functions: whether a
//! trip can seat a party, what a ticket costs, and what a cancellation does
//! to a ticket. It never touches the database.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Rail Counter Architecture                          │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                    Counter CLI (apps/counter)                   │   │
//! │  │         trips ──► purchase ──► tickets ──► cancel               │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                rail-db (TicketService, repositories)            │   │
//! │  │          BEGIN ── read ── validate ── write ── COMMIT           │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │ asks                                   │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               ★ rail-core (THIS CRATE) ★                        │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌───────────┐  ┌───────────┐  ┌───────────┐  │   │
//! │  │   │   types   │  │   money   │  │   error   │  │ validation│  │   │
//! │  │   │   Trip    │  │   Money   │  │ Booking-  │  │   seats   │  │   │
//! │  │   │  Ticket   │  │   fares   │  │   Error   │  │  stations │  │   │
//! │  │   └───────────┘  └───────────┘  └───────────┘  └───────────┘  │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO DATABASE • NO NETWORK • PURE FUNCTIONS           │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Domain types (Route, Trip, Ticket, requests, outcomes)
//! - [`money`] - Money type with integer arithmetic (no floating point!)
//! - [`error`] - Booking and validation errors
//! - [`validation`] - Input validation
//!
//! ## Example Usage
//!
//! ```rust
//! use chrono::NaiveDate;
//! use rail_core::{Money, Trip};
//!
//! let trip = Trip {
//!     id: 7,
//!     route_id: 1,
//!     date: NaiveDate::from_ymd_opt(2026, 4, 20).unwrap(),
//!     total_seats: 50,
//!     free_seats: 5,
//!     price_per_seat: Money::from_cents(1250),
//! };
//!
//! assert!(trip.check_availability(3).is_ok());
//! assert_eq!(trip.fare_for(3).cents(), 3750);
//! assert_eq!(trip.check_availability(6).unwrap_err().code(), 1);
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod money;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use error::{BookingError, ValidationError};
pub use money::Money;
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Maximum length of a station name.
pub const MAX_STATION_NAME_LEN: usize = 100;
