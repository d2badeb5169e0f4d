//! # Error Types
//!
//! Domain-specific error types for rail-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  rail-core errors (this file)                                          │
//! │  ├── BookingError     - Counter rule violations (codes 1-4)            │
//! │  └── ValidationError  - Malformed input, rejected before any I/O       │
//! │                                                                         │
//! │  rail-db errors (separate crate)                                       │
//! │  ├── DbError          - Pool / migration failures                      │
//! │  └── TicketError      - What purchase/cancel return                    │
//! │                                                                         │
//! │  Flow: BookingError ─┬─► TicketError ─► counter CLI                    │
//! │        sqlx::Error ──┘   (both carried unchanged)                      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Design Principles
//! 1. Use `thiserror` for derive macros (not manual impl)
//! 2. Include context in error messages (trip id, ticket id, seat counts)
//! 3. Errors are plain values; whoever handles one logs it
//! 4. Every booking error has a stable numeric code for callers to match on

use chrono::NaiveDate;
use thiserror::Error;

// =============================================================================
// Booking Error
// =============================================================================

/// Counter rule violations raised by purchase and cancellation.
///
/// ## Codes
/// ```text
/// ┌───────────────────┬──────┬──────────────────────────────────────────┐
/// │ Kind              │ Code │ Raised when                              │
/// ├───────────────────┼──────┼──────────────────────────────────────────┤
/// │ InsufficientSeats │  1   │ purchase asks for more than is free      │
/// │ NoSuchTrip        │  2   │ no trip for origin/destination/date/time │
/// │ NoSuchTicket      │  3   │ no ticket with that id                   │
/// │ ExcessRelease     │  4   │ cancel releases more than the ticket has │
/// └───────────────────┴──────┴──────────────────────────────────────────┘
/// ```
///
/// Codes are part of the public contract: never renumber them.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BookingError {
    /// The trip does not have enough free seats.
    #[error("Not enough free seats on trip {trip_id}: {available} available, {requested} requested")]
    InsufficientSeats {
        trip_id: i64,
        available: i64,
        requested: i64,
    },

    /// No trip matches the query.
    #[error("No trip from {origin} to {destination} on {date} at {departure}")]
    NoSuchTrip {
        origin: String,
        destination: String,
        date: NaiveDate,
        /// Departure as `HH:MM` (the precision the lookup uses).
        departure: String,
    },

    /// No ticket has this identifier.
    #[error("Ticket not found: {ticket_id}")]
    NoSuchTicket { ticket_id: i64 },

    /// The cancellation asks to release more seats than the ticket holds.
    #[error("Cannot release {requested} seats from ticket {ticket_id}: it holds {held}")]
    ExcessRelease {
        ticket_id: i64,
        held: i64,
        requested: i64,
    },
}

impl BookingError {
    pub const INSUFFICIENT_SEATS: i32 = 1;
    pub const NO_SUCH_TRIP: i32 = 2;
    pub const NO_SUCH_TICKET: i32 = 3;
    pub const EXCESS_RELEASE: i32 = 4;

    /// Stable numeric code for programmatic matching.
    pub const fn code(&self) -> i32 {
        match self {
            BookingError::InsufficientSeats { .. } => Self::INSUFFICIENT_SEATS,
            BookingError::NoSuchTrip { .. } => Self::NO_SUCH_TRIP,
            BookingError::NoSuchTicket { .. } => Self::NO_SUCH_TICKET,
            BookingError::ExcessRelease { .. } => Self::EXCESS_RELEASE,
        }
    }
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
///
/// These are raised before a connection is acquired, so they never cost a
/// transaction.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// Field value is too long.
    #[error("{field} must be at most {max} characters")]
    TooLong { field: String, max: usize },

    /// Value must be positive.
    #[error("{field} must be positive")]
    MustBePositive { field: String },
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with BookingError.
pub type BookingResult<T> = Result<T, BookingError>;

// =============================================================================
// Unit Tests
// =============================================================================
