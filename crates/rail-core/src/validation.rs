//! # Validation Module
//!
//! Input validation for counter requests.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: CLI (clap)                                                   │
//! │  └── Type validation (dates, times, integers parse)                    │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: THIS MODULE                                                  │
//! │  └── Seat counts, station names (before any connection is taken)       │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: Database (SQLite)                                            │
//! │  ├── CHECK (0 <= nPlazasLibres <= nPlazasTotales)                      │
//! │  ├── CHECK (cantidad > 0)                                              │
//! │  └── Foreign key constraints                                           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use rail_core::validation::{validate_seat_count, validate_station};
//!
//! assert!(validate_seat_count(3).is_ok());
//! assert!(validate_seat_count(0).is_err());
//! assert!(validate_station("origin", "Burgos").is_ok());
//! ```

use crate::error::ValidationError;
use crate::types::{CancelRequest, PurchaseRequest, TripQuery};
use crate::MAX_STATION_NAME_LEN;

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

// =============================================================================
// String Validators
// =============================================================================

/// Validates a station name.
///
/// ## Rules
/// - Must not be empty (after trimming)
/// - At most MAX_STATION_NAME_LEN characters
pub fn validate_station(field: &str, name: &str) -> ValidationResult<()> {
    let name = name.trim();

    if name.is_empty() {
        return Err(ValidationError::Required {
            field: field.to_string(),
        });
    }

    if name.chars().count() > MAX_STATION_NAME_LEN {
        return Err(ValidationError::TooLong {
            field: field.to_string(),
            max: MAX_STATION_NAME_LEN,
        });
    }

    Ok(())
}

// =============================================================================
// Numeric Validators
// =============================================================================

/// Validates a seat count for a purchase or a release.
///
/// A zero or negative count would turn a purchase into a refund (and a
/// release into a sale), so it never reaches the database. There is no upper
/// bound here: the trip's free seats and the ticket's quantity decide that.
pub fn validate_seat_count(seats: i64) -> ValidationResult<()> {
    if seats <= 0 {
        return Err(ValidationError::MustBePositive {
            field: "seats".to_string(),
        });
    }

    Ok(())
}

// =============================================================================
// Request Validators
// =============================================================================

/// Validates the station names of a trip query.
pub fn validate_trip_query(query: &TripQuery) -> ValidationResult<()> {
    validate_station("origin", &query.origin)?;
    validate_station("destination", &query.destination)?;
    Ok(())
}

/// Validates a purchase request.
pub fn validate_purchase(request: &PurchaseRequest) -> ValidationResult<()> {
    validate_trip_query(&request.trip)?;
    validate_seat_count(request.seats)?;
    Ok(())
}

/// Validates a cancellation request.
///
/// The trip fields are informational, so only the seat count is checked. Any
/// ticket id is looked up; one that isn't stored is `NoSuchTicket`.
pub fn validate_cancel(request: &CancelRequest) -> ValidationResult<()> {
    validate_seat_count(request.seats)?;
    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================
