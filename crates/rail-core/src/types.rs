//! # Domain Types
//!
//! Core domain types used throughout the rail counter.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │     Route       │   │      Trip       │   │     Ticket      │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  id             │◄──│  route_id (FK)  │◄──│  trip_id (FK)   │       │
//! │  │  origin         │   │  date           │   │  purchase_date  │       │
//! │  │  destination    │   │  free_seats     │   │  quantity       │       │
//! │  │  departure      │   │  price_per_seat │   │  price          │       │
//! │  └─────────────────┘   └─────────────────┘   └─────────────────┘       │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │   TripQuery     │   │ PurchaseRequest │   │  CancelRequest  │       │
//! │  │  origin, dest,  │──►│  query + seats  │   │ ticket + seats  │       │
//! │  │  date, time     │   └─────────────────┘   └────────┬────────┘       │
//! │  └─────────────────┘                                  ▼                 │
//! │                                              ┌─────────────────┐       │
//! │                                              │  Cancellation   │       │
//! │                                              │  Full / Partial │       │
//! │                                              └─────────────────┘       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Seat counts are `i64` to match SQLite's INTEGER affinity.

use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};

use crate::error::{BookingError, BookingResult};
use crate::money::Money;

// =============================================================================
// Route
// =============================================================================

/// A scheduled connection between two stations.
///
/// Routes are read-only to the counter; trips are instances of a route on a
/// given date.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Route {
    pub id: i64,
    pub origin: String,
    pub destination: String,
    pub departure: NaiveTime,
    pub arrival: Option<NaiveTime>,
}

// =============================================================================
// Trip
// =============================================================================

/// A route running on a specific date, with its seat counters and fare.
///
/// ## Invariant
/// `0 <= free_seats <= total_seats` for every committed state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Trip {
    pub id: i64,
    pub route_id: i64,
    pub date: NaiveDate,
    pub total_seats: i64,
    pub free_seats: i64,
    pub price_per_seat: Money,
}

impl Trip {
    /// Checks the trip can seat `seats` more passengers.
    ///
    /// ## User Workflow
    /// ```text
    /// Counter: "3 seats, Burgos → Madrid, 08:30"
    ///      │
    ///      ▼
    /// check_availability(3) ← THIS FUNCTION
    ///      │
    ///      ├── free_seats = 2 → InsufficientSeats (code 1)
    ///      │
    ///      └── free_seats = 5 → OK, sell the ticket
    /// ```
    pub fn check_availability(&self, seats: i64) -> BookingResult<()> {
        if self.free_seats < seats {
            return Err(BookingError::InsufficientSeats {
                trip_id: self.id,
                available: self.free_seats,
                requested: seats,
            });
        }
        Ok(())
    }

    /// Total price of `seats` seats on this trip.
    #[inline]
    pub fn fare_for(&self, seats: i64) -> Money {
        self.price_per_seat.multiply_quantity(seats)
    }

    /// Seats already sold.
    #[inline]
    pub fn seats_sold(&self) -> i64 {
        self.total_seats - self.free_seats
    }
}

/// A trip together with the route details a customer recognises it by.
///
/// Read model for listings; never written back.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct TripListing {
    #[serde(flatten)]
    #[cfg_attr(feature = "sqlx", sqlx(flatten))]
    pub trip: Trip,
    pub origin: String,
    pub destination: String,
    pub departure: NaiveTime,
}

// =============================================================================
// Ticket
// =============================================================================

/// A purchase of one or more seats on a trip.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Ticket {
    /// Sequence-generated identifier.
    pub id: i64,
    pub trip_id: i64,
    pub purchase_date: NaiveDate,
    /// Seats held by this ticket.
    pub quantity: i64,
    /// Total paid for `quantity` seats.
    pub price: Money,
}

impl Ticket {
    /// Decides what releasing `seats` seats does to this ticket.
    ///
    /// ## Release Planning
    /// ```text
    /// ticket.quantity = 3
    ///      │
    ///      ├── release 5 → ExcessRelease (code 4), nothing is written
    ///      │
    ///      ├── release 3 → Full      (delete the ticket)
    ///      │
    ///      └── release 1 → Partial   (ticket keeps 2 seats)
    /// ```
    ///
    /// In every accepted case the trip is credited exactly `seats` seats.
    pub fn plan_release(&self, seats: i64) -> BookingResult<Cancellation> {
        if self.quantity < seats {
            return Err(BookingError::ExcessRelease {
                ticket_id: self.id,
                held: self.quantity,
                requested: seats,
            });
        }

        if seats == self.quantity {
            Ok(Cancellation::Full {
                ticket_id: self.id,
                trip_id: self.trip_id,
                seats_released: seats,
            })
        } else {
            Ok(Cancellation::Partial {
                ticket_id: self.id,
                trip_id: self.trip_id,
                seats_released: seats,
                remaining: self.quantity - seats,
            })
        }
    }

    /// Price left on the ticket after releasing `seats` seats.
    ///
    /// The released seats are refunded at the price they were bought at,
    /// not at the trip's current fare.
    pub fn price_after_release(&self, seats: i64) -> Money {
        self.price - self.price.per_unit(self.quantity).multiply_quantity(seats)
    }
}

// =============================================================================
// Requests
// =============================================================================

/// Identifies a trip the way a customer asks for it at the counter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TripQuery {
    pub origin: String,
    pub destination: String,
    pub date: NaiveDate,
    pub departure: NaiveTime,
}

impl TripQuery {
    /// Creates a trip query.
    pub fn new(
        origin: impl Into<String>,
        destination: impl Into<String>,
        date: NaiveDate,
        departure: NaiveTime,
    ) -> Self {
        TripQuery {
            origin: origin.into(),
            destination: destination.into(),
            date,
            departure,
        }
    }

    /// Departure time as `HH:MM`.
    ///
    /// Trips are matched at minute precision: seconds (and anything finer)
    /// are noise from whatever clock produced the time.
    ///
    /// ## Example
    /// ```rust
    /// use chrono::{NaiveDate, NaiveTime};
    /// use rail_core::TripQuery;
    ///
    /// let q = TripQuery::new(
    ///     "Burgos",
    ///     "Madrid",
    ///     NaiveDate::from_ymd_opt(2026, 4, 20).unwrap(),
    ///     NaiveTime::from_hms_opt(8, 30, 59).unwrap(),
    /// );
    /// assert_eq!(q.departure_minute(), "08:30");
    /// ```
    pub fn departure_minute(&self) -> String {
        self.departure.format("%H:%M").to_string()
    }

    /// The error returned when no trip matches this query.
    pub fn not_found(&self) -> BookingError {
        BookingError::NoSuchTrip {
            origin: self.origin.clone(),
            destination: self.destination.clone(),
            date: self.date,
            departure: self.departure_minute(),
        }
    }
}

/// Input of a purchase.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PurchaseRequest {
    pub trip: TripQuery,
    pub seats: i64,
}

impl PurchaseRequest {
    pub fn new(trip: TripQuery, seats: i64) -> Self {
        PurchaseRequest { trip, seats }
    }
}

/// Input of a cancellation.
///
/// `trip` is what the customer says they travel on. Only `ticket_id` is used
/// to find the ticket; `trip` is recorded in the log for the audit trail.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CancelRequest {
    pub ticket_id: i64,
    pub seats: i64,
    pub trip: TripQuery,
}

impl CancelRequest {
    pub fn new(ticket_id: i64, seats: i64, trip: TripQuery) -> Self {
        CancelRequest {
            ticket_id,
            seats,
            trip,
        }
    }
}

// =============================================================================
// Outcomes
// =============================================================================

/// What a successful cancellation did.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Cancellation {
    /// Every seat was released; the ticket was deleted.
    Full {
        ticket_id: i64,
        trip_id: i64,
        seats_released: i64,
    },

    /// Some seats were released; the ticket keeps `remaining`.
    Partial {
        ticket_id: i64,
        trip_id: i64,
        seats_released: i64,
        remaining: i64,
    },
}

impl Cancellation {
    pub fn ticket_id(&self) -> i64 {
        match self {
            Cancellation::Full { ticket_id, .. } | Cancellation::Partial { ticket_id, .. } => {
                *ticket_id
            }
        }
    }

    pub fn trip_id(&self) -> i64 {
        match self {
            Cancellation::Full { trip_id, .. } | Cancellation::Partial { trip_id, .. } => *trip_id,
        }
    }

    pub fn seats_released(&self) -> i64 {
        match self {
            Cancellation::Full { seats_released, .. }
            | Cancellation::Partial { seats_released, .. } => *seats_released,
        }
    }

    pub fn is_full(&self) -> bool {
        matches!(self, Cancellation::Full { .. })
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
