//! # Counter Error Type
//!
//! What the clerk sees when a command fails.
//!
//! ## Error Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Error Flow in the Counter                            │
//! │                                                                         │
//! │  TicketError::Booking(InsufficientSeats) ──► INSUFFICIENT_SEATS, code 1 │
//! │  TicketError::Booking(NoSuchTrip)        ──► NO_SUCH_TRIP,       code 2 │
//! │  TicketError::Booking(NoSuchTicket)      ──► NO_SUCH_TICKET,     code 3 │
//! │  TicketError::Booking(ExcessRelease)     ──► EXCESS_RELEASE,     code 4 │
//! │  TicketError::Validation(_)              ──► VALIDATION_ERROR           │
//! │  DbError::NotFound / unknown trip id     ──► NOT_FOUND                  │
//! │  TicketError::Store(_) / DbError         ──► DATABASE_ERROR             │
//! │  ConfigError                             ──► CONFIG_ERROR               │
//! │                                                                         │
//! │  stderr:                                                                │
//! │  {                                                                      │
//! │    "kind": "INSUFFICIENT_SEATS",                                        │
//! │    "code": 1,                                                           │
//! │    "message": "Not enough free seats on trip 7: 2 available, ..."       │
//! │  }                                                                      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The process exit status is the booking code for domain failures, so
//! scripts can branch on it without parsing JSON.

use serde::Serialize;

use crate::config::ConfigError;
use rail_core::BookingError;
use rail_db::{DbError, TicketError};

/// Error printed when a command fails.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CounterError {
    /// Machine-readable kind
    pub kind: ErrorKind,

    /// Booking code (1-4) for domain failures
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<i32>,

    /// Human-readable message
    pub message: String,
}

/// Error kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorKind {
    InsufficientSeats,
    NoSuchTrip,
    NoSuchTicket,
    ExcessRelease,
    ValidationError,
    NotFound,
    DatabaseError,
    ConfigError,
}

impl CounterError {
    /// Creates a new counter error.
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        CounterError {
            kind,
            code: None,
            message: message.into(),
        }
    }

    /// Process exit status for this error.
    ///
    /// Booking failures exit with their code; the rest use sysexits values.
    pub fn exit_code(&self) -> i32 {
        match (self.code, self.kind) {
            (Some(code), _) => code,
            (None, ErrorKind::ValidationError) => 64,
            (None, ErrorKind::NotFound) => 66,
            (None, ErrorKind::ConfigError) => 78,
            (None, _) => 70,
        }
    }
}

impl std::fmt::Display for CounterError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.code {
            Some(code) => write!(f, "[{}] {}", code, self.message),
            None => write!(f, "{}", self.message),
        }
    }
}

impl std::error::Error for CounterError {}

impl From<BookingError> for CounterError {
    fn from(err: BookingError) -> Self {
        let kind = match err {
            BookingError::InsufficientSeats { .. } => ErrorKind::InsufficientSeats,
            BookingError::NoSuchTrip { .. } => ErrorKind::NoSuchTrip,
            BookingError::NoSuchTicket { .. } => ErrorKind::NoSuchTicket,
            BookingError::ExcessRelease { .. } => ErrorKind::ExcessRelease,
        };

        CounterError {
            kind,
            code: Some(err.code()),
            message: err.to_string(),
        }
    }
}

impl From<TicketError> for CounterError {
    fn from(err: TicketError) -> Self {
        match err {
            TicketError::Booking(booking) => booking.into(),
            TicketError::Validation(invalid) => {
                CounterError::new(ErrorKind::ValidationError, invalid.to_string())
            }
            TicketError::Store(fault) => {
                CounterError::new(ErrorKind::DatabaseError, fault.to_string())
            }
        }
    }
}

impl From<DbError> for CounterError {
    fn from(err: DbError) -> Self {
        match err {
            DbError::NotFound { .. } => CounterError::new(ErrorKind::NotFound, err.to_string()),
            _ => CounterError::new(ErrorKind::DatabaseError, err.to_string()),
        }
    }
}

impl From<ConfigError> for CounterError {
    fn from(err: ConfigError) -> Self {
        CounterError::new(ErrorKind::ConfigError, err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rail_core::ValidationError;

    #[test]
    fn test_booking_errors_keep_their_code() {
        let err: CounterError = TicketError::Booking(BookingError::NoSuchTicket { ticket_id: 9 }).into();

        assert_eq!(err.kind, ErrorKind::NoSuchTicket);
        assert_eq!(err.code, Some(3));
        assert_eq!(err.exit_code(), 3);
        assert_eq!(err.to_string(), "[3] Ticket not found: 9");
    }

    #[test]
    fn test_serialized_shape() {
        let err: CounterError = BookingError::ExcessRelease {
            ticket_id: 4,
            held: 2,
            requested: 3,
        }
        .into();

        let json = serde_json::to_value(&err).unwrap();
        assert_eq!(json["kind"], "EXCESS_RELEASE");
        assert_eq!(json["code"], 4);

        let err = CounterError::new(ErrorKind::DatabaseError, "disk I/O error");
        let json = serde_json::to_value(&err).unwrap();
        assert_eq!(json["kind"], "DATABASE_ERROR");
        assert!(json.get("code").is_none());
    }

    #[test]
    fn test_non_booking_exit_codes() {
        let invalid: CounterError = TicketError::Validation(ValidationError::MustBePositive {
            field: "seats".to_string(),
        })
        .into();
        assert_eq!(invalid.exit_code(), 64);

        let store: CounterError = DbError::PoolExhausted.into();
        assert_eq!(store.kind, ErrorKind::DatabaseError);
        assert_eq!(store.exit_code(), 70);

        let missing: CounterError = DbError::not_found("Trip", "12").into();
        assert_eq!(missing.kind, ErrorKind::NotFound);
        assert_eq!(missing.exit_code(), 66);
        assert_eq!(serde_json::to_value(&missing).unwrap()["kind"], "NOT_FOUND");

        let config: CounterError = ConfigError::InvalidValue("RAIL_DB_PATH".to_string()).into();
        assert_eq!(config.exit_code(), 78);
    }
}
