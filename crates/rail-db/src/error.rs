//! # Database Error Types
//!
//! Error types for database operations and for the ticket service.
//!
//! ## Error Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Error Propagation                                    │
//! │                                                                         │
//! │  Pool setup / migrations                                               │
//! │       │ sqlx::Error, MigrateError                                      │
//! │       ▼                                                                 │
//! │  DbError (categorized, with context)                                   │
//! │                                                                         │
//! │  purchase_ticket / cancel_ticket                                       │
//! │       │                                                                 │
//! │       ├── ValidationError  (bad input, no connection taken)            │
//! │       ├── BookingError     (rule violated, rolled back)                │
//! │       └── sqlx::Error      (store fault, rolled back, NOT rewrapped)   │
//! │       ▼                                                                 │
//! │  TicketError ← transparent: Display/source are the original's          │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use rail_core::{BookingError, ValidationError};
use thiserror::Error;

/// Database setup and repository errors.
///
/// These errors wrap sqlx errors and provide additional context
/// for debugging and user feedback.
#[derive(Debug, Error)]
pub enum DbError {
    /// Entity not found in database.
    #[error("{entity} not found: {id}")]
    NotFound { entity: String, id: String },

    /// Unique constraint violation.
    ///
    /// ## When This Occurs
    /// - Seeding the same route (origin, destination, departure) twice
    /// - Seeding the same trip (route, date) twice
    #[error("Duplicate {field}: '{value}' already exists")]
    UniqueViolation { field: String, value: String },

    /// Foreign key constraint violation.
    ///
    /// ## When This Occurs
    /// - Inserting a trip for a route that doesn't exist
    #[error("Foreign key violation: {message}")]
    ForeignKeyViolation { message: String },

    /// CHECK constraint violation (e.g. free seats outside `0..=total`).
    #[error("Check constraint violation: {message}")]
    CheckViolation { message: String },

    /// Database connection failed.
    ///
    /// ## When This Occurs
    /// - Database file doesn't exist and can't be created
    /// - File permissions issue
    /// - Disk full
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    /// Migration failed.
    #[error("Migration failed: {0}")]
    MigrationFailed(String),

    /// Query execution failed.
    #[error("Query failed: {0}")]
    QueryFailed(String),

    /// Pool exhausted (all connections in use).
    #[error("Connection pool exhausted")]
    PoolExhausted,

    /// Internal database error.
    #[error("Internal database error: {0}")]
    Internal(String),
}

impl DbError {
    /// Creates a NotFound error for a given entity type and ID.
    pub fn not_found(entity: impl Into<String>, id: impl Into<String>) -> Self {
        DbError::NotFound {
            entity: entity.into(),
            id: id.into(),
        }
    }
}

/// Convert sqlx errors to DbError.
///
/// ## Error Mapping
/// ```text
/// sqlx::Error::RowNotFound    → DbError::NotFound
/// sqlx::Error::Database       → Analyze message for constraint type
/// sqlx::Error::PoolTimedOut   → DbError::PoolExhausted
/// Other                       → DbError::Internal
/// ```
impl From<sqlx::Error> for DbError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::RowNotFound => DbError::NotFound {
                entity: "Record".to_string(),
                id: "unknown".to_string(),
            },

            sqlx::Error::Database(db_err) => {
                let msg = db_err.message();

                // SQLite constraint messages:
                // "UNIQUE constraint failed: <table>.<column>, ..."
                // "FOREIGN KEY constraint failed"
                // "CHECK constraint failed: <expr>"
                if let Some(field) = msg.strip_prefix("UNIQUE constraint failed: ") {
                    DbError::UniqueViolation {
                        field: field.to_string(),
                        value: "unknown".to_string(),
                    }
                } else if msg.contains("FOREIGN KEY constraint failed") {
                    DbError::ForeignKeyViolation {
                        message: msg.to_string(),
                    }
                } else if msg.contains("CHECK constraint failed") {
                    DbError::CheckViolation {
                        message: msg.to_string(),
                    }
                } else {
                    DbError::QueryFailed(msg.to_string())
                }
            }

            sqlx::Error::PoolTimedOut => DbError::PoolExhausted,

            sqlx::Error::PoolClosed => DbError::ConnectionFailed("Pool is closed".to_string()),

            _ => DbError::Internal(err.to_string()),
        }
    }
}

impl From<sqlx::migrate::MigrateError> for DbError {
    fn from(err: sqlx::migrate::MigrateError) -> Self {
        DbError::MigrationFailed(err.to_string())
    }
}

/// Result type for database operations.
pub type DbResult<T> = Result<T, DbError>;

// =============================================================================
// Ticket Service Error
// =============================================================================

/// Failure of a purchase or cancellation.
///
/// Every variant is `transparent`: callers see the original error's message
/// and source chain, and can match on the variant to get the typed value.
#[derive(Debug, Error)]
pub enum TicketError {
    /// Input rejected before any connection was acquired.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// A counter rule was violated; the transaction was rolled back.
    #[error(transparent)]
    Booking(#[from] BookingError),

    /// The store failed; the transaction was rolled back.
    ///
    /// The sqlx error is passed through untouched so the caller keeps the
    /// original fault detail (SQLite code, constraint name, ...).
    #[error(transparent)]
    Store(#[from] sqlx::Error),
}

impl TicketError {
    /// The booking error code (1-4), if this is a booking error.
    pub fn code(&self) -> Option<i32> {
        match self {
            TicketError::Booking(err) => Some(err.code()),
            _ => None,
        }
    }

    /// Returns the booking error, if this is one.
    pub fn as_booking(&self) -> Option<&BookingError> {
        match self {
            TicketError::Booking(err) => Some(err),
            _ => None,
        }
    }
}

/// Result type for ticket service operations.
pub type TicketResult<T> = Result<T, TicketError>;

// =============================================================================
// Unit Tests
// =============================================================================
