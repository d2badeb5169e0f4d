//! # Ticket Repository
//!
//! Database operations for tickets.
//!
//! ## Ticket Lifecycle
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                       Ticket Lifecycle                                  │
//! │                                                                         │
//! │  1. PURCHASE  (same transaction as reserve_seats)                      │
//! │     └── insert() → Ticket { id: next in sequence, quantity: n }        │
//! │                                                                         │
//! │  2. PARTIAL CANCEL  (same transaction as release_seats)                │
//! │     └── shrink() → Ticket { quantity: n - k, price reduced }           │
//! │                                                                         │
//! │  3. FULL CANCEL  (same transaction as release_seats)                   │
//! │     └── delete() → row gone, id never reused                           │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::NaiveDate;
use sqlx::{SqliteExecutor, SqlitePool};
use tracing::debug;

use crate::error::DbResult;
use rail_core::{Money, Ticket};

/// Ticket columns aliased to `Ticket` field names.
const TICKET_COLUMNS: &str = r#"
    idTicket    AS id,
    idViaje     AS trip_id,
    fechaCompra AS purchase_date,
    cantidad    AS quantity,
    precio      AS price
"#;

// =============================================================================
// Transactional Operations
// =============================================================================

/// Inserts a ticket; the id comes from the `tickets` sequence.
pub async fn insert<'e, E>(
    executor: E,
    trip_id: i64,
    purchase_date: NaiveDate,
    quantity: i64,
    price: Money,
) -> Result<Ticket, sqlx::Error>
where
    E: SqliteExecutor<'e>,
{
    debug!(trip_id, quantity, price = %price, "Inserting ticket");

    let sql = format!(
        r#"
        INSERT INTO tickets (idViaje, fechaCompra, cantidad, precio)
        VALUES (?1, ?2, ?3, ?4)
        RETURNING {TICKET_COLUMNS}
        "#
    );

    sqlx::query_as::<_, Ticket>(&sql)
        .bind(trip_id)
        .bind(purchase_date)
        .bind(quantity)
        .bind(price)
        .fetch_one(executor)
        .await
}

/// Reads a ticket by id.
pub async fn find_by_id<'e, E>(executor: E, ticket_id: i64) -> Result<Option<Ticket>, sqlx::Error>
where
    E: SqliteExecutor<'e>,
{
    let sql = format!("SELECT {TICKET_COLUMNS} FROM tickets WHERE idTicket = ?1");

    sqlx::query_as::<_, Ticket>(&sql)
        .bind(ticket_id)
        .fetch_optional(executor)
        .await
}

/// Deletes a ticket. Returns the number of rows deleted.
pub async fn delete<'e, E>(executor: E, ticket_id: i64) -> Result<u64, sqlx::Error>
where
    E: SqliteExecutor<'e>,
{
    debug!(ticket_id, "Deleting ticket");

    let result = sqlx::query("DELETE FROM tickets WHERE idTicket = ?1")
        .bind(ticket_id)
        .execute(executor)
        .await?;

    Ok(result.rows_affected())
}

/// Removes `seats` seats from a ticket and sets its new price.
///
/// Only applies while the ticket keeps at least one seat; a full release is a
/// `delete`. Returns the number of rows updated.
pub async fn shrink<'e, E>(
    executor: E,
    ticket_id: i64,
    seats: i64,
    new_price: Money,
) -> Result<u64, sqlx::Error>
where
    E: SqliteExecutor<'e>,
{
    debug!(ticket_id, seats, new_price = %new_price, "Shrinking ticket");

    let result = sqlx::query(
        r#"
        UPDATE tickets
        SET cantidad = cantidad - ?2,
            precio = ?3
        WHERE idTicket = ?1 AND cantidad > ?2
        "#,
    )
    .bind(ticket_id)
    .bind(seats)
    .bind(new_price)
    .execute(executor)
    .await?;

    Ok(result.rows_affected())
}

// =============================================================================
// Repository
// =============================================================================

/// Repository for ticket reads.
///
/// Writes go through `TicketService`, which keeps tickets and trip seat
/// counters in step.
#[derive(Debug, Clone)]
pub struct TicketRepository {
    pool: SqlitePool,
}

impl TicketRepository {
    /// Creates a new TicketRepository.
    pub fn new(pool: SqlitePool) -> Self {
        TicketRepository { pool }
    }

    /// Gets a ticket by its ID.
    pub async fn get_by_id(&self, id: i64) -> DbResult<Option<Ticket>> {
        Ok(find_by_id(&self.pool, id).await?)
    }

    /// Lists the tickets of a trip, oldest first.
    pub async fn list_for_trip(&self, trip_id: i64) -> DbResult<Vec<Ticket>> {
        let sql = format!(
            "SELECT {TICKET_COLUMNS} FROM tickets WHERE idViaje = ?1 ORDER BY idTicket"
        );

        let tickets = sqlx::query_as::<_, Ticket>(&sql)
            .bind(trip_id)
            .fetch_all(&self.pool)
            .await?;

        Ok(tickets)
    }

    /// Seats held by all tickets of a trip.
    pub async fn seats_sold(&self, trip_id: i64) -> DbResult<i64> {
        let total: Option<i64> =
            sqlx::query_scalar("SELECT SUM(cantidad) FROM tickets WHERE idViaje = ?1")
                .bind(trip_id)
                .fetch_one(&self.pool)
                .await?;

        Ok(total.unwrap_or(0))
    }

    /// Counts tickets (for diagnostics).
    pub async fn count(&self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM tickets")
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }
}
