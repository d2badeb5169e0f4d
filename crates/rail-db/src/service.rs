//! # Ticket Service
//!
//! Purchase and cancellation: the two writes of the counter, each one
//! transaction on one connection.
//!
//! ## Purchase
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  validate (no connection yet)                                           │
//! │       │                                                                 │
//! │  BEGIN ─┬─ find trip (origin, destination, date, HH:MM)                 │
//! │         │      └── none ──────────────────────► NoSuchTrip (2)          │
//! │         ├─ free_seats < seats ────────────────► InsufficientSeats (1)   │
//! │         ├─ INSERT ticket (price = fare × seats)                         │
//! │         ├─ UPDATE viajes SET free = free - n WHERE free >= n            │
//! │         │      └── 0 rows (lost a race) ──────► InsufficientSeats (1)   │
//! │  COMMIT ┘                                                               │
//! │                                                                         │
//! │  any error after BEGIN ──► ROLLBACK ──► error returned unchanged        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Cancellation
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  validate (no connection yet)                                           │
//! │       │                                                                 │
//! │  BEGIN ─┬─ find ticket by id                                            │
//! │         │      └── none ──────────────────────► NoSuchTicket (3)        │
//! │         ├─ quantity < seats ──────────────────► ExcessRelease (4)       │
//! │         ├─ UPDATE viajes SET free = free + n   (exactly once)           │
//! │         ├─ n == quantity ? DELETE ticket                                │
//! │         │                : UPDATE ticket SET quantity - n, price        │
//! │  COMMIT ┘                                                               │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Errors are logged here, where they are handled, and nowhere else. Nothing
//! is retried.

use chrono::Utc;
use sqlx::SqliteConnection;
use tracing::{error, info, instrument, warn};

use crate::error::{TicketError, TicketResult};
use crate::provider::{ConnectionProvider, SqliteTx};
use crate::repository::{ticket, trip};
use rail_core::validation::{validate_cancel, validate_purchase};
use rail_core::{BookingError, CancelRequest, Cancellation, PurchaseRequest, Ticket};

/// Sells and cancels tickets against whatever the provider connects to.
///
/// ## Usage
/// ```rust,ignore
/// let service = TicketService::new(db.clone());
///
/// let ticket = service.purchase_ticket(&PurchaseRequest::new(query, 3)).await?;
/// let outcome = service
///     .cancel_ticket(&CancelRequest::new(ticket.id, 1, query))
///     .await?;
/// ```
#[derive(Debug, Clone)]
pub struct TicketService<P> {
    provider: P,
}

impl<P: ConnectionProvider> TicketService<P> {
    /// Creates a service that takes its connections from `provider`.
    pub fn new(provider: P) -> Self {
        TicketService { provider }
    }

    /// Returns the connection provider.
    pub fn provider(&self) -> &P {
        &self.provider
    }

    /// Buys `request.seats` seats on the trip `request.trip` resolves to.
    ///
    /// ## Returns
    /// * `Ok(Ticket)` - Committed ticket; the trip has `seats` fewer free seats
    /// * `Err(TicketError::Booking(NoSuchTrip | InsufficientSeats))` - Nothing written
    /// * `Err(TicketError::Validation(_))` - Bad input, no connection taken
    /// * `Err(TicketError::Store(_))` - Store fault, nothing written
    #[instrument(
        name = "purchase_ticket",
        skip_all,
        fields(
            origin = %request.trip.origin,
            destination = %request.trip.destination,
            date = %request.trip.date,
            departure = %request.trip.departure_minute(),
            seats = request.seats,
        )
    )]
    pub async fn purchase_ticket(&self, request: &PurchaseRequest) -> TicketResult<Ticket> {
        if let Err(err) = validate_purchase(request) {
            warn!(error = %err, "Purchase rejected");
            return Err(err.into());
        }

        let mut tx = self.begin().await?;

        match purchase_in(&mut tx, request).await {
            Ok(ticket) => {
                commit(tx).await?;
                info!(
                    ticket_id = ticket.id,
                    trip_id = ticket.trip_id,
                    price = %ticket.price,
                    "Ticket purchased"
                );
                Ok(ticket)
            }
            Err(err) => Err(abort(tx, err).await),
        }
    }

    /// Releases `request.seats` seats of ticket `request.ticket_id`.
    ///
    /// The trip fields of the request are only logged; the ticket id alone
    /// decides which ticket (and so which trip) is touched.
    ///
    /// ## Returns
    /// * `Ok(Cancellation::Full)` - Ticket deleted, seats back on the trip
    /// * `Ok(Cancellation::Partial)` - Ticket shrunk, seats back on the trip
    /// * `Err(TicketError::Booking(NoSuchTicket | ExcessRelease))` - Nothing written
    /// * `Err(TicketError::Validation(_))` - Bad input, no connection taken
    /// * `Err(TicketError::Store(_))` - Store fault, nothing written
    #[instrument(
        name = "cancel_ticket",
        skip_all,
        fields(
            ticket_id = request.ticket_id,
            seats = request.seats,
            origin = %request.trip.origin,
            destination = %request.trip.destination,
            date = %request.trip.date,
            departure = %request.trip.departure_minute(),
        )
    )]
    pub async fn cancel_ticket(&self, request: &CancelRequest) -> TicketResult<Cancellation> {
        if let Err(err) = validate_cancel(request) {
            warn!(error = %err, "Cancellation rejected");
            return Err(err.into());
        }

        let mut tx = self.begin().await?;

        match cancel_in(&mut tx, request).await {
            Ok(outcome) => {
                commit(tx).await?;
                info!(
                    trip_id = outcome.trip_id(),
                    full = outcome.is_full(),
                    "Ticket cancelled"
                );
                Ok(outcome)
            }
            Err(err) => Err(abort(tx, err).await),
        }
    }

    async fn begin(&self) -> TicketResult<SqliteTx> {
        self.provider.begin().await.map_err(|err| {
            error!(error = %err, "Could not open a transaction");
            TicketError::Store(err)
        })
    }
}

// =============================================================================
// Transaction Bodies
// =============================================================================

async fn purchase_in(conn: &mut SqliteConnection, request: &PurchaseRequest) -> TicketResult<Ticket> {
    let found = trip::find_for_query(&mut *conn, &request.trip)
        .await?
        .ok_or_else(|| request.trip.not_found())?;

    found.check_availability(request.seats)?;

    let ticket = ticket::insert(
        &mut *conn,
        found.id,
        Utc::now().date_naive(),
        request.seats,
        found.fare_for(request.seats),
    )
    .await?;

    // Another counter may have sold seats since the read
    if !trip::reserve_seats(&mut *conn, found.id, request.seats).await? {
        return Err(BookingError::InsufficientSeats {
            trip_id: found.id,
            available: found.free_seats,
            requested: request.seats,
        }
        .into());
    }

    Ok(ticket)
}

async fn cancel_in(conn: &mut SqliteConnection, request: &CancelRequest) -> TicketResult<Cancellation> {
    let held = ticket::find_by_id(&mut *conn, request.ticket_id)
        .await?
        .ok_or(BookingError::NoSuchTicket {
            ticket_id: request.ticket_id,
        })?;

    let outcome = held.plan_release(request.seats)?;

    // Credited once, whichever branch follows
    expect_one_row(trip::release_seats(&mut *conn, held.trip_id, request.seats).await?)?;

    let changed = match outcome {
        Cancellation::Full { .. } => ticket::delete(&mut *conn, held.id).await?,
        Cancellation::Partial { .. } => {
            ticket::shrink(
                &mut *conn,
                held.id,
                request.seats,
                held.price_after_release(request.seats),
            )
            .await?
        }
    };
    expect_one_row(changed)?;

    Ok(outcome)
}

/// A row read earlier in this transaction must still be there to write.
fn expect_one_row(rows: u64) -> TicketResult<()> {
    if rows == 1 {
        Ok(())
    } else {
        Err(TicketError::Store(sqlx::Error::RowNotFound))
    }
}

// =============================================================================
// Transaction Boundary
// =============================================================================

async fn commit(tx: SqliteTx) -> TicketResult<()> {
    // A failed COMMIT leaves the transaction open; dropping it rolls back
    tx.commit().await.map_err(|err| {
        error!(error = %err, "Commit failed");
        TicketError::Store(err)
    })
}

/// Rolls back and hands the original error back to the caller.
async fn abort(tx: SqliteTx, err: TicketError) -> TicketError {
    match &err {
        TicketError::Booking(booking) => {
            warn!(code = booking.code(), error = %booking, "Booking rejected, rolling back");
        }
        TicketError::Store(fault) => {
            error!(error = %fault, "Store fault, rolling back");
        }
        TicketError::Validation(invalid) => {
            warn!(error = %invalid, "Invalid request, rolling back");
        }
    }

    if let Err(rollback_err) = tx.rollback().await {
        // The connection is dropped with the transaction; the pool discards it
        error!(error = %rollback_err, "Rollback failed");
    }

    err
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::future::Future;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use chrono::{NaiveDate, NaiveTime};
    use rail_core::{Money, Trip, TripQuery, ValidationError};

    use crate::pool::{Database, DbConfig};

    // -------------------------------------------------------------------------
    // Fixtures
    // -------------------------------------------------------------------------

    fn travel_date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 4, 20).unwrap()
    }

    fn at(h: u32, m: u32, s: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(h, m, s).unwrap()
    }

    fn burgos_madrid() -> TripQuery {
        TripQuery::new("Burgos", "Madrid", travel_date(), at(8, 30, 0))
    }

    /// Burgos → Madrid at 08:30, 50 seats of which `free` are free, 12.50 € each.
    async fn setup(free: i64) -> (Database, Trip) {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let trip = add_trip(&db, free).await;
        (db, trip)
    }

    async fn add_trip(db: &Database, free: i64) -> Trip {
        let route = db
            .trips()
            .insert_route("Burgos", "Madrid", at(8, 30, 0), Some(at(10, 45, 0)))
            .await
            .unwrap();

        db.trips()
            .insert_trip(route.id, travel_date(), 50, free, Money::from_cents(1250))
            .await
            .unwrap()
    }

    async fn free_seats(db: &Database, trip: &Trip) -> i64 {
        db.trips().free_seats(trip.id).await.unwrap()
    }

    async fn purchase(db: &Database, seats: i64) -> TicketResult<Ticket> {
        db.ticket_service()
            .purchase_ticket(&PurchaseRequest::new(burgos_madrid(), seats))
            .await
    }

    async fn cancel(db: &Database, ticket_id: i64, seats: i64) -> TicketResult<Cancellation> {
        db.ticket_service()
            .cancel_ticket(&CancelRequest::new(ticket_id, seats, burgos_madrid()))
            .await
    }

    /// Makes every statement of `kind` on `table` fail inside SQLite.
    async fn inject_fault(db: &Database, kind: &str, table: &str) {
        let sql = format!(
            "CREATE TRIGGER injected_fault BEFORE {kind} ON {table} \
             BEGIN SELECT RAISE(ABORT, 'injected fault'); END"
        );
        sqlx::query(&sql).execute(db.pool()).await.unwrap();
    }

    /// Counts how many transactions were asked for.
    struct CountingProvider {
        inner: Database,
        begins: AtomicUsize,
    }

    impl ConnectionProvider for CountingProvider {
        fn begin(&self) -> impl Future<Output = Result<SqliteTx, sqlx::Error>> + Send {
            self.begins.fetch_add(1, Ordering::SeqCst);
            self.inner.begin()
        }
    }

    /// A provider whose pool is gone.
    struct UnavailableProvider;

    impl ConnectionProvider for UnavailableProvider {
        fn begin(&self) -> impl Future<Output = Result<SqliteTx, sqlx::Error>> + Send {
            async { Err(sqlx::Error::PoolTimedOut) }
        }
    }

    // -------------------------------------------------------------------------
    // Purchase
    // -------------------------------------------------------------------------

    #[tokio::test]
    async fn test_purchase_decrements_free_seats() {
        let (db, trip) = setup(5).await;

        let ticket = purchase(&db, 3).await.unwrap();

        assert_eq!(ticket.trip_id, trip.id);
        assert_eq!(ticket.quantity, 3);
        assert_eq!(ticket.price, Money::from_cents(3750));
        assert_eq!(ticket.purchase_date, Utc::now().date_naive());
        assert_eq!(free_seats(&db, &trip).await, 2);
        assert_eq!(db.tickets().get_by_id(ticket.id).await.unwrap(), Some(ticket));
    }

    #[tokio::test]
    async fn test_purchase_of_every_free_seat() {
        let (db, trip) = setup(3).await;

        purchase(&db, 3).await.unwrap();

        assert_eq!(free_seats(&db, &trip).await, 0);
    }

    #[tokio::test]
    async fn test_insufficient_seats_changes_nothing() {
        let (db, trip) = setup(2).await;

        let err = purchase(&db, 3).await.unwrap_err();

        assert_eq!(err.code(), Some(BookingError::INSUFFICIENT_SEATS));
        assert_eq!(
            err.as_booking(),
            Some(&BookingError::InsufficientSeats {
                trip_id: trip.id,
                available: 2,
                requested: 3,
            })
        );
        assert_eq!(free_seats(&db, &trip).await, 2);
        assert_eq!(db.tickets().count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_unmatched_trip_fails_for_any_seat_count() {
        let (db, trip) = setup(5).await;
        let service = db.ticket_service();

        let misses = [
            TripQuery::new("Burgos", "Madrid", travel_date(), at(8, 31, 0)),
            TripQuery::new("Madrid", "Burgos", travel_date(), at(8, 30, 0)),
            TripQuery::new("Burgos", "Madrid", travel_date().succ_opt().unwrap(), at(8, 30, 0)),
            TripQuery::new("Burgos", "León", travel_date(), at(8, 30, 0)),
        ];

        for query in misses {
            for seats in [1, 4, 5, 6, 49, 50, 51, 60, 120, 1_000, i64::MAX] {
                let err = service
                    .purchase_ticket(&PurchaseRequest::new(query.clone(), seats))
                    .await
                    .unwrap_err();
                assert_eq!(err.code(), Some(BookingError::NO_SUCH_TRIP), "{query:?} x{seats}");
            }
        }

        assert_eq!(free_seats(&db, &trip).await, 5);
        assert_eq!(db.tickets().count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_large_purchase_on_a_large_trip() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let route = db
            .trips()
            .insert_route("Madrid", "Sevilla", at(6, 35, 0), Some(at(9, 10, 0)))
            .await
            .unwrap();
        let trip = db
            .trips()
            .insert_trip(route.id, travel_date(), 120, 120, Money::from_cents(6030))
            .await
            .unwrap();
        let query = TripQuery::new("Madrid", "Sevilla", travel_date(), at(6, 35, 0));

        let ticket = db
            .ticket_service()
            .purchase_ticket(&PurchaseRequest::new(query.clone(), 60))
            .await
            .unwrap();

        assert_eq!(ticket.quantity, 60);
        assert_eq!(ticket.price, Money::from_cents(361_800));
        assert_eq!(free_seats(&db, &trip).await, 60);

        let err = db
            .ticket_service()
            .purchase_ticket(&PurchaseRequest::new(query, 61))
            .await
            .unwrap_err();
        assert_eq!(err.code(), Some(BookingError::INSUFFICIENT_SEATS));
        assert_eq!(free_seats(&db, &trip).await, 60);
    }

    #[tokio::test]
    async fn test_departure_seconds_are_ignored() {
        let (db, trip) = setup(5).await;
        let query = TripQuery::new("Burgos", "Madrid", travel_date(), at(8, 30, 42));

        let ticket = db
            .ticket_service()
            .purchase_ticket(&PurchaseRequest::new(query, 1))
            .await
            .unwrap();

        assert_eq!(ticket.trip_id, trip.id);
    }

    #[tokio::test]
    async fn test_invalid_purchase_never_opens_a_transaction() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let provider = CountingProvider {
            inner: db.clone(),
            begins: AtomicUsize::new(0),
        };
        let service = TicketService::new(provider);

        let err = service
            .purchase_ticket(&PurchaseRequest::new(burgos_madrid(), 0))
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            TicketError::Validation(ValidationError::MustBePositive { .. })
        ));

        let blank = TripQuery::new(" ", "Madrid", travel_date(), at(8, 30, 0));
        let err = service
            .purchase_ticket(&PurchaseRequest::new(blank, 1))
            .await
            .unwrap_err();
        assert!(matches!(err, TicketError::Validation(_)));

        assert_eq!(service.provider().begins.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_unavailable_provider_is_a_store_fault() {
        let service = TicketService::new(UnavailableProvider);

        let err = service
            .purchase_ticket(&PurchaseRequest::new(burgos_madrid(), 1))
            .await
            .unwrap_err();

        assert!(matches!(err, TicketError::Store(sqlx::Error::PoolTimedOut)));
        assert_eq!(err.code(), None);
    }

    #[tokio::test]
    async fn test_fault_after_ticket_insert_rolls_back_purchase() {
        let (db, trip) = setup(5).await;
        inject_fault(&db, "UPDATE", "viajes").await;

        let err = purchase(&db, 3).await.unwrap_err();

        // The original SQLite error reaches the caller
        match err {
            TicketError::Store(sqlx::Error::Database(db_err)) => {
                assert!(db_err.message().contains("injected fault"));
            }
            other => panic!("expected a store fault, got {other:?}"),
        }
        assert_eq!(free_seats(&db, &trip).await, 5);
        assert_eq!(db.tickets().count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_fault_on_ticket_insert_rolls_back_purchase() {
        let (db, trip) = setup(5).await;
        inject_fault(&db, "INSERT", "tickets").await;

        let err = purchase(&db, 3).await.unwrap_err();

        assert!(matches!(err, TicketError::Store(_)));
        assert_eq!(free_seats(&db, &trip).await, 5);
        assert_eq!(db.tickets().count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_ticket_ids_are_never_reused() {
        let (db, _) = setup(10).await;

        let first = purchase(&db, 2).await.unwrap();
        cancel(&db, first.id, 2).await.unwrap();
        let second = purchase(&db, 2).await.unwrap();

        assert!(second.id > first.id);
    }

    // -------------------------------------------------------------------------
    // Cancellation
    // -------------------------------------------------------------------------

    #[tokio::test]
    async fn test_full_cancellation_deletes_ticket() {
        let (db, trip) = setup(5).await;
        let ticket = purchase(&db, 3).await.unwrap();
        assert_eq!(free_seats(&db, &trip).await, 2);

        let outcome = cancel(&db, ticket.id, 3).await.unwrap();

        assert_eq!(
            outcome,
            Cancellation::Full {
                ticket_id: ticket.id,
                trip_id: trip.id,
                seats_released: 3,
            }
        );
        assert_eq!(free_seats(&db, &trip).await, 5);
        assert_eq!(db.tickets().get_by_id(ticket.id).await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_partial_cancellation_credits_trip_once() {
        let (db, trip) = setup(5).await;
        let ticket = purchase(&db, 3).await.unwrap();

        let outcome = cancel(&db, ticket.id, 1).await.unwrap();

        assert_eq!(
            outcome,
            Cancellation::Partial {
                ticket_id: ticket.id,
                trip_id: trip.id,
                seats_released: 1,
                remaining: 2,
            }
        );
        assert_eq!(free_seats(&db, &trip).await, 3);

        let shrunk = db.tickets().get_by_id(ticket.id).await.unwrap().unwrap();
        assert_eq!(shrunk.quantity, 2);
        assert_eq!(shrunk.price, Money::from_cents(2500));
        assert_eq!(db.tickets().seats_sold(trip.id).await.unwrap(), 2);
    }

    #[tokio::test]
    async fn test_excess_release_changes_nothing() {
        let (db, trip) = setup(5).await;
        let ticket = purchase(&db, 3).await.unwrap();

        let err = cancel(&db, ticket.id, 5).await.unwrap_err();

        assert_eq!(
            err.as_booking(),
            Some(&BookingError::ExcessRelease {
                ticket_id: ticket.id,
                held: 3,
                requested: 5,
            })
        );
        assert_eq!(free_seats(&db, &trip).await, 2);
        assert_eq!(db.tickets().get_by_id(ticket.id).await.unwrap(), Some(ticket));
    }

    #[tokio::test]
    async fn test_excess_release_of_many_seats() {
        let (db, trip) = setup(5).await;
        let ticket = purchase(&db, 3).await.unwrap();

        for seats in [4, 51, 1_000, i64::MAX] {
            let err = cancel(&db, ticket.id, seats).await.unwrap_err();
            assert_eq!(err.code(), Some(BookingError::EXCESS_RELEASE), "release {seats}");
        }

        assert_eq!(free_seats(&db, &trip).await, 2);
        assert_eq!(db.tickets().get_by_id(ticket.id).await.unwrap(), Some(ticket));
    }

    #[tokio::test]
    async fn test_any_unstored_ticket_id_is_no_such_ticket() {
        let (db, trip) = setup(5).await;
        purchase(&db, 2).await.unwrap();

        for ticket_id in [0, -1, i64::MIN, 999] {
            let err = cancel(&db, ticket_id, 1).await.unwrap_err();
            assert_eq!(
                err.as_booking(),
                Some(&BookingError::NoSuchTicket { ticket_id }),
                "ticket {ticket_id}"
            );
        }

        assert_eq!(free_seats(&db, &trip).await, 3);
    }

    #[tokio::test]
    async fn test_unknown_ticket() {
        let (db, trip) = setup(5).await;

        let err = cancel(&db, 999, 1).await.unwrap_err();

        assert_eq!(err.code(), Some(BookingError::NO_SUCH_TICKET));
        assert_eq!(free_seats(&db, &trip).await, 5);
    }

    #[tokio::test]
    async fn test_cancel_ignores_trip_fields() {
        let (db, trip) = setup(5).await;
        let ticket = purchase(&db, 2).await.unwrap();

        let elsewhere = TripQuery::new("Vigo", "Cádiz", travel_date(), at(23, 59, 0));
        db.ticket_service()
            .cancel_ticket(&CancelRequest::new(ticket.id, 2, elsewhere))
            .await
            .unwrap();

        assert_eq!(free_seats(&db, &trip).await, 5);
    }

    #[tokio::test]
    async fn test_fault_after_seat_credit_rolls_back_full_cancel() {
        let (db, trip) = setup(5).await;
        let ticket = purchase(&db, 3).await.unwrap();
        inject_fault(&db, "DELETE", "tickets").await;

        let err = cancel(&db, ticket.id, 3).await.unwrap_err();

        assert!(matches!(err, TicketError::Store(_)));
        assert_eq!(free_seats(&db, &trip).await, 2);
        assert_eq!(db.tickets().get_by_id(ticket.id).await.unwrap(), Some(ticket));
    }

    #[tokio::test]
    async fn test_fault_after_seat_credit_rolls_back_partial_cancel() {
        let (db, trip) = setup(5).await;
        let ticket = purchase(&db, 3).await.unwrap();
        inject_fault(&db, "UPDATE", "tickets").await;

        let err = cancel(&db, ticket.id, 1).await.unwrap_err();

        assert!(matches!(err, TicketError::Store(_)));
        assert_eq!(free_seats(&db, &trip).await, 2);
        assert_eq!(db.tickets().get_by_id(ticket.id).await.unwrap(), Some(ticket));
    }

    #[tokio::test]
    async fn test_credit_beyond_capacity_is_refused_by_the_store() {
        let (db, trip) = setup(5).await;
        let ticket = purchase(&db, 3).await.unwrap();
        // Someone put the seats back behind the counter's back
        sqlx::query("UPDATE viajes SET nPlazasLibres = nPlazasTotales WHERE idViaje = ?1")
            .bind(trip.id)
            .execute(db.pool())
            .await
            .unwrap();

        let err = cancel(&db, ticket.id, 3).await.unwrap_err();

        assert!(matches!(err, TicketError::Store(_)));
        assert_eq!(free_seats(&db, &trip).await, 50);
        assert!(db.tickets().get_by_id(ticket.id).await.unwrap().is_some());
    }

    // -------------------------------------------------------------------------
    // Seat Conservation
    // -------------------------------------------------------------------------

    #[tokio::test]
    async fn test_purchase_then_full_cancel_restores_seats() {
        let (db, trip) = setup(20).await;

        for seats in [1, 4, 20] {
            let ticket = purchase(&db, seats).await.unwrap();
            assert_eq!(free_seats(&db, &trip).await, 20 - seats);

            cancel(&db, ticket.id, seats).await.unwrap();
            assert_eq!(free_seats(&db, &trip).await, 20);
        }
    }

    #[tokio::test]
    async fn test_piecewise_cancel_restores_seats() {
        let (db, trip) = setup(10).await;
        let ticket = purchase(&db, 4).await.unwrap();

        cancel(&db, ticket.id, 1).await.unwrap();
        cancel(&db, ticket.id, 2).await.unwrap();
        let last = cancel(&db, ticket.id, 1).await.unwrap();

        assert!(last.is_full());
        assert_eq!(free_seats(&db, &trip).await, 10);
        assert_eq!(db.tickets().count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_concurrent_purchases_never_oversell() {
        let dir = tempfile::tempdir().unwrap();
        let db = Database::new(DbConfig::new(dir.path().join("counter.db")).max_connections(4))
            .await
            .unwrap();
        let trip = add_trip(&db, 5).await;

        let mut handles = Vec::new();
        for _ in 0..12 {
            let service = db.ticket_service();
            handles.push(tokio::spawn(async move {
                service
                    .purchase_ticket(&PurchaseRequest::new(burgos_madrid(), 1))
                    .await
            }));
        }

        let mut sold = 0;
        for handle in handles {
            match handle.await.unwrap() {
                Ok(_) => sold += 1,
                // Losers see either the rule or SQLite's writer lock
                Err(TicketError::Booking(BookingError::InsufficientSeats { .. }))
                | Err(TicketError::Store(_)) => {}
                Err(other) => panic!("unexpected error: {other:?}"),
            }
        }

        let free = free_seats(&db, &trip).await;
        assert!(sold >= 1 && sold <= 5);
        assert!(free >= 0);
        assert_eq!(free + db.tickets().seats_sold(trip.id).await.unwrap(), 5);
        assert_eq!(db.tickets().count().await.unwrap(), sold);

        db.close().await;
    }
}
