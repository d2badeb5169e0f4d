//! # Counter Commands
//!
//! One function per subcommand. Each returns the JSON the clerk sees.
//!
//! ## Command Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Command Dispatch                                 │
//! │                                                                         │
//! │  trips    ──► TripRepository::list_by_date    ──► [TripListing]        │
//! │  purchase ──► TicketService::purchase_ticket  ──► Ticket               │
//! │  cancel   ──► TicketService::cancel_ticket    ──► Cancellation         │
//! │  tickets  ──► TicketRepository::list_for_trip ──► [Ticket]             │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::NaiveDate;
use serde_json::Value;
use tracing::{debug, info};

use crate::cli::Command;
use crate::error::{CounterError, ErrorKind};
use rail_core::{CancelRequest, PurchaseRequest};
use rail_db::Database;

/// Runs one command against the database.
pub async fn run(db: &Database, command: &Command) -> Result<Value, CounterError> {
    match command {
        Command::Trips { date } => list_trips(db, *date).await,
        Command::Purchase { trip, seats } => {
            purchase(db, &PurchaseRequest::new(trip.query(), *seats)).await
        }
        Command::Cancel {
            ticket,
            seats,
            trip,
        } => cancel(db, &CancelRequest::new(*ticket, *seats, trip.query())).await,
        Command::Tickets { trip } => list_tickets(db, *trip).await,
    }
}

/// Lists the trips on `date`.
pub async fn list_trips(db: &Database, date: NaiveDate) -> Result<Value, CounterError> {
    let trips = db.trips().list_by_date(date).await?;
    debug!(%date, count = trips.len(), "Trips listed");
    to_json(&trips)
}

/// Sells a ticket.
pub async fn purchase(db: &Database, request: &PurchaseRequest) -> Result<Value, CounterError> {
    let ticket = db.ticket_service().purchase_ticket(request).await?;
    info!(ticket_id = ticket.id, "Sold");
    to_json(&ticket)
}

/// Cancels seats of a ticket.
pub async fn cancel(db: &Database, request: &CancelRequest) -> Result<Value, CounterError> {
    let outcome = db.ticket_service().cancel_ticket(request).await?;
    info!(ticket_id = outcome.ticket_id(), "Cancelled");
    to_json(&outcome)
}

/// Lists the tickets of a trip, failing if the trip doesn't exist.
pub async fn list_tickets(db: &Database, trip_id: i64) -> Result<Value, CounterError> {
    if db.trips().get_by_id(trip_id).await?.is_none() {
        return Err(CounterError::new(
            ErrorKind::NotFound,
            format!("Trip not found: {trip_id}"),
        ));
    }

    let tickets = db.tickets().list_for_trip(trip_id).await?;
    to_json(&tickets)
}

fn to_json<T: serde::Serialize>(value: &T) -> Result<Value, CounterError> {
    serde_json::to_value(value)
        .map_err(|e| CounterError::new(ErrorKind::DatabaseError, e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveTime;
    use rail_core::{Money, TripQuery};
    use rail_db::DbConfig;

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 4, 20).unwrap()
    }

    fn query() -> TripQuery {
        TripQuery::new(
            "Burgos",
            "Madrid",
            date(),
            NaiveTime::from_hms_opt(8, 30, 0).unwrap(),
        )
    }

    async fn setup() -> (Database, i64) {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let route = db
            .trips()
            .insert_route(
                "Burgos",
                "Madrid",
                NaiveTime::from_hms_opt(8, 30, 0).unwrap(),
                None,
            )
            .await
            .unwrap();
        let trip = db
            .trips()
            .insert_trip(route.id, date(), 50, 5, Money::from_cents(1250))
            .await
            .unwrap();
        (db, trip.id)
    }

    #[tokio::test]
    async fn test_sell_list_and_cancel() {
        let (db, trip_id) = setup().await;

        let listed = list_trips(&db, date()).await.unwrap();
        assert_eq!(listed[0]["origin"], "Burgos");
        assert_eq!(listed[0]["free_seats"], 5);

        let ticket = purchase(&db, &PurchaseRequest::new(query(), 2)).await.unwrap();
        assert_eq!(ticket["quantity"], 2);
        assert_eq!(ticket["price"], 2500);

        let ticket_id = ticket["id"].as_i64().unwrap();
        let tickets = list_tickets(&db, trip_id).await.unwrap();
        assert_eq!(tickets.as_array().unwrap().len(), 1);

        let outcome = cancel(&db, &CancelRequest::new(ticket_id, 1, query()))
            .await
            .unwrap();
        assert_eq!(outcome["kind"], "partial");
        assert_eq!(outcome["remaining"], 1);
    }

    #[tokio::test]
    async fn test_domain_failure_carries_code() {
        let (db, _) = setup().await;

        let err = purchase(&db, &PurchaseRequest::new(query(), 6))
            .await
            .unwrap_err();

        assert_eq!(err.kind, ErrorKind::InsufficientSeats);
        assert_eq!(err.code, Some(1));
    }

    #[tokio::test]
    async fn test_tickets_of_unknown_trip() {
        let (db, _) = setup().await;

        let err = list_tickets(&db, 999).await.unwrap_err();

        assert_eq!(err.kind, ErrorKind::NotFound);
        assert_eq!(err.code, None);
        assert_eq!(err.exit_code(), 66);
        assert_eq!(err.message, "Trip not found: 999");
    }
}
