//! # Trip Repository
//!
//! Database operations for routes (`recorridos`) and trips (`viajes`).
//!
//! ## Two Ways In
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │  TripRepository (holds the pool)        free functions (take executor)  │
//! │  ───────────────────────────────        ──────────────────────────────  │
//! │  get_by_id, find, list_by_date          find_for_query                  │
//! │  insert_route, insert_trip, count       reserve_seats, release_seats    │
//! │         │                                        │                      │
//! │         ▼                                        ▼                      │
//! │  one statement, autocommit              inside TicketService's          │
//! │                                         transaction (&mut *tx)          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Minute-Precision Matching
//! `horaSalida` is stored as `HH:MM:SS`. Lookups compare
//! `strftime('%H:%M', horaSalida)` with the query's `HH:MM`, so a departure
//! typed as 08:30:59 still finds the 08:30 train.

use chrono::{NaiveDate, NaiveTime};
use sqlx::{SqliteExecutor, SqlitePool};
use tracing::debug;

use crate::error::{DbError, DbResult};
use rail_core::{Money, Route, Trip, TripListing, TripQuery};

/// Trip columns aliased to `Trip` field names (`v` = viajes).
const TRIP_COLUMNS: &str = r#"
    v.idViaje        AS id,
    v.idRecorrido    AS route_id,
    v.fecha          AS date,
    v.nPlazasTotales AS total_seats,
    v.nPlazasLibres  AS free_seats,
    v.precio         AS price_per_seat
"#;

// =============================================================================
// Transactional Operations
// =============================================================================

/// Resolves the trip a customer asks for.
///
/// Joins routes and trips on origin, destination, date and departure minute.
/// When several trips match (two routes departing in the same minute), the
/// lowest trip id wins.
pub async fn find_for_query<'e, E>(executor: E, query: &TripQuery) -> Result<Option<Trip>, sqlx::Error>
where
    E: SqliteExecutor<'e>,
{
    let sql = format!(
        r#"
        SELECT {TRIP_COLUMNS}
        FROM viajes v
        INNER JOIN recorridos r ON v.idRecorrido = r.idRecorrido
        WHERE r.estacionOrigen = ?1
          AND r.estacionDestino = ?2
          AND v.fecha = ?3
          AND strftime('%H:%M', r.horaSalida) = ?4
        ORDER BY v.idViaje
        LIMIT 1
        "#
    );

    sqlx::query_as::<_, Trip>(&sql)
        .bind(&query.origin)
        .bind(&query.destination)
        .bind(query.date)
        .bind(query.departure_minute())
        .fetch_optional(executor)
        .await
}

/// Takes `seats` free seats from a trip.
///
/// ## Guarded Decrement
/// ```text
/// UPDATE viajes SET nPlazasLibres = nPlazasLibres - n
/// WHERE idViaje = ? AND nPlazasLibres >= n
///                       ───────────────────
///                       re-checked by the write itself
/// ```
///
/// Returns `false` when the trip no longer has `seats` free seats (or does
/// not exist); nothing is changed in that case.
pub async fn reserve_seats<'e, E>(executor: E, trip_id: i64, seats: i64) -> Result<bool, sqlx::Error>
where
    E: SqliteExecutor<'e>,
{
    debug!(trip_id, seats, "Reserving seats");

    let result = sqlx::query(
        r#"
        UPDATE viajes
        SET nPlazasLibres = nPlazasLibres - ?2
        WHERE idViaje = ?1 AND nPlazasLibres >= ?2
        "#,
    )
    .bind(trip_id)
    .bind(seats)
    .execute(executor)
    .await?;

    Ok(result.rows_affected() == 1)
}

/// Gives `seats` seats back to a trip.
///
/// The schema's CHECK constraint rejects a credit that would push free seats
/// above the trip's capacity.
///
/// Returns the number of trips updated (0 if the trip does not exist).
pub async fn release_seats<'e, E>(executor: E, trip_id: i64, seats: i64) -> Result<u64, sqlx::Error>
where
    E: SqliteExecutor<'e>,
{
    debug!(trip_id, seats, "Releasing seats");

    let result = sqlx::query(
        r#"
        UPDATE viajes
        SET nPlazasLibres = nPlazasLibres + ?2
        WHERE idViaje = ?1
        "#,
    )
    .bind(trip_id)
    .bind(seats)
    .execute(executor)
    .await?;

    Ok(result.rows_affected())
}

// =============================================================================
// Repository
// =============================================================================

/// Repository for route and trip reads, and for loading the timetable.
///
/// ## Usage
/// ```rust,ignore
/// let repo = db.trips();
///
/// let route = repo.insert_route("Burgos", "Madrid", departure, None).await?;
/// let trip = repo.insert_trip(route.id, date, 120, 120, Money::from_cents(2450)).await?;
///
/// let today = repo.list_by_date(date).await?;
/// ```
#[derive(Debug, Clone)]
pub struct TripRepository {
    pool: SqlitePool,
}

impl TripRepository {
    /// Creates a new TripRepository.
    pub fn new(pool: SqlitePool) -> Self {
        TripRepository { pool }
    }

    /// Gets a trip by its ID.
    ///
    /// ## Returns
    /// * `Ok(Some(Trip))` - Trip found
    /// * `Ok(None)` - Trip not found
    pub async fn get_by_id(&self, id: i64) -> DbResult<Option<Trip>> {
        let sql = format!("SELECT {TRIP_COLUMNS} FROM viajes v WHERE v.idViaje = ?1");

        let trip = sqlx::query_as::<_, Trip>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(trip)
    }

    /// Finds a trip the way the counter does (minute-precision departure).
    pub async fn find(&self, query: &TripQuery) -> DbResult<Option<Trip>> {
        Ok(find_for_query(&self.pool, query).await?)
    }

    /// Lists every trip running on `date`, ordered by departure.
    pub async fn list_by_date(&self, date: NaiveDate) -> DbResult<Vec<TripListing>> {
        let sql = format!(
            r#"
            SELECT {TRIP_COLUMNS},
                r.estacionOrigen  AS origin,
                r.estacionDestino AS destination,
                r.horaSalida      AS departure
            FROM viajes v
            INNER JOIN recorridos r ON v.idRecorrido = r.idRecorrido
            WHERE v.fecha = ?1
            ORDER BY r.horaSalida, r.estacionOrigen, r.estacionDestino
            "#
        );

        let trips = sqlx::query_as::<_, TripListing>(&sql)
            .bind(date)
            .fetch_all(&self.pool)
            .await?;

        debug!(%date, count = trips.len(), "Listed trips");
        Ok(trips)
    }

    /// Inserts a route.
    ///
    /// ## Returns
    /// * `Ok(Route)` - Inserted route with its generated id
    /// * `Err(DbError::UniqueViolation)` - Same stations and departure exist
    pub async fn insert_route(
        &self,
        origin: &str,
        destination: &str,
        departure: NaiveTime,
        arrival: Option<NaiveTime>,
    ) -> DbResult<Route> {
        debug!(%origin, %destination, %departure, "Inserting route");

        let route = sqlx::query_as::<_, Route>(
            r#"
            INSERT INTO recorridos (estacionOrigen, estacionDestino, horaSalida, horaLlegada)
            VALUES (?1, ?2, ?3, ?4)
            RETURNING
                idRecorrido     AS id,
                estacionOrigen  AS origin,
                estacionDestino AS destination,
                horaSalida      AS departure,
                horaLlegada     AS arrival
            "#,
        )
        .bind(origin)
        .bind(destination)
        .bind(departure)
        .bind(arrival)
        .fetch_one(&self.pool)
        .await?;

        Ok(route)
    }

    /// Lists all routes, ordered by departure.
    pub async fn list_routes(&self) -> DbResult<Vec<Route>> {
        let routes = sqlx::query_as::<_, Route>(
            r#"
            SELECT
                idRecorrido     AS id,
                estacionOrigen  AS origin,
                estacionDestino AS destination,
                horaSalida      AS departure,
                horaLlegada     AS arrival
            FROM recorridos
            ORDER BY horaSalida, idRecorrido
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(routes)
    }

    /// Inserts a trip of `route_id` on `date`.
    ///
    /// ## Returns
    /// * `Ok(Trip)` - Inserted trip with its generated id
    /// * `Err(DbError::ForeignKeyViolation)` - Route doesn't exist
    /// * `Err(DbError::CheckViolation)` - `free_seats` outside `0..=total_seats`
    pub async fn insert_trip(
        &self,
        route_id: i64,
        date: NaiveDate,
        total_seats: i64,
        free_seats: i64,
        price_per_seat: Money,
    ) -> DbResult<Trip> {
        debug!(route_id, %date, total_seats, free_seats, "Inserting trip");

        let trip = sqlx::query_as::<_, Trip>(
            r#"
            INSERT INTO viajes (idRecorrido, fecha, nPlazasTotales, nPlazasLibres, precio)
            VALUES (?1, ?2, ?3, ?4, ?5)
            RETURNING
                idViaje        AS id,
                idRecorrido    AS route_id,
                fecha          AS date,
                nPlazasTotales AS total_seats,
                nPlazasLibres  AS free_seats,
                precio         AS price_per_seat
            "#,
        )
        .bind(route_id)
        .bind(date)
        .bind(total_seats)
        .bind(free_seats)
        .bind(price_per_seat)
        .fetch_one(&self.pool)
        .await?;

        Ok(trip)
    }

    /// Free seats of a trip.
    ///
    /// ## Returns
    /// * `Err(DbError::NotFound)` - Trip doesn't exist
    pub async fn free_seats(&self, trip_id: i64) -> DbResult<i64> {
        let free: Option<i64> =
            sqlx::query_scalar("SELECT nPlazasLibres FROM viajes WHERE idViaje = ?1")
                .bind(trip_id)
                .fetch_optional(&self.pool)
                .await?;

        free.ok_or_else(|| DbError::not_found("Trip", trip_id.to_string()))
    }

    /// Counts trips (for diagnostics).
    pub async fn count(&self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM viajes")
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
