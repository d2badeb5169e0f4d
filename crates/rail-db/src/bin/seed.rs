//! # Seed Data Generator
//!
//! Populates the database with routes and trips for development.
//!
//! ## Usage
//! ```bash
//! # Trips for the next 7 days (default)
//! cargo run -p rail-db --bin seed
//!
//! # More days
//! cargo run -p rail-db --bin seed -- --days 30
//!
//! # Specify database path
//! cargo run -p rail-db --bin seed -- --db ./data/counter.db
//! ```
//!
//! ## Generated Data
//! - One route per (origin, destination, departure) in `ROUTES`
//! - One trip per route per day, starting today
//! - Seats and fares vary by route so listings are easy to tell apart

use std::env;

use chrono::{Duration, NaiveDate, NaiveTime, Utc};
use rail_core::Money;
use rail_db::{Database, DbConfig};

/// (origin, destination, departure, arrival, fare in cents)
const ROUTES: &[(&str, &str, (u32, u32), (u32, u32), i64)] = &[
    ("Burgos", "Madrid", (8, 30), (10, 45), 1250),
    ("Burgos", "Madrid", (17, 15), (19, 30), 1250),
    ("Madrid", "Burgos", (7, 0), (9, 15), 1250),
    ("Madrid", "Burgos", (19, 45), (22, 0), 1100),
    ("Madrid", "Valladolid", (9, 10), (10, 15), 2190),
    ("Valladolid", "León", (11, 0), (12, 20), 1630),
    ("León", "Oviedo", (13, 5), (15, 10), 1480),
    ("Madrid", "Sevilla", (6, 35), (9, 10), 6030),
    ("Sevilla", "Cádiz", (10, 20), (12, 0), 1385),
    ("Madrid", "Barcelona", (7, 30), (10, 0), 7290),
    ("Barcelona", "Zaragoza", (15, 25), (17, 0), 3340),
    ("Zaragoza", "Madrid", (18, 40), (20, 5), 3620),
];

/// Seat capacities cycled over routes.
const CAPACITIES: &[i64] = &[50, 80, 120, 200];

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Parse command line arguments
    let args: Vec<String> = env::args().collect();

    let mut days: i64 = 7;
    let mut db_path = String::from("./rail_dev.db");

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--days" | "-n" => {
                let Some(value) = args.get(i + 1) else {
                    return Err("--days needs a value".into());
                };
                days = parse_days(value)?;
                i += 1;
            }
            "--db" | "-d" => {
                if i + 1 < args.len() {
                    db_path = args[i + 1].clone();
                    i += 1;
                }
            }
            "--help" | "-h" => {
                println!("Rail Counter Seed Data Generator");
                println!();
                println!("Usage: seed [OPTIONS]");
                println!();
                println!("Options:");
                println!("  -n, --days <N>     Days of trips to generate from today (default: 7)");
                println!("  -d, --db <PATH>    Database file path (default: ./rail_dev.db)");
                println!("  -h, --help         Show this help message");
                return Ok(());
            }
            _ => {}
        }
        i += 1;
    }

    println!("🌱 Rail Counter Seed Data Generator");
    println!("==================================");
    println!("Database: {}", db_path);
    println!("Days:     {}", days);
    println!();

    let db = Database::new(DbConfig::new(&db_path)).await?;

    println!("✓ Connected to database");
    println!("✓ Migrations applied");

    let existing = db.trips().count().await?;
    if existing > 0 {
        println!("⚠ Database already has {} trips", existing);
        println!("  Skipping seed to avoid duplicates.");
        println!("  Delete the database file to regenerate.");
        return Ok(());
    }

    println!();
    println!("Generating routes...");

    let mut routes = Vec::with_capacity(ROUTES.len());
    for (origin, destination, departure, arrival, fare) in ROUTES {
        let (Some(departure), Some(arrival)) = (
            NaiveTime::from_hms_opt(departure.0, departure.1, 0),
            NaiveTime::from_hms_opt(arrival.0, arrival.1, 0),
        ) else {
            eprintln!("Skipping {} → {}: bad time", origin, destination);
            continue;
        };

        match db
            .trips()
            .insert_route(origin, destination, departure, Some(arrival))
            .await
        {
            Ok(route) => routes.push((route, Money::from_cents(*fare))),
            Err(e) => eprintln!("Failed to insert {} → {}: {}", origin, destination, e),
        }
    }

    println!("  {} routes", routes.len());
    println!();
    println!("Generating trips...");

    let today = Utc::now().date_naive();
    let start = std::time::Instant::now();
    let mut generated = 0;

    for date in trip_dates(today, days)? {
        for (idx, (route, fare)) in routes.iter().enumerate() {
            let total = CAPACITIES[idx % CAPACITIES.len()];

            if let Err(e) = db
                .trips()
                .insert_trip(route.id, date, total, total, *fare)
                .await
            {
                eprintln!("Failed to insert trip {} on {}: {}", route.id, date, e);
                continue;
            }

            generated += 1;
        }
    }

    println!();
    println!("✓ Generated {} trips in {:?}", generated, start.elapsed());

    let listed = db.trips().list_by_date(today).await?;
    println!("  Trips today: {}", listed.len());

    println!();
    println!("✓ Seed complete!");

    Ok(())
}

fn parse_days(value: &str) -> Result<i64, String> {
    match value.parse::<i64>() {
        Ok(days) if days >= 0 => Ok(days),
        _ => Err(format!("--days expects a non-negative number, got '{value}'")),
    }
}

/// The `days` consecutive dates starting at `today`.
fn trip_dates(today: NaiveDate, days: i64) -> Result<Vec<NaiveDate>, String> {
    if days <= 0 {
        return Ok(Vec::new());
    }

    let last = Duration::try_days(days - 1)
        .and_then(|span| today.checked_add_signed(span))
        .ok_or_else(|| format!("{days} days from {today} run past the last date"))?;

    Ok(today.iter_days().take_while(|date| *date <= last).collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_days() {
        assert_eq!(parse_days("30"), Ok(30));
        assert_eq!(parse_days("0"), Ok(0));
        assert!(parse_days("abc").is_err());
        assert!(parse_days("-2").is_err());
        assert!(parse_days("").is_err());
    }

    #[test]
    fn test_trip_dates() {
        let today = NaiveDate::from_ymd_opt(2026, 12, 30).unwrap();

        let dates = trip_dates(today, 3).unwrap();
        assert_eq!(
            dates,
            vec![
                today,
                NaiveDate::from_ymd_opt(2026, 12, 31).unwrap(),
                NaiveDate::from_ymd_opt(2027, 1, 1).unwrap(),
            ]
        );
        assert!(trip_dates(today, 0).unwrap().is_empty());
    }

    #[test]
    fn test_trip_dates_past_the_calendar() {
        assert!(trip_dates(NaiveDate::MAX, 2).is_err());
        assert!(trip_dates(NaiveDate::from_ymd_opt(2026, 1, 1).unwrap(), i64::MAX).is_err());
    }
}
