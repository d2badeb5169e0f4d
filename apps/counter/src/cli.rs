//! Command line definition.

use std::path::PathBuf;

use chrono::{NaiveDate, NaiveTime};
use clap::{Args, Parser, Subcommand};

use rail_core::TripQuery;

/// Rail ticket counter.
#[derive(Debug, Parser)]
#[command(name = "counter", version, about)]
pub struct Cli {
    /// SQLite database file (overrides RAIL_DB_PATH)
    #[arg(long, global = true)]
    pub db: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// List the trips running on a date
    Trips {
        /// Travel date (YYYY-MM-DD)
        #[arg(long)]
        date: NaiveDate,
    },

    /// Sell seats on a trip
    Purchase {
        #[command(flatten)]
        trip: TripArgs,

        /// Number of seats
        #[arg(long)]
        seats: i64,
    },

    /// Release seats of a ticket
    Cancel {
        /// Ticket number
        #[arg(long)]
        ticket: i64,

        /// Number of seats to release
        #[arg(long)]
        seats: i64,

        #[command(flatten)]
        trip: TripArgs,
    },

    /// List the tickets sold for a trip
    Tickets {
        /// Trip id, as shown by `trips`
        #[arg(long)]
        trip: i64,
    },
}

/// How a customer names a trip.
#[derive(Debug, Clone, Args)]
pub struct TripArgs {
    /// Origin station
    #[arg(long = "from")]
    pub origin: String,

    /// Destination station
    #[arg(long = "to")]
    pub destination: String,

    /// Travel date (YYYY-MM-DD)
    #[arg(long)]
    pub date: NaiveDate,

    /// Departure time (HH:MM or HH:MM:SS)
    #[arg(long, value_parser = parse_departure)]
    pub departure: NaiveTime,
}

impl TripArgs {
    pub fn query(&self) -> TripQuery {
        TripQuery::new(&self.origin, &self.destination, self.date, self.departure)
    }
}

fn parse_departure(value: &str) -> Result<NaiveTime, String> {
    NaiveTime::parse_from_str(value, "%H:%M:%S")
        .or_else(|_| NaiveTime::parse_from_str(value, "%H:%M"))
        .map_err(|_| format!("'{value}' is not a time (expected HH:MM)"))
}
