//! `slots` CLI — query appointment availability from the command line.
//!
//! ## Usage
//!
//! ```sh
//! # Start times for a 30-minute service on a Monday with two bookings
//! slots available --date 2025-10-27 --duration 30 --booking 10:00/60 --booking 14:30/30
//!
//! # Same, as the JSON availability response
//! slots available --date 2025-10-27 --duration 30 --json
//!
//! # Check whether a specific start time can still be booked
//! slots check --date 2025-10-27 --time 11:30 --duration 30 --booking 11:00/30
//!
//! # Is the shop open at a given instant?
//! slots open --at 2025-10-27T12:30
//!
//! # Show the effective business hours
//! slots --config hours.toml hours
//! ```

mod config;

use std::path::PathBuf;

use anyhow::{Context, Result};
use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use clap::{Parser, Subcommand};
use slot_engine::schedule::WEEK;
use slot_engine::timefmt::{parse_date, parse_time};
use slot_engine::{
    available_slots, is_slot_available, is_within_business_hours, AvailabilityResponse,
    BookedInterval, SlotError, SlotRequest, WeeklySchedule,
};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "slots",
    version,
    about = "Appointment slot availability calculator"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Business-hours config file (TOML)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// List start times at which a service fits on a date
    Available {
        /// Target date (YYYY-MM-DD)
        #[arg(long)]
        date: String,
        /// Service duration in minutes
        #[arg(long)]
        duration: u32,
        /// Existing booking on the same date as HH:MM/MINUTES (repeatable)
        #[arg(long = "booking", value_parser = parse_booking)]
        bookings: Vec<(NaiveTime, u32)>,
        /// Print the JSON availability response instead of one time per line
        #[arg(long)]
        json: bool,
    },
    /// Check whether a start time is still available
    Check {
        /// Target date (YYYY-MM-DD)
        #[arg(long)]
        date: String,
        /// Requested start time (HH:MM)
        #[arg(long)]
        time: String,
        /// Service duration in minutes
        #[arg(long)]
        duration: u32,
        /// Existing booking on the same date as HH:MM/MINUTES (repeatable)
        #[arg(long = "booking", value_parser = parse_booking)]
        bookings: Vec<(NaiveTime, u32)>,
    },
    /// Report whether an instant falls within business hours
    Open {
        /// Instant to test (YYYY-MM-DDTHH:MM)
        #[arg(long)]
        at: String,
    },
    /// Show the effective weekly business hours
    Hours {
        /// Print the schedule as JSON
        #[arg(long)]
        json: bool,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::from_default_env()
    };
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();

    let schedule = config::load_schedule(cli.config.as_deref())?;

    match cli.command {
        Commands::Available {
            date,
            duration,
            bookings,
            json,
        } => {
            let request = build_request(&date, duration, &bookings)?;
            let slots = available_slots(&schedule, &request);

            if json {
                let response = AvailabilityResponse {
                    available_slots: slots.iter().map(ToString::to_string).collect(),
                };
                println!("{}", serde_json::to_string(&response)?);
            } else {
                for slot in &slots {
                    println!("{}", slot);
                }
            }
        }
        Commands::Check {
            date,
            time,
            duration,
            bookings,
        } => {
            let request = build_request(&date, duration, &bookings)?;
            let time = parse_time(&time)?;

            if !is_slot_available(&schedule, &request, time) {
                return Err(SlotError::SlotUnavailable {
                    date: request.date(),
                    time,
                }
                .into());
            }
            println!("available");
        }
        Commands::Open { at } => {
            let at = NaiveDateTime::parse_from_str(&at, "%Y-%m-%dT%H:%M")
                .with_context(|| format!("Invalid instant '{}': expected YYYY-MM-DDTHH:MM", at))?;
            let state = if is_within_business_hours(&schedule, at) {
                "open"
            } else {
                "closed"
            };
            println!("{}", state);
        }
        Commands::Hours { json } => {
            if json {
                println!("{}", serde_json::to_string_pretty(&schedule)?);
            } else {
                print!("{}", render_hours(&schedule));
            }
        }
    }

    Ok(())
}

/// Parse a `HH:MM/MINUTES` booking argument.
fn parse_booking(raw: &str) -> Result<(NaiveTime, u32)> {
    let (time, minutes) = raw
        .split_once('/')
        .with_context(|| format!("Invalid booking '{}': expected HH:MM/MINUTES", raw))?;
    let time = parse_time(time)?;
    let minutes = minutes
        .trim()
        .parse()
        .with_context(|| format!("Invalid booking duration '{}'", minutes))?;
    Ok((time, minutes))
}

fn build_request(date: &str, duration: u32, bookings: &[(NaiveTime, u32)]) -> Result<SlotRequest> {
    let date: NaiveDate = parse_date(date)?;
    let existing = bookings
        .iter()
        .map(|&(time, minutes)| BookedInterval::new(date.and_time(time), minutes))
        .collect::<slot_engine::Result<Vec<_>>>()?;
    Ok(SlotRequest::new(date, duration, existing)?)
}

/// One line per weekday, e.g. `Mon  08:00-12:00, 13:00-19:00 (break 12:00-13:00)`.
fn render_hours(schedule: &WeeklySchedule) -> String {
    let mut out = format!(
        "Slot granularity: {} minutes\n",
        schedule.slot_granularity_minutes
    );
    for weekday in WEEK {
        let day = schedule.day(weekday);
        let hours = if day.is_closed() {
            "closed".to_string()
        } else {
            day.open
                .iter()
                .map(ToString::to_string)
                .collect::<Vec<_>>()
                .join(", ")
        };
        out.push_str(&format!("{}  {}", weekday, hours));
        if let Some(b) = &day.break_interval {
            out.push_str(&format!(" (break {})", b));
        }
        out.push('\n');
    }
    out
}
