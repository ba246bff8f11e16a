//! `bookings` CLI — parse room-booking confirmations and keep one tracked event
//! per venue and day in a JSON store.
//!
//! ## Usage
//!
//! ```sh
//! # Show what a confirmation parses to
//! bookings parse -i confirmation.txt
//!
//! # Extend or annotate the matching tracked event (or create one)
//! bookings update < confirmation.txt
//!
//! # Create a tracked event without looking for one to extend
//! bookings schedule -i confirmation.txt
//!
//! # List tracked events in the configured timezone
//! bookings --timezone America/Chicago list
//!
//! # Sort a description ledger and report its first gap
//! bookings ledger -i description.txt
//! ```
//!
//! The store defaults to `tracked-events.json` and the timezone to
//! `America/New_York`; both can come from `--config` (TOML), the
//! `BOOKINGS_STORE` / `BOOKINGS_TIMEZONE` environment variables, or flags.

mod config;
mod store_file;

use std::io::{self, Read};
use std::path::PathBuf;

use anyhow::{Context, Result};
use booking_reconciler::{ledger, merge, Applied};
use chrono_tz::Tz;
use clap::{Parser, Subcommand};
use env_logger::Env;
use log::debug;

use crate::config::Settings;
use crate::store_file::LockedStore;

#[derive(Parser)]
#[command(
    name = "bookings",
    version,
    about = "Reconcile room-booking confirmations into tracked events"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// TOML config file with `timezone` and `store` keys
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// IANA timezone of the venue (e.g. America/New_York)
    #[arg(long, global = true, env = "BOOKINGS_TIMEZONE")]
    timezone: Option<String>,

    /// JSON file holding the tracked events
    #[arg(long, global = true, env = "BOOKINGS_STORE")]
    store: Option<PathBuf>,

    /// Log at debug level (overrides RUST_LOG)
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Parse a confirmation and print the booking as JSON
    Parse {
        /// Input file (reads from stdin if omitted)
        #[arg(short, long)]
        input: Option<String>,
    },
    /// Create a tracked event from a confirmation
    Schedule {
        /// Input file (reads from stdin if omitted)
        #[arg(short, long)]
        input: Option<String>,
    },
    /// Extend, annotate or create the tracked event for a confirmation
    Update {
        /// Input file (reads from stdin if omitted)
        #[arg(short, long)]
        input: Option<String>,
    },
    /// List tracked events
    List,
    /// Sort a description ledger and report gaps
    Ledger {
        /// Input file (reads from stdin if omitted)
        #[arg(short, long)]
        input: Option<String>,
    },
}

fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    let default_filter = if cli.verbose { "debug" } else { "warn" };
    let mut logger = env_logger::Builder::from_env(Env::default().default_filter_or(default_filter));
    if cli.verbose {
        logger.filter_level(log::LevelFilter::Debug);
    }
    logger.init();

    let settings = Settings::resolve(
        cli.config.as_deref(),
        cli.timezone.as_deref(),
        cli.store.as_deref(),
    )?;
    debug!("timezone {}, store {}", settings.timezone, settings.store.display());

    match cli.command {
        Commands::Parse { input } => {
            let text = read_input(input.as_deref())?;
            let booking = booking_reconciler::parse(&text, settings.timezone)
                .context("Failed to parse booking confirmation")?;
            println!("{}", serde_json::to_string_pretty(&booking)?);
        }
        Commands::Schedule { input } => {
            let text = read_input(input.as_deref())?;
            let booking = booking_reconciler::parse(&text, settings.timezone)
                .context("Failed to parse booking confirmation")?;
            let locked = LockedStore::acquire(&settings.store)?;
            let mut store = locked.load()?;
            let event = booking_reconciler::schedule_booking(&mut store, &booking)?;
            locked.save(&store)?;
            println!("Scheduled event: {} ({})", event.name, event.id);
            print!("{}", event.summary(settings.timezone));
        }
        Commands::Update { input } => {
            let text = read_input(input.as_deref())?;
            let booking = booking_reconciler::parse(&text, settings.timezone)
                .context("Failed to parse booking confirmation")?;
            // Held until the new state is saved, so concurrent updates serialise.
            let locked = LockedStore::acquire(&settings.store)?;
            let mut store = locked.load()?;
            let applied = booking_reconciler::apply_booking(&mut store, &booking, settings.timezone)?;
            locked.save(&store)?;
            print!("{}", describe(&applied, settings.timezone));
        }
        Commands::List => {
            let store = store_file::load(&settings.store)?;
            if store.events().is_empty() {
                println!("There are no tracked events.");
            }
            for event in store.events() {
                println!("{}", event.summary(settings.timezone));
            }
        }
        Commands::Ledger { input } => {
            let text = read_input(input.as_deref())?;
            let entries = ledger::sort_by_start(ledger::parse_entries(&text));
            if entries.is_empty() {
                anyhow::bail!("No time-slot entries found in the description");
            }
            println!("{}", ledger::serialize(&entries));
            println!();
            match merge::find_gap(&entries) {
                Some(gap) => println!("First gap: {}", gap),
                None => println!("No gaps"),
            }
            if let Some(interval) = merge::largest_continuous_interval(&entries) {
                println!("Largest continuous interval: {}", interval);
            }
        }
    }

    Ok(())
}

/// Human-readable report of what `update` did.
fn describe(applied: &Applied, tz: Tz) -> String {
    const CLOCK: &str = "%I:%M %p";
    match applied {
        Applied::Created(event) => format!(
            "No tracked event to extend; created {} ({})\n{}",
            event.name,
            event.id,
            event.summary(tz)
        ),
        Applied::Extended(event) => format!(
            "Tracked event updated: {} ({})\nUpdated time: {} - {}\n{}\n",
            event.name,
            event.id,
            event.start.with_timezone(&tz).format(CLOCK),
            event.end.with_timezone(&tz).format(CLOCK),
            event.description
        ),
        Applied::DescriptionUpdated { event, gap } => {
            let mut report = format!(
                "Tracked event description updated: {} ({})\n{}\n",
                event.name, event.id, event.description
            );
            if let Some(gap) = gap {
                report.push_str(&format!(
                    "Event time unchanged due to a gap: {}\n",
                    gap
                ));
            }
            report
        }
        Applied::Unchanged(event) => format!(
            "Tracked event already up to date: {} ({})\n",
            event.name, event.id
        ),
    }
}

fn read_input(path: Option<&str>) -> Result<String> {
    match path {
        Some(path) => {
            std::fs::read_to_string(path).with_context(|| format!("Failed to read file: {}", path))
        }
        None => {
            let mut buf = String::new();
            io::stdin()
                .read_to_string(&mut buf)
                .context("Failed to read from stdin")?;
            Ok(buf)
        }
    }
}
