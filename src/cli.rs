use clap::{Parser, Subcommand};

use nexfloor::models::notification::Severity;
use nexfloor::models::obra::SortBy;

/// Nexfloor — smart-block floor integrity monitoring
#[derive(Parser)]
#[command(name = "nexfloor", version, about)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Connect to the simulated feed and report incoming notifications
    Watch {
        /// Stop after this many seconds (runs until Ctrl-C otherwise)
        #[arg(short, long)]
        duration: Option<u64>,
        /// Override the tick interval in seconds
        #[arg(long)]
        tick: Option<u64>,
        /// Override the per-tick emit probability
        #[arg(long)]
        probability: Option<f64>,
    },

    /// List notifications from the notification center
    Notifications {
        /// Only unread notifications
        #[arg(long)]
        unread: bool,
        /// Only notifications for this obra id
        #[arg(long)]
        obra: Option<String>,
        #[arg(long)]
        json: bool,
    },

    /// List monitored obras with their integrity band
    Obras {
        /// Lowest integrity to include
        #[arg(long, default_value_t = 0, value_parser = clap::value_parser!(u8).range(0..=100))]
        min: u8,
        /// Highest integrity to include
        #[arg(long, default_value_t = 100, value_parser = clap::value_parser!(u8).range(0..=100))]
        max: u8,
        /// Only obras in this city (repeatable)
        #[arg(long)]
        city: Vec<String>,
        /// name, integrity-desc, integrity-asc, location or recent
        #[arg(long, default_value = "recent")]
        sort: SortBy,
        /// Also print fleet statistics
        #[arg(long)]
        stats: bool,
        #[arg(long)]
        json: bool,
    },

    /// Show the event log (maintenance, alerts, inspections, repairs)
    Events {
        /// Only events for this obra id
        #[arg(long)]
        obra: Option<String>,
        #[arg(long)]
        json: bool,
    },

    /// Render the smart-block grid of an obra
    Blocks {
        #[arg(long)]
        obra: String,
        #[arg(long)]
        json: bool,
    },

    /// Show the last 30 days of integrity for an obra
    History {
        #[arg(long)]
        obra: String,
        #[arg(long)]
        json: bool,
    },

    /// Deliver a manual notification through the bus
    Emit {
        #[arg(long)]
        obra: String,
        #[arg(long, default_value = "info")]
        severity: Severity,
        #[arg(long)]
        message: String,
    },
}
