//! CLI argument definitions using clap
//!
//! This module contains all the clap structs and enums for parsing CLI arguments.
//! The actual command implementations are in the `commands` module.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

/// Renew - Know what renews and when
#[derive(Parser)]
#[command(name = "renew")]
#[command(about = "Subscription renewal calendar and spend tracker", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Subscription store (.json or .toml), overrides the configured file
    #[arg(long, global = true)]
    pub file: Option<PathBuf>,

    /// Config file (defaults to ~/.local/share/renew/config/renew.toml)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Print JSON instead of tables
    #[arg(long, global = true)]
    pub json: bool,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// List subscriptions
    List {
        /// Sort: name-asc, name-desc, price-asc, price-desc, nextbill-asc, nextbill-desc
        #[arg(short, long)]
        sort: Option<String>,

        /// Status filter: all, active, cancelled
        #[arg(long, default_value = "all")]
        status: String,

        /// Only these categories (repeatable)
        #[arg(short, long)]
        category: Vec<String>,

        /// Only these cadences: weekly, monthly, quarterly, yearly, custom (repeatable)
        #[arg(long)]
        cycle: Vec<String>,

        /// Case-insensitive name search
        #[arg(short, long)]
        query: Option<String>,
    },

    /// Add a subscription
    Add {
        /// Display name
        #[arg(short, long)]
        name: String,

        /// Price per billing period
        #[arg(short, long)]
        price: f64,

        /// Cadence: weekly, monthly, quarterly, yearly, custom
        #[arg(long, default_value = "monthly")]
        cycle: String,

        /// Custom cadence length, e.g. 3 for every 3 weeks
        #[arg(long)]
        every: Option<u32>,

        /// Custom cadence unit: day, week, month, year
        #[arg(long)]
        unit: Option<String>,

        /// First or next billing date (YYYY-MM-DD)
        #[arg(short, long)]
        anchor: Option<String>,

        /// Category label
        #[arg(short, long, default_value = "")]
        category: String,

        /// Manage or cancel URL
        #[arg(long)]
        link: Option<String>,
    },

    /// Change fields of a subscription, keeping its ID
    Edit {
        /// Subscription ID or name
        id_or_name: String,

        #[command(flatten)]
        changes: EditArgs,
    },

    /// Remove a subscription
    Remove {
        /// Subscription ID or name
        id_or_name: String,
    },

    /// Pause a subscription (excluded from calendars and totals)
    Pause {
        /// Subscription ID or name
        id_or_name: String,
    },

    /// Resume a paused subscription
    Resume {
        /// Subscription ID or name
        id_or_name: String,
    },

    /// Show a month's billing dates, upcoming first
    Month {
        /// Year (defaults to the current year)
        #[arg(short, long)]
        year: Option<i32>,

        /// Month number 1-12 (defaults to the current month)
        #[arg(short, long)]
        month: Option<u32>,

        /// Reference date separating past from upcoming (YYYY-MM-DD)
        #[arg(long)]
        today: Option<String>,

        /// Monthly total: average or occurrences
        #[arg(long)]
        mode: Option<String>,
    },

    /// Show monthly and yearly spend for the current month
    Summary {
        /// Monthly total: average or occurrences
        #[arg(long)]
        mode: Option<String>,
    },

    /// Show spend by category
    Categories,

    /// Show charges due soon
    Upcoming {
        /// Window length in days (defaults to config)
        #[arg(short, long)]
        days: Option<u32>,

        /// First day of the window (YYYY-MM-DD, defaults to today)
        #[arg(long)]
        from: Option<String>,
    },

    /// Start the web server
    Serve {
        /// Host to bind to (defaults to config)
        #[arg(long)]
        host: Option<String>,

        /// Port to listen on (defaults to config)
        #[arg(short, long)]
        port: Option<u16>,
    },
}

/// Fields `edit` can change; omitted flags keep their stored value
#[derive(Args, Debug, Default)]
pub struct EditArgs {
    /// New display name
    #[arg(short, long)]
    pub name: Option<String>,

    /// New price per billing period
    #[arg(short, long)]
    pub price: Option<f64>,

    /// New cadence: weekly, monthly, quarterly, yearly, custom
    #[arg(long)]
    pub cycle: Option<String>,

    /// Custom cadence length (with --cycle custom)
    #[arg(long)]
    pub every: Option<u32>,

    /// Custom cadence unit: day, week, month, year (with --cycle custom)
    #[arg(long)]
    pub unit: Option<String>,

    /// New anchor billing date (YYYY-MM-DD)
    #[arg(short, long)]
    pub anchor: Option<String>,

    /// New category label
    #[arg(short, long)]
    pub category: Option<String>,

    /// New manage or cancel URL (empty to clear)
    #[arg(long)]
    pub link: Option<String>,
}
