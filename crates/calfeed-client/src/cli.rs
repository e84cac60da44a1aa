//! Command-line interface definition.

use std::path::PathBuf;

use chrono::NaiveDate;
use clap::{Parser, Subcommand};

/// calfeed - iCalendar feeds in your terminal
#[derive(Debug, Parser)]
#[command(name = "calfeed")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Path to configuration file
    #[arg(long, short, env = "CALFEED_CONFIG", global = true)]
    pub config: Option<PathBuf>,

    /// Enable debug output
    #[arg(long, short = 'v', global = true)]
    pub debug: bool,

    #[command(subcommand)]
    pub command: Command,
}

/// Available commands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// List events from one or all visible calendars
    Events(EventsArgs),

    /// List configured calendars
    Calendars {
        /// Output in JSON format
        #[arg(long)]
        json: bool,
    },

    /// Fetch every visible calendar and show cache statistics
    Stats {
        /// Output in JSON format
        #[arg(long)]
        json: bool,
    },

    /// Configuration commands
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

/// Arguments of the `events` command.
#[derive(Debug, Clone, Default, clap::Args)]
pub struct EventsArgs {
    /// Only this calendar
    #[arg(long)]
    pub calendar: Option<String>,

    /// First day to show (YYYY-MM-DD, UTC); today when only --to is given
    #[arg(long)]
    pub from: Option<NaiveDate>,

    /// Last day to show, inclusive (YYYY-MM-DD, UTC); defaults to --from
    #[arg(long)]
    pub to: Option<NaiveDate>,

    /// Recurrence expansion window in months either side of today
    #[arg(long)]
    pub window_months: Option<u32>,

    /// Bypass the cache
    #[arg(long)]
    pub refresh: bool,

    /// Output in JSON format
    #[arg(long)]
    pub json: bool,
}

/// Configuration actions.
#[derive(Debug, Subcommand)]
pub enum ConfigAction {
    /// Dump current configuration
    Dump,

    /// Validate configuration
    Validate,

    /// Show configuration file path
    Path,
}
