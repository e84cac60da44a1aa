//! calfeed command-line interface.
//!
//! Reads calendar subscriptions from `config.toml`, fetches their feeds and
//! prints the expanded events.

pub mod cli;
pub mod commands;
pub mod config;
pub mod error;
pub mod output;

pub use cli::Cli;
pub use config::AppConfig;
pub use error::{ClientError, ClientResult};
