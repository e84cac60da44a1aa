//! calfeed CLI entry point.

use std::process::ExitCode;

use clap::Parser;

use calfeed_client::cli::{Cli, Command, ConfigAction};
use calfeed_client::commands;
use calfeed_client::config::AppConfig;
use calfeed_client::error::ClientResult;
use calfeed_core::{TracingConfig, init_tracing};

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    if let Err(e) = init_tracing(TracingConfig::for_cli(cli.debug)) {
        eprintln!("warning: {}", e);
    }

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {}", e);
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> ClientResult<()> {
    let (config, path) = match cli.config {
        Some(path) => (AppConfig::load_from(&path)?, path),
        None => (AppConfig::load()?, AppConfig::default_path()),
    };

    match cli.command {
        Command::Events(args) => commands::events::run(&config, &args).await,
        Command::Calendars { json } => commands::calendars::run(&config, json),
        Command::Stats { json } => commands::stats::run(&config, json).await,
        Command::Config { action } => match action {
            ConfigAction::Dump => commands::config::dump(&config, &path),
            ConfigAction::Validate => commands::config::validate(&config),
            ConfigAction::Path => commands::config::path(&path),
        },
    }
}
