//! The `calendars` command.

use crate::config::AppConfig;
use crate::error::ClientResult;
use crate::output::format_calendars;

/// Prints the configured calendars.
pub fn run(config: &AppConfig, json: bool) -> ClientResult<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(&config.calendars)?);
    } else {
        print!("{}", format_calendars(&config.calendars));
    }
    Ok(())
}
