//! CLI command implementations

pub mod create;
pub mod execute;
pub mod list;
pub mod logs;
pub mod start;

use std::path::PathBuf;

use anyhow::{Context, Result};
use migrago_core::{LogEvent, LoggingService, MigragoContext};

/// Env var pointing at the state directory (settings and logs)
const HOME_ENV: &str = "MIGRAGO_HOME";

/// Get the logging service for CLI operations
///
/// Returns None if logging fails to initialize (shouldn't block operations)
pub fn get_logger() -> Option<LoggingService> {
    let state_dir = get_state_dir().ok()?;
    LoggingService::new(&state_dir, env!("CARGO_PKG_VERSION")).ok()
}

/// Log an event, ignoring any errors (logging should never break the app)
pub fn log_event(logger: &Option<LoggingService>, event: LogEvent) {
    if let Some(l) = logger {
        let _ = l.log(event);
    }
}

/// Get the state directory from environment or default
pub fn get_state_dir() -> Result<PathBuf> {
    if let Ok(dir) = std::env::var(HOME_ENV) {
        return Ok(PathBuf::from(dir));
    }

    dirs::home_dir()
        .map(|home| home.join(".migrago"))
        .context("Could not find home directory; set MIGRAGO_HOME")
}

/// Build the context, with `--dir` taking precedence over config
pub fn get_context(migrations_dir: Option<PathBuf>) -> Result<MigragoContext> {
    let state_dir = get_state_dir()?;
    MigragoContext::new(&state_dir, migrations_dir).context("Failed to initialize migrago context")
}

/// Fail instead of prompting when there is no terminal to prompt on
pub fn ensure_interactive(missing: &str) -> Result<()> {
    if atty::isnt(atty::Stream::Stdin) {
        anyhow::bail!("Missing {}; stdin is not a terminal, pass it as an argument", missing);
    }
    Ok(())
}
