//! Create command - scaffold a new, empty migration file

use std::path::PathBuf;

use anyhow::Result;
use dialoguer::Input;
use migrago_core::{LogEvent, LoggingService, MigragoContext};

use super::{ensure_interactive, get_context, get_logger, log_event};
use crate::output;

pub fn run(name: Option<String>, dir: Option<PathBuf>, json: bool) -> Result<()> {
    let ctx = get_context(dir)?;
    let logger = get_logger();

    let name = match name {
        Some(n) => n,
        None => prompt_name()?,
    };

    create_migration(&ctx, &logger, &name, json)
}

/// Ask for the migration name
pub fn prompt_name() -> Result<String> {
    ensure_interactive("migration name")?;
    let name = Input::new()
        .with_prompt("Enter migration name")
        .interact_text()?;
    Ok(name)
}

pub fn create_migration(
    ctx: &MigragoContext,
    logger: &Option<LoggingService>,
    name: &str,
    json: bool,
) -> Result<()> {
    let created = match ctx.migration_service.create(name) {
        Ok(created) => created,
        Err(e) => {
            log_event(
                logger,
                LogEvent::new("create_failed")
                    .with_command("create")
                    .with_error(e.to_string()),
            );
            return Err(e.into());
        }
    };

    log_event(logger, LogEvent::new("migration_created").with_command("create"));

    if json {
        println!("{}", serde_json::to_string_pretty(&created)?);
    } else {
        output::success("Migration created successfully!");
        println!("  File: {}", created.path.display());
    }

    Ok(())
}
