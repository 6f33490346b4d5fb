//! Start command - fully interactive flow
//!
//! Asks for the action first, then for whatever that action needs.

use std::path::PathBuf;

use anyhow::Result;
use dialoguer::Select;

use super::create::{create_migration, prompt_name};
use super::execute::{execute_migrations, resolve_config, ConnectionArgs};
use super::{ensure_interactive, get_context, get_logger};

const ACTIONS: [&str; 2] = ["create", "execute"];

pub fn run(dir: Option<PathBuf>) -> Result<()> {
    ensure_interactive("action")?;

    let ctx = get_context(dir)?;
    let logger = get_logger();

    let choice = Select::new()
        .with_prompt("Choose an action")
        .items(&ACTIONS)
        .default(0)
        .interact()?;

    match ACTIONS[choice] {
        "create" => {
            let name = prompt_name()?;
            create_migration(&ctx, &logger, &name, false)
        }
        _ => {
            let config = resolve_config(ConnectionArgs::default(), &ctx.config.connection, true)?;
            execute_migrations(&ctx, &logger, &config, false)
        }
    }
}
