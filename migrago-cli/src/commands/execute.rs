//! Execute command - apply pending migrations to a database

use std::env;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use colored::Colorize;
use dialoguer::{Input, Password, Select};
use migrago_core::config::ConnectionDefaults;
use migrago_core::domain::database::{DEFAULT_DATABASE, DEFAULT_HOST};
use migrago_core::{DatabaseConfig, Driver, ExecutionReport, LogEvent, LoggingService, MigragoContext};

use super::{get_context, get_logger, get_state_dir, log_event};
use crate::output;

/// Env var holding the database password
const PASSWORD_ENV: &str = "MIGRAGO_DB_PASSWORD";

/// Connection settings given on the command line; anything missing is asked for
#[derive(Args, Debug, Default, Clone)]
pub struct ConnectionArgs {
    /// Database driver (postgres, mysql)
    #[arg(long)]
    pub driver: Option<String>,
    /// Database host
    #[arg(long)]
    pub host: Option<String>,
    /// Database port
    #[arg(long)]
    pub port: Option<String>,
    /// Database name
    #[arg(long)]
    pub database: Option<String>,
    /// Database username
    #[arg(long)]
    pub username: Option<String>,
    /// Database password (or set MIGRAGO_DB_PASSWORD)
    #[arg(long)]
    pub password: Option<String>,
}

pub fn run(args: ConnectionArgs, save_defaults: bool, dir: Option<PathBuf>, json: bool) -> Result<()> {
    let mut ctx = get_context(dir)?;
    let logger = get_logger();

    let interactive = atty::is(atty::Stream::Stdin);
    let config = resolve_config(args, &ctx.config.connection, interactive)?;

    execute_migrations(&ctx, &logger, &config, json)?;

    if save_defaults {
        ctx.config.remember_connection(&config);
        ctx.config.save(&get_state_dir()?)?;
        if !json {
            println!("{}", "Connection defaults saved (password not stored)".dimmed());
        }
    }

    Ok(())
}

/// Fill in every connection field: flag, then prompt, then saved default
///
/// Prompts run in a fixed order (driver, host, port, database, username,
/// password). Without a terminal, missing fields fall back to saved
/// defaults and fail when there are none.
pub fn resolve_config(
    args: ConnectionArgs,
    saved: &ConnectionDefaults,
    interactive: bool,
) -> Result<DatabaseConfig> {
    let driver = match args.driver {
        Some(d) => d.parse::<Driver>()?,
        None if interactive => prompt_driver(saved.driver)?,
        None => saved
            .driver
            .context("Missing --driver; stdin is not a terminal, pass it as an argument")?,
    };

    let host = answer(
        args.host,
        interactive,
        "Enter database host",
        Some(saved.host.clone().unwrap_or_else(|| DEFAULT_HOST.to_string())),
        "host",
    )?;

    // A saved port only makes sense for the driver it was saved with
    let default_port = match (&saved.port, saved.driver) {
        (Some(port), Some(saved_driver)) if saved_driver == driver => port.clone(),
        _ => driver.default_port().to_string(),
    };
    let port = answer(args.port, interactive, "Enter database port", Some(default_port), "port")?;

    let database = answer(
        args.database,
        interactive,
        "Enter database name",
        Some(saved.database.clone().unwrap_or_else(|| DEFAULT_DATABASE.to_string())),
        "database",
    )?;

    let username = answer(
        args.username,
        interactive,
        "Enter database username",
        saved.username.clone(),
        "username",
    )?;

    let password = match args.password.or_else(|| env::var(PASSWORD_ENV).ok()) {
        Some(p) => p,
        None if interactive => Password::new()
            .with_prompt("Enter database password")
            .allow_empty_password(true)
            .interact()?,
        None => anyhow::bail!(
            "Missing --password; stdin is not a terminal, pass it as an argument or set {}",
            PASSWORD_ENV
        ),
    };

    Ok(DatabaseConfig {
        driver,
        host,
        port,
        database,
        username,
        password,
    })
}

fn prompt_driver(saved: Option<Driver>) -> Result<Driver> {
    let names: Vec<&str> = Driver::ALL.iter().map(|d| d.as_str()).collect();
    let default = saved
        .and_then(|s| Driver::ALL.iter().position(|d| *d == s))
        .unwrap_or(0);

    let selection = Select::new()
        .with_prompt("Choose database driver")
        .items(&names)
        .default(default)
        .interact()?;

    Ok(Driver::ALL[selection])
}

fn answer(
    value: Option<String>,
    interactive: bool,
    prompt: &str,
    default: Option<String>,
    flag: &str,
) -> Result<String> {
    if let Some(v) = value {
        return Ok(v);
    }

    if interactive {
        let mut input = Input::<String>::new().with_prompt(prompt);
        if let Some(d) = default {
            input = input.default(d);
        }
        return Ok(input.interact_text()?);
    }

    default.with_context(|| format!("Missing --{}; stdin is not a terminal, pass it as an argument", flag))
}

pub fn execute_migrations(
    ctx: &MigragoContext,
    logger: &Option<LoggingService>,
    config: &DatabaseConfig,
    json: bool,
) -> Result<()> {
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("Failed to start async runtime")?;

    if !json {
        output::info(&format!(
            "Applying migrations from {} to {} database {} on {}:{} ({})",
            ctx.execute_service.migrations_dir().display(),
            config.driver,
            config.database,
            config.host,
            config.port,
            ctx.execute_service.runner_name()
        ));
    }

    let report = match runtime.block_on(ctx.execute_service.execute(config)) {
        Ok(report) => report,
        Err(e) => {
            log_event(
                logger,
                LogEvent::new("execute_failed")
                    .with_command("execute")
                    .with_driver(config.driver.as_str())
                    .with_error(e.to_string())
                    .with_error_details(format!("runner: {}", ctx.execute_service.runner_name())),
            );
            return Err(anyhow::Error::new(e).context("Error executing migrations"));
        }
    };

    log_event(
        logger,
        LogEvent::new("migrations_executed")
            .with_command("execute")
            .with_driver(config.driver.as_str()),
    );

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print_report(&report);
    }

    Ok(())
}

fn print_report(report: &ExecutionReport) {
    if report.applied.is_empty() {
        println!("{}", "No pending migrations".dimmed());
    }
    for migration in &report.applied {
        println!("  {} {} {}", "✓".green(), migration.version, migration.description);
    }
    if report.already_applied > 0 {
        println!("{}", format!("{} already applied", report.already_applied).dimmed());
    }
    output::success("Migrations executed successfully!");
}
