//! Logs command - inspect and prune the migrago event log

use anyhow::Result;
use chrono::{Local, TimeZone};
use clap::Subcommand;
use colored::Colorize;
use dialoguer::Confirm;
use migrago_core::services::logging::now_ms;
use migrago_core::{LogEntry, LoggingService};

use super::{ensure_interactive, get_state_dir};
use crate::output;

const DAY_MS: i64 = 24 * 60 * 60 * 1000;

#[derive(Subcommand)]
pub enum LogsCommands {
    /// Show recent create and execute events
    List {
        /// Number of entries to show
        #[arg(short, long, default_value = "20")]
        limit: usize,
        /// Only failed commands
        #[arg(long)]
        errors: bool,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Remove entries older than a number of days
    Clear {
        /// Age in days
        #[arg(long, default_value = "30")]
        older_than_days: u32,
        /// Don't ask for confirmation
        #[arg(long, short = 'f')]
        force: bool,
    },
    /// Show where the log lives and how much is in it
    Stats {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}

pub fn run(command: LogsCommands) -> Result<()> {
    let service = LoggingService::new(&get_state_dir()?, env!("CARGO_PKG_VERSION"))?;

    match command {
        LogsCommands::List { limit, errors, json } => list(&service, limit, errors, json),
        LogsCommands::Clear { older_than_days, force } => clear(&service, older_than_days, force),
        LogsCommands::Stats { json } => stats(&service, json),
    }
}

fn list(service: &LoggingService, limit: usize, errors: bool, json: bool) -> Result<()> {
    let entries = if errors {
        service.get_errors(limit)?
    } else {
        service.get_recent(limit)?
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&entries)?);
        return Ok(());
    }

    if entries.is_empty() {
        output::info("The event log is empty");
        return Ok(());
    }

    let mut table = output::create_table();
    table.set_header(vec!["When", "Command", "Event", "Driver", "Error"]);
    for entry in &entries {
        table.add_row(row(entry));
    }
    println!("{}", table);

    Ok(())
}

fn row(entry: &LogEntry) -> Vec<String> {
    let when = Local
        .timestamp_millis_opt(entry.timestamp)
        .single()
        .map(|t| t.format("%Y-%m-%d %H:%M").to_string())
        .unwrap_or_default();

    vec![
        when,
        entry.command.clone().unwrap_or_default(),
        entry.event.clone(),
        entry.driver.clone().unwrap_or_default(),
        entry.error_message.clone().unwrap_or_default(),
    ]
}

fn clear(service: &LoggingService, older_than_days: u32, force: bool) -> Result<()> {
    if !force {
        ensure_interactive("--force")?;
        let confirmed = Confirm::new()
            .with_prompt(format!("Remove log entries older than {} days?", older_than_days))
            .default(false)
            .interact()?;
        if !confirmed {
            return Ok(());
        }
    }

    let cutoff = now_ms() - i64::from(older_than_days) * DAY_MS;
    let removed = service.delete_before(cutoff)?;
    output::success(&format!("Removed {} log entries", removed));
    Ok(())
}

fn stats(service: &LoggingService, json: bool) -> Result<()> {
    let total = service.count()?;
    let failed = service.get_errors(usize::MAX)?.len();
    let size = std::fs::metadata(service.log_path()).map(|m| m.len()).unwrap_or(0);

    if json {
        println!(
            "{}",
            serde_json::json!({
                "path": service.log_path(),
                "entries": total,
                "failures": failed,
                "size_bytes": size,
            })
        );
        return Ok(());
    }

    println!("{} {}", "Log file:".bold(), service.log_path().display());
    println!("{} {} ({} failed)", "Entries:".bold(), total, failed);
    println!("{} {}", "Size:".bold(), output::format_size(size));
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_row_fills_missing_context_with_blanks() {
        let entry = LogEntry {
            id: 1,
            timestamp: now_ms(),
            app_version: "0.1.0".to_string(),
            platform: "linux".to_string(),
            event: "execute_failed".to_string(),
            command: Some("execute".to_string()),
            driver: None,
            error_message: Some("connection refused".to_string()),
            error_details: None,
        };

        let cells = row(&entry);
        assert_eq!(cells.len(), 5);
        assert!(!cells[0].is_empty());
        assert_eq!(cells[1], "execute");
        assert_eq!(cells[3], "");
        assert_eq!(cells[4], "connection refused");
    }
}
