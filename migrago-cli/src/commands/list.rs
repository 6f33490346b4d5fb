//! List command - show migration files and the next sequence number

use std::path::PathBuf;

use anyhow::Result;
use colored::Colorize;

use super::get_context;
use crate::output;

pub fn run(dir: Option<PathBuf>, json: bool) -> Result<()> {
    let ctx = get_context(dir)?;
    let service = &ctx.migration_service;

    let migrations = service.list()?;
    let next_sequence = service.next_sequence()?;

    if json {
        let files: Vec<_> = migrations
            .iter()
            .map(|m| {
                serde_json::json!({
                    "sequence": m.sequence,
                    "slug": m.slug,
                    "file_name": m.file_name(),
                })
            })
            .collect();
        println!(
            "{}",
            serde_json::to_string_pretty(&serde_json::json!({
                "migrations_dir": service.migrations_dir().to_string_lossy(),
                "migrations": files,
                "next_sequence": next_sequence,
            }))?
        );
        return Ok(());
    }

    if !service.migrations_dir().exists() {
        output::warning(&format!(
            "No migrations directory at {}; it is created with the first migration",
            service.migrations_dir().display()
        ));
        return Ok(());
    }

    if migrations.is_empty() {
        println!("No migrations found in {}", service.migrations_dir().display());
    } else {
        let mut table = output::create_table();
        table.set_header(vec!["Sequence", "File"]);
        for migration in &migrations {
            table.add_row(vec![migration.sequence.to_string(), migration.file_name()]);
        }
        println!("{}", table);
    }

    println!("{}", format!("Next sequence: {}", next_sequence).dimmed());
    Ok(())
}
