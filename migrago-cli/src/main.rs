//! migrago CLI - sequential SQL migrations from your terminal

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Result;
use clap::{Parser, Subcommand};

mod commands;
mod output;

use commands::{create, execute, list, logs, start};

/// migrago - a simple database migration tool
#[derive(Parser)]
#[command(name = "migrago", version, about, long_about = None)]
struct Cli {
    /// Migrations directory (default: ./migrations, or MIGRAGO_MIGRATIONS_DIR)
    #[arg(long, global = true)]
    dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the interactive migration tool
    Start,

    /// Create a new, empty migration file
    Create {
        /// Migration name (spaces become underscores)
        name: Option<String>,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Execute pending migrations against a database
    Execute {
        #[command(flatten)]
        connection: execute::ConnectionArgs,
        /// Remember these connection settings (except the password)
        #[arg(long)]
        save_defaults: bool,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// List migration files and the next sequence number
    List {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// View and manage the event log
    Logs {
        #[command(subcommand)]
        command: logs::LogsCommands,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            output::error(&format!("Error: {:#}", e));
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<()> {
    let dir = cli.dir;

    match cli.command {
        Commands::Start => start::run(dir),
        Commands::Create { name, json } => create::run(name, dir, json),
        Commands::Execute {
            connection,
            save_defaults,
            json,
        } => execute::run(connection, save_defaults, dir, json),
        Commands::List { json } => list::run(dir, json),
        Commands::Logs { command } => logs::run(command),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_execute_flags() {
        let cli = Cli::try_parse_from([
            "migrago",
            "--dir",
            "db/migrations",
            "execute",
            "--driver",
            "postgres",
            "--host",
            "localhost",
            "--port",
            "5432",
            "--database",
            "app",
            "--username",
            "admin",
            "--password",
            "secret",
        ])
        .unwrap();

        assert_eq!(cli.dir, Some(PathBuf::from("db/migrations")));
        match cli.command {
            Commands::Execute { connection, save_defaults, json } => {
                assert_eq!(connection.driver.as_deref(), Some("postgres"));
                assert_eq!(connection.port.as_deref(), Some("5432"));
                assert_eq!(connection.password.as_deref(), Some("secret"));
                assert!(!save_defaults);
                assert!(!json);
            }
            _ => panic!("expected execute"),
        }
    }

    #[test]
    fn test_parse_create_with_spaces() {
        let cli = Cli::try_parse_from(["migrago", "create", "initial schema", "--json"]).unwrap();
        match cli.command {
            Commands::Create { name, json } => {
                assert_eq!(name.as_deref(), Some("initial schema"));
                assert!(json);
            }
            _ => panic!("expected create"),
        }
    }

    #[test]
    fn test_dir_flag_is_global() {
        let cli = Cli::try_parse_from(["migrago", "list", "--dir", "sql"]).unwrap();
        assert_eq!(cli.dir, Some(PathBuf::from("sql")));
    }
}
