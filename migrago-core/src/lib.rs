//! migrago core - sequential SQL migration scaffolding and execution
//!
//! - **domain**: migration file naming, database config, errors
//! - **ports**: the `MigrationRunner` trait execution is delegated to
//! - **services**: file scaffolding, execution hand-off, event logging
//! - **adapters**: the sqlx-backed migration runner

pub mod adapters;
pub mod config;
pub mod domain;
pub mod ports;
pub mod services;

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::Result;

use adapters::SqlxMigrationRunner;
use config::Config;
use services::*;

// Re-export commonly used types at crate root
pub use domain::result::Error;
pub use domain::{DatabaseConfig, Driver, MigrationFile};
pub use ports::{ExecutionReport, MigrationRunner};
pub use services::{LogEntry, LogEvent, LoggingService};

/// Main context for migrago operations
///
/// Holds the resolved configuration and the services built from it. The
/// migrations directory is resolved once here and handed to both services.
pub struct MigragoContext {
    pub config: Config,
    pub migration_service: MigrationService,
    pub execute_service: ExecuteService,
}

impl MigragoContext {
    /// Create a context with the sqlx migration runner
    ///
    /// `migrations_dir` overrides whatever the config resolved.
    pub fn new(state_dir: &Path, migrations_dir: Option<PathBuf>) -> Result<Self> {
        Self::with_runner(state_dir, migrations_dir, Arc::new(SqlxMigrationRunner::new()))
    }

    /// Create a context with a specific migration runner
    pub fn with_runner(
        state_dir: &Path,
        migrations_dir: Option<PathBuf>,
        runner: Arc<dyn MigrationRunner>,
    ) -> Result<Self> {
        let mut config = Config::load(state_dir)?;
        if let Some(dir) = migrations_dir {
            config.migrations_dir = dir;
        }

        let migration_service = MigrationService::new(config.migrations_dir.clone());
        let execute_service = ExecuteService::new(runner, config.migrations_dir.clone());

        Ok(Self {
            config,
            migration_service,
            execute_service,
        })
    }
}
