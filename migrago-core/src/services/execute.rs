//! Execute service - hands pending migrations to the migration runner

use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::domain::result::{Error, Result};
use crate::domain::DatabaseConfig;
use crate::ports::{ExecutionReport, MigrationRunner};

/// Service for executing pending migrations against a database
pub struct ExecuteService {
    runner: Arc<dyn MigrationRunner>,
    migrations_dir: PathBuf,
}

impl ExecuteService {
    pub fn new(runner: Arc<dyn MigrationRunner>, migrations_dir: impl Into<PathBuf>) -> Self {
        Self {
            runner,
            migrations_dir: migrations_dir.into(),
        }
    }

    pub fn migrations_dir(&self) -> &Path {
        &self.migrations_dir
    }

    pub fn runner_name(&self) -> &str {
        self.runner.name()
    }

    /// Execute pending migrations with the given connection config
    ///
    /// A missing migrations directory is reported before any connection is
    /// opened. Everything else is up to the runner.
    pub async fn execute(&self, config: &DatabaseConfig) -> Result<ExecutionReport> {
        if !self.migrations_dir.is_dir() {
            return Err(Error::execution(format!(
                "migrations directory {:?} does not exist",
                self.migrations_dir
            )));
        }

        self.runner.execute(config, &self.migrations_dir).await
    }
}
