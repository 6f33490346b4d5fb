//! Migration runner port
//!
//! Applying migrations is delegated entirely to an external runner. The
//! contract is small: open a connection from the given config, hand over
//! the migrations directory, and report what happened. Tracking which
//! migrations were applied, ordering and transactions are the runner's job.

use std::path::Path;

use async_trait::async_trait;
use serde::Serialize;

use crate::domain::result::Result;
use crate::domain::DatabaseConfig;

/// A migration the runner applied during this execution
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AppliedMigration {
    pub version: i64,
    pub description: String,
}

/// Outcome of a successful execution
#[derive(Debug, Clone, Default, Serialize)]
pub struct ExecutionReport {
    /// Migrations applied by this execution, in the order they ran
    pub applied: Vec<AppliedMigration>,
    /// Count of migrations that were already applied beforehand
    pub already_applied: usize,
}

/// External migration runner
///
/// Implementations must release the connection they open before returning,
/// whether or not the migrations succeeded. Futures are not required to be
/// `Send`; execution runs on a single-threaded runtime.
#[async_trait(?Send)]
pub trait MigrationRunner: Send + Sync {
    /// Runner name, for logs
    fn name(&self) -> &str;

    /// Apply pending migrations from `migrations_dir`
    ///
    /// Fails with `ConnectionFailed` when the connection can't be opened and
    /// `MigrationExecutionFailed` (carrying the runner's own message) for
    /// everything after that.
    async fn execute(&self, config: &DatabaseConfig, migrations_dir: &Path) -> Result<ExecutionReport>;
}
