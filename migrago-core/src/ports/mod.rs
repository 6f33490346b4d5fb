//! Port definitions - traits for external dependencies
//!
//! Ports define the interfaces that adapters must implement.

pub mod migration_runner;

pub use migration_runner::{AppliedMigration, ExecutionReport, MigrationRunner};
