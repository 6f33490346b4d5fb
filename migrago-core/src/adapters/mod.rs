//! Adapter implementations
//!
//! Adapters implement the port traits with concrete technologies:
//! - sqlx's migrator for the MigrationRunner port (postgres, mysql)

pub mod sqlx_runner;

pub use sqlx_runner::SqlxMigrationRunner;
