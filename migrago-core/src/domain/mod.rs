//! Core domain entities
//!
//! Pure data structures with their naming and formatting rules - no I/O.

pub mod database;
pub mod migration;
pub mod result;

pub use database::{DatabaseConfig, Driver};
pub use migration::{sanitize_name, validate_name, MigrationFile, DEFAULT_MIGRATIONS_DIR, MAX_SEQUENCE, MIGRATION_EXTENSION};
