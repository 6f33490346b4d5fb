//! Result and error types for the core library

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Core library error type
#[derive(Error, Debug)]
pub enum Error {
    #[error("failed to create migrations directory {path:?}")]
    DirectoryCreationFailed {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to get next migration number from {path:?}")]
    SequenceDiscoveryFailed {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to create migration file {path:?}")]
    FileWriteFailed {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to open {driver} database connection: {message}")]
    ConnectionFailed { driver: String, message: String },

    /// Message is passed through from the migration runner untouched
    #[error("{0}")]
    MigrationExecutionFailed(String),

    #[error("Invalid migration name {0:?}: path separators are not allowed")]
    InvalidMigrationName(String),

    #[error("Unknown database driver: {0}. Available: postgres, mysql")]
    UnknownDriver(String),

    #[error(transparent)]
    Io(#[from] io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

impl Error {
    /// Create a connection error for the given driver
    pub fn connection(driver: impl Into<String>, message: impl Into<String>) -> Self {
        Self::ConnectionFailed {
            driver: driver.into(),
            message: message.into(),
        }
    }

    /// Create a migration execution error
    pub fn execution(message: impl Into<String>) -> Self {
        Self::MigrationExecutionFailed(message.into())
    }
}

/// Core library result type
pub type Result<T> = std::result::Result<T, Error>;
