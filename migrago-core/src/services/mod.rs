//! Service layer - business logic orchestration
//!
//! Services coordinate domain logic and port interactions. Each service
//! focuses on a specific use case.

pub mod execute;
pub mod logging;
pub mod migration;

pub use execute::ExecuteService;
pub use logging::{LogEntry, LogEvent, LoggingService};
pub use migration::{CreatedMigration, MigrationService};
