//! Logging service - structured event logging to a JSON lines file
//!
//! Events are appended to `logs.jsonl` in the state directory, one JSON
//! object per line. Passwords and connection strings are never logged;
//! callers only pass event names, command names, drivers and error text.

use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};

use anyhow::{Context, Result};
use chrono::Utc;
use serde::{Deserialize, Serialize};

const LOG_FILE: &str = "logs.jsonl";

/// Counter for generating unique IDs within the same millisecond
static ID_COUNTER: AtomicU64 = AtomicU64::new(0);

/// Generate a unique ID based on timestamp + counter
fn generate_id() -> u64 {
    let timestamp = now_ms() as u64;

    // Lower 16 bits: counter (65536 unique IDs per millisecond)
    let counter = ID_COUNTER.fetch_add(1, Ordering::Relaxed) & 0xFFFF;
    (timestamp << 16) | counter
}

/// Current unix timestamp in milliseconds
pub fn now_ms() -> i64 {
    Utc::now().timestamp_millis()
}

fn detect_platform() -> &'static str {
    if cfg!(target_os = "macos") {
        "macos"
    } else if cfg!(target_os = "windows") {
        "windows"
    } else if cfg!(target_os = "linux") {
        "linux"
    } else {
        "unknown"
    }
}

/// A log event to be recorded
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LogEvent {
    pub event: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub command: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub driver: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_details: Option<String>,
}

impl LogEvent {
    pub fn new(event: impl Into<String>) -> Self {
        Self {
            event: event.into(),
            ..Default::default()
        }
    }

    /// Set the command context
    pub fn with_command(mut self, command: impl Into<String>) -> Self {
        self.command = Some(command.into());
        self
    }

    /// Set the database driver context
    pub fn with_driver(mut self, driver: impl Into<String>) -> Self {
        self.driver = Some(driver.into());
        self
    }

    pub fn with_error(mut self, message: impl Into<String>) -> Self {
        self.error_message = Some(message.into());
        self
    }

    pub fn with_error_details(mut self, details: impl Into<String>) -> Self {
        self.error_details = Some(details.into());
        self
    }
}

/// A log entry as stored on disk
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogEntry {
    pub id: u64,
    pub timestamp: i64,
    pub app_version: String,
    pub platform: String,
    pub event: String,
    #[serde(default)]
    pub command: Option<String>,
    #[serde(default)]
    pub driver: Option<String>,
    #[serde(default)]
    pub error_message: Option<String>,
    #[serde(default)]
    pub error_details: Option<String>,
}

/// Service for structured event logging
pub struct LoggingService {
    log_path: PathBuf,
    app_version: String,
    platform: &'static str,
}

impl LoggingService {
    /// Create a new logging service
    ///
    /// Creates the state directory and an empty log file if needed.
    pub fn new(state_dir: &Path, app_version: impl Into<String>) -> Result<Self> {
        fs::create_dir_all(state_dir)
            .with_context(|| format!("Failed to create state directory: {:?}", state_dir))?;

        let log_path = state_dir.join(LOG_FILE);
        OpenOptions::new()
            .create(true)
            .append(true)
            .open(&log_path)
            .with_context(|| format!("Failed to open log file: {:?}", log_path))?;

        Ok(Self {
            log_path,
            app_version: app_version.into(),
            platform: detect_platform(),
        })
    }

    /// Log an event
    ///
    /// The id, timestamp, app version and platform are added here.
    pub fn log(&self, event: LogEvent) -> Result<()> {
        let entry = LogEntry {
            id: generate_id(),
            timestamp: now_ms(),
            app_version: self.app_version.clone(),
            platform: self.platform.to_string(),
            event: event.event,
            command: event.command,
            driver: event.driver,
            error_message: event.error_message,
            error_details: event.error_details,
        };

        let mut line = serde_json::to_string(&entry)?;
        line.push('\n');

        let mut file = OpenOptions::new().create(true).append(true).open(&self.log_path)?;
        file.write_all(line.as_bytes())?;
        Ok(())
    }

    /// Most recent entries first, up to `limit`
    pub fn get_recent(&self, limit: usize) -> Result<Vec<LogEntry>> {
        let mut entries = self.read_all()?;
        entries.sort_by(|a, b| b.timestamp.cmp(&a.timestamp).then(b.id.cmp(&a.id)));
        entries.truncate(limit);
        Ok(entries)
    }

    /// Most recent entries that carry an error message, up to `limit`
    pub fn get_errors(&self, limit: usize) -> Result<Vec<LogEntry>> {
        let mut entries: Vec<LogEntry> = self
            .read_all()?
            .into_iter()
            .filter(|e| e.error_message.is_some())
            .collect();
        entries.sort_by(|a, b| b.timestamp.cmp(&a.timestamp).then(b.id.cmp(&a.id)));
        entries.truncate(limit);
        Ok(entries)
    }

    /// Get the total number of log entries
    pub fn count(&self) -> Result<u64> {
        Ok(self.read_all()?.len() as u64)
    }

    /// Delete logs older than the specified timestamp (unix ms)
    pub fn delete_before(&self, timestamp_ms: i64) -> Result<u64> {
        let (kept, dropped): (Vec<LogEntry>, Vec<LogEntry>) = self
            .read_all()?
            .into_iter()
            .partition(|e| e.timestamp >= timestamp_ms);

        let mut content = String::new();
        for entry in &kept {
            content.push_str(&serde_json::to_string(entry)?);
            content.push('\n');
        }

        // Write next to the log and swap it in
        let tmp_path = self.log_path.with_extension("jsonl.tmp");
        fs::write(&tmp_path, content)?;
        fs::rename(&tmp_path, &self.log_path)?;

        Ok(dropped.len() as u64)
    }

    /// Get the path to the log file
    pub fn log_path(&self) -> &Path {
        &self.log_path
    }

    /// Lines that fail to parse (e.g. a torn final write) are skipped
    fn read_all(&self) -> Result<Vec<LogEntry>> {
        let content = match fs::read_to_string(&self.log_path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e.into()),
        };

        Ok(content
            .lines()
            .filter(|line| !line.trim().is_empty())
            .filter_map(|line| serde_json::from_str(line).ok())
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_logging_service_creation() {
        let dir = tempdir().unwrap();
        let service = LoggingService::new(dir.path(), "1.0.0").unwrap();

        assert!(service.log_path().exists());
        assert_eq!(service.count().unwrap(), 0);
    }

    #[test]
    fn test_log_event() {
        let dir = tempdir().unwrap();
        let service = LoggingService::new(dir.path(), "1.0.0").unwrap();

        service.log(LogEvent::new("test_event")).unwrap();

        let entries = service.get_recent(10).unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].event, "test_event");
        assert_eq!(entries[0].app_version, "1.0.0");
    }

    #[test]
    fn test_log_with_context() {
        let dir = tempdir().unwrap();
        let service = LoggingService::new(dir.path(), "2.0.0").unwrap();

        service
            .log(
                LogEvent::new("migrations_executed")
                    .with_driver("postgres")
                    .with_command("execute"),
            )
            .unwrap();

        let entries = service.get_recent(10).unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].event, "migrations_executed");
        assert_eq!(entries[0].driver, Some("postgres".to_string()));
        assert_eq!(entries[0].command, Some("execute".to_string()));
    }

    #[test]
    fn test_log_error() {
        let dir = tempdir().unwrap();
        let service = LoggingService::new(dir.path(), "1.0.0").unwrap();

        service.log(LogEvent::new("migration_created")).unwrap();
        service
            .log(
                LogEvent::new("execute_failed")
                    .with_error("Connection refused")
                    .with_error_details("runner: sqlx"),
            )
            .unwrap();

        let errors = service.get_errors(10).unwrap();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].event, "execute_failed");
        assert_eq!(errors[0].error_message, Some("Connection refused".to_string()));
        assert_eq!(errors[0].error_details, Some("runner: sqlx".to_string()));
    }

    #[test]
    fn test_get_recent_is_newest_first_and_limited() {
        let dir = tempdir().unwrap();
        let service = LoggingService::new(dir.path(), "1.0.0").unwrap();

        service.log(LogEvent::new("first")).unwrap();
        service.log(LogEvent::new("second")).unwrap();
        service.log(LogEvent::new("third")).unwrap();

        let entries = service.get_recent(2).unwrap();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].event, "third");
        assert_eq!(entries[1].event, "second");
    }

    #[test]
    fn test_count_and_delete() {
        let dir = tempdir().unwrap();
        let service = LoggingService::new(dir.path(), "1.0.0").unwrap();

        service.log(LogEvent::new("event1")).unwrap();
        service.log(LogEvent::new("event2")).unwrap();
        service.log(LogEvent::new("event3")).unwrap();

        assert_eq!(service.count().unwrap(), 3);

        // Nothing is older than a timestamp in the past
        assert_eq!(service.delete_before(0).unwrap(), 0);
        assert_eq!(service.count().unwrap(), 3);

        // Delete all logs (using future timestamp)
        let deleted = service.delete_before(now_ms() + 1000).unwrap();
        assert_eq!(deleted, 3);
        assert_eq!(service.count().unwrap(), 0);

        // Still writable after the swap
        service.log(LogEvent::new("event4")).unwrap();
        assert_eq!(service.count().unwrap(), 1);
    }

    #[test]
    fn test_malformed_lines_are_skipped() {
        let dir = tempdir().unwrap();
        let service = LoggingService::new(dir.path(), "1.0.0").unwrap();

        service.log(LogEvent::new("good")).unwrap();
        let mut file = OpenOptions::new().append(true).open(service.log_path()).unwrap();
        file.write_all(b"{\"id\": 1, \"trunc").unwrap();

        assert_eq!(service.count().unwrap(), 1);
    }
}
