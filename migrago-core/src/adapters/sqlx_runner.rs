//! sqlx migration runner
//!
//! Opens a single connection per execution and lets `sqlx::migrate` do the
//! work: it reads `<version>_<description>.sql` files from the directory,
//! applies the pending ones in version order and records them in
//! `_sqlx_migrations`.

use std::collections::HashSet;
use std::path::Path;

use async_trait::async_trait;
use sqlx::migrate::{Migrate, MigrateError, Migrator};
use sqlx::{Connection, MySqlConnection, PgConnection};

use crate::domain::result::{Error, Result};
use crate::domain::{DatabaseConfig, Driver};
use crate::ports::{AppliedMigration, ExecutionReport, MigrationRunner};

/// MigrationRunner backed by `sqlx::migrate::Migrator`
#[derive(Debug, Default, Clone, Copy)]
pub struct SqlxMigrationRunner;

impl SqlxMigrationRunner {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait(?Send)]
impl MigrationRunner for SqlxMigrationRunner {
    fn name(&self) -> &str {
        "sqlx"
    }

    async fn execute(&self, config: &DatabaseConfig, migrations_dir: &Path) -> Result<ExecutionReport> {
        // Resolve the files before connecting so a bad directory never opens a connection
        let migrator = Migrator::new(migrations_dir).await.map_err(execution_failed)?;
        let url = config.connection_string();
        let connection_failed = |e: sqlx::Error| Error::connection(config.driver.as_str(), e.to_string());

        match config.driver {
            Driver::Postgres => {
                let mut conn = PgConnection::connect(&url).await.map_err(connection_failed)?;
                let outcome: Result<ExecutionReport> = async {
                    let applied = applied_versions(&mut conn).await?;
                    migrator.run(&mut conn).await.map_err(execution_failed)?;
                    Ok(build_report(&migrator, &applied))
                }
                .await;
                close(conn).await;
                outcome
            }
            Driver::Mysql => {
                let mut conn = MySqlConnection::connect(&url).await.map_err(connection_failed)?;
                let outcome: Result<ExecutionReport> = async {
                    let applied = applied_versions(&mut conn).await?;
                    migrator.run(&mut conn).await.map_err(execution_failed)?;
                    Ok(build_report(&migrator, &applied))
                }
                .await;
                close(conn).await;
                outcome
            }
        }
    }
}

fn execution_failed(e: MigrateError) -> Error {
    Error::execution(e.to_string())
}

/// Versions recorded as applied before this run
async fn applied_versions<C: Migrate>(conn: &mut C) -> Result<HashSet<i64>> {
    conn.ensure_migrations_table().await.map_err(execution_failed)?;
    let applied = conn.list_applied_migrations().await.map_err(execution_failed)?;
    Ok(applied.into_iter().map(|m| m.version).collect())
}

/// Everything that wasn't applied beforehand was applied by this run
fn build_report(migrator: &Migrator, applied_before: &HashSet<i64>) -> ExecutionReport {
    let mut report = ExecutionReport::default();

    for migration in migrator.iter().filter(|m| !m.migration_type.is_down_migration()) {
        if applied_before.contains(&migration.version) {
            report.already_applied += 1;
        } else {
            report.applied.push(AppliedMigration {
                version: migration.version,
                description: migration.description.to_string(),
            });
        }
    }

    report
}

/// The outcome of the migrations is what gets reported; a failed close is dropped
async fn close<C: Connection>(conn: C) {
    let _ = conn.close().await;
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn unreachable_config(driver: Driver) -> DatabaseConfig {
        DatabaseConfig {
            driver,
            host: "127.0.0.1".to_string(),
            // Port 1 is reserved and nothing listens there
            port: "1".to_string(),
            database: "app".to_string(),
            username: "admin".to_string(),
            password: "secret".to_string(),
        }
    }

    #[tokio::test]
    async fn test_unreachable_postgres_is_connection_failure() {
        let dir = tempdir().unwrap();
        std::fs::write(dir.path().join("1_init.sql"), "").unwrap();

        let err = SqlxMigrationRunner::new()
            .execute(&unreachable_config(Driver::Postgres), dir.path())
            .await
            .unwrap_err();

        match err {
            Error::ConnectionFailed { driver, .. } => assert_eq!(driver, "postgres"),
            other => panic!("expected ConnectionFailed, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_unreachable_mysql_is_connection_failure() {
        let dir = tempdir().unwrap();
        std::fs::write(dir.path().join("1_init.sql"), "").unwrap();

        let err = SqlxMigrationRunner::new()
            .execute(&unreachable_config(Driver::Mysql), dir.path())
            .await
            .unwrap_err();

        assert!(matches!(err, Error::ConnectionFailed { .. }));
    }

    #[tokio::test]
    async fn test_unreadable_migration_names_fail_before_connecting() {
        let dir = tempdir().unwrap();
        // Has an underscore and the extension but no numeric version
        std::fs::write(dir.path().join("init_schema.sql"), "").unwrap();

        let err = SqlxMigrationRunner::new()
            .execute(&unreachable_config(Driver::Postgres), dir.path())
            .await
            .unwrap_err();

        assert!(matches!(err, Error::MigrationExecutionFailed(_)));
    }
}
