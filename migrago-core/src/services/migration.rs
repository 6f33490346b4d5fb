//! Migration service - scaffolds sequentially numbered migration files
//!
//! The migrations directory is the only state: the next sequence number is
//! always the highest number found on disk plus one. There is no separate
//! counter and no locking; two processes creating migrations at the same
//! moment can compute the same number.

use std::fs::{self, OpenOptions};
use std::io;
use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::domain::migration::{validate_name, MigrationFile, MAX_SEQUENCE};
use crate::domain::result::{Error, Result};

#[cfg(unix)]
const DIR_MODE: u32 = 0o755;
#[cfg(unix)]
const FILE_MODE: u32 = 0o644;

/// Result of creating a migration file
#[derive(Debug, Clone, Serialize)]
pub struct CreatedMigration {
    pub sequence: u64,
    pub file_name: String,
    pub path: PathBuf,
}

/// Service for allocating sequence numbers and creating migration files
pub struct MigrationService {
    migrations_dir: PathBuf,
}

impl MigrationService {
    pub fn new(migrations_dir: impl Into<PathBuf>) -> Self {
        Self {
            migrations_dir: migrations_dir.into(),
        }
    }

    pub fn migrations_dir(&self) -> &Path {
        &self.migrations_dir
    }

    /// Create a new, empty migration file
    ///
    /// 1. Ensures the migrations directory exists
    /// 2. Computes the next sequence number
    /// 3. Writes `<next>_<sanitized name>.sql`
    ///
    /// Nothing is cleaned up on failure: if the write fails the directory
    /// created in step 1 stays.
    pub fn create(&self, name: &str) -> Result<CreatedMigration> {
        validate_name(name)?;

        self.ensure_dir()?;

        let sequence = self.next_sequence()?;
        let migration = MigrationFile::new(sequence, name)?;
        let file_name = migration.file_name();
        let path = self.migrations_dir.join(&file_name);

        write_empty_file(&path).map_err(|source| Error::FileWriteFailed {
            path: path.clone(),
            source,
        })?;

        Ok(CreatedMigration {
            sequence,
            file_name,
            path,
        })
    }

    /// Compute the sequence number for the next migration
    ///
    /// Read-only: calling it twice without creating a file in between
    /// returns the same number.
    pub fn next_sequence(&self) -> Result<u64> {
        let max = self
            .list()?
            .last()
            .map(|m| m.sequence)
            .unwrap_or(0);

        if max >= MAX_SEQUENCE {
            return Err(Error::SequenceDiscoveryFailed {
                path: self.migrations_dir.clone(),
                source: io::Error::new(io::ErrorKind::InvalidData, "sequence number overflow"),
            });
        }

        Ok(max + 1)
    }

    /// List migration files in the directory, ordered by sequence number
    ///
    /// Only direct children are considered. Subdirectories and names that
    /// don't follow `<digits>_<slug>.sql` are skipped. Non-UTF-8 bytes in
    /// the slug don't affect the match.
    pub fn list(&self) -> Result<Vec<MigrationFile>> {
        if !self.migrations_dir.exists() {
            return Ok(Vec::new());
        }

        let discovery_failed = |source: io::Error| Error::SequenceDiscoveryFailed {
            path: self.migrations_dir.clone(),
            source,
        };

        let mut migrations = Vec::new();
        for entry in fs::read_dir(&self.migrations_dir).map_err(discovery_failed)? {
            let entry = entry.map_err(discovery_failed)?;
            if entry.path().is_dir() {
                continue;
            }

            let file_name = entry.file_name();
            if let Some(migration) = MigrationFile::parse(&file_name.to_string_lossy()) {
                migrations.push(migration);
            }
        }

        migrations.sort_by(|a, b| a.sequence.cmp(&b.sequence).then_with(|| a.slug.cmp(&b.slug)));
        Ok(migrations)
    }

    fn ensure_dir(&self) -> Result<()> {
        let mut builder = fs::DirBuilder::new();
        builder.recursive(true);

        #[cfg(unix)]
        {
            use std::os::unix::fs::DirBuilderExt;
            builder.mode(DIR_MODE);
        }

        builder
            .create(&self.migrations_dir)
            .map_err(|source| Error::DirectoryCreationFailed {
                path: self.migrations_dir.clone(),
                source,
            })
    }
}

/// Create a zero-length file, failing if one already exists at `path`
fn write_empty_file(path: &Path) -> io::Result<()> {
    let mut options = OpenOptions::new();
    options.write(true).create_new(true);

    #[cfg(unix)]
    {
        use std::os::unix::fs::OpenOptionsExt;
        options.mode(FILE_MODE);
    }

    options.open(path)?;
    Ok(())
}
