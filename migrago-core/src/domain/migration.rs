//! Migration file naming
//!
//! A migration file is named `<sequence>_<slug>.sql`. The sequence has no
//! fixed width; the slug is the operator's free-text name with spaces
//! replaced by underscores.

use std::sync::OnceLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use super::result::{Error, Result};

/// File extension for migration files (without the dot)
pub const MIGRATION_EXTENSION: &str = "sql";

/// Default migrations directory, relative to the working directory
pub const DEFAULT_MIGRATIONS_DIR: &str = "migrations";

/// Largest usable sequence number; runners store versions as signed 64-bit
pub const MAX_SEQUENCE: u64 = i64::MAX as u64;

/// ASCII digits only; `\d` would also accept other Unicode digit classes
fn filename_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"^([0-9]+)_(.*)\.sql$").expect("valid migration pattern"))
}

/// A migration file identified by its sequence number and slug
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MigrationFile {
    pub sequence: u64,
    pub slug: String,
}

impl MigrationFile {
    /// Build a migration file from a free-text name
    ///
    /// The name is sanitized with [`sanitize_name`]. Names containing a path
    /// separator are rejected so the file can never land outside the
    /// migrations directory.
    pub fn new(sequence: u64, name: &str) -> Result<Self> {
        validate_name(name)?;

        Ok(Self {
            sequence,
            slug: sanitize_name(name),
        })
    }

    /// Parse an existing file name
    ///
    /// Returns `None` for names that don't follow `<digits>_<anything>.sql`,
    /// and for sequences above [`MAX_SEQUENCE`].
    pub fn parse(file_name: &str) -> Option<Self> {
        let captures = filename_pattern().captures(file_name)?;
        let sequence = captures
            .get(1)?
            .as_str()
            .parse::<u64>()
            .ok()
            .filter(|n| *n <= MAX_SEQUENCE)?;
        let slug = captures.get(2)?.as_str().to_string();
        Some(Self { sequence, slug })
    }

    /// File name on disk
    pub fn file_name(&self) -> String {
        format!("{}_{}.{}", self.sequence, self.slug, MIGRATION_EXTENSION)
    }
}

/// Reject names that would place the file outside its directory
pub fn validate_name(name: &str) -> Result<()> {
    if name.contains('/') || name.contains('\\') {
        return Err(Error::InvalidMigrationName(name.to_string()));
    }
    Ok(())
}

/// Replace every space with an underscore; everything else is kept verbatim
pub fn sanitize_name(name: &str) -> String {
    name.replace(' ', "_")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sanitize_replaces_every_space() {
        assert_eq!(sanitize_name("initial schema"), "initial_schema");
        assert_eq!(sanitize_name("  two  spaces "), "__two__spaces_");
        assert_eq!(sanitize_name("Add-Users.v2"), "Add-Users.v2");
        assert_eq!(sanitize_name("tab\tstays"), "tab\tstays");
    }

    #[test]
    fn test_file_name() {
        let file = MigrationFile::new(1, "initial schema").unwrap();
        assert_eq!(file.file_name(), "1_initial_schema.sql");

        let file = MigrationFile::new(120, "drop temp").unwrap();
        assert_eq!(file.file_name(), "120_drop_temp.sql");
    }

    #[test]
    fn test_new_rejects_path_separators() {
        assert!(matches!(
            MigrationFile::new(1, "../escape"),
            Err(Error::InvalidMigrationName(_))
        ));
        assert!(matches!(
            MigrationFile::new(1, "a\\b"),
            Err(Error::InvalidMigrationName(_))
        ));
    }

    #[test]
    fn test_parse_matching_names() {
        let file = MigrationFile::parse("7_add_index.sql").unwrap();
        assert_eq!(file.sequence, 7);
        assert_eq!(file.slug, "add_index");

        // Leading zeros and an empty slug still match
        let file = MigrationFile::parse("007_.sql").unwrap();
        assert_eq!(file.sequence, 7);
        assert_eq!(file.slug, "");
    }

    #[test]
    fn test_parse_rejects_non_matching_names() {
        assert!(MigrationFile::parse("foo.sql").is_none());
        assert!(MigrationFile::parse("3_add_users.txt").is_none());
        assert!(MigrationFile::parse("3add_users.sql").is_none());
        assert!(MigrationFile::parse("_3_add_users.sql").is_none());
        assert!(MigrationFile::parse("3_add_users.sql.bak").is_none());
        assert!(MigrationFile::parse("٣_arabic_digit.sql").is_none());
    }

    #[test]
    fn test_parse_ignores_overflowing_sequence() {
        assert!(MigrationFile::parse("99999999999999999999999_big.sql").is_none());
        assert!(MigrationFile::parse("9223372036854775808_huge.sql").is_none());

        let last = MigrationFile::parse("9223372036854775807_last.sql").unwrap();
        assert_eq!(last.sequence, MAX_SEQUENCE);
    }
}
