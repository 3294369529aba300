//! Flat-file hand-off between the lister and the ownership transferrer.
//!
//! The file is UTF-8 CSV with a `repo_name` header and one repository
//! identifier per row.

use crate::error::{MigrateError, Result};
use std::fs::File;
use std::path::Path;

/// Header of the identifier column.
pub const REPO_COLUMN: &str = "repo_name";

/// Identifiers read from a file, in file order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Records {
    pub identifiers: Vec<String>,
    /// 1-based data row numbers that had no identifier.
    pub skipped_rows: Vec<usize>,
}

/// Write identifiers to `path`, replacing any existing file.
pub fn write_identifiers<I, S>(path: &Path, identifiers: I) -> Result<usize>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut writer = csv::Writer::from_path(path)?;
    writer.write_record([REPO_COLUMN])?;

    let mut written = 0;
    for identifier in identifiers {
        writer.write_record([identifier.as_ref()])?;
        written += 1;
    }
    writer.flush()?;

    Ok(written)
}

/// Read identifiers from `path`.
///
/// Rows whose identifier is missing or blank are skipped and logged.
pub fn read_identifiers(path: &Path) -> Result<Records> {
    if !path.exists() {
        return Err(MigrateError::FileNotFound(path.to_path_buf()));
    }

    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .from_reader(File::open(path)?);

    let column = reader
        .headers()?
        .iter()
        .position(|h| h.trim() == REPO_COLUMN)
        .ok_or_else(|| {
            MigrateError::InvalidConfig(format!(
                "{} has no {} column",
                path.display(),
                REPO_COLUMN
            ))
        })?;

    let mut records = Records::default();
    for (index, row) in reader.records().enumerate() {
        let row = row?;
        match row.get(column).map(str::trim) {
            Some(identifier) if !identifier.is_empty() => {
                records.identifiers.push(identifier.to_string());
            }
            _ => {
                tracing::warn!("Skipping row {} of {}: no {}", index + 1, path.display(), REPO_COLUMN);
                records.skipped_rows.push(index + 1);
            }
        }
    }

    Ok(records)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_round_trip_preserves_order() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("repos.csv");
        let ids = vec!["me/zeta", "me/alpha", "me/with,comma", "me/mid"];

        assert_eq!(write_identifiers(&path, &ids).unwrap(), 4);
        let records = read_identifiers(&path).unwrap();

        assert_eq!(records.identifiers, ids);
        assert!(records.skipped_rows.is_empty());
    }

    #[test]
    fn test_blank_rows_are_skipped() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("repos.csv");
        fs::write(&path, "repo_name\na\n\"\"\n\" \"\nb\n").unwrap();

        let records = read_identifiers(&path).unwrap();
        assert_eq!(records.identifiers, vec!["a", "b"]);
        assert_eq!(records.skipped_rows, vec![2, 3]);
    }

    #[test]
    fn test_missing_file() {
        let dir = TempDir::new().unwrap();
        let err = read_identifiers(&dir.path().join("absent.csv")).unwrap_err();
        assert!(matches!(err, MigrateError::FileNotFound(_)));
    }

    #[test]
    fn test_missing_column() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("repos.csv");
        fs::write(&path, "name\nfoo\n").unwrap();

        let err = read_identifiers(&path).unwrap_err();
        assert!(matches!(err, MigrateError::InvalidConfig(_)));
    }

    #[test]
    fn test_column_found_among_others() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("repos.csv");
        fs::write(&path, "id,repo_name\n1,me/a\n2\n3,me/b\n").unwrap();

        let records = read_identifiers(&path).unwrap();
        assert_eq!(records.identifiers, vec!["me/a", "me/b"]);
        assert_eq!(records.skipped_rows, vec![2]);
    }

    #[test]
    fn test_write_overwrites() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("repos.csv");
        write_identifiers(&path, ["old/one", "old/two", "old/three"]).unwrap();
        write_identifiers(&path, ["new/one"]).unwrap();

        let content = fs::read_to_string(&path).unwrap();
        assert_eq!(content, "repo_name\nnew/one\n");
    }
}
