//! CSV loading for the job and user exports.
//!
//! Rows are deserialised with serde into lenient row types: every cell is
//! optional and numeric cells that fail to parse become `None` rather than
//! aborting the load.

use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use chrono::{DateTime, Utc};
use report_core::error::{ReportError, Result};
use report_core::models::JobRecord;
use report_core::time_utils::from_epoch_seconds;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use tracing::debug;

// ── Row types ─────────────────────────────────────────────────────────────────

/// One line of the job export. Columns absent from the header deserialise to
/// `None`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct JobRow {
    pub id_user: Option<String>,
    pub user_name: Option<String>,
    #[serde(deserialize_with = "csv::invalid_option")]
    pub time_submit: Option<f64>,
    #[serde(deserialize_with = "csv::invalid_option")]
    pub time_eligible: Option<f64>,
    #[serde(deserialize_with = "csv::invalid_option")]
    pub time_start: Option<f64>,
    #[serde(deserialize_with = "csv::invalid_option")]
    pub time_end: Option<f64>,
    #[serde(deserialize_with = "csv::invalid_option")]
    pub mod_time: Option<f64>,
    #[serde(deserialize_with = "csv::invalid_option")]
    pub cpus_req: Option<f64>,
    #[serde(deserialize_with = "csv::invalid_option")]
    pub mem_req: Option<f64>,
}

impl JobRow {
    /// Convert epoch seconds to timestamps; invalid values become `None`.
    pub fn into_record(self) -> JobRecord {
        let ts = |v: Option<f64>| -> Option<DateTime<Utc>> { v.and_then(from_epoch_seconds) };
        JobRecord {
            id_user: self.id_user,
            user_name: self.user_name,
            time_submit: ts(self.time_submit),
            time_eligible: ts(self.time_eligible),
            time_start: ts(self.time_start),
            time_end: ts(self.time_end),
            mod_time: ts(self.mod_time),
            cpus_req: self.cpus_req.filter(|v| v.is_finite()),
            mem_req: self.mem_req.filter(|v| v.is_finite()),
            job_duration_min: None,
            wait_time_min: None,
        }
    }
}

/// One line of the user export.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct UserRow {
    pub id_user: Option<String>,
    pub user_name: Option<String>,
}

// ── CsvTable ──────────────────────────────────────────────────────────────────

/// A parsed CSV file: its header names and typed rows.
#[derive(Debug, Clone)]
pub struct CsvTable<T> {
    pub headers: Vec<String>,
    pub records: Vec<T>,
}

impl<T> CsvTable<T> {
    pub fn has_column(&self, name: &str) -> bool {
        self.headers.iter().any(|h| h == name)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// Read a comma-delimited file with a header row into a [`CsvTable`].
///
/// Surrounding whitespace is trimmed from headers and cells.
pub fn read_csv<T: DeserializeOwned>(path: &Path) -> Result<CsvTable<T>> {
    let file = File::open(path).map_err(|source| ReportError::FileRead {
        path: path.to_path_buf(),
        source,
    })?;
    let csv_error = |source: csv::Error| ReportError::CsvParse {
        path: path.to_path_buf(),
        source,
    };

    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(BufReader::new(file));

    let headers: Vec<String> = reader
        .headers()
        .map_err(csv_error)?
        .iter()
        .map(str::to_string)
        .collect();

    let records = reader
        .deserialize()
        .collect::<std::result::Result<Vec<T>, _>>()
        .map_err(csv_error)?;

    debug!(
        "Read {} rows with {} columns from {}",
        records.len(),
        headers.len(),
        path.display()
    );

    Ok(CsvTable { headers, records })
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use std::path::PathBuf;
    use tempfile::TempDir;

    fn write_csv(dir: &Path, name: &str, lines: &[&str]) -> PathBuf {
        let path = dir.join(name);
        let mut file = std::fs::File::create(&path).unwrap();
        for line in lines {
            writeln!(file, "{}", line).unwrap();
        }
        path
    }

    // ── read_csv ──────────────────────────────────────────────────────────────

    #[test]
    fn test_read_user_table() {
        let dir = TempDir::new().unwrap();
        let path = write_csv(
            dir.path(),
            "users.csv",
            &["id_user,user_name", "1,alice", "2,bob"],
        );

        let table: CsvTable<UserRow> = read_csv(&path).unwrap();
        assert_eq!(table.len(), 2);
        assert!(table.has_column("id_user"));
        assert!(table.has_column("user_name"));
        assert_eq!(table.records[1].user_name.as_deref(), Some("bob"));
    }

    #[test]
    fn test_read_csv_trims_headers_and_cells() {
        let dir = TempDir::new().unwrap();
        let path = write_csv(dir.path(), "users.csv", &[" id_user , user_name ", " 7 ,  carol "]);

        let table: CsvTable<UserRow> = read_csv(&path).unwrap();
        assert!(table.has_column("user_name"));
        assert_eq!(table.records[0].id_user.as_deref(), Some("7"));
        assert_eq!(table.records[0].user_name.as_deref(), Some("carol"));
    }

    #[test]
    fn test_read_job_rows_missing_columns_default_to_none() {
        let dir = TempDir::new().unwrap();
        let path = write_csv(dir.path(), "jobs.csv", &["id_job,cpus_req", "10,4"]);

        let table: CsvTable<JobRow> = read_csv(&path).unwrap();
        assert!(!table.has_column("time_submit"));
        let row = &table.records[0];
        assert_eq!(row.cpus_req, Some(4.0));
        assert!(row.time_submit.is_none());
        assert!(row.id_user.is_none());
    }

    #[test]
    fn test_read_job_rows_invalid_numbers_become_none() {
        let dir = TempDir::new().unwrap();
        let path = write_csv(
            dir.path(),
            "jobs.csv",
            &[
                "id_user,time_submit,cpus_req,mem_req",
                "1,not-a-time,lots,",
            ],
        );

        let table: CsvTable<JobRow> = read_csv(&path).unwrap();
        let row = &table.records[0];
        assert!(row.time_submit.is_none());
        assert!(row.cpus_req.is_none());
        assert!(row.mem_req.is_none());
    }

    #[test]
    fn test_read_csv_missing_file() {
        let err = read_csv::<UserRow>(Path::new("/tmp/does-not-exist-report-xyz.csv")).unwrap_err();
        assert!(matches!(err, ReportError::FileRead { .. }));
    }

    #[test]
    fn test_read_csv_ragged_row_is_parse_error() {
        let dir = TempDir::new().unwrap();
        let path = write_csv(dir.path(), "users.csv", &["id_user,user_name", "1,alice,extra"]);

        let err = read_csv::<UserRow>(&path).unwrap_err();
        assert!(matches!(err, ReportError::CsvParse { .. }));
    }

    #[test]
    fn test_read_csv_header_only() {
        let dir = TempDir::new().unwrap();
        let path = write_csv(dir.path(), "users.csv", &["id_user,user_name"]);

        let table: CsvTable<UserRow> = read_csv(&path).unwrap();
        assert!(table.is_empty());
        assert_eq!(table.headers, vec!["id_user", "user_name"]);
    }

    // ── JobRow::into_record ───────────────────────────────────────────────────

    #[test]
    fn test_into_record_converts_epochs() {
        let row = JobRow {
            time_submit: Some(1_700_000_000.0),
            time_start: Some(f64::NAN),
            cpus_req: Some(f64::INFINITY),
            mem_req: Some(2048.0),
            ..Default::default()
        };
        let record = row.into_record();
        assert_eq!(record.time_submit.unwrap().timestamp(), 1_700_000_000);
        assert!(record.time_start.is_none());
        assert!(record.cpus_req.is_none());
        assert_eq!(record.mem_req, Some(2048.0));
    }
}
