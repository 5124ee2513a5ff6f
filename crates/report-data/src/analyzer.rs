//! Load, join and enrich the job table.
//!
//! [`SlurmAnalyzer`] owns the two input paths and, after
//! [`load_process`](SlurmAnalyzer::load_process), the joined [`JobTable`].
//! The read-only views live in [`crate::aggregator`].

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use report_core::error::{ReportError, Result};
use report_core::models::{Column, JobTable};
use report_core::time_utils::minutes_between;
use tracing::{debug, info, warn};

use crate::reader::{read_csv, CsvTable, JobRow, UserRow};

// ── LoadSummary ───────────────────────────────────────────────────────────────

/// What happened while loading, for console status output.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoadSummary {
    /// Rows in the job table (unchanged by the join).
    pub jobs: usize,
    /// Rows in the user table.
    pub users: usize,
    /// Whether user names were joined onto the jobs.
    pub merged: bool,
    /// Jobs whose `id_user` had no match in the user table.
    pub unmatched_jobs: usize,
    /// User ids that appeared more than once in the user table.
    pub duplicate_user_ids: usize,
}

// ── SlurmAnalyzer ─────────────────────────────────────────────────────────────

/// Analyzer over one job export and one user export.
#[derive(Debug, Clone)]
pub struct SlurmAnalyzer {
    job_file: PathBuf,
    user_file: PathBuf,
    jobs: Option<JobTable>,
}

impl SlurmAnalyzer {
    /// Create an analyzer for the given files. Nothing is read yet.
    pub fn new(job_file: impl Into<PathBuf>, user_file: impl Into<PathBuf>) -> Self {
        Self {
            job_file: job_file.into(),
            user_file: user_file.into(),
            jobs: None,
        }
    }

    pub fn job_file(&self) -> &Path {
        &self.job_file
    }

    pub fn user_file(&self) -> &Path {
        &self.user_file
    }

    /// Read both files, join user names, convert timestamps and derive the
    /// timing columns.
    ///
    /// On error the analyzer keeps its previous state; a fresh analyzer stays
    /// unloaded.
    pub fn load_process(&mut self) -> Result<LoadSummary> {
        let job_rows: CsvTable<JobRow> = read_csv(&self.job_file)?;
        let user_rows: CsvTable<UserRow> = read_csv(&self.user_file)?;

        let columns: Vec<Column> = Column::SOURCE
            .into_iter()
            .filter(|c| job_rows.has_column(c.name()))
            .collect();
        let records = job_rows
            .records
            .into_iter()
            .map(JobRow::into_record)
            .collect();
        let mut table = JobTable::new(columns, records);

        let mut summary = LoadSummary {
            jobs: table.len(),
            users: user_rows.len(),
            ..Default::default()
        };

        merge_user_names(&mut table, &user_rows, &mut summary)?;
        derive_timings(&mut table);

        info!(
            "Processing complete: {} jobs, {} users ({} jobs without a matching user)",
            summary.jobs, summary.users, summary.unmatched_jobs
        );

        self.jobs = Some(table);
        Ok(summary)
    }

    pub fn is_loaded(&self) -> bool {
        self.jobs.is_some()
    }

    /// The loaded job table, or [`ReportError::NotLoaded`].
    pub fn jobs(&self) -> Result<&JobTable> {
        self.jobs.as_ref().ok_or(ReportError::NotLoaded)
    }

    /// Build an analyzer around an already prepared table.
    pub fn from_table(table: JobTable) -> Self {
        Self {
            job_file: PathBuf::new(),
            user_file: PathBuf::new(),
            jobs: Some(table),
        }
    }
}

// ── Pipeline steps ────────────────────────────────────────────────────────────

/// Left-join `user_name` onto the jobs by `id_user`.
///
/// Skipped unless the jobs carry `id_user` and the users carry `user_name`.
/// The job row count never changes: a duplicated user id resolves to its
/// first row. A job without a match keeps its own `user_name`, if any.
fn merge_user_names(
    table: &mut JobTable,
    users: &CsvTable<UserRow>,
    summary: &mut LoadSummary,
) -> Result<()> {
    if !table.has_column(Column::IdUser) || !users.has_column(Column::UserName.name()) {
        debug!("Skipping user join: id_user or user_name column absent");
        return Ok(());
    }
    if !users.has_column(Column::IdUser.name()) {
        return Err(ReportError::MissingColumn {
            table: "users",
            column: Column::IdUser.name(),
        });
    }

    let mut names: HashMap<String, Option<&str>> = HashMap::with_capacity(users.len());
    for user in &users.records {
        let Some(id) = user.id_user.as_deref() else {
            continue;
        };
        let key = normalize_key(id);
        if names.contains_key(&key) {
            summary.duplicate_user_ids += 1;
            continue;
        }
        names.insert(key, user.user_name.as_deref());
    }
    if summary.duplicate_user_ids > 0 {
        warn!(
            "{} duplicate user ids in user table; keeping the first row of each",
            summary.duplicate_user_ids
        );
    }

    for job in &mut table.jobs {
        let joined = job
            .id_user
            .as_deref()
            .and_then(|id| names.get(&normalize_key(id)));
        match joined {
            Some(Some(name)) => job.user_name = Some((*name).to_string()),
            Some(None) => {}
            None => summary.unmatched_jobs += 1,
        }
    }

    table.add_column(Column::UserName);
    summary.merged = true;
    Ok(())
}

/// Compute `job_duration_min` and `wait_time_min` for every job.
///
/// A derived column is only added when both of its source columns exist.
fn derive_timings(table: &mut JobTable) {
    let has_duration = table.has_column(Column::TimeStart) && table.has_column(Column::TimeEnd);
    let has_wait = table.has_column(Column::TimeSubmit) && table.has_column(Column::TimeStart);

    for job in &mut table.jobs {
        if has_duration {
            job.job_duration_min = minutes_between(job.time_start, job.time_end);
        }
        if has_wait {
            job.wait_time_min = minutes_between(job.time_submit, job.time_start);
        }
    }

    if has_duration {
        table.add_column(Column::JobDurationMin);
    } else {
        warn!("time_start/time_end absent; job_duration_min not computed");
    }
    if has_wait {
        table.add_column(Column::WaitTimeMin);
    } else {
        warn!("time_submit/time_start absent; wait_time_min not computed");
    }
}

/// Join key for user ids: trimmed, with integral numbers in canonical form so
/// that `"7"` and `"7.0"` match.
fn normalize_key(raw: &str) -> String {
    let trimmed = raw.trim();
    match trimmed.parse::<f64>() {
        Ok(v) if v.is_finite() && v.fract() == 0.0 && v.abs() < 9.007_199_254_740_992e15 => {
            format!("{}", v as i64)
        }
        _ => trimmed.to_string(),
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
