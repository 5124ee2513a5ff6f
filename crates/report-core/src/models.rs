use std::collections::BTreeSet;
use std::fmt;

use chrono::{DateTime, NaiveDate, Utc};

use crate::error::{ReportError, Result};

/// A named column of the job table, either read from the CSV header or
/// derived while loading.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Column {
    IdUser,
    UserName,
    TimeSubmit,
    TimeEligible,
    TimeStart,
    TimeEnd,
    ModTime,
    CpusReq,
    MemReq,
    /// Derived: `time_end - time_start` in minutes.
    JobDurationMin,
    /// Derived: `time_start - time_submit` in minutes.
    WaitTimeMin,
}

impl Column {
    /// Epoch-second columns converted to timestamps during loading.
    pub const TIMESTAMPS: [Column; 5] = [
        Column::TimeSubmit,
        Column::TimeEligible,
        Column::TimeStart,
        Column::TimeEnd,
        Column::ModTime,
    ];

    /// Columns that may appear in the job CSV header.
    pub const SOURCE: [Column; 9] = [
        Column::IdUser,
        Column::UserName,
        Column::TimeSubmit,
        Column::TimeEligible,
        Column::TimeStart,
        Column::TimeEnd,
        Column::ModTime,
        Column::CpusReq,
        Column::MemReq,
    ];

    /// The header name used in the CSV exports.
    pub const fn name(self) -> &'static str {
        match self {
            Column::IdUser => "id_user",
            Column::UserName => "user_name",
            Column::TimeSubmit => "time_submit",
            Column::TimeEligible => "time_eligible",
            Column::TimeStart => "time_start",
            Column::TimeEnd => "time_end",
            Column::ModTime => "mod_time",
            Column::CpusReq => "cpus_req",
            Column::MemReq => "mem_req",
            Column::JobDurationMin => "job_duration_min",
            Column::WaitTimeMin => "wait_time_min",
        }
    }
}

impl fmt::Display for Column {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// One job after the user join and timestamp conversion.
///
/// Every cell is optional: an empty or unparseable source value is stored as
/// `None` instead of failing the load.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct JobRecord {
    pub id_user: Option<String>,
    pub user_name: Option<String>,
    pub time_submit: Option<DateTime<Utc>>,
    pub time_eligible: Option<DateTime<Utc>>,
    pub time_start: Option<DateTime<Utc>>,
    pub time_end: Option<DateTime<Utc>>,
    pub mod_time: Option<DateTime<Utc>>,
    pub cpus_req: Option<f64>,
    pub mem_req: Option<f64>,
    pub job_duration_min: Option<f64>,
    pub wait_time_min: Option<f64>,
}

/// The in-memory job table: its rows plus the set of columns that exist.
///
/// Column presence is tracked apart from cell values so that an absent column
/// (an error for the views) can be told apart from an empty cell (skipped).
#[derive(Debug, Clone, Default)]
pub struct JobTable {
    columns: BTreeSet<Column>,
    pub jobs: Vec<JobRecord>,
}

impl JobTable {
    pub fn new(columns: impl IntoIterator<Item = Column>, jobs: Vec<JobRecord>) -> Self {
        Self {
            columns: columns.into_iter().collect(),
            jobs,
        }
    }

    pub fn has_column(&self, column: Column) -> bool {
        self.columns.contains(&column)
    }

    /// Mark `column` as present (used for joined and derived columns).
    pub fn add_column(&mut self, column: Column) {
        self.columns.insert(column);
    }

    pub fn columns(&self) -> impl Iterator<Item = Column> + '_ {
        self.columns.iter().copied()
    }

    /// Fail with [`ReportError::MissingColumn`] unless every column exists.
    pub fn require(&self, columns: &[Column]) -> Result<()> {
        match columns.iter().find(|c| !self.has_column(**c)) {
            Some(missing) => Err(ReportError::MissingColumn {
                table: "jobs",
                column: missing.name(),
            }),
            None => Ok(()),
        }
    }

    pub fn len(&self) -> usize {
        self.jobs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.jobs.is_empty()
    }
}

// ── View results ──────────────────────────────────────────────────────────────

/// Number of jobs submitted by one user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserJobCount {
    pub user_name: String,
    pub job_count: u64,
}

/// Requested CPU and memory summed over all jobs of one user.
#[derive(Debug, Clone, PartialEq)]
pub struct UserResourceUsage {
    pub user_name: String,
    pub cpus_req: f64,
    pub mem_req: f64,
}

/// Job count within one calendar month, keyed `"%Y-%m"`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MonthlyCount {
    pub month: String,
    pub job_count: u64,
}

/// Monthly submission counts of one user, months ascending.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserMonthlySeries {
    pub user_name: String,
    pub months: Vec<MonthlyCount>,
}

/// Job count submitted on one calendar day.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DailyCount {
    pub date: NaiveDate,
    pub job_count: u64,
}

/// Count, mean and maximum of the defined values of a derived column.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct TimingStats {
    pub count: usize,
    pub mean: f64,
    pub max: f64,
}

impl TimingStats {
    /// Summarise `values`, skipping `None`. All-missing input yields zeros.
    pub fn from_values(values: impl IntoIterator<Item = Option<f64>>) -> Self {
        let mut stats = TimingStats {
            max: f64::NEG_INFINITY,
            ..Default::default()
        };
        let mut sum = 0.0;
        for v in values.into_iter().flatten() {
            stats.count += 1;
            sum += v;
            stats.max = stats.max.max(v);
        }
        if stats.count == 0 {
            return TimingStats::default();
        }
        stats.mean = sum / stats.count as f64;
        stats
    }
}

/// Summary of the two derived timing columns.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct TimingSummary {
    pub job_duration: TimingStats,
    pub wait_time: TimingStats,
}
