//! Read-only views over the loaded job table.
//!
//! [`JobAggregator`] works on a [`JobTable`] directly; the matching
//! [`SlurmAnalyzer`] methods add the "data loaded" precondition.

use std::cmp::Ordering;
use std::collections::{BTreeMap, HashMap};

use report_core::error::Result;
use report_core::models::{
    Column, DailyCount, JobTable, MonthlyCount, TimingStats, TimingSummary, UserJobCount,
    UserMonthlySeries, UserResourceUsage,
};
use report_core::time_utils::{day_range, month_key};

use crate::analyzer::SlurmAnalyzer;

/// Default row limit of the ranking views.
pub const DEFAULT_TOP_N: usize = 10;

/// Number of users followed by the monthly trend.
pub const MONTHLY_TREND_USERS: usize = 5;

// ── JobAggregator ─────────────────────────────────────────────────────────────

/// Stateless helper computing the report views.
pub struct JobAggregator;

impl JobAggregator {
    /// Jobs per user, descending by count with ties by name. Jobs without a
    /// user name are not counted.
    pub fn job_counts(table: &JobTable) -> Result<Vec<UserJobCount>> {
        table.require(&[Column::UserName])?;

        let mut counts: HashMap<&str, u64> = HashMap::new();
        for name in table.jobs.iter().filter_map(|j| j.user_name.as_deref()) {
            *counts.entry(name).or_default() += 1;
        }

        let mut result: Vec<UserJobCount> = counts
            .into_iter()
            .map(|(name, count)| UserJobCount {
                user_name: name.to_string(),
                job_count: count,
            })
            .collect();
        result.sort_by(|a, b| {
            b.job_count
                .cmp(&a.job_count)
                .then_with(|| a.user_name.cmp(&b.user_name))
        });
        Ok(result)
    }

    /// The `top_n` users with the most jobs.
    pub fn top_users(table: &JobTable, top_n: usize) -> Result<Vec<UserJobCount>> {
        let mut counts = Self::job_counts(table)?;
        counts.truncate(top_n);
        Ok(counts)
    }

    /// Requested CPUs and memory summed per user; the `top_n` users with the
    /// largest CPU total. Missing cells count as zero.
    pub fn resource_usage(table: &JobTable, top_n: usize) -> Result<Vec<UserResourceUsage>> {
        table.require(&[Column::CpusReq, Column::MemReq, Column::UserName])?;

        let mut totals: HashMap<&str, (f64, f64)> = HashMap::new();
        for job in &table.jobs {
            let Some(name) = job.user_name.as_deref() else {
                continue;
            };
            let entry = totals.entry(name).or_default();
            entry.0 += job.cpus_req.unwrap_or(0.0);
            entry.1 += job.mem_req.unwrap_or(0.0);
        }

        let mut usage: Vec<UserResourceUsage> = totals
            .into_iter()
            .map(|(name, (cpus, mem))| UserResourceUsage {
                user_name: name.to_string(),
                cpus_req: cpus,
                mem_req: mem,
            })
            .collect();
        usage.sort_by(|a, b| {
            b.cpus_req
                .partial_cmp(&a.cpus_req)
                .unwrap_or(Ordering::Equal)
                .then_with(|| a.user_name.cmp(&b.user_name))
        });
        usage.truncate(top_n);
        Ok(usage)
    }

    /// Jobs submitted per calendar month for each of the `users` busiest
    /// users. Months without jobs are omitted; jobs without a submit time are
    /// ignored.
    pub fn monthly_trend(table: &JobTable, users: usize) -> Result<Vec<UserMonthlySeries>> {
        table.require(&[Column::TimeSubmit, Column::UserName])?;

        let top = Self::top_users(table, users)?;
        let mut per_user: HashMap<&str, BTreeMap<String, u64>> = top
            .iter()
            .map(|u| (u.user_name.as_str(), BTreeMap::new()))
            .collect();

        for job in &table.jobs {
            let (Some(name), Some(submitted)) = (job.user_name.as_deref(), job.time_submit) else {
                continue;
            };
            if let Some(months) = per_user.get_mut(name) {
                *months.entry(month_key(submitted)).or_default() += 1;
            }
        }

        Ok(top
            .iter()
            .map(|u| {
                let months = per_user
                    .remove(u.user_name.as_str())
                    .unwrap_or_default()
                    .into_iter()
                    .map(|(month, job_count)| MonthlyCount { month, job_count })
                    .collect();
                UserMonthlySeries {
                    user_name: u.user_name.clone(),
                    months,
                }
            })
            .collect())
    }

    /// Jobs submitted per calendar day, from the first to the last submission
    /// day with zero-filled gaps.
    pub fn daily_counts(table: &JobTable) -> Result<Vec<DailyCount>> {
        table.require(&[Column::TimeSubmit])?;

        let mut by_day: BTreeMap<chrono::NaiveDate, u64> = BTreeMap::new();
        for submitted in table.jobs.iter().filter_map(|j| j.time_submit) {
            *by_day.entry(submitted.date_naive()).or_default() += 1;
        }

        let (Some(&first), Some(&last)) = (by_day.keys().next(), by_day.keys().next_back())
        else {
            return Ok(Vec::new());
        };

        Ok(day_range(first, last)
            .map(|date| DailyCount {
                date,
                job_count: by_day.get(&date).copied().unwrap_or(0),
            })
            .collect())
    }

    /// Count, mean and max of the derived duration and wait columns.
    pub fn timing_summary(table: &JobTable) -> Result<TimingSummary> {
        table.require(&[Column::JobDurationMin, Column::WaitTimeMin])?;

        Ok(TimingSummary {
            job_duration: TimingStats::from_values(table.jobs.iter().map(|j| j.job_duration_min)),
            wait_time: TimingStats::from_values(table.jobs.iter().map(|j| j.wait_time_min)),
        })
    }
}

// ── SlurmAnalyzer views ───────────────────────────────────────────────────────

impl SlurmAnalyzer {
    /// Top `top_n` users by job count (see [`DEFAULT_TOP_N`]).
    pub fn analyze_jobs_user(&self, top_n: usize) -> Result<Vec<UserJobCount>> {
        JobAggregator::top_users(self.jobs()?, top_n)
    }

    /// CPU and RAM totals of the `top_n` heaviest CPU users.
    pub fn cpu_ram_usage(&self, top_n: usize) -> Result<Vec<UserResourceUsage>> {
        JobAggregator::resource_usage(self.jobs()?, top_n)
    }

    /// Monthly job counts of the top five users.
    pub fn cluster_users(&self) -> Result<Vec<UserMonthlySeries>> {
        JobAggregator::monthly_trend(self.jobs()?, MONTHLY_TREND_USERS)
    }

    /// Contiguous daily submission counts.
    pub fn jobs_day(&self) -> Result<Vec<DailyCount>> {
        JobAggregator::daily_counts(self.jobs()?)
    }

    /// Summary of the derived timing columns.
    pub fn timing_summary(&self) -> Result<TimingSummary> {
        JobAggregator::timing_summary(self.jobs()?)
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
