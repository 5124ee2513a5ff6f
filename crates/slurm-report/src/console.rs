//! Plain-text status printed to stdout before the chart viewer opens.

use report_core::formatting::{format_minutes, format_number, truncate_label};
use report_core::models::{TimingStats, TimingSummary, UserJobCount};
use report_data::analyzer::LoadSummary;

const NAME_WIDTH: usize = 24;

pub fn load_status(summary: &LoadSummary) -> String {
    let mut line = format!(
        "Processing complete: {} jobs, {} users",
        format_number(summary.jobs as f64, 0),
        format_number(summary.users as f64, 0)
    );
    if summary.merged {
        line.push_str(&format!(
            " (user names joined, {} jobs without a matching user)",
            format_number(summary.unmatched_jobs as f64, 0)
        ));
    } else {
        line.push_str(" (user names not joined)");
    }
    line
}

fn timing_line(label: &str, stats: &TimingStats) -> String {
    if stats.count == 0 {
        return format!("{label:<14} no values");
    }
    format!(
        "{label:<14} {} jobs, mean {}, max {}",
        format_number(stats.count as f64, 0),
        format_minutes(stats.mean),
        format_minutes(stats.max)
    )
}

pub fn timing_status(summary: &TimingSummary) -> Vec<String> {
    vec![
        timing_line("Job duration:", &summary.job_duration),
        timing_line("Wait time:", &summary.wait_time),
    ]
}

pub fn top_users_table(rows: &[UserJobCount], top_n: usize) -> Vec<String> {
    let mut lines = vec![format!("Top {top_n} users by job count:")];
    if rows.is_empty() {
        lines.push("  (no jobs with a user name)".to_string());
        return lines;
    }
    for (i, row) in rows.iter().enumerate() {
        lines.push(format!(
            "  {:>3}. {:<width$} {:>10}",
            i + 1,
            truncate_label(&row.user_name, NAME_WIDTH),
            format_number(row.job_count as f64, 0),
            width = NAME_WIDTH
        ));
    }
    lines
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_status_merged() {
        let summary = LoadSummary {
            jobs: 1_500,
            users: 3,
            merged: true,
            unmatched_jobs: 2,
            duplicate_user_ids: 0,
        };
        let line = load_status(&summary);
        assert!(line.starts_with("Processing complete: 1,500 jobs, 3 users"));
        assert!(line.contains("2 jobs without a matching user"));
    }

    #[test]
    fn test_load_status_not_merged() {
        let line = load_status(&LoadSummary::default());
        assert!(line.contains("not joined"));
    }

    #[test]
    fn test_timing_status_handles_empty_stats() {
        let summary = TimingSummary {
            job_duration: TimingStats {
                count: 2,
                mean: 90.0,
                max: 120.0,
            },
            wait_time: TimingStats::default(),
        };
        let lines = timing_status(&summary);
        assert!(lines[0].contains("2 jobs"));
        assert!(lines[0].contains("1h 30m"));
        assert!(lines[1].contains("no values"));
    }

    #[test]
    fn test_top_users_table() {
        let rows = vec![
            UserJobCount {
                user_name: "alice".to_string(),
                job_count: 12_000,
            },
            UserJobCount {
                user_name: "bob".to_string(),
                job_count: 7,
            },
        ];
        let lines = top_users_table(&rows, 5);
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0], "Top 5 users by job count:");
        assert!(lines[1].contains("alice"));
        assert!(lines[1].ends_with("12,000"));
        assert!(lines[2].trim_start().starts_with("2."));
    }

    #[test]
    fn test_top_users_table_empty() {
        let lines = top_users_table(&[], 3);
        assert_eq!(lines.len(), 2);
    }
}
