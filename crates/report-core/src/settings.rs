use clap::Parser;
use std::ffi::OsString;
use std::path::PathBuf;

// ── Settings (CLI) ─────────────────────────────────────────────────────────────

/// Job and user statistics from Slurm accounting exports
#[derive(Parser, Debug, Clone)]
#[command(
    name = "slurm-report",
    about = "Job and user statistics from Slurm accounting exports",
    version
)]
pub struct Settings {
    /// Job table CSV (time_submit, time_start, time_end, cpus_req, mem_req, id_user, ...)
    #[arg(default_value = "ppgi_job_table.csv")]
    pub job_file: PathBuf,

    /// User table CSV (id_user, user_name)
    #[arg(default_value = "user_table.csv")]
    pub user_file: PathBuf,

    /// Number of users shown in the ranking and resource views (1-100)
    #[arg(long, default_value = "5", value_parser = clap::value_parser!(u16).range(1..=100))]
    pub top_n: u16,

    /// Logging level
    #[arg(long, default_value = "INFO", value_parser = ["DEBUG", "INFO", "WARNING", "ERROR"])]
    pub log_level: String,

    /// Enable debug logging
    #[arg(long)]
    pub debug: bool,
}

impl Settings {
    /// Parse the process arguments, exiting with usage on error.
    pub fn load() -> Self {
        Self::from_args(std::env::args_os())
    }

    /// Same as [`load`](Self::load) but with an explicit argument list.
    pub fn from_args<I, T>(args: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString> + Clone,
    {
        let mut settings = Settings::parse_from(args);
        // --debug overrides log level.
        if settings.debug {
            settings.log_level = "DEBUG".to_string();
        }
        settings
    }

    pub fn top_n(&self) -> usize {
        usize::from(self.top_n)
    }
}

// ── Tests ──────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_export_file_names() {
        let settings = Settings::from_args(["slurm-report"]);
        assert_eq!(settings.job_file, PathBuf::from("ppgi_job_table.csv"));
        assert_eq!(settings.user_file, PathBuf::from("user_table.csv"));
        assert_eq!(settings.top_n(), 5);
        assert_eq!(settings.log_level, "INFO");
    }

    #[test]
    fn test_positional_paths_and_top_n() {
        let settings = Settings::from_args([
            "slurm-report",
            "/data/jobs.csv",
            "/data/users.csv",
            "--top-n",
            "12",
        ]);
        assert_eq!(settings.job_file, PathBuf::from("/data/jobs.csv"));
        assert_eq!(settings.user_file, PathBuf::from("/data/users.csv"));
        assert_eq!(settings.top_n(), 12);
    }

    #[test]
    fn test_top_n_out_of_range_rejected() {
        let result = Settings::try_parse_from(["slurm-report", "--top-n", "0"]);
        assert!(result.is_err());
        let result = Settings::try_parse_from(["slurm-report", "--top-n", "101"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_debug_flag_overrides_log_level() {
        let settings = Settings::from_args(["slurm-report", "--log-level", "ERROR", "--debug"]);
        assert_eq!(settings.log_level, "DEBUG");
    }

    #[test]
    fn test_invalid_log_level_rejected() {
        let result = Settings::try_parse_from(["slurm-report", "--log-level", "TRACE"]);
        assert!(result.is_err());
    }
}
