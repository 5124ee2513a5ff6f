mod bootstrap;
mod console;

use anyhow::{Context, Result};
use report_core::error::Result as ReportResult;
use report_core::settings::Settings;
use report_data::analyzer::SlurmAnalyzer;
use report_ui::app::{App, Panel, ReportViews};
use report_ui::themes::Theme;

fn main() -> Result<()> {
    let settings = Settings::load();

    bootstrap::setup_logging(&settings.log_level)?;

    tracing::info!("Slurm Report v{} starting", env!("CARGO_PKG_VERSION"));
    tracing::debug!(
        "Jobs: {}, users: {}, top-n: {}",
        settings.job_file.display(),
        settings.user_file.display(),
        settings.top_n
    );

    bootstrap::check_inputs(&settings.job_file, &settings.user_file)?;

    let mut analyzer = SlurmAnalyzer::new(&settings.job_file, &settings.user_file);
    let summary = analyzer
        .load_process()
        .context("failed to load the job and user tables")?;

    println!("{}", console::load_status(&summary));

    match analyzer.timing_summary() {
        Ok(timing) => console::timing_status(&timing)
            .iter()
            .for_each(|line| println!("{line}")),
        Err(e) => tracing::warn!("Timing summary unavailable: {}", e),
    }

    let top_n = settings.top_n();
    let top_users = panel("top users", analyzer.analyze_jobs_user(top_n));
    if let Panel::Ready(rows) = &top_users {
        console::top_users_table(rows, top_n)
            .iter()
            .for_each(|line| println!("{line}"));
    }

    let views = ReportViews {
        source: bootstrap::source_label(analyzer.job_file(), analyzer.user_file()),
        top_n,
        top_users,
        resources: panel("resource usage", analyzer.cpu_ram_usage(top_n)),
        monthly: panel("monthly trend", analyzer.cluster_users()),
        daily: panel("daily jobs", analyzer.jobs_day()),
    };

    tracing::info!("Opening chart viewer");
    App::new(Theme::auto_detect(), views)
        .run()
        .context("terminal error while showing the charts")?;

    Ok(())
}

/// Turn a view result into a panel, logging why a view is unavailable.
fn panel<T>(name: &str, result: ReportResult<T>) -> Panel<T> {
    if let Err(e) = &result {
        tracing::warn!("View '{}' unavailable: {}", name, e);
    }
    Panel::from(result)
}
