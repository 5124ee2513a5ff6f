use std::path::Path;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

// ── Logging bootstrap ──────────────────────────────────────────────────────────

/// Map a level name such as `WARNING` onto a tracing filter directive.
///
/// Unknown names are passed through lowercased so that full `EnvFilter`
/// directives such as `report_data=debug` still work.
pub fn level_directive(log_level: &str) -> String {
    match log_level.to_uppercase().as_str() {
        "DEBUG" => "debug".to_string(),
        "INFO" => "info".to_string(),
        "WARNING" | "WARN" => "warn".to_string(),
        "ERROR" | "CRITICAL" => "error".to_string(),
        _ => log_level.to_lowercase(),
    }
}

/// Initialise the global `tracing` subscriber.
///
/// Output goes to stderr so it does not interleave with the status report on
/// stdout. Falls back to `"info"` if the directive does not parse.
pub fn setup_logging(log_level: &str) -> anyhow::Result<()> {
    let filter =
        EnvFilter::try_new(level_directive(log_level)).unwrap_or_else(|_| EnvFilter::new("info"));

    let layer = fmt::layer()
        .with_target(false)
        .with_thread_ids(false)
        .with_writer(std::io::stderr);

    tracing_subscriber::registry()
        .with(filter)
        .with(layer)
        .try_init()
        .map_err(|e| anyhow::anyhow!("failed to initialise logging: {e}"))?;

    Ok(())
}

// ── Input discovery ────────────────────────────────────────────────────────────

/// Short label for the two inputs, shown in the TUI header.
pub fn source_label(job_file: &Path, user_file: &Path) -> String {
    format!("{} + {}", file_label(job_file), file_label(user_file))
}

fn file_label(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

/// Fail early with a readable message when an input file is missing.
pub fn check_inputs(job_file: &Path, user_file: &Path) -> anyhow::Result<()> {
    let missing: Vec<String> = [job_file, user_file]
        .iter()
        .filter(|p| !p.is_file())
        .map(|p| p.display().to_string())
        .collect();

    if missing.is_empty() {
        Ok(())
    } else {
        anyhow::bail!("input file(s) not found: {}", missing.join(", "))
    }
}

// ── Tests ──────────────────────────────────────────────────────────────────────
