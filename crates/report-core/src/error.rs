use std::path::PathBuf;
use thiserror::Error;

/// All errors produced by the Slurm report.
#[derive(Error, Debug)]
pub enum ReportError {
    /// A view was requested before `load_process()` populated the job table.
    #[error("Data not loaded. Run load_process() first.")]
    NotLoaded,

    /// A column required by the current operation is absent from a table.
    #[error("Required column '{column}' not found in {table} table")]
    MissingColumn {
        table: &'static str,
        column: &'static str,
    },

    /// A file could not be opened or read from disk.
    #[error("Failed to read file {path}: {source}")]
    FileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A CSV document could not be parsed.
    #[error("Failed to parse CSV {path}: {source}")]
    CsvParse {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    /// An error originating from the terminal / TUI layer.
    #[error("Terminal error: {0}")]
    Terminal(String),

    /// Pass-through for any raw I/O error that does not carry a path.
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Convenience alias used throughout the report crates.
pub type Result<T> = std::result::Result<T, ReportError>;
