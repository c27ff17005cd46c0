use std::path::PathBuf;
use thiserror::Error;

/// All errors produced by the workout analysis crates.
#[derive(Error, Debug)]
pub enum WorkoutError {
    /// A file could not be opened or read from disk.
    #[error("Failed to read file {path}: {source}")]
    FileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A JSON document could not be parsed.
    #[error("Failed to parse JSON: {0}")]
    JsonParse(#[from] serde_json::Error),

    /// The CSV stream itself was malformed (ragged rows, bad encoding, ...).
    #[error("Failed to parse CSV: {0}")]
    Csv(#[from] csv::Error),

    /// A `Date` cell was empty or did not match `%Y-%m-%d %H:%M:%S`.
    #[error("Invalid date on row {row}: {value:?}")]
    DateParse { row: u64, value: String },

    /// The header row lacks one of the required columns.
    #[error("Missing required column: {0}")]
    MissingColumn(String),

    /// The input file does not exist.
    #[error("Data path not found: {0}")]
    DataPathNotFound(PathBuf),

    /// A configuration value is missing or invalid.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Pass-through for any raw I/O error that does not carry a path.
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// Catch-all for errors from third-party crates via `anyhow`.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl WorkoutError {
    /// `true` for the errors that mean the input could not be understood,
    /// as opposed to errors reaching it.
    pub fn is_format_error(&self) -> bool {
        matches!(
            self,
            WorkoutError::Csv(_) | WorkoutError::DateParse { .. } | WorkoutError::MissingColumn(_)
        )
    }
}

/// Convenience alias used throughout the workout crates.
pub type Result<T> = std::result::Result<T, WorkoutError>;
