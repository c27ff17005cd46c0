use std::fs::OpenOptions;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use tracing_subscriber::{fmt, prelude::*, EnvFilter};
use workout_core::settings::app_dir;

/// File name looked for when no export is given on the command line.
const DEFAULT_EXPORT_NAME: &str = "strong.csv";

// ── Directory bootstrap ────────────────────────────────────────────────────────

/// Ensure `~/.workout-analysis/` and its `logs/` subdirectory exist.
pub fn ensure_directories() -> anyhow::Result<()> {
    let dir = app_dir();
    std::fs::create_dir_all(&dir)?;
    std::fs::create_dir_all(dir.join("logs"))?;
    Ok(())
}

// ── Logging bootstrap ──────────────────────────────────────────────────────────

/// Map a user-facing level name to an [`EnvFilter`] directive.
///
/// Unknown strings are passed through so that full directives such as
/// `workout_data=debug` keep working.
fn level_directive(log_level: &str) -> String {
    match log_level.to_uppercase().as_str() {
        "DEBUG" => "debug".to_string(),
        "INFO" => "info".to_string(),
        "WARNING" | "WARN" => "warn".to_string(),
        "ERROR" | "CRITICAL" => "error".to_string(),
        _ => log_level.to_string(),
    }
}

/// Initialise the global `tracing` subscriber.
///
/// Output goes to stderr, or is appended to `log_file` (without colours)
/// when one is given. Falls back to `info` if the level is not recognised.
pub fn setup_logging(log_level: &str, log_file: Option<&PathBuf>) -> anyhow::Result<()> {
    let filter =
        EnvFilter::try_new(level_directive(log_level)).unwrap_or_else(|_| EnvFilter::new("info"));

    let file_layer = match log_file {
        Some(path) => {
            if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                std::fs::create_dir_all(parent)?;
            }
            let file = OpenOptions::new().create(true).append(true).open(path)?;
            Some(
                fmt::layer()
                    .with_ansi(false)
                    .with_target(false)
                    .with_writer(Mutex::new(file)),
            )
        }
        None => None,
    };
    let stderr_layer = file_layer.is_none().then(|| {
        fmt::layer()
            .with_target(false)
            .with_writer(std::io::stderr)
    });

    tracing_subscriber::registry()
        .with(filter)
        .with(file_layer)
        .with(stderr_layer)
        .try_init()?;

    Ok(())
}

// ── Data-path discovery ────────────────────────────────────────────────────────

/// Locate a Strong export when none was given.
///
/// Checks `~/.workout-analysis/strong.csv`, then `./strong.csv`.
pub fn discover_data_path() -> Option<PathBuf> {
    discover_data_path_in(&app_dir(), Path::new("."))
}

fn discover_data_path_in(app_dir: &Path, cwd: &Path) -> Option<PathBuf> {
    [app_dir.join(DEFAULT_EXPORT_NAME), cwd.join(DEFAULT_EXPORT_NAME)]
        .into_iter()
        .find(|p| p.is_file())
}

// ── Tests ──────────────────────────────────────────────────────────────────────
