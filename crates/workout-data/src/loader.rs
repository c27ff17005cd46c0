//! Front-end facing entry points.
//!
//! Presentation code calls these instead of the reader directly: failures
//! are logged and reported as "no data" (an empty list) rather than
//! propagated.

use std::io::Write;
use std::path::Path;

use chrono::NaiveDate;
use tracing::{info, warn};
use workout_core::error::{Result, WorkoutError};
use workout_core::models::Workout;

use crate::body_part_map::BodyPartMap;
use crate::reader::ingest_path;

/// Load the export at `path`, or an empty list when it is missing or
/// cannot be parsed.
pub fn load(path: &Path, map: &BodyPartMap) -> Vec<Workout> {
    report(ingest_path(path, map))
}

/// Load an uploaded export from raw bytes, or an empty list on failure.
pub fn load_bytes(bytes: &[u8], map: &BodyPartMap) -> Vec<Workout> {
    report(try_load_bytes(bytes, map))
}

/// Stage `bytes` in a temporary file and ingest it.
///
/// The temporary file is removed when this returns, whatever the outcome.
pub fn try_load_bytes(bytes: &[u8], map: &BodyPartMap) -> Result<Vec<Workout>> {
    try_load_bytes_in(&std::env::temp_dir(), bytes, map)
}

fn try_load_bytes_in(dir: &Path, bytes: &[u8], map: &BodyPartMap) -> Result<Vec<Workout>> {
    let mut staged = tempfile::Builder::new()
        .prefix("workout-upload-")
        .suffix(".csv")
        .tempfile_in(dir)?;
    staged.write_all(bytes)?;
    staged.flush()?;

    ingest_path(staged.path(), map)
}

/// Keep the workouts whose date falls in `range`, inclusive at both ends.
///
/// Only the calendar date is compared. Unless `range` holds exactly two
/// bounds, every workout is returned.
pub fn filter_by_date_range<'a>(workouts: &'a [Workout], range: &[NaiveDate]) -> Vec<&'a Workout> {
    let [start, end] = range else {
        return workouts.iter().collect();
    };
    workouts
        .iter()
        .filter(|w| {
            let day = w.date.date();
            *start <= day && day <= *end
        })
        .collect()
}

fn report(result: Result<Vec<Workout>>) -> Vec<Workout> {
    match result {
        Ok(workouts) => workouts,
        Err(WorkoutError::DataPathNotFound(path)) => {
            info!("No workout export at {}", path.display());
            Vec::new()
        }
        Err(e) => {
            warn!(error = %e, "failed to load workout export");
            Vec::new()
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
