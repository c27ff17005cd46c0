//! CSV ingestion for Strong workout exports.
//!
//! Every row of the export is one performed set. Rows are folded into
//! [`Workout`]s (grouped by the raw `Date` text and the workout name), then
//! [`Exercise`]s (grouped by exact name), then [`ExerciseSet`]s.

use std::collections::HashMap;
use std::io::Read;
use std::path::Path;

use chrono::NaiveDateTime;
use serde::Deserialize;
use tracing::{debug, info};
use workout_core::duration::parse_duration;
use workout_core::error::{Result, WorkoutError};
use workout_core::models::{Exercise, ExerciseSet, Workout, WorkoutKey};

use crate::body_part_map::BodyPartMap;

/// Format of the `Date` column.
pub const DATE_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Columns that must be present in the header row.
pub const REQUIRED_COLUMNS: [&str; 9] = [
    "Date",
    "Workout Name",
    "Duration",
    "Exercise Name",
    "Set Order",
    "Weight",
    "Reps",
    "Notes",
    "Workout Notes",
];

// ── Public API ────────────────────────────────────────────────────────────────

/// Ingest an export from any reader.
///
/// Fails on a missing required column, a malformed CSV record, or a `Date`
/// that is empty or not in [`DATE_FORMAT`]. Every other field falls back to
/// its default.
pub fn ingest<R: Read>(source: R, map: &BodyPartMap) -> Result<Vec<Workout>> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(source);

    let headers = reader.headers()?.clone();
    for column in REQUIRED_COLUMNS {
        if !headers.iter().any(|h| h == column) {
            return Err(WorkoutError::MissingColumn(column.to_string()));
        }
    }

    let mut folder = WorkoutFolder::default();
    let mut rows = 0u64;

    for (idx, record) in reader.deserialize::<ExportRow>().enumerate() {
        let row = record?;
        rows += 1;
        folder.add_row(idx as u64 + 1, row, map)?;
    }

    let workouts = folder.finish();
    info!(rows, workouts = workouts.len(), "ingested workout export");
    Ok(workouts)
}

/// Ingest the export stored at `path`.
pub fn ingest_path(path: &Path, map: &BodyPartMap) -> Result<Vec<Workout>> {
    if !path.exists() {
        return Err(WorkoutError::DataPathNotFound(path.to_path_buf()));
    }
    let file = std::fs::File::open(path).map_err(|source| WorkoutError::FileRead {
        path: path.to_path_buf(),
        source,
    })?;
    debug!("Reading workout export {}", path.display());
    ingest(std::io::BufReader::new(file), map)
}

// ── Row model ─────────────────────────────────────────────────────────────────

/// The consumed columns of one export row, as raw text. Cells missing from
/// a short row read as empty.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct ExportRow {
    #[serde(rename = "Date")]
    date: String,
    #[serde(rename = "Workout Name")]
    workout_name: String,
    #[serde(rename = "Duration")]
    duration: String,
    #[serde(rename = "Exercise Name")]
    exercise_name: String,
    #[serde(rename = "Set Order")]
    set_order: String,
    #[serde(rename = "Weight")]
    weight: String,
    #[serde(rename = "Reps")]
    reps: String,
    #[serde(rename = "Notes")]
    notes: String,
    #[serde(rename = "Workout Notes")]
    workout_notes: String,
}

// ── Folding ───────────────────────────────────────────────────────────────────

/// Accumulates workouts in first-seen order with O(1) lookup by key.
#[derive(Default)]
struct WorkoutFolder {
    workouts: Vec<Workout>,
    index: HashMap<WorkoutKey, usize>,
}

impl WorkoutFolder {
    fn add_row(&mut self, row_number: u64, row: ExportRow, map: &BodyPartMap) -> Result<()> {
        let date = parse_date(row_number, &row.date)?;
        let set_number = parse_set_order(&row.set_order);
        let weight = parse_weight(&row.weight);
        let reps = parse_reps(&row.reps);

        let key = Workout::key(&row.date, &row.workout_name);
        let idx = match self.index.get(&key) {
            Some(&idx) => idx,
            None => {
                // Workout-level columns are taken from the first row only.
                let duration = parse_duration(&row.duration);
                self.workouts.push(Workout::new(
                    row.workout_name.clone(),
                    date,
                    duration,
                    row.workout_notes,
                ));
                let idx = self.workouts.len() - 1;
                self.index.insert(key, idx);
                idx
            }
        };

        let workout = &mut self.workouts[idx];
        let exercise = workout.exercise_or_insert_with(&row.exercise_name, || {
            Exercise::new(row.exercise_name.clone(), map.resolve(&row.exercise_name))
        });
        exercise.exercise_sets.push(ExerciseSet {
            workout: row.workout_name,
            date,
            set_number,
            weight,
            reps,
            notes: row.notes,
        });

        Ok(())
    }

    fn finish(self) -> Vec<Workout> {
        self.workouts
    }
}

// ── Field parsing ─────────────────────────────────────────────────────────────

fn parse_date(row: u64, raw: &str) -> Result<NaiveDateTime> {
    NaiveDateTime::parse_from_str(raw, DATE_FORMAT).map_err(|_| WorkoutError::DateParse {
        row,
        value: raw.to_string(),
    })
}

/// Integer set position; 1 when blank or not a number (e.g. warm-up `W`).
fn parse_set_order(raw: &str) -> u32 {
    raw.trim().parse().unwrap_or(1)
}

/// Weight truncated to a whole number (`"135.0"` → 135); 0 when blank,
/// unparseable or negative.
fn parse_weight(raw: &str) -> u32 {
    parse_truncated(raw).unwrap_or(0)
}

/// Rep count; 0 when blank, unparseable or negative.
fn parse_reps(raw: &str) -> u32 {
    let trimmed = raw.trim();
    trimmed
        .parse::<u32>()
        .ok()
        .or_else(|| parse_truncated(trimmed))
        .unwrap_or(0)
}

fn parse_truncated(raw: &str) -> Option<u32> {
    let value = raw.trim().parse::<f64>().ok()?;
    if !value.is_finite() || value < 0.0 {
        return None;
    }
    // `as` saturates at u32::MAX.
    Some(value.trunc() as u32)
}

// ── Tests ─────────────────────────────────────────────────────────────────────
