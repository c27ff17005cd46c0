//! Session-scoped cache of the loaded dataset.
//!
//! Front ends switch between views many times per session; the export is
//! parsed once and the result reused until the source changes or the cache
//! is invalidated. The body-part mapping is loaded once alongside it.

use std::path::PathBuf;
use std::time::{Duration, Instant};

use workout_core::error::{Result, WorkoutError};
use workout_core::models::Workout;
use workout_data::body_part_map::BodyPartMap;
use workout_data::classifier::apply_classifications;
use workout_data::loader::try_load_bytes;
use workout_data::reader::ingest_path;

// ── DataSource ────────────────────────────────────────────────────────────────

/// Where the export comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DataSource {
    /// A CSV file on disk.
    File(PathBuf),
    /// Raw bytes of an uploaded export.
    Upload(Vec<u8>),
}

// ── DataManager ───────────────────────────────────────────────────────────────

/// Load-once wrapper around the ingestion pipeline.
///
/// # Example
/// ```no_run
/// use workout_runtime::data_manager::{DataManager, DataSource};
///
/// let mut mgr = DataManager::new("body_parts.json");
/// mgr.set_source(DataSource::File("strong.csv".into()));
/// println!("{} workouts", mgr.get_data(false).len());
/// ```
pub struct DataManager {
    /// Mapping document location.
    mapping_path: PathBuf,
    source: Option<DataSource>,
    mapping: Option<BodyPartMap>,
    cache: Option<Vec<Workout>>,
    /// When the cache was last populated.
    cache_timestamp: Option<Instant>,
    /// Human-readable description of the last error encountered.
    last_error: Option<String>,
}

impl DataManager {
    pub fn new(mapping_path: impl Into<PathBuf>) -> Self {
        Self {
            mapping_path: mapping_path.into(),
            source: None,
            mapping: None,
            cache: None,
            cache_timestamp: None,
            last_error: None,
        }
    }

    // ── Public API ────────────────────────────────────────────────────────

    /// Point the manager at a new export, discarding the cached workouts.
    pub fn set_source(&mut self, source: DataSource) {
        self.source = Some(source);
        self.invalidate_cache();
    }

    /// The cached workouts, loading them first if needed.
    ///
    /// Failures are recorded in [`last_error`](Self::last_error) and yield
    /// an empty dataset, which is cached like any other result.
    pub fn get_data(&mut self, force_refresh: bool) -> &[Workout] {
        if force_refresh || self.cache.is_none() {
            let workouts = match self.fetch_fresh() {
                Ok(workouts) => {
                    tracing::debug!(workouts = workouts.len(), "workout cache updated");
                    self.last_error = None;
                    workouts
                }
                Err(e) => {
                    tracing::warn!(error = %e, "loading workouts failed; no data");
                    self.last_error = Some(e.to_string());
                    Vec::new()
                }
            };
            self.cache = Some(workouts);
            self.cache_timestamp = Some(Instant::now());
        } else {
            tracing::debug!("returning cached workouts");
        }
        self.cache.as_deref().unwrap_or_default()
    }

    /// The body-part mapping, loaded on first use.
    ///
    /// A mapping document that exists but cannot be read is an error; the
    /// caller decides whether to continue without it.
    pub fn mapping(&mut self) -> Result<&BodyPartMap> {
        if self.mapping.is_none() {
            self.mapping = Some(BodyPartMap::load(self.mapping_path.clone())?);
        }
        self.mapping
            .as_ref()
            .ok_or_else(|| WorkoutError::Config("body-part mapping unavailable".to_string()))
    }

    /// Install an updated mapping (e.g. after a classification session) and
    /// classify cached exercises that it now covers.
    pub fn replace_mapping(&mut self, map: BodyPartMap) -> usize {
        let updated = match self.cache.as_mut() {
            Some(workouts) => apply_classifications(workouts, &map),
            None => 0,
        };
        self.mapping = Some(map);
        updated
    }

    /// Discard cached workouts so the next [`get_data`](Self::get_data)
    /// re-parses the source.
    pub fn invalidate_cache(&mut self) {
        self.cache = None;
        self.cache_timestamp = None;
        tracing::debug!("cache invalidated");
    }

    /// Age of the current cache entry, or `None` if nothing is loaded.
    pub fn cache_age(&self) -> Option<Duration> {
        self.cache_timestamp.map(|ts| ts.elapsed())
    }

    /// Human-readable description of the last load error, or `None`.
    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    // ── Private helpers ───────────────────────────────────────────────────

    fn fetch_fresh(&mut self) -> Result<Vec<Workout>> {
        let source = self
            .source
            .clone()
            .ok_or_else(|| WorkoutError::Config("no workout export selected".to_string()))?;

        if let Err(e) = self.mapping() {
            tracing::warn!(error = %e, "ignoring unreadable body-part mapping");
        }
        let empty;
        let map = match self.mapping.as_ref() {
            Some(map) => map,
            None => {
                empty = BodyPartMap::new(self.mapping_path.clone());
                &empty
            }
        };

        match source {
            DataSource::File(path) => ingest_path(&path, map),
            DataSource::Upload(bytes) => try_load_bytes(&bytes, map),
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;
    use workout_core::body_part::BodyPart;

    const SAMPLE: &str = "\
Date,Workout Name,Duration,Exercise Name,Set Order,Weight,Reps,Notes,Workout Notes
2024-01-01 08:00:00,A,30m,Squat,1,100,5,,
2024-01-01 08:00:00,A,30m,Plank,1,,1,,
";

    /// A manager over a sample export inside `dir`.
    fn make_manager(dir: &TempDir) -> DataManager {
        let csv = dir.path().join("strong.csv");
        std::fs::write(&csv, SAMPLE).unwrap();
        let mut mgr = DataManager::new(dir.path().join("body_parts.json"));
        mgr.set_source(DataSource::File(csv));
        mgr
    }

    // ── cache behaviour ───────────────────────────────────────────────────

    #[test]
    fn test_cache_miss_on_first_call() {
        let dir = TempDir::new().unwrap();
        let mgr = make_manager(&dir);
        assert!(mgr.cache_age().is_none());
        assert!(mgr.last_error().is_none());
    }

    #[test]
    fn test_load_once_then_reuse() {
        let dir = TempDir::new().unwrap();
        let mut mgr = make_manager(&dir);

        assert_eq!(mgr.get_data(false).len(), 1);

        // Removing the source does not matter while the cache is valid.
        std::fs::remove_file(dir.path().join("strong.csv")).unwrap();
        assert_eq!(mgr.get_data(false).len(), 1);
        assert!(mgr.cache_age().is_some());

        // A forced refresh re-reads and finds nothing.
        assert!(mgr.get_data(true).is_empty());
        assert!(mgr.last_error().unwrap().contains("not found"));
    }

    #[test]
    fn test_invalidate_cache() {
        let dir = TempDir::new().unwrap();
        let mut mgr = make_manager(&dir);
        mgr.get_data(false);
        assert!(mgr.cache_age().is_some());

        mgr.invalidate_cache();
        assert!(mgr.cache_age().is_none());
    }

    #[test]
    fn test_no_source_is_empty_with_error() {
        let dir = TempDir::new().unwrap();
        let mut mgr = DataManager::new(dir.path().join("body_parts.json"));
        assert!(mgr.get_data(false).is_empty());
        assert!(mgr.last_error().is_some());
    }

    #[test]
    fn test_upload_source() {
        let dir = TempDir::new().unwrap();
        let mut mgr = DataManager::new(dir.path().join("body_parts.json"));
        mgr.set_source(DataSource::Upload(SAMPLE.as_bytes().to_vec()));
        assert_eq!(mgr.get_data(false).len(), 1);
        assert!(mgr.last_error().is_none());
    }

    #[test]
    fn test_set_source_invalidates() {
        let dir = TempDir::new().unwrap();
        let mut mgr = make_manager(&dir);
        mgr.get_data(false);
        mgr.set_source(DataSource::Upload(b"garbage".to_vec()));
        assert!(mgr.get_data(false).is_empty());
        assert!(mgr.last_error().is_some());
    }

    // ── mapping ───────────────────────────────────────────────────────────

    #[test]
    fn test_mapping_applied_during_load() {
        let dir = TempDir::new().unwrap();
        let mut map = BodyPartMap::new(dir.path().join("body_parts.json"));
        map.insert("Squat", BodyPart::Quads);
        map.save().unwrap();

        let mut mgr = make_manager(&dir);
        let workouts = mgr.get_data(false);
        assert_eq!(workouts[0].exercises[0].body_part, Some(BodyPart::Quads));
        assert_eq!(workouts[0].exercises[1].body_part, None);
    }

    #[test]
    fn test_unreadable_mapping_does_not_block_loading() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("body_parts.json"), "not json").unwrap();

        let mut mgr = make_manager(&dir);
        assert_eq!(mgr.get_data(false).len(), 1);
        assert!(mgr.mapping().is_err());
    }

    #[test]
    fn test_replace_mapping_updates_cache() {
        let dir = TempDir::new().unwrap();
        let mut mgr = make_manager(&dir);
        mgr.get_data(false);

        let mut map = BodyPartMap::new(dir.path().join("body_parts.json"));
        map.insert("Plank", BodyPart::Abs);
        assert_eq!(mgr.replace_mapping(map), 1);

        let workouts = mgr.get_data(false);
        assert_eq!(workouts[0].exercises[1].body_part, Some(BodyPart::Abs));
        assert_eq!(mgr.mapping().unwrap().resolve("Plank"), Some(BodyPart::Abs));
    }
}
