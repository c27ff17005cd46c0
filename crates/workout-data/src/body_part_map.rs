//! Persisted exercise-name → body-part mapping.
//!
//! The document is a flat JSON object of exercise names to canonical labels.
//! It is read once per run and rewritten in full on save.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use rand::seq::SliceRandom;
use tracing::{debug, warn};
use workout_core::body_part::BodyPart;
use workout_core::error::{Result, WorkoutError};

// ── Fallback strategies ───────────────────────────────────────────────────────

/// Picks a category for a stored label that is not one of the canonical ones.
pub trait FallbackStrategy {
    fn choose(&mut self, exercise: &str, stored: &serde_json::Value) -> BodyPart;
}

/// Uniformly random category. This is the default policy.
#[derive(Debug, Default, Clone, Copy)]
pub struct RandomFallback;

impl FallbackStrategy for RandomFallback {
    fn choose(&mut self, _exercise: &str, _stored: &serde_json::Value) -> BodyPart {
        BodyPart::ALL
            .choose(&mut rand::thread_rng())
            .copied()
            .unwrap_or(BodyPart::Other)
    }
}

/// Always the same category.
#[derive(Debug, Clone, Copy)]
pub struct FixedFallback(pub BodyPart);

impl FallbackStrategy for FixedFallback {
    fn choose(&mut self, _exercise: &str, _stored: &serde_json::Value) -> BodyPart {
        self.0
    }
}

// ── BodyPartMap ───────────────────────────────────────────────────────────────

/// Exercise-name → body-part mapping bound to the document it persists to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BodyPartMap {
    path: PathBuf,
    entries: BTreeMap<String, BodyPart>,
}

impl BodyPartMap {
    /// An empty mapping that will be saved to `path`.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            entries: BTreeMap::new(),
        }
    }

    /// Load the document at `path`, replacing unrecognised labels with a
    /// random category.
    ///
    /// A missing document yields an empty mapping.
    pub fn load(path: impl Into<PathBuf>) -> Result<Self> {
        Self::load_with(path, &mut RandomFallback)
    }

    /// Load the document at `path`, using `fallback` for labels that are not
    /// canonical.
    pub fn load_with(path: impl Into<PathBuf>, fallback: &mut dyn FallbackStrategy) -> Result<Self> {
        let path = path.into();

        let content = match std::fs::read_to_string(&path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!("No body-part mapping at {}; starting empty", path.display());
                return Ok(Self::new(path));
            }
            Err(source) => return Err(WorkoutError::FileRead { path, source }),
        };

        let raw: BTreeMap<String, serde_json::Value> = serde_json::from_str(&content)?;

        let mut entries = BTreeMap::new();
        for (exercise, stored) in raw {
            let part = match stored.as_str().and_then(BodyPart::from_label) {
                Some(part) => part,
                None => {
                    let part = fallback.choose(&exercise, &stored);
                    warn!(
                        exercise = %exercise,
                        stored = %stored,
                        substitute = %part,
                        "unrecognised body part in mapping"
                    );
                    part
                }
            };
            entries.insert(exercise, part);
        }

        debug!(
            "Loaded {} body-part mappings from {}",
            entries.len(),
            path.display()
        );
        Ok(Self { path, entries })
    }

    /// Overwrite the document with the full current mapping.
    ///
    /// Writes to a sibling temp file and renames it into place.
    pub fn save(&self) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let json = serde_json::to_string_pretty(&self.entries)?;
        let tmp = self.path.with_extension("json.tmp");
        std::fs::write(&tmp, json)?;
        std::fs::rename(&tmp, &self.path)?;

        debug!(
            "Saved {} body-part mappings to {}",
            self.entries.len(),
            self.path.display()
        );
        Ok(())
    }

    /// Category for `exercise`, or `None` when it is unclassified.
    pub fn resolve(&self, exercise: &str) -> Option<BodyPart> {
        self.entries.get(exercise).copied()
    }

    /// Record a category, returning the previous one if any.
    pub fn insert(&mut self, exercise: impl Into<String>, part: BodyPart) -> Option<BodyPart> {
        self.entries.insert(exercise.into(), part)
    }

    pub fn contains(&self, exercise: &str) -> bool {
        self.entries.contains_key(exercise)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries sorted by exercise name.
    pub fn iter(&self) -> impl Iterator<Item = (&str, BodyPart)> {
        self.entries.iter().map(|(name, part)| (name.as_str(), *part))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
