//! Batch classification of exercises that have no body part yet.
//!
//! Runs in two phases. [`pending_classifications`] collects the names that
//! need a decision without blocking. A [`ClassificationSession`] then lets
//! the caller decide one name at a time and stop whenever it likes;
//! [`ClassificationSession::finish`] persists every decision made so far.

use std::collections::{HashSet, VecDeque};

use tracing::{debug, info};
use workout_core::body_part::BodyPart;
use workout_core::error::Result;
use workout_core::models::Workout;

use crate::body_part_map::BodyPartMap;

// ── Phase 1 ───────────────────────────────────────────────────────────────────

/// Distinct names of unclassified exercises, in first-seen order.
pub fn pending_classifications(workouts: &[Workout]) -> Vec<String> {
    let mut seen: HashSet<&str> = HashSet::new();
    let mut pending = Vec::new();
    for exercise in workouts.iter().flat_map(|w| w.exercises.iter()) {
        if exercise.body_part.is_none() && seen.insert(exercise.name.as_str()) {
            pending.push(exercise.name.clone());
        }
    }
    pending
}

/// Fill in unclassified exercises from `map`. Returns how many changed.
pub fn apply_classifications(workouts: &mut [Workout], map: &BodyPartMap) -> usize {
    let mut updated = 0;
    for exercise in workouts.iter_mut().flat_map(|w| w.exercises.iter_mut()) {
        if exercise.body_part.is_none() {
            if let Some(part) = map.resolve(&exercise.name) {
                exercise.body_part = Some(part);
                updated += 1;
            }
        }
    }
    updated
}

// ── Phase 2 ───────────────────────────────────────────────────────────────────

/// What the operator chose for one exercise.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    Assign(BodyPart),
    /// Leave this one unclassified and move on.
    Skip,
    /// Stop now, keeping what was decided so far.
    Quit,
}

/// Source of decisions: a console prompt, a UI widget, a test script.
pub trait Classifier {
    /// Decide on `exercise`. `remaining` counts it and everything after it.
    fn classify(&mut self, exercise: &str, remaining: usize) -> Decision;
}

/// Summary of a finished or abandoned session.
#[derive(Debug, Clone)]
pub struct ClassificationOutcome {
    /// The mapping as persisted.
    pub map: BodyPartMap,
    pub classified: usize,
    pub skipped: usize,
    /// Names never reached because the session stopped early.
    pub remaining: usize,
}

impl ClassificationOutcome {
    pub fn completed(&self) -> bool {
        self.remaining == 0
    }
}

/// Caller-driven classification over a queue of exercise names.
#[derive(Debug)]
pub struct ClassificationSession {
    map: BodyPartMap,
    pending: VecDeque<String>,
    classified: usize,
    skipped: usize,
}

impl ClassificationSession {
    /// Start a session. Names already present in `map` are dropped.
    pub fn new(map: BodyPartMap, pending: Vec<String>) -> Self {
        let pending: VecDeque<String> = pending
            .into_iter()
            .filter(|name| !map.contains(name))
            .collect();
        debug!("Classification session with {} pending", pending.len());
        Self {
            map,
            pending,
            classified: 0,
            skipped: 0,
        }
    }

    /// The exercise awaiting a decision.
    pub fn next_pending(&self) -> Option<&str> {
        self.pending.front().map(String::as_str)
    }

    pub fn remaining(&self) -> usize {
        self.pending.len()
    }

    /// Assign `part` to the current exercise and advance. Returns its name,
    /// or `None` when nothing is pending.
    pub fn assign(&mut self, part: BodyPart) -> Option<String> {
        let name = self.pending.pop_front()?;
        self.map.insert(name.clone(), part);
        self.classified += 1;
        debug!(exercise = %name, body_part = %part, "classified");
        Some(name)
    }

    /// Leave the current exercise unclassified and advance.
    pub fn skip(&mut self) -> Option<String> {
        let name = self.pending.pop_front()?;
        self.skipped += 1;
        Some(name)
    }

    /// The mapping including decisions made so far.
    pub fn map(&self) -> &BodyPartMap {
        &self.map
    }

    /// Persist the mapping and end the session. Nothing is written when no
    /// exercise was classified.
    pub fn finish(self) -> Result<ClassificationOutcome> {
        if self.classified > 0 {
            self.map.save()?;
        }
        info!(
            classified = self.classified,
            skipped = self.skipped,
            remaining = self.pending.len(),
            "classification session finished"
        );
        Ok(ClassificationOutcome {
            map: self.map,
            classified: self.classified,
            skipped: self.skipped,
            remaining: self.pending.len(),
        })
    }
}

/// Drive `session` with `classifier` until the queue is empty or the
/// classifier quits, then persist.
pub fn run_classification(
    mut session: ClassificationSession,
    classifier: &mut impl Classifier,
) -> Result<ClassificationOutcome> {
    while let Some(name) = session.next_pending() {
        match classifier.classify(name, session.remaining()) {
            Decision::Assign(part) => {
                session.assign(part);
            }
            Decision::Skip => {
                session.skip();
            }
            Decision::Quit => break,
        }
    }
    session.finish()
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDateTime;
    use tempfile::TempDir;
    use workout_core::models::Exercise;

    /// Replays a fixed list of decisions, quitting when it runs out.
    struct Scripted {
        decisions: VecDeque<Decision>,
        asked: Vec<(String, usize)>,
    }

    impl Scripted {
        fn new(decisions: &[Decision]) -> Self {
            Self {
                decisions: decisions.iter().copied().collect(),
                asked: Vec::new(),
            }
        }
    }

    impl Classifier for Scripted {
        fn classify(&mut self, exercise: &str, remaining: usize) -> Decision {
            self.asked.push((exercise.to_string(), remaining));
            self.decisions.pop_front().unwrap_or(Decision::Quit)
        }
    }

    fn workout(exercises: &[(&str, Option<BodyPart>)]) -> Workout {
        let at = NaiveDateTime::parse_from_str("2024-01-01 08:00:00", "%Y-%m-%d %H:%M:%S").unwrap();
        let mut w = Workout::new("W", at, 30, "");
        for (name, part) in exercises {
            w.exercises.push(Exercise::new(*name, *part));
        }
        w
    }

    // ── pending_classifications ───────────────────────────────────────────────

    #[test]
    fn test_pending_distinct_in_first_seen_order() {
        let workouts = vec![
            workout(&[("Squat", None), ("Curl", Some(BodyPart::Biceps))]),
            workout(&[("Plank", None), ("Squat", None)]),
        ];
        assert_eq!(pending_classifications(&workouts), vec!["Squat", "Plank"]);
    }

    #[test]
    fn test_pending_empty_when_all_classified() {
        let workouts = vec![workout(&[("Curl", Some(BodyPart::Biceps))])];
        assert!(pending_classifications(&workouts).is_empty());
        assert!(pending_classifications(&[]).is_empty());
    }

    // ── apply_classifications ─────────────────────────────────────────────────

    #[test]
    fn test_apply_fills_only_unclassified() {
        let mut workouts = vec![workout(&[
            ("Squat", None),
            ("Curl", Some(BodyPart::Forearms)),
            ("Plank", None),
        ])];
        let mut map = BodyPartMap::new("unused.json");
        map.insert("Squat", BodyPart::Quads);
        map.insert("Curl", BodyPart::Biceps);

        assert_eq!(apply_classifications(&mut workouts, &map), 1);
        let parts: Vec<Option<BodyPart>> =
            workouts[0].exercises.iter().map(|e| e.body_part).collect();
        assert_eq!(
            parts,
            vec![Some(BodyPart::Quads), Some(BodyPart::Forearms), None]
        );
    }

    // ── ClassificationSession ─────────────────────────────────────────────────

    #[test]
    fn test_session_skips_already_mapped_names() {
        let mut map = BodyPartMap::new("unused.json");
        map.insert("Squat", BodyPart::Quads);
        let session = ClassificationSession::new(map, vec!["Squat".into(), "Plank".into()]);
        assert_eq!(session.remaining(), 1);
        assert_eq!(session.next_pending(), Some("Plank"));
    }

    #[test]
    fn test_session_manual_loop() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("parts.json");
        let mut session = ClassificationSession::new(
            BodyPartMap::new(&path),
            vec!["Squat".into(), "Plank".into()],
        );

        assert_eq!(session.assign(BodyPart::Quads), Some("Squat".to_string()));
        assert_eq!(session.skip(), Some("Plank".to_string()));
        assert_eq!(session.next_pending(), None);
        assert_eq!(session.assign(BodyPart::Abs), None);

        let outcome = session.finish().unwrap();
        assert_eq!(outcome.classified, 1);
        assert_eq!(outcome.skipped, 1);
        assert!(outcome.completed());

        let reloaded = BodyPartMap::load(&path).unwrap();
        assert_eq!(reloaded.resolve("Squat"), Some(BodyPart::Quads));
        assert_eq!(reloaded.resolve("Plank"), None);
    }

    #[test]
    fn test_finish_without_decisions_writes_nothing() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("parts.json");
        let session = ClassificationSession::new(BodyPartMap::new(&path), vec!["Squat".into()]);
        let outcome = session.finish().unwrap();
        assert_eq!(outcome.remaining, 1);
        assert!(!path.exists());
    }

    // ── run_classification ────────────────────────────────────────────────────

    #[test]
    fn test_run_to_completion() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("parts.json");
        let session = ClassificationSession::new(
            BodyPartMap::new(&path),
            vec!["Squat".into(), "Plank".into(), "Curl".into()],
        );
        let mut classifier = Scripted::new(&[
            Decision::Assign(BodyPart::Quads),
            Decision::Skip,
            Decision::Assign(BodyPart::Biceps),
        ]);

        let outcome = run_classification(session, &mut classifier).unwrap();

        assert!(outcome.completed());
        assert_eq!(outcome.classified, 2);
        assert_eq!(
            classifier.asked,
            vec![
                ("Squat".to_string(), 3),
                ("Plank".to_string(), 2),
                ("Curl".to_string(), 1),
            ]
        );
        let reloaded = BodyPartMap::load(&path).unwrap();
        assert_eq!(reloaded.len(), 2);
    }

    #[test]
    fn test_quit_early_persists_partial_progress() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("parts.json");
        let mut existing = BodyPartMap::new(&path);
        existing.insert("Bench Press", BodyPart::Pecs);
        existing.save().unwrap();

        let map = BodyPartMap::load(&path).unwrap();
        let session = ClassificationSession::new(
            map,
            vec!["Squat".into(), "Plank".into(), "Curl".into()],
        );
        let mut classifier = Scripted::new(&[Decision::Assign(BodyPart::Quads), Decision::Quit]);

        let outcome = run_classification(session, &mut classifier).unwrap();

        assert!(!outcome.completed());
        assert_eq!(outcome.classified, 1);
        assert_eq!(outcome.remaining, 2);

        let reloaded = BodyPartMap::load(&path).unwrap();
        assert_eq!(reloaded.resolve("Bench Press"), Some(BodyPart::Pecs));
        assert_eq!(reloaded.resolve("Squat"), Some(BodyPart::Quads));
        assert_eq!(reloaded.resolve("Plank"), None);
    }
}
