use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::body_part::BodyPart;

/// One performed set, i.e. one row of the export.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExerciseSet {
    /// Name of the workout the set was logged in. Descriptive only.
    pub workout: String,
    /// Start time of the workout, copied from the row.
    pub date: NaiveDateTime,
    /// Position within the exercise; 1 when the export left it blank.
    pub set_number: u32,
    /// Load in the export's unit, truncated to a whole number.
    pub weight: u32,
    pub reps: u32,
    #[serde(default)]
    pub notes: String,
}

/// A named exercise within a workout, with its sets in row order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Exercise {
    pub name: String,
    /// `None` while the exercise is unclassified.
    #[serde(default)]
    pub body_part: Option<BodyPart>,
    #[serde(default)]
    pub exercise_sets: Vec<ExerciseSet>,
}

impl Exercise {
    pub fn new(name: impl Into<String>, body_part: Option<BodyPart>) -> Self {
        Self {
            name: name.into(),
            body_part,
            exercise_sets: Vec::new(),
        }
    }

    /// How many sets of this exercise were logged.
    pub fn number_of_times_performed(&self) -> usize {
        self.exercise_sets.len()
    }

    /// Latest set date, or `None` when there are no sets.
    pub fn last_performed(&self) -> Option<NaiveDateTime> {
        self.exercise_sets.iter().map(|s| s.date).max()
    }

    /// Sum of set weights.
    pub fn total_weight(&self) -> u64 {
        self.exercise_sets.iter().map(|s| u64::from(s.weight)).sum()
    }

    /// Sum of set reps.
    pub fn total_reps(&self) -> u64 {
        self.exercise_sets.iter().map(|s| u64::from(s.reps)).sum()
    }
}

/// A logged training session.
///
/// Workouts are grouped by the raw `Date` text plus the workout name; see
/// [`Workout::key`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Workout {
    pub name: String,
    pub date: NaiveDateTime,
    /// Total length in minutes.
    pub duration: u32,
    #[serde(default)]
    pub notes: String,
    #[serde(default)]
    pub exercises: Vec<Exercise>,
}

/// Grouping key of a workout: the unparsed `Date` cell and the workout name.
pub type WorkoutKey = (String, String);

impl Workout {
    pub fn new(
        name: impl Into<String>,
        date: NaiveDateTime,
        duration: u32,
        notes: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            date,
            duration,
            notes: notes.into(),
            exercises: Vec::new(),
        }
    }

    /// Build the grouping key for a row.
    pub fn key(raw_date: &str, name: &str) -> WorkoutKey {
        (raw_date.to_string(), name.to_string())
    }

    pub fn number_of_exercises(&self) -> usize {
        self.exercises.len()
    }

    /// Number of sets across all exercises.
    pub fn number_of_exercise_sets(&self) -> usize {
        self.exercises.iter().map(|e| e.exercise_sets.len()).sum()
    }

    /// Sum of every set's weight.
    pub fn total_weight_lifted(&self) -> u64 {
        self.exercises.iter().map(Exercise::total_weight).sum()
    }

    /// Sum of every set's reps.
    pub fn total_reps_performed(&self) -> u64 {
        self.exercises.iter().map(Exercise::total_reps).sum()
    }

    /// Find an exercise by exact name.
    pub fn exercise(&self, name: &str) -> Option<&Exercise> {
        self.exercises.iter().find(|e| e.name == name)
    }

    /// Find an exercise by exact name, appending a new one built by
    /// `make` when absent.
    pub fn exercise_or_insert_with(
        &mut self,
        name: &str,
        make: impl FnOnce() -> Exercise,
    ) -> &mut Exercise {
        let idx = match self.exercises.iter().position(|e| e.name == name) {
            Some(idx) => idx,
            None => {
                self.exercises.push(make());
                self.exercises.len() - 1
            }
        };
        &mut self.exercises[idx]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(s: &str) -> NaiveDateTime {
        NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S").unwrap()
    }

    fn set(date: &str, weight: u32, reps: u32) -> ExerciseSet {
        ExerciseSet {
            workout: "Push".to_string(),
            date: at(date),
            set_number: 1,
            weight,
            reps,
            notes: String::new(),
        }
    }

    // ── Exercise ──────────────────────────────────────────────────────────────

    #[test]
    fn test_exercise_empty_metrics() {
        let ex = Exercise::new("Bench Press", None);
        assert_eq!(ex.number_of_times_performed(), 0);
        assert_eq!(ex.last_performed(), None);
        assert_eq!(ex.total_weight(), 0);
        assert_eq!(ex.total_reps(), 0);
    }

    #[test]
    fn test_exercise_last_performed_is_max() {
        let mut ex = Exercise::new("Bench Press", Some(BodyPart::Pecs));
        ex.exercise_sets.push(set("2024-03-02 10:00:00", 100, 5));
        ex.exercise_sets.push(set("2024-01-02 10:00:00", 100, 5));
        assert_eq!(ex.last_performed(), Some(at("2024-03-02 10:00:00")));
        assert_eq!(ex.number_of_times_performed(), 2);
    }

    // ── Workout ───────────────────────────────────────────────────────────────

    #[test]
    fn test_workout_empty_metrics() {
        let w = Workout::new("Legs", at("2024-01-01 08:00:00"), 45, "");
        assert_eq!(w.number_of_exercises(), 0);
        assert_eq!(w.number_of_exercise_sets(), 0);
        assert_eq!(w.total_weight_lifted(), 0);
        assert_eq!(w.total_reps_performed(), 0);
    }

    #[test]
    fn test_workout_totals_across_exercises() {
        let mut w = Workout::new("Push", at("2024-01-01 08:00:00"), 60, "");
        let mut bench = Exercise::new("Bench Press", None);
        bench.exercise_sets.push(set("2024-01-01 08:00:00", 135, 10));
        bench.exercise_sets.push(set("2024-01-01 08:00:00", 155, 8));
        let mut dips = Exercise::new("Dips", None);
        dips.exercise_sets.push(set("2024-01-01 08:00:00", 0, 12));
        w.exercises.push(bench);
        w.exercises.push(dips);

        assert_eq!(w.number_of_exercises(), 2);
        assert_eq!(w.number_of_exercise_sets(), 3);
        assert_eq!(w.total_weight_lifted(), 290);
        assert_eq!(w.total_reps_performed(), 30);
    }

    #[test]
    fn test_exercise_or_insert_with_reuses_existing() {
        let mut w = Workout::new("Push", at("2024-01-01 08:00:00"), 60, "");
        w.exercise_or_insert_with("Dips", || Exercise::new("Dips", None))
            .exercise_sets
            .push(set("2024-01-01 08:00:00", 0, 10));
        w.exercise_or_insert_with("Dips", || Exercise::new("Dips", Some(BodyPart::Triceps)))
            .exercise_sets
            .push(set("2024-01-01 08:00:00", 0, 8));

        assert_eq!(w.number_of_exercises(), 1);
        // The second closure never ran, so the body part is unchanged.
        assert_eq!(w.exercises[0].body_part, None);
        assert_eq!(w.exercise("Dips").map(|e| e.exercise_sets.len()), Some(2));
    }

    #[test]
    fn test_key_uses_raw_text() {
        assert_ne!(
            Workout::key("2024-01-01 08:00:00", "Push"),
            Workout::key("2024-01-01 8:00:00", "Push")
        );
    }
}
