//! Reporting over a set of workouts: headline totals, per-exercise and
//! per-body-part breakdowns and time series.

use std::collections::{BTreeMap, HashSet};
use std::fmt;
use std::str::FromStr;

use chrono::{NaiveDate, NaiveDateTime};
use serde::Serialize;
use workout_core::body_part::BodyPart;
use workout_core::models::Workout;

// ── Summary ───────────────────────────────────────────────────────────────────

/// Headline totals shown on the dashboard.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Summary {
    pub workouts: u64,
    pub duration_minutes: u64,
    pub weight_lifted: u64,
    pub reps_performed: u64,
    pub exercises: u64,
    pub exercise_sets: u64,
}

impl Summary {
    fn add_workout(&mut self, workout: &Workout) {
        self.workouts += 1;
        self.duration_minutes += u64::from(workout.duration);
        self.weight_lifted += workout.total_weight_lifted();
        self.reps_performed += workout.total_reps_performed();
        self.exercises += workout.number_of_exercises() as u64;
        self.exercise_sets += workout.number_of_exercise_sets() as u64;
    }
}

// ── Exercise breakdown ────────────────────────────────────────────────────────

/// Totals for one exercise name across workouts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExerciseStats {
    pub name: String,
    pub body_part: Option<BodyPart>,
    /// Number of workouts the exercise appears in.
    pub workouts: u64,
    pub sets: u64,
    pub total_weight: u64,
    pub total_reps: u64,
    /// Heaviest single set.
    pub max_weight: u32,
    pub last_performed: Option<NaiveDateTime>,
}

impl ExerciseStats {
    fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            body_part: None,
            workouts: 0,
            sets: 0,
            total_weight: 0,
            total_reps: 0,
            max_weight: 0,
            last_performed: None,
        }
    }
}

// ── Body-part breakdown ───────────────────────────────────────────────────────

/// Totals for one body part; `body_part == None` collects unclassified
/// exercises.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BodyPartStats {
    pub body_part: Option<BodyPart>,
    /// Distinct exercise names.
    pub exercises: u64,
    pub sets: u64,
    pub total_weight: u64,
    pub total_reps: u64,
}

// ── Time series ───────────────────────────────────────────────────────────────

/// Bucket size for [`WorkoutAggregator::timeline`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Period {
    Daily,
    Weekly,
    Monthly,
}

impl Period {
    /// Key for the bucket containing `date`: `2024-01-15`, `2024-W03` or
    /// `2024-01`.
    pub fn key(self, date: NaiveDate) -> String {
        match self {
            Period::Daily => date.format("%Y-%m-%d").to_string(),
            Period::Weekly => date.format("%G-W%V").to_string(),
            Period::Monthly => date.format("%Y-%m").to_string(),
        }
    }
}

impl FromStr for Period {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "daily" => Ok(Period::Daily),
            "weekly" => Ok(Period::Weekly),
            "monthly" => Ok(Period::Monthly),
            other => Err(format!("unknown period: {other}")),
        }
    }
}

impl fmt::Display for Period {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Period::Daily => "daily",
            Period::Weekly => "weekly",
            Period::Monthly => "monthly",
        })
    }
}

/// Activity within one period.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PeriodStats {
    /// The period key, e.g. `"2024-01-15"` (daily) or `"2024-01"` (monthly).
    pub period_key: String,
    pub summary: Summary,
}

// ── WorkoutAggregator ─────────────────────────────────────────────────────────

/// Stateless helper producing report rows from workouts.
pub struct WorkoutAggregator;

impl WorkoutAggregator {
    /// Headline totals.
    pub fn summarize<'a>(workouts: impl IntoIterator<Item = &'a Workout>) -> Summary {
        let mut summary = Summary::default();
        for workout in workouts {
            summary.add_workout(workout);
        }
        summary
    }

    /// Earliest and latest workout day, or `None` for no workouts.
    pub fn date_bounds<'a>(
        workouts: impl IntoIterator<Item = &'a Workout>,
    ) -> Option<(NaiveDate, NaiveDate)> {
        workouts
            .into_iter()
            .map(|w| w.date.date())
            .fold(None, |acc, day| match acc {
                None => Some((day, day)),
                Some((lo, hi)) => Some((lo.min(day), hi.max(day))),
            })
    }

    /// Per exercise name, sorted by name.
    pub fn by_exercise<'a>(workouts: impl IntoIterator<Item = &'a Workout>) -> Vec<ExerciseStats> {
        let mut map: BTreeMap<&str, ExerciseStats> = BTreeMap::new();

        for workout in workouts {
            for exercise in &workout.exercises {
                let stats = map
                    .entry(exercise.name.as_str())
                    .or_insert_with(|| ExerciseStats::new(&exercise.name));
                stats.body_part = stats.body_part.or(exercise.body_part);
                stats.workouts += 1;
                stats.sets += exercise.number_of_times_performed() as u64;
                stats.total_weight += exercise.total_weight();
                stats.total_reps += exercise.total_reps();
                if let Some(heaviest) = exercise.exercise_sets.iter().map(|s| s.weight).max() {
                    stats.max_weight = stats.max_weight.max(heaviest);
                }
                stats.last_performed = stats.last_performed.max(exercise.last_performed());
            }
        }

        map.into_values().collect()
    }

    /// Per body part, in category order with the unclassified bucket first.
    pub fn by_body_part<'a>(workouts: impl IntoIterator<Item = &'a Workout>) -> Vec<BodyPartStats> {
        let mut map: BTreeMap<Option<BodyPart>, (HashSet<&str>, BodyPartStats)> = BTreeMap::new();

        for workout in workouts {
            for exercise in &workout.exercises {
                let (names, stats) = map.entry(exercise.body_part).or_insert_with(|| {
                    (
                        HashSet::new(),
                        BodyPartStats {
                            body_part: exercise.body_part,
                            exercises: 0,
                            sets: 0,
                            total_weight: 0,
                            total_reps: 0,
                        },
                    )
                });
                names.insert(exercise.name.as_str());
                stats.sets += exercise.number_of_times_performed() as u64;
                stats.total_weight += exercise.total_weight();
                stats.total_reps += exercise.total_reps();
            }
        }

        map.into_values()
            .map(|(names, mut stats)| {
                stats.exercises = names.len() as u64;
                stats
            })
            .collect()
    }

    /// Totals per period, sorted by key (ascending).
    pub fn timeline<'a>(
        workouts: impl IntoIterator<Item = &'a Workout>,
        period: Period,
    ) -> Vec<PeriodStats> {
        let mut map: BTreeMap<String, Summary> = BTreeMap::new();

        for workout in workouts {
            map.entry(period.key(workout.date.date()))
                .or_default()
                .add_workout(workout);
        }

        map.into_iter()
            .map(|(period_key, summary)| PeriodStats {
                period_key,
                summary,
            })
            .collect()
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
