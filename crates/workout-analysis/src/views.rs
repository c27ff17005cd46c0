//! Plain-text reports written to any [`Write`] sink.

use std::io::{self, Write};

use chrono::NaiveDate;
use workout_core::body_part::label_or_unclassified;
use workout_core::formatting::{format_count, format_duration, format_number, percentage};
use workout_core::models::Workout;
use workout_data::aggregator::{BodyPartStats, ExerciseStats, PeriodStats, Summary};

pub const NO_DATA: &str = "No data found.";

pub fn render_no_data(out: &mut impl Write) -> io::Result<()> {
    writeln!(out, "{NO_DATA}")
}

fn write_range(out: &mut impl Write, range: Option<(NaiveDate, NaiveDate)>) -> io::Result<()> {
    match range {
        Some((start, end)) => writeln!(out, "Date range: {start} to {end}"),
        None => writeln!(out, "Date range: all"),
    }
}

// ── Summary ────────────────────────────────────────────────────────────────────

pub fn render_summary(
    out: &mut impl Write,
    summary: &Summary,
    range: Option<(NaiveDate, NaiveDate)>,
) -> io::Result<()> {
    write_range(out, range)?;
    writeln!(out)?;
    let rows = [
        ("Workouts", format_count(summary.workouts)),
        ("Time spent", format_duration(summary.duration_minutes)),
        ("Weight lifted", format_count(summary.weight_lifted)),
        ("Reps performed", format_count(summary.reps_performed)),
        ("Exercises", format_count(summary.exercises)),
        ("Sets", format_count(summary.exercise_sets)),
    ];
    for (label, value) in rows {
        writeln!(out, "{label:<16}{value:>12}")?;
    }
    Ok(())
}

// ── Tables ─────────────────────────────────────────────────────────────────────

pub fn render_workouts<'a>(
    out: &mut impl Write,
    workouts: impl IntoIterator<Item = &'a Workout>,
) -> io::Result<()> {
    writeln!(
        out,
        "{:<20}{:<28}{:>10}{:>11}{:>6}{:>10}",
        "Date", "Workout", "Duration", "Exercises", "Sets", "Weight"
    )?;
    for w in workouts {
        writeln!(
            out,
            "{:<20}{:<28}{:>10}{:>11}{:>6}{:>10}",
            w.date.format("%Y-%m-%d %H:%M"),
            w.name,
            format_duration(u64::from(w.duration)),
            w.number_of_exercises(),
            w.number_of_exercise_sets(),
            format_count(w.total_weight_lifted()),
        )?;
    }
    Ok(())
}

pub fn render_exercises(out: &mut impl Write, stats: &[ExerciseStats]) -> io::Result<()> {
    writeln!(
        out,
        "{:<28}{:<14}{:>9}{:>6}{:>10}{:>7}{:>6}  {}",
        "Exercise", "Body part", "Workouts", "Sets", "Weight", "Reps", "Max", "Last"
    )?;
    for s in stats {
        let last = s
            .last_performed
            .map(|d| d.format("%Y-%m-%d").to_string())
            .unwrap_or_default();
        writeln!(
            out,
            "{:<28}{:<14}{:>9}{:>6}{:>10}{:>7}{:>6}  {}",
            s.name,
            label_or_unclassified(s.body_part),
            s.workouts,
            s.sets,
            format_count(s.total_weight),
            format_count(s.total_reps),
            s.max_weight,
            last,
        )?;
    }
    Ok(())
}

/// Body parts with each one's share of all sets.
pub fn render_body_parts(out: &mut impl Write, stats: &[BodyPartStats]) -> io::Result<()> {
    let total_sets: u64 = stats.iter().map(|s| s.sets).sum();
    writeln!(
        out,
        "{:<14}{:>11}{:>6}{:>8}{:>10}{:>7}",
        "Body part", "Exercises", "Sets", "Share", "Weight", "Reps"
    )?;
    for s in stats {
        let share = percentage(s.sets as f64, total_sets as f64, 1);
        writeln!(
            out,
            "{:<14}{:>11}{:>6}{:>8}{:>10}{:>7}",
            label_or_unclassified(s.body_part),
            s.exercises,
            s.sets,
            format!("{}%", format_number(share, 1)),
            format_count(s.total_weight),
            format_count(s.total_reps),
        )?;
    }
    Ok(())
}

pub fn render_timeline(out: &mut impl Write, periods: &[PeriodStats]) -> io::Result<()> {
    writeln!(
        out,
        "{:<12}{:>10}{:>10}{:>6}{:>10}{:>7}",
        "Period", "Workouts", "Time", "Sets", "Weight", "Reps"
    )?;
    for p in periods {
        let s = &p.summary;
        writeln!(
            out,
            "{:<12}{:>10}{:>10}{:>6}{:>10}{:>7}",
            p.period_key,
            s.workouts,
            format_duration(s.duration_minutes),
            s.exercise_sets,
            format_count(s.weight_lifted),
            format_count(s.reps_performed),
        )?;
    }
    Ok(())
}

/// The workouts as pretty-printed JSON.
pub fn render_export(out: &mut impl Write, workouts: &[&Workout]) -> anyhow::Result<()> {
    serde_json::to_writer_pretty(&mut *out, workouts)?;
    writeln!(out)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDateTime;
    use workout_core::body_part::BodyPart;
    use workout_core::models::{Exercise, ExerciseSet};
    use workout_data::aggregator::WorkoutAggregator;

    fn sample() -> Vec<Workout> {
        let at = NaiveDateTime::parse_from_str("2024-01-15 08:00:00", "%Y-%m-%d %H:%M:%S").unwrap();
        let mut w = Workout::new("Leg Day", at, 75, "");
        for (name, part, weight, reps) in [
            ("Squat", Some(BodyPart::Quads), 1000, 5),
            ("Plank", None, 0, 1),
        ] {
            let mut ex = Exercise::new(name, part);
            ex.exercise_sets.push(ExerciseSet {
                workout: "Leg Day".to_string(),
                date: at,
                set_number: 1,
                weight,
                reps,
                notes: String::new(),
            });
            w.exercises.push(ex);
        }
        vec![w]
    }

    fn render<F>(f: F) -> String
    where
        F: FnOnce(&mut Vec<u8>) -> io::Result<()>,
    {
        let mut out = Vec::new();
        f(&mut out).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn test_no_data() {
        assert_eq!(render(|o| render_no_data(o)), "No data found.\n");
    }

    #[test]
    fn test_summary_formats_metrics() {
        let workouts = sample();
        let summary = WorkoutAggregator::summarize(&workouts);
        let day = NaiveDate::from_ymd_opt(2024, 1, 15).unwrap();
        let text = render(|o| render_summary(o, &summary, Some((day, day))));

        assert!(text.contains("Date range: 2024-01-15 to 2024-01-15"));
        assert!(text.contains("1h 15m"));
        assert!(text.contains("1,000"));
    }

    #[test]
    fn test_workouts_table() {
        let workouts = sample();
        let text = render(|o| render_workouts(o, &workouts));
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[1].starts_with("2024-01-15 08:00"));
        assert!(lines[1].contains("Leg Day"));
    }

    #[test]
    fn test_exercises_table_labels_unclassified() {
        let stats = WorkoutAggregator::by_exercise(&sample());
        let text = render(|o| render_exercises(o, &stats));
        assert!(text.contains("Unclassified"));
        assert!(text.contains("Quads"));
        assert!(text.contains("2024-01-15"));
    }

    #[test]
    fn test_body_parts_share() {
        let stats = WorkoutAggregator::by_body_part(&sample());
        let text = render(|o| render_body_parts(o, &stats));
        assert_eq!(text.matches("50.0%").count(), 2);
    }

    #[test]
    fn test_timeline_rows() {
        let periods = WorkoutAggregator::timeline(
            &sample(),
            workout_data::aggregator::Period::Monthly,
        );
        let text = render(|o| render_timeline(o, &periods));
        assert!(text.lines().nth(1).unwrap().starts_with("2024-01"));
    }

    #[test]
    fn test_export_is_valid_json() {
        let workouts = sample();
        let refs: Vec<&Workout> = workouts.iter().collect();
        let mut out = Vec::new();
        render_export(&mut out, &refs).unwrap();

        let value: serde_json::Value = serde_json::from_slice(&out).unwrap();
        assert_eq!(value[0]["name"], "Leg Day");
        assert_eq!(value[0]["exercises"].as_array().unwrap().len(), 2);
    }
}
