mod bootstrap;
mod prompt;
mod views;

use std::io::{self, Read, Write};

use anyhow::{Context, Result};
use workout_core::settings::Settings;
use workout_data::aggregator::{Period, WorkoutAggregator};
use workout_data::classifier::{pending_classifications, run_classification, ClassificationSession};
use workout_data::loader::filter_by_date_range;
use workout_runtime::data_manager::{DataManager, DataSource};

use crate::prompt::ConsoleClassifier;

fn main() -> Result<()> {
    let settings = Settings::load_with_last_used();

    bootstrap::ensure_directories()?;
    bootstrap::setup_logging(&settings.log_level, settings.log_file.as_ref())?;

    tracing::info!("Workout Analysis v{} starting", env!("CARGO_PKG_VERSION"));
    tracing::info!("View: {}, Period: {}", settings.view, settings.period);

    let stdout = io::stdout();
    let mut out = stdout.lock();

    let Some(source) = select_source(&settings)? else {
        tracing::info!("No workout export given or found");
        views::render_no_data(&mut out)?;
        return Ok(());
    };

    let mut manager = DataManager::new(settings.mapping_path());
    manager.set_source(source);

    if settings.view == "classify" {
        drop(out);
        return classify(&mut manager);
    }

    let workouts = manager.get_data(false);
    if workouts.is_empty() {
        if let Some(err) = manager.last_error() {
            tracing::error!("{err}");
        }
        views::render_no_data(&mut out)?;
        return Ok(());
    }

    let bounds = WorkoutAggregator::date_bounds(workouts);
    let range = settings.date_range(bounds);
    let selected = filter_by_date_range(workouts, &range);
    tracing::debug!(selected = selected.len(), total = workouts.len(), "date filter applied");

    if selected.is_empty() && settings.view != "export" {
        views::render_no_data(&mut out)?;
        return Ok(());
    }

    match settings.view.as_str() {
        "summary" => {
            let shown = match range.as_slice() {
                [start, end] => Some((*start, *end)),
                _ => bounds,
            };
            let summary = WorkoutAggregator::summarize(selected.iter().copied());
            views::render_summary(&mut out, &summary, shown)?;
        }
        "workouts" => views::render_workouts(&mut out, selected.iter().copied())?,
        "exercises" => {
            let stats = WorkoutAggregator::by_exercise(selected.iter().copied());
            views::render_exercises(&mut out, &stats)?;
        }
        "body-parts" => {
            let stats = WorkoutAggregator::by_body_part(selected.iter().copied());
            views::render_body_parts(&mut out, &stats)?;
        }
        "timeline" => {
            let period: Period = settings.period.parse().map_err(anyhow::Error::msg)?;
            let periods = WorkoutAggregator::timeline(selected.iter().copied(), period);
            views::render_timeline(&mut out, &periods)?;
        }
        "export" => views::render_export(&mut out, &selected)?,
        unknown => {
            eprintln!("Unknown view mode: {}", unknown);
        }
    }

    out.flush()?;
    Ok(())
}

/// The export to analyse: stdin bytes, the `FILE` argument, or a
/// discovered default. `None` when there is nothing to read.
fn select_source(settings: &Settings) -> Result<Option<DataSource>> {
    if settings.stdin {
        let mut bytes = Vec::new();
        io::stdin()
            .lock()
            .read_to_end(&mut bytes)
            .context("reading export from stdin")?;
        return Ok(Some(DataSource::Upload(bytes)));
    }
    Ok(settings
        .file
        .clone()
        .or_else(bootstrap::discover_data_path)
        .map(DataSource::File))
}

/// Interactively file every unclassified exercise under a body part.
fn classify(manager: &mut DataManager) -> Result<()> {
    let map = manager
        .mapping()
        .context("body-part mapping cannot be read; refusing to overwrite it")?
        .clone();

    let pending = pending_classifications(manager.get_data(false));
    if let Some(err) = manager.last_error() {
        anyhow::bail!("cannot classify: {err}");
    }
    if pending.is_empty() {
        println!("Every exercise already has a body part.");
        return Ok(());
    }

    let session = ClassificationSession::new(map, pending);
    let stdin = io::stdin();
    let mut console = ConsoleClassifier::new(stdin.lock(), io::stdout());
    let outcome = run_classification(session, &mut console)?;

    let path = outcome.map.path().to_path_buf();
    let (classified, skipped, remaining) = (outcome.classified, outcome.skipped, outcome.remaining);
    manager.replace_mapping(outcome.map);

    println!();
    println!("Classified {classified}, skipped {skipped}, {remaining} left.");
    if classified > 0 {
        println!("Saved to {}", path.display());
    }
    Ok(())
}
