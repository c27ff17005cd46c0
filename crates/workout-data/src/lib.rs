//! Data layer for the workout analysis tools.
//!
//! Responsible for reading Strong CSV exports into the workout model,
//! persisting the body-part mapping, classifying unmapped exercises and
//! aggregating workouts into report rows.

pub mod aggregator;
pub mod body_part_map;
pub mod classifier;
pub mod loader;
pub mod reader;

pub use workout_core as core;
