//! Runtime layer for the workout analysis tools.
//!
//! Sits between the data layer and a front end, keeping the loaded dataset
//! and body-part mapping for the length of a session.

pub mod data_manager;

pub use workout_core as core;
pub use workout_data as data;
