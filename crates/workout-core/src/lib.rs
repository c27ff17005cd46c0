//! Shared domain types for the workout analysis tools.
//!
//! Holds the Workout → Exercise → Set model, the body-part categories,
//! duration parsing, number formatting, CLI settings and the common error
//! type.

pub mod body_part;
pub mod duration;
pub mod error;
pub mod formatting;
pub mod models;
pub mod settings;

pub use error::{Result, WorkoutError};
