//! liftlog - Personal lifting and cardio tracker
//!
//! Logs workouts and suggests the next session's weight and set×rep scheme.

pub mod config;
pub mod db;
pub mod exercises;
pub mod history;
pub mod progression;

pub use db::Database;
pub use progression::{Progression, ProgressionEngine, Suggestion};
