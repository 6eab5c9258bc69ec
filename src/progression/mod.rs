//! Progression module - progressive overload suggestions
//!
//! Features:
//! - Set×rep schemes and label normalization
//! - Per-exercise weight steps
//! - Next-session suggestion from the last logged attempt

pub mod engine;
pub mod increments;
pub mod scheme;

pub use engine::{ProgressionEngine, Suggestion, SuggestionBasis, WeightPolicy};
pub use increments::IncrementTable;
pub use scheme::{ProgressionError, Scheme, SchemeCycle};

use crate::db::WorkoutRecord;

/// Engine plus increment table, loaded once and shared read-only
#[derive(Debug, Clone, Default)]
pub struct Progression {
    engine: ProgressionEngine,
    increments: IncrementTable,
}

impl Progression {
    pub fn new(engine: ProgressionEngine, increments: IncrementTable) -> Self {
        Self { engine, increments }
    }

    pub fn engine(&self) -> &ProgressionEngine {
        &self.engine
    }

    pub fn increments(&self) -> &IncrementTable {
        &self.increments
    }

    pub fn increment_for(&self, exercise: &str) -> f64 {
        self.increments.increment_for(exercise)
    }

    /// Suggest the next session for `exercise` using its configured step
    pub fn suggest_for(
        &self,
        exercise: &str,
        last: Option<&WorkoutRecord>,
        starting_scheme: Option<&str>,
    ) -> Suggestion {
        self.engine
            .suggest_next(last, self.increment_for(exercise), starting_scheme)
    }
}
