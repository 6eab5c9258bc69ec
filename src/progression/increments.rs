//! Per-exercise weight steps

use std::collections::BTreeMap;

use crate::exercises::{DEFAULT_INCREMENT, KNOWN_LIFTS};

/// Weight step lookup: per-exercise overrides over a global default.
///
/// Keys are matched case-insensitively after trimming.
#[derive(Debug, Clone, PartialEq)]
pub struct IncrementTable {
    default: f64,
    overrides: BTreeMap<String, f64>,
}

fn key(exercise: &str) -> String {
    exercise.trim().to_lowercase()
}

impl IncrementTable {
    /// Empty table: every exercise gets `default`
    pub fn new(default: f64) -> Self {
        Self {
            default,
            overrides: BTreeMap::new(),
        }
    }

    /// Table seeded with the built-in lifts
    pub fn with_known_lifts(default: f64) -> Self {
        KNOWN_LIFTS
            .iter()
            .fold(Self::new(default), |table, lift| table.with_override(lift.name, lift.increment))
    }

    pub fn with_override(mut self, exercise: &str, step: f64) -> Self {
        self.set(exercise, step);
        self
    }

    pub fn set(&mut self, exercise: &str, step: f64) {
        self.overrides.insert(key(exercise), step);
    }

    pub fn default_increment(&self) -> f64 {
        self.default
    }

    /// Step for `exercise`, falling back to the global default
    pub fn increment_for(&self, exercise: &str) -> f64 {
        self.overrides.get(&key(exercise)).copied().unwrap_or(self.default)
    }

    /// Overrides keyed by normalized exercise name
    pub fn overrides(&self) -> &BTreeMap<String, f64> {
        &self.overrides
    }
}

impl Default for IncrementTable {
    fn default() -> Self {
        Self::with_known_lifts(DEFAULT_INCREMENT)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_lifts() {
        let table = IncrementTable::default();
        assert_eq!(table.increment_for("Squat"), 5.0);
        assert_eq!(table.increment_for("Deadlift"), 5.0);
        assert_eq!(table.increment_for("Bench Press"), 2.5);
    }

    #[test]
    fn test_unknown_exercise_uses_default() {
        let table = IncrementTable::default();
        assert_eq!(table.increment_for("Cable Fly"), DEFAULT_INCREMENT);

        let table = IncrementTable::new(1.25);
        assert_eq!(table.increment_for("Squat"), 1.25);
    }

    #[test]
    fn test_lookup_ignores_case_and_whitespace() {
        let table = IncrementTable::default();
        assert_eq!(table.increment_for("  DEADLIFT "), 5.0);
    }

    #[test]
    fn test_override_replaces_builtin() {
        let table = IncrementTable::default().with_override("squat", 2.0);
        assert_eq!(table.increment_for("Squat"), 2.0);
        assert_eq!(table.overrides().get("squat"), Some(&2.0));
    }
}
