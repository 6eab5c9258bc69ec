//! Workout history - filtering and per-exercise summaries

use chrono::NaiveDate;

use crate::db::WorkoutRecord;

/// Per-exercise totals over a user's history
#[derive(Debug, Clone, PartialEq)]
pub struct ExerciseSummary {
    pub exercise: String,
    pub sessions: usize,
    pub successes: usize,
    pub best_weight: f64,
    pub last_date: NaiveDate,
    pub last_weight: f64,
    pub last_scheme: String,
}

impl ExerciseSummary {
    /// Share of sessions that hit target (0.0 - 1.0)
    pub fn success_rate(&self) -> f64 {
        if self.sessions == 0 {
            return 0.0;
        }
        self.successes as f64 / self.sessions as f64
    }
}

/// A user's workouts, newest first
pub struct History {
    records: Vec<WorkoutRecord>,
}

impl History {
    pub fn new(records: Vec<WorkoutRecord>) -> Self {
        Self { records }
    }

    pub fn records(&self) -> &[WorkoutRecord] {
        &self.records
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Records for one exercise (case-insensitive)
    pub fn for_exercise(&self, exercise: &str) -> Vec<&WorkoutRecord> {
        let exercise = exercise.trim();
        self.records
            .iter()
            .filter(|r| r.exercise.eq_ignore_ascii_case(exercise))
            .collect()
    }

    /// Distinct exercise names, sorted
    pub fn exercises(&self) -> Vec<String> {
        let mut names: Vec<String> = self.records.iter().map(|r| r.exercise.clone()).collect();
        names.sort();
        names.dedup();
        names
    }

    pub fn summary(&self, exercise: &str) -> Option<ExerciseSummary> {
        let records = self.for_exercise(exercise);
        // newest first, so the head is the latest session
        let last = records.first()?;

        Some(ExerciseSummary {
            exercise: last.exercise.clone(),
            sessions: records.len(),
            successes: records.iter().filter(|r| r.success).count(),
            best_weight: records.iter().map(|r| r.weight).fold(0.0, f64::max),
            last_date: last.date,
            last_weight: last.weight,
            last_scheme: last.scheme.clone(),
        })
    }

    /// One summary per exercise, alphabetical
    pub fn summaries(&self) -> Vec<ExerciseSummary> {
        self.exercises()
            .iter()
            .filter_map(|name| self.summary(name))
            .collect()
    }
}
