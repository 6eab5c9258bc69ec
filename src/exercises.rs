//! Exercise definitions - built-in lifts and exercise kinds

use std::fmt;

use serde::{Deserialize, Serialize};

/// Kind of exercise stored in the catalog
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum ExerciseKind {
    Strength, // Sets × reps at a weight
    Cardio,   // Time, distance, difficulty
}

impl ExerciseKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ExerciseKind::Strength => "strength",
            ExerciseKind::Cardio => "cardio",
        }
    }

    pub fn emoji(&self) -> &'static str {
        match self {
            ExerciseKind::Strength => "🏋️",
            ExerciseKind::Cardio => "🏃",
        }
    }
}

impl fmt::Display for ExerciseKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A lift with its own weight step
#[derive(Debug, Clone)]
pub struct Lift {
    pub name: &'static str,
    pub increment: f64,
}

/// Step used for any exercise without an entry below
pub const DEFAULT_INCREMENT: f64 = 2.5;

/// Barbell lifts with known steps (lower body moves in bigger jumps)
pub const KNOWN_LIFTS: &[Lift] = &[
    Lift {
        name: "Bench Press",
        increment: 2.5,
    },
    Lift {
        name: "Squat",
        increment: 5.0,
    },
    Lift {
        name: "Deadlift",
        increment: 5.0,
    },
    Lift {
        name: "Overhead Press",
        increment: 2.5,
    },
    Lift {
        name: "Barbell Row",
        increment: 2.5,
    },
];
