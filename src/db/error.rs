//! Repository error types

use thiserror::Error;

use crate::exercises::ExerciseKind;

/// Errors raised by the workout repository
#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("Database error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("Unknown {kind} exercise: {name}")]
    UnknownExercise { name: String, kind: ExerciseKind },

    #[error("Exercise already exists: {0}")]
    DuplicateExercise(String),

    #[error("Invalid record: {0}")]
    InvalidRecord(String),

    #[error("User id must not be empty")]
    MissingUser,
}

impl RepositoryError {
    /// Check if the caller supplied bad data (as opposed to a storage failure)
    pub fn is_user_error(&self) -> bool {
        !matches!(self, RepositoryError::Sqlite(_))
    }
}
