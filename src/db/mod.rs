//! Database module - SQLite storage for workouts, exercises and settings

mod cardio;
mod error;

pub use cardio::{CardioRecord, NewCardio};
pub use error::RepositoryError;

use chrono::NaiveDate;
use rusqlite::{Connection, ErrorCode, OptionalExtension, Row, params, types::Type};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::exercises::ExerciseKind;

pub type Result<T> = std::result::Result<T, RepositoryError>;

const DATE_FORMAT: &str = "%Y-%m-%d";

/// Identity every user-scoped query runs under
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserContext {
    user_id: String,
}

impl UserContext {
    pub fn new(user_id: impl Into<String>) -> Result<Self> {
        let user_id = user_id.into().trim().to_string();
        if user_id.is_empty() {
            return Err(RepositoryError::MissingUser);
        }
        Ok(Self { user_id })
    }

    pub fn user_id(&self) -> &str {
        &self.user_id
    }
}

/// One logged strength attempt
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkoutRecord {
    /// Insertion sequence, breaks ties between records on the same date
    pub id: i64,
    pub user_id: String,
    pub exercise: String,
    pub date: NaiveDate,
    pub weight: f64,
    pub sets: u32,
    pub target_reps: u32,
    pub achieved_reps: u32,
    pub success: bool,
    pub scheme: String,
}

/// Workout as submitted, before the repository assigns an id
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewWorkout {
    pub exercise: String,
    pub date: NaiveDate,
    pub weight: f64,
    pub sets: u32,
    pub target_reps: u32,
    pub achieved_reps: u32,
    pub success: bool,
    pub scheme: String,
}

impl NewWorkout {
    /// Success is "hit every target rep"
    pub fn success_from_reps(achieved_reps: u32, target_reps: u32) -> bool {
        achieved_reps >= target_reps
    }

    fn validate(&self) -> Result<()> {
        if !self.weight.is_finite() || self.weight < 0.0 {
            return Err(RepositoryError::InvalidRecord(format!(
                "weight must be a non-negative number, got {}",
                self.weight
            )));
        }
        if self.sets == 0 {
            return Err(RepositoryError::InvalidRecord("sets must be at least 1".into()));
        }
        if self.target_reps == 0 {
            return Err(RepositoryError::InvalidRecord("target reps must be at least 1".into()));
        }
        if self.scheme.trim().is_empty() {
            return Err(RepositoryError::InvalidRecord("scheme must not be empty".into()));
        }
        Ok(())
    }
}

pub(crate) fn format_date(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

pub(crate) fn parse_date(row: &Row, idx: usize) -> rusqlite::Result<NaiveDate> {
    let raw: String = row.get(idx)?;
    NaiveDate::parse_from_str(&raw, DATE_FORMAT)
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(e)))
}

fn workout_from_row(row: &Row) -> rusqlite::Result<WorkoutRecord> {
    Ok(WorkoutRecord {
        id: row.get(0)?,
        user_id: row.get(1)?,
        exercise: row.get(2)?,
        date: parse_date(row, 3)?,
        weight: row.get(4)?,
        sets: row.get(5)?,
        target_reps: row.get(6)?,
        achieved_reps: row.get(7)?,
        success: row.get(8)?,
        scheme: row.get(9)?,
    })
}

const WORKOUT_COLUMNS: &str = "w.id, w.user_id, e.name, w.workout_date, w.weight, w.sets, \
     w.target_reps, w.achieved_reps, w.success, w.scheme";

/// Database wrapper
pub struct Database {
    conn: Connection,
}

impl Database {
    /// Open or create database
    pub fn open(path: &str) -> Result<Self> {
        let conn = Connection::open(path)?;
        info!(path, "Opened database");
        Self::with_connection(conn)
    }

    /// Private database that lives as long as the handle
    pub fn open_in_memory() -> Result<Self> {
        Self::with_connection(Connection::open_in_memory()?)
    }

    fn with_connection(conn: Connection) -> Result<Self> {
        let db = Self { conn };
        db.init_schema()?;
        Ok(db)
    }

    /// Initialize database schema
    fn init_schema(&self) -> Result<()> {
        self.conn.execute_batch(
            "PRAGMA foreign_keys = ON;

            CREATE TABLE IF NOT EXISTS exercises (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                name TEXT NOT NULL UNIQUE COLLATE NOCASE,
                kind TEXT NOT NULL DEFAULT 'strength'
            );

            CREATE TABLE IF NOT EXISTS workouts (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                user_id TEXT NOT NULL,
                exercise_id INTEGER NOT NULL REFERENCES exercises (id),
                workout_date TEXT NOT NULL,
                weight REAL NOT NULL,
                sets INTEGER NOT NULL,
                target_reps INTEGER NOT NULL,
                achieved_reps INTEGER NOT NULL,
                success INTEGER NOT NULL,
                scheme TEXT NOT NULL
            );

            CREATE INDEX IF NOT EXISTS idx_workouts_user_exercise
                ON workouts (user_id, exercise_id, workout_date);

            CREATE TABLE IF NOT EXISTS user_exercise_settings (
                user_id TEXT NOT NULL,
                exercise_id INTEGER NOT NULL REFERENCES exercises (id),
                starting_scheme TEXT NOT NULL,
                PRIMARY KEY (user_id, exercise_id)
            );

            CREATE TABLE IF NOT EXISTS cardio_workouts (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                user_id TEXT NOT NULL,
                exercise_id INTEGER NOT NULL REFERENCES exercises (id),
                workout_date TEXT NOT NULL,
                time_minutes INTEGER NOT NULL,
                distance_km REAL NOT NULL,
                difficulty TEXT
            );",
        )?;
        Ok(())
    }

    /// Add an exercise to the shared catalog
    pub fn add_exercise(&self, name: &str, kind: ExerciseKind) -> Result<i64> {
        let name = name.trim();
        if name.is_empty() {
            return Err(RepositoryError::InvalidRecord("exercise name must not be empty".into()));
        }

        match self.conn.execute(
            "INSERT INTO exercises (name, kind) VALUES (?1, ?2)",
            params![name, kind.as_str()],
        ) {
            Ok(_) => {
                debug!(name, %kind, "Added exercise");
                Ok(self.conn.last_insert_rowid())
            }
            Err(rusqlite::Error::SqliteFailure(e, _)) if e.code == ErrorCode::ConstraintViolation => {
                Err(RepositoryError::DuplicateExercise(name.to_string()))
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Exercise names of one kind, alphabetical
    pub fn exercises(&self, kind: ExerciseKind) -> Result<Vec<String>> {
        let mut stmt = self
            .conn
            .prepare("SELECT name FROM exercises WHERE kind = ?1 ORDER BY name")?;
        let names = stmt
            .query_map(params![kind.as_str()], |row| row.get(0))?
            .collect::<rusqlite::Result<Vec<String>>>()?;
        Ok(names)
    }

    /// Check whether `name` is in the catalog as an exercise of `kind`
    pub fn has_exercise(&self, name: &str, kind: ExerciseKind) -> Result<bool> {
        match self.exercise_id(name, kind) {
            Ok(_) => Ok(true),
            Err(RepositoryError::UnknownExercise { .. }) => Ok(false),
            Err(e) => Err(e),
        }
    }

    /// Resolve an exercise name of the given kind to its row id
    pub(crate) fn exercise_id(&self, name: &str, kind: ExerciseKind) -> Result<i64> {
        self.conn
            .query_row(
                "SELECT id FROM exercises WHERE name = ?1 AND kind = ?2",
                params![name.trim(), kind.as_str()],
                |row| row.get(0),
            )
            .optional()?
            .ok_or_else(|| RepositoryError::UnknownExercise {
                name: name.trim().to_string(),
                kind,
            })
    }

    /// Append a strength workout for `user`
    pub fn log_workout(&self, user: &UserContext, workout: &NewWorkout) -> Result<i64> {
        workout.validate()?;
        let exercise_id = self.exercise_id(&workout.exercise, ExerciseKind::Strength)?;

        self.conn.execute(
            "INSERT INTO workouts (user_id, exercise_id, workout_date, weight, sets, target_reps, achieved_reps, success, scheme)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
            params![
                user.user_id(),
                exercise_id,
                format_date(workout.date),
                workout.weight,
                workout.sets,
                workout.target_reps,
                workout.achieved_reps,
                workout.success,
                workout.scheme.trim(),
            ],
        )?;
        let id = self.conn.last_insert_rowid();
        info!(user = user.user_id(), exercise = %workout.exercise, id, "Logged workout");
        Ok(id)
    }

    /// Workouts for `user`, newest first, optionally for one exercise
    pub fn workouts(&self, user: &UserContext, exercise: Option<&str>) -> Result<Vec<WorkoutRecord>> {
        let sql = format!(
            "SELECT {WORKOUT_COLUMNS}
             FROM workouts w
             JOIN exercises e ON w.exercise_id = e.id
             WHERE w.user_id = ?1 AND (?2 IS NULL OR e.name = ?2)
             ORDER BY w.workout_date DESC, w.id DESC"
        );
        let mut stmt = self.conn.prepare(&sql)?;
        let workouts = stmt
            .query_map(params![user.user_id(), exercise.map(str::trim)], workout_from_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(workouts)
    }

    /// Most recent workout for one exercise: latest date, then latest insert
    pub fn last_workout(&self, user: &UserContext, exercise: &str) -> Result<Option<WorkoutRecord>> {
        let sql = format!(
            "SELECT {WORKOUT_COLUMNS}
             FROM workouts w
             JOIN exercises e ON w.exercise_id = e.id
             WHERE w.user_id = ?1 AND e.name = ?2
             ORDER BY w.workout_date DESC, w.id DESC
             LIMIT 1"
        );
        let last = self
            .conn
            .query_row(&sql, params![user.user_id(), exercise.trim()], workout_from_row)
            .optional()?;
        Ok(last)
    }

    /// Scheme the user chose to begin `exercise` at, if any
    pub fn starting_scheme(&self, user: &UserContext, exercise: &str) -> Result<Option<String>> {
        let scheme = self
            .conn
            .query_row(
                "SELECT s.starting_scheme
                 FROM user_exercise_settings s
                 JOIN exercises e ON s.exercise_id = e.id
                 WHERE s.user_id = ?1 AND e.name = ?2",
                params![user.user_id(), exercise.trim()],
                |row| row.get(0),
            )
            .optional()?;
        Ok(scheme)
    }

    /// Create or replace the starting scheme for `exercise`
    pub fn set_starting_scheme(&self, user: &UserContext, exercise: &str, scheme: &str) -> Result<()> {
        let scheme = scheme.trim();
        if scheme.is_empty() {
            return Err(RepositoryError::InvalidRecord("scheme must not be empty".into()));
        }
        let exercise_id = self.exercise_id(exercise, ExerciseKind::Strength)?;

        self.conn.execute(
            "INSERT INTO user_exercise_settings (user_id, exercise_id, starting_scheme)
             VALUES (?1, ?2, ?3)
             ON CONFLICT (user_id, exercise_id) DO UPDATE
             SET starting_scheme = excluded.starting_scheme",
            params![user.user_id(), exercise_id, scheme],
        )?;
        debug!(user = user.user_id(), exercise, scheme, "Set starting scheme");
        Ok(())
    }
}
