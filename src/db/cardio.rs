//! Cardio sessions: time, distance and a free-form difficulty note

use chrono::NaiveDate;
use rusqlite::{OptionalExtension, Row, params};
use serde::{Deserialize, Serialize};
use tracing::info;

use super::{Database, RepositoryError, Result, UserContext, format_date, parse_date};
use crate::exercises::ExerciseKind;

/// Cardio session record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CardioRecord {
    pub id: i64,
    pub user_id: String,
    pub workout_type: String,
    pub date: NaiveDate,
    pub time_minutes: u32,
    pub distance_km: f64,
    pub difficulty: Option<String>, // e.g. "5/10", "Program 3"
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewCardio {
    pub workout_type: String,
    pub date: NaiveDate,
    pub time_minutes: u32,
    pub distance_km: f64,
    pub difficulty: Option<String>,
}

impl NewCardio {
    fn validate(&self) -> Result<()> {
        if self.time_minutes == 0 {
            return Err(RepositoryError::InvalidRecord("time must be at least 1 minute".into()));
        }
        if !self.distance_km.is_finite() || self.distance_km < 0.0 {
            return Err(RepositoryError::InvalidRecord(format!(
                "distance must be a non-negative number, got {}",
                self.distance_km
            )));
        }
        Ok(())
    }
}

fn cardio_from_row(row: &Row) -> rusqlite::Result<CardioRecord> {
    Ok(CardioRecord {
        id: row.get(0)?,
        user_id: row.get(1)?,
        workout_type: row.get(2)?,
        date: parse_date(row, 3)?,
        time_minutes: row.get(4)?,
        distance_km: row.get(5)?,
        difficulty: row.get(6)?,
    })
}

const CARDIO_QUERY: &str = "SELECT c.id, c.user_id, e.name, c.workout_date, c.time_minutes, c.distance_km, c.difficulty
     FROM cardio_workouts c
     JOIN exercises e ON c.exercise_id = e.id
     WHERE c.user_id = ?1 AND (?2 IS NULL OR e.name = ?2)
     ORDER BY c.workout_date DESC, c.id DESC";

impl Database {
    /// Append a cardio session for `user`
    pub fn log_cardio(&self, user: &UserContext, cardio: &NewCardio) -> Result<i64> {
        cardio.validate()?;
        let exercise_id = self.exercise_id(&cardio.workout_type, ExerciseKind::Cardio)?;

        let difficulty = cardio
            .difficulty
            .as_deref()
            .map(str::trim)
            .filter(|d| !d.is_empty());

        self.conn.execute(
            "INSERT INTO cardio_workouts (user_id, exercise_id, workout_date, time_minutes, distance_km, difficulty)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            params![
                user.user_id(),
                exercise_id,
                format_date(cardio.date),
                cardio.time_minutes,
                cardio.distance_km,
                difficulty,
            ],
        )?;
        let id = self.conn.last_insert_rowid();
        info!(user = user.user_id(), workout_type = %cardio.workout_type, id, "Logged cardio");
        Ok(id)
    }

    /// Cardio sessions for `user`, newest first, optionally for one type
    pub fn cardio_workouts(&self, user: &UserContext, workout_type: Option<&str>) -> Result<Vec<CardioRecord>> {
        let mut stmt = self.conn.prepare(CARDIO_QUERY)?;
        let records = stmt
            .query_map(params![user.user_id(), workout_type.map(str::trim)], cardio_from_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(records)
    }

    /// Most recent session of one cardio type
    pub fn last_cardio(&self, user: &UserContext, workout_type: &str) -> Result<Option<CardioRecord>> {
        let sql = format!("{CARDIO_QUERY} LIMIT 1");
        let last = self
            .conn
            .query_row(&sql, params![user.user_id(), workout_type.trim()], cardio_from_row)
            .optional()?;
        Ok(last)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn setup() -> (Database, UserContext) {
        let db = Database::open_in_memory().unwrap();
        db.add_exercise("Rowing", ExerciseKind::Cardio).unwrap();
        db.add_exercise("Cycling", ExerciseKind::Cardio).unwrap();
        db.add_exercise("Squat", ExerciseKind::Strength).unwrap();
        (db, UserContext::new("alice").unwrap())
    }

    fn session(workout_type: &str, day: u32, minutes: u32) -> NewCardio {
        NewCardio {
            workout_type: workout_type.to_string(),
            date: NaiveDate::from_ymd_opt(2024, 5, day).unwrap(),
            time_minutes: minutes,
            distance_km: 5.0,
            difficulty: Some("6/10".to_string()),
        }
    }

    #[test]
    fn test_log_and_list_cardio() {
        let (db, user) = setup();
        db.log_cardio(&user, &session("Rowing", 1, 20)).unwrap();
        db.log_cardio(&user, &session("Cycling", 2, 45)).unwrap();

        let all = db.cardio_workouts(&user, None).unwrap();
        assert_eq!(all.len(), 2);
        assert_eq!(all[0].workout_type, "Cycling");

        let rowing = db.cardio_workouts(&user, Some("rowing")).unwrap();
        assert_eq!(rowing.len(), 1);
        assert_eq!(rowing[0].time_minutes, 20);
        assert_eq!(rowing[0].difficulty.as_deref(), Some("6/10"));
    }

    #[test]
    fn test_last_cardio() {
        let (db, user) = setup();
        assert!(db.last_cardio(&user, "Rowing").unwrap().is_none());

        db.log_cardio(&user, &session("Rowing", 3, 30)).unwrap();
        db.log_cardio(&user, &session("Rowing", 3, 35)).unwrap();
        db.log_cardio(&user, &session("Rowing", 1, 40)).unwrap();

        let last = db.last_cardio(&user, "Rowing").unwrap().unwrap();
        assert_eq!(last.time_minutes, 35);
    }

    #[test]
    fn test_blank_difficulty_stored_as_none() {
        let (db, user) = setup();
        let mut s = session("Rowing", 1, 20);
        s.difficulty = Some("  ".to_string());
        db.log_cardio(&user, &s).unwrap();
        assert!(db.last_cardio(&user, "Rowing").unwrap().unwrap().difficulty.is_none());
    }

    #[test]
    fn test_cardio_validation() {
        let (db, user) = setup();
        let mut s = session("Rowing", 1, 0);
        assert!(matches!(db.log_cardio(&user, &s), Err(RepositoryError::InvalidRecord(_))));

        s.time_minutes = 10;
        s.distance_km = -1.0;
        assert!(matches!(db.log_cardio(&user, &s), Err(RepositoryError::InvalidRecord(_))));
    }

    #[test]
    fn test_cardio_requires_cardio_exercise() {
        let (db, user) = setup();
        let err = db.log_cardio(&user, &session("Squat", 1, 10)).unwrap_err();
        assert!(matches!(err, RepositoryError::UnknownExercise { kind: ExerciseKind::Cardio, .. }));
    }
}
