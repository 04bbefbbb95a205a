//! Training log stored in a single `SQLite` database.
//!
//! The connection is locked for the whole duration of a repository call. Warmup flags of an
//! exercise are written inside one transaction, so a failed batch leaves all flags unchanged.

use std::{
    path::Path,
    sync::{Mutex, MutexGuard},
};

use anyhow::Context;
use chrono::NaiveDateTime;
use ironlog_domain as domain;
use log::{debug, warn};
use rusqlite::{Connection, OptionalExtension, params};
use uuid::Uuid;

use crate::row::{ExerciseRow, SetRow, TIMESTAMP_FORMAT};

const SETTINGS_KEY: &str = "settings";

#[derive(strum::AsRefStr)]
#[strum(serialize_all = "snake_case")]
enum Table {
    Exercises,
    Workouts,
    Sets,
    Settings,
}

pub struct SQLite {
    connection: Mutex<Connection>,
}

impl SQLite {
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, Error> {
        debug!("opening database {}", path.as_ref().display());
        Self::new(Connection::open(path)?)
    }

    pub fn open_in_memory() -> Result<Self, Error> {
        Self::new(Connection::open_in_memory()?)
    }

    fn new(connection: Connection) -> Result<Self, Error> {
        connection.execute_batch(&format!(
            "BEGIN;
            CREATE TABLE IF NOT EXISTS {exercises} (
                id TEXT PRIMARY KEY NOT NULL,
                name TEXT NOT NULL
            );
            CREATE TABLE IF NOT EXISTS {workouts} (
                id TEXT PRIMARY KEY NOT NULL,
                end_time TEXT NOT NULL
            );
            CREATE TABLE IF NOT EXISTS {sets} (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                exercise_id TEXT NOT NULL,
                workout_id TEXT NOT NULL,
                reps INTEGER,
                weight REAL,
                rpe REAL,
                warmup INTEGER NOT NULL DEFAULT 0
            );
            CREATE INDEX IF NOT EXISTS idx_sets_exercise_id ON {sets} (exercise_id);
            CREATE TABLE IF NOT EXISTS {settings} (
                key TEXT PRIMARY KEY NOT NULL,
                value TEXT NOT NULL
            );
            COMMIT;",
            exercises = Table::Exercises.as_ref(),
            workouts = Table::Workouts.as_ref(),
            sets = Table::Sets.as_ref(),
            settings = Table::Settings.as_ref(),
        ))?;
        Ok(Self {
            connection: Mutex::new(connection),
        })
    }

    pub(crate) fn connection(&self) -> Result<MutexGuard<'_, Connection>, Error> {
        self.connection.lock().map_err(|_| Error::Poisoned)
    }

    pub fn create_exercise(&self, name: domain::Name) -> Result<domain::Exercise, Error> {
        let id = Uuid::new_v4();
        self.connection()?.execute(
            &format!(
                "INSERT INTO {} (id, name) VALUES (?1, ?2)",
                Table::Exercises.as_ref()
            ),
            params![id.to_string(), name.to_string()],
        )?;
        Ok(domain::Exercise {
            id: id.into(),
            name,
        })
    }

    pub fn create_workout(&self, end_time: NaiveDateTime) -> Result<domain::WorkoutID, Error> {
        let id = Uuid::new_v4();
        self.connection()?.execute(
            &format!(
                "INSERT INTO {} (id, end_time) VALUES (?1, ?2)",
                Table::Workouts.as_ref()
            ),
            params![id.to_string(), end_time.format(TIMESTAMP_FORMAT).to_string()],
        )?;
        Ok(id.into())
    }

    pub fn create_set(
        &self,
        workout_id: domain::WorkoutID,
        exercise_id: domain::ExerciseID,
        reps: Option<domain::Reps>,
        weight: Option<domain::Weight>,
        rpe: Option<domain::RPE>,
    ) -> Result<domain::SetID, Error> {
        let connection = self.connection()?;
        connection.execute(
            &format!(
                "INSERT INTO {} (exercise_id, workout_id, reps, weight, rpe) \
                 VALUES (?1, ?2, ?3, ?4, ?5)",
                Table::Sets.as_ref()
            ),
            params![
                exercise_id.to_string(),
                workout_id.to_string(),
                reps.map(u32::from),
                weight.map(|weight| f64::from(f32::from(weight))),
                rpe.map(|rpe| f64::from(f32::from(rpe))),
            ],
        )?;
        let id = u64::try_from(connection.last_insert_rowid()).context("invalid set id")?;
        Ok(id.into())
    }

    fn query_exercises(&self) -> Result<Vec<domain::Exercise>, Error> {
        let connection = self.connection()?;
        let mut statement = connection.prepare(&format!(
            "SELECT id, name FROM {} ORDER BY name",
            Table::Exercises.as_ref()
        ))?;
        let rows = statement.query_map([], |row| {
            Ok(ExerciseRow {
                id: row.get(0)?,
                name: row.get(1)?,
            })
        })?;
        let rows = decodable(rows, "exercise")?;
        Ok(rows
            .into_iter()
            .filter_map(|row| {
                let id = row.id.clone();
                domain::Exercise::try_from(row)
                    .inspect_err(|err| warn!("skipping exercise {id}: {err:#}"))
                    .ok()
            })
            .collect())
    }

    fn query_exercise(&self, id: domain::ExerciseID) -> Result<domain::Exercise, Error> {
        let row = self.connection()?.query_row(
            &format!(
                "SELECT id, name FROM {} WHERE id = ?1",
                Table::Exercises.as_ref()
            ),
            params![id.to_string()],
            |row| {
                Ok(ExerciseRow {
                    id: row.get(0)?,
                    name: row.get(1)?,
                })
            },
        )?;
        Ok(domain::Exercise::try_from(row)?)
    }

    fn query_sets(
        &self,
        exercise_id: domain::ExerciseID,
    ) -> Result<Vec<domain::WorkoutSet>, Error> {
        let connection = self.connection()?;
        let mut statement = connection.prepare(&format!(
            "SELECT s.id, s.exercise_id, s.workout_id, s.reps, s.weight, s.rpe, \
             w.end_time, s.warmup \
             FROM {sets} s JOIN {workouts} w ON s.workout_id = w.id \
             WHERE s.exercise_id = ?1 \
             ORDER BY s.id ASC",
            sets = Table::Sets.as_ref(),
            workouts = Table::Workouts.as_ref(),
        ))?;
        let rows = statement.query_map(params![exercise_id.to_string()], |row| {
            Ok(SetRow {
                id: row.get(0)?,
                exercise_id: row.get(1)?,
                workout_id: row.get(2)?,
                reps: row.get(3)?,
                weight: row.get(4)?,
                rpe: row.get(5)?,
                end_time: row.get(6)?,
                warmup: row.get(7)?,
            })
        })?;
        let rows = decodable(rows, "set")?;
        Ok(rows
            .into_iter()
            .filter_map(|row| {
                let id = row.id;
                domain::WorkoutSet::try_from(row)
                    .inspect_err(|err| warn!("skipping set {id}: {err:#}"))
                    .ok()
            })
            .collect())
    }

    fn update_warmup_flags(
        &self,
        exercise_id: domain::ExerciseID,
        classifications: &[domain::Classification],
    ) -> Result<(), Error> {
        let mut connection = self.connection()?;
        let transaction = connection.transaction()?;
        {
            let mut statement = transaction.prepare(&format!(
                "UPDATE {} SET warmup = ?1 WHERE id = ?2 AND exercise_id = ?3",
                Table::Sets.as_ref()
            ))?;
            for classification in classifications {
                let id = i64::try_from(*classification.set_id).context("invalid set id")?;
                let changed = statement.execute(params![
                    classification.warmup,
                    id,
                    exercise_id.to_string()
                ])?;
                if changed == 0 {
                    return Err(Error::SetNotFound(classification.set_id, exercise_id));
                }
            }
        }
        transaction.commit()?;
        Ok(())
    }

    fn query_settings(&self) -> Result<domain::Settings, Error> {
        let value: Option<String> = self
            .connection()?
            .query_row(
                &format!(
                    "SELECT value FROM {} WHERE key = ?1",
                    Table::Settings.as_ref()
                ),
                params![SETTINGS_KEY],
                |row| row.get(0),
            )
            .optional()?;
        match value {
            Some(value) => Ok(serde_json::from_str(&value)?),
            None => Ok(domain::Settings::default()),
        }
    }

    fn replace_settings(&self, settings: &domain::Settings) -> Result<(), Error> {
        self.connection()?.execute(
            &format!(
                "INSERT OR REPLACE INTO {} (key, value) VALUES (?1, ?2)",
                Table::Settings.as_ref()
            ),
            params![SETTINGS_KEY, serde_json::to_string(settings)?],
        )?;
        Ok(())
    }
}

/// Collect the rows of a query, skipping rows with cells of an unexpected type.
fn decodable<T>(
    rows: impl Iterator<Item = rusqlite::Result<T>>,
    entity: &str,
) -> Result<Vec<T>, Error> {
    let mut result = vec![];
    for row in rows {
        match row {
            Ok(row) => result.push(row),
            Err(
                err @ (rusqlite::Error::InvalidColumnType(..)
                | rusqlite::Error::FromSqlConversionFailure(..)
                | rusqlite::Error::IntegralValueOutOfRange(..)),
            ) => warn!("skipping {entity}: {err}"),
            Err(err) => return Err(err.into()),
        }
    }
    Ok(result)
}

impl domain::ExerciseRepository for SQLite {
    async fn read_exercises(&self) -> Result<Vec<domain::Exercise>, domain::ReadError> {
        Ok(self.query_exercises()?)
    }

    async fn read_exercise(
        &self,
        id: domain::ExerciseID,
    ) -> Result<domain::Exercise, domain::ReadError> {
        Ok(self.query_exercise(id)?)
    }
}

impl domain::WorkoutSetRepository for SQLite {
    async fn read_sets(
        &self,
        exercise_id: domain::ExerciseID,
    ) -> Result<Vec<domain::WorkoutSet>, domain::ReadError> {
        Ok(self.query_sets(exercise_id)?)
    }

    async fn write_warmup_flags(
        &self,
        exercise_id: domain::ExerciseID,
        classifications: &[domain::Classification],
    ) -> Result<(), domain::UpdateError> {
        Ok(self.update_warmup_flags(exercise_id, classifications)?)
    }
}

impl domain::SettingsRepository for SQLite {
    async fn read_settings(&self) -> Result<domain::Settings, domain::ReadError> {
        Ok(self.query_settings()?)
    }

    async fn write_settings(&self, settings: &domain::Settings) -> Result<(), domain::UpdateError> {
        Ok(self.replace_settings(settings)?)
    }
}

#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("connection poisoned")]
    Poisoned,
    #[error("set {0} of exercise {1} not found")]
    SetNotFound(domain::SetID, domain::ExerciseID),
    #[error(transparent)]
    SQLite(#[from] rusqlite::Error),
    #[error(transparent)]
    Serialization(#[from] serde_json::Error),
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl From<Error> for domain::ReadError {
    fn from(value: Error) -> Self {
        match value {
            Error::SQLite(rusqlite::Error::QueryReturnedNoRows) => domain::ReadError::NotFound,
            Error::Poisoned => domain::ReadError::Storage(domain::StorageError::NoConnection),
            _ => domain::ReadError::Storage(domain::StorageError::Other(value.into())),
        }
    }
}

impl From<Error> for domain::UpdateError {
    fn from(value: Error) -> Self {
        match value {
            Error::SetNotFound(..) => domain::UpdateError::Conflict,
            Error::Poisoned => domain::UpdateError::Storage(domain::StorageError::NoConnection),
            _ => domain::UpdateError::Storage(domain::StorageError::Other(value.into())),
        }
    }
}
