//! Raw database rows and their mapping to domain records.
//!
//! Identifiers and timestamps are required, a row with an invalid one is rejected. Invalid
//! measurements are dropped from the record, as imported data may contain values outside of the
//! valid ranges.

use std::fmt::Display;

use anyhow::Context;
use chrono::NaiveDateTime;
use ironlog_domain as domain;
use log::warn;
use rusqlite::types::Value;
use uuid::Uuid;

pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

#[derive(Debug, Clone, PartialEq)]
pub struct ExerciseRow {
    pub id: String,
    pub name: String,
}

impl TryFrom<ExerciseRow> for domain::Exercise {
    type Error = anyhow::Error;

    fn try_from(value: ExerciseRow) -> Result<Self, Self::Error> {
        Ok(Self {
            id: parse_uuid(&value.id, "exercise")?.into(),
            name: domain::Name::new(&value.name)
                .with_context(|| format!("invalid name of exercise {}", value.id))?,
        })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SetRow {
    pub id: i64,
    pub exercise_id: String,
    pub workout_id: String,
    pub reps: Value,
    pub weight: Value,
    pub rpe: Value,
    pub end_time: String,
    pub warmup: bool,
}

impl TryFrom<SetRow> for domain::WorkoutSet {
    type Error = anyhow::Error;

    fn try_from(value: SetRow) -> Result<Self, Self::Error> {
        let id = u64::try_from(value.id).with_context(|| format!("invalid set id {}", value.id))?;
        Ok(Self {
            id: id.into(),
            exercise_id: parse_uuid(&value.exercise_id, "exercise")?.into(),
            workout_id: parse_uuid(&value.workout_id, "workout")?.into(),
            reps: measurement(&value.reps, integer, domain::Reps::try_from, id, "reps"),
            weight: measurement(&value.weight, real, domain::Weight::try_from, id, "weight"),
            rpe: measurement(&value.rpe, real, domain::RPE::try_from, id, "RPE"),
            completed_at: NaiveDateTime::parse_from_str(&value.end_time, TIMESTAMP_FORMAT)
                .with_context(|| format!("invalid end time \"{}\"", value.end_time))?,
            warmup: value.warmup,
        })
    }
}

fn parse_uuid(value: &str, entity: &str) -> Result<Uuid, anyhow::Error> {
    Uuid::parse_str(value).with_context(|| format!("invalid {entity} id \"{value}\""))
}

fn integer(value: &Value) -> Option<i64> {
    match value {
        Value::Integer(value) => Some(*value),
        _ => None,
    }
}

fn real(value: &Value) -> Option<f64> {
    match value {
        #[allow(clippy::cast_precision_loss)]
        Value::Integer(value) => Some(*value as f64),
        Value::Real(value) => Some(*value),
        _ => None,
    }
}

fn measurement<V, T, E>(
    value: &Value,
    extract: fn(&Value) -> Option<V>,
    convert: impl Fn(V) -> Result<T, E>,
    set_id: u64,
    name: &str,
) -> Option<T>
where
    V: Copy + Display,
    E: Display,
{
    if *value == Value::Null {
        return None;
    }
    let Some(value) = extract(value) else {
        warn!("ignoring non-numeric {name} {value:?} of set {set_id}");
        return None;
    };
    match convert(value) {
        Ok(converted) => Some(converted),
        Err(err) => {
            warn!("ignoring {name} {value} of set {set_id}: {err}");
            None
        }
    }
}
