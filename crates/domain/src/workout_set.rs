use chrono::{NaiveDate, NaiveDateTime};
use derive_more::{Deref, Display};
use uuid::Uuid;

use crate::{
    Classification, ExerciseID, RPE, ReadError, Reps, UpdateError, Weight, estimate_one_rep_max,
    volume, week_start,
};

#[allow(async_fn_in_trait)]
pub trait WorkoutSetRepository {
    /// All sets of an exercise in insertion order.
    async fn read_sets(&self, exercise_id: ExerciseID) -> Result<Vec<WorkoutSet>, ReadError>;
    /// Replace the warmup flags of an exercise's sets. Either all flags are written or none.
    async fn write_warmup_flags(
        &self,
        exercise_id: ExerciseID,
        classifications: &[Classification],
    ) -> Result<(), UpdateError>;
}

/// A single logged set.
///
/// `completed_at` is the end time of the workout the set belongs to, not the moment the set
/// itself was entered.
#[derive(Debug, Clone, PartialEq)]
pub struct WorkoutSet {
    pub id: SetID,
    pub exercise_id: ExerciseID,
    pub workout_id: WorkoutID,
    pub reps: Option<Reps>,
    pub weight: Option<Weight>,
    pub rpe: Option<RPE>,
    pub completed_at: NaiveDateTime,
    pub warmup: bool,
}

impl WorkoutSet {
    /// Zero for sets without positive reps or without a weight.
    #[must_use]
    pub fn estimated_one_rep_max(&self) -> f32 {
        match (self.reps, self.weight) {
            (Some(reps), Some(weight)) if reps.is_positive() => {
                estimate_one_rep_max(weight.into(), reps.into())
            }
            _ => 0.0,
        }
    }

    #[must_use]
    pub fn volume(&self) -> f32 {
        match (self.reps, self.weight) {
            (Some(reps), Some(weight)) => volume(weight.into(), reps.into()),
            _ => 0.0,
        }
    }

    /// Monday of the week in which the owning workout ended.
    #[must_use]
    pub fn week(&self) -> NaiveDate {
        week_start(self.completed_at.date())
    }
}

/// Insertion-ordered identifier of a set.
#[derive(Deref, Debug, Display, Default, Clone, Copy, Hash, PartialEq, Eq, PartialOrd, Ord)]
pub struct SetID(u64);

impl From<u64> for SetID {
    fn from(value: u64) -> Self {
        Self(value)
    }
}

#[derive(Deref, Debug, Display, Default, Clone, Copy, Hash, PartialEq, Eq, PartialOrd, Ord)]
pub struct WorkoutID(Uuid);

impl WorkoutID {
    #[must_use]
    pub fn nil() -> Self {
        Self(Uuid::nil())
    }

    #[must_use]
    pub fn is_nil(&self) -> bool {
        self.0.is_nil()
    }
}

impl From<Uuid> for WorkoutID {
    fn from(value: Uuid) -> Self {
        Self(value)
    }
}

impl From<u128> for WorkoutID {
    fn from(value: u128) -> Self {
        Self(Uuid::from_bytes(value.to_be_bytes()))
    }
}

#[cfg(test)]
mod tests {
    use assert_approx_eq::assert_approx_eq;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    use super::*;

    fn set(reps: Option<u32>, weight: Option<f32>) -> WorkoutSet {
        WorkoutSet {
            id: 1.into(),
            exercise_id: 1.into(),
            workout_id: 1.into(),
            reps: reps.map(|r| Reps::new(r).unwrap()),
            weight: weight.map(|w| Weight::new(w).unwrap()),
            rpe: Some(RPE::EIGHT),
            completed_at: NaiveDate::from_ymd_opt(2024, 3, 14)
                .unwrap()
                .and_hms_opt(18, 30, 0)
                .unwrap(),
            warmup: false,
        }
    }

    #[rstest]
    #[case(Some(5), Some(100.0), 116.65)]
    #[case(Some(0), Some(100.0), 0.0)]
    #[case(None, Some(100.0), 0.0)]
    #[case(Some(5), None, 0.0)]
    fn test_workout_set_estimated_one_rep_max(
        #[case] reps: Option<u32>,
        #[case] weight: Option<f32>,
        #[case] expected: f32,
    ) {
        assert_approx_eq!(set(reps, weight).estimated_one_rep_max(), expected, 0.001);
    }

    #[rstest]
    #[case(Some(5), Some(100.0), 500.0)]
    #[case(Some(0), Some(100.0), 0.0)]
    #[case(None, Some(100.0), 0.0)]
    #[case(Some(5), None, 0.0)]
    fn test_workout_set_volume(
        #[case] reps: Option<u32>,
        #[case] weight: Option<f32>,
        #[case] expected: f32,
    ) {
        assert_approx_eq!(set(reps, weight).volume(), expected);
    }

    #[test]
    fn test_workout_set_week() {
        assert_eq!(
            set(Some(5), Some(100.0)).week(),
            NaiveDate::from_ymd_opt(2024, 3, 11).unwrap()
        );
    }

    #[test]
    fn test_workout_id_nil() {
        assert!(WorkoutID::nil().is_nil());
        assert_eq!(WorkoutID::nil(), WorkoutID::default());
    }
}
