use serde::{Deserialize, Serialize};

use crate::{ClassificationError, ExerciseID, ReadError, SetID, WorkoutSet};

#[allow(async_fn_in_trait)]
pub trait WarmupService {
    /// Reclassify all sets of one exercise and persist the verdicts as a single unit.
    async fn classify_exercise(
        &self,
        exercise_id: ExerciseID,
        criteria: &WarmupCriteria,
    ) -> Result<ClassificationSummary, ClassificationError>;

    /// Reclassify the sets of every exercise.
    ///
    /// Exercises are independent of each other. A failure of one exercise is recorded in the
    /// report and does not affect the others. Only a failure to list the exercises is returned
    /// as error.
    async fn classify_all_exercises(
        &self,
        criteria: &WarmupCriteria,
    ) -> Result<ClassificationReport, ReadError>;
}

/// Thresholds for detecting sets that deviate from the recent baseline.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq)]
#[serde(default)]
pub struct WarmupCriteria {
    /// Maximum number of preceding sets forming the baseline.
    pub window: usize,
    pub upper_ratio: f32,
    pub lower_ratio: f32,
}

impl Default for WarmupCriteria {
    fn default() -> Self {
        Self {
            window: 10,
            upper_ratio: 1.4,
            lower_ratio: 0.6,
        }
    }
}

impl WarmupCriteria {
    #[must_use]
    pub fn is_warmup(&self, estimate: f32, baseline: f32) -> bool {
        estimate > self.upper_ratio * baseline || estimate < self.lower_ratio * baseline
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Classification {
    pub set_id: SetID,
    pub warmup: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClassificationSummary {
    pub exercise_id: ExerciseID,
    pub sets: usize,
    pub warmup_sets: usize,
}

impl ClassificationSummary {
    #[must_use]
    pub fn new(exercise_id: ExerciseID, classifications: &[Classification]) -> Self {
        Self {
            exercise_id,
            sets: classifications.len(),
            warmup_sets: classifications.iter().filter(|c| c.warmup).count(),
        }
    }
}

#[derive(Debug, Default)]
pub struct ClassificationReport {
    pub results: Vec<(ExerciseID, Result<ClassificationSummary, ClassificationError>)>,
}

impl ClassificationReport {
    pub fn succeeded(&self) -> impl Iterator<Item = &ClassificationSummary> {
        self.results.iter().filter_map(|(_, r)| r.as_ref().ok())
    }

    pub fn failed(&self) -> impl Iterator<Item = (ExerciseID, &ClassificationError)> {
        self.results
            .iter()
            .filter_map(|(id, r)| r.as_ref().err().map(|err| (*id, err)))
    }
}

/// Classify each set of one exercise as warmup or working set.
///
/// The sets must be in chronological order. Every set is compared to the mean estimated one-rep
/// max of up to `criteria.window` preceding sets. The first set has no baseline and is never a
/// warmup set.
#[must_use]
pub fn classify_sets(sets: &[WorkoutSet], criteria: &WarmupCriteria) -> Vec<Classification> {
    let estimates = sets
        .iter()
        .map(WorkoutSet::estimated_one_rep_max)
        .collect::<Vec<_>>();

    sets.iter()
        .enumerate()
        .map(|(i, set)| {
            let window = &estimates[i.saturating_sub(criteria.window)..i];
            Classification {
                set_id: set.id,
                warmup: mean(window)
                    .is_some_and(|baseline| criteria.is_warmup(estimates[i], baseline)),
            }
        })
        .collect()
}

fn mean(values: &[f32]) -> Option<f32> {
    if values.is_empty() {
        return None;
    }
    #[allow(clippy::cast_precision_loss)]
    let len = values.len() as f32;
    Some(values.iter().sum::<f32>() / len)
}
