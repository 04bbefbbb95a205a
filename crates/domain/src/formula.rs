//! Load formulas shared by the progress charts and the warmup detection.
//!
//! Negative or non-finite weights are treated as missing data and contribute zero.

pub const ONE_REP_MAX_FACTOR_PER_REP: f32 = 0.0333;

/// Estimate the one-repetition maximum of a set using a linear fatigue correction.
///
/// A set of zero repetitions is estimated at the weight itself.
#[must_use]
pub fn estimate_one_rep_max(weight: f32, reps: u32) -> f32 {
    if !is_valid_weight(weight) {
        return 0.0;
    }
    #[allow(clippy::cast_precision_loss)]
    let reps = reps as f32;
    weight * (1.0 + reps * ONE_REP_MAX_FACTOR_PER_REP)
}

/// Mechanical work of a set.
#[must_use]
pub fn volume(weight: f32, reps: u32) -> f32 {
    if !is_valid_weight(weight) {
        return 0.0;
    }
    #[allow(clippy::cast_precision_loss)]
    let reps = reps as f32;
    weight * reps
}

fn is_valid_weight(weight: f32) -> bool {
    weight.is_finite() && weight >= 0.0
}
