use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Sex {
    FEMALE,
    MALE,
}

impl From<u8> for Sex {
    fn from(value: u8) -> Self {
        match value {
            0 => Sex::FEMALE,
            _ => Sex::MALE,
        }
    }
}

impl fmt::Display for Sex {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "{}",
            match self {
                Sex::FEMALE => "female",
                Sex::MALE => "male",
            }
        )
    }
}

/// Body mass index in kg/m².
#[must_use]
pub fn bmi(weight_kg: f32, height_cm: f32) -> Option<f32> {
    if !is_positive(weight_kg) || !is_positive(height_cm) {
        return None;
    }
    let height_m = height_cm / 100.;
    Some(weight_kg / (height_m * height_m))
}

/// Basal metabolic rate in kcal/day (Mifflin-St Jeor).
#[must_use]
pub fn bmr(sex: Sex, weight_kg: f32, height_cm: f32, age: u32) -> Option<f32> {
    if !is_positive(weight_kg) || !is_positive(height_cm) || age == 0 {
        return None;
    }
    #[allow(clippy::cast_precision_loss)]
    let age = age as f32;
    let base = 10. * weight_kg + 6.25 * height_cm - 5. * age;
    Some(match sex {
        Sex::FEMALE => base - 161.,
        Sex::MALE => base + 5.,
    })
}

fn is_positive(value: f32) -> bool {
    value.is_finite() && value > 0.
}

#[cfg(test)]
mod tests {
    use assert_approx_eq::assert_approx_eq;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    use super::*;

    #[rstest]
    #[case(80., 180., 24.691_358)]
    #[case(55., 160., 21.484_375)]
    fn test_bmi(#[case] weight: f32, #[case] height: f32, #[case] expected: f32) {
        assert_approx_eq!(bmi(weight, height).unwrap(), expected, 0.0001);
    }

    #[rstest]
    #[case(0., 180.)]
    #[case(80., 0.)]
    #[case(-80., 180.)]
    #[case(f32::NAN, 180.)]
    fn test_bmi_invalid(#[case] weight: f32, #[case] height: f32) {
        assert_eq!(bmi(weight, height), None);
    }

    #[rstest]
    #[case(Sex::MALE, 80., 180., 30, Some(1780.))]
    #[case(Sex::FEMALE, 80., 180., 30, Some(1614.))]
    #[case(Sex::FEMALE, 60., 165., 45, Some(1245.25))]
    #[case(Sex::MALE, 80., 180., 0, None)]
    #[case(Sex::MALE, 0., 180., 30, None)]
    fn test_bmr(
        #[case] sex: Sex,
        #[case] weight: f32,
        #[case] height: f32,
        #[case] age: u32,
        #[case] expected: Option<f32>,
    ) {
        assert_eq!(bmr(sex, weight, height, age), expected);
    }

    #[rstest]
    #[case(0, Sex::FEMALE)]
    #[case(1, Sex::MALE)]
    fn test_sex_from_u8(#[case] value: u8, #[case] expected: Sex) {
        assert_eq!(Sex::from(value), expected);
        assert_eq!(expected.to_string(), ["female", "male"][usize::from(value)]);
    }
}
