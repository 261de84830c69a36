//! Derived feature columns computed from a single intake record.

use super::RawInput;
use serde::{Deserialize, Serialize};

/// The five engineered columns appended to the raw record before scaling.
/// Formulas must match what the artifacts were fitted with.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DerivedFeatures {
    /// Systolic over diastolic pressure; 0 when diastolic is 0.
    pub bp_ratio: f64,
    /// Systolic minus diastolic pressure.
    pub pulse_pressure: f64,
    /// 1 when bmi >= 30.
    pub is_obese: u8,
    /// 1 when sleep is under 6 hours.
    pub low_sleep: u8,
    /// Additive count of the four binary risk flags, 0..=4.
    pub risk_score: u8,
}

impl DerivedFeatures {
    /// Pure derivation, no I/O.
    pub fn from_input(input: &RawInput) -> Self {
        let bp_ratio = if input.diastolic_bp == 0 {
            0.0
        } else {
            f64::from(input.systolic_bp) / f64::from(input.diastolic_bp)
        };
        let pulse_pressure = f64::from(input.systolic_bp) - f64::from(input.diastolic_bp);
        let is_obese = u8::from(input.bmi >= 30.0);
        let low_sleep = u8::from(input.sleep_hours < 6.0);
        let risk_score = input.smoker + input.alcohol + is_obese + low_sleep;
        Self {
            bp_ratio,
            pulse_pressure,
            is_obese,
            low_sleep,
            risk_score,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::test_input;

    #[test]
    fn nominal_record_derivation() {
        let d = DerivedFeatures::from_input(&test_input());
        assert_eq!(d.bp_ratio, 1.5);
        assert_eq!(d.pulse_pressure, 40.0);
        assert_eq!(d.is_obese, 0);
        assert_eq!(d.low_sleep, 0);
        assert_eq!(d.risk_score, 0);
    }

    #[test]
    fn zero_diastolic_guards_bp_ratio() {
        let mut input = test_input();
        input.diastolic_bp = 0;
        let d = DerivedFeatures::from_input(&input);
        assert_eq!(d.bp_ratio, 0.0);
        assert_eq!(d.pulse_pressure, 120.0);
    }

    #[test]
    fn obesity_boundary_at_exactly_30() {
        let mut input = test_input();
        input.bmi = 30.0;
        assert_eq!(DerivedFeatures::from_input(&input).is_obese, 1);
        input.bmi = 29.9;
        assert_eq!(DerivedFeatures::from_input(&input).is_obese, 0);
        input.bmi = 30.1;
        assert_eq!(DerivedFeatures::from_input(&input).is_obese, 1);
    }

    #[test]
    fn low_sleep_boundary_at_exactly_6() {
        let mut input = test_input();
        input.sleep_hours = 5.5;
        assert_eq!(DerivedFeatures::from_input(&input).low_sleep, 1);
        input.sleep_hours = 6.0;
        assert_eq!(DerivedFeatures::from_input(&input).low_sleep, 0);
    }

    #[test]
    fn risk_score_counts_all_four_flags() {
        let mut input = test_input();
        input.smoker = 1;
        input.alcohol = 1;
        input.bmi = 31.0;
        input.sleep_hours = 4.0;
        assert_eq!(DerivedFeatures::from_input(&input).risk_score, 4);

        input.alcohol = 0;
        input.sleep_hours = 8.0;
        assert_eq!(DerivedFeatures::from_input(&input).risk_score, 2);
    }
}
