//! Intake record, derived columns, and ordered feature vector assembly.

mod assemble;
mod derive;

pub use assemble::{assemble, FeatureColumns};
pub use derive::DerivedFeatures;

use serde::{Deserialize, Serialize};

/// One raw intake record per prediction request. Gender stays a free string
/// here; the fitted label encoder decides what is in-vocabulary.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawInput {
    pub age: u32,
    pub gender: String,
    pub bmi: f64,
    pub daily_steps: u32,
    pub sleep_hours: f64,
    pub water_intake_l: f64,
    pub calories_consumed: u32,
    /// 0 or 1
    pub smoker: u8,
    /// 0 or 1
    pub alcohol: u8,
    pub resting_hr: u32,
    pub systolic_bp: u32,
    pub diastolic_bp: u32,
    pub cholesterol: u32,
    /// 0 or 1
    pub family_history: u8,
}

/// Ordered numeric vector matching the fitted column order. Scaling and
/// inference are positional, so order is the whole contract.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureVector {
    pub values: Vec<f64>,
}

impl FeatureVector {
    pub fn as_slice(&self) -> &[f64] {
        &self.values
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

#[cfg(test)]
pub(crate) use test_support::{test_columns, test_input};
