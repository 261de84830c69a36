//! Merges raw and derived columns, then orders them by the fitted schema.

use super::{DerivedFeatures, FeatureVector, RawInput};
use crate::error::EngineError;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;

/// Ordered feature names the scaler and classifier were fitted on. This list
/// ships as an artifact next to the model; it is the only source of column
/// order, and a positional mismatch produces wrong predictions, not errors.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FeatureColumns(Vec<String>);

impl FeatureColumns {
    pub fn new(names: Vec<String>) -> Self {
        Self(names)
    }

    pub fn from_path(path: &Path) -> Result<Self, EngineError> {
        let data = std::fs::read_to_string(path).map_err(|e| EngineError::MalformedArtifact {
            artifact: "feature_columns",
            detail: e.to_string(),
        })?;
        let columns: Self =
            serde_json::from_str(&data).map_err(|e| EngineError::MalformedArtifact {
                artifact: "feature_columns",
                detail: e.to_string(),
            })?;
        if columns.0.is_empty() {
            return Err(EngineError::MalformedArtifact {
                artifact: "feature_columns",
                detail: "empty column list".to_string(),
            });
        }
        Ok(columns)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }
}

/// Merge the intake record (gender replaced by its encoded code) with the
/// derived columns into a name-keyed mapping.
fn feature_map(
    input: &RawInput,
    gender_code: i64,
    derived: &DerivedFeatures,
) -> HashMap<&'static str, f64> {
    HashMap::from([
        ("age", f64::from(input.age)),
        ("gender", gender_code as f64),
        ("bmi", input.bmi),
        ("daily_steps", f64::from(input.daily_steps)),
        ("sleep_hours", input.sleep_hours),
        ("water_intake_l", input.water_intake_l),
        ("calories_consumed", f64::from(input.calories_consumed)),
        ("smoker", f64::from(input.smoker)),
        ("alcohol", f64::from(input.alcohol)),
        ("resting_hr", f64::from(input.resting_hr)),
        ("systolic_bp", f64::from(input.systolic_bp)),
        ("diastolic_bp", f64::from(input.diastolic_bp)),
        ("cholesterol", f64::from(input.cholesterol)),
        ("family_history", f64::from(input.family_history)),
        ("bp_ratio", derived.bp_ratio),
        ("pulse_pressure", derived.pulse_pressure),
        ("is_obese", f64::from(derived.is_obese)),
        ("low_sleep", f64::from(derived.low_sleep)),
        ("risk_score", f64::from(derived.risk_score)),
    ])
}

/// Order the merged mapping by the fitted column list. A name missing from
/// the mapping is schema drift between the artifacts and this build; it must
/// fail rather than silently drop or pad.
pub fn assemble(
    input: &RawInput,
    gender_code: i64,
    derived: &DerivedFeatures,
    columns: &FeatureColumns,
) -> Result<FeatureVector, EngineError> {
    let map = feature_map(input, gender_code, derived);
    let mut values = Vec::with_capacity(columns.len());
    for name in columns.iter() {
        match map.get(name) {
            Some(v) => values.push(*v),
            None => {
                return Err(EngineError::SchemaMismatch {
                    column: name.to_string(),
                })
            }
        }
    }
    Ok(FeatureVector { values })
}
