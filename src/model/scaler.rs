//! Fitted standard scaler: positional (x - mean) / scale.

use crate::error::{EngineError, InferenceStage};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Per-column centering and scaling parameters captured at fit time.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StandardScaler {
    mean: Vec<f64>,
    scale: Vec<f64>,
}

impl StandardScaler {
    pub fn new(mean: Vec<f64>, scale: Vec<f64>) -> Result<Self, EngineError> {
        let scaler = Self { mean, scale };
        scaler.validate()?;
        Ok(scaler)
    }

    pub fn from_path(path: &Path) -> Result<Self, EngineError> {
        let data = std::fs::read_to_string(path).map_err(|e| EngineError::MalformedArtifact {
            artifact: "scaler",
            detail: e.to_string(),
        })?;
        let scaler: Self =
            serde_json::from_str(&data).map_err(|e| EngineError::MalformedArtifact {
                artifact: "scaler",
                detail: e.to_string(),
            })?;
        scaler.validate()?;
        Ok(scaler)
    }

    fn validate(&self) -> Result<(), EngineError> {
        if self.mean.is_empty() || self.mean.len() != self.scale.len() {
            return Err(EngineError::MalformedArtifact {
                artifact: "scaler",
                detail: format!(
                    "mean has {} entries, scale has {}",
                    self.mean.len(),
                    self.scale.len()
                ),
            });
        }
        if self.mean.iter().any(|v| !v.is_finite())
            || self.scale.iter().any(|v| !v.is_finite() || *v == 0.0)
        {
            return Err(EngineError::MalformedArtifact {
                artifact: "scaler",
                detail: "non-finite mean or zero scale entry".to_string(),
            });
        }
        Ok(())
    }

    /// Fitted column count.
    pub fn len(&self) -> usize {
        self.mean.len()
    }

    pub fn is_empty(&self) -> bool {
        self.mean.is_empty()
    }

    /// Positional transform; the row must match the fitted width exactly.
    pub fn transform(&self, row: &[f64]) -> Result<Vec<f64>, EngineError> {
        if row.len() != self.mean.len() {
            return Err(EngineError::InferenceFailure {
                stage: InferenceStage::Scale,
                detail: format!("expected {} columns, got {}", self.mean.len(), row.len()),
            });
        }
        Ok(row
            .iter()
            .zip(self.mean.iter().zip(&self.scale))
            .map(|(x, (mean, scale))| (x - mean) / scale)
            .collect())
    }
}
