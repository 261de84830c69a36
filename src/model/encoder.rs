//! Fitted label encoder: string category to integer code.

use crate::error::EngineError;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Class list in fitted order; a value's code is its index. Out-of-vocabulary
/// values fail, never default.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LabelEncoder {
    classes: Vec<String>,
}

impl LabelEncoder {
    pub fn new(classes: Vec<String>) -> Self {
        Self { classes }
    }

    pub fn from_path(artifact: &'static str, path: &Path) -> Result<Self, EngineError> {
        let data = std::fs::read_to_string(path).map_err(|e| EngineError::MalformedArtifact {
            artifact,
            detail: e.to_string(),
        })?;
        let encoder: Self =
            serde_json::from_str(&data).map_err(|e| EngineError::MalformedArtifact {
                artifact,
                detail: e.to_string(),
            })?;
        if encoder.classes.is_empty() {
            return Err(EngineError::MalformedArtifact {
                artifact,
                detail: "empty class list".to_string(),
            });
        }
        Ok(encoder)
    }

    /// Map a category to the code the classifier was trained with.
    pub fn transform(&self, feature: &'static str, value: &str) -> Result<i64, EngineError> {
        self.classes
            .iter()
            .position(|c| c == value)
            .map(|i| i as i64)
            .ok_or_else(|| EngineError::UnknownCategory {
                feature,
                value: value.to_string(),
            })
    }

    pub fn classes(&self) -> &[String] {
        &self.classes
    }
}
