//! Typed failure taxonomy for artifact loading and per-request inference.

use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

/// Stage of the synchronous inference chain that raised.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InferenceStage {
    Scale,
    Predict,
    PredictProba,
}

impl fmt::Display for InferenceStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InferenceStage::Scale => f.write_str("scaler transform"),
            InferenceStage::Predict => f.write_str("classifier predict"),
            InferenceStage::PredictProba => f.write_str("classifier predict_proba"),
        }
    }
}

/// Every failure kind the engine can surface. `AssetNotFound`,
/// `MalformedArtifact`, and `ManifestMismatch` are fatal at startup: the
/// process must not serve with partial state. The remaining kinds fail a
/// single request and leave the pipeline serving.
#[derive(Debug, Error)]
pub enum EngineError {
    /// Categorical value outside the fitted encoder's vocabulary.
    #[error("unknown category `{value}` for feature `{feature}`")]
    UnknownCategory { feature: &'static str, value: String },

    /// The fitted column list names a feature absent after assembly.
    #[error("schema mismatch: feature column `{column}` missing from assembled features")]
    SchemaMismatch { column: String },

    /// Scaler or classifier raised; the stage stays visible to the operator.
    #[error("inference failure during {stage}: {detail}")]
    InferenceFailure { stage: InferenceStage, detail: String },

    /// A required artifact file is missing at startup.
    #[error("artifact `{artifact}` not found at {}", path.display())]
    AssetNotFound { artifact: &'static str, path: PathBuf },

    /// Artifact file present but undeserializable or internally inconsistent.
    #[error("artifact `{artifact}` is malformed: {detail}")]
    MalformedArtifact { artifact: &'static str, detail: String },

    /// Bundle manifest disagrees with the artifacts on disk.
    #[error("artifact bundle verification failed: {detail}")]
    ManifestMismatch { detail: String },
}
