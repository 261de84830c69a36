//! Pre-fitted model artifacts: label encoder, feature scaler, ONNX
//! classifier, and the loader that binds them into one immutable handle.

mod artifacts;
mod encoder;
mod onnx;
mod scaler;

pub use artifacts::{ArtifactPaths, Artifacts};
pub use encoder::LabelEncoder;
pub use onnx::OnnxClassifier;
pub use scaler::StandardScaler;

use crate::error::EngineError;

/// Operations the fitted classifier artifact must expose. The serialization
/// behind it stays opaque to the pipeline.
pub trait Classifier: Send + Sync {
    /// Predicted class for one already-scaled row: 1 = high risk.
    fn predict(&self, row: &[f32]) -> Result<i64, EngineError>;

    /// Per-class probabilities for one already-scaled row, indexed by class.
    fn predict_proba(&self, row: &[f32]) -> Result<Vec<f32>, EngineError>;
}
