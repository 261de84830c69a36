//! ONNX-backed classifier: one session, [1, n] f32 input, class label and
//! per-class probabilities out. sklearn exports emit probabilities either as
//! a plain tensor or as seq(map(int64, float)); both shapes are handled.

use crate::error::{EngineError, InferenceStage};
use crate::model::Classifier;
use ort::memory::Allocator;
use ort::session::builder::GraphOptimizationLevel;
use ort::session::Session;
use ort::value::{DowncastableTarget, DynMapValueType, DynSequenceValueType, DynValue, Tensor};
use std::path::Path;
use std::sync::{Mutex, MutexGuard};
use tracing::info;

pub struct OnnxClassifier {
    // Session::run takes &mut; the lock keeps the public handle shareable.
    session: Mutex<Session>,
    input_name: String,
    label_output: String,
    proba_output: String,
}

impl OnnxClassifier {
    /// Load the fitted classifier. A missing file is fatal for the caller;
    /// there is no degraded no-model mode.
    pub fn load(path: &Path) -> Result<Self, EngineError> {
        if !path.exists() {
            return Err(EngineError::AssetNotFound {
                artifact: "classifier",
                path: path.to_path_buf(),
            });
        }

        ort::init()
            .commit()
            .map_err(|e| EngineError::MalformedArtifact {
                artifact: "classifier",
                detail: format!("onnx runtime init: {e}"),
            })?;

        let session = Session::builder()
            .and_then(|b| b.with_optimization_level(GraphOptimizationLevel::Level3))
            .and_then(|b| b.with_intra_threads(1))
            .and_then(|b| b.commit_from_file(path))
            .map_err(|e| EngineError::MalformedArtifact {
                artifact: "classifier",
                detail: e.to_string(),
            })?;

        let input_name = session
            .inputs
            .first()
            .map(|i| i.name.clone())
            .unwrap_or_else(|| "float_input".to_string());
        let label_output = session
            .outputs
            .iter()
            .find(|o| o.name.contains("label"))
            .map(|o| o.name.clone())
            .unwrap_or_else(|| "label".to_string());
        let proba_output = session
            .outputs
            .iter()
            .find(|o| o.name.contains("prob"))
            .or_else(|| {
                session
                    .outputs
                    .iter()
                    .find(|o| o.name != label_output && o.name.contains("output"))
            })
            .map(|o| o.name.clone())
            .unwrap_or_else(|| "probabilities".to_string());

        info!(
            path = %path.display(),
            input = %input_name,
            label = %label_output,
            probabilities = %proba_output,
            "classifier loaded"
        );

        Ok(Self {
            session: Mutex::new(session),
            input_name,
            label_output,
            proba_output,
        })
    }

    fn input_tensor(row: &[f32], stage: InferenceStage) -> Result<Tensor<f32>, EngineError> {
        let shape = vec![1_i64, row.len() as i64];
        Tensor::from_array((shape, row.to_vec())).map_err(|e| EngineError::InferenceFailure {
            stage,
            detail: format!("input tensor: {e}"),
        })
    }

    fn lock(&self, stage: InferenceStage) -> Result<MutexGuard<'_, Session>, EngineError> {
        self.session
            .lock()
            .map_err(|_| EngineError::InferenceFailure {
                stage,
                detail: "classifier session lock poisoned".to_string(),
            })
    }
}

impl Classifier for OnnxClassifier {
    fn predict(&self, row: &[f32]) -> Result<i64, EngineError> {
        let stage = InferenceStage::Predict;
        let input = Self::input_tensor(row, stage)?;
        let mut session = self.lock(stage)?;
        let outputs = session
            .run(ort::inputs![self.input_name.as_str() => input])
            .map_err(|e| EngineError::InferenceFailure {
                stage,
                detail: e.to_string(),
            })?;
        let value = outputs
            .get(self.label_output.as_str())
            .ok_or_else(|| EngineError::InferenceFailure {
                stage,
                detail: format!("missing output `{}`", self.label_output),
            })?;
        let (_shape, data) =
            value
                .try_extract_tensor::<i64>()
                .map_err(|e| EngineError::InferenceFailure {
                    stage,
                    detail: format!("label tensor: {e}"),
                })?;
        data.first()
            .copied()
            .ok_or_else(|| EngineError::InferenceFailure {
                stage,
                detail: "empty label tensor".to_string(),
            })
    }

    fn predict_proba(&self, row: &[f32]) -> Result<Vec<f32>, EngineError> {
        let stage = InferenceStage::PredictProba;
        let input = Self::input_tensor(row, stage)?;
        let mut session = self.lock(stage)?;
        let outputs = session
            .run(ort::inputs![self.input_name.as_str() => input])
            .map_err(|e| EngineError::InferenceFailure {
                stage,
                detail: e.to_string(),
            })?;
        let value = outputs
            .get(self.proba_output.as_str())
            .ok_or_else(|| EngineError::InferenceFailure {
                stage,
                detail: format!("missing output `{}`", self.proba_output),
            })?;

        // Tensor output: [1, num_classes] for a single-row batch.
        if let Ok((_shape, data)) = value.try_extract_tensor::<f32>() {
            return Ok(data.to_vec());
        }

        // seq(map(int64, float)) output, the sklearn zipmap shape.
        if DynSequenceValueType::can_downcast(&value.dtype()) {
            return probabilities_from_sequence_map(value);
        }

        Err(EngineError::InferenceFailure {
            stage,
            detail: format!("output `{}` has unsupported type", self.proba_output),
        })
    }
}

/// Extract per-class probabilities from a seq(map(int64, float)) output,
/// ordered by class id.
fn probabilities_from_sequence_map(value: &DynValue) -> Result<Vec<f32>, EngineError> {
    let stage = InferenceStage::PredictProba;
    let fail = |detail: String| EngineError::InferenceFailure { stage, detail };

    let allocator = Allocator::default();
    let sequence = value
        .downcast_ref::<DynSequenceValueType>()
        .map_err(|e| fail(format!("sequence downcast: {e}")))?;
    let maps = sequence
        .try_extract_sequence::<DynMapValueType>(&allocator)
        .map_err(|e| fail(format!("sequence extract: {e}")))?;
    let first = maps
        .first()
        .ok_or_else(|| fail("empty probability sequence".to_string()))?;
    let mut pairs = first
        .try_extract_key_values::<i64, f32>()
        .map_err(|e| fail(format!("probability map extract: {e}")))?;
    if pairs.is_empty() {
        return Err(fail("empty probability map".to_string()));
    }
    pairs.sort_by_key(|(class, _)| *class);
    Ok(pairs.into_iter().map(|(_, p)| p).collect())
}
