//! The risk inference pipeline: derive → encode → assemble → scale → classify.

use crate::error::{EngineError, InferenceStage};
use crate::features::{assemble, DerivedFeatures, RawInput};
use crate::model::Artifacts;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, info};
use uuid::Uuid;

/// Binary outcome reported to the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RiskLabel {
    HighRisk,
    LowRisk,
}

impl RiskLabel {
    /// Classifier classes: 1 = high risk, anything else = low risk.
    pub fn from_class(class: i64) -> Self {
        if class == 1 {
            RiskLabel::HighRisk
        } else {
            RiskLabel::LowRisk
        }
    }
}

/// Result of one prediction request; ephemeral, never persisted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Prediction {
    pub request_id: String,
    pub label: RiskLabel,
    /// Positive-class probability as a percentage in [0, 100].
    pub probability_percent: f64,
}

/// Request-per-submission inference over the shared read-only artifacts.
pub struct RiskPipeline {
    artifacts: Arc<Artifacts>,
}

impl RiskPipeline {
    pub fn new(artifacts: Arc<Artifacts>) -> Self {
        Self { artifacts }
    }

    /// Run the full synchronous chain for one intake record. Errors carry
    /// their kind; no partial result is ever produced.
    pub fn predict(&self, input: &RawInput) -> Result<Prediction, EngineError> {
        let request_id = Uuid::new_v4().to_string();

        let derived = DerivedFeatures::from_input(input);
        debug!(%request_id, risk_score = derived.risk_score, "features derived");

        let gender_code = self
            .artifacts
            .gender_encoder
            .transform("gender", &input.gender)?;
        let vector = assemble(input, gender_code, &derived, &self.artifacts.feature_columns)?;
        let scaled = self.artifacts.scaler.transform(vector.as_slice())?;
        let row: Vec<f32> = scaled.iter().map(|v| *v as f32).collect();

        let class = self.artifacts.classifier.predict(&row)?;
        let probabilities = self.artifacts.classifier.predict_proba(&row)?;
        let positive =
            probabilities
                .get(1)
                .copied()
                .ok_or_else(|| EngineError::InferenceFailure {
                    stage: InferenceStage::PredictProba,
                    detail: format!(
                        "expected a positive-class probability, got {} classes",
                        probabilities.len()
                    ),
                })?;

        let label = RiskLabel::from_class(class);
        let probability_percent = (f64::from(positive) * 100.0).clamp(0.0, 100.0);

        info!(%request_id, ?label, probability_percent, "prediction complete");

        Ok(Prediction {
            request_id,
            label,
            probability_percent,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::{test_columns, test_input};
    use crate::model::{Classifier, LabelEncoder, StandardScaler};

    struct StubClassifier {
        class: i64,
        probabilities: Vec<f32>,
    }

    impl Classifier for StubClassifier {
        fn predict(&self, _row: &[f32]) -> Result<i64, EngineError> {
            Ok(self.class)
        }

        fn predict_proba(&self, _row: &[f32]) -> Result<Vec<f32>, EngineError> {
            Ok(self.probabilities.clone())
        }
    }

    struct FailingClassifier;

    impl Classifier for FailingClassifier {
        fn predict(&self, _row: &[f32]) -> Result<i64, EngineError> {
            Err(EngineError::InferenceFailure {
                stage: InferenceStage::Predict,
                detail: "NaN in input".to_string(),
            })
        }

        fn predict_proba(&self, _row: &[f32]) -> Result<Vec<f32>, EngineError> {
            Err(EngineError::InferenceFailure {
                stage: InferenceStage::PredictProba,
                detail: "NaN in input".to_string(),
            })
        }
    }

    fn pipeline_with(classifier: Box<dyn Classifier>) -> RiskPipeline {
        let columns = test_columns();
        let width = columns.len();
        RiskPipeline::new(Arc::new(Artifacts {
            classifier,
            scaler: StandardScaler::new(vec![0.0; width], vec![1.0; width]).unwrap(),
            gender_encoder: LabelEncoder::new(vec!["Female".to_string(), "Male".to_string()]),
            feature_columns: columns,
        }))
    }

    #[test]
    fn positive_class_maps_to_high_risk() {
        let pipeline = pipeline_with(Box::new(StubClassifier {
            class: 1,
            probabilities: vec![0.25, 0.75],
        }));
        let prediction = pipeline.predict(&test_input()).unwrap();
        assert_eq!(prediction.label, RiskLabel::HighRisk);
        assert!((prediction.probability_percent - 75.0).abs() < 1e-4);
        assert!(!prediction.request_id.is_empty());
    }

    #[test]
    fn negative_class_maps_to_low_risk() {
        let pipeline = pipeline_with(Box::new(StubClassifier {
            class: 0,
            probabilities: vec![0.9, 0.1],
        }));
        let prediction = pipeline.predict(&test_input()).unwrap();
        assert_eq!(prediction.label, RiskLabel::LowRisk);
        assert!((prediction.probability_percent - 10.0).abs() < 1e-4);
    }

    #[test]
    fn unknown_gender_fails_before_inference() {
        let pipeline = pipeline_with(Box::new(FailingClassifier));
        let mut input = test_input();
        input.gender = "Other".to_string();
        let err = pipeline.predict(&input).unwrap_err();
        assert!(matches!(err, EngineError::UnknownCategory { .. }));
    }

    #[test]
    fn classifier_failure_keeps_its_stage() {
        let pipeline = pipeline_with(Box::new(FailingClassifier));
        let err = pipeline.predict(&test_input()).unwrap_err();
        match &err {
            EngineError::InferenceFailure { stage, .. } => {
                assert_eq!(*stage, InferenceStage::Predict)
            }
            other => panic!("expected InferenceFailure, got {other}"),
        }
        assert!(err.to_string().contains("classifier predict"));
    }

    #[test]
    fn missing_positive_probability_is_inference_failure() {
        let pipeline = pipeline_with(Box::new(StubClassifier {
            class: 0,
            probabilities: vec![1.0],
        }));
        let err = pipeline.predict(&test_input()).unwrap_err();
        assert!(matches!(
            err,
            EngineError::InferenceFailure {
                stage: InferenceStage::PredictProba,
                ..
            }
        ));
    }

    #[test]
    fn probability_percent_is_clamped() {
        let pipeline = pipeline_with(Box::new(StubClassifier {
            class: 1,
            probabilities: vec![0.0, 1.25],
        }));
        let prediction = pipeline.predict(&test_input()).unwrap();
        assert_eq!(prediction.probability_percent, 100.0);
    }

    #[test]
    fn risk_label_serializes_kebab_case() {
        assert_eq!(
            serde_json::to_string(&RiskLabel::HighRisk).unwrap(),
            "\"high-risk\""
        );
        assert_eq!(
            serde_json::to_string(&RiskLabel::LowRisk).unwrap(),
            "\"low-risk\""
        );
    }
}
