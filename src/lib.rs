//! Health risk inference over pre-fitted model artifacts.
//!
//! Modular structure:
//! - [`features`] — Intake record, derived columns, ordered vector assembly
//! - [`model`] — Fitted artifacts: label encoder, scaler, ONNX classifier, loader
//! - [`pipeline`] — Derive → encode → assemble → scale → classify
//! - [`error`] — Typed failure taxonomy
//! - [`config`] — JSON configuration
//! - [`logging`] — Structured JSON logging

pub mod config;
pub mod error;
pub mod features;
pub mod logging;
pub mod model;
pub mod pipeline;

pub use config::EngineConfig;
pub use error::{EngineError, InferenceStage};
pub use features::{DerivedFeatures, FeatureVector, RawInput};
pub use model::{ArtifactPaths, Artifacts, Classifier};
pub use pipeline::{Prediction, RiskLabel, RiskPipeline};
