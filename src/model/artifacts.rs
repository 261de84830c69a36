//! Loads the four fitted artifacts once at startup into one immutable handle.

use crate::error::EngineError;
use crate::features::FeatureColumns;
use crate::model::{Classifier, LabelEncoder, OnnxClassifier, StandardScaler};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Bundle manifest schema this build understands.
const SUPPORTED_SCHEMA_VERSION: u32 = 1;

/// File locations of the fitted artifacts.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ArtifactPaths {
    pub classifier: PathBuf,
    pub scaler: PathBuf,
    pub gender_encoder: PathBuf,
    pub feature_columns: PathBuf,
    /// Optional bundle manifest (schema version + sha256 digests). Verified
    /// when the file exists; bundles without one still load.
    pub manifest: Option<PathBuf>,
}

impl Default for ArtifactPaths {
    fn default() -> Self {
        Self {
            classifier: PathBuf::from("artifacts/classifier.onnx"),
            scaler: PathBuf::from("artifacts/scaler.json"),
            gender_encoder: PathBuf::from("artifacts/gender_encoder.json"),
            feature_columns: PathBuf::from("artifacts/feature_columns.json"),
            manifest: Some(PathBuf::from("artifacts/manifest.json")),
        }
    }
}

impl ArtifactPaths {
    fn required(&self) -> [(&'static str, &Path); 4] {
        [
            ("classifier", self.classifier.as_path()),
            ("scaler", self.scaler.as_path()),
            ("gender_encoder", self.gender_encoder.as_path()),
            ("feature_columns", self.feature_columns.as_path()),
        ]
    }
}

#[derive(Debug, Deserialize)]
struct BundleManifest {
    schema_version: u32,
    #[serde(default)]
    sha256: BTreeMap<String, String>,
}

/// The immutable process-wide handle over all four fitted artifacts, loaded
/// once and passed explicitly into the pipeline.
pub struct Artifacts {
    pub classifier: Box<dyn Classifier>,
    pub scaler: StandardScaler,
    pub gender_encoder: LabelEncoder,
    pub feature_columns: FeatureColumns,
}

impl std::fmt::Debug for Artifacts {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Artifacts")
            .field("classifier", &"<dyn Classifier>")
            .field("scaler", &self.scaler)
            .field("gender_encoder", &self.gender_encoder)
            .field("feature_columns", &self.feature_columns)
            .finish()
    }
}

impl Artifacts {
    /// Fails fast: every artifact must be present and coherent before the
    /// process may serve a single request.
    pub fn load(paths: &ArtifactPaths) -> Result<Self, EngineError> {
        for (artifact, path) in paths.required() {
            if !path.exists() {
                return Err(EngineError::AssetNotFound {
                    artifact,
                    path: path.to_path_buf(),
                });
            }
        }

        verify_manifest(paths)?;

        let scaler = StandardScaler::from_path(&paths.scaler)?;
        let gender_encoder = LabelEncoder::from_path("gender_encoder", &paths.gender_encoder)?;
        let feature_columns = FeatureColumns::from_path(&paths.feature_columns)?;

        if scaler.len() != feature_columns.len() {
            return Err(EngineError::MalformedArtifact {
                artifact: "scaler",
                detail: format!(
                    "fitted width {} does not match {} feature columns",
                    scaler.len(),
                    feature_columns.len()
                ),
            });
        }

        let classifier = OnnxClassifier::load(&paths.classifier)?;

        info!(
            columns = feature_columns.len(),
            classes = gender_encoder.classes().len(),
            "artifacts loaded"
        );

        Ok(Self {
            classifier: Box::new(classifier),
            scaler,
            gender_encoder,
            feature_columns,
        })
    }
}

fn verify_manifest(paths: &ArtifactPaths) -> Result<(), EngineError> {
    let Some(manifest_path) = paths.manifest.as_deref() else {
        return Ok(());
    };
    if !manifest_path.exists() {
        debug!(path = %manifest_path.display(), "no bundle manifest, skipping verification");
        return Ok(());
    }

    let data =
        std::fs::read_to_string(manifest_path).map_err(|e| EngineError::ManifestMismatch {
            detail: format!("unreadable manifest: {e}"),
        })?;
    let manifest: BundleManifest =
        serde_json::from_str(&data).map_err(|e| EngineError::ManifestMismatch {
            detail: format!("unparseable manifest: {e}"),
        })?;

    if manifest.schema_version != SUPPORTED_SCHEMA_VERSION {
        return Err(EngineError::ManifestMismatch {
            detail: format!(
                "bundle schema version {} (supported: {})",
                manifest.schema_version, SUPPORTED_SCHEMA_VERSION
            ),
        });
    }

    for (artifact, path) in paths.required() {
        let Some(expected) = manifest.sha256.get(artifact) else {
            continue;
        };
        let actual = sha256_hex(path).map_err(|e| EngineError::ManifestMismatch {
            detail: format!("hashing {artifact}: {e}"),
        })?;
        if !actual.eq_ignore_ascii_case(expected) {
            return Err(EngineError::ManifestMismatch {
                detail: format!("sha256 drift for {artifact}: manifest {expected}, file {actual}"),
            });
        }
    }

    debug!("bundle manifest verified");
    Ok(())
}

fn sha256_hex(path: &Path) -> std::io::Result<String> {
    let data = std::fs::read(path)?;
    Ok(format!("{:x}", Sha256::digest(&data)))
}
