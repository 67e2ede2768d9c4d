//! Model Artifacts - load once at startup, serve many
//!
//! A model directory holds:
//! - `scaler.json` (normalizer parameters)
//! - `binary_clf.json` (stage 1)
//! - `multiclass_clf.json` (stage 2)
//! - `label_encoder.json` (optional class index → label map)
//!
//! With the `onnx` feature, `binary_clf.onnx` / `multiclass_clf.onnx` take
//! precedence over the JSON models when present.
//!
//! Every artifact read is fingerprinted (SHA-256) for the status endpoint.

use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use super::classifier::{BinaryClassifier, MulticlassClassifier};
use super::labels::LabelMap;
use super::mlp::{MlpClassifier, MlpSpec};
use super::normalizer::{NormalizationParams, Normalizer};
use super::threshold::ThresholdConfig;
use crate::constants::{BINARY_MODEL_FILE, LABEL_ENCODER_FILE, MULTICLASS_MODEL_FILE, SCALER_FILE};
use crate::error::ConfigError;
use crate::logic::features::LayoutInfo;
use crate::logic::pipeline::DecisionPipeline;

// ============================================================================
// DATA STRUCTURES
// ============================================================================

/// SHA-256 of one artifact file
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArtifactFingerprint {
    pub file: String,
    pub sha256: String,
}

/// Model metadata for status reporting
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelMetadata {
    pub model_dir: Option<String>,
    pub binary_model: String,
    pub multiclass_model: String,
    pub label_map: Option<Vec<String>>,
    pub layout: LayoutInfo,
    pub fingerprints: Vec<ArtifactFingerprint>,
    pub loaded_at: DateTime<Utc>,
}

impl ModelMetadata {
    /// Metadata for classifiers injected directly rather than read from disk
    pub fn in_memory(binary: &dyn BinaryClassifier, multiclass: &dyn MulticlassClassifier) -> Self {
        Self {
            model_dir: None,
            binary_model: binary.describe(),
            multiclass_model: multiclass.describe(),
            label_map: None,
            layout: LayoutInfo::current(),
            fingerprints: Vec::new(),
            loaded_at: Utc::now(),
        }
    }
}

/// Everything the pipeline needs, loaded from a model directory
pub struct ModelBundle {
    pub normalizer: Normalizer,
    pub binary: Box<dyn BinaryClassifier>,
    pub multiclass: Box<dyn MulticlassClassifier>,
    pub metadata: ModelMetadata,
}

impl ModelBundle {
    pub fn load(dir: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let dir = dir.as_ref();
        log::info!("Loading model artifacts from: {}", dir.display());

        let mut fingerprints = Vec::new();

        let (params, fingerprint) = read_artifact::<NormalizationParams>(&dir.join(SCALER_FILE))?;
        let normalizer = Normalizer::new(params)?;
        fingerprints.push(fingerprint);

        let label_map = load_label_map(dir, &mut fingerprints)?;
        let binary = load_binary(dir, &mut fingerprints)?;
        let multiclass = load_multiclass(dir, label_map.as_ref(), &mut fingerprints)?;

        let metadata = ModelMetadata {
            model_dir: Some(dir.display().to_string()),
            binary_model: binary.describe(),
            multiclass_model: multiclass.describe(),
            label_map: label_map.map(|m| m.classes().to_vec()),
            layout: LayoutInfo::current(),
            fingerprints,
            loaded_at: Utc::now(),
        };

        for fp in &metadata.fingerprints {
            log::info!("Artifact {} sha256={}", fp.file, fp.sha256);
        }
        log::info!(
            "Models loaded: binary={}, multiclass={}",
            metadata.binary_model,
            metadata.multiclass_model
        );

        Ok(Self {
            normalizer,
            binary,
            multiclass,
            metadata,
        })
    }

    pub fn into_pipeline(self, threshold: ThresholdConfig) -> DecisionPipeline {
        DecisionPipeline::new(self.normalizer, self.binary, self.multiclass, threshold)
    }
}

// ============================================================================
// LOADERS
// ============================================================================

fn load_label_map(dir: &Path, fingerprints: &mut Vec<ArtifactFingerprint>) -> Result<Option<LabelMap>, ConfigError> {
    let path = dir.join(LABEL_ENCODER_FILE);
    if !path.exists() {
        log::info!("No label map at {}, multiclass labels used verbatim", path.display());
        return Ok(None);
    }

    let (raw, fingerprint) = read_artifact::<LabelMap>(&path)?;
    fingerprints.push(fingerprint);
    LabelMap::new(raw.classes().to_vec()).map(Some)
}

fn load_binary(dir: &Path, fingerprints: &mut Vec<ArtifactFingerprint>) -> Result<Box<dyn BinaryClassifier>, ConfigError> {
    #[cfg(feature = "onnx")]
    {
        let onnx_path = dir.join(crate::constants::BINARY_ONNX_FILE);
        if onnx_path.exists() {
            fingerprints.push(fingerprint_file(&onnx_path)?);
            let model = super::onnx::OnnxClassifier::from_file("binary", &onnx_path)?;
            return Ok(Box::new(model));
        }
    }

    let (spec, fingerprint) = read_artifact::<MlpSpec>(&dir.join(BINARY_MODEL_FILE))?;
    fingerprints.push(fingerprint);
    Ok(Box::new(MlpClassifier::from_spec("binary", spec)?))
}

fn load_multiclass(
    dir: &Path,
    label_map: Option<&LabelMap>,
    fingerprints: &mut Vec<ArtifactFingerprint>,
) -> Result<Box<dyn MulticlassClassifier>, ConfigError> {
    #[cfg(feature = "onnx")]
    {
        let onnx_path = dir.join(crate::constants::MULTICLASS_ONNX_FILE);
        if onnx_path.exists() {
            fingerprints.push(fingerprint_file(&onnx_path)?);
            let mut model = super::onnx::OnnxClassifier::from_file("multiclass", &onnx_path)?;
            if let Some(labels) = label_map {
                model = model.with_label_map(labels.clone());
            }
            return Ok(Box::new(model));
        }
    }

    let (spec, fingerprint) = read_artifact::<MlpSpec>(&dir.join(MULTICLASS_MODEL_FILE))?;
    fingerprints.push(fingerprint);

    let model = MlpClassifier::from_spec("multiclass", spec)?;
    let model = match label_map {
        Some(labels) => model.with_label_map(labels)?,
        None => model,
    };
    Ok(Box::new(model))
}

// ============================================================================
// HELPERS
// ============================================================================

fn read_bytes(path: &Path) -> Result<Vec<u8>, ConfigError> {
    std::fs::read(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })
}

fn fingerprint_bytes(path: &Path, bytes: &[u8]) -> ArtifactFingerprint {
    let mut hasher = Sha256::new();
    hasher.update(bytes);

    ArtifactFingerprint {
        file: path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string()),
        sha256: hex::encode(hasher.finalize()),
    }
}

#[cfg_attr(not(feature = "onnx"), allow(dead_code))]
pub(crate) fn fingerprint_file(path: &Path) -> Result<ArtifactFingerprint, ConfigError> {
    let bytes = read_bytes(path)?;
    Ok(fingerprint_bytes(path, &bytes))
}

/// Read and decode a JSON artifact, fingerprinting the exact bytes read
pub(crate) fn read_artifact<T: DeserializeOwned>(path: &Path) -> Result<(T, ArtifactFingerprint), ConfigError> {
    let bytes = read_bytes(path)?;
    let value = serde_json::from_slice(&bytes).map_err(|source| ConfigError::Json {
        path: PathBuf::from(path),
        source,
    })?;
    Ok((value, fingerprint_bytes(path, &bytes)))
}

pub(crate) fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T, ConfigError> {
    read_artifact(path).map(|(value, _)| value)
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logic::features::{FeatureVector, RawFeatures};
    use crate::logic::pipeline::BinaryLabel;
    use serde_json::json;
    use tempfile::tempdir;

    fn write(dir: &Path, name: &str, value: serde_json::Value) {
        std::fs::write(dir.join(name), serde_json::to_vec_pretty(&value).unwrap()).unwrap();
    }

    /// Artifacts for a toy model keyed on failed_logins (binary) and
    /// pkt_rate vs failed_logins (multiclass, encoded classes 0/1).
    fn write_model_dir(dir: &Path) {
        write(dir, SCALER_FILE, json!({
            "mean": [0.0, 0.0, 0.0, 0.0, 0.0],
            "scale": [1.0, 1.0, 1.0, 1.0, 1.0],
            "feature_names": ["duration", "src_bytes", "dst_bytes", "pkt_rate", "failed_logins"]
        }));
        write(dir, BINARY_MODEL_FILE, json!({
            "classes": ["0", "1"],
            "layers": [{"weights": [[0.0], [0.0], [0.0], [0.01], [2.0]], "bias": [-4.0]}]
        }));
        write(dir, MULTICLASS_MODEL_FILE, json!({
            "classes": ["0", "1"],
            "layers": [{"weights": [[0.0, 0.0], [0.0, 0.0], [0.0, 0.0], [0.0, 0.01], [1.0, 0.0]], "bias": [0.0, 0.0]}],
            "output": "softmax"
        }));
    }

    #[test]
    fn test_load_bundle_with_label_map() {
        let dir = tempdir().unwrap();
        write_model_dir(dir.path());
        write(dir.path(), LABEL_ENCODER_FILE, json!({"classes": ["BRUTE_FORCE", "DDoS"]}));

        let bundle = ModelBundle::load(dir.path()).unwrap();
        assert_eq!(bundle.metadata.fingerprints.len(), 4);
        assert!(bundle.metadata.fingerprints.iter().all(|f| f.sha256.len() == 64));
        assert_eq!(
            bundle.metadata.label_map,
            Some(vec!["BRUTE_FORCE".to_string(), "DDoS".to_string()])
        );

        let pipeline = bundle.into_pipeline(ThresholdConfig::default());
        let raw = RawFeatures::new()
            .with("duration", 2.0)
            .with("failed_logins", 6i64)
            .with("pkt_rate", 0.5);
        let verdict = pipeline.evaluate_raw(&raw).unwrap();

        assert_eq!(verdict.binary_label(), BinaryLabel::Attack);
        assert_eq!(verdict.attack_type(), Some("BRUTE_FORCE"));
    }

    #[test]
    fn test_missing_label_map_uses_verbatim_labels() {
        let dir = tempdir().unwrap();
        write_model_dir(dir.path());

        let bundle = ModelBundle::load(dir.path()).unwrap();
        assert_eq!(bundle.metadata.fingerprints.len(), 3);
        assert!(bundle.metadata.label_map.is_none());

        let pipeline = bundle.into_pipeline(ThresholdConfig::default());
        let verdict = pipeline
            .evaluate(&FeatureVector::from_values([1.0, 5000.0, 10.0, 1200.0, 0.0]))
            .unwrap();
        assert_eq!(verdict.attack_type(), Some("1"));
    }

    #[test]
    fn test_label_map_must_cover_model_classes() {
        let dir = tempdir().unwrap();
        write_model_dir(dir.path());
        write(dir.path(), LABEL_ENCODER_FILE, json!({"classes": ["ONLY_ONE"]}));

        assert!(matches!(ModelBundle::load(dir.path()), Err(ConfigError::LabelMap(_))));
    }

    #[test]
    fn test_missing_scaler_is_io_error() {
        let dir = tempdir().unwrap();
        assert!(matches!(ModelBundle::load(dir.path()), Err(ConfigError::Io { .. })));
    }

    #[test]
    fn test_zero_scale_rejected_at_load() {
        let dir = tempdir().unwrap();
        write_model_dir(dir.path());
        write(dir.path(), SCALER_FILE, json!({
            "mean": [0.0, 0.0, 0.0, 0.0, 0.0],
            "scale": [1.0, 0.0, 1.0, 1.0, 1.0]
        }));

        assert!(matches!(
            ModelBundle::load(dir.path()),
            Err(ConfigError::ZeroScale { field: "src_bytes", .. })
        ));
    }

    #[test]
    fn test_malformed_json_is_reported() {
        let dir = tempdir().unwrap();
        write_model_dir(dir.path());
        std::fs::write(dir.path().join(BINARY_MODEL_FILE), b"{not json").unwrap();

        assert!(matches!(ModelBundle::load(dir.path()), Err(ConfigError::Json { .. })));
    }
}
