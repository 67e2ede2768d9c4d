//! Model Module - normalization, classifier capabilities, backends
//!
//! The pipeline only sees `Normalizer` and the two classifier traits.
//! Backends (MLP weights, ONNX graphs, test doubles) are swappable.

pub mod artifacts;
pub mod classifier;
pub mod labels;
pub mod mlp;
pub mod normalizer;
#[cfg(feature = "onnx")]
pub mod onnx;
pub mod testing;
pub mod threshold;

// Re-export common types
pub use artifacts::{ArtifactFingerprint, ModelBundle, ModelMetadata};
pub use classifier::{
    AttackOdds, BinaryClassifier, MulticlassClassifier, MulticlassPrediction,
    ProbabilityDistribution, ATTACK_LABEL, BENIGN_LABEL,
};
pub use labels::LabelMap;
pub use mlp::{MlpClassifier, MlpSpec};
pub use normalizer::{NormalizationParams, Normalizer};
#[cfg(feature = "onnx")]
pub use onnx::OnnxClassifier;
pub use threshold::ThresholdConfig;
