//! FlowGuard Core - Two-stage network flow decision engine
//!
//! Classifies a single network-flow observation as benign or malicious and,
//! when malicious, resolves the attack family with a second classifier.
//!
//! # Architecture
//!
//! ```text
//!  raw mapping ──► FeatureVector::parse ──► Normalizer ──► BinaryClassifier
//!                                                              │
//!                                                 attack >= threshold?
//!                                                   │               │
//!                                                  no              yes
//!                                                   │               ▼
//!                                                   │     MulticlassClassifier
//!                                                   │        (fail-safe)
//!                                                   ▼               ▼
//!                                                 Verdict ◄─────────┘
//! ```
//!
//! - `logic::features` - feature layout, vector, raw input parsing
//! - `logic::model` - normalizer, classifier traits, MLP backend, artifact loading
//! - `logic::pipeline` - decision pipeline and verdict
//! - `logic::audit` - audit records and sinks

pub mod constants;
pub mod error;
pub mod logic;

pub use error::{AuditError, ClassifierError, ConfigError, PipelineError};
pub use logic::audit::{AuditRecord, AuditSink};
pub use logic::features::{FeatureVector, RawFeatures, RawValue, FEATURE_COUNT};
pub use logic::model::{
    BinaryClassifier, ModelBundle, ModelMetadata, MulticlassClassifier, Normalizer,
    ProbabilityDistribution, ThresholdConfig,
};
pub use logic::pipeline::{BinaryLabel, DecisionPipeline, FlowRequest, Verdict};
