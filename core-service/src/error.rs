//! Error types for FlowGuard core.

use std::path::PathBuf;
use thiserror::Error;

/// Fault raised by a classifier backend (numerical or library failure).
#[derive(Debug, Clone, PartialEq, Error)]
#[error("{0}")]
pub struct ClassifierError(pub String);

impl ClassifierError {
    pub fn new(message: impl Into<String>) -> Self {
        Self(message.into())
    }
}

/// Request-level failures. Either one aborts the evaluation without a verdict.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum PipelineError {
    /// Malformed or unparseable feature field (client fault)
    #[error("invalid input for field '{field}': {reason}")]
    InvalidInput { field: String, reason: String },

    /// Binary classifier failed (server fault)
    #[error("model binary predict error: {0}")]
    BinaryStage(#[source] ClassifierError),
}

impl PipelineError {
    pub fn invalid_input(field: impl Into<String>, reason: impl Into<String>) -> Self {
        PipelineError::InvalidInput {
            field: field.into(),
            reason: reason.into(),
        }
    }

    /// Offending field for input errors
    pub fn field(&self) -> Option<&str> {
        match self {
            PipelineError::InvalidInput { field, .. } => Some(field),
            PipelineError::BinaryStage(_) => None,
        }
    }

    pub fn is_client_fault(&self) -> bool {
        matches!(self, PipelineError::InvalidInput { .. })
    }
}

/// Startup configuration failures (artifacts, parameters, threshold).
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed artifact {path}: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("expected {expected} {what}, got {got}")]
    LengthMismatch {
        what: &'static str,
        expected: usize,
        got: usize,
    },

    #[error("scale for feature '{field}' is zero or too small ({scale})")]
    ZeroScale { field: &'static str, scale: f64 },

    #[error("non-finite {what} for feature '{field}'")]
    NonFinite { what: &'static str, field: &'static str },

    #[error("feature layout mismatch: {0}")]
    Layout(String),

    #[error("invalid model '{name}': {reason}")]
    InvalidModel { name: String, reason: String },

    #[error("invalid label map: {0}")]
    LabelMap(String),

    #[error("decision threshold must be a number within [0, 1], got {0}")]
    InvalidThreshold(String),
}

impl ConfigError {
    pub(crate) fn invalid_model(name: &str, reason: impl Into<String>) -> Self {
        ConfigError::InvalidModel {
            name: name.to_string(),
            reason: reason.into(),
        }
    }
}

/// Audit sink failures. Never propagated past the pipeline.
#[derive(Debug, Error)]
pub enum AuditError {
    #[error("audit I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("audit CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("audit serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("audit queue closed")]
    Closed,
}
