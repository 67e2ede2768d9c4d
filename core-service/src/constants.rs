//! Central Configuration Constants
//!
//! Single source of truth for all configuration defaults.

/// Default decision threshold for the binary stage
pub const DEFAULT_THRESHOLD: f64 = 0.6;

/// Default model artifact directory
pub const DEFAULT_MODEL_DIR: &str = "models";

/// Artifact file names inside the model directory
pub const SCALER_FILE: &str = "scaler.json";
pub const BINARY_MODEL_FILE: &str = "binary_clf.json";
pub const MULTICLASS_MODEL_FILE: &str = "multiclass_clf.json";
pub const LABEL_ENCODER_FILE: &str = "label_encoder.json";

/// ONNX exports, preferred over the JSON models when the `onnx` feature is on
pub const BINARY_ONNX_FILE: &str = "binary_clf.onnx";
pub const MULTICLASS_ONNX_FILE: &str = "multiclass_clf.onnx";

/// Client identity recorded when the caller is unknown
pub const ANONYMOUS_CLIENT: &str = "-";

/// Smallest accepted magnitude for a normalizer scale factor
pub const MIN_SCALE: f64 = 1e-12;

/// Rotate JSONL audit logs after this many writes
pub const DEFAULT_AUDIT_MAX_ENTRIES: usize = 10_000;

/// Entries kept by the in-memory audit sink
pub const DEFAULT_MEMORY_AUDIT_CAPACITY: usize = 1_000;

/// Pending audit records the server queues before dropping new ones
pub const DEFAULT_AUDIT_QUEUE_CAPACITY: usize = 4_096;

/// App version
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

/// App name
pub const APP_NAME: &str = "FlowGuard";

// ============================================
// Helper functions to read from env with fallback
// ============================================

/// Get model directory from environment or use default
pub fn get_model_dir() -> String {
    std::env::var("MODEL_DIR")
        .unwrap_or_else(|_| DEFAULT_MODEL_DIR.to_string())
}

/// Get raw decision threshold from environment, if set
pub fn get_threshold_var() -> Option<String> {
    std::env::var("DETECTION_THRESHOLD").ok()
}
