//! Feature Vector - Core data structure for classifier input
//!
//! Values are stored in the order defined by `FEATURE_LAYOUT`. A vector is
//! immutable once built.

use serde::{Deserialize, Serialize};
use super::layout::{FEATURE_COUNT, FEATURE_LAYOUT};

// ============================================================================
// FEATURE VECTOR
// ============================================================================

/// One observed network flow, in layout order
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FeatureVector {
    values: [f64; FEATURE_COUNT],
}

impl FeatureVector {
    /// Create from raw values in layout order
    pub fn from_values(values: [f64; FEATURE_COUNT]) -> Self {
        Self { values }
    }

    /// All-zero vector
    pub fn zeroed() -> Self {
        Self::from_values([0.0; FEATURE_COUNT])
    }

    pub fn as_array(&self) -> &[f64; FEATURE_COUNT] {
        &self.values
    }

    pub fn as_slice(&self) -> &[f64] {
        &self.values
    }

    pub fn duration(&self) -> f64 {
        self.values[0]
    }

    pub fn src_bytes(&self) -> f64 {
        self.values[1]
    }

    pub fn dst_bytes(&self) -> f64 {
        self.values[2]
    }

    pub fn pkt_rate(&self) -> f64 {
        self.values[3]
    }

    pub fn failed_logins(&self) -> f64 {
        self.values[4]
    }

    /// Apply a per-feature transform, preserving order
    pub fn map_indexed<F>(&self, mut f: F) -> Self
    where
        F: FnMut(usize, f64) -> f64,
    {
        let mut values = self.values;
        for (i, v) in values.iter_mut().enumerate() {
            *v = f(i, *v);
        }
        Self::from_values(values)
    }

    /// Named values for structured logging
    pub fn to_log_entry(&self) -> serde_json::Value {
        let named: serde_json::Map<String, serde_json::Value> = FEATURE_LAYOUT
            .iter()
            .zip(self.values.iter())
            .map(|(name, value)| (name.to_string(), serde_json::json!(value)))
            .collect();
        serde_json::Value::Object(named)
    }
}

impl Default for FeatureVector {
    fn default() -> Self {
        Self::zeroed()
    }
}

impl From<[f64; FEATURE_COUNT]> for FeatureVector {
    fn from(values: [f64; FEATURE_COUNT]) -> Self {
        Self::from_values(values)
    }
}

// ============================================================================
// TESTS
// ============================================================================
