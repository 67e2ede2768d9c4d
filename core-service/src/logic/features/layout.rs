//! Feature Layout - Centralized Feature Definition
//!
//! **This file controls the feature schema.** The normalizer parameters and
//! both classifiers are calibrated against this exact order.
//!
//! ## Rules:
//! 1. Add feature → increment FEATURE_VERSION
//! 2. Change order → increment FEATURE_VERSION
//! 3. Remove feature → increment FEATURE_VERSION

use crc32fast::Hasher;
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

// ============================================================================
// FEATURE VERSION
// ============================================================================

/// Current feature layout version
pub const FEATURE_VERSION: u8 = 1;

// ============================================================================
// FEATURE LAYOUT (Authoritative source)
// ============================================================================

/// Feature names in exact order they appear in the vector
pub const FEATURE_LAYOUT: &[&str] = &[
    "duration",      // 0: Flow duration in seconds
    "src_bytes",     // 1: Bytes sent by the source
    "dst_bytes",     // 2: Bytes sent by the destination
    "pkt_rate",      // 3: Packets per second
    "failed_logins", // 4: Failed authentication attempts in the flow
];

/// Total number of features. Must match FEATURE_LAYOUT.len()
pub const FEATURE_COUNT: usize = 5;

// ============================================================================
// LAYOUT HASH
// ============================================================================

static LAYOUT_HASH: Lazy<u32> = Lazy::new(compute_layout_hash);

/// Compute CRC32 hash of the feature layout
pub fn compute_layout_hash() -> u32 {
    let mut hasher = Hasher::new();

    hasher.update(&[FEATURE_VERSION]);

    for name in FEATURE_LAYOUT {
        hasher.update(name.as_bytes());
        hasher.update(&[0]);
    }

    hasher.finalize()
}

/// Get layout hash (computed once)
pub fn layout_hash() -> u32 {
    *LAYOUT_HASH
}

// ============================================================================
// LAYOUT INFO
// ============================================================================

/// Complete layout information for status reporting
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LayoutInfo {
    pub version: u8,
    pub hash: u32,
    pub feature_count: usize,
    pub feature_names: Vec<String>,
}

impl LayoutInfo {
    pub fn current() -> Self {
        Self {
            version: FEATURE_VERSION,
            hash: layout_hash(),
            feature_count: FEATURE_COUNT,
            feature_names: FEATURE_LAYOUT.iter().map(|s| s.to_string()).collect(),
        }
    }
}

impl Default for LayoutInfo {
    fn default() -> Self {
        Self::current()
    }
}

// ============================================================================
// LAYOUT VALIDATION
// ============================================================================

/// Check feature names declared by an artifact against the current layout
pub fn validate_feature_names(names: &[String]) -> Result<(), ConfigError> {
    if names.len() != FEATURE_COUNT {
        return Err(ConfigError::LengthMismatch {
            what: "feature names",
            expected: FEATURE_COUNT,
            got: names.len(),
        });
    }

    for (index, (declared, expected)) in names.iter().zip(FEATURE_LAYOUT).enumerate() {
        if declared != expected {
            return Err(ConfigError::Layout(format!(
                "position {} is '{}', expected '{}' (layout v{}, hash {:08x})",
                index,
                declared,
                expected,
                FEATURE_VERSION,
                layout_hash()
            )));
        }
    }

    Ok(())
}

// ============================================================================
// TESTS
// ============================================================================
