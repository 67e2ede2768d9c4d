//! Features Module - Flow feature schema and input parsing
//!
//! Keeps the feature order in one place so the normalizer and both
//! classifiers always see the layout they were calibrated against.

pub mod layout;
pub mod vector;
pub mod parse;

// Re-export common types
pub use layout::{FEATURE_COUNT, FEATURE_LAYOUT, FEATURE_VERSION, LayoutInfo, layout_hash};
pub use vector::FeatureVector;
pub use parse::{RawFeatures, RawValue};
