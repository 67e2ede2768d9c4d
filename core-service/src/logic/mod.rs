//! Logic Module - Decision Engine
//!
//! - `features/` - Feature layout, vector and raw input parsing
//! - `model/` - Normalizer, classifiers, threshold, artifact loading
//! - `pipeline/` - Two-stage decision pipeline and verdict
//! - `audit/` - Audit records and sinks

pub mod features;
pub mod model;
pub mod pipeline;
pub mod audit;
