//! Normalizer - standard scaling with pre-fit parameters
//!
//! Applies `(x - mean_i) / scale_i` per feature. Parameters are validated when
//! the normalizer is built, so `normalize` itself cannot fail.

use serde::{Deserialize, Serialize};

use crate::constants::MIN_SCALE;
use crate::error::ConfigError;
use crate::logic::features::layout::{validate_feature_names, FEATURE_COUNT, FEATURE_LAYOUT};
use crate::logic::features::FeatureVector;

/// Normalization parameters from training (`scaler.json`)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NormalizationParams {
    pub mean: Vec<f64>,
    pub scale: Vec<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub feature_names: Option<Vec<String>>,
}

/// Validated, immutable scaler
#[derive(Debug, Clone, PartialEq)]
pub struct Normalizer {
    mean: [f64; FEATURE_COUNT],
    scale: [f64; FEATURE_COUNT],
}

impl Normalizer {
    pub fn new(params: NormalizationParams) -> Result<Self, ConfigError> {
        if let Some(names) = &params.feature_names {
            validate_feature_names(names)?;
        }

        let mean = to_array("means", &params.mean)?;
        let scale = to_array("scales", &params.scale)?;

        for (i, &name) in FEATURE_LAYOUT.iter().enumerate() {
            if !mean[i].is_finite() {
                return Err(ConfigError::NonFinite { what: "mean", field: name });
            }
            if !scale[i].is_finite() {
                return Err(ConfigError::NonFinite { what: "scale", field: name });
            }
            if scale[i].abs() < MIN_SCALE {
                return Err(ConfigError::ZeroScale { field: name, scale: scale[i] });
            }
        }

        Ok(Self { mean, scale })
    }

    /// Pass-through normalizer (mean 0, scale 1)
    pub fn identity() -> Self {
        Self {
            mean: [0.0; FEATURE_COUNT],
            scale: [1.0; FEATURE_COUNT],
        }
    }

    pub fn normalize(&self, features: &FeatureVector) -> FeatureVector {
        features.map_indexed(|i, x| (x - self.mean[i]) / self.scale[i])
    }

    pub fn mean(&self) -> &[f64; FEATURE_COUNT] {
        &self.mean
    }

    pub fn scale(&self) -> &[f64; FEATURE_COUNT] {
        &self.scale
    }
}

fn to_array(what: &'static str, values: &[f64]) -> Result<[f64; FEATURE_COUNT], ConfigError> {
    <[f64; FEATURE_COUNT]>::try_from(values).map_err(|_| ConfigError::LengthMismatch {
        what,
        expected: FEATURE_COUNT,
        got: values.len(),
    })
}
