//! Label Map - decodes encoded multiclass indices into attack family names
//!
//! Optional artifact (`label_encoder.json`). Without it, whatever labels the
//! multiclass model carries are reported verbatim.

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LabelMap {
    classes: Vec<String>,
}

impl LabelMap {
    pub fn new(classes: Vec<String>) -> Result<Self, ConfigError> {
        if classes.is_empty() {
            return Err(ConfigError::LabelMap("no classes".to_string()));
        }
        Ok(Self { classes })
    }

    pub fn classes(&self) -> &[String] {
        &self.classes
    }

    pub fn len(&self) -> usize {
        self.classes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.classes.is_empty()
    }

    /// Decode one encoded class ("3" or "3.0") into its label
    pub fn decode(&self, encoded: &str) -> Option<&str> {
        let trimmed = encoded.trim();
        let index = trimmed
            .parse::<usize>()
            .ok()
            .or_else(|| {
                trimmed
                    .parse::<f64>()
                    .ok()
                    .filter(|f| f.fract() == 0.0 && *f >= 0.0)
                    .map(|f| f as usize)
            })?;
        self.classes.get(index).map(String::as_str)
    }

    /// Decode every class, failing on the first one outside the map
    pub fn decode_all(&self, encoded: &[String]) -> Result<Vec<String>, ConfigError> {
        encoded
            .iter()
            .map(|class| {
                self.decode(class).map(str::to_string).ok_or_else(|| {
                    ConfigError::LabelMap(format!(
                        "model class '{}' is not an index into {} labels",
                        class,
                        self.classes.len()
                    ))
                })
            })
            .collect()
    }
}
