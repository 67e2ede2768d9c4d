//! Threshold Configuration
//!
//! Policy knob for the benign/attack boundary. Lower it to trade false
//! negatives for false positives, raise it for the opposite.

use serde::{Deserialize, Serialize};

use crate::constants::DEFAULT_THRESHOLD;
use crate::error::ConfigError;

/// Threshold Configuration. Serialized as the bare number; deserializing
/// goes through the same range check as `new`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "f64", into = "f64")]
pub struct ThresholdConfig {
    /// Minimum attack probability for an ATTACK decision (0.0 - 1.0)
    attack_threshold: f64,
}

impl Default for ThresholdConfig {
    fn default() -> Self {
        Self {
            attack_threshold: DEFAULT_THRESHOLD,
        }
    }
}

impl ThresholdConfig {
    pub fn new(attack_threshold: f64) -> Result<Self, ConfigError> {
        if !attack_threshold.is_finite() || !(0.0..=1.0).contains(&attack_threshold) {
            return Err(ConfigError::InvalidThreshold(attack_threshold.to_string()));
        }
        Ok(Self { attack_threshold })
    }

    /// Parse from text (env var, CLI argument)
    pub fn parse(text: &str) -> Result<Self, ConfigError> {
        let value = text
            .trim()
            .parse::<f64>()
            .map_err(|_| ConfigError::InvalidThreshold(text.to_string()))?;
        Self::new(value)
    }

    pub fn get(&self) -> f64 {
        self.attack_threshold
    }

    /// Inclusive: a probability equal to the threshold is an attack
    pub fn is_attack(&self, attack_probability: f64) -> bool {
        attack_probability >= self.attack_threshold
    }
}

impl TryFrom<f64> for ThresholdConfig {
    type Error = ConfigError;

    fn try_from(value: f64) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<ThresholdConfig> for f64 {
    fn from(config: ThresholdConfig) -> Self {
        config.attack_threshold
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_threshold_default() {
        assert_eq!(ThresholdConfig::default().get(), 0.6);
    }

    #[test]
    fn test_boundary_is_inclusive() {
        let config = ThresholdConfig::default();
        assert!(config.is_attack(0.6));
        assert!(!config.is_attack(0.599_999));
    }

    #[test]
    fn test_rejects_out_of_range() {
        assert!(ThresholdConfig::new(1.5).is_err());
        assert!(ThresholdConfig::new(-0.1).is_err());
        assert!(ThresholdConfig::new(f64::NAN).is_err());
        assert!(ThresholdConfig::new(0.0).is_ok());
        assert!(ThresholdConfig::new(1.0).is_ok());
    }

    #[test]
    fn test_parse() {
        assert_eq!(ThresholdConfig::parse(" 0.75 ").unwrap().get(), 0.75);
        assert!(matches!(
            ThresholdConfig::parse("high"),
            Err(ConfigError::InvalidThreshold(_))
        ));
    }

    #[test]
    fn test_deserialize_is_validated() {
        let config: ThresholdConfig = serde_json::from_str("0.75").unwrap();
        assert_eq!(config.get(), 0.75);
        assert_eq!(serde_json::to_string(&config).unwrap(), "0.75");

        assert!(serde_json::from_str::<ThresholdConfig>("1.5").is_err());
        assert!(serde_json::from_str::<ThresholdConfig>("-0.1").is_err());
    }
}
