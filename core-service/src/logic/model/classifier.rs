//! Classifier Capabilities
//!
//! Any backend (MLP weights, ONNX graph, lookup table, remote service) plugs
//! into the pipeline through these two traits. Output-shape ambiguity is
//! resolved here, at the boundary, so decision logic never branches on it.

use serde::Serialize;

use crate::error::ClassifierError;
use crate::logic::features::FeatureVector;

pub const ATTACK_LABEL: &str = "ATTACK";
pub const BENIGN_LABEL: &str = "BENIGN";

// ============================================================================
// PROBABILITY DISTRIBUTION
// ============================================================================

/// Ordered (label, probability) pairs over a classifier's class set
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProbabilityDistribution {
    entries: Vec<(String, f64)>,
}

/// Attack/benign probabilities recovered from a binary distribution
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AttackOdds {
    pub attack: f64,
    pub benign: f64,
}

impl ProbabilityDistribution {
    pub fn new(entries: Vec<(String, f64)>) -> Self {
        Self { entries }
    }

    /// Single probability of the positive (attack) class
    pub fn scalar(attack_probability: f64) -> Self {
        Self::new(vec![(ATTACK_LABEL.to_string(), attack_probability)])
    }

    /// Two-entry benign/attack distribution
    pub fn binary(benign: f64, attack: f64) -> Self {
        Self::new(vec![
            (BENIGN_LABEL.to_string(), benign),
            (ATTACK_LABEL.to_string(), attack),
        ])
    }

    /// Pair class labels with probabilities, by position
    pub fn from_classes(classes: &[String], probabilities: &[f64]) -> Self {
        Self::new(
            classes
                .iter()
                .cloned()
                .zip(probabilities.iter().copied())
                .collect(),
        )
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.entries.iter().map(|(l, p)| (l.as_str(), *p))
    }

    pub fn get(&self, label: &str) -> Option<f64> {
        self.iter().find(|(l, _)| *l == label).map(|(_, p)| p)
    }

    /// Highest-probability entry (first one wins ties)
    pub fn arg_max(&self) -> Option<(&str, f64)> {
        self.iter().fold(None, |best, (label, p)| match best {
            Some((_, bp)) if bp >= p => best,
            _ => Some((label, p)),
        })
    }

    fn check_finite(&self) -> Result<(), ClassifierError> {
        match self.iter().find(|(_, p)| !p.is_finite()) {
            Some((label, p)) => Err(ClassifierError::new(format!(
                "non-finite probability {} for class '{}'",
                p, label
            ))),
            None => Ok(()),
        }
    }

    /// Recover attack and benign probabilities.
    ///
    /// - two or more entries: the `ATTACK`/`1` and `BENIGN`/`0` entries when
    ///   both are labelled; when only one side is labelled the other side is
    ///   its complement; with no recognised labels the second entry is attack
    ///   and the first is benign
    /// - one entry: it is the attack probability, benign = 1 - attack
    pub fn binary_odds(&self) -> Result<AttackOdds, ClassifierError> {
        self.check_finite()?;

        match self.entries.len() {
            0 => Err(ClassifierError::new("binary classifier returned no probabilities")),
            1 => {
                let attack = self.entries[0].1;
                Ok(AttackOdds { attack, benign: 1.0 - attack })
            }
            _ => {
                let attack = self.get(ATTACK_LABEL).or_else(|| self.get("1"));
                let benign = self.get(BENIGN_LABEL).or_else(|| self.get("0"));
                let (attack, benign) = match (attack, benign) {
                    (Some(attack), Some(benign)) => (attack, benign),
                    (Some(attack), None) => (attack, 1.0 - attack),
                    (None, Some(benign)) => (1.0 - benign, benign),
                    (None, None) => (self.entries[1].1, self.entries[0].1),
                };
                Ok(AttackOdds { attack, benign })
            }
        }
    }
}

// ============================================================================
// MULTICLASS PREDICTION
// ============================================================================

/// Attack-family label plus the full distribution it came from
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MulticlassPrediction {
    pub label: String,
    pub distribution: ProbabilityDistribution,
}

impl MulticlassPrediction {
    pub fn new(label: impl Into<String>, distribution: ProbabilityDistribution) -> Self {
        Self {
            label: label.into(),
            distribution,
        }
    }

    /// Arg-max probability of the distribution
    pub fn confidence(&self) -> Result<f64, ClassifierError> {
        self.distribution.check_finite()?;
        self.distribution
            .arg_max()
            .map(|(_, p)| p)
            .ok_or_else(|| ClassifierError::new("multiclass classifier returned no probabilities"))
    }
}

// ============================================================================
// CAPABILITY TRAITS
// ============================================================================

/// Stage 1: benign vs attack
pub trait BinaryClassifier: Send + Sync {
    fn classify(&self, normalized: &FeatureVector) -> Result<ProbabilityDistribution, ClassifierError>;

    /// Short backend description for status/logging
    fn describe(&self) -> String {
        "binary".to_string()
    }
}

/// Stage 2: attack family. Only consulted after an ATTACK decision.
pub trait MulticlassClassifier: Send + Sync {
    fn classify(&self, normalized: &FeatureVector) -> Result<MulticlassPrediction, ClassifierError>;

    fn describe(&self) -> String {
        "multiclass".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scalar_and_two_entry_agree() {
        let scalar = ProbabilityDistribution::scalar(0.9).binary_odds().unwrap();
        let pair = ProbabilityDistribution::binary(0.1, 0.9).binary_odds().unwrap();

        assert_eq!(scalar.attack, pair.attack);
        assert!((scalar.benign - pair.benign).abs() < 1e-12);
    }

    #[test]
    fn test_positional_convention() {
        let classes = vec!["no".to_string(), "yes".to_string()];
        let dist = ProbabilityDistribution::from_classes(&classes, &[0.3, 0.7]);
        let odds = dist.binary_odds().unwrap();
        assert_eq!(odds.attack, 0.7);
        assert_eq!(odds.benign, 0.3);
    }

    #[test]
    fn test_labels_take_precedence_over_position() {
        let dist = ProbabilityDistribution::new(vec![
            ("ATTACK".to_string(), 0.8),
            ("BENIGN".to_string(), 0.2),
        ]);
        let odds = dist.binary_odds().unwrap();
        assert_eq!(odds.attack, 0.8);
        assert_eq!(odds.benign, 0.2);

        let numeric = ProbabilityDistribution::new(vec![
            ("1".to_string(), 0.6),
            ("0".to_string(), 0.4),
        ]);
        assert_eq!(numeric.binary_odds().unwrap().attack, 0.6);
    }

    #[test]
    fn test_single_recognised_label_complements_other_side() {
        let benign_only = ProbabilityDistribution::new(vec![
            ("ANOMALY".to_string(), 0.9),
            ("BENIGN".to_string(), 0.1),
        ]);
        let odds = benign_only.binary_odds().unwrap();
        assert!((odds.attack - 0.9).abs() < 1e-12);
        assert_eq!(odds.benign, 0.1);

        let attack_only = ProbabilityDistribution::new(vec![
            ("ATTACK".to_string(), 0.3),
            ("OTHER".to_string(), 0.7),
        ]);
        let odds = attack_only.binary_odds().unwrap();
        assert_eq!(odds.attack, 0.3);
        assert!((odds.benign - 0.7).abs() < 1e-12);
    }

    #[test]
    fn test_empty_and_non_finite_are_errors() {
        assert!(ProbabilityDistribution::new(vec![]).binary_odds().is_err());
        assert!(ProbabilityDistribution::scalar(f64::NAN).binary_odds().is_err());
    }

    #[test]
    fn test_arg_max() {
        let classes: Vec<String> = ["BOT", "DDoS", "PORTSCAN"].iter().map(|s| s.to_string()).collect();
        let dist = ProbabilityDistribution::from_classes(&classes, &[0.2, 0.5, 0.3]);
        assert_eq!(dist.arg_max(), Some(("DDoS", 0.5)));

        let prediction = MulticlassPrediction::new("DDoS", dist);
        assert_eq!(prediction.confidence().unwrap(), 0.5);
    }

    #[test]
    fn test_empty_multiclass_confidence_is_error() {
        let prediction = MulticlassPrediction::new("BOT", ProbabilityDistribution::new(vec![]));
        assert!(prediction.confidence().is_err());
    }
}
