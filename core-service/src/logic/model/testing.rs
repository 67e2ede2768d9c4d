//! Classifier test doubles
//!
//! Deterministic stand-ins for the trained models, usable from unit tests
//! here and from dependent crates' tests.

use super::classifier::{
    BinaryClassifier, MulticlassClassifier, MulticlassPrediction, ProbabilityDistribution,
};
use crate::error::ClassifierError;
use crate::logic::features::FeatureVector;

/// Binary stage returning a fixed distribution
#[derive(Debug, Clone)]
pub struct FixedBinary {
    distribution: ProbabilityDistribution,
}

impl FixedBinary {
    /// Single-value form: the attack probability
    pub fn scalar(attack: f64) -> Self {
        Self {
            distribution: ProbabilityDistribution::scalar(attack),
        }
    }

    /// Two-value form: benign, attack
    pub fn two_class(benign: f64, attack: f64) -> Self {
        Self {
            distribution: ProbabilityDistribution::binary(benign, attack),
        }
    }

    pub fn distribution(distribution: ProbabilityDistribution) -> Self {
        Self { distribution }
    }
}

impl BinaryClassifier for FixedBinary {
    fn classify(&self, _normalized: &FeatureVector) -> Result<ProbabilityDistribution, ClassifierError> {
        Ok(self.distribution.clone())
    }

    fn describe(&self) -> String {
        "fixed-binary".to_string()
    }
}

/// Multiclass stage returning a fixed label
#[derive(Debug, Clone)]
pub struct FixedMulticlass {
    prediction: MulticlassPrediction,
}

impl FixedMulticlass {
    pub fn new(label: &str, confidence: f64) -> Self {
        let distribution = ProbabilityDistribution::new(vec![(label.to_string(), confidence)]);
        Self {
            prediction: MulticlassPrediction::new(label, distribution),
        }
    }

    /// Label plus an explicit distribution
    pub fn with_distribution(label: &str, distribution: ProbabilityDistribution) -> Self {
        Self {
            prediction: MulticlassPrediction::new(label, distribution),
        }
    }
}

impl MulticlassClassifier for FixedMulticlass {
    fn classify(&self, _normalized: &FeatureVector) -> Result<MulticlassPrediction, ClassifierError> {
        Ok(self.prediction.clone())
    }

    fn describe(&self) -> String {
        "fixed-multiclass".to_string()
    }
}

/// Either stage, always failing with the given message
#[derive(Debug, Clone)]
pub struct FailingClassifier {
    message: String,
}

impl FailingClassifier {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl BinaryClassifier for FailingClassifier {
    fn classify(&self, _normalized: &FeatureVector) -> Result<ProbabilityDistribution, ClassifierError> {
        Err(ClassifierError::new(self.message.clone()))
    }

    fn describe(&self) -> String {
        "failing".to_string()
    }
}

impl MulticlassClassifier for FailingClassifier {
    fn classify(&self, _normalized: &FeatureVector) -> Result<MulticlassPrediction, ClassifierError> {
        Err(ClassifierError::new(self.message.clone()))
    }

    fn describe(&self) -> String {
        "failing".to_string()
    }
}
