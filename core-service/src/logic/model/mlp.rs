//! MLP Classifier - dense feed-forward inference with ndarray
//!
//! Evaluates multilayer perceptrons exported as JSON weights:
//! hidden layers use ReLU, the output layer is logistic (one unit, binary)
//! or softmax (one unit per class). Weight matrices are `inputs × outputs`.

use std::path::Path;

use ndarray::{Array1, Array2};
use serde::{Deserialize, Serialize};

use super::artifacts::read_json;
use super::classifier::{
    BinaryClassifier, MulticlassClassifier, MulticlassPrediction, ProbabilityDistribution,
};
use super::labels::LabelMap;
use crate::error::{ClassifierError, ConfigError};
use crate::logic::features::{FeatureVector, FEATURE_COUNT};

// ============================================================================
// ARTIFACT FORMAT
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LayerSpec {
    pub weights: Vec<Vec<f64>>,
    pub bias: Vec<f64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputActivation {
    Logistic,
    Softmax,
}

/// `binary_clf.json` / `multiclass_clf.json`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MlpSpec {
    pub classes: Vec<String>,
    pub layers: Vec<LayerSpec>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub output: Option<OutputActivation>,
}

// ============================================================================
// MODEL
// ============================================================================

#[derive(Debug, Clone)]
struct DenseLayer {
    weights: Array2<f64>,
    bias: Array1<f64>,
}

#[derive(Debug, Clone)]
pub struct MlpClassifier {
    name: String,
    classes: Vec<String>,
    layers: Vec<DenseLayer>,
    output: OutputActivation,
}

impl MlpClassifier {
    /// Build and shape-check a model
    pub fn from_spec(name: &str, spec: MlpSpec) -> Result<Self, ConfigError> {
        if spec.layers.is_empty() {
            return Err(ConfigError::invalid_model(name, "no layers"));
        }

        let mut layers = Vec::with_capacity(spec.layers.len());
        let mut expected_inputs = FEATURE_COUNT;

        for (index, layer) in spec.layers.into_iter().enumerate() {
            let dense = build_layer(name, index, expected_inputs, layer)?;
            expected_inputs = dense.bias.len();
            layers.push(dense);
        }

        let outputs = expected_inputs;
        let output = match (spec.output, outputs) {
            (None, 1) | (Some(OutputActivation::Logistic), 1) => OutputActivation::Logistic,
            (None, _) | (Some(OutputActivation::Softmax), _) if outputs >= 2 => OutputActivation::Softmax,
            (Some(activation), n) => {
                return Err(ConfigError::invalid_model(
                    name,
                    format!("{:?} output cannot have {} units", activation, n),
                ));
            }
            (None, n) => {
                return Err(ConfigError::invalid_model(name, format!("unsupported output width {}", n)));
            }
        };

        let expected_classes = if output == OutputActivation::Logistic { 2 } else { outputs };
        if spec.classes.len() != expected_classes {
            return Err(ConfigError::invalid_model(
                name,
                format!("{} classes for {} output probabilities", spec.classes.len(), expected_classes),
            ));
        }

        Ok(Self {
            name: name.to_string(),
            classes: spec.classes,
            layers,
            output,
        })
    }

    pub fn from_file(name: &str, path: &Path) -> Result<Self, ConfigError> {
        Self::from_spec(name, read_json(path)?)
    }

    /// Replace encoded class indices with their decoded labels
    pub fn with_label_map(mut self, labels: &LabelMap) -> Result<Self, ConfigError> {
        self.classes = labels.decode_all(&self.classes)?;
        Ok(self)
    }

    pub fn classes(&self) -> &[String] {
        &self.classes
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Class probabilities, aligned with `classes()`
    pub fn predict_proba(&self, normalized: &FeatureVector) -> Result<Vec<f64>, ClassifierError> {
        let mut activation = Array1::from(normalized.as_slice().to_vec());
        let last = self.layers.len() - 1;

        for (index, layer) in self.layers.iter().enumerate() {
            let z = activation.dot(&layer.weights) + &layer.bias;
            activation = if index == last { z } else { z.mapv(relu) };
        }

        let probabilities = match self.output {
            OutputActivation::Logistic => {
                let p = logistic(activation[0]);
                vec![1.0 - p, p]
            }
            OutputActivation::Softmax => softmax(&activation),
        };

        if probabilities.iter().any(|p| !p.is_finite()) {
            return Err(ClassifierError::new(format!(
                "{}: non-finite output for input {:?}",
                self.name,
                normalized.as_array()
            )));
        }

        Ok(probabilities)
    }

    fn distribution(&self, normalized: &FeatureVector) -> Result<ProbabilityDistribution, ClassifierError> {
        let probabilities = self.predict_proba(normalized)?;
        Ok(ProbabilityDistribution::from_classes(&self.classes, &probabilities))
    }
}

fn build_layer(name: &str, index: usize, inputs: usize, spec: LayerSpec) -> Result<DenseLayer, ConfigError> {
    if spec.weights.len() != inputs {
        return Err(ConfigError::invalid_model(
            name,
            format!("layer {} has {} input rows, expected {}", index, spec.weights.len(), inputs),
        ));
    }

    let outputs = spec.bias.len();
    if outputs == 0 {
        return Err(ConfigError::invalid_model(name, format!("layer {} has no units", index)));
    }
    if let Some(row) = spec.weights.iter().position(|r| r.len() != outputs) {
        return Err(ConfigError::invalid_model(
            name,
            format!("layer {} row {} width differs from bias length {}", index, row, outputs),
        ));
    }

    let flat: Vec<f64> = spec.weights.into_iter().flatten().collect();
    if flat.iter().chain(spec.bias.iter()).any(|w| !w.is_finite()) {
        return Err(ConfigError::invalid_model(name, format!("layer {} has non-finite weights", index)));
    }

    let weights = Array2::from_shape_vec((inputs, outputs), flat)
        .map_err(|e| ConfigError::invalid_model(name, format!("layer {}: {}", index, e)))?;

    Ok(DenseLayer {
        weights,
        bias: Array1::from(spec.bias),
    })
}

fn relu(x: f64) -> f64 {
    x.max(0.0)
}

fn logistic(x: f64) -> f64 {
    1.0 / (1.0 + (-x).exp())
}

fn softmax(z: &Array1<f64>) -> Vec<f64> {
    let max = z.fold(f64::NEG_INFINITY, |m, &v| m.max(v));
    let exp = z.mapv(|v| (v - max).exp());
    let sum = exp.sum();
    exp.iter().map(|v| v / sum).collect()
}

impl BinaryClassifier for MlpClassifier {
    fn classify(&self, normalized: &FeatureVector) -> Result<ProbabilityDistribution, ClassifierError> {
        self.distribution(normalized)
    }

    fn describe(&self) -> String {
        format!("mlp:{} ({} layers)", self.name, self.layers.len())
    }
}

impl MulticlassClassifier for MlpClassifier {
    fn classify(&self, normalized: &FeatureVector) -> Result<MulticlassPrediction, ClassifierError> {
        let distribution = self.distribution(normalized)?;
        let label = distribution
            .arg_max()
            .map(|(label, _)| label.to_string())
            .ok_or_else(|| ClassifierError::new(format!("{}: empty class set", self.name)))?;

        Ok(MulticlassPrediction::new(label, distribution))
    }

    fn describe(&self) -> String {
        format!("mlp:{} ({} classes)", self.name, self.classes.len())
    }
}

// ============================================================================
// TESTS
// ============================================================================
