//! ONNX Classifier - ONNX Runtime backend (feature `onnx`)
//!
//! Input: one `[1, FEATURE_COUNT]` f32 tensor of normalized features.
//! Output: the `probabilities` tensor if the graph names one, else the
//! first output. One value is read as an attack probability, N values as a
//! class distribution.

use std::path::Path;

use ndarray::Array2;
use ort::session::{builder::GraphOptimizationLevel, Session};
use ort::value::Value;
use parking_lot::Mutex;

use super::classifier::{
    BinaryClassifier, MulticlassClassifier, MulticlassPrediction, ProbabilityDistribution,
};
use super::labels::LabelMap;
use crate::error::{ClassifierError, ConfigError};
use crate::logic::features::{FeatureVector, FEATURE_COUNT};

const PROBABILITY_OUTPUT: &str = "probabilities";

pub struct OnnxClassifier {
    name: String,
    session: Mutex<Session>,
    output_name: String,
    labels: Option<LabelMap>,
}

impl OnnxClassifier {
    pub fn from_file(name: &str, path: &Path) -> Result<Self, ConfigError> {
        log::info!("Loading ONNX model '{}' from: {}", name, path.display());

        let session = Session::builder()
            .map_err(|e| ConfigError::invalid_model(name, format!("session builder: {}", e)))?
            .with_optimization_level(GraphOptimizationLevel::Level3)
            .map_err(|e| ConfigError::invalid_model(name, format!("optimization: {}", e)))?
            .commit_from_file(path)
            .map_err(|e| ConfigError::invalid_model(name, format!("load failed: {}", e)))?;

        let output_name = session
            .outputs
            .iter()
            .find(|o| o.name == PROBABILITY_OUTPUT)
            .or_else(|| session.outputs.first())
            .map(|o| o.name.clone())
            .ok_or_else(|| ConfigError::invalid_model(name, "graph has no outputs"))?;

        log::info!("ONNX model '{}' ready (output: {})", name, output_name);

        Ok(Self {
            name: name.to_string(),
            session: Mutex::new(session),
            output_name,
            labels: None,
        })
    }

    /// Name multiclass outputs by position through a label map
    pub fn with_label_map(mut self, labels: LabelMap) -> Self {
        self.labels = Some(labels);
        self
    }

    fn run(&self, normalized: &FeatureVector) -> Result<Vec<f64>, ClassifierError> {
        let input: Vec<f32> = normalized.as_slice().iter().map(|v| *v as f32).collect();
        let array = Array2::<f32>::from_shape_vec((1, FEATURE_COUNT), input)
            .map_err(|e| ClassifierError::new(format!("{}: array error: {}", self.name, e)))?;

        let tensor = Value::from_array(array)
            .map_err(|e| ClassifierError::new(format!("{}: tensor error: {}", self.name, e)))?;

        let mut session = self.session.lock();
        let outputs = session
            .run(ort::inputs![tensor])
            .map_err(|e| ClassifierError::new(format!("{}: inference failed: {}", self.name, e)))?;

        let output = outputs
            .get(&self.output_name)
            .ok_or_else(|| ClassifierError::new(format!("{}: missing output '{}'", self.name, self.output_name)))?;

        let extracted = output
            .try_extract_tensor::<f32>()
            .map_err(|e| ClassifierError::new(format!("{}: extract error: {}", self.name, e)))?;

        Ok(extracted.1.iter().map(|v| *v as f64).collect())
    }

    fn class_names(&self, width: usize) -> Result<Vec<String>, ClassifierError> {
        match &self.labels {
            Some(labels) if labels.len() == width => Ok(labels.classes().to_vec()),
            Some(labels) => Err(ClassifierError::new(format!(
                "{}: {} outputs for {} labels",
                self.name,
                width,
                labels.len()
            ))),
            None => Ok((0..width).map(|i| i.to_string()).collect()),
        }
    }
}

impl BinaryClassifier for OnnxClassifier {
    fn classify(&self, normalized: &FeatureVector) -> Result<ProbabilityDistribution, ClassifierError> {
        let values = self.run(normalized)?;
        match values.as_slice() {
            [attack] => Ok(ProbabilityDistribution::scalar(*attack)),
            [benign, attack] => Ok(ProbabilityDistribution::binary(*benign, *attack)),
            other => Err(ClassifierError::new(format!(
                "{}: expected 1 or 2 outputs, got {}",
                self.name,
                other.len()
            ))),
        }
    }

    fn describe(&self) -> String {
        format!("onnx:{}", self.name)
    }
}

impl MulticlassClassifier for OnnxClassifier {
    fn classify(&self, normalized: &FeatureVector) -> Result<MulticlassPrediction, ClassifierError> {
        let values = self.run(normalized)?;
        let classes = self.class_names(values.len())?;
        let distribution = ProbabilityDistribution::from_classes(&classes, &values);

        let label = distribution
            .arg_max()
            .map(|(label, _)| label.to_string())
            .ok_or_else(|| ClassifierError::new(format!("{}: empty output", self.name)))?;

        Ok(MulticlassPrediction::new(label, distribution))
    }

    fn describe(&self) -> String {
        format!("onnx:{}", self.name)
    }
}
