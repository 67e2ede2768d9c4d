//! Raw Input Parsing
//!
//! Requests arrive as loosely-typed field→scalar mappings (JSON bodies, form
//! fields, CLI lines). Parsing is permissive:
//! - missing / null / blank → 0.0
//! - numbers used directly
//! - text trimmed, a decimal comma accepted ("0,3" == "0.3")
//!
//! Anything else fails with `PipelineError::InvalidInput` naming the field.

use std::collections::HashMap;

use super::layout::{FEATURE_COUNT, FEATURE_LAYOUT};
use super::vector::FeatureVector;
use crate::error::PipelineError;

// ============================================================================
// RAW VALUES
// ============================================================================

/// A single loosely-typed input scalar
#[derive(Debug, Clone, PartialEq)]
pub enum RawValue {
    Absent,
    Integer(i64),
    Real(f64),
    Text(String),
    /// Value of a shape that can never be a feature (bool, array, object)
    Unsupported(&'static str),
}

impl RawValue {
    /// Interpret as a real number. The error string describes the problem
    /// without the field name.
    pub fn to_real(&self) -> Result<f64, String> {
        let value = match self {
            RawValue::Absent => 0.0,
            RawValue::Integer(i) => *i as f64,
            RawValue::Real(r) => *r,
            RawValue::Text(text) => parse_text(text)?,
            RawValue::Unsupported(kind) => {
                return Err(format!("expected a number or numeric text, got {}", kind));
            }
        };

        if !value.is_finite() {
            return Err(format!("'{}' is not a finite number", value));
        }
        if value < 0.0 {
            return Err(format!("{} is negative", value));
        }

        // -0.0 folds into 0.0
        Ok(value + 0.0)
    }

    /// Text rendering, used for free-text fields such as `note`
    pub fn as_text(&self) -> Option<String> {
        match self {
            RawValue::Absent | RawValue::Unsupported(_) => None,
            RawValue::Integer(i) => Some(i.to_string()),
            RawValue::Real(r) => Some(r.to_string()),
            RawValue::Text(t) => Some(t.clone()),
        }
    }
}

fn parse_text(text: &str) -> Result<f64, String> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Ok(0.0);
    }

    let normalized = if trimmed.matches(',').count() == 1 {
        trimmed.replacen(',', ".", 1)
    } else {
        trimmed.to_string()
    };

    normalized
        .parse::<f64>()
        .map_err(|_| format!("'{}' is not a number", trimmed))
}

impl From<&serde_json::Value> for RawValue {
    fn from(value: &serde_json::Value) -> Self {
        use serde_json::Value;

        match value {
            Value::Null => RawValue::Absent,
            Value::Number(n) => match n.as_i64() {
                Some(i) => RawValue::Integer(i),
                None => n.as_f64().map(RawValue::Real).unwrap_or(RawValue::Unsupported("number")),
            },
            Value::String(s) => RawValue::Text(s.clone()),
            Value::Bool(_) => RawValue::Unsupported("boolean"),
            Value::Array(_) => RawValue::Unsupported("array"),
            Value::Object(_) => RawValue::Unsupported("object"),
        }
    }
}

impl From<&str> for RawValue {
    fn from(value: &str) -> Self {
        RawValue::Text(value.to_string())
    }
}

impl From<f64> for RawValue {
    fn from(value: f64) -> Self {
        RawValue::Real(value)
    }
}

impl From<i64> for RawValue {
    fn from(value: i64) -> Self {
        RawValue::Integer(value)
    }
}

// ============================================================================
// RAW FEATURE MAPPING
// ============================================================================

static ABSENT: RawValue = RawValue::Absent;

/// Field name → raw scalar mapping as received from the caller
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawFeatures {
    fields: HashMap<String, RawValue>,
}

impl RawFeatures {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert
    pub fn with(mut self, name: impl Into<String>, value: impl Into<RawValue>) -> Self {
        self.insert(name, value);
        self
    }

    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<RawValue>) {
        self.fields.insert(name.into(), value.into());
    }

    /// Value for a field; missing fields read as `Absent`
    pub fn get(&self, name: &str) -> &RawValue {
        self.fields.get(name).unwrap_or(&ABSENT)
    }

    /// Free-text value of a field, if any
    pub fn text(&self, name: &str) -> Option<String> {
        self.get(name).as_text()
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// From a JSON object body
    pub fn from_json_map(map: &serde_json::Map<String, serde_json::Value>) -> Self {
        Self {
            fields: map.iter().map(|(k, v)| (k.clone(), RawValue::from(v))).collect(),
        }
    }

    /// From form fields; every value is text. The first occurrence of a
    /// repeated field is kept.
    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let mut fields = HashMap::new();
        for (k, v) in pairs {
            fields.entry(k.into()).or_insert_with(|| RawValue::Text(v.into()));
        }
        Self { fields }
    }
}

// ============================================================================
// PARSE
// ============================================================================

impl FeatureVector {
    /// Build a vector from a raw mapping, in layout order.
    /// Keys outside the layout (e.g. `note`) are ignored.
    pub fn parse(raw: &RawFeatures) -> Result<Self, PipelineError> {
        let mut values = [0.0f64; FEATURE_COUNT];

        for (slot, name) in values.iter_mut().zip(FEATURE_LAYOUT) {
            *slot = raw
                .get(name)
                .to_real()
                .map_err(|reason| PipelineError::invalid_input(*name, reason))?;
        }

        Ok(FeatureVector::from_values(values))
    }
}

// ============================================================================
// TESTS
// ============================================================================
