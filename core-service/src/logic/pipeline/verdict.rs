//! Verdict - the pipeline's only output

use std::fmt;

use serde::ser::{Serialize, SerializeMap, Serializer};
use serde::Deserialize;

/// Stage 1 decision
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BinaryLabel {
    Benign,
    Attack,
}

impl BinaryLabel {
    pub fn as_str(&self) -> &'static str {
        match self {
            BinaryLabel::Benign => "BENIGN",
            BinaryLabel::Attack => "ATTACK",
        }
    }
}

impl fmt::Display for BinaryLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Stage 2 outcome, only ever attached to an ATTACK decision
#[derive(Debug, Clone, PartialEq)]
pub enum Refinement {
    Classified { attack_type: String, confidence: f64 },
    /// Multiclass stage failed; the note carries the cause
    Degraded { note: String },
}

#[derive(Debug, Clone, PartialEq)]
pub struct Verdict {
    binary_label: BinaryLabel,
    binary_score: f64,
    refinement: Option<Refinement>,
}

impl Verdict {
    /// `score` is the probability supporting the benign decision
    pub fn benign(score: f64) -> Self {
        Self {
            binary_label: BinaryLabel::Benign,
            binary_score: score,
            refinement: None,
        }
    }

    /// `score` is the attack probability
    pub fn attack(score: f64, refinement: Refinement) -> Self {
        Self {
            binary_label: BinaryLabel::Attack,
            binary_score: score,
            refinement: Some(refinement),
        }
    }

    pub fn binary_label(&self) -> BinaryLabel {
        self.binary_label
    }

    pub fn binary_score(&self) -> f64 {
        self.binary_score
    }

    pub fn refinement(&self) -> Option<&Refinement> {
        self.refinement.as_ref()
    }

    pub fn is_attack(&self) -> bool {
        self.binary_label == BinaryLabel::Attack
    }

    pub fn attack_type(&self) -> Option<&str> {
        match &self.refinement {
            Some(Refinement::Classified { attack_type, .. }) => Some(attack_type),
            _ => None,
        }
    }

    /// 0.0 under degradation, None for benign verdicts
    pub fn attack_confidence(&self) -> Option<f64> {
        match &self.refinement {
            Some(Refinement::Classified { confidence, .. }) => Some(*confidence),
            Some(Refinement::Degraded { .. }) => Some(0.0),
            None => None,
        }
    }

    pub fn degradation_note(&self) -> Option<&str> {
        match &self.refinement {
            Some(Refinement::Degraded { note }) => Some(note),
            _ => None,
        }
    }

    pub fn is_degraded(&self) -> bool {
        matches!(self.refinement, Some(Refinement::Degraded { .. }))
    }

    /// Post-decision audit note: `model:ATTACK score:0.9 type:DDoS`
    pub fn summary(&self) -> String {
        let mut summary = format!("model:{} score:{}", self.binary_label, self.binary_score);
        if let Some(attack_type) = self.attack_type() {
            summary.push_str(" type:");
            summary.push_str(attack_type);
        }
        summary
    }
}

impl Serialize for Verdict {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let len = match &self.refinement {
            None => 2,
            Some(Refinement::Classified { .. }) => 4,
            Some(Refinement::Degraded { .. }) => 5,
        };

        let mut map = serializer.serialize_map(Some(len))?;
        map.serialize_entry("binary_label", &self.binary_label)?;
        map.serialize_entry("binary_score", &self.binary_score)?;

        match &self.refinement {
            None => {}
            Some(Refinement::Classified { attack_type, confidence }) => {
                map.serialize_entry("attack_type", attack_type)?;
                map.serialize_entry("attack_confidence", confidence)?;
            }
            Some(Refinement::Degraded { note }) => {
                map.serialize_entry("attack_type", &Option::<String>::None)?;
                map.serialize_entry("attack_confidence", &0.0)?;
                map.serialize_entry("note", note)?;
            }
        }

        map.end()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_benign_serializes_two_fields() {
        let value = serde_json::to_value(Verdict::benign(0.95)).unwrap();
        assert_eq!(value, json!({"binary_label": "BENIGN", "binary_score": 0.95}));
    }

    #[test]
    fn test_classified_serialization() {
        let verdict = Verdict::attack(
            0.9,
            Refinement::Classified {
                attack_type: "BRUTE_FORCE".to_string(),
                confidence: 0.8,
            },
        );
        let value = serde_json::to_value(&verdict).unwrap();
        assert_eq!(
            value,
            json!({
                "binary_label": "ATTACK",
                "binary_score": 0.9,
                "attack_type": "BRUTE_FORCE",
                "attack_confidence": 0.8
            })
        );
        assert_eq!(verdict.summary(), "model:ATTACK score:0.9 type:BRUTE_FORCE");
    }

    #[test]
    fn test_degraded_serialization() {
        let verdict = Verdict::attack(
            0.95,
            Refinement::Degraded {
                note: "multiclass error: boom".to_string(),
            },
        );
        let value = serde_json::to_value(&verdict).unwrap();
        assert_eq!(value["attack_type"], serde_json::Value::Null);
        assert_eq!(value["attack_confidence"], json!(0.0));
        assert_eq!(value["note"], json!("multiclass error: boom"));

        assert!(verdict.is_degraded());
        assert_eq!(verdict.attack_confidence(), Some(0.0));
        assert_eq!(verdict.summary(), "model:ATTACK score:0.95");
    }

    #[test]
    fn test_benign_has_no_stage_two_fields() {
        let verdict = Verdict::benign(0.7);
        assert_eq!(verdict.attack_type(), None);
        assert_eq!(verdict.attack_confidence(), None);
        assert_eq!(verdict.degradation_note(), None);
        assert!(!verdict.is_attack());
    }
}
