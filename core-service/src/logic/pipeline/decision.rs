//! Decision Pipeline - parse → normalize → binary → threshold → multiclass
//!
//! Built once at startup with its normalizer, classifiers and threshold
//! injected; immutable afterwards and shared across request handlers.
//!
//! Failure policy:
//! - invalid input: abort, client fault
//! - binary stage failure: abort, server fault (no verdict without a label)
//! - multiclass stage failure: degrade, keep the binary verdict and add a note

use crate::error::PipelineError;
use crate::logic::audit::{AuditRecord, AuditSink};
use crate::logic::features::{FeatureVector, RawFeatures};
use crate::logic::model::{BinaryClassifier, MulticlassClassifier, Normalizer, ThresholdConfig};

use super::request::FlowRequest;
use super::verdict::{Refinement, Verdict};

pub struct DecisionPipeline {
    normalizer: Normalizer,
    binary: Box<dyn BinaryClassifier>,
    multiclass: Box<dyn MulticlassClassifier>,
    threshold: ThresholdConfig,
}

impl DecisionPipeline {
    pub fn new(
        normalizer: Normalizer,
        binary: Box<dyn BinaryClassifier>,
        multiclass: Box<dyn MulticlassClassifier>,
        threshold: ThresholdConfig,
    ) -> Self {
        log::info!(
            "Decision pipeline ready: binary={}, multiclass={}, threshold={}",
            binary.describe(),
            multiclass.describe(),
            threshold.get()
        );

        Self {
            normalizer,
            binary,
            multiclass,
            threshold,
        }
    }

    pub fn threshold(&self) -> ThresholdConfig {
        self.threshold
    }

    pub fn normalizer(&self) -> &Normalizer {
        &self.normalizer
    }

    /// Parse a raw mapping, then evaluate it
    pub fn evaluate_raw(&self, raw: &RawFeatures) -> Result<Verdict, PipelineError> {
        let features = FeatureVector::parse(raw)?;
        self.evaluate(&features)
    }

    /// Evaluate an already parsed vector. Only the binary stage can fail.
    pub fn evaluate(&self, features: &FeatureVector) -> Result<Verdict, PipelineError> {
        if log::log_enabled!(log::Level::Debug) {
            log::debug!("Evaluating flow {}", features.to_log_entry());
        }
        let normalized = self.normalizer.normalize(features);

        let odds = self
            .binary
            .classify(&normalized)
            .and_then(|distribution| distribution.binary_odds())
            .map_err(|e| {
                log::error!("Binary stage failed: {}", e);
                PipelineError::BinaryStage(e)
            })?;

        if !self.threshold.is_attack(odds.attack) {
            log::debug!("BENIGN (attack probability {:.4})", odds.attack);
            return Ok(Verdict::benign(odds.benign));
        }

        let refinement = match self
            .multiclass
            .classify(&normalized)
            .and_then(|prediction| prediction.confidence().map(|c| (prediction.label, c)))
        {
            Ok((attack_type, confidence)) => {
                log::debug!("ATTACK {} ({:.4}, confidence {:.4})", attack_type, odds.attack, confidence);
                Refinement::Classified {
                    attack_type,
                    confidence,
                }
            }
            Err(e) => {
                log::warn!("Multiclass stage failed, returning binary verdict only: {}", e);
                Refinement::Degraded {
                    note: format!("multiclass error: {}", e),
                }
            }
        };

        Ok(Verdict::attack(odds.attack, refinement))
    }

    /// Full request path with auditing: one record before the decision and
    /// one after it. Nothing is audited when the input does not parse; only
    /// the first record is written when the binary stage fails. Sink errors
    /// are logged and never change the outcome.
    pub fn assess(&self, request: &FlowRequest, sink: &dyn AuditSink) -> Result<Verdict, PipelineError> {
        let features = FeatureVector::parse(&request.features)?;
        let client = request.client_or_default();

        append_logged(sink, &AuditRecord::new(&features, client, request.note.as_str()));

        let verdict = self.evaluate(&features)?;

        append_logged(sink, &AuditRecord::new(&features, client, verdict.summary()));

        Ok(verdict)
    }
}

fn append_logged(sink: &dyn AuditSink, record: &AuditRecord) {
    if let Err(e) = sink.append(record) {
        log::warn!("Audit write failed: {}", e);
    }
}
