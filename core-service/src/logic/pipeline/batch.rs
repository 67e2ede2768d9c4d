//! Batch evaluation - JSON-lines in, one JSON result per line out
//!
//! Used by the `flowguard-classify` binary. A rejected line never stops the
//! stream; it produces `{"error": ..., "line": n}` instead of a verdict.

use std::io::{self, BufRead, Write};

use serde_json::{json, Value};

use crate::error::PipelineError;
use crate::logic::features::RawFeatures;

use super::decision::DecisionPipeline;

/// Counts for one processed stream
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BatchSummary {
    pub total: usize,
    pub rejected: usize,
}

/// Evaluate every non-blank line of `input`, writing one result line each
pub fn classify_stream<R, W>(pipeline: &DecisionPipeline, input: R, mut output: W) -> io::Result<BatchSummary>
where
    R: BufRead,
    W: Write,
{
    let mut summary = BatchSummary::default();

    for (index, line) in input.lines().enumerate() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        summary.total += 1;

        let result = classify_line(pipeline, &line, index + 1);
        if result.get("error").is_some() {
            summary.rejected += 1;
        }
        writeln!(output, "{}", result)?;
    }

    output.flush()?;
    Ok(summary)
}

/// Evaluate a single JSON object line (1-based `line_no` for error reports)
pub fn classify_line(pipeline: &DecisionPipeline, line: &str, line_no: usize) -> Value {
    let raw = match serde_json::from_str::<Value>(line) {
        Ok(Value::Object(map)) => RawFeatures::from_json_map(&map),
        Ok(_) => {
            return json!({"error": "invalid input", "detail": "expected a JSON object", "line": line_no});
        }
        Err(e) => {
            return json!({"error": "invalid input", "detail": e.to_string(), "line": line_no});
        }
    };

    match pipeline.evaluate_raw(&raw) {
        Ok(verdict) => serde_json::to_value(&verdict)
            .unwrap_or_else(|e| json!({"error": e.to_string(), "line": line_no})),
        Err(PipelineError::InvalidInput { field, reason }) => {
            json!({"error": "invalid input", "field": field, "detail": reason, "line": line_no})
        }
        Err(e) => {
            log::error!("line {}: {}", line_no, e);
            json!({"error": e.to_string(), "line": line_no})
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logic::model::testing::{FailingClassifier, FixedBinary, FixedMulticlass};
    use crate::logic::model::{BinaryClassifier, Normalizer, ThresholdConfig};

    fn pipeline_with(binary: impl BinaryClassifier + 'static) -> DecisionPipeline {
        DecisionPipeline::new(
            Normalizer::identity(),
            Box::new(binary),
            Box::new(FixedMulticlass::new("BRUTE_FORCE", 0.8)),
            ThresholdConfig::default(),
        )
    }

    #[test]
    fn test_valid_line_yields_verdict() {
        let pipeline = pipeline_with(FixedBinary::scalar(0.9));
        let result = classify_line(&pipeline, r#"{"failed_logins": 6, "duration": "2,0"}"#, 1);

        assert_eq!(
            result,
            json!({
                "binary_label": "ATTACK",
                "binary_score": 0.9,
                "attack_type": "BRUTE_FORCE",
                "attack_confidence": 0.8
            })
        );
    }

    #[test]
    fn test_non_object_line() {
        let pipeline = pipeline_with(FixedBinary::scalar(0.1));
        let result = classify_line(&pipeline, "[1, 2, 3]", 4);

        assert_eq!(result["error"], "invalid input");
        assert_eq!(result["detail"], "expected a JSON object");
        assert_eq!(result["line"], 4);
    }

    #[test]
    fn test_malformed_json() {
        let pipeline = pipeline_with(FixedBinary::scalar(0.1));
        let result = classify_line(&pipeline, "{\"duration\": ", 2);

        assert_eq!(result["error"], "invalid input");
        assert_eq!(result["line"], 2);
        assert!(result.get("field").is_none());
    }

    #[test]
    fn test_invalid_field_is_named() {
        let pipeline = pipeline_with(FixedBinary::scalar(0.1));
        let result = classify_line(&pipeline, r#"{"pkt_rate": "fast"}"#, 7);

        assert_eq!(result["error"], "invalid input");
        assert_eq!(result["field"], "pkt_rate");
        assert_eq!(result["line"], 7);
    }

    #[test]
    fn test_binary_failure_reported_per_line() {
        let pipeline = pipeline_with(FailingClassifier::new("weights corrupted"));
        let result = classify_line(&pipeline, "{}", 1);

        assert_eq!(result["error"], "model binary predict error: weights corrupted");
        assert_eq!(result["line"], 1);
    }

    #[test]
    fn test_stream_skips_blank_lines_and_counts_rejections() {
        let pipeline = pipeline_with(FixedBinary::scalar(0.1));
        let input = "{\"duration\": 1}\n\n   \nnot json\n{\"src_bytes\": -5}\n";
        let mut output = Vec::new();

        let summary = classify_stream(&pipeline, input.as_bytes(), &mut output).unwrap();
        assert_eq!(summary, BatchSummary { total: 3, rejected: 2 });

        let lines: Vec<Value> = String::from_utf8(output)
            .unwrap()
            .lines()
            .map(|l| serde_json::from_str(l).unwrap())
            .collect();
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0]["binary_label"], "BENIGN");
        assert_eq!(lines[1]["line"], 4);
        assert_eq!(lines[2]["field"], "src_bytes");
        assert_eq!(lines[2]["line"], 5);
    }
}
