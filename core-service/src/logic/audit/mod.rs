//! Audit Module - durable record of every request and decision
//!
//! The pipeline writes two records per parsed request (before and after the
//! decision). Storage format is the sink's business.

pub mod file;
pub mod record;
pub mod sink;

use std::path::PathBuf;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::AuditError;

// Re-export common types
pub use file::{CsvAuditLog, JsonlAuditLog};
pub use record::{AuditRecord, AUDIT_HEADER};
pub use sink::{AuditSink, MemoryAuditSink, NullAuditSink};

/// On-disk audit format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AuditFormat {
    #[default]
    Csv,
    Jsonl,
}

impl FromStr for AuditFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "csv" => Ok(AuditFormat::Csv),
            "jsonl" | "json" => Ok(AuditFormat::Jsonl),
            other => Err(format!("unknown audit format '{}' (expected csv or jsonl)", other)),
        }
    }
}

/// Open a file-backed sink. `max_entries` only applies to JSONL rotation.
pub fn open_audit_log(
    path: impl Into<PathBuf>,
    format: AuditFormat,
    max_entries: usize,
) -> Result<Box<dyn AuditSink>, AuditError> {
    Ok(match format {
        AuditFormat::Csv => Box::new(CsvAuditLog::open(path)?),
        AuditFormat::Jsonl => Box::new(JsonlAuditLog::open(path, max_entries)?),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_audit_format_parse() {
        assert_eq!("CSV".parse::<AuditFormat>().unwrap(), AuditFormat::Csv);
        assert_eq!(" jsonl ".parse::<AuditFormat>().unwrap(), AuditFormat::Jsonl);
        assert!("xml".parse::<AuditFormat>().is_err());
    }

    #[test]
    fn test_open_audit_log() {
        let dir = tempfile::tempdir().unwrap();
        let sink = open_audit_log(dir.path().join("t.jsonl"), AuditFormat::Jsonl, 10).unwrap();
        let features = crate::logic::features::FeatureVector::zeroed();
        sink.append(&AuditRecord::new(&features, "-", "x")).unwrap();
        assert!(dir.path().join("t.jsonl").exists());
    }
}
