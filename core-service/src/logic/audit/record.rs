//! Audit Record - one row of the traffic log

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::logic::features::FeatureVector;

/// Column order of the CSV audit log
pub const AUDIT_HEADER: [&str; 8] = [
    "timestamp",
    "duration",
    "src_bytes",
    "dst_bytes",
    "pkt_rate",
    "failed_logins",
    "client_ip",
    "note",
];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuditRecord {
    pub timestamp: DateTime<Utc>,
    pub duration: f64,
    pub src_bytes: f64,
    pub dst_bytes: f64,
    pub pkt_rate: f64,
    pub failed_logins: f64,
    pub client_ip: String,
    pub note: String,
}

impl AuditRecord {
    pub fn new(features: &FeatureVector, client: &str, note: impl Into<String>) -> Self {
        Self {
            timestamp: Utc::now(),
            duration: features.duration(),
            src_bytes: features.src_bytes(),
            dst_bytes: features.dst_bytes(),
            pkt_rate: features.pkt_rate(),
            failed_logins: features.failed_logins(),
            client_ip: client.to_string(),
            note: note.into(),
        }
    }

    /// Fields as text, in `AUDIT_HEADER` order
    pub fn to_row(&self) -> [String; 8] {
        [
            self.timestamp.to_rfc3339(),
            self.duration.to_string(),
            self.src_bytes.to_string(),
            self.dst_bytes.to_string(),
            self.pkt_rate.to_string(),
            self.failed_logins.to_string(),
            self.client_ip.clone(),
            self.note.clone(),
        ]
    }
}
