//! Audit Sink - append-only record destination

use std::collections::VecDeque;
use std::sync::Arc;

use parking_lot::RwLock;

use super::record::AuditRecord;
use crate::error::AuditError;

/// Durable, append-only log of requests and decisions.
///
/// Implementations may block. Callers treat failures as best-effort.
pub trait AuditSink: Send + Sync {
    fn append(&self, record: &AuditRecord) -> Result<(), AuditError>;
}

impl<T: AuditSink + ?Sized> AuditSink for Arc<T> {
    fn append(&self, record: &AuditRecord) -> Result<(), AuditError> {
        (**self).append(record)
    }
}

impl<T: AuditSink + ?Sized> AuditSink for Box<T> {
    fn append(&self, record: &AuditRecord) -> Result<(), AuditError> {
        (**self).append(record)
    }
}

/// Discards everything
#[derive(Debug, Clone, Copy, Default)]
pub struct NullAuditSink;

impl AuditSink for NullAuditSink {
    fn append(&self, _record: &AuditRecord) -> Result<(), AuditError> {
        Ok(())
    }
}

/// Bounded in-memory sink, oldest entries dropped first
#[derive(Debug)]
pub struct MemoryAuditSink {
    capacity: usize,
    entries: RwLock<VecDeque<AuditRecord>>,
}

impl Default for MemoryAuditSink {
    fn default() -> Self {
        Self::new(crate::constants::DEFAULT_MEMORY_AUDIT_CAPACITY)
    }
}

impl MemoryAuditSink {
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity: capacity.max(1),
            entries: RwLock::new(VecDeque::new()),
        }
    }

    /// Last `limit` records, oldest first
    pub fn recent(&self, limit: usize) -> Vec<AuditRecord> {
        let entries = self.entries.read();
        let start = entries.len().saturating_sub(limit);
        entries.iter().skip(start).cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }
}

impl AuditSink for MemoryAuditSink {
    fn append(&self, record: &AuditRecord) -> Result<(), AuditError> {
        let mut entries = self.entries.write();
        entries.push_back(record.clone());
        while entries.len() > self.capacity {
            entries.pop_front();
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logic::features::FeatureVector;

    fn record(note: &str) -> AuditRecord {
        AuditRecord::new(&FeatureVector::zeroed(), "-", note)
    }

    #[test]
    fn test_memory_sink_keeps_latest() {
        let sink = MemoryAuditSink::new(3);
        for i in 0..5 {
            sink.append(&record(&format!("n{}", i))).unwrap();
        }

        assert_eq!(sink.len(), 3);
        let notes: Vec<String> = sink.recent(2).into_iter().map(|r| r.note).collect();
        assert_eq!(notes, vec!["n3".to_string(), "n4".to_string()]);
        assert_eq!(sink.recent(10).len(), 3);
    }

    #[test]
    fn test_shared_sink_through_arc() {
        let sink = Arc::new(MemoryAuditSink::new(8));
        let shared: Arc<dyn AuditSink> = sink.clone();

        shared.append(&record("a")).unwrap();
        NullAuditSink.append(&record("b")).unwrap();
        assert_eq!(sink.len(), 1);
    }
}
