//! Fire-and-forget audit writes
//!
//! Handlers enqueue records on a bounded channel; one background task
//! drains it and performs the (blocking) file writes in order on the
//! blocking pool. A slow or failing sink never delays a response. When the
//! queue is full the record is dropped with a warning.

use std::sync::Arc;

use flowguard_core::{AuditError, AuditRecord, AuditSink};
use tokio::sync::mpsc::{self, error::TrySendError};
use tokio::task::JoinHandle;

pub struct QueuedAuditSink {
    tx: mpsc::Sender<AuditRecord>,
}

impl QueuedAuditSink {
    /// Start the writer task with room for `capacity` pending records. It
    /// exits once every sender is dropped and the queue is drained.
    pub fn spawn(inner: Box<dyn AuditSink>, capacity: usize) -> (Self, JoinHandle<()>) {
        let (tx, mut rx) = mpsc::channel::<AuditRecord>(capacity.max(1));
        let inner: Arc<dyn AuditSink> = Arc::from(inner);

        let handle = tokio::spawn(async move {
            let mut written: u64 = 0;

            while let Some(record) = rx.recv().await {
                let sink = inner.clone();
                match tokio::task::spawn_blocking(move || sink.append(&record)).await {
                    Ok(Ok(())) => written += 1,
                    Ok(Err(e)) => tracing::warn!(error = %e, "Audit write failed"),
                    Err(e) => tracing::error!("Audit writer panicked: {}", e),
                }
            }

            tracing::info!(written, "Audit writer stopped");
        });

        (Self { tx }, handle)
    }
}

impl AuditSink for QueuedAuditSink {
    fn append(&self, record: &AuditRecord) -> Result<(), AuditError> {
        match self.tx.try_send(record.clone()) {
            Ok(()) => Ok(()),
            Err(TrySendError::Full(dropped)) => {
                tracing::warn!(client = %dropped.client_ip, "Audit queue full, record dropped");
                Ok(())
            }
            Err(TrySendError::Closed(_)) => Err(AuditError::Closed),
        }
    }
}
