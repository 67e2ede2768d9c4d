//! Request counters

use std::sync::atomic::{AtomicU64, Ordering};

use chrono::{DateTime, Utc};
use flowguard_core::Verdict;
use serde::Serialize;

#[derive(Debug)]
pub struct RequestStats {
    started_at: DateTime<Utc>,
    requests: AtomicU64,
    benign: AtomicU64,
    attacks: AtomicU64,
    degraded: AtomicU64,
    rejected: AtomicU64,
    failed: AtomicU64,
}

#[derive(Debug, Clone, Serialize)]
pub struct StatsSnapshot {
    pub started_at: DateTime<Utc>,
    pub requests: u64,
    pub benign: u64,
    pub attacks: u64,
    pub degraded: u64,
    pub rejected: u64,
    pub failed: u64,
}

impl Default for RequestStats {
    fn default() -> Self {
        Self {
            started_at: Utc::now(),
            requests: AtomicU64::new(0),
            benign: AtomicU64::new(0),
            attacks: AtomicU64::new(0),
            degraded: AtomicU64::new(0),
            rejected: AtomicU64::new(0),
            failed: AtomicU64::new(0),
        }
    }
}

impl RequestStats {
    pub fn record_request(&self) {
        self.requests.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_verdict(&self, verdict: &Verdict) {
        if verdict.is_attack() {
            self.attacks.fetch_add(1, Ordering::Relaxed);
        } else {
            self.benign.fetch_add(1, Ordering::Relaxed);
        }
        if verdict.is_degraded() {
            self.degraded.fetch_add(1, Ordering::Relaxed);
        }
    }

    /// Invalid input
    pub fn record_rejected(&self) {
        self.rejected.fetch_add(1, Ordering::Relaxed);
    }

    /// Binary stage failure
    pub fn record_failed(&self) {
        self.failed.fetch_add(1, Ordering::Relaxed);
    }

    pub fn snapshot(&self) -> StatsSnapshot {
        StatsSnapshot {
            started_at: self.started_at,
            requests: self.requests.load(Ordering::Relaxed),
            benign: self.benign.load(Ordering::Relaxed),
            attacks: self.attacks.load(Ordering::Relaxed),
            degraded: self.degraded.load(Ordering::Relaxed),
            rejected: self.rejected.load(Ordering::Relaxed),
            failed: self.failed.load(Ordering::Relaxed),
        }
    }
}
