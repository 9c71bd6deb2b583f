use std::sync::atomic::{AtomicU64, Ordering};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// In-memory counter. Monotonically increasing.
#[derive(Debug, Default)]
pub struct Counter {
    value: AtomicU64,
}

impl Counter {
    pub fn increment(&self) {
        self.add(1);
    }

    pub fn add(&self, n: u64) {
        self.value.fetch_add(n, Ordering::Relaxed);
    }

    pub fn get(&self) -> u64 {
        self.value.load(Ordering::Relaxed)
    }
}

/// Outcome counters for both sides of the relay.
#[derive(Debug, Default)]
pub struct RelayMetrics {
    // capture side
    pub forwarded: Counter,
    pub suppressed_stack: Counter,
    pub suppressed_progress: Counter,
    pub dropped_custom: Counter,
    pub filtered: Counter,
    // display side
    pub applied: Counter,
    pub discarded_stale: Counter,
    pub rejected: Counter,
    pub build_failures: Counter,
}

impl RelayMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            taken_at: Utc::now(),
            forwarded: self.forwarded.get(),
            suppressed_stack: self.suppressed_stack.get(),
            suppressed_progress: self.suppressed_progress.get(),
            dropped_custom: self.dropped_custom.get(),
            filtered: self.filtered.get(),
            applied: self.applied.get(),
            discarded_stale: self.discarded_stale.get(),
            rejected: self.rejected.get(),
            build_failures: self.build_failures.get(),
        }
    }
}

/// Point-in-time copy of [`RelayMetrics`].
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MetricsSnapshot {
    pub taken_at: DateTime<Utc>,
    pub forwarded: u64,
    pub suppressed_stack: u64,
    pub suppressed_progress: u64,
    pub dropped_custom: u64,
    pub filtered: u64,
    pub applied: u64,
    pub discarded_stale: u64,
    pub rejected: u64,
    pub build_failures: u64,
}

impl MetricsSnapshot {
    /// Events that reached the capture side but were not forwarded.
    pub fn suppressed_total(&self) -> u64 {
        self.suppressed_stack + self.suppressed_progress + self.dropped_custom + self.filtered
    }
}
