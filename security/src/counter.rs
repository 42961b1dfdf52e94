use crate::FailureKind;
use hashbrown::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};

/// Monotonic per-kind counters for observed security violations.
///
/// One instance is shared by every pipeline in a validator scope; all
/// operations are wait-free atomic fetch-adds and loads, so counting never
/// contends with validation.
#[derive(Debug, Default)]
pub struct SecurityEventCounter {
    counts: [AtomicU64; FailureKind::ALL.len()],
}

impl SecurityEventCounter {
    /// construct a counter with every kind at zero
    pub fn new() -> Self {
        Self::default()
    }

    /// record one violation of this kind
    pub fn increment(&self, kind: FailureKind) {
        self.counts[kind.index()].fetch_add(1, Ordering::Relaxed);
    }

    /// the number of recorded violations of this kind
    pub fn count(&self, kind: FailureKind) -> u64 {
        self.counts[kind.index()].load(Ordering::Relaxed)
    }

    /// the number of recorded violations across all kinds
    pub fn total(&self) -> u64 {
        self.counts
            .iter()
            .map(|count| count.load(Ordering::Relaxed))
            .sum()
    }

    /// a point-in-time copy of every per-kind count
    pub fn snapshot(&self) -> HashMap<FailureKind, u64> {
        FailureKind::ALL
            .iter()
            .map(|kind| (*kind, self.count(*kind)))
            .collect()
    }
}
