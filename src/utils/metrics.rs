//! Observability and Metrics
//!
//! Counters describing how session identifiers are being resolved: how often
//! the primary cookie is valid, how often duplicate cookies rescue a request
//! and how often encoding drift forces a rewrite.
//!
//! Uses atomic counters for thread-safe metrics collection.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Instant;
use tracing::info;

/// Metrics collector for one session id decorator
#[derive(Debug)]
pub struct DecoratorMetrics {
    /// Total resolve calls
    pub resolves_total: AtomicU64,
    /// Resolve calls that ended without a session id
    pub resolves_absent: AtomicU64,
    /// Directory lookups that found a session
    pub directory_hits: AtomicU64,
    /// Directory lookups that found nothing
    pub directory_misses: AtomicU64,
    /// Sessions recovered from a duplicate cookie
    pub duplicate_recoveries: AtomicU64,
    /// Re-encoded identifiers pushed back to the transport
    pub reencode_writes: AtomicU64,
    /// Explicit assignments
    pub assignments: AtomicU64,
    /// Clear operations
    pub clears: AtomicU64,
    start_time: Instant,
}

impl DecoratorMetrics {
    pub fn new() -> Self {
        Self {
            resolves_total: AtomicU64::new(0),
            resolves_absent: AtomicU64::new(0),
            directory_hits: AtomicU64::new(0),
            directory_misses: AtomicU64::new(0),
            duplicate_recoveries: AtomicU64::new(0),
            reencode_writes: AtomicU64::new(0),
            assignments: AtomicU64::new(0),
            clears: AtomicU64::new(0),
            start_time: Instant::now(),
        }
    }

    pub fn resolve_attempt(&self) {
        self.resolves_total.fetch_add(1, Ordering::Relaxed);
    }

    pub fn resolve_absent(&self) {
        self.resolves_absent.fetch_add(1, Ordering::Relaxed);
    }

    pub fn directory_hit(&self) {
        self.directory_hits.fetch_add(1, Ordering::Relaxed);
    }

    pub fn directory_miss(&self) {
        self.directory_misses.fetch_add(1, Ordering::Relaxed);
    }

    pub fn duplicate_recovery(&self) {
        self.duplicate_recoveries.fetch_add(1, Ordering::Relaxed);
    }

    pub fn reencode_write(&self) {
        self.reencode_writes.fetch_add(1, Ordering::Relaxed);
    }

    pub fn assignment(&self) {
        self.assignments.fetch_add(1, Ordering::Relaxed);
    }

    pub fn clear(&self) {
        self.clears.fetch_add(1, Ordering::Relaxed);
    }

    /// Get current metrics snapshot
    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            resolves_total: self.resolves_total.load(Ordering::Relaxed),
            resolves_absent: self.resolves_absent.load(Ordering::Relaxed),
            directory_hits: self.directory_hits.load(Ordering::Relaxed),
            directory_misses: self.directory_misses.load(Ordering::Relaxed),
            duplicate_recoveries: self.duplicate_recoveries.load(Ordering::Relaxed),
            reencode_writes: self.reencode_writes.load(Ordering::Relaxed),
            assignments: self.assignments.load(Ordering::Relaxed),
            clears: self.clears.load(Ordering::Relaxed),
            uptime_seconds: self.start_time.elapsed().as_secs(),
        }
    }

    /// Log current metrics
    pub fn log_metrics(&self) {
        let snapshot = self.snapshot();
        info!(
            resolves_total = snapshot.resolves_total,
            resolves_absent = snapshot.resolves_absent,
            directory_hits = snapshot.directory_hits,
            directory_misses = snapshot.directory_misses,
            duplicate_recoveries = snapshot.duplicate_recoveries,
            reencode_writes = snapshot.reencode_writes,
            assignments = snapshot.assignments,
            clears = snapshot.clears,
            uptime_seconds = snapshot.uptime_seconds,
            "Session id metrics snapshot"
        );
    }
}

impl Default for DecoratorMetrics {
    fn default() -> Self {
        Self::new()
    }
}

/// Snapshot of metrics at a point in time
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MetricsSnapshot {
    pub resolves_total: u64,
    pub resolves_absent: u64,
    pub directory_hits: u64,
    pub directory_misses: u64,
    pub duplicate_recoveries: u64,
    pub reencode_writes: u64,
    pub assignments: u64,
    pub clears: u64,
    pub uptime_seconds: u64,
}
