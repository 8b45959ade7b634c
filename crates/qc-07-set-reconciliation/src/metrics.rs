//! Metrics hooks for reconciliation runs
//!
//! ## Usage
//!
//! ```ignore
//! use qc_07_set_reconciliation::metrics::ReconcileMetrics;
//! use std::sync::Arc;
//!
//! let metrics = Arc::new(ReconcileMetrics::new());
//! let reconciler = Reconciler::with_metrics(config, metrics.clone());
//!
//! reconciler.reconcile(&local, &remote)?;
//! println!("{:?}", metrics.snapshot());
//! ```

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use crate::domain::Decoded;

/// Metrics collector for reconciliation runs
///
/// Thread-safe counters, shared between reconcilers via `Arc`.
#[derive(Default)]
pub struct ReconcileMetrics {
    /// Reconciliations started
    pub attempted: AtomicU64,
    /// Reconciliations that decoded completely
    pub succeeded: AtomicU64,
    /// Decodes that stalled with non-empty buckets
    pub decode_failures: AtomicU64,
    /// Subtractions rejected for incompatible parameters
    pub config_mismatches: AtomicU64,
    /// Keys only the local side holds
    pub keys_remaining: AtomicU64,
    /// Keys only the remote side holds
    pub keys_missing: AtomicU64,
    /// Peeling passes across all decodes
    pub decode_passes: AtomicU64,
    /// Cumulative reconciliation time in nanoseconds
    pub reconcile_time_ns: AtomicU64,
}

impl ReconcileMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_attempt(&self) {
        self.attempted.fetch_add(1, Ordering::Relaxed);
    }

    /// Record a complete decode
    pub fn record_success(&self, duration: Duration, decoded: &Decoded) {
        self.succeeded.fetch_add(1, Ordering::Relaxed);
        self.record_decoded(duration, decoded);
    }

    /// Record a stalled decode; the partial result still counts toward
    /// recovered keys
    pub fn record_decode_failure(&self, duration: Duration, partial: &Decoded) {
        self.decode_failures.fetch_add(1, Ordering::Relaxed);
        self.record_decoded(duration, partial);
    }

    pub fn record_config_mismatch(&self) {
        self.config_mismatches.fetch_add(1, Ordering::Relaxed);
    }

    fn record_decoded(&self, duration: Duration, decoded: &Decoded) {
        self.keys_remaining
            .fetch_add(decoded.remaining.len() as u64, Ordering::Relaxed);
        self.keys_missing
            .fetch_add(decoded.missing.len() as u64, Ordering::Relaxed);
        self.decode_passes
            .fetch_add(decoded.passes as u64, Ordering::Relaxed);
        self.reconcile_time_ns
            .fetch_add(duration.as_nanos() as u64, Ordering::Relaxed);
    }

    /// Get current metrics snapshot
    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            attempted: self.attempted.load(Ordering::Relaxed),
            succeeded: self.succeeded.load(Ordering::Relaxed),
            decode_failures: self.decode_failures.load(Ordering::Relaxed),
            config_mismatches: self.config_mismatches.load(Ordering::Relaxed),
            keys_remaining: self.keys_remaining.load(Ordering::Relaxed),
            keys_missing: self.keys_missing.load(Ordering::Relaxed),
            decode_passes: self.decode_passes.load(Ordering::Relaxed),
            avg_reconcile_ns: self.avg_reconcile_time_ns(),
        }
    }

    /// Average time over decodes that ran (successful or not)
    pub fn avg_reconcile_time_ns(&self) -> u64 {
        let total = self.reconcile_time_ns.load(Ordering::Relaxed);
        let count = self.succeeded.load(Ordering::Relaxed)
            + self.decode_failures.load(Ordering::Relaxed);
        if count > 0 {
            total / count
        } else {
            0
        }
    }

    /// Fraction of decodes that completed
    pub fn success_rate(&self) -> f64 {
        let succeeded = self.succeeded.load(Ordering::Relaxed);
        let total = succeeded + self.decode_failures.load(Ordering::Relaxed);
        if total > 0 {
            succeeded as f64 / total as f64
        } else {
            0.0
        }
    }

    /// Reset all counters
    pub fn reset(&self) {
        self.attempted.store(0, Ordering::Relaxed);
        self.succeeded.store(0, Ordering::Relaxed);
        self.decode_failures.store(0, Ordering::Relaxed);
        self.config_mismatches.store(0, Ordering::Relaxed);
        self.keys_remaining.store(0, Ordering::Relaxed);
        self.keys_missing.store(0, Ordering::Relaxed);
        self.decode_passes.store(0, Ordering::Relaxed);
        self.reconcile_time_ns.store(0, Ordering::Relaxed);
    }
}

/// Point-in-time metrics snapshot
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct MetricsSnapshot {
    pub attempted: u64,
    pub succeeded: u64,
    pub decode_failures: u64,
    pub config_mismatches: u64,
    pub keys_remaining: u64,
    pub keys_missing: u64,
    pub decode_passes: u64,
    pub avg_reconcile_ns: u64,
}

/// Trait for custom metrics recording implementations
///
/// Implement this trait to integrate with external metrics systems.
pub trait MetricsRecorder: Send + Sync {
    fn record_attempt(&self);

    fn record_success(&self, duration: Duration, decoded: &Decoded);

    fn record_decode_failure(&self, duration: Duration, partial: &Decoded);

    fn record_config_mismatch(&self);
}

/// No-op metrics recorder for when metrics are disabled
#[derive(Default)]
pub struct NoOpMetrics;

impl MetricsRecorder for NoOpMetrics {
    fn record_attempt(&self) {}
    fn record_success(&self, _: Duration, _: &Decoded) {}
    fn record_decode_failure(&self, _: Duration, _: &Decoded) {}
    fn record_config_mismatch(&self) {}
}

impl MetricsRecorder for ReconcileMetrics {
    fn record_attempt(&self) {
        ReconcileMetrics::record_attempt(self);
    }

    fn record_success(&self, duration: Duration, decoded: &Decoded) {
        ReconcileMetrics::record_success(self, duration, decoded);
    }

    fn record_decode_failure(&self, duration: Duration, partial: &Decoded) {
        ReconcileMetrics::record_decode_failure(self, duration, partial);
    }

    fn record_config_mismatch(&self) {
        ReconcileMetrics::record_config_mismatch(self);
    }
}
