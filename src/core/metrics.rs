//! Logger metrics for observability
//!
//! Counters describing what the emission and hook paths did. Every counter
//! is a relaxed atomic; reads are advisory snapshots.

use std::sync::atomic::{AtomicU64, Ordering};

/// Metrics for logger observability
///
/// # Example
///
/// ```
/// use loggo::LoggerMetrics;
///
/// let metrics = LoggerMetrics::new();
///
/// metrics.record_written();
/// metrics.record_sink_failures(2);
///
/// assert_eq!(metrics.messages_written(), 1);
/// assert_eq!(metrics.sink_failures(), 2);
/// ```
#[derive(Debug)]
pub struct LoggerMetrics {
    /// Lines handed to the output fan-out
    messages_written: AtomicU64,

    /// Individual sink writes attempted
    sink_writes: AtomicU64,

    /// Individual sink writes that failed or panicked
    sink_failures: AtomicU64,

    /// Hook passes accepted by the worker pool
    hook_jobs_dispatched: AtomicU64,

    /// Hook passes refused because the pool was stopped
    hook_jobs_dropped: AtomicU64,

    /// Hooks evicted after failing
    hooks_removed: AtomicU64,

    /// Lines rendered into a buffer larger than the pool keeps
    oversized_buffers: AtomicU64,
}

impl LoggerMetrics {
    /// Create a new metrics instance with all counters at zero
    pub const fn new() -> Self {
        Self {
            messages_written: AtomicU64::new(0),
            sink_writes: AtomicU64::new(0),
            sink_failures: AtomicU64::new(0),
            hook_jobs_dispatched: AtomicU64::new(0),
            hook_jobs_dropped: AtomicU64::new(0),
            hooks_removed: AtomicU64::new(0),
            oversized_buffers: AtomicU64::new(0),
        }
    }

    #[inline]
    pub fn messages_written(&self) -> u64 {
        self.messages_written.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn sink_writes(&self) -> u64 {
        self.sink_writes.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn sink_failures(&self) -> u64 {
        self.sink_failures.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn hook_jobs_dispatched(&self) -> u64 {
        self.hook_jobs_dispatched.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn hook_jobs_dropped(&self) -> u64 {
        self.hook_jobs_dropped.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn hooks_removed(&self) -> u64 {
        self.hooks_removed.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn oversized_buffers(&self) -> u64 {
        self.oversized_buffers.load(Ordering::Relaxed)
    }

    /// Record a line written to the fan-out
    #[inline]
    pub fn record_written(&self) -> u64 {
        self.messages_written.fetch_add(1, Ordering::Relaxed)
    }

    #[inline]
    pub fn record_sink_writes(&self, count: u64) -> u64 {
        self.sink_writes.fetch_add(count, Ordering::Relaxed)
    }

    #[inline]
    pub fn record_sink_failures(&self, count: u64) -> u64 {
        self.sink_failures.fetch_add(count, Ordering::Relaxed)
    }

    #[inline]
    pub fn record_hook_dispatched(&self) -> u64 {
        self.hook_jobs_dispatched.fetch_add(1, Ordering::Relaxed)
    }

    #[inline]
    pub fn record_hook_dropped(&self) -> u64 {
        self.hook_jobs_dropped.fetch_add(1, Ordering::Relaxed)
    }

    #[inline]
    pub fn record_hook_removed(&self) -> u64 {
        self.hooks_removed.fetch_add(1, Ordering::Relaxed)
    }

    #[inline]
    pub fn record_oversized(&self) -> u64 {
        self.oversized_buffers.fetch_add(1, Ordering::Relaxed)
    }

    /// Share of sink writes that failed, as a percentage (0.0 - 100.0)
    ///
    /// Returns 0.0 if no sink write was attempted.
    pub fn failure_rate(&self) -> f64 {
        let failures = self.sink_failures() as f64;
        let attempted = self.sink_writes() as f64;
        if attempted == 0.0 {
            0.0
        } else {
            (failures / attempted) * 100.0
        }
    }

    /// Reset all metrics to zero
    pub fn reset(&self) {
        self.messages_written.store(0, Ordering::Relaxed);
        self.sink_writes.store(0, Ordering::Relaxed);
        self.sink_failures.store(0, Ordering::Relaxed);
        self.hook_jobs_dispatched.store(0, Ordering::Relaxed);
        self.hook_jobs_dropped.store(0, Ordering::Relaxed);
        self.hooks_removed.store(0, Ordering::Relaxed);
        self.oversized_buffers.store(0, Ordering::Relaxed);
    }
}

impl Default for LoggerMetrics {
    fn default() -> Self {
        Self::new()
    }
}

impl Clone for LoggerMetrics {
    /// Create a snapshot of the current metrics values
    fn clone(&self) -> Self {
        Self {
            messages_written: AtomicU64::new(self.messages_written()),
            sink_writes: AtomicU64::new(self.sink_writes()),
            sink_failures: AtomicU64::new(self.sink_failures()),
            hook_jobs_dispatched: AtomicU64::new(self.hook_jobs_dispatched()),
            hook_jobs_dropped: AtomicU64::new(self.hook_jobs_dropped()),
            hooks_removed: AtomicU64::new(self.hooks_removed()),
            oversized_buffers: AtomicU64::new(self.oversized_buffers()),
        }
    }
}
