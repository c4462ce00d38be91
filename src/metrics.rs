// Run metrics module
//
// Provides lightweight counters for monitoring settings randomization runs

use crate::services::engine::{RunOutcome, RunReport};
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};

/// Randomization run metrics
///
/// Uses atomic operations for thread-safe metric tracking without locks.
/// Metrics are collected for the lifetime of the process and logged on
/// shutdown.
#[derive(Debug)]
pub struct Metrics {
    /// Runs that entered the engine
    pub runs_started: AtomicU64,

    /// Runs that finished successfully (any outcome)
    pub runs_completed: AtomicU64,

    /// Runs aborted by an error
    pub runs_failed: AtomicU64,

    /// Runs that returned the settings untouched ("Disabled")
    pub runs_unchanged: AtomicU64,

    /// Runs that applied a profile file
    pub runs_profiled: AtomicU64,

    /// Profile directives processed (mode switches and field references)
    pub directives_applied: AtomicU64,

    /// Field references applied in Include mode
    pub fields_included: AtomicU64,

    /// Field references applied in Exclude mode
    pub fields_excluded: AtomicU64,

    /// Process start time
    start_time: Instant,
}

impl Metrics {
    /// Create a new Metrics instance
    pub fn new() -> Self {
        Self {
            runs_started: AtomicU64::new(0),
            runs_completed: AtomicU64::new(0),
            runs_failed: AtomicU64::new(0),
            runs_unchanged: AtomicU64::new(0),
            runs_profiled: AtomicU64::new(0),
            directives_applied: AtomicU64::new(0),
            fields_included: AtomicU64::new(0),
            fields_excluded: AtomicU64::new(0),
            start_time: Instant::now(),
        }
    }

    pub fn record_run_started(&self) {
        self.runs_started.fetch_add(1, Ordering::Relaxed);
    }

    /// Record a successful run and its merge counts
    pub fn record_run_completed(&self, report: &RunReport) {
        self.runs_completed.fetch_add(1, Ordering::Relaxed);

        match report.outcome {
            RunOutcome::Unchanged => {
                self.runs_unchanged.fetch_add(1, Ordering::Relaxed);
            }
            RunOutcome::ProfileApplied => {
                self.runs_profiled.fetch_add(1, Ordering::Relaxed);
            }
            RunOutcome::FullyRandomized => {}
        }

        if let Some(merge) = report.merge {
            let directives = merge.included + merge.excluded + merge.mode_switches;
            self.directives_applied
                .fetch_add(directives as u64, Ordering::Relaxed);
            self.fields_included
                .fetch_add(merge.included as u64, Ordering::Relaxed);
            self.fields_excluded
                .fetch_add(merge.excluded as u64, Ordering::Relaxed);
        }
    }

    pub fn record_run_failed(&self) {
        self.runs_failed.fetch_add(1, Ordering::Relaxed);
    }

    pub fn runs_completed(&self) -> u64 {
        self.runs_completed.load(Ordering::Relaxed)
    }

    pub fn runs_failed(&self) -> u64 {
        self.runs_failed.load(Ordering::Relaxed)
    }

    pub fn directives_applied(&self) -> u64 {
        self.directives_applied.load(Ordering::Relaxed)
    }

    pub fn fields_included(&self) -> u64 {
        self.fields_included.load(Ordering::Relaxed)
    }

    pub fn fields_excluded(&self) -> u64 {
        self.fields_excluded.load(Ordering::Relaxed)
    }

    /// Get total uptime
    pub fn uptime(&self) -> Duration {
        self.start_time.elapsed()
    }

    /// Log metrics summary
    pub fn log_summary(&self) {
        tracing::info!("=== Settings Randomization Metrics ===");
        tracing::info!("Uptime: {:.2}s", self.uptime().as_secs_f64());
        tracing::info!(
            "Runs: {} started, {} completed, {} failed",
            self.runs_started.load(Ordering::Relaxed),
            self.runs_completed(),
            self.runs_failed()
        );
        tracing::info!(
            "Outcomes: {} unchanged, {} with profile",
            self.runs_unchanged.load(Ordering::Relaxed),
            self.runs_profiled.load(Ordering::Relaxed)
        );
        tracing::info!(
            "Profile directives: {} applied, {} fields included, {} excluded",
            self.directives_applied(),
            self.fields_included(),
            self.fields_excluded()
        );
    }
}

impl Default for Metrics {
    fn default() -> Self {
        Self::new()
    }
}
