// Performance metrics module
//
// Provides lightweight metrics tracking for monitoring shell performance

use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::time::{Duration, Instant};

/// Global performance metrics
///
/// Uses atomic operations for thread-safe metric tracking without locks.
/// Metrics are collected throughout the application lifecycle and logged
/// on shutdown for performance analysis.
#[derive(Debug)]
pub struct Metrics {
    /// Number of state notifications fanned out to subscribers
    pub state_notifications: AtomicU64,

    /// Number of log entries appended to the store
    pub log_entries: AtomicU64,

    /// Number of full log-panel re-renders
    pub full_renders: AtomicU64,

    /// Number of incremental log-panel appends
    pub incremental_renders: AtomicU64,

    /// Number of conversion jobs that completed successfully
    pub jobs_completed: AtomicUsize,

    /// Number of conversion jobs that failed
    pub jobs_failed: AtomicUsize,

    /// Total job wall time in milliseconds
    pub total_job_time_ms: AtomicU64,

    /// Application start time
    start_time: Instant,
}

impl Metrics {
    pub fn new() -> Self {
        Self {
            state_notifications: AtomicU64::new(0),
            log_entries: AtomicU64::new(0),
            full_renders: AtomicU64::new(0),
            incremental_renders: AtomicU64::new(0),
            jobs_completed: AtomicUsize::new(0),
            jobs_failed: AtomicUsize::new(0),
            total_job_time_ms: AtomicU64::new(0),
            start_time: Instant::now(),
        }
    }

    pub fn record_notification(&self) {
        self.state_notifications.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_log_entry(&self) {
        self.log_entries.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_full_render(&self) {
        self.full_renders.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_incremental_render(&self) {
        self.incremental_renders.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_job_completed(&self, duration: Duration) {
        self.jobs_completed.fetch_add(1, Ordering::Relaxed);
        self.total_job_time_ms
            .fetch_add(duration.as_millis() as u64, Ordering::Relaxed);
    }

    pub fn record_job_failed(&self, duration: Duration) {
        self.jobs_failed.fetch_add(1, Ordering::Relaxed);
        self.total_job_time_ms
            .fetch_add(duration.as_millis() as u64, Ordering::Relaxed);
    }

    /// Get total uptime
    pub fn uptime(&self) -> Duration {
        self.start_time.elapsed()
    }

    /// Get average job wall time in milliseconds
    pub fn avg_job_time_ms(&self) -> f64 {
        let total = self.total_job_time_ms.load(Ordering::Relaxed);
        let count = self.jobs_completed.load(Ordering::Relaxed)
            + self.jobs_failed.load(Ordering::Relaxed);
        if count > 0 {
            total as f64 / count as f64
        } else {
            0.0
        }
    }

    /// Log metrics summary
    pub fn log_summary(&self) {
        let uptime = self.uptime();
        tracing::info!("=== Performance Metrics Summary ===");
        tracing::info!("Uptime: {:.2}s", uptime.as_secs_f64());
        tracing::info!(
            "Jobs: {} completed, {} failed (avg: {:.2}ms)",
            self.jobs_completed.load(Ordering::Relaxed),
            self.jobs_failed.load(Ordering::Relaxed),
            self.avg_job_time_ms()
        );
        tracing::info!(
            "State notifications: {}, log entries: {}",
            self.state_notifications.load(Ordering::Relaxed),
            self.log_entries.load(Ordering::Relaxed)
        );
        tracing::info!(
            "Log panel renders: {} full, {} incremental",
            self.full_renders.load(Ordering::Relaxed),
            self.incremental_renders.load(Ordering::Relaxed)
        );
    }
}

impl Default for Metrics {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;

    #[test]
    fn test_metrics_creation() {
        let metrics = Metrics::new();
        assert_eq!(metrics.jobs_completed.load(Ordering::Relaxed), 0);
        assert_eq!(metrics.state_notifications.load(Ordering::Relaxed), 0);
    }

    #[test]
    fn test_record_job_operations() {
        let metrics = Metrics::new();

        metrics.record_job_completed(Duration::from_millis(100));
        metrics.record_job_completed(Duration::from_millis(200));
        metrics.record_job_failed(Duration::from_millis(300));

        assert_eq!(metrics.jobs_completed.load(Ordering::Relaxed), 2);
        assert_eq!(metrics.jobs_failed.load(Ordering::Relaxed), 1);
        assert_eq!(metrics.total_job_time_ms.load(Ordering::Relaxed), 600);
        assert_eq!(metrics.avg_job_time_ms(), 200.0);
    }

    #[test]
    fn test_avg_job_time_no_jobs() {
        let metrics = Metrics::new();
        assert_eq!(metrics.avg_job_time_ms(), 0.0);
    }

    #[test]
    fn test_render_counters() {
        let metrics = Metrics::new();

        metrics.record_full_render();
        metrics.record_incremental_render();
        metrics.record_incremental_render();

        assert_eq!(metrics.full_renders.load(Ordering::Relaxed), 1);
        assert_eq!(metrics.incremental_renders.load(Ordering::Relaxed), 2);
    }

    #[test]
    fn test_uptime() {
        let metrics = Metrics::new();
        thread::sleep(Duration::from_millis(10));
        assert!(metrics.uptime().as_millis() >= 10);
    }
}
