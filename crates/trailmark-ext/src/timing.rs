//! Scoped timing metrics
//!
//! A [`TimingGuard`] measures from creation until it is dropped or disposed
//! and records the elapsed milliseconds as a metric. Dropping on every exit
//! path (early return, `?`, panic unwinding) records exactly once.

use tokio::time::Instant;
use trailmark_core::ports::AnalyticsSink;

use crate::dispose::Dispose;

/// Records `name` with the elapsed milliseconds when released
#[must_use = "the timing is recorded when the guard is dropped"]
pub struct TimingGuard<'a, S: AnalyticsSink + ?Sized> {
    sink: &'a S,
    name: String,
    started: Instant,
}

impl<'a, S: AnalyticsSink + ?Sized> TimingGuard<'a, S> {
    pub fn new(sink: &'a S, name: impl Into<String>) -> Self {
        Self {
            sink,
            name: name.into(),
            started: Instant::now(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

impl<S: AnalyticsSink + ?Sized> Drop for TimingGuard<'_, S> {
    fn drop(&mut self) {
        let elapsed_ms = self.started.elapsed().as_millis() as f64;
        self.sink.record_metric(&self.name, elapsed_ms);
    }
}

impl<S: AnalyticsSink + ?Sized> Dispose for TimingGuard<'_, S> {
    fn dispose(self) {
        drop(self);
    }
}

/// Timing helpers available on every analytics sink
pub trait AnalyticsSinkExt: AnalyticsSink {
    /// Starts a timing scope recorded as metric `name`.
    fn record_timing(&self, name: impl Into<String>) -> TimingGuard<'_, Self> {
        TimingGuard::new(self, name)
    }
}

impl<S: AnalyticsSink + ?Sized> AnalyticsSinkExt for S {}
