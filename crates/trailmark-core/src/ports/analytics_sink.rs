//! Analytics sink port (driving port used by application code)
//!
//! The three operations application code calls to record user behaviour.
//! Implementations must never panic or return errors to the caller:
//! telemetry must never take the host application down.

/// Records user interactions, numeric metrics and page views
pub trait AnalyticsSink: Send + Sync {
    fn record_user_interaction(&self, name: &str, message: &str);

    fn record_metric(&self, name: &str, value: f64);

    fn record_pageview(&self, name: &str);
}
