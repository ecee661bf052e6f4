//! Analytics sinks
//!
//! - [`LiveAnalyticsSink`]: forwards to the crash-reporting trail and the telemetry client
//! - [`LoggerAnalyticsSink`]: writes one informational log line per call
//!
//! Neither sink ever lets a failure reach the caller. The live sink routes
//! each call through a `try_*` method returning `Result`, catches panics from
//! the downstream clients, and counts what it swallowed.

use std::panic::{self, AssertUnwindSafe};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use tracing::debug;
use trailmark_core::domain::{
    AnalyticsEvent, Breadcrumb, BreadcrumbLevel, DeliveryError, Severity, CATEGORY_INTERACTION,
};
use trailmark_core::ports::{AnalyticsSink, CrashReporter, LogSink, TelemetryClient};

use crate::diagnostics::DiagnosticsRegistry;
use crate::panic_hook::fail_open;

// ============================================================================
// LiveAnalyticsSink
// ============================================================================

/// Production analytics sink
pub struct LiveAnalyticsSink {
    reporter: Arc<dyn CrashReporter>,
    telemetry: Arc<dyn TelemetryClient>,
    diagnostics: Option<Arc<DiagnosticsRegistry>>,
    failures: AtomicU64,
}

impl LiveAnalyticsSink {
    pub fn new(reporter: Arc<dyn CrashReporter>, telemetry: Arc<dyn TelemetryClient>) -> Self {
        Self {
            reporter,
            telemetry,
            diagnostics: None,
            failures: AtomicU64::new(0),
        }
    }

    pub fn with_diagnostics(mut self, diagnostics: Arc<DiagnosticsRegistry>) -> Self {
        self.diagnostics = Some(diagnostics);
        self
    }

    /// Number of calls whose delivery failed and was swallowed.
    pub fn failure_count(&self) -> u64 {
        self.failures.load(Ordering::Relaxed)
    }

    /// Records an event, returning the first delivery error encountered.
    pub fn try_record(&self, event: &AnalyticsEvent) -> Result<(), DeliveryError> {
        match event {
            AnalyticsEvent::Interaction { name, message } => {
                self.reporter.add_breadcrumb(Breadcrumb::new(
                    CATEGORY_INTERACTION,
                    message.as_str(),
                    BreadcrumbLevel::Info,
                ))?;
                self.telemetry.track_event(name)
            }
            // JSON has no NaN or infinity; one such value would sink the whole batch.
            AnalyticsEvent::Metric { name, value } if !value.is_finite() => Err(
                DeliveryError::Rejected(format!("metric {name} has non-finite value {value}")),
            ),
            AnalyticsEvent::Metric { name, value } => self.telemetry.track_metric(name, *value),
            AnalyticsEvent::Pageview { name } => {
                self.reporter.add_breadcrumb(Breadcrumb::new(
                    CATEGORY_INTERACTION,
                    format!("Opened page {name}"),
                    BreadcrumbLevel::Info,
                ))?;
                self.telemetry.track_page_view(name)
            }
        }
    }

    fn record(&self, event: AnalyticsEvent) {
        if let Some(diagnostics) = &self.diagnostics {
            diagnostics.record_event(event.kind());
        }

        let outcome = fail_open(|| {
            panic::catch_unwind(AssertUnwindSafe(|| self.try_record(&event)))
        })
        .unwrap_or_else(|payload| Err(DeliveryError::Panicked(panic_message(payload.as_ref()))));

        if let Err(e) = outcome {
            self.failures.fetch_add(1, Ordering::Relaxed);
            if let Some(diagnostics) = &self.diagnostics {
                diagnostics.record_delivery_failure(event.kind());
            }
            debug!(kind = event.kind(), error = %e, "Analytics delivery failed");
        }
    }
}

pub(crate) fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "Unknown panic".to_string()
    }
}

impl AnalyticsSink for LiveAnalyticsSink {
    fn record_user_interaction(&self, name: &str, message: &str) {
        self.record(AnalyticsEvent::Interaction {
            name: name.to_string(),
            message: message.to_string(),
        });
    }

    fn record_metric(&self, name: &str, value: f64) {
        self.record(AnalyticsEvent::Metric {
            name: name.to_string(),
            value,
        });
    }

    fn record_pageview(&self, name: &str) {
        self.record(AnalyticsEvent::Pageview {
            name: name.to_string(),
        });
    }
}

// ============================================================================
// LoggerAnalyticsSink
// ============================================================================

/// Local analytics sink; no network I/O
pub struct LoggerAnalyticsSink {
    log: Arc<dyn LogSink>,
    diagnostics: Option<Arc<DiagnosticsRegistry>>,
}

impl LoggerAnalyticsSink {
    pub fn new(log: Arc<dyn LogSink>) -> Self {
        Self {
            log,
            diagnostics: None,
        }
    }

    pub fn with_diagnostics(mut self, diagnostics: Arc<DiagnosticsRegistry>) -> Self {
        self.diagnostics = Some(diagnostics);
        self
    }

    fn count(&self, kind: &str) {
        if let Some(diagnostics) = &self.diagnostics {
            diagnostics.record_event(kind);
        }
    }

    fn write_interaction(&self, message: &str) {
        self.log
            .write(&format!("User Interaction: {message}"), Severity::Info);
    }
}

impl AnalyticsSink for LoggerAnalyticsSink {
    fn record_user_interaction(&self, _name: &str, message: &str) {
        self.count("interaction");
        self.write_interaction(message);
    }

    fn record_metric(&self, name: &str, value: f64) {
        self.count("metric");
        self.log
            .write(&format!("Recorded metric {name} = {value}"), Severity::Info);
    }

    // Logged as a "Pageview" interaction.
    fn record_pageview(&self, name: &str) {
        self.count("pageview");
        self.write_interaction(&format!("Visited page {name}"));
    }
}
