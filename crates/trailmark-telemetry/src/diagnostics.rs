//! Internal diagnostics counters
//!
//! Counts events accepted by the analytics sinks and delivery failures that
//! were swallowed on the way to a vendor backend.

use prometheus::{Encoder, IntCounterVec, Opts, Registry, TextEncoder};

/// Prometheus registry holding the facade's own counters.
pub struct DiagnosticsRegistry {
    registry: Registry,
    /// Counter: analytics events recorded by kind (interaction, metric, pageview)
    pub events_recorded_total: IntCounterVec,
    /// Counter: swallowed delivery failures by operation
    pub delivery_failures_total: IntCounterVec,
}

impl DiagnosticsRegistry {
    /// Creates a new `DiagnosticsRegistry` with all counters registered.
    pub fn new() -> anyhow::Result<Self> {
        let registry = Registry::new_custom(Some("trailmark".to_string()), None)?;

        let events_recorded_total = IntCounterVec::new(
            Opts::new("events_recorded_total", "Analytics events recorded by kind"),
            &["kind"],
        )?;
        registry.register(Box::new(events_recorded_total.clone()))?;

        let delivery_failures_total = IntCounterVec::new(
            Opts::new(
                "delivery_failures_total",
                "Delivery failures swallowed by the facade",
            ),
            &["operation"],
        )?;
        registry.register(Box::new(delivery_failures_total.clone()))?;

        Ok(Self {
            registry,
            events_recorded_total,
            delivery_failures_total,
        })
    }

    // ========================================================================
    // Recording helpers
    // ========================================================================

    pub fn record_event(&self, kind: &str) {
        self.events_recorded_total.with_label_values(&[kind]).inc();
    }

    pub fn record_delivery_failure(&self, operation: &str) {
        self.delivery_failures_total
            .with_label_values(&[operation])
            .inc();
    }

    /// Current failure count for `operation`.
    pub fn delivery_failures(&self, operation: &str) -> u64 {
        self.delivery_failures_total
            .with_label_values(&[operation])
            .get()
    }

    pub fn events_recorded(&self, kind: &str) -> u64 {
        self.events_recorded_total.with_label_values(&[kind]).get()
    }

    // ========================================================================
    // Encoding
    // ========================================================================

    /// Encode all counters in Prometheus text exposition format.
    pub fn encode(&self) -> anyhow::Result<String> {
        let encoder = TextEncoder::new();
        let metric_families = self.registry.gather();
        let mut buffer = Vec::new();
        encoder.encode(&metric_families, &mut buffer)?;
        Ok(String::from_utf8(buffer)?)
    }
}
