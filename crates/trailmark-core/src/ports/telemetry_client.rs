//! Telemetry client port (driven/secondary port)
//!
//! Fire-and-forget tracking calls towards the application-telemetry
//! backend, plus the flush used at shutdown.
//!
//! ## Design Notes
//!
//! - Tracking calls are synchronous and non-blocking; they only enqueue.
//! - `flush` is async because it waits for the batch to be submitted.

use async_trait::async_trait;

use crate::domain::DeliveryError;

/// Application-telemetry client
#[async_trait]
pub trait TelemetryClient: Send + Sync {
    /// Tracks a named custom event
    fn track_event(&self, name: &str) -> Result<(), DeliveryError>;

    /// Tracks a single numeric metric sample
    fn track_metric(&self, name: &str, value: f64) -> Result<(), DeliveryError>;

    /// Tracks a page view
    fn track_page_view(&self, name: &str) -> Result<(), DeliveryError>;

    /// Sets the user id attached to subsequent envelopes
    fn set_user_id(&self, user_id: &str);

    /// Submits every buffered envelope
    async fn flush(&self) -> Result<(), DeliveryError>;
}
