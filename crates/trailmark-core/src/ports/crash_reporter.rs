//! Crash reporter port (driven/secondary port)
//!
//! The capability surface of a crash-reporting client: explicit captures
//! and the breadcrumb trail that accompanies them.
//!
//! ## Design Notes
//!
//! - Every capture returns an [`EventId`]; the no-op implementation returns
//!   [`EventId::empty`].
//! - Calls never block on network I/O; delivery is the client's business.
//! - Errors are [`DeliveryError`] so callers can count them without caring
//!   which vendor produced them.

use std::error::Error;
use std::time::Duration;

use crate::domain::{Breadcrumb, CrashEvent, DeliveryError, EventId, Severity};

/// Crash-reporting client
pub trait CrashReporter: Send + Sync {
    /// Captures an error (with its source chain) at the given level
    fn capture_error(
        &self,
        error: &(dyn Error + 'static),
        level: Severity,
    ) -> Result<EventId, DeliveryError>;

    /// Captures a plain message
    fn capture_message(&self, message: &str, level: Severity) -> Result<EventId, DeliveryError>;

    /// Captures a free-form event with tags and fingerprint
    fn capture_event(&self, event: CrashEvent) -> Result<EventId, DeliveryError>;

    /// Appends a breadcrumb to the trail
    fn add_breadcrumb(&self, breadcrumb: Breadcrumb) -> Result<(), DeliveryError>;

    /// Drops every breadcrumb collected so far
    fn restart_trail(&self);

    /// Blocks until queued events are sent or `timeout` elapses.
    ///
    /// Returns `true` when everything was delivered.
    fn flush(&self, timeout: Duration) -> bool;
}
