//! Port definitions (adapter interfaces)
//!
//! This module defines the traits that separate the facade from the vendor
//! SDKs and storage backends. Implementations live in `trailmark-telemetry`
//! (and in test doubles).
//!
//! ## Ports Overview
//!
//! - [`CrashReporter`] - Crash-reporting client (captures and breadcrumb trail)
//! - [`TelemetryClient`] - Application-telemetry client (events, metrics, page views)
//! - [`SecureStore`] - Durable secure key-value store for the identity record
//! - [`LogSink`] - Severity-filtered log writes
//! - [`AnalyticsSink`] - The three application-facing analytics operations

pub mod analytics_sink;
pub mod crash_reporter;
pub mod log_sink;
pub mod secure_store;
pub mod telemetry_client;

pub use analytics_sink::AnalyticsSink;
pub use crash_reporter::CrashReporter;
pub use log_sink::{LogRecord, LogSink};
pub use secure_store::SecureStore;
pub use telemetry_client::TelemetryClient;
