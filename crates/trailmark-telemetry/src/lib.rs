//! Trailmark Telemetry - crash reporting and application telemetry adapters
//!
//! Provides:
//! - `Bootstrap`: two-phase registration of every component for the chosen mode
//! - `IdentityProvider`: stable anonymized per-installation user identifier
//! - `SentryCrashReporter` / `NoopCrashReporter`: crash-reporting clients
//! - `BreadcrumbLogSink` / `ConsoleLogSink`: log sink adapters, plus a `tracing` bridge layer
//! - `HttpTelemetryClient`: batched JSON envelope delivery
//! - `LiveAnalyticsSink` / `LoggerAnalyticsSink`: fail-open analytics sinks
//! - `system_info`: static and dynamic machine facts
//! - `DiagnosticsRegistry`: Prometheus counters for swallowed failures
//! - `Scrubber`: PII stripping for crash payloads

pub mod analytics;
pub mod bootstrap;
pub mod crash_reporter;
pub mod diagnostics;
pub mod envelope;
pub mod identity;
pub mod log_sink;
pub mod panic_hook;
pub mod scrubber;
pub mod store;
pub mod system_info;
pub mod telemetry_client;

pub use analytics::{LiveAnalyticsSink, LoggerAnalyticsSink};
pub use bootstrap::{Bootstrap, PendingServices, Services};
pub use crash_reporter::{register_crash_reporter, NoopCrashReporter, SentryCrashReporter};
pub use diagnostics::DiagnosticsRegistry;
pub use envelope::Envelope;
pub use identity::{AnonymousUserFactory, IdentityProvider, UserFactory};
pub use log_sink::{BreadcrumbLayer, BreadcrumbLogSink, ConsoleLogSink};
pub use panic_hook::install_panic_hook;
pub use scrubber::Scrubber;
pub use store::{open_store, JsonFileStore, KeyringStore, MemoryStore};
pub use telemetry_client::{HttpTelemetryClient, TelemetryWorker};
