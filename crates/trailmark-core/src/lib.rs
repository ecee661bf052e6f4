//! Trailmark Core - Domain types and port definitions
//!
//! This crate contains the adapter-independent pieces of the telemetry facade:
//! - **Domain types** - `OperatingMode`, `Severity`, `Breadcrumb`, `AnalyticsEvent`,
//!   `UserIdentifier`, `SlugInfo`, `SystemInfo`, `TelemetryContext`
//! - **Port definitions** - Traits for adapters: `CrashReporter`, `TelemetryClient`,
//!   `SecureStore`, `LogSink`, `AnalyticsSink`
//! - **Configuration** - YAML-backed `Config` with validation and a builder
//!
//! # Architecture
//!
//! Ports define the trait interfaces that the vendor adapters in
//! `trailmark-telemetry` implement. Nothing in this crate performs I/O
//! except configuration loading.

pub mod config;
pub mod domain;
pub mod ports;
