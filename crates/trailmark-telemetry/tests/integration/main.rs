//! Integration tests for trailmark-telemetry
//!
//! Uses wiremock to simulate the telemetry ingestion endpoint and the Sentry
//! test transport to capture crash events, and verifies end-to-end behavior
//! of the telemetry client and the two-phase bootstrap.

mod common;

mod test_bootstrap;
mod test_telemetry_client;
