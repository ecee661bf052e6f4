//! Shared helpers for integration tests
//!
//! Provides a wiremock ingestion endpoint, production configurations
//! pointing at it, and a deterministic user factory.

use std::collections::HashMap;

use serde_json::Value;
use trailmark_core::config::{Config, ConfigBuilder, StoreKind};
use trailmark_core::ports::SecureStore;
use trailmark_telemetry::UserFactory;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

pub const TEST_DSN: &str = "https://public@sentry.invalid/1";
pub const TEST_IKEY: &str = "11111111-2222-3333-4444-555555555555";
pub const TRACK_PATH: &str = "/v2/track";

/// Base user factory with a fixed name
pub struct FixedUser;

impl UserFactory for FixedUser {
    fn base_user_name(&self) -> String {
        "tester".to_string()
    }
}

/// Secure store that is never reachable
pub struct BrokenStore;

impl SecureStore for BrokenStore {
    fn get_object(&self, _key: &str) -> anyhow::Result<Option<HashMap<String, String>>> {
        Err(anyhow::anyhow!("keyring locked"))
    }

    fn insert_object(&self, _key: &str, _value: &HashMap<String, String>) -> anyhow::Result<()> {
        Err(anyhow::anyhow!("keyring locked"))
    }

    fn invalidate(&self, _key: &str) -> anyhow::Result<()> {
        Ok(())
    }
}

/// Starts a mock ingestion endpoint answering every batch with `status`.
pub async fn setup_ingestion_mock(status: u16) -> MockServer {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(TRACK_PATH))
        .respond_with(ResponseTemplate::new(status).set_body_json(serde_json::json!({
            "itemsReceived": 0,
            "itemsAccepted": 0,
            "errors": []
        })))
        .mount(&server)
        .await;

    server
}

/// Production configuration delivering to `server`.
pub fn production_config(server: &MockServer) -> ConfigBuilder {
    ConfigBuilder::new()
        .crash_dsn(TEST_DSN)
        .crash_release("1.0.0-test")
        .telemetry_instrumentation_key(TEST_IKEY)
        .telemetry_endpoint(format!("{}{TRACK_PATH}", server.uri()))
        .telemetry_flush_interval_secs(3600)
        .telemetry_shutdown_grace_ms(5000)
        .identity_store(StoreKind::Memory)
        .scrub_paths(false)
        .scrub_usernames(false)
}

/// Debug configuration; the endpoint still points at `server` so tests can
/// assert that nothing is sent.
pub fn debug_config(server: &MockServer) -> Config {
    ConfigBuilder::new()
        .telemetry_endpoint(format!("{}{TRACK_PATH}", server.uri()))
        .identity_store(StoreKind::Memory)
        .build()
}

/// All envelopes received by `server`, in arrival order.
pub async fn received_envelopes(server: &MockServer) -> Vec<Value> {
    let requests = server.received_requests().await.unwrap_or_default();
    requests
        .iter()
        .flat_map(|request| {
            let batch: Vec<Value> =
                serde_json::from_slice(&request.body).expect("batch is a JSON array");
            batch
        })
        .collect()
}

/// Number of batches received by `server`.
pub async fn received_batches(server: &MockServer) -> usize {
    server.received_requests().await.unwrap_or_default().len()
}
