//! Integration tests for the two-phase bootstrap
//!
//! Verifies that one credential decision drives every component, that the
//! installation identity is stable across process instances, and the
//! production and debug analytics scenarios end to end.

use std::io::Write;
use std::sync::{Arc, Mutex};

use sentry::test::TestTransport;
use trailmark_core::domain::{IdentityError, OperatingMode, Severity};
use trailmark_telemetry::{Bootstrap, JsonFileStore, MemoryStore};

use crate::common;

#[tokio::test]
async fn test_production_mode_selects_live_variants() {
    let server = common::setup_ingestion_mock(200).await;
    let transport = TestTransport::new();

    let pending = Bootstrap::new(common::production_config(&server).build())
        .with_user_factory(common::FixedUser)
        .with_crash_transport(Arc::new(transport.clone()))
        .register(|_| {})
        .unwrap();
    assert_eq!(pending.mode(), OperatingMode::Production);

    let services = pending
        .attach_identity_store(Arc::new(MemoryStore::new()))
        .unwrap();
    let user = services.identity().cached().expect("resolved at attach");
    assert!(user.as_str().starts_with("tester_"));

    let id = services
        .crash_reporter()
        .capture_message("live", Severity::Error)
        .unwrap();
    assert!(!id.is_empty());

    services.analytics().record_metric("LoadTimeMs", 42.0);
    assert!(services.shutdown().await);

    let envelopes = common::received_envelopes(&server).await;
    assert_eq!(envelopes.len(), 1);
    assert_eq!(envelopes[0]["data"]["baseType"], "MetricData");
    assert_eq!(envelopes[0]["tags"]["ai.user.id"], user.as_str());

    let events = transport.fetch_and_clear_events();
    assert_eq!(events.len(), 1);
    let event_user = events[0].user.as_ref().expect("user attached");
    assert_eq!(event_user.id.as_deref(), Some(user.as_str()));
}

#[tokio::test]
async fn test_debug_mode_selects_local_variants() {
    let server = common::setup_ingestion_mock(200).await;

    let pending = Bootstrap::new(common::debug_config(&server))
        .with_user_factory(common::FixedUser)
        .register(|_| {})
        .unwrap();
    assert_eq!(pending.mode(), OperatingMode::Debug);
    let services = pending
        .attach_identity_store(Arc::new(MemoryStore::new()))
        .unwrap();

    let analytics = services.analytics();
    analytics.record_user_interaction("Click", "Pressed OK");
    analytics.record_metric("LoadTimeMs", 42.0);
    analytics.record_pageview("Settings");

    let id = services
        .crash_reporter()
        .capture_message("debug", Severity::Fatal)
        .unwrap();
    assert!(id.is_empty());
    assert!(services.shutdown().await);

    assert_eq!(common::received_batches(&server).await, 0);
}

#[tokio::test]
async fn test_production_metric_adds_no_breadcrumb() {
    let server = common::setup_ingestion_mock(200).await;
    let transport = TestTransport::new();

    let services = Bootstrap::new(common::production_config(&server).build())
        .with_user_factory(common::FixedUser)
        .with_crash_transport(Arc::new(transport.clone()))
        .register(|_| {})
        .unwrap()
        .attach_identity_store(Arc::new(MemoryStore::new()))
        .unwrap();
    let reporter = services.crash_reporter();
    let analytics = services.analytics();

    analytics.record_metric("LoadTimeMs", 42.0);
    reporter.capture_message("after metric", Severity::Error).unwrap();

    analytics.record_pageview("Settings");
    reporter.capture_message("after pageview", Severity::Error).unwrap();

    let events = transport.fetch_and_clear_events();
    assert_eq!(events.len(), 2);
    assert!(events[0].breadcrumbs.values.is_empty());
    let crumbs = &events[1].breadcrumbs.values;
    assert_eq!(crumbs.len(), 1);
    assert_eq!(crumbs[0].category.as_deref(), Some("interaction"));
    assert_eq!(crumbs[0].message.as_deref(), Some("Opened page Settings"));

    assert!(services.shutdown().await);
    let metrics: Vec<_> = common::received_envelopes(&server)
        .await
        .into_iter()
        .filter(|e| e["data"]["baseType"] == "MetricData")
        .collect();
    assert_eq!(metrics.len(), 1);
    assert_eq!(metrics[0]["data"]["baseData"]["metrics"][0]["name"], "LoadTimeMs");
    assert_eq!(metrics[0]["data"]["baseData"]["metrics"][0]["value"], 42.0);
}

#[tokio::test]
async fn test_identity_is_stable_across_process_instances() {
    let server = common::setup_ingestion_mock(200).await;
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("identity.json");

    let mut seen = Vec::new();
    for _ in 0..2 {
        let services = Bootstrap::new(common::production_config(&server).build())
            .with_user_factory(common::FixedUser)
            .with_crash_transport(Arc::new(TestTransport::new()))
            .register(|_| {})
            .unwrap()
            .attach_identity_store(Arc::new(JsonFileStore::new(path.clone())))
            .unwrap();

        let client = services.telemetry_client().expect("live client");
        seen.push(client.context().user_id.expect("user id set"));
        assert!(services.shutdown().await);
    }

    assert_eq!(seen[0], seen[1]);
}

#[tokio::test]
async fn test_unavailable_store_fails_startup_in_production() {
    let server = common::setup_ingestion_mock(200).await;

    let pending = Bootstrap::new(common::production_config(&server).build())
        .with_user_factory(common::FixedUser)
        .with_crash_transport(Arc::new(TestTransport::new()))
        .register(|_| {})
        .unwrap();

    let result = pending.attach_identity_store(Arc::new(common::BrokenStore));
    match result {
        Err(IdentityError::StoreUnavailable(message)) => assert!(message.contains("keyring locked")),
        Err(other) => panic!("unexpected error: {other}"),
        Ok(_) => panic!("startup should fail"),
    }
}

#[tokio::test]
async fn test_half_configured_credentials_are_rejected() {
    let server = common::setup_ingestion_mock(200).await;
    let mut config = common::production_config(&server).build();
    config.telemetry.instrumentation_key = None;

    let err = Bootstrap::new(config).register(|_| {}).err().expect("rejected");
    assert!(err.to_string().contains("instrumentation_key"));
}

/// Collects everything written by the fmt subscriber.
#[derive(Clone, Default)]
struct Captured(Arc<Mutex<Vec<u8>>>);

impl Write for Captured {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}

#[test]
fn test_debug_pageview_is_logged_locally() {
    let captured = Captured::default();
    let writer = captured.clone();
    let subscriber = tracing_subscriber::fmt()
        .with_writer(move || writer.clone())
        .with_ansi(false)
        .finish();

    tracing::subscriber::with_default(subscriber, || {
        let services = Bootstrap::new(trailmark_core::config::Config::default())
            .with_user_factory(common::FixedUser)
            .register(|_| {})
            .unwrap()
            .attach_identity_store(Arc::new(MemoryStore::new()))
            .unwrap();
        services.analytics().record_pageview("Settings");
    });

    let output = String::from_utf8(captured.0.lock().unwrap().clone()).unwrap();
    assert!(
        output.contains("User Interaction: Visited page Settings"),
        "log output was: {output}"
    );
}
