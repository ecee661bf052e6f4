//! Integration tests for the batched HTTP telemetry client
//!
//! Verifies envelope delivery, batch-size triggered submission, and that
//! failed batches are dropped without retry.

use std::sync::Arc;
use std::time::Duration;

use trailmark_core::config::{ConfigBuilder, TelemetryConfig};
use trailmark_core::domain::{DeliveryError, SystemInfo, TelemetryContext};
use trailmark_core::ports::TelemetryClient;
use trailmark_telemetry::{DiagnosticsRegistry, HttpTelemetryClient};
use wiremock::MockServer;

use crate::common;

fn telemetry_config(server: &MockServer, max_batch_size: usize) -> TelemetryConfig {
    ConfigBuilder::new()
        .telemetry_endpoint(format!("{}{}", server.uri(), common::TRACK_PATH))
        .telemetry_max_batch_size(max_batch_size)
        .telemetry_flush_interval_secs(3600)
        .build()
        .telemetry
}

fn context() -> TelemetryContext {
    let mut info = SystemInfo::new();
    info.insert("Culture".to_string(), "eng".to_string());
    TelemetryContext::new_session("linux 6.1.0", info)
}

async fn wait_for_batches(server: &MockServer, expected: usize) -> bool {
    for _ in 0..100 {
        if common::received_batches(server).await >= expected {
            return true;
        }
        tokio::time::sleep(Duration::from_millis(20)).await;
    }
    false
}

#[tokio::test]
async fn test_flush_delivers_all_envelope_kinds() {
    let server = common::setup_ingestion_mock(200).await;
    let (client, _worker) = HttpTelemetryClient::spawn(
        &telemetry_config(&server, 64),
        common::TEST_IKEY,
        context(),
        None,
    )
    .unwrap();
    client.set_user_id("tester_0011223344556677");

    client.track_event("SaveClicked").unwrap();
    client.track_metric("LoadTimeMs", 42.0).unwrap();
    client.track_page_view("Settings").unwrap();
    client.flush().await.expect("flush succeeds");

    assert_eq!(common::received_batches(&server).await, 1);
    let envelopes = common::received_envelopes(&server).await;
    assert_eq!(envelopes.len(), 3);

    let base_types: Vec<&str> = envelopes
        .iter()
        .map(|e| e["data"]["baseType"].as_str().unwrap())
        .collect();
    assert_eq!(base_types, vec!["EventData", "MetricData", "PageViewData"]);

    let session_id = client.context().session_id;
    for envelope in &envelopes {
        assert_eq!(envelope["iKey"], common::TEST_IKEY);
        assert_eq!(envelope["tags"]["ai.session.id"], session_id.as_str());
        assert_eq!(envelope["tags"]["ai.user.id"], "tester_0011223344556677");
        assert_eq!(envelope["tags"]["ai.device.os"], "linux 6.1.0");
        assert_eq!(envelope["data"]["baseData"]["properties"]["Culture"], "eng");
    }

    let metric = &envelopes[1]["data"]["baseData"]["metrics"][0];
    assert_eq!(metric["name"], "LoadTimeMs");
    assert_eq!(metric["value"], 42.0);
}

#[tokio::test]
async fn test_full_batch_is_submitted_without_flush() {
    let server = common::setup_ingestion_mock(200).await;
    let (client, _worker) = HttpTelemetryClient::spawn(
        &telemetry_config(&server, 2),
        common::TEST_IKEY,
        context(),
        None,
    )
    .unwrap();

    client.track_event("one").unwrap();
    client.track_event("two").unwrap();

    assert!(wait_for_batches(&server, 1).await, "batch was not submitted");
    assert_eq!(common::received_envelopes(&server).await.len(), 2);
}

#[tokio::test]
async fn test_failed_batch_is_dropped_not_retried() {
    let server = common::setup_ingestion_mock(500).await;
    let diagnostics = Arc::new(DiagnosticsRegistry::new().unwrap());
    let (client, _worker) = HttpTelemetryClient::spawn(
        &telemetry_config(&server, 64),
        common::TEST_IKEY,
        context(),
        Some(diagnostics.clone()),
    )
    .unwrap();

    client.track_event("lost").unwrap();
    assert_eq!(client.flush().await, Err(DeliveryError::Server(500)));
    assert_eq!(diagnostics.delivery_failures("submit_batch"), 1);

    // Nothing left to resend
    assert_eq!(client.flush().await, Ok(()));
    assert_eq!(common::received_batches(&server).await, 1);
}

#[tokio::test]
async fn test_shutdown_submits_buffered_envelopes() {
    let server = common::setup_ingestion_mock(200).await;
    let (client, worker) = HttpTelemetryClient::spawn(
        &telemetry_config(&server, 64),
        common::TEST_IKEY,
        context(),
        None,
    )
    .unwrap();

    client.track_page_view("About").unwrap();
    client.shutdown().await;
    worker.await.unwrap();

    let envelopes = common::received_envelopes(&server).await;
    assert_eq!(envelopes.len(), 1);
    assert_eq!(envelopes[0]["data"]["baseData"]["name"], "About");
    assert_eq!(client.track_event("late"), Err(DeliveryError::WorkerStopped));
}

#[tokio::test]
async fn test_unreachable_endpoint_reports_network_error() {
    let config = TelemetryConfig {
        endpoint: "http://127.0.0.1:9/v2/track".to_string(),
        ..TelemetryConfig::default()
    };
    let (client, _worker) =
        HttpTelemetryClient::spawn(&config, common::TEST_IKEY, context(), None).unwrap();

    client.track_event("nowhere").unwrap();
    assert!(matches!(client.flush().await, Err(DeliveryError::Network(_))));
}
