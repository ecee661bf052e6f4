//! HTTP telemetry client
//!
//! [`HttpTelemetryClient`] is the caller-facing half: it stamps each call
//! with the session context and hands the envelope to a bounded channel
//! with `try_send`, so callers never wait on the network.
//!
//! [`TelemetryWorker`] is the background half: it buffers envelopes and
//! POSTs them as a JSON array when the batch fills up, on a fixed interval,
//! on an explicit flush, and at shutdown. Failed submissions are logged and
//! dropped; there is no retry.

use std::sync::{Arc, RwLock};
use std::time::Duration;

use anyhow::Context as _;
use async_trait::async_trait;
use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;
use tracing::{debug, trace, warn};
use trailmark_core::config::TelemetryConfig;
use trailmark_core::domain::{DeliveryError, TelemetryContext};
use trailmark_core::ports::TelemetryClient;

use crate::diagnostics::DiagnosticsRegistry;
use crate::envelope::Envelope;

/// HTTP request timeout
const HTTP_TIMEOUT: Duration = Duration::from_secs(10);

/// Commands sent to the worker task.
enum WorkerCommand {
    Track(Box<Envelope>),
    Flush(oneshot::Sender<Result<(), DeliveryError>>),
    Shutdown,
}

// ============================================================================
// HttpTelemetryClient
// ============================================================================

/// Caller-facing telemetry client
///
/// Cheap to share behind an `Arc`; every method is non-blocking except
/// [`TelemetryClient::flush`], which waits for the worker's submission.
pub struct HttpTelemetryClient {
    tx: mpsc::Sender<WorkerCommand>,
    ikey: String,
    context: RwLock<TelemetryContext>,
}

impl HttpTelemetryClient {
    /// Create a client and the worker that must be spawned to drive it.
    pub fn new(
        config: &TelemetryConfig,
        instrumentation_key: impl Into<String>,
        context: TelemetryContext,
    ) -> anyhow::Result<(Self, TelemetryWorker)> {
        let (tx, rx) = mpsc::channel(config.channel_capacity);

        let http = reqwest::Client::builder()
            .timeout(HTTP_TIMEOUT)
            .build()
            .context("Failed to build telemetry HTTP client")?;

        let worker = TelemetryWorker {
            rx,
            http,
            endpoint: config.endpoint.clone(),
            max_batch_size: config.max_batch_size,
            flush_interval: config.flush_interval(),
            buffer: Vec::with_capacity(config.max_batch_size),
            diagnostics: None,
        };

        let client = Self {
            tx,
            ikey: instrumentation_key.into(),
            context: RwLock::new(context),
        };

        Ok((client, worker))
    }

    /// Create a client and spawn its worker on the current runtime.
    pub fn spawn(
        config: &TelemetryConfig,
        instrumentation_key: impl Into<String>,
        context: TelemetryContext,
        diagnostics: Option<Arc<DiagnosticsRegistry>>,
    ) -> anyhow::Result<(Self, JoinHandle<()>)> {
        let (client, worker) = Self::new(config, instrumentation_key, context)?;
        let worker = match diagnostics {
            Some(diagnostics) => worker.with_diagnostics(diagnostics),
            None => worker,
        };
        let handle = tokio::spawn(worker.run());
        Ok((client, handle))
    }

    /// Snapshot of the session context.
    pub fn context(&self) -> TelemetryContext {
        self.read_context().clone()
    }

    /// Ask the worker to submit what it holds and stop.
    pub async fn shutdown(&self) {
        if self.tx.send(WorkerCommand::Shutdown).await.is_err() {
            debug!("Telemetry worker already stopped");
        }
    }

    fn enqueue(&self, envelope: Envelope) -> Result<(), DeliveryError> {
        self.tx
            .try_send(WorkerCommand::Track(Box::new(envelope)))
            .map_err(|e| match e {
                mpsc::error::TrySendError::Full(_) => DeliveryError::ChannelFull,
                mpsc::error::TrySendError::Closed(_) => DeliveryError::WorkerStopped,
            })
    }

    fn read_context(&self) -> std::sync::RwLockReadGuard<'_, TelemetryContext> {
        self.context
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

#[async_trait]
impl TelemetryClient for HttpTelemetryClient {
    fn track_event(&self, name: &str) -> Result<(), DeliveryError> {
        let envelope = Envelope::event(&self.read_context(), &self.ikey, name);
        self.enqueue(envelope)
    }

    fn track_metric(&self, name: &str, value: f64) -> Result<(), DeliveryError> {
        let envelope = Envelope::metric(&self.read_context(), &self.ikey, name, value);
        self.enqueue(envelope)
    }

    fn track_page_view(&self, name: &str) -> Result<(), DeliveryError> {
        let envelope = Envelope::page_view(&self.read_context(), &self.ikey, name);
        self.enqueue(envelope)
    }

    fn set_user_id(&self, user_id: &str) {
        let mut context = self
            .context
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        context.user_id = Some(user_id.to_string());
    }

    async fn flush(&self) -> Result<(), DeliveryError> {
        let (ack_tx, ack_rx) = oneshot::channel();
        self.tx
            .send(WorkerCommand::Flush(ack_tx))
            .await
            .map_err(|_| DeliveryError::WorkerStopped)?;
        ack_rx.await.map_err(|_| DeliveryError::WorkerStopped)?
    }
}

// ============================================================================
// TelemetryWorker
// ============================================================================

/// Background task submitting envelope batches
pub struct TelemetryWorker {
    rx: mpsc::Receiver<WorkerCommand>,
    http: reqwest::Client,
    endpoint: String,
    max_batch_size: usize,
    flush_interval: Duration,
    buffer: Vec<Envelope>,
    diagnostics: Option<Arc<DiagnosticsRegistry>>,
}

impl TelemetryWorker {
    /// Count failed submissions in `diagnostics`.
    pub fn with_diagnostics(mut self, diagnostics: Arc<DiagnosticsRegistry>) -> Self {
        self.diagnostics = Some(diagnostics);
        self
    }

    /// Run the worker loop until shutdown or until every client is dropped.
    pub async fn run(mut self) {
        debug!(
            endpoint = %self.endpoint,
            max_batch_size = self.max_batch_size,
            interval_secs = self.flush_interval.as_secs(),
            "Telemetry worker started"
        );

        let mut interval = tokio::time::interval(self.flush_interval);
        interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);
        // The first tick completes immediately
        interval.tick().await;

        loop {
            tokio::select! {
                _ = interval.tick() => {
                    let _ = self.submit().await;
                }
                cmd = self.rx.recv() => {
                    match cmd {
                        Some(WorkerCommand::Track(envelope)) => {
                            self.buffer.push(*envelope);
                            trace!(buffered = self.buffer.len(), "Telemetry envelope queued");
                            if self.buffer.len() >= self.max_batch_size {
                                let _ = self.submit().await;
                            }
                        }
                        Some(WorkerCommand::Flush(ack)) => {
                            let result = self.submit().await;
                            let _ = ack.send(result);
                        }
                        Some(WorkerCommand::Shutdown) | None => {
                            debug!("Telemetry worker shutting down");
                            let _ = self.submit().await;
                            break;
                        }
                    }
                }
            }
        }
    }

    /// POST the buffered envelopes. The buffer is emptied whatever the outcome.
    async fn submit(&mut self) -> Result<(), DeliveryError> {
        if self.buffer.is_empty() {
            return Ok(());
        }
        let batch = std::mem::take(&mut self.buffer);
        let count = batch.len();

        let result = self.post(&batch).await;
        match &result {
            Ok(()) => debug!(count, "Telemetry batch submitted"),
            Err(e) => {
                warn!(count, error = %e, "Failed to submit telemetry batch, dropping it");
                if let Some(diagnostics) = &self.diagnostics {
                    diagnostics.record_delivery_failure("submit_batch");
                }
            }
        }
        result
    }

    async fn post(&self, batch: &[Envelope]) -> Result<(), DeliveryError> {
        let body =
            serde_json::to_vec(batch).map_err(|e| DeliveryError::Serialization(e.to_string()))?;

        let response = self
            .http
            .post(&self.endpoint)
            .header(reqwest::header::CONTENT_TYPE, "application/json")
            .body(body)
            .send()
            .await
            .map_err(|e| DeliveryError::Network(e.to_string()))?;

        let status = response.status();
        if status.is_success() {
            Ok(())
        } else {
            Err(DeliveryError::Server(status.as_u16()))
        }
    }
}
