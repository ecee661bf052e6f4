//! Two-phase service registration
//!
//! 1. [`Bootstrap::register`] decides the operating mode from the crash
//!    reporting DSN, builds the crash reporter, log sink, telemetry client
//!    and analytics sink, and collects static system information. The
//!    returned [`PendingServices`] only exposes the log sink.
//! 2. [`PendingServices::attach_identity_store`] attaches the durable store
//!    and yields the ready [`Services`]. Nothing can capture or track before
//!    this step.
//!
//! Every component is built exactly once from the same mode decision and is
//! handed out explicitly; there is no process-global registry.

use std::sync::Arc;
use std::time::Duration;

use anyhow::{bail, Context};
use sentry::TransportFactory;
use tokio::task::JoinHandle;
use tokio::time::{timeout, Instant};
use tracing::{debug, info, warn};
use trailmark_core::config::Config;
use trailmark_core::domain::{IdentityError, OperatingMode, Severity, SystemInfo, TelemetryContext};
use trailmark_core::ports::{AnalyticsSink, CrashReporter, LogSink, SecureStore, TelemetryClient};

use crate::analytics::{LiveAnalyticsSink, LoggerAnalyticsSink};
use crate::crash_reporter::register_crash_reporter;
use crate::diagnostics::DiagnosticsRegistry;
use crate::identity::{AnonymousUserFactory, IdentityProvider, UserFactory};
use crate::log_sink::{BreadcrumbLogSink, ConsoleLogSink};
use crate::panic_hook::install_panic_hook;
use crate::system_info::{collect_dynamic, collect_static, device_os};
use crate::telemetry_client::HttpTelemetryClient;

// ============================================================================
// Bootstrap
// ============================================================================

/// Startup inputs, before any component exists
pub struct Bootstrap {
    config: Config,
    version: String,
    users: Box<dyn UserFactory>,
    crash_transport: Option<Arc<dyn TransportFactory>>,
}

impl Bootstrap {
    pub fn new(config: Config) -> Self {
        let version = config.crash_reporting.release_or_default();
        Self {
            config,
            version,
            users: Box::new(AnonymousUserFactory::from_env()),
            crash_transport: None,
        }
    }

    /// Application version reported as `AssemblyVersion`.
    pub fn with_version(mut self, version: impl Into<String>) -> Self {
        self.version = version.into();
        self
    }

    /// Replaces the anonymized user factory.
    pub fn with_user_factory(mut self, users: impl UserFactory + 'static) -> Self {
        self.users = Box::new(users);
        self
    }

    /// Replaces the crash reporter's HTTP transport.
    pub fn with_crash_transport(mut self, transport: Arc<dyn TransportFactory>) -> Self {
        self.crash_transport = Some(transport);
        self
    }

    /// Builds every component for the mode implied by the configuration.
    ///
    /// `platform` adds OS facts to the static system information. In
    /// production mode the telemetry worker is spawned, so this must run
    /// inside a Tokio runtime.
    pub fn register(self, platform: impl FnOnce(&mut SystemInfo)) -> anyhow::Result<PendingServices> {
        let errors = self.config.validate();
        if !errors.is_empty() {
            let details: Vec<String> = errors.iter().map(ToString::to_string).collect();
            bail!("invalid configuration: {}", details.join("; "));
        }

        let mode = self.config.mode();
        let threshold = self.config.logging.severity()?;
        let diagnostics = Arc::new(DiagnosticsRegistry::new()?);
        let identity = Arc::new(IdentityProvider::new(self.users));
        let system_info = collect_static(&self.version, platform);

        let reporter =
            register_crash_reporter(mode, &self.config, identity.clone(), self.crash_transport)?;
        let components = match mode {
            OperatingMode::Debug => Components::debug(reporter, threshold, &diagnostics),
            OperatingMode::Production => Components::production(
                reporter,
                &self.config,
                threshold,
                &system_info,
                &diagnostics,
            )?,
        };

        info!(mode = %mode, threshold = %threshold, "Telemetry services registered");

        Ok(PendingServices {
            mode,
            identity,
            components,
            diagnostics,
            system_info,
            grace: self.config.telemetry.shutdown_grace(),
        })
    }
}

/// Components picked by the mode decision
struct Components {
    reporter: Arc<dyn CrashReporter>,
    log_sink: Arc<dyn LogSink>,
    analytics: Arc<dyn AnalyticsSink>,
    telemetry: Option<Arc<HttpTelemetryClient>>,
    worker: Option<JoinHandle<()>>,
}

impl Components {
    fn debug(
        reporter: Arc<dyn CrashReporter>,
        threshold: Severity,
        diagnostics: &Arc<DiagnosticsRegistry>,
    ) -> Self {
        let log_sink: Arc<dyn LogSink> = Arc::new(ConsoleLogSink::new(threshold));
        let analytics =
            LoggerAnalyticsSink::new(log_sink.clone()).with_diagnostics(diagnostics.clone());

        Self {
            reporter,
            log_sink,
            analytics: Arc::new(analytics),
            telemetry: None,
            worker: None,
        }
    }

    fn production(
        reporter: Arc<dyn CrashReporter>,
        config: &Config,
        threshold: Severity,
        system_info: &SystemInfo,
        diagnostics: &Arc<DiagnosticsRegistry>,
    ) -> anyhow::Result<Self> {
        let log_sink: Arc<dyn LogSink> =
            Arc::new(BreadcrumbLogSink::new(threshold, reporter.clone()));

        let ikey = config
            .telemetry
            .instrumentation_key
            .clone()
            .context("telemetry instrumentation key is not configured")?;
        let context = TelemetryContext::new_session(device_os(system_info), system_info.clone());
        let (client, worker) = HttpTelemetryClient::spawn(
            &config.telemetry,
            ikey,
            context,
            Some(diagnostics.clone()),
        )?;
        let telemetry = Arc::new(client);

        let analytics = LiveAnalyticsSink::new(reporter.clone(), telemetry.clone())
            .with_diagnostics(diagnostics.clone());

        Ok(Self {
            reporter,
            log_sink,
            analytics: Arc::new(analytics),
            telemetry: Some(telemetry),
            worker: Some(worker),
        })
    }
}

// ============================================================================
// PendingServices
// ============================================================================

/// Registered services waiting for the identity store
pub struct PendingServices {
    mode: OperatingMode,
    identity: Arc<IdentityProvider>,
    components: Components,
    diagnostics: Arc<DiagnosticsRegistry>,
    system_info: SystemInfo,
    grace: Duration,
}

impl PendingServices {
    pub fn mode(&self) -> OperatingMode {
        self.mode
    }

    /// The log sink is usable before the identity store is attached.
    pub fn log_sink(&self) -> Arc<dyn LogSink> {
        self.components.log_sink.clone()
    }

    /// Attaches the durable store and completes startup.
    ///
    /// In production mode the identity is resolved here and set on the
    /// telemetry session; a store that cannot be read or written fails
    /// startup.
    pub fn attach_identity_store(
        self,
        store: Arc<dyn SecureStore>,
    ) -> Result<Services, IdentityError> {
        self.identity.attach_store(store)?;

        if let Some(telemetry) = &self.components.telemetry {
            let user = self.identity.resolve()?;
            telemetry.set_user_id(user.as_str());
            debug!("Telemetry session bound to installation identity");
        }

        Ok(Services {
            mode: self.mode,
            identity: self.identity,
            components: self.components,
            diagnostics: self.diagnostics,
            system_info: self.system_info,
            grace: self.grace,
        })
    }
}

// ============================================================================
// Services
// ============================================================================

/// Fully initialized facade components
pub struct Services {
    mode: OperatingMode,
    identity: Arc<IdentityProvider>,
    components: Components,
    diagnostics: Arc<DiagnosticsRegistry>,
    system_info: SystemInfo,
    grace: Duration,
}

impl Services {
    pub fn mode(&self) -> OperatingMode {
        self.mode
    }

    pub fn analytics(&self) -> Arc<dyn AnalyticsSink> {
        self.components.analytics.clone()
    }

    pub fn log_sink(&self) -> Arc<dyn LogSink> {
        self.components.log_sink.clone()
    }

    pub fn crash_reporter(&self) -> Arc<dyn CrashReporter> {
        self.components.reporter.clone()
    }

    pub fn identity(&self) -> &Arc<IdentityProvider> {
        &self.identity
    }

    pub fn diagnostics(&self) -> &Arc<DiagnosticsRegistry> {
        &self.diagnostics
    }

    /// The live telemetry client, absent in debug mode.
    pub fn telemetry_client(&self) -> Option<Arc<HttpTelemetryClient>> {
        self.components.telemetry.clone()
    }

    /// Static facts collected at registration.
    pub fn system_info(&self) -> &SystemInfo {
        &self.system_info
    }

    /// Static facts plus current memory figures.
    pub fn dynamic_system_info(&self) -> SystemInfo {
        collect_dynamic(&self.system_info)
    }

    /// Reports panics through this crash reporter.
    pub fn install_panic_hook(&self) {
        install_panic_hook(self.components.reporter.clone());
    }

    /// Flushes telemetry and the crash reporter within the configured grace period.
    ///
    /// Returns `true` when everything was delivered before the deadline.
    pub async fn shutdown(self) -> bool {
        let deadline = Instant::now() + self.grace;
        let mut clean = true;

        if let Some(telemetry) = &self.components.telemetry {
            match timeout(self.grace, telemetry.flush()).await {
                Ok(Ok(())) => {}
                Ok(Err(e)) => {
                    warn!(error = %e, "Telemetry flush failed during shutdown");
                    clean = false;
                }
                Err(_) => {
                    warn!(grace_ms = self.grace.as_millis() as u64, "Telemetry flush timed out");
                    clean = false;
                }
            }

            let remaining = deadline.saturating_duration_since(Instant::now());
            if timeout(remaining, telemetry.shutdown()).await.is_err() {
                clean = false;
            }
        }

        if let Some(worker) = self.components.worker {
            let remaining = deadline.saturating_duration_since(Instant::now());
            if timeout(remaining, worker).await.is_err() {
                debug!("Telemetry worker still running at shutdown deadline");
                clean = false;
            }
        }

        let reporter = self.components.reporter.clone();
        let remaining = deadline.saturating_duration_since(Instant::now());
        let flushed = tokio::task::spawn_blocking(move || reporter.flush(remaining))
            .await
            .unwrap_or(false);

        info!(clean = clean && flushed, "Telemetry services shut down");
        clean && flushed
    }
}
