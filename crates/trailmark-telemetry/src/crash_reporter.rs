//! Crash-reporter adapters
//!
//! Provides:
//! - [`NoopCrashReporter`]: debug-mode reporter, no network I/O
//! - [`SentryCrashReporter`]: production reporter backed by the Sentry SDK
//! - [`register_crash_reporter`]: picks one of them from the operating mode
//!
//! The Sentry reporter owns its own [`sentry::Hub`] instead of binding the
//! process-global one, so several reporters (e.g. in tests) never share a
//! breadcrumb trail.

use std::borrow::Cow;
use std::error::Error;
use std::sync::Arc;
use std::time::{Duration, SystemTime};

use anyhow::Context;
use sentry::protocol::{Event, Map, Value};
use sentry::types::{Dsn, Uuid};
use sentry::{ClientOptions, Hub, Level, Scope, TransportFactory};
use tracing::{debug, warn};
use trailmark_core::config::Config;
use trailmark_core::config::CrashReportingConfig;
use trailmark_core::domain::{
    Breadcrumb, BreadcrumbLevel, CrashEvent, DeliveryError, EventId, OperatingMode, Severity,
};
use trailmark_core::ports::CrashReporter;

use crate::identity::IdentityProvider;
use crate::scrubber::Scrubber;

// ============================================================================
// NoopCrashReporter
// ============================================================================

/// Accepts every call and performs no I/O
///
/// Capture calls acknowledge with [`EventId::empty`].
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopCrashReporter;

impl CrashReporter for NoopCrashReporter {
    fn capture_error(
        &self,
        _error: &(dyn Error + 'static),
        _level: Severity,
    ) -> Result<EventId, DeliveryError> {
        Ok(EventId::empty())
    }

    fn capture_message(&self, _message: &str, _level: Severity) -> Result<EventId, DeliveryError> {
        Ok(EventId::empty())
    }

    fn capture_event(&self, _event: CrashEvent) -> Result<EventId, DeliveryError> {
        Ok(EventId::empty())
    }

    fn add_breadcrumb(&self, _breadcrumb: Breadcrumb) -> Result<(), DeliveryError> {
        Ok(())
    }

    fn restart_trail(&self) {}

    fn flush(&self, _timeout: Duration) -> bool {
        true
    }
}

// ============================================================================
// Registration
// ============================================================================

/// Builds the crash reporter for `mode`.
///
/// Debug mode never touches the DSN. Production mode binds a
/// [`SentryCrashReporter`] to it; `transport` replaces the SDK's HTTP
/// transport when given.
pub fn register_crash_reporter(
    mode: OperatingMode,
    config: &Config,
    identity: Arc<IdentityProvider>,
    transport: Option<Arc<dyn TransportFactory>>,
) -> anyhow::Result<Arc<dyn CrashReporter>> {
    match mode {
        OperatingMode::Debug => Ok(Arc::new(NoopCrashReporter)),
        OperatingMode::Production => {
            let scrubber = Scrubber::new(&config.scrubbing);
            let reporter = SentryCrashReporter::with_transport(
                &config.crash_reporting,
                identity,
                scrubber,
                transport,
            )?;
            Ok(Arc::new(reporter))
        }
    }
}

// ============================================================================
// Level mapping
// ============================================================================

pub(crate) fn severity_level(severity: Severity) -> Level {
    match severity {
        Severity::Debug => Level::Debug,
        Severity::Info => Level::Info,
        Severity::Warn => Level::Warning,
        Severity::Error => Level::Error,
        Severity::Fatal => Level::Fatal,
    }
}

pub(crate) fn breadcrumb_level(level: BreadcrumbLevel) -> Level {
    match level {
        BreadcrumbLevel::Debug => Level::Debug,
        BreadcrumbLevel::Info => Level::Info,
        BreadcrumbLevel::Warning => Level::Warning,
        BreadcrumbLevel::Error => Level::Error,
        BreadcrumbLevel::Critical => Level::Fatal,
    }
}

// ============================================================================
// SentryCrashReporter
// ============================================================================

/// Production crash reporter bound to a DSN
///
/// The user of every event is resolved lazily from the [`IdentityProvider`]
/// when the event is sent, not when the reporter is built.
pub struct SentryCrashReporter {
    hub: Arc<Hub>,
    scrubber: Scrubber,
}

impl SentryCrashReporter {
    /// Builds a reporter using the SDK's default HTTP transport.
    pub fn new(
        config: &CrashReportingConfig,
        identity: Arc<IdentityProvider>,
        scrubber: Scrubber,
    ) -> anyhow::Result<Self> {
        Self::with_transport(config, identity, scrubber, None)
    }

    /// Builds a reporter with an explicit transport (tests use the SDK's test transport).
    pub fn with_transport(
        config: &CrashReportingConfig,
        identity: Arc<IdentityProvider>,
        scrubber: Scrubber,
        transport: Option<Arc<dyn TransportFactory>>,
    ) -> anyhow::Result<Self> {
        let dsn: Dsn = config
            .dsn
            .as_deref()
            .context("crash reporting DSN is not configured")?
            .trim()
            .parse()
            .context("Failed to parse crash reporting DSN")?;

        let event_scrubber = scrubber.clone();
        let before_send = move |mut event: Event<'static>| {
            match identity.resolve() {
                Ok(user) => {
                    event.user = Some(sentry::User {
                        id: Some(user.to_string()),
                        ..Default::default()
                    });
                }
                Err(e) => warn!(error = %e, "Sending crash event without user identity"),
            }
            scrub_event(&event_scrubber, &mut event);
            Some(event)
        };

        let options = sentry::apply_defaults(ClientOptions {
            dsn: Some(dsn),
            release: Some(Cow::Owned(config.release_or_default())),
            environment: Some(Cow::Owned(config.environment.clone())),
            max_breadcrumbs: config.max_breadcrumbs,
            before_send: Some(Arc::new(before_send)),
            transport,
            ..Default::default()
        });

        let client = sentry::Client::from(options);
        let hub = Hub::new(Some(Arc::new(client)), Arc::new(Scope::default()));
        debug!(environment = %config.environment, "Crash reporter initialized");

        Ok(Self {
            hub: Arc::new(hub),
            scrubber,
        })
    }

    fn acknowledge(&self, id: Uuid) -> Result<EventId, DeliveryError> {
        if id.is_nil() {
            Err(DeliveryError::Rejected("event was dropped by the crash reporter".into()))
        } else {
            Ok(EventId::new(id.simple().to_string()))
        }
    }
}

fn scrub_event(scrubber: &Scrubber, event: &mut Event<'static>) {
    if let Some(message) = event.message.as_mut() {
        *message = scrubber.scrub(message);
    }
    for exception in event.exception.values.iter_mut() {
        if let Some(value) = exception.value.as_mut() {
            *value = scrubber.scrub(value);
        }
    }
}

impl CrashReporter for SentryCrashReporter {
    fn capture_error(
        &self,
        error: &(dyn Error + 'static),
        level: Severity,
    ) -> Result<EventId, DeliveryError> {
        let mut event = sentry::event_from_error(error);
        event.level = severity_level(level);
        self.acknowledge(self.hub.capture_event(event))
    }

    fn capture_message(&self, message: &str, level: Severity) -> Result<EventId, DeliveryError> {
        let message = self.scrubber.scrub(message);
        self.acknowledge(self.hub.capture_message(&message, severity_level(level)))
    }

    fn capture_event(&self, event: CrashEvent) -> Result<EventId, DeliveryError> {
        let mut sentry_event = Event {
            message: Some(self.scrubber.scrub(&event.message)),
            level: severity_level(event.level),
            tags: event.tags,
            ..Default::default()
        };
        if !event.fingerprint.is_empty() {
            sentry_event.fingerprint =
                Cow::Owned(event.fingerprint.into_iter().map(Cow::Owned).collect());
        }
        self.acknowledge(self.hub.capture_event(sentry_event))
    }

    fn add_breadcrumb(&self, breadcrumb: Breadcrumb) -> Result<(), DeliveryError> {
        let data: Map<String, Value> = breadcrumb
            .data
            .into_iter()
            .map(|(key, value)| (key, Value::String(self.scrubber.scrub(&value))))
            .collect();

        self.hub.add_breadcrumb(sentry::Breadcrumb {
            timestamp: SystemTime::from(breadcrumb.timestamp),
            category: Some(breadcrumb.category),
            message: Some(self.scrubber.scrub(&breadcrumb.message)),
            level: breadcrumb_level(breadcrumb.level),
            data,
            ..Default::default()
        });
        Ok(())
    }

    fn restart_trail(&self) {
        self.hub.configure_scope(|scope| scope.clear_breadcrumbs());
    }

    fn flush(&self, timeout: Duration) -> bool {
        match self.hub.client() {
            Some(client) => client.flush(Some(timeout)),
            None => true,
        }
    }
}
