//! Log sink adapters
//!
//! Provides:
//! - [`BreadcrumbLogSink`]: production sink, appends `"log"` breadcrumbs to the crash trail
//! - [`ConsoleLogSink`]: debug sink, re-emits records as `tracing` events
//! - [`BreadcrumbLayer`]: a `tracing_subscriber` layer feeding application
//!   `tracing` events into any [`LogSink`]

use std::error::Error;
use std::fmt::{self, Write as _};
use std::sync::Arc;

use tracing::field::{Field, Visit};
use tracing::{Event, Subscriber};
use tracing_subscriber::layer::Context;
use tracing_subscriber::Layer;
use trailmark_core::domain::{Breadcrumb, Severity, CATEGORY_LOG};
use trailmark_core::ports::{CrashReporter, LogRecord, LogSink};

/// Breadcrumb data key holding the record's tag
pub const DATA_TAG: &str = "tag";

/// Breadcrumb data key holding the attached error's description
pub const DATA_ERROR: &str = "error";

// Events from this crate are never forwarded by BreadcrumbLayer; the console
// sink and delivery diagnostics would otherwise feed themselves.
const OWN_TARGET: &str = "trailmark_telemetry";

// ============================================================================
// BreadcrumbLogSink
// ============================================================================

/// Appends each record at or above the threshold to the crash-reporting trail
pub struct BreadcrumbLogSink {
    threshold: Severity,
    reporter: Arc<dyn CrashReporter>,
}

impl BreadcrumbLogSink {
    pub fn new(threshold: Severity, reporter: Arc<dyn CrashReporter>) -> Self {
        Self {
            threshold,
            reporter,
        }
    }
}

impl LogSink for BreadcrumbLogSink {
    fn threshold(&self) -> Severity {
        self.threshold
    }

    fn log(&self, record: &LogRecord<'_>) {
        if !self.enabled(record.severity) {
            return;
        }

        let mut crumb = Breadcrumb::new(CATEGORY_LOG, record.message, record.severity.into());
        if let Some(tag) = record.tag {
            crumb = crumb.with_data(DATA_TAG, tag);
        }
        if let Some(error) = record.error {
            crumb = crumb.with_data(DATA_ERROR, error.to_string());
        }

        if let Err(e) = self.reporter.add_breadcrumb(crumb) {
            tracing::debug!(error = %e, "Dropped log breadcrumb");
        }
    }
}

// ============================================================================
// ConsoleLogSink
// ============================================================================

/// Writes records to the local `tracing` subscriber; no network I/O
#[derive(Debug, Clone, Copy)]
pub struct ConsoleLogSink {
    threshold: Severity,
}

impl ConsoleLogSink {
    pub fn new(threshold: Severity) -> Self {
        Self { threshold }
    }
}

impl LogSink for ConsoleLogSink {
    fn threshold(&self) -> Severity {
        self.threshold
    }

    fn log(&self, record: &LogRecord<'_>) {
        if !self.enabled(record.severity) {
            return;
        }

        let tag = record.tag.unwrap_or_default();
        let error = record.error.map(|e| e.to_string()).unwrap_or_default();
        let message = record.message;

        match record.severity {
            Severity::Debug => tracing::debug!(tag, error, "{message}"),
            Severity::Info => tracing::info!(tag, error, "{message}"),
            Severity::Warn => tracing::warn!(tag, error, "{message}"),
            Severity::Error | Severity::Fatal => {
                tracing::error!(tag, error, fatal = record.severity == Severity::Fatal, "{message}")
            }
        }
    }
}

// ============================================================================
// BreadcrumbLayer
// ============================================================================

/// Forwards `tracing` events to a [`LogSink`]
///
/// The event's `message` field becomes the record message; optional `tag`
/// and `error` fields are carried over. Everything else is appended as
/// `name = value;` pairs.
pub struct BreadcrumbLayer {
    sink: Arc<dyn LogSink>,
}

impl BreadcrumbLayer {
    pub fn new(sink: Arc<dyn LogSink>) -> Self {
        Self { sink }
    }
}

impl<S> Layer<S> for BreadcrumbLayer
where
    S: Subscriber,
{
    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        let meta = event.metadata();
        if meta.target().starts_with(OWN_TARGET) {
            return;
        }

        let severity = tracing_level_to_severity(*meta.level());
        if !self.sink.enabled(severity) {
            return;
        }

        let mut recorder = Recorder::default();
        event.record(&mut recorder);
        recorder.finish();

        let error = recorder.error.map(ErrorText);
        let mut record = LogRecord::new(&recorder.message, severity);
        if let Some(tag) = recorder.tag.as_deref() {
            record = record.with_tag(tag);
        }
        if let Some(error) = error.as_ref() {
            record = record.with_error(error);
        }
        self.sink.log(&record);
    }
}

#[derive(Default)]
struct Recorder {
    message: String,
    extra: String,
    tag: Option<String>,
    error: Option<String>,
}

impl Visit for Recorder {
    fn record_str(&mut self, field: &Field, value: &str) {
        match field.name() {
            "message" => self.message = value.to_string(),
            "tag" => self.tag = Some(value.to_string()),
            "error" => self.error = Some(value.to_string()),
            _ => self.record_debug(field, &value),
        }
    }

    fn record_error(&mut self, field: &Field, value: &(dyn Error + 'static)) {
        if field.name() == "error" {
            self.error = Some(value.to_string());
        } else {
            self.record_debug(field, &format_args!("{value}"));
        }
    }

    fn record_debug(&mut self, field: &Field, value: &dyn fmt::Debug) {
        match field.name() {
            "message" => self.message = format!("{value:?}"),
            "tag" => self.tag = Some(format!("{value:?}")),
            "error" => self.error = Some(format!("{value:?}")),
            name => {
                if !self.extra.is_empty() {
                    self.extra.push(' ');
                }
                let _ = write!(self.extra, "{name} = {value:?};");
            }
        }
    }
}

impl Recorder {
    fn finish(&mut self) {
        if !self.extra.is_empty() {
            if !self.message.is_empty() {
                self.message.push(' ');
            }
            self.message.push_str(&self.extra);
        }
    }
}

/// Error description recovered from a `tracing` field
#[derive(Debug)]
struct ErrorText(String);

impl fmt::Display for ErrorText {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl Error for ErrorText {}

fn tracing_level_to_severity(level: tracing::Level) -> Severity {
    match level {
        tracing::Level::TRACE | tracing::Level::DEBUG => Severity::Debug,
        tracing::Level::INFO => Severity::Info,
        tracing::Level::WARN => Severity::Warn,
        tracing::Level::ERROR => Severity::Error,
    }
}
