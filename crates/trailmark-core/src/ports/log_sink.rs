//! Log sink port
//!
//! Severity-filtered log writes. The four `write*` overloads are equivalent
//! except for the tag/error that accompanies the message; they all funnel
//! into [`LogSink::log`].
//!
//! ## Design Notes
//!
//! - Implementations must drop records below [`LogSink::threshold`]
//!   (see [`LogSink::enabled`]).
//! - Writes are infallible from the caller's point of view.

use std::error::Error;

use crate::domain::Severity;

/// One log write
#[derive(Debug, Clone, Copy)]
pub struct LogRecord<'a> {
    pub message: &'a str,
    pub severity: Severity,
    /// Label of the component the message comes from
    pub tag: Option<&'a str>,
    pub error: Option<&'a (dyn Error + 'static)>,
}

impl<'a> LogRecord<'a> {
    pub fn new(message: &'a str, severity: Severity) -> Self {
        Self {
            message,
            severity,
            tag: None,
            error: None,
        }
    }

    pub fn with_tag(mut self, tag: &'a str) -> Self {
        self.tag = Some(tag);
        self
    }

    pub fn with_error(mut self, error: &'a (dyn Error + 'static)) -> Self {
        self.error = Some(error);
        self
    }
}

/// Severity-filtered log destination
pub trait LogSink: Send + Sync {
    /// Minimum severity this sink writes
    fn threshold(&self) -> Severity;

    /// Writes a record. Records below the threshold are ignored.
    fn log(&self, record: &LogRecord<'_>);

    fn enabled(&self, severity: Severity) -> bool {
        severity.passes(self.threshold())
    }

    fn write(&self, message: &str, severity: Severity) {
        self.log(&LogRecord::new(message, severity));
    }

    fn write_error(&self, error: &(dyn Error + 'static), message: &str, severity: Severity) {
        self.log(&LogRecord::new(message, severity).with_error(error));
    }

    fn write_tagged(&self, message: &str, tag: &str, severity: Severity) {
        self.log(&LogRecord::new(message, severity).with_tag(tag));
    }

    fn write_error_tagged(
        &self,
        error: &(dyn Error + 'static),
        message: &str,
        tag: &str,
        severity: Severity,
    ) {
        self.log(&LogRecord::new(message, severity).with_tag(tag).with_error(error));
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use super::*;

    struct Recording {
        threshold: Severity,
        lines: Mutex<Vec<(String, Severity, Option<String>, Option<String>)>>,
    }

    impl LogSink for Recording {
        fn threshold(&self) -> Severity {
            self.threshold
        }

        fn log(&self, record: &LogRecord<'_>) {
            if !self.enabled(record.severity) {
                return;
            }
            self.lines.lock().unwrap().push((
                record.message.to_string(),
                record.severity,
                record.tag.map(str::to_string),
                record.error.map(|e| e.to_string()),
            ));
        }
    }

    #[test]
    fn test_overloads_funnel_into_log() {
        let sink = Recording {
            threshold: Severity::Debug,
            lines: Mutex::new(Vec::new()),
        };
        let err = std::io::Error::new(std::io::ErrorKind::Other, "disk gone");

        sink.write("a", Severity::Info);
        sink.write_error(&err, "b", Severity::Error);
        sink.write_tagged("c", "Sync", Severity::Warn);
        sink.write_error_tagged(&err, "d", "Sync", Severity::Fatal);

        let lines = sink.lines.lock().unwrap();
        assert_eq!(lines.len(), 4);
        assert_eq!(lines[0], ("a".to_string(), Severity::Info, None, None));
        assert_eq!(lines[1].3.as_deref(), Some("disk gone"));
        assert_eq!(lines[2].2.as_deref(), Some("Sync"));
        assert_eq!(lines[3].1, Severity::Fatal);
    }

    #[test]
    fn test_enabled_uses_threshold() {
        let sink = Recording {
            threshold: Severity::Warn,
            lines: Mutex::new(Vec::new()),
        };
        assert!(!sink.enabled(Severity::Info));
        assert!(sink.enabled(Severity::Warn));
        assert!(sink.enabled(Severity::Fatal));
    }
}
