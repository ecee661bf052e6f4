//! Breadcrumbs and crash events
//!
//! A breadcrumb is a timestamped `(message, category, level)` entry on the
//! crash-reporting trail. Crash events are the explicit captures that carry
//! the trail to the backend.

use std::collections::BTreeMap;
use std::fmt::{self, Display, Formatter};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::severity::{BreadcrumbLevel, Severity};

/// Category used by the log sink adapter
pub const CATEGORY_LOG: &str = "log";

/// Category used by the live analytics sink
pub const CATEGORY_INTERACTION: &str = "interaction";

/// A single entry on the crash-reporting trail
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Breadcrumb {
    pub timestamp: DateTime<Utc>,
    pub category: String,
    pub message: String,
    pub level: BreadcrumbLevel,
    /// Extra key/value data (tag, error description)
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub data: BTreeMap<String, String>,
}

impl Breadcrumb {
    /// Creates a breadcrumb stamped with the current time
    pub fn new(category: impl Into<String>, message: impl Into<String>, level: BreadcrumbLevel) -> Self {
        Self {
            timestamp: Utc::now(),
            category: category.into(),
            message: message.into(),
            level,
            data: BTreeMap::new(),
        }
    }

    /// Adds a data entry
    pub fn with_data(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.data.insert(key.into(), value.into());
        self
    }
}

/// A free-form event for `CrashReporter::capture_event`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CrashEvent {
    pub message: String,
    pub level: Severity,
    #[serde(default)]
    pub tags: BTreeMap<String, String>,
    /// Optional grouping fingerprint
    #[serde(default)]
    pub fingerprint: Vec<String>,
}

impl CrashEvent {
    /// Creates an event with the given message and level
    pub fn new(message: impl Into<String>, level: Severity) -> Self {
        Self {
            message: message.into(),
            level,
            tags: BTreeMap::new(),
            fingerprint: Vec::new(),
        }
    }

    /// Adds a tag
    pub fn with_tag(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.tags.insert(key.into(), value.into());
        self
    }

    /// Sets the grouping fingerprint
    pub fn with_fingerprint(mut self, fingerprint: Vec<String>) -> Self {
        self.fingerprint = fingerprint;
        self
    }
}

/// Opaque identifier returned by a capture call
///
/// Empty for the no-op reporter.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EventId(String);

impl EventId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// The placeholder acknowledgment of the no-op reporter
    pub fn empty() -> Self {
        Self(String::new())
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for EventId {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
