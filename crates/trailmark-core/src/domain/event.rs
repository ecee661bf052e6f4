//! Analytics events
//!
//! Fire-and-forget records produced by the analytics sinks. They have no
//! identity of their own beyond the vendor session.

use std::fmt::{self, Display, Formatter};

use serde::{Deserialize, Serialize};

/// One recorded analytics event
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum AnalyticsEvent {
    Interaction { name: String, message: String },
    Metric { name: String, value: f64 },
    Pageview { name: String },
}

impl AnalyticsEvent {
    /// Event name as forwarded to the telemetry backend
    pub fn name(&self) -> &str {
        match self {
            AnalyticsEvent::Interaction { name, .. }
            | AnalyticsEvent::Metric { name, .. }
            | AnalyticsEvent::Pageview { name } => name,
        }
    }

    /// Short label used for diagnostics counters
    pub fn kind(&self) -> &'static str {
        match self {
            AnalyticsEvent::Interaction { .. } => "interaction",
            AnalyticsEvent::Metric { .. } => "metric",
            AnalyticsEvent::Pageview { .. } => "pageview",
        }
    }
}

impl Display for AnalyticsEvent {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            AnalyticsEvent::Interaction { name, message } => write!(f, "{name}: {message}"),
            AnalyticsEvent::Metric { name, value } => write!(f, "{name} = {value}"),
            AnalyticsEvent::Pageview { name } => write!(f, "page {name}"),
        }
    }
}
