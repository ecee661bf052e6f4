//! Log severities and their breadcrumb counterparts
//!
//! [`Severity`] is the ordered level used by the log sinks for threshold
//! filtering. [`BreadcrumbLevel`] is the vocabulary of the crash-reporting
//! trail. The mapping between the two is one-to-one and total.

use std::fmt::{self, Display, Formatter};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::errors::DomainError;

/// Ordered log severity: `Debug < Info < Warn < Error < Fatal`
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Debug,
    Info,
    Warn,
    Error,
    Fatal,
}

impl Severity {
    /// All severities in ascending order
    pub const ALL: [Severity; 5] = [
        Severity::Debug,
        Severity::Info,
        Severity::Warn,
        Severity::Error,
        Severity::Fatal,
    ];

    /// Returns true when a sink configured at `threshold` should write
    /// an event of this severity.
    pub fn passes(self, threshold: Severity) -> bool {
        self >= threshold
    }

    /// Lowercase name, as used in configuration files
    pub fn as_str(self) -> &'static str {
        match self {
            Severity::Debug => "debug",
            Severity::Info => "info",
            Severity::Warn => "warn",
            Severity::Error => "error",
            Severity::Fatal => "fatal",
        }
    }
}

impl Default for Severity {
    fn default() -> Self {
        Severity::Info
    }
}

impl Display for Severity {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Severity {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "debug" => Ok(Severity::Debug),
            "info" => Ok(Severity::Info),
            "warn" | "warning" => Ok(Severity::Warn),
            "error" => Ok(Severity::Error),
            "fatal" | "critical" => Ok(Severity::Fatal),
            _ => Err(DomainError::InvalidSeverity(s.to_string())),
        }
    }
}

/// Severity vocabulary of the crash-reporting breadcrumb trail
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BreadcrumbLevel {
    Debug,
    Info,
    Warning,
    Error,
    Critical,
}

impl From<Severity> for BreadcrumbLevel {
    fn from(severity: Severity) -> Self {
        match severity {
            Severity::Debug => BreadcrumbLevel::Debug,
            Severity::Info => BreadcrumbLevel::Info,
            Severity::Warn => BreadcrumbLevel::Warning,
            Severity::Error => BreadcrumbLevel::Error,
            Severity::Fatal => BreadcrumbLevel::Critical,
        }
    }
}

impl Display for BreadcrumbLevel {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let s = match self {
            BreadcrumbLevel::Debug => "debug",
            BreadcrumbLevel::Info => "info",
            BreadcrumbLevel::Warning => "warning",
            BreadcrumbLevel::Error => "error",
            BreadcrumbLevel::Critical => "critical",
        };
        f.write_str(s)
    }
}
