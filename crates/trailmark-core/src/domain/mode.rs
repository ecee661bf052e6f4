//! Operating mode of the facade
//!
//! The mode is decided once, at startup, from the presence of the
//! crash-reporting credential. Both the crash reporter and the analytics
//! sink read the same value, so their variants cannot diverge.

use std::fmt::{self, Display, Formatter};

use serde::{Deserialize, Serialize};

/// Debug (local only) or production (vendor backends) operation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OperatingMode {
    /// No credential: no-op crash reporter, console logging, local analytics
    Debug,
    /// Credential present: live crash reporter and telemetry client
    Production,
}

impl OperatingMode {
    /// Decide the mode from an optional credential.
    ///
    /// A missing or blank credential selects [`OperatingMode::Debug`].
    pub fn from_credential(credential: Option<&str>) -> Self {
        match credential {
            Some(value) if !value.trim().is_empty() => OperatingMode::Production,
            _ => OperatingMode::Debug,
        }
    }

    /// Returns true for [`OperatingMode::Debug`]
    pub fn is_debug(self) -> bool {
        matches!(self, OperatingMode::Debug)
    }
}

impl Display for OperatingMode {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            OperatingMode::Debug => f.write_str("debug"),
            OperatingMode::Production => f.write_str("production"),
        }
    }
}
