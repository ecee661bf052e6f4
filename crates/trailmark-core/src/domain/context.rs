//! Session-wide telemetry context
//!
//! Everything attached once per process to every telemetry envelope: the
//! session id, the device OS string, the user id (set after the identity
//! store is attached) and the system-information properties.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Machine facts keyed by name (`Culture`, `TotalPhysicalMemory`, ...)
pub type SystemInfo = BTreeMap<String, String>;

/// Context properties shared by all envelopes of one process
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TelemetryContext {
    /// Fresh per process start
    pub session_id: String,
    pub device_os: String,
    pub user_id: Option<String>,
    pub properties: SystemInfo,
}

impl TelemetryContext {
    /// Starts a new session with a freshly generated id
    pub fn new_session(device_os: impl Into<String>, properties: SystemInfo) -> Self {
        Self {
            session_id: Uuid::new_v4().to_string(),
            device_os: device_os.into(),
            user_id: None,
            properties,
        }
    }
}
