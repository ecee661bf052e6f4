//! Secure key-value store port (driven/secondary port)
//!
//! Durable storage for small string maps, such as the identity record.
//!
//! ## Design Notes
//!
//! - Uses `anyhow::Result` because storage errors are backend-specific
//!   (OS keyring, filesystem) and don't need domain-level classification.
//! - Values are string-to-string maps; backends decide the encoding.

use std::collections::HashMap;

/// Durable secure key-value store
pub trait SecureStore: Send + Sync {
    /// Reads the object stored under `key`, `None` when absent
    fn get_object(&self, key: &str) -> anyhow::Result<Option<HashMap<String, String>>>;

    /// Stores `value` under `key`, replacing any previous value
    fn insert_object(&self, key: &str, value: &HashMap<String, String>) -> anyhow::Result<()>;

    /// Removes the object stored under `key`; absent keys are not an error
    fn invalidate(&self, key: &str) -> anyhow::Result<()>;
}
