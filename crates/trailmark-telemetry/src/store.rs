//! Secure key-value stores for the identity record
//!
//! Three [`SecureStore`] backends:
//! - [`KeyringStore`]: OS credential store via the `keyring` crate
//! - [`JsonFileStore`]: a JSON document in the user's data directory
//! - [`MemoryStore`]: process memory, for tests and throwaway runs

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use anyhow::{Context, Result};
use tracing::debug;
use trailmark_core::config::{IdentityConfig, StoreKind};
use trailmark_core::ports::SecureStore;

type Record = HashMap<String, String>;

/// Builds the store selected by the identity configuration.
pub fn open_store(config: &IdentityConfig) -> Arc<dyn SecureStore> {
    match config.store {
        StoreKind::Keyring => Arc::new(KeyringStore::new(config.keyring_service.clone())),
        StoreKind::File => Arc::new(JsonFileStore::new(config.file_path_or_default())),
        StoreKind::Memory => Arc::new(MemoryStore::new()),
    }
}

// ============================================================================
// KeyringStore
// ============================================================================

/// Stores records in the system keyring
///
/// Each record is serialized as JSON and saved as the password of the entry
/// `(service, key)`.
pub struct KeyringStore {
    service: String,
}

impl KeyringStore {
    pub fn new(service: impl Into<String>) -> Self {
        Self {
            service: service.into(),
        }
    }

    fn entry(&self, key: &str) -> Result<keyring::Entry> {
        keyring::Entry::new(&self.service, key).context("Failed to create keyring entry")
    }
}

impl SecureStore for KeyringStore {
    fn get_object(&self, key: &str) -> Result<Option<Record>> {
        match self.entry(key)?.get_password() {
            Ok(json) => {
                let record: Record = serde_json::from_str(&json)
                    .context("Failed to deserialize record from keyring")?;
                debug!(service = %self.service, key, "Loaded record from keyring");
                Ok(Some(record))
            }
            Err(keyring::Error::NoEntry) => {
                debug!(service = %self.service, key, "No record found in keyring");
                Ok(None)
            }
            Err(e) => Err(anyhow::Error::new(e).context("Failed to read from keyring")),
        }
    }

    fn insert_object(&self, key: &str, value: &Record) -> Result<()> {
        let json = serde_json::to_string(value).context("Failed to serialize record")?;
        self.entry(key)?
            .set_password(&json)
            .context("Failed to store record in keyring")?;
        debug!(service = %self.service, key, "Stored record in keyring");
        Ok(())
    }

    fn invalidate(&self, key: &str) -> Result<()> {
        match self.entry(key)?.delete_credential() {
            Ok(()) | Err(keyring::Error::NoEntry) => Ok(()),
            Err(e) => Err(anyhow::Error::new(e).context("Failed to delete from keyring")),
        }
    }
}

// ============================================================================
// JsonFileStore
// ============================================================================

/// Stores all records in a single JSON object on disk
///
/// Writes go to a sibling temp file first and are renamed into place.
pub struct JsonFileStore {
    path: PathBuf,
    lock: Mutex<()>,
}

impl JsonFileStore {
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_all(&self) -> Result<HashMap<String, Record>> {
        if !self.path.exists() {
            return Ok(HashMap::new());
        }
        let content = std::fs::read_to_string(&self.path)
            .with_context(|| format!("Failed to read {}", self.path.display()))?;
        if content.trim().is_empty() {
            return Ok(HashMap::new());
        }
        serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse {}", self.path.display()))
    }

    fn write_all(&self, records: &HashMap<String, Record>) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create {}", parent.display()))?;
        }
        let json = serde_json::to_string_pretty(records)?;
        let tmp = self.path.with_extension("json.tmp");
        std::fs::write(&tmp, json)
            .with_context(|| format!("Failed to write {}", tmp.display()))?;
        std::fs::rename(&tmp, &self.path)
            .with_context(|| format!("Failed to replace {}", self.path.display()))?;
        Ok(())
    }

    fn guard(&self) -> std::sync::MutexGuard<'_, ()> {
        self.lock.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl SecureStore for JsonFileStore {
    fn get_object(&self, key: &str) -> Result<Option<Record>> {
        let _guard = self.guard();
        Ok(self.read_all()?.remove(key))
    }

    fn insert_object(&self, key: &str, value: &Record) -> Result<()> {
        let _guard = self.guard();
        let mut records = self.read_all()?;
        records.insert(key.to_string(), value.clone());
        self.write_all(&records)?;
        debug!(path = %self.path.display(), key, "Stored record in file");
        Ok(())
    }

    fn invalidate(&self, key: &str) -> Result<()> {
        let _guard = self.guard();
        let mut records = self.read_all()?;
        if records.remove(key).is_some() {
            self.write_all(&records)?;
        }
        Ok(())
    }
}

// ============================================================================
// MemoryStore
// ============================================================================

/// Keeps records in process memory
#[derive(Default)]
pub struct MemoryStore {
    records: Mutex<HashMap<String, Record>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn records(&self) -> std::sync::MutexGuard<'_, HashMap<String, Record>> {
        self.records
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl SecureStore for MemoryStore {
    fn get_object(&self, key: &str) -> Result<Option<Record>> {
        Ok(self.records().get(key).cloned())
    }

    fn insert_object(&self, key: &str, value: &Record) -> Result<()> {
        self.records().insert(key.to_string(), value.clone());
        Ok(())
    }

    fn invalidate(&self, key: &str) -> Result<()> {
        self.records().remove(key);
        Ok(())
    }
}
