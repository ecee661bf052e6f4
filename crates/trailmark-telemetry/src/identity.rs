//! Per-installation identity provider
//!
//! Produces the stable `"<base>_<slug>"` user identifier reported to both
//! backends. The slug is read from the attached [`SecureStore`] or, on the
//! first run, generated from random bytes and persisted.
//!
//! The store is attached after construction. Until then every resolution
//! fails with [`IdentityError::StoreNotAttached`], which lets the crash
//! reporter hold a provider before the durable store is ready.

use std::sync::{Arc, Mutex, OnceLock};

use rand::RngCore;
use sha2::{Digest, Sha256};
use tracing::{debug, info, warn};
use trailmark_core::domain::{IdentityError, SlugInfo, UserIdentifier, SLUG_BYTES, SLUG_INFO_KEY};
use trailmark_core::ports::SecureStore;

/// Base name used when no login name can be determined
pub const ANONYMOUS_BASE: &str = "anonymous";

/// Supplies the anonymized base part of the user identifier
pub trait UserFactory: Send + Sync {
    fn base_user_name(&self) -> String;
}

impl<U: UserFactory + ?Sized> UserFactory for Box<U> {
    fn base_user_name(&self) -> String {
        (**self).base_user_name()
    }
}

/// Hashes the login name so the identifier never carries it in clear text
#[derive(Debug, Clone)]
pub struct AnonymousUserFactory {
    login: Option<String>,
}

impl AnonymousUserFactory {
    /// Reads the login name from `USER`, then `LOGNAME`.
    pub fn from_env() -> Self {
        let login = std::env::var("USER")
            .or_else(|_| std::env::var("LOGNAME"))
            .ok()
            .filter(|name| !name.is_empty());
        Self { login }
    }

    pub fn with_login(login: impl Into<String>) -> Self {
        Self {
            login: Some(login.into()),
        }
    }
}

impl UserFactory for AnonymousUserFactory {
    fn base_user_name(&self) -> String {
        match &self.login {
            Some(login) => {
                let digest = Sha256::digest(login.as_bytes());
                hex::encode(&digest[..8])
            }
            None => ANONYMOUS_BASE.to_string(),
        }
    }
}

/// Resolves and caches the installation's [`UserIdentifier`]
pub struct IdentityProvider {
    users: Box<dyn UserFactory>,
    store: OnceLock<Arc<dyn SecureStore>>,
    // Held across the whole read-or-create so concurrent first calls
    // observe a single slug.
    resolved: Mutex<Option<UserIdentifier>>,
}

impl IdentityProvider {
    pub fn new(users: impl UserFactory + 'static) -> Self {
        Self {
            users: Box::new(users),
            store: OnceLock::new(),
            resolved: Mutex::new(None),
        }
    }

    /// Attaches the durable store. Can only happen once.
    pub fn attach_store(&self, store: Arc<dyn SecureStore>) -> Result<(), IdentityError> {
        self.store
            .set(store)
            .map_err(|_| IdentityError::StoreAlreadyAttached)?;
        debug!("Identity store attached");
        Ok(())
    }

    pub fn is_attached(&self) -> bool {
        self.store.get().is_some()
    }

    /// Identifier resolved so far, without touching the store.
    pub fn cached(&self) -> Option<UserIdentifier> {
        self.lock().clone()
    }

    /// Returns the user identifier, creating and persisting the slug on first use.
    pub fn resolve(&self) -> Result<UserIdentifier, IdentityError> {
        let mut resolved = self.lock();
        if let Some(id) = resolved.as_ref() {
            return Ok(id.clone());
        }

        let store = self.store.get().ok_or(IdentityError::StoreNotAttached)?;
        let slug = read_or_create_slug(store.as_ref())?;
        let id = UserIdentifier::new(&self.users.base_user_name(), &slug);

        *resolved = Some(id.clone());
        Ok(id)
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Option<UserIdentifier>> {
        self.resolved
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

fn read_or_create_slug(store: &dyn SecureStore) -> Result<SlugInfo, IdentityError> {
    let existing = store
        .get_object(SLUG_INFO_KEY)
        .map_err(|e| IdentityError::StoreUnavailable(format!("{e:#}")))?;

    if let Some(record) = existing {
        match SlugInfo::from_record(&record) {
            Ok(slug) => return Ok(slug),
            Err(e) => warn!(error = %e, "Stored identity record is corrupt, generating a new one"),
        }
    }

    let mut bytes = [0u8; SLUG_BYTES];
    rand::thread_rng().fill_bytes(&mut bytes);
    let slug = SlugInfo::from_bytes(&bytes);

    store
        .insert_object(SLUG_INFO_KEY, &slug.to_record())
        .map_err(|e| IdentityError::StoreUnavailable(format!("{e:#}")))?;
    info!("Generated new installation identity");

    Ok(slug)
}
