//! Per-installation identity types
//!
//! The identity record is a single-entry string map `{"Slug": "<hex>"}`
//! persisted under [`SLUG_INFO_KEY`]. Combined with an anonymized base user
//! name it forms the [`UserIdentifier`] reported to both backends.

use std::collections::HashMap;
use std::fmt::{self, Display, Formatter};

use serde::{Deserialize, Serialize};

use super::errors::DomainError;

/// Fixed key of the identity record in the secure store
pub const SLUG_INFO_KEY: &str = "slugInfo";

/// Field of the identity record holding the slug
pub const SLUG_FIELD: &str = "Slug";

/// Number of random bytes drawn for a new slug
pub const SLUG_BYTES: usize = 8;

/// The random per-installation token
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SlugInfo(String);

impl SlugInfo {
    /// Builds a slug from raw bytes, two lowercase hex characters per byte.
    pub fn from_bytes(bytes: &[u8]) -> Self {
        let slug = bytes.iter().fold(String::with_capacity(bytes.len() * 2), |mut acc, b| {
            acc.push_str(&format!("{b:02x}"));
            acc
        });
        Self(slug)
    }

    /// Validates and wraps an existing slug string.
    pub fn parse(slug: &str) -> Result<Self, DomainError> {
        let valid = !slug.is_empty()
            && slug.len() % 2 == 0
            && slug.chars().all(|c| c.is_ascii_digit() || ('a'..='f').contains(&c));
        if valid {
            Ok(Self(slug.to_string()))
        } else {
            Err(DomainError::InvalidSlug(slug.to_string()))
        }
    }

    /// Reads the slug out of a stored record.
    pub fn from_record(record: &HashMap<String, String>) -> Result<Self, DomainError> {
        match record.get(SLUG_FIELD) {
            Some(slug) => Self::parse(slug),
            None => Err(DomainError::InvalidSlug(format!("missing '{SLUG_FIELD}' entry"))),
        }
    }

    /// The single-entry record persisted in the secure store.
    pub fn to_record(&self) -> HashMap<String, String> {
        HashMap::from([(SLUG_FIELD.to_string(), self.0.clone())])
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for SlugInfo {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Final user identifier: `"<base>_<slug>"`
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserIdentifier(String);

impl UserIdentifier {
    pub fn new(base: &str, slug: &SlugInfo) -> Self {
        Self(format!("{base}_{slug}"))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The slug part (everything after the last underscore)
    pub fn slug(&self) -> &str {
        self.0.rsplit_once('_').map(|(_, slug)| slug).unwrap_or_default()
    }
}

impl Display for UserIdentifier {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
