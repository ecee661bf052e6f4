//! Domain error types
//!
//! This module defines the error types shared between the facade and its
//! adapters: delivery failures towards the vendor backends, identity
//! resolution failures, and parse/validation failures of domain values.

use thiserror::Error;

/// Errors that can occur while handing an event to a vendor backend
///
/// These never reach application code: the analytics sinks swallow them
/// and only count them.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DeliveryError {
    /// The bounded channel to the background worker is full
    #[error("telemetry channel full, event dropped")]
    ChannelFull,

    /// The background worker is gone (shut down or panicked)
    #[error("telemetry worker is not running")]
    WorkerStopped,

    /// Network error while submitting a batch
    #[error("network error: {0}")]
    Network(String),

    /// The backend answered with a non-success status
    #[error("server error: HTTP {0}")]
    Server(u16),

    /// Serialization of an envelope failed
    #[error("serialization error: {0}")]
    Serialization(String),

    /// The downstream client panicked while handling the call
    #[error("downstream client panicked: {0}")]
    Panicked(String),

    /// Generic rejection raised by a client implementation
    #[error("rejected by client: {0}")]
    Rejected(String),
}

/// Errors that can occur while resolving the per-installation identity
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum IdentityError {
    /// `resolve` was called before a secure store was attached
    #[error("identity store has not been attached yet")]
    StoreNotAttached,

    /// A store was already attached; the attach step runs once
    #[error("identity store is already attached")]
    StoreAlreadyAttached,

    /// The secure store could not be read or written
    #[error("identity store unavailable: {0}")]
    StoreUnavailable(String),
}

/// Errors that can occur when parsing domain values
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// Unknown severity name
    #[error("Invalid severity: {0}")]
    InvalidSeverity(String),

    /// Malformed identity slug
    #[error("Invalid slug: {0}")]
    InvalidSlug(String),

    /// Unknown secure store backend name
    #[error("Invalid store kind: {0}")]
    InvalidStoreKind(String),
}
