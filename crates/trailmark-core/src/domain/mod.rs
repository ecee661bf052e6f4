//! Domain types of the telemetry facade
//!
//! This module contains:
//! - The operating mode decided at startup
//! - Severities and their breadcrumb counterparts
//! - Breadcrumbs, crash events and event ids
//! - Analytics events
//! - Identity record and user identifier
//! - Telemetry session context and system information
//! - Domain-specific error types

pub mod breadcrumb;
pub mod context;
pub mod errors;
pub mod event;
pub mod identity;
pub mod mode;
pub mod severity;

// Re-export commonly used types
pub use breadcrumb::{Breadcrumb, CrashEvent, EventId, CATEGORY_INTERACTION, CATEGORY_LOG};
pub use context::{SystemInfo, TelemetryContext};
pub use errors::{DeliveryError, DomainError, IdentityError};
pub use event::AnalyticsEvent;
pub use identity::{SlugInfo, UserIdentifier, SLUG_BYTES, SLUG_FIELD, SLUG_INFO_KEY};
pub use mode::OperatingMode;
pub use severity::{BreadcrumbLevel, Severity};
