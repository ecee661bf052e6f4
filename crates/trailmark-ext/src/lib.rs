//! Trailmark Ext - small utilities around the analytics facade
//!
//! Provides:
//! - `Dispose` / `dispose_and_clear`: ordered batch teardown of resources
//! - `TimingGuard` / `AnalyticsSinkExt::record_timing`: scoped timing metrics
//! - `GuaranteedThrottle` / `ThrottleExt::guaranteed_throttle`: trailing-edge stream throttle

pub mod dispose;
pub mod throttle;
pub mod timing;

pub use dispose::{dispose_and_clear, Dispose, Subscription};
pub use throttle::{GuaranteedThrottle, ThrottleExt};
pub use timing::{AnalyticsSinkExt, TimingGuard};
