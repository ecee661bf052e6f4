//! Track command - Record analytics events from the command line
//!
//! Events go through the same analytics sink the application uses, so in
//! debug mode they only show up in the log output.

use std::time::Duration;

use anyhow::{ensure, Result};
use clap::Subcommand;
use trailmark_ext::{AnalyticsSinkExt, Dispose};
use trailmark_telemetry::Services;

use crate::output::{get_formatter, OutputFormat};

/// Track subcommands
#[derive(Debug, Subcommand)]
pub enum TrackCommand {
    /// Record a user interaction
    Interaction {
        /// Event name
        name: String,
        /// Human-readable description
        message: String,
    },
    /// Record a numeric metric
    Metric {
        /// Metric name
        name: String,
        /// Metric value
        value: f64,
    },
    /// Record a page view
    Pageview {
        /// Page name
        name: String,
    },
    /// Record how long a scope takes as a metric
    Timing {
        /// Metric name
        name: String,
        /// Milliseconds to hold the timing scope open
        #[arg(long, default_value_t = 0)]
        millis: u64,
    },
}

impl TrackCommand {
    pub async fn execute(&self, services: &Services, format: OutputFormat) -> Result<()> {
        let analytics = services.analytics();

        let (kind, name) = match self {
            TrackCommand::Interaction { name, message } => {
                analytics.record_user_interaction(name, message);
                ("interaction", name)
            }
            TrackCommand::Metric { name, value } => {
                ensure!(value.is_finite(), "Metric value must be a finite number");
                analytics.record_metric(name, *value);
                ("metric", name)
            }
            TrackCommand::Pageview { name } => {
                analytics.record_pageview(name);
                ("pageview", name)
            }
            TrackCommand::Timing { name, millis } => {
                let timing = analytics.record_timing(name.as_str());
                tokio::time::sleep(Duration::from_millis(*millis)).await;
                timing.dispose();
                ("timing", name)
            }
        };

        let formatter = get_formatter(format);
        if format.is_json() {
            formatter.print_json(&serde_json::json!({
                "success": true,
                "kind": kind,
                "name": name,
                "mode": services.mode().to_string(),
            }));
        } else {
            formatter.success(&format!("Recorded {kind} '{name}'"));
            if services.mode().is_debug() {
                formatter.info("Debug mode: the event was written to the log only");
            }
        }
        Ok(())
    }
}
