//! Info command - Show the system information attached to telemetry

use anyhow::Result;
use trailmark_telemetry::Services;

use crate::output::{get_formatter, OutputFormat};

/// Arguments for the info subcommand
#[derive(Debug, clap::Args)]
pub struct InfoCommand {
    /// Include point-in-time memory figures
    #[arg(long)]
    pub dynamic: bool,
}

impl InfoCommand {
    pub async fn execute(&self, services: &Services, format: OutputFormat) -> Result<()> {
        let formatter = get_formatter(format);
        let info = if self.dynamic {
            services.dynamic_system_info()
        } else {
            services.system_info().clone()
        };

        if !format.is_json() {
            formatter.success(if self.dynamic {
                "System information (with memory)"
            } else {
                "System information"
            });
        }
        formatter.table(&info);
        Ok(())
    }
}
