//! Identity command - Show the anonymized installation identifier

use anyhow::{Context, Result};
use trailmark_telemetry::Services;

use crate::output::{get_formatter, OutputFormat};

/// Arguments for the identity subcommand
#[derive(Debug, clap::Args)]
pub struct IdentityCommand {}

impl IdentityCommand {
    pub async fn execute(&self, services: &Services, format: OutputFormat) -> Result<()> {
        let formatter = get_formatter(format);
        let user = services
            .identity()
            .resolve()
            .context("Failed to resolve the installation identity")?;

        if format.is_json() {
            formatter.print_json(&serde_json::json!({
                "user_id": user.as_str(),
                "slug": user.slug(),
                "mode": services.mode().to_string(),
            }));
        } else {
            formatter.success("Installation identity");
            formatter.info(&format!("User ID: {user}"));
            formatter.info(&format!("Mode:    {}", services.mode()));
        }
        Ok(())
    }
}
