//! Trailmark CLI - Command-line interface for Trailmark
//!
//! Provides commands for:
//! - Showing the anonymized installation identity
//! - Inspecting the system information attached to telemetry
//! - Recording analytics events
//! - Viewing and validating configuration

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::{debug, warn};
use tracing_subscriber::prelude::*;
use tracing_subscriber::EnvFilter;
use trailmark_core::config::Config;
use trailmark_telemetry::system_info::os_info_filler;
use trailmark_telemetry::{open_store, Bootstrap, BreadcrumbLayer, Services};

mod commands;
mod output;

use commands::{
    completions::CompletionsCommand, config::ConfigCommand, identity::IdentityCommand,
    info::InfoCommand, track::TrackCommand,
};
use output::{get_formatter, OutputFormat};

#[derive(Debug, Parser)]
#[command(name = "trailmark", version, about = "Crash reporting and telemetry facade")]
pub struct Cli {
    /// Output in JSON format
    #[arg(long, global = true)]
    json: bool,

    /// Verbose output (can be repeated: -v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Use alternate config file
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Print delivery diagnostics after the command
    #[arg(long, global = true)]
    diagnostics: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Show the anonymized installation identity
    Identity(IdentityCommand),
    /// Show system information attached to telemetry
    Info(InfoCommand),
    /// Record an analytics event
    #[command(subcommand)]
    Track(TrackCommand),
    /// View and validate configuration
    #[command(subcommand)]
    Config(ConfigCommand),
    /// Generate shell completions
    Completions(CompletionsCommand),
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let format = if cli.json {
        OutputFormat::Json
    } else {
        OutputFormat::Human
    };
    let config_path = cli.config.clone().unwrap_or_else(Config::default_path);

    match &cli.command {
        Commands::Config(cmd) => {
            init_tracing(cli.verbose, None);
            return cmd.execute(&config_path, format);
        }
        Commands::Completions(cmd) => return cmd.execute(),
        _ => {}
    }

    let services = start_services(&config_path, cli.verbose)?;

    let result = match &cli.command {
        Commands::Identity(cmd) => cmd.execute(&services, format).await,
        Commands::Info(cmd) => cmd.execute(&services, format).await,
        Commands::Track(cmd) => cmd.execute(&services, format).await,
        Commands::Config(_) | Commands::Completions(_) => Ok(()),
    };

    finish(services, cli.diagnostics, format, result).await
}

/// Installs the `fmt` subscriber, plus the breadcrumb bridge when given.
fn init_tracing(verbose: u8, bridge: Option<BreadcrumbLayer>) {
    let filter = match verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr),
        )
        .with(bridge)
        .init();
}

/// Registers every component, wires logging, then attaches the identity store.
fn start_services(config_path: &std::path::Path, verbose: u8) -> Result<Services> {
    let config = Config::load_or_default(config_path);

    let pending = Bootstrap::new(config.clone())
        .register(os_info_filler)
        .context("Failed to start telemetry services")?;

    let bridge = (!pending.mode().is_debug()).then(|| BreadcrumbLayer::new(pending.log_sink()));
    init_tracing(verbose, bridge);
    debug!(mode = %pending.mode(), config_path = %config_path.display(), "Configuration loaded");

    let services = pending
        .attach_identity_store(open_store(&config.identity))
        .context("Failed to open the identity store")?;
    services.install_panic_hook();
    Ok(services)
}

/// Prints diagnostics on request and shuts the services down.
async fn finish(
    services: Services,
    diagnostics: bool,
    format: OutputFormat,
    result: Result<()>,
) -> Result<()> {
    if diagnostics {
        let text = services
            .diagnostics()
            .encode()
            .context("Failed to encode diagnostics")?;
        if format.is_json() {
            get_formatter(format).print_json(&serde_json::json!({ "diagnostics": text }));
        } else {
            print!("{text}");
        }
    }

    if !services.shutdown().await {
        warn!("Some telemetry could not be delivered before exit");
    }
    result
}
