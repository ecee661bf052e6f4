//! Config command - View and check Trailmark configuration
//!
//! Provides the `trailmark config` CLI command which:
//! 1. Shows the effective configuration (YAML or JSON)
//! 2. Validates the configuration file and reports errors
//! 3. Prints the configuration file path

use std::path::Path;

use anyhow::{Context, Result};
use clap::Subcommand;
use tracing::info;
use trailmark_core::config::{Config, ValidationError};

use crate::output::{get_formatter, OutputFormat};

/// Config subcommands
#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Display the effective configuration
    Show,
    /// Validate the configuration file
    Validate,
    /// Print the configuration file path
    Path,
}

impl ConfigCommand {
    pub fn execute(&self, config_path: &Path, format: OutputFormat) -> Result<()> {
        match self {
            ConfigCommand::Show => execute_show(config_path, format),
            ConfigCommand::Validate => execute_validate(config_path, format),
            ConfigCommand::Path => execute_path(config_path, format),
        }
    }
}

fn execute_show(config_path: &Path, format: OutputFormat) -> Result<()> {
    let formatter = get_formatter(format);
    let config = Config::load_or_default(config_path);

    info!(config_path = %config_path.display(), "Showing configuration");

    if format.is_json() {
        let json =
            serde_json::to_value(&config).context("Failed to serialize configuration to JSON")?;
        formatter.print_json(&json);
    } else {
        formatter.success(&format!("Configuration ({})", config_path.display()));
        formatter.info(&format!("Mode: {}", config.mode()));
        formatter.info("");

        let yaml =
            serde_yaml::to_string(&config).context("Failed to serialize configuration to YAML")?;
        for line in yaml.lines() {
            formatter.info(line);
        }
    }

    Ok(())
}

/// Outcome of loading and validating a configuration file
#[derive(Debug)]
enum ConfigStatus {
    Missing,
    Unparseable(String),
    Invalid(Vec<ValidationError>),
    Valid(Config),
}

fn check_config(config_path: &Path) -> ConfigStatus {
    if !config_path.exists() {
        return ConfigStatus::Missing;
    }

    let config = match Config::load(config_path) {
        Ok(config) => config,
        Err(e) => return ConfigStatus::Unparseable(format!("{e:#}")),
    };

    let errors = config.validate();
    if errors.is_empty() {
        ConfigStatus::Valid(config)
    } else {
        ConfigStatus::Invalid(errors)
    }
}

fn execute_validate(config_path: &Path, format: OutputFormat) -> Result<()> {
    let formatter = get_formatter(format);
    let path_str = config_path.display().to_string();

    info!(config_path = %path_str, "Validating configuration");

    match check_config(config_path) {
        ConfigStatus::Missing => {
            if format.is_json() {
                formatter.print_json(&serde_json::json!({
                    "valid": true,
                    "config_path": path_str,
                    "errors": [],
                    "note": "Configuration file not found. Using defaults.",
                }));
            } else {
                formatter.info(&format!("Configuration file not found at {path_str}"));
                formatter.info("Using default configuration (debug mode, nothing is sent).");
            }
        }
        ConfigStatus::Unparseable(message) => {
            if format.is_json() {
                formatter.print_json(&serde_json::json!({
                    "valid": false,
                    "config_path": path_str,
                    "errors": [format!("Failed to parse configuration: {message}")],
                }));
            } else {
                formatter.error(&format!("Failed to parse configuration: {message}"));
                formatter.info(&format!("File: {path_str}"));
            }
        }
        ConfigStatus::Invalid(errors) => {
            if format.is_json() {
                let error_strings: Vec<String> = errors.iter().map(ToString::to_string).collect();
                formatter.print_json(&serde_json::json!({
                    "valid": false,
                    "config_path": path_str,
                    "errors": error_strings,
                }));
            } else {
                formatter.error(&format!(
                    "Configuration has {} error{}:",
                    errors.len(),
                    if errors.len() == 1 { "" } else { "s" }
                ));
                formatter.info(&format!("File: {path_str}"));
                formatter.info("");
                for error in &errors {
                    formatter.info(&format!("  {} - {}", error.field, error.message));
                }
            }
        }
        ConfigStatus::Valid(config) => {
            if format.is_json() {
                formatter.print_json(&serde_json::json!({
                    "valid": true,
                    "config_path": path_str,
                    "mode": config.mode().to_string(),
                    "errors": [],
                }));
            } else {
                formatter.success("Configuration is valid");
                formatter.info(&format!("File: {path_str}"));
                formatter.info(&format!("Mode: {}", config.mode()));
            }
        }
    }

    Ok(())
}

fn execute_path(config_path: &Path, format: OutputFormat) -> Result<()> {
    if format.is_json() {
        get_formatter(format).print_json(&serde_json::json!({
            "config_path": config_path.display().to_string(),
            "exists": config_path.exists(),
        }));
    } else {
        println!("{}", config_path.display());
    }
    Ok(())
}
