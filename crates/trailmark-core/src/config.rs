//! Configuration module for Trailmark.
//!
//! Provides typed configuration structs that map to the YAML configuration file,
//! with loading, validation, defaults, and a builder pattern for programmatic use.

use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use url::Url;

use crate::domain::{DomainError, OperatingMode, Severity};

/// Default Application Insights style ingestion endpoint.
pub const DEFAULT_TELEMETRY_ENDPOINT: &str = "https://dc.services.visualstudio.com/v2/track";

// ---------------------------------------------------------------------------
// Config struct with sub-sections
// ---------------------------------------------------------------------------

/// Top-level configuration for Trailmark.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub crash_reporting: CrashReportingConfig,
    pub telemetry: TelemetryConfig,
    pub logging: LoggingConfig,
    pub identity: IdentityConfig,
    pub scrubbing: ScrubbingConfig,
}

/// Crash-reporting backend settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CrashReportingConfig {
    /// Service credential (DSN). `None` selects debug mode.
    pub dsn: Option<String>,
    /// Release tag attached to every event. Defaults to the package version.
    pub release: Option<String>,
    /// Environment tag (`production`, `staging`, ...).
    pub environment: String,
    /// Capacity of the breadcrumb trail.
    pub max_breadcrumbs: usize,
}

/// Application-telemetry backend settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TelemetryConfig {
    /// Instrumentation key. `None` selects the local logging sink.
    pub instrumentation_key: Option<String>,
    /// Ingestion endpoint receiving JSON envelope batches.
    pub endpoint: String,
    /// Capacity of the channel between callers and the worker task.
    pub channel_capacity: usize,
    /// Buffered envelopes that trigger an early submission.
    pub max_batch_size: usize,
    /// Seconds between periodic submissions.
    pub flush_interval_secs: u64,
    /// Upper bound on the shutdown flush, in milliseconds.
    pub shutdown_grace_ms: u64,
}

/// Logging settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Minimum severity: `debug`, `info`, `warn`, `error`, or `fatal`.
    pub level: String,
}

/// Backend holding the per-installation identity record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StoreKind {
    /// OS credential store (Secret Service, Keychain, Credential Manager)
    Keyring,
    /// JSON file in the user's data directory
    File,
    /// Process memory; a new identity per run
    Memory,
}

impl FromStr for StoreKind {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "keyring" => Ok(StoreKind::Keyring),
            "file" => Ok(StoreKind::File),
            "memory" => Ok(StoreKind::Memory),
            other => Err(DomainError::InvalidStoreKind(other.to_string())),
        }
    }
}

/// Identity store settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct IdentityConfig {
    pub store: StoreKind,
    /// Location of the file store. Defaults to `$XDG_DATA_HOME/trailmark/identity.json`.
    pub file_path: Option<PathBuf>,
    /// Service name used for keyring entries.
    pub keyring_service: String,
}

/// PII scrubbing applied to crash-reporter messages.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScrubbingConfig {
    pub strip_paths: bool,
    pub strip_usernames: bool,
}

// ---------------------------------------------------------------------------
// Config::load()
// ---------------------------------------------------------------------------

impl Config {
    /// Load configuration from a YAML file at `path`.
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = serde_yaml::from_str(&content)?;
        Ok(config)
    }

    /// Try to load from `path`; fall back to [`Config::default`] on any error.
    pub fn load_or_default(path: &Path) -> Self {
        Self::load(path).unwrap_or_default()
    }

    /// Platform-appropriate default path for the configuration file.
    ///
    /// Typically `$XDG_CONFIG_HOME/trailmark/config.yaml` on Linux.
    pub fn default_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("~/.config"))
            .join("trailmark")
            .join("config.yaml")
    }

    /// Operating mode implied by the crash-reporting credential.
    pub fn mode(&self) -> OperatingMode {
        OperatingMode::from_credential(self.crash_reporting.dsn.as_deref())
    }
}

impl CrashReportingConfig {
    /// Release tag, falling back to the package version.
    pub fn release_or_default(&self) -> String {
        self.release
            .clone()
            .unwrap_or_else(|| env!("CARGO_PKG_VERSION").to_string())
    }
}

impl TelemetryConfig {
    pub fn flush_interval(&self) -> Duration {
        Duration::from_secs(self.flush_interval_secs)
    }

    pub fn shutdown_grace(&self) -> Duration {
        Duration::from_millis(self.shutdown_grace_ms)
    }
}

impl LoggingConfig {
    /// Parsed minimum severity.
    pub fn severity(&self) -> Result<Severity, DomainError> {
        self.level.parse()
    }
}

impl IdentityConfig {
    /// File store location, resolving the platform default.
    pub fn file_path_or_default(&self) -> PathBuf {
        self.file_path.clone().unwrap_or_else(|| {
            dirs::data_local_dir()
                .unwrap_or_else(|| PathBuf::from("~/.local/share"))
                .join("trailmark")
                .join("identity.json")
        })
    }
}

// ---------------------------------------------------------------------------
// Config::default()
// ---------------------------------------------------------------------------

// Config derives Default because all its fields implement Default.

impl Default for CrashReportingConfig {
    fn default() -> Self {
        Self {
            dsn: None,
            release: None,
            environment: "production".to_string(),
            max_breadcrumbs: 100,
        }
    }
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            instrumentation_key: None,
            endpoint: DEFAULT_TELEMETRY_ENDPOINT.to_string(),
            channel_capacity: 256,
            max_batch_size: 64,
            flush_interval_secs: 30,
            shutdown_grace_ms: 1000,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

impl Default for IdentityConfig {
    fn default() -> Self {
        Self {
            store: StoreKind::Keyring,
            file_path: None,
            keyring_service: "trailmark".to_string(),
        }
    }
}

impl Default for ScrubbingConfig {
    fn default() -> Self {
        Self {
            strip_paths: true,
            strip_usernames: true,
        }
    }
}

// ---------------------------------------------------------------------------
// Config::validate()
// ---------------------------------------------------------------------------

/// A single validation error found in the configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    /// Dotted path to the offending field, e.g. `"telemetry.endpoint"`.
    pub field: String,
    /// Human-readable explanation.
    pub message: String,
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Valid values for `logging.level`.
const VALID_LOG_LEVELS: &[&str] = &["debug", "info", "warn", "error", "fatal"];

/// Upper bound for `telemetry.shutdown_grace_ms`.
const MAX_SHUTDOWN_GRACE_MS: u64 = 30_000;

fn is_set(value: &Option<String>) -> bool {
    value.as_deref().is_some_and(|v| !v.trim().is_empty())
}

/// Checks the `scheme://public_key@host/project_id` shape of a DSN.
fn check_dsn(dsn: &str) -> Result<(), String> {
    let url = Url::parse(dsn).map_err(|e| format!("not a valid URL: {e}"))?;
    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(format!("unsupported scheme '{}'", url.scheme()));
    }
    if url.username().is_empty() {
        return Err("missing public key".to_string());
    }
    if url.host_str().is_none() {
        return Err("missing host".to_string());
    }
    let project = url
        .path_segments()
        .and_then(|mut segments| segments.next_back())
        .unwrap_or_default();
    if project.is_empty() {
        return Err("missing project id".to_string());
    }
    Ok(())
}

impl Config {
    /// Validate the configuration and return all errors found.
    ///
    /// An empty vector means the configuration is valid.
    pub fn validate(&self) -> Vec<ValidationError> {
        let mut errors = Vec::new();

        // --- crash_reporting ---
        if let Some(dsn) = self.crash_reporting.dsn.as_deref().filter(|d| !d.trim().is_empty()) {
            if let Err(message) = check_dsn(dsn) {
                errors.push(ValidationError {
                    field: "crash_reporting.dsn".into(),
                    message,
                });
            }
        }
        if self.crash_reporting.max_breadcrumbs == 0 {
            errors.push(ValidationError {
                field: "crash_reporting.max_breadcrumbs".into(),
                message: "must be greater than 0".into(),
            });
        }
        if self.crash_reporting.environment.trim().is_empty() {
            errors.push(ValidationError {
                field: "crash_reporting.environment".into(),
                message: "must not be empty".into(),
            });
        }

        // Both credentials drive one mode decision; a half-configured pair
        // would let the crash reporter and analytics sink disagree.
        let has_dsn = is_set(&self.crash_reporting.dsn);
        let has_key = is_set(&self.telemetry.instrumentation_key);
        if has_dsn != has_key {
            let (field, missing) = if has_dsn {
                ("telemetry.instrumentation_key", "crash_reporting.dsn")
            } else {
                ("crash_reporting.dsn", "telemetry.instrumentation_key")
            };
            errors.push(ValidationError {
                field: field.into(),
                message: format!("must be set together with {missing}"),
            });
        }

        // --- telemetry ---
        match Url::parse(&self.telemetry.endpoint) {
            Ok(url) if url.scheme() == "http" || url.scheme() == "https" => {}
            Ok(url) => errors.push(ValidationError {
                field: "telemetry.endpoint".into(),
                message: format!("unsupported scheme '{}'", url.scheme()),
            }),
            Err(e) => errors.push(ValidationError {
                field: "telemetry.endpoint".into(),
                message: format!("not a valid URL: {e}"),
            }),
        }
        if self.telemetry.channel_capacity == 0 {
            errors.push(ValidationError {
                field: "telemetry.channel_capacity".into(),
                message: "must be greater than 0".into(),
            });
        }
        if self.telemetry.max_batch_size == 0 {
            errors.push(ValidationError {
                field: "telemetry.max_batch_size".into(),
                message: "must be greater than 0".into(),
            });
        }
        if self.telemetry.flush_interval_secs == 0 {
            errors.push(ValidationError {
                field: "telemetry.flush_interval_secs".into(),
                message: "must be greater than 0".into(),
            });
        }
        if self.telemetry.shutdown_grace_ms == 0
            || self.telemetry.shutdown_grace_ms > MAX_SHUTDOWN_GRACE_MS
        {
            errors.push(ValidationError {
                field: "telemetry.shutdown_grace_ms".into(),
                message: format!("must be in range 1..={MAX_SHUTDOWN_GRACE_MS}"),
            });
        }

        // --- logging ---
        if !VALID_LOG_LEVELS.contains(&self.logging.level.as_str()) {
            errors.push(ValidationError {
                field: "logging.level".into(),
                message: format!(
                    "invalid level '{}'; valid options: {}",
                    self.logging.level,
                    VALID_LOG_LEVELS.join(", ")
                ),
            });
        }

        // --- identity ---
        if self.identity.store == StoreKind::Keyring
            && self.identity.keyring_service.trim().is_empty()
        {
            errors.push(ValidationError {
                field: "identity.keyring_service".into(),
                message: "must not be empty when store is 'keyring'".into(),
            });
        }

        errors
    }
}

// ---------------------------------------------------------------------------
// ConfigBuilder
// ---------------------------------------------------------------------------

/// Builder for constructing a [`Config`] programmatically.
///
/// Starts from [`Config::default`] and allows selective overrides.
///
/// # Example
///
/// ```rust
/// use trailmark_core::config::{ConfigBuilder, StoreKind};
///
/// let config = ConfigBuilder::new()
///     .logging_level("debug")
///     .identity_store(StoreKind::Memory)
///     .build();
/// assert!(config.mode().is_debug());
/// ```
#[derive(Debug, Clone)]
pub struct ConfigBuilder {
    config: Config,
}

impl ConfigBuilder {
    /// Create a new builder initialised with [`Config::default`] values.
    pub fn new() -> Self {
        Self {
            config: Config::default(),
        }
    }

    // --- crash_reporting ---

    pub fn crash_dsn(mut self, dsn: impl Into<String>) -> Self {
        self.config.crash_reporting.dsn = Some(dsn.into());
        self
    }

    pub fn crash_release(mut self, release: impl Into<String>) -> Self {
        self.config.crash_reporting.release = Some(release.into());
        self
    }

    pub fn crash_environment(mut self, environment: impl Into<String>) -> Self {
        self.config.crash_reporting.environment = environment.into();
        self
    }

    pub fn crash_max_breadcrumbs(mut self, n: usize) -> Self {
        self.config.crash_reporting.max_breadcrumbs = n;
        self
    }

    // --- telemetry ---

    pub fn telemetry_instrumentation_key(mut self, key: impl Into<String>) -> Self {
        self.config.telemetry.instrumentation_key = Some(key.into());
        self
    }

    pub fn telemetry_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.config.telemetry.endpoint = endpoint.into();
        self
    }

    pub fn telemetry_channel_capacity(mut self, n: usize) -> Self {
        self.config.telemetry.channel_capacity = n;
        self
    }

    pub fn telemetry_max_batch_size(mut self, n: usize) -> Self {
        self.config.telemetry.max_batch_size = n;
        self
    }

    pub fn telemetry_flush_interval_secs(mut self, seconds: u64) -> Self {
        self.config.telemetry.flush_interval_secs = seconds;
        self
    }

    pub fn telemetry_shutdown_grace_ms(mut self, ms: u64) -> Self {
        self.config.telemetry.shutdown_grace_ms = ms;
        self
    }

    // --- logging ---

    pub fn logging_level(mut self, level: impl Into<String>) -> Self {
        self.config.logging.level = level.into();
        self
    }

    // --- identity ---

    pub fn identity_store(mut self, store: StoreKind) -> Self {
        self.config.identity.store = store;
        self
    }

    pub fn identity_file_path(mut self, path: PathBuf) -> Self {
        self.config.identity.file_path = Some(path);
        self
    }

    pub fn identity_keyring_service(mut self, service: impl Into<String>) -> Self {
        self.config.identity.keyring_service = service.into();
        self
    }

    // --- scrubbing ---

    pub fn scrub_paths(mut self, enabled: bool) -> Self {
        self.config.scrubbing.strip_paths = enabled;
        self
    }

    pub fn scrub_usernames(mut self, enabled: bool) -> Self {
        self.config.scrubbing.strip_usernames = enabled;
        self
    }

    // --- build ---

    /// Consume the builder and return the finished [`Config`].
    pub fn build(self) -> Config {
        self.config
    }

    /// Build and validate in one step. Returns `Err` with the list of
    /// validation errors if the configuration is invalid.
    pub fn build_validated(self) -> Result<Config, Vec<ValidationError>> {
        let config = self.build();
        let errors = config.validate();
        if errors.is_empty() {
            Ok(config)
        } else {
            Err(errors)
        }
    }
}

impl Default for ConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    const DSN: &str = "https://public@o0.ingest.example.io/42";

    // -- Defaults --

    #[test]
    fn default_config_has_sensible_values() {
        let cfg = Config::default();
        assert!(cfg.crash_reporting.dsn.is_none());
        assert_eq!(cfg.crash_reporting.environment, "production");
        assert_eq!(cfg.crash_reporting.max_breadcrumbs, 100);
        assert!(cfg.telemetry.instrumentation_key.is_none());
        assert_eq!(cfg.telemetry.endpoint, DEFAULT_TELEMETRY_ENDPOINT);
        assert_eq!(cfg.telemetry.channel_capacity, 256);
        assert_eq!(cfg.telemetry.max_batch_size, 64);
        assert_eq!(cfg.telemetry.flush_interval(), Duration::from_secs(30));
        assert_eq!(cfg.telemetry.shutdown_grace(), Duration::from_millis(1000));
        assert_eq!(cfg.logging.level, "info");
        assert_eq!(cfg.identity.store, StoreKind::Keyring);
        assert_eq!(cfg.identity.keyring_service, "trailmark");
        assert!(cfg.scrubbing.strip_paths);
        assert!(cfg.scrubbing.strip_usernames);
    }

    #[test]
    fn default_config_passes_validation_and_is_debug() {
        let cfg = Config::default();
        let errors = cfg.validate();
        assert!(errors.is_empty(), "unexpected validation errors: {errors:?}");
        assert_eq!(cfg.mode(), OperatingMode::Debug);
    }

    #[test]
    fn release_defaults_to_package_version() {
        let cfg = Config::default();
        assert_eq!(
            cfg.crash_reporting.release_or_default(),
            env!("CARGO_PKG_VERSION")
        );
    }

    // -- Loading --

    #[test]
    fn load_from_yaml_file() {
        let yaml = r#"
crash_reporting:
  dsn: https://public@o0.ingest.example.io/42
  release: "2.3.1"
  environment: staging
  max_breadcrumbs: 50
telemetry:
  instrumentation_key: 00000000-0000-0000-0000-000000000000
  endpoint: http://127.0.0.1:9000/v2/track
  channel_capacity: 16
  max_batch_size: 8
  flush_interval_secs: 5
  shutdown_grace_ms: 250
logging:
  level: warn
identity:
  store: file
  file_path: /tmp/trailmark-identity.json
scrubbing:
  strip_paths: false
  strip_usernames: true
"#;
        let mut tmp = tempfile::NamedTempFile::new().expect("create temp file");
        tmp.write_all(yaml.as_bytes()).unwrap();
        tmp.flush().unwrap();

        let cfg = Config::load(tmp.path()).expect("load config");
        assert_eq!(cfg.crash_reporting.dsn.as_deref(), Some(DSN));
        assert_eq!(cfg.crash_reporting.release_or_default(), "2.3.1");
        assert_eq!(cfg.crash_reporting.environment, "staging");
        assert_eq!(cfg.crash_reporting.max_breadcrumbs, 50);
        assert_eq!(cfg.telemetry.endpoint, "http://127.0.0.1:9000/v2/track");
        assert_eq!(cfg.telemetry.channel_capacity, 16);
        assert_eq!(cfg.telemetry.shutdown_grace_ms, 250);
        assert_eq!(cfg.logging.severity().unwrap(), Severity::Warn);
        assert_eq!(cfg.identity.store, StoreKind::File);
        assert_eq!(
            cfg.identity.file_path_or_default(),
            PathBuf::from("/tmp/trailmark-identity.json")
        );
        // Unspecified fields keep their defaults
        assert_eq!(cfg.identity.keyring_service, "trailmark");
        assert!(!cfg.scrubbing.strip_paths);
        assert_eq!(cfg.mode(), OperatingMode::Production);
        assert!(cfg.validate().is_empty());
    }

    #[test]
    fn load_partial_yaml_uses_defaults() {
        let mut tmp = tempfile::NamedTempFile::new().expect("create temp file");
        tmp.write_all(b"logging:\n  level: debug\n").unwrap();
        tmp.flush().unwrap();

        let cfg = Config::load(tmp.path()).expect("load config");
        assert_eq!(cfg.logging.level, "debug");
        assert_eq!(cfg.telemetry.channel_capacity, 256);
        assert!(cfg.mode().is_debug());
    }

    #[test]
    fn load_or_default_returns_default_on_missing_file() {
        let cfg = Config::load_or_default(Path::new("/nonexistent/config.yaml"));
        assert_eq!(cfg, Config::default());
    }

    #[test]
    fn load_returns_error_on_invalid_yaml() {
        let mut tmp = tempfile::NamedTempFile::new().expect("create temp file");
        tmp.write_all(b"not: [valid: yaml: {{{").unwrap();
        tmp.flush().unwrap();

        assert!(Config::load(tmp.path()).is_err());
    }

    // -- Validation --

    #[test]
    fn validate_catches_bad_dsn() {
        let cfg = ConfigBuilder::new()
            .crash_dsn("not a url")
            .telemetry_instrumentation_key("key")
            .build();
        let errors = cfg.validate();
        assert!(errors.iter().any(|e| e.field == "crash_reporting.dsn"));

        let cfg = ConfigBuilder::new()
            .crash_dsn("https://o0.ingest.example.io/42")
            .telemetry_instrumentation_key("key")
            .build();
        let errors = cfg.validate();
        assert!(errors
            .iter()
            .any(|e| e.field == "crash_reporting.dsn" && e.message.contains("public key")));
    }

    #[test]
    fn validate_rejects_half_configured_credentials() {
        let cfg = ConfigBuilder::new().crash_dsn(DSN).build();
        let errors = cfg.validate();
        assert!(errors
            .iter()
            .any(|e| e.field == "telemetry.instrumentation_key"));

        let cfg = ConfigBuilder::new()
            .telemetry_instrumentation_key("key")
            .build();
        let errors = cfg.validate();
        assert!(errors.iter().any(|e| e.field == "crash_reporting.dsn"));
    }

    #[test]
    fn validate_accepts_both_credentials() {
        let cfg = ConfigBuilder::new()
            .crash_dsn(DSN)
            .telemetry_instrumentation_key("key")
            .build_validated()
            .expect("valid config");
        assert_eq!(cfg.mode(), OperatingMode::Production);
    }

    #[test]
    fn validate_catches_unknown_log_level() {
        let cfg = ConfigBuilder::new().logging_level("verbose").build();
        let errors = cfg.validate();
        assert!(errors.iter().any(|e| e.field == "logging.level"));
        assert!(cfg.logging.severity().is_err());
    }

    #[test]
    fn validate_catches_zero_values() {
        let cfg = ConfigBuilder::new()
            .crash_max_breadcrumbs(0)
            .telemetry_channel_capacity(0)
            .telemetry_max_batch_size(0)
            .telemetry_flush_interval_secs(0)
            .telemetry_shutdown_grace_ms(0)
            .build();
        let fields: Vec<String> = cfg.validate().into_iter().map(|e| e.field).collect();
        assert!(fields.contains(&"crash_reporting.max_breadcrumbs".to_string()));
        assert!(fields.contains(&"telemetry.channel_capacity".to_string()));
        assert!(fields.contains(&"telemetry.max_batch_size".to_string()));
        assert!(fields.contains(&"telemetry.flush_interval_secs".to_string()));
        assert!(fields.contains(&"telemetry.shutdown_grace_ms".to_string()));
    }

    #[test]
    fn validate_catches_bad_endpoint() {
        let cfg = ConfigBuilder::new().telemetry_endpoint("ftp://example.com").build();
        assert!(cfg.validate().iter().any(|e| e.field == "telemetry.endpoint"));

        let cfg = ConfigBuilder::new().telemetry_endpoint("::::").build();
        assert!(cfg.validate().iter().any(|e| e.field == "telemetry.endpoint"));
    }

    #[test]
    fn validate_catches_empty_keyring_service() {
        let cfg = ConfigBuilder::new().identity_keyring_service("").build();
        assert!(cfg
            .validate()
            .iter()
            .any(|e| e.field == "identity.keyring_service"));

        let cfg = ConfigBuilder::new()
            .identity_keyring_service("")
            .identity_store(StoreKind::Memory)
            .build();
        assert!(cfg.validate().is_empty());
    }

    #[test]
    fn store_kind_parses() {
        assert_eq!("keyring".parse::<StoreKind>().unwrap(), StoreKind::Keyring);
        assert_eq!("file".parse::<StoreKind>().unwrap(), StoreKind::File);
        assert_eq!("memory".parse::<StoreKind>().unwrap(), StoreKind::Memory);
        assert!("vault".parse::<StoreKind>().is_err());
    }

    #[test]
    fn validation_error_display() {
        let err = ValidationError {
            field: "logging.level".into(),
            message: "bad".into(),
        };
        assert_eq!(err.to_string(), "logging.level: bad");
    }
}
