//! # Application Configuration
//!
//! This module defines the configuration structure for the `agritrust-server`
//! and the logic for loading it from an optional `config.yml` file and
//! environment variables.

use agritrust::{FileKind, MetricsPolicy};
use config::{Config as ConfigBuilder, Environment, File, FileFormat};
use regex::Regex;
use serde::Deserialize;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;
use std::time::Duration;
use tracing::info;

static ENV_PLACEHOLDER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\$\{(?P<var>[A-Z0-9_]+)\}").expect("valid placeholder regex"));

/// A custom error type for configuration issues.
#[derive(Debug)]
pub enum ConfigError {
    /// Indicates an error from the underlying `config` crate.
    General(String),
    /// Indicates an explicitly requested configuration file was not found.
    NotFound(String),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::General(msg) => write!(f, "Configuration error: {msg}"),
            ConfigError::NotFound(msg) => write!(f, "{msg}"),
        }
    }
}

impl std::error::Error for ConfigError {}

impl From<config::ConfigError> for ConfigError {
    fn from(err: config::ConfigError) -> Self {
        ConfigError::General(err.to_string())
    }
}

/// Which metrics policy each extractor runs with.
#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum MetricsPolicySetting {
    /// JSON averages every tagged value; CSV, XLSX and PDF keep the first.
    #[default]
    PerFormat,
    KeepFirst,
    AverageAll,
}

impl MetricsPolicySetting {
    pub fn policy_for(self, kind: FileKind) -> MetricsPolicy {
        match self {
            MetricsPolicySetting::PerFormat => match kind {
                FileKind::Json => MetricsPolicy::AverageAll,
                FileKind::Csv | FileKind::Spreadsheet | FileKind::Pdf => MetricsPolicy::KeepFirst,
            },
            MetricsPolicySetting::KeepFirst => MetricsPolicy::KeepFirst,
            MetricsPolicySetting::AverageAll => MetricsPolicy::AverageAll,
        }
    }
}

/// Settings for the forward geocoding service.
#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct GeocoderConfig {
    pub base_url: String,
    /// Sent as the `User-Agent` header; Nominatim refuses anonymous clients.
    pub user_agent: String,
    pub timeout_secs: u64,
}

impl Default for GeocoderConfig {
    fn default() -> Self {
        Self {
            base_url: "https://nominatim.openstreetmap.org".to_string(),
            user_agent: "agritrust-server".to_string(),
            timeout_secs: 20,
        }
    }
}

impl GeocoderConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

/// Settings for the weather forecast service.
#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct WeatherConfig {
    pub base_url: String,
    pub timeout_secs: u64,
}

impl Default for WeatherConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.open-meteo.com".to_string(),
            timeout_secs: 20,
        }
    }
}

impl WeatherConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

/// The root configuration structure, mapping directly to `config.yml`.
///
/// Every field has a default, so the server starts without any file.
#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct AppConfig {
    /// The port for the server to listen on. Loaded from `PORT` env var.
    pub port: u16,
    /// The path to the SQLite database file. Loaded from `DB_URL` env var.
    pub db_url: String,
    /// Where uploaded files are stored. Loaded from `UPLOAD_DIR` env var.
    pub upload_dir: PathBuf,
    /// Request body limit on the upload routes.
    pub max_upload_bytes: usize,
    /// Absolute amounts at or below this count as small transactions.
    pub small_transaction_threshold: f64,
    pub metrics_policy: MetricsPolicySetting,
    pub geocoder: GeocoderConfig,
    pub weather: WeatherConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            port: 9090,
            db_url: "db/agritrust.db".to_string(),
            upload_dir: PathBuf::from("uploads"),
            max_upload_bytes: 16 * 1024 * 1024,
            small_transaction_threshold: agritrust::extract::DEFAULT_SMALL_TRANSACTION_THRESHOLD,
            metrics_policy: MetricsPolicySetting::default(),
            geocoder: GeocoderConfig::default(),
            weather: WeatherConfig::default(),
        }
    }
}

// Reads a file and substitutes `${VAR}` placeholders from the environment.
// Returns Ok(None) if the file does not exist.
fn read_and_substitute(path: &Path) -> Result<Option<String>, ConfigError> {
    if !path.exists() {
        return Ok(None);
    }

    let content = fs::read_to_string(path).map_err(|e| {
        ConfigError::General(format!(
            "Failed to read config file '{}': {e}",
            path.display()
        ))
    })?;

    let expanded_content = ENV_PLACEHOLDER.replace_all(&content, |caps: &regex::Captures| {
        env::var(&caps["var"]).unwrap_or_default()
    });

    Ok(Some(expanded_content.to_string()))
}

/// Loads the application configuration from a file and environment variables.
///
/// - Without an override, `config.yml` next to this crate's manifest is used
///   when present; its absence is not an error.
/// - An explicit `config_path_override` must exist.
/// - Top-level keys like `port` and `db_url` are overridden by `PORT` and `DB_URL`.
/// - Nested keys are overridden by `AGRITRUST_...` variables
///   (e.g., `AGRITRUST_GEOCODER__BASE_URL`).
pub fn get_config(config_path_override: Option<&str>) -> Result<AppConfig, ConfigError> {
    let mut builder = ConfigBuilder::builder();

    let main_content = match config_path_override {
        Some(override_path) => {
            let content = read_and_substitute(Path::new(override_path))?;
            Some(content.ok_or_else(|| {
                ConfigError::NotFound(format!("Config file not found at '{override_path}'."))
            })?)
        }
        None => {
            let user_config_path =
                Path::new(env!("CARGO_MANIFEST_DIR")).join("config.yml");
            let content = read_and_substitute(&user_config_path)?;
            if content.is_some() {
                info!(
                    "Loading user-defined configuration from '{}'.",
                    user_config_path.display()
                );
            }
            content
        }
    };
    if let Some(content) = main_content {
        builder = builder.add_source(File::from_str(&content, FileFormat::Yaml));
    }

    let settings = builder
        // Environment variables for top-level keys like PORT.
        .add_source(Environment::default())
        // Prefixed environment variables for nested overrides.
        .add_source(
            Environment::with_prefix("AGRITRUST")
                .prefix_separator("_")
                .try_parsing(true)
                .separator("__"),
        )
        .build()?;

    Ok(settings.try_deserialize()?)
}
