//! Configuration loading and resolution
//!
//! Priority order, highest first:
//! 1. Command-line argument
//! 2. Environment variable
//! 3. TOML config file
//! 4. Compiled default
//!
//! Tiers 1 and 2 arrive together as [`ConfigOverrides`] (the binary parses
//! them with clap). Resolution produces one immutable [`ServerConfig`] that is
//! handed to the HTTP adapter at startup.

use crate::{Error, Result};
use serde::Deserialize;
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;
use tracing::{info, warn};

pub const DEFAULT_HOST: &str = "127.0.0.1";
pub const DEFAULT_PORT: u16 = 5000;
pub const DEFAULT_GEMINI_MODEL: &str = "gemini-1.5-flash";
pub const DEFAULT_GEMINI_ENDPOINT: &str = "https://generativelanguage.googleapis.com/v1beta";
pub const DEFAULT_GEMINI_TIMEOUT_SECS: u64 = 30;
pub const DEFAULT_LOG_LEVEL: &str = "info";

/// Which fatigue scorer backs the endpoint
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScorerKind {
    /// Fixed threshold arithmetic
    #[default]
    Rules,
    /// Delegate to the Gemini text model
    Gemini,
}

impl ScorerKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ScorerKind::Rules => "rules",
            ScorerKind::Gemini => "gemini",
        }
    }
}

impl fmt::Display for ScorerKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ScorerKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "rules" => Ok(ScorerKind::Rules),
            "gemini" => Ok(ScorerKind::Gemini),
            other => Err(Error::Config(format!(
                "Unknown scorer '{}' (expected 'rules' or 'gemini')",
                other
            ))),
        }
    }
}

/// Bootstrap configuration loaded from TOML file
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TomlConfig {
    #[serde(default)]
    pub host: Option<String>,

    #[serde(default)]
    pub port: Option<u16>,

    #[serde(default)]
    pub scorer: Option<ScorerKind>,

    /// Allow cross-origin requests (default: true)
    #[serde(default)]
    pub cors: Option<bool>,

    #[serde(default)]
    pub gemini: GeminiSection,

    #[serde(default)]
    pub logging: LoggingConfig,
}

/// `[gemini]` table
#[derive(Debug, Clone, Default, Deserialize)]
pub struct GeminiSection {
    #[serde(default)]
    pub api_key: Option<String>,
    #[serde(default)]
    pub model: Option<String>,
    #[serde(default)]
    pub endpoint: Option<String>,
    #[serde(default)]
    pub timeout_secs: Option<u64>,
}

/// `[logging]` table
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

fn default_log_level() -> String {
    DEFAULT_LOG_LEVEL.to_string()
}

impl TomlConfig {
    /// Parse a TOML config file
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            Error::Config(format!("Failed to read config file {}: {}", path.display(), e))
        })?;
        Ok(toml::from_str(&content)?)
    }
}

/// Platform config file location: `<config_dir>/space-fatigue/config.toml`
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("space-fatigue").join("config.toml"))
}

/// Load the TOML tier.
///
/// An explicitly named file must exist. The platform default file is
/// optional; when absent, every TOML value is unset.
pub fn load_toml_config(explicit: Option<&Path>) -> Result<TomlConfig> {
    if let Some(path) = explicit {
        info!("Loading config file {}", path.display());
        return TomlConfig::load(path);
    }

    match default_config_path() {
        Some(path) if path.exists() => {
            info!("Loading config file {}", path.display());
            TomlConfig::load(&path)
        }
        _ => {
            info!("No config file found, using defaults");
            Ok(TomlConfig::default())
        }
    }
}

/// Values from command line and environment (highest priority)
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub host: Option<String>,
    pub port: Option<u16>,
    pub scorer: Option<ScorerKind>,
    pub gemini_api_key: Option<String>,
    pub gemini_model: Option<String>,
    pub cors: Option<bool>,
    pub log_level: Option<String>,
}

/// Settings for the Gemini client
#[derive(Clone, PartialEq)]
pub struct GeminiConfig {
    pub api_key: String,
    pub model: String,
    pub endpoint: String,
    pub timeout: Duration,
}

impl fmt::Debug for GeminiConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GeminiConfig")
            .field("api_key", &"<redacted>")
            .field("model", &self.model)
            .field("endpoint", &self.endpoint)
            .field("timeout", &self.timeout)
            .finish()
    }
}

/// Startup configuration passed into the HTTP adapter
#[derive(Debug, Clone, PartialEq)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub scorer: ScorerKind,
    pub cors: bool,
    pub log_level: String,
    /// Present whenever an API key is configured; required for [`ScorerKind::Gemini`]
    pub gemini: Option<GeminiConfig>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            scorer: ScorerKind::Rules,
            cors: true,
            log_level: default_log_level(),
            gemini: None,
        }
    }
}

impl ServerConfig {
    /// Merge overrides over the TOML tier over compiled defaults.
    ///
    /// Fails when the Gemini scorer is selected without an API key.
    pub fn resolve(overrides: ConfigOverrides, toml: TomlConfig) -> Result<Self> {
        let host = overrides
            .host
            .or(toml.host)
            .unwrap_or_else(|| DEFAULT_HOST.to_string());
        let port = overrides.port.or(toml.port).unwrap_or(DEFAULT_PORT);
        let scorer = overrides.scorer.or(toml.scorer).unwrap_or_default();
        let cors = overrides.cors.or(toml.cors).unwrap_or(true);
        let log_level = overrides.log_level.unwrap_or(toml.logging.level);

        let cli_key = overrides.gemini_api_key.filter(|k| is_valid_key(k));
        let toml_key = toml.gemini.api_key.filter(|k| is_valid_key(k));
        if cli_key.is_some() && toml_key.is_some() {
            warn!("Gemini API key found in both environment/command line and TOML. Using environment/command line.");
        }

        let gemini = cli_key.or(toml_key).map(|api_key| GeminiConfig {
            api_key: api_key.trim().to_string(),
            model: overrides
                .gemini_model
                .or(toml.gemini.model)
                .unwrap_or_else(|| DEFAULT_GEMINI_MODEL.to_string()),
            endpoint: toml
                .gemini
                .endpoint
                .unwrap_or_else(|| DEFAULT_GEMINI_ENDPOINT.to_string()),
            timeout: Duration::from_secs(
                toml.gemini.timeout_secs.unwrap_or(DEFAULT_GEMINI_TIMEOUT_SECS),
            ),
        });

        if scorer == ScorerKind::Gemini && gemini.is_none() {
            return Err(Error::Config(
                "Gemini API key not configured. Set it using one of:\n\
                 1. Command line: --gemini-api-key <key>\n\
                 2. Environment: GEMINI_API_KEY=<key> (a .env file is also read)\n\
                 3. TOML config: [gemini] api_key = \"<key>\""
                    .to_string(),
            ));
        }

        Ok(Self {
            host,
            port,
            scorer,
            cors,
            log_level,
            gemini,
        })
    }

    /// `host:port` for the TCP listener
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// `EnvFilter` directives applying `level` to the service crates and HTTP tracing
pub fn log_filter_directives(level: &str) -> String {
    format!("fatigue_server={level},fatigue_common={level},tower_http={level}")
}

/// Non-empty, non-whitespace
pub fn is_valid_key(key: &str) -> bool {
    !key.trim().is_empty()
}
