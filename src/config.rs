//! Configuration management for the application
use crate::core::types::is_valid_domain;
use crate::query::dates::{EvalZone, ZoneParseError};
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

/// Configuration errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to load configuration: {0}")]
    LoadError(String),

    #[error("Missing required configuration: {0}")]
    MissingConfig(String),

    #[error("Invalid configuration value: {0}")]
    InvalidValue(String),
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Logging format: "json" or "text"
    pub format: String,
    /// Default log level if no RUST_LOG is set
    pub default_level: String,
    /// Custom filter for dependency logs
    pub dependency_filter: Option<String>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            format: "text".to_string(),
            default_level: "warn".to_string(),
            dependency_filter: Some("rayon=warn".to_string()),
        }
    }
}

/// Application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Domain appended to bare participant names in `creator:`/`with:`
    pub local_domain: String,
    /// Zone in which `from:`/`to:` dates are interpreted
    pub time_zone: String,
    /// Query used when none is given
    pub default_query: String,
    pub logging: LoggingConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            local_domain: "example.com".to_string(),
            time_zone: "utc".to_string(),
            default_query: "in:inbox".to_string(),
            logging: LoggingConfig::default(),
        }
    }
}

impl Config {
    /// Load configuration from environment variables and optional config file
    pub fn load() -> Result<Self, ConfigError> {
        // Load .env file if it exists
        let _ = dotenvy::dotenv().ok();

        let mut figment = Figment::new().merge(Serialized::defaults(Config::default()));

        // The config file is located through the environment, before the
        // environment itself is merged so that variables override the file
        if let Some(config_path) = std::env::var_os("WAVE_SEARCH_CONFIG") {
            if let Some(path_str) = config_path.to_str() {
                let path = Path::new(path_str);
                if path.exists() {
                    figment = figment.merge(Toml::file(path));
                }
            }
        }

        figment = figment.merge(Env::prefixed("WAVE_SEARCH_").split("__").ignore(&["config"]));

        figment.extract().map_err(|e| ConfigError::LoadError(e.to_string()))
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.local_domain.is_empty() {
            return Err(ConfigError::MissingConfig("Local domain is required".to_string()));
        }
        if !is_valid_domain(&self.local_domain.to_lowercase()) {
            return Err(ConfigError::InvalidValue(format!(
                "local_domain '{}' is not a valid domain",
                self.local_domain
            )));
        }

        self.eval_zone()?;

        match self.logging.format.as_str() {
            "text" | "json" => Ok(()),
            other => Err(ConfigError::InvalidValue(format!(
                "logging.format must be 'text' or 'json', got '{}'",
                other
            ))),
        }
    }

    /// The configured evaluation zone
    pub fn eval_zone(&self) -> Result<EvalZone, ConfigError> {
        self.time_zone.parse().map_err(|e: ZoneParseError| ConfigError::InvalidValue(e.to_string()))
    }
}
