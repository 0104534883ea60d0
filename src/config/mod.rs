//! Configuration management for login-guard
//!
//! This module handles loading, parsing, and validating application
//! configuration from YAML files and environment variables.

use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

/// Main application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Config {
    /// HTTP server configuration
    #[serde(default)]
    pub server: ServerConfig,

    /// Authentication configuration
    #[serde(default)]
    pub auth: AuthConfig,

    /// Login rate limiting configuration
    #[serde(default)]
    pub rate_limit: RateLimitConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Config {
    /// Load configuration from a YAML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path.as_ref())
            .map_err(|e| ConfigError::FileRead(format!("Failed to read config file: {}", e)))?;
        Self::from_yaml(&content)
    }

    /// Parse configuration from a YAML string
    pub fn from_yaml(yaml: &str) -> Result<Self, ConfigError> {
        // First, expand environment variables in the YAML string
        let expanded = expand_env_vars(yaml);
        serde_yaml::from_str(&expanded)
            .map_err(|e| ConfigError::Parse(format!("Failed to parse YAML: {}", e)))
    }

    /// Load configuration from environment variables with prefix LOGIN_GUARD_
    pub fn from_env() -> Result<Self, ConfigError> {
        let mut config = Config::default();

        // Server config from env
        if let Ok(host) = std::env::var("LOGIN_GUARD_SERVER_HOST") {
            config.server.host = host;
        }
        if let Ok(port) = std::env::var("LOGIN_GUARD_SERVER_PORT") {
            config.server.port = port
                .parse()
                .map_err(|_| ConfigError::Parse("Invalid port number".to_string()))?;
        }

        // Auth config from env
        if let Ok(work_factor) = std::env::var("LOGIN_GUARD_AUTH_HASH_WORK_FACTOR") {
            config.auth.hash_work_factor = work_factor
                .parse()
                .map_err(|_| ConfigError::Parse("Invalid hash work factor".to_string()))?;
        }

        // Rate limit config from env
        if let Ok(capacity) = std::env::var("LOGIN_GUARD_RATE_LIMIT_CAPACITY") {
            config.rate_limit.capacity = capacity
                .parse()
                .map_err(|_| ConfigError::Parse("Invalid rate limit capacity".to_string()))?;
        }
        if let Ok(rate) = std::env::var("LOGIN_GUARD_RATE_LIMIT_REFILL_RATE") {
            config.rate_limit.refill_rate = rate
                .parse()
                .map_err(|_| ConfigError::Parse("Invalid refill rate".to_string()))?;
        }
        if let Ok(period) = std::env::var("LOGIN_GUARD_RATE_LIMIT_REFILL_PERIOD") {
            config.rate_limit.refill_period = period
                .parse()
                .map_err(|_| ConfigError::Parse("Invalid refill period".to_string()))?;
        }
        if let Ok(unit) = std::env::var("LOGIN_GUARD_RATE_LIMIT_REFILL_UNIT") {
            config.rate_limit.refill_unit = unit
                .parse()
                .map_err(|_| ConfigError::InvalidValue(format!("Unknown refill unit: {}", unit)))?;
        }

        Ok(config)
    }

    /// Validate configuration values that serde cannot enforce
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.rate_limit.capacity == 0 {
            return Err(ConfigError::InvalidValue(
                "rate_limit.capacity must be at least 1".to_string(),
            ));
        }
        if self.rate_limit.refill_rate == 0 {
            return Err(ConfigError::InvalidValue(
                "rate_limit.refill_rate must be at least 1".to_string(),
            ));
        }
        if self.rate_limit.refill_period == 0 {
            return Err(ConfigError::InvalidValue(
                "rate_limit.refill_period must be at least 1".to_string(),
            ));
        }
        if self.auth.hash_work_factor == 0 {
            return Err(ConfigError::InvalidValue(
                "auth.hash_work_factor must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

/// HTTP server configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ServerConfig {
    /// Host address to bind to
    #[serde(default = "default_host")]
    pub host: String,

    /// Port to listen on
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

/// Authentication configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AuthConfig {
    /// Argon2 work factor (iteration count) for password hashing
    #[serde(default = "default_hash_work_factor")]
    pub hash_work_factor: u32,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            hash_work_factor: default_hash_work_factor(),
        }
    }
}

fn default_hash_work_factor() -> u32 {
    2
}

/// Token bucket rate limiting configuration for the login endpoint
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RateLimitConfig {
    /// Maximum number of tokens a bucket can hold (burst size)
    #[serde(default = "default_capacity")]
    pub capacity: u64,

    /// Number of tokens added per refill period
    #[serde(default = "default_refill_rate")]
    pub refill_rate: u64,

    /// Length of the refill period, in `refill_unit` units
    #[serde(default = "default_refill_period")]
    pub refill_period: u64,

    /// Time unit for the refill period
    #[serde(default)]
    pub refill_unit: RefillUnit,
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            capacity: default_capacity(),
            refill_rate: default_refill_rate(),
            refill_period: default_refill_period(),
            refill_unit: RefillUnit::default(),
        }
    }
}

impl RateLimitConfig {
    /// Refill period as a `Duration`
    pub fn period(&self) -> Duration {
        match self.refill_unit {
            RefillUnit::Seconds => Duration::from_secs(self.refill_period),
            RefillUnit::Minutes => Duration::from_secs(self.refill_period * 60),
            RefillUnit::Hours => Duration::from_secs(self.refill_period * 3600),
        }
    }
}

fn default_capacity() -> u64 {
    5
}

fn default_refill_rate() -> u64 {
    5
}

fn default_refill_period() -> u64 {
    1
}

/// Time unit for the token bucket refill period
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "UPPERCASE")]
pub enum RefillUnit {
    /// Seconds
    Seconds,
    /// Minutes
    #[default]
    Minutes,
    /// Hours
    Hours,
}

impl std::str::FromStr for RefillUnit {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "SECONDS" => Ok(RefillUnit::Seconds),
            "MINUTES" => Ok(RefillUnit::Minutes),
            "HOURS" => Ok(RefillUnit::Hours),
            other => Err(ConfigError::InvalidValue(format!(
                "Unknown refill unit: {}",
                other
            ))),
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LoggingConfig {
    /// Log level
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Log format
    #[serde(default = "default_log_format")]
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "json".to_string()
}

/// Configuration error types
#[derive(Debug, thiserror::Error, Clone, PartialEq)]
pub enum ConfigError {
    /// Error reading configuration file
    #[error("Failed to read configuration file: {0}")]
    FileRead(String),

    /// Error parsing configuration
    #[error("Failed to parse configuration: {0}")]
    Parse(String),

    /// Invalid configuration value
    #[error("Invalid configuration value: {0}")]
    InvalidValue(String),
}

/// Expand environment variables in a string
///
/// Supports `${VAR_NAME}` syntax
fn expand_env_vars(input: &str) -> String {
    let re = regex_lite::Regex::new(r"\$\{([^}]+)\}")
        .expect("Invalid regex pattern for environment variable expansion");

    re.replace_all(input, |caps: &regex_lite::Captures| {
        let var_name = &caps[1];
        std::env::var(var_name).unwrap_or_else(|_| caps[0].to_string())
    })
    .into_owned()
}
