//! # Configuration Management
//!
//! Centralized configuration for session identifier decoration.
//!
//! This module provides structured configuration for the session cookie, the
//! route codec, duplicate-cookie recovery, the in-memory session directory and
//! logging.
//!
//! ## Configuration Sources
//! - TOML files via `from_file()`
//! - Direct instantiation with defaults
//! - Environment-specific overrides via `from_env()`
//!
//! ## Example
//! ```toml
//! [cookie]
//! name = "JSESSIONID"
//! path = "/"
//! secure = true
//! http_only = true
//!
//! [routing]
//! route = "node-1"
//! delimiter = "."
//!
//! [recovery]
//! ambiguity_recovery = true
//!
//! [directory]
//! max_entries = 10000
//! session_ttl = 1800000
//! ```

use crate::error::{Result, SessionError};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::Read;
use std::path::Path;
use std::time::Duration;
use tracing::Level;

/// Default session cookie name
pub const DEFAULT_COOKIE_NAME: &str = "JSESSIONID";

/// Default path parameter name used for URL rewriting
pub const DEFAULT_PATH_PARAMETER: &str = "jsessionid";

/// Default separator between plain identifier and route
pub const DEFAULT_ROUTE_DELIMITER: char = '.';

/// Default lifetime of a session in the in-memory directory (30 minutes)
pub const DEFAULT_SESSION_TTL: Duration = Duration::from_secs(30 * 60);

/// Default capacity of the in-memory directory
pub const DEFAULT_MAX_SESSIONS: usize = 10_000;

/// Main configuration structure that contains all configurable settings
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
pub struct SessionTierConfig {
    /// Session cookie settings
    #[serde(default)]
    pub cookie: CookieSettings,

    /// Route codec settings
    #[serde(default)]
    pub routing: RoutingSettings,

    /// Duplicate-cookie recovery settings
    #[serde(default)]
    pub recovery: RecoverySettings,

    /// In-memory session directory settings
    #[serde(default)]
    pub directory: DirectorySettings,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl SessionTierConfig {
    /// Load configuration from a TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let mut file = File::open(path)
            .map_err(|e| SessionError::ConfigError(format!("Failed to open config file: {e}")))?;

        let mut contents = String::new();
        file.read_to_string(&mut contents)
            .map_err(|e| SessionError::ConfigError(format!("Failed to read config file: {e}")))?;

        Self::from_toml(&contents)
    }

    /// Load configuration from TOML string
    pub fn from_toml(content: &str) -> Result<Self> {
        toml::from_str::<Self>(content)
            .map_err(|e| SessionError::ConfigError(format!("Failed to parse TOML: {e}")))
    }

    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        let mut config = Self::default();

        if let Ok(name) = std::env::var("ROUTED_SESSION_COOKIE_NAME") {
            config.cookie.name = name;
        }

        if let Ok(route) = std::env::var("ROUTED_SESSION_ROUTE") {
            config.routing.route = if route.is_empty() { None } else { Some(route) };
        }

        if let Ok(flag) = std::env::var("ROUTED_SESSION_AMBIGUITY_RECOVERY") {
            config.recovery.ambiguity_recovery = parse_flag(&flag).ok_or_else(|| {
                SessionError::ConfigError(format!(
                    "Invalid ROUTED_SESSION_AMBIGUITY_RECOVERY value: '{flag}'"
                ))
            })?;
        }

        if let Ok(ttl) = std::env::var("ROUTED_SESSION_TTL_MS") {
            if let Ok(val) = ttl.parse::<u64>() {
                config.directory.session_ttl = Duration::from_millis(val);
            }
        }

        Ok(config)
    }

    /// Apply overrides to the default configuration
    pub fn default_with_overrides<F>(mutator: F) -> Self
    where
        F: FnOnce(&mut Self),
    {
        let mut config = Self::default();
        mutator(&mut config);
        config
    }

    /// Generate example configuration file content
    pub fn example_config() -> String {
        toml::to_string_pretty(&Self::default())
            .unwrap_or_else(|_| String::from("# Failed to generate example config"))
    }

    /// Save configuration to a file
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let content = toml::to_string_pretty(self)
            .map_err(|e| SessionError::ConfigError(format!("Failed to serialize config: {e}")))?;

        std::fs::write(path, content)
            .map_err(|e| SessionError::ConfigError(format!("Failed to write config file: {e}")))?;

        Ok(())
    }

    /// Validate the configuration for common issues and misconfigurations
    ///
    /// Returns a list of validation errors. Empty list means configuration is valid.
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();

        errors.extend(self.cookie.validate());
        errors.extend(self.routing.validate());
        errors.extend(self.directory.validate());
        errors.extend(self.logging.validate());

        if self.recovery.ambiguity_recovery && self.cookie.name.is_empty() {
            errors.push("Ambiguity recovery requires a session cookie name".to_string());
        }

        errors
    }

    /// Validate and return Result - convenience method
    pub fn validate_strict(&self) -> Result<()> {
        let errors = self.validate();
        if errors.is_empty() {
            Ok(())
        } else {
            Err(SessionError::ConfigError(format!(
                "Configuration validation failed:\n  - {}",
                errors.join("\n  - ")
            )))
        }
    }
}

fn parse_flag(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

/// Session cookie settings
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct CookieSettings {
    /// Cookie name carrying the session identifier
    pub name: String,

    /// Path parameter name used when the identifier travels in the URL
    pub path_parameter: String,

    pub path: Option<String>,

    pub domain: Option<String>,

    pub secure: bool,

    pub http_only: bool,

    /// Cookie lifetime in seconds; `None` for a browser-session cookie
    pub max_age: Option<u64>,
}

impl Default for CookieSettings {
    fn default() -> Self {
        Self {
            name: String::from(DEFAULT_COOKIE_NAME),
            path_parameter: String::from(DEFAULT_PATH_PARAMETER),
            path: Some(String::from("/")),
            domain: None,
            secure: false,
            http_only: true,
            max_age: None,
        }
    }
}

impl CookieSettings {
    /// Validate cookie settings
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();

        if self.name.is_empty() {
            errors.push("Session cookie name cannot be empty".to_string());
        } else if !is_token(&self.name) {
            errors.push(format!(
                "Invalid session cookie name: '{}' (must be an HTTP token)",
                self.name
            ));
        }

        if self.path_parameter.is_empty() {
            errors.push("Path parameter name cannot be empty".to_string());
        } else if !is_token(&self.path_parameter) {
            errors.push(format!(
                "Invalid path parameter name: '{}' (must be an HTTP token)",
                self.path_parameter
            ));
        }

        if let Some(ref path) = self.path {
            if !path.starts_with('/') {
                errors.push(format!("Cookie path must start with '/': '{path}'"));
            }
        }

        if let Some(ref domain) = self.domain {
            if domain.is_empty() {
                errors.push("Cookie domain cannot be empty when set".to_string());
            }
        }

        if self.max_age == Some(0) {
            errors.push("Cookie max_age of 0 would discard every session cookie".to_string());
        }

        errors
    }
}

fn is_token(value: &str) -> bool {
    value
        .bytes()
        .all(|b| b.is_ascii_alphanumeric() || b"!#$%&'*+-.^_`|~".contains(&b))
}

/// Route codec settings
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct RoutingSettings {
    /// Route of this node, appended to encoded identifiers
    pub route: Option<String>,

    /// Separator between plain identifier and route
    pub delimiter: char,
}

impl Default for RoutingSettings {
    fn default() -> Self {
        Self {
            route: None,
            delimiter: DEFAULT_ROUTE_DELIMITER,
        }
    }
}

impl RoutingSettings {
    /// Validate routing settings
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();

        if self.delimiter.is_whitespace() || self.delimiter == ';' || self.delimiter == '=' {
            errors.push(format!(
                "Invalid route delimiter: '{}' (not allowed in cookie values)",
                self.delimiter
            ));
        }

        if let Some(ref route) = self.route {
            if route.contains(self.delimiter) {
                errors.push(format!(
                    "Route '{route}' contains the route delimiter '{}'",
                    self.delimiter
                ));
            }
            if route.len() > 64 {
                errors.push(format!(
                    "Route too long: {} characters (maximum: 64)",
                    route.len()
                ));
            }
        }

        errors
    }
}

/// Duplicate-cookie recovery settings
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct RecoverySettings {
    /// Validate decoded identifiers against the session directory and scan
    /// duplicate cookies when the primary one is unknown
    pub ambiguity_recovery: bool,
}

impl Default for RecoverySettings {
    fn default() -> Self {
        Self {
            ambiguity_recovery: true,
        }
    }
}

/// In-memory session directory settings
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct DirectorySettings {
    /// Maximum number of sessions held
    pub max_entries: usize,

    /// Lifetime of a registered session
    #[serde(with = "duration_serde")]
    pub session_ttl: Duration,
}

impl Default for DirectorySettings {
    fn default() -> Self {
        Self {
            max_entries: DEFAULT_MAX_SESSIONS,
            session_ttl: DEFAULT_SESSION_TTL,
        }
    }
}

impl DirectorySettings {
    /// Validate directory settings
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();

        if self.max_entries == 0 {
            errors.push("Directory max_entries must be greater than 0".to_string());
        } else if self.max_entries > 10_000_000 {
            errors.push(format!(
                "Directory max_entries very high: {} (maximum recommended: 10,000,000)",
                self.max_entries
            ));
        }

        if self.session_ttl.as_secs() < 1 {
            errors.push("Session TTL too short (minimum: 1s)".to_string());
        } else if self.session_ttl.as_secs() > 7 * 24 * 3600 {
            errors.push("Session TTL too long (maximum: 7 days)".to_string());
        }

        errors
    }
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Application name for logs
    pub app_name: String,

    /// Log level
    #[serde(with = "log_level_serde")]
    pub log_level: Level,

    /// Whether to log to console
    pub log_to_console: bool,

    /// Whether to use JSON formatting for logs
    pub json_format: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            app_name: String::from("routed-session"),
            log_level: Level::INFO,
            log_to_console: true,
            json_format: false,
        }
    }
}

impl LoggingConfig {
    /// Validate logging configuration
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();

        if self.app_name.is_empty() {
            errors.push("Application name cannot be empty".to_string());
        } else if self.app_name.len() > 64 {
            errors.push(format!(
                "Application name too long: {} characters (maximum: 64)",
                self.app_name.len()
            ));
        }

        errors
    }
}

/// Helper module for Duration serialization/deserialization
mod duration_serde {
    use serde::{Deserialize, Deserializer, Serialize, Serializer};
    use std::time::Duration;

    pub fn serialize<S>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let millis = duration.as_millis() as u64;
        millis.serialize(serializer)
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Duration, D::Error>
    where
        D: Deserializer<'de>,
    {
        let millis = u64::deserialize(deserializer)?;
        Ok(Duration::from_millis(millis))
    }
}

/// Helper module for tracing::Level serialization/deserialization
mod log_level_serde {
    use serde::{Deserialize, Deserializer, Serialize, Serializer};
    use std::str::FromStr;
    use tracing::Level;

    pub fn serialize<S>(level: &Level, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let level_str = match *level {
            Level::TRACE => "trace",
            Level::DEBUG => "debug",
            Level::INFO => "info",
            Level::WARN => "warn",
            Level::ERROR => "error",
        };
        level_str.serialize(serializer)
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Level, D::Error>
    where
        D: Deserializer<'de>,
    {
        let level_str = String::deserialize(deserializer)?;
        Level::from_str(&level_str)
            .map_err(|_| serde::de::Error::custom(format!("Invalid log level: {level_str}")))
    }
}
