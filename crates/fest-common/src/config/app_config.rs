//! Application configuration structs
//!
//! Loads configuration from environment variables (and a `.env` file if present).

use serde::Deserialize;
use std::env;
use std::time::Duration;

use fest_core::{Credential, DEFAULT_COMMENT_MAX_LENGTH};

/// Main application configuration
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub app: AppSettings,
    pub api: ApiConfig,
    pub realtime: RealtimeConfig,
    pub sync: SyncConfig,
}

/// General application settings
#[derive(Debug, Clone, Deserialize)]
pub struct AppSettings {
    #[serde(default = "default_app_name")]
    pub name: String,
    #[serde(default = "default_env")]
    pub env: Environment,
}

/// Environment type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    #[default]
    Development,
    Staging,
    Production,
}

impl Environment {
    #[must_use]
    pub fn is_production(&self) -> bool {
        matches!(self, Self::Production)
    }

    #[must_use]
    pub fn is_development(&self) -> bool {
        matches!(self, Self::Development)
    }

    fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "production" => Some(Self::Production),
            "staging" => Some(Self::Staging),
            "development" => Some(Self::Development),
            _ => None,
        }
    }
}

/// Remote HTTP API configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ApiConfig {
    pub base_url: String,
    #[serde(default = "default_request_timeout_ms")]
    pub request_timeout_ms: u64,
}

impl ApiConfig {
    #[must_use]
    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_ms)
    }

    /// Join a path onto the base URL
    #[must_use]
    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url.trim_end_matches('/'), path)
    }
}

/// Real-time channel configuration
#[derive(Debug, Clone, Deserialize)]
pub struct RealtimeConfig {
    #[serde(default = "default_realtime_url")]
    pub url: String,
    #[serde(default = "default_connect_timeout_ms")]
    pub connect_timeout_ms: u64,
    #[serde(default = "default_event_buffer")]
    pub event_buffer: usize,
    #[serde(default = "default_reconnect_delay_ms")]
    pub reconnect_delay_ms: u64,
    /// Reconnect attempts after an established connection drops
    #[serde(default = "default_max_reconnects")]
    pub max_reconnects: u32,
}

impl RealtimeConfig {
    #[must_use]
    pub fn connect_timeout(&self) -> Duration {
        Duration::from_millis(self.connect_timeout_ms)
    }

    #[must_use]
    pub fn reconnect_delay(&self) -> Duration {
        Duration::from_millis(self.reconnect_delay_ms)
    }
}

impl Default for RealtimeConfig {
    fn default() -> Self {
        Self {
            url: default_realtime_url(),
            connect_timeout_ms: default_connect_timeout_ms(),
            event_buffer: default_event_buffer(),
            reconnect_delay_ms: default_reconnect_delay_ms(),
            max_reconnects: default_max_reconnects(),
        }
    }
}

/// Synchronizer settings
#[derive(Debug, Clone, Deserialize)]
pub struct SyncConfig {
    #[serde(default = "default_comment_max_length")]
    pub comment_max_length: usize,
    /// Token used by the CLI; library callers inject their own
    #[serde(skip)]
    pub token: Option<Credential>,
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            comment_max_length: default_comment_max_length(),
            token: None,
        }
    }
}

// Default value functions
fn default_app_name() -> String {
    "fest-sync".to_string()
}

fn default_env() -> Environment {
    Environment::Development
}

fn default_request_timeout_ms() -> u64 {
    10_000
}

fn default_realtime_url() -> String {
    "ws://localhost:9092/ws".to_string()
}

fn default_connect_timeout_ms() -> u64 {
    7_000
}

fn default_event_buffer() -> usize {
    256
}

fn default_reconnect_delay_ms() -> u64 {
    1_000
}

fn default_max_reconnects() -> u32 {
    3
}

fn default_comment_max_length() -> usize {
    DEFAULT_COMMENT_MAX_LENGTH
}

impl AppConfig {
    /// Load configuration from environment variables
    ///
    /// # Errors
    /// Returns an error if required environment variables are missing or malformed
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build configuration from an arbitrary variable source
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        Ok(Self {
            app: AppSettings {
                name: lookup("APP_NAME").unwrap_or_else(default_app_name),
                env: lookup("APP_ENV")
                    .and_then(|s| Environment::parse(&s))
                    .unwrap_or_default(),
            },
            api: ApiConfig {
                base_url: lookup("API_BASE_URL").ok_or(ConfigError::MissingVar("API_BASE_URL"))?,
                request_timeout_ms: parse_or(
                    &lookup,
                    "API_REQUEST_TIMEOUT_MS",
                    default_request_timeout_ms,
                )?,
            },
            realtime: RealtimeConfig {
                url: lookup("REALTIME_URL").unwrap_or_else(default_realtime_url),
                connect_timeout_ms: parse_or(
                    &lookup,
                    "REALTIME_CONNECT_TIMEOUT_MS",
                    default_connect_timeout_ms,
                )?,
                event_buffer: parse_or(&lookup, "REALTIME_EVENT_BUFFER", default_event_buffer)?,
                reconnect_delay_ms: parse_or(
                    &lookup,
                    "REALTIME_RECONNECT_DELAY_MS",
                    default_reconnect_delay_ms,
                )?,
                max_reconnects: parse_or(
                    &lookup,
                    "REALTIME_MAX_RECONNECTS",
                    default_max_reconnects,
                )?,
            },
            sync: SyncConfig {
                comment_max_length: parse_or(
                    &lookup,
                    "COMMENT_MAX_LENGTH",
                    default_comment_max_length,
                )?,
                token: lookup("FEST_TOKEN").and_then(Credential::new),
            },
        })
    }
}

fn parse_or<F, T>(lookup: &F, key: &'static str, default: fn() -> T) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: std::str::FromStr,
{
    match lookup(key) {
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|_| ConfigError::InvalidValue(key, raw)),
        None => Ok(default()),
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    MissingVar(&'static str),

    #[error("Invalid value for {0}: {1}")]
    InvalidValue(&'static str, String),
}
