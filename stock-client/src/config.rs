//! Client configuration.
//!
//! [`StockSettings`] holds the raw values as supplied by the environment (or
//! any other source). [`ClientConfig`] and [`LogConfig`] are the immutable
//! value objects built from them once at startup and shared read-only by
//! every call.

use serde::Deserialize;
use std::env;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use crate::error::{ClientError, ClientResult};

/// Upper bound for attempts per logical call.
pub const MAX_TRY_TIMES: u32 = 3;

// =============================================================================
// Settings
// =============================================================================

/// Raw settings, one field per configuration key.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct StockSettings {
    /// Gateway base address (scheme + host)
    pub gateway: String,
    /// Entrance path appended to the gateway
    pub entrance: String,
    /// Per-attempt timeout in seconds (0 waits indefinitely)
    pub request_timeout: u64,
    /// Attempts per logical call (clamped when building [`ClientConfig`])
    pub try_times: u32,
    /// Site identifier sent with every request
    pub site: String,
    /// Caller/scene identifier sent with every request
    pub callerid: String,
    /// Remote service name
    pub service_name: String,
    /// Directory for the request log
    pub log_path: PathBuf,
    /// Request log file name (without extension)
    pub log_name: String,
    /// Request log switch
    pub log_switch: bool,
}

impl StockSettings {
    /// Load settings from `SSDK_STOCK_*` environment variables.
    ///
    /// A `.env` file is loaded first when present.
    pub fn from_env() -> ClientResult<Self> {
        // Load .env file if present (ignore errors)
        let _ = dotenvy::dotenv();

        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load settings through an arbitrary key lookup.
    ///
    /// Missing keys fall back to the package defaults.
    pub fn from_lookup<F>(lookup: F) -> ClientResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let string = |key: &str, default: &str| lookup(key).unwrap_or_else(|| default.to_string());

        Ok(Self {
            gateway: string("SSDK_STOCK_GATEWAY", ""),
            entrance: string("SSDK_STOCK_ENTRANCE", "/router/rest"),
            request_timeout: parse_env(&lookup, "SSDK_STOCK_REQUEST_TIMEOUT", 5)?,
            try_times: parse_env(&lookup, "SSDK_STOCK_TRY_TIMES", 2)?,
            site: string("SSDK_STOCK_SITE", "tester"),
            callerid: string("SSDK_STOCK_CALLER_ID", "tester"),
            service_name: string("SSDK_STOCK_SERVICE_NAME", "stock_service"),
            log_path: PathBuf::from(string("SSDK_STOCK_LOG_PATH", "/data/nginx_log/job")),
            log_name: string("SSDK_STOCK_LOG_NAME", "stock_service"),
            log_switch: match lookup("SSDK_STOCK_LOG_SWITCH") {
                Some(raw) => parse_switch(&raw)?,
                None => true,
            },
        })
    }
}

fn parse_env<F, T>(lookup: &F, key: &str, default: T) -> ClientResult<T>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
{
    match lookup(key) {
        Some(val) => val
            .trim()
            .parse::<T>()
            .map_err(|_| ClientError::Config(format!("Invalid {} value: {}", key, val))),
        None => Ok(default),
    }
}

fn parse_switch(raw: &str) -> ClientResult<bool> {
    match raw.trim().to_lowercase().as_str() {
        "1" | "true" | "on" | "yes" => Ok(true),
        "0" | "false" | "off" | "no" | "" => Ok(false),
        other => Err(ClientError::Config(format!(
            "Invalid SSDK_STOCK_LOG_SWITCH: {}. Expected: 1, 0, true, false",
            other
        ))),
    }
}

// =============================================================================
// Client Configuration
// =============================================================================

/// Immutable dispatcher configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    gateway: String,
    entrance: String,
    request_timeout: Duration,
    try_times: u32,
    site: String,
    callerid: String,
    service_name: String,
}

impl ClientConfig {
    /// Build the configuration, clamping `try_times` into `1..=MAX_TRY_TIMES`.
    pub fn new(settings: &StockSettings) -> Self {
        Self {
            gateway: settings.gateway.clone(),
            entrance: settings.entrance.clone(),
            request_timeout: Duration::from_secs(settings.request_timeout),
            try_times: settings.try_times.clamp(1, MAX_TRY_TIMES),
            site: settings.site.clone(),
            callerid: settings.callerid.clone(),
            service_name: settings.service_name.clone(),
        }
    }

    pub fn gateway(&self) -> &str {
        &self.gateway
    }

    pub fn entrance(&self) -> &str {
        &self.entrance
    }

    /// Full URL requests are posted to.
    pub fn entrance_url(&self) -> String {
        let gateway = self.gateway.trim_end_matches('/');
        if self.entrance.starts_with('/') || self.entrance.is_empty() {
            format!("{}{}", gateway, self.entrance)
        } else {
            format!("{}/{}", gateway, self.entrance)
        }
    }

    /// Timeout applied to each attempt (connect, read and overall).
    ///
    /// `Duration::ZERO` means no limit.
    pub fn request_timeout(&self) -> Duration {
        self.request_timeout
    }

    /// Effective attempt budget per logical call.
    pub fn try_times(&self) -> u32 {
        self.try_times
    }

    pub fn site(&self) -> &str {
        &self.site
    }

    pub fn callerid(&self) -> &str {
        &self.callerid
    }

    pub fn service_name(&self) -> &str {
        &self.service_name
    }
}

// =============================================================================
// Log Configuration
// =============================================================================

/// Request log configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogConfig {
    /// Directory holding the log file
    pub log_path: PathBuf,
    /// File name without extension
    pub log_name: String,
    /// Whether records are written at all
    pub enabled: bool,
}

impl LogConfig {
    pub fn new(settings: &StockSettings) -> Self {
        Self {
            log_path: settings.log_path.clone(),
            log_name: settings.log_name.clone(),
            enabled: settings.log_switch,
        }
    }

    /// Path of the JSON-lines log file.
    pub fn file_path(&self) -> PathBuf {
        self.log_path.join(format!("{}.log", self.log_name))
    }
}

// =============================================================================
// Tests
// =============================================================================
