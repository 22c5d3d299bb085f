//! Configuration types for ftp-relay

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::{net::SocketAddr, time::Duration};
use utoipa::ToSchema;

/// Main configuration for [`FtpDownloader`](crate::FtpDownloader) and the HTTP API
///
/// Built once at process start and shared read-only (behind `Arc`) by every
/// request. Nothing in the relay mutates it afterwards.
///
/// Fields are organized into logical sub-configs:
/// - [`endpoint`](EndpointConfig) - the remote FTP server and its credentials
/// - [`transfer`](TransferConfig) - timeouts, batching, path fallback
/// - [`retry`](RetryConfig) - connection retry policy
/// - [`server`](ServerIntegrationConfig) - the HTTP API surface
#[derive(Clone, Debug, Default, Serialize, Deserialize, ToSchema)]
pub struct Config {
    /// Remote FTP endpoint
    #[serde(default)]
    pub endpoint: EndpointConfig,

    /// Transfer behavior (timeouts, batching, fallback paths)
    #[serde(default)]
    pub transfer: TransferConfig,

    /// Retry policy for establishing sessions
    #[serde(default)]
    pub retry: RetryConfig,

    /// API and external server integration
    #[serde(default)]
    pub server: ServerIntegrationConfig,
}

/// Remote FTP endpoint
#[derive(Clone, Debug, Serialize, Deserialize, ToSchema)]
pub struct EndpointConfig {
    /// Server hostname
    pub host: String,

    /// Server port (default: 21)
    #[serde(default = "default_ftp_port")]
    pub port: u16,

    /// Username for authentication (default: "anonymous")
    #[serde(default = "default_username")]
    pub username: String,

    /// Password for authentication
    #[serde(default)]
    pub password: String,

    /// Use explicit TLS (`AUTH TLS`) for control and data connections
    #[serde(default)]
    pub secure: bool,
}

impl Default for EndpointConfig {
    fn default() -> Self {
        Self {
            host: "localhost".to_string(),
            port: default_ftp_port(),
            username: default_username(),
            password: String::new(),
            secure: false,
        }
    }
}

impl EndpointConfig {
    /// `host:port`, for logging and socket resolution
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Transfer behavior
#[derive(Clone, Debug, Serialize, Deserialize, ToSchema)]
pub struct TransferConfig {
    /// Upper bound for a single transfer operation, in milliseconds (default: 60000)
    #[serde(
        default = "default_transfer_timeout",
        rename = "timeout_ms",
        with = "duration_ms_serde"
    )]
    #[schema(value_type = u64)]
    pub timeout: Duration,

    /// Number of paths fetched per session in batch mode (default: 3)
    #[serde(default = "default_batch_size")]
    pub batch_size: usize,

    /// Top-level directory segment the fallback resolver may strip (default: "www")
    #[serde(default = "default_path_prefix")]
    pub path_prefix: String,

    /// Directories scanned by the known-files check
    #[serde(default = "default_known_directories")]
    pub known_directories: Vec<String>,

    /// File fetched by the diagnostic probe when no path is given
    #[serde(default = "default_probe_path")]
    pub probe_path: String,

    /// Include per-path error messages in download responses (default: false)
    ///
    /// When disabled, a failed path only shows up as `null` content and the
    /// error is logged.
    #[serde(default)]
    pub report_errors: bool,
}

impl Default for TransferConfig {
    fn default() -> Self {
        Self {
            timeout: default_transfer_timeout(),
            batch_size: default_batch_size(),
            path_prefix: default_path_prefix(),
            known_directories: default_known_directories(),
            probe_path: default_probe_path(),
            report_errors: false,
        }
    }
}

/// Retry configuration for transient connection failures
#[derive(Clone, Debug, Serialize, Deserialize, ToSchema)]
pub struct RetryConfig {
    /// Maximum number of retry attempts after the first try (default: 2)
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,

    /// Initial delay before first retry, in milliseconds (default: 500)
    #[serde(
        default = "default_initial_delay",
        rename = "initial_delay_ms",
        with = "duration_ms_serde"
    )]
    #[schema(value_type = u64)]
    pub initial_delay: Duration,

    /// Maximum delay between retries, in milliseconds (default: 5000)
    #[serde(
        default = "default_max_delay",
        rename = "max_delay_ms",
        with = "duration_ms_serde"
    )]
    #[schema(value_type = u64)]
    pub max_delay: Duration,

    /// Multiplier for exponential backoff (default: 2.0)
    #[serde(default = "default_backoff_multiplier")]
    pub backoff_multiplier: f64,

    /// Add random jitter to delays (default: true)
    #[serde(default = "default_true")]
    pub jitter: bool,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: default_max_attempts(),
            initial_delay: default_initial_delay(),
            max_delay: default_max_delay(),
            backoff_multiplier: default_backoff_multiplier(),
            jitter: true,
        }
    }
}

/// External interface configuration
#[derive(Clone, Debug, Default, Serialize, Deserialize, ToSchema)]
pub struct ServerIntegrationConfig {
    /// REST API configuration
    #[serde(default)]
    pub api: ApiConfig,
}

/// REST API configuration
#[derive(Clone, Debug, Serialize, Deserialize, ToSchema)]
pub struct ApiConfig {
    /// Address to bind to (default: 127.0.0.1:3001)
    #[serde(default = "default_bind_address")]
    #[schema(value_type = String)]
    pub bind_address: SocketAddr,

    /// Enable CORS for browser access (default: true)
    #[serde(default = "default_true")]
    pub cors_enabled: bool,

    /// Allowed CORS origins (default: ["*"])
    #[serde(default = "default_cors_origins")]
    pub cors_origins: Vec<String>,

    /// Enable Swagger UI at /swagger-ui (default: true)
    #[serde(default = "default_true")]
    pub swagger_ui: bool,

    /// Maximum accepted request body, in bytes (default: 50 MiB)
    #[serde(default = "default_body_limit")]
    pub body_limit_bytes: usize,

    /// Whole-request timeout, in seconds (default: 300)
    #[serde(
        default = "default_request_timeout",
        rename = "request_timeout_secs",
        with = "duration_serde"
    )]
    #[schema(value_type = u64)]
    pub request_timeout: Duration,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            bind_address: default_bind_address(),
            cors_enabled: true,
            cors_origins: default_cors_origins(),
            swagger_ui: true,
            body_limit_bytes: default_body_limit(),
            request_timeout: default_request_timeout(),
        }
    }
}

impl Config {
    /// Build a configuration from `FTP_RELAY_*` environment variables over defaults
    ///
    /// | Variable | Field |
    /// |---|---|
    /// | `FTP_RELAY_HOST` | `endpoint.host` (required) |
    /// | `FTP_RELAY_PORT` | `endpoint.port` |
    /// | `FTP_RELAY_USERNAME` | `endpoint.username` |
    /// | `FTP_RELAY_PASSWORD` | `endpoint.password` |
    /// | `FTP_RELAY_SECURE` | `endpoint.secure` |
    /// | `FTP_RELAY_TIMEOUT_MS` | `transfer.timeout` |
    /// | `FTP_RELAY_BATCH_SIZE` | `transfer.batch_size` |
    /// | `FTP_RELAY_PATH_PREFIX` | `transfer.path_prefix` |
    /// | `FTP_RELAY_KNOWN_DIRECTORIES` | `transfer.known_directories` (comma separated) |
    /// | `FTP_RELAY_PROBE_PATH` | `transfer.probe_path` |
    /// | `FTP_RELAY_REPORT_ERRORS` | `transfer.report_errors` |
    /// | `FTP_RELAY_BIND` | `server.api.bind_address` |
    ///
    /// The result is validated before it is returned.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`Config::from_env`] with a custom variable source
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Config::default();

        config.endpoint.host = lookup("FTP_RELAY_HOST").ok_or_else(|| Error::Config {
            message: "FTP_RELAY_HOST is not set".to_string(),
            key: Some("endpoint.host".to_string()),
        })?;
        if let Some(port) = parse_var(&lookup, "FTP_RELAY_PORT", "endpoint.port")? {
            config.endpoint.port = port;
        }
        if let Some(username) = lookup("FTP_RELAY_USERNAME") {
            config.endpoint.username = username;
        }
        if let Some(password) = lookup("FTP_RELAY_PASSWORD") {
            config.endpoint.password = password;
        }
        if let Some(secure) = parse_var(&lookup, "FTP_RELAY_SECURE", "endpoint.secure")? {
            config.endpoint.secure = secure;
        }
        if let Some(ms) = parse_var::<u64, _>(&lookup, "FTP_RELAY_TIMEOUT_MS", "transfer.timeout")? {
            config.transfer.timeout = Duration::from_millis(ms);
        }
        if let Some(size) = parse_var(&lookup, "FTP_RELAY_BATCH_SIZE", "transfer.batch_size")? {
            config.transfer.batch_size = size;
        }
        if let Some(prefix) = lookup("FTP_RELAY_PATH_PREFIX") {
            config.transfer.path_prefix = prefix;
        }
        if let Some(dirs) = lookup("FTP_RELAY_KNOWN_DIRECTORIES") {
            config.transfer.known_directories = dirs
                .split(',')
                .map(str::trim)
                .filter(|d| !d.is_empty())
                .map(String::from)
                .collect();
        }
        if let Some(probe) = lookup("FTP_RELAY_PROBE_PATH") {
            config.transfer.probe_path = probe;
        }
        if let Some(report) =
            parse_var(&lookup, "FTP_RELAY_REPORT_ERRORS", "transfer.report_errors")?
        {
            config.transfer.report_errors = report;
        }
        if let Some(bind) = parse_var(&lookup, "FTP_RELAY_BIND", "server.api.bind_address")? {
            config.server.api.bind_address = bind;
        }

        config.validate()?;
        Ok(config)
    }

    /// Reject settings the relay cannot run with
    pub fn validate(&self) -> Result<()> {
        if self.endpoint.host.trim().is_empty() {
            return Err(Error::Config {
                message: "endpoint host must not be empty".to_string(),
                key: Some("endpoint.host".to_string()),
            });
        }
        if self.transfer.batch_size == 0 {
            return Err(Error::Config {
                message: "batch size must be at least 1".to_string(),
                key: Some("transfer.batch_size".to_string()),
            });
        }
        if self.transfer.timeout.is_zero() {
            return Err(Error::Config {
                message: "transfer timeout must be greater than zero".to_string(),
                key: Some("transfer.timeout_ms".to_string()),
            });
        }
        Ok(())
    }
}

fn parse_var<T, F>(lookup: &F, var: &str, key: &str) -> Result<Option<T>>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
    F: Fn(&str) -> Option<String>,
{
    match lookup(var) {
        None => Ok(None),
        Some(raw) => raw.trim().parse().map(Some).map_err(|e| Error::Config {
            message: format!("invalid value for {var}: {e}"),
            key: Some(key.to_string()),
        }),
    }
}

fn default_ftp_port() -> u16 {
    21
}

fn default_username() -> String {
    "anonymous".to_string()
}

fn default_transfer_timeout() -> Duration {
    Duration::from_millis(60_000)
}

fn default_batch_size() -> usize {
    3
}

fn default_path_prefix() -> String {
    "www".to_string()
}

fn default_known_directories() -> Vec<String> {
    vec![
        "/www".to_string(),
        "/www/receipt".to_string(),
        "/www/cartitem".to_string(),
    ]
}

fn default_probe_path() -> String {
    "/www/receipt/receipt_bel_2025-02-21.csv".to_string()
}

fn default_true() -> bool {
    true
}

fn default_max_attempts() -> u32 {
    2
}

fn default_initial_delay() -> Duration {
    Duration::from_millis(500)
}

fn default_max_delay() -> Duration {
    Duration::from_secs(5)
}

fn default_backoff_multiplier() -> f64 {
    2.0
}

fn default_bind_address() -> SocketAddr {
    SocketAddr::from(([127, 0, 0, 1], 3001))
}

fn default_cors_origins() -> Vec<String> {
    vec!["*".to_string()]
}

fn default_body_limit() -> usize {
    50 * 1024 * 1024
}

fn default_request_timeout() -> Duration {
    Duration::from_secs(300)
}

// Duration serialization helper (whole seconds)
mod duration_serde {
    use serde::{Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    pub fn serialize<S>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_u64(duration.as_secs())
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Duration, D::Error>
    where
        D: Deserializer<'de>,
    {
        let secs = u64::deserialize(deserializer)?;
        Ok(Duration::from_secs(secs))
    }
}

// Duration serialization helper (milliseconds)
mod duration_ms_serde {
    use serde::{Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    pub fn serialize<S>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_u64(duration.as_millis() as u64)
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Duration, D::Error>
    where
        D: Deserializer<'de>,
    {
        let millis = u64::deserialize(deserializer)?;
        Ok(Duration::from_millis(millis))
    }
}
