//! Test configuration helpers for loading .env credentials

use ftp_relay::Config;
use std::time::Duration;

/// Config for in-memory runs: short timeouts, instant retries
pub fn fast_config() -> Config {
    let mut config = Config::default();
    config.endpoint.host = "ftp.test".to_string();
    config.transfer.timeout = Duration::from_millis(250);
    config.retry.initial_delay = Duration::from_millis(1);
    config.retry.max_delay = Duration::from_millis(5);
    config.retry.jitter = false;
    config
}

/// Whether the `FTP_RELAY_*` variables needed for live tests are present
///
/// Loads `.env` first.
pub fn has_live_credentials() -> bool {
    dotenvy::dotenv().ok();
    std::env::var("FTP_RELAY_HOST").is_ok()
}

/// Live config from the environment (`.env` included)
pub fn load_live_config() -> ftp_relay::Result<Config> {
    dotenvy::dotenv().ok();
    Config::from_env()
}

/// Paths used by the live tests, from `FTP_RELAY_LIVE_PATHS` (comma separated)
///
/// Falls back to the configured probe path.
pub fn live_paths(config: &Config) -> Vec<String> {
    std::env::var("FTP_RELAY_LIVE_PATHS")
        .ok()
        .map(|raw| {
            raw.split(',')
                .map(str::trim)
                .filter(|p| !p.is_empty())
                .map(String::from)
                .collect::<Vec<_>>()
        })
        .filter(|paths| !paths.is_empty())
        .unwrap_or_else(|| vec![config.transfer.probe_path.clone()])
}
