//! Shared test helpers for creating FtpDownloader instances in tests.

use crate::config::Config;
use crate::downloader::FtpDownloader;
use crate::transport::MemoryTransport;
use std::sync::Arc;
use std::time::Duration;

/// Config with short timeouts and instant retries
pub(crate) fn test_config() -> Config {
    let mut config = Config::default();
    config.endpoint.host = "ftp.test".to_string();
    config.transfer.timeout = Duration::from_millis(200);
    config.retry.initial_delay = Duration::from_millis(1);
    config.retry.max_delay = Duration::from_millis(5);
    config.retry.jitter = false;
    config
}

/// Downloader over `transport` using [`test_config`]
pub(crate) fn create_test_downloader(transport: &MemoryTransport) -> FtpDownloader {
    create_test_downloader_with(transport, test_config())
}

/// Downloader over `transport` using a caller-tweaked config
pub(crate) fn create_test_downloader_with(
    transport: &MemoryTransport,
    config: Config,
) -> FtpDownloader {
    FtpDownloader::with_transport(config, Arc::new(transport.clone())).unwrap()
}

/// Owned path list from string literals
pub(crate) fn paths(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}
