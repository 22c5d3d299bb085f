//! Core relay implementation split into focused submodules.
//!
//! The `FtpDownloader` struct and its methods are organized by domain:
//! - [`session`] - Session lifetime and per-transfer timeouts
//! - [`fetch`] - Single-path download with alternate-path fallback
//! - [`batch`] - Chunked multi-path downloads and result aggregation
//! - [`listing`] - Directory listing and the known-files check
//! - [`probe`] - Diagnostic single-file probe

mod batch;
mod fetch;
mod listing;
mod probe;
mod session;

#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
pub(crate) mod test_helpers;
#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
mod tests;

pub use fetch::FetchOutcome;
pub use session::{ManagedSession, SessionManager};

use crate::config::Config;
use crate::error::Result;
use crate::transport::{FtpTransport, Transport};
use std::sync::Arc;

/// Main relay instance (cloneable - all fields are Arc-wrapped)
///
/// Holds no per-request state: every operation opens its own sessions and
/// closes them before returning, so one instance serves any number of
/// concurrent requests.
#[derive(Clone)]
pub struct FtpDownloader {
    /// Configuration, shared read-only with the API layer
    pub config: Arc<Config>,

    /// Opens and closes sessions against the configured endpoint
    sessions: SessionManager,
}

impl FtpDownloader {
    /// Create a relay that talks to the configured FTP server
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`](crate::Error::Config) if the configuration
    /// does not validate.
    pub fn new(config: Config) -> Result<Self> {
        Self::with_transport(config, Arc::new(FtpTransport::new()))
    }

    /// Create a relay over any [`Transport`]
    ///
    /// # Examples
    ///
    /// ```
    /// use ftp_relay::{Config, FtpDownloader};
    /// use ftp_relay::transport::MemoryTransport;
    /// use std::sync::Arc;
    ///
    /// # #[tokio::main]
    /// # async fn main() -> Result<(), Box<dyn std::error::Error>> {
    /// let transport = MemoryTransport::new().with_file("/www/a.csv", "hello");
    /// let downloader = FtpDownloader::with_transport(Config::default(), Arc::new(transport))?;
    ///
    /// let report = downloader.download_batch(&["/www/a.csv".to_string()], 3).await?;
    /// assert_eq!(report.data["/www/a.csv"].as_deref(), Some("hello"));
    /// # Ok(())
    /// # }
    /// ```
    pub fn with_transport(config: Config, transport: Arc<dyn Transport>) -> Result<Self> {
        config.validate()?;

        tracing::debug!(
            transport = transport.name(),
            endpoint = %config.endpoint.address(),
            timeout_ms = config.transfer.timeout.as_millis() as u64,
            batch_size = config.transfer.batch_size,
            "Relay configured"
        );

        let config = Arc::new(config);
        let sessions = SessionManager::new(
            transport,
            Arc::new(config.endpoint.clone()),
            config.transfer.timeout,
            config.retry.clone(),
        );

        Ok(Self { config, sessions })
    }

    /// Session manager used by every operation
    pub fn sessions(&self) -> &SessionManager {
        &self.sessions
    }

    /// Start the API server in a background task
    ///
    /// Serves on `config.server.api.bind_address` until the task is aborted.
    pub fn spawn_api_server(&self) -> tokio::task::JoinHandle<Result<()>> {
        let downloader = Arc::new(self.clone());
        let config = Arc::clone(&self.config);
        tokio::spawn(async move { crate::api::start_api_server(downloader, config).await })
    }
}
