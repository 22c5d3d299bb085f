//! # ftp-relay
//!
//! HTTP front end for fetching files and directory listings from an FTP
//! server.
//!
//! Clients post lists of remote paths; the relay downloads them over short
//! lived FTP sessions, a few paths per session, and answers with the text
//! content of each file (or `null` where nothing could be fetched). Paths
//! that fail as written are retried under a handful of alternate spellings
//! (without the leading slash, without the top-level `www` segment, ...),
//! because the servers this talks to disagree about their own root.
//!
//! ## Quick Start
//!
//! ```no_run
//! use ftp_relay::{Config, FtpDownloader};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let mut config = Config::default();
//!     config.endpoint.host = "ftp.example.com".to_string();
//!     config.endpoint.username = "user".to_string();
//!     config.endpoint.password = "pass".to_string();
//!
//!     let downloader = FtpDownloader::new(config)?;
//!
//!     let paths = vec!["/www/receipt/receipt_bel_2025-02-21.csv".to_string()];
//!     let report = downloader.download_batch(&paths, 3).await?;
//!     for (path, content) in &report.data {
//!         let chars = content.as_deref().map_or(0, |text| text.chars().count());
//!         println!("{path}: {chars} chars");
//!     }
//!
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::unwrap_used)]
#![warn(clippy::expect_used)]

/// REST API module
pub mod api;
/// Configuration types
pub mod config;
/// Core relay implementation (decomposed into focused submodules)
pub mod downloader;
/// Error types
pub mod error;
/// Alternate spellings of remote paths
pub mod resolver;
/// Retry logic with exponential backoff
pub mod retry;
/// FTP session abstraction and its implementations
pub mod transport;
/// Core types
pub mod types;

// Re-export commonly used types
pub use config::{Config, EndpointConfig, RetryConfig, TransferConfig};
pub use downloader::FtpDownloader;
pub use error::{ApiError, Error, Result, ToHttpStatus};
pub use types::{DownloadReport, EntryKind, KnownFile, ProbeReport, RemoteEntry};

/// Serve the API for `downloader` until a termination signal arrives.
///
/// Binds `config.server.api.bind_address`, then waits for a signal and
/// lets in-flight requests finish.
///
/// - **Unix:** listens for SIGTERM and SIGINT.
/// - **Windows/other:** listens for Ctrl+C via `tokio::signal::ctrl_c()`.
///
/// # Example
///
/// ```no_run
/// use ftp_relay::{Config, FtpDownloader, run_with_shutdown};
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let downloader = FtpDownloader::new(Config::from_env()?)?;
///     run_with_shutdown(downloader).await?;
///     Ok(())
/// }
/// ```
pub async fn run_with_shutdown(downloader: FtpDownloader) -> Result<()> {
    let config = std::sync::Arc::clone(&downloader.config);
    api::start_api_server(std::sync::Arc::new(downloader), config).await
}

/// Resolves once the process is asked to terminate
#[cfg(unix)]
pub(crate) async fn wait_for_signal() {
    use tokio::signal::unix::{SignalKind, signal};

    // Registration can fail in restricted environments (containers, tests)
    match (
        signal(SignalKind::terminate()),
        signal(SignalKind::interrupt()),
    ) {
        (Ok(mut sigterm), Ok(mut sigint)) => {
            tokio::select! {
                _ = sigterm.recv() => tracing::info!("Received SIGTERM signal"),
                _ = sigint.recv() => tracing::info!("Received SIGINT signal (Ctrl+C)"),
            }
        }
        (Ok(mut only), Err(e)) | (Err(e), Ok(mut only)) => {
            tracing::warn!(error = %e, "Could not register one signal handler, waiting for the other");
            only.recv().await;
            tracing::info!("Received termination signal");
        }
        (Err(e), Err(_)) => {
            tracing::error!(error = %e, "Could not register any signal handlers, using ctrl_c fallback");
            tokio::signal::ctrl_c().await.ok();
        }
    }
}

/// Resolves once the process is asked to terminate
#[cfg(not(unix))]
pub(crate) async fn wait_for_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => tracing::info!("Received Ctrl+C signal"),
        Err(e) => tracing::error!(error = %e, "Failed to listen for Ctrl+C signal"),
    }
}
