//! Transfer-protocol collaborators
//!
//! The relay never speaks FTP itself. It talks to a [`Transport`], which
//! opens [`TransferSession`]s; a session can list directories and retrieve
//! whole files into memory. Implementations:
//!
//! - [`FtpTransport`] - real FTP server, backed by `suppaftp`
//! - [`MemoryTransport`] - in-process fake used by tests and demos

use crate::config::EndpointConfig;
use crate::types::RemoteEntry;
use async_trait::async_trait;

mod ftp;
mod memory;

pub use ftp::FtpTransport;
pub use memory::{MemoryTransport, SessionEvent, TransportStats};

/// Factory for sessions against a remote endpoint
///
/// # Examples
///
/// ```no_run
/// use ftp_relay::config::EndpointConfig;
/// use ftp_relay::transport::{FtpTransport, Transport};
/// use std::time::Duration;
///
/// # #[tokio::main]
/// # async fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let transport = FtpTransport::new();
/// let endpoint = EndpointConfig {
///     host: "ftp.example.com".to_string(),
///     ..Default::default()
/// };
///
/// let mut session = transport.connect(&endpoint, Duration::from_secs(30)).await?;
/// let bytes = session.retrieve("/pub/README").await?;
/// session.close().await;
/// println!("{} bytes", bytes.len());
/// # Ok(())
/// # }
/// ```
#[async_trait]
pub trait Transport: Send + Sync {
    /// Connect and authenticate against `endpoint`
    ///
    /// `timeout` bounds the connection attempt and is the I/O timeout the
    /// session applies to its own sockets.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Connection`](crate::Error::Connection) when the server
    /// is unreachable or rejects the credentials.
    async fn connect(
        &self,
        endpoint: &EndpointConfig,
        timeout: std::time::Duration,
    ) -> crate::Result<Box<dyn TransferSession>>;

    /// Human-readable name for logging
    fn name(&self) -> &'static str;
}

/// One live, authenticated connection
#[async_trait]
pub trait TransferSession: Send {
    /// List a remote directory, in the order the server reports it
    ///
    /// # Errors
    ///
    /// [`Error::DirectoryList`](crate::Error::DirectoryList) when the server
    /// refuses the listing, [`Error::Connection`](crate::Error::Connection)
    /// when the session is no longer usable.
    async fn list(&mut self, path: &str) -> crate::Result<Vec<RemoteEntry>>;

    /// Download a remote file fully into memory
    ///
    /// # Errors
    ///
    /// [`Error::Transfer`](crate::Error::Transfer) when the server refuses the
    /// file, [`Error::Connection`](crate::Error::Connection) when the session
    /// is no longer usable.
    async fn retrieve(&mut self, path: &str) -> crate::Result<Vec<u8>>;

    /// Close the connection. Never fails; problems are logged.
    async fn close(&mut self);
}
