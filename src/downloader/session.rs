//! Session lifetime and per-transfer timeouts.

use crate::config::{EndpointConfig, RetryConfig};
use crate::error::{Error, Result};
use crate::retry::with_retry;
use crate::transport::{TransferSession, Transport};
use crate::types::RemoteEntry;
use futures::future::BoxFuture;
use std::sync::Arc;
use std::time::Duration;

/// Opens sessions against one endpoint and guarantees they are closed
#[derive(Clone)]
pub struct SessionManager {
    transport: Arc<dyn Transport>,
    endpoint: Arc<EndpointConfig>,
    timeout: Duration,
    retry: RetryConfig,
}

impl SessionManager {
    /// Create a manager for `endpoint`
    ///
    /// `timeout` bounds every single transfer made through the sessions it
    /// hands out; `retry` governs connection establishment.
    pub fn new(
        transport: Arc<dyn Transport>,
        endpoint: Arc<EndpointConfig>,
        timeout: Duration,
        retry: RetryConfig,
    ) -> Self {
        Self {
            transport,
            endpoint,
            timeout,
            retry,
        }
    }

    /// Per-transfer timeout
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Run `body` with a freshly opened session and close it afterwards
    ///
    /// The session is closed once `body` finishes, whatever it returns.
    /// Failures inside `body` are part of its return value; only a failure
    /// to open the session is reported as `Err`.
    ///
    /// # Errors
    ///
    /// [`Error::Connection`] if the session cannot be opened after retries.
    ///
    /// # Examples
    ///
    /// ```
    /// use ftp_relay::{Config, FtpDownloader};
    /// use ftp_relay::transport::MemoryTransport;
    /// use futures::FutureExt;
    /// use std::sync::Arc;
    ///
    /// # #[tokio::main]
    /// # async fn main() -> Result<(), Box<dyn std::error::Error>> {
    /// let transport = MemoryTransport::new().with_file("/motd", "hi");
    /// let downloader = FtpDownloader::with_transport(Config::default(), Arc::new(transport))?;
    ///
    /// let bytes = downloader
    ///     .sessions()
    ///     .with_session(|session| async move { session.retrieve("/motd").await }.boxed())
    ///     .await??;
    /// assert_eq!(bytes, b"hi");
    /// # Ok(())
    /// # }
    /// ```
    pub async fn with_session<T, F>(&self, body: F) -> Result<T>
    where
        F: for<'s> FnOnce(&'s mut ManagedSession) -> BoxFuture<'s, T>,
    {
        let mut session = self.open().await?;
        let value = body(&mut session).await;
        session.close().await;
        Ok(value)
    }

    async fn open(&self) -> Result<ManagedSession> {
        let started = std::time::Instant::now();

        let inner = with_retry(&self.retry, || {
            self.transport.connect(&self.endpoint, self.timeout)
        })
        .await
        .map_err(|e| match e {
            Error::Connection(_) => e,
            other => Error::Connection(other.to_string()),
        })?;

        tracing::debug!(
            endpoint = %self.endpoint.address(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "Session opened"
        );

        Ok(ManagedSession {
            inner,
            timeout: self.timeout,
        })
    }
}

/// An open session whose transfers are bounded by the transfer timeout
pub struct ManagedSession {
    inner: Box<dyn TransferSession>,
    timeout: Duration,
}

impl ManagedSession {
    /// Download `path` fully into memory
    ///
    /// # Errors
    ///
    /// [`Error::TransferTimeout`] when the transfer outlives the timeout,
    /// otherwise whatever the transport reports.
    pub async fn retrieve(&mut self, path: &str) -> Result<Vec<u8>> {
        match tokio::time::timeout(self.timeout, self.inner.retrieve(path)).await {
            Ok(result) => result,
            Err(_) => Err(self.timed_out(path)),
        }
    }

    /// List the directory at `path`
    ///
    /// # Errors
    ///
    /// [`Error::TransferTimeout`] when the listing outlives the timeout,
    /// otherwise whatever the transport reports.
    pub async fn list(&mut self, path: &str) -> Result<Vec<RemoteEntry>> {
        match tokio::time::timeout(self.timeout, self.inner.list(path)).await {
            Ok(result) => result,
            Err(_) => Err(self.timed_out(path)),
        }
    }

    async fn close(&mut self) {
        // QUIT gets the same bound as any other command
        if tokio::time::timeout(self.timeout, self.inner.close())
            .await
            .is_err()
        {
            tracing::warn!("Session close timed out");
        }
    }

    fn timed_out(&self, path: &str) -> Error {
        Error::TransferTimeout {
            path: path.to_string(),
            timeout_ms: self.timeout.as_millis() as u64,
        }
    }
}
