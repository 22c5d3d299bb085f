//! In-memory transport
//!
//! Serves files and directory listings from maps held in memory and records
//! every session it opens, so callers can check how sessions were used.

use super::{TransferSession, Transport};
use crate::config::EndpointConfig;
use crate::error::{Error, Result};
use crate::types::RemoteEntry;
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

/// Something that happened on the transport, in order
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionEvent {
    /// Session `id` was opened
    Opened(usize),
    /// Session `id` attempted to retrieve a path
    Retrieve(usize, String),
    /// Session `id` listed a directory
    List(usize, String),
    /// Session `id` was closed
    Closed(usize),
}

/// Counters and history collected by a [`MemoryTransport`]
#[derive(Debug, Clone, Default)]
pub struct TransportStats {
    /// Calls to `connect`, successful or not
    pub connect_attempts: usize,
    /// Sessions successfully opened
    pub sessions_opened: usize,
    /// Sessions closed through `close`
    pub sessions_closed: usize,
    /// Highest number of sessions open at the same time
    pub max_open: usize,
    /// Event history
    pub events: Vec<SessionEvent>,
}

impl TransportStats {
    /// Paths passed to `retrieve`, in call order
    pub fn retrieved(&self) -> Vec<String> {
        self.events
            .iter()
            .filter_map(|event| match event {
                SessionEvent::Retrieve(_, path) => Some(path.clone()),
                _ => None,
            })
            .collect()
    }
}

#[derive(Default)]
struct State {
    files: HashMap<String, Vec<u8>>,
    directories: HashMap<String, Vec<RemoteEntry>>,
    broken_directories: HashMap<String, String>,
    delays: HashMap<String, Duration>,
    failing_connects: usize,
    login_rejected: bool,
    open: usize,
    stats: TransportStats,
}

/// Transport that serves everything from memory
///
/// # Examples
///
/// ```
/// use ftp_relay::transport::{MemoryTransport, Transport};
/// use ftp_relay::config::EndpointConfig;
/// use std::time::Duration;
///
/// # #[tokio::main]
/// # async fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let transport = MemoryTransport::new().with_file("www/a.csv", "id;total\n1;10\n");
///
/// let mut session = transport
///     .connect(&EndpointConfig::default(), Duration::from_secs(1))
///     .await?;
/// assert!(session.retrieve("/www/a.csv").await.is_err());
/// assert_eq!(session.retrieve("www/a.csv").await?, b"id;total\n1;10\n");
/// session.close().await;
///
/// assert_eq!(transport.stats().sessions_closed, 1);
/// # Ok(())
/// # }
/// ```
#[derive(Clone, Default)]
pub struct MemoryTransport {
    state: Arc<Mutex<State>>,
}

impl MemoryTransport {
    /// Empty transport: every retrieve fails, every listing is empty
    pub fn new() -> Self {
        Self::default()
    }

    fn state(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Serve `content` at exactly `path`
    pub fn with_file(self, path: impl Into<String>, content: impl Into<Vec<u8>>) -> Self {
        self.state().files.insert(path.into(), content.into());
        self
    }

    /// Serve `entries` as the listing of `path`
    pub fn with_directory(self, path: impl Into<String>, entries: Vec<RemoteEntry>) -> Self {
        self.state().directories.insert(path.into(), entries);
        self
    }

    /// Make listing `path` fail with `message`
    pub fn with_broken_directory(self, path: impl Into<String>, message: impl Into<String>) -> Self {
        self.state()
            .broken_directories
            .insert(path.into(), message.into());
        self
    }

    /// Delay every retrieve of `path` by `delay`
    pub fn with_delay(self, path: impl Into<String>, delay: Duration) -> Self {
        self.state().delays.insert(path.into(), delay);
        self
    }

    /// Refuse the next `count` connection attempts with a transient error
    pub fn with_failing_connects(self, count: usize) -> Self {
        self.state().failing_connects = count;
        self
    }

    /// Reject every login
    pub fn with_rejected_login(self) -> Self {
        self.state().login_rejected = true;
        self
    }

    /// Snapshot of counters and history
    pub fn stats(&self) -> TransportStats {
        self.state().stats.clone()
    }
}

#[async_trait]
impl Transport for MemoryTransport {
    async fn connect(
        &self,
        endpoint: &EndpointConfig,
        _timeout: Duration,
    ) -> Result<Box<dyn TransferSession>> {
        let mut state = self.state();
        state.stats.connect_attempts += 1;

        if state.login_rejected {
            return Err(Error::Connection(format!(
                "530 Login incorrect for {} on {}",
                endpoint.username,
                endpoint.address()
            )));
        }
        if state.failing_connects > 0 {
            state.failing_connects -= 1;
            return Err(Error::Connection(format!(
                "{}: Connection refused",
                endpoint.address()
            )));
        }

        let id = state.stats.sessions_opened;
        state.stats.sessions_opened += 1;
        state.open += 1;
        state.stats.max_open = state.stats.max_open.max(state.open);
        state.stats.events.push(SessionEvent::Opened(id));

        Ok(Box::new(MemorySession {
            id,
            transport: self.clone(),
            closed: false,
        }))
    }

    fn name(&self) -> &'static str {
        "memory"
    }
}

struct MemorySession {
    id: usize,
    transport: MemoryTransport,
    closed: bool,
}

impl MemorySession {
    fn ensure_open(&self) -> Result<()> {
        if self.closed {
            return Err(Error::Connection(format!("session {} is closed", self.id)));
        }
        Ok(())
    }
}

#[async_trait]
impl TransferSession for MemorySession {
    async fn list(&mut self, path: &str) -> Result<Vec<RemoteEntry>> {
        self.ensure_open()?;
        let mut state = self.transport.state();
        state
            .stats
            .events
            .push(SessionEvent::List(self.id, path.to_string()));

        if let Some(message) = state.broken_directories.get(path) {
            return Err(Error::DirectoryList {
                path: path.to_string(),
                message: message.clone(),
            });
        }
        Ok(state.directories.get(path).cloned().unwrap_or_default())
    }

    async fn retrieve(&mut self, path: &str) -> Result<Vec<u8>> {
        self.ensure_open()?;
        let (delay, content) = {
            let mut state = self.transport.state();
            state
                .stats
                .events
                .push(SessionEvent::Retrieve(self.id, path.to_string()));
            (state.delays.get(path).copied(), state.files.get(path).cloned())
        };

        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }

        content.ok_or_else(|| Error::Transfer {
            path: path.to_string(),
            message: "550 No such file or directory".to_string(),
        })
    }

    async fn close(&mut self) {
        if self.closed {
            return;
        }
        self.closed = true;
        let mut state = self.transport.state();
        state.open -= 1;
        state.stats.sessions_closed += 1;
        state.stats.events.push(SessionEvent::Closed(self.id));
    }
}
