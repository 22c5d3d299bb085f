//! FTP transport backed by `suppaftp`
//!
//! `suppaftp`'s synchronous client is used from `spawn_blocking`. A session
//! owns its control connection; each operation moves the connection into a
//! blocking task and back. If the caller stops waiting (transfer timeout),
//! the connection stays with the abandoned task and the session reports
//! [`Error::Connection`] for everything that follows.
//!
//! Every socket the client opens, control and passive data alike, carries
//! the session timeout as its read and write timeout. An abandoned task
//! therefore ends on its own and drops its sockets instead of blocking on a
//! stalled server forever.

use super::{TransferSession, Transport};
use crate::config::EndpointConfig;
use crate::error::{Error, Result};
use crate::types::{EntryKind, RemoteEntry};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::net::{SocketAddr, TcpStream, ToSocketAddrs};
use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;
use suppaftp::list::File as ListedFile;
use suppaftp::types::FileType;
use suppaftp::{FtpError, FtpResult, FtpStream, RustlsConnector, RustlsFtpStream, rustls};

#[cfg(test)]
mod fake_server;

/// Transport for FTP servers, plain or with explicit TLS
#[derive(Debug, Clone, Copy, Default)]
pub struct FtpTransport;

impl FtpTransport {
    /// Create a new FTP transport
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl Transport for FtpTransport {
    async fn connect(
        &self,
        endpoint: &EndpointConfig,
        timeout: Duration,
    ) -> Result<Box<dyn TransferSession>> {
        let endpoint = endpoint.clone();
        let address = endpoint.address();
        let secure = endpoint.secure;

        let control = tokio::task::spawn_blocking(move || open_control(&endpoint, timeout))
            .await
            .map_err(|e| Error::Connection(format!("connect task failed: {e}")))??;

        tracing::debug!(address = %address, secure, "FTP session established");

        Ok(Box::new(FtpSession {
            control: Some(control),
            address,
        }))
    }

    fn name(&self) -> &'static str {
        "ftp"
    }
}

/// Control connection, with or without TLS
enum Control {
    Plain(FtpStream),
    Secure(Box<RustlsFtpStream>),
}

impl Control {
    fn login(&mut self, username: &str, password: &str) -> FtpResult<()> {
        match self {
            Control::Plain(stream) => stream.login(username, password),
            Control::Secure(stream) => stream.login(username, password),
        }
    }

    fn binary(&mut self) -> FtpResult<()> {
        match self {
            Control::Plain(stream) => stream.transfer_type(FileType::Binary),
            Control::Secure(stream) => stream.transfer_type(FileType::Binary),
        }
    }

    fn list(&mut self, path: &str) -> FtpResult<Vec<String>> {
        match self {
            Control::Plain(stream) => stream.list(Some(path)),
            Control::Secure(stream) => stream.list(Some(path)),
        }
    }

    fn retrieve(&mut self, path: &str) -> FtpResult<Vec<u8>> {
        let buffer = match self {
            Control::Plain(stream) => stream.retr_as_buffer(path),
            Control::Secure(stream) => stream.retr_as_buffer(path),
        };
        buffer.map(|cursor| cursor.into_inner())
    }

    fn quit(&mut self) -> FtpResult<()> {
        match self {
            Control::Plain(stream) => stream.quit(),
            Control::Secure(stream) => stream.quit(),
        }
    }
}

fn open_control(endpoint: &EndpointConfig, timeout: Duration) -> Result<Control> {
    let address = endpoint.address();
    let refused = |e: FtpError| Error::Connection(format!("{address}: {e}"));

    let socket_addr = (endpoint.host.as_str(), endpoint.port)
        .to_socket_addrs()
        .map_err(|e| Error::Connection(format!("cannot resolve {address}: {e}")))?
        .next()
        .ok_or_else(|| Error::Connection(format!("no address found for {address}")))?;

    let mut control = if endpoint.secure {
        let stream = RustlsFtpStream::connect_timeout(socket_addr, timeout).map_err(refused)?;
        bound_socket(stream.get_ref(), timeout).map_err(refused)?;
        let stream = stream
            .passive_stream_builder(move |addr| open_data_stream(addr, timeout))
            .into_secure(tls_connector()?, &endpoint.host)
            .map_err(|e| {
                Error::Connection(format!("{address}: TLS negotiation failed: {e}"))
            })?;
        Control::Secure(Box::new(stream))
    } else {
        let stream = FtpStream::connect_timeout(socket_addr, timeout).map_err(refused)?;
        bound_socket(stream.get_ref(), timeout).map_err(refused)?;
        Control::Plain(stream.passive_stream_builder(move |addr| open_data_stream(addr, timeout)))
    };

    control
        .login(&endpoint.username, &endpoint.password)
        .map_err(|e| {
            Error::Connection(format!(
                "login as {} on {address} failed: {e}",
                endpoint.username
            ))
        })?;

    control
        .binary()
        .map_err(|e| Error::Connection(format!("{address}: cannot switch to binary mode: {e}")))?;

    Ok(control)
}

/// Passive data connection with the same bounds as the control connection
fn open_data_stream(addr: SocketAddr, timeout: Duration) -> FtpResult<TcpStream> {
    let stream = TcpStream::connect_timeout(&addr, timeout).map_err(FtpError::ConnectionError)?;
    bound_socket(&stream, timeout)?;
    Ok(stream)
}

fn bound_socket(socket: &TcpStream, timeout: Duration) -> FtpResult<()> {
    socket
        .set_read_timeout(Some(timeout))
        .and_then(|()| socket.set_write_timeout(Some(timeout)))
        .map_err(FtpError::ConnectionError)
}

/// Client TLS settings trusting the Mozilla root set
fn tls_connector() -> Result<RustlsConnector> {
    let roots = rustls::RootCertStore::from_iter(webpki_roots::TLS_SERVER_ROOTS.iter().cloned());
    let config = rustls::ClientConfig::builder_with_provider(Arc::new(
        rustls::crypto::ring::default_provider(),
    ))
    .with_safe_default_protocol_versions()
    .map_err(|e| Error::Connection(format!("TLS setup failed: {e}")))?
    .with_root_certificates(roots)
    .with_no_client_auth();

    Ok(RustlsConnector::from(Arc::new(config)))
}

struct FtpSession {
    control: Option<Control>,
    address: String,
}

impl FtpSession {
    /// Run a blocking operation against the control connection
    async fn run<T, F>(&mut self, op: F) -> Result<T>
    where
        F: FnOnce(&mut Control) -> Result<T> + Send + 'static,
        T: Send + 'static,
    {
        let mut control = self.control.take().ok_or_else(|| {
            Error::Connection(format!(
                "session to {} lost after an interrupted transfer",
                self.address
            ))
        })?;

        let (control, result) = tokio::task::spawn_blocking(move || {
            let result = op(&mut control);
            (control, result)
        })
        .await
        .map_err(|e| Error::Connection(format!("transfer task failed: {e}")))?;

        self.control = Some(control);
        result
    }
}

/// Map a client error for `path`; broken connections end the session
fn classify(error: FtpError, on_refusal: impl FnOnce(String) -> Error) -> Error {
    match error {
        FtpError::ConnectionError(io) => Error::Connection(io.to_string()),
        other => on_refusal(other.to_string()),
    }
}

#[async_trait]
impl TransferSession for FtpSession {
    async fn list(&mut self, path: &str) -> Result<Vec<RemoteEntry>> {
        let owned = path.to_string();
        let lines = self
            .run(move |control| {
                control.list(&owned).map_err(|e| {
                    classify(e, |message| Error::DirectoryList {
                        path: owned.clone(),
                        message,
                    })
                })
            })
            .await?;

        Ok(lines
            .iter()
            .filter(|line| !line.trim().is_empty() && !line.starts_with("total "))
            .map(|line| parse_list_line(line))
            .collect())
    }

    async fn retrieve(&mut self, path: &str) -> Result<Vec<u8>> {
        let owned = path.to_string();
        self.run(move |control| {
            control.retrieve(&owned).map_err(|e| {
                classify(e, |message| Error::Transfer {
                    path: owned.clone(),
                    message,
                })
            })
        })
        .await
    }

    async fn close(&mut self) {
        let address = self.address.clone();
        let Some(mut control) = self.control.take() else {
            return;
        };

        match tokio::task::spawn_blocking(move || control.quit()).await {
            Ok(Ok(())) => tracing::debug!(address = %address, "FTP session closed"),
            Ok(Err(e)) => {
                tracing::debug!(address = %address, error = %e, "QUIT failed, dropping connection")
            }
            Err(e) => tracing::warn!(address = %address, error = %e, "QUIT task failed"),
        }
    }
}

/// Turn one LIST line into an entry; unparseable lines are kept under their raw text
fn parse_list_line(line: &str) -> RemoteEntry {
    match ListedFile::from_str(line) {
        Ok(file) => {
            let kind = if file.is_directory() {
                EntryKind::Directory
            } else if file.is_symlink() {
                EntryKind::Symlink
            } else {
                EntryKind::File
            };
            let (permissions, owner, group) = match unix_columns(line) {
                Some((mode, owner, group)) => (Some(mode), Some(owner), Some(group)),
                None => (None, None, None),
            };
            RemoteEntry {
                name: file.name().to_string(),
                size: file.size() as u64,
                modified_at: Some(DateTime::<Utc>::from(file.modified())),
                kind,
                permissions,
                owner,
                group,
                link_target: file.symlink().map(|target| target.display().to_string()),
            }
        }
        Err(e) => {
            tracing::debug!(line = %line, error = %e, "Unparseable LIST line");
            RemoteEntry {
                name: line.to_string(),
                size: 0,
                modified_at: None,
                kind: EntryKind::Unknown,
                permissions: None,
                owner: None,
                group: None,
                link_target: None,
            }
        }
    }
}

/// Mode bits, owner and group columns of a Unix `ls -l` line
///
/// `suppaftp` keeps only numeric ids, so named owners are read from the
/// line itself. DOS-style lines have no such columns.
fn unix_columns(line: &str) -> Option<(String, String, String)> {
    let mut columns = line.split_whitespace();
    let mode = columns.next()?;
    let (kind, bits) = mode.split_at_checked(1)?;
    // ACL and extended-attribute markers
    let bits = bits.trim_end_matches(['+', '@', '.']);

    let is_mode = matches!(kind, "-" | "d" | "l" | "b" | "c" | "p" | "s")
        && bits.len() == 9
        && bits.chars().all(|c| "rwxsStTl-".contains(c));
    if !is_mode {
        return None;
    }

    let _links = columns.next()?;
    let owner = columns.next()?;
    let group = columns.next()?;
    Some((bits.to_string(), owner.to_string(), group.to_string()))
}
