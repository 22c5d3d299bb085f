//! Application state for the API server

use crate::{Config, FtpDownloader};
use std::sync::Arc;

/// Shared application state accessible to all route handlers
///
/// Cloned for each request (two Arc clones).
#[derive(Clone)]
pub struct AppState {
    /// The relay instance
    pub downloader: Arc<FtpDownloader>,

    /// Configuration (read-only)
    pub config: Arc<Config>,
}

impl AppState {
    /// Create a new AppState
    pub fn new(downloader: Arc<FtpDownloader>, config: Arc<Config>) -> Self {
        Self { downloader, config }
    }
}
