//! Route handlers for the REST API
//!
//! Handlers are organized by domain:
//! - [`files`] - Single-session and chunked downloads
//! - [`listing`] - Directory listing and the known-files check
//! - [`system`] - Probe, health, OpenAPI

use crate::types::{DownloadReport, KnownFile, RemoteEntry};
use serde::{Deserialize, Serialize};

mod files;
mod listing;
mod system;

// Re-export all handlers so `routes::function_name` works
pub use files::*;
pub use listing::*;
pub use system::*;

// ============================================================================
// Query/Request Types (shared across handlers)
// ============================================================================

/// Request body for POST /download and POST /download-batch
#[derive(Debug, Deserialize, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DownloadRequest {
    /// Remote paths to fetch, in order
    pub file_paths: Vec<String>,

    /// Paths per session for /download-batch (default: configured batch size)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub batch_size: Option<usize>,
}

/// Request body for POST /list
#[derive(Debug, Deserialize, Serialize, utoipa::ToSchema)]
pub struct ListRequest {
    /// Remote directory to list
    pub directory: String,
}

/// Query parameters for GET /test-download
#[derive(Debug, Deserialize, Serialize, utoipa::IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ProbeQuery {
    /// File to probe (default: configured probe path)
    pub path: Option<String>,
}

// ============================================================================
// Response Types
// ============================================================================

/// Response body for the download endpoints
#[derive(Debug, Deserialize, Serialize, utoipa::ToSchema)]
pub struct DownloadResponse {
    /// Always `true`; per-path failures show up as `null` content
    pub success: bool,

    /// Content per path, plus `resolved` and `errors` when non-empty
    #[serde(flatten)]
    pub report: DownloadReport,
}

/// Response body for POST /list
#[derive(Debug, Deserialize, Serialize, utoipa::ToSchema)]
pub struct ListResponse {
    /// Always `true`
    pub success: bool,

    /// Entries in server order
    pub data: Vec<RemoteEntry>,
}

/// Response body for POST /check-files
#[derive(Debug, Deserialize, Serialize, utoipa::ToSchema)]
pub struct CheckFilesResponse {
    /// Always `true`
    pub success: bool,

    /// Files found across every listable known directory
    pub files: Vec<KnownFile>,
}
