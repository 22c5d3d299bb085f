//! OpenAPI documentation and schema generation

use utoipa::OpenApi;

/// OpenAPI documentation for the ftp-relay REST API
///
/// Served as JSON at `/api/ftp/openapi.json` and rendered at `/swagger-ui`.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "ftp-relay REST API",
        version = "0.1.0",
        description = "Fetch files and directory listings from an FTP server over HTTP",
        license(
            name = "MIT OR Apache-2.0"
        )
    ),
    servers(
        (url = "http://localhost:3001", description = "Local development server")
    ),
    paths(
        // Files
        crate::api::routes::download_files,
        crate::api::routes::download_batch,

        // Listing
        crate::api::routes::list_directory,
        crate::api::routes::check_files,

        // System
        crate::api::routes::test_download,
        crate::api::routes::health_check,
        crate::api::routes::openapi_spec,
    ),
    components(schemas(
        // Core types from types.rs
        crate::types::EntryKind,
        crate::types::RemoteEntry,
        crate::types::KnownFile,
        crate::types::DownloadReport,
        crate::types::ProbeReport,

        // API request/response types
        crate::api::routes::DownloadRequest,
        crate::api::routes::DownloadResponse,
        crate::api::routes::ListRequest,
        crate::api::routes::ListResponse,
        crate::api::routes::CheckFilesResponse,

        // Error types from error.rs
        crate::error::ApiError,
    )),
    tags(
        (name = "files", description = "File downloads - Single-session and chunked multi-file retrieval"),
        (name = "listing", description = "Directory listings - One directory or every known directory"),
        (name = "system", description = "System endpoints - Probe, health check, OpenAPI spec"),
    )
)]
pub struct ApiDoc;
