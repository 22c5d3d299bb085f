//! REST API server module
//!
//! Exposes the relay over HTTP under `/api/ftp`, with an OpenAPI document and
//! optional Swagger UI.

use crate::{Config, FtpDownloader, Result};
use axum::{
    Router,
    extract::{DefaultBodyLimit, State},
    http::{HeaderValue, StatusCode},
    middleware,
    response::{IntoResponse, Response},
    routing::{get, post},
};
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

pub mod error_response;
pub mod extract;
pub mod openapi;
pub mod routes;
pub mod state;

pub use openapi::ApiDoc;
pub use state::AppState;

/// Path the Swagger UI loads its document from
const SWAGGER_DOC_PATH: &str = "/api-docs/openapi.json";

/// Create the API router with all route definitions
///
/// # Routes
///
/// ## Files
/// - `POST /api/ftp/download` - Download paths over a single session
/// - `POST /api/ftp/download-batch` - Download paths in chunks, one session per chunk
///
/// ## Listing
/// - `POST /api/ftp/list` - List one remote directory
/// - `POST /api/ftp/check-files` - List every known directory
///
/// ## System
/// - `GET /api/ftp/test-download` - Diagnostic probe of one file
/// - `GET /api/ftp/health` - Health check
/// - `GET /api/ftp/openapi.json` - OpenAPI specification
/// - `GET /swagger-ui` - Interactive Swagger UI documentation (if enabled)
pub fn create_router(downloader: Arc<FtpDownloader>, config: Arc<Config>) -> Router {
    let state = AppState::new(downloader, config.clone());

    let ftp = Router::new()
        // Files
        .route("/download", post(routes::download_files))
        .route("/download-batch", post(routes::download_batch))
        // Listing
        .route("/list", post(routes::list_directory))
        .route("/check-files", post(routes::check_files))
        // System
        .route("/test-download", get(routes::test_download))
        .route("/health", get(routes::health_check))
        .route("/openapi.json", get(routes::openapi_spec));

    let router = Router::new().nest("/api/ftp", ftp);

    // Merge Swagger UI routes if enabled in config (before applying state)
    let router = if config.server.api.swagger_ui {
        router.merge(SwaggerUi::new("/swagger-ui").url(SWAGGER_DOC_PATH, ApiDoc::openapi()))
    } else {
        router
    };

    // Layers applied last run first: trace → timeout body → timeout → body limit → handler
    let request_timeout = config.server.api.request_timeout;
    let router = router
        .with_state(state)
        .layer(DefaultBodyLimit::max(config.server.api.body_limit_bytes))
        .layer(TimeoutLayer::new(request_timeout))
        .layer(middleware::map_response_with_state(
            request_timeout,
            timeout_as_api_error,
        ))
        .layer(TraceLayer::new_for_http());

    if config.server.api.cors_enabled {
        let cors = build_cors_layer(&config.server.api.cors_origins);
        router.layer(cors)
    } else {
        router
    }
}

/// Give the bare 408 from the timeout layer the usual JSON error body
async fn timeout_as_api_error(State(limit): State<Duration>, response: Response) -> Response {
    if response.status() == StatusCode::REQUEST_TIMEOUT {
        tracing::warn!(timeout_ms = limit.as_millis() as u64, "Request timed out");
        crate::error::Error::RequestTimeout {
            timeout_ms: limit.as_millis() as u64,
        }
        .into_response()
    } else {
        response
    }
}

/// Build a CORS layer based on configured origins
///
/// `"*"` anywhere in `origins` (or an empty list) allows every origin.
fn build_cors_layer(origins: &[String]) -> CorsLayer {
    let allow_any = origins.iter().any(|o| o == "*");

    if allow_any || origins.is_empty() {
        CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any)
    } else {
        let allowed: Vec<HeaderValue> = origins.iter().filter_map(|o| o.parse().ok()).collect();

        CorsLayer::new()
            .allow_origin(AllowOrigin::list(allowed))
            .allow_methods(Any)
            .allow_headers(Any)
    }
}

/// Start the API server on the configured bind address.
///
/// Serves until SIGINT/SIGTERM (Ctrl+C elsewhere), then lets in-flight
/// requests finish before returning.
///
/// # Example
///
/// ```no_run
/// use ftp_relay::{Config, FtpDownloader};
/// use std::sync::Arc;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let config = Arc::new(Config::from_env()?);
/// let downloader = Arc::new(FtpDownloader::new((*config).clone())?);
///
/// // Start API server (blocks until shutdown)
/// ftp_relay::api::start_api_server(downloader, config).await?;
/// # Ok(())
/// # }
/// ```
pub async fn start_api_server(downloader: Arc<FtpDownloader>, config: Arc<Config>) -> Result<()> {
    let bind_address = config.server.api.bind_address;

    tracing::info!(address = %bind_address, "Starting API server");

    let app = create_router(downloader, config);

    let listener = TcpListener::bind(bind_address)
        .await
        .map_err(crate::error::Error::Io)?;

    tracing::info!(
        address = %listener.local_addr().unwrap_or(bind_address),
        "API server listening"
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(crate::wait_for_signal())
        .await
        .map_err(|e| crate::error::Error::ApiServerError(e.to_string()))?;

    tracing::info!("API server stopped");
    Ok(())
}

// unwrap/expect are acceptable in tests for concise failure-on-error assertions
#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
mod tests;
