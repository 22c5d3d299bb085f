//! System handlers: probe, health, OpenAPI.

use super::ProbeQuery;
use crate::Result;
use crate::api::AppState;
use crate::types::ProbeReport;
use axum::{
    Json,
    extract::{Query, State},
    response::IntoResponse,
};
use serde_json::json;

/// GET /test-download - Probe one file and report which path spelling works
#[utoipa::path(
    get,
    path = "/api/ftp/test-download",
    tag = "system",
    params(ProbeQuery),
    responses(
        (status = 200, description = "Probe result, successful or not", body = ProbeReport),
        (status = 500, description = "Session could not be opened", body = crate::error::ApiError)
    )
)]
pub async fn test_download(
    State(state): State<AppState>,
    Query(query): Query<ProbeQuery>,
) -> Result<Json<ProbeReport>> {
    let report = state
        .downloader
        .probe_download(query.path.as_deref())
        .await?;
    Ok(Json(report))
}

/// GET /health - Health check
#[utoipa::path(
    get,
    path = "/api/ftp/health",
    tag = "system",
    responses(
        (status = 200, description = "Service is healthy")
    )
)]
pub async fn health_check() -> impl IntoResponse {
    Json(json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION")
    }))
}

/// GET /openapi.json - OpenAPI specification
#[utoipa::path(
    get,
    path = "/api/ftp/openapi.json",
    tag = "system",
    responses(
        (status = 200, description = "OpenAPI 3.1 specification in JSON format")
    )
)]
pub async fn openapi_spec() -> impl IntoResponse {
    use crate::api::openapi::ApiDoc;
    use utoipa::OpenApi;

    Json(ApiDoc::openapi())
}
