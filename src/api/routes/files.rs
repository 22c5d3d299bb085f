//! Download handlers.

use super::{DownloadRequest, DownloadResponse};
use crate::Result;
use crate::api::AppState;
use crate::api::extract::ApiJson;
use axum::{Json, extract::State};

/// POST /download - Download every path over one session
#[utoipa::path(
    post,
    path = "/api/ftp/download",
    tag = "files",
    request_body = DownloadRequest,
    responses(
        (status = 200, description = "Content per requested path (null on failure)", body = DownloadResponse),
        (status = 400, description = "Malformed request body", body = crate::error::ApiError),
        (status = 500, description = "Session could not be opened", body = crate::error::ApiError)
    )
)]
pub async fn download_files(
    State(state): State<AppState>,
    ApiJson(request): ApiJson<DownloadRequest>,
) -> Result<Json<DownloadResponse>> {
    let report = state.downloader.download_all(&request.file_paths).await?;

    Ok(Json(DownloadResponse {
        success: true,
        report,
    }))
}

/// POST /download-batch - Download paths in chunks, one session per chunk
#[utoipa::path(
    post,
    path = "/api/ftp/download-batch",
    tag = "files",
    request_body = DownloadRequest,
    responses(
        (status = 200, description = "Content per requested path (null on failure)", body = DownloadResponse),
        (status = 400, description = "Malformed request body or batch size of zero", body = crate::error::ApiError),
        (status = 500, description = "Internal server error", body = crate::error::ApiError)
    )
)]
pub async fn download_batch(
    State(state): State<AppState>,
    ApiJson(request): ApiJson<DownloadRequest>,
) -> Result<Json<DownloadResponse>> {
    let batch_size = request
        .batch_size
        .unwrap_or(state.config.transfer.batch_size);

    let report = state
        .downloader
        .download_batch(&request.file_paths, batch_size)
        .await?;

    Ok(Json(DownloadResponse {
        success: true,
        report,
    }))
}
