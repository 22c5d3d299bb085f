//! Directory listing handlers.

use super::{CheckFilesResponse, ListRequest, ListResponse};
use crate::Result;
use crate::api::AppState;
use crate::api::extract::ApiJson;
use axum::{Json, extract::State};

/// POST /list - List one remote directory
#[utoipa::path(
    post,
    path = "/api/ftp/list",
    tag = "listing",
    request_body = ListRequest,
    responses(
        (status = 200, description = "Directory entries in server order", body = ListResponse),
        (status = 400, description = "Malformed request body", body = crate::error::ApiError),
        (status = 500, description = "Session or listing failed", body = crate::error::ApiError)
    )
)]
pub async fn list_directory(
    State(state): State<AppState>,
    ApiJson(request): ApiJson<ListRequest>,
) -> Result<Json<ListResponse>> {
    let data = state.downloader.list_directory(&request.directory).await?;

    Ok(Json(ListResponse {
        success: true,
        data,
    }))
}

/// POST /check-files - List every known directory
#[utoipa::path(
    post,
    path = "/api/ftp/check-files",
    tag = "listing",
    responses(
        (status = 200, description = "Files found in the known directories", body = CheckFilesResponse),
        (status = 500, description = "Session could not be opened", body = crate::error::ApiError)
    )
)]
pub async fn check_files(State(state): State<AppState>) -> Result<Json<CheckFilesResponse>> {
    let files = state.downloader.check_known_files().await?;

    Ok(Json(CheckFilesResponse {
        success: true,
        files,
    }))
}
