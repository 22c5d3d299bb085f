//! Request extractors that fail with the relay's JSON error body.

use crate::error::Error;
use axum::extract::FromRequest;
use axum::extract::rejection::JsonRejection;

/// `axum::Json` whose rejections are reported as [`Error::InvalidRequest`]
///
/// A missing field, a wrong type, malformed JSON or a missing
/// `content-type` all come back as a 400 with the usual
/// `{ "success": false, ... }` body instead of axum's plain-text reply.
#[derive(Debug, FromRequest)]
#[from_request(via(axum::Json), rejection(Error))]
pub struct ApiJson<T>(pub T);

impl From<JsonRejection> for Error {
    fn from(rejection: JsonRejection) -> Self {
        Error::InvalidRequest(rejection.body_text())
    }
}
