//! Single-path download with alternate-path fallback.

use super::session::ManagedSession;
use crate::error::Error;
use crate::resolver;

/// What happened when one requested path was fetched
#[derive(Debug)]
pub struct FetchOutcome {
    /// The path as requested
    pub path: String,

    /// Decoded content, or the error from the direct attempt
    pub result: Result<String, Error>,

    /// The alternate spelling that produced the content, if the direct attempt failed
    pub resolved: Option<String>,

    /// Alternate spellings attempted, in order
    pub tried: Vec<String>,
}

/// Fetch `path` on `session`, falling back to its alternate spellings
///
/// The direct attempt always comes first. Its error is the one reported when
/// no alternate works. A lost session stops the fallback: further attempts
/// could only fail the same way.
pub(crate) async fn fetch_with_fallback(
    session: &mut ManagedSession,
    path: &str,
    prefix: &str,
) -> FetchOutcome {
    let direct_error = match session.retrieve(path).await {
        Ok(bytes) => {
            let content = decode_text(bytes);
            tracing::debug!(path = %path, chars = content.chars().count(), "Downloaded");
            return FetchOutcome {
                path: path.to_string(),
                result: Ok(content),
                resolved: None,
                tried: Vec::new(),
            };
        }
        Err(e) => e,
    };

    let mut tried = Vec::new();

    if !direct_error.is_connection() {
        tracing::debug!(path = %path, error = %direct_error, "Direct download failed, trying alternate paths");

        for candidate in resolver::candidates(path, prefix) {
            tried.push(candidate.clone());
            match session.retrieve(&candidate).await {
                Ok(bytes) => {
                    tracing::info!(path = %path, resolved = %candidate, "Downloaded via alternate path");
                    return FetchOutcome {
                        path: path.to_string(),
                        result: Ok(decode_text(bytes)),
                        resolved: Some(candidate),
                        tried,
                    };
                }
                Err(e) if e.is_connection() => {
                    tracing::warn!(path = %path, candidate = %candidate, error = %e, "Session lost during fallback");
                    break;
                }
                Err(e) => {
                    tracing::debug!(path = %path, candidate = %candidate, error = %e, "Alternate path failed");
                }
            }
        }
    }

    tracing::warn!(path = %path, error = %direct_error, tried = tried.len(), "Download failed");

    FetchOutcome {
        path: path.to_string(),
        result: Err(direct_error),
        resolved: None,
        tried,
    }
}

/// Decode downloaded bytes as UTF-8, replacing invalid sequences
pub(crate) fn decode_text(bytes: Vec<u8>) -> String {
    String::from_utf8(bytes)
        .unwrap_or_else(|e| String::from_utf8_lossy(e.as_bytes()).into_owned())
}
