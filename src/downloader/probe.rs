//! Diagnostic single-file probe.

use super::FtpDownloader;
use super::fetch::fetch_with_fallback;
use crate::error::Result;
use crate::types::ProbeReport;
use futures::FutureExt;

/// Characters of content shown in a probe preview
const PREVIEW_CHARS: usize = 200;

impl FtpDownloader {
    /// Try to download one file and report which spelling of its path works
    ///
    /// Uses `path`, or the configured probe path when `None`. The report says
    /// whether the requested path worked, which alternate worked instead, or
    /// which alternates were tried in vain.
    ///
    /// # Errors
    ///
    /// [`Error::Connection`](crate::Error::Connection) if no session can be opened.
    pub async fn probe_download(&self, path: Option<&str>) -> Result<ProbeReport> {
        let path = path.unwrap_or(&self.config.transfer.probe_path).to_string();
        let prefix = self.config.transfer.path_prefix.clone();

        let outcome = self
            .sessions
            .with_session(move |session| {
                async move { fetch_with_fallback(session, &path, &prefix).await }.boxed()
            })
            .await?;

        let report = match outcome.result {
            Ok(content) => {
                let size = content.chars().count();
                let preview = format!(
                    "{}...",
                    content.chars().take(PREVIEW_CHARS).collect::<String>()
                );
                match outcome.resolved {
                    Some(alternate) => ProbeReport {
                        success: true,
                        correct_path: Some(alternate),
                        original_path: Some(outcome.path),
                        size: Some(size),
                        preview: Some(preview),
                        ..Default::default()
                    },
                    None => ProbeReport {
                        success: true,
                        path: Some(outcome.path),
                        size: Some(size),
                        preview: Some(preview),
                        ..Default::default()
                    },
                }
            }
            Err(e) => ProbeReport {
                success: false,
                path: Some(outcome.path),
                error: Some(e.to_string()),
                tried_paths: outcome.tried,
                ..Default::default()
            },
        };

        tracing::info!(
            success = report.success,
            correct_path = report.correct_path.as_deref().unwrap_or("-"),
            "Probe finished"
        );

        Ok(report)
    }
}
