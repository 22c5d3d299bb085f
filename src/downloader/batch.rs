//! Chunked multi-path downloads and result aggregation.

use super::FtpDownloader;
use super::fetch::{FetchOutcome, fetch_with_fallback};
use crate::error::{Error, Result};
use crate::types::DownloadReport;
use futures::FutureExt;

impl FtpDownloader {
    /// Download `paths` in chunks of `batch_size`, one session per chunk
    ///
    /// Chunks run one after another and paths inside a chunk run in request
    /// order, so a request never holds more than one connection. A chunk
    /// whose session cannot be opened marks all of its paths failed; later
    /// chunks still run. Individual path failures never stop the batch.
    ///
    /// Every requested path ends up in `report.data` exactly once (a
    /// duplicated path keeps the outcome of its last occurrence).
    ///
    /// # Errors
    ///
    /// [`Error::InvalidRequest`] when `batch_size` is zero.
    pub async fn download_batch(&self, paths: &[String], batch_size: usize) -> Result<DownloadReport> {
        if batch_size == 0 {
            return Err(Error::InvalidRequest(
                "batch size must be at least 1".to_string(),
            ));
        }

        let mut report = DownloadReport::default();
        if paths.is_empty() {
            return Ok(report);
        }

        let started = std::time::Instant::now();
        let total_chunks = paths.len().div_ceil(batch_size);

        for (index, chunk) in paths.chunks(batch_size).enumerate() {
            tracing::debug!(
                chunk = index + 1,
                total_chunks,
                paths = chunk.len(),
                "Processing chunk"
            );

            match self.fetch_chunk(chunk.to_vec()).await {
                Ok(outcomes) => {
                    for outcome in outcomes {
                        self.record(&mut report, outcome);
                    }
                }
                Err(e) => {
                    tracing::warn!(
                        chunk = index + 1,
                        total_chunks,
                        error = %e,
                        "Could not open session, marking chunk as failed"
                    );
                    for path in chunk {
                        self.record_failure(&mut report, path, &e);
                    }
                }
            }
        }

        tracing::info!(
            requested = paths.len(),
            chunks = total_chunks,
            succeeded = report.succeeded(),
            failed = report.failed(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "Batch download finished"
        );

        Ok(report)
    }

    /// Download `paths` over a single session
    ///
    /// Same per-path behavior as [`download_batch`](Self::download_batch),
    /// but all paths share one session and a failure to open it fails the
    /// whole call.
    ///
    /// # Errors
    ///
    /// [`Error::Connection`] if the session cannot be opened.
    pub async fn download_all(&self, paths: &[String]) -> Result<DownloadReport> {
        let mut report = DownloadReport::default();
        if paths.is_empty() {
            return Ok(report);
        }

        let started = std::time::Instant::now();
        let outcomes = self.fetch_chunk(paths.to_vec()).await?;
        for outcome in outcomes {
            self.record(&mut report, outcome);
        }

        tracing::info!(
            requested = paths.len(),
            succeeded = report.succeeded(),
            failed = report.failed(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "Download finished"
        );

        Ok(report)
    }

    /// Fetch every path of one chunk, in order, on one session
    async fn fetch_chunk(&self, chunk: Vec<String>) -> Result<Vec<FetchOutcome>> {
        let prefix = self.config.transfer.path_prefix.clone();

        self.sessions
            .with_session(move |session| {
                async move {
                    let mut outcomes = Vec::with_capacity(chunk.len());
                    for path in &chunk {
                        outcomes.push(fetch_with_fallback(session, path, &prefix).await);
                    }
                    outcomes
                }
                .boxed()
            })
            .await
    }

    fn record(&self, report: &mut DownloadReport, outcome: FetchOutcome) {
        match outcome.result {
            Ok(content) => {
                report.errors.remove(&outcome.path);
                match outcome.resolved {
                    Some(alternate) => {
                        report.resolved.insert(outcome.path.clone(), alternate);
                    }
                    None => {
                        report.resolved.remove(&outcome.path);
                    }
                }
                report.data.insert(outcome.path, Some(content));
            }
            Err(e) => self.record_failure(report, &outcome.path, &e),
        }
    }

    fn record_failure(&self, report: &mut DownloadReport, path: &str, error: &Error) {
        report.resolved.remove(path);
        if self.config.transfer.report_errors {
            report.errors.insert(path.to_string(), error.to_string());
        }
        report.data.insert(path.to_string(), None);
    }
}
