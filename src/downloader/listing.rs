//! Directory listing and the known-files check.

use super::FtpDownloader;
use crate::error::Result;
use crate::types::{KnownFile, RemoteEntry};
use futures::FutureExt;

impl FtpDownloader {
    /// List one remote directory, entries in server order
    ///
    /// # Errors
    ///
    /// [`Error::Connection`](crate::Error::Connection) if no session can be
    /// opened, or the listing error reported by the server.
    pub async fn list_directory(&self, path: &str) -> Result<Vec<RemoteEntry>> {
        let directory = path.to_string();

        let entries = self
            .sessions
            .with_session(move |session| async move { session.list(&directory).await }.boxed())
            .await??;

        tracing::debug!(directory = %path, entries = entries.len(), "Listed directory");
        Ok(entries)
    }

    /// List every configured known directory and flatten the results
    ///
    /// A directory that cannot be listed is logged and skipped; the check
    /// only fails when no session can be opened at all.
    ///
    /// # Errors
    ///
    /// [`Error::Connection`](crate::Error::Connection) if no session can be opened.
    pub async fn check_known_files(&self) -> Result<Vec<KnownFile>> {
        let directories = self.config.transfer.known_directories.clone();

        self.sessions
            .with_session(move |session| {
                async move {
                    let mut files = Vec::new();
                    for directory in &directories {
                        match session.list(directory).await {
                            Ok(entries) => {
                                files.extend(entries.into_iter().map(|entry| KnownFile {
                                    path: join_remote(directory, &entry.name),
                                    size: entry.size,
                                    date: entry.modified_at,
                                }));
                            }
                            Err(e) => {
                                tracing::warn!(directory = %directory, error = %e, "Skipping directory that could not be listed");
                            }
                        }
                    }
                    files
                }
                .boxed()
            })
            .await
    }
}

fn join_remote(directory: &str, name: &str) -> String {
    format!("{}/{}", directory.trim_end_matches('/'), name)
}
