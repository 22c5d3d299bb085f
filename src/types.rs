//! Core types for ftp-relay

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use utoipa::ToSchema;

/// Kind of a remote directory entry
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum EntryKind {
    /// Regular file
    File,
    /// Directory
    Directory,
    /// Symbolic link
    Symlink,
    /// Anything the listing parser could not classify
    Unknown,
}

/// One entry of a remote directory listing, as reported by the transport
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RemoteEntry {
    /// Entry name (no directory part)
    pub name: String,

    /// Size in bytes
    pub size: u64,

    /// Last modification time, when the server reports one
    pub modified_at: Option<DateTime<Utc>>,

    /// Entry kind
    #[serde(rename = "type")]
    pub kind: EntryKind,

    /// Unix mode bits without the type character (e.g. `rw-r--r--`)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub permissions: Option<String>,

    /// Owning user as printed by the server
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub owner: Option<String>,

    /// Owning group as printed by the server
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub group: Option<String>,

    /// Where a symlink points
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub link_target: Option<String>,
}

impl RemoteEntry {
    /// A regular file entry
    pub fn file(name: impl Into<String>, size: u64, modified_at: Option<DateTime<Utc>>) -> Self {
        Self {
            name: name.into(),
            size,
            modified_at,
            kind: EntryKind::File,
            permissions: None,
            owner: None,
            group: None,
            link_target: None,
        }
    }

    /// Attach Unix ownership details
    pub fn with_owner(
        mut self,
        permissions: impl Into<String>,
        owner: impl Into<String>,
        group: impl Into<String>,
    ) -> Self {
        self.permissions = Some(permissions.into());
        self.owner = Some(owner.into());
        self.group = Some(group.into());
        self
    }
}

/// A file found by the known-files check
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct KnownFile {
    /// Full remote path (`<directory>/<name>`)
    pub path: String,

    /// Size in bytes
    pub size: u64,

    /// Last modification time
    pub date: Option<DateTime<Utc>>,
}

/// Outcome of a multi-file download
///
/// `data` holds exactly one key per distinct requested path: the decoded
/// content, or `None` when every attempt failed.
#[must_use]
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct DownloadReport {
    /// Requested path → content (`null` on failure)
    pub data: BTreeMap<String, Option<String>>,

    /// Requested path → alternate path that actually worked
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub resolved: BTreeMap<String, String>,

    /// Requested path → failure reason (only when error reporting is enabled)
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub errors: BTreeMap<String, String>,
}

impl DownloadReport {
    /// Number of paths that produced content
    pub fn succeeded(&self) -> usize {
        self.data.values().filter(|v| v.is_some()).count()
    }

    /// Number of paths that ended with the failure marker
    pub fn failed(&self) -> usize {
        self.data.values().filter(|v| v.is_none()).count()
    }
}

/// Result of the diagnostic single-file probe
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProbeReport {
    /// Whether any spelling of the path could be downloaded
    pub success: bool,

    /// The path as requested
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,

    /// The alternate spelling that worked, when the requested one did not
    #[serde(skip_serializing_if = "Option::is_none")]
    pub correct_path: Option<String>,

    /// The requested path, repeated when an alternate was used
    #[serde(skip_serializing_if = "Option::is_none")]
    pub original_path: Option<String>,

    /// Content length in characters
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size: Option<usize>,

    /// First characters of the content followed by `...`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub preview: Option<String>,

    /// Error from the direct attempt, when nothing worked
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,

    /// Every alternate spelling that was tried, when nothing worked
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub tried_paths: Vec<String>,
}
