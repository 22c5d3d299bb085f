//! Alternate path spellings for files that fail to download verbatim
//!
//! FTP servers disagree about what a path is relative to: some chroot users
//! into the site root, some into their home directory, some reject absolute
//! paths outright. When a requested path fails, the downloader retries a
//! fixed, ordered set of rewrites of the same path:
//!
//! 1. without the leading `/`
//! 2. the slash-less form prefixed with `./`
//! 3. without the known top-level directory segment (e.g. `www/`)
//! 4. without that segment but keeping a leading `/`
//!
//! Rules that do not apply to a path are skipped, and a rewrite equal to the
//! original path or to an earlier rewrite is dropped.

/// Ordered alternate spellings of `original`, not including `original` itself
///
/// `prefix` is the top-level directory segment rule 3 and 4 strip
/// (without slashes, e.g. `"www"`). An empty prefix disables those rules.
///
/// ```
/// use ftp_relay::resolver::candidates;
///
/// assert_eq!(
///     candidates("/www/receipt/a.csv", "www"),
///     vec![
///         "www/receipt/a.csv",
///         "./www/receipt/a.csv",
///         "receipt/a.csv",
///         "/receipt/a.csv",
///     ]
/// );
/// ```
pub fn candidates(original: &str, prefix: &str) -> Vec<String> {
    let relative = original.strip_prefix('/').unwrap_or(original);
    let relative = relative.strip_prefix("./").unwrap_or(relative);

    let mut rewrites = Vec::with_capacity(4);

    if original.starts_with('/') && !relative.is_empty() {
        rewrites.push(relative.to_string());
    }

    if !relative.is_empty() {
        rewrites.push(format!("./{relative}"));
    }

    let prefix = prefix.trim_matches('/');
    if !prefix.is_empty() {
        if let Some(rest) = relative
            .strip_prefix(prefix)
            .and_then(|rest| rest.strip_prefix('/'))
            .filter(|rest| !rest.is_empty())
        {
            rewrites.push(rest.to_string());
            rewrites.push(format!("/{rest}"));
        }
    }

    let mut unique: Vec<String> = Vec::with_capacity(rewrites.len());
    for rewrite in rewrites {
        if rewrite != original && !unique.contains(&rewrite) {
            unique.push(rewrite);
        }
    }
    unique
}
