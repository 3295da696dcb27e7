//! File-based shared cache.
//!
//! [`FileSharedCache`] stores each entry as a single file with a binary
//! header followed by the value:
//!
//! ```text
//! [expires_at: u64 LE unix seconds, 0 = never][value bytes]
//! ```
//!
//! On read, the header is checked first; expired entries are removed and
//! reported as misses. This gives several processes on one host a common
//! cache tier without running a cache server.

use std::fs::{self, File};
use std::io::Read;
use std::path::PathBuf;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use crate::SharedCache;

/// Cross-process [`SharedCache`] rooted at a directory on disk.
///
/// Keys map directly to file names under the root; key segments separated
/// by `/` become subdirectories.
pub struct FileSharedCache {
    root: PathBuf,
}

impl FileSharedCache {
    /// Create a new file-based cache at `root`.
    ///
    /// The directory is created lazily on first write.
    #[must_use]
    pub fn new(root: PathBuf) -> Self {
        Self { root }
    }

    fn entry_path(&self, key: &str) -> PathBuf {
        self.root.join(key)
    }

    fn now_secs() -> u64 {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map_or(0, |d| d.as_secs())
    }
}

impl SharedCache for FileSharedCache {
    fn get(&self, key: &str) -> Option<String> {
        let path = self.entry_path(key);
        let mut file = File::open(&path).ok()?;

        // Read expiry header (u64 LE)
        let mut header = [0u8; 8];
        file.read_exact(&mut header).ok()?;
        let expires_at = u64::from_le_bytes(header);

        if expires_at != 0 && Self::now_secs() >= expires_at {
            drop(file);
            let _ = fs::remove_file(&path);
            return None;
        }

        let mut value = String::new();
        file.read_to_string(&mut value).ok()?;
        Some(value)
    }

    fn set(&self, key: &str, value: &str, ttl: Option<Duration>) {
        let path = self.entry_path(key);

        // Silently ignore errors — cache is optional
        let Some(parent) = path.parent() else {
            return;
        };
        if let Err(e) = fs::create_dir_all(parent) {
            tracing::debug!(error = %e, "failed to create cache directory");
            return;
        }

        let expires_at = ttl.map_or(0, |ttl| Self::now_secs().saturating_add(ttl.as_secs()));

        let value_bytes = value.as_bytes();
        let mut buf = Vec::with_capacity(8 + value_bytes.len());
        buf.extend_from_slice(&expires_at.to_le_bytes());
        buf.extend_from_slice(value_bytes);

        if let Err(e) = fs::write(&path, &buf) {
            tracing::debug!(error = %e, "failed to write cache entry");
        }
    }

    fn del(&self, key: &str) {
        let path = self.entry_path(key);
        if path.exists()
            && let Err(e) = fs::remove_file(&path)
        {
            tracing::debug!(error = %e, "failed to remove cache entry");
        }
    }
}
