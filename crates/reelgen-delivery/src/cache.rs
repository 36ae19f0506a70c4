// SPDX-FileCopyrightText: 2026 Reelgen Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Local video cache: per-request files and the stale-file sweep.
//!
//! Each download gets a fresh [`CacheGuard`]. The guard removes its file when
//! dropped, so every exit path of a delivery (error, timeout, cancellation)
//! leaves nothing behind. Only [`CacheGuard::persist`] keeps the file.

use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime};

use chrono::{DateTime, Utc};
use tracing::{debug, info, warn};

/// Prefix shared by every cache file; the sweep only touches these.
pub const CACHE_FILE_PREFIX: &str = "reelgen_";

const DEFAULT_EXTENSION: &str = "mp4";

const KNOWN_EXTENSIONS: &[&str] = &["mp4", "webm", "mov", "m4v", "mkv"];

/// MIME type for a cached file, from its extension. Unknown types are sent as mp4.
pub fn mime_for(path: &Path) -> &'static str {
    let ext = path
        .extension()
        .map(|e| e.to_string_lossy().to_ascii_lowercase())
        .unwrap_or_default();
    match ext.as_str() {
        "webm" => "video/webm",
        "mov" => "video/quicktime",
        "m4v" => "video/x-m4v",
        "mkv" => "video/x-matroska",
        _ => "video/mp4",
    }
}

/// A downloaded video on local disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CachedVideoFile {
    pub local_path: PathBuf,
    pub size_bytes: u64,
    pub created_at: DateTime<Utc>,
    pub retain: bool,
}

/// Owns a cache file and deletes it on drop unless persisted.
#[derive(Debug)]
pub struct CacheGuard {
    file: CachedVideoFile,
    armed: bool,
}

impl CacheGuard {
    /// Reserves a unique path for `video_url` under `dir`. Does not touch disk.
    pub fn new(dir: &Path, video_url: &str, retain: bool) -> Self {
        let now = Utc::now();
        Self {
            file: CachedVideoFile {
                local_path: dir.join(unique_filename(now, extension_for(video_url))),
                size_bytes: 0,
                created_at: now,
                retain,
            },
            armed: true,
        }
    }

    pub fn path(&self) -> &Path {
        &self.file.local_path
    }

    pub fn file(&self) -> &CachedVideoFile {
        &self.file
    }

    pub fn set_size(&mut self, size_bytes: u64) {
        self.file.size_bytes = size_bytes;
    }

    /// Keeps the file on disk and hands back its record.
    pub fn persist(mut self) -> CachedVideoFile {
        self.armed = false;
        info!(path = %self.file.local_path.display(), "cached video retained");
        self.file.clone()
    }

    /// Deletes the file now.
    pub async fn discard(mut self) {
        self.armed = false;
        match tokio::fs::remove_file(&self.file.local_path).await {
            Ok(()) => debug!(path = %self.file.local_path.display(), "cached video removed"),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => warn!(
                path = %self.file.local_path.display(),
                error = %e,
                "failed to remove cached video"
            ),
        }
    }
}

impl Drop for CacheGuard {
    fn drop(&mut self) {
        if !self.armed {
            return;
        }
        match std::fs::remove_file(&self.file.local_path) {
            Ok(()) => debug!(path = %self.file.local_path.display(), "partial cache file removed"),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => warn!(
                path = %self.file.local_path.display(),
                error = %e,
                "failed to remove cache file on drop"
            ),
        }
    }
}

/// `reelgen_<YYYYmmdd_HHMMSS>_<8 hex>.<ext>`.
pub fn unique_filename(at: DateTime<Utc>, extension: &str) -> String {
    let id = uuid::Uuid::new_v4().simple().to_string();
    format!(
        "{CACHE_FILE_PREFIX}{}_{}.{extension}",
        at.format("%Y%m%d_%H%M%S"),
        &id[..8]
    )
}

/// Video extension taken from the URL path, or `mp4`.
fn extension_for(video_url: &str) -> &'static str {
    let path = video_url
        .split(['?', '#'])
        .next()
        .unwrap_or_default()
        .to_ascii_lowercase();
    let ext = path.rsplit_once('.').map(|(_, ext)| ext).unwrap_or_default();
    KNOWN_EXTENSIONS
        .iter()
        .find(|known| **known == ext)
        .copied()
        .unwrap_or(DEFAULT_EXTENSION)
}

/// Removes cache files in `dir` last modified more than `max_age` ago.
///
/// Only files carrying [`CACHE_FILE_PREFIX`] are considered. A missing
/// directory is treated as empty. Returns the number of files removed.
pub async fn sweep_stale(dir: &Path, max_age: Duration) -> std::io::Result<usize> {
    let mut entries = match tokio::fs::read_dir(dir).await {
        Ok(entries) => entries,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(0),
        Err(e) => return Err(e),
    };

    let now = SystemTime::now();
    let mut removed = 0;
    while let Some(entry) = entries.next_entry().await? {
        let name = entry.file_name();
        if !name.to_string_lossy().starts_with(CACHE_FILE_PREFIX) {
            continue;
        }
        let metadata = entry.metadata().await?;
        if !metadata.is_file() {
            continue;
        }
        let age = metadata
            .modified()
            .ok()
            .and_then(|modified| now.duration_since(modified).ok())
            .unwrap_or_default();
        if age < max_age {
            continue;
        }

        match tokio::fs::remove_file(entry.path()).await {
            Ok(()) => removed += 1,
            Err(e) => warn!(path = %entry.path().display(), error = %e, "sweep could not remove file"),
        }
    }

    if removed > 0 {
        info!(dir = %dir.display(), removed, "stale cache files swept");
    }
    Ok(removed)
}
