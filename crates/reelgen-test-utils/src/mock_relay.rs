// SPDX-FileCopyrightText: 2026 Reelgen Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Mock relay target.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::Mutex;

use reelgen_core::{FileRelay, ReelgenError};

/// Relay that returns `<prefix>/<file name>` or fails on demand.
#[derive(Clone)]
pub struct MockRelay {
    prefix: String,
    fail: bool,
    uploads: Arc<Mutex<Vec<PathBuf>>>,
}

impl MockRelay {
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            fail: false,
            uploads: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::new("/unused")
        }
    }

    /// Local paths that were handed to `upload`.
    pub async fn uploads(&self) -> Vec<PathBuf> {
        self.uploads.lock().await.clone()
    }
}

#[async_trait]
impl FileRelay for MockRelay {
    async fn upload(&self, path: &Path) -> Result<String, ReelgenError> {
        self.uploads.lock().await.push(path.to_path_buf());
        if self.fail {
            return Err(ReelgenError::Relay {
                message: "mock relay unavailable".into(),
                source: None,
            });
        }
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        Ok(format!("{}/{name}", self.prefix.trim_end_matches('/')))
    }
}
