// SPDX-FileCopyrightText: 2026 Reelgen Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Streaming video download into the local cache.

use std::path::Path;

use futures::StreamExt;
use reelgen_core::{ReelgenError, RetryPolicy};
use tokio::io::AsyncWriteExt;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

/// Fetches a remote video into a file, retrying failed or truncated transfers.
#[derive(Debug, Clone)]
pub struct Downloader {
    http: reqwest::Client,
    policy: RetryPolicy,
}

impl Downloader {
    pub fn new(http: reqwest::Client, policy: RetryPolicy) -> Self {
        Self { http, policy }
    }

    /// Downloads `url` to `dest` and returns the byte count.
    ///
    /// Each attempt truncates `dest`. The caller owns deletion of `dest` on
    /// failure.
    pub async fn download(
        &self,
        url: &str,
        dest: &Path,
        cancel: &CancellationToken,
    ) -> Result<u64, ReelgenError> {
        let size = self
            .policy
            .run("download", cancel, move |attempt| self.attempt(url, dest, attempt))
            .await?;
        info!(path = %dest.display(), size_bytes = size, "video downloaded");
        Ok(size)
    }

    async fn attempt(&self, url: &str, dest: &Path, attempt: u32) -> Result<u64, ReelgenError> {
        let response = self
            .http
            .get(url)
            .send()
            .await
            .map_err(|e| download_error(format!("request failed: {e}"), e))?;

        let status = response.status();
        debug!(status = %status, attempt, "video host responded");
        if !status.is_success() {
            return Err(ReelgenError::Download {
                message: format!("video host returned {status}"),
                source: None,
            });
        }

        let expected = response.content_length();
        let mut file = tokio::fs::File::create(dest)
            .await
            .map_err(|e| download_error(format!("cannot create {}: {e}", dest.display()), e))?;

        let mut written: u64 = 0;
        let mut body = response.bytes_stream();
        while let Some(chunk) = body.next().await {
            let chunk = chunk.map_err(|e| download_error(format!("body interrupted: {e}"), e))?;
            file.write_all(&chunk)
                .await
                .map_err(|e| download_error(format!("write failed: {e}"), e))?;
            written += chunk.len() as u64;
        }
        file.flush()
            .await
            .map_err(|e| download_error(format!("flush failed: {e}"), e))?;

        if written == 0 {
            return Err(ReelgenError::Download {
                message: "video host returned an empty body".into(),
                source: None,
            });
        }
        if let Some(expected) = expected
            && expected != written
        {
            return Err(ReelgenError::Download {
                message: format!("truncated download: got {written} of {expected} bytes"),
                source: None,
            });
        }

        Ok(written)
    }
}

fn download_error(
    message: String,
    source: impl std::error::Error + Send + Sync + 'static,
) -> ReelgenError {
    ReelgenError::Download {
        message,
        source: Some(Box::new(source)),
    }
}
