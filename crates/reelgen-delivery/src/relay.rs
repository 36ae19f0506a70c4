// SPDX-FileCopyrightText: 2026 Reelgen Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! HTTP relay client.
//!
//! The relay is a companion file server reachable by the message surface.
//! Files are posted as multipart form data to `http://<host>:<port>/upload`;
//! the server answers `{"path": "<surface-readable path>"}`.

use std::path::Path;
use std::time::Duration;

use async_trait::async_trait;
use reelgen_core::{FileRelay, ReelgenError};
use serde::Deserialize;
use tokio_util::io::ReaderStream;
use tracing::{debug, info};

use crate::cache::mime_for;

#[derive(Debug, Deserialize)]
struct UploadResponse {
    path: String,
}

/// [`FileRelay`] backed by an HTTP upload endpoint.
#[derive(Debug, Clone)]
pub struct HttpRelay {
    http: reqwest::Client,
    upload_url: String,
    timeout: Duration,
}

impl HttpRelay {
    pub fn new(http: reqwest::Client, host: &str, port: u16, timeout: Duration) -> Self {
        Self {
            http,
            upload_url: format!("http://{host}:{port}/upload"),
            timeout,
        }
    }
}

#[async_trait]
impl FileRelay for HttpRelay {
    async fn upload(&self, path: &Path) -> Result<String, ReelgenError> {
        let unreadable = |e: std::io::Error| ReelgenError::Relay {
            message: format!("cannot read {}: {e}", path.display()),
            source: Some(Box::new(e)),
        };
        let file = tokio::fs::File::open(path).await.map_err(unreadable)?;
        let size_bytes = file.metadata().await.map_err(unreadable)?.len();
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "video.mp4".to_string());
        let mime = mime_for(path);

        debug!(url = %self.upload_url, size_bytes, mime, "uploading to relay");
        let body = reqwest::Body::wrap_stream(ReaderStream::new(file));
        let part = reqwest::multipart::Part::stream_with_length(body, size_bytes)
            .file_name(file_name)
            .mime_str(mime)
            .map_err(|e| ReelgenError::Relay {
                message: format!("failed to build multipart body: {e}"),
                source: Some(Box::new(e)),
            })?;
        let form = reqwest::multipart::Form::new().part("file", part);

        let response = self
            .http
            .post(&self.upload_url)
            .multipart(form)
            .timeout(self.timeout)
            .send()
            .await
            .map_err(|e| ReelgenError::Relay {
                message: format!("relay request failed: {e}"),
                source: Some(Box::new(e)),
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(ReelgenError::Relay {
                message: format!("relay returned {status}"),
                source: None,
            });
        }

        let body: UploadResponse = response.json().await.map_err(|e| ReelgenError::Relay {
            message: format!("unreadable relay response: {e}"),
            source: Some(Box::new(e)),
        })?;
        if body.path.trim().is_empty() {
            return Err(ReelgenError::Relay {
                message: "relay returned an empty path".into(),
                source: None,
            });
        }

        info!(relay_path = %body.path, "file relayed");
        Ok(body.path)
    }
}
