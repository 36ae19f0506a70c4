// SPDX-FileCopyrightText: 2026 Reelgen Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Delivery strategy selection and execution.
//!
//! ```text
//! RECEIVED -> (DOWNLOAD?) -> (RELAY?) -> SENT | FAILED
//! ```
//!
//! With saving disabled the remote URL goes straight to the surface. With
//! saving enabled the video is downloaded into the cache first, and when a
//! relay is configured the surface is given the relay path instead of the
//! local one. A relay failure is reported as such; the remote URL is never
//! used as a fallback because the surface cannot reach it in that setup.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use reelgen_config::DeliveryConfig;
use reelgen_core::{
    DeliveryOutcome, ExtractedMedia, FileRelay, MessageSurface, ReelgenError, RetryPolicy,
    Transport, VideoReference,
};
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use crate::cache::{CacheGuard, sweep_stale};
use crate::download::Downloader;
use crate::relay::HttpRelay;

/// A failed delivery: the transport that was attempted and why it failed.
#[derive(Debug)]
pub struct DeliveryFailure {
    pub transport: Transport,
    pub error: ReelgenError,
}

impl DeliveryFailure {
    pub fn outcome(&self) -> DeliveryOutcome {
        DeliveryOutcome::failure(self.transport, self.error.kind())
    }
}

/// Hands extracted videos to a message surface and owns the cache files.
pub struct DeliveryManager {
    save_enabled: bool,
    retain_files: bool,
    videos_dir: PathBuf,
    send_timeout: Duration,
    cache_max_age: Duration,
    downloader: Downloader,
    relay: Option<Arc<dyn FileRelay>>,
}

impl DeliveryManager {
    /// Builds the manager. `policy` bounds download retries and per-attempt time.
    pub fn new(config: &DeliveryConfig, policy: RetryPolicy) -> Result<Self, ReelgenError> {
        let http = reqwest::Client::builder()
            .connect_timeout(Duration::from_secs(10))
            .build()
            .map_err(|e| ReelgenError::Internal(format!("failed to build HTTP client: {e}")))?;

        let relay = config.relay_endpoint().map(|(host, port)| {
            Arc::new(HttpRelay::new(http.clone(), host, port, policy.timeout)) as Arc<dyn FileRelay>
        });

        Ok(Self {
            save_enabled: config.save_video_enabled,
            retain_files: config.retain_files,
            videos_dir: PathBuf::from(&config.videos_dir),
            send_timeout: config.send_timeout(),
            cache_max_age: config.cache_max_age(),
            downloader: Downloader::new(http, policy),
            relay,
        })
    }

    /// Replaces the relay target.
    pub fn with_relay(mut self, relay: Arc<dyn FileRelay>) -> Self {
        self.relay = Some(relay);
        self
    }

    pub fn with_send_timeout(mut self, timeout: Duration) -> Self {
        self.send_timeout = timeout;
        self
    }

    pub fn videos_dir(&self) -> &std::path::Path {
        &self.videos_dir
    }

    /// Transport this configuration will use for every delivery.
    pub fn planned_transport(&self) -> Transport {
        match (self.save_enabled, self.relay.is_some()) {
            (false, _) => Transport::RemoteUrl,
            (true, false) => Transport::LocalFile,
            (true, true) => Transport::RelayedFile,
        }
    }

    /// Delivers `media` and reports the outcome.
    pub async fn deliver(
        &self,
        media: &ExtractedMedia,
        surface: &dyn MessageSurface,
        cancel: &CancellationToken,
    ) -> DeliveryOutcome {
        match self.execute(media, surface, cancel).await {
            Ok(transport) => DeliveryOutcome::success(transport),
            Err(failure) => failure.outcome(),
        }
    }

    /// Delivers `media`, keeping the underlying error on failure.
    ///
    /// Any cache file created along the way is gone when this returns,
    /// unless the send succeeded and `retain_files` is set.
    pub async fn execute(
        &self,
        media: &ExtractedMedia,
        surface: &dyn MessageSurface,
        cancel: &CancellationToken,
    ) -> Result<Transport, DeliveryFailure> {
        let transport = self.planned_transport();
        let result = tokio::select! {
            biased;
            _ = cancel.cancelled() => Err(ReelgenError::Cancelled),
            r = self.run(transport, media, surface, cancel) => r,
        };

        match result {
            Ok(()) => {
                info!(
                    surface = surface.name(),
                    transport = %transport,
                    "video delivered"
                );
                Ok(transport)
            }
            Err(error) => {
                warn!(
                    surface = surface.name(),
                    transport = %transport,
                    kind = %error.kind(),
                    error = %error,
                    "delivery failed"
                );
                Err(DeliveryFailure { transport, error })
            }
        }
    }

    async fn run(
        &self,
        transport: Transport,
        media: &ExtractedMedia,
        surface: &dyn MessageSurface,
        cancel: &CancellationToken,
    ) -> Result<(), ReelgenError> {
        if transport == Transport::RemoteUrl {
            let reference = VideoReference::RemoteUrl(media.video_url.clone());
            return self.send(surface, &reference).await;
        }

        tokio::fs::create_dir_all(&self.videos_dir)
            .await
            .map_err(|e| ReelgenError::Download {
                message: format!("cannot create {}: {e}", self.videos_dir.display()),
                source: Some(Box::new(e)),
            })?;

        // Dropping the guard on any early return below deletes the file.
        let mut guard = CacheGuard::new(&self.videos_dir, &media.video_url, self.retain_files);
        let size = self
            .downloader
            .download(&media.video_url, guard.path(), cancel)
            .await?;
        guard.set_size(size);

        let reference = match &self.relay {
            Some(relay) => {
                let path = relay.upload(guard.path()).await.map_err(|e| match e {
                    ReelgenError::Relay { .. } | ReelgenError::Cancelled => e,
                    other => ReelgenError::Relay {
                        message: other.to_string(),
                        source: Some(Box::new(other)),
                    },
                })?;
                VideoReference::RelayPath(path)
            }
            None => VideoReference::LocalFile(guard.path().to_path_buf()),
        };

        self.send(surface, &reference).await?;

        if guard.file().retain {
            guard.persist();
        } else {
            guard.discard().await;
        }
        Ok(())
    }

    async fn send(
        &self,
        surface: &dyn MessageSurface,
        reference: &VideoReference,
    ) -> Result<(), ReelgenError> {
        match tokio::time::timeout(self.send_timeout, surface.send_video(reference)).await {
            Ok(result) => result.map_err(|e| match e {
                ReelgenError::Send { .. } => e,
                other => ReelgenError::Send {
                    message: other.to_string(),
                    source: Some(Box::new(other)),
                },
            }),
            Err(_) => Err(ReelgenError::Send {
                message: format!(
                    "send timed out after {}s; the video may still arrive",
                    self.send_timeout.as_secs()
                ),
                source: None,
            }),
        }
    }

    /// Removes cache files older than the configured maximum age.
    pub async fn sweep(&self) -> Result<usize, ReelgenError> {
        sweep_stale(&self.videos_dir, self.cache_max_age)
            .await
            .map_err(|e| ReelgenError::Internal(format!("cache sweep failed: {e}")))
    }
}
