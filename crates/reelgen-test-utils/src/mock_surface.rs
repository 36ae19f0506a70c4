// SPDX-FileCopyrightText: 2026 Reelgen Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Mock message surface for deterministic testing.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::Mutex;

use reelgen_core::{MessageSurface, ReelgenError, VideoReference};

/// One captured `send_video` call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SentVideo {
    pub reference: VideoReference,
    /// Size of the local file at send time, for [`VideoReference::LocalFile`].
    pub local_size: Option<u64>,
}

/// A message surface that records everything it is asked to send.
///
/// Video sends can be made to fail or to stall, to exercise the delivery
/// failure and send-timeout paths. Text sends always succeed.
#[derive(Clone, Default)]
pub struct MockSurface {
    videos: Arc<Mutex<Vec<SentVideo>>>,
    texts: Arc<Mutex<Vec<String>>>,
    fail_videos: bool,
    video_delay: Option<Duration>,
}

impl MockSurface {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every `send_video` call fails with a send error.
    pub fn failing() -> Self {
        Self {
            fail_videos: true,
            ..Self::default()
        }
    }

    /// Every `send_video` call sleeps for `delay` before succeeding.
    pub fn with_video_delay(mut self, delay: Duration) -> Self {
        self.video_delay = Some(delay);
        self
    }

    pub async fn sent_videos(&self) -> Vec<SentVideo> {
        self.videos.lock().await.clone()
    }

    pub async fn sent_texts(&self) -> Vec<String> {
        self.texts.lock().await.clone()
    }

    /// The last text reply, if any.
    pub async fn last_text(&self) -> Option<String> {
        self.texts.lock().await.last().cloned()
    }
}

#[async_trait]
impl MessageSurface for MockSurface {
    fn name(&self) -> &str {
        "mock-surface"
    }

    async fn send_video(&self, reference: &VideoReference) -> Result<(), ReelgenError> {
        let local_size = match reference {
            VideoReference::LocalFile(path) => tokio::fs::metadata(path).await.ok().map(|m| m.len()),
            _ => None,
        };
        self.videos.lock().await.push(SentVideo {
            reference: reference.clone(),
            local_size,
        });

        if let Some(delay) = self.video_delay {
            tokio::time::sleep(delay).await;
        }
        if self.fail_videos {
            return Err(ReelgenError::Send {
                message: "mock surface refused the video".into(),
                source: None,
            });
        }
        Ok(())
    }

    async fn send_text(&self, text: &str) -> Result<(), ReelgenError> {
        self.texts.lock().await.push(text.to_string());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn captures_videos_and_texts() {
        let surface = MockSurface::new();
        surface
            .send_video(&VideoReference::RemoteUrl("https://x/a.mp4".into()))
            .await
            .unwrap();
        surface.send_text("hello").await.unwrap();

        let videos = surface.sent_videos().await;
        assert_eq!(videos.len(), 1);
        assert_eq!(videos[0].local_size, None);
        assert_eq!(surface.last_text().await.as_deref(), Some("hello"));
    }

    #[tokio::test]
    async fn failing_surface_still_records_attempt() {
        let surface = MockSurface::failing();
        let err = surface
            .send_video(&VideoReference::RemoteUrl("https://x/a.mp4".into()))
            .await
            .unwrap_err();
        assert!(matches!(err, ReelgenError::Send { .. }));
        assert_eq!(surface.sent_videos().await.len(), 1);
    }
}
