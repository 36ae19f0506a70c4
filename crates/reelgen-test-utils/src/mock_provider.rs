// SPDX-FileCopyrightText: 2026 Reelgen Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Mock video provider with scripted results.

use std::collections::VecDeque;
use std::sync::Arc;
use std::sync::atomic::{AtomicU32, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::Mutex;
use tokio_util::sync::CancellationToken;

use reelgen_core::{
    ExtractedMedia, GenerationRequest, ReelgenError, SourceForm, VideoProvider,
};

type Scripted = Result<ExtractedMedia, ReelgenError>;

/// Provider that pops queued results, falling back to a fixed URL.
///
/// An optional delay makes concurrent-request tests deterministic; the delay
/// honours the cancellation token.
#[derive(Clone)]
pub struct MockProvider {
    queue: Arc<Mutex<VecDeque<Scripted>>>,
    fallback_url: String,
    delay: Option<Duration>,
    calls: Arc<AtomicU32>,
}

impl MockProvider {
    pub fn new(fallback_url: impl Into<String>) -> Self {
        Self {
            queue: Arc::new(Mutex::new(VecDeque::new())),
            fallback_url: fallback_url.into(),
            delay: None,
            calls: Arc::new(AtomicU32::new(0)),
        }
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Queues a result for the next call.
    pub async fn push(&self, result: Scripted) {
        self.queue.lock().await.push_back(result);
    }

    pub fn calls(&self) -> u32 {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl VideoProvider for MockProvider {
    async fn generate(
        &self,
        request: &GenerationRequest,
        cancel: &CancellationToken,
    ) -> Result<ExtractedMedia, ReelgenError> {
        request.image_bytes().ok_or(ReelgenError::MissingImage)?;
        self.calls.fetch_add(1, Ordering::SeqCst);

        if let Some(delay) = self.delay {
            tokio::select! {
                _ = cancel.cancelled() => return Err(ReelgenError::Cancelled),
                _ = tokio::time::sleep(delay) => {}
            }
        }

        match self.queue.lock().await.pop_front() {
            Some(result) => result,
            None => Ok(ExtractedMedia {
                video_url: self.fallback_url.clone(),
                source_form: SourceForm::PlainUrl,
            }),
        }
    }
}
