// SPDX-FileCopyrightText: 2026 Reelgen Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Provider trait for the remote video generation call.

use async_trait::async_trait;
use tokio_util::sync::CancellationToken;

use crate::error::ReelgenError;
use crate::types::{ExtractedMedia, GenerationRequest};

/// Turns an image and prompt into a video URL.
#[async_trait]
pub trait VideoProvider: Send + Sync {
    /// Runs the generation call, retrying transient failures.
    ///
    /// `cancel` is checked between attempts; a cancelled token yields
    /// [`ReelgenError::Cancelled`].
    async fn generate(
        &self,
        request: &GenerationRequest,
        cancel: &CancellationToken,
    ) -> Result<ExtractedMedia, ReelgenError>;
}
