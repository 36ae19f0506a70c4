// SPDX-FileCopyrightText: 2026 Reelgen Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Message surface trait for the chat platform that issued a request.

use async_trait::async_trait;

use crate::error::ReelgenError;
use crate::types::VideoReference;

/// The chat-side endpoint a request came from and results go back to.
///
/// Implementations wrap a platform message bus; the pipeline only needs to
/// send a video reference or a short text reply.
#[async_trait]
pub trait MessageSurface: Send + Sync {
    /// Human-readable name used in logs.
    fn name(&self) -> &str;

    /// Sends a video, given either a remote URL or a locally readable path.
    async fn send_video(&self, reference: &VideoReference) -> Result<(), ReelgenError>;

    /// Sends a plain text reply.
    async fn send_text(&self, text: &str) -> Result<(), ReelgenError>;
}
