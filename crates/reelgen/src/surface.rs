// SPDX-FileCopyrightText: 2026 Reelgen Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Message surface that prints to stdout.

use async_trait::async_trait;
use reelgen_core::{MessageSurface, ReelgenError, VideoReference};

/// Prints each video reference and text reply on its own line.
pub struct StdoutSurface;

#[async_trait]
impl MessageSurface for StdoutSurface {
    fn name(&self) -> &str {
        "stdout"
    }

    async fn send_video(&self, reference: &VideoReference) -> Result<(), ReelgenError> {
        println!("video ({}): {reference}", reference.transport());
        Ok(())
    }

    async fn send_text(&self, text: &str) -> Result<(), ReelgenError> {
        println!("{text}");
        Ok(())
    }
}
