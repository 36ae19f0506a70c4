// SPDX-FileCopyrightText: 2026 Reelgen Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Relay trait for cross-host file delivery.

use std::path::Path;

use async_trait::async_trait;

use crate::error::ReelgenError;

/// An auxiliary file server the message surface can read from when it
/// cannot see the local cache directory.
#[async_trait]
pub trait FileRelay: Send + Sync {
    /// Uploads `path` and returns the path the surface should read instead.
    async fn upload(&self, path: &Path) -> Result<String, ReelgenError>;
}
