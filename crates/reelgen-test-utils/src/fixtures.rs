// SPDX-FileCopyrightText: 2026 Reelgen Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Sample inputs and configuration builders.

use std::path::Path;

use reelgen_config::ReelgenConfig;
use reelgen_core::{GenerationRequest, GroupId, UserId};

/// Smallest byte string that sniffs as PNG.
pub const PNG_BYTES: &[u8] = b"\x89PNG\r\n\x1a\n\0\0\0\rIHDR";

/// Fake MP4 payload served by mock video hosts.
pub const VIDEO_BYTES: &[u8] = b"\0\0\0\x18ftypmp42\0\0\0\0mp42isomfake-video-payload";

/// Configuration pointed at `server_url`, with fast retries and saving off.
pub fn test_config(server_url: &str) -> ReelgenConfig {
    let mut config = ReelgenConfig::default();
    config.api.server_url = server_url.to_string();
    config.api.api_key = Some("test-key".into());
    config.api.timeout_seconds = 5;
    config.api.max_retry_attempts = 3;
    config.api.retry_backoff_ms = 10;
    config.api.retry_backoff_max_ms = 40;
    config.access.rate_limit_enabled = false;
    config.delivery.send_timeout_seconds = 5;
    config
}

/// Like [`test_config`], with local saving into `videos_dir`.
pub fn saving_config(server_url: &str, videos_dir: &Path) -> ReelgenConfig {
    let mut config = test_config(server_url);
    config.delivery.save_video_enabled = true;
    config.delivery.videos_dir = videos_dir.display().to_string();
    config
}

/// A group request with an image attached.
pub fn group_request(group: &str, user: &str) -> GenerationRequest {
    GenerationRequest::new(
        Some(GroupId(group.into())),
        UserId(user.into()),
        "make the cat dance",
        Some(PNG_BYTES.to_vec()),
    )
}

/// A request without any image.
pub fn imageless_request(user: &str) -> GenerationRequest {
    GenerationRequest::new(None, UserId(user.into()), "make the cat dance", None)
}

/// Number of regular files in `dir`. A missing directory counts as empty.
pub fn file_count(dir: &Path) -> usize {
    std::fs::read_dir(dir)
        .map(|entries| {
            entries
                .filter_map(Result::ok)
                .filter(|e| e.path().is_file())
                .count()
        })
        .unwrap_or(0)
}
