// SPDX-FileCopyrightText: 2026 Reelgen Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Post-deserialization validation for configuration values.

use crate::diagnostic::ConfigError;
use crate::model::{GroupControlMode, ReelgenConfig};

/// Validate a deserialized configuration for semantic correctness.
///
/// Collects every failure instead of stopping at the first one.
pub fn validate_config(config: &ReelgenConfig) -> Result<(), Vec<ConfigError>> {
    let mut errors = Vec::new();
    let mut fail = |message: String| errors.push(ConfigError::Validation { message });

    let server_url = config.api.server_url.trim();
    if server_url.is_empty() {
        fail("api.server_url must not be empty".to_string());
    } else if !server_url.starts_with("http://") && !server_url.starts_with("https://") {
        fail(format!(
            "api.server_url `{server_url}` must start with http:// or https://"
        ));
    }

    if config.api.model_id.trim().is_empty() {
        fail("api.model_id must not be empty".to_string());
    }

    if config.api.timeout_seconds == 0 {
        fail("api.timeout_seconds must be greater than 0".to_string());
    }

    if config.api.max_retry_attempts == 0 {
        fail("api.max_retry_attempts must be at least 1".to_string());
    }

    if config.api.retry_backoff_max_ms < config.api.retry_backoff_ms {
        fail(format!(
            "api.retry_backoff_max_ms ({}) must not be below api.retry_backoff_ms ({})",
            config.api.retry_backoff_max_ms, config.api.retry_backoff_ms
        ));
    }

    if config.access.rate_limit_enabled {
        if config.access.rate_limit_window_seconds == 0 {
            fail("access.rate_limit_window_seconds must be greater than 0".to_string());
        }
        if config.access.rate_limit_max_calls == 0 {
            fail("access.rate_limit_max_calls must be at least 1".to_string());
        }
    }

    if config.access.group_control_mode == GroupControlMode::Whitelist
        && config.access.allow_groups.is_empty()
    {
        tracing::warn!("whitelist mode with an empty access.allow_groups refuses every group");
    }

    if config.delivery.videos_dir.trim().is_empty() {
        fail("delivery.videos_dir must not be empty".to_string());
    }

    if config.delivery.send_timeout_seconds == 0 {
        fail("delivery.send_timeout_seconds must be greater than 0".to_string());
    }

    match (&config.delivery.relay_host, config.delivery.relay_port) {
        (Some(host), None) => fail(format!(
            "delivery.relay_host `{host}` is set but delivery.relay_port is missing"
        )),
        (None, Some(port)) => fail(format!(
            "delivery.relay_port {port} is set but delivery.relay_host is missing"
        )),
        (Some(host), Some(_)) if host.trim().is_empty() => {
            fail("delivery.relay_host must not be empty".to_string())
        }
        (Some(_), Some(0)) => fail("delivery.relay_port must not be 0".to_string()),
        _ => {}
    }

    if config.delivery.relay_endpoint().is_some() && !config.delivery.save_video_enabled {
        fail(
            "delivery.relay_host requires delivery.save_video_enabled = true".to_string(),
        );
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
