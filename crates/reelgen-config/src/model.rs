// SPDX-FileCopyrightText: 2026 Reelgen Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration model structs for reelgen.
//!
//! All structs use `#[serde(deny_unknown_fields)]` to reject unrecognized
//! config keys at startup.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Top-level reelgen configuration.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct ReelgenConfig {
    /// Feature switch and logging.
    #[serde(default)]
    pub agent: AgentConfig,

    /// Remote completion API settings.
    #[serde(default)]
    pub api: ApiConfig,

    /// Group control and rate limiting.
    #[serde(default)]
    pub access: AccessConfig,

    /// Video delivery and local cache settings.
    #[serde(default)]
    pub delivery: DeliveryConfig,
}

/// Feature switch and logging configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct AgentConfig {
    /// When false every request is answered with "disabled".
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// Logging level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            log_level: default_log_level(),
        }
    }
}

fn default_true() -> bool {
    true
}

fn default_log_level() -> String {
    "info".to_string()
}

/// Remote multimodal completion API configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct ApiConfig {
    /// Base URL; `/v1/chat/completions` is appended.
    #[serde(default = "default_server_url")]
    pub server_url: String,

    /// Model identifier sent in every request.
    #[serde(default = "default_model_id")]
    pub model_id: String,

    /// Bearer credential. `None` fails every generation call.
    #[serde(default)]
    pub api_key: Option<String>,

    /// Per-stage timeout in seconds.
    #[serde(default = "default_timeout_seconds")]
    pub timeout_seconds: u64,

    /// Total attempts for retryable failures, including the first.
    #[serde(default = "default_max_retry_attempts")]
    pub max_retry_attempts: u32,

    /// First backoff delay in milliseconds; doubles per attempt.
    #[serde(default = "default_retry_backoff_ms")]
    pub retry_backoff_ms: u64,

    /// Upper bound on a single backoff delay in milliseconds.
    #[serde(default = "default_retry_backoff_max_ms")]
    pub retry_backoff_max_ms: u64,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            server_url: default_server_url(),
            model_id: default_model_id(),
            api_key: None,
            timeout_seconds: default_timeout_seconds(),
            max_retry_attempts: default_max_retry_attempts(),
            retry_backoff_ms: default_retry_backoff_ms(),
            retry_backoff_max_ms: default_retry_backoff_max_ms(),
        }
    }
}

impl ApiConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_seconds)
    }

    /// Full endpoint URL, tolerant of a trailing slash on `server_url`.
    pub fn completions_url(&self) -> String {
        format!("{}/v1/chat/completions", self.server_url.trim_end_matches('/'))
    }

    /// Model listing endpoint, used as a connectivity check.
    pub fn models_url(&self) -> String {
        format!("{}/v1/models", self.server_url.trim_end_matches('/'))
    }
}

fn default_server_url() -> String {
    "https://api.x.ai".to_string()
}

fn default_model_id() -> String {
    "grok-imagine-0.9".to_string()
}

fn default_timeout_seconds() -> u64 {
    180
}

fn default_max_retry_attempts() -> u32 {
    3
}

fn default_retry_backoff_ms() -> u64 {
    1000
}

fn default_retry_backoff_max_ms() -> u64 {
    8000
}

/// How group membership gates requests.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum GroupControlMode {
    /// Every group is allowed.
    #[default]
    Off,
    /// Only groups in `allow_groups` are allowed.
    Whitelist,
    /// Groups in `deny_groups` are refused.
    Blacklist,
}

/// Group control and rate limit configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct AccessConfig {
    #[serde(default)]
    pub group_control_mode: GroupControlMode,

    /// Allow-set consulted in whitelist mode.
    #[serde(default)]
    pub allow_groups: Vec<String>,

    /// Deny-set consulted in blacklist mode.
    #[serde(default)]
    pub deny_groups: Vec<String>,

    #[serde(default = "default_true")]
    pub rate_limit_enabled: bool,

    #[serde(default = "default_rate_limit_window_seconds")]
    pub rate_limit_window_seconds: u64,

    /// Calls admitted per group per window.
    #[serde(default = "default_rate_limit_max_calls")]
    pub rate_limit_max_calls: u32,

    /// Users allowed to run the status command.
    #[serde(default)]
    pub admin_users: Vec<String>,
}

impl Default for AccessConfig {
    fn default() -> Self {
        Self {
            group_control_mode: GroupControlMode::Off,
            allow_groups: Vec::new(),
            deny_groups: Vec::new(),
            rate_limit_enabled: true,
            rate_limit_window_seconds: default_rate_limit_window_seconds(),
            rate_limit_max_calls: default_rate_limit_max_calls(),
            admin_users: Vec::new(),
        }
    }
}

fn default_rate_limit_window_seconds() -> u64 {
    3600
}

fn default_rate_limit_max_calls() -> u32 {
    5
}

/// Delivery and local cache configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct DeliveryConfig {
    /// Download the video and send it from the local cache instead of by URL.
    #[serde(default)]
    pub save_video_enabled: bool,

    /// Keep cache files after a successful send.
    #[serde(default)]
    pub retain_files: bool,

    /// Directory for cached videos.
    #[serde(default = "default_videos_dir")]
    pub videos_dir: String,

    /// Upper bound on a single surface send.
    #[serde(default = "default_send_timeout_seconds")]
    pub send_timeout_seconds: u64,

    /// Cache files older than this are removed by the maintenance sweep.
    #[serde(default = "default_cache_max_age_seconds")]
    pub cache_max_age_seconds: u64,

    /// Relay file server host. Relay is disabled unless host and port are both set.
    #[serde(default)]
    pub relay_host: Option<String>,

    #[serde(default)]
    pub relay_port: Option<u16>,
}

impl Default for DeliveryConfig {
    fn default() -> Self {
        Self {
            save_video_enabled: false,
            retain_files: false,
            videos_dir: default_videos_dir(),
            send_timeout_seconds: default_send_timeout_seconds(),
            cache_max_age_seconds: default_cache_max_age_seconds(),
            relay_host: None,
            relay_port: None,
        }
    }
}

impl DeliveryConfig {
    /// Returns `(host, port)` when the relay is fully configured.
    pub fn relay_endpoint(&self) -> Option<(&str, u16)> {
        match (self.relay_host.as_deref(), self.relay_port) {
            (Some(host), Some(port)) if !host.trim().is_empty() => Some((host, port)),
            _ => None,
        }
    }

    pub fn send_timeout(&self) -> Duration {
        Duration::from_secs(self.send_timeout_seconds)
    }

    pub fn cache_max_age(&self) -> Duration {
        Duration::from_secs(self.cache_max_age_seconds)
    }
}

fn default_videos_dir() -> String {
    dirs::data_dir()
        .map(|p| p.join("reelgen").join("videos"))
        .unwrap_or_else(|| std::path::PathBuf::from("videos"))
        .display()
        .to_string()
}

fn default_send_timeout_seconds() -> u64 {
    90
}

fn default_cache_max_age_seconds() -> u64 {
    86_400
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_documented_values() {
        let config = ReelgenConfig::default();
        assert!(config.agent.enabled);
        assert_eq!(config.api.server_url, "https://api.x.ai");
        assert_eq!(config.api.model_id, "grok-imagine-0.9");
        assert_eq!(config.api.timeout_seconds, 180);
        assert_eq!(config.api.max_retry_attempts, 3);
        assert_eq!(config.access.group_control_mode, GroupControlMode::Off);
        assert!(config.access.rate_limit_enabled);
        assert_eq!(config.access.rate_limit_window_seconds, 3600);
        assert_eq!(config.access.rate_limit_max_calls, 5);
        assert!(!config.delivery.save_video_enabled);
        assert!(config.delivery.relay_endpoint().is_none());
    }

    #[test]
    fn completions_url_strips_trailing_slash() {
        let api = ApiConfig {
            server_url: "http://localhost:8000/".into(),
            ..ApiConfig::default()
        };
        assert_eq!(api.completions_url(), "http://localhost:8000/v1/chat/completions");
        assert_eq!(api.models_url(), "http://localhost:8000/v1/models");
    }

    #[test]
    fn relay_requires_host_and_port() {
        let mut delivery = DeliveryConfig {
            relay_host: Some("files".into()),
            ..DeliveryConfig::default()
        };
        assert!(delivery.relay_endpoint().is_none());
        delivery.relay_port = Some(8090);
        assert_eq!(delivery.relay_endpoint(), Some(("files", 8090)));
    }

    #[test]
    fn group_mode_parses_lowercase() {
        let access: AccessConfig = toml::from_str("group_control_mode = \"blacklist\"").unwrap();
        assert_eq!(access.group_control_mode, GroupControlMode::Blacklist);
    }
}
