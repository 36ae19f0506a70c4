// SPDX-FileCopyrightText: 2026 Reelgen Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Admin command texts: help and the connectivity/config report.

use reelgen_config::{GroupControlMode, ReelgenConfig};
use reelgen_core::ReelgenError;
use reelgen_provider::ProbeReport;

const RULE: &str = "------------------------------";

/// Usage text for the help command.
pub fn help_text(config: &ReelgenConfig) -> String {
    let mut lines = vec![
        "reelgen: turn an image into a short video".to_string(),
        String::new(),
        "Usage: send an image with a prompt, or reply to an image with a prompt.".to_string(),
        "Example: <image> make the waves move slowly".to_string(),
        String::new(),
        "Admin commands:".to_string(),
        "  status - check configuration and API connectivity".to_string(),
        "  help   - show this text".to_string(),
    ];
    if config.access.rate_limit_enabled {
        lines.push(String::new());
        lines.push(format!(
            "Limit: {} videos per group every {} minutes.",
            config.access.rate_limit_max_calls,
            config.access.rate_limit_window_seconds / 60
        ));
    }
    lines.push(String::new());
    lines.push("Generation takes a while; you will get one reply when it is done.".to_string());
    lines.join("\n")
}

/// Renders the status report from the configuration and a probe result.
///
/// The API key itself is never printed, only whether one is set.
pub fn status_report(config: &ReelgenConfig, probe: &Result<ProbeReport, ReelgenError>) -> String {
    let mark = |ok: bool| if ok { "[ok]" } else { "[!!]" };
    let key_set = config
        .api
        .api_key
        .as_deref()
        .is_some_and(|k| !k.trim().is_empty());

    let connectivity = match probe {
        Ok(report) if report.is_ok() => format!(
            "{} API reachable: HTTP {} in {} ms",
            mark(true),
            report.status,
            report.latency.as_millis()
        ),
        Ok(report) => format!("{} API answered HTTP {}", mark(false), report.status),
        Err(e) => format!("{} API unreachable ({})", mark(false), e.kind()),
    };

    let group_mode = match config.access.group_control_mode {
        GroupControlMode::Off => "off".to_string(),
        GroupControlMode::Whitelist => {
            format!("whitelist ({} groups)", config.access.allow_groups.len())
        }
        GroupControlMode::Blacklist => {
            format!("blacklist ({} groups)", config.access.deny_groups.len())
        }
    };

    let delivery = match (
        config.delivery.save_video_enabled,
        config.delivery.relay_endpoint(),
    ) {
        (false, _) => "remote URL".to_string(),
        (true, None) => "local file".to_string(),
        (true, Some((host, port))) => format!("relayed file via {host}:{port}"),
    };

    [
        "reelgen status".to_string(),
        RULE.to_string(),
        format!(
            "{} Generation: {}",
            mark(config.agent.enabled),
            if config.agent.enabled { "enabled" } else { "disabled" }
        ),
        format!(
            "{} API key: {}",
            mark(key_set),
            if key_set { "configured" } else { "missing" }
        ),
        connectivity,
        format!("Endpoint: {}", config.api.completions_url()),
        format!("Model: {}", config.api.model_id),
        format!("Timeout: {}s", config.api.timeout_seconds),
        format!("Max attempts: {}", config.api.max_retry_attempts),
        format!("Group control: {group_mode}"),
        format!(
            "Rate limit: {}",
            if config.access.rate_limit_enabled {
                format!(
                    "{} per {}s",
                    config.access.rate_limit_max_calls, config.access.rate_limit_window_seconds
                )
            } else {
                "off".to_string()
            }
        ),
        format!("Delivery: {delivery}"),
        format!("Videos dir: {}", config.delivery.videos_dir),
        RULE.to_string(),
    ]
    .join("\n")
}
