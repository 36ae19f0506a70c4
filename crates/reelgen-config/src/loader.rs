// SPDX-FileCopyrightText: 2026 Reelgen Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Layered configuration loading with Figment.
//!
//! Merge order, later wins: compiled defaults, `/etc/reelgen/reelgen.toml`,
//! `~/.config/reelgen/reelgen.toml`, `./reelgen.toml`, then `REELGEN_*`
//! environment variables.

#![allow(clippy::result_large_err)] // figment::Error is external

use std::path::{Path, PathBuf};

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};

use crate::model::ReelgenConfig;

/// Top-level sections, used to map `REELGEN_<SECTION>_<KEY>` to `section.key`.
const SECTIONS: &[&str] = &["agent", "api", "access", "delivery"];

pub(crate) const SYSTEM_CONFIG_PATH: &str = "/etc/reelgen/reelgen.toml";
pub(crate) const LOCAL_CONFIG_PATH: &str = "reelgen.toml";

pub(crate) fn user_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("reelgen").join("reelgen.toml"))
}

/// Load configuration from the standard file hierarchy with env overrides.
pub fn load_config() -> Result<ReelgenConfig, figment::Error> {
    build_figment().extract()
}

/// Load configuration from a TOML string only. No files, no env.
pub fn load_config_from_str(toml_content: &str) -> Result<ReelgenConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(ReelgenConfig::default()))
        .merge(Toml::string(toml_content))
        .extract()
}

/// Load configuration from one explicit file with env overrides.
pub fn load_config_from_path(path: &Path) -> Result<ReelgenConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(ReelgenConfig::default()))
        .merge(Toml::file(path))
        .merge(env_provider())
        .extract()
}

/// Build the Figment used by [`load_config`] without extracting it.
pub fn build_figment() -> Figment {
    Figment::new()
        .merge(Serialized::defaults(ReelgenConfig::default()))
        .merge(Toml::file(SYSTEM_CONFIG_PATH))
        .merge(Toml::file(user_config_path().unwrap_or_default()))
        .merge(Toml::file(LOCAL_CONFIG_PATH))
        .merge(env_provider())
}

/// Environment provider with explicit section mapping.
///
/// `Env::split("_")` would turn `REELGEN_API_API_KEY` into `api.api.key`;
/// only the first segment names the section.
fn env_provider() -> Env {
    Env::prefixed("REELGEN_").map(|key| map_env_key(key.as_str()).into())
}

/// Figment passes the prefix-stripped key as written in the environment,
/// so it is lowercased before matching.
fn map_env_key(key: &str) -> String {
    let key = key.to_ascii_lowercase();
    for section in SECTIONS {
        if let Some(rest) = key.strip_prefix(section).and_then(|r| r.strip_prefix('_')) {
            return format!("{section}.{rest}");
        }
    }
    key
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn env_keys_map_to_sections() {
        assert_eq!(map_env_key("api_api_key"), "api.api_key");
        assert_eq!(
            map_env_key("access_rate_limit_max_calls"),
            "access.rate_limit_max_calls"
        );
        assert_eq!(map_env_key("delivery_relay_host"), "delivery.relay_host");
        assert_eq!(map_env_key("agent_enabled"), "agent.enabled");
        assert_eq!(map_env_key("unrelated"), "unrelated");
    }

    #[test]
    fn uppercase_env_keys_map_to_sections() {
        assert_eq!(
            map_env_key("ACCESS_RATE_LIMIT_MAX_CALLS"),
            "access.rate_limit_max_calls"
        );
        assert_eq!(map_env_key("API_API_KEY"), "api.api_key");
        assert_eq!(map_env_key("Delivery_Save_Video_Enabled"), "delivery.save_video_enabled");
    }

    #[test]
    fn env_overrides_file_values() {
        figment::Jail::expect_with(|jail| {
            jail.create_file(
                "custom.toml",
                r#"
[api]
model_id = "from-file"
timeout_seconds = 30
"#,
            )?;
            jail.set_env("REELGEN_API_MODEL_ID", "from-env");
            jail.set_env("REELGEN_ACCESS_RATE_LIMIT_MAX_CALLS", "9");

            let config = load_config_from_path(Path::new("custom.toml"))?;
            assert_eq!(config.api.model_id, "from-env");
            assert_eq!(config.api.timeout_seconds, 30);
            assert_eq!(config.access.rate_limit_max_calls, 9);
            Ok(())
        });
    }
}
