// SPDX-FileCopyrightText: 2026 Vocal Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration loader using Figment for layered config merging.
//!
//! Supports XDG hierarchy: `./vocal.toml` > `~/.config/vocal/vocal.toml` > `/etc/vocal/vocal.toml`
//! with environment variable overrides via `VOCAL_` prefix.

#![allow(clippy::result_large_err)] // figment::Error is external and cannot be boxed without wrapper

use std::path::Path;

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};

use crate::model::VocalConfig;

/// Load configuration from the standard XDG hierarchy with env var overrides.
///
/// Merge order (later overrides earlier):
/// 1. Compiled defaults
/// 2. `/etc/vocal/vocal.toml` (system-wide)
/// 3. `~/.config/vocal/vocal.toml` (user XDG config)
/// 4. `./vocal.toml` (local directory)
/// 5. `VOCAL_*` environment variables
pub fn load_config() -> Result<VocalConfig, figment::Error> {
    build_figment().extract()
}

/// Load configuration from a TOML string only (no XDG lookup, no env vars).
///
/// Used for testing and explicit configuration.
pub fn load_config_from_str(toml_content: &str) -> Result<VocalConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(VocalConfig::default()))
        .merge(Toml::string(toml_content))
        .extract()
}

/// Load configuration from a specific file path with env var overrides.
pub fn load_config_from_path(path: &Path) -> Result<VocalConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(VocalConfig::default()))
        .merge(Toml::file(path))
        .merge(env_provider())
        .extract()
}

/// Build the Figment used internally for config loading.
///
/// Returns the Figment before extraction so callers can inspect metadata.
pub fn build_figment() -> Figment {
    Figment::new()
        .merge(Serialized::defaults(VocalConfig::default()))
        .merge(Toml::file("/etc/vocal/vocal.toml"))
        .merge(Toml::file(
            dirs::config_dir()
                .map(|d| d.join("vocal/vocal.toml"))
                .unwrap_or_default(),
        ))
        .merge(Toml::file("vocal.toml"))
        .merge(env_provider())
}

/// Create the environment variable provider using explicit `map()` for section-to-dot mapping.
///
/// Uses `Env::map()` rather than `Env::split("_")` because key names contain
/// underscores: `VOCAL_VENDOR_API_KEY` must map to `vendor.api_key`, not
/// `vendor.api.key`.
fn env_provider() -> Env {
    Env::prefixed("VOCAL_").map(|key| map_env_key(&key.as_str().to_ascii_lowercase()).into())
}

/// Map a lowercased, prefix-stripped env var name to a dotted config path.
fn map_env_key(key: &str) -> String {
    for section in ["server", "identity", "vendor", "storage", "pagination"] {
        if let Some(rest) = key.strip_prefix(section).and_then(|r| r.strip_prefix('_')) {
            return format!("{section}.{rest}");
        }
    }
    key.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn env_keys_map_to_sections() {
        assert_eq!(map_env_key("vendor_api_key"), "vendor.api_key");
        assert_eq!(map_env_key("server_max_upload_bytes"), "server.max_upload_bytes");
        assert_eq!(map_env_key("pagination_max_limit"), "pagination.max_limit");
        assert_eq!(map_env_key("unrelated"), "unrelated");
    }

    #[test]
    fn env_override_applies_to_vendor_section() {
        figment::Jail::expect_with(|jail| {
            jail.set_env("VOCAL_VENDOR_MODEL_ID", "eleven_multilingual_v2");
            jail.set_env("VOCAL_SERVER_PORT", "8080");
            let config: VocalConfig = Figment::new()
                .merge(Serialized::defaults(VocalConfig::default()))
                .merge(env_provider())
                .extract()?;
            assert_eq!(config.vendor.model_id, "eleven_multilingual_v2");
            assert_eq!(config.server.port, 8080);
            Ok(())
        });
    }
}
