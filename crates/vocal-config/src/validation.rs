// SPDX-FileCopyrightText: 2026 Vocal Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Post-deserialization validation for configuration values.
//!
//! Validates semantic constraints that cannot be expressed via serde attributes,
//! such as valid bind addresses, ranges for synthesis settings, and paging limits.

use crate::diagnostic::ConfigError;
use crate::model::VocalConfig;

/// Validate a deserialized configuration for semantic correctness.
///
/// Returns `Ok(())` if all validations pass, or `Err(Vec<ConfigError>)` with
/// all collected validation errors (does not fail fast).
pub fn validate_config(config: &VocalConfig) -> Result<(), Vec<ConfigError>> {
    let mut errors = Vec::new();
    let mut fail = |message: String| errors.push(ConfigError::Validation { message });

    let host = config.server.host.trim();
    if host.is_empty() {
        fail("server.host must not be empty".to_string());
    } else {
        let is_valid_ip = host.parse::<std::net::IpAddr>().is_ok();
        let is_valid_hostname = host
            .chars()
            .all(|c| c.is_alphanumeric() || c == '.' || c == '-' || c == ':');
        if !is_valid_ip && !is_valid_hostname {
            fail(format!(
                "server.host `{host}` is not a valid IP address or hostname"
            ));
        }
    }

    if config.server.max_upload_bytes == 0 {
        fail("server.max_upload_bytes must be greater than zero".to_string());
    }

    if let Some(url) = &config.identity.url
        && !(url.starts_with("http://") || url.starts_with("https://"))
    {
        fail(format!("identity.url `{url}` must start with http:// or https://"));
    }

    if config.identity.timeout_secs == 0 {
        fail("identity.timeout_secs must be greater than zero".to_string());
    }

    let base_url = config.vendor.base_url.trim();
    if !(base_url.starts_with("http://") || base_url.starts_with("https://")) {
        fail(format!(
            "vendor.base_url `{base_url}` must start with http:// or https://"
        ));
    }

    if config.vendor.model_id.trim().is_empty() {
        fail("vendor.model_id must not be empty".to_string());
    }

    for (key, value) in [
        ("vendor.stability", config.vendor.stability),
        ("vendor.similarity_boost", config.vendor.similarity_boost),
    ] {
        if !(0.0..=1.0).contains(&value) {
            fail(format!("{key} must be between 0.0 and 1.0, got {value}"));
        }
    }

    if config.vendor.timeout_secs == 0 {
        fail("vendor.timeout_secs must be greater than zero".to_string());
    }

    if config.storage.database_path.trim().is_empty() {
        fail("storage.database_path must not be empty".to_string());
    }

    if config.pagination.max_limit == 0 {
        fail("pagination.max_limit must be greater than zero".to_string());
    }

    if config.pagination.default_limit == 0
        || config.pagination.default_limit > config.pagination.max_limit
    {
        fail(format!(
            "pagination.default_limit must be between 1 and pagination.max_limit ({}), got {}",
            config.pagination.max_limit, config.pagination.default_limit
        ));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
