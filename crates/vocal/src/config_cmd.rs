// SPDX-FileCopyrightText: 2026 Vocal Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `vocal config` command implementation.

use vocal_config::VocalConfig;
use vocal_core::VocalError;

const REDACTED: &str = "[redacted]";

/// Prints the validated configuration as TOML.
pub fn run_config(config: &VocalConfig) -> Result<(), VocalError> {
    print!("{}", render_effective_config(config)?);
    Ok(())
}

/// Serializes `config` to TOML with API keys masked.
pub fn render_effective_config(config: &VocalConfig) -> Result<String, VocalError> {
    let mut shown = config.clone();
    if shown.identity.api_key.is_some() {
        shown.identity.api_key = Some(REDACTED.to_string());
    }
    if shown.vendor.api_key.is_some() {
        shown.vendor.api_key = Some(REDACTED.to_string());
    }
    toml::to_string_pretty(&shown)
        .map_err(|e| VocalError::Internal(format!("failed to render config: {e}")))
}
