// SPDX-FileCopyrightText: 2026 Vocal Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Error types for the Vocal service.

use thiserror::Error;

/// The primary error type used across all Vocal adapter traits and service operations.
///
/// The gateway maps each variant to an HTTP status at the route boundary, so
/// variants are grouped by how a caller should react, not by where they arise.
#[derive(Debug, Error)]
pub enum VocalError {
    /// Configuration errors (invalid TOML, missing credentials, bad values).
    #[error("configuration error: {0}")]
    Config(String),

    /// A request was missing required fields or carried invalid values.
    #[error("{0}")]
    Validation(String),

    /// No bearer credential was supplied.
    #[error("access token required")]
    Unauthenticated,

    /// The identity provider rejected the credential (invalid or expired).
    #[error("invalid or expired token: {message}")]
    InvalidCredential { message: String },

    /// The record is absent or owned by a different principal.
    #[error("{entity} not found")]
    NotFound { entity: &'static str },

    /// An uploaded payload exceeded the configured size limit.
    #[error("payload too large: {message}")]
    PayloadTooLarge { message: String },

    /// An external service (voice vendor, identity provider) failed.
    #[error("{service} error: {message}")]
    Upstream {
        service: &'static str,
        status: Option<u16>,
        message: String,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// An external service did not answer within the configured timeout.
    #[error("{service} timed out after {duration:?}")]
    UpstreamTimeout {
        service: &'static str,
        duration: std::time::Duration,
    },

    /// Storage backend errors (database connection, query failure, serialization).
    #[error("storage error: {source}")]
    Storage {
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// Internal or unexpected errors.
    #[error("internal error: {0}")]
    Internal(String),
}

impl VocalError {
    /// Shorthand for a validation failure.
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    /// Shorthand for a missing or foreign record.
    pub fn not_found(entity: &'static str) -> Self {
        Self::NotFound { entity }
    }

    /// Wraps any error as a storage failure.
    pub fn storage(source: impl Into<Box<dyn std::error::Error + Send + Sync>>) -> Self {
        Self::Storage {
            source: source.into(),
        }
    }

    /// Returns true for failures that originate outside the service.
    pub fn is_upstream(&self) -> bool {
        matches!(self, Self::Upstream { .. } | Self::UpstreamTimeout { .. })
    }
}
