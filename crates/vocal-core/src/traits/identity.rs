// SPDX-FileCopyrightText: 2026 Vocal Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Identity adapter trait for bearer credential verification.

use async_trait::async_trait;

use crate::error::VocalError;
use crate::traits::adapter::PluginAdapter;
use crate::types::Principal;

/// Adapter for verifying caller credentials against an identity provider.
///
/// Implementations must not cache results: every protected request is
/// verified on its own, and a failed verification is not retried.
#[async_trait]
pub trait IdentityAdapter: PluginAdapter {
    /// Verifies an opaque bearer credential and returns the principal it belongs to.
    ///
    /// Fails with [`VocalError::InvalidCredential`] when the provider rejects it.
    async fn verify(&self, credential: &str) -> Result<Principal, VocalError>;
}
