// SPDX-FileCopyrightText: 2026 Vocal Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Mock identity provider backed by a token table.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use async_trait::async_trait;
use tokio::sync::RwLock;

use vocal_core::traits::adapter::PluginAdapter;
use vocal_core::traits::identity::IdentityAdapter;
use vocal_core::types::{AdapterType, HealthStatus, Principal};
use vocal_core::VocalError;

/// Resolves bearer tokens from an in-memory table.
///
/// Unknown tokens are rejected as invalid credentials. `set_unavailable(true)`
/// simulates an unreachable provider.
#[derive(Default)]
pub struct MockIdentity {
    tokens: RwLock<HashMap<String, Principal>>,
    unavailable: AtomicBool,
    verify_calls: AtomicUsize,
}

impl MockIdentity {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `token` as belonging to a principal with the given id.
    pub async fn add_user(&self, token: &str, user_id: &str) -> Principal {
        let principal = Principal {
            id: user_id.to_string(),
            email: format!("{user_id}@example.com"),
            created_at: Some("2026-01-01T00:00:00.000Z".to_string()),
        };
        self.tokens
            .write()
            .await
            .insert(token.to_string(), principal.clone());
        principal
    }

    /// Revokes a previously registered token.
    pub async fn revoke(&self, token: &str) {
        self.tokens.write().await.remove(token);
    }

    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::SeqCst);
    }

    pub fn verify_calls(&self) -> usize {
        self.verify_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl PluginAdapter for MockIdentity {
    fn name(&self) -> &str {
        "mock-identity"
    }

    fn version(&self) -> semver::Version {
        semver::Version::new(0, 1, 0)
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::Identity
    }

    async fn health_check(&self) -> Result<HealthStatus, VocalError> {
        Ok(HealthStatus::Healthy)
    }

    async fn shutdown(&self) -> Result<(), VocalError> {
        Ok(())
    }
}

#[async_trait]
impl IdentityAdapter for MockIdentity {
    async fn verify(&self, credential: &str) -> Result<Principal, VocalError> {
        self.verify_calls.fetch_add(1, Ordering::SeqCst);
        if self.unavailable.load(Ordering::SeqCst) {
            return Err(VocalError::Upstream {
                service: "identity",
                status: Some(503),
                message: "mock identity provider unavailable".into(),
                source: None,
            });
        }
        self.tokens
            .read()
            .await
            .get(credential)
            .cloned()
            .ok_or_else(|| VocalError::InvalidCredential {
                message: "unknown token".into(),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn known_token_resolves_and_revoked_token_fails() {
        let identity = MockIdentity::new();
        let principal = identity.add_user("tok", "alice").await;
        assert_eq!(identity.verify("tok").await.unwrap(), principal);

        identity.revoke("tok").await;
        let err = identity.verify("tok").await.unwrap_err();
        assert!(matches!(err, VocalError::InvalidCredential { .. }));
        assert_eq!(identity.verify_calls(), 2);
    }
}
