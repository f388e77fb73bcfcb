// SPDX-FileCopyrightText: 2026 Vocal Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Identity adapter that verifies bearer credentials against Supabase Auth.
//!
//! Each call performs `GET {url}/auth/v1/user` with the project key in the
//! `apikey` header and the caller's credential as a bearer token. Results are
//! never cached.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::StatusCode;
use reqwest::header::{HeaderMap, HeaderValue};
use serde::Deserialize;
use tracing::{debug, info};
use vocal_config::model::IdentityConfig;
use vocal_core::error::VocalError;
use vocal_core::traits::{IdentityAdapter, PluginAdapter};
use vocal_core::types::{AdapterType, HealthStatus, Principal};

const SERVICE: &str = "identity";

/// The subset of the Supabase user object the service needs.
#[derive(Debug, Deserialize)]
struct UserResponse {
    #[serde(default)]
    id: String,
    #[serde(default)]
    email: Option<String>,
    #[serde(default)]
    created_at: Option<String>,
}

/// Supabase Auth client implementing [`IdentityAdapter`].
///
/// URL and key resolution: config -> `SUPABASE_URL` / `SUPABASE_SERVICE_ROLE_KEY` -> error.
pub struct SupabaseIdentity {
    client: reqwest::Client,
    user_url: String,
    timeout: Duration,
}

impl SupabaseIdentity {
    pub fn new(config: &IdentityConfig) -> Result<Self, VocalError> {
        let url = resolve(&config.url, "SUPABASE_URL", "identity.url")?;
        let api_key = resolve(
            &config.api_key,
            "SUPABASE_SERVICE_ROLE_KEY",
            "identity.api_key",
        )?;
        let timeout = Duration::from_secs(config.timeout_secs);

        let mut headers = HeaderMap::new();
        let mut key = HeaderValue::from_str(&api_key)
            .map_err(|e| VocalError::Config(format!("invalid identity API key header value: {e}")))?;
        key.set_sensitive(true);
        headers.insert("apikey", key);

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(timeout)
            .build()
            .map_err(|e| VocalError::Upstream {
                service: SERVICE,
                status: None,
                message: format!("failed to build HTTP client: {e}"),
                source: Some(Box::new(e)),
            })?;

        let user_url = format!("{}/auth/v1/user", url.trim_end_matches('/'));
        info!(url = %user_url, "identity provider configured");

        Ok(Self {
            client,
            user_url,
            timeout,
        })
    }
}

#[async_trait]
impl PluginAdapter for SupabaseIdentity {
    fn name(&self) -> &str {
        "supabase"
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
impl IdentityAdapter for SupabaseIdentity {
    async fn verify(&self, credential: &str) -> Result<Principal, VocalError> {
        let response = self
            .client
            .get(&self.user_url)
            .bearer_auth(credential)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    VocalError::UpstreamTimeout {
                        service: SERVICE,
                        duration: self.timeout,
                    }
                } else {
                    VocalError::Upstream {
                        service: SERVICE,
                        status: None,
                        message: format!("HTTP request failed: {e}"),
                        source: Some(Box::new(e)),
                    }
                }
            })?;

        let status = response.status();
        debug!(status = %status, "identity response received");

        if matches!(status, StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN) {
            return Err(VocalError::InvalidCredential {
                message: "credential rejected by identity provider".into(),
            });
        }
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(VocalError::Upstream {
                service: SERVICE,
                status: Some(status.as_u16()),
                message: format!("identity provider returned {status}: {body}"),
                source: None,
            });
        }

        let user: UserResponse = response.json().await.map_err(|e| VocalError::Upstream {
            service: SERVICE,
            status: None,
            message: format!("failed to parse identity response: {e}"),
            source: Some(Box::new(e)),
        })?;

        if user.id.trim().is_empty() {
            return Err(VocalError::InvalidCredential {
                message: "identity provider returned no user".into(),
            });
        }

        Ok(Principal {
            id: user.id,
            email: user.email.unwrap_or_default(),
            created_at: user.created_at,
        })
    }
}

fn resolve(value: &Option<String>, env_var: &str, key: &str) -> Result<String, VocalError> {
    value
        .clone()
        .filter(|v| !v.is_empty())
        .or_else(|| std::env::var(env_var).ok().filter(|v| !v.is_empty()))
        .ok_or_else(|| {
            VocalError::Config(format!(
                "{key} not found: set it in vocal.toml or the {env_var} environment variable"
            ))
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn identity_for(server: &MockServer, timeout_secs: u64) -> SupabaseIdentity {
        SupabaseIdentity::new(&IdentityConfig {
            url: Some(format!("{}/", server.uri())),
            api_key: Some("service-role".into()),
            timeout_secs,
        })
        .unwrap()
    }

    #[tokio::test]
    async fn valid_credential_yields_principal() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/auth/v1/user"))
            .and(header("apikey", "service-role"))
            .and(header("authorization", "Bearer good-token"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "id": "user-1",
                "email": "alice@example.com",
                "created_at": "2026-01-01T00:00:00Z",
                "aud": "authenticated"
            })))
            .expect(1)
            .mount(&server)
            .await;

        let principal = identity_for(&server, 5).verify("good-token").await.unwrap();
        assert_eq!(principal.id, "user-1");
        assert_eq!(principal.email, "alice@example.com");
        assert_eq!(principal.created_at.as_deref(), Some("2026-01-01T00:00:00Z"));
    }

    #[tokio::test]
    async fn rejected_credential_is_invalid() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/auth/v1/user"))
            .respond_with(ResponseTemplate::new(401).set_body_json(serde_json::json!({
                "msg": "invalid JWT"
            })))
            .expect(1)
            .mount(&server)
            .await;

        let err = identity_for(&server, 5).verify("bad").await.unwrap_err();
        assert!(matches!(err, VocalError::InvalidCredential { .. }));
    }

    #[tokio::test]
    async fn missing_user_id_is_invalid() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/auth/v1/user"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({})))
            .mount(&server)
            .await;

        let err = identity_for(&server, 5).verify("t").await.unwrap_err();
        assert!(matches!(err, VocalError::InvalidCredential { .. }));
    }

    #[tokio::test]
    async fn provider_outage_is_upstream() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/auth/v1/user"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        let err = identity_for(&server, 5).verify("t").await.unwrap_err();
        assert!(matches!(err, VocalError::Upstream { status: Some(500), .. }));
    }

    #[tokio::test]
    async fn slow_provider_is_timeout() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/auth/v1/user"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(serde_json::json!({"id": "u"}))
                    .set_delay(Duration::from_secs(3)),
            )
            .mount(&server)
            .await;

        let err = identity_for(&server, 1).verify("t").await.unwrap_err();
        assert!(matches!(err, VocalError::UpstreamTimeout { service: "identity", .. }));
    }

    #[test]
    fn explicit_config_wins_over_env() {
        let value = resolve(&Some("https://x.supabase.co".into()), "SUPABASE_URL", "identity.url");
        assert_eq!(value.unwrap(), "https://x.supabase.co");
    }
}
