// SPDX-FileCopyrightText: 2026 Vocal Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Test harness for end-to-end API testing.
//!
//! `TestHarness` assembles the full router with mock identity and vendor
//! adapters over a temp SQLite database, and drives it in-process with
//! `tower::ServiceExt::oneshot`. No socket is bound.

use std::sync::Arc;

use axum::Router;
use axum::body::Body;
use axum::http::{Method, Request, StatusCode, header};
use serde_json::Value;
use tower::ServiceExt;

use vocal_config::model::{DEFAULT_MAX_UPLOAD_BYTES, PaginationConfig, StorageConfig};
use vocal_core::{StorageAdapter, VocalError};
use vocal_gateway::{AppState, build_router};
use vocal_storage::SqliteStorage;
use vocal_studio::Studio;

use crate::failing_storage::FailingStorage;
use crate::mock_identity::MockIdentity;
use crate::mock_vendor::MockVendor;

const BOUNDARY: &str = "vocal-test-boundary";

/// Builder for creating test environments with configurable options.
pub struct TestHarnessBuilder {
    pagination: PaginationConfig,
    max_upload_bytes: u64,
}

impl TestHarnessBuilder {
    fn new() -> Self {
        Self {
            pagination: PaginationConfig::default(),
            max_upload_bytes: DEFAULT_MAX_UPLOAD_BYTES,
        }
    }

    /// Set the paging limits used by list endpoints.
    pub fn with_pagination(mut self, pagination: PaginationConfig) -> Self {
        self.pagination = pagination;
        self
    }

    /// Set the audio upload size limit.
    pub fn with_max_upload_bytes(mut self, bytes: u64) -> Self {
        self.max_upload_bytes = bytes;
        self
    }

    /// Build the harness, creating and migrating a temp database.
    pub async fn build(self) -> Result<TestHarness, VocalError> {
        let temp_dir = tempfile::TempDir::new().map_err(VocalError::storage)?;
        let db_path = temp_dir.path().join("test.db");

        let sqlite = SqliteStorage::new(StorageConfig {
            database_path: db_path.to_string_lossy().into_owned(),
            wal_mode: true,
        });
        sqlite.initialize().await?;
        let storage = Arc::new(FailingStorage::new(Arc::new(sqlite)));

        let identity = Arc::new(MockIdentity::new());
        let vendor = Arc::new(MockVendor::new());
        let studio = Studio::new(storage.clone(), vendor.clone(), self.pagination);

        let router = build_router(AppState {
            studio: studio.clone(),
            identity: identity.clone(),
            max_upload_bytes: self.max_upload_bytes,
        });

        Ok(TestHarness {
            identity,
            vendor,
            storage,
            studio,
            router,
            _temp_dir: temp_dir,
        })
    }
}

/// Status and parsed JSON body of one API call.
#[derive(Debug)]
pub struct TestResponse {
    pub status: StatusCode,
    /// `Value::Null` for an empty body.
    pub body: Value,
}

/// A complete API environment with mock adapters and temp storage.
pub struct TestHarness {
    /// Token table consulted by the auth middleware.
    pub identity: Arc<MockIdentity>,
    /// Voice vendor standing in for the cloning/TTS service.
    pub vendor: Arc<MockVendor>,
    /// SQLite storage behind switchable write failures (all off by default).
    pub storage: Arc<FailingStorage>,
    /// The services the router is wired to.
    pub studio: Studio,
    router: Router,
    /// Temp directory kept alive for cleanup on drop.
    _temp_dir: tempfile::TempDir,
}

impl TestHarness {
    /// Create a new builder for configuring the test harness.
    pub fn builder() -> TestHarnessBuilder {
        TestHarnessBuilder::new()
    }

    /// Registers a user and returns a bearer token for it.
    pub async fn login(&self, user_id: &str) -> String {
        let token = format!("token-{user_id}");
        self.identity.add_user(&token, user_id).await;
        token
    }

    /// Sends a request with an optional bearer token and JSON body.
    pub async fn request(
        &self,
        method: Method,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> TestResponse {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
        }
        let body = match body {
            Some(json) => {
                builder = builder.header(header::CONTENT_TYPE, "application/json");
                Body::from(json.to_string())
            }
            None => Body::empty(),
        };
        self.send(builder.body(body).expect("valid request")).await
    }

    pub async fn get(&self, uri: &str, token: &str) -> TestResponse {
        self.request(Method::GET, uri, Some(token), None).await
    }

    pub async fn post(&self, uri: &str, token: &str, body: Value) -> TestResponse {
        self.request(Method::POST, uri, Some(token), Some(body)).await
    }

    pub async fn put(&self, uri: &str, token: &str, body: Value) -> TestResponse {
        self.request(Method::PUT, uri, Some(token), Some(body)).await
    }

    pub async fn delete(&self, uri: &str, token: &str) -> TestResponse {
        self.request(Method::DELETE, uri, Some(token), None).await
    }

    /// Posts a multipart upload to `/api/voice/upload`.
    ///
    /// `audio` is sent as `sample.mp3` with the given content type; `fields`
    /// are added as plain text parts.
    pub async fn upload(
        &self,
        token: &str,
        audio: &[u8],
        content_type: &str,
        fields: &[(&str, &str)],
    ) -> TestResponse {
        let mut body = Vec::new();
        for (name, value) in fields {
            body.extend_from_slice(
                format!(
                    "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{name}\"\r\n\r\n{value}\r\n"
                )
                .as_bytes(),
            );
        }
        body.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"audio\"; filename=\"sample.mp3\"\r\nContent-Type: {content_type}\r\n\r\n"
            )
            .as_bytes(),
        );
        body.extend_from_slice(audio);
        body.extend_from_slice(format!("\r\n--{BOUNDARY}--\r\n").as_bytes());

        let request = Request::builder()
            .method(Method::POST)
            .uri("/api/voice/upload")
            .header(header::AUTHORIZATION, format!("Bearer {token}"))
            .header(
                header::CONTENT_TYPE,
                format!("multipart/form-data; boundary={BOUNDARY}"),
            )
            .body(Body::from(body))
            .expect("valid request");
        self.send(request).await
    }

    /// Uploads a small valid sample and returns the created voice model JSON.
    pub async fn create_voice_model(&self, token: &str) -> Value {
        let response = self.upload(token, &[0x49, 0x44, 0x33, 0x04], "audio/mpeg", &[]).await;
        assert_eq!(response.status, StatusCode::CREATED, "{:?}", response.body);
        response.body["voiceModel"].clone()
    }

    async fn send(&self, request: Request<Body>) -> TestResponse {
        let response = match self.router.clone().oneshot(request).await {
            Ok(response) => response,
            Err(infallible) => match infallible {},
        };
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("readable response body");
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes)
                .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&bytes).into_owned()))
        };
        TestResponse { status, body }
    }
}
