// SPDX-FileCopyrightText: 2026 Vocal Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! HTTP client for the ElevenLabs API.
//!
//! Provides [`ElevenLabsClient`] which handles authentication, request
//! construction for the three endpoints the service uses, and one retry on
//! transient errors.

use std::time::Duration;

use reqwest::header::{ACCEPT, HeaderMap, HeaderValue};
use reqwest::multipart::{Form, Part};
use reqwest::{RequestBuilder, Response, StatusCode};
use tracing::{debug, warn};
use vocal_core::VocalError;
use vocal_core::types::VoiceCloneRequest;

use crate::types::{AddVoiceResponse, ApiErrorResponse, TextToSpeechRequest};

/// Default base URL for the ElevenLabs v1 API.
pub const API_BASE_URL: &str = "https://api.elevenlabs.io/v1";

const SERVICE: &str = "vendor";

/// HTTP client for ElevenLabs API communication.
#[derive(Debug, Clone)]
pub struct ElevenLabsClient {
    client: reqwest::Client,
    base_url: String,
    timeout: Duration,
    max_retries: u32,
    retry_delay: Duration,
}

impl ElevenLabsClient {
    /// Creates a client that authenticates every request with `xi-api-key`.
    pub fn new(api_key: &str, timeout: Duration, max_retries: u32) -> Result<Self, VocalError> {
        let mut headers = HeaderMap::new();
        let mut key = HeaderValue::from_str(api_key)
            .map_err(|e| VocalError::Config(format!("invalid vendor API key header value: {e}")))?;
        key.set_sensitive(true);
        headers.insert("xi-api-key", key);

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

        Ok(Self {
            client,
            base_url: API_BASE_URL.to_string(),
            timeout,
            max_retries,
            retry_delay: Duration::from_secs(1),
        })
    }

    /// Overrides the base URL (configured deployments, wiremock tests).
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into().trim_end_matches('/').to_string();
        self
    }

    /// Overrides the pause between a transient failure and its retry.
    pub fn with_retry_delay(mut self, delay: Duration) -> Self {
        self.retry_delay = delay;
        self
    }

    /// `POST /voices/add`: clones a voice from a sample and returns its vendor id.
    pub async fn add_voice(&self, request: &VoiceCloneRequest) -> Result<String, VocalError> {
        let url = format!("{}/voices/add", self.base_url);
        let response = self
            .send("add_voice", || {
                let part = Part::bytes(request.audio.clone())
                    .file_name(request.file_name.clone())
                    .mime_str(&request.content_type)
                    .map_err(|e| {
                        VocalError::validation(format!(
                            "invalid audio content type `{}`: {e}",
                            request.content_type
                        ))
                    })?;
                let form = Form::new()
                    .part("files", part)
                    .text("name", request.name.clone())
                    .text("description", request.description.clone());
                Ok(self.client.post(&url).multipart(form))
            })
            .await?;

        let body: AddVoiceResponse = response.json().await.map_err(|e| VocalError::Upstream {
            service: SERVICE,
            status: None,
            message: format!("failed to parse voice clone response: {e}"),
            source: Some(Box::new(e)),
        })?;

        if body.voice_id.trim().is_empty() {
            return Err(VocalError::Upstream {
                service: SERVICE,
                status: None,
                message: "voice clone response carried an empty voice_id".into(),
                source: None,
            });
        }
        Ok(body.voice_id)
    }

    /// `POST /text-to-speech/{voice_id}`: returns the raw audio bytes.
    pub async fn text_to_speech(
        &self,
        voice_id: &str,
        request: &TextToSpeechRequest,
    ) -> Result<Vec<u8>, VocalError> {
        let url = format!("{}/text-to-speech/{voice_id}", self.base_url);
        let response = self
            .send("text_to_speech", || {
                Ok(self
                    .client
                    .post(&url)
                    .header(ACCEPT, "audio/mpeg")
                    .json(request))
            })
            .await?;

        let audio = response.bytes().await.map_err(|e| self.transport_error(e))?;
        if audio.is_empty() {
            return Err(VocalError::Upstream {
                service: SERVICE,
                status: None,
                message: "text-to-speech returned an empty audio body".into(),
                source: None,
            });
        }
        Ok(audio.to_vec())
    }

    /// `DELETE /voices/{voice_id}`.
    pub async fn delete_voice(&self, voice_id: &str) -> Result<(), VocalError> {
        let url = format!("{}/voices/{voice_id}", self.base_url);
        self.send("delete_voice", || Ok(self.client.delete(&url)))
            .await?;
        Ok(())
    }

    /// Sends a request, retrying on 429/503 up to `max_retries` times.
    ///
    /// `build` is called once per attempt because multipart bodies cannot be
    /// replayed.
    async fn send(
        &self,
        operation: &'static str,
        build: impl Fn() -> Result<RequestBuilder, VocalError>,
    ) -> Result<Response, VocalError> {
        let mut attempt = 0;
        loop {
            if attempt > 0 {
                warn!(operation, attempt, "retrying vendor request after transient error");
                tokio::time::sleep(self.retry_delay).await;
            }

            let response = build()?
                .send()
                .await
                .map_err(|e| self.transport_error(e))?;

            let status = response.status();
            debug!(operation, status = %status, attempt, "vendor response received");

            if status.is_success() {
                return Ok(response);
            }

            let body = response.text().await.unwrap_or_default();
            if is_transient_error(status) && attempt < self.max_retries {
                warn!(operation, status = %status, "transient vendor error, will retry");
                attempt += 1;
                continue;
            }

            return Err(api_error(status, &body));
        }
    }

    fn transport_error(&self, e: reqwest::Error) -> VocalError {
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
    }
}

/// Returns true for HTTP status codes that indicate transient errors worth retrying.
fn is_transient_error(status: StatusCode) -> bool {
    matches!(
        status,
        StatusCode::TOO_MANY_REQUESTS | StatusCode::SERVICE_UNAVAILABLE
    )
}

fn api_error(status: StatusCode, body: &str) -> VocalError {
    let message = match serde_json::from_str::<ApiErrorResponse>(body) {
        Ok(err) => err.detail.describe(),
        Err(_) if body.trim().is_empty() => format!("API returned {status}"),
        Err(_) => format!("API returned {status}: {body}"),
    };
    VocalError::Upstream {
        service: SERVICE,
        status: Some(status.as_u16()),
        message,
        source: None,
    }
}
