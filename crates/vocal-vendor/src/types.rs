// SPDX-FileCopyrightText: 2026 Vocal Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! ElevenLabs API request/response types.

use serde::{Deserialize, Serialize};

/// Body of `POST /text-to-speech/{voice_id}`.
#[derive(Debug, Clone, Serialize)]
pub struct TextToSpeechRequest {
    pub text: String,
    pub model_id: String,
    pub voice_settings: VoiceSettings,
}

/// Synthesis tuning sent with every text-to-speech call.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct VoiceSettings {
    pub stability: f64,
    pub similarity_boost: f64,
}

/// Response of `POST /voices/add`.
#[derive(Debug, Clone, Deserialize)]
pub struct AddVoiceResponse {
    pub voice_id: String,
}

/// Error envelope returned by the vendor on non-2xx responses.
#[derive(Debug, Clone, Deserialize)]
pub struct ApiErrorResponse {
    pub detail: ErrorDetail,
}

/// The `detail` field comes in several shapes depending on the endpoint.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum ErrorDetail {
    Structured {
        #[serde(default)]
        status: Option<String>,
        message: String,
    },
    Text(String),
    Other(serde_json::Value),
}

impl ErrorDetail {
    /// Human-readable message, prefixed with the vendor status code when present.
    pub fn describe(&self) -> String {
        match self {
            ErrorDetail::Structured {
                status: Some(status),
                message,
            } => format!("{status}: {message}"),
            ErrorDetail::Structured { message, .. } => message.clone(),
            ErrorDetail::Text(text) => text.clone(),
            ErrorDetail::Other(value) => value.to_string(),
        }
    }
}
