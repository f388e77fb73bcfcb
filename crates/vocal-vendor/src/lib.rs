// SPDX-FileCopyrightText: 2026 Vocal Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! ElevenLabs adapter for voice cloning and text-to-speech.
//!
//! This crate implements [`VoiceVendorAdapter`] on top of the ElevenLabs v1
//! REST API. Synthesis settings (model, stability, similarity boost) are read
//! from configuration once and applied to every call.

pub mod client;
pub mod types;

use std::time::Duration;

use async_trait::async_trait;
use tracing::{debug, info};
use vocal_config::model::VendorConfig;
use vocal_core::error::VocalError;
use vocal_core::traits::{PluginAdapter, VoiceVendorAdapter};
use vocal_core::types::{AdapterType, HealthStatus, VoiceCloneRequest};

use crate::client::ElevenLabsClient;
use crate::types::{TextToSpeechRequest, VoiceSettings};

/// ElevenLabs vendor implementing [`VoiceVendorAdapter`].
///
/// API key resolution order: config -> `ELEVENLABS_API_KEY` env var -> error.
pub struct ElevenLabsVendor {
    client: ElevenLabsClient,
    model_id: String,
    settings: VoiceSettings,
}

impl ElevenLabsVendor {
    /// Creates a vendor adapter from the `[vendor]` configuration section.
    pub fn new(config: &VendorConfig) -> Result<Self, VocalError> {
        let api_key = resolve_api_key(&config.api_key)?;
        let client = ElevenLabsClient::new(
            &api_key,
            Duration::from_secs(config.timeout_secs),
            config.max_retries,
        )?
        .with_base_url(config.base_url.clone());

        info!(
            base_url = %config.base_url,
            model_id = %config.model_id,
            "ElevenLabs vendor initialized"
        );

        Ok(Self::with_client(client, config))
    }

    /// Creates a vendor around an existing client.
    pub fn with_client(client: ElevenLabsClient, config: &VendorConfig) -> Self {
        Self {
            client,
            model_id: config.model_id.clone(),
            settings: VoiceSettings {
                stability: config.stability,
                similarity_boost: config.similarity_boost,
            },
        }
    }
}

#[async_trait]
impl PluginAdapter for ElevenLabsVendor {
    fn name(&self) -> &str {
        "elevenlabs"
    }

    fn version(&self) -> semver::Version {
        semver::Version::new(0, 1, 0)
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::Vendor
    }

    async fn health_check(&self) -> Result<HealthStatus, VocalError> {
        // Probing the vendor would spend quota.
        Ok(HealthStatus::Healthy)
    }

    async fn shutdown(&self) -> Result<(), VocalError> {
        debug!("ElevenLabs vendor shutting down");
        Ok(())
    }
}

#[async_trait]
impl VoiceVendorAdapter for ElevenLabsVendor {
    async fn clone_voice(&self, request: VoiceCloneRequest) -> Result<String, VocalError> {
        let voice_id = self.client.add_voice(&request).await?;
        info!(voice_id = %voice_id, bytes = request.audio.len(), "voice cloned");
        Ok(voice_id)
    }

    async fn synthesize(&self, voice_ref: &str, text: &str) -> Result<Vec<u8>, VocalError> {
        let request = TextToSpeechRequest {
            text: text.to_string(),
            model_id: self.model_id.clone(),
            voice_settings: self.settings,
        };
        let audio = self.client.text_to_speech(voice_ref, &request).await?;
        debug!(voice_ref, chars = text.chars().count(), bytes = audio.len(), "speech synthesized");
        Ok(audio)
    }

    async fn delete_voice(&self, voice_ref: &str) -> Result<(), VocalError> {
        self.client.delete_voice(voice_ref).await?;
        info!(voice_ref, "vendor voice deleted");
        Ok(())
    }
}

/// Resolves the API key from config or the `ELEVENLABS_API_KEY` environment variable.
fn resolve_api_key(config_key: &Option<String>) -> Result<String, VocalError> {
    if let Some(key) = config_key
        && !key.is_empty()
    {
        return Ok(key.clone());
    }

    std::env::var("ELEVENLABS_API_KEY")
        .ok()
        .filter(|key| !key.is_empty())
        .ok_or_else(|| {
            VocalError::Config(
                "vendor API key not found: set vendor.api_key in vocal.toml or the \
                 ELEVENLABS_API_KEY environment variable"
                    .into(),
            )
        })
}
