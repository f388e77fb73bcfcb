// SPDX-FileCopyrightText: 2026 Vocal Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Script-to-audio synthesis.

use std::sync::Arc;

use tracing::{info, warn};
use vocal_core::types::{Session, SessionStatus};
use vocal_core::{StorageAdapter, VocalError, VoiceVendorAdapter, types};

use crate::registry::VoiceRegistry;
use crate::{DEFAULT_SESSION_TITLE, DEFAULT_SESSION_TYPE};

/// Characters of script assumed to take one second to speak.
const CHARS_PER_SECOND: usize = 20;

#[derive(Debug, Clone)]
pub struct GenerateRequest {
    pub script: String,
    /// Local voice model id or vendor voice reference.
    pub voice_ref: String,
    pub title: Option<String>,
    pub session_type: Option<String>,
}

#[derive(Debug, Clone)]
pub struct GeneratedAudio {
    pub audio: Vec<u8>,
    pub estimated_duration_seconds: u32,
    /// `None` when the audio was produced but the session could not be saved.
    pub session: Option<Session>,
}

/// Spoken duration estimate for a script: one second per 20 characters, rounded up.
pub fn estimate_duration_seconds(script: &str) -> u32 {
    let seconds = script.chars().count().div_ceil(CHARS_PER_SECOND);
    u32::try_from(seconds).unwrap_or(u32::MAX)
}

pub struct SynthesisGateway {
    registry: Arc<VoiceRegistry>,
    storage: Arc<dyn StorageAdapter>,
    vendor: Arc<dyn VoiceVendorAdapter>,
}

impl SynthesisGateway {
    pub fn new(
        registry: Arc<VoiceRegistry>,
        storage: Arc<dyn StorageAdapter>,
        vendor: Arc<dyn VoiceVendorAdapter>,
    ) -> Self {
        Self {
            registry,
            storage,
            vendor,
        }
    }

    /// Renders `request.script` with an owned voice and records a completed session.
    ///
    /// The voice is resolved before any vendor call. If the session cannot be
    /// stored the audio is still returned.
    pub async fn generate(
        &self,
        owner_id: &str,
        request: GenerateRequest,
    ) -> Result<GeneratedAudio, VocalError> {
        if request.script.trim().is_empty() || request.voice_ref.trim().is_empty() {
            return Err(VocalError::validation("Script and voice ID are required"));
        }

        let model = self.registry.resolve(owner_id, request.voice_ref.trim()).await?;

        let audio = self
            .vendor
            .synthesize(&model.external_voice_ref, &request.script)
            .await?;
        if audio.is_empty() {
            return Err(VocalError::Upstream {
                service: "vendor",
                status: None,
                message: "vendor returned no audio".into(),
                source: None,
            });
        }

        let estimated_duration_seconds = estimate_duration_seconds(&request.script);
        let now = types::now_timestamp();
        let session = Session {
            id: types::new_id(),
            owner_id: owner_id.to_string(),
            voice_model_id: model.id.clone(),
            title: request
                .title
                .filter(|t| !t.trim().is_empty())
                .unwrap_or_else(|| DEFAULT_SESSION_TITLE.to_string()),
            script: request.script,
            session_type: request
                .session_type
                .filter(|t| !t.trim().is_empty())
                .unwrap_or_else(|| DEFAULT_SESSION_TYPE.to_string()),
            audio_ref: None,
            duration_seconds: Some(estimated_duration_seconds),
            status: SessionStatus::Completed,
            created_at: now.clone(),
            updated_at: now,
        };

        let session = match self.storage.insert_session(&session).await {
            Ok(()) => Some(session),
            Err(e) => {
                warn!(error = %e, owner_id, "audio generated but session could not be saved");
                None
            }
        };

        info!(
            owner_id,
            model_id = %model.id,
            bytes = audio.len(),
            estimated_duration_seconds,
            "audio generated"
        );
        Ok(GeneratedAudio {
            audio,
            estimated_duration_seconds,
            session,
        })
    }
}
