// SPDX-FileCopyrightText: 2026 Vocal Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Voice vendor adapter trait for voice cloning and text-to-speech.

use async_trait::async_trait;

use crate::error::VocalError;
use crate::traits::adapter::PluginAdapter;
use crate::types::VoiceCloneRequest;

/// Adapter for the external voice-cloning / text-to-speech service.
///
/// Synthesis parameters (model, stability, similarity boost) belong to the
/// adapter's configuration and are not negotiable per call.
#[async_trait]
pub trait VoiceVendorAdapter: PluginAdapter {
    /// Clones a voice from sample audio and returns the vendor's voice reference.
    async fn clone_voice(&self, request: VoiceCloneRequest) -> Result<String, VocalError>;

    /// Renders `text` with the given vendor voice and returns raw audio bytes.
    async fn synthesize(&self, voice_ref: &str, text: &str) -> Result<Vec<u8>, VocalError>;

    /// Deletes a cloned voice from the vendor registry.
    async fn delete_voice(&self, voice_ref: &str) -> Result<(), VocalError>;
}
