// SPDX-FileCopyrightText: 2026 Vocal Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Mock voice vendor for deterministic testing.
//!
//! `MockVendor` implements `VoiceVendorAdapter` in memory. Each operation
//! can be switched to fail, and every call is recorded for assertions.

use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use async_trait::async_trait;

use vocal_core::traits::adapter::PluginAdapter;
use vocal_core::traits::vendor::VoiceVendorAdapter;
use vocal_core::types::{AdapterType, HealthStatus, VoiceCloneRequest};
use vocal_core::VocalError;

/// Bytes returned by every successful synthesis.
pub const MOCK_AUDIO: &[u8] = b"ID3mock-mpeg-audio";

/// An in-memory voice vendor.
///
/// Cloned voices are named `mock-voice-1`, `mock-voice-2`, ... in call order.
#[derive(Default)]
pub struct MockVendor {
    clone_calls: AtomicUsize,
    synthesize_calls: AtomicUsize,
    delete_calls: AtomicUsize,
    fail_clone: AtomicBool,
    fail_synthesize: AtomicBool,
    fail_delete: AtomicBool,
    cloned: Mutex<Vec<VoiceCloneRequest>>,
    synthesized: Mutex<Vec<(String, String)>>,
    deleted: Mutex<Vec<String>>,
}

impl MockVendor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make subsequent `clone_voice` calls fail with an upstream error.
    pub fn fail_clone(&self, fail: bool) {
        self.fail_clone.store(fail, Ordering::SeqCst);
    }

    /// Make subsequent `synthesize` calls fail with an upstream error.
    pub fn fail_synthesize(&self, fail: bool) {
        self.fail_synthesize.store(fail, Ordering::SeqCst);
    }

    /// Make subsequent `delete_voice` calls fail with an upstream error.
    pub fn fail_delete(&self, fail: bool) {
        self.fail_delete.store(fail, Ordering::SeqCst);
    }

    /// Number of `clone_voice` calls, including failed ones.
    pub fn clone_calls(&self) -> usize {
        self.clone_calls.load(Ordering::SeqCst)
    }

    pub fn synthesize_calls(&self) -> usize {
        self.synthesize_calls.load(Ordering::SeqCst)
    }

    pub fn delete_calls(&self) -> usize {
        self.delete_calls.load(Ordering::SeqCst)
    }

    /// Clone requests that succeeded, in call order.
    pub fn cloned_requests(&self) -> Vec<VoiceCloneRequest> {
        lock(&self.cloned).clone()
    }

    /// Voice refs passed to successful `synthesize` calls.
    pub fn synthesized_voices(&self) -> Vec<String> {
        lock(&self.synthesized)
            .iter()
            .map(|(voice, _)| voice.clone())
            .collect()
    }

    /// Texts passed to successful `synthesize` calls.
    pub fn synthesized_texts(&self) -> Vec<String> {
        lock(&self.synthesized)
            .iter()
            .map(|(_, text)| text.clone())
            .collect()
    }

    /// Voice refs removed by successful `delete_voice` calls.
    pub fn deleted_voices(&self) -> Vec<String> {
        lock(&self.deleted).clone()
    }
}

fn lock<T>(mutex: &Mutex<T>) -> std::sync::MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

fn mock_failure(operation: &str) -> VocalError {
    VocalError::Upstream {
        service: "vendor",
        status: Some(500),
        message: format!("mock {operation} failure"),
        source: None,
    }
}

#[async_trait]
impl PluginAdapter for MockVendor {
    fn name(&self) -> &str {
        "mock-vendor"
    }

    fn version(&self) -> semver::Version {
        semver::Version::new(0, 1, 0)
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::Vendor
    }

    async fn health_check(&self) -> Result<HealthStatus, VocalError> {
        Ok(HealthStatus::Healthy)
    }

    async fn shutdown(&self) -> Result<(), VocalError> {
        Ok(())
    }
}

#[async_trait]
impl VoiceVendorAdapter for MockVendor {
    async fn clone_voice(&self, request: VoiceCloneRequest) -> Result<String, VocalError> {
        let n = self.clone_calls.fetch_add(1, Ordering::SeqCst) + 1;
        if self.fail_clone.load(Ordering::SeqCst) {
            return Err(mock_failure("clone"));
        }
        lock(&self.cloned).push(request);
        Ok(format!("mock-voice-{n}"))
    }

    async fn synthesize(&self, voice_ref: &str, text: &str) -> Result<Vec<u8>, VocalError> {
        self.synthesize_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_synthesize.load(Ordering::SeqCst) {
            return Err(mock_failure("synthesize"));
        }
        lock(&self.synthesized).push((voice_ref.to_string(), text.to_string()));
        Ok(MOCK_AUDIO.to_vec())
    }

    async fn delete_voice(&self, voice_ref: &str) -> Result<(), VocalError> {
        self.delete_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_delete.load(Ordering::SeqCst) {
            return Err(mock_failure("delete"));
        }
        lock(&self.deleted).push(voice_ref.to_string());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request() -> VoiceCloneRequest {
        VoiceCloneRequest {
            name: "voice".into(),
            description: "desc".into(),
            file_name: "sample.mp3".into(),
            content_type: "audio/mpeg".into(),
            audio: vec![1, 2, 3],
        }
    }

    #[tokio::test]
    async fn clone_ids_are_sequential() {
        let vendor = MockVendor::new();
        assert_eq!(vendor.clone_voice(request()).await.unwrap(), "mock-voice-1");
        assert_eq!(vendor.clone_voice(request()).await.unwrap(), "mock-voice-2");
        assert_eq!(vendor.cloned_requests().len(), 2);
    }

    #[tokio::test]
    async fn failures_are_counted_but_not_recorded() {
        let vendor = MockVendor::new();
        vendor.fail_synthesize(true);
        assert!(vendor.synthesize("v", "hi").await.unwrap_err().is_upstream());
        assert_eq!(vendor.synthesize_calls(), 1);
        assert!(vendor.synthesized_voices().is_empty());

        vendor.fail_synthesize(false);
        assert_eq!(vendor.synthesize("v", "hi").await.unwrap(), MOCK_AUDIO);
        assert_eq!(vendor.synthesized_texts(), vec!["hi"]);
    }
}
