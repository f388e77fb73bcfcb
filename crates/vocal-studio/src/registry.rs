// SPDX-FileCopyrightText: 2026 Vocal Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Voice model registry.
//!
//! Keeps local voice model records in step with the vendor's cloned voices.
//! A vendor voice reference is staged in the outbox before its local row is
//! written, so a crash or storage failure in between leaves a record that
//! [`VoiceRegistry::reconcile_orphans`] can clean up.

use std::sync::Arc;
use std::time::Duration;

use tracing::{info, warn};
use vocal_core::types::{VoiceCloneOutboxEntry, VoiceCloneRequest, VoiceModel};
use vocal_core::{StorageAdapter, VocalError, VoiceVendorAdapter, types};

/// An uploaded voice sample plus optional metadata.
#[derive(Debug, Clone)]
pub struct VoiceUpload {
    pub audio: Vec<u8>,
    pub file_name: String,
    pub content_type: String,
    pub display_name: Option<String>,
    pub description: Option<String>,
}

/// Outcome of an orphan sweep.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReconcileReport {
    pub examined: usize,
    pub deleted: usize,
    pub failed: usize,
}

pub struct VoiceRegistry {
    storage: Arc<dyn StorageAdapter>,
    vendor: Arc<dyn VoiceVendorAdapter>,
}

impl VoiceRegistry {
    pub fn new(storage: Arc<dyn StorageAdapter>, vendor: Arc<dyn VoiceVendorAdapter>) -> Self {
        Self { storage, vendor }
    }

    /// Clones a voice at the vendor and records it for `owner_id`.
    pub async fn create(&self, owner_id: &str, upload: VoiceUpload) -> Result<VoiceModel, VocalError> {
        if upload.audio.is_empty() {
            return Err(VocalError::validation("audio file is required"));
        }

        let display_name = non_blank(upload.display_name).unwrap_or_else(|| format!("voice_{owner_id}"));
        let description = non_blank(upload.description)
            .unwrap_or_else(|| format!("Voice model for user {owner_id}"));

        let external_voice_ref = self
            .vendor
            .clone_voice(VoiceCloneRequest {
                name: display_name.clone(),
                description: description.clone(),
                file_name: upload.file_name,
                content_type: upload.content_type,
                audio: upload.audio,
            })
            .await?;

        if external_voice_ref.trim().is_empty() {
            return Err(VocalError::Upstream {
                service: "vendor",
                status: None,
                message: "vendor returned an empty voice reference".into(),
                source: None,
            });
        }

        let now = types::now_timestamp();
        let staged = self
            .storage
            .stage_voice_clone(&VoiceCloneOutboxEntry {
                external_voice_ref: external_voice_ref.clone(),
                owner_id: owner_id.to_string(),
                created_at: now.clone(),
            })
            .await;
        if let Err(e) = staged {
            // Without an outbox row reconciliation cannot find this voice.
            if let Err(delete_err) = self.vendor.delete_voice(&external_voice_ref).await {
                warn!(
                    error = %delete_err,
                    voice_ref = %external_voice_ref,
                    "vendor voice deletion failed after outbox write failure"
                );
            }
            return Err(e);
        }

        let model = VoiceModel {
            id: types::new_id(),
            owner_id: owner_id.to_string(),
            display_name,
            description,
            external_voice_ref,
            audio_ref: None,
            created_at: now.clone(),
            updated_at: now,
        };
        self.storage.insert_voice_model(&model).await?;

        // Reconciliation skips outbox rows that have a matching model.
        if let Err(e) = self.storage.clear_voice_clone(&model.external_voice_ref).await {
            warn!(error = %e, voice_ref = %model.external_voice_ref, "failed to clear voice clone outbox entry");
        }

        info!(owner_id, model_id = %model.id, voice_ref = %model.external_voice_ref, "voice model created");
        Ok(model)
    }

    pub async fn list(&self, owner_id: &str) -> Result<Vec<VoiceModel>, VocalError> {
        self.storage.list_voice_models(owner_id).await
    }

    pub async fn get(&self, owner_id: &str, id: &str) -> Result<VoiceModel, VocalError> {
        self.storage
            .get_voice_model(owner_id, id)
            .await?
            .ok_or_else(|| VocalError::not_found("voice model"))
    }

    /// Looks a model up by local id or external voice reference.
    pub async fn resolve(&self, owner_id: &str, reference: &str) -> Result<VoiceModel, VocalError> {
        self.storage
            .find_voice_model(owner_id, reference)
            .await?
            .ok_or_else(|| VocalError::not_found("voice model"))
    }

    /// Deletes the vendor voice, then the local record.
    ///
    /// A vendor failure is logged and does not stop the local delete.
    pub async fn delete(&self, owner_id: &str, id: &str) -> Result<(), VocalError> {
        let model = self.get(owner_id, id).await?;

        if let Err(e) = self.vendor.delete_voice(&model.external_voice_ref).await {
            warn!(
                error = %e,
                model_id = %model.id,
                voice_ref = %model.external_voice_ref,
                "vendor voice deletion failed; removing local record anyway"
            );
        }

        if !self.storage.delete_voice_model(owner_id, &model.id).await? {
            return Err(VocalError::not_found("voice model"));
        }
        info!(owner_id, model_id = %model.id, "voice model deleted");
        Ok(())
    }

    /// Deletes vendor voices whose local record was never committed.
    pub async fn reconcile_orphans(&self, older_than: Duration) -> Result<ReconcileReport, VocalError> {
        let cutoff = types::timestamp_ago(older_than);
        let orphans = self.storage.list_orphaned_voice_clones(&cutoff).await?;
        let mut report = ReconcileReport {
            examined: orphans.len(),
            ..ReconcileReport::default()
        };

        for orphan in orphans {
            match self.vendor.delete_voice(&orphan.external_voice_ref).await {
                Ok(()) => {
                    self.storage.clear_voice_clone(&orphan.external_voice_ref).await?;
                    report.deleted += 1;
                }
                Err(e) => {
                    warn!(
                        error = %e,
                        voice_ref = %orphan.external_voice_ref,
                        owner_id = %orphan.owner_id,
                        "failed to delete orphaned vendor voice"
                    );
                    report.failed += 1;
                }
            }
        }

        info!(
            examined = report.examined,
            deleted = report.deleted,
            failed = report.failed,
            "voice clone reconciliation finished"
        );
        Ok(report)
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{storage, upload};
    use vocal_test_utils::{FailingStorage, MockVendor};

    #[tokio::test]
    async fn create_clones_and_persists_with_defaults() {
        let (storage, _dir) = storage().await;
        let vendor = Arc::new(MockVendor::new());
        let registry = VoiceRegistry::new(storage.clone(), vendor.clone());

        let model = registry.create("alice", upload()).await.unwrap();
        assert_eq!(model.display_name, "voice_alice");
        assert_eq!(model.description, "Voice model for user alice");
        assert!(!model.external_voice_ref.is_empty());
        assert_eq!(vendor.clone_calls(), 1);

        let stored = registry.get("alice", &model.id).await.unwrap();
        assert_eq!(stored, model);
        let far_future = storage
            .list_orphaned_voice_clones("9999-12-31T00:00:00.000Z")
            .await
            .unwrap();
        assert!(far_future.is_empty(), "outbox should be cleared");
    }

    #[tokio::test]
    async fn empty_audio_is_rejected_before_vendor_call() {
        let (storage, _dir) = storage().await;
        let vendor = Arc::new(MockVendor::new());
        let registry = VoiceRegistry::new(storage, vendor.clone());

        let mut empty = upload();
        empty.audio.clear();
        let err = registry.create("alice", empty).await.unwrap_err();
        assert!(matches!(err, VocalError::Validation(_)));
        assert_eq!(vendor.clone_calls(), 0);
    }

    #[tokio::test]
    async fn vendor_failure_surfaces_and_persists_nothing() {
        let (storage, _dir) = storage().await;
        let vendor = Arc::new(MockVendor::new());
        vendor.fail_clone(true);
        let registry = VoiceRegistry::new(storage, vendor);

        let err = registry.create("alice", upload()).await.unwrap_err();
        assert!(err.is_upstream());
        assert!(registry.list("alice").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn outbox_failure_deletes_the_vendor_voice() {
        let (storage, _dir) = storage().await;
        let failing = Arc::new(FailingStorage::new(storage.clone()));
        failing.fail_outbox_writes(true);
        let vendor = Arc::new(MockVendor::new());
        let registry = VoiceRegistry::new(failing, vendor.clone());

        let err = registry.create("alice", upload()).await.unwrap_err();
        assert!(matches!(err, VocalError::Storage { .. }));
        assert_eq!(vendor.deleted_voices(), vec!["mock-voice-1"]);
        assert!(storage.list_voice_models("alice").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn resolve_is_owner_scoped() {
        let (storage, _dir) = storage().await;
        let registry = VoiceRegistry::new(storage, Arc::new(MockVendor::new()));
        let model = registry.create("alice", upload()).await.unwrap();

        assert_eq!(registry.resolve("alice", &model.id).await.unwrap().id, model.id);
        assert_eq!(
            registry.resolve("alice", &model.external_voice_ref).await.unwrap().id,
            model.id
        );
        let err = registry.resolve("bob", &model.external_voice_ref).await.unwrap_err();
        assert!(matches!(err, VocalError::NotFound { .. }));
    }

    #[tokio::test]
    async fn vendor_delete_failure_still_removes_local_model() {
        let (storage, _dir) = storage().await;
        let vendor = Arc::new(MockVendor::new());
        let registry = VoiceRegistry::new(storage, vendor.clone());
        let model = registry.create("alice", upload()).await.unwrap();

        vendor.fail_delete(true);
        registry.delete("alice", &model.id).await.unwrap();
        assert_eq!(vendor.delete_calls(), 1);
        assert!(matches!(
            registry.get("alice", &model.id).await.unwrap_err(),
            VocalError::NotFound { .. }
        ));
    }

    #[tokio::test]
    async fn delete_of_foreign_model_is_not_found() {
        let (storage, _dir) = storage().await;
        let vendor = Arc::new(MockVendor::new());
        let registry = VoiceRegistry::new(storage, vendor.clone());
        let model = registry.create("alice", upload()).await.unwrap();

        let err = registry.delete("bob", &model.id).await.unwrap_err();
        assert!(matches!(err, VocalError::NotFound { .. }));
        assert_eq!(vendor.delete_calls(), 0);
        assert!(registry.get("alice", &model.id).await.is_ok());
    }

    #[tokio::test]
    async fn reconcile_deletes_orphaned_vendor_voices() {
        let (storage, _dir) = storage().await;
        let vendor = Arc::new(MockVendor::new());
        let registry = VoiceRegistry::new(storage.clone(), vendor.clone());

        for voice_ref in ["orphan-1", "orphan-2"] {
            storage
                .stage_voice_clone(&VoiceCloneOutboxEntry {
                    external_voice_ref: voice_ref.into(),
                    owner_id: "alice".into(),
                    created_at: "2026-01-01T00:00:00.000Z".into(),
                })
                .await
                .unwrap();
        }

        let report = registry.reconcile_orphans(Duration::from_secs(60)).await.unwrap();
        assert_eq!(
            report,
            ReconcileReport {
                examined: 2,
                deleted: 2,
                failed: 0
            }
        );
        assert_eq!(vendor.deleted_voices(), vec!["orphan-1", "orphan-2"]);

        let again = registry.reconcile_orphans(Duration::from_secs(60)).await.unwrap();
        assert_eq!(again.examined, 0);
    }

    #[tokio::test]
    async fn reconcile_keeps_entries_the_vendor_refused() {
        let (storage, _dir) = storage().await;
        let vendor = Arc::new(MockVendor::new());
        vendor.fail_delete(true);
        let registry = VoiceRegistry::new(storage.clone(), vendor);

        storage
            .stage_voice_clone(&VoiceCloneOutboxEntry {
                external_voice_ref: "orphan".into(),
                owner_id: "alice".into(),
                created_at: "2026-01-01T00:00:00.000Z".into(),
            })
            .await
            .unwrap();

        let report = registry.reconcile_orphans(Duration::from_secs(60)).await.unwrap();
        assert_eq!(report.failed, 1);
        let retry = registry.reconcile_orphans(Duration::from_secs(60)).await.unwrap();
        assert_eq!(retry.examined, 1);
    }
}
