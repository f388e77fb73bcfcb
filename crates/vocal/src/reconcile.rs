// SPDX-FileCopyrightText: 2026 Vocal Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `vocal reconcile` command implementation.
//!
//! Sweeps the voice-clone outbox: vendor voices staged before the cutoff
//! whose local voice model never landed are deleted at the vendor.

use std::sync::Arc;
use std::time::Duration;

use tracing::info;

use vocal_config::model::VocalConfig;
use vocal_core::{StorageAdapter, VocalError, VoiceVendorAdapter};
use vocal_studio::{ReconcileReport, VoiceRegistry};
use vocal_vendor::ElevenLabsVendor;

use crate::serve::{init_tracing, open_storage};

/// Runs the `vocal reconcile` command.
pub async fn run_reconcile(config: VocalConfig, older_than: Duration) -> Result<(), VocalError> {
    init_tracing(&config.server.log_level);

    let storage = open_storage(&config).await?;
    let vendor = Arc::new(ElevenLabsVendor::new(&config.vendor)?);

    let report = sweep(storage.clone(), vendor, older_than).await;
    storage.close().await?;
    let report = report?;

    println!(
        "reconcile: examined {}, deleted {}, failed {}",
        report.examined, report.deleted, report.failed
    );
    if report.failed > 0 {
        return Err(VocalError::Internal(format!(
            "{} orphaned voice(s) could not be deleted; rerun later",
            report.failed
        )));
    }
    Ok(())
}

async fn sweep(
    storage: Arc<dyn StorageAdapter>,
    vendor: Arc<dyn VoiceVendorAdapter>,
    older_than: Duration,
) -> Result<ReconcileReport, VocalError> {
    info!(older_than_secs = older_than.as_secs(), "reconciling voice clone outbox");
    VoiceRegistry::new(storage, vendor)
        .reconcile_orphans(older_than)
        .await
}

#[cfg(test)]
mod tests {
    use vocal_core::types::{VoiceCloneOutboxEntry, timestamp_ago};
    use vocal_test_utils::MockVendor;

    use super::*;

    #[tokio::test]
    async fn sweep_respects_cutoff() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = VocalConfig::default();
        config.storage.database_path = dir.path().join("vocal.db").to_string_lossy().into_owned();
        let storage = open_storage(&config).await.unwrap();

        for (voice_ref, age) in [("old", 7200), ("fresh", 10)] {
            storage
                .stage_voice_clone(&VoiceCloneOutboxEntry {
                    external_voice_ref: voice_ref.into(),
                    owner_id: "alice".into(),
                    created_at: timestamp_ago(Duration::from_secs(age)),
                })
                .await
                .unwrap();
        }

        let vendor = Arc::new(MockVendor::new());
        let report = sweep(storage.clone(), vendor.clone(), Duration::from_secs(3600))
            .await
            .unwrap();
        assert_eq!(report.examined, 1);
        assert_eq!(vendor.deleted_voices(), vec!["old"]);
    }
}
