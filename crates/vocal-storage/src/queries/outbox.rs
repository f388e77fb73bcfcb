// SPDX-FileCopyrightText: 2026 Vocal Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Voice-clone outbox.
//!
//! A vendor voice reference is staged here before its `voice_models` row is
//! written and cleared once that row commits. Rows that survive are vendor
//! voices with no local owner record and are swept by reconciliation.

use rusqlite::params;
use vocal_core::VocalError;
use vocal_core::types::VoiceCloneOutboxEntry;

use crate::database::{Database, map_tr_err};

/// Record a freshly cloned vendor voice.
pub async fn stage(db: &Database, entry: &VoiceCloneOutboxEntry) -> Result<(), VocalError> {
    let entry = entry.clone();
    db.connection()
        .call(move |conn| {
            conn.execute(
                "INSERT OR REPLACE INTO voice_clone_outbox (external_voice_ref, owner_id, created_at)
                 VALUES (?1, ?2, ?3)",
                params![entry.external_voice_ref, entry.owner_id, entry.created_at],
            )?;
            Ok(())
        })
        .await
        .map_err(map_tr_err)
}

/// Drop an outbox row. Clearing an absent row is not an error.
pub async fn clear(db: &Database, external_voice_ref: &str) -> Result<(), VocalError> {
    let external_voice_ref = external_voice_ref.to_string();
    db.connection()
        .call(move |conn| {
            conn.execute(
                "DELETE FROM voice_clone_outbox WHERE external_voice_ref = ?1",
                params![external_voice_ref],
            )?;
            Ok(())
        })
        .await
        .map_err(map_tr_err)
}

/// Outbox rows older than `created_before` whose voice never got a local record.
pub async fn list_orphans(
    db: &Database,
    created_before: &str,
) -> Result<Vec<VoiceCloneOutboxEntry>, VocalError> {
    let created_before = created_before.to_string();
    db.connection()
        .call(move |conn| {
            let mut stmt = conn.prepare(
                "SELECT o.external_voice_ref, o.owner_id, o.created_at
                 FROM voice_clone_outbox o
                 WHERE o.created_at < ?1
                   AND NOT EXISTS (
                       SELECT 1 FROM voice_models m
                       WHERE m.external_voice_ref = o.external_voice_ref
                   )
                 ORDER BY o.created_at ASC",
            )?;
            let rows = stmt.query_map(params![created_before], |row| {
                Ok(VoiceCloneOutboxEntry {
                    external_voice_ref: row.get(0)?,
                    owner_id: row.get(1)?,
                    created_at: row.get(2)?,
                })
            })?;
            rows.collect()
        })
        .await
        .map_err(map_tr_err)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::queries::test_support::{setup_db, ts};
    use crate::queries::voice_models;
    use vocal_core::types::VoiceModel;

    fn entry(voice_ref: &str, n: u32) -> VoiceCloneOutboxEntry {
        VoiceCloneOutboxEntry {
            external_voice_ref: voice_ref.to_string(),
            owner_id: "alice".to_string(),
            created_at: ts(n),
        }
    }

    #[tokio::test]
    async fn staged_entries_older_than_cutoff_are_orphans() {
        let (db, _dir) = setup_db().await;
        stage(&db, &entry("old", 1)).await.unwrap();
        stage(&db, &entry("new", 30)).await.unwrap();

        let orphans = list_orphans(&db, &ts(10)).await.unwrap();
        assert_eq!(orphans.len(), 1);
        assert_eq!(orphans[0].external_voice_ref, "old");
        db.close().await.unwrap();
    }

    #[tokio::test]
    async fn committed_voices_are_not_orphans() {
        let (db, _dir) = setup_db().await;
        stage(&db, &entry("ext-1", 1)).await.unwrap();
        voice_models::insert_voice_model(
            &db,
            &VoiceModel {
                id: "vm-1".into(),
                owner_id: "alice".into(),
                display_name: "voice_alice".into(),
                description: String::new(),
                external_voice_ref: "ext-1".into(),
                audio_ref: None,
                created_at: ts(2),
                updated_at: ts(2),
            },
        )
        .await
        .unwrap();

        assert!(list_orphans(&db, &ts(50)).await.unwrap().is_empty());
        db.close().await.unwrap();
    }

    #[tokio::test]
    async fn clear_removes_entry() {
        let (db, _dir) = setup_db().await;
        stage(&db, &entry("ext-1", 1)).await.unwrap();
        clear(&db, "ext-1").await.unwrap();
        clear(&db, "ext-1").await.unwrap();
        assert!(list_orphans(&db, &ts(50)).await.unwrap().is_empty());
        db.close().await.unwrap();
    }
}
