// SPDX-FileCopyrightText: 2026 Vocal Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Voice model CRUD operations.

use rusqlite::{OptionalExtension, Row, params};
use vocal_core::VocalError;
use vocal_core::types::VoiceModel;

use crate::database::{Database, map_tr_err};

const COLUMNS: &str =
    "id, owner_id, display_name, description, external_voice_ref, audio_ref, created_at, updated_at";

fn from_row(row: &Row<'_>) -> rusqlite::Result<VoiceModel> {
    Ok(VoiceModel {
        id: row.get(0)?,
        owner_id: row.get(1)?,
        display_name: row.get(2)?,
        description: row.get(3)?,
        external_voice_ref: row.get(4)?,
        audio_ref: row.get(5)?,
        created_at: row.get(6)?,
        updated_at: row.get(7)?,
    })
}

/// Insert a new voice model.
pub async fn insert_voice_model(db: &Database, model: &VoiceModel) -> Result<(), VocalError> {
    let model = model.clone();
    db.connection()
        .call(move |conn| {
            conn.execute(
                "INSERT INTO voice_models
                    (id, owner_id, display_name, description, external_voice_ref, audio_ref, created_at, updated_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
                params![
                    model.id,
                    model.owner_id,
                    model.display_name,
                    model.description,
                    model.external_voice_ref,
                    model.audio_ref,
                    model.created_at,
                    model.updated_at,
                ],
            )?;
            Ok(())
        })
        .await
        .map_err(map_tr_err)
}

/// All voice models of one owner, newest first.
pub async fn list_voice_models(
    db: &Database,
    owner_id: &str,
) -> Result<Vec<VoiceModel>, VocalError> {
    let owner_id = owner_id.to_string();
    db.connection()
        .call(move |conn| {
            let mut stmt = conn.prepare(&format!(
                "SELECT {COLUMNS} FROM voice_models WHERE owner_id = ?1
                 ORDER BY created_at DESC, rowid DESC"
            ))?;
            let rows = stmt.query_map(params![owner_id], from_row)?;
            rows.collect()
        })
        .await
        .map_err(map_tr_err)
}

/// Get a voice model by local id.
pub async fn get_voice_model(
    db: &Database,
    owner_id: &str,
    id: &str,
) -> Result<Option<VoiceModel>, VocalError> {
    let owner_id = owner_id.to_string();
    let id = id.to_string();
    db.connection()
        .call(move |conn| {
            conn.query_row(
                &format!("SELECT {COLUMNS} FROM voice_models WHERE id = ?1 AND owner_id = ?2"),
                params![id, owner_id],
                from_row,
            )
            .optional()
        })
        .await
        .map_err(map_tr_err)
}

/// Get a voice model by local id or by external voice reference.
///
/// A local id match wins if both columns could match different rows.
pub async fn find_voice_model(
    db: &Database,
    owner_id: &str,
    reference: &str,
) -> Result<Option<VoiceModel>, VocalError> {
    let owner_id = owner_id.to_string();
    let reference = reference.to_string();
    db.connection()
        .call(move |conn| {
            conn.query_row(
                &format!(
                    "SELECT {COLUMNS} FROM voice_models
                     WHERE owner_id = ?1 AND (id = ?2 OR external_voice_ref = ?2)
                     ORDER BY (id = ?2) DESC
                     LIMIT 1"
                ),
                params![owner_id, reference],
                from_row,
            )
            .optional()
        })
        .await
        .map_err(map_tr_err)
}

/// Delete a voice model. Returns false if no owned row matched.
pub async fn delete_voice_model(
    db: &Database,
    owner_id: &str,
    id: &str,
) -> Result<bool, VocalError> {
    let owner_id = owner_id.to_string();
    let id = id.to_string();
    db.connection()
        .call(move |conn| {
            let affected = conn.execute(
                "DELETE FROM voice_models WHERE id = ?1 AND owner_id = ?2",
                params![id, owner_id],
            )?;
            Ok(affected > 0)
        })
        .await
        .map_err(map_tr_err)
}
