// SPDX-FileCopyrightText: 2026 Vocal Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Journal entry CRUD operations.
//!
//! Tags are stored as a JSON array in a single TEXT column.

use std::collections::BTreeSet;

use rusqlite::types::Type;
use rusqlite::{Connection, OptionalExtension, Row, params};
use vocal_core::VocalError;
use vocal_core::types::{JournalEntry, JournalPatch, Page, PageRequest};

use crate::database::{Database, map_tr_err};
use crate::queries::to_sql_int;

const COLUMNS: &str = "id, owner_id, title, content, mood, tags, created_at, updated_at";

fn from_row(row: &Row<'_>) -> rusqlite::Result<JournalEntry> {
    let tags: String = row.get(5)?;
    let tags: BTreeSet<String> = serde_json::from_str(&tags)
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(5, Type::Text, Box::new(e)))?;
    Ok(JournalEntry {
        id: row.get(0)?,
        owner_id: row.get(1)?,
        title: row.get(2)?,
        content: row.get(3)?,
        mood: row.get(4)?,
        tags,
        created_at: row.get(6)?,
        updated_at: row.get(7)?,
    })
}

fn select_one(
    conn: &Connection,
    owner_id: &str,
    id: &str,
) -> rusqlite::Result<Option<JournalEntry>> {
    conn.query_row(
        &format!("SELECT {COLUMNS} FROM journal_entries WHERE id = ?1 AND owner_id = ?2"),
        params![id, owner_id],
        from_row,
    )
    .optional()
}

fn encode_tags(tags: &BTreeSet<String>) -> Result<String, VocalError> {
    serde_json::to_string(tags).map_err(VocalError::storage)
}

/// Insert a new journal entry.
pub async fn insert_journal_entry(db: &Database, entry: &JournalEntry) -> Result<(), VocalError> {
    let entry = entry.clone();
    let tags = encode_tags(&entry.tags)?;
    db.connection()
        .call(move |conn| {
            conn.execute(
                &format!("INSERT INTO journal_entries ({COLUMNS}) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)"),
                params![
                    entry.id,
                    entry.owner_id,
                    entry.title,
                    entry.content,
                    entry.mood,
                    tags,
                    entry.created_at,
                    entry.updated_at,
                ],
            )?;
            Ok(())
        })
        .await
        .map_err(map_tr_err)
}

/// One page of an owner's journal entries, newest first, plus the owner's total count.
pub async fn list_journal_entries(
    db: &Database,
    owner_id: &str,
    page: PageRequest,
) -> Result<Page<JournalEntry>, VocalError> {
    let owner_id = owner_id.to_string();
    db.connection()
        .call(move |conn| {
            let total: i64 = conn.query_row(
                "SELECT COUNT(*) FROM journal_entries WHERE owner_id = ?1",
                params![owner_id],
                |row| row.get(0),
            )?;
            let mut stmt = conn.prepare(&format!(
                "SELECT {COLUMNS} FROM journal_entries WHERE owner_id = ?1
                 ORDER BY created_at DESC, rowid DESC
                 LIMIT ?2 OFFSET ?3"
            ))?;
            let items = stmt
                .query_map(
                    params![owner_id, page.limit, to_sql_int(page.offset())],
                    from_row,
                )?
                .collect::<rusqlite::Result<Vec<_>>>()?;
            Ok(Page {
                items,
                total: u64::try_from(total).unwrap_or_default(),
                page: page.page,
                limit: page.limit,
            })
        })
        .await
        .map_err(map_tr_err)
}

/// Get a journal entry by id.
pub async fn get_journal_entry(
    db: &Database,
    owner_id: &str,
    id: &str,
) -> Result<Option<JournalEntry>, VocalError> {
    let owner_id = owner_id.to_string();
    let id = id.to_string();
    db.connection()
        .call(move |conn| select_one(conn, &owner_id, &id))
        .await
        .map_err(map_tr_err)
}

/// Apply the fields present in `patch` and stamp `updated_at`.
pub async fn update_journal_entry(
    db: &Database,
    owner_id: &str,
    id: &str,
    patch: &JournalPatch,
    updated_at: &str,
) -> Result<Option<JournalEntry>, VocalError> {
    let owner_id = owner_id.to_string();
    let id = id.to_string();
    let tags = patch.tags.as_ref().map(encode_tags).transpose()?;
    let JournalPatch {
        title,
        content,
        mood,
        ..
    } = patch.clone();
    let mood_present = mood.is_some();
    let mood = mood.flatten();
    let updated_at = updated_at.to_string();
    db.connection()
        .call(move |conn| {
            let affected = conn.execute(
                "UPDATE journal_entries SET
                    title = COALESCE(?3, title),
                    content = COALESCE(?4, content),
                    mood = CASE WHEN ?5 THEN ?6 ELSE mood END,
                    tags = COALESCE(?7, tags),
                    updated_at = ?8
                 WHERE id = ?1 AND owner_id = ?2",
                params![id, owner_id, title, content, mood_present, mood, tags, updated_at],
            )?;
            if affected == 0 {
                return Ok(None);
            }
            select_one(conn, &owner_id, &id)
        })
        .await
        .map_err(map_tr_err)
}

/// Delete a journal entry. Returns false if no owned row matched.
pub async fn delete_journal_entry(
    db: &Database,
    owner_id: &str,
    id: &str,
) -> Result<bool, VocalError> {
    let owner_id = owner_id.to_string();
    let id = id.to_string();
    db.connection()
        .call(move |conn| {
            let affected = conn.execute(
                "DELETE FROM journal_entries WHERE id = ?1 AND owner_id = ?2",
                params![id, owner_id],
            )?;
            Ok(affected > 0)
        })
        .await
        .map_err(map_tr_err)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::queries::test_support::{setup_db, ts};

    fn make_entry(id: &str, owner: &str, n: u32) -> JournalEntry {
        JournalEntry {
            id: id.to_string(),
            owner_id: owner.to_string(),
            title: "Untitled Entry".to_string(),
            content: format!("entry {n}"),
            mood: None,
            tags: BTreeSet::new(),
            created_at: ts(n),
            updated_at: ts(n),
        }
    }

    #[tokio::test]
    async fn tags_roundtrip_through_json_column() {
        let (db, _dir) = setup_db().await;
        let mut entry = make_entry("j-1", "alice", 1);
        entry.mood = Some("calm".into());
        entry.tags = ["gratitude", "morning"].into_iter().map(String::from).collect();
        insert_journal_entry(&db, &entry).await.unwrap();

        let fetched = get_journal_entry(&db, "alice", "j-1").await.unwrap();
        assert_eq!(fetched, Some(entry));
        db.close().await.unwrap();
    }

    #[tokio::test]
    async fn fifteen_entries_split_ten_and_five() {
        let (db, _dir) = setup_db().await;
        for n in 0..15 {
            insert_journal_entry(&db, &make_entry(&format!("j-{n:02}"), "alice", n))
                .await
                .unwrap();
        }

        let second = list_journal_entries(&db, "alice", PageRequest { page: 2, limit: 10 })
            .await
            .unwrap();
        assert_eq!(second.total, 15);
        assert_eq!(second.items.len(), 5);
        assert_eq!(second.items[0].id, "j-04");

        let beyond = list_journal_entries(&db, "alice", PageRequest { page: 3, limit: 10 })
            .await
            .unwrap();
        assert!(beyond.items.is_empty());
        assert_eq!(beyond.total, 15);
        db.close().await.unwrap();
    }

    #[tokio::test]
    async fn update_replaces_tags_and_keeps_content() {
        let (db, _dir) = setup_db().await;
        insert_journal_entry(&db, &make_entry("j-1", "alice", 1)).await.unwrap();

        let patch = JournalPatch {
            tags: Some(["sleep".to_string()].into_iter().collect()),
            ..Default::default()
        };
        let updated = update_journal_entry(&db, "alice", "j-1", &patch, &ts(5))
            .await
            .unwrap()
            .unwrap();
        assert!(updated.tags.contains("sleep"));
        assert_eq!(updated.content, "entry 1");
        assert_eq!(updated.updated_at, ts(5));
        db.close().await.unwrap();
    }

    #[tokio::test]
    async fn null_mood_clears_and_absent_mood_keeps() {
        let (db, _dir) = setup_db().await;
        let mut entry = make_entry("j-1", "alice", 1);
        entry.mood = Some("calm".into());
        insert_journal_entry(&db, &entry).await.unwrap();

        let kept = update_journal_entry(&db, "alice", "j-1", &JournalPatch::default(), &ts(2))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(kept.mood.as_deref(), Some("calm"));

        let patch = JournalPatch {
            mood: Some(None),
            ..Default::default()
        };
        let cleared = update_journal_entry(&db, "alice", "j-1", &patch, &ts(3))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(cleared.mood, None);
        db.close().await.unwrap();
    }

    #[tokio::test]
    async fn foreign_entries_are_invisible() {
        let (db, _dir) = setup_db().await;
        insert_journal_entry(&db, &make_entry("j-1", "alice", 1)).await.unwrap();

        assert!(get_journal_entry(&db, "bob", "j-1").await.unwrap().is_none());
        assert!(
            update_journal_entry(&db, "bob", "j-1", &JournalPatch::default(), &ts(2))
                .await
                .unwrap()
                .is_none()
        );
        assert!(!delete_journal_entry(&db, "bob", "j-1").await.unwrap());
        assert!(delete_journal_entry(&db, "alice", "j-1").await.unwrap());
        db.close().await.unwrap();
    }
}
