// SPDX-FileCopyrightText: 2026 Vocal Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Session CRUD operations.

use rusqlite::types::Type;
use rusqlite::{Connection, OptionalExtension, Row, params};
use vocal_core::VocalError;
use vocal_core::types::{Page, PageRequest, Session, SessionPatch, SessionStatus};

use crate::database::{Database, map_tr_err};
use crate::queries::to_sql_int;

const COLUMNS: &str = "id, owner_id, voice_model_id, title, script, session_type, audio_ref, \
                       duration_seconds, status, created_at, updated_at";

fn from_row(row: &Row<'_>) -> rusqlite::Result<Session> {
    let status: String = row.get(8)?;
    let status = status
        .parse::<SessionStatus>()
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(8, Type::Text, Box::new(e)))?;
    Ok(Session {
        id: row.get(0)?,
        owner_id: row.get(1)?,
        voice_model_id: row.get(2)?,
        title: row.get(3)?,
        script: row.get(4)?,
        session_type: row.get(5)?,
        audio_ref: row.get(6)?,
        duration_seconds: row.get(7)?,
        status,
        created_at: row.get(9)?,
        updated_at: row.get(10)?,
    })
}

fn select_one(conn: &Connection, owner_id: &str, id: &str) -> rusqlite::Result<Option<Session>> {
    conn.query_row(
        &format!("SELECT {COLUMNS} FROM sessions WHERE id = ?1 AND owner_id = ?2"),
        params![id, owner_id],
        from_row,
    )
    .optional()
}

/// Insert a new session.
pub async fn insert_session(db: &Database, session: &Session) -> Result<(), VocalError> {
    let session = session.clone();
    db.connection()
        .call(move |conn| {
            conn.execute(
                &format!(
                    "INSERT INTO sessions ({COLUMNS})
                     VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)"
                ),
                params![
                    session.id,
                    session.owner_id,
                    session.voice_model_id,
                    session.title,
                    session.script,
                    session.session_type,
                    session.audio_ref,
                    session.duration_seconds,
                    session.status.to_string(),
                    session.created_at,
                    session.updated_at,
                ],
            )?;
            Ok(())
        })
        .await
        .map_err(map_tr_err)
}

/// One page of an owner's sessions, newest first, plus the owner's total count.
pub async fn list_sessions(
    db: &Database,
    owner_id: &str,
    page: PageRequest,
) -> Result<Page<Session>, VocalError> {
    let owner_id = owner_id.to_string();
    db.connection()
        .call(move |conn| {
            let total: i64 = conn.query_row(
                "SELECT COUNT(*) FROM sessions WHERE owner_id = ?1",
                params![owner_id],
                |row| row.get(0),
            )?;
            let mut stmt = conn.prepare(&format!(
                "SELECT {COLUMNS} FROM sessions WHERE owner_id = ?1
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

/// Get a session by id.
pub async fn get_session(
    db: &Database,
    owner_id: &str,
    id: &str,
) -> Result<Option<Session>, VocalError> {
    let owner_id = owner_id.to_string();
    let id = id.to_string();
    db.connection()
        .call(move |conn| select_one(conn, &owner_id, &id))
        .await
        .map_err(map_tr_err)
}

/// Apply the fields present in `patch` and stamp `updated_at`.
///
/// Returns the updated row, or `None` if no owned row matched.
pub async fn update_session(
    db: &Database,
    owner_id: &str,
    id: &str,
    patch: &SessionPatch,
    updated_at: &str,
) -> Result<Option<Session>, VocalError> {
    let owner_id = owner_id.to_string();
    let id = id.to_string();
    let patch = patch.clone();
    let updated_at = updated_at.to_string();
    let next = patch.status;
    // Status literals come from the enum.
    let status_guard = next
        .map(|next| {
            let allowed: Vec<String> = SessionStatus::allowed_predecessors(next)
                .into_iter()
                .map(|s| format!("'{s}'"))
                .collect();
            format!(" AND status IN ({})", allowed.join(", "))
        })
        .unwrap_or_default();

    let outcome = db
        .connection()
        .call(move |conn| {
            let affected = conn.execute(
                &format!(
                    "UPDATE sessions SET
                        title = COALESCE(?3, title),
                        script = COALESCE(?4, script),
                        status = COALESCE(?5, status),
                        updated_at = ?6
                     WHERE id = ?1 AND owner_id = ?2{status_guard}"
                ),
                params![
                    id,
                    owner_id,
                    patch.title,
                    patch.script,
                    patch.status.map(|s| s.to_string()),
                    updated_at,
                ],
            )?;
            let current = select_one(conn, &owner_id, &id)?;
            Ok(match current {
                Some(session) if affected > 0 => UpdateOutcome::Updated(session),
                Some(session) => UpdateOutcome::Rejected(session.status),
                None => UpdateOutcome::Missing,
            })
        })
        .await
        .map_err(map_tr_err)?;

    match (outcome, next) {
        (UpdateOutcome::Updated(session), _) => Ok(Some(session)),
        (UpdateOutcome::Missing, _) => Ok(None),
        (UpdateOutcome::Rejected(current), Some(next)) => Err(VocalError::validation(format!(
            "cannot change session status from {current} to {next}"
        ))),
        (UpdateOutcome::Rejected(_), None) => Ok(None),
    }
}

enum UpdateOutcome {
    Updated(Session),
    Rejected(SessionStatus),
    Missing,
}

/// Delete a session. Returns false if no owned row matched.
pub async fn delete_session(db: &Database, owner_id: &str, id: &str) -> Result<bool, VocalError> {
    let owner_id = owner_id.to_string();
    let id = id.to_string();
    db.connection()
        .call(move |conn| {
            let affected = conn.execute(
                "DELETE FROM sessions WHERE id = ?1 AND owner_id = ?2",
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

    fn make_session(id: &str, owner: &str, n: u32) -> Session {
        Session {
            id: id.to_string(),
            owner_id: owner.to_string(),
            voice_model_id: "vm-1".to_string(),
            title: "Untitled Session".to_string(),
            script: "Breathe in, breathe out.".to_string(),
            session_type: "custom".to_string(),
            audio_ref: None,
            duration_seconds: None,
            status: SessionStatus::Pending,
            created_at: ts(n),
            updated_at: ts(n),
        }
    }

    #[tokio::test]
    async fn insert_and_get_roundtrips() {
        let (db, _dir) = setup_db().await;
        let mut session = make_session("s-1", "alice", 1);
        session.duration_seconds = Some(2);
        session.status = SessionStatus::Completed;
        insert_session(&db, &session).await.unwrap();

        let fetched = get_session(&db, "alice", "s-1").await.unwrap();
        assert_eq!(fetched, Some(session));
        db.close().await.unwrap();
    }

    #[tokio::test]
    async fn pages_are_disjoint_and_ordered() {
        let (db, _dir) = setup_db().await;
        for n in 0..15 {
            insert_session(&db, &make_session(&format!("s-{n:02}"), "alice", n))
                .await
                .unwrap();
        }
        insert_session(&db, &make_session("other", "bob", 40)).await.unwrap();

        let first = list_sessions(&db, "alice", PageRequest { page: 1, limit: 10 })
            .await
            .unwrap();
        let second = list_sessions(&db, "alice", PageRequest { page: 2, limit: 10 })
            .await
            .unwrap();
        let all = list_sessions(&db, "alice", PageRequest { page: 1, limit: 15 })
            .await
            .unwrap();

        assert_eq!(first.total, 15);
        assert_eq!(first.items.len(), 10);
        assert_eq!(second.items.len(), 5);
        assert_eq!(first.items[0].id, "s-14");

        let joined: Vec<_> = first.items.iter().chain(&second.items).map(|s| &s.id).collect();
        let expected: Vec<_> = all.items.iter().map(|s| &s.id).collect();
        assert_eq!(joined, expected);
        db.close().await.unwrap();
    }

    #[tokio::test]
    async fn equal_timestamps_fall_back_to_insertion_order() {
        let (db, _dir) = setup_db().await;
        insert_session(&db, &make_session("first", "alice", 5)).await.unwrap();
        insert_session(&db, &make_session("second", "alice", 5)).await.unwrap();

        let page = list_sessions(&db, "alice", PageRequest { page: 1, limit: 10 })
            .await
            .unwrap();
        assert_eq!(page.items[0].id, "second");
        assert_eq!(page.items[1].id, "first");
        db.close().await.unwrap();
    }

    #[tokio::test]
    async fn partial_update_touches_only_present_fields() {
        let (db, _dir) = setup_db().await;
        let session = make_session("s-1", "alice", 1);
        insert_session(&db, &session).await.unwrap();

        let patch = SessionPatch {
            status: Some(SessionStatus::Processing),
            ..Default::default()
        };
        let updated = update_session(&db, "alice", "s-1", &patch, &ts(9))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(updated.status, SessionStatus::Processing);
        assert_eq!(updated.title, session.title);
        assert_eq!(updated.script, session.script);
        assert_eq!(updated.updated_at, ts(9));
        assert_eq!(updated.created_at, session.created_at);
        db.close().await.unwrap();
    }

    #[tokio::test]
    async fn empty_patch_only_advances_updated_at() {
        let (db, _dir) = setup_db().await;
        let session = make_session("s-1", "alice", 1);
        insert_session(&db, &session).await.unwrap();

        let updated = update_session(&db, "alice", "s-1", &SessionPatch::default(), &ts(9))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(
            Session {
                updated_at: session.updated_at.clone(),
                ..updated.clone()
            },
            session
        );
        assert_eq!(updated.updated_at, ts(9));
        db.close().await.unwrap();
    }

    #[tokio::test]
    async fn stale_status_write_is_rejected_atomically() {
        let (db, _dir) = setup_db().await;
        insert_session(&db, &make_session("s-1", "alice", 1)).await.unwrap();

        let to = |status| SessionPatch {
            status: Some(status),
            title: Some("late".into()),
            ..Default::default()
        };
        // Both writers observed `pending`; only the first one lands.
        update_session(&db, "alice", "s-1", &to(SessionStatus::Completed), &ts(2))
            .await
            .unwrap()
            .unwrap();
        let err = update_session(&db, "alice", "s-1", &to(SessionStatus::Processing), &ts(3))
            .await
            .unwrap_err();
        assert!(matches!(err, VocalError::Validation(_)));

        let stored = get_session(&db, "alice", "s-1").await.unwrap().unwrap();
        assert_eq!(stored.status, SessionStatus::Completed);
        assert_eq!(stored.updated_at, ts(2));
        db.close().await.unwrap();
    }

    #[tokio::test]
    async fn foreign_rows_are_invisible() {
        let (db, _dir) = setup_db().await;
        insert_session(&db, &make_session("s-1", "alice", 1)).await.unwrap();

        assert!(get_session(&db, "bob", "s-1").await.unwrap().is_none());
        let patch = SessionPatch {
            title: Some("hijacked".into()),
            ..Default::default()
        };
        assert!(update_session(&db, "bob", "s-1", &patch, &ts(2)).await.unwrap().is_none());
        assert!(!delete_session(&db, "bob", "s-1").await.unwrap());

        let still = get_session(&db, "alice", "s-1").await.unwrap().unwrap();
        assert_eq!(still.title, "Untitled Session");
        assert!(delete_session(&db, "alice", "s-1").await.unwrap());
        db.close().await.unwrap();
    }
}
