// SPDX-FileCopyrightText: 2026 Vocal Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Database connection management with PRAGMA setup, WAL mode, and lifecycle.
//!
//! All statements run on tokio-rusqlite's single background thread, which
//! serializes writes. Query modules take `&Database` and go through
//! [`Database::connection`]; nothing else should open a writer.

use std::path::Path;

use tracing::debug;
use vocal_core::VocalError;

use crate::migrations;

/// Handle to the service database.
#[derive(Clone)]
pub struct Database {
    conn: tokio_rusqlite::Connection,
}

impl Database {
    /// Opens (creating if needed) the database at `path`, applies PRAGMAs and
    /// runs pending migrations.
    pub async fn open(path: &str, wal_mode: bool) -> Result<Self, VocalError> {
        if let Some(parent) = Path::new(path).parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent).map_err(VocalError::storage)?;
        }

        // Migrations need a plain connection with `&mut` access.
        let setup_path = path.to_string();
        tokio::task::spawn_blocking(move || -> Result<(), VocalError> {
            let mut conn = rusqlite::Connection::open(&setup_path).map_err(VocalError::storage)?;
            apply_pragmas(&conn, wal_mode).map_err(VocalError::storage)?;
            migrations::run_migrations(&mut conn)
        })
        .await
        .map_err(|e| VocalError::Internal(format!("database setup task failed: {e}")))??;

        let conn = tokio_rusqlite::Connection::open(path)
            .await
            .map_err(VocalError::storage)?;
        conn.call(move |conn| apply_pragmas(conn, wal_mode))
            .await
            .map_err(map_tr_err)?;

        debug!(path, wal_mode, "database opened");
        Ok(Self { conn })
    }

    /// The shared async connection.
    pub fn connection(&self) -> &tokio_rusqlite::Connection {
        &self.conn
    }

    /// Checkpoints the WAL and closes the connection.
    pub async fn close(self) -> Result<(), VocalError> {
        checkpoint(&self.conn).await?;
        self.conn
            .close()
            .await
            .map_err(|e| VocalError::storage(format!("failed to close database: {e}")))
    }
}

fn apply_pragmas(conn: &rusqlite::Connection, wal_mode: bool) -> Result<(), rusqlite::Error> {
    if wal_mode {
        // journal_mode returns a row, so it cannot go through execute_batch.
        conn.query_row("PRAGMA journal_mode = WAL;", [], |_| Ok(()))?;
    }
    conn.execute_batch(
        "PRAGMA synchronous = NORMAL;
         PRAGMA foreign_keys = ON;
         PRAGMA busy_timeout = 5000;",
    )
}

/// Flushes the WAL into the main database file.
pub(crate) async fn checkpoint(conn: &tokio_rusqlite::Connection) -> Result<(), VocalError> {
    conn.call(|conn| -> Result<(), rusqlite::Error> {
        conn.query_row("PRAGMA wal_checkpoint(TRUNCATE);", [], |_| Ok(()))
    })
    .await
    .map_err(map_tr_err)
}

/// Convert tokio-rusqlite errors to [`VocalError::Storage`].
pub fn map_tr_err(e: tokio_rusqlite::Error<rusqlite::Error>) -> VocalError {
    VocalError::Storage {
        source: Box::new(e),
    }
}
