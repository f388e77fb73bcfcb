// SPDX-FileCopyrightText: 2026 Vocal Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! SQLite implementation of the StorageAdapter trait.

use async_trait::async_trait;
use tokio::sync::OnceCell;
use tracing::debug;

use vocal_config::model::StorageConfig;
use vocal_core::types::{
    JournalEntry, JournalPatch, Page, PageRequest, Session, SessionPatch, VoiceCloneOutboxEntry,
    VoiceModel,
};
use vocal_core::{AdapterType, HealthStatus, PluginAdapter, StorageAdapter, VocalError};

use crate::database::{self, Database};
use crate::queries::{journal, outbox, sessions, voice_models};

/// SQLite-backed storage adapter.
///
/// The database is opened on the first call to [`StorageAdapter::initialize`];
/// every other method fails with a storage error until then.
pub struct SqliteStorage {
    config: StorageConfig,
    db: OnceCell<Database>,
}

impl SqliteStorage {
    pub fn new(config: StorageConfig) -> Self {
        Self {
            config,
            db: OnceCell::new(),
        }
    }

    fn db(&self) -> Result<&Database, VocalError> {
        self.db
            .get()
            .ok_or_else(|| VocalError::storage("storage not initialized; call initialize() first"))
    }
}

#[async_trait]
impl PluginAdapter for SqliteStorage {
    fn name(&self) -> &str {
        "sqlite"
    }

    fn version(&self) -> semver::Version {
        semver::Version::new(0, 1, 0)
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::Storage
    }

    async fn health_check(&self) -> Result<HealthStatus, VocalError> {
        self.db()?
            .connection()
            .call(|conn| -> Result<(), rusqlite::Error> {
                conn.query_row("SELECT 1", [], |_| Ok(()))
            })
            .await
            .map_err(database::map_tr_err)?;
        Ok(HealthStatus::Healthy)
    }

    async fn shutdown(&self) -> Result<(), VocalError> {
        if let Some(db) = self.db.get() {
            database::checkpoint(db.connection()).await?;
            debug!("shutdown: WAL checkpoint complete");
        }
        Ok(())
    }
}

#[async_trait]
impl StorageAdapter for SqliteStorage {
    async fn initialize(&self) -> Result<(), VocalError> {
        let db = Database::open(&self.config.database_path, self.config.wal_mode).await?;
        self.db
            .set(db)
            .map_err(|_| VocalError::storage("storage already initialized"))?;
        debug!(path = %self.config.database_path, "SQLite storage initialized");
        Ok(())
    }

    async fn close(&self) -> Result<(), VocalError> {
        database::checkpoint(self.db()?.connection()).await?;
        debug!("WAL checkpoint complete");
        Ok(())
    }

    // --- Voice models ---

    async fn insert_voice_model(&self, model: &VoiceModel) -> Result<(), VocalError> {
        voice_models::insert_voice_model(self.db()?, model).await
    }

    async fn list_voice_models(&self, owner_id: &str) -> Result<Vec<VoiceModel>, VocalError> {
        voice_models::list_voice_models(self.db()?, owner_id).await
    }

    async fn get_voice_model(
        &self,
        owner_id: &str,
        id: &str,
    ) -> Result<Option<VoiceModel>, VocalError> {
        voice_models::get_voice_model(self.db()?, owner_id, id).await
    }

    async fn find_voice_model(
        &self,
        owner_id: &str,
        reference: &str,
    ) -> Result<Option<VoiceModel>, VocalError> {
        voice_models::find_voice_model(self.db()?, owner_id, reference).await
    }

    async fn delete_voice_model(&self, owner_id: &str, id: &str) -> Result<bool, VocalError> {
        voice_models::delete_voice_model(self.db()?, owner_id, id).await
    }

    // --- Voice clone outbox ---

    async fn stage_voice_clone(&self, entry: &VoiceCloneOutboxEntry) -> Result<(), VocalError> {
        outbox::stage(self.db()?, entry).await
    }

    async fn clear_voice_clone(&self, external_voice_ref: &str) -> Result<(), VocalError> {
        outbox::clear(self.db()?, external_voice_ref).await
    }

    async fn list_orphaned_voice_clones(
        &self,
        created_before: &str,
    ) -> Result<Vec<VoiceCloneOutboxEntry>, VocalError> {
        outbox::list_orphans(self.db()?, created_before).await
    }

    // --- Sessions ---

    async fn insert_session(&self, session: &Session) -> Result<(), VocalError> {
        sessions::insert_session(self.db()?, session).await
    }

    async fn list_sessions(
        &self,
        owner_id: &str,
        page: PageRequest,
    ) -> Result<Page<Session>, VocalError> {
        sessions::list_sessions(self.db()?, owner_id, page).await
    }

    async fn get_session(&self, owner_id: &str, id: &str) -> Result<Option<Session>, VocalError> {
        sessions::get_session(self.db()?, owner_id, id).await
    }

    async fn update_session(
        &self,
        owner_id: &str,
        id: &str,
        patch: &SessionPatch,
        updated_at: &str,
    ) -> Result<Option<Session>, VocalError> {
        sessions::update_session(self.db()?, owner_id, id, patch, updated_at).await
    }

    async fn delete_session(&self, owner_id: &str, id: &str) -> Result<bool, VocalError> {
        sessions::delete_session(self.db()?, owner_id, id).await
    }

    // --- Journal entries ---

    async fn insert_journal_entry(&self, entry: &JournalEntry) -> Result<(), VocalError> {
        journal::insert_journal_entry(self.db()?, entry).await
    }

    async fn list_journal_entries(
        &self,
        owner_id: &str,
        page: PageRequest,
    ) -> Result<Page<JournalEntry>, VocalError> {
        journal::list_journal_entries(self.db()?, owner_id, page).await
    }

    async fn get_journal_entry(
        &self,
        owner_id: &str,
        id: &str,
    ) -> Result<Option<JournalEntry>, VocalError> {
        journal::get_journal_entry(self.db()?, owner_id, id).await
    }

    async fn update_journal_entry(
        &self,
        owner_id: &str,
        id: &str,
        patch: &JournalPatch,
        updated_at: &str,
    ) -> Result<Option<JournalEntry>, VocalError> {
        journal::update_journal_entry(self.db()?, owner_id, id, patch, updated_at).await
    }

    async fn delete_journal_entry(&self, owner_id: &str, id: &str) -> Result<bool, VocalError> {
        journal::delete_journal_entry(self.db()?, owner_id, id).await
    }
}
