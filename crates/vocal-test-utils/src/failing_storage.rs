// SPDX-FileCopyrightText: 2026 Vocal Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Storage wrapper with switchable write failures.
//!
//! Delegates every call to an inner backend. While a switch is on, the
//! matching inserts and updates fail with a storage error instead.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;

use vocal_core::traits::adapter::PluginAdapter;
use vocal_core::traits::storage::StorageAdapter;
use vocal_core::types::{
    AdapterType, HealthStatus, JournalEntry, JournalPatch, Page, PageRequest, Session,
    SessionPatch, VoiceCloneOutboxEntry, VoiceModel,
};
use vocal_core::VocalError;

pub struct FailingStorage {
    inner: Arc<dyn StorageAdapter>,
    fail_sessions: AtomicBool,
    fail_voice_models: AtomicBool,
    fail_outbox: AtomicBool,
}

impl FailingStorage {
    pub fn new(inner: Arc<dyn StorageAdapter>) -> Self {
        Self {
            inner,
            fail_sessions: AtomicBool::new(false),
            fail_voice_models: AtomicBool::new(false),
            fail_outbox: AtomicBool::new(false),
        }
    }

    /// Fail `insert_session` and `update_session` while on.
    pub fn fail_session_writes(&self, fail: bool) {
        self.fail_sessions.store(fail, Ordering::SeqCst);
    }

    /// Fail `insert_voice_model` while on.
    pub fn fail_voice_model_writes(&self, fail: bool) {
        self.fail_voice_models.store(fail, Ordering::SeqCst);
    }

    /// Fail `stage_voice_clone` while on.
    pub fn fail_outbox_writes(&self, fail: bool) {
        self.fail_outbox.store(fail, Ordering::SeqCst);
    }

    fn check(flag: &AtomicBool, what: &str) -> Result<(), VocalError> {
        if flag.load(Ordering::SeqCst) {
            return Err(VocalError::storage(format!("injected {what} write failure")));
        }
        Ok(())
    }
}

#[async_trait]
impl PluginAdapter for FailingStorage {
    fn name(&self) -> &str {
        "failing-storage"
    }

    fn version(&self) -> semver::Version {
        self.inner.version()
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::Storage
    }

    async fn health_check(&self) -> Result<HealthStatus, VocalError> {
        self.inner.health_check().await
    }

    async fn shutdown(&self) -> Result<(), VocalError> {
        self.inner.shutdown().await
    }
}

#[async_trait]
impl StorageAdapter for FailingStorage {
    async fn initialize(&self) -> Result<(), VocalError> {
        self.inner.initialize().await
    }

    async fn close(&self) -> Result<(), VocalError> {
        self.inner.close().await
    }

    async fn insert_voice_model(&self, model: &VoiceModel) -> Result<(), VocalError> {
        Self::check(&self.fail_voice_models, "voice model")?;
        self.inner.insert_voice_model(model).await
    }

    async fn list_voice_models(&self, owner_id: &str) -> Result<Vec<VoiceModel>, VocalError> {
        self.inner.list_voice_models(owner_id).await
    }

    async fn get_voice_model(
        &self,
        owner_id: &str,
        id: &str,
    ) -> Result<Option<VoiceModel>, VocalError> {
        self.inner.get_voice_model(owner_id, id).await
    }

    async fn find_voice_model(
        &self,
        owner_id: &str,
        reference: &str,
    ) -> Result<Option<VoiceModel>, VocalError> {
        self.inner.find_voice_model(owner_id, reference).await
    }

    async fn delete_voice_model(&self, owner_id: &str, id: &str) -> Result<bool, VocalError> {
        self.inner.delete_voice_model(owner_id, id).await
    }

    async fn stage_voice_clone(&self, entry: &VoiceCloneOutboxEntry) -> Result<(), VocalError> {
        Self::check(&self.fail_outbox, "outbox")?;
        self.inner.stage_voice_clone(entry).await
    }

    async fn clear_voice_clone(&self, external_voice_ref: &str) -> Result<(), VocalError> {
        self.inner.clear_voice_clone(external_voice_ref).await
    }

    async fn list_orphaned_voice_clones(
        &self,
        created_before: &str,
    ) -> Result<Vec<VoiceCloneOutboxEntry>, VocalError> {
        self.inner.list_orphaned_voice_clones(created_before).await
    }

    async fn insert_session(&self, session: &Session) -> Result<(), VocalError> {
        Self::check(&self.fail_sessions, "session")?;
        self.inner.insert_session(session).await
    }

    async fn list_sessions(
        &self,
        owner_id: &str,
        page: PageRequest,
    ) -> Result<Page<Session>, VocalError> {
        self.inner.list_sessions(owner_id, page).await
    }

    async fn get_session(&self, owner_id: &str, id: &str) -> Result<Option<Session>, VocalError> {
        self.inner.get_session(owner_id, id).await
    }

    async fn update_session(
        &self,
        owner_id: &str,
        id: &str,
        patch: &SessionPatch,
        updated_at: &str,
    ) -> Result<Option<Session>, VocalError> {
        Self::check(&self.fail_sessions, "session")?;
        self.inner.update_session(owner_id, id, patch, updated_at).await
    }

    async fn delete_session(&self, owner_id: &str, id: &str) -> Result<bool, VocalError> {
        self.inner.delete_session(owner_id, id).await
    }

    async fn insert_journal_entry(&self, entry: &JournalEntry) -> Result<(), VocalError> {
        self.inner.insert_journal_entry(entry).await
    }

    async fn list_journal_entries(
        &self,
        owner_id: &str,
        page: PageRequest,
    ) -> Result<Page<JournalEntry>, VocalError> {
        self.inner.list_journal_entries(owner_id, page).await
    }

    async fn get_journal_entry(
        &self,
        owner_id: &str,
        id: &str,
    ) -> Result<Option<JournalEntry>, VocalError> {
        self.inner.get_journal_entry(owner_id, id).await
    }

    async fn update_journal_entry(
        &self,
        owner_id: &str,
        id: &str,
        patch: &JournalPatch,
        updated_at: &str,
    ) -> Result<Option<JournalEntry>, VocalError> {
        self.inner
            .update_journal_entry(owner_id, id, patch, updated_at)
            .await
    }

    async fn delete_journal_entry(&self, owner_id: &str, id: &str) -> Result<bool, VocalError> {
        self.inner.delete_journal_entry(owner_id, id).await
    }
}
