// SPDX-FileCopyrightText: 2026 Vocal Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Storage adapter trait for persistence backends (SQLite, etc.).

use async_trait::async_trait;

use crate::error::VocalError;
use crate::traits::adapter::PluginAdapter;
use crate::types::{
    JournalEntry, JournalPatch, Page, PageRequest, Session, SessionPatch, VoiceCloneOutboxEntry,
    VoiceModel,
};

/// Adapter for storage and persistence backends.
///
/// Every lookup, update and delete takes the owner id and must apply it as
/// part of the query predicate, so a record owned by someone else is
/// indistinguishable from a missing one.
#[async_trait]
pub trait StorageAdapter: PluginAdapter {
    /// Initializes the storage backend (migrations, connection, etc.).
    async fn initialize(&self) -> Result<(), VocalError>;

    /// Closes the storage backend, flushing pending writes.
    async fn close(&self) -> Result<(), VocalError>;

    // --- Voice models ---

    async fn insert_voice_model(&self, model: &VoiceModel) -> Result<(), VocalError>;

    async fn list_voice_models(&self, owner_id: &str) -> Result<Vec<VoiceModel>, VocalError>;

    async fn get_voice_model(
        &self,
        owner_id: &str,
        id: &str,
    ) -> Result<Option<VoiceModel>, VocalError>;

    /// Looks a model up by local id or by external voice reference.
    async fn find_voice_model(
        &self,
        owner_id: &str,
        reference: &str,
    ) -> Result<Option<VoiceModel>, VocalError>;

    /// Returns false if no row matched.
    async fn delete_voice_model(&self, owner_id: &str, id: &str) -> Result<bool, VocalError>;

    // --- Voice clone outbox ---

    async fn stage_voice_clone(&self, entry: &VoiceCloneOutboxEntry) -> Result<(), VocalError>;

    async fn clear_voice_clone(&self, external_voice_ref: &str) -> Result<(), VocalError>;

    /// Outbox entries created before `created_before` with no committed voice model.
    async fn list_orphaned_voice_clones(
        &self,
        created_before: &str,
    ) -> Result<Vec<VoiceCloneOutboxEntry>, VocalError>;

    // --- Sessions ---

    async fn insert_session(&self, session: &Session) -> Result<(), VocalError>;

    async fn list_sessions(
        &self,
        owner_id: &str,
        page: PageRequest,
    ) -> Result<Page<Session>, VocalError>;

    async fn get_session(&self, owner_id: &str, id: &str) -> Result<Option<Session>, VocalError>;

    /// Applies `patch` to an owned session. A status change is checked
    /// against the stored status in the same write; a disallowed move fails
    /// with [`VocalError::Validation`] and leaves the row untouched.
    async fn update_session(
        &self,
        owner_id: &str,
        id: &str,
        patch: &SessionPatch,
        updated_at: &str,
    ) -> Result<Option<Session>, VocalError>;

    async fn delete_session(&self, owner_id: &str, id: &str) -> Result<bool, VocalError>;

    // --- Journal entries ---

    async fn insert_journal_entry(&self, entry: &JournalEntry) -> Result<(), VocalError>;

    async fn list_journal_entries(
        &self,
        owner_id: &str,
        page: PageRequest,
    ) -> Result<Page<JournalEntry>, VocalError>;

    async fn get_journal_entry(
        &self,
        owner_id: &str,
        id: &str,
    ) -> Result<Option<JournalEntry>, VocalError>;

    async fn update_journal_entry(
        &self,
        owner_id: &str,
        id: &str,
        patch: &JournalPatch,
        updated_at: &str,
    ) -> Result<Option<JournalEntry>, VocalError>;

    async fn delete_journal_entry(&self, owner_id: &str, id: &str) -> Result<bool, VocalError>;
}
