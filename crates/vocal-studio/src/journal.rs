// SPDX-FileCopyrightText: 2026 Vocal Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Owner-scoped journal entry CRUD.

use std::collections::BTreeSet;
use std::sync::Arc;

use tracing::debug;
use vocal_config::model::PaginationConfig;
use vocal_core::types::{JournalEntry, JournalPatch, Page};
use vocal_core::{StorageAdapter, VocalError, types};

use crate::DEFAULT_ENTRY_TITLE;
use crate::paging::resolve_page;

#[derive(Debug, Clone, Default)]
pub struct NewJournalEntry {
    pub title: Option<String>,
    pub content: String,
    pub mood: Option<String>,
    pub tags: BTreeSet<String>,
}

pub struct JournalStore {
    storage: Arc<dyn StorageAdapter>,
    pagination: PaginationConfig,
}

impl JournalStore {
    pub fn new(storage: Arc<dyn StorageAdapter>, pagination: PaginationConfig) -> Self {
        Self {
            storage,
            pagination,
        }
    }

    pub async fn create(
        &self,
        owner_id: &str,
        new: NewJournalEntry,
    ) -> Result<JournalEntry, VocalError> {
        if new.content.trim().is_empty() {
            return Err(VocalError::validation("Content is required"));
        }

        let now = types::now_timestamp();
        let entry = JournalEntry {
            id: types::new_id(),
            owner_id: owner_id.to_string(),
            title: new
                .title
                .filter(|t| !t.trim().is_empty())
                .unwrap_or_else(|| DEFAULT_ENTRY_TITLE.to_string()),
            content: new.content,
            mood: normalize_mood(new.mood),
            tags: normalize_tags(new.tags),
            created_at: now.clone(),
            updated_at: now,
        };
        self.storage.insert_journal_entry(&entry).await?;
        debug!(owner_id, entry_id = %entry.id, "journal entry created");
        Ok(entry)
    }

    pub async fn list(
        &self,
        owner_id: &str,
        page: Option<u32>,
        limit: Option<u32>,
    ) -> Result<Page<JournalEntry>, VocalError> {
        let request = resolve_page(page, limit, &self.pagination)?;
        self.storage.list_journal_entries(owner_id, request).await
    }

    pub async fn get(&self, owner_id: &str, id: &str) -> Result<JournalEntry, VocalError> {
        self.storage
            .get_journal_entry(owner_id, id)
            .await?
            .ok_or_else(|| VocalError::not_found("journal entry"))
    }

    pub async fn update(
        &self,
        owner_id: &str,
        id: &str,
        mut patch: JournalPatch,
    ) -> Result<JournalEntry, VocalError> {
        if patch.content.as_deref().is_some_and(|c| c.trim().is_empty()) {
            return Err(VocalError::validation("Content must not be empty"));
        }
        patch.mood = patch.mood.map(normalize_mood);
        patch.tags = patch.tags.map(normalize_tags);

        self.storage
            .update_journal_entry(owner_id, id, &patch, &types::now_timestamp())
            .await?
            .ok_or_else(|| VocalError::not_found("journal entry"))
    }

    pub async fn delete(&self, owner_id: &str, id: &str) -> Result<(), VocalError> {
        if self.storage.delete_journal_entry(owner_id, id).await? {
            Ok(())
        } else {
            Err(VocalError::not_found("journal entry"))
        }
    }
}

fn normalize_mood(mood: Option<String>) -> Option<String> {
    mood.filter(|m| !m.trim().is_empty())
}

fn normalize_tags(tags: BTreeSet<String>) -> BTreeSet<String> {
    tags.into_iter()
        .map(|t| t.trim().to_string())
        .filter(|t| !t.is_empty())
        .collect()
}
