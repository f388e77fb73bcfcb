// SPDX-FileCopyrightText: 2026 Vocal Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Owner-scoped session CRUD.

use std::sync::Arc;

use tracing::debug;
use vocal_config::model::PaginationConfig;
use vocal_core::types::{Page, Session, SessionPatch, SessionStatus};
use vocal_core::{StorageAdapter, VocalError, types};

use crate::paging::resolve_page;
use crate::registry::VoiceRegistry;
use crate::{DEFAULT_SESSION_TITLE, DEFAULT_SESSION_TYPE};

#[derive(Debug, Clone)]
pub struct NewSession {
    pub title: Option<String>,
    pub script: String,
    pub voice_model_id: String,
    pub session_type: Option<String>,
}

pub struct SessionStore {
    storage: Arc<dyn StorageAdapter>,
    registry: Arc<VoiceRegistry>,
    pagination: PaginationConfig,
}

impl SessionStore {
    pub fn new(
        storage: Arc<dyn StorageAdapter>,
        registry: Arc<VoiceRegistry>,
        pagination: PaginationConfig,
    ) -> Self {
        Self {
            storage,
            registry,
            pagination,
        }
    }

    /// Records a pending session. No audio is rendered.
    pub async fn create(&self, owner_id: &str, new: NewSession) -> Result<Session, VocalError> {
        if new.script.trim().is_empty() || new.voice_model_id.trim().is_empty() {
            return Err(VocalError::validation("Script and voice model ID are required"));
        }
        let model = self.registry.resolve(owner_id, new.voice_model_id.trim()).await?;

        let now = types::now_timestamp();
        let session = Session {
            id: types::new_id(),
            owner_id: owner_id.to_string(),
            voice_model_id: model.id,
            title: new
                .title
                .filter(|t| !t.trim().is_empty())
                .unwrap_or_else(|| DEFAULT_SESSION_TITLE.to_string()),
            script: new.script,
            session_type: new
                .session_type
                .filter(|t| !t.trim().is_empty())
                .unwrap_or_else(|| DEFAULT_SESSION_TYPE.to_string()),
            audio_ref: None,
            duration_seconds: None,
            status: SessionStatus::Pending,
            created_at: now.clone(),
            updated_at: now,
        };
        self.storage.insert_session(&session).await?;
        debug!(owner_id, session_id = %session.id, "session created");
        Ok(session)
    }

    pub async fn list(
        &self,
        owner_id: &str,
        page: Option<u32>,
        limit: Option<u32>,
    ) -> Result<Page<Session>, VocalError> {
        let request = resolve_page(page, limit, &self.pagination)?;
        self.storage.list_sessions(owner_id, request).await
    }

    pub async fn get(&self, owner_id: &str, id: &str) -> Result<Session, VocalError> {
        self.storage
            .get_session(owner_id, id)
            .await?
            .ok_or_else(|| VocalError::not_found("session"))
    }

    /// Applies the present fields of `patch`. Status may only move forward.
    pub async fn update(
        &self,
        owner_id: &str,
        id: &str,
        patch: SessionPatch,
    ) -> Result<Session, VocalError> {
        if patch.script.as_deref().is_some_and(|s| s.trim().is_empty()) {
            return Err(VocalError::validation("script must not be empty"));
        }
        self.storage
            .update_session(owner_id, id, &patch, &types::now_timestamp())
            .await?
            .ok_or_else(|| VocalError::not_found("session"))
    }

    pub async fn delete(&self, owner_id: &str, id: &str) -> Result<(), VocalError> {
        if self.storage.delete_session(owner_id, id).await? {
            Ok(())
        } else {
            Err(VocalError::not_found("session"))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{storage, upload};
    use vocal_test_utils::MockVendor;

    async fn store_with_model() -> (SessionStore, String, tempfile::TempDir) {
        let (storage, dir) = storage().await;
        let registry = Arc::new(VoiceRegistry::new(storage.clone(), Arc::new(MockVendor::new())));
        let model = registry.create("alice", upload()).await.unwrap();
        (
            SessionStore::new(storage, registry, PaginationConfig::default()),
            model.id,
            dir,
        )
    }

    fn new_session(voice_model_id: &str) -> NewSession {
        NewSession {
            title: Some("Evening wind-down".into()),
            script: "Let the day go.".into(),
            voice_model_id: voice_model_id.into(),
            session_type: None,
        }
    }

    #[tokio::test]
    async fn create_records_pending_session() {
        let (store, model_id, _dir) = store_with_model().await;
        let session = store.create("alice", new_session(&model_id)).await.unwrap();
        assert_eq!(session.status, SessionStatus::Pending);
        assert_eq!(session.session_type, "custom");
        assert_eq!(session.duration_seconds, None);
        assert_eq!(store.get("alice", &session.id).await.unwrap(), session);
    }

    #[tokio::test]
    async fn create_requires_owned_voice_model() {
        let (store, model_id, _dir) = store_with_model().await;
        let err = store.create("bob", new_session(&model_id)).await.unwrap_err();
        assert!(matches!(err, VocalError::NotFound { .. }));

        let mut blank = new_session(&model_id);
        blank.script = "  ".into();
        assert!(matches!(
            store.create("alice", blank).await.unwrap_err(),
            VocalError::Validation(_)
        ));
    }

    #[tokio::test]
    async fn status_moves_forward_only() {
        let (store, model_id, _dir) = store_with_model().await;
        let session = store.create("alice", new_session(&model_id)).await.unwrap();

        let to = |status| SessionPatch {
            status: Some(status),
            ..Default::default()
        };
        store.update("alice", &session.id, to(SessionStatus::Processing)).await.unwrap();
        let err = store
            .update("alice", &session.id, to(SessionStatus::Pending))
            .await
            .unwrap_err();
        assert!(matches!(err, VocalError::Validation(_)));

        store.update("alice", &session.id, to(SessionStatus::Failed)).await.unwrap();
        assert!(store
            .update("alice", &session.id, to(SessionStatus::Completed))
            .await
            .is_err());
    }

    #[tokio::test]
    async fn empty_update_changes_only_updated_at() {
        let (store, model_id, _dir) = store_with_model().await;
        let session = store.create("alice", new_session(&model_id)).await.unwrap();
        std::thread::sleep(std::time::Duration::from_millis(5));

        let updated = store
            .update("alice", &session.id, SessionPatch::default())
            .await
            .unwrap();
        assert!(updated.updated_at > session.updated_at);
        assert_eq!(
            Session {
                updated_at: session.updated_at.clone(),
                ..updated
            },
            session
        );
    }

    #[tokio::test]
    async fn foreign_sessions_are_not_found() {
        let (store, model_id, _dir) = store_with_model().await;
        let session = store.create("alice", new_session(&model_id)).await.unwrap();

        assert!(matches!(
            store.get("bob", &session.id).await.unwrap_err(),
            VocalError::NotFound { .. }
        ));
        let patch = SessionPatch {
            status: Some(SessionStatus::Processing),
            ..Default::default()
        };
        assert!(matches!(
            store.update("bob", &session.id, patch).await.unwrap_err(),
            VocalError::NotFound { .. }
        ));
        assert!(matches!(
            store.update("bob", &session.id, SessionPatch::default()).await.unwrap_err(),
            VocalError::NotFound { .. }
        ));
        assert!(matches!(
            store.delete("bob", &session.id).await.unwrap_err(),
            VocalError::NotFound { .. }
        ));
        store.delete("alice", &session.id).await.unwrap();
    }

    #[tokio::test]
    async fn list_validates_limit() {
        let (store, _model_id, _dir) = store_with_model().await;
        assert!(store.list("alice", None, Some(0)).await.is_err());
        assert!(store.list("alice", None, Some(101)).await.is_err());
        let page = store.list("alice", None, None).await.unwrap();
        assert_eq!((page.page, page.limit, page.total), (1, 10, 0));
    }
}
