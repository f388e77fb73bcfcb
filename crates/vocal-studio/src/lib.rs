// SPDX-FileCopyrightText: 2026 Vocal Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Service layer of the Vocal voice-journal service.
//!
//! Owns the business rules that sit between the HTTP gateway and the
//! storage/vendor adapters: voice model lifecycle, script synthesis,
//! session and journal CRUD, and paging limits.

pub mod journal;
pub mod paging;
pub mod quality;
pub mod registry;
pub mod sessions;
pub mod synthesis;

use std::sync::Arc;

use vocal_config::model::PaginationConfig;
use vocal_core::{StorageAdapter, VoiceVendorAdapter};

pub use journal::{JournalStore, NewJournalEntry};
pub use quality::{RecordingQuality, classify_recording};
pub use registry::{ReconcileReport, VoiceRegistry, VoiceUpload};
pub use sessions::{NewSession, SessionStore};
pub use synthesis::{GenerateRequest, GeneratedAudio, SynthesisGateway, estimate_duration_seconds};

pub const DEFAULT_SESSION_TITLE: &str = "Untitled Session";
pub const DEFAULT_SESSION_TYPE: &str = "custom";
pub const DEFAULT_ENTRY_TITLE: &str = "Untitled Entry";

/// All services, wired against one storage backend and one vendor.
#[derive(Clone)]
pub struct Studio {
    pub voices: Arc<VoiceRegistry>,
    pub synthesis: Arc<SynthesisGateway>,
    pub sessions: Arc<SessionStore>,
    pub journal: Arc<JournalStore>,
}

impl Studio {
    pub fn new(
        storage: Arc<dyn StorageAdapter>,
        vendor: Arc<dyn VoiceVendorAdapter>,
        pagination: PaginationConfig,
    ) -> Self {
        let voices = Arc::new(VoiceRegistry::new(storage.clone(), vendor.clone()));
        Self {
            synthesis: Arc::new(SynthesisGateway::new(
                voices.clone(),
                storage.clone(),
                vendor,
            )),
            sessions: Arc::new(SessionStore::new(
                storage.clone(),
                voices.clone(),
                pagination.clone(),
            )),
            journal: Arc::new(JournalStore::new(storage, pagination)),
            voices,
        }
    }
}
