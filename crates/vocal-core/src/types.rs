// SPDX-FileCopyrightText: 2026 Vocal Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Domain types shared across adapter traits and the service layer.
//!
//! All records serialize with camelCase keys, which is the JSON shape the
//! HTTP API exposes.

use std::collections::BTreeSet;

use serde::{Deserialize, Deserializer, Serialize};
use strum::{Display, EnumString};

/// Health status reported by adapter health checks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HealthStatus {
    /// Adapter is fully operational.
    Healthy,
    /// Adapter is operational but experiencing issues.
    Degraded(String),
    /// Adapter is not operational.
    Unhealthy(String),
}

/// Identifies the kind of adapter behind a trait object.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize,
)]
pub enum AdapterType {
    Identity,
    Vendor,
    Storage,
}

/// Current UTC time as an RFC 3339 string with millisecond precision.
///
/// Every persisted timestamp uses this format so lexical order equals
/// chronological order.
pub fn now_timestamp() -> String {
    chrono::Utc::now().to_rfc3339_opts(chrono::SecondsFormat::Millis, true)
}

/// The timestamp `age` before now, in the same format as [`now_timestamp`].
pub fn timestamp_ago(age: std::time::Duration) -> String {
    let age = chrono::Duration::from_std(age).unwrap_or(chrono::Duration::MAX);
    let instant = chrono::Utc::now()
        .checked_sub_signed(age)
        .unwrap_or(chrono::DateTime::<chrono::Utc>::MIN_UTC);
    instant.to_rfc3339_opts(chrono::SecondsFormat::Millis, true)
}

/// Generates a new opaque record identifier.
pub fn new_id() -> String {
    uuid::Uuid::new_v4().to_string()
}

/// An authenticated caller, as verified by the identity provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Principal {
    pub id: String,
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
}

/// A cloned voice owned by a principal and mirrored in the vendor registry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VoiceModel {
    pub id: String,
    pub owner_id: String,
    pub display_name: String,
    pub description: String,
    /// The vendor's identifier for the cloned voice.
    pub external_voice_ref: String,
    pub audio_ref: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

/// A vendor voice whose local record has not been committed yet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VoiceCloneOutboxEntry {
    pub external_voice_ref: String,
    pub owner_id: String,
    pub created_at: String,
}

/// Lifecycle of an audio session.
///
/// Transitions only move forward: pending -> processing -> completed | failed.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum SessionStatus {
    Pending,
    Processing,
    Completed,
    Failed,
}

impl SessionStatus {
    pub const ALL: [SessionStatus; 4] = [
        SessionStatus::Pending,
        SessionStatus::Processing,
        SessionStatus::Completed,
        SessionStatus::Failed,
    ];

    fn rank(self) -> u8 {
        match self {
            SessionStatus::Pending => 0,
            SessionStatus::Processing => 1,
            SessionStatus::Completed | SessionStatus::Failed => 2,
        }
    }

    /// Returns true if no further transition is possible.
    pub fn is_terminal(self) -> bool {
        self.rank() == 2
    }

    /// Returns true if moving from `self` to `next` respects the lifecycle.
    ///
    /// Staying in the same status is allowed; terminal states never change.
    pub fn can_transition_to(self, next: SessionStatus) -> bool {
        if self == next {
            return true;
        }
        !self.is_terminal() && next.rank() > self.rank()
    }

    /// Statuses a session may currently hold for a move to `next` to be valid.
    pub fn allowed_predecessors(next: SessionStatus) -> Vec<SessionStatus> {
        Self::ALL
            .into_iter()
            .filter(|current| current.can_transition_to(next))
            .collect()
    }
}

/// An audio session: a script rendered (or to be rendered) with a voice model.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    pub id: String,
    pub owner_id: String,
    pub voice_model_id: String,
    pub title: String,
    pub script: String,
    pub session_type: String,
    pub audio_ref: Option<String>,
    /// Estimated from the script length, not measured from audio.
    pub duration_seconds: Option<u32>,
    pub status: SessionStatus,
    pub created_at: String,
    pub updated_at: String,
}

/// Fields a caller may change on an existing session. `None` leaves a field untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionPatch {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub script: Option<String>,
    #[serde(default)]
    pub status: Option<SessionStatus>,
}

impl SessionPatch {
    pub fn is_empty(&self) -> bool {
        self.title.is_none() && self.script.is_none() && self.status.is_none()
    }
}

/// A free-text journal entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JournalEntry {
    pub id: String,
    pub owner_id: String,
    pub title: String,
    pub content: String,
    pub mood: Option<String>,
    pub tags: BTreeSet<String>,
    pub created_at: String,
    pub updated_at: String,
}

/// Fields a caller may change on an existing journal entry.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JournalPatch {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub content: Option<String>,
    /// `None` leaves the mood alone; `Some(None)` clears it.
    #[serde(default, deserialize_with = "present_or_null")]
    pub mood: Option<Option<String>>,
    #[serde(default)]
    pub tags: Option<BTreeSet<String>>,
}

/// Maps a present field to `Some`, keeping an explicit JSON `null` distinct
/// from an absent key (which falls back to `#[serde(default)]`).
fn present_or_null<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

/// A 1-based page request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub page: u32,
    pub limit: u32,
}

impl PageRequest {
    /// Row offset of the first record on this page.
    pub fn offset(&self) -> u64 {
        u64::from(self.page.saturating_sub(1)) * u64::from(self.limit)
    }
}

/// One page of records plus the exact size of the full owner-scoped set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub total: u64,
    pub page: u32,
    pub limit: u32,
}

/// Audio and metadata sent to the vendor cloning endpoint.
#[derive(Debug, Clone)]
pub struct VoiceCloneRequest {
    pub name: String,
    pub description: String,
    pub file_name: String,
    pub content_type: String,
    pub audio: Vec<u8>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn predecessors_follow_the_lifecycle() {
        use SessionStatus::*;
        assert_eq!(SessionStatus::allowed_predecessors(Pending), vec![Pending]);
        assert_eq!(
            SessionStatus::allowed_predecessors(Processing),
            vec![Pending, Processing]
        );
        assert_eq!(
            SessionStatus::allowed_predecessors(Completed),
            vec![Pending, Processing, Completed]
        );
    }

    #[test]
    fn journal_patch_distinguishes_null_mood_from_absent() {
        let absent: JournalPatch = serde_json::from_str(r#"{"title": "T"}"#).unwrap();
        assert_eq!(absent.mood, None);

        let cleared: JournalPatch = serde_json::from_str(r#"{"mood": null}"#).unwrap();
        assert_eq!(cleared.mood, Some(None));

        let set: JournalPatch = serde_json::from_str(r#"{"mood": "calm"}"#).unwrap();
        assert_eq!(set.mood, Some(Some("calm".to_string())));
    }
}
