// SPDX-FileCopyrightText: 2026 Vocal Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! HTTP request handlers for the JSON API.
//!
//! Handlers translate between wire shapes and the studio services; every
//! failure leaves as an [`ApiError`].

use std::collections::BTreeSet;

use axum::extract::multipart::{Field, MultipartRejection};
use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::extract::{Multipart, Path, Query, State};
use axum::http::StatusCode;
use axum::{Extension, Json};
use base64::Engine;
use base64::engine::general_purpose::STANDARD as BASE64;
use serde::{Deserialize, Serialize};

use vocal_core::VocalError;
use vocal_core::types::{JournalEntry, JournalPatch, Page, Principal, Session, SessionPatch, VoiceModel};
use vocal_studio::{
    GenerateRequest, NewJournalEntry, NewSession, RecordingQuality, VoiceUpload,
    classify_recording,
};

use crate::error::{ApiError, ErrorResponse};
use crate::server::AppState;

type ApiResult<T> = Result<T, ApiError>;

// --- Wire shapes ---

/// Response body for GET /api/health.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub message: &'static str,
}

#[derive(Debug, Deserialize)]
pub struct TokenRequest {
    #[serde(default)]
    pub token: String,
}

#[derive(Debug, Serialize)]
pub struct TokenResponse {
    pub success: bool,
    /// The provider credential, echoed back unchanged.
    pub token: String,
    pub user: Principal,
}

#[derive(Debug, Serialize)]
pub struct ProfileResponse {
    pub success: bool,
    pub user: Principal,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadResponse {
    pub success: bool,
    pub voice_model: VoiceModel,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub recording_quality: Option<RecordingQuality>,
    pub message: &'static str,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateBody {
    #[serde(default)]
    pub script: String,
    #[serde(default, alias = "voiceModelId")]
    pub voice_id: String,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub session_type: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateResponse {
    pub success: bool,
    pub session: Option<Session>,
    /// Standard base64 of the MPEG audio.
    pub audio_data: String,
    /// Derived from script length, not measured.
    pub estimated_duration_seconds: u32,
    pub message: &'static str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VoiceModelListResponse {
    pub success: bool,
    pub voice_models: Vec<VoiceModel>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VoiceModelResponse {
    pub success: bool,
    pub voice_model: VoiceModel,
}

/// Response body for deletes.
#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub success: bool,
    pub message: &'static str,
}

#[derive(Debug, Deserialize)]
pub struct PageParams {
    pub page: Option<u32>,
    pub limit: Option<u32>,
}

#[derive(Debug, Serialize)]
pub struct Pagination {
    pub page: u32,
    pub limit: u32,
    pub total: u64,
}

impl<T> From<&Page<T>> for Pagination {
    fn from(page: &Page<T>) -> Self {
        Self {
            page: page.page,
            limit: page.limit,
            total: page.total,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateSessionBody {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub script: String,
    #[serde(default)]
    pub voice_model_id: String,
    #[serde(default)]
    pub session_type: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct SessionResponse {
    pub success: bool,
    pub session: Session,
}

#[derive(Debug, Serialize)]
pub struct SessionListResponse {
    pub success: bool,
    pub sessions: Vec<Session>,
    pub pagination: Pagination,
}

#[derive(Debug, Deserialize)]
pub struct CreateJournalBody {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub mood: Option<String>,
    #[serde(default)]
    pub tags: BTreeSet<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct JournalEntryResponse {
    pub success: bool,
    pub journal_entry: JournalEntry,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct JournalListResponse {
    pub success: bool,
    pub journal_entries: Vec<JournalEntry>,
    pub pagination: Pagination,
}

// --- Public routes ---

/// GET /api/health
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "OK",
        message: "Vocal API is running",
    })
}

/// POST /api/auth/token
///
/// Verifies a provider credential and hands it back. There is no separate
/// session token: clients keep sending the provider credential.
pub async fn exchange_token(
    State(state): State<AppState>,
    body: Result<Json<TokenRequest>, JsonRejection>,
) -> ApiResult<Json<TokenResponse>> {
    let Json(body) = body?;
    let token = body.token.trim();
    if token.is_empty() {
        return Err(VocalError::validation("Token is required").into());
    }
    let user = state.identity.verify(token).await?;
    tracing::info!(user_id = %user.id, "credential exchanged");
    Ok(Json(TokenResponse {
        success: true,
        token: token.to_string(),
        user,
    }))
}

/// Fallback for unmatched routes.
pub async fn not_found() -> (StatusCode, Json<ErrorResponse>) {
    (
        StatusCode::NOT_FOUND,
        Json(ErrorResponse {
            error: "Endpoint not found".to_string(),
            details: None,
        }),
    )
}

// --- Auth ---

/// GET /api/auth/profile
pub async fn profile(Extension(user): Extension<Principal>) -> Json<ProfileResponse> {
    Json(ProfileResponse {
        success: true,
        user,
    })
}

// --- Voice ---

/// POST /api/voice/upload
///
/// Multipart fields: `audio` (required, `audio/*`), `name`, `description`,
/// `durationSeconds`.
pub async fn upload_voice(
    State(state): State<AppState>,
    Extension(user): Extension<Principal>,
    multipart: Result<Multipart, MultipartRejection>,
) -> ApiResult<(StatusCode, Json<UploadResponse>)> {
    let mut multipart = multipart?;

    let mut audio: Option<(Vec<u8>, String, String)> = None;
    let mut display_name = None;
    let mut description = None;
    let mut duration_seconds = None;

    while let Some(field) = multipart.next_field().await? {
        let name = field.name().unwrap_or_default().to_string();
        match name.as_str() {
            "audio" => {
                let content_type = field.content_type().unwrap_or_default().to_string();
                if !content_type.starts_with("audio/") {
                    return Err(VocalError::validation("Only audio files are allowed").into());
                }
                let file_name = field.file_name().unwrap_or("recording").to_string();
                let bytes = read_bounded(field, state.max_upload_bytes).await?;
                audio = Some((bytes, file_name, content_type));
            }
            "name" => display_name = Some(field.text().await?),
            "description" => description = Some(field.text().await?),
            "durationSeconds" => {
                let raw = field.text().await?;
                let seconds = raw
                    .trim()
                    .parse::<f64>()
                    .ok()
                    .filter(|s| s.is_finite() && *s >= 0.0)
                    .ok_or_else(|| {
                        VocalError::validation("durationSeconds must be a non-negative number")
                    })?;
                duration_seconds = Some(seconds);
            }
            other => tracing::debug!(field = other, "ignoring unknown upload field"),
        }
    }

    let (audio, file_name, content_type) =
        audio.ok_or_else(|| VocalError::validation("No audio file provided"))?;
    let size = audio.len() as u64;

    let voice_model = state
        .studio
        .voices
        .create(
            &user.id,
            VoiceUpload {
                audio,
                file_name,
                content_type,
                display_name,
                description,
            },
        )
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(UploadResponse {
            success: true,
            voice_model,
            recording_quality: duration_seconds.map(|d| classify_recording(size, d)),
            message: "Voice model created successfully",
        }),
    ))
}

/// Reads a multipart field, failing once it grows past `limit` bytes.
async fn read_bounded(mut field: Field<'_>, limit: u64) -> ApiResult<Vec<u8>> {
    let mut buf = Vec::new();
    while let Some(chunk) = field.chunk().await? {
        if (buf.len() + chunk.len()) as u64 > limit {
            return Err(VocalError::PayloadTooLarge {
                message: format!("audio file exceeds {limit} bytes"),
            }
            .into());
        }
        buf.extend_from_slice(&chunk);
    }
    Ok(buf)
}

/// POST /api/voice/generate
pub async fn generate_audio(
    State(state): State<AppState>,
    Extension(user): Extension<Principal>,
    body: Result<Json<GenerateBody>, JsonRejection>,
) -> ApiResult<Json<GenerateResponse>> {
    let Json(body) = body?;
    let generated = state
        .studio
        .synthesis
        .generate(
            &user.id,
            GenerateRequest {
                script: body.script,
                voice_ref: body.voice_id,
                title: body.title,
                session_type: body.session_type,
            },
        )
        .await?;

    Ok(Json(GenerateResponse {
        success: true,
        session: generated.session,
        audio_data: BASE64.encode(&generated.audio),
        estimated_duration_seconds: generated.estimated_duration_seconds,
        message: "Audio generated successfully",
    }))
}

/// GET /api/voice/models
pub async fn list_voice_models(
    State(state): State<AppState>,
    Extension(user): Extension<Principal>,
) -> ApiResult<Json<VoiceModelListResponse>> {
    let voice_models = state.studio.voices.list(&user.id).await?;
    Ok(Json(VoiceModelListResponse {
        success: true,
        voice_models,
    }))
}

/// GET /api/voice/models/{id}
pub async fn get_voice_model(
    State(state): State<AppState>,
    Extension(user): Extension<Principal>,
    Path(id): Path<String>,
) -> ApiResult<Json<VoiceModelResponse>> {
    let voice_model = state.studio.voices.get(&user.id, &id).await?;
    Ok(Json(VoiceModelResponse {
        success: true,
        voice_model,
    }))
}

/// DELETE /api/voice/models/{id}
pub async fn delete_voice_model(
    State(state): State<AppState>,
    Extension(user): Extension<Principal>,
    Path(id): Path<String>,
) -> ApiResult<Json<MessageResponse>> {
    state.studio.voices.delete(&user.id, &id).await?;
    Ok(Json(MessageResponse {
        success: true,
        message: "Voice model deleted successfully",
    }))
}

// --- Sessions ---

/// POST /api/sessions
pub async fn create_session(
    State(state): State<AppState>,
    Extension(user): Extension<Principal>,
    body: Result<Json<CreateSessionBody>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<SessionResponse>)> {
    let Json(body) = body?;
    let session = state
        .studio
        .sessions
        .create(
            &user.id,
            NewSession {
                title: body.title,
                script: body.script,
                voice_model_id: body.voice_model_id,
                session_type: body.session_type,
            },
        )
        .await?;
    Ok((
        StatusCode::CREATED,
        Json(SessionResponse {
            success: true,
            session,
        }),
    ))
}

/// GET /api/sessions?page=&limit=
pub async fn list_sessions(
    State(state): State<AppState>,
    Extension(user): Extension<Principal>,
    params: Result<Query<PageParams>, QueryRejection>,
) -> ApiResult<Json<SessionListResponse>> {
    let Query(params) = params?;
    let page = state
        .studio
        .sessions
        .list(&user.id, params.page, params.limit)
        .await?;
    Ok(Json(SessionListResponse {
        success: true,
        pagination: Pagination::from(&page),
        sessions: page.items,
    }))
}

/// GET /api/sessions/{id}
pub async fn get_session(
    State(state): State<AppState>,
    Extension(user): Extension<Principal>,
    Path(id): Path<String>,
) -> ApiResult<Json<SessionResponse>> {
    let session = state.studio.sessions.get(&user.id, &id).await?;
    Ok(Json(SessionResponse {
        success: true,
        session,
    }))
}

/// PUT /api/sessions/{id}
pub async fn update_session(
    State(state): State<AppState>,
    Extension(user): Extension<Principal>,
    Path(id): Path<String>,
    body: Result<Json<SessionPatch>, JsonRejection>,
) -> ApiResult<Json<SessionResponse>> {
    let Json(patch) = body?;
    let session = state.studio.sessions.update(&user.id, &id, patch).await?;
    Ok(Json(SessionResponse {
        success: true,
        session,
    }))
}

/// DELETE /api/sessions/{id}
pub async fn delete_session(
    State(state): State<AppState>,
    Extension(user): Extension<Principal>,
    Path(id): Path<String>,
) -> ApiResult<Json<MessageResponse>> {
    state.studio.sessions.delete(&user.id, &id).await?;
    Ok(Json(MessageResponse {
        success: true,
        message: "Session deleted successfully",
    }))
}

// --- Journal ---

/// POST /api/journal/entries
pub async fn create_journal_entry(
    State(state): State<AppState>,
    Extension(user): Extension<Principal>,
    body: Result<Json<CreateJournalBody>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<JournalEntryResponse>)> {
    let Json(body) = body?;
    let journal_entry = state
        .studio
        .journal
        .create(
            &user.id,
            NewJournalEntry {
                title: body.title,
                content: body.content,
                mood: body.mood,
                tags: body.tags,
            },
        )
        .await?;
    Ok((
        StatusCode::CREATED,
        Json(JournalEntryResponse {
            success: true,
            journal_entry,
        }),
    ))
}

/// GET /api/journal/entries?page=&limit=
pub async fn list_journal_entries(
    State(state): State<AppState>,
    Extension(user): Extension<Principal>,
    params: Result<Query<PageParams>, QueryRejection>,
) -> ApiResult<Json<JournalListResponse>> {
    let Query(params) = params?;
    let page = state
        .studio
        .journal
        .list(&user.id, params.page, params.limit)
        .await?;
    Ok(Json(JournalListResponse {
        success: true,
        pagination: Pagination::from(&page),
        journal_entries: page.items,
    }))
}

/// GET /api/journal/entries/{id}
pub async fn get_journal_entry(
    State(state): State<AppState>,
    Extension(user): Extension<Principal>,
    Path(id): Path<String>,
) -> ApiResult<Json<JournalEntryResponse>> {
    let journal_entry = state.studio.journal.get(&user.id, &id).await?;
    Ok(Json(JournalEntryResponse {
        success: true,
        journal_entry,
    }))
}

/// PUT /api/journal/entries/{id}
pub async fn update_journal_entry(
    State(state): State<AppState>,
    Extension(user): Extension<Principal>,
    Path(id): Path<String>,
    body: Result<Json<JournalPatch>, JsonRejection>,
) -> ApiResult<Json<JournalEntryResponse>> {
    let Json(patch) = body?;
    let journal_entry = state.studio.journal.update(&user.id, &id, patch).await?;
    Ok(Json(JournalEntryResponse {
        success: true,
        journal_entry,
    }))
}

/// DELETE /api/journal/entries/{id}
pub async fn delete_journal_entry(
    State(state): State<AppState>,
    Extension(user): Extension<Principal>,
    Path(id): Path<String>,
) -> ApiResult<Json<MessageResponse>> {
    state.studio.journal.delete(&user.id, &id).await?;
    Ok(Json(MessageResponse {
        success: true,
        message: "Journal entry deleted successfully",
    }))
}
