// SPDX-FileCopyrightText: 2026 Vocal Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Axum router assembly and HTTP listener.

use std::future::Future;
use std::sync::Arc;

use axum::extract::DefaultBodyLimit;
use axum::middleware as axum_middleware;
use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use vocal_core::{IdentityAdapter, VocalError};
use vocal_studio::Studio;

use crate::auth::auth_middleware;
use crate::handlers;

/// Multipart framing overhead allowed on top of the audio size limit.
const MULTIPART_OVERHEAD_BYTES: u64 = 1024 * 1024;

/// Shared state for all route handlers.
#[derive(Clone)]
pub struct AppState {
    pub studio: Studio,
    pub identity: Arc<dyn IdentityAdapter>,
    /// Largest accepted audio part, in bytes.
    pub max_upload_bytes: u64,
}

/// Builds the full API router.
///
/// Protected routes sit behind [`auth_middleware`]; unmatched paths fall
/// through to a JSON 404 without touching the identity provider.
pub fn build_router(state: AppState) -> Router {
    let body_limit = usize::try_from(state.max_upload_bytes.saturating_add(MULTIPART_OVERHEAD_BYTES))
        .unwrap_or(usize::MAX);

    let public_routes = Router::new()
        .route("/api/health", get(handlers::health))
        .route("/api/auth/token", post(handlers::exchange_token));

    let api_routes = Router::new()
        .route("/api/auth/profile", get(handlers::profile))
        .route(
            "/api/voice/upload",
            post(handlers::upload_voice).layer(DefaultBodyLimit::max(body_limit)),
        )
        .route("/api/voice/generate", post(handlers::generate_audio))
        .route("/api/voice/models", get(handlers::list_voice_models))
        .route(
            "/api/voice/models/{id}",
            get(handlers::get_voice_model).delete(handlers::delete_voice_model),
        )
        .route(
            "/api/sessions",
            get(handlers::list_sessions).post(handlers::create_session),
        )
        .route(
            "/api/sessions/{id}",
            get(handlers::get_session)
                .put(handlers::update_session)
                .delete(handlers::delete_session),
        )
        .route(
            "/api/journal/entries",
            get(handlers::list_journal_entries).post(handlers::create_journal_entry),
        )
        .route(
            "/api/journal/entries/{id}",
            get(handlers::get_journal_entry)
                .put(handlers::update_journal_entry)
                .delete(handlers::delete_journal_entry),
        )
        .route_layer(axum_middleware::from_fn_with_state(
            state.clone(),
            auth_middleware,
        ));

    Router::new()
        .merge(public_routes)
        .merge(api_routes)
        .fallback(handlers::not_found)
        .method_not_allowed_fallback(handlers::not_found)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Binds `host:port` and serves the API until `shutdown` resolves.
pub async fn start_server(
    host: &str,
    port: u16,
    state: AppState,
    shutdown: impl Future<Output = ()> + Send + 'static,
) -> Result<(), VocalError> {
    let app = build_router(state);

    let addr = format!("{host}:{port}");
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| VocalError::Internal(format!("failed to bind API server to {addr}: {e}")))?;

    tracing::info!("API server listening on {addr}");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown)
        .await
        .map_err(|e| VocalError::Internal(format!("API server error: {e}")))?;

    tracing::info!("API server stopped");
    Ok(())
}
