// SPDX-FileCopyrightText: 2026 Vocal Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Bearer credential middleware for the protected API routes.
//!
//! Every request is verified against the identity provider on its own; a
//! verified [`Principal`] is inserted into the request extensions for the
//! handlers to read.

use axum::extract::{Request, State};
use axum::http::HeaderMap;
use axum::http::header::AUTHORIZATION;
use axum::middleware::Next;
use axum::response::Response;

use vocal_core::VocalError;
use vocal_core::types::Principal;

use crate::error::ApiError;
use crate::server::AppState;

/// Returns the credential from an `Authorization: Bearer <token>` header.
///
/// A missing header, another scheme, or a blank token all yield `None`.
pub fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|token| !token.is_empty())
}

/// Rejects requests without a verifiable bearer credential.
pub async fn auth_middleware(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let token = bearer_token(request.headers()).ok_or(VocalError::Unauthenticated)?;

    let principal: Principal = state.identity.verify(token).await.inspect_err(|e| {
        tracing::debug!(error = %e, "bearer credential rejected");
    })?;

    request.extensions_mut().insert(principal);
    Ok(next.run(request).await)
}
