// SPDX-FileCopyrightText: 2026 Vocal Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! HTTP JSON API for the Vocal voice-journal service.
//!
//! Public routes (`/api/health`, `/api/auth/token`) are open; everything
//! else requires `Authorization: Bearer <credential>`, verified against the
//! identity provider on every request. Service errors are rendered as
//! `{error, details?}` bodies by [`error::ApiError`].

pub mod auth;
pub mod error;
pub mod handlers;
pub mod server;

pub use error::{ApiError, ErrorResponse};
pub use server::{AppState, build_router, start_server};
