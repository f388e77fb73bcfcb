// SPDX-FileCopyrightText: 2026 Vocal Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Conversion of service errors into JSON error responses.

use axum::extract::multipart::{MultipartError, MultipartRejection};
use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;

use vocal_core::VocalError;

/// Error response body.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    /// Human-readable summary.
    pub error: String,
    /// Extra context, e.g. the vendor's own message.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

/// A [`VocalError`] on its way out of a handler.
#[derive(Debug)]
pub struct ApiError(pub VocalError);

impl From<VocalError> for ApiError {
    fn from(err: VocalError) -> Self {
        Self(err)
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self(VocalError::validation(format!(
            "Invalid request body: {}",
            rejection.body_text()
        )))
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        Self(VocalError::validation(format!(
            "Invalid query string: {}",
            rejection.body_text()
        )))
    }
}

impl From<MultipartRejection> for ApiError {
    fn from(rejection: MultipartRejection) -> Self {
        Self(VocalError::validation(format!(
            "Invalid multipart body: {}",
            rejection.body_text()
        )))
    }
}

impl From<MultipartError> for ApiError {
    fn from(err: MultipartError) -> Self {
        if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
            return Self(VocalError::PayloadTooLarge {
                message: err.body_text(),
            });
        }
        Self(VocalError::validation(format!(
            "Invalid multipart body: {}",
            err.body_text()
        )))
    }
}

impl ApiError {
    fn status(&self) -> StatusCode {
        match &self.0 {
            VocalError::Validation(_) => StatusCode::BAD_REQUEST,
            VocalError::Unauthenticated => StatusCode::UNAUTHORIZED,
            VocalError::InvalidCredential { .. } => StatusCode::FORBIDDEN,
            VocalError::NotFound { .. } => StatusCode::NOT_FOUND,
            VocalError::PayloadTooLarge { .. } => StatusCode::PAYLOAD_TOO_LARGE,
            VocalError::Upstream { .. } => StatusCode::BAD_GATEWAY,
            VocalError::UpstreamTimeout { .. } => StatusCode::GATEWAY_TIMEOUT,
            VocalError::Storage { .. } | VocalError::Config(_) | VocalError::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    fn body(&self) -> ErrorResponse {
        let (error, details) = match &self.0 {
            VocalError::Validation(message) => (message.clone(), None),
            VocalError::Unauthenticated => ("Access token required".to_string(), None),
            VocalError::InvalidCredential { .. } => {
                ("Invalid or expired token".to_string(), None)
            }
            VocalError::NotFound { entity } => (format!("{} not found", capitalize(entity)), None),
            VocalError::PayloadTooLarge { message } => {
                ("File too large".to_string(), Some(message.clone()))
            }
            VocalError::Upstream {
                service, message, ..
            } => (
                format!("{} request failed", service_label(service)),
                Some(message.clone()),
            ),
            VocalError::UpstreamTimeout { service, duration } => (
                format!("{} timed out", service_label(service)),
                Some(format!("no response within {}s", duration.as_secs())),
            ),
            VocalError::Storage { .. } | VocalError::Config(_) | VocalError::Internal(_) => {
                ("Internal server error".to_string(), None)
            }
        };
        ErrorResponse { error, details }
    }
}

fn service_label(service: &str) -> &str {
    match service {
        "vendor" => "Voice service",
        "identity" => "Identity provider",
        other => other,
    }
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!(error = %self.0, status = status.as_u16(), "request failed");
        } else {
            tracing::debug!(error = %self.0, status = status.as_u16(), "request rejected");
        }
        (status, Json(self.body())).into_response()
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;

    fn render(err: VocalError) -> (StatusCode, serde_json::Value) {
        let api = ApiError(err);
        let status = api.status();
        (status, serde_json::to_value(api.body()).unwrap())
    }

    #[test]
    fn each_variant_maps_to_its_status() {
        let cases = [
            (VocalError::validation("bad"), 400),
            (VocalError::Unauthenticated, 401),
            (
                VocalError::InvalidCredential {
                    message: "expired".into(),
                },
                403,
            ),
            (VocalError::not_found("session"), 404),
            (
                VocalError::PayloadTooLarge {
                    message: "big".into(),
                },
                413,
            ),
            (
                VocalError::Upstream {
                    service: "vendor",
                    status: Some(500),
                    message: "quota exceeded".into(),
                    source: None,
                },
                502,
            ),
            (
                VocalError::UpstreamTimeout {
                    service: "identity",
                    duration: Duration::from_secs(10),
                },
                504,
            ),
            (VocalError::storage("disk full"), 500),
            (VocalError::Internal("oops".into()), 500),
        ];
        for (err, expected) in cases {
            assert_eq!(render(err).0.as_u16(), expected);
        }
    }

    #[test]
    fn upstream_message_lands_in_details() {
        let (_, body) = render(VocalError::Upstream {
            service: "vendor",
            status: Some(401),
            message: "invalid api key".into(),
            source: None,
        });
        assert_eq!(body["error"], "Voice service request failed");
        assert_eq!(body["details"], "invalid api key");
    }

    #[test]
    fn not_found_is_capitalized_without_details() {
        let (_, body) = render(VocalError::not_found("voice model"));
        assert_eq!(body["error"], "Voice model not found");
        assert!(body.get("details").is_none());
    }

    #[test]
    fn storage_errors_do_not_leak_internals() {
        let (_, body) = render(VocalError::storage("no such table: sessions"));
        assert_eq!(body["error"], "Internal server error");
        assert!(!body.to_string().contains("sessions"));
    }
}
