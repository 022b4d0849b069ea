//! Error-to-response mapping.
//!
//! # Responsibilities
//! - Map every `GatewayError` to an HTTP status
//! - Render structured validation errors as JSON
//!
//! # Design Decisions
//! - Error bodies share the store's `{status, error}` shape
//! - Remote failures keep the store's status when it is an error status
//! - Text is rendered here; the domain only carries error kinds and parameters

use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

use crate::employees::{FieldError, GatewayError, Violation};
use crate::upstream::UpstreamError;

/// Error returned by inbound handlers.
#[derive(Debug)]
pub enum ApiError {
    Gateway(GatewayError),
    /// The body could not be read as JSON of the expected shape.
    Rejected { status: StatusCode, detail: String },
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        // Oversized bodies and wrong content types keep their own status;
        // anything else is a malformed request.
        let status = match rejection.status() {
            s @ (StatusCode::PAYLOAD_TOO_LARGE | StatusCode::UNSUPPORTED_MEDIA_TYPE) => s,
            _ => StatusCode::BAD_REQUEST,
        };
        ApiError::Rejected {
            status,
            detail: rejection.body_text(),
        }
    }
}

impl From<GatewayError> for ApiError {
    fn from(err: GatewayError) -> Self {
        ApiError::Gateway(err)
    }
}

#[derive(Serialize)]
struct ErrorBody {
    status: &'static str,
    error: String,
}

#[derive(Serialize)]
struct FieldErrorBody {
    field: &'static str,
    #[serde(flatten)]
    violation: Violation,
    reason: String,
}

#[derive(Serialize)]
struct ValidationBody {
    status: &'static str,
    errors: Vec<FieldErrorBody>,
}

impl From<&FieldError> for FieldErrorBody {
    fn from(err: &FieldError) -> Self {
        Self {
            field: err.field,
            violation: err.violation,
            reason: err.violation.to_string(),
        }
    }
}

/// Status code for an upstream failure.
pub fn upstream_status(err: &UpstreamError) -> StatusCode {
    match err {
        UpstreamError::RateLimited => StatusCode::TOO_MANY_REQUESTS,
        UpstreamError::Remote { status, .. } => StatusCode::from_u16(*status)
            .ok()
            .filter(|s| s.is_client_error() || s.is_server_error())
            .unwrap_or(StatusCode::BAD_GATEWAY),
        UpstreamError::Unreachable(_) => StatusCode::BAD_GATEWAY,
    }
}

fn error_response(status: StatusCode, title: &'static str, error: String) -> Response {
    (status, Json(ErrorBody { status: title, error })).into_response()
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let err = match self {
            ApiError::Rejected { status, detail } => {
                return error_response(status, "Malformed request body", detail);
            }
            ApiError::Gateway(err) => err,
        };

        match err {
            GatewayError::Validation(errors) => {
                tracing::debug!(count = errors.len(), "Rejected invalid input");
                let body = ValidationBody {
                    status: "Validation failed",
                    errors: errors.iter().map(FieldErrorBody::from).collect(),
                };
                (StatusCode::BAD_REQUEST, Json(body)).into_response()
            }
            GatewayError::NotFound { .. } => {
                error_response(StatusCode::NOT_FOUND, "Employee not found", err.to_string())
            }
            GatewayError::AmbiguousName { .. } => {
                error_response(StatusCode::CONFLICT, "Ambiguous employee name", err.to_string())
            }
            GatewayError::RemoteDeleteFailed { .. } => {
                tracing::error!(error = %err, "Delete failed at backing store");
                error_response(StatusCode::BAD_GATEWAY, "Delete failed", err.to_string())
            }
            GatewayError::Upstream(upstream) => {
                let status = upstream_status(&upstream);
                let message = match &upstream {
                    UpstreamError::Remote { message, .. } => message.clone(),
                    other => other.to_string(),
                };
                if status.is_server_error() {
                    tracing::error!(error = %upstream, "Backing store failure");
                } else {
                    tracing::warn!(error = %upstream, "Backing store rejected request");
                }
                let title = match upstream {
                    UpstreamError::RateLimited => "Too many requests",
                    UpstreamError::Remote { .. } => "Backing store error",
                    UpstreamError::Unreachable(_) => "Backing store unreachable",
                };
                error_response(status, title, message)
            }
        }
    }
}
