// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Application error types with consistent API responses.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};

/// Category of a failure reported by the hosted platform.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlatformErrorKind {
    Conflict,
    NotFound,
    Unauthorized,
    Forbidden,
    RateLimited,
    UpstreamConstraint,
    Unexpected,
}

/// Failure from an auth, database or storage call, classified at the
/// adapter boundary.
#[derive(Debug, Clone, thiserror::Error)]
#[error("{message}")]
pub struct PlatformError {
    pub kind: PlatformErrorKind,
    pub message: String,
}

/// Error body returned by GoTrue, PostgREST and Storage. Each service uses
/// a different subset of these fields.
#[derive(Debug, Default, Deserialize)]
struct UpstreamBody {
    #[serde(default)]
    code: Option<serde_json::Value>,
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    msg: Option<String>,
    #[serde(default)]
    error_description: Option<String>,
    #[serde(default)]
    error: Option<String>,
}

impl PlatformError {
    pub fn new(kind: PlatformErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    pub fn unexpected(message: impl Into<String>) -> Self {
        Self::new(PlatformErrorKind::Unexpected, message)
    }

    /// Classify a non-success platform response.
    ///
    /// Database error codes take precedence over the HTTP status.
    pub fn from_response(status: u16, body: &str) -> Self {
        let parsed: UpstreamBody = serde_json::from_str(body).unwrap_or_default();
        let message = parsed
            .message
            .or(parsed.msg)
            .or(parsed.error_description)
            .or(parsed.error)
            .unwrap_or_else(|| format!("HTTP {}", status));

        // GoTrue reports the HTTP status as a numeric `code`; only string
        // codes are Postgres/PostgREST error codes.
        let db_code = parsed.code.as_ref().and_then(|c| c.as_str());

        match db_code {
            Some("23505") => {
                return Self::new(PlatformErrorKind::Conflict, "Resource already exists")
            }
            Some("P0001") => return Self::new(PlatformErrorKind::UpstreamConstraint, message),
            Some("22P02") => {
                return Self::new(PlatformErrorKind::UpstreamConstraint, "Invalid input format")
            }
            Some("PGRST116") => return Self::new(PlatformErrorKind::NotFound, message),
            Some(other) => {
                tracing::warn!(code = other, status, "Unhandled platform error code");
            }
            None => {}
        }

        let kind = match status {
            400 | 422 => PlatformErrorKind::UpstreamConstraint,
            401 => PlatformErrorKind::Unauthorized,
            403 => PlatformErrorKind::Forbidden,
            404 => PlatformErrorKind::NotFound,
            409 => PlatformErrorKind::Conflict,
            429 => PlatformErrorKind::RateLimited,
            _ => PlatformErrorKind::Unexpected,
        };

        Self::new(kind, message)
    }
}

impl From<reqwest::Error> for PlatformError {
    fn from(err: reqwest::Error) -> Self {
        Self::unexpected(format!("Platform request failed: {}", err))
    }
}

/// Application error type that converts to HTTP responses.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Validation failed")]
    Validation(Vec<String>),

    #[error("Invalid request: {0}")]
    BadRequest(String),

    #[error("Authentication token is required")]
    MissingToken,

    #[error("Invalid or expired token")]
    InvalidToken,

    #[error("Invalid or expired refresh token")]
    InvalidRefreshToken,

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Resource not found: {0}")]
    NotFound(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Verification link has expired or is invalid")]
    OtpExpired,

    #[error("Verification callback failed: {message}")]
    VerificationLink {
        status: StatusCode,
        message: String,
        code: String,
        description: Option<String>,
    },

    #[error("Platform error: {0}")]
    Platform(#[from] PlatformError),

    #[error("Internal server error: {0}")]
    Internal(#[from] anyhow::Error),
}

/// JSON error response body
#[derive(Debug, Default, Serialize)]
struct ErrorResponse {
    error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    code: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    details: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    suggestion: Option<String>,
}

impl ErrorResponse {
    fn plain(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            ..Default::default()
        }
    }
}

impl AppError {
    /// HTTP status this error maps to.
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::Validation(_) | AppError::BadRequest(_) | AppError::OtpExpired => {
                StatusCode::BAD_REQUEST
            }
            AppError::MissingToken | AppError::InvalidRefreshToken => StatusCode::UNAUTHORIZED,
            AppError::InvalidToken | AppError::Forbidden(_) => StatusCode::FORBIDDEN,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Conflict(_) => StatusCode::CONFLICT,
            AppError::VerificationLink { status, .. } => *status,
            AppError::Platform(err) => match err.kind {
                PlatformErrorKind::Conflict => StatusCode::CONFLICT,
                PlatformErrorKind::NotFound => StatusCode::NOT_FOUND,
                PlatformErrorKind::Unauthorized => StatusCode::UNAUTHORIZED,
                PlatformErrorKind::Forbidden => StatusCode::FORBIDDEN,
                PlatformErrorKind::RateLimited => StatusCode::TOO_MANY_REQUESTS,
                PlatformErrorKind::UpstreamConstraint => StatusCode::BAD_REQUEST,
                PlatformErrorKind::Unexpected => StatusCode::INTERNAL_SERVER_ERROR,
            },
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let display = self.to_string();

        let body = match self {
            AppError::Validation(errors) => ErrorResponse {
                error: "Validation failed".to_string(),
                details: Some(errors),
                ..Default::default()
            },
            AppError::BadRequest(msg)
            | AppError::Forbidden(msg)
            | AppError::NotFound(msg)
            | AppError::Conflict(msg) => ErrorResponse::plain(msg),
            AppError::MissingToken | AppError::InvalidToken | AppError::InvalidRefreshToken => {
                ErrorResponse::plain(display)
            }
            AppError::OtpExpired => ErrorResponse {
                error: "Verification link has expired or is invalid".to_string(),
                code: Some("OTP_EXPIRED".to_string()),
                message: Some("Please request a new verification email".to_string()),
                ..Default::default()
            },
            AppError::VerificationLink {
                message,
                code,
                description,
                ..
            } => ErrorResponse {
                error: message,
                code: Some(code),
                description,
                suggestion: Some("Please request a new verification email".to_string()),
                ..Default::default()
            },
            AppError::Platform(err) => {
                if err.kind == PlatformErrorKind::Unexpected {
                    tracing::error!(error = %err.message, "Unexpected platform error");
                    ErrorResponse::plain("Internal server error")
                } else {
                    tracing::warn!(kind = ?err.kind, error = %err.message, "Platform error");
                    ErrorResponse::plain(err.message)
                }
            }
            AppError::Internal(err) => {
                tracing::error!(error = %err, "Internal server error");
                ErrorResponse::plain("Internal server error")
            }
        };

        (status, Json(body)).into_response()
    }
}

/// Result type alias for handlers
pub type Result<T> = std::result::Result<T, AppError>;
