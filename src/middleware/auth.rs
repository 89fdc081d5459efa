// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Bearer token authentication and the admin gate.

use crate::error::AppError;
use crate::models::Role;
use crate::AppState;
use axum::{
    extract::{Request, State},
    http::{header, HeaderMap},
    middleware::Next,
    response::Response,
};
use std::sync::Arc;

/// Authenticated user extracted from an access token.
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub user_id: String,
    pub email: String,
}

/// Token from an `Authorization: Bearer <token>` header, if any.
pub fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(header::AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .and_then(|h| h.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|t| !t.is_empty())
}

/// Middleware that requires a valid access token.
///
/// Missing token → 401, invalid or expired token → 403.
pub async fn require_auth(
    State(state): State<Arc<AppState>>,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let token = bearer_token(request.headers()).ok_or(AppError::MissingToken)?;

    let payload = state
        .tokens
        .verify_access(token)
        .map_err(|_| AppError::InvalidToken)?;

    request.extensions_mut().insert(AuthUser {
        user_id: payload.user_id,
        email: payload.email,
    });

    Ok(next.run(request).await)
}

/// Middleware that lets only admins through. Must run after
/// [`require_auth`].
pub async fn require_admin(
    State(state): State<Arc<AppState>>,
    request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let user = request
        .extensions()
        .get::<AuthUser>()
        .cloned()
        .ok_or(AppError::MissingToken)?;

    let profile = state.profiles.find_by_id(&user.user_id).await?;

    if !profile.is_some_and(|p| p.role == Role::Admin) {
        tracing::warn!(user_id = %user.user_id, "Non-admin denied");
        return Err(AppError::Forbidden(
            "Access denied. Admin role required".to_string(),
        ));
    }

    Ok(next.run(request).await)
}
