// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Account routes under `/api/auth`.

use crate::error::{AppError, Result};
use crate::middleware::auth::{bearer_token, AuthUser};
use crate::middleware::Valid;
use crate::models::requests::{
    EmailRequest, LoginRequest, PasswordResetRequest, RefreshRequest, RegisterRequest,
    VerifyEmailRequest,
};
use crate::models::User;
use crate::services::auth_flow::CallbackParams;
use crate::services::ProviderUser;
use crate::AppState;
use axum::{
    extract::{Query, State},
    http::{HeaderMap, StatusCode},
    routing::{get, post},
    Extension, Json, Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Routes reachable without an access token.
pub fn public_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/auth/register", post(register))
        .route("/api/auth/login", post(login))
        .route("/api/auth/refresh-token", post(refresh_token))
        .route("/api/auth/logout", post(logout))
        .route("/api/auth/password-reset/request", post(request_password_reset))
        .route("/api/auth/password-reset", post(reset_password))
        .route("/api/auth/verify-email", post(verify_email))
        .route("/api/auth/verify-email/callback", get(verification_callback))
        .route("/api/auth/resend-verification", post(resend_verification))
}

/// Routes that need `require_auth` applied by the caller.
pub fn protected_routes() -> Router<Arc<AppState>> {
    Router::new().route("/api/auth/me", get(me))
}

#[derive(Serialize)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    fn new(message: &str) -> Json<Self> {
        Json(Self {
            message: message.to_string(),
        })
    }
}

// ─── Registration & Login ────────────────────────────────────

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterResponse {
    pub message: String,
    pub user_id: String,
}

async fn register(
    State(state): State<Arc<AppState>>,
    Valid(body): Valid<RegisterRequest>,
) -> Result<(StatusCode, Json<RegisterResponse>)> {
    let user_id = state
        .auth_service
        .register(&body.email, &body.password, &body.name)
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(RegisterResponse {
            message: "User registered successfully. Please check your email for verification."
                .to_string(),
            user_id,
        }),
    ))
}

/// Public subset of a profile returned at login.
#[derive(Serialize)]
pub struct LoginUser {
    pub id: String,
    pub email: String,
    pub name: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    pub message: String,
    pub token: String,
    pub refresh_token: String,
    pub user: LoginUser,
}

async fn login(
    State(state): State<Arc<AppState>>,
    Valid(body): Valid<LoginRequest>,
) -> Result<Json<LoginResponse>> {
    let outcome = state
        .auth_service
        .login(&body.email, &body.password)
        .await?;

    Ok(Json(LoginResponse {
        message: "Login successful".to_string(),
        token: outcome.tokens.token,
        refresh_token: outcome.tokens.refresh_token,
        user: LoginUser {
            id: outcome.user.id,
            email: outcome.user.email,
            name: outcome.user.name,
        },
    }))
}

async fn refresh_token(
    State(state): State<Arc<AppState>>,
    Valid(body): Valid<RefreshRequest>,
) -> Result<Json<crate::services::tokens::TokenPair>> {
    Ok(Json(state.auth_service.refresh(&body.refresh_token)?))
}

async fn logout(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> Result<Json<MessageResponse>> {
    state.auth_service.logout(bearer_token(&headers)).await?;
    Ok(MessageResponse::new("Logged out successfully"))
}

#[derive(Serialize)]
pub struct MeResponse {
    pub user: User,
}

async fn me(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
) -> Result<Json<MeResponse>> {
    let profile = state
        .profiles
        .find_by_id(&user.user_id)
        .await?
        .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;

    Ok(Json(MeResponse { user: profile }))
}

// ─── Password Reset ──────────────────────────────────────────

async fn request_password_reset(
    State(state): State<Arc<AppState>>,
    Valid(body): Valid<EmailRequest>,
) -> Result<Json<MessageResponse>> {
    state.auth_service.request_password_reset(&body.email).await?;
    Ok(MessageResponse::new(
        "Password reset email sent. Please check your email.",
    ))
}

/// The bearer token here is the provider's recovery session token from the
/// reset email, not one of our access tokens.
async fn reset_password(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Valid(body): Valid<PasswordResetRequest>,
) -> Result<Json<MessageResponse>> {
    let provider_token = bearer_token(&headers).ok_or(AppError::MissingToken)?;

    state
        .auth_service
        .reset_password(provider_token, &body.new_password)
        .await?;
    Ok(MessageResponse::new("Password reset successful"))
}

// ─── Email Verification ──────────────────────────────────────

#[derive(Serialize)]
pub struct VerifyEmailResponse {
    pub message: String,
    pub user: Option<ProviderUser>,
}

async fn verify_email(
    State(state): State<Arc<AppState>>,
    Valid(body): Valid<VerifyEmailRequest>,
) -> Result<Json<VerifyEmailResponse>> {
    let user = state
        .auth_service
        .verify_email(&body.token, body.otp_type(), body.email.as_deref())
        .await?;

    Ok(Json(VerifyEmailResponse {
        message: "Email verified successfully".to_string(),
        user,
    }))
}

#[derive(Deserialize)]
pub struct CallbackQuery {
    #[serde(default)]
    access_token: Option<String>,
    #[serde(default)]
    refresh_token: Option<String>,
    #[serde(default)]
    error: Option<String>,
    #[serde(default)]
    error_description: Option<String>,
}

#[derive(Serialize)]
pub struct VerifiedUser {
    pub id: String,
    pub email: Option<String>,
    pub email_verified: bool,
}

#[derive(Serialize)]
pub struct CallbackResponse {
    pub message: String,
    pub token: String,
    pub user: VerifiedUser,
}

async fn verification_callback(
    State(state): State<Arc<AppState>>,
    Query(query): Query<CallbackQuery>,
) -> Result<Json<CallbackResponse>> {
    let outcome = state
        .auth_service
        .verification_callback(CallbackParams {
            access_token: query.access_token,
            refresh_token: query.refresh_token,
            error: query.error,
            error_description: query.error_description,
        })
        .await?;

    Ok(Json(CallbackResponse {
        message: "Email verified successfully".to_string(),
        token: outcome.token,
        user: VerifiedUser {
            id: outcome.user.id,
            email: outcome.user.email,
            email_verified: true,
        },
    }))
}

async fn resend_verification(
    State(state): State<Arc<AppState>>,
    Valid(body): Valid<EmailRequest>,
) -> Result<Json<MessageResponse>> {
    state.auth_service.resend_verification(&body.email).await?;
    Ok(MessageResponse::new(
        "Verification email sent successfully. Please check your email.",
    ))
}
