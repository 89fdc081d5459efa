// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Account flows that pair the external auth provider with the local
//! profile row.
//!
//! Each flow is a short linear sequence. Multi-step flows are not
//! compensated: if the provider account is created but the profile insert
//! fails, the provider account stays behind.

use crate::db::ProfileStore;
use crate::error::{AppError, PlatformErrorKind, Result};
use crate::models::{NewProfile, ProfileChanges, Role, User};
use crate::services::provider::{AuthProvider, OtpVerification, ProviderUser};
use crate::services::tokens::{TokenPair, TokenPayload, TokenService};
use crate::time_utils::now_rfc3339;
use axum::http::StatusCode;
use std::sync::Arc;

/// Result of a successful password login.
#[derive(Debug, Clone)]
pub struct LoginOutcome {
    pub tokens: TokenPair,
    pub user: User,
}

/// Result of a successful verification callback.
#[derive(Debug, Clone)]
pub struct CallbackOutcome {
    pub token: String,
    pub user: ProviderUser,
}

/// Query parameters the provider appends to the verification redirect.
#[derive(Debug, Clone, Default)]
pub struct CallbackParams {
    pub access_token: Option<String>,
    pub refresh_token: Option<String>,
    pub error: Option<String>,
    pub error_description: Option<String>,
}

/// Registration, login, token refresh, password reset and email
/// verification.
#[derive(Clone)]
pub struct AuthService {
    provider: Arc<dyn AuthProvider>,
    profiles: Arc<dyn ProfileStore>,
    tokens: TokenService,
    verify_callback_url: String,
}

impl AuthService {
    pub fn new(
        provider: Arc<dyn AuthProvider>,
        profiles: Arc<dyn ProfileStore>,
        tokens: TokenService,
        verify_callback_url: String,
    ) -> Self {
        Self {
            provider,
            profiles,
            tokens,
            verify_callback_url,
        }
    }

    /// Create the provider account and its profile row. Returns the new id.
    pub async fn register(&self, email: &str, password: &str, name: &str) -> Result<String> {
        if self.profiles.find_by_email(email).await?.is_some() {
            return Err(AppError::Conflict(
                "User already exists with this email".to_string(),
            ));
        }

        let provider_user = self
            .provider
            .sign_up(email, password, &self.verify_callback_url)
            .await?;

        let profile = NewProfile {
            id: provider_user.id.clone(),
            email: email.to_string(),
            name: name.to_string(),
            role: Role::User,
            created_at: now_rfc3339(),
        };

        if let Err(e) = self.profiles.create(&profile).await {
            tracing::error!(
                user_id = %provider_user.id,
                error = %e,
                "Profile insert failed after provider sign-up; provider account left in place"
            );
            return Err(e.into());
        }

        tracing::info!(user_id = %provider_user.id, "User registered");
        Ok(provider_user.id)
    }

    pub async fn login(&self, email: &str, password: &str) -> Result<LoginOutcome> {
        let session = self.provider.sign_in_with_password(email, password).await?;

        let user = self
            .profiles
            .find_by_id(&session.user.id)
            .await?
            .ok_or_else(|| AppError::NotFound("User profile not found".to_string()))?;

        let payload = TokenPayload {
            user_id: session.user.id.clone(),
            email: session.user.email.clone().unwrap_or_else(|| user.email.clone()),
        };
        let tokens = self.tokens.issue_pair(&payload).map_err(anyhow::Error::from)?;

        tracing::info!(user_id = %user.id, "User logged in");
        Ok(LoginOutcome { tokens, user })
    }

    /// Rotate both tokens. The presented refresh token is not revoked.
    pub fn refresh(&self, refresh_token: &str) -> Result<TokenPair> {
        let payload = self
            .tokens
            .verify_refresh(refresh_token)
            .map_err(|_| AppError::InvalidRefreshToken)?;

        Ok(self.tokens.issue_pair(&payload).map_err(anyhow::Error::from)?)
    }

    /// End the provider session, if the caller presented one. Tokens issued
    /// by this service stay valid until they expire.
    pub async fn logout(&self, provider_token: Option<&str>) -> Result<()> {
        if let Some(token) = provider_token {
            self.provider.sign_out(token).await?;
        }
        Ok(())
    }

    /// Ask the provider to send a reset email. Unknown addresses are not
    /// reported so callers cannot probe for accounts.
    pub async fn request_password_reset(&self, email: &str) -> Result<()> {
        match self.provider.send_password_reset(email).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind == PlatformErrorKind::NotFound => {
                tracing::debug!("Password reset requested for unknown email");
                Ok(())
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Set a new password using the provider recovery session.
    pub async fn reset_password(&self, provider_token: &str, new_password: &str) -> Result<()> {
        let user = self
            .provider
            .update_password(provider_token, new_password)
            .await?;
        tracing::info!(user_id = %user.id, "Password updated");
        Ok(())
    }

    /// Confirm an emailed OTP and mark the profile verified.
    pub async fn verify_email(
        &self,
        token: &str,
        otp_type: &str,
        email: Option<&str>,
    ) -> Result<Option<ProviderUser>> {
        let verified = self
            .provider
            .verify_otp(OtpVerification {
                token,
                otp_type,
                email,
            })
            .await
            .map_err(|e| {
                let message = e.message.to_lowercase();
                if message.contains("expired") || message.contains("invalid") {
                    AppError::OtpExpired
                } else {
                    e.into()
                }
            })?;

        if let Some(user) = &verified {
            self.profiles
                .update(&user.id, &ProfileChanges::email_verified())
                .await?;
            tracing::info!(user_id = %user.id, "Email verified");
        }

        Ok(verified)
    }

    /// Complete the provider's verification redirect and issue an access
    /// token for the verified user.
    pub async fn verification_callback(&self, params: CallbackParams) -> Result<CallbackOutcome> {
        if let Some(code) = params.error {
            return Err(callback_error(code, params.error_description));
        }

        let (Some(access_token), Some(_refresh_token)) =
            (params.access_token, params.refresh_token)
        else {
            return Err(AppError::VerificationLink {
                status: StatusCode::BAD_REQUEST,
                message: "Invalid verification parameters".to_string(),
                code: "MISSING_TOKENS".to_string(),
                description: None,
            });
        };

        let user = self.provider.session_user(&access_token).await?;

        self.profiles
            .update(&user.id, &ProfileChanges::email_verified())
            .await?;

        let email = match &user.email {
            Some(email) => email.clone(),
            None => self
                .profiles
                .find_by_id(&user.id)
                .await?
                .map(|p| p.email)
                .unwrap_or_default(),
        };

        let token = self
            .tokens
            .issue_access(&TokenPayload {
                user_id: user.id.clone(),
                email: email.clone(),
            })
            .map_err(anyhow::Error::from)?;

        tracing::info!(user_id = %user.id, "Email verified via callback");
        Ok(CallbackOutcome {
            token,
            user: ProviderUser {
                email: Some(email),
                ..user
            },
        })
    }

    pub async fn resend_verification(&self, email: &str) -> Result<()> {
        let profile = self
            .profiles
            .find_by_email(email)
            .await?
            .ok_or_else(|| AppError::NotFound("User not found with this email".to_string()))?;

        let provider_user = self.provider.admin_get_user(&profile.id).await?;
        if profile.email_verified || provider_user.is_confirmed() {
            return Err(AppError::BadRequest("Email is already verified".to_string()));
        }

        self.provider
            .resend_signup_confirmation(email, &self.verify_callback_url)
            .await?;
        Ok(())
    }
}

/// Map an `error` / `error_description` pair from the redirect.
fn callback_error(code: String, description: Option<String>) -> AppError {
    let expired = description
        .as_deref()
        .is_some_and(|d| d.to_lowercase().contains("expired"));

    let (status, message) = match code.as_str() {
        "access_denied" if expired => (StatusCode::GONE, "Verification link has expired".to_string()),
        "access_denied" => (
            StatusCode::BAD_REQUEST,
            "Verification link is invalid or has been used".to_string(),
        ),
        _ => (
            StatusCode::BAD_REQUEST,
            description
                .clone()
                .unwrap_or_else(|| "Email verification failed".to_string()),
        ),
    };

    tracing::warn!(code = %code, status = status.as_u16(), "Verification callback rejected");
    AppError::VerificationLink {
        status,
        message,
        code,
        description,
    }
}
