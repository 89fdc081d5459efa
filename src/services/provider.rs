// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Contracts for the hosted auth provider and object storage.

use crate::error::PlatformError;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// User record as the auth provider reports it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProviderUser {
    pub id: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub email_confirmed_at: Option<String>,
}

impl ProviderUser {
    pub fn is_confirmed(&self) -> bool {
        self.email_confirmed_at.is_some()
    }
}

/// Provider session returned by a password sign-in.
#[derive(Debug, Clone, Deserialize)]
pub struct ProviderSession {
    pub access_token: String,
    #[serde(default)]
    pub refresh_token: Option<String>,
    pub user: ProviderUser,
}

/// OTP verification input.
#[derive(Debug, Clone)]
pub struct OtpVerification<'a> {
    pub token: &'a str,
    pub otp_type: &'a str,
    pub email: Option<&'a str>,
}

/// Credential, session and verification-email operations.
#[async_trait]
pub trait AuthProvider: Send + Sync {
    /// Create an account; the confirmation email links to `redirect_to`.
    async fn sign_up(
        &self,
        email: &str,
        password: &str,
        redirect_to: &str,
    ) -> Result<ProviderUser, PlatformError>;

    async fn sign_in_with_password(
        &self,
        email: &str,
        password: &str,
    ) -> Result<ProviderSession, PlatformError>;

    /// End the provider session identified by `access_token`. Sessions that
    /// are already gone are not an error.
    async fn sign_out(&self, access_token: &str) -> Result<(), PlatformError>;

    async fn send_password_reset(&self, email: &str) -> Result<(), PlatformError>;

    /// Change the password of the session owner.
    async fn update_password(
        &self,
        access_token: &str,
        new_password: &str,
    ) -> Result<ProviderUser, PlatformError>;

    /// `None` when the provider verified the code but returned no user.
    async fn verify_otp(
        &self,
        otp: OtpVerification<'_>,
    ) -> Result<Option<ProviderUser>, PlatformError>;

    async fn resend_signup_confirmation(
        &self,
        email: &str,
        redirect_to: &str,
    ) -> Result<(), PlatformError>;

    /// Resolve the user behind a provider access token.
    async fn session_user(&self, access_token: &str) -> Result<ProviderUser, PlatformError>;

    /// Privileged lookup by id.
    async fn admin_get_user(&self, id: &str) -> Result<ProviderUser, PlatformError>;

    /// Privileged account removal.
    async fn admin_delete_user(&self, id: &str) -> Result<(), PlatformError>;
}

/// Public-bucket file storage.
#[async_trait]
pub trait ObjectStorage: Send + Sync {
    async fn upload(
        &self,
        path: &str,
        bytes: Vec<u8>,
        content_type: &str,
    ) -> Result<(), PlatformError>;

    /// Public URL under which an uploaded object is served.
    fn public_url(&self, path: &str) -> String;
}
