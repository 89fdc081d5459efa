// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! HTTP client for the hosted Supabase platform.
//!
//! Handles:
//! - Auth (GoTrue, `/auth/v1`): sign-up, sign-in, sessions, OTP, admin
//! - Storage (`/storage/v1`): profile picture uploads
//! - Table access (PostgREST, `/rest/v1`): see `db::postgrest`
//!
//! Every non-success response is classified into a [`PlatformError`] here,
//! so nothing above this layer inspects raw upstream payloads.

use crate::config::Config;
use crate::error::{PlatformError, PlatformErrorKind};
use crate::services::provider::{
    AuthProvider, ObjectStorage, OtpVerification, ProviderSession, ProviderUser,
};
use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::json;

/// Bucket holding user uploads.
pub const UPLOADS_BUCKET: &str = "user-uploads";

/// Supabase API client. Cheap to clone; built once at startup.
#[derive(Clone)]
pub struct SupabaseClient {
    http: reqwest::Client,
    base_url: String,
    api_key: String,
    service_key: String,
}

/// Sign-up returns a bare user when email confirmation is pending and a
/// full session otherwise.
#[derive(Deserialize)]
#[serde(untagged)]
enum SignUpResponse {
    Session { user: ProviderUser },
    User(ProviderUser),
}

#[derive(Deserialize)]
struct VerifyResponse {
    #[serde(default)]
    user: Option<ProviderUser>,
}

impl SupabaseClient {
    pub fn new(base_url: &str, api_key: &str, service_key: &str) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
            service_key: service_key.to_string(),
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(
            &config.supabase_url,
            &config.supabase_api_key,
            &config.supabase_service_key,
        )
    }

    fn auth_url(&self, path: &str) -> String {
        format!("{}/auth/v1{}", self.base_url, path)
    }

    pub(crate) fn rest_url(&self, table: &str) -> String {
        format!("{}/rest/v1/{}", self.base_url, table)
    }

    /// Request authenticated with the public key, acting as an end user.
    fn public(&self, method: reqwest::Method, url: &str) -> reqwest::RequestBuilder {
        self.http
            .request(method, url)
            .header("apikey", &self.api_key)
    }

    /// Request authenticated with the privileged key.
    pub(crate) fn privileged(&self, method: reqwest::Method, url: &str) -> reqwest::RequestBuilder {
        self.http
            .request(method, url)
            .header("apikey", &self.service_key)
            .bearer_auth(&self.service_key)
    }

    /// Send a request and fail on any non-success status.
    pub(crate) async fn send(
        &self,
        request: reqwest::RequestBuilder,
    ) -> Result<reqwest::Response, PlatformError> {
        let response = request.send().await?;

        if response.status().is_success() {
            return Ok(response);
        }

        let status = response.status().as_u16();
        let body = response.text().await.unwrap_or_default();
        let err = PlatformError::from_response(status, &body);

        if err.kind == PlatformErrorKind::RateLimited {
            tracing::warn!("Platform rate limit hit (429)");
        } else {
            tracing::debug!(status, kind = ?err.kind, message = %err.message, "Platform call failed");
        }

        Err(err)
    }

    /// Send a request and parse the JSON body.
    pub(crate) async fn send_json<T: DeserializeOwned>(
        &self,
        request: reqwest::RequestBuilder,
    ) -> Result<T, PlatformError> {
        self.send(request)
            .await?
            .json()
            .await
            .map_err(|e| PlatformError::unexpected(format!("JSON parse error: {}", e)))
    }

    fn object_path(path: &str) -> String {
        path.split('/')
            .map(|segment| urlencoding::encode(segment).into_owned())
            .collect::<Vec<_>>()
            .join("/")
    }
}

#[async_trait]
impl AuthProvider for SupabaseClient {
    async fn sign_up(
        &self,
        email: &str,
        password: &str,
        redirect_to: &str,
    ) -> Result<ProviderUser, PlatformError> {
        let request = self
            .public(reqwest::Method::POST, &self.auth_url("/signup"))
            .query(&[("redirect_to", redirect_to)])
            .json(&json!({ "email": email, "password": password }));

        match self.send_json(request).await? {
            SignUpResponse::Session { user } | SignUpResponse::User(user) => Ok(user),
        }
    }

    async fn sign_in_with_password(
        &self,
        email: &str,
        password: &str,
    ) -> Result<ProviderSession, PlatformError> {
        let request = self
            .public(reqwest::Method::POST, &self.auth_url("/token"))
            .query(&[("grant_type", "password")])
            .json(&json!({ "email": email, "password": password }));

        self.send_json(request).await
    }

    async fn sign_out(&self, access_token: &str) -> Result<(), PlatformError> {
        let request = self
            .public(reqwest::Method::POST, &self.auth_url("/logout"))
            .bearer_auth(access_token);

        match self.send(request).await {
            Ok(_) => Ok(()),
            Err(err)
                if matches!(
                    err.kind,
                    PlatformErrorKind::Unauthorized
                        | PlatformErrorKind::Forbidden
                        | PlatformErrorKind::NotFound
                ) =>
            {
                tracing::debug!(error = %err.message, "Provider session already ended");
                Ok(())
            }
            Err(err) => Err(err),
        }
    }

    async fn send_password_reset(&self, email: &str) -> Result<(), PlatformError> {
        let request = self
            .public(reqwest::Method::POST, &self.auth_url("/recover"))
            .json(&json!({ "email": email }));

        self.send(request).await?;
        Ok(())
    }

    async fn update_password(
        &self,
        access_token: &str,
        new_password: &str,
    ) -> Result<ProviderUser, PlatformError> {
        let request = self
            .public(reqwest::Method::PUT, &self.auth_url("/user"))
            .bearer_auth(access_token)
            .json(&json!({ "password": new_password }));

        self.send_json(request).await
    }

    async fn verify_otp(
        &self,
        otp: OtpVerification<'_>,
    ) -> Result<Option<ProviderUser>, PlatformError> {
        let body = match otp.email {
            Some(email) => json!({ "type": otp.otp_type, "token": otp.token, "email": email }),
            None => json!({ "type": otp.otp_type, "token_hash": otp.token }),
        };
        let request = self
            .public(reqwest::Method::POST, &self.auth_url("/verify"))
            .json(&body);

        let response: VerifyResponse = self.send_json(request).await?;
        Ok(response.user)
    }

    async fn resend_signup_confirmation(
        &self,
        email: &str,
        redirect_to: &str,
    ) -> Result<(), PlatformError> {
        let request = self
            .public(reqwest::Method::POST, &self.auth_url("/resend"))
            .query(&[("redirect_to", redirect_to)])
            .json(&json!({ "type": "signup", "email": email }));

        self.send(request).await?;
        Ok(())
    }

    async fn session_user(&self, access_token: &str) -> Result<ProviderUser, PlatformError> {
        let request = self
            .public(reqwest::Method::GET, &self.auth_url("/user"))
            .bearer_auth(access_token);

        self.send_json(request).await
    }

    async fn admin_get_user(&self, id: &str) -> Result<ProviderUser, PlatformError> {
        let url = self.auth_url(&format!("/admin/users/{}", urlencoding::encode(id)));
        self.send_json(self.privileged(reqwest::Method::GET, &url))
            .await
    }

    async fn admin_delete_user(&self, id: &str) -> Result<(), PlatformError> {
        let url = self.auth_url(&format!("/admin/users/{}", urlencoding::encode(id)));
        self.send(self.privileged(reqwest::Method::DELETE, &url))
            .await?;
        Ok(())
    }
}

#[async_trait]
impl ObjectStorage for SupabaseClient {
    async fn upload(
        &self,
        path: &str,
        bytes: Vec<u8>,
        content_type: &str,
    ) -> Result<(), PlatformError> {
        let url = format!(
            "{}/storage/v1/object/{}/{}",
            self.base_url,
            UPLOADS_BUCKET,
            Self::object_path(path)
        );
        let request = self
            .privileged(reqwest::Method::POST, &url)
            .header(reqwest::header::CONTENT_TYPE, content_type)
            .body(bytes);

        self.send(request).await?;
        tracing::info!(path, "Uploaded object");
        Ok(())
    }

    fn public_url(&self, path: &str) -> String {
        format!(
            "{}/storage/v1/object/public/{}/{}",
            self.base_url,
            UPLOADS_BUCKET,
            Self::object_path(path)
        )
    }
}
