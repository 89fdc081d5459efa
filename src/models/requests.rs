// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Request bodies and the field rules that guard them.

use crate::models::user::{ProfileChanges, USER_SCHEMA};
use crate::validation::{FieldRule, Mode};
use serde::de::DeserializeOwned;
use serde::Deserialize;

/// A JSON body that is checked against a rule table before it is
/// deserialized.
pub trait Schema: DeserializeOwned {
    const RULES: &'static [FieldRule];
    const MODE: Mode = Mode::Full;
}

pub const OTP_TYPES: &[&str] = &["signup", "recovery", "email_change"];

#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub email: String,
    pub password: String,
    pub name: String,
}

impl Schema for RegisterRequest {
    const RULES: &'static [FieldRule] = &[
        FieldRule::string("email").required().email(),
        FieldRule::string("password").required().min(6),
        FieldRule::string("name").required().min(2).max(100),
    ];
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

impl Schema for LoginRequest {
    const RULES: &'static [FieldRule] = &[
        FieldRule::string("email").required(),
        FieldRule::string("password").required(),
    ];
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RefreshRequest {
    pub refresh_token: String,
}

impl Schema for RefreshRequest {
    const RULES: &'static [FieldRule] = &[FieldRule::string("refreshToken").required()];
}

/// Body for endpoints that only take an email address.
#[derive(Debug, Deserialize)]
pub struct EmailRequest {
    pub email: String,
}

impl Schema for EmailRequest {
    const RULES: &'static [FieldRule] = &[FieldRule::string("email").required().email()];
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PasswordResetRequest {
    pub new_password: String,
}

impl Schema for PasswordResetRequest {
    const RULES: &'static [FieldRule] = &[FieldRule::string("newPassword").required().min(6)];
}

#[derive(Debug, Deserialize)]
pub struct VerifyEmailRequest {
    pub token: String,
    #[serde(default, rename = "type")]
    pub otp_type: Option<String>,
    /// Needed by the provider for six-digit codes; hashed tokens work without it.
    #[serde(default)]
    pub email: Option<String>,
}

impl VerifyEmailRequest {
    pub fn otp_type(&self) -> &str {
        self.otp_type.as_deref().unwrap_or("signup")
    }
}

impl Schema for VerifyEmailRequest {
    const RULES: &'static [FieldRule] = &[
        FieldRule::string("token").required(),
        FieldRule::string("type").one_of(OTP_TYPES),
        FieldRule::string("email").email(),
    ];
}

/// Profile updates are checked against the full user rules in partial mode;
/// only the editable fields are then kept.
#[derive(Debug, Deserialize)]
pub struct ProfileUpdateRequest {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub bio: Option<String>,
    #[serde(default)]
    pub avatar_url: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub address: Option<String>,
}

impl Schema for ProfileUpdateRequest {
    const RULES: &'static [FieldRule] = USER_SCHEMA;
    const MODE: Mode = Mode::Partial;
}

impl From<ProfileUpdateRequest> for ProfileChanges {
    fn from(req: ProfileUpdateRequest) -> Self {
        Self {
            name: req.name,
            bio: req.bio,
            avatar_url: req.avatar_url,
            phone: req.phone,
            address: req.address,
            ..Default::default()
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct UploadPictureRequest {
    #[serde(default)]
    pub image: Option<ImagePayload>,
}

/// Presence of the image fields is checked by the handler so that a missing
/// image gets its own message.
impl Schema for UploadPictureRequest {
    const RULES: &'static [FieldRule] = &[];
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImagePayload {
    #[serde(default)]
    pub base64_string: Option<String>,
    #[serde(default)]
    pub filename: Option<String>,
    #[serde(default)]
    pub content_type: Option<String>,
}
