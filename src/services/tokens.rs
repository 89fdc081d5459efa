// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Access and refresh token issuance and verification.
//!
//! Both token kinds are HS256 JWTs carrying the same identity claims. They
//! are signed with independent secrets, so a refresh token never verifies as
//! an access token and vice versa.

use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

/// Access tokens live for one hour.
pub const ACCESS_TOKEN_TTL_SECS: i64 = 60 * 60;
/// Refresh tokens live for three days.
pub const REFRESH_TOKEN_TTL_SECS: i64 = 3 * 24 * 60 * 60;

/// Identity carried by both token kinds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenPayload {
    #[serde(rename = "userId")]
    pub user_id: String,
    pub email: String,
}

/// JWT claims structure.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    #[serde(flatten)]
    pub payload: TokenPayload,
    /// Expiration time (Unix timestamp)
    pub exp: i64,
    /// Issued at (Unix timestamp)
    pub iat: i64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    Access,
    Refresh,
}

impl TokenKind {
    pub fn ttl_secs(self) -> i64 {
        match self {
            TokenKind::Access => ACCESS_TOKEN_TTL_SECS,
            TokenKind::Refresh => REFRESH_TOKEN_TTL_SECS,
        }
    }
}

/// Signature mismatch, malformed token and expiry are deliberately not
/// distinguished.
#[derive(Debug, thiserror::Error)]
pub enum TokenError {
    #[error("invalid or expired token")]
    Invalid,
    #[error("failed to sign token: {0}")]
    Signing(#[from] jsonwebtoken::errors::Error),
}

/// A freshly issued access/refresh pair.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenPair {
    pub token: String,
    pub refresh_token: String,
}

/// Signs and verifies this service's own tokens.
#[derive(Clone)]
pub struct TokenService {
    access_secret: Vec<u8>,
    refresh_secret: Vec<u8>,
}

impl TokenService {
    pub fn new(access_secret: &[u8], refresh_secret: &[u8]) -> Self {
        Self {
            access_secret: access_secret.to_vec(),
            refresh_secret: refresh_secret.to_vec(),
        }
    }

    pub fn issue_access(&self, payload: &TokenPayload) -> Result<String, TokenError> {
        self.sign(TokenKind::Access, payload, now())
    }

    pub fn issue_refresh(&self, payload: &TokenPayload) -> Result<String, TokenError> {
        self.sign(TokenKind::Refresh, payload, now())
    }

    pub fn issue_pair(&self, payload: &TokenPayload) -> Result<TokenPair, TokenError> {
        Ok(TokenPair {
            token: self.issue_access(payload)?,
            refresh_token: self.issue_refresh(payload)?,
        })
    }

    pub fn verify_access(&self, token: &str) -> Result<TokenPayload, TokenError> {
        self.verify(TokenKind::Access, token)
    }

    pub fn verify_refresh(&self, token: &str) -> Result<TokenPayload, TokenError> {
        self.verify(TokenKind::Refresh, token)
    }

    /// Sign a token as if it had been issued at `issued_at` (Unix seconds).
    pub fn sign(
        &self,
        kind: TokenKind,
        payload: &TokenPayload,
        issued_at: i64,
    ) -> Result<String, TokenError> {
        let claims = Claims {
            payload: payload.clone(),
            iat: issued_at,
            exp: issued_at + kind.ttl_secs(),
        };

        Ok(encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &EncodingKey::from_secret(self.secret(kind)),
        )?)
    }

    fn verify(&self, kind: TokenKind, token: &str) -> Result<TokenPayload, TokenError> {
        let key = DecodingKey::from_secret(self.secret(kind));
        let mut validation = Validation::new(Algorithm::HS256);
        // No clock tolerance: a token is dead the second its `exp` passes.
        validation.leeway = 0;

        decode::<Claims>(token, &key, &validation)
            .map(|data| data.claims.payload)
            .map_err(|e| {
                tracing::debug!(?kind, error = %e, "Token verification failed");
                TokenError::Invalid
            })
    }

    fn secret(&self, kind: TokenKind) -> &[u8] {
        match kind {
            TokenKind::Access => &self.access_secret,
            TokenKind::Refresh => &self.refresh_secret,
        }
    }
}

fn now() -> i64 {
    chrono::Utc::now().timestamp()
}
