// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Application configuration loaded from environment variables.
//!
//! Values are read once at startup and shared read-only for the lifetime
//! of the process.

use std::env;

const DEFAULT_PORT: u16 = 3000;
const DEFAULT_CALLBACK_URL: &str = "http://localhost:3000/api/auth/verify-email/callback";

/// Application configuration, loaded once at startup.
#[derive(Debug, Clone)]
pub struct Config {
    // --- Platform ---
    /// Base URL of the hosted platform (e.g. `https://xyz.supabase.co`)
    pub supabase_url: String,
    /// Public (anon) API key, used for end-user auth calls
    pub supabase_api_key: String,
    /// Privileged (service role) key, used for table, storage and admin calls
    pub supabase_service_key: String,

    // --- Token signing ---
    /// HS256 secret for access tokens
    pub jwt_secret: Vec<u8>,
    /// HS256 secret for refresh tokens (must differ from `jwt_secret`)
    pub jwt_refresh_secret: Vec<u8>,

    // --- Server ---
    pub port: u16,
    /// Where the provider redirects after a user clicks the verification link
    pub email_verify_callback_url: String,
    /// Deployment environment name (`development`, `production`, ...)
    pub environment: String,
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// A `.env` file in the working directory is honoured for local
    /// development.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let supabase_api_key = required("SUPABASE_API_KEY")?;
        let supabase_service_key = match env::var("SUPABASE_SERVICE_ROLE_KEY") {
            Ok(key) if !key.trim().is_empty() => key.trim().to_string(),
            _ => supabase_api_key.clone(),
        };

        Ok(Self {
            supabase_url: required("SUPABASE_URL")?
                .trim_end_matches('/')
                .to_string(),
            supabase_api_key,
            supabase_service_key,
            jwt_secret: required("JWT_SECRET")?.into_bytes(),
            jwt_refresh_secret: required("JWT_REFRESH_SECRET")?.into_bytes(),
            port: env::var("PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(DEFAULT_PORT),
            email_verify_callback_url: env::var("EMAIL_VERIFY_CALLBACK_URL")
                .unwrap_or_else(|_| DEFAULT_CALLBACK_URL.to_string()),
            environment: env::var("APP_ENV").unwrap_or_else(|_| "development".to_string()),
        })
    }

    /// Fixed configuration for tests.
    pub fn test_default() -> Self {
        Self {
            supabase_url: "http://localhost:54321".to_string(),
            supabase_api_key: "test_anon_key".to_string(),
            supabase_service_key: "test_service_key".to_string(),
            jwt_secret: b"test_access_secret_32_bytes_min!".to_vec(),
            jwt_refresh_secret: b"test_refresh_secret_32_bytes_mn!".to_vec(),
            port: DEFAULT_PORT,
            email_verify_callback_url: DEFAULT_CALLBACK_URL.to_string(),
            environment: "test".to_string(),
        }
    }

    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }
}

fn required(name: &'static str) -> Result<String, ConfigError> {
    env::var(name)
        .map(|v| v.trim().to_string())
        .ok()
        .filter(|v| !v.is_empty())
        .ok_or(ConfigError::Missing(name))
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    Missing(&'static str),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_from_env() {
        env::set_var("SUPABASE_URL", "https://project.supabase.co/");
        env::set_var("SUPABASE_API_KEY", "anon");
        env::set_var("SUPABASE_SERVICE_ROLE_KEY", "service");
        env::set_var("JWT_SECRET", "access_secret");
        env::set_var("JWT_REFRESH_SECRET", "refresh_secret");
        env::remove_var("PORT");

        let config = Config::from_env().expect("Config should load");

        assert_eq!(config.supabase_url, "https://project.supabase.co");
        assert_eq!(config.supabase_api_key, "anon");
        assert_eq!(config.supabase_service_key, "service");
        assert_eq!(config.jwt_secret, b"access_secret");
        assert_eq!(config.port, 3000);
        assert!(config.email_verify_callback_url.ends_with("/verify-email/callback"));
    }

    #[test]
    fn test_test_default_uses_distinct_secrets() {
        let config = Config::test_default();
        assert_ne!(config.jwt_secret, config.jwt_refresh_secret);
        assert!(!config.is_production());
    }

    #[test]
    fn test_production_environment() {
        let config = Config {
            environment: "production".to_string(),
            ..Config::test_default()
        };
        assert!(config.is_production());
    }
}
