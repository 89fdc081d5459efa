// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Auth service: a REST front end over a hosted auth provider, relational
//! store and object storage.
//!
//! This crate provides registration, login, token refresh, password reset,
//! email verification and profile management. Credentials, sessions, rows
//! and files all live on the hosted platform; this service validates input,
//! issues its own short-lived tokens and keeps the profile row in step with
//! the provider account.

pub mod config;
pub mod db;
pub mod error;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;
pub mod time_utils;
pub mod validation;

use config::Config;
use db::ProfileStore;
use services::{AuthProvider, AuthService, ObjectStorage, ProfileService, TokenService};
use std::sync::Arc;

/// Handles to the hosted platform, built once at startup.
#[derive(Clone)]
pub struct Platform {
    pub auth: Arc<dyn AuthProvider>,
    pub profiles: Arc<dyn ProfileStore>,
    pub storage: Arc<dyn ObjectStorage>,
}

impl Platform {
    /// All three concerns served by one Supabase client.
    pub fn supabase(config: &Config) -> Self {
        let client = Arc::new(services::SupabaseClient::from_config(config));
        Self {
            auth: client.clone(),
            profiles: client.clone(),
            storage: client,
        }
    }
}

/// Shared application state.
pub struct AppState {
    pub tokens: TokenService,
    pub profiles: Arc<dyn ProfileStore>,
    pub auth_service: AuthService,
    pub profile_service: ProfileService,
}

impl AppState {
    pub fn new(config: &Config, platform: Platform) -> Self {
        let tokens = TokenService::new(&config.jwt_secret, &config.jwt_refresh_secret);

        let auth_service = AuthService::new(
            platform.auth.clone(),
            platform.profiles.clone(),
            tokens.clone(),
            config.email_verify_callback_url.clone(),
        );
        let profile_service = ProfileService::new(
            platform.auth,
            platform.profiles.clone(),
            platform.storage,
        );

        Self {
            tokens,
            profiles: platform.profiles,
            auth_service,
            profile_service,
        }
    }
}
