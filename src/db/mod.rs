// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Database layer: profile rows in the hosted relational store.

pub mod postgrest;

use crate::error::PlatformError;
use crate::models::{NewProfile, ProfileChanges, User};
use async_trait::async_trait;

/// Table names as constants.
pub mod tables {
    pub const USERS: &str = "users";
}

/// Single-row operations on the `users` relation.
#[async_trait]
pub trait ProfileStore: Send + Sync {
    async fn find_by_id(&self, id: &str) -> Result<Option<User>, PlatformError>;

    /// `None` when no row has this email.
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, PlatformError>;

    async fn create(&self, profile: &NewProfile) -> Result<User, PlatformError>;

    /// Apply only the fields set in `changes` and stamp `updated_at`.
    async fn update(&self, id: &str, changes: &ProfileChanges) -> Result<User, PlatformError>;

    async fn delete(&self, id: &str) -> Result<(), PlatformError>;
}
