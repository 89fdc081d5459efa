// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! `ProfileStore` over the platform's PostgREST table API.

use crate::db::{tables, ProfileStore};
use crate::error::{PlatformError, PlatformErrorKind};
use crate::models::{NewProfile, ProfileChanges, User};
use crate::services::supabase::SupabaseClient;
use crate::time_utils::now_rfc3339;
use async_trait::async_trait;
use reqwest::Method;

const RETURN_REPRESENTATION: (&str, &str) = ("Prefer", "return=representation");

impl SupabaseClient {
    /// Select at most one row where `column` equals `value`.
    async fn select_one(&self, column: &str, value: &str) -> Result<Option<User>, PlatformError> {
        let request = self
            .privileged(Method::GET, &self.rest_url(tables::USERS))
            .query(&[
                ("select", "*".to_string()),
                (column, format!("eq.{}", value)),
                ("limit", "1".to_string()),
            ]);

        let rows: Vec<User> = self.send_json(request).await?;
        Ok(rows.into_iter().next())
    }
}

fn single_row(rows: Vec<User>, id: &str) -> Result<User, PlatformError> {
    rows.into_iter().next().ok_or_else(|| {
        PlatformError::new(
            PlatformErrorKind::NotFound,
            format!("User profile {} not found", id),
        )
    })
}

#[async_trait]
impl ProfileStore for SupabaseClient {
    async fn find_by_id(&self, id: &str) -> Result<Option<User>, PlatformError> {
        self.select_one("id", id).await
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, PlatformError> {
        self.select_one("email", email).await
    }

    async fn create(&self, profile: &NewProfile) -> Result<User, PlatformError> {
        let request = self
            .privileged(Method::POST, &self.rest_url(tables::USERS))
            .header(RETURN_REPRESENTATION.0, RETURN_REPRESENTATION.1)
            .json(&[profile]);

        let rows: Vec<User> = self.send_json(request).await?;
        tracing::info!(user_id = %profile.id, "Created user profile");
        single_row(rows, &profile.id)
    }

    async fn update(&self, id: &str, changes: &ProfileChanges) -> Result<User, PlatformError> {
        let stamped = ProfileChanges {
            updated_at: Some(now_rfc3339()),
            ..changes.clone()
        };

        let request = self
            .privileged(Method::PATCH, &self.rest_url(tables::USERS))
            .query(&[("id", format!("eq.{}", id))])
            .header(RETURN_REPRESENTATION.0, RETURN_REPRESENTATION.1)
            .json(&stamped);

        let rows: Vec<User> = self.send_json(request).await?;
        single_row(rows, id)
    }

    async fn delete(&self, id: &str) -> Result<(), PlatformError> {
        let request = self
            .privileged(Method::DELETE, &self.rest_url(tables::USERS))
            .query(&[("id", format!("eq.{}", id))]);

        self.send(request).await?;
        tracing::info!(user_id = id, "Deleted user profile");
        Ok(())
    }
}
