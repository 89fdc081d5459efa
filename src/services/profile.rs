// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Profile reads, updates, account deletion and picture uploads.

use crate::db::ProfileStore;
use crate::error::{AppError, Result};
use crate::models::{ProfileChanges, User};
use crate::services::provider::{AuthProvider, ObjectStorage};
use base64::{engine::general_purpose::STANDARD, Engine as _};
use std::sync::Arc;

const DEFAULT_IMAGE_CONTENT_TYPE: &str = "image/jpeg";

/// Decoded picture upload.
#[derive(Debug, Clone)]
pub struct PictureUpload {
    pub base64: String,
    pub filename: String,
    pub content_type: Option<String>,
}

#[derive(Clone)]
pub struct ProfileService {
    provider: Arc<dyn AuthProvider>,
    profiles: Arc<dyn ProfileStore>,
    storage: Arc<dyn ObjectStorage>,
}

impl ProfileService {
    pub fn new(
        provider: Arc<dyn AuthProvider>,
        profiles: Arc<dyn ProfileStore>,
        storage: Arc<dyn ObjectStorage>,
    ) -> Self {
        Self {
            provider,
            profiles,
            storage,
        }
    }

    pub async fn get(&self, user_id: &str) -> Result<User> {
        self.profiles
            .find_by_id(user_id)
            .await?
            .ok_or_else(|| AppError::NotFound("User profile not found".to_string()))
    }

    pub async fn update(&self, user_id: &str, changes: ProfileChanges) -> Result<User> {
        let user = self.profiles.update(user_id, &changes).await?;
        tracing::info!(user_id, "Profile updated");
        Ok(user)
    }

    /// Remove the provider account, then the profile row. The two steps are
    /// not atomic; a failure in the second leaves an orphaned profile row.
    pub async fn delete_account(&self, user_id: &str) -> Result<()> {
        self.provider.admin_delete_user(user_id).await?;

        if let Err(e) = self.profiles.delete(user_id).await {
            tracing::error!(
                user_id,
                error = %e,
                "Provider account deleted but profile row removal failed"
            );
            return Err(e.into());
        }

        tracing::info!(user_id, "Account deleted");
        Ok(())
    }

    /// Store a new picture and point `avatar_url` at it. Returns the public URL.
    pub async fn upload_picture(&self, user_id: &str, upload: PictureUpload) -> Result<String> {
        let bytes = STANDARD
            .decode(strip_data_url_prefix(&upload.base64))
            .map_err(|_| AppError::BadRequest("Image data is not valid base64".to_string()))?;

        let filename = upload.filename.replace('/', "_");
        let path = format!(
            "profile-pictures/{}/{}-{}",
            user_id,
            chrono::Utc::now().timestamp_millis(),
            filename
        );
        let content_type = upload
            .content_type
            .as_deref()
            .unwrap_or(DEFAULT_IMAGE_CONTENT_TYPE);

        self.storage.upload(&path, bytes, content_type).await?;
        let public_url = self.storage.public_url(&path);

        self.profiles
            .update(user_id, &ProfileChanges::avatar(public_url.clone()))
            .await?;

        tracing::info!(user_id, path = %path, "Profile picture uploaded");
        Ok(public_url)
    }
}

/// Browsers often send `data:image/png;base64,....`; keep only the payload.
fn strip_data_url_prefix(data: &str) -> &str {
    match data.split_once(";base64,") {
        Some((prefix, payload)) if prefix.starts_with("data:") => payload,
        _ => data,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strip_data_url_prefix() {
        assert_eq!(strip_data_url_prefix("data:image/png;base64,AAAA"), "AAAA");
        assert_eq!(strip_data_url_prefix("AAAA"), "AAAA");
    }
}
