// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Profile routes under `/api/users` (require authentication).

use crate::error::{AppError, Result};
use crate::middleware::{AuthUser, Valid};
use crate::models::requests::{ProfileUpdateRequest, UploadPictureRequest};
use crate::models::User;
use crate::services::profile::PictureUpload;
use crate::AppState;
use axum::{
    extract::{Path, State},
    routing::{get, post},
    Extension, Json, Router,
};
use serde::Serialize;
use std::sync::Arc;

/// The auth middleware is applied in routes/mod.rs for these routes.
pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route(
            "/api/users/profile",
            get(get_own_profile)
                .put(update_profile)
                .delete(delete_profile),
        )
        .route("/api/users/profile/{user_id}", get(get_profile))
        .route("/api/users/profile/upload-picture", post(upload_picture))
}

#[derive(Serialize)]
pub struct ProfileResponse {
    pub profile: User,
}

async fn get_own_profile(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
) -> Result<Json<ProfileResponse>> {
    let profile = state.profile_service.get(&user.user_id).await?;
    Ok(Json(ProfileResponse { profile }))
}

async fn get_profile(
    State(state): State<Arc<AppState>>,
    Path(user_id): Path<String>,
) -> Result<Json<ProfileResponse>> {
    let profile = state.profile_service.get(&user_id).await?;
    Ok(Json(ProfileResponse { profile }))
}

#[derive(Serialize)]
pub struct UpdateProfileResponse {
    pub message: String,
    pub profile: User,
}

async fn update_profile(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Valid(body): Valid<ProfileUpdateRequest>,
) -> Result<Json<UpdateProfileResponse>> {
    let profile = state
        .profile_service
        .update(&user.user_id, body.into())
        .await?;

    Ok(Json(UpdateProfileResponse {
        message: "Profile updated successfully".to_string(),
        profile,
    }))
}

#[derive(Serialize)]
pub struct DeleteProfileResponse {
    pub message: String,
}

async fn delete_profile(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
) -> Result<Json<DeleteProfileResponse>> {
    tracing::info!(user_id = %user.user_id, "User-initiated account deletion");
    state.profile_service.delete_account(&user.user_id).await?;

    Ok(Json(DeleteProfileResponse {
        message: "User deleted successfully".to_string(),
    }))
}

#[derive(Serialize)]
pub struct UploadPictureResponse {
    pub message: String,
    pub avatar_url: String,
}

async fn upload_picture(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Valid(body): Valid<UploadPictureRequest>,
) -> Result<Json<UploadPictureResponse>> {
    let upload = body
        .image
        .and_then(|image| {
            Some(PictureUpload {
                base64: image.base64_string.filter(|s| !s.is_empty())?,
                filename: image.filename.filter(|s| !s.is_empty())?,
                content_type: image.content_type,
            })
        })
        .ok_or_else(|| AppError::BadRequest("Image data is required".to_string()))?;

    let avatar_url = state
        .profile_service
        .upload_picture(&user.user_id, upload)
        .await?;

    Ok(Json(UploadPictureResponse {
        message: "Profile picture uploaded successfully".to_string(),
        avatar_url,
    }))
}
