// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! JSON body extractor that runs the field rules before the handler.

use crate::error::AppError;
use crate::models::requests::Schema;
use crate::validation::{validate, Mode};
use axum::{
    extract::{FromRequest, Request},
    Json,
};
use serde_json::Value;

/// A request body that passed its [`Schema`] rules.
///
/// Rejections never reach the handler: rule violations become
/// `400 {error: "Validation failed", details}`.
#[derive(Debug)]
pub struct Valid<T>(pub T);

impl<T, S> FromRequest<S> for Valid<T>
where
    T: Schema,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<Value>::from_request(req, state)
            .await
            .map_err(|rejection| AppError::BadRequest(rejection.body_text()))?;

        let Value::Object(fields) = &value else {
            return Err(AppError::Validation(vec![
                "Request body must be a JSON object".to_string(),
            ]));
        };

        if T::MODE == Mode::Partial && fields.is_empty() {
            return Err(AppError::Validation(vec![
                "No data provided for update".to_string(),
            ]));
        }

        validate(T::RULES, fields, T::MODE)
            .into_result()
            .map_err(AppError::Validation)?;

        serde_json::from_value(value)
            .map(Valid)
            .map_err(|e| AppError::BadRequest(e.to_string()))
    }
}
