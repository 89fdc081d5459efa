// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! User profile model for storage and API.

use crate::validation::FieldRule;
use serde::{Deserialize, Serialize};

/// Account role.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    #[default]
    User,
    Admin,
}

/// Profile row in the `users` table.
///
/// Columns not listed here (for example a legacy `password` hash) are
/// dropped on deserialization and never reach a client.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    /// Provider-assigned user id
    pub id: String,
    pub email: String,
    pub name: String,
    #[serde(default)]
    pub bio: Option<String>,
    #[serde(default)]
    pub avatar_url: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub role: Role,
    #[serde(default)]
    pub email_verified: bool,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub updated_at: Option<String>,
}

/// Row inserted right after provider sign-up.
#[derive(Debug, Clone, Serialize)]
pub struct NewProfile {
    pub id: String,
    pub email: String,
    pub name: String,
    pub role: Role,
    pub created_at: String,
}

/// Partial profile update. Only `Some` fields are sent to the store.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProfileChanges {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bio: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email_verified: Option<bool>,
    /// Set by the store on every update.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<String>,
}

impl ProfileChanges {
    pub fn email_verified() -> Self {
        Self {
            email_verified: Some(true),
            ..Default::default()
        }
    }

    pub fn avatar(url: impl Into<String>) -> Self {
        Self {
            avatar_url: Some(url.into()),
            ..Default::default()
        }
    }
}

/// Field rules for a profile row.
pub const USER_SCHEMA: &[FieldRule] = &[
    FieldRule::string("id").required(),
    FieldRule::string("email").required().email(),
    FieldRule::string("name").required().min(2).max(100),
    FieldRule::string("bio").max(500),
    FieldRule::string("avatar_url").uri(),
    FieldRule::string("phone").max(20),
    FieldRule::string("address").max(200),
    FieldRule::string("role").one_of(&["user", "admin"]),
    FieldRule::string("created_at"),
    FieldRule::string("updated_at"),
];

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validation::{validate, Mode};
    use serde_json::json;

    #[test]
    fn test_user_ignores_password_column() {
        let row = json!({
            "id": "123",
            "email": "test@example.com",
            "name": "Test",
            "password": "$2b$10$hash",
        });
        let user: User = serde_json::from_value(row).unwrap();
        let out = serde_json::to_value(&user).unwrap();

        assert!(out.get("password").is_none());
        assert_eq!(user.role, Role::User);
        assert!(!user.email_verified);
    }

    #[test]
    fn test_user_schema_required_fields() {
        let report = validate(USER_SCHEMA, json!({}).as_object().unwrap(), Mode::Full);
        assert_eq!(
            report.errors,
            vec!["id is required", "email is required", "name is required"]
        );
    }

    #[test]
    fn test_user_schema_bounds() {
        let candidate = json!({
            "bio": "b".repeat(501),
            "phone": "1".repeat(21),
            "address": "a".repeat(201),
            "role": "owner",
            "avatar_url": "not a url",
        });
        let report = validate(USER_SCHEMA, candidate.as_object().unwrap(), Mode::Partial);
        assert_eq!(
            report.errors,
            vec![
                "bio must be no more than 500 characters",
                "avatar_url must be a valid URL",
                "phone must be no more than 20 characters",
                "address must be no more than 200 characters",
                "role must be one of: user, admin",
            ]
        );
    }

    #[test]
    fn test_profile_changes_skip_unset_fields() {
        let changes = ProfileChanges {
            name: Some("New Name".to_string()),
            ..Default::default()
        };
        assert_eq!(
            serde_json::to_value(&changes).unwrap(),
            json!({"name": "New Name"})
        );
    }
}
