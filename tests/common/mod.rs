// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! In-memory stand-ins for the hosted platform plus request helpers.

use async_trait::async_trait;
use auth_service::config::Config;
use auth_service::db::ProfileStore;
use auth_service::error::{PlatformError, PlatformErrorKind};
use auth_service::models::{NewProfile, ProfileChanges, Role, User};
use auth_service::routes::create_router;
use auth_service::services::provider::{
    AuthProvider, ObjectStorage, OtpVerification, ProviderSession, ProviderUser,
};
use auth_service::services::tokens::TokenPayload;
use auth_service::{AppState, Platform};
use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use serde_json::Value;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use tower::ServiceExt;

// ─── Auth Provider ───────────────────────────────────────────

#[derive(Clone)]
struct Account {
    id: String,
    email: String,
    password: String,
    confirmed: bool,
}

impl Account {
    fn user(&self) -> ProviderUser {
        ProviderUser {
            id: self.id.clone(),
            email: Some(self.email.clone()),
            email_confirmed_at: self.confirmed.then(|| "2026-01-01T00:00:00Z".to_string()),
        }
    }
}

#[derive(Default)]
struct ProviderState {
    accounts: Vec<Account>,
    sessions: HashMap<String, String>,
    otps: HashMap<String, String>,
    calls: Vec<String>,
    next_id: u32,
}

/// Fake auth provider keeping accounts, sessions and OTPs in memory.
#[derive(Default)]
pub struct FakeProvider {
    state: Mutex<ProviderState>,
}

#[allow(dead_code)]
impl FakeProvider {
    pub fn add_account(&self, id: &str, email: &str, password: &str, confirmed: bool) {
        self.state.lock().unwrap().accounts.push(Account {
            id: id.to_string(),
            email: email.to_string(),
            password: password.to_string(),
            confirmed,
        });
    }

    pub fn add_session(&self, token: &str, user_id: &str) {
        self.state
            .lock()
            .unwrap()
            .sessions
            .insert(token.to_string(), user_id.to_string());
    }

    pub fn add_otp(&self, token: &str, user_id: &str) {
        self.state
            .lock()
            .unwrap()
            .otps
            .insert(token.to_string(), user_id.to_string());
    }

    pub fn has_account(&self, id: &str) -> bool {
        self.state.lock().unwrap().accounts.iter().any(|a| a.id == id)
    }

    pub fn password_of(&self, id: &str) -> Option<String> {
        self.state
            .lock()
            .unwrap()
            .accounts
            .iter()
            .find(|a| a.id == id)
            .map(|a| a.password.clone())
    }

    pub fn calls(&self) -> Vec<String> {
        self.state.lock().unwrap().calls.clone()
    }

    fn record(&self, call: String) {
        self.state.lock().unwrap().calls.push(call);
    }

    fn account_by_id(&self, id: &str) -> Result<Account, PlatformError> {
        self.state
            .lock()
            .unwrap()
            .accounts
            .iter()
            .find(|a| a.id == id)
            .cloned()
            .ok_or_else(|| PlatformError::new(PlatformErrorKind::NotFound, "User not found"))
    }

    fn session_account(&self, token: &str) -> Result<Account, PlatformError> {
        let id = self
            .state
            .lock()
            .unwrap()
            .sessions
            .get(token)
            .cloned()
            .ok_or_else(|| {
                PlatformError::new(PlatformErrorKind::Forbidden, "invalid JWT: unable to parse")
            })?;
        self.account_by_id(&id)
    }
}

#[async_trait]
impl AuthProvider for FakeProvider {
    async fn sign_up(
        &self,
        email: &str,
        password: &str,
        redirect_to: &str,
    ) -> Result<ProviderUser, PlatformError> {
        let mut state = self.state.lock().unwrap();
        state.calls.push(format!("sign_up:{}:{}", email, redirect_to));

        if state.accounts.iter().any(|a| a.email == email) {
            return Err(PlatformError::new(
                PlatformErrorKind::UpstreamConstraint,
                "User already registered",
            ));
        }

        state.next_id += 1;
        let account = Account {
            id: format!("user-{}", state.next_id),
            email: email.to_string(),
            password: password.to_string(),
            confirmed: false,
        };
        let user = account.user();
        state.accounts.push(account);
        Ok(user)
    }

    async fn sign_in_with_password(
        &self,
        email: &str,
        password: &str,
    ) -> Result<ProviderSession, PlatformError> {
        let mut state = self.state.lock().unwrap();
        let account = state
            .accounts
            .iter()
            .find(|a| a.email == email && a.password == password)
            .cloned()
            .ok_or_else(|| {
                PlatformError::new(
                    PlatformErrorKind::UpstreamConstraint,
                    "Invalid login credentials",
                )
            })?;

        let token = format!("provider-session-{}", account.id);
        state.sessions.insert(token.clone(), account.id.clone());

        Ok(ProviderSession {
            access_token: token,
            refresh_token: Some("provider-refresh".to_string()),
            user: account.user(),
        })
    }

    async fn sign_out(&self, access_token: &str) -> Result<(), PlatformError> {
        let mut state = self.state.lock().unwrap();
        state.calls.push(format!("sign_out:{}", access_token));
        state.sessions.remove(access_token);
        Ok(())
    }

    async fn send_password_reset(&self, email: &str) -> Result<(), PlatformError> {
        self.record(format!("recover:{}", email));
        Ok(())
    }

    async fn update_password(
        &self,
        access_token: &str,
        new_password: &str,
    ) -> Result<ProviderUser, PlatformError> {
        let account = self.session_account(access_token)?;
        let mut state = self.state.lock().unwrap();
        if let Some(a) = state.accounts.iter_mut().find(|a| a.id == account.id) {
            a.password = new_password.to_string();
        }
        Ok(account.user())
    }

    async fn verify_otp(
        &self,
        otp: OtpVerification<'_>,
    ) -> Result<Option<ProviderUser>, PlatformError> {
        let id = self
            .state
            .lock()
            .unwrap()
            .otps
            .remove(otp.token)
            .ok_or_else(|| {
                PlatformError::new(PlatformErrorKind::Forbidden, "Token has expired or is invalid")
            })?;

        let mut state = self.state.lock().unwrap();
        let account = state
            .accounts
            .iter_mut()
            .find(|a| a.id == id)
            .map(|a| {
                a.confirmed = true;
                a.user()
            });
        Ok(account)
    }

    async fn resend_signup_confirmation(
        &self,
        email: &str,
        _redirect_to: &str,
    ) -> Result<(), PlatformError> {
        self.record(format!("resend:{}", email));
        Ok(())
    }

    async fn session_user(&self, access_token: &str) -> Result<ProviderUser, PlatformError> {
        Ok(self.session_account(access_token)?.user())
    }

    async fn admin_get_user(&self, id: &str) -> Result<ProviderUser, PlatformError> {
        Ok(self.account_by_id(id)?.user())
    }

    async fn admin_delete_user(&self, id: &str) -> Result<(), PlatformError> {
        let mut state = self.state.lock().unwrap();
        let before = state.accounts.len();
        state.accounts.retain(|a| a.id != id);
        if state.accounts.len() == before {
            return Err(PlatformError::new(PlatformErrorKind::NotFound, "User not found"));
        }
        Ok(())
    }
}

// ─── Profile Store ───────────────────────────────────────────

/// Fake `users` table.
#[derive(Default)]
pub struct InMemoryProfiles {
    rows: Mutex<HashMap<String, User>>,
    fail_creates: AtomicBool,
}

#[allow(dead_code)]
impl InMemoryProfiles {
    pub fn insert(&self, user: User) {
        self.rows.lock().unwrap().insert(user.id.clone(), user);
    }

    pub fn get(&self, id: &str) -> Option<User> {
        self.rows.lock().unwrap().get(id).cloned()
    }

    pub fn fail_creates(&self) {
        self.fail_creates.store(true, Ordering::SeqCst);
    }
}

#[async_trait]
impl ProfileStore for InMemoryProfiles {
    async fn find_by_id(&self, id: &str) -> Result<Option<User>, PlatformError> {
        Ok(self.get(id))
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, PlatformError> {
        Ok(self
            .rows
            .lock()
            .unwrap()
            .values()
            .find(|u| u.email == email)
            .cloned())
    }

    async fn create(&self, profile: &NewProfile) -> Result<User, PlatformError> {
        if self.fail_creates.load(Ordering::SeqCst) {
            return Err(PlatformError::unexpected("connection reset"));
        }

        let mut rows = self.rows.lock().unwrap();
        if rows.values().any(|u| u.email == profile.email) {
            return Err(PlatformError::new(
                PlatformErrorKind::Conflict,
                "Resource already exists",
            ));
        }

        let user = User {
            id: profile.id.clone(),
            email: profile.email.clone(),
            name: profile.name.clone(),
            bio: None,
            avatar_url: None,
            phone: None,
            address: None,
            role: profile.role,
            email_verified: false,
            created_at: Some(profile.created_at.clone()),
            updated_at: None,
        };
        rows.insert(user.id.clone(), user.clone());
        Ok(user)
    }

    async fn update(&self, id: &str, changes: &ProfileChanges) -> Result<User, PlatformError> {
        let mut rows = self.rows.lock().unwrap();
        let user = rows.get_mut(id).ok_or_else(|| {
            PlatformError::new(PlatformErrorKind::NotFound, "User profile not found")
        })?;

        if let Some(name) = &changes.name {
            user.name = name.clone();
        }
        if let Some(bio) = &changes.bio {
            user.bio = Some(bio.clone());
        }
        if let Some(url) = &changes.avatar_url {
            user.avatar_url = Some(url.clone());
        }
        if let Some(phone) = &changes.phone {
            user.phone = Some(phone.clone());
        }
        if let Some(address) = &changes.address {
            user.address = Some(address.clone());
        }
        if let Some(verified) = changes.email_verified {
            user.email_verified = verified;
        }
        user.updated_at = Some(chrono::Utc::now().to_rfc3339());

        Ok(user.clone())
    }

    async fn delete(&self, id: &str) -> Result<(), PlatformError> {
        self.rows.lock().unwrap().remove(id);
        Ok(())
    }
}

// ─── Object Storage ──────────────────────────────────────────

/// Fake public bucket.
#[derive(Default)]
pub struct MemoryStorage {
    objects: Mutex<HashMap<String, (Vec<u8>, String)>>,
}

#[allow(dead_code)]
impl MemoryStorage {
    pub fn object(&self, path: &str) -> Option<(Vec<u8>, String)> {
        self.objects.lock().unwrap().get(path).cloned()
    }

    pub fn paths(&self) -> Vec<String> {
        self.objects.lock().unwrap().keys().cloned().collect()
    }
}

#[async_trait]
impl ObjectStorage for MemoryStorage {
    async fn upload(
        &self,
        path: &str,
        bytes: Vec<u8>,
        content_type: &str,
    ) -> Result<(), PlatformError> {
        self.objects
            .lock()
            .unwrap()
            .insert(path.to_string(), (bytes, content_type.to_string()));
        Ok(())
    }

    fn public_url(&self, path: &str) -> String {
        format!("https://storage.test/user-uploads/{}", path)
    }
}

// ─── App Helpers ─────────────────────────────────────────────

/// Router plus handles to every fake behind it.
#[allow(dead_code)]
pub struct TestApp {
    pub router: axum::Router,
    pub state: Arc<AppState>,
    pub provider: Arc<FakeProvider>,
    pub profiles: Arc<InMemoryProfiles>,
    pub storage: Arc<MemoryStorage>,
}

/// Create a test app backed by in-memory fakes.
#[allow(dead_code)]
pub fn create_test_app() -> TestApp {
    let provider = Arc::new(FakeProvider::default());
    let profiles = Arc::new(InMemoryProfiles::default());
    let storage = Arc::new(MemoryStorage::default());

    let platform = Platform {
        auth: provider.clone(),
        profiles: profiles.clone(),
        storage: storage.clone(),
    };
    let state = Arc::new(AppState::new(&Config::test_default(), platform));

    TestApp {
        router: create_router(state.clone()),
        state,
        provider,
        profiles,
        storage,
    }
}

/// A profile row with only the required fields set.
#[allow(dead_code)]
pub fn sample_user(id: &str, email: &str, name: &str) -> User {
    User {
        id: id.to_string(),
        email: email.to_string(),
        name: name.to_string(),
        bio: None,
        avatar_url: None,
        phone: None,
        address: None,
        role: Role::User,
        email_verified: false,
        created_at: Some("2026-01-01T00:00:00.000Z".to_string()),
        updated_at: None,
    }
}

/// Access token for `user_id` signed with the test secret.
#[allow(dead_code)]
pub fn access_token(state: &AppState, user_id: &str, email: &str) -> String {
    state
        .tokens
        .issue_access(&TokenPayload {
            user_id: user_id.to_string(),
            email: email.to_string(),
        })
        .unwrap()
}

#[allow(dead_code)]
pub fn json_request(method: &str, uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

#[allow(dead_code)]
pub fn authed_request(method: &str, uri: &str, token: &str, body: Option<Value>) -> Request<Body> {
    let builder = Request::builder()
        .method(method)
        .uri(uri)
        .header(header::AUTHORIZATION, format!("Bearer {}", token));

    match body {
        Some(body) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    }
}

/// Send one request and decode the JSON response (`Value::Null` if empty).
#[allow(dead_code)]
pub async fn send(router: &axum::Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = router.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), 1024 * 1024)
        .await
        .unwrap();
    let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, body)
}
