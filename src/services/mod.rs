// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Services module - business logic layer.

pub mod auth_flow;
pub mod profile;
pub mod provider;
pub mod supabase;
pub mod tokens;

pub use auth_flow::AuthService;
pub use profile::ProfileService;
pub use provider::{AuthProvider, ObjectStorage, ProviderSession, ProviderUser};
pub use supabase::SupabaseClient;
pub use tokens::{TokenPayload, TokenService};
