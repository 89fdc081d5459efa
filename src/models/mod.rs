// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Data models for the application.

pub mod requests;
pub mod user;

pub use user::{NewProfile, ProfileChanges, Role, User, USER_SCHEMA};
