//! Test utilities for Foodgram crates.
//!
//! Provides `MockAuth` and request/response helpers for driving an axum `Router`.
//! Import in tests only, never in production code.

pub mod auth;
pub mod client;
