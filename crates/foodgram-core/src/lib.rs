//! HTTP and persistence plumbing shared by Foodgram services.

pub mod health;
pub mod middleware;
pub mod sea_ext;
pub mod tracing;
