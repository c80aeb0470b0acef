//! Auth types shared across Foodgram crates.
//!
//! Provides JWT issuing/validation and the `Identity` / `MaybeIdentity` extractors.

pub mod identity;
pub mod token;
