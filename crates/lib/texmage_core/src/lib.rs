//! # texmage_core
//!
//! Core domain logic for Texmage: user records and their credit balance,
//! signed identity tokens, secret hashing, input validation and the
//! external image provider.

pub mod auth;
pub mod generation;
pub mod migrate;
pub mod models;
pub mod store;
pub mod validation;

/// Returns the crate version.
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
