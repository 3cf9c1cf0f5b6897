//! Domain models shared by the API and its storage backends.

pub mod auth;
pub mod user;
