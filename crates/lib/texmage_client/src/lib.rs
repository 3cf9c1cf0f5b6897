//! # texmage_client
//!
//! Client half of Texmage: a typed HTTP client for the four API endpoints
//! and the session state a front-end drives (who is logged in, how many
//! credits are left, which notices to show).

pub mod api;
pub mod error;
pub mod models;
pub mod pricing;
pub mod session;
pub mod storage;

pub use api::ApiClient;
pub use error::ClientError;
pub use session::{GenerateOutcome, Notice, NoticeLevel, Session, Timing};
pub use storage::{FileStorage, MemoryStorage, SessionStorage};
