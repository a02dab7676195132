//! OpenMusic Server Library
//!
//! HTTP API for the OpenMusic catalog: albums, songs, users, token
//! authentication, collaborative playlists and playlist export.
//!
//! Every error response is rendered by [`error::normalize_response`] into the
//! `{ "status": "fail" | "error", "message": ... }` envelope.

pub mod api;
pub mod config;
pub mod error;
pub mod jobs;
pub mod middleware;
pub mod router;
pub mod services;
pub mod state;

// Re-export commonly used types for convenience
pub use config::ServerConfig;
pub use error::{Result, ServerError};
pub use router::create_router;
pub use services::{auth::AuthService, file_storage::FileStorage};
pub use state::AppState;
