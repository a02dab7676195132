//! OpenMusic Core
//!
//! Storage- and transport-agnostic building blocks for the OpenMusic catalog.
//!
//! # Architecture
//!
//! The core crate defines:
//! - **Domain Types**: `Album`, `Song`, `User`, `Playlist`, and their ids
//! - **Fault Taxonomy**: the closed `Fault` type every layer fails with
//! - **Validation**: Joi-style payload schemas and the `SchemaRegistry` facade
//!
//! # Example
//!
//! ```rust
//! use openmusic_core::validation::{PayloadKind, SchemaRegistry};
//! use serde_json::json;
//!
//! let registry = SchemaRegistry::standard();
//!
//! assert!(registry
//!     .validate_payload(PayloadKind::Album, &json!({ "name": "Viva la Vida", "year": 2008 }))
//!     .is_ok());
//!
//! let fault = registry
//!     .validate_payload(PayloadKind::Album, &json!({ "name": "" }))
//!     .unwrap_err();
//! assert_eq!(fault.status_code(), 400);
//! ```

#![forbid(unsafe_code)]

pub mod error;
pub mod types;
pub mod validation;

// Re-export commonly used types
pub use error::{ClientStatus, Fault, Result};
pub use validation::{PayloadKind, SchemaRegistry, ValidationResult};

pub use types::{
    ActivityAction, Album, AlbumId, CollaborationId, NewAlbum, NewPlaylist, NewSong, NewUser,
    Playlist, PlaylistActivity, PlaylistDetail, PlaylistId, Song, SongId, SongQuery, SongSummary,
    User, UserId,
};
