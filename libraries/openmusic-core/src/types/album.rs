/// Album domain types
use crate::types::{AlbumId, SongSummary};
use serde::{Deserialize, Serialize};

/// A stored album
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Album {
    pub id: AlbumId,
    pub name: String,
    pub year: i32,

    /// Stored cover file name, relative to the upload images directory
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cover: Option<String>,

    /// Songs on this album (populated on detail queries)
    #[serde(default)]
    pub songs: Vec<SongSummary>,
}

/// Payload for creating or replacing an album
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewAlbum {
    pub name: String,
    pub year: i32,
}
