/// Song domain types
use crate::types::{AlbumId, SongId};
use serde::{Deserialize, Serialize};

/// A stored song
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Song {
    pub id: SongId,
    pub title: String,
    pub year: i32,
    pub performer: String,
    pub genre: String,

    /// Length in seconds
    pub duration: Option<i64>,
    pub album_id: Option<AlbumId>,
}

/// The short form used in listings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SongSummary {
    pub id: SongId,
    pub title: String,
    pub performer: String,
}

impl From<Song> for SongSummary {
    fn from(song: Song) -> Self {
        Self {
            id: song.id,
            title: song.title,
            performer: song.performer,
        }
    }
}

/// Payload for creating or replacing a song
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewSong {
    pub title: String,
    pub year: i32,
    pub genre: String,
    pub performer: String,
    #[serde(default)]
    pub duration: Option<i64>,
    #[serde(default)]
    pub album_id: Option<AlbumId>,
}

/// Case-insensitive substring filters for song listings
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct SongQuery {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub performer: Option<String>,
}
