/// Playlist domain types
use crate::types::{PlaylistId, SongSummary};
use serde::{Deserialize, Serialize};
use std::fmt;

/// A playlist as shown in listings; `username` is the owner's
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Playlist {
    pub id: PlaylistId,
    pub name: String,
    pub username: String,
}

/// A playlist with its songs
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlaylistDetail {
    pub id: PlaylistId,
    pub name: String,
    pub username: String,
    pub songs: Vec<SongSummary>,
}

/// Payload for creating a playlist
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct NewPlaylist {
    pub name: String,
}

/// What happened to a song in a playlist
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ActivityAction {
    Add,
    Delete,
}

impl ActivityAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            ActivityAction::Add => "add",
            ActivityAction::Delete => "delete",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "add" => Some(ActivityAction::Add),
            "delete" => Some(ActivityAction::Delete),
            _ => None,
        }
    }
}

impl fmt::Display for ActivityAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One entry of a playlist's activity log
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlaylistActivity {
    pub username: String,
    pub title: String,
    pub action: ActivityAction,

    /// RFC 3339 timestamp
    pub time: String,
}
