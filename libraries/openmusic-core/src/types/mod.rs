//! Domain types for the OpenMusic catalog

pub mod album;
pub mod ids;
pub mod playlist;
pub mod song;
pub mod user;

pub use album::{Album, NewAlbum};
pub use ids::{AlbumId, CollaborationId, PlaylistId, SongId, UserId};
pub use playlist::{ActivityAction, NewPlaylist, Playlist, PlaylistActivity, PlaylistDetail};
pub use song::{NewSong, Song, SongQuery, SongSummary};
pub use user::{NewUser, User};
