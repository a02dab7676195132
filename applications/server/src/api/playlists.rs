/// Playlist API routes
use crate::{
    api::ApiResponse, error::Result, middleware::AuthenticatedUser, state::AppState,
};
use axum::{
    extract::{Path, State},
    Json,
};
use openmusic_core::{NewPlaylist, PayloadKind, PlaylistId, SongId};
use openmusic_storage::{activities, playlists};
use serde::Deserialize;
use serde_json::{json, Value};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlaylistSongRequest {
    pub song_id: SongId,
}

/// POST /playlists
pub async fn create_playlist(
    State(app_state): State<AppState>,
    auth: AuthenticatedUser,
    Json(payload): Json<Value>,
) -> Result<ApiResponse> {
    let playlist: NewPlaylist = app_state.schemas.parse(PayloadKind::Playlist, payload)?;
    let playlist_id =
        playlists::create(app_state.db.pool(), &playlist.name, auth.user_id()).await?;

    Ok(ApiResponse::created(json!({ "playlistId": playlist_id })))
}

/// GET /playlists - owned and collaborated playlists
pub async fn list_playlists(
    State(app_state): State<AppState>,
    auth: AuthenticatedUser,
) -> Result<ApiResponse> {
    let playlists = playlists::get_user_playlists(app_state.db.pool(), auth.user_id()).await?;

    Ok(ApiResponse::ok(json!({ "playlists": playlists })))
}

/// DELETE /playlists/:id - owner only
pub async fn delete_playlist(
    State(app_state): State<AppState>,
    auth: AuthenticatedUser,
    Path(id): Path<PlaylistId>,
) -> Result<ApiResponse> {
    let pool = app_state.db.pool();
    playlists::verify_owner(pool, &id, auth.user_id()).await?;
    playlists::delete(pool, &id).await?;

    Ok(ApiResponse::message("Playlist deleted"))
}

/// POST /playlists/:id/songs
pub async fn add_song(
    State(app_state): State<AppState>,
    auth: AuthenticatedUser,
    Path(id): Path<PlaylistId>,
    Json(payload): Json<Value>,
) -> Result<ApiResponse> {
    let req: PlaylistSongRequest = app_state.schemas.parse(PayloadKind::PlaylistSong, payload)?;

    let pool = app_state.db.pool();
    playlists::verify_access(pool, &id, auth.user_id()).await?;
    playlists::add_song(pool, &id, &req.song_id, auth.user_id()).await?;

    Ok(ApiResponse::created_message("Song added to playlist"))
}

/// GET /playlists/:id/songs
pub async fn get_songs(
    State(app_state): State<AppState>,
    auth: AuthenticatedUser,
    Path(id): Path<PlaylistId>,
) -> Result<ApiResponse> {
    let pool = app_state.db.pool();
    playlists::verify_access(pool, &id, auth.user_id()).await?;
    let playlist = playlists::get_with_songs(pool, &id).await?;

    Ok(ApiResponse::ok(json!({ "playlist": playlist })))
}

/// DELETE /playlists/:id/songs
pub async fn remove_song(
    State(app_state): State<AppState>,
    auth: AuthenticatedUser,
    Path(id): Path<PlaylistId>,
    Json(payload): Json<Value>,
) -> Result<ApiResponse> {
    let req: PlaylistSongRequest = app_state.schemas.parse(PayloadKind::PlaylistSong, payload)?;

    let pool = app_state.db.pool();
    playlists::verify_access(pool, &id, auth.user_id()).await?;
    playlists::remove_song(pool, &id, &req.song_id, auth.user_id()).await?;

    Ok(ApiResponse::message("Song removed from playlist"))
}

/// GET /playlists/:id/activities
pub async fn get_activities(
    State(app_state): State<AppState>,
    auth: AuthenticatedUser,
    Path(id): Path<PlaylistId>,
) -> Result<ApiResponse> {
    let pool = app_state.db.pool();
    playlists::verify_access(pool, &id, auth.user_id()).await?;
    let activities = activities::list(pool, &id).await?;

    Ok(ApiResponse::ok(json!({
        "playlistId": id,
        "activities": activities,
    })))
}
