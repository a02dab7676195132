/// Song API routes
use crate::{api::ApiResponse, error::Result, state::AppState};
use axum::{
    extract::{Path, Query, State},
    Json,
};
use openmusic_core::{NewSong, PayloadKind, SongId, SongQuery};
use openmusic_storage::songs;
use serde_json::{json, Value};

/// POST /songs
pub async fn create_song(
    State(app_state): State<AppState>,
    Json(payload): Json<Value>,
) -> Result<ApiResponse> {
    let song: NewSong = app_state.schemas.parse(PayloadKind::Song, payload)?;
    let song_id = songs::create(app_state.db.pool(), &song).await?;

    Ok(ApiResponse::created(json!({ "songId": song_id })))
}

/// GET /songs?title=&performer=
pub async fn list_songs(
    State(app_state): State<AppState>,
    Query(query): Query<SongQuery>,
) -> Result<ApiResponse> {
    let songs = songs::list(app_state.db.pool(), &query).await?;

    Ok(ApiResponse::ok(json!({ "songs": songs })))
}

/// GET /songs/:id
pub async fn get_song(
    State(app_state): State<AppState>,
    Path(id): Path<SongId>,
) -> Result<ApiResponse> {
    let song = songs::get_by_id(app_state.db.pool(), &id).await?;

    Ok(ApiResponse::ok(json!({ "song": song })))
}

/// PUT /songs/:id
pub async fn update_song(
    State(app_state): State<AppState>,
    Path(id): Path<SongId>,
    Json(payload): Json<Value>,
) -> Result<ApiResponse> {
    let song: NewSong = app_state.schemas.parse(PayloadKind::Song, payload)?;
    songs::update(app_state.db.pool(), &id, &song).await?;

    Ok(ApiResponse::message("Song updated"))
}

/// DELETE /songs/:id
pub async fn delete_song(
    State(app_state): State<AppState>,
    Path(id): Path<SongId>,
) -> Result<ApiResponse> {
    songs::delete(app_state.db.pool(), &id).await?;

    Ok(ApiResponse::message("Song deleted"))
}
