//! Playlist queries and access checks

use crate::{activities, collaborations, songs, Result, StorageError};
use openmusic_core::types::{
    ActivityAction, Playlist, PlaylistDetail, PlaylistId, SongId, SongSummary, UserId,
};
use sqlx::{Row, SqlitePool};
use uuid::Uuid;

const FORBIDDEN: &str = "You are not entitled to access this resource";

/// Create a playlist owned by `owner`
pub async fn create(pool: &SqlitePool, name: &str, owner: &UserId) -> Result<PlaylistId> {
    let id = PlaylistId::generate();

    sqlx::query("INSERT INTO playlists (id, name, owner) VALUES (?, ?, ?)")
        .bind(&id)
        .bind(name)
        .bind(owner)
        .execute(pool)
        .await?;

    Ok(id)
}

/// Playlists the user owns or collaborates on
pub async fn get_user_playlists(pool: &SqlitePool, user_id: &UserId) -> Result<Vec<Playlist>> {
    let rows = sqlx::query(
        r#"
        SELECT p.id, p.name, u.username
        FROM playlists p
        INNER JOIN users u ON u.id = p.owner
        WHERE p.owner = ?
           OR p.id IN (SELECT playlist_id FROM collaborations WHERE user_id = ?)
        ORDER BY p.rowid
        "#,
    )
    .bind(user_id)
    .bind(user_id)
    .fetch_all(pool)
    .await?;

    Ok(rows
        .into_iter()
        .map(|row| Playlist {
            id: row.get("id"),
            name: row.get("name"),
            username: row.get("username"),
        })
        .collect())
}

/// Owner of a playlist
pub async fn get_owner(pool: &SqlitePool, id: &PlaylistId) -> Result<UserId> {
    let row = sqlx::query("SELECT owner FROM playlists WHERE id = ?")
        .bind(id)
        .fetch_optional(pool)
        .await?
        .ok_or_else(|| StorageError::not_found("Playlist", id.as_str()))?;

    Ok(row.get("owner"))
}

/// `NotFound` if the playlist is missing, `Forbidden` unless `user_id` owns it
pub async fn verify_owner(pool: &SqlitePool, id: &PlaylistId, user_id: &UserId) -> Result<()> {
    if get_owner(pool, id).await? != *user_id {
        return Err(StorageError::forbidden(FORBIDDEN));
    }
    Ok(())
}

/// Like [`verify_owner`], but collaborators are let through too
pub async fn verify_access(pool: &SqlitePool, id: &PlaylistId, user_id: &UserId) -> Result<()> {
    if get_owner(pool, id).await? == *user_id {
        return Ok(());
    }

    if !collaborations::is_collaborator(pool, id, user_id).await? {
        return Err(StorageError::forbidden(FORBIDDEN));
    }

    Ok(())
}

/// Delete a playlist with its songs, collaborations and activities
pub async fn delete(pool: &SqlitePool, id: &PlaylistId) -> Result<()> {
    let result = sqlx::query("DELETE FROM playlists WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await?;

    if result.rows_affected() == 0 {
        return Err(StorageError::not_found("Playlist", id.as_str()));
    }

    Ok(())
}

/// Add a song and log an `add` activity for `user_id`
pub async fn add_song(
    pool: &SqlitePool,
    id: &PlaylistId,
    song_id: &SongId,
    user_id: &UserId,
) -> Result<()> {
    if !songs::exists(pool, song_id).await? {
        return Err(StorageError::not_found("Song", song_id.as_str()));
    }

    let mut tx = pool.begin().await?;

    let result = sqlx::query(
        r#"
        INSERT INTO playlist_songs (id, playlist_id, song_id)
        VALUES (?, ?, ?)
        ON CONFLICT(playlist_id, song_id) DO NOTHING
        "#,
    )
    .bind(format!("playlistsong-{}", Uuid::new_v4().simple()))
    .bind(id)
    .bind(song_id)
    .execute(&mut *tx)
    .await?;

    if result.rows_affected() == 0 {
        return Err(StorageError::invalid("Song is already in the playlist"));
    }

    activities::insert(&mut *tx, id, song_id, user_id, ActivityAction::Add).await?;

    tx.commit().await?;

    Ok(())
}

/// Remove a song and log a `delete` activity for `user_id`
pub async fn remove_song(
    pool: &SqlitePool,
    id: &PlaylistId,
    song_id: &SongId,
    user_id: &UserId,
) -> Result<()> {
    let mut tx = pool.begin().await?;

    let result = sqlx::query("DELETE FROM playlist_songs WHERE playlist_id = ? AND song_id = ?")
        .bind(id)
        .bind(song_id)
        .execute(&mut *tx)
        .await?;

    if result.rows_affected() == 0 {
        return Err(StorageError::invalid("Song is not in the playlist"));
    }

    activities::insert(&mut *tx, id, song_id, user_id, ActivityAction::Delete).await?;

    tx.commit().await?;

    Ok(())
}

/// Get a playlist with its songs in the order they were added
pub async fn get_with_songs(pool: &SqlitePool, id: &PlaylistId) -> Result<PlaylistDetail> {
    let row = sqlx::query(
        r#"
        SELECT p.id, p.name, u.username
        FROM playlists p
        INNER JOIN users u ON u.id = p.owner
        WHERE p.id = ?
        "#,
    )
    .bind(id)
    .fetch_optional(pool)
    .await?
    .ok_or_else(|| StorageError::not_found("Playlist", id.as_str()))?;

    let song_rows = sqlx::query(
        r#"
        SELECT s.id, s.title, s.performer
        FROM playlist_songs ps
        INNER JOIN songs s ON s.id = ps.song_id
        WHERE ps.playlist_id = ?
        ORDER BY ps.rowid
        "#,
    )
    .bind(id)
    .fetch_all(pool)
    .await?;

    let songs = song_rows
        .into_iter()
        .map(|row| SongSummary {
            id: row.get("id"),
            title: row.get("title"),
            performer: row.get("performer"),
        })
        .collect();

    Ok(PlaylistDetail {
        id: row.get("id"),
        name: row.get("name"),
        username: row.get("username"),
        songs,
    })
}
