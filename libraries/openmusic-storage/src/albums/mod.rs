//! Album queries

use crate::{songs, Result, StorageError};
use openmusic_core::types::{Album, AlbumId, NewAlbum};
use sqlx::{Row, SqlitePool};

/// Create an album and return its id
pub async fn create(pool: &SqlitePool, album: &NewAlbum) -> Result<AlbumId> {
    let id = AlbumId::generate();

    sqlx::query("INSERT INTO albums (id, name, year) VALUES (?, ?, ?)")
        .bind(&id)
        .bind(&album.name)
        .bind(album.year)
        .execute(pool)
        .await?;

    Ok(id)
}

/// Get an album together with its songs
pub async fn get_by_id(pool: &SqlitePool, id: &AlbumId) -> Result<Album> {
    let row = sqlx::query("SELECT id, name, year, cover FROM albums WHERE id = ?")
        .bind(id)
        .fetch_optional(pool)
        .await?
        .ok_or_else(|| StorageError::not_found("Album", id.as_str()))?;

    let songs = songs::get_by_album(pool, id).await?;

    Ok(Album {
        id: row.get("id"),
        name: row.get("name"),
        year: row.get("year"),
        cover: row.get("cover"),
        songs,
    })
}

pub async fn exists(pool: &SqlitePool, id: &AlbumId) -> Result<bool> {
    let row = sqlx::query("SELECT COUNT(*) AS count FROM albums WHERE id = ?")
        .bind(id)
        .fetch_one(pool)
        .await?;

    Ok(row.get::<i64, _>("count") > 0)
}

/// Replace name and year
pub async fn update(pool: &SqlitePool, id: &AlbumId, album: &NewAlbum) -> Result<()> {
    let result = sqlx::query(
        "UPDATE albums SET name = ?, year = ?, updated_at = datetime('now') WHERE id = ?",
    )
    .bind(&album.name)
    .bind(album.year)
    .bind(id)
    .execute(pool)
    .await?;

    if result.rows_affected() == 0 {
        return Err(StorageError::not_found("Album", id.as_str()));
    }

    Ok(())
}

/// Delete an album; its songs stay, detached
///
/// Returns the album's cover file name, if any, so the caller can remove it.
pub async fn delete(pool: &SqlitePool, id: &AlbumId) -> Result<Option<String>> {
    let mut tx = pool.begin().await?;

    let row = sqlx::query("SELECT cover FROM albums WHERE id = ?")
        .bind(id)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or_else(|| StorageError::not_found("Album", id.as_str()))?;
    let cover: Option<String> = row.get("cover");

    sqlx::query("DELETE FROM albums WHERE id = ?")
        .bind(id)
        .execute(&mut *tx)
        .await?;

    tx.commit().await?;

    Ok(cover)
}

/// Point the album at a new cover file
///
/// Returns the previous cover file name, if any.
pub async fn set_cover(pool: &SqlitePool, id: &AlbumId, cover: &str) -> Result<Option<String>> {
    let mut tx = pool.begin().await?;

    let row = sqlx::query("SELECT cover FROM albums WHERE id = ?")
        .bind(id)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or_else(|| StorageError::not_found("Album", id.as_str()))?;
    let previous: Option<String> = row.get("cover");

    sqlx::query("UPDATE albums SET cover = ?, updated_at = datetime('now') WHERE id = ?")
        .bind(cover)
        .bind(id)
        .execute(&mut *tx)
        .await?;

    tx.commit().await?;

    Ok(previous)
}
