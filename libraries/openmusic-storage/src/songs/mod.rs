//! Song queries

use crate::{albums, Result, StorageError};
use openmusic_core::types::{AlbumId, NewSong, Song, SongId, SongQuery, SongSummary};
use sqlx::{sqlite::SqliteRow, Row, SqlitePool};

fn song_from_row(row: &SqliteRow) -> Song {
    Song {
        id: row.get("id"),
        title: row.get("title"),
        year: row.get("year"),
        performer: row.get("performer"),
        genre: row.get("genre"),
        duration: row.get("duration"),
        album_id: row.get("album_id"),
    }
}

fn summary_from_row(row: &SqliteRow) -> SongSummary {
    SongSummary {
        id: row.get("id"),
        title: row.get("title"),
        performer: row.get("performer"),
    }
}

async fn ensure_album(pool: &SqlitePool, album_id: Option<&AlbumId>) -> Result<()> {
    if let Some(album_id) = album_id {
        if !albums::exists(pool, album_id).await? {
            return Err(StorageError::not_found("Album", album_id.as_str()));
        }
    }
    Ok(())
}

/// Create a song; a given album id must exist
pub async fn create(pool: &SqlitePool, song: &NewSong) -> Result<SongId> {
    ensure_album(pool, song.album_id.as_ref()).await?;

    let id = SongId::generate();
    sqlx::query(
        r#"
        INSERT INTO songs (id, title, year, genre, performer, duration, album_id)
        VALUES (?, ?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(&id)
    .bind(&song.title)
    .bind(song.year)
    .bind(&song.genre)
    .bind(&song.performer)
    .bind(song.duration)
    .bind(song.album_id.as_ref())
    .execute(pool)
    .await?;

    Ok(id)
}

/// List songs, optionally filtered by case-insensitive title/performer substrings.
///
/// Filters match literally; `%` and `_` carry no wildcard meaning.
pub async fn list(pool: &SqlitePool, query: &SongQuery) -> Result<Vec<SongSummary>> {
    let title = query.title.as_deref().filter(|s| !s.is_empty());
    let performer = query.performer.as_deref().filter(|s| !s.is_empty());

    let rows = sqlx::query(
        r#"
        SELECT id, title, performer
        FROM songs
        WHERE (? IS NULL OR instr(lower(title), lower(?)) > 0)
          AND (? IS NULL OR instr(lower(performer), lower(?)) > 0)
        ORDER BY rowid
        "#,
    )
    .bind(title)
    .bind(title)
    .bind(performer)
    .bind(performer)
    .fetch_all(pool)
    .await?;

    Ok(rows.iter().map(summary_from_row).collect())
}

/// Get a song by id
pub async fn get_by_id(pool: &SqlitePool, id: &SongId) -> Result<Song> {
    let row = sqlx::query(
        "SELECT id, title, year, performer, genre, duration, album_id FROM songs WHERE id = ?",
    )
    .bind(id)
    .fetch_optional(pool)
    .await?
    .ok_or_else(|| StorageError::not_found("Song", id.as_str()))?;

    Ok(song_from_row(&row))
}

pub async fn exists(pool: &SqlitePool, id: &SongId) -> Result<bool> {
    let row = sqlx::query("SELECT COUNT(*) AS count FROM songs WHERE id = ?")
        .bind(id)
        .fetch_one(pool)
        .await?;

    Ok(row.get::<i64, _>("count") > 0)
}

/// Songs belonging to an album, in insertion order
pub async fn get_by_album(pool: &SqlitePool, album_id: &AlbumId) -> Result<Vec<SongSummary>> {
    let rows = sqlx::query(
        "SELECT id, title, performer FROM songs WHERE album_id = ? ORDER BY rowid",
    )
    .bind(album_id)
    .fetch_all(pool)
    .await?;

    Ok(rows.iter().map(summary_from_row).collect())
}

/// Replace every field of a song
pub async fn update(pool: &SqlitePool, id: &SongId, song: &NewSong) -> Result<()> {
    ensure_album(pool, song.album_id.as_ref()).await?;

    let result = sqlx::query(
        r#"
        UPDATE songs
        SET title = ?, year = ?, genre = ?, performer = ?, duration = ?, album_id = ?,
            updated_at = datetime('now')
        WHERE id = ?
        "#,
    )
    .bind(&song.title)
    .bind(song.year)
    .bind(&song.genre)
    .bind(&song.performer)
    .bind(song.duration)
    .bind(song.album_id.as_ref())
    .bind(id)
    .execute(pool)
    .await?;

    if result.rows_affected() == 0 {
        return Err(StorageError::not_found("Song", id.as_str()));
    }

    Ok(())
}

/// Delete a song
pub async fn delete(pool: &SqlitePool, id: &SongId) -> Result<()> {
    let result = sqlx::query("DELETE FROM songs WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await?;

    if result.rows_affected() == 0 {
        return Err(StorageError::not_found("Song", id.as_str()));
    }

    Ok(())
}
