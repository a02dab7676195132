//! Playlist collaborators

use crate::{users, Result, StorageError};
use openmusic_core::types::{CollaborationId, PlaylistId, UserId};
use sqlx::{Row, SqlitePool};

/// Grant `user_id` write access to a playlist
pub async fn add(
    pool: &SqlitePool,
    playlist_id: &PlaylistId,
    user_id: &UserId,
) -> Result<CollaborationId> {
    if !users::exists(pool, user_id).await? {
        return Err(StorageError::not_found("User", user_id.as_str()));
    }

    let id = CollaborationId::generate();
    let result = sqlx::query(
        r#"
        INSERT INTO collaborations (id, playlist_id, user_id)
        VALUES (?, ?, ?)
        ON CONFLICT(playlist_id, user_id) DO NOTHING
        "#,
    )
    .bind(&id)
    .bind(playlist_id)
    .bind(user_id)
    .execute(pool)
    .await?;

    if result.rows_affected() == 0 {
        return Err(StorageError::invalid("User is already a collaborator"));
    }

    Ok(id)
}

/// Revoke a collaboration
pub async fn remove(pool: &SqlitePool, playlist_id: &PlaylistId, user_id: &UserId) -> Result<()> {
    let result = sqlx::query("DELETE FROM collaborations WHERE playlist_id = ? AND user_id = ?")
        .bind(playlist_id)
        .bind(user_id)
        .execute(pool)
        .await?;

    if result.rows_affected() == 0 {
        return Err(StorageError::invalid(
            "Failed to delete collaboration. Collaboration not found",
        ));
    }

    Ok(())
}

pub async fn is_collaborator(
    pool: &SqlitePool,
    playlist_id: &PlaylistId,
    user_id: &UserId,
) -> Result<bool> {
    let row = sqlx::query(
        "SELECT COUNT(*) AS count FROM collaborations WHERE playlist_id = ? AND user_id = ?",
    )
    .bind(playlist_id)
    .bind(user_id)
    .fetch_one(pool)
    .await?;

    Ok(row.get::<i64, _>("count") > 0)
}
