//! Playlist song activity log

use crate::{Result, StorageError};
use chrono::{SecondsFormat, Utc};
use openmusic_core::types::{ActivityAction, PlaylistActivity, PlaylistId, SongId, UserId};
use sqlx::{Row, SqliteConnection, SqlitePool};
use uuid::Uuid;

/// Append an activity entry stamped with the current time
pub(crate) async fn insert(
    conn: &mut SqliteConnection,
    playlist_id: &PlaylistId,
    song_id: &SongId,
    user_id: &UserId,
    action: ActivityAction,
) -> Result<()> {
    let time = Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true);

    sqlx::query(
        r#"
        INSERT INTO playlist_song_activities (id, playlist_id, song_id, user_id, action, time)
        VALUES (?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(format!("activity-{}", Uuid::new_v4().simple()))
    .bind(playlist_id)
    .bind(song_id)
    .bind(user_id)
    .bind(action.as_str())
    .bind(time)
    .execute(conn)
    .await?;

    Ok(())
}

/// Activities of a playlist, oldest first
pub async fn list(pool: &SqlitePool, playlist_id: &PlaylistId) -> Result<Vec<PlaylistActivity>> {
    let rows = sqlx::query(
        r#"
        SELECT u.username, s.title, a.action, a.time
        FROM playlist_song_activities a
        INNER JOIN users u ON u.id = a.user_id
        INNER JOIN songs s ON s.id = a.song_id
        WHERE a.playlist_id = ?
        ORDER BY a.time, a.rowid
        "#,
    )
    .bind(playlist_id)
    .fetch_all(pool)
    .await?;

    rows.into_iter()
        .map(|row| {
            let action: String = row.get("action");
            let action = ActivityAction::parse(&action)
                .ok_or_else(|| StorageError::Corrupt(format!("unknown activity action {action}")))?;

            Ok(PlaylistActivity {
                username: row.get("username"),
                title: row.get("title"),
                action,
                time: row.get("time"),
            })
        })
        .collect()
}
