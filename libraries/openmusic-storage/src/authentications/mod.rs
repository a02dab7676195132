//! Issued refresh tokens

use crate::{Result, StorageError};
use sqlx::{Row, SqlitePool};

/// Remember a refresh token handed out at login
pub async fn add(pool: &SqlitePool, token: &str) -> Result<()> {
    sqlx::query("INSERT INTO authentications (token) VALUES (?) ON CONFLICT(token) DO NOTHING")
        .bind(token)
        .execute(pool)
        .await?;

    Ok(())
}

/// Fails with `Invalid` unless the token was issued and not yet revoked
pub async fn verify(pool: &SqlitePool, token: &str) -> Result<()> {
    let row = sqlx::query("SELECT COUNT(*) AS count FROM authentications WHERE token = ?")
        .bind(token)
        .fetch_one(pool)
        .await?;

    if row.get::<i64, _>("count") == 0 {
        return Err(StorageError::invalid("Refresh token is invalid"));
    }

    Ok(())
}

/// Revoke a refresh token
pub async fn delete(pool: &SqlitePool, token: &str) -> Result<()> {
    let result = sqlx::query("DELETE FROM authentications WHERE token = ?")
        .bind(token)
        .execute(pool)
        .await?;

    if result.rows_affected() == 0 {
        return Err(StorageError::invalid("Refresh token is invalid"));
    }

    Ok(())
}
