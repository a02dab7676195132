//! User accounts and credential lookups

use crate::{Result, StorageError};
use openmusic_core::types::{User, UserId};
use sqlx::{Row, SqlitePool};

/// Stored id and bcrypt hash for a username
#[derive(Debug, Clone)]
pub struct Credentials {
    pub user_id: UserId,
    pub password_hash: String,
}

/// Create a user. The password must already be hashed.
///
/// Fails with `Invalid` when the username is taken. The unique index
/// decides, so concurrent registrations of one name yield exactly one user.
pub async fn create(
    pool: &SqlitePool,
    username: &str,
    fullname: &str,
    password_hash: &str,
) -> Result<User> {
    let id = UserId::generate();
    let result = sqlx::query(
        r#"
        INSERT INTO users (id, username, password, fullname)
        VALUES (?, ?, ?, ?)
        ON CONFLICT(username) DO NOTHING
        "#,
    )
    .bind(&id)
    .bind(username)
    .bind(password_hash)
    .bind(fullname)
    .execute(pool)
    .await?;

    if result.rows_affected() == 0 {
        return Err(StorageError::invalid(
            "Failed to add user. Username already taken",
        ));
    }

    Ok(User {
        id,
        username: username.to_string(),
        fullname: fullname.to_string(),
    })
}

/// Get a user by id
pub async fn get_by_id(pool: &SqlitePool, id: &UserId) -> Result<User> {
    let row = sqlx::query("SELECT id, username, fullname FROM users WHERE id = ?")
        .bind(id)
        .fetch_optional(pool)
        .await?
        .ok_or_else(|| StorageError::not_found("User", id.as_str()))?;

    Ok(User {
        id: row.get("id"),
        username: row.get("username"),
        fullname: row.get("fullname"),
    })
}

pub async fn exists(pool: &SqlitePool, id: &UserId) -> Result<bool> {
    let row = sqlx::query("SELECT COUNT(*) AS count FROM users WHERE id = ?")
        .bind(id)
        .fetch_one(pool)
        .await?;

    Ok(row.get::<i64, _>("count") > 0)
}

/// Look up the credentials stored for `username`
pub async fn find_credentials(pool: &SqlitePool, username: &str) -> Result<Option<Credentials>> {
    let row = sqlx::query("SELECT id, password FROM users WHERE username = ?")
        .bind(username)
        .fetch_optional(pool)
        .await?;

    Ok(row.map(|row| Credentials {
        user_id: row.get("id"),
        password_hash: row.get("password"),
    }))
}

/// Get all users
pub async fn get_all(pool: &SqlitePool) -> Result<Vec<User>> {
    let rows = sqlx::query("SELECT id, username, fullname FROM users ORDER BY username")
        .fetch_all(pool)
        .await?;

    Ok(rows
        .into_iter()
        .map(|row| User {
            id: row.get("id"),
            username: row.get("username"),
            fullname: row.get("fullname"),
        })
        .collect())
}
