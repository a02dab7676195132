//! OpenMusic Storage
//!
//! `SQLite` persistence for the OpenMusic catalog.
//!
//! # Architecture
//!
//! - **Vertical Slicing**: each resource owns its own queries
//!   (`albums`, `songs`, `users`, `authentications`, `playlists`,
//!   `collaborations`, `activities`)
//! - **Classified Errors**: every `StorageError` converts into a core
//!   `Fault` that already knows whether the caller or the server is at fault
//!
//! # Example
//!
//! ```rust,no_run
//! use openmusic_core::NewAlbum;
//! use openmusic_storage::{albums, Database};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let db = Database::connect("sqlite://openmusic.db").await?;
//!
//! let id = albums::create(db.pool(), &NewAlbum { name: "Parachutes".into(), year: 2000 }).await?;
//! let album = albums::get_by_id(db.pool(), &id).await?;
//! # Ok(())
//! # }
//! ```

mod database;
mod error;

// Vertical slices
pub mod activities;
pub mod albums;
pub mod authentications;
pub mod collaborations;
pub mod playlists;
pub mod songs;
pub mod users;

pub use database::Database;
pub use error::{Result, StorageError};

use sqlx::migrate::Migrator;
use sqlx::sqlite::SqlitePool;

// Embed migrations into binary
static MIGRATOR: Migrator = sqlx::migrate!("./migrations");

/// Run database migrations
///
/// This should be called once when the application starts to ensure
/// the database schema is up to date.
pub async fn run_migrations(pool: &SqlitePool) -> Result<()> {
    MIGRATOR.run(pool).await?;
    Ok(())
}

/// Create a new `SQLite` pool
///
/// # Arguments
///
/// * `database_url` - `SQLite` connection string (e.g., `<sqlite://openmusic.db>`)
pub async fn create_pool(database_url: &str) -> Result<SqlitePool> {
    use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions};
    use std::str::FromStr;

    tracing::debug!("Creating pool with URL: {}", database_url);

    let options = SqliteConnectOptions::from_str(database_url)?
        .create_if_missing(true)
        .foreign_keys(true)
        .journal_mode(SqliteJournalMode::Wal)
        .busy_timeout(std::time::Duration::from_secs(30));

    let pool = SqlitePoolOptions::new()
        .max_connections(5)
        .connect_with(options)
        .await?;

    Ok(pool)
}
