/// Database handle
use crate::error::Result;
use sqlx::sqlite::SqlitePool;

/// Owns the connection pool; the vertical slices borrow it through [`Database::pool`]
#[derive(Debug, Clone)]
pub struct Database {
    pool: SqlitePool,
}

impl Database {
    /// Open (creating if missing) the database at `database_url` and run migrations
    pub async fn connect(database_url: &str) -> Result<Self> {
        let pool = crate::create_pool(database_url).await?;
        crate::run_migrations(&pool).await?;
        Ok(Self { pool })
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }
}
