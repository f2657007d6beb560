use crate::pool::{
    is_check_violation, is_unique_violation, map_migrate_error, map_sqlx_error, PoolSettings,
};
use async_trait::async_trait;
use nanolink_core::repository::{ReadRepository, Repository, Result};
use nanolink_core::{ShortCode, ShortLink, StorageError};
use sqlx::migrate::Migrator;
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions};
use sqlx::{Row, SqlitePool};
use std::str::FromStr;
use tracing::debug;

static MIGRATOR: Migrator = sqlx::migrate!("./migrations/sqlite");

/// SQLite implementation of the repository contract.
///
/// Uniqueness is enforced by the `UNIQUE` constraint on `short_code`; a
/// violating insert is reported as [`StorageError::Conflict`].
#[derive(Debug, Clone)]
pub struct SqliteRepository {
    pool: SqlitePool,
}

impl SqliteRepository {
    /// Creates a repository from an existing SQLite connection pool.
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Opens a pool for `database_url`, creating the database file if needed.
    pub async fn connect(database_url: &str, settings: PoolSettings) -> Result<Self> {
        let options = SqliteConnectOptions::from_str(database_url)
            .map_err(map_sqlx_error)?
            .create_if_missing(true)
            .journal_mode(SqliteJournalMode::Wal);

        let pool = SqlitePoolOptions::new()
            .max_connections(settings.max_connections)
            .acquire_timeout(settings.acquire_timeout)
            .connect_with(options)
            .await
            .map_err(map_sqlx_error)?;

        debug!(database_url, "opened sqlite pool");
        Ok(Self::new(pool))
    }

    /// Opens a private in-memory database with the schema applied.
    ///
    /// Every SQLite connection to `:memory:` sees its own database, so the
    /// pool is pinned to one connection that is never recycled.
    pub async fn in_memory() -> Result<Self> {
        let options = SqliteConnectOptions::from_str("sqlite::memory:").map_err(map_sqlx_error)?;

        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .min_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect_with(options)
            .await
            .map_err(map_sqlx_error)?;

        let repository = Self::new(pool);
        repository.migrate().await?;
        Ok(repository)
    }

    /// Applies the embedded schema migrations.
    pub async fn migrate(&self) -> Result<()> {
        MIGRATOR.run(&self.pool).await.map_err(map_migrate_error)
    }

    /// Closes the pool, waiting for checked-out connections to be returned.
    pub async fn close(&self) {
        self.pool.close().await;
    }

    /// Returns a reference to the underlying pool.
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }
}

#[async_trait]
impl ReadRepository for SqliteRepository {
    async fn get(&self, code: &ShortCode) -> Result<Option<ShortLink>> {
        let row = sqlx::query(
            r#"
            SELECT id, original_url, short_code
            FROM short_links
            WHERE short_code = ?
            LIMIT 1
            "#,
        )
        .bind(code.as_str())
        .fetch_optional(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        let Some(row) = row else {
            return Ok(None);
        };

        let id: i64 = row.try_get("id").map_err(map_sqlx_error)?;
        let original_url: String = row.try_get("original_url").map_err(map_sqlx_error)?;
        let short_code: String = row.try_get("short_code").map_err(map_sqlx_error)?;

        Ok(Some(ShortLink {
            id,
            original_url,
            short_code: ShortCode::new_unchecked(short_code),
        }))
    }
}

#[async_trait]
impl Repository for SqliteRepository {
    async fn insert(&self, code: &ShortCode, original_url: &str) -> Result<ShortLink> {
        let result = sqlx::query(
            r#"
            INSERT INTO short_links (original_url, short_code)
            VALUES (?, ?)
            "#,
        )
        .bind(original_url)
        .bind(code.as_str())
        .execute(&self.pool)
        .await;

        match result {
            Ok(done) => Ok(ShortLink {
                id: done.last_insert_rowid(),
                original_url: original_url.to_owned(),
                short_code: code.clone(),
            }),
            Err(err) if is_unique_violation(&err) => Err(StorageError::Conflict(code.to_string())),
            Err(err) if is_check_violation(&err) => Err(StorageError::InvalidData(format!(
                "short code `{code}` must be 6 characters"
            ))),
            Err(err) => Err(map_sqlx_error(err)),
        }
    }
}
