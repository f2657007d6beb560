use crate::pool::{is_unique_violation, map_migrate_error, map_sqlx_error, PoolSettings};
use async_trait::async_trait;
use nanolink_core::repository::{ReadRepository, Repository, Result};
use nanolink_core::{ShortCode, ShortLink, StorageError};
use sqlx::migrate::Migrator;
use sqlx::mysql::MySqlPoolOptions;
use sqlx::{MySqlPool, Row};

static MIGRATOR: Migrator = sqlx::migrate!("./migrations/mysql");

/// MySQL implementation of the repository contract.
///
/// `short_code` is stored with the `ascii_bin` collation so lookups are
/// case-sensitive, and carries a unique key that turns a duplicate insert
/// into [`StorageError::Conflict`].
#[derive(Debug, Clone)]
pub struct MySqlRepository {
    pool: MySqlPool,
}

impl MySqlRepository {
    /// Creates a repository from an existing MySQL connection pool.
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }

    /// Creates a repository by opening a new MySQL connection pool.
    pub async fn connect(database_url: &str, settings: PoolSettings) -> Result<Self> {
        let pool = MySqlPoolOptions::new()
            .max_connections(settings.max_connections)
            .acquire_timeout(settings.acquire_timeout)
            .connect(database_url)
            .await
            .map_err(map_sqlx_error)?;
        Ok(Self::new(pool))
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
    pub fn pool(&self) -> &MySqlPool {
        &self.pool
    }
}

#[async_trait]
impl ReadRepository for MySqlRepository {
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

        // PAD SPACE collations treat "abc123 " as equal to "abc123".
        if short_code != code.as_str() {
            return Ok(None);
        }

        Ok(Some(ShortLink {
            id,
            original_url,
            short_code: ShortCode::new_unchecked(short_code),
        }))
    }
}

#[async_trait]
impl Repository for MySqlRepository {
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
            Ok(done) => {
                let id = i64::try_from(done.last_insert_id()).map_err(|_| {
                    StorageError::InvalidData(format!(
                        "insert id {} does not fit in i64",
                        done.last_insert_id()
                    ))
                })?;
                Ok(ShortLink {
                    id,
                    original_url: original_url.to_owned(),
                    short_code: code.clone(),
                })
            }
            Err(err) if is_unique_violation(&err) => Err(StorageError::Conflict(code.to_string())),
            Err(err) => Err(map_sqlx_error(err)),
        }
    }
}
