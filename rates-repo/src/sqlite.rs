//! SQLite repository adapter.
#![allow(clippy::collapsible_if)]

use async_trait::async_trait;
use sqlx::SqlitePool;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use std::str::FromStr;

use rates_types::{Currency, ProviderDescriptor, RatesRepository, RepoError};

use crate::types::{DbCurrency, DbProvider};

const SCHEMA: &str = include_str!("../migrations/0001_create_tables.sql");
const SEED: &str = include_str!("../migrations/0002_seed_defaults.sql");

// ─────────────────────────────────────────────────────────────────────────────
// SQLite Repository
// ─────────────────────────────────────────────────────────────────────────────

/// SQLite repository implementation.
pub struct SqliteRepo {
    pool: SqlitePool,
}

fn db_err(e: sqlx::Error) -> RepoError {
    RepoError::Database(e.to_string())
}

impl SqliteRepo {
    /// Creates a new SQLite repository, applying schema and seed migrations.
    pub async fn new(database_url: &str) -> anyhow::Result<Self> {
        let in_memory = database_url.contains(":memory:") || database_url.contains("mode=memory");

        // Ensure on-disk SQLite target directory exists (no-op for in-memory).
        if let Some(path) = database_url.strip_prefix("sqlite://") {
            let path = path.split('?').next().unwrap_or(path);
            if !in_memory {
                let p = std::path::Path::new(path);
                if let Some(parent) = p.parent() {
                    if !parent.as_os_str().is_empty() {
                        tokio::fs::create_dir_all(parent).await?;
                    }
                }
            }
        }

        let options = SqliteConnectOptions::from_str(database_url)?.create_if_missing(true);

        // An in-memory database lives as long as its single connection.
        let pool = if in_memory {
            SqlitePoolOptions::new()
                .max_connections(1)
                .idle_timeout(None)
                .max_lifetime(None)
                .connect_with(options)
                .await?
        } else {
            SqlitePool::connect_with(options).await?
        };

        let repo = Self { pool };
        repo.migrate().await?;
        tracing::info!("SQLite descriptor store ready");
        Ok(repo)
    }

    /// Returns a reference to the connection pool.
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Creates the schema and inserts the default rows that are missing.
    pub async fn migrate(&self) -> Result<(), RepoError> {
        sqlx::raw_sql(SCHEMA)
            .execute(&self.pool)
            .await
            .map_err(db_err)?;
        sqlx::raw_sql(SEED)
            .execute(&self.pool)
            .await
            .map_err(db_err)?;
        Ok(())
    }

    /// Registers an additional provider descriptor.
    pub async fn insert_provider(
        &self,
        name: &str,
        priority: i32,
        is_active: bool,
    ) -> Result<ProviderDescriptor, RepoError> {
        sqlx::query(r#"INSERT INTO providers (name, priority, is_active) VALUES (?, ?, ?)"#)
            .bind(name)
            .bind(priority)
            .bind(is_active)
            .execute(&self.pool)
            .await
            .map_err(db_err)?;

        self.find_provider(name).await?.ok_or(RepoError::NotFound)
    }

    async fn find_provider(&self, name: &str) -> Result<Option<ProviderDescriptor>, RepoError> {
        let row: Option<DbProvider> = sqlx::query_as(
            r#"SELECT id, name, priority, is_active FROM providers WHERE name = ?"#,
        )
        .bind(name)
        .fetch_optional(&self.pool)
        .await
        .map_err(db_err)?;

        row.map(DbProvider::into_domain).transpose()
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Repository implementation
// ─────────────────────────────────────────────────────────────────────────────

#[async_trait]
impl RatesRepository for SqliteRepo {
    async fn list_providers(&self) -> Result<Vec<ProviderDescriptor>, RepoError> {
        let rows: Vec<DbProvider> = sqlx::query_as(
            r#"SELECT id, name, priority, is_active FROM providers ORDER BY id"#,
        )
        .fetch_all(&self.pool)
        .await
        .map_err(db_err)?;

        rows.into_iter().map(DbProvider::into_domain).collect()
    }

    async fn update_provider(
        &self,
        name: &str,
        priority: Option<i32>,
        is_active: Option<bool>,
    ) -> Result<ProviderDescriptor, RepoError> {
        let result = sqlx::query(
            r#"UPDATE providers
               SET priority = COALESCE(?, priority), is_active = COALESCE(?, is_active)
               WHERE name = ?"#,
        )
        .bind(priority)
        .bind(is_active)
        .bind(name)
        .execute(&self.pool)
        .await
        .map_err(db_err)?;

        if result.rows_affected() == 0 {
            return Err(RepoError::NotFound);
        }

        tracing::info!(provider = %name, ?priority, ?is_active, "Provider descriptor updated");
        self.find_provider(name).await?.ok_or(RepoError::NotFound)
    }

    async fn list_currencies(&self) -> Result<Vec<Currency>, RepoError> {
        let rows: Vec<DbCurrency> = sqlx::query_as(
            r#"SELECT code, name, symbol, is_default FROM currencies ORDER BY rowid"#,
        )
        .fetch_all(&self.pool)
        .await
        .map_err(db_err)?;

        rows.into_iter().map(DbCurrency::into_domain).collect()
    }

    async fn default_currency(&self) -> Result<Option<Currency>, RepoError> {
        let row: Option<DbCurrency> = sqlx::query_as(
            r#"SELECT code, name, symbol, is_default FROM currencies WHERE is_default = 1 ORDER BY rowid LIMIT 1"#,
        )
        .fetch_optional(&self.pool)
        .await
        .map_err(db_err)?;

        row.map(DbCurrency::into_domain).transpose()
    }
}
