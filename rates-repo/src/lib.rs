//! # Rates Repository
//!
//! Concrete repository implementations (adapters) for the exchange-rate service.
//! This crate provides the descriptor store and currency catalog behind the
//! `RatesRepository` port.
//!
//! - `memory` - always available, seeded in process
//! - `sqlite` - behind the `sqlite` feature, with schema and seed migrations

use async_trait::async_trait;
use rates_types::{Currency, ProviderDescriptor, RatesRepository, RepoError};

pub mod memory;
#[cfg(feature = "sqlite")]
pub mod sqlite;

#[cfg(feature = "sqlite")]
mod types;

#[cfg(feature = "sqlite")]
#[cfg(test)]
mod sqlite_tests;

pub use memory::InMemoryRepo;
#[cfg(feature = "sqlite")]
pub use sqlite::SqliteRepo;

/// URL selecting the in-memory adapter.
pub const MEMORY_URL: &str = "memory://";

/// Unified repository wrapper over the available adapters.
pub enum Repo {
    Memory(InMemoryRepo),
    #[cfg(feature = "sqlite")]
    Sqlite(SqliteRepo),
}

/// Build and initialize a repository from a database URL.
///
/// This function:
/// 1. Picks the adapter from the URL scheme
/// 2. Connects and runs migrations (SQLite) or seeds defaults (memory)
/// 3. Returns a ready-to-use `Repo`
///
/// # Examples
///
/// ```ignore
/// // In-memory, seeded with the default currencies and providers
/// let repo = build_repo("memory://").await?;
///
/// // SQLite (with `sqlite` feature)
/// let repo = build_repo("sqlite://data/rates.db?mode=rwc").await?;
/// ```
pub async fn build_repo(database_url: &str) -> anyhow::Result<Repo> {
    if database_url == MEMORY_URL {
        tracing::info!("Using in-memory descriptor store");
        return Ok(Repo::Memory(InMemoryRepo::seeded()));
    }

    #[cfg(feature = "sqlite")]
    {
        if database_url.starts_with("sqlite:") {
            return Ok(Repo::Sqlite(SqliteRepo::new(database_url).await?));
        }
    }

    anyhow::bail!("Unsupported DATABASE_URL: {}", database_url)
}

// ─────────────────────────────────────────────────────────────────────────────
// Implement RatesRepository for Repo (delegation)
// ─────────────────────────────────────────────────────────────────────────────

macro_rules! delegate {
    ($self:ident, $repo:ident => $call:expr) => {
        match $self {
            Repo::Memory($repo) => $call,
            #[cfg(feature = "sqlite")]
            Repo::Sqlite($repo) => $call,
        }
    };
}

#[async_trait]
impl RatesRepository for Repo {
    async fn list_providers(&self) -> Result<Vec<ProviderDescriptor>, RepoError> {
        delegate!(self, repo => repo.list_providers().await)
    }

    async fn update_provider(
        &self,
        name: &str,
        priority: Option<i32>,
        is_active: Option<bool>,
    ) -> Result<ProviderDescriptor, RepoError> {
        delegate!(self, repo => repo.update_provider(name, priority, is_active).await)
    }

    async fn list_currencies(&self) -> Result<Vec<Currency>, RepoError> {
        delegate!(self, repo => repo.list_currencies().await)
    }

    async fn default_currency(&self) -> Result<Option<Currency>, RepoError> {
        delegate!(self, repo => repo.default_currency().await)
    }
}
