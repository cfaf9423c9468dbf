//! Repository port trait.
//!
//! Provider descriptors and currency reference data live outside the core.
//! Adapters (SQLite, in-memory) implement this trait.

use crate::domain::{Currency, ProviderDescriptor};
use crate::error::RepoError;

/// Read access to the descriptor store and the currency catalog, plus the
/// administrative edits on provider descriptors.
#[async_trait::async_trait]
pub trait RatesRepository: Send + Sync + 'static {
    // ─────────────────────────────────────────────────────────────────────────────
    // Provider descriptors
    // ─────────────────────────────────────────────────────────────────────────────

    /// Lists every descriptor, active or not, in store insertion order.
    async fn list_providers(&self) -> Result<Vec<ProviderDescriptor>, RepoError>;

    /// Changes the priority and/or active flag of a descriptor by name.
    async fn update_provider(
        &self,
        name: &str,
        priority: Option<i32>,
        is_active: Option<bool>,
    ) -> Result<ProviderDescriptor, RepoError>;

    // ─────────────────────────────────────────────────────────────────────────────
    // Currency reference data
    // ─────────────────────────────────────────────────────────────────────────────

    /// Lists all known currencies.
    async fn list_currencies(&self) -> Result<Vec<Currency>, RepoError>;

    /// The currency flagged as default base, if any.
    async fn default_currency(&self) -> Result<Option<Currency>, RepoError>;
}
