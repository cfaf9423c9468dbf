//! Provider Registry
//!
//! Maps the closed set of [`ProviderKind`]s onto live provider instances and
//! turns persisted descriptors into an ordered fallback chain.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use rates_types::{ProviderDescriptor, ProviderKind, RateProvider, RatesRepository};

/// A provider picked for one resolution, with the descriptor name it came from.
#[derive(Clone)]
pub struct ResolvedProvider {
    pub name: String,
    pub priority: i32,
    pub provider: Arc<dyn RateProvider>,
}

impl fmt::Debug for ResolvedProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ResolvedProvider")
            .field("name", &self.name)
            .field("priority", &self.priority)
            .field("kind", &self.provider.kind())
            .finish()
    }
}

/// Provider instances keyed by kind. Populated once at startup, read-only after.
#[derive(Clone, Default)]
pub struct ProviderRegistry {
    providers: HashMap<ProviderKind, Arc<dyn RateProvider>>,
}

impl ProviderRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers an instance under its own kind, replacing any previous one.
    pub fn register(mut self, provider: Arc<dyn RateProvider>) -> Self {
        let kind = provider.kind();
        tracing::debug!(%kind, "Registered exchange rate provider");
        self.providers.insert(kind, provider);
        self
    }

    pub fn get(&self, kind: ProviderKind) -> Option<Arc<dyn RateProvider>> {
        self.providers.get(&kind).cloned()
    }

    pub fn contains(&self, kind: ProviderKind) -> bool {
        self.providers.contains_key(&kind)
    }

    pub fn len(&self) -> usize {
        self.providers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.providers.is_empty()
    }

    /// Builds the fallback chain for a set of descriptors.
    ///
    /// Inactive descriptors are dropped and the rest ordered by ascending
    /// priority. Names with no matching kind, or whose kind has no registered
    /// instance, are skipped with a warning.
    pub fn resolve(&self, descriptors: Vec<ProviderDescriptor>) -> Vec<ResolvedProvider> {
        order_active(descriptors)
            .into_iter()
            .filter_map(|descriptor| {
                let kind = match descriptor.kind() {
                    Ok(kind) => kind,
                    Err(e) => {
                        tracing::warn!(provider = %descriptor.name, error = %e, "Skipping provider");
                        return None;
                    }
                };
                let Some(provider) = self.get(kind) else {
                    tracing::warn!(
                        provider = %descriptor.name,
                        %kind,
                        "Skipping provider with no registered implementation"
                    );
                    return None;
                };
                Some(ResolvedProvider {
                    name: descriptor.name,
                    priority: descriptor.priority,
                    provider,
                })
            })
            .collect()
    }
}

/// Drops inactive descriptors and stable-sorts the rest by priority.
///
/// Ties on priority are broken by `position` (store insertion order); the
/// order the store returned them in only matters when positions are equal.
pub fn order_active(descriptors: Vec<ProviderDescriptor>) -> Vec<ProviderDescriptor> {
    let mut active: Vec<ProviderDescriptor> =
        descriptors.into_iter().filter(|d| d.is_active).collect();
    active.sort_by_key(|d| (d.priority, d.position));
    active
}

/// Reads descriptors from the repository and resolves them.
///
/// A repository failure is logged and yields an empty chain.
pub async fn resolve_active_providers<R: RatesRepository>(
    repo: &R,
    registry: &ProviderRegistry,
) -> Vec<ResolvedProvider> {
    match repo.list_providers().await {
        Ok(descriptors) => registry.resolve(descriptors),
        Err(e) => {
            tracing::error!(error = %e, "Failed to load provider descriptors");
            Vec::new()
        }
    }
}
