//! In-memory repository adapter.

use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;
use rates_types::{Currency, CurrencyCode, ProviderDescriptor, RatesRepository, RepoError};

/// In-process descriptor store and currency catalog.
///
/// Descriptors keep the order they were added in, which is the tie-break for
/// equal priorities.
#[derive(Default)]
pub struct InMemoryRepo {
    providers: Mutex<Vec<ProviderDescriptor>>,
    currencies: Mutex<Vec<Currency>>,
}

fn lock<T>(mutex: &Mutex<T>) -> Result<MutexGuard<'_, T>, RepoError> {
    mutex
        .lock()
        .map_err(|_| RepoError::Database("in-memory store lock poisoned".into()))
}

impl InMemoryRepo {
    pub fn new() -> Self {
        Self::default()
    }

    /// Repository holding the default currencies (EUR as base) and the
    /// CurrencyBeacon → Mock provider chain.
    pub fn seeded() -> Self {
        let repo = Self::new()
            .with_provider(ProviderDescriptor::new("CurrencyBeacon", 1, true))
            .with_provider(ProviderDescriptor::new("Mock", 2, true));
        for (code, name, symbol) in [
            ("EUR", "Euro", "€"),
            ("CHF", "Swiss Franc", "CHF"),
            ("USD", "US Dollar", "$"),
            ("GBP", "British Pound", "£"),
        ] {
            if let Ok(code) = CurrencyCode::parse(code) {
                let currency = Currency::new(code, name, symbol);
                let currency = if name == "Euro" {
                    currency.as_default()
                } else {
                    currency
                };
                repo.push_currency(currency);
            }
        }
        repo
    }

    /// Appends a descriptor; its position is the number of descriptors before it.
    pub fn with_provider(self, descriptor: ProviderDescriptor) -> Self {
        self.push_provider(descriptor);
        self
    }

    pub fn with_currency(self, currency: Currency) -> Self {
        self.push_currency(currency);
        self
    }

    fn push_provider(&self, descriptor: ProviderDescriptor) {
        if let Ok(mut providers) = lock(&self.providers) {
            let position = providers.len() as i64;
            providers.retain(|p| p.name != descriptor.name);
            providers.push(descriptor.at_position(position));
        }
    }

    fn push_currency(&self, currency: Currency) {
        if let Ok(mut currencies) = lock(&self.currencies) {
            currencies.retain(|c| c.code != currency.code);
            currencies.push(currency);
        }
    }
}

#[async_trait]
impl RatesRepository for InMemoryRepo {
    async fn list_providers(&self) -> Result<Vec<ProviderDescriptor>, RepoError> {
        Ok(lock(&self.providers)?.clone())
    }

    async fn update_provider(
        &self,
        name: &str,
        priority: Option<i32>,
        is_active: Option<bool>,
    ) -> Result<ProviderDescriptor, RepoError> {
        let mut providers = lock(&self.providers)?;
        let descriptor = providers
            .iter_mut()
            .find(|p| p.name == name)
            .ok_or(RepoError::NotFound)?;

        if let Some(priority) = priority {
            descriptor.priority = priority;
        }
        if let Some(is_active) = is_active {
            descriptor.is_active = is_active;
        }
        Ok(descriptor.clone())
    }

    async fn list_currencies(&self) -> Result<Vec<Currency>, RepoError> {
        Ok(lock(&self.currencies)?.clone())
    }

    async fn default_currency(&self) -> Result<Option<Currency>, RepoError> {
        Ok(lock(&self.currencies)?
            .iter()
            .find(|c| c.is_default)
            .cloned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_providers_keep_insertion_order() {
        let repo = InMemoryRepo::new()
            .with_provider(ProviderDescriptor::new("A", 2, true))
            .with_provider(ProviderDescriptor::new("B", 1, true))
            .with_provider(ProviderDescriptor::new("C", 1, false));

        let providers = repo.list_providers().await.unwrap();

        let names: Vec<_> = providers.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["A", "B", "C"]);
        let positions: Vec<_> = providers.iter().map(|p| p.position).collect();
        assert_eq!(positions, vec![0, 1, 2]);
    }

    #[tokio::test]
    async fn test_update_provider() {
        let repo = InMemoryRepo::seeded();

        let updated = repo
            .update_provider("CurrencyBeacon", Some(5), Some(false))
            .await
            .unwrap();

        assert_eq!(updated.priority, 5);
        assert!(!updated.is_active);
        let stored = repo.list_providers().await.unwrap();
        assert!(!stored[0].is_active);
    }

    #[tokio::test]
    async fn test_update_unknown_provider() {
        let repo = InMemoryRepo::seeded();

        let result = repo.update_provider("Nope", Some(1), None).await;

        assert!(matches!(result, Err(RepoError::NotFound)));
    }

    #[tokio::test]
    async fn test_default_currency() {
        let repo = InMemoryRepo::seeded();

        let default = repo.default_currency().await.unwrap().unwrap();

        assert_eq!(default.code.as_str(), "EUR");
    }

    #[tokio::test]
    async fn test_empty_repo_has_no_default() {
        let repo = InMemoryRepo::new();
        assert!(repo.default_currency().await.unwrap().is_none());
    }
}
