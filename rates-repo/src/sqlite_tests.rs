//! SQLite repository integration tests.

#[cfg(test)]
mod tests {
    use rates_types::{RatesRepository, RepoError};

    use crate::SqliteRepo;

    async fn setup_repo() -> SqliteRepo {
        SqliteRepo::new("sqlite::memory:").await.unwrap()
    }

    #[tokio::test]
    async fn test_seeded_providers() {
        let repo = setup_repo().await;

        let providers = repo.list_providers().await.unwrap();

        assert_eq!(providers.len(), 2);
        assert_eq!(providers[0].name, "CurrencyBeacon");
        assert_eq!(providers[0].priority, 1);
        assert_eq!(providers[1].name, "Mock");
        assert_eq!(providers[1].priority, 2);
        assert!(providers.iter().all(|p| p.is_active));
        assert!(providers[0].position < providers[1].position);
    }

    #[tokio::test]
    async fn test_seeded_currencies() {
        let repo = setup_repo().await;

        let currencies = repo.list_currencies().await.unwrap();
        let codes: Vec<_> = currencies.iter().map(|c| c.code.as_str()).collect();

        assert_eq!(codes, vec!["EUR", "CHF", "USD", "GBP"]);
    }

    #[tokio::test]
    async fn test_default_currency() {
        let repo = setup_repo().await;

        let default = repo.default_currency().await.unwrap().unwrap();

        assert_eq!(default.code.as_str(), "EUR");
        assert!(default.is_default);
    }

    #[tokio::test]
    async fn test_migrations_are_idempotent() {
        let repo = setup_repo().await;

        repo.migrate().await.unwrap();
        repo.migrate().await.unwrap();

        assert_eq!(repo.list_providers().await.unwrap().len(), 2);
        assert_eq!(repo.list_currencies().await.unwrap().len(), 4);
    }

    #[tokio::test]
    async fn test_update_provider_priority_only() {
        let repo = setup_repo().await;

        let updated = repo
            .update_provider("Mock", Some(0), None)
            .await
            .unwrap();

        assert_eq!(updated.priority, 0);
        assert!(updated.is_active);
    }

    #[tokio::test]
    async fn test_deactivate_provider() {
        let repo = setup_repo().await;

        repo.update_provider("CurrencyBeacon", None, Some(false))
            .await
            .unwrap();

        let providers = repo.list_providers().await.unwrap();
        assert!(!providers[0].is_active);
        assert_eq!(providers[0].priority, 1);
    }

    #[tokio::test]
    async fn test_update_unknown_provider() {
        let repo = setup_repo().await;

        let result = repo.update_provider("Fixer", Some(3), None).await;

        assert!(matches!(result, Err(RepoError::NotFound)));
    }

    #[tokio::test]
    async fn test_insert_provider_keeps_insertion_order() {
        let repo = setup_repo().await;

        repo.insert_provider("Fixer", 1, true).await.unwrap();

        let providers = repo.list_providers().await.unwrap();
        let names: Vec<_> = providers.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["CurrencyBeacon", "Mock", "Fixer"]);
    }

    #[tokio::test]
    async fn test_file_database_persists_updates() {
        let dir = tempfile::tempdir().unwrap();
        let url = format!("sqlite://{}/nested/rates.db?mode=rwc", dir.path().display());

        {
            let repo = SqliteRepo::new(&url).await.unwrap();
            repo.update_provider("Mock", Some(7), Some(false))
                .await
                .unwrap();
            repo.pool().close().await;
        }

        let reopened = SqliteRepo::new(&url).await.unwrap();
        let providers = reopened.list_providers().await.unwrap();
        let mock = providers.iter().find(|p| p.name == "Mock").unwrap();

        assert_eq!(mock.priority, 7);
        assert!(!mock.is_active);
    }
}
