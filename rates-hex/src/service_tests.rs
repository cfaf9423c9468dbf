//! RateService unit tests.

#[cfg(test)]
pub(crate) mod tests {
    use std::collections::BTreeMap;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    use async_trait::async_trait;
    use chrono::NaiveDate;
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;

    use rates_providers::{CurrencyBeaconProvider, SyntheticProvider};
    use rates_repo::InMemoryRepo;
    use rates_types::normalize::format_date;
    use rates_types::{
        AppError, ConversionPayload, CurrencyCode, ProviderDescriptor, ProviderError,
        ProviderKind, ProviderResult, RateMap, RatePayload, RateProvider, ResolveError,
        SeriesPayload, UpdateProviderRequest,
    };

    use crate::{ProviderRegistry, RateService};

    /// What a scripted provider does on every call.
    #[derive(Clone, Copy)]
    pub enum Script {
        Answer(Decimal),
        Fail,
        Empty,
        Hang,
    }

    /// Provider with a fixed behavior that counts its invocations.
    pub struct ScriptedProvider {
        kind: ProviderKind,
        script: Script,
        calls: AtomicUsize,
    }

    impl ScriptedProvider {
        pub fn new(kind: ProviderKind, script: Script) -> Arc<Self> {
            Arc::new(Self {
                kind,
                script,
                calls: AtomicUsize::new(0),
            })
        }

        pub fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }

        async fn rates(&self, targets: &[CurrencyCode]) -> ProviderResult<RatePayload> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            match self.script {
                Script::Answer(rate) => Ok(targets
                    .iter()
                    .map(|t| (t.clone(), rate))
                    .collect::<RateMap>()
                    .into()),
                Script::Fail => Err(ProviderError::Transport("connection reset".into())),
                Script::Empty => Ok(RatePayload::Mapping(BTreeMap::new())),
                Script::Hang => {
                    tokio::time::sleep(Duration::from_secs(3600)).await;
                    Err(ProviderError::Empty)
                }
            }
        }
    }

    #[async_trait]
    impl RateProvider for ScriptedProvider {
        fn kind(&self) -> ProviderKind {
            self.kind
        }

        async fn spot_rate(
            &self,
            _base: &CurrencyCode,
            targets: &[CurrencyCode],
            _as_of: Option<NaiveDate>,
        ) -> ProviderResult<RatePayload> {
            self.rates(targets).await
        }

        async fn historical_rate(
            &self,
            _base: &CurrencyCode,
            targets: &[CurrencyCode],
            _on_date: NaiveDate,
        ) -> ProviderResult<RatePayload> {
            self.rates(targets).await
        }

        async fn ranged_series(
            &self,
            _base: &CurrencyCode,
            targets: &[CurrencyCode],
            start: NaiveDate,
            end: NaiveDate,
        ) -> ProviderResult<SeriesPayload> {
            let rates = self.rates(targets).await?;
            let days = [start, end]
                .into_iter()
                .map(|day| (format_date(day), rates.clone()))
                .collect();
            Ok(SeriesPayload::Mapping(days))
        }

        async fn convert(
            &self,
            _base: &CurrencyCode,
            target: &CurrencyCode,
            _amount: Decimal,
        ) -> ProviderResult<ConversionPayload> {
            let rates = self.rates(std::slice::from_ref(target)).await?;
            let rate = match rates {
                RatePayload::Mapping(map) => map.into_values().next().flatten(),
                RatePayload::Records(records) => records.into_iter().next().and_then(|r| r.rate),
            };
            Ok(ConversionPayload::Detailed {
                rate,
                converted_amount: None,
            })
        }
    }

    fn code(raw: &str) -> CurrencyCode {
        CurrencyCode::parse(raw).unwrap()
    }

    fn date(raw: &str) -> NaiveDate {
        NaiveDate::parse_from_str(raw, "%Y-%m-%d").unwrap()
    }

    /// Seeded store (CurrencyBeacon at 1, Mock at 2) with scripted instances.
    fn service_with(
        beacon: &Arc<ScriptedProvider>,
        mock: &Arc<ScriptedProvider>,
    ) -> RateService<InMemoryRepo> {
        let registry = ProviderRegistry::new()
            .register(beacon.clone())
            .register(mock.clone());
        RateService::new(InMemoryRepo::seeded(), registry)
    }

    fn pair(beacon: Script, mock: Script) -> (Arc<ScriptedProvider>, Arc<ScriptedProvider>) {
        (
            ScriptedProvider::new(ProviderKind::CurrencyBeacon, beacon),
            ScriptedProvider::new(ProviderKind::Synthetic, mock),
        )
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Resolution outcomes
    // ─────────────────────────────────────────────────────────────────────────

    #[tokio::test]
    async fn test_empty_store_yields_no_providers() {
        let (beacon, mock) = pair(Script::Answer(dec!(1.1)), Script::Answer(dec!(1.2)));
        let registry = ProviderRegistry::new()
            .register(beacon.clone())
            .register(mock.clone());
        let service = RateService::new(InMemoryRepo::new(), registry);

        let result = service.get_exchange_rate(code("EUR"), vec![code("USD")]).await;

        assert_eq!(result, Err(ResolveError::NoProviders));
        assert_eq!(beacon.calls() + mock.calls(), 0);
    }

    #[tokio::test]
    async fn test_all_inactive_yields_no_providers() {
        let (beacon, mock) = pair(Script::Answer(dec!(1.1)), Script::Answer(dec!(1.2)));
        let service = service_with(&beacon, &mock);
        for name in ["CurrencyBeacon", "Mock"] {
            service
                .update_provider(
                    name,
                    UpdateProviderRequest {
                        priority: None,
                        is_active: Some(false),
                    },
                )
                .await
                .unwrap();
        }

        let result = service.get_exchange_rate(code("EUR"), vec![code("USD")]).await;

        assert_eq!(result, Err(ResolveError::NoProviders));
        assert_eq!(beacon.calls() + mock.calls(), 0);
    }

    #[tokio::test]
    async fn test_unregistered_kinds_yield_no_providers() {
        let repo = InMemoryRepo::new().with_provider(ProviderDescriptor::new("Fixer", 1, true));
        let mock = ScriptedProvider::new(ProviderKind::Synthetic, Script::Answer(dec!(1)));
        let service = RateService::new(repo, ProviderRegistry::new().register(mock.clone()));

        let result = service.get_exchange_rate(code("EUR"), vec![code("USD")]).await;

        assert_eq!(result, Err(ResolveError::NoProviders));
        assert_eq!(mock.calls(), 0);
    }

    #[tokio::test]
    async fn test_first_success_short_circuits() {
        let (beacon, mock) = pair(Script::Answer(dec!(1.08)), Script::Answer(dec!(0.5)));
        let service = service_with(&beacon, &mock);

        let rates = service
            .get_exchange_rate(code("EUR"), vec![code("USD"), code("GBP")])
            .await
            .unwrap();

        assert_eq!(rates[&code("USD")], dec!(1.08));
        assert_eq!(beacon.calls(), 1);
        assert_eq!(mock.calls(), 0);
    }

    #[tokio::test]
    async fn test_failure_falls_back_to_next_provider() {
        let (beacon, mock) = pair(Script::Fail, Script::Answer(dec!(0.93)));
        let service = service_with(&beacon, &mock);

        let rates = service
            .get_exchange_rate(code("USD"), vec![code("EUR")])
            .await
            .unwrap();

        assert_eq!(rates[&code("EUR")], dec!(0.93));
        assert_eq!(beacon.calls(), 1);
        assert_eq!(mock.calls(), 1);
    }

    #[tokio::test]
    async fn test_empty_result_falls_back_to_next_provider() {
        let (beacon, mock) = pair(Script::Empty, Script::Answer(dec!(1.5)));
        let service = service_with(&beacon, &mock);

        let rates = service
            .get_historical_exchange_rates(code("EUR"), vec![code("CHF")], date("2025-02-15"))
            .await
            .unwrap();

        assert_eq!(rates.len(), 1);
        assert_eq!(beacon.calls(), 1);
        assert_eq!(mock.calls(), 1);
    }

    #[tokio::test]
    async fn test_exhaustion_reports_attempts() {
        let (beacon, mock) = pair(Script::Fail, Script::Empty);
        let service = service_with(&beacon, &mock);

        let result = service.get_exchange_rate(code("EUR"), vec![code("USD")]).await;

        assert_eq!(result, Err(ResolveError::Exhausted { attempts: 2 }));
        let err: AppError = result.unwrap_err().into();
        assert!(matches!(err, AppError::BadGateway(_)));
    }

    #[tokio::test(start_paused = true)]
    async fn test_slow_provider_times_out() {
        let (beacon, mock) = pair(Script::Hang, Script::Answer(dec!(1.01)));
        let service = service_with(&beacon, &mock).with_timeout(Duration::from_millis(200));

        let rates = service
            .get_exchange_rate(code("EUR"), vec![code("USD")])
            .await
            .unwrap();

        assert_eq!(rates[&code("USD")], dec!(1.01));
        assert_eq!(beacon.calls(), 1);
        assert_eq!(mock.calls(), 1);
    }

    #[tokio::test]
    async fn test_priority_change_reorders_chain() {
        let (beacon, mock) = pair(Script::Answer(dec!(1.1)), Script::Answer(dec!(1.2)));
        let service = service_with(&beacon, &mock);
        service
            .update_provider(
                "Mock",
                UpdateProviderRequest {
                    priority: Some(0),
                    is_active: None,
                },
            )
            .await
            .unwrap();

        let rates = service
            .get_exchange_rate(code("EUR"), vec![code("USD")])
            .await
            .unwrap();

        assert_eq!(rates[&code("USD")], dec!(1.2));
        assert_eq!(beacon.calls(), 0);
        assert_eq!(mock.calls(), 1);
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Operations
    // ─────────────────────────────────────────────────────────────────────────

    #[tokio::test]
    async fn test_series_uses_one_call_per_provider() {
        let (beacon, mock) = pair(Script::Fail, Script::Answer(dec!(1.04)));
        let service = service_with(&beacon, &mock);

        let series = service
            .get_exchange_rates_list(
                code("EUR"),
                vec![code("USD")],
                date("2025-02-15"),
                date("2025-02-20"),
            )
            .await
            .unwrap();

        assert_eq!(
            series.keys().collect::<Vec<_>>(),
            vec!["2025-02-15", "2025-02-20"]
        );
        assert_eq!(beacon.calls(), 1);
    }

    #[tokio::test]
    async fn test_convert_rounds_amount() {
        let (beacon, mock) = pair(Script::Answer(dec!(1.08)), Script::Fail);
        let service = service_with(&beacon, &mock);

        let conversion = service
            .convert_currency(code("USD"), code("EUR"), dec!(100))
            .await
            .unwrap();

        assert_eq!(conversion.rate, Some(dec!(1.08)));
        assert_eq!(conversion.converted_amount, dec!(108.00));
        assert_eq!(conversion.base, code("USD"));
        assert_eq!(conversion.target, code("EUR"));
    }

    #[tokio::test]
    async fn test_historical_first_success_short_circuits() {
        let (beacon, mock) = pair(Script::Answer(dec!(1.07)), Script::Answer(dec!(0.5)));
        let service = service_with(&beacon, &mock);

        let rates = service
            .get_historical_exchange_rates(code("EUR"), vec![code("USD")], date("2025-02-15"))
            .await
            .unwrap();

        assert_eq!(rates[&code("USD")], dec!(1.07));
        assert_eq!(beacon.calls(), 1);
        assert_eq!(mock.calls(), 0);
    }

    #[tokio::test]
    async fn test_series_first_success_short_circuits() {
        let (beacon, mock) = pair(Script::Answer(dec!(1.04)), Script::Answer(dec!(0.5)));
        let service = service_with(&beacon, &mock);

        let series = service
            .get_exchange_rates_list(
                code("EUR"),
                vec![code("USD")],
                date("2025-02-15"),
                date("2025-02-16"),
            )
            .await
            .unwrap();

        assert_eq!(series["2025-02-16"][&code("USD")], dec!(1.04));
        assert_eq!(beacon.calls(), 1);
        assert_eq!(mock.calls(), 0);
    }

    #[tokio::test]
    async fn test_convert_first_success_short_circuits() {
        let (beacon, mock) = pair(Script::Answer(dec!(1.08)), Script::Answer(dec!(0.5)));
        let service = service_with(&beacon, &mock);

        let conversion = service
            .convert_currency(code("USD"), code("EUR"), dec!(10))
            .await
            .unwrap();

        assert_eq!(conversion.converted_amount, dec!(10.80));
        assert_eq!(beacon.calls(), 1);
        assert_eq!(mock.calls(), 0);
    }

    #[tokio::test]
    async fn test_convert_failure_falls_back_to_next_provider() {
        let (beacon, mock) = pair(Script::Fail, Script::Answer(dec!(0.92)));
        let service = service_with(&beacon, &mock);

        let conversion = service
            .convert_currency(code("USD"), code("EUR"), dec!(100))
            .await
            .unwrap();

        assert_eq!(conversion.rate, Some(dec!(0.92)));
        assert_eq!(conversion.converted_amount, dec!(92.00));
        assert_eq!(beacon.calls(), 1);
        assert_eq!(mock.calls(), 1);
    }

    #[tokio::test]
    async fn test_convert_zero_rate_falls_back_to_next_provider() {
        let (beacon, mock) = pair(Script::Answer(dec!(0)), Script::Answer(dec!(1.25)));
        let service = service_with(&beacon, &mock);

        let conversion = service
            .convert_currency(code("GBP"), code("USD"), dec!(4))
            .await
            .unwrap();

        assert_eq!(conversion.rate, Some(dec!(1.25)));
        assert_eq!(conversion.converted_amount, dec!(5.00));
        assert_eq!(beacon.calls(), 1);
        assert_eq!(mock.calls(), 1);
    }

    #[tokio::test]
    async fn test_oversized_synthetic_series_times_out() {
        let registry = ProviderRegistry::new().register(Arc::new(SyntheticProvider::new()));
        let service = RateService::new(InMemoryRepo::seeded(), registry)
            .with_timeout(Duration::from_millis(50));

        let result = service
            .get_exchange_rates_list(
                code("EUR"),
                vec![code("USD"), code("GBP"), code("CHF")],
                date("0001-01-01"),
                date("9999-12-31"),
            )
            .await;

        assert_eq!(result, Err(ResolveError::Exhausted { attempts: 1 }));
    }

    #[tokio::test]
    async fn test_failing_beacon_falls_back_to_synthetic() {
        // Nothing listens on the discard port; the remote call fails fast.
        let beacon = CurrencyBeaconProvider::with_base_url("key", "http://127.0.0.1:9");
        let registry = ProviderRegistry::new()
            .register(Arc::new(beacon))
            .register(Arc::new(SyntheticProvider::new()));
        let service = RateService::new(InMemoryRepo::seeded(), registry);

        let rates = service
            .get_exchange_rate(code("EUR"), vec![code("USD"), code("GBP"), code("CHF")])
            .await
            .unwrap();

        let keys: Vec<_> = rates.keys().map(|c| c.as_str()).collect();
        assert_eq!(keys, vec!["CHF", "GBP", "USD"]);
        assert!(rates.values().all(|r| *r >= dec!(0.5) && *r <= dec!(1.5)));
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Catalog and descriptors
    // ─────────────────────────────────────────────────────────────────────────

    #[tokio::test]
    async fn test_list_providers_reports_resolvability() {
        let mock = ScriptedProvider::new(ProviderKind::Synthetic, Script::Empty);
        let service = RateService::new(
            InMemoryRepo::seeded(),
            ProviderRegistry::new().register(mock),
        );

        let providers = service.list_providers().await.unwrap();

        assert_eq!(providers.len(), 2);
        assert_eq!(providers[0].name, "CurrencyBeacon");
        assert_eq!(providers[0].kind, Some(ProviderKind::CurrencyBeacon));
        assert!(!providers[0].resolvable);
        assert!(providers[1].resolvable);
    }

    #[tokio::test]
    async fn test_update_unknown_provider_is_not_found() {
        let (beacon, mock) = pair(Script::Empty, Script::Empty);
        let service = service_with(&beacon, &mock);

        let result = service
            .update_provider(
                "Fixer",
                UpdateProviderRequest {
                    priority: Some(1),
                    is_active: None,
                },
            )
            .await;

        assert!(matches!(result, Err(AppError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_empty_update_is_rejected() {
        let (beacon, mock) = pair(Script::Empty, Script::Empty);
        let service = service_with(&beacon, &mock);

        let result = service
            .update_provider("Mock", UpdateProviderRequest::default())
            .await;

        assert!(matches!(result, Err(AppError::BadRequest(_))));
    }

    #[tokio::test]
    async fn test_known_codes_and_default() {
        let (beacon, mock) = pair(Script::Empty, Script::Empty);
        let service = service_with(&beacon, &mock);

        let codes = service.known_codes().await.unwrap();
        let default = service.default_currency().await.unwrap();

        assert_eq!(codes.len(), 4);
        assert_eq!(default, Some(code("EUR")));
    }
}
