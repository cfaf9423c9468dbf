//! HTTP Server configuration and startup.

use std::sync::Arc;

use axum::{
    Router, middleware,
    routing::{get, put},
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use rates_types::{CurrencyCode, RatesRepository};

use super::handlers::{self, AppState};
use super::rate_limit::{RateLimiterState, rate_limit_middleware};
use crate::RateService;
use crate::openapi::ApiDoc;

/// HTTP Server for the exchange-rate API.
pub struct HttpServer<R: RatesRepository> {
    state: Arc<AppState<R>>,
    rate_limiter: Arc<RateLimiterState>,
}

impl<R: RatesRepository> HttpServer<R> {
    /// Creates a new HTTP server with the default rate limit.
    pub fn new(service: RateService<R>, default_base: CurrencyCode) -> Self {
        Self {
            state: Arc::new(AppState {
                service,
                default_base,
            }),
            rate_limiter: Arc::new(RateLimiterState::default()),
        }
    }

    /// Creates a new HTTP server with custom rate limiting.
    pub fn with_rate_limit(
        service: RateService<R>,
        default_base: CurrencyCode,
        requests_per_minute: u32,
    ) -> Self {
        Self {
            state: Arc::new(AppState {
                service,
                default_base,
            }),
            rate_limiter: Arc::new(RateLimiterState::new(requests_per_minute)),
        }
    }

    /// Builds the Axum router with all routes.
    pub fn router(&self) -> Router {
        Router::new()
            .route("/health", get(handlers::health))
            .route(
                "/api/currency-rates/latest",
                get(handlers::latest_rates::<R>),
            )
            .route(
                "/api/currency-rates/historical",
                get(handlers::historical_rates::<R>),
            )
            .route("/api/currency-rates/list", get(handlers::rate_series::<R>))
            .route("/api/convert", get(handlers::convert::<R>))
            .route("/api/currencies", get(handlers::list_currencies::<R>))
            .route("/api/providers", get(handlers::list_providers::<R>))
            .route("/api/providers/{name}", put(handlers::update_provider::<R>))
            .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
            .layer(middleware::from_fn_with_state(
                self.rate_limiter.clone(),
                rate_limit_middleware,
            ))
            .layer(CorsLayer::permissive())
            .layer(TraceLayer::new_for_http())
            .with_state(self.state.clone())
    }

    /// Runs the server on the given address with graceful shutdown.
    pub async fn run(self, addr: &str) -> anyhow::Result<()> {
        let listener = tokio::net::TcpListener::bind(addr).await?;
        tracing::info!("Server listening on {}", listener.local_addr()?);

        axum::serve(listener, self.router())
            .with_graceful_shutdown(shutdown_signal())
            .await?;

        Ok(())
    }
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received, starting graceful shutdown...");
}
