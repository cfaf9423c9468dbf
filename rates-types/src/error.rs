//! Error types for the exchange-rate service.

use crate::domain::ProviderKind;

/// Domain-level errors (malformed identifiers).
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DomainError {
    #[error("Invalid currency code: {0:?}")]
    InvalidCurrencyCode(String),

    #[error("No provider implementation named {0:?}")]
    UnknownProvider(String),
}

/// Failure of a single provider call.
///
/// The resolver swallows these and moves on to the next provider.
#[derive(Debug, thiserror::Error)]
pub enum ProviderError {
    #[error("Transport error: {0}")]
    Transport(String),

    #[error("Upstream returned status {status}: {body}")]
    UpstreamStatus { status: u16, body: String },

    #[error("Malformed upstream payload: {0}")]
    Malformed(String),

    #[error("Provider returned no usable data")]
    Empty,

    #[error("Provider did not answer within {0:?}")]
    Timeout(std::time::Duration),

    #[error("Provider {0} is not configured")]
    NotConfigured(ProviderKind),
}

/// Outcome of a resolution that produced no result.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ResolveError {
    /// No active descriptor resolved to a usable implementation.
    #[error("No exchange rate providers are available")]
    NoProviders,

    /// Every resolved provider failed or returned nothing.
    #[error("All {attempts} exchange rate providers failed")]
    Exhausted { attempts: usize },
}

/// Repository-level errors (data access failures).
#[derive(Debug, thiserror::Error)]
pub enum RepoError {
    #[error(transparent)]
    Domain(#[from] DomainError),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Entity not found")]
    NotFound,
}

/// Application-level errors (for HTTP responses).
///
/// Maps cleanly to HTTP status codes.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Service unavailable: {0}")]
    ServiceUnavailable(String),

    #[error("Bad gateway: {0}")]
    BadGateway(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<DomainError> for AppError {
    fn from(err: DomainError) -> Self {
        AppError::BadRequest(err.to_string())
    }
}

impl From<ResolveError> for AppError {
    fn from(err: ResolveError) -> Self {
        match err {
            ResolveError::NoProviders => AppError::ServiceUnavailable(err.to_string()),
            ResolveError::Exhausted { .. } => AppError::BadGateway(err.to_string()),
        }
    }
}

impl From<RepoError> for AppError {
    fn from(err: RepoError) -> Self {
        match err {
            RepoError::Domain(e) => AppError::Internal(format!("Corrupt stored data: {e}")),
            RepoError::NotFound => AppError::NotFound("Resource not found".into()),
            RepoError::Database(e) => AppError::Internal(e),
        }
    }
}
