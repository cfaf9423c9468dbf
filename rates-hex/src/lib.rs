//! # Rates Hex
//!
//! Provider registry, fallback resolver and HTTP adapter for the exchange-rate
//! service.
//!
//! ## Architecture
//!
//! - `registry` - kind → instance map, descriptor ordering
//! - `operations` - one value per lookup kind, normalized per provider call
//! - `service` - the fallback loop plus catalog and descriptor management
//! - `inbound/` - HTTP adapter (Axum server)
//!
//! The service is generic over `R: RatesRepository`, allowing
//! different descriptor stores to be injected.

pub mod inbound;
pub mod openapi;
pub mod operations;
pub mod registry;
pub mod service;

#[cfg(test)]
mod service_tests;

pub use registry::{ProviderRegistry, ResolvedProvider};
pub use service::{DEFAULT_PROVIDER_TIMEOUT, RateService};
