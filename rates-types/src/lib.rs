//! # Rates Types
//!
//! Domain types and port traits for the exchange-rate service.
//! This crate has ZERO external IO dependencies - only data structures,
//! normalization rules, and trait definitions.
//!
//! ## Architecture
//!
//! This crate represents the **innermost core** of the hexagonal architecture:
//! - `domain/` - Pure domain types (CurrencyCode, ProviderDescriptor, RateMap, Conversion)
//! - `normalize/` - Folding of heterogeneous provider payloads into canonical shapes
//! - `ports/` - Trait definitions that adapters must implement
//! - `dto/` - Data Transfer Objects for API boundaries
//! - `error/` - Provider, resolver, repository and application error types

pub mod domain;
pub mod dto;
pub mod error;
pub mod normalize;
pub mod ports;

// Re-export commonly used types
pub use domain::{
    Conversion, Currency, CurrencyCode, ProviderDescriptor, ProviderKind, RateMap, RateSeries,
};
pub use dto::*;
pub use error::{AppError, DomainError, ProviderError, RepoError, ResolveError};
pub use normalize::{ConversionPayload, RatePayload, RateRecord, SeriesPayload};
pub use ports::{ProviderResult, RateProvider, RatesRepository};
