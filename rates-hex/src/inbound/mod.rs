//! HTTP Inbound Adapter
//!
//! Axum-based HTTP server that drives the rate service.

pub(crate) mod handlers;
mod rate_limit;
mod server;

pub use rate_limit::{DEFAULT_REQUESTS_PER_MINUTE, RateLimiterState};
pub use server::HttpServer;
