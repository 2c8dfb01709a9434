//! Request handlers for API endpoints
//!
//! Handlers coordinate between routes and services, handling:
//! - Request extraction
//! - Service invocation
//! - Response formatting

pub mod index;
pub mod metrics;
pub mod products;

pub use index::*;
pub use metrics::*;
pub use products::*;
