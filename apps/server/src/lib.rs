//! Catalog Gateway
//!
//! HTTP front door for product search:
//! - `GET /v1/products` translates simple query parameters into an
//!   Elasticsearch query and returns a small, stable JSON shape
//! - HTTP Basic access control against a configured allow-list
//! - Health, Prometheus metrics and an HTML search form

pub mod api;
pub mod auth;
pub mod backend;
pub mod config;
pub mod error;
pub mod logging;
pub mod metrics;
pub mod request_context;
pub mod services;
pub mod state;

pub use config::Config;
pub use error::{Error, Result};
pub use state::AppState;
