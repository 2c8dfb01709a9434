//! Product API Routes
//!
//! Everything here sits behind the access gate.

use crate::api::handlers::products;
use crate::state::AppState;
use axum::{routing::get, Router};

pub fn product_routes() -> Router<AppState> {
    Router::new().route("/products", get(products::search_products))
}
