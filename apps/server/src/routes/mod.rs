//! HTTP route handlers.
//!
//! ## API Surface
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Tally POS HTTP API                              │
//! │                                                                         │
//! │  POST /api/products/              create a product                      │
//! │  GET  /api/products/              list products (skip/limit)            │
//! │  GET  /api/products/{code}        fetch one product by code             │
//! │                                                                         │
//! │  POST /api/bills/                 create a bill (prices, decrements)    │
//! │  GET  /api/bills/                 list bills (skip/limit)               │
//! │  GET  /api/bills/{customer_email} list one customer's bills             │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

pub mod bills;
pub mod products;

use axum::routing::{get, post};
use axum::Router;
use serde::Deserialize;

use crate::state::AppState;

/// Builds the full application router.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route(
            "/api/products/",
            post(products::create_product).get(products::list_products),
        )
        .route("/api/products/{code}", get(products::get_product))
        .route(
            "/api/bills/",
            post(bills::create_bill).get(bills::list_bills),
        )
        .route("/api/bills/{customer_email}", get(bills::bills_for_customer))
        .with_state(state)
}

/// Offset/limit pagination query parameters.
///
/// Both fields are optional: `GET /api/products/` without a query
/// string returns the first page with the defaults below.
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct Pagination {
    #[serde(default)]
    pub skip: u32,
    #[serde(default = "default_limit")]
    pub limit: u32,
}

fn default_limit() -> u32 {
    100
}

impl Pagination {
    /// Caps the limit so one request cannot drag the whole table.
    pub fn clamped_limit(&self) -> u32 {
        self.limit.min(1000)
    }
}
