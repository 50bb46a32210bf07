//! # The BillStore Contract
//!
//! The capability set every backend must provide: product lookup and
//! insertion, atomic bill creation, and bill queries.
//!
//! ## Contract Guarantees
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                     BillStore Guarantees                                │
//! │                                                                         │
//! │  create_bill is ATOMIC:                                                 │
//! │  ├── every line validated before any stock is touched                   │
//! │  ├── bill + items + all stock decrements persist together              │
//! │  └── on any error, the store is left exactly as it was                 │
//! │                                                                         │
//! │  create_bill is SERIALIZED per product:                                 │
//! │  └── two concurrent bills for the same product can never jointly       │
//! │      drive its stock negative                                           │
//! │                                                                         │
//! │  list_bills / bills_for_customer return creation order                 │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use async_trait::async_trait;

use tally_core::{Bill, LineItem, NewProduct, Product, TenderBreakdown};

use crate::error::StoreResult;

/// Storage contract for the billing backend.
///
/// Implemented by [`crate::SqliteStore`] (durable) and
/// [`crate::MemoryStore`] (tests and demos). Handlers hold an
/// `Arc<dyn BillStore>` and never know which one they talk to.
#[async_trait]
pub trait BillStore: Send + Sync {
    /// Inserts a new product, assigning its id and timestamps.
    ///
    /// ## Errors
    /// * `StoreError::UniqueViolation` - a product with this code exists
    async fn insert_product(&self, product: NewProduct) -> StoreResult<Product>;

    /// Looks up a product by business code.
    async fn get_product(&self, code: &str) -> StoreResult<Option<Product>>;

    /// Lists products in insertion order, paginated by offset/limit.
    async fn list_products(&self, skip: u32, limit: u32) -> StoreResult<Vec<Product>>;

    /// Creates a bill: resolves each line's product, prices the whole
    /// bill via `tally_core::price_bill`, and persists the bill, its
    /// items, and all stock decrements in one atomic step.
    ///
    /// ## Errors
    /// * `CoreError::ProductNotFound` - a line references an unknown code
    /// * `CoreError::InsufficientStock` - a line exceeds available stock
    /// * `CoreError::InsufficientPayment` - tendered below final amount
    async fn create_bill(
        &self,
        customer_email: &str,
        lines: &[LineItem],
        tender: Option<TenderBreakdown>,
    ) -> StoreResult<Bill>;

    /// Lists bills in creation order, paginated by offset/limit.
    async fn list_bills(&self, skip: u32, limit: u32) -> StoreResult<Vec<Bill>>;

    /// Lists all bills for one customer, in creation order.
    async fn bills_for_customer(&self, customer_email: &str) -> StoreResult<Vec<Bill>>;
}
