//! # In-Memory Backend
//!
//! A `BillStore` backend holding everything in Mutex-guarded maps.
//! Intended for tests and demos; nothing survives a restart.
//!
//! ## Thread Safety
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    MemoryStore Locking                                  │
//! │                                                                         │
//! │  All state lives behind ONE Mutex:                                      │
//! │                                                                         │
//! │    MemoryStore ──► Mutex<Inner { products, bills, next ids }>          │
//! │                                                                         │
//! │  create_bill runs its whole validate-price-persist sequence inside     │
//! │  a single lock acquisition, so concurrent bills are serialized and     │
//! │  stock can never be jointly oversold. The lock is never held across    │
//! │  an await point.                                                        │
//! │                                                                         │
//! │  The system this replaces kept the equivalent state in process-wide    │
//! │  module globals; here the store is an explicitly constructed object    │
//! │  whose lifetime the process (or test) owns.                            │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::Utc;
use tracing::debug;

use tally_core::{price_bill, Bill, CoreError, LineItem, NewProduct, Product, TenderBreakdown};

use crate::error::{StoreError, StoreResult};
use crate::store::BillStore;

/// Mutable state behind the lock.
#[derive(Debug, Default)]
struct Inner {
    /// Products keyed by business code.
    products: HashMap<String, Product>,
    /// Bills in creation order.
    bills: Vec<Bill>,
    /// Next product id to assign.
    next_product_id: i64,
    /// Next bill id to assign.
    next_bill_id: i64,
}

/// In-memory `BillStore` backend.
///
/// Construct one per process (or per test) and share it via
/// `Arc<dyn BillStore>`. There are no globals.
#[derive(Debug, Default)]
pub struct MemoryStore {
    inner: Mutex<Inner>,
}

impl MemoryStore {
    /// Creates a new empty store.
    pub fn new() -> Self {
        MemoryStore {
            inner: Mutex::new(Inner {
                products: HashMap::new(),
                bills: Vec::new(),
                next_product_id: 1,
                next_bill_id: 1,
            }),
        }
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Inner> {
        self.inner.lock().expect("MemoryStore mutex poisoned")
    }
}

#[async_trait]
impl BillStore for MemoryStore {
    async fn insert_product(&self, product: NewProduct) -> StoreResult<Product> {
        debug!(code = %product.code, "Inserting product");

        let mut inner = self.lock();

        if inner.products.contains_key(&product.code) {
            return Err(StoreError::duplicate("code", &product.code));
        }

        let now = Utc::now();
        let id = inner.next_product_id;
        inner.next_product_id += 1;

        let product = Product {
            id,
            code: product.code,
            name: product.name,
            price_cents: product.price_cents,
            available_stock: product.available_stock,
            tax_rate_bps: product.tax_rate_bps,
            created_at: now,
            updated_at: now,
        };

        inner.products.insert(product.code.clone(), product.clone());
        Ok(product)
    }

    async fn get_product(&self, code: &str) -> StoreResult<Option<Product>> {
        Ok(self.lock().products.get(code).cloned())
    }

    async fn list_products(&self, skip: u32, limit: u32) -> StoreResult<Vec<Product>> {
        let inner = self.lock();
        let mut products: Vec<Product> = inner.products.values().cloned().collect();
        // Ids are assigned in insertion order, so this matches the
        // SQLite backend's ORDER BY id.
        products.sort_by_key(|p| p.id);
        Ok(products
            .into_iter()
            .skip(skip as usize)
            .take(limit as usize)
            .collect())
    }

    async fn create_bill(
        &self,
        customer_email: &str,
        lines: &[LineItem],
        tender: Option<TenderBreakdown>,
    ) -> StoreResult<Bill> {
        debug!(customer = %customer_email, lines = lines.len(), "Creating bill");

        // One lock acquisition covers resolve, price, and persist:
        // either the whole bill lands or nothing changes.
        let mut inner = self.lock();

        let mut resolved = Vec::with_capacity(lines.len());
        for line in lines {
            let product = inner
                .products
                .get(&line.code)
                .cloned()
                .ok_or_else(|| CoreError::ProductNotFound(line.code.clone()))?;
            resolved.push((product, line.quantity));
        }

        let priced = price_bill(&resolved, tender.as_ref())?;

        let now = Utc::now();
        for (code, quantity) in priced.stock_decrements() {
            // price_bill already validated against this same snapshot,
            // and the lock excludes interleaved writers.
            let product = inner
                .products
                .get_mut(code)
                .ok_or_else(|| StoreError::not_found("Product", code))?;
            product.available_stock -= quantity;
            product.updated_at = now;
        }

        let id = inner.next_bill_id;
        inner.next_bill_id += 1;

        let bill = Bill {
            id,
            customer_email: customer_email.to_string(),
            items: priced.items,
            total_cents: priced.total_cents,
            tax_cents: priced.tax_cents,
            final_cents: priced.final_cents,
            tender,
            tendered_cents: priced.tendered_cents,
            change_cents: priced.change_cents,
            created_at: now,
        };

        inner.bills.push(bill.clone());
        Ok(bill)
    }

    async fn list_bills(&self, skip: u32, limit: u32) -> StoreResult<Vec<Bill>> {
        Ok(self
            .lock()
            .bills
            .iter()
            .skip(skip as usize)
            .take(limit as usize)
            .cloned()
            .collect())
    }

    async fn bills_for_customer(&self, customer_email: &str) -> StoreResult<Vec<Bill>> {
        Ok(self
            .lock()
            .bills
            .iter()
            .filter(|bill| bill.customer_email == customer_email)
            .cloned()
            .collect())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
// End-to-end contract tests live in tests/store_contract.rs and run
// against both backends; these cover memory-specific behavior.

#[cfg(test)]
mod tests {
    use super::*;

    fn laptop() -> NewProduct {
        NewProduct {
            code: "LP001".to_string(),
            name: "Laptop".to_string(),
            price_cents: 45000,
            available_stock: 10,
            tax_rate_bps: 1800,
        }
    }

    #[tokio::test]
    async fn test_ids_assigned_in_insertion_order() {
        let store = MemoryStore::new();

        let first = store.insert_product(laptop()).await.unwrap();
        let second = store
            .insert_product(NewProduct {
                code: "MS001".to_string(),
                name: "Mouse".to_string(),
                price_cents: 500,
                available_stock: 20,
                tax_rate_bps: 1200,
            })
            .await
            .unwrap();

        assert_eq!(first.id, 1);
        assert_eq!(second.id, 2);
    }

    #[tokio::test]
    async fn test_duplicate_code_rejected() {
        let store = MemoryStore::new();
        store.insert_product(laptop()).await.unwrap();

        let err = store.insert_product(laptop()).await.unwrap_err();
        assert!(matches!(err, StoreError::UniqueViolation { .. }));
    }

    #[tokio::test]
    async fn test_failed_bill_leaves_state_untouched() {
        let store = MemoryStore::new();
        store.insert_product(laptop()).await.unwrap();

        // Second line fails: LP001 only has 10 in stock
        let lines = vec![
            LineItem {
                code: "LP001".to_string(),
                quantity: 6,
            },
            LineItem {
                code: "LP001".to_string(),
                quantity: 6,
            },
        ];
        let err = store.create_bill("a@b.com", &lines, None).await.unwrap_err();
        assert!(matches!(
            err,
            StoreError::Core(CoreError::InsufficientStock { .. })
        ));

        // Nothing was decremented, no bill recorded
        let product = store.get_product("LP001").await.unwrap().unwrap();
        assert_eq!(product.available_stock, 10);
        assert!(store.list_bills(0, 100).await.unwrap().is_empty());
    }
}
