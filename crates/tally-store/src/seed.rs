//! # Demo Seed Data
//!
//! The three demo products the original system shipped with. Useful
//! for local development and for exercising the API by hand.

use tracing::info;

use tally_core::NewProduct;

use crate::error::{StoreError, StoreResult};
use crate::store::BillStore;

/// The demo catalogue: a laptop, a mouse, and a keyboard.
pub fn demo_products() -> Vec<NewProduct> {
    vec![
        NewProduct {
            code: "LP001".to_string(),
            name: "Laptop".to_string(),
            price_cents: 45000,
            available_stock: 10,
            tax_rate_bps: 1800, // 18%
        },
        NewProduct {
            code: "MS001".to_string(),
            name: "Mouse".to_string(),
            price_cents: 500,
            available_stock: 20,
            tax_rate_bps: 1200, // 12%
        },
        NewProduct {
            code: "KB001".to_string(),
            name: "Keyboard".to_string(),
            price_cents: 1000,
            available_stock: 15,
            tax_rate_bps: 1200, // 12%
        },
    ]
}

/// Seeds the demo catalogue into a store.
///
/// Idempotent: products that already exist are skipped, so this is
/// safe to run on every startup of a dev server.
///
/// ## Returns
/// The number of products actually inserted.
pub async fn seed_demo(store: &dyn BillStore) -> StoreResult<usize> {
    let mut inserted = 0;

    for product in demo_products() {
        match store.insert_product(product).await {
            Ok(_) => inserted += 1,
            Err(StoreError::UniqueViolation { .. }) => {
                // Already seeded on a previous run
            }
            Err(other) => return Err(other),
        }
    }

    info!(inserted, "Demo catalogue seeded");
    Ok(inserted)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::MemoryStore;

    #[tokio::test]
    async fn test_seed_is_idempotent() {
        let store = MemoryStore::new();

        assert_eq!(seed_demo(&store).await.unwrap(), 3);
        assert_eq!(seed_demo(&store).await.unwrap(), 0);

        let products = store.list_products(0, 100).await.unwrap();
        assert_eq!(products.len(), 3);
    }
}
