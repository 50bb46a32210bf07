//! Contract tests: every `BillStore` backend must behave identically.
//!
//! Each test runs once against the in-memory store and once against an
//! in-memory SQLite store, so a divergence between backends fails here
//! before it can ship.

use std::sync::Arc;

use tally_core::{CoreError, LineItem, NewProduct, TenderBreakdown};
use tally_store::{seed, BillStore, DbConfig, MemoryStore, SqliteStore, StoreError};

/// Builds one store of each backend, freshly seeded with the demo
/// catalogue (LP001 45000/18% ×10, MS001 500/12% ×20, KB001 1000/12% ×15).
async fn seeded_stores() -> Vec<Arc<dyn BillStore>> {
    let memory = Arc::new(MemoryStore::new()) as Arc<dyn BillStore>;
    let sqlite = Arc::new(SqliteStore::new(DbConfig::in_memory()).await.unwrap())
        as Arc<dyn BillStore>;

    for store in [&memory, &sqlite] {
        seed::seed_demo(store.as_ref()).await.unwrap();
    }

    vec![memory, sqlite]
}

fn line(code: &str, quantity: i64) -> LineItem {
    LineItem {
        code: code.to_string(),
        quantity,
    }
}

#[tokio::test]
async fn product_roundtrip_and_listing() {
    for store in seeded_stores().await {
        let product = store.get_product("LP001").await.unwrap().unwrap();
        assert_eq!(product.name, "Laptop");
        assert_eq!(product.price_cents, 45000);
        assert_eq!(product.available_stock, 10);
        assert_eq!(product.tax_rate_bps, 1800);

        assert!(store.get_product("NOPE").await.unwrap().is_none());

        let all = store.list_products(0, 100).await.unwrap();
        let codes: Vec<_> = all.iter().map(|p| p.code.as_str()).collect();
        assert_eq!(codes, vec!["LP001", "MS001", "KB001"]);

        // Offset/limit pagination
        let page = store.list_products(1, 1).await.unwrap();
        assert_eq!(page.len(), 1);
        assert_eq!(page[0].code, "MS001");
    }
}

#[tokio::test]
async fn duplicate_product_code_rejected() {
    for store in seeded_stores().await {
        let err = store
            .insert_product(NewProduct {
                code: "LP001".to_string(),
                name: "Another laptop".to_string(),
                price_cents: 1,
                available_stock: 1,
                tax_rate_bps: 0,
            })
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::UniqueViolation { .. }));
    }
}

#[tokio::test]
async fn single_line_bill_totals_and_stock() {
    for store in seeded_stores().await {
        let bill = store
            .create_bill("alex@example.com", &[line("LP001", 1)], None)
            .await
            .unwrap();

        assert_eq!(bill.total_cents, 45000);
        assert_eq!(bill.tax_cents, 8100);
        assert_eq!(bill.final_cents, 53100);
        assert_eq!(bill.items.len(), 1);
        assert_eq!(bill.items[0].product_code, "LP001");
        assert_eq!(bill.items[0].unit_price_cents, 45000);
        assert!(bill.tendered_cents.is_none());
        assert!(bill.change_cents.is_none());

        let product = store.get_product("LP001").await.unwrap().unwrap();
        assert_eq!(product.available_stock, 9);
    }
}

#[tokio::test]
async fn multi_line_bill_totals() {
    for store in seeded_stores().await {
        let bill = store
            .create_bill(
                "alex@example.com",
                &[line("LP001", 1), line("MS001", 2)],
                None,
            )
            .await
            .unwrap();

        assert_eq!(bill.items[1].line_total_cents, 1000);
        assert_eq!(bill.items[1].tax_cents, 120);
        assert_eq!(bill.total_cents, 46000);
        assert_eq!(bill.tax_cents, 8220);
        assert_eq!(bill.final_cents, 54220);

        // Invariants hold against the persisted items
        let item_total: i64 = bill.items.iter().map(|i| i.line_total_cents).sum();
        let item_tax: i64 = bill.items.iter().map(|i| i.tax_cents).sum();
        assert_eq!(bill.total_cents, item_total);
        assert_eq!(bill.tax_cents, item_tax);
        assert_eq!(bill.final_cents, item_total + item_tax);
    }
}

#[tokio::test]
async fn unknown_product_fails_bill() {
    for store in seeded_stores().await {
        let err = store
            .create_bill("alex@example.com", &[line("NOPE", 1)], None)
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            StoreError::Core(CoreError::ProductNotFound(code)) if code == "NOPE"
        ));
    }
}

#[tokio::test]
async fn insufficient_stock_fails_and_mutates_nothing() {
    for store in seeded_stores().await {
        let err = store
            .create_bill(
                "alex@example.com",
                &[line("MS001", 2), line("LP001", 11)],
                None,
            )
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            StoreError::Core(CoreError::InsufficientStock {
                available: 10,
                requested: 11,
                ..
            })
        ));

        // The earlier valid line must not have been applied either
        let mouse = store.get_product("MS001").await.unwrap().unwrap();
        assert_eq!(mouse.available_stock, 20);
        assert!(store.list_bills(0, 100).await.unwrap().is_empty());
    }
}

#[tokio::test]
async fn tender_computes_change() {
    for store in seeded_stores().await {
        let tender: TenderBreakdown = [(50000, 1), (1000, 4)].into_iter().collect();
        let bill = store
            .create_bill("alex@example.com", &[line("LP001", 1)], Some(tender.clone()))
            .await
            .unwrap();

        assert_eq!(bill.tendered_cents, Some(54000));
        assert_eq!(bill.change_cents, Some(900));
        assert_eq!(bill.tender, Some(tender));
    }
}

#[tokio::test]
async fn insufficient_tender_fails_bill() {
    for store in seeded_stores().await {
        let tender: TenderBreakdown = [(50000, 1)].into_iter().collect();
        let err = store
            .create_bill("alex@example.com", &[line("LP001", 1)], Some(tender))
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            StoreError::Core(CoreError::InsufficientPayment {
                tendered_cents: 50000,
                required_cents: 53100,
            })
        ));

        // Payment failure must not decrement stock
        let laptop = store.get_product("LP001").await.unwrap().unwrap();
        assert_eq!(laptop.available_stock, 10);
    }
}

#[tokio::test]
async fn bills_listed_in_creation_order_and_filtered_by_customer() {
    for store in seeded_stores().await {
        store
            .create_bill("first@example.com", &[line("MS001", 1)], None)
            .await
            .unwrap();
        store
            .create_bill("second@example.com", &[line("KB001", 1)], None)
            .await
            .unwrap();
        store
            .create_bill("first@example.com", &[line("MS001", 2)], None)
            .await
            .unwrap();

        let all = store.list_bills(0, 100).await.unwrap();
        assert_eq!(all.len(), 3);
        assert!(all.windows(2).all(|w| w[0].id < w[1].id));

        let firsts = store.bills_for_customer("first@example.com").await.unwrap();
        assert_eq!(firsts.len(), 2);
        assert!(firsts.iter().all(|b| b.customer_email == "first@example.com"));
        assert!(firsts[0].id < firsts[1].id);
        assert_eq!(firsts[0].items[0].quantity, 1);
        assert_eq!(firsts[1].items[0].quantity, 2);

        assert!(store
            .bills_for_customer("nobody@example.com")
            .await
            .unwrap()
            .is_empty());

        // Pagination over bills
        let page = store.list_bills(1, 1).await.unwrap();
        assert_eq!(page.len(), 1);
        assert_eq!(page[0].customer_email, "second@example.com");
    }
}

#[tokio::test]
async fn stock_drains_across_sequential_bills() {
    for store in seeded_stores().await {
        // 10 in stock: 4 + 6 succeed, the next one fails
        store
            .create_bill("a@example.com", &[line("LP001", 4)], None)
            .await
            .unwrap();
        store
            .create_bill("b@example.com", &[line("LP001", 6)], None)
            .await
            .unwrap();

        let err = store
            .create_bill("c@example.com", &[line("LP001", 1)], None)
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            StoreError::Core(CoreError::InsufficientStock { available: 0, .. })
        ));

        let laptop = store.get_product("LP001").await.unwrap().unwrap();
        assert_eq!(laptop.available_stock, 0);
    }
}
