//! Product catalogue handlers.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use tracing::info;

use tally_core::validation::{validate_code, validate_new_product};
use tally_core::{NewProduct, Product};

use crate::error::{ApiError, ErrorCode};
use crate::routes::Pagination;
use crate::state::AppState;

/// `POST /api/products/` - creates a product.
///
/// Returns `201 Created` with the stored product, including its
/// assigned id and timestamps.
pub async fn create_product(
    State(state): State<AppState>,
    Json(payload): Json<NewProduct>,
) -> Result<(StatusCode, Json<Product>), ApiError> {
    validate_new_product(&payload)?;

    // Validation trims before checking; persist the same trimmed
    // values so the stored code matches path lookups.
    let payload = NewProduct {
        code: payload.code.trim().to_string(),
        name: payload.name.trim().to_string(),
        ..payload
    };

    let product = state.store.insert_product(payload).await?;
    info!(code = %product.code, id = product.id, "Product created");

    Ok((StatusCode::CREATED, Json(product)))
}

/// `GET /api/products/` - lists products in insertion order.
pub async fn list_products(
    State(state): State<AppState>,
    Query(page): Query<Pagination>,
) -> Result<Json<Vec<Product>>, ApiError> {
    let products = state
        .store
        .list_products(page.skip, page.clamped_limit())
        .await?;
    Ok(Json(products))
}

/// `GET /api/products/{code}` - fetches one product by business code.
pub async fn get_product(
    State(state): State<AppState>,
    Path(code): Path<String>,
) -> Result<Json<Product>, ApiError> {
    validate_code(&code)?;

    let code = code.trim();
    match state.store.get_product(code).await? {
        Some(product) => Ok(Json(product)),
        None => Err(ApiError::new(
            ErrorCode::NotFound,
            format!("Product not found: {code}"),
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use tally_store::MemoryStore;

    fn state() -> AppState {
        AppState::new(Arc::new(MemoryStore::new()))
    }

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
    async fn test_create_then_get() {
        let state = state();

        let (status, Json(created)) =
            create_product(State(state.clone()), Json(laptop())).await.unwrap();
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(created.code, "LP001");
        assert!(created.id > 0);

        let Json(fetched) = get_product(State(state), Path("LP001".to_string()))
            .await
            .unwrap();
        assert_eq!(fetched.id, created.id);
        assert_eq!(fetched.price_cents, 45000);
    }

    #[tokio::test]
    async fn test_get_unknown_is_not_found() {
        let err = get_product(State(state()), Path("NOPE".to_string()))
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::NotFound);
    }

    #[tokio::test]
    async fn test_invalid_payload_rejected_before_store() {
        let mut bad = laptop();
        bad.code = "has space".to_string();

        let err = create_product(State(state()), Json(bad)).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::ValidationError);
    }

    #[tokio::test]
    async fn test_padded_code_stored_trimmed_and_reachable() {
        let state = state();

        let mut padded = laptop();
        padded.code = " LP001 ".to_string();
        padded.name = " Laptop ".to_string();

        let (_, Json(created)) =
            create_product(State(state.clone()), Json(padded)).await.unwrap();
        assert_eq!(created.code, "LP001");
        assert_eq!(created.name, "Laptop");

        // Reachable via the trimmed path segment
        let Json(fetched) = get_product(State(state), Path("LP001".to_string()))
            .await
            .unwrap();
        assert_eq!(fetched.id, created.id);
    }

    #[tokio::test]
    async fn test_duplicate_code_conflicts() {
        let state = state();
        create_product(State(state.clone()), Json(laptop())).await.unwrap();

        let err = create_product(State(state), Json(laptop())).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::Conflict);
    }

    #[tokio::test]
    async fn test_list_paginates() {
        let state = state();
        for code in ["A1", "B2", "C3"] {
            let mut p = laptop();
            p.code = code.to_string();
            create_product(State(state.clone()), Json(p)).await.unwrap();
        }

        let Json(page) = list_products(
            State(state),
            Query(Pagination { skip: 1, limit: 1 }),
        )
        .await
        .unwrap();
        assert_eq!(page.len(), 1);
        assert_eq!(page[0].code, "B2");
    }
}
