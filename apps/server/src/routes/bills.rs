//! Bill handlers.
//!
//! Bill creation is the heart of the API: it validates the request
//! shape here, then hands the whole thing to the store, which prices
//! the bill and decrements stock atomically.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;
use tracing::info;

use tally_core::validation::{validate_bill_lines, validate_customer_email};
use tally_core::{Bill, LineItem, TenderBreakdown};

use crate::error::ApiError;
use crate::routes::Pagination;
use crate::state::AppState;

/// Request body for `POST /api/bills/`.
#[derive(Debug, Deserialize)]
pub struct CreateBillRequest {
    pub customer_email: String,

    /// Requested lines, in the order they should appear on the bill.
    pub items: Vec<LineItem>,

    /// Cash handed over, as denomination → count. Omit for bills that
    /// skip the payment step.
    #[serde(default)]
    pub denominations: Option<TenderBreakdown>,
}

/// `POST /api/bills/` - creates a bill.
///
/// On success the stock of every referenced product has been
/// decremented and the bill is persisted. On any failure nothing
/// has changed.
pub async fn create_bill(
    State(state): State<AppState>,
    Json(payload): Json<CreateBillRequest>,
) -> Result<(StatusCode, Json<Bill>), ApiError> {
    validate_customer_email(&payload.customer_email)?;
    validate_bill_lines(&payload.items)?;

    // Validation trims codes before checking; resolve against the
    // same trimmed values.
    let items: Vec<LineItem> = payload
        .items
        .into_iter()
        .map(|line| LineItem {
            code: line.code.trim().to_string(),
            quantity: line.quantity,
        })
        .collect();

    let bill = state
        .store
        .create_bill(payload.customer_email.trim(), &items, payload.denominations)
        .await?;

    info!(
        bill_id = bill.id,
        customer = %bill.customer_email,
        final_cents = bill.final_cents,
        "Bill created"
    );

    Ok((StatusCode::CREATED, Json(bill)))
}

/// `GET /api/bills/` - lists bills in creation order.
pub async fn list_bills(
    State(state): State<AppState>,
    Query(page): Query<Pagination>,
) -> Result<Json<Vec<Bill>>, ApiError> {
    let bills = state
        .store
        .list_bills(page.skip, page.clamped_limit())
        .await?;
    Ok(Json(bills))
}

/// `GET /api/bills/{customer_email}` - lists one customer's bills.
///
/// Returns an empty array for a customer with no bills; an unknown
/// customer is not an error.
pub async fn bills_for_customer(
    State(state): State<AppState>,
    Path(customer_email): Path<String>,
) -> Result<Json<Vec<Bill>>, ApiError> {
    validate_customer_email(&customer_email)?;

    let bills = state
        .store
        .bills_for_customer(customer_email.trim())
        .await?;
    Ok(Json(bills))
}
