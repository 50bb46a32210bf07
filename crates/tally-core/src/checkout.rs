//! # Checkout Module
//!
//! Whole-bill pricing: the arithmetic at the heart of the billing
//! backend, as a pure function both storage backends share.
//!
//! ## Validate First, Then Price
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                     price_bill(lines, tender)                           │
//! │                                                                         │
//! │  Phase 1: VALIDATE (no side effects anywhere)                          │
//! │  ├── every line: requested ≤ remaining stock                           │
//! │  │   (remaining accounts for earlier lines of the same product)        │
//! │  └── tender supplied? tendered ≥ final                                 │
//! │                                                                         │
//! │  Phase 2: PRICE                                                        │
//! │  ├── line_total = unit_price × quantity                                │
//! │  ├── line_tax   = line_total × rate (rounded per line)                 │
//! │  └── total/tax/final accumulated in request order                      │
//! │                                                                         │
//! │  The caller (a BillStore) persists the result and applies all stock    │
//! │  decrements atomically. A failure here means NOTHING was mutated -     │
//! │  unlike the system this replaces, which decremented stock line by      │
//! │  line and left earlier decrements in place when a later line failed.   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::collections::HashMap;

use crate::error::{CoreError, CoreResult};
use crate::money::Money;
use crate::tender::TenderBreakdown;
use crate::types::{BillItem, Product};
use crate::MAX_BILL_LINES;

// =============================================================================
// Priced Bill
// =============================================================================

/// The computed result of pricing a bill. Pure data, not yet persisted.
///
/// ## Invariants
/// - `final_cents == total_cents + tax_cents`
/// - `total_cents == Σ items.line_total_cents`
/// - `tax_cents == Σ items.tax_cents`
/// - When tender was supplied: `change_cents == tendered_cents - final_cents`
#[derive(Debug, Clone)]
pub struct PricedBill {
    /// Priced line items, in request order.
    pub items: Vec<BillItem>,
    /// Sum of line totals, before tax.
    pub total_cents: i64,
    /// Sum of per-line rounded taxes.
    pub tax_cents: i64,
    /// total + tax.
    pub final_cents: i64,
    /// Total cash tendered, when a breakdown was supplied.
    pub tendered_cents: Option<i64>,
    /// Change owed, when a breakdown was supplied.
    pub change_cents: Option<i64>,
}

impl PricedBill {
    /// Stock decrements to apply on persist: (product code, quantity).
    ///
    /// One entry per line, in request order. A product appearing on two
    /// lines yields two entries; stores may apply them separately or
    /// coalesce, the net effect is identical.
    pub fn stock_decrements(&self) -> impl Iterator<Item = (&str, i64)> {
        self.items
            .iter()
            .map(|item| (item.product_code.as_str(), item.quantity))
    }
}

// =============================================================================
// Pricing
// =============================================================================

/// Prices a whole bill from resolved products and requested quantities.
///
/// The caller has already resolved each requested code to a `Product`
/// (raising [`CoreError::ProductNotFound`] for misses); this function
/// owns everything after that: stock validation, line math, tax, and
/// the optional tender check.
///
/// ## Arguments
/// * `lines` - (product, requested quantity) pairs in request order
/// * `tender` - optional cash denomination breakdown
///
/// ## Errors
/// * [`CoreError::InsufficientStock`] - a line exceeds remaining stock
/// * [`CoreError::InsufficientPayment`] - tendered < final amount
/// * [`CoreError::TooManyLines`] - more than [`MAX_BILL_LINES`] lines
///
/// ## Example
/// ```rust
/// use chrono::Utc;
/// use tally_core::checkout::price_bill;
/// use tally_core::types::Product;
///
/// let laptop = Product {
///     id: 1,
///     code: "LP001".to_string(),
///     name: "Laptop".to_string(),
///     price_cents: 45000,
///     available_stock: 10,
///     tax_rate_bps: 1800,
///     created_at: Utc::now(),
///     updated_at: Utc::now(),
/// };
///
/// let priced = price_bill(&[(laptop, 1)], None).unwrap();
/// assert_eq!(priced.total_cents, 45000);
/// assert_eq!(priced.tax_cents, 8100);
/// assert_eq!(priced.final_cents, 53100);
/// ```
pub fn price_bill(
    lines: &[(Product, i64)],
    tender: Option<&TenderBreakdown>,
) -> CoreResult<PricedBill> {
    if lines.len() > MAX_BILL_LINES {
        return Err(CoreError::TooManyLines {
            max: MAX_BILL_LINES,
        });
    }

    // Remaining stock per product code. Two lines referencing the same
    // product must not jointly oversell it, so later lines see the
    // stock already claimed by earlier ones.
    let mut remaining: HashMap<&str, i64> = HashMap::new();

    let mut items = Vec::with_capacity(lines.len());
    let mut total = Money::zero();
    let mut tax = Money::zero();

    for (product, quantity) in lines {
        let quantity = *quantity;
        let left = remaining
            .entry(product.code.as_str())
            .or_insert(product.available_stock);

        if *left < quantity {
            return Err(CoreError::InsufficientStock {
                code: product.code.clone(),
                available: *left,
                requested: quantity,
            });
        }
        *left -= quantity;

        // Checked arithmetic: a price past MAX_PRICE_CENTS (from a
        // store that skipped validation) must error, never wrap.
        let overflow = || CoreError::AmountOverflow {
            code: product.code.clone(),
        };
        let line_total = product
            .price()
            .checked_multiply_quantity(quantity)
            .ok_or_else(overflow)?;
        let line_tax = line_total.tax(product.tax_rate());

        items.push(BillItem {
            product_code: product.code.clone(),
            product_name: product.name.clone(),
            unit_price_cents: product.price_cents,
            quantity,
            line_total_cents: line_total.cents(),
            tax_cents: line_tax.cents(),
        });

        total = total.checked_add(line_total).ok_or_else(overflow)?;
        tax = tax.checked_add(line_tax).ok_or_else(overflow)?;
    }

    let final_amount = total.checked_add(tax).ok_or_else(|| {
        CoreError::AmountOverflow {
            code: lines
                .last()
                .map(|(product, _)| product.code.clone())
                .unwrap_or_default(),
        }
    })?;

    let (tendered_cents, change_cents) = match tender {
        Some(breakdown) => {
            let tendered = breakdown.total();
            if tendered < final_amount {
                return Err(CoreError::InsufficientPayment {
                    tendered_cents: tendered.cents(),
                    required_cents: final_amount.cents(),
                });
            }
            (Some(tendered.cents()), Some((tendered - final_amount).cents()))
        }
        None => (None, None),
    };

    Ok(PricedBill {
        items,
        total_cents: total.cents(),
        tax_cents: tax.cents(),
        final_cents: final_amount.cents(),
        tendered_cents,
        change_cents,
    })
}

// =============================================================================
// Unit Tests
// =============================================================================
