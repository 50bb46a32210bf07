//! # Domain Types
//!
//! Core domain types used throughout Tally POS.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │    Product      │   │      Bill       │   │    BillItem     │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  id (row id)    │   │  id (row id)    │   │  product_code   │       │
//! │  │  code (business)│   │  customer_email │   │  unit_price     │       │
//! │  │  name           │   │  total_cents    │   │  line_total     │       │
//! │  │  price_cents    │   │  tax_cents      │   │  tax_cents      │       │
//! │  │  available_stock│   │  final_cents    │   │  (snapshots)    │       │
//! │  └─────────────────┘   └─────────────────┘   └─────────────────┘       │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐                             │
//! │  │    TaxRate      │   │    LineItem     │                             │
//! │  │  ─────────────  │   │  ─────────────  │                             │
//! │  │  bps (u32)      │   │  code           │  (transient request)        │
//! │  │  1800 = 18%     │   │  quantity       │                             │
//! │  └─────────────────┘   └─────────────────┘                             │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Dual-Key Identity Pattern
//! Products have:
//! - `id`: store-assigned row id - immutable, used for relations
//! - `code`: business identifier (e.g. "LP001") - human-readable, used on the wire

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::money::Money;
use crate::tender::TenderBreakdown;

// =============================================================================
// Tax Rate
// =============================================================================

/// Tax rate represented in basis points (bps).
///
/// ## Why Basis Points?
/// 1 basis point = 0.01% = 1/10000
/// 1800 bps = 18% (e.g., standard GST slab)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaxRate(u32);

impl TaxRate {
    /// Creates a tax rate from basis points.
    #[inline]
    pub const fn from_bps(bps: u32) -> Self {
        TaxRate(bps)
    }

    /// Creates a tax rate from a percentage (for convenience).
    pub fn from_percentage(pct: f64) -> Self {
        TaxRate((pct * 100.0).round() as u32)
    }

    /// Returns the rate in basis points.
    #[inline]
    pub const fn bps(&self) -> u32 {
        self.0
    }

    /// Returns the rate as a percentage (for display only).
    #[inline]
    pub fn percentage(&self) -> f64 {
        self.0 as f64 / 100.0
    }

    /// Zero tax rate.
    #[inline]
    pub const fn zero() -> Self {
        TaxRate(0)
    }

    /// Checks if tax rate is zero.
    #[inline]
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }
}

impl Default for TaxRate {
    fn default() -> Self {
        TaxRate::zero()
    }
}

// =============================================================================
// Product
// =============================================================================

/// A product available for sale.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Product {
    /// Store-assigned row id.
    pub id: i64,

    /// Business identifier (e.g. "LP001"). Unique.
    pub code: String,

    /// Display name shown on the bill.
    pub name: String,

    /// Price in cents (smallest currency unit).
    pub price_cents: i64,

    /// Current stock level. Never negative.
    pub available_stock: i64,

    /// Tax rate in basis points (1800 = 18%).
    pub tax_rate_bps: u32,

    /// When the product was created.
    pub created_at: DateTime<Utc>,

    /// When the product was last updated.
    pub updated_at: DateTime<Utc>,
}

impl Product {
    /// Returns the price as a Money type.
    #[inline]
    pub fn price(&self) -> Money {
        Money::from_cents(self.price_cents)
    }

    /// Returns the tax rate.
    #[inline]
    pub fn tax_rate(&self) -> TaxRate {
        TaxRate::from_bps(self.tax_rate_bps)
    }

    /// Checks if the requested quantity can be sold from current stock.
    #[inline]
    pub fn can_sell(&self, quantity: i64) -> bool {
        self.available_stock >= quantity
    }
}

/// Fields supplied by the caller when creating a product.
///
/// The store assigns `id` and the timestamps.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewProduct {
    pub code: String,
    pub name: String,
    pub price_cents: i64,
    pub available_stock: i64,
    pub tax_rate_bps: u32,
}

// =============================================================================
// Line Item Request
// =============================================================================

/// One requested line of a bill: which product, how many.
///
/// Transient - supplied by the caller, never persisted as-is.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineItem {
    /// Product business code (e.g. "LP001").
    pub code: String,
    /// Requested quantity. Must be positive.
    pub quantity: i64,
}

// =============================================================================
// Bill Item
// =============================================================================

/// A line item on a persisted bill.
/// Uses the snapshot pattern to freeze product data at time of sale.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BillItem {
    /// Product code at time of sale (frozen).
    pub product_code: String,
    /// Product name at time of sale (frozen).
    pub product_name: String,
    /// Unit price in cents at time of sale (frozen).
    pub unit_price_cents: i64,
    /// Quantity sold.
    pub quantity: i64,
    /// Line total before tax (unit_price × quantity).
    pub line_total_cents: i64,
    /// Tax for this line item.
    pub tax_cents: i64,
}

impl BillItem {
    /// Returns the unit price as Money.
    #[inline]
    pub fn unit_price(&self) -> Money {
        Money::from_cents(self.unit_price_cents)
    }

    /// Returns the line total as Money.
    #[inline]
    pub fn line_total(&self) -> Money {
        Money::from_cents(self.line_total_cents)
    }
}

// =============================================================================
// Bill
// =============================================================================

/// A completed sale transaction.
///
/// ## Invariants
/// - `final_cents == total_cents + tax_cents`
/// - `total_cents == Σ items.line_total_cents`
/// - `tax_cents == Σ items.tax_cents`
/// - When tender is present: `change_cents == tendered_cents - final_cents`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Bill {
    /// Store-assigned row id.
    pub id: i64,
    /// Customer identifier (email).
    pub customer_email: String,
    /// Line items in request order.
    pub items: Vec<BillItem>,
    /// Sum of line totals, before tax.
    pub total_cents: i64,
    /// Sum of line taxes.
    pub tax_cents: i64,
    /// total + tax.
    pub final_cents: i64,
    /// Denomination breakdown of the cash tendered, if supplied.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tender: Option<TenderBreakdown>,
    /// Total cash tendered, if tender was supplied.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tendered_cents: Option<i64>,
    /// Change returned to the customer, if tender was supplied.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub change_cents: Option<i64>,
    /// When the bill was created.
    pub created_at: DateTime<Utc>,
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tax_rate_from_bps() {
        let rate = TaxRate::from_bps(1800);
        assert_eq!(rate.bps(), 1800);
        assert!((rate.percentage() - 18.0).abs() < 0.001);
    }

    #[test]
    fn test_tax_rate_from_percentage() {
        let rate = TaxRate::from_percentage(8.25);
        assert_eq!(rate.bps(), 825);
    }

    #[test]
    fn test_product_can_sell() {
        let product = Product {
            id: 1,
            code: "LP001".to_string(),
            name: "Laptop".to_string(),
            price_cents: 45000,
            available_stock: 10,
            tax_rate_bps: 1800,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };

        assert!(product.can_sell(10));
        assert!(!product.can_sell(11));
    }
}
