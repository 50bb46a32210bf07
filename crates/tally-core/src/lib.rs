//! # tally-core: Pure Business Logic for Tally POS
//!
//! This crate is the **heart** of the billing backend. It contains all
//! business logic as pure functions with zero I/O dependencies.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Tally POS Architecture                           │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                    HTTP API (apps/server)                       │   │
//! │  │    POST /api/products/  POST /api/bills/  GET /api/bills/      │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                    tally-store (BillStore trait)                │   │
//! │  │         SQLite backend          In-memory backend               │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               ★ tally-core (THIS CRATE) ★                       │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌───────────┐  ┌───────────┐  ┌───────────┐  │   │
//! │  │   │   types   │  │   money   │  │  checkout │  │  tender   │  │   │
//! │  │   │  Product  │  │   Money   │  │price_bill │  │ change    │  │   │
//! │  │   │   Bill    │  │  TaxCalc  │  │           │  │ math      │  │   │
//! │  │   └───────────┘  └───────────┘  └───────────┘  └───────────┘  │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO DATABASE • NO NETWORK • PURE FUNCTIONS           │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Domain types (Product, Bill, BillItem, TaxRate)
//! - [`money`] - Money type with integer arithmetic (no floating point!)
//! - [`checkout`] - Whole-bill pricing (validate first, then compute)
//! - [`tender`] - Cash denomination breakdown and change calculation
//! - [`error`] - Domain error types
//! - [`validation`] - Business rule validation
//!
//! ## Design Principles
//!
//! 1. **Pure Functions**: Every function is deterministic - same input = same output
//! 2. **No I/O**: Database, network, file system access is FORBIDDEN here
//! 3. **Integer Money**: All monetary values are in cents (i64) to avoid float errors
//! 4. **Explicit Errors**: All errors are typed, never strings or panics
//!
//! ## Example Usage
//!
//! ```rust
//! use tally_core::money::Money;
//! use tally_core::types::TaxRate;
//!
//! // Create money from cents (never from floats!)
//! let price = Money::from_cents(45000);
//!
//! // Tax at 18% = 1800 basis points
//! let tax_rate = TaxRate::from_bps(1800);
//! let tax = price.tax(tax_rate);
//!
//! assert_eq!(tax.cents(), 8100);
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod checkout;
pub mod error;
pub mod money;
pub mod tender;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================
// These allow users to do `use tally_core::Money` instead of
// `use tally_core::money::Money`

pub use checkout::{price_bill, PricedBill};
pub use error::{CoreError, CoreResult, ValidationError};
pub use money::Money;
pub use tender::TenderBreakdown;
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Maximum line items allowed in a single bill
///
/// ## Business Reason
/// Prevents runaway requests and ensures reasonable transaction sizes.
pub const MAX_BILL_LINES: usize = 100;

/// Maximum quantity of a single item in a bill
///
/// ## Business Reason
/// Prevents accidental over-ordering (e.g., typing 1000 instead of 10)
pub const MAX_LINE_QUANTITY: i64 = 999;

/// Maximum product price in cents (ten billion currency units)
///
/// ## Business Reason
/// No real product costs this much; the cap also keeps
/// `price × MAX_LINE_QUANTITY × MAX_BILL_LINES` comfortably inside i64.
pub const MAX_PRICE_CENTS: i64 = 1_000_000_000_000;
