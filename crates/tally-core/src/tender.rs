//! # Tender Module
//!
//! Cash denomination breakdown and change calculation.
//!
//! ## User Workflow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Tender Flow                                          │
//! │                                                                         │
//! │  Bill final amount: 53100                                               │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  Customer hands over: 1 × 50000, 4 × 1000                               │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  TenderBreakdown { 50000: 1, 1000: 4 } → tendered = 54000               │
//! │       │                                                                 │
//! │       ├── tendered < final? → InsufficientPayment                       │
//! │       │                                                                 │
//! │       └── OK → change = 54000 - 53100 = 900                             │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Tender is optional on a bill: when the caller omits it, no payment
//! check is performed and no change is recorded.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::money::Money;

/// A breakdown of cash tendered: denomination value (in cents) → note count.
///
/// ## Why BTreeMap?
/// Deterministic ordering makes serialized bills stable and lets a
/// receipt print denominations in value order with one pass.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TenderBreakdown {
    /// denomination value in cents → count of notes/coins
    pub denominations: BTreeMap<i64, u32>,
}

impl TenderBreakdown {
    /// Creates an empty breakdown.
    pub fn new() -> Self {
        TenderBreakdown {
            denominations: BTreeMap::new(),
        }
    }

    /// Adds `count` notes of the given denomination.
    pub fn add(&mut self, denomination_cents: i64, count: u32) {
        if count == 0 {
            return;
        }
        *self.denominations.entry(denomination_cents).or_insert(0) += count;
    }

    /// Total value tendered: Σ denomination × count.
    ///
    /// ## Example
    /// ```rust
    /// use tally_core::tender::TenderBreakdown;
    ///
    /// let mut tender = TenderBreakdown::new();
    /// tender.add(50000, 1);
    /// tender.add(1000, 4);
    /// assert_eq!(tender.total().cents(), 54000);
    /// ```
    pub fn total(&self) -> Money {
        let cents: i64 = self
            .denominations
            .iter()
            .map(|(denomination, count)| denomination * *count as i64)
            .sum();
        Money::from_cents(cents)
    }

    /// Checks if no denominations were supplied.
    pub fn is_empty(&self) -> bool {
        self.denominations.is_empty()
    }
}

impl FromIterator<(i64, u32)> for TenderBreakdown {
    fn from_iter<T: IntoIterator<Item = (i64, u32)>>(iter: T) -> Self {
        let mut tender = TenderBreakdown::new();
        for (denomination, count) in iter {
            tender.add(denomination, count);
        }
        tender
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_total() {
        let tender: TenderBreakdown = [(50000, 1), (1000, 4)].into_iter().collect();
        assert_eq!(tender.total().cents(), 54000);
    }

    #[test]
    fn test_empty_total_is_zero() {
        let tender = TenderBreakdown::new();
        assert!(tender.is_empty());
        assert!(tender.total().is_zero());
    }

    #[test]
    fn test_add_merges_same_denomination() {
        let mut tender = TenderBreakdown::new();
        tender.add(1000, 2);
        tender.add(1000, 3);
        assert_eq!(tender.denominations.get(&1000), Some(&5));
    }

    #[test]
    fn test_add_zero_count_is_ignored() {
        let mut tender = TenderBreakdown::new();
        tender.add(1000, 0);
        assert!(tender.is_empty());
    }

    #[test]
    fn test_json_round_trip_uses_string_keys() {
        // JSON object keys are strings; serde_json maps them back to i64
        let tender: TenderBreakdown = [(500, 2)].into_iter().collect();
        let json = serde_json::to_string(&tender).unwrap();
        assert_eq!(json, r#"{"500":2}"#);

        let back: TenderBreakdown = serde_json::from_str(&json).unwrap();
        assert_eq!(back, tender);
    }
}
