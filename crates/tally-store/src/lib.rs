//! # tally-store: Storage Layer for Tally POS
//!
//! One storage contract, two interchangeable backends.
//!
//! ## Why a Trait?
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Storage Architecture                               │
//! │                                                                         │
//! │                    ┌────────────────────┐                               │
//! │                    │  trait BillStore   │  get/insert/list products,    │
//! │                    │  (store.rs)        │  create/list bills            │
//! │                    └─────────┬──────────┘                               │
//! │                              │                                          │
//! │              ┌───────────────┴───────────────┐                          │
//! │              ▼                               ▼                          │
//! │     ┌─────────────────┐            ┌──────────────────┐                 │
//! │     │  SqliteStore    │            │   MemoryStore    │                 │
//! │     │  (sqlite.rs)    │            │   (memory.rs)    │                 │
//! │     │                 │            │                  │                 │
//! │     │  sqlx pool      │            │  Mutex-guarded   │                 │
//! │     │  WAL mode       │            │  maps, explicit  │                 │
//! │     │  transactions   │            │  construction    │                 │
//! │     └─────────────────┘            └──────────────────┘                 │
//! │                                                                         │
//! │  The system this replaces kept TWO copies of the bill arithmetic,      │
//! │  one per backend. Here both backends call tally_core::price_bill and   │
//! │  only differ in how they persist the result.                           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Atomicity
//! Bill creation is all-or-nothing on both backends: every line is
//! validated before any stock is touched, and the bill, its items, and
//! all stock decrements land in one transaction (SQLite) or one locked
//! critical section (memory).

pub mod error;
pub mod memory;
pub mod seed;
pub mod sqlite;
pub mod store;

pub use error::{StoreError, StoreResult};
pub use memory::MemoryStore;
pub use sqlite::{DbConfig, SqliteStore};
pub use store::BillStore;
