//! Shared application state.

use std::sync::Arc;

use tally_store::BillStore;

/// State handed to every handler.
///
/// Cloning is cheap: the store is behind an `Arc`, so handlers across
/// all worker tasks share one backend instance.
#[derive(Clone)]
pub struct AppState {
    /// The storage backend (SQLite or in-memory).
    pub store: Arc<dyn BillStore>,
}

impl AppState {
    pub fn new(store: Arc<dyn BillStore>) -> Self {
        AppState { store }
    }
}
