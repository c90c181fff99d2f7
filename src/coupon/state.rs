//! Application State
//!
//! Shared state handed to every handler: just the coupon catalog. The
//! engine itself is stateless, so nothing else lives here.

use super::catalog::InMemoryCatalog;
use std::sync::Arc;

/// Shared application state that can be safely passed between threads
pub type SharedState = Arc<AppState>;

/// Core application state holding the coupon catalog
pub struct AppState {
    /// The coupon store backing the CRUD and discount endpoints
    pub catalog: InMemoryCatalog,
}

impl Default for AppState {
    fn default() -> Self {
        Self::new()
    }
}

impl AppState {
    /// Creates a new AppState with an empty catalog
    pub fn new() -> Self {
        Self {
            catalog: InMemoryCatalog::new(),
        }
    }
}
