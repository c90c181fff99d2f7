//! Coupon Domain Module
//!
//! This module contains all coupon business logic, including:
//! - Domain models (Cart, Coupon, DiscountResult)
//! - The eligibility filter and discount calculator
//! - The catalog port and its in-memory implementation
//! - Orchestration services and REST API handlers

pub mod catalog;
pub mod engine;
pub mod error;
pub mod handlers;
pub mod models;
pub mod service;
pub mod state;

// Re-export commonly used types for convenience
pub use handlers::routes;
pub use state::{AppState, SharedState};
