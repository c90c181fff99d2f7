//! Coupon Service Library
//!
//! This library stores coupon records and computes the monetary discount a
//! coupon yields against a shopping cart, across three coupon kinds:
//! cart-wide percentage, product-restricted percentage, and buy-X-get-Y
//! free-item promotions.

// Domain modules
pub mod coupon;

// Infrastructure
pub mod router;
