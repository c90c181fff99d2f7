//! REST API handlers for coupon operations
//!
//! This module implements the HTTP endpoints for the coupon catalog CRUD
//! surface and the two discount endpoints.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{delete, get, post, put},
    Json, Router,
};
use serde_json::json;

use super::error::ServiceError;
use super::models::{CartRequest, CouponId, CreateCoupon, UpdateCoupon};
use super::service;
use super::state::SharedState;

/// Creates routes for coupon-related operations
pub fn routes() -> Router<SharedState> {
    Router::new()
        .route("/create-coupons", post(create_coupon))
        .route("/find-all-coupons", get(find_all_coupons))
        .route("/coupons/:id", get(find_coupon_by_id))
        .route("/update-coupon/:id", put(update_coupon))
        .route("/delete/:id", delete(delete_coupon))
        .route("/applicable-coupons", post(applicable_coupons))
        .route("/apply-coupon/:id", post(apply_coupon))
}

/// Endpoint: POST /create-coupons
/// Stores a new coupon and returns it with its assigned id.
async fn create_coupon(
    State(state): State<SharedState>,
    Json(payload): Json<CreateCoupon>,
) -> impl IntoResponse {
    let coupon = state.catalog.create(payload);
    (StatusCode::CREATED, Json(coupon))
}

/// Endpoint: GET /find-all-coupons
/// Returns every stored coupon in creation order.
async fn find_all_coupons(State(state): State<SharedState>) -> impl IntoResponse {
    Json(state.catalog.all())
}

/// Endpoint: GET /coupons/:id
async fn find_coupon_by_id(
    State(state): State<SharedState>,
    Path(id): Path<CouponId>,
) -> Result<impl IntoResponse, ServiceError> {
    let coupon = state.catalog.get(id).ok_or(ServiceError::NotFound(id))?;
    Ok(Json(coupon))
}

/// Endpoint: PUT /update-coupon/:id
/// Updates the active flag and/or replaces the kind payload.
async fn update_coupon(
    State(state): State<SharedState>,
    Path(id): Path<CouponId>,
    Json(payload): Json<UpdateCoupon>,
) -> Result<impl IntoResponse, ServiceError> {
    let kind = payload
        .kind()
        .map_err(|e| ServiceError::InvalidRequest(e.to_string()))?;

    let coupon = state
        .catalog
        .update(id, payload.is_active, kind)
        .ok_or(ServiceError::NotFound(id))?;

    Ok(Json(coupon))
}

/// Endpoint: DELETE /delete/:id
async fn delete_coupon(
    State(state): State<SharedState>,
    Path(id): Path<CouponId>,
) -> Result<impl IntoResponse, ServiceError> {
    if state.catalog.delete(id) {
        Ok(Json(json!({ "message": "Coupon deleted successfully" })))
    } else {
        Err(ServiceError::NotFound(id))
    }
}

/// Endpoint: POST /applicable-coupons
/// Prices every relevant coupon against the posted cart.
async fn applicable_coupons(
    State(state): State<SharedState>,
    Json(payload): Json<CartRequest>,
) -> Result<impl IntoResponse, ServiceError> {
    payload
        .cart
        .ensure_valid()
        .map_err(|e| ServiceError::InvalidRequest(e.to_string()))?;

    let results = service::list_applicable(&state.catalog, &payload.cart).await?;
    Ok(Json(results))
}

/// Endpoint: POST /apply-coupon/:id
/// Applies one coupon to the posted cart.
async fn apply_coupon(
    State(state): State<SharedState>,
    Path(id): Path<CouponId>,
    Json(payload): Json<CartRequest>,
) -> Result<impl IntoResponse, ServiceError> {
    payload
        .cart
        .ensure_valid()
        .map_err(|e| ServiceError::InvalidRequest(e.to_string()))?;

    let result = service::apply_coupon(&state.catalog, id, &payload.cart).await?;
    Ok(Json(result))
}
