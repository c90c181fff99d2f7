//! Discount Services
//!
//! Orchestration over the catalog and the engine: list every applicable
//! coupon for a cart, or apply one coupon by id. Both are thin and stateless;
//! the catalog lookup is the only suspension point.

use tracing::warn;

use super::catalog::CouponCatalog;
use super::engine;
use super::error::ServiceError;
use super::models::{Cart, CouponId, DiscountResult};

/// Prices every relevant coupon in the catalog against a cart.
///
/// Candidates come out of the eligibility filter in catalog order and are
/// priced in that order; results are never sorted by discount value.
/// Inactive coupons stay in the listing — activity is only enforced at
/// apply time. A candidate whose payload fails computation is skipped with
/// a warning so one malformed record cannot poison the whole listing.
pub async fn list_applicable(
    catalog: &dyn CouponCatalog,
    cart: &Cart,
) -> Result<Vec<DiscountResult>, ServiceError> {
    let coupons = catalog.get_all().await?;
    let candidates = engine::eligible_coupons(cart, &coupons);

    let mut results = Vec::with_capacity(candidates.len());
    for coupon in candidates {
        match engine::compute_discount(cart, coupon) {
            Ok(amount) => results.push(DiscountResult::new(coupon, amount)),
            Err(err) => {
                warn!(coupon_id = %coupon.id, error = %err, "skipping coupon with invalid payload");
            }
        }
    }

    Ok(results)
}

/// Applies a single coupon to a cart.
///
/// No eligibility pre-check here — the caller picked the coupon. Fails with
/// [`ServiceError::NotFound`] for unknown ids and [`ServiceError::Inactive`]
/// for coupons whose active flag is off.
pub async fn apply_coupon(
    catalog: &dyn CouponCatalog,
    id: CouponId,
    cart: &Cart,
) -> Result<DiscountResult, ServiceError> {
    let coupon = catalog
        .get_by_id(id)
        .await?
        .ok_or(ServiceError::NotFound(id))?;

    if !coupon.is_active {
        return Err(ServiceError::Inactive(id));
    }

    let amount = engine::compute_discount(cart, &coupon)
        .map_err(|source| ServiceError::Computation { id, source })?;

    Ok(DiscountResult::new(&coupon, amount))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::coupon::catalog::{CatalogError, InMemoryCatalog};
    use crate::coupon::models::{Coupon, CreateCoupon};
    use async_trait::async_trait;
    use serde_json::json;
    use uuid::Uuid;

    fn cart() -> Cart {
        serde_json::from_value(json!({
            "items": [
                { "productId": 1, "price": 100 },
                { "productId": 2, "price": 200 },
                { "productId": 2, "price": 300 }
            ]
        }))
        .unwrap()
    }

    fn create(catalog: &InMemoryCatalog, body: serde_json::Value) -> Coupon {
        let input: CreateCoupon = serde_json::from_value(body).unwrap();
        catalog.create(input)
    }

    #[tokio::test]
    async fn listing_prices_candidates_in_catalog_order() {
        let catalog = InMemoryCatalog::new();
        let cart_wise = create(
            &catalog,
            json!({
                "isActive": true,
                "type": "cart-wise",
                "minCartValue": 100,
                "percentValue": 10,
                "discountCap": 100
            }),
        );
        let bxgy = create(
            &catalog,
            json!({
                "isActive": true,
                "type": "bxgy",
                "buyThreshold": 1,
                "buyProductIds": [1],
                "getProductIds": [2],
                "maxRedemptions": 3
            }),
        );

        let results = list_applicable(&catalog, &cart()).await.unwrap();

        assert_eq!(results.len(), 2);
        assert_eq!(results[0].coupon_id, cart_wise.id);
        assert_eq!(results[1].coupon_id, bxgy.id);
    }

    #[tokio::test]
    async fn listing_keeps_inactive_coupons() {
        let catalog = InMemoryCatalog::new();
        let inactive = create(
            &catalog,
            json!({
                "isActive": false,
                "type": "cart-wise",
                "minCartValue": 100,
                "percentValue": 10,
                "discountCap": 100
            }),
        );

        let results = list_applicable(&catalog, &cart()).await.unwrap();

        assert_eq!(results.len(), 1);
        assert_eq!(results[0].coupon_id, inactive.id);
    }

    #[tokio::test]
    async fn listing_skips_malformed_coupons_and_continues() {
        let catalog = InMemoryCatalog::new();
        create(
            &catalog,
            json!({
                "isActive": true,
                "type": "cart-wise",
                "minCartValue": 100,
                "percentValue": 150, // out of range
                "discountCap": 100
            }),
        );
        let healthy = create(
            &catalog,
            json!({
                "isActive": true,
                "type": "cart-wise",
                "minCartValue": 100,
                "percentValue": 10,
                "discountCap": 100
            }),
        );

        let results = list_applicable(&catalog, &cart()).await.unwrap();

        assert_eq!(results.len(), 1);
        assert_eq!(results[0].coupon_id, healthy.id);
    }

    #[tokio::test]
    async fn apply_unknown_id_is_not_found() {
        let catalog = InMemoryCatalog::new();

        let err = apply_coupon(&catalog, Uuid::new_v4(), &cart())
            .await
            .unwrap_err();

        assert!(matches!(err, ServiceError::NotFound(_)));
    }

    #[tokio::test]
    async fn apply_inactive_coupon_is_rejected_distinctly() {
        let catalog = InMemoryCatalog::new();
        let inactive = create(
            &catalog,
            json!({
                "isActive": false,
                "type": "cart-wise",
                "minCartValue": 100,
                "percentValue": 10,
                "discountCap": 100
            }),
        );

        let err = apply_coupon(&catalog, inactive.id, &cart())
            .await
            .unwrap_err();

        assert!(matches!(err, ServiceError::Inactive(id) if id == inactive.id));
    }

    #[tokio::test]
    async fn apply_surfaces_computation_errors() {
        let catalog = InMemoryCatalog::new();
        let broken = create(
            &catalog,
            json!({
                "isActive": true,
                "type": "bxgy",
                "buyThreshold": 0,
                "buyProductIds": [1],
                "getProductIds": [2],
                "maxRedemptions": 1
            }),
        );

        let err = apply_coupon(&catalog, broken.id, &cart()).await.unwrap_err();

        assert!(matches!(err, ServiceError::Computation { id, .. } if id == broken.id));
    }

    struct BrokenCatalog;

    #[async_trait]
    impl CouponCatalog for BrokenCatalog {
        async fn get_by_id(&self, _id: CouponId) -> Result<Option<Coupon>, CatalogError> {
            Err(CatalogError::Unavailable("connection refused".into()))
        }

        async fn get_all(&self) -> Result<Vec<Coupon>, CatalogError> {
            Err(CatalogError::Unavailable("connection refused".into()))
        }
    }

    #[tokio::test]
    async fn catalog_failures_propagate_unchanged() {
        let err = list_applicable(&BrokenCatalog, &cart()).await.unwrap_err();
        assert!(matches!(err, ServiceError::Catalog(_)));

        let err = apply_coupon(&BrokenCatalog, Uuid::new_v4(), &cart())
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::Catalog(_)));
    }
}
