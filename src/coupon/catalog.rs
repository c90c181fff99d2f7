//! Coupon Catalog
//!
//! The engine consumes the catalog through the [`CouponCatalog`] trait so
//! storage stays swappable; the bundled implementation keeps everything in
//! memory behind a `DashMap`, which allows concurrent handler access
//! without external mutexes.

use async_trait::async_trait;
use dashmap::DashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use thiserror::Error;
use uuid::Uuid;

use super::models::{Coupon, CouponId, CouponKind, CreateCoupon};

/// Failure of the storage collaborator itself.
///
/// Propagated to callers unchanged; the engine never retries a lookup.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// The backing store could not be reached or failed mid-call.
    #[error("coupon catalog unavailable: {0}")]
    Unavailable(String),
}

/// Read side of the catalog, as consumed by the discount services.
#[async_trait]
pub trait CouponCatalog: Send + Sync {
    /// Fetches one coupon by id, `None` when absent.
    async fn get_by_id(&self, id: CouponId) -> Result<Option<Coupon>, CatalogError>;

    /// Fetches every stored coupon, in creation order.
    async fn get_all(&self) -> Result<Vec<Coupon>, CatalogError>;
}

struct StoredCoupon {
    /// Creation sequence; keeps listings deterministic since the map
    /// itself iterates in arbitrary order.
    seq: u64,
    coupon: Coupon,
}

/// In-memory catalog with the full CRUD surface.
#[derive(Default)]
pub struct InMemoryCatalog {
    coupons: DashMap<CouponId, StoredCoupon>,
    next_seq: AtomicU64,
}

impl InMemoryCatalog {
    /// Creates an empty catalog.
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores a new coupon, assigning it a fresh id.
    pub fn create(&self, input: CreateCoupon) -> Coupon {
        let coupon = Coupon {
            id: Uuid::new_v4(),
            is_active: input.is_active,
            kind: input.kind,
        };
        let seq = self.next_seq.fetch_add(1, Ordering::Relaxed);
        self.coupons.insert(
            coupon.id,
            StoredCoupon {
                seq,
                coupon: coupon.clone(),
            },
        );
        coupon
    }

    /// Looks up one coupon.
    pub fn get(&self, id: CouponId) -> Option<Coupon> {
        self.coupons.get(&id).map(|entry| entry.coupon.clone())
    }

    /// All coupons, in creation order.
    pub fn all(&self) -> Vec<Coupon> {
        let mut entries: Vec<(u64, Coupon)> = self
            .coupons
            .iter()
            .map(|entry| (entry.seq, entry.coupon.clone()))
            .collect();
        entries.sort_by_key(|(seq, _)| *seq);
        entries.into_iter().map(|(_, coupon)| coupon).collect()
    }

    /// Updates the mutable attributes of a coupon: the active flag and the
    /// kind payload. Identity never changes. Returns the updated record,
    /// `None` when the id is unknown.
    pub fn update(
        &self,
        id: CouponId,
        is_active: Option<bool>,
        kind: Option<CouponKind>,
    ) -> Option<Coupon> {
        let mut entry = self.coupons.get_mut(&id)?;
        if let Some(active) = is_active {
            entry.coupon.is_active = active;
        }
        if let Some(kind) = kind {
            entry.coupon.kind = kind;
        }
        Some(entry.coupon.clone())
    }

    /// Removes a coupon; `true` when something was deleted.
    pub fn delete(&self, id: CouponId) -> bool {
        self.coupons.remove(&id).is_some()
    }
}

#[async_trait]
impl CouponCatalog for InMemoryCatalog {
    async fn get_by_id(&self, id: CouponId) -> Result<Option<Coupon>, CatalogError> {
        Ok(self.get(id))
    }

    async fn get_all(&self) -> Result<Vec<Coupon>, CatalogError> {
        Ok(self.all())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;

    fn create_input(min: i64) -> CreateCoupon {
        serde_json::from_value(serde_json::json!({
            "isActive": true,
            "type": "cart-wise",
            "minCartValue": min,
            "percentValue": 10,
            "discountCap": 20
        }))
        .unwrap()
    }

    #[test]
    fn create_then_get_round_trips() {
        let catalog = InMemoryCatalog::new();
        let created = catalog.create(create_input(100));

        let fetched = catalog.get(created.id).expect("coupon should exist");
        assert_eq!(fetched, created);
    }

    #[test]
    fn all_returns_creation_order() {
        let catalog = InMemoryCatalog::new();
        let first = catalog.create(create_input(10));
        let second = catalog.create(create_input(20));
        let third = catalog.create(create_input(30));

        let ids: Vec<CouponId> = catalog.all().into_iter().map(|c| c.id).collect();
        assert_eq!(ids, vec![first.id, second.id, third.id]);
    }

    #[test]
    fn update_touches_only_mutable_attributes() {
        let catalog = InMemoryCatalog::new();
        let created = catalog.create(create_input(100));

        let updated = catalog
            .update(created.id, Some(false), None)
            .expect("coupon should exist");

        assert_eq!(updated.id, created.id);
        assert!(!updated.is_active);
        assert_eq!(updated.kind, created.kind);

        let replacement = CouponKind::CartWise {
            min_cart_value: Decimal::from(1),
            percent_value: Decimal::from(2),
            discount_cap: Decimal::from(3),
        };
        let updated = catalog
            .update(created.id, None, Some(replacement.clone()))
            .expect("coupon should exist");

        assert_eq!(updated.kind, replacement);
        assert!(!updated.is_active, "active flag must survive a payload update");
    }

    #[test]
    fn update_unknown_id_is_none() {
        let catalog = InMemoryCatalog::new();
        assert!(catalog.update(Uuid::new_v4(), Some(true), None).is_none());
    }

    #[test]
    fn delete_removes_the_record() {
        let catalog = InMemoryCatalog::new();
        let created = catalog.create(create_input(100));

        assert!(catalog.delete(created.id));
        assert!(catalog.get(created.id).is_none());
        assert!(!catalog.delete(created.id));
    }
}
