//! Coupon Domain Models
//!
//! This module contains all data structures related to the coupon
//! business domain: carts, the three coupon kinds, and the discount
//! result returned to clients.

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::collections::HashSet;
use std::fmt;
use thiserror::Error;
use uuid::Uuid;

/// Unique, stable identifier of a coupon, assigned at creation time.
pub type CouponId = Uuid;

// =============================================================================
// Cart Domain Models
// =============================================================================

/// Opaque product identifier, comparable for equality.
///
/// Carts on the wire may carry product ids as JSON strings or numbers
/// (legacy clients send numbers); both normalize to the same identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct ProductId(String);

impl ProductId {
    /// Creates a product id from anything string-like.
    pub fn new(id: impl Into<String>) -> Self {
        ProductId(id.into())
    }
}

impl fmt::Display for ProductId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for ProductId {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Text(String),
            Number(serde_json::Number),
        }

        Ok(match Raw::deserialize(deserializer)? {
            Raw::Text(s) => ProductId(s),
            Raw::Number(n) => ProductId(n.to_string()),
        })
    }
}

/// Represents a single priced unit in a cart.
///
/// Repeated identical products appear as repeated entries, not as a
/// quantity field.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CartItem {
    /// Identifier of the product on this line
    pub product_id: ProductId,

    /// Price of this single unit
    #[serde(rename = "price")]
    pub unit_price: Decimal,
}

/// A cart is rejected when any line carries a negative price.
#[derive(Debug, Error)]
#[error("cart item {product_id} has a negative price")]
pub struct InvalidCartError {
    /// Identifier of the offending line
    pub product_id: ProductId,
}

/// An ordered sequence of cart items.
///
/// Order is semantically significant: buy-X-get-Y promotions waive
/// earlier-positioned eligible items first.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Cart {
    /// Cart lines, in the order the client sent them
    pub items: Vec<CartItem>,
}

impl Cart {
    /// Sum of all unit prices.
    pub fn total(&self) -> Decimal {
        self.items.iter().map(|item| item.unit_price).sum()
    }

    /// Whether any cart line references a product from `ids`.
    pub fn contains_any(&self, ids: &HashSet<ProductId>) -> bool {
        self.items.iter().any(|item| ids.contains(&item.product_id))
    }

    /// Validates the unit-price invariant before the cart reaches the engine.
    pub fn ensure_valid(&self) -> Result<(), InvalidCartError> {
        match self.items.iter().find(|item| item.unit_price < Decimal::ZERO) {
            Some(item) => Err(InvalidCartError {
                product_id: item.product_id.clone(),
            }),
            None => Ok(()),
        }
    }
}

// =============================================================================
// Coupon Domain Models
// =============================================================================

/// Kind-specific coupon payload. Closed set; the calculator matches
/// exhaustively so no coupon can fall through to a wrong branch.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type")]
pub enum CouponKind {
    /// Percentage discount on the entire cart total, capped.
    #[serde(rename = "cart-wise", rename_all = "camelCase")]
    CartWise {
        /// Minimum cart total for the coupon to be relevant
        min_cart_value: Decimal,
        /// Percentage taken off the cart total, in [0, 100]
        percent_value: Decimal,
        /// Upper bound on the discount amount
        discount_cap: Decimal,
    },

    /// Percentage discount restricted to a named subset of products, capped.
    #[serde(rename = "product-wise", rename_all = "camelCase")]
    ProductWise {
        /// Products whose lines count toward the discounted subtotal
        eligible_product_ids: HashSet<ProductId>,
        /// Percentage taken off the eligible subtotal, in [0, 100]
        percent_value: Decimal,
        /// Upper bound on the discount amount
        discount_cap: Decimal,
    },

    /// Buying enough "buy" items unlocks free "get" items, limited by a
    /// maximum number of redemptions.
    #[serde(rename = "bxgy", rename_all = "camelCase")]
    BuyXGetY {
        /// Number of "buy" items needed per free slot
        buy_threshold: u32,
        /// Products that count toward the threshold
        buy_product_ids: HashSet<ProductId>,
        /// Products that may be granted for free
        get_product_ids: HashSet<ProductId>,
        /// Maximum number of free slots
        max_redemptions: u32,
    },
}

impl CouponKind {
    /// Wire tag for this kind, as clients see it in `couponType`.
    pub fn tag(&self) -> &'static str {
        match self {
            CouponKind::CartWise { .. } => "cart-wise",
            CouponKind::ProductWise { .. } => "product-wise",
            CouponKind::BuyXGetY { .. } => "bxgy",
        }
    }

    /// Minimum cart value, for kinds that define one.
    pub fn min_cart_value(&self) -> Option<Decimal> {
        match self {
            CouponKind::CartWise { min_cart_value, .. } => Some(*min_cart_value),
            _ => None,
        }
    }

    /// Eligible product set, for kinds that define one.
    pub fn eligible_product_ids(&self) -> Option<&HashSet<ProductId>> {
        match self {
            CouponKind::ProductWise {
                eligible_product_ids,
                ..
            } => Some(eligible_product_ids),
            _ => None,
        }
    }

    /// "Buy" product set, for kinds that define one.
    pub fn buy_product_ids(&self) -> Option<&HashSet<ProductId>> {
        match self {
            CouponKind::BuyXGetY {
                buy_product_ids, ..
            } => Some(buy_product_ids),
            _ => None,
        }
    }
}

/// A stored coupon record.
///
/// Identity is immutable after creation; `is_active` and the payload are
/// the only mutable attributes, changed only through the update operation.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Coupon {
    /// Unique identifier
    pub id: CouponId,

    /// Gate for the apply operation
    pub is_active: bool,

    /// Kind tag and kind-specific payload, flattened on the wire
    #[serde(flatten)]
    pub kind: CouponKind,
}

// =============================================================================
// Request / Response Models
// =============================================================================

/// Body of `POST /create-coupons`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateCoupon {
    /// Whether the coupon can be applied right away
    pub is_active: bool,

    /// Kind tag and payload, flattened
    #[serde(flatten)]
    pub kind: CouponKind,
}

/// Body of `PUT /update-coupon/:id`. Both parts are optional; an empty
/// body is a no-op update.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateCoupon {
    /// New active state, if changing
    pub is_active: Option<bool>,

    /// Remaining fields; when a `type` tag is present they form a full
    /// replacement payload
    #[serde(flatten)]
    extra: serde_json::Map<String, serde_json::Value>,
}

impl UpdateCoupon {
    /// Parses the replacement payload, if the body carried one.
    pub fn kind(&self) -> Result<Option<CouponKind>, serde_json::Error> {
        if self.extra.contains_key("type") {
            serde_json::from_value(serde_json::Value::Object(self.extra.clone())).map(Some)
        } else {
            Ok(None)
        }
    }
}

/// Body of the two discount endpoints: a cart wrapped in a `cart` key.
#[derive(Debug, Deserialize)]
pub struct CartRequest {
    /// The cart to price coupons against
    pub cart: Cart,
}

/// One priced coupon, as returned by the discount endpoints.
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DiscountResult {
    /// Identifier of the priced coupon
    pub coupon_id: CouponId,

    /// Wire tag of the coupon kind
    pub coupon_type: &'static str,

    /// Discount amount, rendered with exactly two fractional digits
    #[serde(serialize_with = "serialize_two_decimals")]
    pub discount: Decimal,
}

impl DiscountResult {
    /// Builds a result from a raw engine amount, rounding half-up to two
    /// decimals. Rounding happens only here, never inside the engine.
    pub fn new(coupon: &Coupon, amount: Decimal) -> Self {
        DiscountResult {
            coupon_id: coupon.id,
            coupon_type: coupon.kind.tag(),
            discount: amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero),
        }
    }
}

fn serialize_two_decimals<S>(value: &Decimal, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    serializer.serialize_str(&format!("{value:.2}"))
}
