//! Service Error Type
//!
//! One structured error enum for everything the coupon services can fail
//! with, each kind mapped to a distinct HTTP status. Underlying causes are
//! carried as sources, never flattened into strings.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use super::catalog::CatalogError;
use super::engine::ComputationError;
use super::models::CouponId;

/// Failures surfaced by the coupon services.
#[derive(Debug, Error)]
pub enum ServiceError {
    /// No coupon with the requested id exists.
    #[error("coupon {0} not found")]
    NotFound(CouponId),

    /// The coupon exists but is not active at apply time.
    #[error("coupon {0} is not active")]
    Inactive(CouponId),

    /// The coupon payload violates its kind's invariants.
    #[error("coupon {id} has an invalid payload: {source}")]
    Computation {
        /// Id of the offending coupon
        id: CouponId,
        /// The violated invariant
        #[source]
        source: ComputationError,
    },

    /// The storage collaborator failed; propagated unchanged.
    #[error(transparent)]
    Catalog(#[from] CatalogError),

    /// The request body failed validation before reaching the engine.
    #[error("invalid request: {0}")]
    InvalidRequest(String),
}

impl ServiceError {
    fn status(&self) -> StatusCode {
        match self {
            ServiceError::NotFound(_) => StatusCode::NOT_FOUND,
            ServiceError::Inactive(_) => StatusCode::CONFLICT,
            ServiceError::Computation { .. } => StatusCode::UNPROCESSABLE_ENTITY,
            ServiceError::Catalog(_) => StatusCode::SERVICE_UNAVAILABLE,
            ServiceError::InvalidRequest(_) => StatusCode::BAD_REQUEST,
        }
    }
}

impl IntoResponse for ServiceError {
    fn into_response(self) -> Response {
        (self.status(), Json(json!({ "message": self.to_string() }))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    #[test]
    fn each_kind_maps_to_a_distinct_status() {
        let id = Uuid::new_v4();

        assert_eq!(ServiceError::NotFound(id).status(), StatusCode::NOT_FOUND);
        assert_eq!(ServiceError::Inactive(id).status(), StatusCode::CONFLICT);
        assert_eq!(
            ServiceError::Computation {
                id,
                source: ComputationError::ZeroBuyThreshold,
            }
            .status(),
            StatusCode::UNPROCESSABLE_ENTITY
        );
        assert_eq!(
            ServiceError::Catalog(CatalogError::Unavailable("down".into())).status(),
            StatusCode::SERVICE_UNAVAILABLE
        );
        assert_eq!(
            ServiceError::InvalidRequest("bad cart".into()).status(),
            StatusCode::BAD_REQUEST
        );
    }

    #[test]
    fn computation_error_keeps_its_cause() {
        let err = ServiceError::Computation {
            id: Uuid::new_v4(),
            source: ComputationError::ZeroBuyThreshold,
        };

        assert!(err.to_string().contains("buy threshold"));
    }
}
