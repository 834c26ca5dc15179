//! # Price Resolver
//!
//! Turns a fully specified matrix request into a quote, or a domain
//! error when the combination has no configured price.

use tracing::debug;

use copypoint_core::{CoreError, PriceQuote, PriceRequest};

use crate::error::ServiceResult;
use crate::repository::price_matrix::PriceMatrixRepository;

/// Resolves matrix prices for the copies/prints screen.
#[derive(Debug, Clone)]
pub struct PriceResolver {
    matrix: PriceMatrixRepository,
}

impl PriceResolver {
    pub fn new(pool: sqlx::SqlitePool) -> Self {
        PriceResolver { matrix: PriceMatrixRepository::new(pool) }
    }

    /// Exact-match resolution.
    ///
    /// An unconfigured combination is reported as
    /// [`CoreError::PriceNotConfigured`] carrying the full request, so
    /// the operator knows exactly which matrix cell to fill in. It is
    /// never substituted with a default or a neighboring price.
    pub async fn resolve(&self, request: &PriceRequest) -> ServiceResult<PriceQuote> {
        match self.matrix.find_price(request).await? {
            Some(price_cents) => {
                debug!(%request, price_cents, "Price resolved");
                Ok(PriceQuote::new(price_cents))
            }
            None => Err(CoreError::PriceNotConfigured { request: *request }.into()),
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
