//! # Error Types
//!
//! Domain-specific error types for copypoint-core.
//!
//! ## Error Taxonomy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  InvalidInput        → ValidationError, CoreError::EmptyCart            │
//! │                        Caller's fault. Reported synchronously, never    │
//! │                        retried, no partial state created.               │
//! │                                                                         │
//! │  BusinessRuleUnmet   → CoreError::PriceNotConfigured                    │
//! │                        Expected operational condition. The operator     │
//! │                        needs to configure the combination, not retry.   │
//! │                                                                         │
//! │  PersistenceFailure  → copypoint_db::DbError (separate crate)           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Design Principles
//! 1. Use `thiserror` for derive macros (not manual impl)
//! 2. Include context in error messages (dimensions, quantities)
//! 3. Errors are enum variants, never strings

use thiserror::Error;

use crate::pricing::PriceRequest;

// =============================================================================
// Core Error
// =============================================================================

/// Core business logic errors.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Commit was attempted with no cart lines. No storage call is made.
    #[error("cart is empty")]
    EmptyCart,

    /// No price exists in the matrix for the exact requested combination.
    ///
    /// This is a business-configuration error, not a system fault: the
    /// operator must configure the combination. Carries the requested
    /// dimensions for the operator-facing message.
    #[error("no price configured in the matrix for {request}")]
    PriceNotConfigured { request: PriceRequest },

    /// Validation error (wraps ValidationError).
    #[error("validation error: {0}")]
    Validation(#[from] ValidationError),
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
///
/// These occur when caller input doesn't meet requirements; used for
/// early validation before business logic runs.
#[derive(Debug, Error)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// Value must be positive.
    #[error("{field} must be positive")]
    MustBePositive { field: String },

    /// Invalid format (e.g., unparsable enum text from storage).
    #[error("{field} has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },
}

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pricing::{ColorMode, PaperSize, PaperType, Sidedness};

    #[test]
    fn test_price_not_configured_names_dimensions() {
        let err = CoreError::PriceNotConfigured {
            request: PriceRequest::new(
                PaperSize::A4,
                PaperType::Plain80g,
                ColorMode::Mono,
                Sidedness::Duplex,
            ),
        };
        assert_eq!(
            err.to_string(),
            "no price configured in the matrix for [a4 | plain_80g | mono | duplex]"
        );
    }

    #[test]
    fn test_validation_converts_to_core_error() {
        let validation_err = ValidationError::MustBePositive { field: "quantity".to_string() };
        let core_err: CoreError = validation_err.into();
        assert!(matches!(core_err, CoreError::Validation(_)));
    }
}
