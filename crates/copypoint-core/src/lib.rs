//! # copypoint-core: Pure Business Logic for Copypoint POS
//!
//! This crate is the **heart** of Copypoint POS, a point-of-sale system
//! for a copy/print and stationery shop. It contains all business logic
//! as pure functions with zero I/O dependencies.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                     Copypoint POS Architecture                          │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                  Presentation layer (excluded)                  │   │
//! │  │     Product search ──► Service panel ──► Cart ──► Charge        │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │              ★ copypoint-core (THIS CRATE) ★                    │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌───────────┐  ┌───────────┐  ┌───────────┐  │   │
//! │  │   │   types   │  │   money   │  │   cart    │  │  pricing  │  │   │
//! │  │   │  Product  │  │   Money   │  │   Cart    │  │ PriceReq  │  │   │
//! │  │   │   Sale    │  │  margins  │  │ CartLine  │  │  matrix   │  │   │
//! │  │   └───────────┘  └───────────┘  └───────────┘  └───────────┘  │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO DATABASE • NO NETWORK • PURE FUNCTIONS           │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                 copypoint-db (Database Layer)                   │   │
//! │  │     SQLite repositories, sale engine, margins, migrations       │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Domain types (Product, Sale, Customer, fiscal enums)
//! - [`money`] - Money type with integer arithmetic (no floating point!)
//! - [`pricing`] - Price matrix dimensions and request/quote types
//! - [`cart`] - Cart lines and the merge/append accumulation policy
//! - [`error`] - Domain error types
//!
//! ## Design Principles
//!
//! 1. **Pure Functions**: deterministic, same input = same output
//! 2. **No I/O**: database, network, file system access is FORBIDDEN here
//! 3. **Integer Money**: all monetary values are cents (i64)
//! 4. **Explicit Errors**: all errors are typed, never strings or panics

// =============================================================================
// Module Declarations
// =============================================================================

pub mod cart;
pub mod error;
pub mod money;
pub mod pricing;
pub mod types;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use cart::{Cart, CartLine};
pub use error::{CoreError, CoreResult, ValidationError};
pub use money::Money;
pub use pricing::{ColorMode, PaperSize, PaperType, PriceQuote, PriceRequest, Sidedness};
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Config key for the cash margin multiplier.
pub const CONFIG_KEY_MARGIN_CASH: &str = "MARGIN_CASH";

/// Config key for the transfer margin multiplier.
pub const CONFIG_KEY_MARGIN_TRANSFER: &str = "MARGIN_TRANSFER";

/// Cash margin used when the config store has no value.
pub const DEFAULT_MARGIN_CASH: f64 = 1.50;

/// Transfer margin used when the config store has no value.
pub const DEFAULT_MARGIN_TRANSFER: f64 = 1.52;
