//! # Domain Types
//!
//! Core domain types used throughout Copypoint POS.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │    Product      │   │      Sale       │   │    SaleLine     │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  id (i64)       │   │  id (i64)       │   │  sale_id (FK)   │       │
//! │  │  sku / barcode  │   │  total_cents    │   │  quantity       │       │
//! │  │  kind           │   │  fiscal_status  │   │  subtotal_cents │       │
//! │  │  stock          │   │  payment_method │   │  description    │       │
//! │  └─────────────────┘   └─────────────────┘   └─────────────────┘       │
//! │                                                                         │
//! │  ProductKind: Physical | Service    PaymentMethod: Cash | Transfer      │
//! │  SaleStatus: Completed | Voided     FiscalStatus: 5 lifecycle states    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! IDs are SQLite rowids (i64), assigned by the database on insert and
//! absent (`None`) before a record is persisted.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::money::Money;

// =============================================================================
// Product
// =============================================================================

/// Whether a product occupies shelf space or is produced on demand.
///
/// Services (copies, prints, laminations) never carry stock; the sale
/// engine must never touch the stock field of a Service product.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "snake_case"))]
#[serde(rename_all = "snake_case")]
pub enum ProductKind {
    /// Stock-bearing item on the shelf (notebooks, pens, paper reams).
    Physical,
    /// Printed service; price comes from the price matrix, no stock.
    Service,
}

impl ProductKind {
    /// Stable TEXT form used in the database.
    pub fn as_str(&self) -> &'static str {
        match self {
            ProductKind::Physical => "physical",
            ProductKind::Service => "service",
        }
    }
}

/// A product in the catalog.
///
/// Administered outside the sale engine; the engine reads products and
/// mutates only the `stock` field, transactionally, at sale time.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Product {
    /// Database rowid.
    pub id: i64,

    /// Optional category reference.
    pub category_id: Option<i64>,

    /// Barcode (EAN-13, UPC-A, etc.).
    pub barcode: Option<String>,

    /// Internal SKU - business identifier.
    pub sku: String,

    /// Display name shown to the cashier and snapshotted on sale lines.
    pub name: String,

    /// Physical (stock-bearing) or Service.
    pub kind: ProductKind,

    /// Base cost in cents. Sale prices are derived by margin.
    pub base_cost_cents: i64,

    /// Current on-hand quantity. Meaningful only for Physical products.
    pub stock: i64,

    /// Whether the product is active (soft delete).
    pub is_active: bool,
}

impl Product {
    /// Returns the base cost as a Money type.
    #[inline]
    pub fn base_cost(&self) -> Money {
        Money::from_cents(self.base_cost_cents)
    }

    #[inline]
    pub fn is_physical(&self) -> bool {
        self.kind == ProductKind::Physical
    }

    #[inline]
    pub fn is_service(&self) -> bool {
        self.kind == ProductKind::Service
    }

    /// Sale price when paying cash: `round(base_cost * margin)`, half-up.
    pub fn cash_price(&self, cash_margin: f64) -> Money {
        self.base_cost().apply_margin(cash_margin)
    }

    /// Sale price when paying by transfer: `round(base_cost * margin)`, half-up.
    pub fn transfer_price(&self, transfer_margin: f64) -> Money {
        self.base_cost().apply_margin(transfer_margin)
    }
}

// =============================================================================
// Payment Method
// =============================================================================

/// How the customer pays. Selects which candidate unit price applies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "snake_case"))]
#[serde(rename_all = "snake_case")]
pub enum PaymentMethod {
    Cash,
    Transfer,
}

// =============================================================================
// Sale Status
// =============================================================================

/// The status of a sale transaction.
///
/// Sales are committed directly as Completed; Voided exists for manual
/// corrections after the fact.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "snake_case"))]
#[serde(rename_all = "snake_case")]
pub enum SaleStatus {
    Completed,
    Voided,
}

// =============================================================================
// Fiscal Status
// =============================================================================

/// Lifecycle marker for whether/how a sale has been reported to the
/// external invoicing authority.
///
/// Derived, never chosen by the caller. At sale creation only
/// `NotRequired` or `Pending` are assignable, based solely on the
/// invoice-requested flag; the remaining states are set by the external
/// invoicing worker (out of scope here).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "snake_case"))]
#[serde(rename_all = "snake_case")]
pub enum FiscalStatus {
    /// Internal ticket, no invoice requested.
    NotRequired,
    /// Queued for the external invoicing worker.
    Pending,
    /// Handed to the authority, awaiting response.
    Sent,
    /// Authorization obtained.
    InvoicedOk,
    /// Rejected by the authority.
    Error,
}

impl FiscalStatus {
    /// The status a sale is born with.
    pub fn initial(invoice_requested: bool) -> Self {
        if invoice_requested {
            FiscalStatus::Pending
        } else {
            FiscalStatus::NotRequired
        }
    }
}

// =============================================================================
// Customer
// =============================================================================

/// VAT condition of a registered customer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "snake_case"))]
#[serde(rename_all = "snake_case")]
pub enum VatCondition {
    FinalConsumer,
    RegisteredResponsible,
    Monotributo,
    Exempt,
}

/// A registered customer.
///
/// Read-only from the sale engine's perspective: at commit time the id
/// and tax id are snapshotted into the sale header, so later edits to
/// the customer record never change historical sales.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Customer {
    pub id: i64,
    pub legal_name: String,
    /// Tax identifier (CUIT-style).
    pub tax_id: Option<String>,
    pub vat_condition: VatCondition,
    pub email: Option<String>,
    pub address: Option<String>,
    pub created_at: DateTime<Utc>,
}

// =============================================================================
// Sale
// =============================================================================

/// A committed sale (aggregate root).
///
/// Immutable once persisted, except the invoice response fields which an
/// out-of-scope external fiscal process fills in later.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Sale {
    /// Database rowid, assigned on commit.
    pub id: i64,
    pub created_at: DateTime<Utc>,
    /// Derived total; always equals the sum of line subtotals.
    pub total_cents: i64,
    pub payment_method: PaymentMethod,
    pub status: SaleStatus,

    // Customer snapshot
    pub customer_id: Option<i64>,
    pub tax_id_snapshot: Option<String>,

    // Fiscal state
    pub invoice_requested: bool,
    pub fiscal_status: FiscalStatus,

    // Invoice response fields (NULL until the external fiscal step runs)
    pub invoice_auth_code: Option<String>,
    pub invoice_auth_expiry: Option<NaiveDate>,
    pub pos_number: Option<i64>,
    pub invoice_number: Option<i64>,

    /// Lines in cart order.
    pub lines: Vec<SaleLine>,
}

impl Sale {
    /// Returns the total as Money.
    #[inline]
    pub fn total(&self) -> Money {
        Money::from_cents(self.total_cents)
    }
}

// =============================================================================
// Sale Line
// =============================================================================

/// A line item in a committed sale.
///
/// Uses the snapshot pattern: the description freezes the product name
/// (or service description) at time of sale, decoupled from later
/// renames. Created only as part of a Sale commit, never independently.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SaleLine {
    /// Database rowid.
    pub id: i64,
    pub sale_id: i64,
    /// Product reference; `None` for ad-hoc service lines that have no
    /// catalog row behind them.
    pub product_id: Option<i64>,
    pub quantity: i64,
    pub unit_price_cents: i64,
    /// Always `quantity * unit_price_cents`.
    pub subtotal_cents: i64,
    /// Description snapshot at time of sale.
    pub description: String,
}

impl SaleLine {
    /// Returns the unit price as Money.
    #[inline]
    pub fn unit_price(&self) -> Money {
        Money::from_cents(self.unit_price_cents)
    }

    /// Returns the subtotal as Money.
    #[inline]
    pub fn subtotal(&self) -> Money {
        Money::from_cents(self.subtotal_cents)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
