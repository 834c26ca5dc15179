//! # Sale Engine
//!
//! The transactional core of the system: turns a cart into a durable
//! sale.
//!
//! ## Commit Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  commit_sale(lines, method, customer, invoice_requested)                │
//! │                                                                         │
//! │   1. reject empty cart            ← before any storage work             │
//! │   2. freeze line prices + total   ← pure, from the chosen method        │
//! │   3. BEGIN                                                              │
//! │   4.   INSERT sale header         ← status=completed, fiscal derived    │
//! │   5.   INSERT lines, cart order   ← rowids preserve ordering            │
//! │   6.   UPDATE stock per physical  ← one decrement per line              │
//! │   7. COMMIT                       ← or rollback on any failure          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Either everything lands or nothing does. A failure after some lines
//! were inserted rolls back the header, the lines, and every stock
//! decrement already applied.

use chrono::Utc;
use tracing::{debug, info};

use copypoint_core::{
    CartLine, CoreError, Customer, FiscalStatus, PaymentMethod, Sale, SaleLine, SaleStatus,
};

use crate::error::ServiceResult;
use crate::repository::sale::SaleRepository;

/// Commits carts as atomic sale transactions.
#[derive(Debug, Clone)]
pub struct SaleEngine {
    pool: sqlx::SqlitePool,
    sales: SaleRepository,
}

impl SaleEngine {
    pub fn new(pool: sqlx::SqlitePool) -> Self {
        let sales = SaleRepository::new(pool.clone());
        SaleEngine { pool, sales }
    }

    /// Commits the cart as a completed sale.
    ///
    /// The payment method selects which of each line's two frozen
    /// candidate prices applies; the total is derived from the resulting
    /// subtotals, never passed in. The customer, when present, is
    /// snapshotted by id and tax id. Fiscal status is derived from
    /// `invoice_requested` alone.
    ///
    /// Returns the persisted sale with ids and lines filled in.
    pub async fn commit_sale(
        &self,
        lines: Vec<CartLine>,
        payment_method: PaymentMethod,
        customer: Option<&Customer>,
        invoice_requested: bool,
    ) -> ServiceResult<Sale> {
        if lines.is_empty() {
            return Err(CoreError::EmptyCart.into());
        }

        // Freeze the persisted form of every line before opening the
        // transaction. Subtotal and total are derived here once and
        // stored as-is.
        let sale_lines: Vec<SaleLine> = lines
            .iter()
            .map(|line| SaleLine {
                id: 0,
                sale_id: 0,
                product_id: line.product_id,
                quantity: line.quantity,
                unit_price_cents: line.unit_price(payment_method).cents(),
                subtotal_cents: line.subtotal(payment_method).cents(),
                description: line.description.clone(),
            })
            .collect();

        let total_cents: i64 = sale_lines.iter().map(|l| l.subtotal_cents).sum();

        let mut sale = Sale {
            id: 0,
            created_at: Utc::now(),
            total_cents,
            payment_method,
            status: SaleStatus::Completed,
            customer_id: customer.map(|c| c.id),
            tax_id_snapshot: customer.and_then(|c| c.tax_id.clone()),
            invoice_requested,
            fiscal_status: FiscalStatus::initial(invoice_requested),
            invoice_auth_code: None,
            invoice_auth_expiry: None,
            pos_number: None,
            invoice_number: None,
            lines: sale_lines,
        };

        debug!(
            lines = sale.lines.len(),
            total_cents,
            ?payment_method,
            invoice_requested,
            "Committing sale"
        );

        let mut tx = self.pool.begin().await.map_err(crate::error::DbError::from)?;

        let sale_id = self.sales.insert_header_tx(&mut tx, &sale).await?;
        sale.id = sale_id;

        for line in &mut sale.lines {
            line.sale_id = sale_id;
            line.id = self.sales.insert_line_tx(&mut tx, line).await?;
        }

        // Batched decrement: one UPDATE per physical line, all inside
        // the same transaction as the sale rows.
        for (cart_line, sale_line) in lines.iter().zip(&sale.lines) {
            if cart_line.is_physical {
                if let Some(product_id) = sale_line.product_id {
                    self.sales
                        .decrement_stock_tx(&mut tx, product_id, sale_line.quantity)
                        .await?;
                }
            }
        }

        tx.commit().await.map_err(crate::error::DbError::from)?;

        info!(
            sale_id,
            total_cents,
            fiscal_status = ?sale.fiscal_status,
            "Sale committed"
        );

        Ok(sale)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ServiceError;
    use crate::pool::{Database, DbConfig};
    use copypoint_core::{
        ColorMode, PaperSize, PaperType, PriceQuote, PriceRequest, Product, ProductKind,
        Sidedness, VatCondition,
    };

    async fn test_db() -> Database {
        Database::new(DbConfig::in_memory()).await.unwrap()
    }

    async fn seed_notebook(db: &Database, base_cost_cents: i64, stock: i64) -> Product {
        db.products()
            .insert(Product {
                id: 0,
                category_id: None,
                barcode: None,
                sku: "NB-A5".to_string(),
                name: "Notebook A5".to_string(),
                kind: ProductKind::Physical,
                base_cost_cents,
                stock,
                is_active: true,
            })
            .await
            .unwrap()
    }

    fn copy_line(quantity: i64, unit_price_cents: i64) -> CartLine {
        let request = PriceRequest::new(
            PaperSize::A4,
            PaperType::Plain80g,
            ColorMode::Mono,
            Sidedness::Simplex,
        );
        CartLine::for_service(&request, PriceQuote::new(unit_price_cents), quantity).unwrap()
    }

    #[tokio::test]
    async fn test_mixed_cart_commit() {
        let db = test_db().await;
        let notebook = seed_notebook(&db, 1000, 10).await;

        let product_line = CartLine::for_product(&notebook, 2, 1.50, 1.52).unwrap();
        let service_line = copy_line(10, 50);

        let sale = db
            .sale_engine()
            .commit_sale(vec![product_line, service_line], PaymentMethod::Cash, None, false)
            .await
            .unwrap();

        // Cash: 2 * 1500 + 10 * 50
        assert_eq!(sale.total_cents, 3500);
        assert_eq!(sale.status, SaleStatus::Completed);
        assert_eq!(sale.lines.len(), 2);
        assert_eq!(sale.total_cents, sale.lines.iter().map(|l| l.subtotal_cents).sum::<i64>());

        // Only the physical line moved stock.
        let after = db.products().find_by_id(notebook.id).await.unwrap();
        assert_eq!(after.stock, 8);

        // Round-trips in cart order.
        let loaded = db.sales().find_by_id(sale.id).await.unwrap();
        assert_eq!(loaded.lines.len(), 2);
        assert_eq!(loaded.lines[0].product_id, Some(notebook.id));
        assert_eq!(loaded.lines[1].product_id, None);
        assert_eq!(loaded.lines[1].description, "Copy a4 plain_80g mono simplex");
        assert_eq!(loaded.total_cents, 3500);
    }

    #[tokio::test]
    async fn test_transfer_prices_apply() {
        let db = test_db().await;
        let notebook = seed_notebook(&db, 1000, 10).await;

        let line = CartLine::for_product(&notebook, 2, 1.50, 1.52).unwrap();
        let sale = db
            .sale_engine()
            .commit_sale(vec![line], PaymentMethod::Transfer, None, false)
            .await
            .unwrap();

        assert_eq!(sale.lines[0].unit_price_cents, 1520);
        assert_eq!(sale.total_cents, 3040);
    }

    #[tokio::test]
    async fn test_empty_cart_rejected_before_storage() {
        let db = test_db().await;

        let err = db
            .sale_engine()
            .commit_sale(Vec::new(), PaymentMethod::Cash, None, false)
            .await
            .unwrap_err();

        assert!(matches!(err, ServiceError::Core(CoreError::EmptyCart)));
        assert_eq!(db.sales().count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_failed_commit_rolls_back_everything() {
        let db = test_db().await;
        let notebook = seed_notebook(&db, 1000, 10).await;

        let good_line = CartLine::for_product(&notebook, 2, 1.50, 1.52).unwrap();

        // A physical line pointing at a product that does not exist
        // trips the foreign key check on the line insert, after the
        // header and first line already went in.
        let mut phantom = CartLine::for_product(&notebook, 1, 1.50, 1.52).unwrap();
        phantom.product_id = Some(99_999);

        let err = db
            .sale_engine()
            .commit_sale(vec![good_line, phantom], PaymentMethod::Cash, None, false)
            .await
            .unwrap_err();
        assert!(!err.is_domain());

        // Nothing persisted, stock untouched.
        assert_eq!(db.sales().count().await.unwrap(), 0);
        let after = db.products().find_by_id(notebook.id).await.unwrap();
        assert_eq!(after.stock, 10);
    }

    #[tokio::test]
    async fn test_service_only_cart_leaves_stock_alone() {
        let db = test_db().await;
        let notebook = seed_notebook(&db, 1000, 10).await;

        let sale = db
            .sale_engine()
            .commit_sale(vec![copy_line(25, 50)], PaymentMethod::Cash, None, false)
            .await
            .unwrap();

        assert_eq!(sale.total_cents, 1250);
        let after = db.products().find_by_id(notebook.id).await.unwrap();
        assert_eq!(after.stock, 10);
    }

    #[tokio::test]
    async fn test_oversell_goes_negative() {
        let db = test_db().await;
        let notebook = seed_notebook(&db, 1000, 1).await;

        let line = CartLine::for_product(&notebook, 3, 1.50, 1.52).unwrap();
        db.sale_engine()
            .commit_sale(vec![line], PaymentMethod::Cash, None, false)
            .await
            .unwrap();

        let after = db.products().find_by_id(notebook.id).await.unwrap();
        assert_eq!(after.stock, -2);
    }

    #[tokio::test]
    async fn test_fiscal_status_derivation() {
        let db = test_db().await;

        let ticket = db
            .sale_engine()
            .commit_sale(vec![copy_line(1, 50)], PaymentMethod::Cash, None, false)
            .await
            .unwrap();
        assert_eq!(ticket.fiscal_status, FiscalStatus::NotRequired);

        let invoiced = db
            .sale_engine()
            .commit_sale(vec![copy_line(1, 50)], PaymentMethod::Cash, None, true)
            .await
            .unwrap();
        assert_eq!(invoiced.fiscal_status, FiscalStatus::Pending);

        // Response fields stay empty at creation in both cases.
        assert!(invoiced.invoice_auth_code.is_none());
        assert!(invoiced.invoice_number.is_none());
        assert!(invoiced.pos_number.is_none());
    }

    #[tokio::test]
    async fn test_customer_snapshot() {
        let db = test_db().await;

        let customer = db
            .customers()
            .insert(Customer {
                id: 0,
                legal_name: "Papeleria Centro SRL".to_string(),
                tax_id: Some("30-71234567-8".to_string()),
                vat_condition: VatCondition::RegisteredResponsible,
                email: None,
                address: None,
                created_at: Utc::now(),
            })
            .await
            .unwrap();

        let sale = db
            .sale_engine()
            .commit_sale(vec![copy_line(1, 50)], PaymentMethod::Cash, Some(&customer), true)
            .await
            .unwrap();

        assert_eq!(sale.customer_id, Some(customer.id));
        assert_eq!(sale.tax_id_snapshot.as_deref(), Some("30-71234567-8"));

        let loaded = db.sales().find_by_id(sale.id).await.unwrap();
        assert_eq!(loaded.tax_id_snapshot.as_deref(), Some("30-71234567-8"));
    }
}
