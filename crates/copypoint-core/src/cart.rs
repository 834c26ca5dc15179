//! # Cart
//!
//! In-memory cart assembly: the lines accumulated between "add to cart"
//! and "charge". Nothing here is persisted; a cart only becomes durable
//! when the sale engine commits it.
//!
//! ## Accumulation Policy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  add(line)                                                              │
//! │    same product identity AND same physical/service flag                 │
//! │        → merge quantities into the existing line                        │
//! │    anything else                                                        │
//! │        → append a new line                                              │
//! │                                                                         │
//! │  remove(index)                                                          │
//! │        → delete the line outright (no quantity decrement)               │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Ad-hoc service lines carry no catalog product id; their identity for
//! merging is the description snapshot, so "A4 mono simplex" and
//! "A4 color duplex" stay separate lines.
//!
//! Each line carries BOTH candidate unit prices (cash and transfer),
//! captured when the line is added, so the payment method can be chosen
//! at charge time without re-querying products or margins.

use serde::{Deserialize, Serialize};

use crate::error::{CoreResult, ValidationError};
use crate::money::Money;
use crate::pricing::{PriceQuote, PriceRequest};
use crate::types::{PaymentMethod, Product};

// =============================================================================
// Cart Line
// =============================================================================

/// One purchasable line: a physical product or a printed service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartLine {
    /// Catalog product reference; `None` for ad-hoc service lines.
    pub product_id: Option<i64>,

    /// Display name / description snapshot.
    pub description: String,

    /// Quantity, always > 0.
    pub quantity: i64,

    /// Unit price if the customer pays cash (frozen when added).
    pub cash_price_cents: i64,

    /// Unit price if the customer pays by transfer (frozen when added).
    pub transfer_price_cents: i64,

    /// Whether committing this line must decrement product stock.
    pub is_physical: bool,
}

impl CartLine {
    /// Builds a line for a catalog product, deriving both candidate
    /// prices from the product's base cost and the current margins.
    pub fn for_product(
        product: &Product,
        quantity: i64,
        cash_margin: f64,
        transfer_margin: f64,
    ) -> CoreResult<Self> {
        Self::check_quantity(quantity)?;

        Ok(CartLine {
            product_id: Some(product.id),
            description: product.name.clone(),
            quantity,
            cash_price_cents: product.cash_price(cash_margin).cents(),
            transfer_price_cents: product.transfer_price(transfer_margin).cents(),
            is_physical: product.is_physical(),
        })
    }

    /// Builds an ad-hoc service line from a resolved matrix price.
    ///
    /// Services have a single matrix price regardless of payment method,
    /// so both candidates are equal.
    pub fn for_service(request: &PriceRequest, quote: PriceQuote, quantity: i64) -> CoreResult<Self> {
        Self::check_quantity(quantity)?;

        Ok(CartLine {
            product_id: None,
            description: request.description(),
            quantity,
            cash_price_cents: quote.unit_price_cents,
            transfer_price_cents: quote.unit_price_cents,
            is_physical: false,
        })
    }

    fn check_quantity(quantity: i64) -> Result<(), ValidationError> {
        if quantity <= 0 {
            return Err(ValidationError::MustBePositive { field: "quantity".to_string() });
        }
        Ok(())
    }

    /// The unit price that applies under the given payment method.
    pub fn unit_price(&self, method: PaymentMethod) -> Money {
        match method {
            PaymentMethod::Cash => Money::from_cents(self.cash_price_cents),
            PaymentMethod::Transfer => Money::from_cents(self.transfer_price_cents),
        }
    }

    /// Line subtotal under the given payment method.
    pub fn subtotal(&self, method: PaymentMethod) -> Money {
        self.unit_price(method).multiply_quantity(self.quantity)
    }

    /// Identity for the merge policy: same product (or same ad-hoc
    /// description) with the same physical/service flag.
    fn merges_with(&self, other: &CartLine) -> bool {
        if self.is_physical != other.is_physical {
            return false;
        }
        match (self.product_id, other.product_id) {
            (Some(a), Some(b)) => a == b,
            (None, None) => self.description == other.description,
            _ => false,
        }
    }
}

// =============================================================================
// Cart
// =============================================================================

/// The in-progress cart: an ordered list of lines.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Cart {
    lines: Vec<CartLine>,
}

impl Cart {
    pub fn new() -> Self {
        Cart { lines: Vec::new() }
    }

    /// Adds a line, merging quantities when a matching line exists.
    ///
    /// A merge keeps the existing line's prices and description: the
    /// price was frozen when the product was first added.
    pub fn add(&mut self, line: CartLine) {
        if let Some(existing) = self.lines.iter_mut().find(|l| l.merges_with(&line)) {
            existing.quantity += line.quantity;
            return;
        }
        self.lines.push(line);
    }

    /// Removes the line at `index` outright. Out-of-range is a no-op.
    pub fn remove(&mut self, index: usize) {
        if index < self.lines.len() {
            self.lines.remove(index);
        }
    }

    /// Clears all lines.
    pub fn clear(&mut self) {
        self.lines.clear();
    }

    pub fn lines(&self) -> &[CartLine] {
        &self.lines
    }

    pub fn into_lines(self) -> Vec<CartLine> {
        self.lines
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    pub fn line_count(&self) -> usize {
        self.lines.len()
    }

    pub fn total_quantity(&self) -> i64 {
        self.lines.iter().map(|l| l.quantity).sum()
    }

    /// Cart total under the given payment method, in integer cents.
    pub fn total(&self, method: PaymentMethod) -> Money {
        self.lines
            .iter()
            .map(|l| l.subtotal(method))
            .fold(Money::zero(), |acc, s| acc + s)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pricing::{ColorMode, PaperSize, PaperType, Sidedness};
    use crate::types::ProductKind;

    fn physical_product(id: i64, base_cost_cents: i64) -> Product {
        Product {
            id,
            category_id: None,
            barcode: None,
            sku: format!("SKU-{id}"),
            name: format!("Product {id}"),
            kind: ProductKind::Physical,
            base_cost_cents,
            stock: 50,
            is_active: true,
        }
    }

    fn simplex_request() -> PriceRequest {
        PriceRequest::new(
            PaperSize::A4,
            PaperType::Plain80g,
            ColorMode::Mono,
            Sidedness::Simplex,
        )
    }

    #[test]
    fn test_line_rejects_zero_quantity() {
        let product = physical_product(1, 1000);
        assert!(CartLine::for_product(&product, 0, 1.5, 1.52).is_err());
        assert!(CartLine::for_product(&product, -3, 1.5, 1.52).is_err());
    }

    #[test]
    fn test_line_carries_both_candidate_prices() {
        let product = physical_product(1, 1000);
        let line = CartLine::for_product(&product, 2, 1.50, 1.52).unwrap();

        assert_eq!(line.unit_price(PaymentMethod::Cash).cents(), 1500);
        assert_eq!(line.unit_price(PaymentMethod::Transfer).cents(), 1520);
        assert_eq!(line.subtotal(PaymentMethod::Cash).cents(), 3000);
    }

    #[test]
    fn test_same_product_merges_quantities() {
        let mut cart = Cart::new();
        let product = physical_product(1, 1000);

        cart.add(CartLine::for_product(&product, 2, 1.5, 1.52).unwrap());
        cart.add(CartLine::for_product(&product, 3, 1.5, 1.52).unwrap());

        assert_eq!(cart.line_count(), 1);
        assert_eq!(cart.lines()[0].quantity, 5);
    }

    #[test]
    fn test_different_products_append() {
        let mut cart = Cart::new();
        cart.add(CartLine::for_product(&physical_product(1, 1000), 1, 1.5, 1.52).unwrap());
        cart.add(CartLine::for_product(&physical_product(2, 500), 1, 1.5, 1.52).unwrap());

        assert_eq!(cart.line_count(), 2);
    }

    #[test]
    fn test_same_service_combination_merges() {
        let mut cart = Cart::new();
        let request = simplex_request();

        cart.add(CartLine::for_service(&request, PriceQuote::new(50), 10).unwrap());
        cart.add(CartLine::for_service(&request, PriceQuote::new(50), 5).unwrap());

        assert_eq!(cart.line_count(), 1);
        assert_eq!(cart.lines()[0].quantity, 15);
    }

    #[test]
    fn test_distinct_service_combinations_stay_separate() {
        let mut cart = Cart::new();
        let color_request = PriceRequest::new(
            PaperSize::A4,
            PaperType::Plain80g,
            ColorMode::Color,
            Sidedness::Simplex,
        );

        cart.add(CartLine::for_service(&simplex_request(), PriceQuote::new(50), 10).unwrap());
        cart.add(CartLine::for_service(&color_request, PriceQuote::new(200), 2).unwrap());

        assert_eq!(cart.line_count(), 2);
    }

    #[test]
    fn test_remove_deletes_line_outright() {
        let mut cart = Cart::new();
        cart.add(CartLine::for_product(&physical_product(1, 1000), 4, 1.5, 1.52).unwrap());
        cart.add(CartLine::for_product(&physical_product(2, 500), 1, 1.5, 1.52).unwrap());

        cart.remove(0);

        assert_eq!(cart.line_count(), 1);
        assert_eq!(cart.lines()[0].product_id, Some(2));

        // Out of range is a no-op
        cart.remove(10);
        assert_eq!(cart.line_count(), 1);
    }

    #[test]
    fn test_total_by_payment_method() {
        let mut cart = Cart::new();
        cart.add(CartLine::for_product(&physical_product(1, 1000), 2, 1.50, 1.52).unwrap());
        cart.add(CartLine::for_service(&simplex_request(), PriceQuote::new(50), 10).unwrap());

        // Cash: 2 * 1500 + 10 * 50 = 3500
        assert_eq!(cart.total(PaymentMethod::Cash).cents(), 3500);
        // Transfer: 2 * 1520 + 10 * 50 = 3540
        assert_eq!(cart.total(PaymentMethod::Transfer).cents(), 3540);
    }
}
