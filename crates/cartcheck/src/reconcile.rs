//! Expected cart state, computed independently of what the storefront shows.
//!
//! Scenarios record every product they add in an [`ExpectedCart`] and compare
//! the ledger's aggregates with the header summary and the totals table.

use crate::catalog::{Product, ProductId};
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

/// Round a currency amount to cents, midpoint away from zero
#[must_use]
pub fn round_currency(amount: Decimal) -> Decimal {
    amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

/// One product's quantity in the cart
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineItem {
    /// Product in the line
    pub product: ProductId,
    /// Unit price at the time of adding
    pub unit_price: Decimal,
    /// Quantity in the cart
    pub quantity: u32,
}

impl LineItem {
    /// Create a line item
    #[must_use]
    pub const fn new(product: ProductId, unit_price: Decimal, quantity: u32) -> Self {
        Self {
            product,
            unit_price,
            quantity,
        }
    }

    /// quantity × unit price
    #[must_use]
    pub fn value(&self) -> Decimal {
        self.unit_price * Decimal::from(self.quantity)
    }
}

/// Aggregate the storefront should display for a set of line items
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartAggregate {
    /// Σ quantities
    pub quantity: u32,
    /// Σ line values, in cents
    pub subtotal: Decimal,
    /// Applied shipping rate
    pub shipping: Option<Decimal>,
}

impl CartAggregate {
    /// Subtotal plus shipping, when applied
    #[must_use]
    pub fn total(&self) -> Decimal {
        match self.shipping {
            Some(rate) => expected_total_with_flat_rate(self.subtotal, rate),
            None => self.subtotal,
        }
    }
}

/// Σ of the quantity each add puts into the cart
#[must_use]
pub fn expected_quantity_after_adding<I>(adds: I) -> u32
where
    I: IntoIterator<Item = u32>,
{
    adds.into_iter().sum()
}

/// Σ unit price × quantity, rounded to cents
#[must_use]
pub fn expected_subtotal<'a, I>(line_items: I) -> Decimal
where
    I: IntoIterator<Item = &'a LineItem>,
{
    round_currency(line_items.into_iter().map(LineItem::value).sum())
}

/// Subtotal plus a flat shipping rate, rounded to cents
#[must_use]
pub fn expected_total_with_flat_rate(subtotal: Decimal, flat_rate: Decimal) -> Decimal {
    round_currency(subtotal + flat_rate)
}

/// Ledger of what a scenario believes it put in the cart.
///
/// Adding a product already present increases its line, as the storefront
/// does; setting a line to zero removes it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExpectedCart {
    lines: Vec<LineItem>,
    shipping: Option<Decimal>,
}

impl ExpectedCart {
    /// Empty ledger
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record adding `quantity` of a product
    pub fn add(&mut self, product: &Product, quantity: u32) {
        if quantity == 0 {
            return;
        }
        if let Some(line) = self.lines.iter_mut().find(|l| l.product == product.id) {
            line.quantity += quantity;
        } else {
            self.lines
                .push(LineItem::new(product.id, product.unit_price, quantity));
        }
    }

    /// Record a quantity update on the cart page
    pub fn set_quantity(&mut self, product: &Product, quantity: u32) {
        self.lines.retain(|l| l.product != product.id);
        if quantity > 0 {
            self.lines
                .push(LineItem::new(product.id, product.unit_price, quantity));
        }
    }

    /// Record an applied shipping rate
    pub fn apply_flat_rate(&mut self, rate: Decimal) {
        self.shipping = Some(rate);
    }

    /// Forget everything
    pub fn clear(&mut self) {
        self.lines.clear();
        self.shipping = None;
    }

    /// Line items in insertion order
    #[must_use]
    pub fn lines(&self) -> &[LineItem] {
        &self.lines
    }

    /// Quantity of one product
    #[must_use]
    pub fn quantity_of(&self, product: ProductId) -> u32 {
        self.lines
            .iter()
            .find(|l| l.product == product)
            .map_or(0, |l| l.quantity)
    }

    /// Whether the ledger holds nothing
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Expected aggregate
    #[must_use]
    pub fn aggregate(&self) -> CartAggregate {
        CartAggregate {
            quantity: expected_quantity_after_adding(self.lines.iter().map(|l| l.quantity)),
            subtotal: expected_subtotal(&self.lines),
            shipping: self.shipping,
        }
    }
}
