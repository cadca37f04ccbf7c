//! Shopping cart page: line quantities, totals table, shipping estimate.
//!
//! Alerts raised by an update are inserted above the cart content, which
//! shifts the totals table one container down. The subtotal is looked up in
//! both positions; rows that only exist once shipping has been applied are
//! addressed in the shifted position, since applying shipping always raises
//! an alert.

use crate::driver::StoreDriver;
use crate::locator::Locator;
use crate::pages::Page;
use crate::parse::{first_line, parse_amount};
use crate::result::CheckResult;
use crate::session::StoreSession;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Subtotal cell with no alert above the content
pub const SUBTOTAL: Locator =
    Locator::xpath("/html/body/div[2]/div/div/div[2]/div/table/tbody/tr[1]/td[2]");
/// Subtotal cell below an alert
pub const SUBTOTAL_BELOW_ALERT: Locator =
    Locator::xpath("/html/body/div[2]/div[2]/div/div[2]/div/table/tbody/tr[1]/td[2]");
/// Applied flat shipping rate row
pub const FLAT_RATE: Locator =
    Locator::xpath("/html/body/div[2]/div[2]/div/div[2]/div/table/tbody/tr[2]/td[2]");
/// Grand total row once shipping is applied
pub const TOTAL: Locator =
    Locator::xpath("/html/body/div[2]/div[2]/div/div[2]/div/table/tbody/tr[3]/td[2]");
/// "Checkout" button
pub const CHECKOUT: Locator = Locator::xpath("/html/body/div[2]/div/div/div[3]/div[2]/a");

/// Quantity input of the first line
pub const QUANTITY: Locator =
    Locator::xpath("/html/body/div[2]/div/div/form/div/table/tbody/tr[1]/td[4]/div/input");
/// Update button of the first line
pub const UPDATE: Locator = Locator::xpath(
    "/html/body/div[2]/div/div/form/div/table/tbody/tr/td[4]/div/span/button[1]",
);
/// Message shown instead of the table once the cart is empty
pub const EMPTY_MESSAGE: Locator = Locator::xpath("/html/body/div[2]/div/div/p");

/// First alert above the content
pub const FIRST_ALERT: Locator = Locator::xpath("/html/body/div[2]/div[contains(@class, 'alert')][1]");
/// Second alert above the content
pub const SECOND_ALERT: Locator =
    Locator::xpath("/html/body/div[2]/div[contains(@class, 'alert')][2]");
/// Close button of the first alert
pub const CLOSE_ALERT: Locator =
    Locator::xpath("/html/body/div[2]/div[contains(@class, 'alert')][1]/button");

/// "Estimate Shipping & Taxes" panel toggle
pub const ESTIMATE_SHIPPING: Locator =
    Locator::xpath("/html/body/div[2]/div/div/div[1]/div[2]/div[1]/h4/a");
/// Region select of the estimate form
pub const REGION: Locator = Locator::xpath("//*[@id=\"input-zone\"]");
/// "Get Quotes" button
pub const GET_QUOTES: Locator = Locator::xpath("//*[@id=\"button-quote\"]");
/// Flat rate radio in the quote dialog
pub const FLAT_RATE_OPTION: Locator = Locator::xpath("/html/body/div[3]/div/div/div[2]/div/label/input");
/// Flat rate label, `Flat Shipping Rate - $<amount>`
pub const SHIPPING_METHOD_LABEL: Locator =
    Locator::xpath("/html/body/div[3]/div/div/div[2]/div/label");
/// "Apply Shipping" button of the quote dialog
pub const APPLY_SHIPPING: Locator = Locator::xpath("//*[@id=\"button-shipping\"]");

/// Alert raised by a successful quantity update
pub const UPDATED_MESSAGE: &str = "Success: You have modified your shopping cart!";
/// Content shown for an empty cart
pub const EMPTY_CART_MESSAGE: &str = "Your shopping cart is empty!";

/// Expected warning for a line below its minimum quantity
#[must_use]
pub fn minimum_warning(product_name: &str, minimum: u32) -> String {
    format!("Minimum order amount for {product_name} is {minimum}!")
}

/// A shipping option quoted by the estimate form
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShippingQuote {
    /// Region the quote was requested for
    pub region_id: String,
    /// Option label as displayed
    pub label: String,
    /// Quoted rate
    pub rate: Decimal,
}

/// The shopping cart page
#[derive(Debug)]
pub struct CartPage<'s, D: StoreDriver> {
    session: &'s mut StoreSession<D>,
}

impl<'s, D: StoreDriver> CartPage<'s, D> {
    pub(crate) fn new(session: &'s mut StoreSession<D>) -> Self {
        Self { session }
    }

    /// Subtotal from whichever layout is rendered
    pub async fn subtotal(&self) -> CheckResult<Decimal> {
        let (index, cell) = self
            .session
            .wait_for_first(&[&SUBTOTAL, &SUBTOTAL_BELOW_ALERT])
            .await?;
        if index == 1 {
            debug!("subtotal found below an alert");
        }
        parse_amount(&cell.text)
    }

    /// Applied shipping rate
    pub async fn flat_rate(&self) -> CheckResult<Decimal> {
        parse_amount(&self.session.read_text(&FLAT_RATE).await?)
    }

    /// Grand total
    pub async fn total(&self) -> CheckResult<Decimal> {
        parse_amount(&self.session.read_text(&TOTAL).await?)
    }

    /// Overwrite the first line's quantity and submit
    pub async fn update_quantity(&mut self, quantity: u32) -> CheckResult<()> {
        self.session.fill(&QUANTITY, &quantity.to_string()).await?;
        self.update().await
    }

    /// Submit the quantity form as it stands
    pub async fn update(&mut self) -> CheckResult<()> {
        self.session.click(&UPDATE).await
    }

    /// Message line of the first alert
    pub async fn first_alert(&self) -> CheckResult<String> {
        let text = self.session.read_text(&FIRST_ALERT).await?;
        Ok(first_line(&text)?.to_string())
    }

    /// Message line of the second alert
    pub async fn second_alert(&self) -> CheckResult<String> {
        let text = self.session.read_text(&SECOND_ALERT).await?;
        Ok(first_line(&text)?.to_string())
    }

    /// Dismiss the first alert and wait until it is gone
    pub async fn close_alert(&mut self) -> CheckResult<()> {
        self.session.click(&CLOSE_ALERT).await?;
        self.session.wait_for_absent(&FIRST_ALERT).await
    }

    /// Text shown in place of an empty cart
    ///
    /// The message path also matches the estimate intro of a filled cart, so
    /// the line table has to be gone before the text means anything.
    pub async fn empty_message(&self) -> CheckResult<String> {
        self.session.wait_for_absent(&QUANTITY).await?;
        Ok(self.session.read_text(&EMPTY_MESSAGE).await?.trim().to_string())
    }

    /// Request quotes for `region_id` and pick the flat rate
    pub async fn estimate_flat_rate(&mut self, region_id: &str) -> CheckResult<ShippingQuote> {
        self.session.click(&ESTIMATE_SHIPPING).await?;
        self.session.select(&REGION, region_id).await?;
        self.session.click(&GET_QUOTES).await?;
        self.session.click(&FLAT_RATE_OPTION).await?;
        let label = self.session.read_text(&SHIPPING_METHOD_LABEL).await?;
        let rate = parse_amount(&label)?;
        debug!(region_id, %rate, "flat rate quoted");
        Ok(ShippingQuote {
            region_id: region_id.to_string(),
            label: label.trim().to_string(),
            rate,
        })
    }

    /// Apply the chosen quote and wait for the rate row
    pub async fn apply_shipping(&mut self) -> CheckResult<()> {
        self.session.click(&APPLY_SHIPPING).await?;
        self.session.wait_for(&FLAT_RATE).await?;
        Ok(())
    }

    /// Proceed to checkout
    pub async fn checkout(&mut self) -> CheckResult<()> {
        self.session.click(&CHECKOUT).await?;
        self.session.wait_for_page(Page::Checkout).await
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use crate::catalog::ProductId;
    use crate::config::StoreConfig;
    use crate::mock::MockStorefront;
    use crate::result::CheckError;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn cart_with(product: ProductId, quantity: u32) -> StoreSession<MockStorefront> {
        let config = StoreConfig {
            element_timeout_ms: 200,
            poll_interval_ms: 5,
            ..StoreConfig::default()
        };
        let mut driver = MockStorefront::new(&config);
        driver.preload(product, quantity);
        driver.open(Page::Cart);
        StoreSession::new(driver, config)
    }

    #[test]
    fn test_minimum_warning() {
        assert_eq!(
            minimum_warning("Test product 1", 2),
            "Minimum order amount for Test product 1 is 2!"
        );
    }

    #[tokio::test]
    async fn test_subtotal_plain_layout() {
        let mut session = cart_with(ProductId::ALL[2], 2);
        assert_eq!(session.cart().subtotal().await.unwrap(), dec("2469.00"));
    }

    #[tokio::test]
    async fn test_subtotal_below_alert() {
        let mut session = cart_with(ProductId::ALL[1], 1);
        session.cart().update_quantity(2).await.unwrap();
        let cart = session.cart();
        assert_eq!(cart.first_alert().await.unwrap(), UPDATED_MESSAGE);
        assert_eq!(cart.subtotal().await.unwrap(), dec("40.00"));
    }

    #[tokio::test]
    async fn test_update_to_zero_empties_cart() {
        let mut session = cart_with(ProductId::ALL[1], 1);
        session.cart().update_quantity(0).await.unwrap();
        assert_eq!(session.cart().empty_message().await.unwrap(), EMPTY_CART_MESSAGE);
    }

    #[tokio::test]
    async fn test_empty_message_waits_for_the_table_to_go() {
        let mut session = cart_with(ProductId::ALL[1], 1);
        let err = session.cart().empty_message().await.unwrap_err();
        assert!(matches!(err, CheckError::Timeout { .. }));
    }

    #[tokio::test]
    async fn test_below_minimum_raises_second_alert() {
        let mut session = cart_with(ProductId::ALL[0], 2);
        session.cart().update_quantity(1).await.unwrap();
        let cart = session.cart();
        assert_eq!(cart.first_alert().await.unwrap(), UPDATED_MESSAGE);
        assert_eq!(
            cart.second_alert().await.unwrap(),
            minimum_warning("Test product 1", 2)
        );
    }

    #[tokio::test]
    async fn test_close_alert() {
        let mut session = cart_with(ProductId::ALL[1], 1);
        session.cart().update().await.unwrap();
        session.cart().close_alert().await.unwrap();
        assert!(session.find_now(&FIRST_ALERT).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_flat_rate_estimate_and_apply() {
        let mut session = cart_with(ProductId::ALL[0], 1);
        let quote = session.cart().estimate_flat_rate("2632").await.unwrap();
        assert_eq!(quote.rate, dec("5.00"));
        assert!(quote.label.starts_with("Flat Shipping Rate"));

        session.cart().apply_shipping().await.unwrap();
        let cart = session.cart();
        assert_eq!(cart.flat_rate().await.unwrap(), dec("5.00"));
        assert_eq!(cart.subtotal().await.unwrap(), dec("45.99"));
        assert_eq!(cart.total().await.unwrap(), dec("50.99"));
    }
}
