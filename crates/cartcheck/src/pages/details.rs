//! Product details page.

use crate::driver::StoreDriver;
use crate::locator::Locator;
use crate::pages::header;
use crate::parse::{parse_quantity, parse_quantity_restriction, QuantityRestriction};
use crate::result::CheckResult;
use crate::session::StoreSession;

/// Quantity input, pre-filled with the default order quantity
pub const QUANTITY: Locator = Locator::xpath("//*[@id=\"input-quantity\"]");
/// "Add to Cart" button
pub const ADD_TO_CART: Locator = Locator::xpath("//*[@id=\"button-cart\"]");
/// Info alert announcing a quantity restriction
pub const ALERT: Locator = Locator::css(".alert");

/// The product details page
#[derive(Debug)]
pub struct DetailsPage<'s, D: StoreDriver> {
    session: &'s mut StoreSession<D>,
}

impl<'s, D: StoreDriver> DetailsPage<'s, D> {
    pub(crate) fn new(session: &'s mut StoreSession<D>) -> Self {
        Self { session }
    }

    /// Quantity the form is pre-filled with
    pub async fn default_quantity(&self) -> CheckResult<u32> {
        let value = self.session.read_attribute(&QUANTITY, "value").await?;
        parse_quantity(&value)
    }

    /// Restriction announced on the page, if any
    pub async fn restriction(&self) -> CheckResult<Option<QuantityRestriction>> {
        // the form renders together with any alert
        self.session.wait_for(&QUANTITY).await?;
        match self.session.find_now(&ALERT).await? {
            Some(alert) => parse_quantity_restriction(&alert.text).map(Some),
            None => Ok(None),
        }
    }

    /// Overwrite the quantity input
    pub async fn set_quantity(&mut self, quantity: u32) -> CheckResult<()> {
        self.session.fill(&QUANTITY, &quantity.to_string()).await
    }

    /// Submit the form and wait for the cart button to update
    pub async fn add_to_cart(&mut self) -> CheckResult<()> {
        let before = self.session.read_text(&header::CART_TOTAL).await?;
        self.session.click(&ADD_TO_CART).await?;
        self.session
            .wait_for_text_change(&header::CART_TOTAL, &before)
            .await?;
        Ok(())
    }
}
