//! One-page checkout and the order confirmation.

use crate::config::Customer;
use crate::driver::StoreDriver;
use crate::locator::Locator;
use crate::pages::Page;
use crate::result::CheckResult;
use crate::session::StoreSession;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

/// Billing first name
pub const FIRST_NAME: Locator = Locator::xpath("//*[@id=\"input-payment-firstname\"]");
/// Billing last name
pub const LAST_NAME: Locator = Locator::xpath("//*[@id=\"input-payment-lastname\"]");
/// Billing street address
pub const ADDRESS: Locator = Locator::xpath("//*[@id=\"input-payment-address-1\"]");
/// Billing city
pub const CITY: Locator = Locator::xpath("//*[@id=\"input-payment-city\"]");
/// Billing region select
pub const REGION: Locator = Locator::xpath("//*[@id=\"input-payment-zone\"]");

/// "Continue" after the billing address step
pub const CONTINUE_PAYMENT_ADDRESS: Locator = Locator::xpath("//*[@id=\"button-payment-address\"]");
/// "Continue" after the delivery address step
pub const CONTINUE_SHIPPING_ADDRESS: Locator =
    Locator::xpath("//*[@id=\"button-shipping-address\"]");
/// "Continue" after the delivery method step
pub const CONTINUE_SHIPPING_METHOD: Locator = Locator::xpath("//*[@id=\"button-shipping-method\"]");
/// "I have read and agree to the Terms & Conditions" checkbox
pub const AGREE_TERMS: Locator =
    Locator::xpath("/html/body/div[2]/div/div/div/div[5]/div[2]/div/div[2]/div/input[1]");
/// "Continue" after the payment method step
pub const CONTINUE_PAYMENT_METHOD: Locator = Locator::xpath("//*[@id=\"button-payment-method\"]");
/// "Confirm Order" button
pub const CONFIRM_ORDER: Locator = Locator::xpath("//*[@id=\"button-confirm\"]");

/// Last breadcrumb of the success page
pub const SUCCESS_BREADCRUMB: Locator = Locator::xpath("/html/body/div[2]/ul/li[4]/a");
/// Heading of the success page
pub const HEADING: Locator = Locator::xpath("/html/body/div[2]/div/div/h1");
/// "Continue" button of a success page
pub const CONTINUE: Locator = Locator::xpath("/html/body/div[2]/div/div/div/div/a");

/// Breadcrumb text of the order success page
pub const SUCCESS_BREADCRUMB_TEXT: &str = "Success";
/// Heading text of the order success page
pub const ORDER_PLACED_MESSAGE: &str = "Your order has been placed!";

/// What the order success page shows
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderConfirmation {
    /// Last breadcrumb
    pub breadcrumb: String,
    /// Page heading
    pub heading: String,
}

/// The checkout page
#[derive(Debug)]
pub struct CheckoutPage<'s, D: StoreDriver> {
    session: &'s mut StoreSession<D>,
}

impl<'s, D: StoreDriver> CheckoutPage<'s, D> {
    pub(crate) fn new(session: &'s mut StoreSession<D>) -> Self {
        Self { session }
    }

    /// Fill the billing address unless a stored one is preselected
    pub async fn fill_payment_address(&mut self, customer: &Customer) -> CheckResult<()> {
        self.session.wait_for(&CONTINUE_PAYMENT_ADDRESS).await?;
        let form_shown = self
            .session
            .find_now(&FIRST_NAME)
            .await?
            .is_some_and(|input| input.visible);
        if !form_shown {
            debug!("using stored payment address");
            return Ok(());
        }
        self.session.fill(&FIRST_NAME, &customer.first_name).await?;
        self.session.fill(&LAST_NAME, &customer.last_name).await?;
        self.session.fill(&ADDRESS, &customer.address).await?;
        self.session.fill(&CITY, &customer.city).await?;
        self.session.select(&REGION, &customer.region_id).await
    }

    /// Walk the remaining steps and confirm the order
    pub async fn confirm_order(&mut self) -> CheckResult<()> {
        for step in [
            &CONTINUE_PAYMENT_ADDRESS,
            &CONTINUE_SHIPPING_ADDRESS,
            &CONTINUE_SHIPPING_METHOD,
            &AGREE_TERMS,
            &CONTINUE_PAYMENT_METHOD,
            &CONFIRM_ORDER,
        ] {
            self.session.click(step).await?;
        }
        self.session.wait_for_page(Page::OrderSuccess).await
    }

    /// Fill, confirm and read the confirmation
    pub async fn place_order(&mut self, customer: &Customer) -> CheckResult<OrderConfirmation> {
        self.fill_payment_address(customer).await?;
        self.confirm_order().await?;
        let confirmation = OrderConfirmation {
            breadcrumb: self.session.read_text(&SUCCESS_BREADCRUMB).await?.trim().to_string(),
            heading: self.session.read_text(&HEADING).await?.trim().to_string(),
        };
        info!(heading = %confirmation.heading, "order placed");
        Ok(confirmation)
    }

    /// Leave the success page
    pub async fn finish(&mut self) -> CheckResult<()> {
        self.session.click(&CONTINUE).await
    }
}
