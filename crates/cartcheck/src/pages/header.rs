//! Header bar: cart button and dropdown, account menu, breadcrumb.

use crate::driver::StoreDriver;
use crate::locator::Locator;
use crate::pages::Page;
use crate::parse::{parse_cart_summary, CartSummary};
use crate::result::{CheckError, CheckResult};
use crate::session::StoreSession;
use tracing::{debug, info};

/// Breadcrumb link to the home page; absent on the home page itself
pub const HOME: Locator = Locator::xpath("/html/body/div[2]/ul/li[1]/a/i");
/// Top-bar "Shopping Cart" link
pub const SHOPPING_CART: Locator = Locator::xpath("/html/body/nav/div/div[2]/ul/li[4]/a/span");
/// Top-bar "My Account" menu
pub const MY_ACCOUNT: Locator = Locator::xpath("/html/body/nav/div/div[2]/ul/li[2]/a/span[1]");
/// "Register" entry of the account menu
pub const REGISTER: Locator = Locator::css(".dropdown-menu-right > li:nth-child(1) > a:nth-child(1)");
/// "Logout" entry of the account menu; only rendered for a logged-in customer
pub const LOGOUT: Locator = Locator::xpath("//a[contains(@href, 'route=account/logout')]");
/// Cart button text, `<N> item(s) - $<amount>`; clicking toggles the dropdown
pub const CART_TOTAL: Locator = Locator::xpath("//*[@id=\"cart-total\"]");
/// "View Cart" link inside the dropdown
pub const VIEW_CART: Locator =
    Locator::xpath("/html/body/header/div/div/div[3]/div/ul/li[2]/div/p/a[1]/strong");
/// Remove button of the first dropdown line
pub const REMOVE: Locator = Locator::xpath(
    "/html/body/header/div/div/div[3]/div/ul/li[1]/table/tbody/tr[1]/td[5]/button",
);
/// Dropdown message shown for an empty cart
pub const CART_MESSAGE: Locator = Locator::xpath("/html/body/header/div/div/div[3]/div/ul/li/p");

/// Message the dropdown shows for an empty cart
pub const EMPTY_CART_MESSAGE: &str = "Your shopping cart is empty!";

/// Upper bound on remove clicks while draining the cart
const MAX_REMOVALS: u32 = 100;

/// The header bar
#[derive(Debug)]
pub struct Header<'s, D: StoreDriver> {
    session: &'s mut StoreSession<D>,
}

impl<'s, D: StoreDriver> Header<'s, D> {
    pub(crate) fn new(session: &'s mut StoreSession<D>) -> Self {
        Self { session }
    }

    /// Cart button text as currently rendered
    pub async fn cart_text(&self) -> CheckResult<String> {
        self.session.read_text(&CART_TOTAL).await
    }

    /// Reload the page and parse the cart button
    pub async fn cart_summary(&mut self) -> CheckResult<CartSummary> {
        self.session.refresh().await?;
        let text = self.cart_text().await?;
        let summary = parse_cart_summary(&text)?;
        debug!(%summary, "cart summary");
        Ok(summary)
    }

    /// Wait for the cart button to move away from `previous` after an add
    pub async fn wait_for_cart_change(&self, previous: &str) -> CheckResult<String> {
        self.session.wait_for_text_change(&CART_TOTAL, previous).await
    }

    /// Open or close the cart dropdown
    pub async fn toggle_cart(&mut self) -> CheckResult<()> {
        self.session.click(&CART_TOTAL).await
    }

    /// Whether the cart dropdown reports an empty cart.
    ///
    /// Opens the dropdown, waits for either a remove button or the empty-cart
    /// message, and closes it again.
    pub async fn cart_is_empty(&mut self) -> CheckResult<bool> {
        self.toggle_cart().await?;
        let (index, element) = self.session.wait_for_first(&[&CART_MESSAGE, &REMOVE]).await?;
        let empty = index == 0 && element.text.trim() == EMPTY_CART_MESSAGE;
        self.toggle_cart().await?;
        Ok(empty)
    }

    /// Remove every line through the dropdown; returns the number removed
    pub async fn clean_cart(&mut self) -> CheckResult<u32> {
        let mut removed = 0;
        loop {
            self.session.refresh().await?;
            self.toggle_cart().await?;
            let (index, _) = self.session.wait_for_first(&[&REMOVE, &CART_MESSAGE]).await?;
            if index != 0 {
                break;
            }
            if removed == MAX_REMOVALS {
                return Err(CheckError::driver(format!(
                    "cart still not empty after {MAX_REMOVALS} removals"
                )));
            }
            let before = self.cart_text().await?;
            self.session.click(&REMOVE).await?;
            self.wait_for_cart_change(&before).await?;
            removed += 1;
        }
        self.toggle_cart().await?;
        info!(removed, "cart drained");
        Ok(removed)
    }

    /// Follow the breadcrumb to the home page
    pub async fn go_home(&mut self) -> CheckResult<()> {
        self.session.click(&HOME).await?;
        self.session.wait_for_page(Page::Home).await
    }

    /// Open the shopping cart page from the top bar
    pub async fn go_to_cart_page(&mut self) -> CheckResult<()> {
        self.session.click(&SHOPPING_CART).await?;
        self.session.wait_for_page(Page::Cart).await
    }

    /// Open the shopping cart page from the dropdown
    pub async fn view_cart(&mut self) -> CheckResult<()> {
        self.toggle_cart().await?;
        self.session.click(&VIEW_CART).await?;
        self.session.wait_for_page(Page::Cart).await
    }

    /// Whether a customer is logged in
    pub async fn is_logged_in(&self) -> CheckResult<bool> {
        Ok(self.session.find_now(&LOGOUT).await?.is_some())
    }

    /// Open the registration form from the account menu
    pub async fn open_registration(&mut self) -> CheckResult<()> {
        self.session.click(&MY_ACCOUNT).await?;
        self.session.click(&REGISTER).await?;
        self.session.wait_for_page(Page::Register).await
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use crate::catalog::ProductId;
    use crate::config::StoreConfig;
    use crate::mock::MockStorefront;
    use rust_decimal::Decimal;

    fn session() -> StoreSession<MockStorefront> {
        let config = StoreConfig {
            element_timeout_ms: 200,
            poll_interval_ms: 5,
            ..StoreConfig::default()
        };
        StoreSession::new(MockStorefront::new(&config), config)
    }

    #[tokio::test]
    async fn test_empty_cart_summary() {
        let mut session = session();
        let summary = session.header().cart_summary().await.unwrap();
        assert!(summary.is_empty());
        assert_eq!(summary.value_text, "0.00");
        assert!(session.header().cart_is_empty().await.unwrap());
    }

    #[tokio::test]
    async fn test_clean_cart_removes_every_line() {
        let mut session = session();
        session.driver_mut().preload(ProductId::ALL[1], 1);
        session.driver_mut().preload(ProductId::ALL[2], 3);

        let removed = session.header().clean_cart().await.unwrap();
        assert_eq!(removed, 2);

        let summary = session.header().cart_summary().await.unwrap();
        assert_eq!(summary.quantity, 0);
        assert_eq!(summary.value, Decimal::ZERO);
    }

    #[tokio::test]
    async fn test_clean_cart_on_empty_cart_is_noop() {
        let mut session = session();
        assert_eq!(session.header().clean_cart().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_breadcrumb_absent_on_home() {
        let mut session = session();
        assert!(session.header().go_home().await.is_err());
        session.header().go_to_cart_page().await.unwrap();
        session.header().go_home().await.unwrap();
        assert!(session.is_home().await.unwrap());
    }

    #[tokio::test]
    async fn test_not_logged_in_initially() {
        let mut session = session();
        assert!(!session.header().is_logged_in().await.unwrap());
    }
}
