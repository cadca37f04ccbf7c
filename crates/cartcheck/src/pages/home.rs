//! Home page: the four-product catalog grid.

use crate::catalog::{Product, ProductId};
use crate::driver::StoreDriver;
use crate::locator::{Locator, Selector};
use crate::pages::{header, Page};
use crate::parse::{extract_amount, parse_price};
use crate::result::CheckResult;
use crate::session::StoreSession;
use rust_decimal::Decimal;
use tracing::debug;

const GRID: &str = "/html/body/div[2]/div/div/div[2]";

/// "Add to Cart" button of a catalog tile
#[must_use]
pub fn add_to_cart_button(product: ProductId) -> Locator {
    tile(product, "div[3]/button[1]")
}

/// Price label of a catalog tile
#[must_use]
pub fn price_label(product: ProductId) -> Locator {
    tile(product, "div[2]/p[2]/span")
}

/// Name link of a catalog tile, leading to the details page
#[must_use]
pub fn details_link(product: ProductId) -> Locator {
    tile(product, "div[2]/h4/a")
}

fn tile(product: ProductId, tail: &str) -> Locator {
    Locator::from_selector(Selector::xpath_owned(format!(
        "{GRID}/div[{}]/div/{tail}",
        product.position()
    )))
}

/// The home page
#[derive(Debug)]
pub struct HomePage<'s, D: StoreDriver> {
    session: &'s mut StoreSession<D>,
}

impl<'s, D: StoreDriver> HomePage<'s, D> {
    pub(crate) fn new(session: &'s mut StoreSession<D>) -> Self {
        Self { session }
    }

    /// Listed price text of a product, without the currency sign
    pub async fn price_text(&self, product: ProductId) -> CheckResult<String> {
        let label = self.session.read_text(&price_label(product)).await?;
        Ok(extract_amount(&label)?.to_string())
    }

    /// Listed price of a product
    pub async fn price(&self, product: ProductId) -> CheckResult<Decimal> {
        parse_price(&self.price_text(product).await?)
    }

    /// Name and price as listed on the tile
    pub async fn product(&self, product: ProductId) -> CheckResult<Product> {
        let name = self.session.read_text(&details_link(product)).await?;
        let price = self.price(product).await?;
        Ok(Product::new(product, name.trim(), price))
    }

    /// Add one unit from the tile and wait for the cart button to update
    pub async fn add_to_cart(&mut self, product: ProductId) -> CheckResult<()> {
        let before = self.session.read_text(&header::CART_TOTAL).await?;
        self.session.click(&add_to_cart_button(product)).await?;
        let after = self
            .session
            .wait_for_text_change(&header::CART_TOTAL, &before)
            .await?;
        debug!(%product, before, after, "added from home page");
        Ok(())
    }

    /// Open the product's details page
    pub async fn open_details(&mut self, product: ProductId) -> CheckResult<()> {
        self.session.click(&details_link(product)).await?;
        self.session.wait_for_page(Page::Product).await
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use crate::config::StoreConfig;
    use crate::mock::MockStorefront;
    use std::str::FromStr;

    fn session() -> StoreSession<MockStorefront> {
        let config = StoreConfig {
            element_timeout_ms: 200,
            poll_interval_ms: 5,
            ..StoreConfig::default()
        };
        StoreSession::new(MockStorefront::new(&config), config)
    }

    #[test]
    fn test_tile_locators() {
        let id = ProductId::ALL[2];
        assert_eq!(
            add_to_cart_button(id).selector().as_str(),
            "/html/body/div[2]/div/div/div[2]/div[3]/div/div[3]/button[1]"
        );
        assert_eq!(
            price_label(id).selector().as_str(),
            "/html/body/div[2]/div/div/div[2]/div[3]/div/div[2]/p[2]/span"
        );
        assert_eq!(
            details_link(id).selector().as_str(),
            "/html/body/div[2]/div/div/div[2]/div[3]/div/div[2]/h4/a"
        );
    }

    #[tokio::test]
    async fn test_reads_catalog() {
        let mut session = session();
        let home = session.home();
        let product = home.product(ProductId::ALL[3]).await.unwrap();
        assert_eq!(product.name, "Test product 4");
        assert_eq!(product.unit_price, Decimal::from_str("12345.67").unwrap());
        assert_eq!(home.price_text(ProductId::ALL[3]).await.unwrap(), "12,345.67");
    }

    #[tokio::test]
    async fn test_add_to_cart_updates_button() {
        let mut session = session();
        session.home().add_to_cart(ProductId::ALL[1]).await.unwrap();
        let text = session.header().cart_text().await.unwrap();
        assert_eq!(text, "1 item(s) - $20.00");
    }

    #[tokio::test]
    async fn test_open_details() {
        let mut session = session();
        session.home().open_details(ProductId::ALL[0]).await.unwrap();
        assert_eq!(session.current_page().await.unwrap(), Some(Page::Product));
    }
}
