//! StoreSession - one browser session against the storefront.
//!
//! The session owns the driver and the run configuration. Every interaction
//! first polls for its target with the configured bound, so scenarios never
//! sleep for a fixed delay.

use crate::config::StoreConfig;
use crate::driver::{ElementHandle, StoreDriver};
use crate::locator::Locator;
use crate::pages::{CartPage, CheckoutPage, DetailsPage, Header, HomePage, Page, RegisterPage};
use crate::result::{CheckError, CheckResult};
use crate::wait::{Poller, WaitOptions, WaitResult};
use std::future::Future;
use tracing::debug;

/// A driver plus the configuration it runs with
#[derive(Debug)]
pub struct StoreSession<D: StoreDriver> {
    driver: D,
    config: StoreConfig,
}

impl<D: StoreDriver> StoreSession<D> {
    /// Wrap a connected driver
    pub const fn new(driver: D, config: StoreConfig) -> Self {
        Self { driver, config }
    }

    /// Run configuration
    pub const fn config(&self) -> &StoreConfig {
        &self.config
    }

    /// Underlying driver
    pub const fn driver(&self) -> &D {
        &self.driver
    }

    /// Underlying driver, mutably
    pub fn driver_mut(&mut self) -> &mut D {
        &mut self.driver
    }

    /// Give the driver back
    pub fn into_driver(self) -> D {
        self.driver
    }

    fn wait_options_for(&self, locator: &Locator) -> WaitOptions {
        locator.options_or(self.config.locator_options()).into()
    }

    /// Probe until `probe` yields a value or the bound elapses
    async fn poll_until<T, F, Fut>(
        &self,
        options: WaitOptions,
        what: &str,
        mut probe: F,
    ) -> CheckResult<Option<T>>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = CheckResult<Option<T>>>,
    {
        let mut poller = Poller::start(options);
        while poller.attempt() {
            if let Some(found) = probe().await? {
                let WaitResult {
                    elapsed, attempts, ..
                } = poller.finish(what);
                debug!(what, ?elapsed, attempts, "condition met");
                return Ok(Some(found));
            }
            if !poller.has_time_left() {
                break;
            }
            poller.tick().await;
        }
        Ok(None)
    }

    // ========================================================================
    // Element waits
    // ========================================================================

    /// Query once without waiting
    pub async fn find_now(&self, locator: &Locator) -> CheckResult<Option<ElementHandle>> {
        self.driver.query(locator.selector()).await
    }

    /// Wait until the element is present
    pub async fn wait_for(&self, locator: &Locator) -> CheckResult<ElementHandle> {
        let options = self.wait_options_for(locator);
        let selector = locator.selector();
        let driver = &self.driver;
        self.poll_until(options, "present", move || driver.query(selector))
            .await?
            .ok_or_else(|| CheckError::ElementNotFound {
                selector: locator.to_string(),
                timeout_ms: options.timeout_ms,
            })
    }

    /// Wait until the element is present, visible and enabled
    pub async fn wait_for_clickable(&self, locator: &Locator) -> CheckResult<ElementHandle> {
        let options = self.wait_options_for(locator);
        let selector = locator.selector();
        let driver = &self.driver;
        let found = self
            .poll_until(options, "clickable", move || async move {
                Ok::<_, CheckError>(
                    driver
                        .query(selector)
                        .await?
                        .filter(ElementHandle::is_clickable),
                )
            })
            .await?;
        match found {
            Some(element) => Ok(element),
            None if self.find_now(locator).await?.is_some() => Err(CheckError::Timeout {
                waited_for: format!("{locator} to become clickable"),
                ms: options.timeout_ms,
            }),
            None => Err(CheckError::ElementNotFound {
                selector: locator.to_string(),
                timeout_ms: options.timeout_ms,
            }),
        }
    }

    /// Wait until any of `locators` is present; returns its index
    pub async fn wait_for_first(
        &self,
        locators: &[&Locator],
    ) -> CheckResult<(usize, ElementHandle)> {
        let options = locators
            .first()
            .map_or_else(|| self.config.wait_options(), |l| self.wait_options_for(l));
        let driver = &self.driver;
        let found = self
            .poll_until(options, "any present", move || async move {
                for (index, locator) in locators.iter().enumerate() {
                    if let Some(element) = driver.query(locator.selector()).await? {
                        return Ok::<_, CheckError>(Some((index, element)));
                    }
                }
                Ok(None)
            })
            .await?;
        found.ok_or_else(|| CheckError::ElementNotFound {
            selector: locators
                .iter()
                .map(ToString::to_string)
                .collect::<Vec<_>>()
                .join(" | "),
            timeout_ms: options.timeout_ms,
        })
    }

    /// Wait until the element is gone
    pub async fn wait_for_absent(&self, locator: &Locator) -> CheckResult<()> {
        let options = self.wait_options_for(locator);
        let selector = locator.selector();
        let driver = &self.driver;
        self.poll_until(options, "absent", move || async move {
            Ok::<_, CheckError>(driver.query(selector).await?.is_none().then_some(()))
        })
        .await?
        .ok_or_else(|| CheckError::Timeout {
            waited_for: format!("{locator} to disappear"),
            ms: options.timeout_ms,
        })
    }

    /// Wait until the element's text differs from `previous`
    pub async fn wait_for_text_change(
        &self,
        locator: &Locator,
        previous: &str,
    ) -> CheckResult<String> {
        let options = self.wait_options_for(locator);
        let selector = locator.selector();
        let driver = &self.driver;
        self.poll_until(options, "text changed", move || async move {
            Ok::<_, CheckError>(
                driver
                    .query(selector)
                    .await?
                    .map(|e| e.text)
                    .filter(|text| text != previous),
            )
        })
        .await?
        .ok_or_else(|| CheckError::Timeout {
            waited_for: format!("{locator} to change from {previous:?}"),
            ms: options.timeout_ms,
        })
    }

    // ========================================================================
    // Interactions
    // ========================================================================

    /// Wait until clickable, then click
    pub async fn click(&mut self, locator: &Locator) -> CheckResult<()> {
        self.wait_for_clickable(locator).await?;
        debug!(%locator, "click");
        self.driver.click(locator.selector()).await
    }

    /// Replace an input's value
    pub async fn fill(&mut self, locator: &Locator, text: &str) -> CheckResult<()> {
        self.wait_for(locator).await?;
        debug!(%locator, text, "fill");
        self.driver.clear(locator.selector()).await?;
        self.driver.send_keys(locator.selector(), text).await
    }

    /// Choose an option of a `<select>` by value
    pub async fn select(&mut self, locator: &Locator, value: &str) -> CheckResult<()> {
        self.wait_for(locator).await?;
        debug!(%locator, value, "select");
        self.driver.select_by_value(locator.selector(), value).await
    }

    /// Rendered text of the element
    pub async fn read_text(&self, locator: &Locator) -> CheckResult<String> {
        Ok(self.wait_for(locator).await?.text)
    }

    /// Attribute of the element; missing attributes are an error
    pub async fn read_attribute(&self, locator: &Locator, name: &str) -> CheckResult<String> {
        self.wait_for(locator).await?;
        self.driver
            .attribute(locator.selector(), name)
            .await?
            .ok_or_else(|| CheckError::AttributeMissing {
                selector: locator.to_string(),
                name: name.to_string(),
            })
    }

    // ========================================================================
    // Navigation
    // ========================================================================

    /// Load an absolute URL
    pub async fn navigate(&mut self, url: &str) -> CheckResult<()> {
        debug!(url, "navigate");
        self.driver.navigate(url).await
    }

    /// Load the storefront root
    pub async fn navigate_home(&mut self) -> CheckResult<()> {
        let url = self.config.base_url.clone();
        self.navigate(&url).await
    }

    /// Reload the current page
    pub async fn refresh(&mut self) -> CheckResult<()> {
        self.driver.refresh().await
    }

    /// Current URL
    pub async fn current_url(&self) -> CheckResult<String> {
        self.driver.current_url().await
    }

    /// Page the browser is on, if recognised
    pub async fn current_page(&self) -> CheckResult<Option<Page>> {
        let url = self.current_url().await?;
        Ok(Page::from_url(&url, &self.config))
    }

    /// Whether the browser shows the home page
    pub async fn is_home(&self) -> CheckResult<bool> {
        let url = self.current_url().await?;
        Ok(self.config.home_urls().iter().any(|home| *home == url))
    }

    /// Wait until the browser has landed on `page`
    pub async fn wait_for_page(&self, page: Page) -> CheckResult<()> {
        let options = self.config.wait_options();
        let found = self
            .poll_until(options, page.name(), move || async move {
                let current = self.current_page().await?;
                Ok::<_, CheckError>((current == Some(page)).then_some(()))
            })
            .await?;
        found.ok_or_else(|| CheckError::Timeout {
            waited_for: format!("the {} page", page.name()),
            ms: options.timeout_ms,
        })
    }

    /// Close the browser
    pub async fn close(&mut self) -> CheckResult<()> {
        self.driver.close().await
    }

    // ========================================================================
    // Page views
    // ========================================================================

    /// Header bar, present on every page
    pub fn header(&mut self) -> Header<'_, D> {
        Header::new(self)
    }

    /// Home page catalog
    pub fn home(&mut self) -> HomePage<'_, D> {
        HomePage::new(self)
    }

    /// Product details page
    pub fn details(&mut self) -> DetailsPage<'_, D> {
        DetailsPage::new(self)
    }

    /// Shopping cart page
    pub fn cart(&mut self) -> CartPage<'_, D> {
        CartPage::new(self)
    }

    /// Checkout page
    pub fn checkout(&mut self) -> CheckoutPage<'_, D> {
        CheckoutPage::new(self)
    }

    /// Account registration page
    pub fn register(&mut self) -> RegisterPage<'_, D> {
        RegisterPage::new(self)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use crate::mock::MockStorefront;
    use crate::pages::header;
    use std::time::Duration;

    fn session() -> StoreSession<MockStorefront> {
        let config = StoreConfig {
            element_timeout_ms: 200,
            poll_interval_ms: 10,
            ..StoreConfig::default()
        };
        StoreSession::new(MockStorefront::new(&config), config)
    }

    mod wait_tests {
        use super::*;

        #[tokio::test]
        async fn test_wait_for_present() {
            let session = session();
            let element = session.wait_for(&header::CART_TOTAL).await.unwrap();
            assert_eq!(element.text, "0 item(s) - $0.00");
        }

        #[tokio::test]
        async fn test_missing_element_times_out() {
            let session = session();
            let locator = Locator::xpath("//*[@id=\"nope\"]").with_timeout(Duration::from_millis(30));
            let err = session.wait_for(&locator).await.unwrap_err();
            match err {
                CheckError::ElementNotFound {
                    selector,
                    timeout_ms,
                } => {
                    assert!(selector.contains("nope"));
                    assert_eq!(timeout_ms, 30);
                }
                other => panic!("unexpected {other:?}"),
            }
        }

        #[tokio::test]
        async fn test_hidden_element_is_not_clickable() {
            let session = session();
            // Dropdown contents stay in the DOM while the dropdown is closed
            let err = session
                .wait_for_clickable(&header::CART_MESSAGE)
                .await
                .unwrap_err();
            assert!(matches!(err, CheckError::Timeout { .. }));
        }

        #[tokio::test]
        async fn test_wait_for_first_reports_index() {
            let session = session();
            let missing = Locator::xpath("//missing");
            let (index, _) = session
                .wait_for_first(&[&missing, &header::CART_TOTAL])
                .await
                .unwrap();
            assert_eq!(index, 1);
        }

        #[tokio::test]
        async fn test_text_change_times_out_when_static() {
            let session = session();
            let err = session
                .wait_for_text_change(&header::CART_TOTAL, "0 item(s) - $0.00")
                .await
                .unwrap_err();
            assert!(matches!(err, CheckError::Timeout { .. }));
        }
    }

    mod navigation_tests {
        use super::*;

        #[tokio::test]
        async fn test_starts_on_home() {
            let session = session();
            assert!(session.is_home().await.unwrap());
            assert_eq!(session.current_page().await.unwrap(), Some(Page::Home));
        }

        #[tokio::test]
        async fn test_navigate_to_cart_route() {
            let mut session = session();
            let url = session.config().url(&Page::Cart.route());
            session.navigate(&url).await.unwrap();
            session.wait_for_page(Page::Cart).await.unwrap();
            assert!(!session.is_home().await.unwrap());
            session.navigate_home().await.unwrap();
            assert!(session.is_home().await.unwrap());
        }
    }
}
