//! Locators for the storefront's fixed selectors.
//!
//! Every element the suite touches is addressed by an absolute XPath or a CSS
//! selector. Locators are `const`-constructible so page objects can declare
//! them as associated constants, and carry the wait options used when the
//! session polls for them.

use std::borrow::Cow;
use std::fmt;
use std::time::Duration;

/// Default timeout for element waits (10 seconds)
pub const DEFAULT_TIMEOUT_MS: u64 = 10_000;

/// Default polling interval for element waits (100ms)
pub const DEFAULT_POLL_INTERVAL_MS: u64 = 100;

/// Selector type for locating elements
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Selector {
    /// CSS selector (e.g., ".alert")
    Css(Cow<'static, str>),
    /// XPath selector
    XPath(Cow<'static, str>),
}

impl Selector {
    /// Create a CSS selector from a static string
    #[must_use]
    pub const fn css(selector: &'static str) -> Self {
        Self::Css(Cow::Borrowed(selector))
    }

    /// Create an XPath selector from a static string
    #[must_use]
    pub const fn xpath(selector: &'static str) -> Self {
        Self::XPath(Cow::Borrowed(selector))
    }

    /// Create an XPath selector from a computed string
    #[must_use]
    pub fn xpath_owned(selector: impl Into<String>) -> Self {
        Self::XPath(Cow::Owned(selector.into()))
    }

    /// The raw selector text
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Css(s) | Self::XPath(s) => s,
        }
    }

    /// Whether this is an XPath selector
    #[must_use]
    pub const fn is_xpath(&self) -> bool {
        matches!(self, Self::XPath(_))
    }

    /// JavaScript expression evaluating to the first matching element or `null`
    #[must_use]
    pub fn to_query(&self) -> String {
        let quoted = js_string(self.as_str());
        match self {
            Self::Css(_) => format!("document.querySelector({quoted})"),
            Self::XPath(_) => format!(
                "document.evaluate({quoted}, document, null, XPathResult.FIRST_ORDERED_NODE_TYPE, null).singleNodeValue"
            ),
        }
    }

    /// JavaScript expression evaluating to the number of matching elements
    #[must_use]
    pub fn to_count_query(&self) -> String {
        let quoted = js_string(self.as_str());
        match self {
            Self::Css(_) => format!("document.querySelectorAll({quoted}).length"),
            Self::XPath(_) => format!(
                "document.evaluate({quoted}, document, null, XPathResult.ORDERED_NODE_SNAPSHOT_TYPE, null).snapshotLength"
            ),
        }
    }
}

impl fmt::Display for Selector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Css(s) => write!(f, "css={s}"),
            Self::XPath(s) => write!(f, "xpath={s}"),
        }
    }
}

/// Quote a string as a JavaScript string literal
fn js_string(raw: &str) -> String {
    serde_json::to_string(raw).unwrap_or_else(|_| format!("{raw:?}"))
}

/// Locator options for customizing wait behavior
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LocatorOptions {
    /// Timeout for waiting on the element
    pub timeout: Duration,
    /// Polling interval while waiting
    pub poll_interval: Duration,
}

impl Default for LocatorOptions {
    fn default() -> Self {
        Self::DEFAULT
    }
}

impl LocatorOptions {
    /// Ten second timeout, 100ms polling
    pub const DEFAULT: Self = Self {
        timeout: Duration::from_millis(DEFAULT_TIMEOUT_MS),
        poll_interval: Duration::from_millis(DEFAULT_POLL_INTERVAL_MS),
    };
}

/// A selector plus the wait options used to find it.
///
/// Options set on a locator override the session defaults; locators declared
/// as constants carry no override and inherit the session's.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Locator {
    selector: Selector,
    options: Option<LocatorOptions>,
}

impl Locator {
    /// Locator for a static XPath
    #[must_use]
    pub const fn xpath(selector: &'static str) -> Self {
        Self {
            selector: Selector::xpath(selector),
            options: None,
        }
    }

    /// Locator for a static CSS selector
    #[must_use]
    pub const fn css(selector: &'static str) -> Self {
        Self {
            selector: Selector::css(selector),
            options: None,
        }
    }

    /// Create a locator from a selector
    #[must_use]
    pub const fn from_selector(selector: Selector) -> Self {
        Self {
            selector,
            options: None,
        }
    }

    /// Set a custom timeout
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        let mut options = self.options.unwrap_or_default();
        options.timeout = timeout;
        self.options = Some(options);
        self
    }

    /// Get the selector
    #[must_use]
    pub const fn selector(&self) -> &Selector {
        &self.selector
    }

    /// Options resolved against the session defaults
    #[must_use]
    pub fn options_or(&self, defaults: LocatorOptions) -> LocatorOptions {
        self.options.unwrap_or(defaults)
    }
}

impl fmt::Display for Locator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.selector.fmt(f)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    mod selector_tests {
        use super::*;

        #[test]
        fn test_css_query() {
            let selector = Selector::css(".alert");
            assert_eq!(selector.to_query(), "document.querySelector(\".alert\")");
            assert!(!selector.is_xpath());
        }

        #[test]
        fn test_xpath_query_escapes_quotes() {
            let selector = Selector::xpath("//*[@id=\"cart-total\"]");
            let query = selector.to_query();
            assert!(query.starts_with("document.evaluate(\"//*[@id=\\\"cart-total\\\"]\""));
            assert!(query.contains("FIRST_ORDERED_NODE_TYPE"));
            assert!(selector.is_xpath());
        }

        #[test]
        fn test_count_queries() {
            assert!(Selector::css("a")
                .to_count_query()
                .ends_with(".length"));
            assert!(Selector::xpath("//a")
                .to_count_query()
                .ends_with(".snapshotLength"));
        }

        #[test]
        fn test_owned_xpath_equals_static() {
            assert_eq!(Selector::xpath_owned("//a"), Selector::xpath("//a"));
        }

        #[test]
        fn test_display() {
            assert_eq!(Selector::css("#x").to_string(), "css=#x");
            assert_eq!(Selector::xpath("//x").to_string(), "xpath=//x");
        }
    }

    mod locator_tests {
        use super::*;

        const CART: Locator = Locator::xpath("//*[@id=\"cart-total\"]");

        #[test]
        fn test_const_locator_inherits_defaults() {
            let defaults = LocatorOptions {
                timeout: Duration::from_millis(250),
                poll_interval: Duration::from_millis(5),
            };
            assert_eq!(CART.options_or(defaults), defaults);
        }

        #[test]
        fn test_with_timeout_overrides() {
            let locator = CART.clone().with_timeout(Duration::from_secs(2));
            let options = locator.options_or(LocatorOptions::DEFAULT);
            assert_eq!(options.timeout, Duration::from_secs(2));
            assert_eq!(
                options.poll_interval,
                Duration::from_millis(DEFAULT_POLL_INTERVAL_MS)
            );
        }

        #[test]
        fn test_default_options() {
            let options = LocatorOptions::default();
            assert_eq!(options.timeout, Duration::from_secs(10));
        }
    }
}
