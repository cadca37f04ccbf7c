//! StoreDriver - the browser automation seam.
//!
//! The suite never talks to a browser directly. Everything goes through
//! [`StoreDriver`], which two implementations provide:
//!
//! - `ChromiumDriver` (feature `browser`): real Chromium over CDP
//! - [`MockStorefront`](crate::mock::MockStorefront): in-memory storefront for tests
//!
//! Drivers answer immediately; waiting for an element to appear or become
//! clickable is the session's job.

use crate::locator::Selector;
use crate::result::CheckResult;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Snapshot of a DOM element at the moment it was queried
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ElementHandle {
    /// Element tag name, lower case
    pub tag_name: String,
    /// Rendered text
    pub text: String,
    /// Whether the element has a layout box and is not hidden
    pub visible: bool,
    /// Whether the element accepts input
    pub enabled: bool,
}

impl ElementHandle {
    /// Create a visible, enabled element with no text
    #[must_use]
    pub fn new(tag_name: impl Into<String>) -> Self {
        Self {
            tag_name: tag_name.into(),
            text: String::new(),
            visible: true,
            enabled: true,
        }
    }

    /// Set the rendered text
    #[must_use]
    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = text.into();
        self
    }

    /// Set visibility
    #[must_use]
    pub const fn with_visible(mut self, visible: bool) -> Self {
        self.visible = visible;
        self
    }

    /// Set enabled state
    #[must_use]
    pub const fn with_enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }

    /// Rendered text of the element
    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Visible and enabled
    #[must_use]
    pub const fn is_clickable(&self) -> bool {
        self.visible && self.enabled
    }
}

/// Abstract driver trait for browser automation
#[async_trait]
pub trait StoreDriver: Send + Sync {
    /// Navigate to URL
    async fn navigate(&mut self, url: &str) -> CheckResult<()>;

    /// Get current URL
    async fn current_url(&self) -> CheckResult<String>;

    /// Reload the current page
    async fn refresh(&mut self) -> CheckResult<()>;

    /// Query the first element matching `selector`, if any
    async fn query(&self, selector: &Selector) -> CheckResult<Option<ElementHandle>>;

    /// Read an attribute (or same-named property) of the first match
    async fn attribute(&self, selector: &Selector, name: &str) -> CheckResult<Option<String>>;

    /// Click the first match
    async fn click(&mut self, selector: &Selector) -> CheckResult<()>;

    /// Clear an input's value
    async fn clear(&mut self, selector: &Selector) -> CheckResult<()>;

    /// Type text into an input, appending to its value
    async fn send_keys(&mut self, selector: &Selector, text: &str) -> CheckResult<()>;

    /// Choose the `<option>` with the given value in a `<select>`
    async fn select_by_value(&mut self, selector: &Selector, value: &str) -> CheckResult<()>;

    /// Close the browser
    async fn close(&mut self) -> CheckResult<()>;
}
