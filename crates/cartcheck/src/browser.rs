//! Chromium over CDP.
//!
//! Element lookups run as small scripts that return a JSON snapshot of the
//! first match, so CSS and `XPath` selectors go through one code path.
//! Clicks and typing go through real input events.

use crate::config::BrowserSettings;
use crate::driver::{ElementHandle, StoreDriver};
use crate::locator::Selector;
use crate::result::{CheckError, CheckResult};
use async_trait::async_trait;
use chromiumoxide::browser::{Browser, BrowserConfig};
use chromiumoxide::element::Element;
use chromiumoxide::page::Page;
use futures::StreamExt;
use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tracing::{debug, info};

/// A Chromium instance driving a single tab
#[derive(Debug)]
pub struct ChromiumDriver {
    browser: Mutex<Browser>,
    page: Page,
    handler: JoinHandle<()>,
}

impl ChromiumDriver {
    /// Launch Chromium and open a blank tab
    ///
    /// # Errors
    ///
    /// Returns [`CheckError::BrowserLaunch`] if Chromium cannot be found or
    /// started.
    pub async fn launch(settings: &BrowserSettings) -> CheckResult<Self> {
        let launch_error = |message: String| CheckError::BrowserLaunch { message };

        let mut builder = BrowserConfig::builder()
            .window_size(settings.viewport_width, settings.viewport_height);
        if !settings.headless {
            builder = builder.with_head();
        }
        if settings.no_sandbox {
            builder = builder.no_sandbox();
        }
        if let Some(ref path) = settings.chromium_path {
            builder = builder.chrome_executable(path);
        }
        let config = builder.build().map_err(launch_error)?;

        let (browser, mut handler) = Browser::launch(config)
            .await
            .map_err(|e| launch_error(e.to_string()))?;
        let handler = tokio::spawn(async move {
            while let Some(event) = handler.next().await {
                if event.is_err() {
                    break;
                }
            }
        });

        let page = browser
            .new_page("about:blank")
            .await
            .map_err(|e| launch_error(e.to_string()))?;
        info!(headless = settings.headless, "chromium launched");

        Ok(Self {
            browser: Mutex::new(browser),
            page,
            handler,
        })
    }

    async fn eval_json<T: serde::de::DeserializeOwned>(&self, script: String) -> CheckResult<T> {
        let raw: String = self
            .page
            .evaluate(script)
            .await
            .map_err(|e| CheckError::driver(e.to_string()))?
            .into_value()
            .map_err(|e| CheckError::driver(e.to_string()))?;
        Ok(serde_json::from_str(&raw)?)
    }

    async fn element(&self, selector: &Selector) -> CheckResult<Element> {
        let found = match selector {
            Selector::Css(_) => self.page.find_element(selector.as_str()).await,
            Selector::XPath(_) => self.page.find_xpath(selector.as_str()).await,
        };
        found.map_err(|e| CheckError::driver(format!("{selector}: {e}")))
    }
}

/// Script snapshotting the first match as `ElementHandle` JSON, or `null`
fn snapshot_script(selector: &Selector) -> String {
    format!(
        r"(() => {{
            const el = {query};
            if (!el) return 'null';
            const rect = el.getBoundingClientRect();
            const style = window.getComputedStyle(el);
            return JSON.stringify({{
                tag_name: el.tagName.toLowerCase(),
                text: (el.innerText ?? el.textContent ?? '').trim(),
                visible: rect.width > 0 && rect.height > 0
                    && style.visibility !== 'hidden' && style.display !== 'none',
                enabled: !el.disabled,
            }});
        }})()",
        query = selector.to_query()
    )
}

/// Script reading an attribute, falling back to the live property
fn attribute_script(selector: &Selector, name: &str) -> String {
    let name = serde_json::Value::from(name);
    format!(
        r"(() => {{
            const el = {query};
            if (!el) return 'null';
            const value = el[{name}] ?? el.getAttribute({name});
            return JSON.stringify(value === undefined || value === null ? null : String(value));
        }})()",
        query = selector.to_query()
    )
}

/// Script running `body` against the first match; `true` if one existed
fn with_element_script(selector: &Selector, body: &str) -> String {
    format!(
        r"(() => {{
            const el = {query};
            if (!el) return 'false';
            {body}
            el.dispatchEvent(new Event('input', {{ bubbles: true }}));
            el.dispatchEvent(new Event('change', {{ bubbles: true }}));
            return 'true';
        }})()",
        query = selector.to_query()
    )
}

#[async_trait]
impl StoreDriver for ChromiumDriver {
    async fn navigate(&mut self, url: &str) -> CheckResult<()> {
        debug!(url, "navigate");
        self.page
            .goto(url)
            .await
            .map_err(|e| CheckError::Navigation {
                url: url.to_string(),
                message: e.to_string(),
            })?;
        Ok(())
    }

    async fn current_url(&self) -> CheckResult<String> {
        let url = self
            .page
            .url()
            .await
            .map_err(|e| CheckError::driver(e.to_string()))?;
        Ok(url.unwrap_or_default())
    }

    async fn refresh(&mut self) -> CheckResult<()> {
        self.page
            .reload()
            .await
            .map_err(|e| CheckError::driver(e.to_string()))?;
        Ok(())
    }

    async fn query(&self, selector: &Selector) -> CheckResult<Option<ElementHandle>> {
        self.eval_json(snapshot_script(selector)).await
    }

    async fn attribute(&self, selector: &Selector, name: &str) -> CheckResult<Option<String>> {
        self.eval_json(attribute_script(selector, name)).await
    }

    async fn click(&mut self, selector: &Selector) -> CheckResult<()> {
        debug!(%selector, "click");
        self.element(selector)
            .await?
            .click()
            .await
            .map_err(|e| CheckError::driver(format!("click {selector}: {e}")))?;
        Ok(())
    }

    async fn clear(&mut self, selector: &Selector) -> CheckResult<()> {
        let found: bool = self
            .eval_json(with_element_script(selector, "el.value = '';"))
            .await?;
        if found {
            Ok(())
        } else {
            Err(CheckError::driver(format!("no element matches {selector}")))
        }
    }

    async fn send_keys(&mut self, selector: &Selector, text: &str) -> CheckResult<()> {
        let element = self.element(selector).await?;
        element
            .focus()
            .await
            .map_err(|e| CheckError::driver(e.to_string()))?;
        element
            .type_str(text)
            .await
            .map_err(|e| CheckError::driver(format!("type into {selector}: {e}")))?;
        Ok(())
    }

    async fn select_by_value(&mut self, selector: &Selector, value: &str) -> CheckResult<()> {
        let quoted = serde_json::Value::from(value);
        let body = format!(
            "if (![...el.options].some(o => o.value === {quoted})) return 'false';\n\
             el.value = {quoted};"
        );
        let found: bool = self.eval_json(with_element_script(selector, &body)).await?;
        if found {
            Ok(())
        } else {
            Err(CheckError::driver(format!(
                "{selector} has no option with value {value:?}"
            )))
        }
    }

    async fn close(&mut self) -> CheckResult<()> {
        let mut browser = self.browser.lock().await;
        browser
            .close()
            .await
            .map_err(|e| CheckError::driver(e.to_string()))?;
        self.handler.abort();
        info!("chromium closed");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_snapshot_script_embeds_query() {
        let script = snapshot_script(&Selector::xpath("//*[@id=\"cart-total\"]"));
        assert!(script.contains("document.evaluate(\"//*[@id=\\\"cart-total\\\"]\""));
        assert!(script.contains("tag_name"));
    }

    #[test]
    fn test_attribute_script_quotes_name() {
        let script = attribute_script(&Selector::css("#input-quantity"), "value");
        assert!(script.contains("el[\"value\"]"));
    }

    #[test]
    fn test_element_script_dispatches_change() {
        let script = with_element_script(&Selector::css("#input-zone"), "el.value = \"2632\";");
        assert!(script.contains("document.querySelector(\"#input-zone\")"));
        assert!(script.contains("change"));
    }
}
