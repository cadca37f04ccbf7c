//! Run configuration: where the storefront lives, how long to wait, who buys.
//!
//! Loaded from YAML, then overridden by `CARTCHECK_*` environment variables.

use crate::locator::{LocatorOptions, DEFAULT_POLL_INTERVAL_MS, DEFAULT_TIMEOUT_MS};
use crate::result::{CheckError, CheckResult};
use crate::wait::WaitOptions;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Environment variable overriding [`StoreConfig::base_url`]
pub const ENV_BASE_URL: &str = "CARTCHECK_BASE_URL";
/// Environment variable overriding [`BrowserSettings::headless`]
pub const ENV_HEADLESS: &str = "CARTCHECK_HEADLESS";
/// Environment variable overriding [`BrowserSettings::chromium_path`]
pub const ENV_CHROMIUM_PATH: &str = "CARTCHECK_CHROMIUM_PATH";
/// Environment variable overriding [`StoreConfig::element_timeout_ms`]
pub const ENV_TIMEOUT_MS: &str = "CARTCHECK_TIMEOUT_MS";

/// Storefront route of the home page
pub const HOME_ROUTE: &str = "index.php?route=common/home";

/// Configuration for one run against a storefront
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    /// Storefront root, with trailing slash
    pub base_url: String,
    /// Bounded wait for every element
    pub element_timeout_ms: u64,
    /// Interval between probes while waiting
    pub poll_interval_ms: u64,
    /// Browser launch settings
    pub browser: BrowserSettings,
    /// Registration and billing data
    pub customer: Customer,
    /// `<option>` value of the region used for the shipping estimate
    pub shipping_region_id: String,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost/".to_string(),
            element_timeout_ms: DEFAULT_TIMEOUT_MS,
            poll_interval_ms: DEFAULT_POLL_INTERVAL_MS,
            browser: BrowserSettings::default(),
            customer: Customer::default(),
            shipping_region_id: "2632".to_string(),
        }
    }
}

impl StoreConfig {
    /// Parse from YAML
    pub fn from_yaml_str(yaml: &str) -> CheckResult<Self> {
        let config: Self = serde_yaml_ng::from_str(yaml)?;
        config.validate()
    }

    /// Load from a YAML file
    pub fn load(path: impl AsRef<Path>) -> CheckResult<Self> {
        let path = path.as_ref();
        let yaml = std::fs::read_to_string(path)?;
        tracing::debug!(path = %path.display(), "loaded store config");
        Self::from_yaml_str(&yaml)
    }

    /// Serialize to YAML
    pub fn to_yaml(&self) -> CheckResult<String> {
        Ok(serde_yaml_ng::to_string(self)?)
    }

    /// Apply `CARTCHECK_*` overrides from the process environment
    pub fn with_env_overrides(self) -> CheckResult<Self> {
        self.with_overrides_from(|key| std::env::var(key).ok())
    }

    /// Apply overrides from an arbitrary lookup
    pub fn with_overrides_from<F>(mut self, lookup: F) -> CheckResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(url) = lookup(ENV_BASE_URL) {
            self.base_url = url;
        }
        if let Some(raw) = lookup(ENV_HEADLESS) {
            self.browser.headless = parse_bool(ENV_HEADLESS, &raw)?;
        }
        if let Some(path) = lookup(ENV_CHROMIUM_PATH) {
            self.browser.chromium_path = Some(PathBuf::from(path));
        }
        if let Some(raw) = lookup(ENV_TIMEOUT_MS) {
            self.element_timeout_ms = raw
                .trim()
                .parse()
                .map_err(|_| CheckError::config(format!("{ENV_TIMEOUT_MS}={raw:?} is not a number")))?;
        }
        self.validate()
    }

    /// Normalize and check invariants
    pub fn validate(mut self) -> CheckResult<Self> {
        let trimmed = self.base_url.trim();
        if !(trimmed.starts_with("http://") || trimmed.starts_with("https://")) {
            return Err(CheckError::config(format!(
                "base_url must be an http(s) URL, got {:?}",
                self.base_url
            )));
        }
        self.base_url = if trimmed.ends_with('/') {
            trimmed.to_string()
        } else {
            format!("{trimmed}/")
        };
        if self.poll_interval_ms == 0 {
            return Err(CheckError::config("poll_interval_ms must be positive"));
        }
        Ok(self)
    }

    /// Wait options every locator inherits
    #[must_use]
    pub const fn locator_options(&self) -> LocatorOptions {
        LocatorOptions {
            timeout: Duration::from_millis(self.element_timeout_ms),
            poll_interval: Duration::from_millis(self.poll_interval_ms),
        }
    }

    /// Wait options for non-element conditions
    #[must_use]
    pub const fn wait_options(&self) -> WaitOptions {
        WaitOptions {
            timeout_ms: self.element_timeout_ms,
            poll_interval_ms: self.poll_interval_ms,
        }
    }

    /// Absolute URL of a storefront route
    #[must_use]
    pub fn url(&self, route: &str) -> String {
        format!("{}{}", self.base_url, route.trim_start_matches('/'))
    }

    /// URLs the storefront serves its home page under
    #[must_use]
    pub fn home_urls(&self) -> [String; 2] {
        [self.base_url.clone(), self.url(HOME_ROUTE)]
    }
}

fn parse_bool(key: &str, raw: &str) -> CheckResult<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(CheckError::config(format!("{key}={raw:?} is not a boolean"))),
    }
}

/// Browser launch settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BrowserSettings {
    /// Run without a window
    pub headless: bool,
    /// Chromium executable; auto-detected when unset
    pub chromium_path: Option<PathBuf>,
    /// Pass `--no-sandbox` (containers)
    pub no_sandbox: bool,
    /// Window width
    pub viewport_width: u32,
    /// Window height
    pub viewport_height: u32,
}

impl Default for BrowserSettings {
    fn default() -> Self {
        Self {
            headless: true,
            chromium_path: None,
            no_sandbox: false,
            viewport_width: 1280,
            viewport_height: 1024,
        }
    }
}

/// Registration and billing data
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Customer {
    /// First name
    pub first_name: String,
    /// Last name
    pub last_name: String,
    /// Telephone
    pub telephone: String,
    /// Account password
    pub password: String,
    /// Domain of generated e-mail addresses
    pub email_domain: String,
    /// Billing street address
    pub address: String,
    /// Billing city
    pub city: String,
    /// `<option>` value of the billing region
    pub region_id: String,
}

impl Default for Customer {
    fn default() -> Self {
        Self {
            first_name: "Jan".to_string(),
            last_name: "Kowalski".to_string(),
            telephone: "46652033".to_string(),
            password: "1qazZAQ!".to_string(),
            email_domain: "gmail.com".to_string(),
            address: "Sloneczna 1".to_string(),
            city: "Wroclaw".to_string(),
            region_id: "2631".to_string(),
        }
    }
}

impl Customer {
    /// A fresh address so repeated registrations never collide
    #[must_use]
    pub fn unique_email(&self) -> String {
        format!("{}@{}", uuid::Uuid::new_v4().simple(), self.email_domain)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::io::Write;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    mod defaults_tests {
        use super::*;

        #[test]
        fn test_defaults() {
            let config = StoreConfig::default();
            assert_eq!(config.element_timeout_ms, 10_000);
            assert_eq!(config.poll_interval_ms, 100);
            assert!(config.browser.headless);
            assert_eq!(config.customer.region_id, "2631");
            assert_eq!(config.shipping_region_id, "2632");
        }

        #[test]
        fn test_home_urls() {
            let config = StoreConfig::default();
            let [root, route] = config.home_urls();
            assert_eq!(root, "http://localhost/");
            assert_eq!(route, "http://localhost/index.php?route=common/home");
        }

        #[test]
        fn test_unique_email() {
            let customer = Customer::default();
            let a = customer.unique_email();
            let b = customer.unique_email();
            assert_ne!(a, b);
            assert!(a.ends_with("@gmail.com"));
        }
    }

    mod yaml_tests {
        use super::*;

        #[test]
        fn test_partial_yaml_keeps_defaults() {
            let config = StoreConfig::from_yaml_str(
                "base_url: https://shop.example\nbrowser:\n  headless: false\n",
            )
            .unwrap();
            assert_eq!(config.base_url, "https://shop.example/");
            assert!(!config.browser.headless);
            assert_eq!(config.element_timeout_ms, 10_000);
        }

        #[test]
        fn test_round_trip_through_file() {
            let mut file = tempfile::NamedTempFile::new().unwrap();
            let original = StoreConfig {
                element_timeout_ms: 2500,
                ..StoreConfig::default()
            };
            file.write_all(original.to_yaml().unwrap().as_bytes()).unwrap();
            let loaded = StoreConfig::load(file.path()).unwrap();
            assert_eq!(loaded, original);
        }

        #[test]
        fn test_invalid_yaml() {
            assert!(matches!(
                StoreConfig::from_yaml_str("element_timeout_ms: [1"),
                Err(CheckError::Yaml(_))
            ));
        }

        #[test]
        fn test_missing_file() {
            assert!(matches!(
                StoreConfig::load("/nonexistent/cartcheck.yaml"),
                Err(CheckError::Io(_))
            ));
        }
    }

    mod override_tests {
        use super::*;

        #[test]
        fn test_env_overrides() {
            let config = StoreConfig::default()
                .with_overrides_from(env(&[
                    (ENV_BASE_URL, "http://shop.test"),
                    (ENV_HEADLESS, "false"),
                    (ENV_CHROMIUM_PATH, "/usr/bin/chromium"),
                    (ENV_TIMEOUT_MS, "750"),
                ]))
                .unwrap();
            assert_eq!(config.base_url, "http://shop.test/");
            assert!(!config.browser.headless);
            assert_eq!(
                config.browser.chromium_path,
                Some(PathBuf::from("/usr/bin/chromium"))
            );
            assert_eq!(config.locator_options().timeout, Duration::from_millis(750));
        }

        #[test]
        fn test_bad_values_rejected() {
            assert!(StoreConfig::default()
                .with_overrides_from(env(&[(ENV_HEADLESS, "maybe")]))
                .is_err());
            assert!(StoreConfig::default()
                .with_overrides_from(env(&[(ENV_TIMEOUT_MS, "soon")]))
                .is_err());
            assert!(StoreConfig::default()
                .with_overrides_from(env(&[(ENV_BASE_URL, "ftp://shop")]))
                .is_err());
        }

        #[test]
        fn test_zero_poll_interval_rejected() {
            let config = StoreConfig {
                poll_interval_ms: 0,
                ..StoreConfig::default()
            };
            assert!(config.validate().is_err());
        }
    }
}
