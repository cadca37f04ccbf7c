//! Cartcheck: browser-driven end-to-end checks for an OpenCart-style storefront
//!
//! Drives the storefront's home, product, cart, checkout and registration
//! pages through a [`StoreDriver`], reads what the pages display, and
//! reconciles it against the cart the scenario expects to have built.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────────┐
//! │                       CARTCHECK Architecture                      │
//! ├──────────────────────────────────────────────────────────────────┤
//! │  ┌────────────┐   ┌────────────┐   ┌────────────┐   ┌──────────┐ │
//! │  │ Scenarios  │──►│ Page views │──►│ StoreSession│──►│ Driver   │ │
//! │  │ + Harness  │   │ (locators) │   │ (waits)    │   │ CDP/mock │ │
//! │  └─────┬──────┘   └────────────┘   └────────────┘   └──────────┘ │
//! │        │                                                          │
//! │        ▼                                                          │
//! │  ┌────────────┐   ┌────────────┐                                  │
//! │  │ Reconcile  │◄──│ Parse      │  prices, quantities, alerts      │
//! │  └────────────┘   └────────────┘                                  │
//! └──────────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Example
//!
//! ```no_run
//! use cartcheck::prelude::*;
//!
//! # async fn demo() -> CheckResult<()> {
//! let config = StoreConfig::default();
//! let mut session = StoreSession::new(MockStorefront::new(&config), config);
//! let suite = TestSuite::from_scenarios("storefront", Scenario::all());
//! let results = TestHarness::new()
//!     .run(&mut session, &mut StorefrontFixture::new(), &suite)
//!     .await;
//! assert!(results.all_passed());
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]

mod assertion;
mod driver;
mod locator;
mod result;
mod wait;

/// Parsing of displayed prices, cart summaries and quantity notices
pub mod parse;

/// The fixed home-page catalog
pub mod catalog;

/// Expected cart arithmetic
pub mod reconcile;

/// Storefront and browser configuration
pub mod config;

/// Session state, waits and interactions
pub mod session;

/// Page views and their locators
pub mod pages;

/// The scenario catalog
pub mod scenario;

/// Per-scenario setup and teardown
pub mod fixture;

/// Suite runner and results
pub mod harness;

/// In-memory storefront driver
pub mod mock;

/// Chromium driver over CDP
#[cfg(feature = "browser")]
pub mod browser;

pub use assertion::{check_contains, check_equal, check_true};
pub use catalog::{Product, ProductId};
pub use config::{BrowserSettings, Customer, StoreConfig};
pub use driver::{ElementHandle, StoreDriver};
pub use fixture::{Fixture, StorefrontFixture};
pub use harness::{Phase, SuiteResults, TestHarness, TestResult, TestSuite};
pub use locator::{Locator, LocatorOptions, Selector, DEFAULT_POLL_INTERVAL_MS, DEFAULT_TIMEOUT_MS};
pub use mock::MockStorefront;
pub use pages::Page;
pub use reconcile::{CartAggregate, ExpectedCart, LineItem};
pub use result::{CheckError, CheckResult};
pub use scenario::{Scenario, ScenarioId};
pub use session::StoreSession;
pub use wait::{Poller, WaitOptions, WaitResult};

#[cfg(feature = "browser")]
pub use browser::ChromiumDriver;

/// Everything a suite author needs
pub mod prelude {
    pub use super::catalog::{Product, ProductId};
    pub use super::config::{BrowserSettings, Customer, StoreConfig};
    pub use super::driver::{ElementHandle, StoreDriver};
    pub use super::fixture::{Fixture, StorefrontFixture};
    pub use super::harness::{Phase, SuiteResults, TestHarness, TestResult, TestSuite};
    pub use super::locator::{Locator, Selector};
    pub use super::mock::MockStorefront;
    pub use super::pages::Page;
    pub use super::parse::{parse_cart_summary, parse_price, CartSummary};
    pub use super::reconcile::ExpectedCart;
    pub use super::result::{CheckError, CheckResult};
    pub use super::scenario::{Scenario, ScenarioId};
    pub use super::session::StoreSession;

    #[cfg(feature = "browser")]
    pub use super::browser::ChromiumDriver;
}
