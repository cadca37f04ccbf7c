//! Page objects for the storefront.
//!
//! Each module declares the page's fixed locators as constants and a view
//! that borrows the session mutably for as long as it is used. Views only
//! perform the interactions the scenarios need.

pub mod account;
pub mod cart;
pub mod checkout;
pub mod details;
pub mod header;
pub mod home;

pub use account::RegisterPage;
pub use cart::{CartPage, ShippingQuote};
pub use checkout::{CheckoutPage, OrderConfirmation};
pub use details::DetailsPage;
pub use header::Header;
pub use home::HomePage;

use crate::config::StoreConfig;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Storefront pages the suite visits, identified by route
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Page {
    /// Catalog landing page
    Home,
    /// Product details
    Product,
    /// Shopping cart
    Cart,
    /// One-page checkout
    Checkout,
    /// Order placed
    OrderSuccess,
    /// Account registration form
    Register,
    /// Account created
    AccountSuccess,
    /// Account overview
    Account,
}

impl Page {
    /// Every recognised page
    pub const ALL: [Self; 8] = [
        Self::Home,
        Self::Product,
        Self::Cart,
        Self::Checkout,
        Self::OrderSuccess,
        Self::Register,
        Self::AccountSuccess,
        Self::Account,
    ];

    /// `index.php?route=...` value
    #[must_use]
    pub const fn route_name(self) -> &'static str {
        match self {
            Self::Home => "common/home",
            Self::Product => "product/product",
            Self::Cart => "checkout/cart",
            Self::Checkout => "checkout/checkout",
            Self::OrderSuccess => "checkout/success",
            Self::Register => "account/register",
            Self::AccountSuccess => "account/success",
            Self::Account => "account/account",
        }
    }

    /// Path relative to the storefront root
    #[must_use]
    pub fn route(self) -> String {
        format!("index.php?route={}", self.route_name())
    }

    /// Name for logs and error messages
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Home => "home",
            Self::Product => "product details",
            Self::Cart => "shopping cart",
            Self::Checkout => "checkout",
            Self::OrderSuccess => "order success",
            Self::Register => "register",
            Self::AccountSuccess => "account success",
            Self::Account => "account",
        }
    }

    /// Recognise a URL served by the configured storefront
    #[must_use]
    pub fn from_url(url: &str, config: &StoreConfig) -> Option<Self> {
        let rest = url.strip_prefix(config.base_url.as_str())?;
        if rest.is_empty() || rest == "index.php" {
            return Some(Self::Home);
        }
        let query = rest.strip_prefix("index.php?")?;
        let route = query
            .split('&')
            .find_map(|pair| pair.strip_prefix("route="))?;
        Self::ALL.into_iter().find(|page| page.route_name() == route)
    }
}

impl fmt::Display for Page {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
