//! The storefront's fixed home-page catalog.

use crate::parse::QuantityRestriction;
use crate::result::{CheckError, CheckResult};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Position of a product on the home page, 1 through 4
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct ProductId(u8);

impl ProductId {
    /// Number of products in the catalog
    pub const COUNT: usize = 4;

    /// The whole catalog in display order
    pub const ALL: [Self; Self::COUNT] = [Self(1), Self(2), Self(3), Self(4)];

    /// Create an id, rejecting positions outside the catalog
    #[must_use]
    pub const fn new(position: u8) -> Option<Self> {
        if position >= 1 && position as usize <= Self::COUNT {
            Some(Self(position))
        } else {
            None
        }
    }

    /// 1-based position on the home page
    #[must_use]
    pub const fn position(self) -> u8 {
        self.0
    }

    /// 0-based index
    #[must_use]
    pub const fn index(self) -> usize {
        self.0 as usize - 1
    }
}

impl TryFrom<u8> for ProductId {
    type Error = CheckError;

    fn try_from(position: u8) -> CheckResult<Self> {
        Self::new(position).ok_or_else(|| {
            CheckError::config(format!(
                "product {position} is outside the catalog (1-{})",
                Self::COUNT
            ))
        })
    }
}

impl From<ProductId> for u8 {
    fn from(id: ProductId) -> Self {
        id.0
    }
}

impl FromStr for ProductId {
    type Err = CheckError;

    fn from_str(s: &str) -> CheckResult<Self> {
        let position = s
            .trim()
            .parse::<u8>()
            .map_err(|_| CheckError::config(format!("invalid product id {s:?}")))?;
        Self::try_from(position)
    }
}

impl fmt::Display for ProductId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A product as observed on the storefront during a run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    /// Catalog position
    pub id: ProductId,
    /// Display name
    pub name: String,
    /// Listed unit price
    pub unit_price: Decimal,
    /// Quantity pre-filled on the details page
    pub default_quantity: u32,
    /// Restriction announced on the details page, if any
    pub restriction: Option<QuantityRestriction>,
}

impl Product {
    /// A product with default quantity 1 and no restriction
    #[must_use]
    pub fn new(id: ProductId, name: impl Into<String>, unit_price: Decimal) -> Self {
        Self {
            id,
            name: name.into(),
            unit_price,
            default_quantity: 1,
            restriction: None,
        }
    }

    /// Set the default order quantity
    #[must_use]
    pub const fn with_default_quantity(mut self, quantity: u32) -> Self {
        self.default_quantity = quantity;
        self
    }

    /// Set the announced restriction
    #[must_use]
    pub const fn with_restriction(mut self, restriction: QuantityRestriction) -> Self {
        self.restriction = Some(restriction);
        self
    }
}
