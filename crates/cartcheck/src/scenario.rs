//! The storefront scenarios.
//!
//! Each scenario is a straight line: navigate, mutate the cart, read what the
//! storefront displays and compare it with an [`ExpectedCart`]. The first
//! disagreement ends the scenario with an error; there are no retries.
//!
//! Scenarios assume they start on the home page with an empty cart, which
//! [`StorefrontFixture`](crate::fixture::StorefrontFixture) establishes.

use crate::assertion::check_equal;
use crate::catalog::ProductId;
use crate::driver::StoreDriver;
use crate::pages::cart::{minimum_warning, EMPTY_CART_MESSAGE, FIRST_ALERT, UPDATED_MESSAGE};
use crate::pages::checkout::{ORDER_PLACED_MESSAGE, SUCCESS_BREADCRUMB_TEXT};
use crate::parse::RestrictionKind;
use crate::reconcile::{expected_total_with_flat_rate, ExpectedCart};
use crate::result::{CheckError, CheckResult};
use crate::session::StoreSession;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use tracing::{info, instrument};

/// The scenarios the suite knows
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScenarioId {
    /// One catalog-view add per product
    AddFromHomePage,
    /// One details-view add at the default quantity
    AddFromDetailsPage,
    /// One of each product from the catalog view
    QuantityAndValueAddition,
    /// Header value across home, details and cart pages
    CartValueBetweenPages,
    /// Flat-rate quote applied to the cart total
    EstimateShippingAndTaxes,
    /// Registration and a full checkout
    BuyingProcess,
    /// Cart-page quantity increase
    SelectQuantityFromCartPage,
    /// Minimum order quantity flow
    ValidateQuantityRestrictions,
    /// Quantity 0 empties the cart
    RemoveBySettingQuantityToZero,
}

impl ScenarioId {
    /// Every scenario in run order
    pub const ALL: [Self; 9] = [
        Self::AddFromHomePage,
        Self::AddFromDetailsPage,
        Self::QuantityAndValueAddition,
        Self::CartValueBetweenPages,
        Self::EstimateShippingAndTaxes,
        Self::BuyingProcess,
        Self::SelectQuantityFromCartPage,
        Self::ValidateQuantityRestrictions,
        Self::RemoveBySettingQuantityToZero,
    ];

    /// snake_case name
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::AddFromHomePage => "add_from_home_page",
            Self::AddFromDetailsPage => "add_from_details_page",
            Self::QuantityAndValueAddition => "quantity_and_value_addition",
            Self::CartValueBetweenPages => "cart_value_between_pages",
            Self::EstimateShippingAndTaxes => "estimate_shipping_and_taxes",
            Self::BuyingProcess => "buying_process",
            Self::SelectQuantityFromCartPage => "select_quantity_from_cart_page",
            Self::ValidateQuantityRestrictions => "validate_quantity_restrictions",
            Self::RemoveBySettingQuantityToZero => "remove_by_setting_quantity_to_zero",
        }
    }

    /// One-line summary of what is checked
    #[must_use]
    pub const fn description(self) -> &'static str {
        match self {
            Self::AddFromHomePage => "catalog add shows quantity 1 and the listed price",
            Self::AddFromDetailsPage => "details add shows the default quantity times the price",
            Self::QuantityAndValueAddition => "one of each product sums quantities and prices",
            Self::CartValueBetweenPages => "cart value is stable across home, details and cart",
            Self::EstimateShippingAndTaxes => "applied flat rate is added to the total",
            Self::BuyingProcess => "checkout places an order",
            Self::SelectQuantityFromCartPage => "cart-page quantity update reprices the cart",
            Self::ValidateQuantityRestrictions => "minimum order quantity is enforced",
            Self::RemoveBySettingQuantityToZero => "quantity 0 empties the cart",
        }
    }

    /// Whether the scenario runs once per product
    #[must_use]
    pub const fn per_product(self) -> bool {
        !matches!(self, Self::QuantityAndValueAddition)
    }
}

impl fmt::Display for ScenarioId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ScenarioId {
    type Err = CheckError;

    fn from_str(s: &str) -> CheckResult<Self> {
        Self::ALL
            .into_iter()
            .find(|id| id.name() == s)
            .ok_or_else(|| CheckError::config(format!("unknown scenario {s:?}")))
    }
}

/// A scenario bound to the product it exercises
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Scenario {
    /// Which scenario
    pub id: ScenarioId,
    /// Product under test; `None` for catalog-wide scenarios
    pub product: Option<ProductId>,
}

impl Scenario {
    /// Bind a per-product scenario
    #[must_use]
    pub const fn for_product(id: ScenarioId, product: ProductId) -> Self {
        Self {
            id,
            product: Some(product),
        }
    }

    /// A catalog-wide scenario
    #[must_use]
    pub const fn catalog(id: ScenarioId) -> Self {
        Self { id, product: None }
    }

    /// Run list for `ids`, per-product ones expanded over `products`
    #[must_use]
    pub fn expand(ids: &[ScenarioId], products: &[ProductId]) -> Vec<Self> {
        ids.iter()
            .flat_map(|&id| {
                if id.per_product() {
                    products
                        .iter()
                        .map(|&product| Self::for_product(id, product))
                        .collect::<Vec<_>>()
                } else {
                    vec![Self::catalog(id)]
                }
            })
            .collect()
    }

    /// Every scenario over the full catalog
    #[must_use]
    pub fn all() -> Vec<Self> {
        Self::expand(&ScenarioId::ALL, &ProductId::ALL)
    }

    /// Display name, e.g. `estimate_shipping_and_taxes[product=2]`
    #[must_use]
    pub fn name(&self) -> String {
        self.to_string()
    }

    fn product(&self) -> CheckResult<ProductId> {
        self.product
            .ok_or_else(|| CheckError::config(format!("{} needs a product", self.id)))
    }
}

impl fmt::Display for Scenario {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.product {
            Some(product) => write!(f, "{}[product={product}]", self.id),
            None => write!(f, "{}", self.id),
        }
    }
}

/// Run one scenario to completion or first failure
#[instrument(skip(session), fields(scenario = %scenario))]
pub async fn run<D: StoreDriver>(
    session: &mut StoreSession<D>,
    scenario: &Scenario,
) -> CheckResult<()> {
    info!("scenario started");
    match scenario.id {
        ScenarioId::AddFromHomePage => add_from_home_page(session, scenario.product()?).await,
        ScenarioId::AddFromDetailsPage => add_from_details_page(session, scenario.product()?).await,
        ScenarioId::QuantityAndValueAddition => quantity_and_value_addition(session).await,
        ScenarioId::CartValueBetweenPages => {
            cart_value_between_pages(session, scenario.product()?).await
        }
        ScenarioId::EstimateShippingAndTaxes => {
            estimate_shipping_and_taxes(session, scenario.product()?).await
        }
        ScenarioId::BuyingProcess => buying_process(session, scenario.product()?).await,
        ScenarioId::SelectQuantityFromCartPage => {
            select_quantity_from_cart_page(session, scenario.product()?).await
        }
        ScenarioId::ValidateQuantityRestrictions => {
            validate_quantity_restrictions(session, scenario.product()?).await
        }
        ScenarioId::RemoveBySettingQuantityToZero => {
            remove_by_setting_quantity_to_zero(session, scenario.product()?).await
        }
    }
}

/// Compare the header cart button with the ledger
async fn check_header<D: StoreDriver>(
    session: &mut StoreSession<D>,
    expected: &ExpectedCart,
) -> CheckResult<()> {
    let summary = session.header().cart_summary().await?;
    let aggregate = expected.aggregate();
    check_equal("cart quantity", &aggregate.quantity, &summary.quantity)?;
    check_equal("cart value", &aggregate.total(), &summary.value)
}

async fn add_from_home_page<D: StoreDriver>(
    session: &mut StoreSession<D>,
    id: ProductId,
) -> CheckResult<()> {
    let product = session.home().product(id).await?;
    session.home().add_to_cart(id).await?;

    let mut expected = ExpectedCart::new();
    expected.add(&product, 1);
    check_header(session, &expected).await
}

async fn add_from_details_page<D: StoreDriver>(
    session: &mut StoreSession<D>,
    id: ProductId,
) -> CheckResult<()> {
    let product = session.home().product(id).await?;
    session.home().open_details(id).await?;
    let default_quantity = session.details().default_quantity().await?;
    session.details().add_to_cart().await?;

    let mut expected = ExpectedCart::new();
    expected.add(&product, default_quantity);
    check_header(session, &expected).await
}

async fn quantity_and_value_addition<D: StoreDriver>(
    session: &mut StoreSession<D>,
) -> CheckResult<()> {
    let mut expected = ExpectedCart::new();
    for id in ProductId::ALL {
        let product = session.home().product(id).await?;
        session.home().add_to_cart(id).await?;
        expected.add(&product, 1);
    }
    check_equal(
        "catalog size",
        &(ProductId::COUNT as u32),
        &expected.aggregate().quantity,
    )?;
    check_header(session, &expected).await
}

async fn cart_value_between_pages<D: StoreDriver>(
    session: &mut StoreSession<D>,
    id: ProductId,
) -> CheckResult<()> {
    let product = session.home().product(id).await?;
    session.home().add_to_cart(id).await?;
    let mut expected = ExpectedCart::new();
    expected.add(&product, 1);
    check_header(session, &expected).await?;

    session.home().open_details(id).await?;
    check_header(session, &expected).await?;

    session.header().go_to_cart_page().await?;
    check_header(session, &expected).await?;
    let subtotal = session.cart().subtotal().await?;
    check_equal("cart page subtotal", &expected.aggregate().subtotal, &subtotal)
}

async fn estimate_shipping_and_taxes<D: StoreDriver>(
    session: &mut StoreSession<D>,
    id: ProductId,
) -> CheckResult<()> {
    let product = session.home().product(id).await?;
    session.home().open_details(id).await?;
    let default_quantity = session.details().default_quantity().await?;
    session.details().add_to_cart().await?;
    let mut expected = ExpectedCart::new();
    expected.add(&product, default_quantity);

    session.header().go_to_cart_page().await?;
    let region = session.config().shipping_region_id.clone();
    let quote = session.cart().estimate_flat_rate(&region).await?;
    session.cart().apply_shipping().await?;

    let applied = session.cart().flat_rate().await?;
    check_equal("applied flat rate", &quote.rate, &applied)?;

    let subtotal = session.cart().subtotal().await?;
    check_equal("subtotal", &expected.aggregate().subtotal, &subtotal)?;

    let total = session.cart().total().await?;
    check_equal(
        "total",
        &expected_total_with_flat_rate(subtotal, applied),
        &total,
    )?;

    expected.apply_flat_rate(quote.rate);
    check_header(session, &expected).await
}

async fn buying_process<D: StoreDriver>(
    session: &mut StoreSession<D>,
    id: ProductId,
) -> CheckResult<()> {
    let customer = session.config().customer.clone();
    if session.header().is_logged_in().await? {
        info!("already logged in, skipping registration");
    } else {
        session.register().register(&customer).await?;
    }
    if !session.is_home().await? {
        session.navigate_home().await?;
    }

    session.home().open_details(id).await?;
    session.details().add_to_cart().await?;
    session.header().go_to_cart_page().await?;
    session.cart().checkout().await?;

    let confirmation = session.checkout().place_order(&customer).await?;
    check_equal(
        "success breadcrumb",
        SUCCESS_BREADCRUMB_TEXT,
        confirmation.breadcrumb.as_str(),
    )?;
    check_equal(
        "order heading",
        ORDER_PLACED_MESSAGE,
        confirmation.heading.as_str(),
    )?;
    session.checkout().finish().await
}

async fn select_quantity_from_cart_page<D: StoreDriver>(
    session: &mut StoreSession<D>,
    id: ProductId,
) -> CheckResult<()> {
    let product = session.home().product(id).await?;
    session.home().open_details(id).await?;
    let default_quantity = session.details().default_quantity().await?;
    session.details().add_to_cart().await?;
    session.header().go_to_cart_page().await?;

    let quantity = default_quantity + 1;
    session.cart().update_quantity(quantity).await?;
    session.wait_for(&FIRST_ALERT).await?;

    let mut expected = ExpectedCart::new();
    expected.set_quantity(&product, quantity);
    check_header(session, &expected).await
}

async fn validate_quantity_restrictions<D: StoreDriver>(
    session: &mut StoreSession<D>,
    id: ProductId,
) -> CheckResult<()> {
    let product = session.home().product(id).await?;
    session.home().open_details(id).await?;

    let Some(restriction) = session.details().restriction().await? else {
        info!(product = %product.name, "no quantity restriction");
        return Ok(());
    };
    if restriction.kind != RestrictionKind::Minimum {
        info!(product = %product.name, kind = %restriction.kind, "not a minimum, skipping");
        return Ok(());
    }
    let minimum = restriction.quantity;
    if minimum < 2 {
        info!(product = %product.name, minimum, "minimum cannot be undercut");
        return Ok(());
    }

    session.details().set_quantity(minimum).await?;
    session.details().add_to_cart().await?;
    session.header().go_to_cart_page().await?;

    session.cart().update().await?;
    let message = session.cart().first_alert().await?;
    check_equal("update message", UPDATED_MESSAGE, message.as_str())?;
    session.cart().close_alert().await?;

    session.cart().update_quantity(minimum - 1).await?;
    let first = session.cart().first_alert().await?;
    check_equal("update message", UPDATED_MESSAGE, first.as_str())?;
    let second = session.cart().second_alert().await?;
    check_equal(
        "minimum quantity warning",
        minimum_warning(&product.name, minimum).as_str(),
        second.as_str(),
    )
}

async fn remove_by_setting_quantity_to_zero<D: StoreDriver>(
    session: &mut StoreSession<D>,
    id: ProductId,
) -> CheckResult<()> {
    session.home().add_to_cart(id).await?;
    session.header().go_to_cart_page().await?;
    session.cart().update_quantity(0).await?;

    let message = session.cart().empty_message().await?;
    check_equal("empty cart message", EMPTY_CART_MESSAGE, message.as_str())?;
    let summary = session.header().cart_summary().await?;
    check_equal("cart quantity", &0, &summary.quantity)
}
