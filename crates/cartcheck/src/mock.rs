//! MockStorefront - an in-memory storefront behind the [`StoreDriver`] seam.
//!
//! Answers exactly the locators the page objects use, with the text,
//! visibility and page transitions the real markup produces: the cart
//! dropdown, cart-page alerts shifting the totals table, the shipping quote
//! dialog, the collapsed checkout steps and the account menu. Anything else
//! matches nothing.
//!
//! Fault knobs (`set_cart_value_skew`, `set_minimum_warning`,
//! `ignore_zero_updates`, `remove_element`, `set_product`)
//! let tests drive scenarios into their failure paths.

use crate::catalog::ProductId;
use crate::config::StoreConfig;
use crate::driver::{ElementHandle, StoreDriver};
use crate::locator::{Locator, Selector};
use crate::pages::{account, cart, checkout, details, header, home, Page};
use crate::parse::format_amount;
use crate::result::{CheckError, CheckResult};
use async_trait::async_trait;
use rust_decimal::Decimal;
use std::collections::{HashMap, HashSet};

/// A catalog entry as the mock storefront sells it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MockProduct {
    /// Display name
    pub name: String,
    /// Unit price
    pub price: Decimal,
    /// Minimum order quantity; 1 means unrestricted
    pub minimum: u32,
    /// Maximum order quantity, announced but not enforced
    pub maximum: Option<u32>,
}

impl MockProduct {
    /// An unrestricted product
    #[must_use]
    pub fn new(name: impl Into<String>, price: Decimal) -> Self {
        Self {
            name: name.into(),
            price,
            minimum: 1,
            maximum: None,
        }
    }

    /// Set a minimum order quantity
    #[must_use]
    pub const fn with_minimum(mut self, minimum: u32) -> Self {
        self.minimum = minimum;
        self
    }

    /// Announce a maximum order quantity
    #[must_use]
    pub const fn with_maximum(mut self, maximum: u32) -> Self {
        self.maximum = Some(maximum);
        self
    }

    fn restriction_notice(&self) -> Option<String> {
        if self.minimum > 1 {
            Some(format!("This product has a minimum quantity of {}", self.minimum))
        } else {
            self.maximum
                .map(|max| format!("This product has a maximum quantity of {max}"))
        }
    }
}

/// The four products of the demo catalog
#[must_use]
pub fn default_catalog() -> [MockProduct; ProductId::COUNT] {
    [
        MockProduct::new("Test product 1", Decimal::new(4599, 2)).with_minimum(2),
        MockProduct::new("Test product 2", Decimal::new(2000, 2)),
        MockProduct::new("Test product 3", Decimal::new(123_450, 2)),
        MockProduct::new("Test product 4", Decimal::new(1_234_567, 2)),
    ]
}

/// Intro paragraph above the estimate panels of a non-empty cart
pub const NEXT_CHOICE: &str = "Choose if you have a discount code or reward points you want to use or would like to estimate your delivery cost.";

/// Flat shipping rate the mock quotes
pub const FLAT_RATE: Decimal = Decimal::from_parts(500, 0, 0, false, 2);

const SHIPPING_UPDATED_MESSAGE: &str = "Success: You have changed shipping method!";

/// Every element the mock can render
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
enum Target {
    CartTotal,
    ShoppingCartLink,
    MyAccount,
    RegisterLink,
    Logout,
    HomeBreadcrumb,
    ViewCart,
    RemoveLine,
    CartMessage,

    AddToCart(ProductId),
    PriceLabel(ProductId),
    DetailsLink(ProductId),

    DetailsQuantity,
    DetailsAdd,
    DetailsAlert,

    Subtotal,
    SubtotalBelowAlert,
    FlatRateRow,
    TotalRow,
    CheckoutButton,
    LineQuantity,
    Update,
    EmptyMessage,
    FirstAlert,
    SecondAlert,
    CloseAlert,
    EstimateShipping,
    QuoteRegion,
    GetQuotes,
    FlatRateOption,
    ShippingLabel,
    ApplyShipping,

    PaymentFirstName,
    PaymentLastName,
    PaymentAddress,
    PaymentCity,
    PaymentRegion,
    ContinuePaymentAddress,
    ContinueShippingAddress,
    ContinueShippingMethod,
    AgreeTerms,
    ContinuePaymentMethod,
    ConfirmOrder,
    SuccessBreadcrumb,
    Heading,
    Continue,

    RegFirstName,
    RegLastName,
    RegEmail,
    RegTelephone,
    RegPassword,
    RegConfirm,
    AgreePrivacy,
    SubmitRegistration,
}

impl Target {
    const fn is_input(self) -> bool {
        matches!(
            self,
            Self::DetailsQuantity
                | Self::LineQuantity
                | Self::PaymentFirstName
                | Self::PaymentLastName
                | Self::PaymentAddress
                | Self::PaymentCity
                | Self::RegFirstName
                | Self::RegLastName
                | Self::RegEmail
                | Self::RegTelephone
                | Self::RegPassword
                | Self::RegConfirm
        )
    }

    const fn is_select(self) -> bool {
        matches!(self, Self::QuoteRegion | Self::PaymentRegion)
    }
}

fn locator_table() -> Vec<(Selector, Target)> {
    let fixed: [(&Locator, Target); 51] = [
        (&header::CART_TOTAL, Target::CartTotal),
        (&header::SHOPPING_CART, Target::ShoppingCartLink),
        (&header::MY_ACCOUNT, Target::MyAccount),
        (&header::REGISTER, Target::RegisterLink),
        (&header::LOGOUT, Target::Logout),
        (&header::HOME, Target::HomeBreadcrumb),
        (&header::VIEW_CART, Target::ViewCart),
        (&header::REMOVE, Target::RemoveLine),
        (&header::CART_MESSAGE, Target::CartMessage),
        (&details::QUANTITY, Target::DetailsQuantity),
        (&details::ADD_TO_CART, Target::DetailsAdd),
        (&details::ALERT, Target::DetailsAlert),
        (&cart::SUBTOTAL, Target::Subtotal),
        (&cart::SUBTOTAL_BELOW_ALERT, Target::SubtotalBelowAlert),
        (&cart::FLAT_RATE, Target::FlatRateRow),
        (&cart::TOTAL, Target::TotalRow),
        (&cart::CHECKOUT, Target::CheckoutButton),
        (&cart::QUANTITY, Target::LineQuantity),
        (&cart::UPDATE, Target::Update),
        (&cart::EMPTY_MESSAGE, Target::EmptyMessage),
        (&cart::FIRST_ALERT, Target::FirstAlert),
        (&cart::SECOND_ALERT, Target::SecondAlert),
        (&cart::CLOSE_ALERT, Target::CloseAlert),
        (&cart::ESTIMATE_SHIPPING, Target::EstimateShipping),
        (&cart::REGION, Target::QuoteRegion),
        (&cart::GET_QUOTES, Target::GetQuotes),
        (&cart::FLAT_RATE_OPTION, Target::FlatRateOption),
        (&cart::SHIPPING_METHOD_LABEL, Target::ShippingLabel),
        (&cart::APPLY_SHIPPING, Target::ApplyShipping),
        (&checkout::FIRST_NAME, Target::PaymentFirstName),
        (&checkout::LAST_NAME, Target::PaymentLastName),
        (&checkout::ADDRESS, Target::PaymentAddress),
        (&checkout::CITY, Target::PaymentCity),
        (&checkout::REGION, Target::PaymentRegion),
        (&checkout::CONTINUE_PAYMENT_ADDRESS, Target::ContinuePaymentAddress),
        (&checkout::CONTINUE_SHIPPING_ADDRESS, Target::ContinueShippingAddress),
        (&checkout::CONTINUE_SHIPPING_METHOD, Target::ContinueShippingMethod),
        (&checkout::AGREE_TERMS, Target::AgreeTerms),
        (&checkout::CONTINUE_PAYMENT_METHOD, Target::ContinuePaymentMethod),
        (&checkout::CONFIRM_ORDER, Target::ConfirmOrder),
        (&checkout::SUCCESS_BREADCRUMB, Target::SuccessBreadcrumb),
        (&checkout::HEADING, Target::Heading),
        (&checkout::CONTINUE, Target::Continue),
        (&account::FIRST_NAME, Target::RegFirstName),
        (&account::LAST_NAME, Target::RegLastName),
        (&account::EMAIL, Target::RegEmail),
        (&account::TELEPHONE, Target::RegTelephone),
        (&account::PASSWORD, Target::RegPassword),
        (&account::PASSWORD_CONFIRM, Target::RegConfirm),
        (&account::AGREE_PRIVACY, Target::AgreePrivacy),
        (&account::SUBMIT, Target::SubmitRegistration),
    ];

    let mut table: Vec<(Selector, Target)> = fixed
        .into_iter()
        .map(|(locator, target)| (locator.selector().clone(), target))
        .collect();
    for id in ProductId::ALL {
        table.push((home::add_to_cart_button(id).selector().clone(), Target::AddToCart(id)));
        table.push((home::price_label(id).selector().clone(), Target::PriceLabel(id)));
        table.push((home::details_link(id).selector().clone(), Target::DetailsLink(id)));
    }
    table
}

/// Checkout panels in the order the storefront expands them
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
enum CheckoutStep {
    PaymentAddress,
    ShippingAddress,
    ShippingMethod,
    PaymentMethod,
    Confirm,
}

/// In-memory storefront
#[derive(Debug)]
pub struct MockStorefront {
    config: StoreConfig,
    table: Vec<(Selector, Target)>,
    catalog: [MockProduct; ProductId::COUNT],

    url: String,
    page: Page,
    product: ProductId,
    values: HashMap<Target, String>,

    cart: Vec<(ProductId, u32)>,
    dropdown_open: bool,
    account_menu_open: bool,

    alerts: Vec<String>,
    flash: Vec<String>,
    estimate_open: bool,
    quoted: bool,
    flat_rate_chosen: bool,
    shipping: Option<Decimal>,

    logged_in: bool,
    stored_address: bool,
    privacy_agreed: bool,
    terms_agreed: bool,
    step: CheckoutStep,
    registered: Vec<String>,
    orders: usize,

    removed: HashSet<Selector>,
    cart_value_skew: Decimal,
    minimum_warning: Option<String>,
    zero_updates_ignored: bool,
    history: Vec<String>,
    closed: bool,
}

impl MockStorefront {
    /// A storefront serving `config.base_url`, showing the home page
    #[must_use]
    pub fn new(config: &StoreConfig) -> Self {
        Self {
            config: config.clone(),
            table: locator_table(),
            catalog: default_catalog(),
            url: config.base_url.clone(),
            page: Page::Home,
            product: ProductId::ALL[0],
            values: HashMap::new(),
            cart: Vec::new(),
            dropdown_open: false,
            account_menu_open: false,
            alerts: Vec::new(),
            flash: Vec::new(),
            estimate_open: false,
            quoted: false,
            flat_rate_chosen: false,
            shipping: None,
            logged_in: false,
            stored_address: false,
            privacy_agreed: false,
            terms_agreed: false,
            step: CheckoutStep::PaymentAddress,
            registered: Vec::new(),
            orders: 0,
            removed: HashSet::new(),
            cart_value_skew: Decimal::ZERO,
            minimum_warning: None,
            zero_updates_ignored: false,
            history: Vec::new(),
            closed: false,
        }
    }

    // ========================================================================
    // Test setup and fault knobs
    // ========================================================================

    /// Put `quantity` of a product in the cart without any page interaction
    pub fn preload(&mut self, product: ProductId, quantity: u32) {
        self.add_line(product, quantity);
    }

    /// Show a page as if it had just been loaded
    pub fn open(&mut self, page: Page) {
        self.load(page);
    }

    /// Show the details page of a product
    pub fn open_product(&mut self, product: ProductId) {
        self.product = product;
        self.load(Page::Product);
    }

    /// Start with a logged-in customer
    pub fn log_in(&mut self) {
        self.logged_in = true;
    }

    /// Replace a catalog entry
    pub fn set_product(&mut self, id: ProductId, product: MockProduct) {
        self.catalog[id.index()] = product;
    }

    /// Add `skew` to the header's cart value whenever the cart is not empty
    pub fn set_cart_value_skew(&mut self, skew: Decimal) {
        self.cart_value_skew = skew;
    }

    /// Show `text` instead of the storefront's below-minimum warning
    pub fn set_minimum_warning(&mut self, text: impl Into<String>) {
        self.minimum_warning = Some(text.into());
    }

    /// Keep a line at its old quantity when it is updated to zero
    pub fn ignore_zero_updates(&mut self) {
        self.zero_updates_ignored = true;
    }

    /// Make a locator match nothing from now on
    pub fn remove_element(&mut self, locator: &Locator) {
        self.removed.insert(locator.selector().clone());
    }

    // ========================================================================
    // Inspection
    // ========================================================================

    /// Mutating calls received, in order
    #[must_use]
    pub fn history(&self) -> &[String] {
        &self.history
    }

    /// Cart contents
    #[must_use]
    pub fn cart_lines(&self) -> &[(ProductId, u32)] {
        &self.cart
    }

    /// E-mail addresses registered so far
    #[must_use]
    pub fn registered_emails(&self) -> &[String] {
        &self.registered
    }

    /// Orders confirmed so far
    #[must_use]
    pub const fn orders_placed(&self) -> usize {
        self.orders
    }

    /// Whether `close` was called
    #[must_use]
    pub const fn is_closed(&self) -> bool {
        self.closed
    }

    // ========================================================================
    // Storefront model
    // ========================================================================

    fn product_info(&self, id: ProductId) -> &MockProduct {
        &self.catalog[id.index()]
    }

    fn add_line(&mut self, product: ProductId, quantity: u32) {
        if quantity == 0 {
            return;
        }
        match self.cart.iter_mut().find(|(id, _)| *id == product) {
            Some((_, q)) => *q += quantity,
            None => self.cart.push((product, quantity)),
        }
    }

    fn subtotal(&self) -> Decimal {
        self.cart
            .iter()
            .map(|(id, q)| self.product_info(*id).price * Decimal::from(*q))
            .sum()
    }

    fn total(&self) -> Decimal {
        self.subtotal() + self.shipping.unwrap_or_default()
    }

    fn item_count(&self) -> u32 {
        self.cart.iter().map(|(_, q)| q).sum()
    }

    fn cart_button_text(&self) -> String {
        let skew = if self.cart.is_empty() {
            Decimal::ZERO
        } else {
            self.cart_value_skew
        };
        format!(
            "{} item(s) - ${}",
            self.item_count(),
            format_amount(self.total() + skew)
        )
    }

    fn minimum_warnings(&self) -> Vec<String> {
        self.cart
            .iter()
            .filter_map(|(id, q)| {
                let product = self.product_info(*id);
                (*q < product.minimum).then(|| match self.minimum_warning {
                    Some(ref text) => text.clone(),
                    None => format!(
                        "Minimum order amount for {} is {}!",
                        product.name, product.minimum
                    ),
                })
            })
            .collect()
    }

    fn url_for(&self, page: Page) -> String {
        match page {
            Page::Product => format!(
                "{}&product_id={}",
                self.config.url(&page.route()),
                39 + u32::from(self.product.position())
            ),
            _ => self.config.url(&page.route()),
        }
    }

    /// Render `page` from scratch
    fn load(&mut self, page: Page) {
        self.url = self.url_for(page);
        self.render(page);
    }

    fn render(&mut self, page: Page) {
        self.page = page;
        self.dropdown_open = false;
        self.account_menu_open = false;
        self.values.clear();
        self.privacy_agreed = false;
        match page {
            Page::Product => {
                let minimum = self.product_info(self.product).minimum;
                self.values
                    .insert(Target::DetailsQuantity, minimum.max(1).to_string());
            }
            Page::Cart => {
                if self.cart.is_empty() {
                    self.shipping = None;
                }
                self.alerts = std::mem::take(&mut self.flash);
                self.alerts.extend(self.minimum_warnings());
                self.estimate_open = false;
                self.quoted = false;
                self.flat_rate_chosen = false;
                if let Some((_, q)) = self.cart.first() {
                    self.values.insert(Target::LineQuantity, q.to_string());
                }
            }
            Page::Checkout => {
                self.step = CheckoutStep::PaymentAddress;
                self.terms_agreed = false;
            }
            _ => {}
        }
    }

    fn value(&self, target: Target) -> &str {
        self.values.get(&target).map_or("", String::as_str)
    }

    fn resolve(&self, selector: &Selector) -> Option<Target> {
        if self.removed.contains(selector) {
            return None;
        }
        self.table
            .iter()
            .find(|(s, _)| s == selector)
            .map(|(_, target)| *target)
    }

    fn element(&self, target: Target) -> Option<ElementHandle> {
        use Target as T;
        let page = self.page;
        let on_cart = page == Page::Cart;
        let has_items = !self.cart.is_empty();
        let shifted = !self.alerts.is_empty();
        let on_checkout = page == Page::Checkout && self.logged_in;

        let (tag, text, visible) = match target {
            T::CartTotal => ("span", self.cart_button_text(), true),
            T::ShoppingCartLink => ("span", "Shopping Cart".to_string(), true),
            T::MyAccount => ("span", "My Account".to_string(), true),
            T::RegisterLink if !self.logged_in => {
                ("a", "Register".to_string(), self.account_menu_open)
            }
            T::Logout if self.logged_in => ("a", "Logout".to_string(), self.account_menu_open),
            T::HomeBreadcrumb if page != Page::Home => ("i", String::new(), true),
            T::ViewCart | T::RemoveLine if has_items => {
                let text = if target == T::ViewCart { "View Cart" } else { "" };
                (
                    if target == T::ViewCart { "strong" } else { "button" },
                    text.to_string(),
                    self.dropdown_open,
                )
            }
            T::CartMessage if !has_items => (
                "p",
                header::EMPTY_CART_MESSAGE.to_string(),
                self.dropdown_open,
            ),

            T::AddToCart(_) if page == Page::Home => ("button", "Add to Cart".to_string(), true),
            T::PriceLabel(id) if page == Page::Home => (
                "span",
                format!("${}", format_amount(self.product_info(id).price)),
                true,
            ),
            T::DetailsLink(id) if page == Page::Home => {
                ("a", self.product_info(id).name.clone(), true)
            }

            T::DetailsQuantity if page == Page::Product => ("input", String::new(), true),
            T::DetailsAdd if page == Page::Product => ("button", "Add to Cart".to_string(), true),
            T::DetailsAlert if page == Page::Product => {
                let notice = self.product_info(self.product).restriction_notice()?;
                ("div", notice, true)
            }

            T::Subtotal if on_cart && has_items && !shifted => {
                ("td", format!("${}", format_amount(self.subtotal())), true)
            }
            T::SubtotalBelowAlert if on_cart && has_items && shifted => {
                ("td", format!("${}", format_amount(self.subtotal())), true)
            }
            T::FlatRateRow if on_cart && shifted => {
                let rate = self.shipping?;
                ("td", format!("${}", format_amount(rate)), true)
            }
            T::TotalRow if on_cart && shifted && self.shipping.is_some() => {
                ("td", format!("${}", format_amount(self.total())), true)
            }
            T::CheckoutButton | T::Update | T::LineQuantity | T::EstimateShipping
                if on_cart && has_items =>
            {
                let tag = match target {
                    T::LineQuantity => "input",
                    T::EstimateShipping => "a",
                    _ => "button",
                };
                (tag, String::new(), true)
            }
            // The same path holds the estimate intro while the table is shown
            T::EmptyMessage if on_cart => {
                let text = if has_items {
                    NEXT_CHOICE
                } else {
                    cart::EMPTY_CART_MESSAGE
                };
                ("p", text.to_string(), true)
            }
            T::FirstAlert if on_cart => {
                let message = self.alerts.first()?;
                ("div", format!("{message}\n×"), true)
            }
            T::SecondAlert if on_cart => {
                let message = self.alerts.get(1)?;
                ("div", format!("{message}\n×"), true)
            }
            T::CloseAlert if on_cart && shifted => ("button", "×".to_string(), true),
            T::QuoteRegion if on_cart && self.estimate_open => ("select", String::new(), true),
            T::GetQuotes if on_cart && self.estimate_open => {
                ("button", "Get Quotes".to_string(), true)
            }
            T::FlatRateOption if on_cart && self.quoted => ("input", String::new(), true),
            T::ShippingLabel if on_cart && self.quoted => (
                "label",
                format!("Flat Shipping Rate - ${}", format_amount(FLAT_RATE)),
                true,
            ),
            T::ApplyShipping if on_cart && self.quoted => {
                ("button", "Apply Shipping".to_string(), true)
            }

            T::PaymentFirstName
            | T::PaymentLastName
            | T::PaymentAddress
            | T::PaymentCity
            | T::PaymentRegion
                if on_checkout =>
            {
                let tag = if target == T::PaymentRegion { "select" } else { "input" };
                let visible = self.step == CheckoutStep::PaymentAddress && !self.stored_address;
                (tag, String::new(), visible)
            }
            T::ContinuePaymentAddress if on_checkout => (
                "input",
                String::new(),
                self.step == CheckoutStep::PaymentAddress,
            ),
            T::ContinueShippingAddress if on_checkout => (
                "input",
                String::new(),
                self.step == CheckoutStep::ShippingAddress,
            ),
            T::ContinueShippingMethod if on_checkout => (
                "input",
                String::new(),
                self.step == CheckoutStep::ShippingMethod,
            ),
            T::AgreeTerms | T::ContinuePaymentMethod if on_checkout => (
                "input",
                String::new(),
                self.step == CheckoutStep::PaymentMethod,
            ),
            T::ConfirmOrder if on_checkout => {
                ("input", String::new(), self.step == CheckoutStep::Confirm)
            }
            T::SuccessBreadcrumb if page == Page::OrderSuccess => {
                ("a", checkout::SUCCESS_BREADCRUMB_TEXT.to_string(), true)
            }
            T::Heading if page == Page::OrderSuccess => {
                ("h1", checkout::ORDER_PLACED_MESSAGE.to_string(), true)
            }
            T::Heading if page == Page::AccountSuccess => {
                ("h1", "Your Account Has Been Created!".to_string(), true)
            }
            T::Continue if matches!(page, Page::OrderSuccess | Page::AccountSuccess) => {
                ("a", "Continue".to_string(), true)
            }

            T::RegFirstName
            | T::RegLastName
            | T::RegEmail
            | T::RegTelephone
            | T::RegPassword
            | T::RegConfirm
                if page == Page::Register =>
            {
                ("input", String::new(), true)
            }
            T::AgreePrivacy | T::SubmitRegistration if page == Page::Register => {
                ("input", String::new(), true)
            }

            _ => return None,
        };
        Some(ElementHandle::new(tag).with_text(text).with_visible(visible))
    }

    fn target_for(&self, selector: &Selector) -> CheckResult<Target> {
        if self.closed {
            return Err(CheckError::driver("browser is closed"));
        }
        self.resolve(selector)
            .filter(|target| self.element(*target).is_some())
            .ok_or_else(|| CheckError::driver(format!("no element matches {selector}")))
    }

    fn press(&mut self, target: Target) -> CheckResult<()> {
        use Target as T;
        match target {
            T::CartTotal => self.dropdown_open = !self.dropdown_open,
            T::MyAccount => self.account_menu_open = !self.account_menu_open,
            T::ShoppingCartLink | T::ViewCart => self.load(Page::Cart),
            T::RegisterLink => self.load(Page::Register),
            T::Logout => {
                self.logged_in = false;
                self.load(Page::Home);
            }
            T::HomeBreadcrumb => self.load(Page::Home),
            T::RemoveLine => {
                if !self.cart.is_empty() {
                    self.cart.remove(0);
                }
                if self.cart.is_empty() {
                    self.shipping = None;
                }
                if self.page == Page::Cart {
                    self.render(Page::Cart);
                }
            }

            T::AddToCart(id) => self.add_line(id, 1),
            T::DetailsLink(id) => {
                self.product = id;
                self.load(Page::Product);
            }
            T::DetailsAdd => {
                let quantity = self.value(T::DetailsQuantity).trim().parse().unwrap_or(0);
                self.add_line(self.product, quantity);
            }

            T::CheckoutButton => self.load(Page::Checkout),
            T::Update => {
                let quantity: u32 = self
                    .value(T::LineQuantity)
                    .trim()
                    .parse()
                    .map_err(|_| CheckError::driver("quantity input is not a number"))?;
                if let Some(line) = self.cart.first_mut() {
                    if quantity > 0 || !self.zero_updates_ignored {
                        line.1 = quantity;
                    }
                }
                self.cart.retain(|(_, q)| *q > 0);
                self.flash.push(cart::UPDATED_MESSAGE.to_string());
                self.render(Page::Cart);
            }
            T::CloseAlert => {
                if !self.alerts.is_empty() {
                    self.alerts.remove(0);
                }
            }
            T::EstimateShipping => self.estimate_open = !self.estimate_open,
            T::GetQuotes => {
                if self.value(T::QuoteRegion).is_empty() {
                    return Err(CheckError::driver("select a region before requesting quotes"));
                }
                self.quoted = true;
            }
            T::FlatRateOption => self.flat_rate_chosen = true,
            T::ApplyShipping => {
                if self.flat_rate_chosen {
                    self.shipping = Some(FLAT_RATE);
                    self.flash.push(SHIPPING_UPDATED_MESSAGE.to_string());
                    self.render(Page::Cart);
                }
            }

            T::ContinuePaymentAddress => {
                let complete = self.stored_address
                    || [
                        T::PaymentFirstName,
                        T::PaymentLastName,
                        T::PaymentAddress,
                        T::PaymentCity,
                        T::PaymentRegion,
                    ]
                    .into_iter()
                    .all(|field| !self.value(field).is_empty());
                if complete {
                    self.step = CheckoutStep::ShippingAddress;
                }
            }
            T::ContinueShippingAddress => self.step = CheckoutStep::ShippingMethod,
            T::ContinueShippingMethod => self.step = CheckoutStep::PaymentMethod,
            T::AgreeTerms => self.terms_agreed = !self.terms_agreed,
            T::ContinuePaymentMethod => {
                if self.terms_agreed {
                    self.step = CheckoutStep::Confirm;
                }
            }
            T::ConfirmOrder => {
                self.orders += 1;
                self.stored_address = true;
                self.cart.clear();
                self.shipping = None;
                self.load(Page::OrderSuccess);
            }
            T::Continue => {
                let next = if self.page == Page::AccountSuccess {
                    Page::Account
                } else {
                    Page::Home
                };
                self.load(next);
            }

            T::AgreePrivacy => self.privacy_agreed = !self.privacy_agreed,
            T::SubmitRegistration => {
                let filled = [
                    T::RegFirstName,
                    T::RegLastName,
                    T::RegEmail,
                    T::RegTelephone,
                    T::RegPassword,
                ]
                .into_iter()
                .all(|field| !self.value(field).is_empty());
                let confirmed = self.value(T::RegPassword) == self.value(T::RegConfirm);
                if filled && confirmed && self.privacy_agreed {
                    let email = self.value(T::RegEmail).to_string();
                    self.registered.push(email);
                    self.logged_in = true;
                    self.load(Page::AccountSuccess);
                }
            }

            _ => {}
        }
        Ok(())
    }
}

#[async_trait]
impl StoreDriver for MockStorefront {
    async fn navigate(&mut self, url: &str) -> CheckResult<()> {
        self.history.push(format!("navigate {url}"));
        let page = Page::from_url(url, &self.config).ok_or_else(|| CheckError::Navigation {
            url: url.to_string(),
            message: "not a storefront page".to_string(),
        })?;
        if page == Page::Product {
            let id = url
                .split('&')
                .find_map(|pair| pair.strip_prefix("product_id="))
                .and_then(|raw| raw.parse::<u8>().ok())
                .and_then(|raw| ProductId::new(raw.saturating_sub(39)))
                .ok_or_else(|| CheckError::Navigation {
                    url: url.to_string(),
                    message: "unknown product".to_string(),
                })?;
            self.product = id;
        }
        self.url = url.to_string();
        self.render(page);
        Ok(())
    }

    async fn current_url(&self) -> CheckResult<String> {
        Ok(self.url.clone())
    }

    async fn refresh(&mut self) -> CheckResult<()> {
        self.history.push("refresh".to_string());
        self.render(self.page);
        Ok(())
    }

    async fn query(&self, selector: &Selector) -> CheckResult<Option<ElementHandle>> {
        if self.closed {
            return Err(CheckError::driver("browser is closed"));
        }
        Ok(self.resolve(selector).and_then(|target| self.element(target)))
    }

    async fn attribute(&self, selector: &Selector, name: &str) -> CheckResult<Option<String>> {
        let target = self.target_for(selector)?;
        if name == "value" && (target.is_input() || target.is_select()) {
            Ok(Some(self.value(target).to_string()))
        } else {
            Ok(None)
        }
    }

    async fn click(&mut self, selector: &Selector) -> CheckResult<()> {
        let target = self.target_for(selector)?;
        self.history.push(format!("click {selector}"));
        self.press(target)
    }

    async fn clear(&mut self, selector: &Selector) -> CheckResult<()> {
        let target = self.target_for(selector)?;
        if !target.is_input() {
            return Err(CheckError::driver(format!("{selector} is not an input")));
        }
        self.history.push(format!("clear {selector}"));
        self.values.insert(target, String::new());
        Ok(())
    }

    async fn send_keys(&mut self, selector: &Selector, text: &str) -> CheckResult<()> {
        let target = self.target_for(selector)?;
        if !target.is_input() {
            return Err(CheckError::driver(format!("{selector} is not an input")));
        }
        self.history.push(format!("send_keys {selector} {text}"));
        self.values.entry(target).or_default().push_str(text);
        Ok(())
    }

    async fn select_by_value(&mut self, selector: &Selector, value: &str) -> CheckResult<()> {
        let target = self.target_for(selector)?;
        if !target.is_select() {
            return Err(CheckError::driver(format!("{selector} is not a select")));
        }
        if value.is_empty() || !value.chars().all(|c| c.is_ascii_digit()) {
            return Err(CheckError::driver(format!("no option with value {value:?}")));
        }
        self.history.push(format!("select {selector} {value}"));
        self.values.insert(target, value.to_string());
        Ok(())
    }

    async fn close(&mut self) -> CheckResult<()> {
        self.history.push("close".to_string());
        self.closed = true;
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    fn mock() -> MockStorefront {
        MockStorefront::new(&StoreConfig::default())
    }

    mod model_tests {
        use super::*;

        #[test]
        fn test_locator_table_has_no_duplicate_selectors() {
            let table = locator_table();
            let unique: HashSet<&Selector> = table.iter().map(|(s, _)| s).collect();
            assert_eq!(unique.len(), table.len());
        }

        #[test]
        fn test_cart_button_formats_thousands() {
            let mut mock = mock();
            mock.preload(ProductId::ALL[3], 1);
            assert_eq!(mock.cart_button_text(), "1 item(s) - $12,345.67");
        }

        #[test]
        fn test_minimum_warning_on_cart_load() {
            let mut mock = mock();
            mock.preload(ProductId::ALL[0], 1);
            mock.open(Page::Cart);
            assert_eq!(
                mock.alerts,
                vec!["Minimum order amount for Test product 1 is 2!".to_string()]
            );
        }

        #[test]
        fn test_overridden_minimum_warning() {
            let mut mock = mock();
            mock.set_minimum_warning("Minimum order is 2");
            mock.preload(ProductId::ALL[0], 1);
            mock.open(Page::Cart);
            assert_eq!(mock.alerts, vec!["Minimum order is 2".to_string()]);
        }

        #[test]
        fn test_content_paragraph_while_cart_has_items() {
            let mut mock = mock();
            mock.preload(ProductId::ALL[1], 1);
            mock.open(Page::Cart);
            let p = mock.element(Target::EmptyMessage).unwrap();
            assert_eq!(p.text, NEXT_CHOICE);
        }

        #[test]
        fn test_product_url_carries_id() {
            let mut mock = mock();
            mock.open_product(ProductId::ALL[1]);
            assert!(mock.url.ends_with("route=product/product&product_id=41"));
        }
    }

    mod driver_tests {
        use super::*;

        #[tokio::test]
        async fn test_unknown_selector_matches_nothing() {
            let mock = mock();
            assert!(mock.query(&Selector::css("#nothing")).await.unwrap().is_none());
        }

        #[tokio::test]
        async fn test_navigate_to_product_by_url() {
            let mut mock = mock();
            let url = format!(
                "{}index.php?route=product/product&product_id=42",
                StoreConfig::default().base_url
            );
            mock.navigate(&url).await.unwrap();
            assert_eq!(mock.product, ProductId::ALL[2]);
            assert!(mock.navigate("https://elsewhere.test/").await.is_err());
        }

        #[tokio::test]
        async fn test_send_keys_appends() {
            let mut mock = mock();
            mock.open_product(ProductId::ALL[1]);
            let quantity = details::QUANTITY.selector().clone();
            mock.send_keys(&quantity, "5").await.unwrap();
            assert_eq!(mock.attribute(&quantity, "value").await.unwrap().unwrap(), "15");
            mock.clear(&quantity).await.unwrap();
            assert_eq!(mock.attribute(&quantity, "value").await.unwrap().unwrap(), "");
        }

        #[tokio::test]
        async fn test_removed_element() {
            let mut mock = mock();
            mock.remove_element(&header::CART_TOTAL);
            assert!(mock
                .query(header::CART_TOTAL.selector())
                .await
                .unwrap()
                .is_none());
        }

        #[tokio::test]
        async fn test_closed_browser_errors() {
            let mut mock = mock();
            mock.close().await.unwrap();
            assert!(mock.is_closed());
            assert!(mock.query(header::CART_TOTAL.selector()).await.is_err());
        }

        #[tokio::test]
        async fn test_select_rejects_non_select() {
            let mut mock = mock();
            assert!(mock
                .select_by_value(header::CART_TOTAL.selector(), "2632")
                .await
                .is_err());
        }
    }
}
