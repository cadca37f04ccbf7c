//! Account registration.

use crate::config::Customer;
use crate::driver::StoreDriver;
use crate::locator::Locator;
use crate::pages::{checkout, header, Page};
use crate::result::CheckResult;
use crate::session::StoreSession;
use tracing::info;

/// Registration first name
pub const FIRST_NAME: Locator = Locator::xpath("//*[@id=\"input-firstname\"]");
/// Registration last name
pub const LAST_NAME: Locator = Locator::xpath("//*[@id=\"input-lastname\"]");
/// Registration e-mail
pub const EMAIL: Locator = Locator::xpath("//*[@id=\"input-email\"]");
/// Registration telephone
pub const TELEPHONE: Locator = Locator::xpath("//*[@id=\"input-telephone\"]");
/// Registration password
pub const PASSWORD: Locator = Locator::xpath("//*[@id=\"input-password\"]");
/// Password confirmation
pub const PASSWORD_CONFIRM: Locator = Locator::xpath("//*[@id=\"input-confirm\"]");
/// Privacy policy checkbox
pub const AGREE_PRIVACY: Locator = Locator::xpath("/html/body/div[2]/div/div/form/div/div/input[1]");
/// Submit button of the form
pub const SUBMIT: Locator = Locator::xpath("/html/body/div[2]/div/div/form/div/div/input[2]");

/// The registration form
#[derive(Debug)]
pub struct RegisterPage<'s, D: StoreDriver> {
    session: &'s mut StoreSession<D>,
}

impl<'s, D: StoreDriver> RegisterPage<'s, D> {
    pub(crate) fn new(session: &'s mut StoreSession<D>) -> Self {
        Self { session }
    }

    /// Fill and submit the form with a fresh e-mail address; returns the address
    pub async fn submit(&mut self, customer: &Customer) -> CheckResult<String> {
        let email = customer.unique_email();
        self.session.fill(&FIRST_NAME, &customer.first_name).await?;
        self.session.fill(&LAST_NAME, &customer.last_name).await?;
        self.session.fill(&EMAIL, &email).await?;
        self.session.fill(&TELEPHONE, &customer.telephone).await?;
        self.session.fill(&PASSWORD, &customer.password).await?;
        self.session.fill(&PASSWORD_CONFIRM, &customer.password).await?;
        self.session.click(&AGREE_PRIVACY).await?;
        self.session.click(&SUBMIT).await?;
        self.session.wait_for_page(Page::AccountSuccess).await?;
        info!(email, "account registered");
        Ok(email)
    }

    /// Register from wherever the browser is and return to the home page
    pub async fn register(&mut self, customer: &Customer) -> CheckResult<String> {
        self.session.header().open_registration().await?;
        let email = self.submit(customer).await?;
        self.session.click(&checkout::CONTINUE).await?;
        self.session.wait_for_page(Page::Account).await?;
        self.session.click(&header::HOME).await?;
        self.session.wait_for_page(Page::Home).await?;
        Ok(email)
    }
}
