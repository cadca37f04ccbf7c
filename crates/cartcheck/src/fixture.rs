//! Per-scenario setup and teardown.
//!
//! Scenarios share one browser session, so each one starts from a known
//! state: an empty cart. Teardown returns to the home page so the next setup
//! finds the header where it expects it.

use crate::assertion::check_equal;
use crate::driver::StoreDriver;
use crate::pages::header;
use crate::result::CheckResult;
use crate::session::StoreSession;
use async_trait::async_trait;
use rust_decimal::Decimal;
use tracing::{debug, info, warn};

/// Setup and teardown around every scenario
#[async_trait]
pub trait Fixture<D: StoreDriver>: Send {
    /// Bring the session into the state scenarios assume
    async fn setup(&mut self, session: &mut StoreSession<D>) -> CheckResult<()>;

    /// Leave the session where the next setup can start
    async fn teardown(&mut self, session: &mut StoreSession<D>) -> CheckResult<()>;

    /// Fixture name for logging
    fn name(&self) -> &str {
        std::any::type_name::<Self>()
    }
}

/// Empty cart before, home page after
#[derive(Debug, Clone, Copy, Default)]
pub struct StorefrontFixture;

impl StorefrontFixture {
    /// Create the fixture
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

#[async_trait]
impl<D: StoreDriver> Fixture<D> for StorefrontFixture {
    async fn setup(&mut self, session: &mut StoreSession<D>) -> CheckResult<()> {
        if session.current_page().await?.is_none() {
            debug!("not on the storefront, loading home page");
            session.navigate_home().await?;
        }
        if session.header().cart_is_empty().await? {
            debug!("cart already empty");
        } else {
            let removed = session.header().clean_cart().await?;
            info!(removed, "cleaned cart left by a previous scenario");
        }

        let summary = session.header().cart_summary().await?;
        check_equal("cart quantity before scenario", &0, &summary.quantity)?;
        check_equal("cart value before scenario", &Decimal::ZERO, &summary.value)?;

        if !session.is_home().await? {
            session.navigate_home().await?;
        }
        Ok(())
    }

    async fn teardown(&mut self, session: &mut StoreSession<D>) -> CheckResult<()> {
        if session.is_home().await? {
            return Ok(());
        }
        if session.find_now(&header::HOME).await?.is_some() {
            session.header().go_home().await
        } else {
            warn!("no breadcrumb to follow, loading home page");
            session.navigate_home().await
        }
    }

    fn name(&self) -> &str {
        "storefront"
    }
}
