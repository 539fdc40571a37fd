use tracing::debug;

use crate::config::MarketConfig;
use crate::pages::search_results::SearchResultPage;
use crate::session::Session;
use crate::utils::error::Result;
use crate::wait::Waiter;

const SEARCH_INPUT: &str = "input[data-auto='search-input']";

/// Entry point of the flow: the market landing page.
pub struct MainPage<'s> {
    session: &'s Session,
    waiter: Waiter,
    market: &'s MarketConfig,
}

impl<'s> MainPage<'s> {
    /// Navigate to the market, dismiss the sign-in overlay and any stray
    /// windows left over from a previous query.
    pub fn open(session: &'s Session, waiter: Waiter, market: &'s MarketConfig) -> Result<Self> {
        session.navigate(&market.base_url)?;

        // The site greets fresh sessions with a sign-in prompt; a click
        // anywhere dismisses it.
        if let Err(e) = session.click("body") {
            debug!("dismiss click skipped: {e}");
        }
        session.close_extra_windows()?;

        Ok(Self {
            session,
            waiter,
            market,
        })
    }

    /// Run a global search, landing on the result page.
    pub async fn search(self, query: &str) -> Result<SearchResultPage<'s>> {
        self.waiter
            .until_ready(|| Ok((self.session.count(SEARCH_INPUT)? > 0).then_some(())))
            .await?;
        self.session.type_into(SEARCH_INPUT, query)?;
        self.session.press_enter()?;

        Ok(SearchResultPage::new(self.session, self.waiter, self.market))
    }
}
