use tracing::{debug, info};

use crate::config::MarketConfig;
use crate::extract::{self, Extracted};
use crate::pages::product::ProductPage;
use crate::session::Session;
use crate::utils::error::Result;
use crate::wait::Waiter;

const PRODUCT_SNIPPET: &str = "div[data-zone-name='productSnippet']";

/// Search-result sort controls, keyed by the button's data-autotest-id.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortOrder {
    Popular,
    Cheapest,
    MoreExpensive,
    Rating,
}

impl SortOrder {
    pub fn autotest_id(self) -> &'static str {
        match self {
            SortOrder::Popular => "drop",
            SortOrder::Cheapest => "aprice",
            SortOrder::MoreExpensive => "dprice",
            SortOrder::Rating => "rating",
        }
    }

    fn button_selector(self) -> String {
        format!(
            "button[data-zone-name='sort'][data-autotest-id='{}']",
            self.autotest_id()
        )
    }
}

/// Where a click on the first snippet ended up.
enum Opened {
    NewWindow(String),
    InPlace,
}

pub struct SearchResultPage<'s> {
    session: &'s Session,
    waiter: Waiter,
    market: &'s MarketConfig,
}

impl<'s> SearchResultPage<'s> {
    pub(crate) fn new(session: &'s Session, waiter: Waiter, market: &'s MarketConfig) -> Self {
        Self {
            session,
            waiter,
            market,
        }
    }

    /// Wait until the page shows more than `min_results` snippets, then
    /// extract each one. Broken snippets come back as errors in place, keeping
    /// the list aligned with the elements on the page.
    pub async fn listings(&self) -> Result<Vec<Extracted>> {
        let min = self.market.min_results;
        let snippets = self
            .waiter
            .until_ready(|| {
                let htmls = self.session.html_of_all(PRODUCT_SNIPPET)?;
                Ok((htmls.len() > min).then_some(htmls))
            })
            .await?;

        debug!("extracting {} snippets", snippets.len());
        Ok(snippets
            .iter()
            .map(|html| extract::listing_from_snippet(html))
            .collect())
    }

    /// Click a sort control. The button re-renders while results stream in,
    /// so the click goes through the waiter.
    pub async fn sort(&self, order: SortOrder) -> Result<()> {
        let selector = order.button_selector();
        info!("sorting results by {order:?}");
        self.waiter.until(|| self.session.click(&selector)).await
    }

    /// Open the first snippet. The product card may open in another window;
    /// that window is adopted by its URL, never by handle order.
    pub async fn open_first(self) -> Result<ProductPage<'s>> {
        let origin = self.session.current_window();
        self.waiter
            .until(|| self.session.click(PRODUCT_SNIPPET))
            .await?;

        let marker = self.market.product_url_marker.clone();
        let opened = self
            .waiter
            .until_ready(|| {
                if let Some(id) = self
                    .session
                    .find_other_window(&origin, |url| url.contains(&marker))
                {
                    return Ok(Some(Opened::NewWindow(id)));
                }
                if self.session.current_url().contains(&marker) {
                    return Ok(Some(Opened::InPlace));
                }
                Ok(None)
            })
            .await?;

        if let Opened::NewWindow(target_id) = opened {
            debug!("product card opened in window {target_id}");
            self.session.replace_current_window(&target_id)?;
        }
        Ok(ProductPage::new(self.session, self.waiter))
    }
}
