use crate::models::Listing;
use crate::session::Session;
use crate::utils::error::Result;
use crate::wait::Waiter;

const PRODUCT_PRICE: &str = "[data-auto='snippet-price-current'], [data-auto='price-block']";
const PRODUCT_SHOP: &str = "[data-baobab-name='shopItem'] span";

/// Product card opened from the first search result.
pub struct ProductPage<'s> {
    session: &'s Session,
    waiter: Waiter,
}

impl<'s> ProductPage<'s> {
    pub(crate) fn new(session: &'s Session, waiter: Waiter) -> Self {
        Self { session, waiter }
    }

    /// Wait for the price and shop blocks to render, then capture both.
    pub async fn snapshot(&self) -> Result<Listing> {
        let price_text = self
            .waiter
            .until_ready(|| self.session.text_of_first(PRODUCT_PRICE))
            .await?;
        let shop_name = self
            .waiter
            .until_ready(|| self.session.text_of_first(PRODUCT_SHOP))
            .await?;

        Ok(Listing::from_display("", &price_text)?.with_shop(shop_name))
    }
}
