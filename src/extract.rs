use std::sync::OnceLock;

use scraper::{Html, Selector};
use thiserror::Error;

use crate::models::{Listing, parse_price};

/// Product snippet internals on the search-result page. Attribute selectors
/// only, so a markup reshuffle means touching these two lines and nothing else.
pub const SNIPPET_TITLE: &str = "span[data-auto='snippet-title']";
pub const SNIPPET_PRICE: &str = "span[data-auto='snippet-price-current'] span";

/// Per-snippet extraction outcome. Failures stay in the list so it keeps its
/// alignment with the elements on the page.
pub type Extracted = std::result::Result<Listing, ExtractError>;

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ExtractError {
    #[error("snippet has no title element")]
    MissingName,

    #[error("snippet has no price element")]
    MissingPrice,

    #[error("unparseable price text {text:?}")]
    BadPrice { text: String },
}

fn title_selector() -> &'static Selector {
    static SELECTOR: OnceLock<Selector> = OnceLock::new();
    SELECTOR.get_or_init(|| Selector::parse(SNIPPET_TITLE).unwrap())
}

fn price_selector() -> &'static Selector {
    static SELECTOR: OnceLock<Selector> = OnceLock::new();
    SELECTOR.get_or_init(|| Selector::parse(SNIPPET_PRICE).unwrap())
}

fn text_of(element: scraper::ElementRef<'_>) -> String {
    element.text().collect::<Vec<_>>().join(" ").trim().to_string()
}

/// Parse one product-snippet fragment into a listing.
pub fn listing_from_snippet(html: &str) -> Extracted {
    let fragment = Html::parse_fragment(html);

    let name = fragment
        .select(title_selector())
        .next()
        .map(text_of)
        .ok_or(ExtractError::MissingName)?;

    let price_text = fragment
        .select(price_selector())
        .next()
        .map(text_of)
        .ok_or(ExtractError::MissingPrice)?;

    parse_price(&price_text)
        .map(|price| Listing {
            name,
            price,
            shop_name: None,
        })
        .map_err(|_| ExtractError::BadPrice { text: price_text })
}
