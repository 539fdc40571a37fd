use std::path::PathBuf;

use tracing::{info, warn};

use crate::config::AppConfig;
use crate::extract::Extracted;
use crate::models::Listing;
use crate::pages::{MainPage, SortOrder};
use crate::scoring;
use crate::session::Session;
use crate::utils::error::Result;
use crate::wait::Waiter;

/// Soft validation outcome, kept apart from hard errors: a failed check still
/// comes with a full report.
#[derive(Debug, Clone, PartialEq)]
pub enum Verdict {
    Passed { fraction: f64 },
    Failed { fraction: f64, threshold: f64 },
}

impl Verdict {
    /// Pass requires strictly more than `threshold` of the listings to match.
    pub fn from_fraction(fraction: f64, threshold: f64) -> Self {
        if fraction > threshold {
            Verdict::Passed { fraction }
        } else {
            Verdict::Failed {
                fraction,
                threshold,
            }
        }
    }

    pub fn passed(&self) -> bool {
        matches!(self, Verdict::Passed { .. })
    }
}

#[derive(Debug)]
pub struct ScenarioReport {
    pub query: String,
    pub listings: Vec<Extracted>,
    pub fraction: f64,
    pub verdict: Verdict,
    pub product: Listing,
    pub screenshot: Option<PathBuf>,
}

/// The canonical flow for one query: search, score the result page, sort by
/// the requested order, open the first listing and capture its shop and price.
pub async fn run(
    session: &Session,
    config: &AppConfig,
    query: &str,
    sort: SortOrder,
) -> Result<ScenarioReport> {
    let waiter = Waiter::from_config(&config.wait);

    info!("searching for {query:?}");
    let main_page = MainPage::open(session, waiter, &config.market)?;
    let results = main_page.search(query).await?;

    let listings = results.listings().await?;
    let fraction = scoring::match_fraction(&listings, query);
    let verdict = Verdict::from_fraction(fraction, config.market.match_threshold);
    info!(
        "{} listings scraped, match fraction {fraction:.4}",
        listings.len()
    );

    results.sort(sort).await?;
    let product_page = results.open_first().await?;
    let product = product_page.snapshot().await?;
    info!(
        shop = product.shop_name.as_deref().unwrap_or("?"),
        price = product.price,
        "product card captured"
    );

    let screenshot = if config.screenshots.enabled {
        match session.capture_screenshot(&config.screenshots) {
            Ok(path) => Some(path),
            Err(e) => {
                warn!("screenshot skipped: {e}");
                None
            }
        }
    } else {
        None
    };

    Ok(ScenarioReport {
        query: query.to_string(),
        listings,
        fraction,
        verdict,
        product,
        screenshot,
    })
}
