use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Result;
use clap::{Parser, ValueEnum};
use tracing::{error, info};

use market_probe::AppConfig;
use market_probe::pages::SortOrder;
use market_probe::scenario::{self, ScenarioReport, Verdict};
use market_probe::session::Session;
use market_probe::testdata;

#[derive(Parser)]
#[command(
    name = "market-probe",
    about = "End-to-end search and price checks against the market UI"
)]
struct Cli {
    /// JSON file with search cases: [{"searchQuery": "..."}]
    #[arg(long, value_name = "FILE")]
    test_data: Option<PathBuf>,

    /// Single ad-hoc query, used instead of --test-data
    #[arg(long)]
    query: Option<String>,

    /// Sort applied to the result page before opening the first listing
    #[arg(long, value_enum, default_value_t = SortArg::Cheapest)]
    sort: SortArg,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum SortArg {
    Popular,
    Cheapest,
    MoreExpensive,
    Rating,
}

impl From<SortArg> for SortOrder {
    fn from(arg: SortArg) -> Self {
        match arg {
            SortArg::Popular => SortOrder::Popular,
            SortArg::Cheapest => SortOrder::Cheapest,
            SortArg::MoreExpensive => SortOrder::MoreExpensive,
            SortArg::Rating => SortOrder::Rating,
        }
    }
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("market_probe=info".parse()?),
        )
        .init();

    let cli = Cli::parse();
    let config = AppConfig::from_env()?;

    let queries: Vec<String> = match (&cli.query, &cli.test_data) {
        (Some(query), _) => vec![query.clone()],
        (None, Some(path)) => testdata::load_cases(path)?
            .into_iter()
            .map(|case| case.search_query)
            .collect(),
        (None, None) => anyhow::bail!("either --query or --test-data is required"),
    };

    info!("starting a browser session for {} queries", queries.len());
    let session = Session::launch(&config.browser)?;

    // Soft-assert style: every query runs, failures are summed up at the end.
    let mut failures = 0usize;
    for query in &queries {
        match scenario::run(&session, &config, query, cli.sort.into()).await {
            Ok(report) => {
                print_report(&report);
                if !report.verdict.passed() {
                    failures += 1;
                }
            }
            Err(e) => {
                error!("scenario for {query:?} failed: {e}");
                failures += 1;
            }
        }
    }

    if failures > 0 {
        error!("{failures} of {} queries failed", queries.len());
        return Ok(ExitCode::FAILURE);
    }
    Ok(ExitCode::SUCCESS)
}

fn print_report(report: &ScenarioReport) {
    println!("query: {}", report.query);
    for entry in &report.listings {
        match entry {
            Ok(listing) => println!("  {}\n\t{}", listing.name, listing.price),
            Err(e) => println!("  <extraction failed: {e}>"),
        }
    }
    match &report.verdict {
        Verdict::Passed { fraction } => println!("match fraction {fraction:.4} - ok"),
        Verdict::Failed {
            fraction,
            threshold,
        } => println!("match fraction {fraction:.4} - below threshold {threshold}"),
    }
    println!(
        "shop: {}",
        report.product.shop_name.as_deref().unwrap_or("<unknown>")
    );
    println!("price: {}", report.product.price);
    if let Some(path) = &report.screenshot {
        println!("screenshot: {}", path.display());
    }
}
