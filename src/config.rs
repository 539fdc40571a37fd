use std::env;
use std::time::Duration;

use config::{Config, ConfigError, Environment, File};
use serde::{Deserialize, Serialize};
use url::Url;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub browser: BrowserConfig,
    pub market: MarketConfig,
    pub wait: WaitConfig,
    pub screenshots: ScreenshotConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BrowserConfig {
    pub headless: bool,
    pub user_agent: String,
    pub chrome_path: Option<String>,
    pub window_width: u32,
    pub window_height: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MarketConfig {
    pub base_url: String,
    /// The result page is considered loaded once it shows strictly more
    /// snippets than this.
    pub min_results: usize,
    /// Fraction of listings that must match the query for a pass verdict.
    pub match_threshold: f64,
    /// Substring identifying a product-card URL, used to adopt the window a
    /// clicked listing opens.
    pub product_url_marker: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WaitConfig {
    pub timeout_secs: u64,
    pub poll_interval_ms: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScreenshotConfig {
    pub enabled: bool,
    pub dir: String,
}

impl WaitConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        let run_mode = env::var("RUN_MODE").unwrap_or_else(|_| "development".into());

        let s = Config::builder()
            // Start with default configuration
            .add_source(File::with_name("config/default"))
            // Add environment-specific config
            .add_source(File::with_name(&format!("config/{}", run_mode)).required(false))
            // Add local config (ignored by git)
            .add_source(File::with_name("config/local").required(false))
            // Add environment variables with prefix "PROBE_"
            .add_source(Environment::with_prefix("PROBE").separator("__"))
            .build()?;

        let mut config: AppConfig = s.try_deserialize()?;

        // Add Chrome path from environment if not set
        if config.browser.chrome_path.is_none() {
            config.browser.chrome_path = env::var("CHROME_PATH").ok();
        }

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if Url::parse(&self.market.base_url).is_err() {
            return Err(ConfigError::Message("Invalid market base URL".into()));
        }

        if self.market.min_results == 0 {
            return Err(ConfigError::Message(
                "market.min_results must be greater than 0".into(),
            ));
        }

        if !(0.0..=1.0).contains(&self.market.match_threshold) {
            return Err(ConfigError::Message(
                "market.match_threshold must be between 0 and 1".into(),
            ));
        }

        if self.market.product_url_marker.is_empty() {
            return Err(ConfigError::Message(
                "market.product_url_marker must not be empty".into(),
            ));
        }

        if self.wait.poll_interval_ms == 0 {
            return Err(ConfigError::Message(
                "wait.poll_interval_ms must be greater than 0".into(),
            ));
        }

        if self.wait.poll_interval() >= self.wait.timeout() {
            return Err(ConfigError::Message(
                "wait.poll_interval_ms must stay below wait.timeout_secs".into(),
            ));
        }

        if self.screenshots.enabled && self.screenshots.dir.is_empty() {
            return Err(ConfigError::Message(
                "screenshots.dir must not be empty when screenshots are enabled".into(),
            ));
        }

        Ok(())
    }
}
