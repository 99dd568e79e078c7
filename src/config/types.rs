use crate::state::TimeWindow;
use crate::ConfigError;
use chrono::{DateTime, Utc};
use serde::Deserialize;
use std::time::Duration;

/// Main configuration structure for Timeline-Corpus
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub window: WindowConfig,
    #[serde(default)]
    pub crawler: CrawlerConfig,
    pub api: ApiConfig,
    #[serde(rename = "user-agent")]
    pub user_agent: UserAgentConfig,
}

/// The time window of in-scope posts
#[derive(Debug, Clone, Deserialize)]
pub struct WindowConfig {
    /// Oldest instant in scope (RFC 3339)
    pub lower: DateTime<Utc>,

    /// Newest instant in scope (RFC 3339)
    pub upper: DateTime<Utc>,
}

impl WindowConfig {
    pub fn to_window(&self) -> Result<TimeWindow, ConfigError> {
        TimeWindow::new(self.lower, self.upper)
    }
}

/// Crawler pacing and retry configuration
#[derive(Debug, Clone, Deserialize)]
pub struct CrawlerConfig {
    /// Posts per crawl page, also the probe stride of the boundary search
    #[serde(rename = "page-size", default = "default_page_size")]
    pub page_size: u32,

    /// Pause after every crawl page fetch (milliseconds)
    #[serde(rename = "courtesy-delay", default = "default_courtesy_delay")]
    pub courtesy_delay: u64,

    /// Wait before retrying after a network failure (milliseconds)
    #[serde(rename = "network-retry-delay", default = "default_network_retry_delay")]
    pub network_retry_delay: u64,

    /// Added to the provider's retry-after on rate limiting (seconds)
    #[serde(rename = "rate-limit-slack", default = "default_rate_limit_slack")]
    pub rate_limit_slack: u64,

    /// Ceiling on the provider's advertised cool-down (seconds)
    #[serde(rename = "max-rate-limit-wait", default = "default_max_rate_limit_wait")]
    pub max_rate_limit_wait: u64,

    /// Maximum attempts per account
    #[serde(rename = "max-retries", default = "default_max_retries")]
    pub max_retries: u32,
}

impl CrawlerConfig {
    pub fn courtesy_delay(&self) -> Duration {
        Duration::from_millis(self.courtesy_delay)
    }

    pub fn network_retry_delay(&self) -> Duration {
        Duration::from_millis(self.network_retry_delay)
    }

    pub fn rate_limit_slack(&self) -> Duration {
        Duration::from_secs(self.rate_limit_slack)
    }

    pub fn max_rate_limit_wait(&self) -> Duration {
        Duration::from_secs(self.max_rate_limit_wait)
    }
}

impl Default for CrawlerConfig {
    fn default() -> Self {
        Self {
            page_size: default_page_size(),
            courtesy_delay: default_courtesy_delay(),
            network_retry_delay: default_network_retry_delay(),
            rate_limit_slack: default_rate_limit_slack(),
            max_rate_limit_wait: default_max_rate_limit_wait(),
            max_retries: default_max_retries(),
        }
    }
}

fn default_page_size() -> u32 {
    100
}

fn default_courtesy_delay() -> u64 {
    5000
}

fn default_network_retry_delay() -> u64 {
    5000
}

fn default_rate_limit_slack() -> u64 {
    10
}

fn default_max_rate_limit_wait() -> u64 {
    900
}

fn default_max_retries() -> u32 {
    5
}

/// Feed API endpoint configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ApiConfig {
    /// Base URL the timeline path is joined onto
    #[serde(rename = "base-url")]
    pub base_url: String,

    /// Bearer token sent with every request
    #[serde(rename = "bearer-token", default)]
    pub bearer_token: Option<String>,
}

/// User agent identification configuration
#[derive(Debug, Clone, Deserialize)]
pub struct UserAgentConfig {
    /// Name of the crawler
    #[serde(rename = "crawler-name")]
    pub crawler_name: String,

    /// Version of the crawler
    #[serde(rename = "crawler-version")]
    pub crawler_version: String,

    /// URL with information about the crawler
    #[serde(rename = "contact-url")]
    pub contact_url: String,

    /// Email address for crawler-related contact
    #[serde(rename = "contact-email")]
    pub contact_email: String,
}
