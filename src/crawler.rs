pub mod aggregator;
pub mod canonical;
pub mod crawl_error;
pub mod crawl_result;
pub mod crawler_config;
pub mod crawler_progress_event;
pub mod frontier;
pub mod page;
pub mod progress_reporter;
pub mod robots;
pub mod seed;

pub use crawl_error::CrawlError;
pub use crawl_result::CrawlResult;
pub use crawler_config::CrawlerConfig;
pub use progress_reporter::{ProgressReporter, SilentProgressReporter};
pub use seed::SeedCrawler;

use std::sync::Arc;

/// Crawls `seed_url` without any progress output and returns the report.
pub async fn run_crawl(seed_url: &str, config: &CrawlerConfig) -> Result<CrawlResult, CrawlError> {
    let seed = canonical::parse_seed(seed_url)?;
    let shutdown_notify = Arc::new(tokio::sync::Notify::new());
    SeedCrawler::new(shutdown_notify, seed, SilentProgressReporter)
        .crawl(config)
        .await
}
