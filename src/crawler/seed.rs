mod crawl_task;
mod seed_crawler;

pub use crawl_task::{CrawlState, TaskEnd, crawl_task};
pub use seed_crawler::SeedCrawler;
