mod link_extractor;
mod page_crawler;
mod task_outcome;

pub use link_extractor::{Discovery, LinkExtractor};
pub use page_crawler::{FetchedPage, PageCrawler};
pub use task_outcome::TaskOutcome;
