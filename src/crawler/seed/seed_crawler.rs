use crate::crawler::canonical::{canonicalize, crawl_root};
use crate::crawler::crawl_error::CrawlError;
use crate::crawler::crawl_result::CrawlResult;
use crate::crawler::crawler_config::CrawlerConfig;
use crate::crawler::crawler_progress_event::CrawlerProgressEvent;
use crate::crawler::frontier::Frontier;
use crate::crawler::page::{LinkExtractor, PageCrawler};
use crate::crawler::progress_reporter::ProgressReporter;
use crate::crawler::robots::RobotsTxtSource;
use crate::crawler::seed::crawl_task::{CrawlState, crawl_task};
use crate::pool::WorkerPool;
use std::sync::Arc;
use tracing::{debug, info, warn};
use url::Url;

/// Crawls everything reachable under one seed's directory.
pub struct SeedCrawler<TP>
where
    TP: ProgressReporter,
{
    shutdown_notify: Arc<tokio::sync::Notify>,
    seed: Url,
    progress_reporter: Arc<TP>,
}

impl<TP> SeedCrawler<TP>
where
    TP: ProgressReporter + 'static,
{
    pub fn new(
        shutdown_notify: Arc<tokio::sync::Notify>,
        seed: Url,
        progress_reporter: TP,
    ) -> Self {
        Self {
            shutdown_notify,
            seed,
            progress_reporter: Arc::new(progress_reporter),
        }
    }

    pub fn seed(&self) -> &Url {
        &self.seed
    }

    pub fn root(&self) -> Url {
        crawl_root(&self.seed)
    }

    pub async fn crawl(&self, config: &CrawlerConfig) -> Result<CrawlResult, CrawlError> {
        let root = self.root();
        let page_crawler = PageCrawler::new(config)?;
        let link_extractor = LinkExtractor::new(config)?;

        self.progress_reporter.report(CrawlerProgressEvent::Begin {
            seed: self.seed.clone(),
            root: root.clone(),
        });

        let frontier = Arc::new(Frontier::new(root.as_str(), config.include_external()));
        frontier.submit(&canonicalize(&self.seed));
        frontier.submit(root.as_str());
        self.seed_endpoints(&frontier, &root, config.seed_endpoints());

        match RobotsTxtSource::load_from_root(page_crawler.client(), &root, config.user_agent())
            .await
        {
            Ok(Some(robots_txt)) => self.seed_robots_txt(&frontier, &root, &robots_txt),
            Ok(None) => {}
            Err(e) => debug!("Unable to load robots.txt: {}", e),
        }

        let state = Arc::new(CrawlState::new(
            Arc::clone(&frontier),
            page_crawler,
            link_extractor,
            Arc::clone(&self.progress_reporter),
        ));
        let pool = WorkerPool::new(config.thread_count());
        info!(threads = pool.threads(), root = %root, "Starting crawl");
        let stats = pool
            .run(
                crawl_task::<TP>,
                Arc::clone(&state),
                Arc::clone(&frontier),
                Arc::clone(&self.shutdown_notify),
            )
            .await;
        info!(
            completed = stats.completed,
            failed = stats.failed,
            "Crawl finished"
        );

        let result = state.aggregator().finish(frontier.snapshot());
        self.progress_reporter.report(CrawlerProgressEvent::End {
            num_pages: result.pages.len(),
            aborted: result.aborted,
        });

        if let Some(output_path) = config.output_path() {
            result.save(output_path)?;
        }
        Ok(result)
    }

    fn seed_endpoints(&self, frontier: &Frontier, root: &Url, endpoints: &[String]) {
        for endpoint in endpoints {
            match join_root(root, endpoint) {
                Some(target) => {
                    frontier.submit(&target);
                }
                None => warn!("Ignoring endpoint '{}'", endpoint),
            }
        }
    }

    fn seed_robots_txt(&self, frontier: &Frontier, root: &Url, robots_txt: &RobotsTxtSource) {
        frontier.mark_seen(robots_txt.url().as_str());
        self.progress_reporter
            .report(CrawlerProgressEvent::RobotsTxtFound {
                url: robots_txt.url().to_string(),
            });
        debug!("robots.txt: {}", robots_txt.content());

        let endpoints = match robots_txt.endpoints() {
            Ok(endpoints) => endpoints,
            Err(e) => {
                warn!("Unable to read robots.txt endpoints: {}", e);
                return;
            }
        };
        let view = robots_txt.view();
        let matcher = view.matcher();
        for endpoint in endpoints {
            let Some(target) = join_root(root, &endpoint) else {
                continue;
            };
            frontier.submit(&target);
            self.progress_reporter
                .report(CrawlerProgressEvent::RobotsTxtEndpoint {
                    url: target,
                    disallowed: matcher.is_disallowed(&endpoint),
                });
        }
    }
}

/// `root` + `endpoint` with the endpoint's leading `/` removed, canonicalized.
fn join_root(root: &Url, endpoint: &str) -> Option<String> {
    let endpoint = endpoint.trim();
    let relative = endpoint.strip_prefix('/').unwrap_or(endpoint);
    let target = Url::parse(&format!("{}{}", root, relative)).ok()?;
    Some(canonicalize(&target))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn endpoints_are_appended_to_the_root() {
        let root = Url::parse("https://example.com/app/").unwrap();
        assert_eq!(
            join_root(&root, "/admin").as_deref(),
            Some("https://example.com/app/admin")
        );
        assert_eq!(
            join_root(&root, "login.php#x").as_deref(),
            Some("https://example.com/app/login.php")
        );
    }
}
