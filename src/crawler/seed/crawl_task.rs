use crate::crawler::aggregator::Aggregator;
use crate::crawler::canonical::{canonicalize, is_in_scope};
use crate::crawler::crawler_progress_event::CrawlerProgressEvent;
use crate::crawler::frontier::{Frontier, Submission};
use crate::crawler::page::{Discovery, FetchedPage, LinkExtractor, PageCrawler, TaskOutcome};
use crate::crawler::progress_reporter::ProgressReporter;
use anyhow::Context;
use std::sync::Arc;
use tracing::debug;
use url::Url;

/// How a task finished, after its outcome has been acted on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskEnd {
    /// The page was parsed; `queued` new URLs went into the frontier.
    Extracted { queued: usize },
    Skipped,
    /// The target looked unreachable and the frontier was aborted.
    Aborted,
}

/// Everything a crawl task needs, shared by all workers of one run.
pub struct CrawlState<TP> {
    frontier: Arc<Frontier>,
    aggregator: Aggregator,
    page_crawler: PageCrawler,
    link_extractor: LinkExtractor,
    progress_reporter: Arc<TP>,
}

impl<TP: ProgressReporter> CrawlState<TP> {
    pub fn new(
        frontier: Arc<Frontier>,
        page_crawler: PageCrawler,
        link_extractor: LinkExtractor,
        progress_reporter: Arc<TP>,
    ) -> Self {
        Self {
            frontier,
            aggregator: Aggregator::new(),
            page_crawler,
            link_extractor,
            progress_reporter,
        }
    }

    pub fn aggregator(&self) -> &Aggregator {
        &self.aggregator
    }

    /// Acts on one fetch outcome. This is the only place task state transitions happen.
    pub fn step(&self, requested: &Url, outcome: TaskOutcome) -> TaskEnd {
        match outcome {
            TaskOutcome::TransportError { url, error } => {
                self.progress_reporter
                    .report(CrawlerProgressEvent::Unreachable {
                        url,
                        reason: error.to_string(),
                    });
                self.frontier.abort();
                TaskEnd::Aborted
            }
            TaskOutcome::HttpError { url, status_code } => {
                self.progress_reporter
                    .report(CrawlerProgressEvent::HttpError { url, status_code });
                TaskEnd::Skipped
            }
            TaskOutcome::NotHtml { url, content_type } => {
                self.progress_reporter
                    .report(CrawlerProgressEvent::NotHtml { url, content_type });
                TaskEnd::Skipped
            }
            TaskOutcome::RequestFailed { url, error } => {
                debug!(url = %url, "Request failed: {}", error);
                self.progress_reporter
                    .report(CrawlerProgressEvent::RequestFailed {
                        url,
                        reason: error.to_string(),
                    });
                TaskEnd::Skipped
            }
            TaskOutcome::Redirected {
                requested: from,
                page,
            } => {
                let to = canonicalize(&page.url);
                if !is_in_scope(&to, self.frontier.root()) {
                    self.frontier.submit(&to);
                    self.progress_reporter
                        .report(CrawlerProgressEvent::Redirected { from, to });
                    return TaskEnd::Skipped;
                }
                if !self.frontier.mark_seen(&to) {
                    self.progress_reporter
                        .report(CrawlerProgressEvent::AlreadyCrawled { from, to });
                    return TaskEnd::Skipped;
                }
                self.progress_reporter
                    .report(CrawlerProgressEvent::Redirected { from, to });
                self.extract(requested, page)
            }
            TaskOutcome::Fetched(page) => {
                self.progress_reporter.report(CrawlerProgressEvent::Crawled {
                    url: requested.to_string(),
                });
                self.extract(requested, page)
            }
        }
    }

    fn extract(&self, requested: &Url, page: FetchedPage) -> TaskEnd {
        if !page.is_html {
            self.progress_reporter.report(CrawlerProgressEvent::NotHtml {
                url: page.url.to_string(),
                content_type: page.content_type,
            });
            return TaskEnd::Skipped;
        }
        let discoveries = self
            .link_extractor
            .extract(&page.body, requested, &page.url);
        let found = discoveries.len();
        let queued = self.link_back(discoveries);
        debug!(url = %page.url, found, queued, "Extracted page");
        TaskEnd::Extracted { queued }
    }

    fn link_back(&self, discoveries: Vec<Discovery>) -> usize {
        let mut queued = 0;
        for discovery in discoveries {
            match discovery {
                Discovery::Page(url) => {
                    if self.frontier.submit(&url) == Submission::Queued {
                        queued += 1;
                    }
                }
                Discovery::Resource {
                    explorable,
                    resource,
                    kind,
                } => {
                    if !is_in_scope(&resource, self.frontier.root()) {
                        self.frontier.submit(&resource);
                        continue;
                    }
                    self.aggregator.record_resource(kind, &resource);
                    if self.frontier.submit(&explorable) == Submission::Queued {
                        queued += 1;
                    }
                }
                Discovery::Email(email) => self.aggregator.record_email(&email),
                Discovery::Comment(comment) => self.aggregator.record_comment(&comment),
            }
        }
        queued
    }
}

/// The pool task: fetch one URL, then act on the outcome.
pub async fn crawl_task<TP: ProgressReporter>(
    state: Arc<CrawlState<TP>>,
    url: String,
) -> anyhow::Result<()> {
    if state.frontier.is_aborted() {
        return Ok(());
    }
    let requested =
        Url::parse(&url).with_context(|| format!("Queued URL {} is not absolute", url))?;
    let fetched = state.page_crawler.crawl(&requested).await;
    let outcome = TaskOutcome::from_fetch(&url, fetched);
    state.step(&requested, outcome);
    Ok(())
}
