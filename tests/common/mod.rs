//! Shared helpers for the crawl integration tests.

use rusty_recon::crawler::CrawlerConfig;
use rusty_recon::crawler::crawler_progress_event::CrawlerProgressEvent;
use rusty_recon::crawler::progress_reporter::ProgressReporter;
use std::sync::Mutex;
use std::time::Duration;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

pub fn test_config() -> CrawlerConfig {
    CrawlerConfig::default()
        .with_thread_count(4)
        .with_request_timeout(Duration::from_secs(5))
        .with_user_agent("rusty-recon-test/0.1.0")
}

/// The crawl root for a mock server, with its trailing slash.
pub fn root_of(server: &MockServer) -> String {
    format!("{}/", server.uri())
}

pub async fn mount_html(server: &MockServer, at: &str, body: &str) {
    Mock::given(method("GET"))
        .and(path(at))
        .respond_with(ResponseTemplate::new(200).set_body_raw(body.to_owned(), "text/html"))
        .mount(server)
        .await;
}

/// Keeps every event it receives, for assertions after the crawl.
#[derive(Default)]
pub struct RecordingReporter {
    events: Mutex<Vec<CrawlerProgressEvent>>,
}

impl RecordingReporter {
    pub fn events(&self) -> Vec<CrawlerProgressEvent> {
        self.events.lock().unwrap().clone()
    }
}

impl ProgressReporter for RecordingReporter {
    fn report(&self, event: CrawlerProgressEvent) {
        self.events.lock().unwrap().push(event);
    }
}
