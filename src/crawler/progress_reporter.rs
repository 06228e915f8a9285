use crate::crawler::crawler_progress_event::CrawlerProgressEvent;

/// Receives one event per task outcome. Called concurrently from every worker.
pub trait ProgressReporter: Send + Sync {
    fn report(&self, event: CrawlerProgressEvent);
}

/// Discards every event.
#[derive(Debug, Clone, Copy, Default)]
pub struct SilentProgressReporter;

impl ProgressReporter for SilentProgressReporter {
    fn report(&self, _event: CrawlerProgressEvent) {}
}

impl<T: ProgressReporter + ?Sized> ProgressReporter for std::sync::Arc<T> {
    fn report(&self, event: CrawlerProgressEvent) {
        (**self).report(event)
    }
}
