use crate::crawler::canonical::ResourceKind;
use crate::crawler::crawl_result::{CrawlResult, sort_pages};
use crate::crawler::frontier::FrontierSnapshot;
use std::collections::{BTreeMap, BTreeSet};
use std::sync::{Mutex, MutexGuard, PoisonError};

#[derive(Default)]
struct Discoveries {
    resources: BTreeMap<ResourceKind, BTreeSet<String>>,
    comments: BTreeSet<String>,
    emails: BTreeSet<String>,
}

/// Collects what tasks find besides crawlable URLs. Tasks only ever write to it.
#[derive(Default)]
pub struct Aggregator {
    discoveries: Mutex<Discoveries>,
}

impl Aggregator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_resource(&self, kind: ResourceKind, url: &str) {
        self.lock()
            .resources
            .entry(kind)
            .or_default()
            .insert(url.to_owned());
    }

    pub fn record_comment(&self, comment: &str) {
        self.lock().comments.insert(comment.to_owned());
    }

    pub fn record_email(&self, email: &str) {
        self.lock().emails.insert(email.to_owned());
    }

    /// Merges the recorded discoveries with the frontier's final state.
    pub fn finish(&self, snapshot: FrontierSnapshot) -> CrawlResult {
        let discoveries = self.lock();
        let mut pages = snapshot.seen.into_iter().collect::<Vec<String>>();
        sort_pages(&mut pages);
        CrawlResult {
            pages,
            resources: discoveries
                .resources
                .iter()
                .map(|(kind, urls)| (*kind, urls.iter().cloned().collect()))
                .collect(),
            external: snapshot.external.into_iter().collect(),
            comments: discoveries.comments.iter().cloned().collect(),
            emails: discoveries.emails.iter().cloned().collect(),
            aborted: snapshot.aborted,
        }
    }

    fn lock(&self) -> MutexGuard<'_, Discoveries> {
        self.discoveries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }
}
