//! The crawl frontier: which URLs have been seen and which are still waiting.
//!
//! All state sits behind one mutex so that "is it new?" and "queue it" happen as a
//! single step. The frontier also works out when the crawl is finished: nothing
//! pending and no task in flight means no task can ever submit again.

use crate::crawler::canonical::is_in_scope;
use crate::pool::{WorkItem, WorkSource};
use std::collections::{BTreeSet, HashSet, VecDeque};
use std::future::Future;
use std::sync::{Mutex, MutexGuard, PoisonError};
use tokio::sync::Notify;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Submission {
    Queued,
    AlreadySeen,
    External,
    Aborted,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FrontierStatus {
    Open,
    Exhausted,
    Aborted,
}

struct FrontierState {
    seen: HashSet<String>,
    pending: VecDeque<String>,
    external: BTreeSet<String>,
    in_flight: usize,
    status: FrontierStatus,
}

/// What the frontier discovered, taken once the pool has joined.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FrontierSnapshot {
    pub seen: BTreeSet<String>,
    pub external: BTreeSet<String>,
    pub aborted: bool,
}

pub struct Frontier {
    root: String,
    track_external: bool,
    state: Mutex<FrontierState>,
    changed: Notify,
}

impl Frontier {
    pub fn new(root: impl Into<String>, track_external: bool) -> Self {
        Self {
            root: root.into(),
            track_external,
            state: Mutex::new(FrontierState {
                seen: HashSet::new(),
                pending: VecDeque::new(),
                external: BTreeSet::new(),
                in_flight: 0,
                status: FrontierStatus::Open,
            }),
            changed: Notify::new(),
        }
    }

    pub fn root(&self) -> &str {
        &self.root
    }

    /// Queues `url` unless it is out of scope or already seen.
    pub fn submit(&self, url: &str) -> Submission {
        if !is_in_scope(url, &self.root) {
            if self.track_external {
                let mut state = self.lock();
                if state.status != FrontierStatus::Aborted {
                    state.external.insert(url.to_owned());
                }
            }
            return Submission::External;
        }

        {
            let mut state = self.lock();
            if state.status == FrontierStatus::Aborted {
                return Submission::Aborted;
            }
            if !state.seen.insert(url.to_owned()) {
                return Submission::AlreadySeen;
            }
            state.pending.push_back(url.to_owned());
        }
        self.changed.notify_waiters();
        Submission::Queued
    }

    /// Records `url` as seen without queueing it. Returns `true` if it was new.
    ///
    /// Used for redirect targets (the body is already in hand) and for files such
    /// as robots.txt that are reported but never crawled.
    pub fn mark_seen(&self, url: &str) -> bool {
        let mut state = self.lock();
        if state.status == FrontierStatus::Aborted {
            return false;
        }
        state.seen.insert(url.to_owned())
    }

    /// Stops the crawl: pending URLs are dropped and every waiting worker is released.
    pub fn abort(&self) {
        {
            let mut state = self.lock();
            state.status = FrontierStatus::Aborted;
            state.pending.clear();
        }
        self.changed.notify_waiters();
    }

    pub fn is_aborted(&self) -> bool {
        self.lock().status == FrontierStatus::Aborted
    }

    /// `(pending, seen)` counts, for progress output.
    pub fn progress(&self) -> (usize, usize) {
        let state = self.lock();
        (state.pending.len(), state.seen.len())
    }

    pub fn snapshot(&self) -> FrontierSnapshot {
        let state = self.lock();
        FrontierSnapshot {
            seen: state.seen.iter().cloned().collect(),
            external: state.external.clone(),
            aborted: state.status == FrontierStatus::Aborted,
        }
    }

    fn lock(&self) -> MutexGuard<'_, FrontierState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl WorkSource<String> for Frontier {
    fn take(&self) -> impl Future<Output = WorkItem<String>> + Send {
        async move {
            loop {
                let notified = self.changed.notified();
                {
                    let mut state = self.lock();
                    if state.status != FrontierStatus::Open {
                        return WorkItem::Shutdown;
                    }
                    if let Some(url) = state.pending.pop_front() {
                        state.in_flight += 1;
                        return WorkItem::Task(url);
                    }
                    if state.in_flight == 0 {
                        state.status = FrontierStatus::Exhausted;
                        self.changed.notify_waiters();
                        return WorkItem::Shutdown;
                    }
                }
                notified.await;
            }
        }
    }

    fn task_done(&self) {
        let exhausted = {
            let mut state = self.lock();
            state.in_flight = state.in_flight.saturating_sub(1);
            state.in_flight == 0 && state.pending.is_empty()
        };
        if exhausted {
            self.changed.notify_waiters();
        }
    }

    fn abort(&self) {
        Frontier::abort(self);
    }
}
