use crate::pool::work_source::{WorkItem, WorkSource};
use std::collections::VecDeque;
use std::future::Future;
use std::sync::{Mutex, MutexGuard, PoisonError};
use tokio::sync::Notify;

struct QueueState<T> {
    items: VecDeque<T>,
    closed: bool,
    aborted: bool,
}

/// A FIFO work source for jobs whose items are all known up front (or produced
/// by a single producer). Workers drain it until the producer calls [`close`](Self::close).
pub struct QueueSource<T> {
    state: Mutex<QueueState<T>>,
    changed: Notify,
}

impl<T: Send> QueueSource<T> {
    pub fn new() -> Self {
        Self {
            state: Mutex::new(QueueState {
                items: VecDeque::new(),
                closed: false,
                aborted: false,
            }),
            changed: Notify::new(),
        }
    }

    /// Queues an item. Returns `false` when the source is already closed or aborted.
    pub fn push(&self, item: T) -> bool {
        {
            let mut state = self.lock();
            if state.closed || state.aborted {
                return false;
            }
            state.items.push_back(item);
        }
        self.changed.notify_waiters();
        true
    }

    /// Tells the workers the producer is finished. Items already queued are still handed out.
    pub fn close(&self) {
        self.lock().closed = true;
        self.changed.notify_waiters();
    }

    pub fn len(&self) -> usize {
        self.lock().items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn lock(&self) -> MutexGuard<'_, QueueState<T>> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl<T: Send> Default for QueueSource<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Send> FromIterator<T> for QueueSource<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let source = Self::new();
        source.lock().items.extend(iter);
        source
    }
}

impl<T: Send> WorkSource<T> for QueueSource<T> {
    fn take(&self) -> impl Future<Output = WorkItem<T>> + Send {
        async move {
            loop {
                let notified = self.changed.notified();
                {
                    let mut state = self.lock();
                    if state.aborted {
                        return WorkItem::Shutdown;
                    }
                    if let Some(item) = state.items.pop_front() {
                        return WorkItem::Task(item);
                    }
                    if state.closed {
                        return WorkItem::Shutdown;
                    }
                }
                notified.await;
            }
        }
    }

    fn task_done(&self) {}

    fn abort(&self) {
        {
            let mut state = self.lock();
            state.aborted = true;
            state.items.clear();
        }
        self.changed.notify_waiters();
    }
}
