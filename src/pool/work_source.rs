use std::future::Future;

/// What a worker gets back from a [`WorkSource`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WorkItem<T> {
    Task(T),
    /// No more work will ever be produced; the worker exits.
    Shutdown,
}

pub trait WorkSource<T>: Send + Sync {
    /// Waits for the next item. Once `Shutdown` is returned every later call returns it too.
    fn take(&self) -> impl Future<Output = WorkItem<T>> + Send;

    /// Called by the worker after the task for an item has finished, successfully or not.
    fn task_done(&self);

    /// Drops everything still pending and wakes all waiting workers with `Shutdown`.
    fn abort(&self);
}
