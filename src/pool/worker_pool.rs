use crate::pool::work_source::{WorkItem, WorkSource};
use futures::FutureExt;
use futures::future::join_all;
use std::future::Future;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use tokio::sync::Notify;
use tokio::task::JoinHandle;
use tracing::{debug, error, warn};

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct PoolStats {
    pub completed: usize,
    pub failed: usize,
}

impl PoolStats {
    fn merge(self, other: PoolStats) -> PoolStats {
        PoolStats {
            completed: self.completed + other.completed,
            failed: self.failed + other.failed,
        }
    }
}

#[derive(Debug, Clone)]
pub struct WorkerPool {
    threads: usize,
}

impl WorkerPool {
    pub fn new(threads: usize) -> Self {
        Self {
            threads: threads.max(1),
        }
    }

    pub fn threads(&self) -> usize {
        self.threads
    }

    /// Runs `task` for every item of `source` on `threads` workers and returns once
    /// all of them have observed `Shutdown`.
    ///
    /// A notification on `interrupt` aborts the source: queued items are dropped,
    /// tasks already running are left to finish.
    pub async fn run<T, S, W, F, Fut>(
        &self,
        task: F,
        state: Arc<S>,
        source: Arc<W>,
        interrupt: Arc<Notify>,
    ) -> PoolStats
    where
        T: Send + 'static,
        S: Send + Sync + 'static,
        W: WorkSource<T> + 'static,
        F: Fn(Arc<S>, T) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = anyhow::Result<()>> + Send + 'static,
    {
        let interrupt_watch = {
            let source = Arc::clone(&source);
            tokio::task::spawn(async move {
                interrupt.notified().await;
                warn!("Interrupt received, draining pending work");
                source.abort();
            })
        };

        let task = Arc::new(task);
        let handles = (0..self.threads)
            .map(|worker_index| {
                let task = Arc::clone(&task);
                let state = Arc::clone(&state);
                let source = Arc::clone(&source);
                tokio::task::spawn(worker_loop::<T, S, W, F, Fut>(
                    worker_index,
                    task,
                    state,
                    source,
                ))
            })
            .collect::<Vec<JoinHandle<PoolStats>>>();

        let mut stats = PoolStats::default();
        for result in join_all(handles).await {
            match result {
                Ok(worker_stats) => stats = stats.merge(worker_stats),
                Err(e) => error!("Worker terminated abnormally: {}", e),
            }
        }
        interrupt_watch.abort();

        debug!(
            completed = stats.completed,
            failed = stats.failed,
            "Worker pool drained"
        );
        stats
    }
}

async fn worker_loop<T, S, W, F, Fut>(
    worker_index: usize,
    task: Arc<F>,
    state: Arc<S>,
    source: Arc<W>,
) -> PoolStats
where
    W: WorkSource<T>,
    F: Fn(Arc<S>, T) -> Fut,
    Fut: Future<Output = anyhow::Result<()>>,
{
    let mut stats = PoolStats::default();
    loop {
        let item = match source.take().await {
            WorkItem::Task(item) => item,
            WorkItem::Shutdown => break,
        };

        let outcome = AssertUnwindSafe(task(Arc::clone(&state), item))
            .catch_unwind()
            .await;
        match outcome {
            Ok(Ok(())) => stats.completed += 1,
            Ok(Err(e)) => {
                warn!(worker = worker_index, "Task failed: {:#}", e);
                stats.failed += 1;
            }
            Err(_) => {
                error!(worker = worker_index, "Task panicked");
                stats.failed += 1;
            }
        }
        source.task_done();
    }
    debug!(worker = worker_index, "Worker exiting");
    stats
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::QueueSource;
    use std::sync::Mutex;

    #[tokio::test]
    async fn runs_every_item_once() {
        let source: Arc<QueueSource<u32>> = Arc::new((1..=20).collect());
        source.close();
        let seen = Arc::new(Mutex::new(Vec::new()));

        let stats = WorkerPool::new(4)
            .run(
                |seen: Arc<Mutex<Vec<u32>>>, item: u32| async move {
                    seen.lock().unwrap().push(item);
                    Ok(())
                },
                Arc::clone(&seen),
                source,
                Arc::new(Notify::new()),
            )
            .await;

        let mut seen = seen.lock().unwrap().clone();
        seen.sort();
        assert_eq!(seen, (1..=20).collect::<Vec<_>>());
        assert_eq!(stats, PoolStats { completed: 20, failed: 0 });
    }

    #[tokio::test]
    async fn failing_and_panicking_tasks_do_not_stop_the_pool() {
        let source: Arc<QueueSource<u32>> = Arc::new((0..9).collect());
        source.close();

        let stats = WorkerPool::new(3)
            .run(
                |_: Arc<()>, item: u32| async move {
                    match item % 3 {
                        0 => Ok(()),
                        1 => Err(anyhow::anyhow!("item {} failed", item)),
                        _ => panic!("item {} blew up", item),
                    }
                },
                Arc::new(()),
                source,
                Arc::new(Notify::new()),
            )
            .await;

        assert_eq!(stats, PoolStats { completed: 3, failed: 6 });
    }

    #[test]
    fn pool_has_at_least_one_worker() {
        assert_eq!(WorkerPool::new(0).threads(), 1);
        assert_eq!(WorkerPool::new(10).threads(), 10);
    }
}
