//! A fixed-size pool of workers pulling from a shared [`WorkSource`].
//!
//! The crawler drives it with its frontier; batch jobs can use a plain
//! [`QueueSource`].

mod queue_source;
mod work_source;
mod worker_pool;

pub use queue_source::QueueSource;
pub use work_source::{WorkItem, WorkSource};
pub use worker_pool::{PoolStats, WorkerPool};
