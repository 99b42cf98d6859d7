//! Fixed-size worker pool.

use std::num::NonZeroUsize;
use std::sync::Arc;
use std::thread::{self, JoinHandle};

use crate::error::Result;
use crate::sync::BlockingQueue;

/// A unit of work run by a worker thread.
///
/// Jobs take no arguments and return nothing: they communicate through
/// shared accumulators and a phase [`Semaphore`](crate::sync::Semaphore).
pub type Job = Box<dyn FnOnce() + Send + 'static>;

/// Queue entry: either a job or the shutdown sentinel.
enum Work {
    Run(Job),
    Stop,
}

/// Worker pool that repeatedly takes jobs from a [`BlockingQueue`] and runs
/// them.
///
/// Workers catch nothing: a panicking job is a programming error and takes its
/// worker down with it. Dropping the executor performs a graceful
/// [`Executor::stop`].
pub struct Executor {
    queue: Arc<BlockingQueue<Work>>,
    threads: Vec<JoinHandle<()>>,
}

impl Default for Executor {
    fn default() -> Self {
        Self::new()
    }
}

impl Executor {
    /// Create an executor with no workers.
    pub fn new() -> Self {
        Self {
            queue: Arc::new(BlockingQueue::new()),
            threads: Vec::new(),
        }
    }

    /// Number of workers used for `n == 0`: the host's available parallelism.
    pub fn default_parallelism() -> usize {
        thread::available_parallelism()
            .map(NonZeroUsize::get)
            .unwrap_or(1)
    }

    /// Spawn `n` worker threads, or one per available core if `n` is zero.
    pub fn start(&mut self, n: usize) -> Result<()> {
        let n = if n == 0 { Self::default_parallelism() } else { n };

        for _ in 0..n {
            let index = self.threads.len();
            let queue = Arc::clone(&self.queue);
            let handle = thread::Builder::new()
                .name(format!("eb-worker-{}", index))
                .spawn(move || {
                    loop {
                        match queue.take() {
                            Work::Run(job) => job(),
                            Work::Stop => return,
                        }
                    }
                })?;
            self.threads.push(handle);
        }

        tracing::debug!("Executor started with {} workers", self.threads.len());
        Ok(())
    }

    /// Number of running worker threads.
    pub fn worker_count(&self) -> usize {
        self.threads.len()
    }

    /// Shut down every worker and join it.
    ///
    /// A graceful stop queues one sentinel per worker behind pending jobs, so
    /// queued work drains first. An immediate stop queues the sentinels in
    /// front; jobs already running still finish, queued jobs stay queued.
    pub fn stop(&mut self, immediate: bool) {
        if self.threads.is_empty() {
            return;
        }

        for _ in 0..self.threads.len() {
            if immediate {
                self.queue.push_front(Work::Stop);
            } else {
                self.queue.push_back(Work::Stop);
            }
        }

        for handle in self.threads.drain(..) {
            let name = handle.thread().name().unwrap_or("eb-worker").to_string();
            if handle.join().is_err() {
                tracing::error!("Worker {} panicked while running a job", name);
            }
        }

        // Workers that died in a panic never consumed their sentinel
        self.queue.retain(|work| matches!(work, Work::Run(_)));
    }

    /// Queue a job behind all pending work.
    pub fn push<F>(&self, job: F)
    where
        F: FnOnce() + Send + 'static,
    {
        self.queue.push_back(Work::Run(Box::new(job)));
    }

    /// Discard pending jobs without running them.
    pub fn clear(&self) {
        self.queue.clear();
    }

    /// Advisory number of queued entries.
    pub fn len(&self) -> usize {
        self.queue.len()
    }

    /// Advisory emptiness of the queue.
    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }
}

impl Drop for Executor {
    fn drop(&mut self) {
        self.stop(false);
    }
}
