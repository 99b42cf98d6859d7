//! Blocking synchronization primitives used by the worker pool and the
//! orchestrator.
//!
//! - `BlockingQueue` - thread-safe FIFO with a front-insertion path for
//!   shutdown sentinels.
//! - `Semaphore` - counting semaphore with wait-for-N, used as a one-shot
//!   scatter-gather barrier per build phase.

mod queue;
mod semaphore;

pub use queue::BlockingQueue;
pub use semaphore::Semaphore;
