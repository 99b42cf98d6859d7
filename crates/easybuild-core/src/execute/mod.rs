//! Job execution for easybuild.
//!
//! # Architecture
//!
//! ```text
//! BuildOrchestrator
//!     │
//!     └── Executor::push(job)
//!             │
//!             └── BlockingQueue<Work>
//!                     │
//!                     ├── worker 0 ── take() → job() → ...
//!                     ├── worker 1 ── take() → job() → ...
//!                     └── worker N ── take() → Stop → exit
//! ```
//!
//! Jobs report failure through shared state such as [`FailureFlag`]; nothing
//! is propagated through the executor itself.

mod executor;
mod failure;

pub use executor::{Executor, Job};
pub use failure::FailureFlag;
