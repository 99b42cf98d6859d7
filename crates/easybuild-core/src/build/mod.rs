//! Build orchestration.
//!
//! # Architecture
//!
//! ```text
//! sources ──► Phase A: analyze ── one job per source ── Semaphore barrier
//!                 │
//!                 ├── clean requested ──► remove outputs + target, done
//!                 │
//!                 ▼
//!             Phase B: compile ── one job per stale file ── Semaphore barrier
//!                 │                 (FailureFlag: skip new work after a failure)
//!                 │
//!                 ▼
//!             Phase C: link ── runs on the calling thread
//! ```

mod callback;
mod link;
mod orchestrator;
mod progress;

pub use callback::BuildCallback;
pub use link::{FALLBACK_LINKER, link_command, select_linker, sort_outputs};
pub use orchestrator::{BuildOrchestrator, BuildReport};
pub use progress::Progress;
