//! Core engine for easybuild.
//!
//! This crate provides:
//! - Staleness analysis of C, C++ and assembly sources against their headers
//! - A fixed-size worker pool fed by a blocking task queue
//! - Scatter-gather orchestration of the analyze → compile → link phases
//! - Cooperative abort when a compile step fails

pub mod analyze;
pub mod build;
pub mod config;
pub mod discover;
pub mod error;
pub mod execute;
pub mod host;
pub mod paths;
pub mod sync;

pub use analyze::{Language, Linker, SourceAnalyzer, SourceFile};
pub use build::{BuildCallback, BuildOrchestrator, BuildReport, Progress};
pub use config::Configuration;
pub use error::{Error, Result};
pub use execute::{Executor, FailureFlag, Job};
pub use host::{Host, ShellHost};
pub use sync::{BlockingQueue, Semaphore};
