//! Dependency and staleness analysis.
//!
//! # Architecture
//!
//! ```text
//! source path
//!     │
//!     ├── Language (by extension) ── unrecognized ──► skipped
//!     │
//!     ├── C / C++ ── `<compiler> -MM <source> <flags>` ──► dependency list
//!     │
//!     ├── Assembly ── the source is its only dependency
//!     │
//!     └── should_compile(output, dependencies) ──► SourceFile { command, linker }
//! ```

mod analyzer;
mod depfile;
mod language;
mod linker;
mod source;
mod staleness;

pub use analyzer::SourceAnalyzer;
pub use depfile::{parse_dependency_listing, split_dependency_listing};
pub use language::{Language, LanguageTable};
pub use linker::Linker;
pub use source::{SourceFile, join_command, object_path};
pub use staleness::{is_newer, should_compile};
