//! Build configuration.
//!
//! The configuration is a flat mapping of option names to string values,
//! produced once by the CLI layer and read-only for the rest of a run.

use std::collections::BTreeMap;
use std::path::PathBuf;

use crate::error::{Error, Result};

/// Option names read by the engine.
pub mod keys {
    pub const CLEAN: &str = "clean";
    pub const JOBS: &str = "jobs";
    pub const TARGET: &str = "target";
    pub const WORKDIR: &str = "workdir";
    pub const VERBOSE: &str = "verbose";
    pub const AS: &str = "as";
    pub const ASFLAGS: &str = "asflags";
    pub const CC: &str = "cc";
    pub const CFLAGS: &str = "cflags";
    pub const CXX: &str = "cxx";
    pub const CXXFLAGS: &str = "cxxflags";
    pub const LD: &str = "ld";
    pub const LDFLAGS: &str = "ldflags";
    pub const WITHOUT_LINK: &str = "wol";
    pub const LINK_ORDER: &str = "link_order";
}

/// Immutable option map consumed by the analyzer and the orchestrator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Configuration {
    values: BTreeMap<String, String>,
}

impl Default for Configuration {
    fn default() -> Self {
        Self::defaults()
    }
}

impl Configuration {
    /// Configuration with every key the engine reads set to its default.
    pub fn defaults() -> Self {
        let values = [
            (keys::CLEAN, "0"),
            (keys::JOBS, "0"),
            (keys::TARGET, "a.out"),
            (keys::WORKDIR, "."),
            (keys::VERBOSE, "0"),
            (keys::AS, "as"),
            (keys::ASFLAGS, ""),
            (keys::CC, "cc"),
            (keys::CFLAGS, ""),
            (keys::CXX, "c++"),
            (keys::CXXFLAGS, ""),
            (keys::LD, ""),
            (keys::LDFLAGS, ""),
            (keys::WITHOUT_LINK, "0"),
            (keys::LINK_ORDER, ""),
        ]
        .into_iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();

        Self { values }
    }

    /// Configuration holding exactly the given entries, with no defaults.
    pub fn from_map(values: BTreeMap<String, String>) -> Self {
        Self { values }
    }

    /// Replace a value.
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<String>) -> &mut Self {
        self.values.insert(key.into(), value.into());
        self
    }

    /// Builder-style variant of [`Configuration::set`].
    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.set(key, value);
        self
    }

    /// Append a value to a space-separated flag string.
    ///
    /// Empty values are ignored, and no leading separator is produced when
    /// the existing value is empty.
    pub fn append(&mut self, key: &str, value: &str) -> &mut Self {
        let value = value.trim();
        if value.is_empty() {
            return self;
        }
        let entry = self.values.entry(key.to_string()).or_default();
        if !entry.is_empty() {
            entry.push(' ');
        }
        entry.push_str(value);
        self
    }

    /// Look up a required key.
    pub fn get(&self, key: &str) -> Result<&str> {
        self.values
            .get(key)
            .map(String::as_str)
            .ok_or_else(|| Error::MissingOption(key.to_string()))
    }

    /// Whether a boolean option is switched on (`"1"`).
    pub fn flag(&self, key: &str) -> Result<bool> {
        Ok(self.get(key)? == "1")
    }

    /// Worker count; `0` means host parallelism.
    pub fn jobs(&self) -> Result<usize> {
        let value = self.get(keys::JOBS)?;
        value.trim().parse().map_err(|e| Error::InvalidOption {
            key: keys::JOBS.to_string(),
            value: value.to_string(),
            reason: format!("{}", e),
        })
    }

    /// Output directory for objects and the target.
    pub fn workdir(&self) -> Result<PathBuf> {
        Ok(PathBuf::from(self.get(keys::WORKDIR)?))
    }

    /// Full path of the link target: `<workdir>/<target>`.
    pub fn target_path(&self) -> Result<PathBuf> {
        Ok(self.workdir()?.join(self.get(keys::TARGET)?))
    }

    /// Names to pull to the front of the link line, in order.
    pub fn link_order(&self) -> Result<Vec<String>> {
        Ok(self
            .get(keys::LINK_ORDER)?
            .split(|c: char| c == ',' || c.is_whitespace())
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .collect())
    }
}
