//! Modification-time staleness test.

use std::path::Path;

use crate::host::Host;

/// Whether `path` was modified strictly after `reference`.
///
/// `SystemTime` carries sub-second precision where the platform records it,
/// so equal seconds fall back to comparing nanoseconds. An unreadable
/// `path` is never newer; an unreadable `reference` is older than anything.
pub fn is_newer(host: &dyn Host, path: &Path, reference: &Path) -> bool {
    match (host.mod_time(path), host.mod_time(reference)) {
        (Some(a), Some(b)) => a > b,
        (Some(_), None) => true,
        (None, _) => false,
    }
}

/// Whether `output` must be rebuilt from `dependencies`.
///
/// True if `output` does not exist, or if any dependency is strictly newer.
pub fn should_compile<S: AsRef<Path>>(host: &dyn Host, output: &Path, dependencies: &[S]) -> bool {
    if !host.exists(output) {
        return true;
    }
    dependencies
        .iter()
        .any(|dependency| is_newer(host, dependency.as_ref(), output))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Result;
    use std::collections::HashMap;
    use std::path::PathBuf;
    use std::time::{Duration, SystemTime};

    /// Host with a fixed table of modification times.
    struct ClockHost {
        times: HashMap<PathBuf, SystemTime>,
    }

    impl ClockHost {
        fn new(entries: &[(&str, u64, u32)]) -> Self {
            let times = entries
                .iter()
                .map(|(path, secs, nanos)| {
                    (
                        PathBuf::from(path),
                        SystemTime::UNIX_EPOCH + Duration::new(*secs, *nanos),
                    )
                })
                .collect();
            Self { times }
        }
    }

    impl Host for ClockHost {
        fn run_command(&self, _: &str) -> String {
            String::new()
        }
        fn execute(&self, _: &str) -> i32 {
            0
        }
        fn exists(&self, path: &Path) -> bool {
            self.times.contains_key(path)
        }
        fn mod_time(&self, path: &Path) -> Option<SystemTime> {
            self.times.get(path).copied()
        }
        fn remove_file(&self, _: &Path) -> Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_missing_output_always_compiles() {
        let host = ClockHost::new(&[("a.c", 10, 0)]);
        assert!(should_compile(&host, Path::new("a.o"), &["a.c"]));
        assert!(should_compile::<&str>(&host, Path::new("a.o"), &[]));
    }

    #[test]
    fn test_current_output_does_not_compile() {
        let host = ClockHost::new(&[("a.c", 10, 0), ("a.h", 5, 0), ("a.o", 20, 0)]);
        assert!(!should_compile(&host, Path::new("a.o"), &["a.c", "a.h"]));
    }

    #[test]
    fn test_newer_dependency_compiles() {
        let host = ClockHost::new(&[("a.c", 10, 0), ("a.h", 30, 0), ("a.o", 20, 0)]);
        assert!(should_compile(&host, Path::new("a.o"), &["a.c", "a.h"]));
    }

    #[test]
    fn test_equal_seconds_compare_nanoseconds() {
        let host = ClockHost::new(&[("a.c", 10, 500), ("a.o", 10, 400)]);
        assert!(should_compile(&host, Path::new("a.o"), &["a.c"]));

        let host = ClockHost::new(&[("a.c", 10, 400), ("a.o", 10, 500)]);
        assert!(!should_compile(&host, Path::new("a.o"), &["a.c"]));
    }

    #[test]
    fn test_equal_timestamps_are_not_newer() {
        let host = ClockHost::new(&[("a.c", 10, 7), ("a.o", 10, 7)]);
        assert!(!is_newer(&host, Path::new("a.c"), Path::new("a.o")));
        assert!(!should_compile(&host, Path::new("a.o"), &["a.c"]));
    }

    #[test]
    fn test_unreadable_dependency_is_not_newer() {
        let host = ClockHost::new(&[("a.c", 10, 0), ("a.o", 20, 0)]);
        assert!(!should_compile(&host, Path::new("a.o"), &["a.c", "gone.h"]));
    }
}
