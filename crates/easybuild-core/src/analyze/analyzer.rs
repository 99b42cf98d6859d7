//! Per-file dependency and staleness analysis.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::config::{Configuration, keys};
use crate::error::{Error, Result};
use crate::host::Host;

use super::depfile::parse_dependency_listing;
use super::language::{Language, LanguageTable};
use super::linker::Linker;
use super::source::{SourceFile, join_command, object_path};
use super::staleness::should_compile;

/// Program and flags used for one language.
#[derive(Debug, Clone)]
struct Tool {
    program: String,
    flags: String,
}

impl Tool {
    fn from_config(config: &Configuration, program: &str, flags: &str) -> Result<Self> {
        Ok(Self {
            program: config.get(program)?.to_string(),
            flags: config.get(flags)?.to_string(),
        })
    }
}

/// Decides, per source file, whether it must be rebuilt and how.
///
/// The analyzer holds no mutable state; one instance can be shared by every
/// worker and called concurrently for distinct paths.
pub struct SourceAnalyzer {
    host: Arc<dyn Host>,
    languages: LanguageTable,
    c: Tool,
    cpp: Tool,
    asm: Tool,
    linker_override: String,
    workdir: PathBuf,
}

impl SourceAnalyzer {
    /// Create an analyzer, reading every key it needs up front.
    pub fn new(config: &Configuration, host: Arc<dyn Host>) -> Result<Self> {
        Ok(Self {
            host,
            languages: LanguageTable::default(),
            c: Tool::from_config(config, keys::CC, keys::CFLAGS)?,
            cpp: Tool::from_config(config, keys::CXX, keys::CXXFLAGS)?,
            asm: Tool::from_config(config, keys::AS, keys::ASFLAGS)?,
            linker_override: config.get(keys::LD)?.trim().to_string(),
            workdir: config.workdir()?,
        })
    }

    /// Analyze one source file.
    ///
    /// Returns `Ok(None)` for files whose extension is not recognized, and
    /// [`Error::DependencyScan`] when the compiler's dependency listing for a
    /// C or C++ file yields fewer than two tokens.
    pub fn process(&self, source: &Path) -> Result<Option<SourceFile>> {
        let Some(language) = self.languages.classify(source) else {
            tracing::debug!("Skipping unrecognized file {}", source.display());
            return Ok(None);
        };

        let file = match language {
            Language::C => self.process_c_family(source, language, &self.c)?,
            Language::Cpp => self.process_c_family(source, language, &self.cpp)?,
            Language::Asm => self.process_asm(source),
        };

        tracing::debug!(
            "Analyzed {} ({}, {} dependencies, {})",
            source.display(),
            language,
            file.dependencies.len(),
            if file.needs_rebuild() { "stale" } else { "current" }
        );
        Ok(Some(file))
    }

    fn process_c_family(&self, source: &Path, language: Language, tool: &Tool) -> Result<SourceFile> {
        let source_str = source.to_string_lossy();
        let scan = join_command(&[tool.program.as_str(), "-MM", &source_str, tool.flags.as_str()]);
        let listing = self.host.run_command(&scan);

        let dependencies =
            parse_dependency_listing(&listing).ok_or_else(|| Error::DependencyScan {
                source_path: source.to_path_buf(),
                compiler: tool.program.clone(),
                flags: tool.flags.clone(),
            })?;

        let output = object_path(&self.workdir, source);
        let command = if should_compile(self.host.as_ref(), &output, &dependencies) {
            let output_str = output.to_string_lossy();
            join_command(&[
                tool.program.as_str(),
                tool.flags.as_str(),
                "-o",
                &output_str,
                "-c",
                &source_str,
            ])
        } else {
            String::new()
        };

        Ok(SourceFile {
            source: source.to_path_buf(),
            output,
            language,
            dependencies,
            command,
            linker: self.linker_for(language, &tool.program),
        })
    }

    fn process_asm(&self, source: &Path) -> SourceFile {
        let source_str = source.to_string_lossy().into_owned();
        let output = object_path(&self.workdir, source);
        let dependencies = vec![source_str.clone()];

        let command = if should_compile(self.host.as_ref(), &output, &dependencies) {
            let output_str = output.to_string_lossy();
            join_command(&[
                self.asm.program.as_str(),
                self.asm.flags.as_str(),
                "-o",
                &output_str,
                &source_str,
            ])
        } else {
            String::new()
        };

        SourceFile {
            source: source.to_path_buf(),
            output,
            language: Language::Asm,
            dependencies,
            command,
            linker: self.linker_for(Language::Asm, &self.asm.program),
        }
    }

    fn linker_for(&self, language: Language, program: &str) -> Linker {
        if self.linker_override.is_empty() {
            Linker::for_language(language, program)
        } else {
            Linker::for_override(&self.linker_override)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::sync::Mutex;
    use std::time::{Duration, SystemTime};

    /// Host answering `-MM` scans from a table and recording every command.
    #[derive(Default)]
    struct ScanHost {
        listings: HashMap<String, String>,
        times: HashMap<PathBuf, u64>,
        commands: Mutex<Vec<String>>,
    }

    impl ScanHost {
        fn listing(mut self, source: &str, text: &str) -> Self {
            self.listings.insert(source.to_string(), text.to_string());
            self
        }

        fn file(mut self, path: &str, secs: u64) -> Self {
            self.times.insert(PathBuf::from(path), secs);
            self
        }
    }

    impl Host for ScanHost {
        fn run_command(&self, command: &str) -> String {
            self.commands.lock().unwrap().push(command.to_string());
            self.listings
                .iter()
                .find(|(source, _)| command.contains(source.as_str()))
                .map(|(_, text)| text.clone())
                .unwrap_or_default()
        }
        fn execute(&self, _: &str) -> i32 {
            0
        }
        fn exists(&self, path: &Path) -> bool {
            self.times.contains_key(path)
        }
        fn mod_time(&self, path: &Path) -> Option<SystemTime> {
            self.times
                .get(path)
                .map(|s| SystemTime::UNIX_EPOCH + Duration::from_secs(*s))
        }
        fn remove_file(&self, _: &Path) -> Result<()> {
            Ok(())
        }
    }

    fn config() -> Configuration {
        Configuration::defaults()
            .with(keys::WORKDIR, "out")
            .with(keys::CFLAGS, "-Wall")
            .with(keys::CXX, "g++")
    }

    fn analyzer(config: &Configuration, host: ScanHost) -> (SourceAnalyzer, Arc<ScanHost>) {
        let host = Arc::new(host);
        let analyzer = SourceAnalyzer::new(config, host.clone()).unwrap();
        (analyzer, host)
    }

    #[test]
    fn test_unrecognized_extension_is_skipped() {
        let (analyzer, host) = analyzer(&config(), ScanHost::default());
        assert!(analyzer.process(Path::new("README.md")).unwrap().is_none());
        assert!(analyzer.process(Path::new("Makefile")).unwrap().is_none());
        assert!(host.commands.lock().unwrap().is_empty());
    }

    #[test]
    fn test_stale_c_file() {
        let host = ScanHost::default()
            .listing("a.c", "a.o: a.c a.h\n")
            .file("a.c", 10)
            .file("a.h", 10);
        let (analyzer, host) = analyzer(&config(), host);

        let file = analyzer.process(Path::new("a.c")).unwrap().unwrap();
        let output = PathBuf::from("out").join("a.c.o");

        assert_eq!(file.language, Language::C);
        assert_eq!(file.output, output);
        assert_eq!(file.dependencies, vec!["a.c", "a.h"]);
        assert_eq!(
            file.command,
            format!("cc -Wall -o {} -c a.c", output.display())
        );
        assert_eq!(file.linker, Linker::for_c("cc"));
        assert_eq!(*host.commands.lock().unwrap(), vec!["cc -MM a.c -Wall"]);
    }

    #[test]
    fn test_current_cpp_file_has_empty_command() {
        let output = PathBuf::from("out").join("b.cpp.o");
        let host = ScanHost::default()
            .listing("b.cpp", "b.o: b.cpp b.hpp\n")
            .file("b.cpp", 10)
            .file("b.hpp", 10)
            .file(output.to_str().unwrap(), 20);
        let (analyzer, _) = analyzer(&config(), host);

        let file = analyzer.process(Path::new("b.cpp")).unwrap().unwrap();
        assert!(!file.needs_rebuild());
        assert_eq!(file.linker, Linker::for_cpp("g++"));
    }

    #[test]
    fn test_touched_header_makes_file_stale() {
        let output = PathBuf::from("out").join("b.cpp.o");
        let host = ScanHost::default()
            .listing("b.cpp", "b.o: b.cpp \\\n b.hpp\n")
            .file("b.cpp", 10)
            .file("b.hpp", 30)
            .file(output.to_str().unwrap(), 20);
        let (analyzer, _) = analyzer(&config(), host);

        let file = analyzer.process(Path::new("b.cpp")).unwrap().unwrap();
        assert!(file.needs_rebuild());
        assert!(file.command.starts_with("g++ -o "));
    }

    #[test]
    fn test_dependency_scan_failure() {
        let (analyzer, _) = analyzer(&config(), ScanHost::default().listing("bad.c", "bad.o:"));

        let err = analyzer.process(Path::new("bad.c")).unwrap_err();
        match err {
            Error::DependencyScan {
                source_path,
                compiler,
                flags,
            } => {
                assert_eq!(source_path, PathBuf::from("bad.c"));
                assert_eq!(compiler, "cc");
                assert_eq!(flags, "-Wall");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_asm_depends_on_itself_without_scanning() {
        let config = config().with(keys::ASFLAGS, "--32");
        let (analyzer, host) = analyzer(&config, ScanHost::default().file("boot.s", 10));

        let file = analyzer.process(Path::new("boot.s")).unwrap().unwrap();
        let output = PathBuf::from("out").join("boot.s.o");

        assert_eq!(file.dependencies, vec!["boot.s"]);
        assert_eq!(file.command, format!("as --32 -o {} boot.s", output.display()));
        assert_eq!(file.linker, Linker::for_asm("as"));
        assert!(host.commands.lock().unwrap().is_empty());
    }

    #[test]
    fn test_current_asm_file() {
        let output = PathBuf::from("out").join("boot.s.o");
        let host = ScanHost::default()
            .file("boot.s", 10)
            .file(output.to_str().unwrap(), 10);
        let (analyzer, _) = analyzer(&config(), host);

        let file = analyzer.process(Path::new("boot.s")).unwrap().unwrap();
        assert!(!file.needs_rebuild());
    }

    #[test]
    fn test_explicit_linker_override() {
        let config = config().with(keys::LD, "mold-driver");
        let host = ScanHost::default()
            .listing("a.c", "a.o: a.c\n")
            .file("boot.s", 1);
        let (analyzer, _) = analyzer(&config, host);

        let c = analyzer.process(Path::new("a.c")).unwrap().unwrap();
        let asm = analyzer.process(Path::new("boot.s")).unwrap().unwrap();
        assert_eq!(c.linker, Linker::for_override("mold-driver"));
        assert_eq!(asm.linker, Linker::for_override("mold-driver"));
    }

    #[test]
    fn test_missing_key_fails_construction() {
        let config = Configuration::from_map(Default::default());
        let result = SourceAnalyzer::new(&config, Arc::new(ScanHost::default()));
        assert!(matches!(result, Err(Error::MissingOption(_))));
    }
}
