//! Command-line options and their translation into a build configuration.

use std::path::PathBuf;

use clap::Args;
use easybuild_core::Configuration;
use easybuild_core::config::keys;

/// Shared-library link flag for the host platform.
#[cfg(target_os = "macos")]
const SHARED_LDFLAG: &str = "-dynamiclib";
#[cfg(not(target_os = "macos"))]
const SHARED_LDFLAG: &str = "-shared";

/// Thread link flag; the macOS linker rejects `-pthread`.
#[cfg(target_os = "macos")]
const THREAD_LDFLAG: &str = "";
#[cfg(not(target_os = "macos"))]
const THREAD_LDFLAG: &str = "-pthread";

const STANDARDS: [&str; 9] = [
    "c89", "c99", "c11", "c17", "c18", "c++11", "c++14", "c++17", "c++20",
];

#[derive(Args, Debug, Default)]
pub struct BuildArgs {
    /// Source files or directories to build (default: current directory)
    pub paths: Vec<PathBuf>,

    /// Remove objects and the target instead of building
    #[arg(long)]
    pub clean: bool,

    /// Number of parallel jobs (0 = one per CPU)
    #[arg(short, long, default_value_t = 0)]
    pub jobs: usize,

    /// Name of the linked output
    #[arg(long)]
    pub target: Option<String>,

    /// Directory for objects and the target
    #[arg(long)]
    pub workdir: Option<PathBuf>,

    /// Print full commands and debug logging
    #[arg(short, long)]
    pub verbose: bool,

    /// Assembler program
    #[arg(long = "as", value_name = "PROGRAM")]
    pub assembler: Option<String>,

    /// Extra assembler flags (repeatable)
    #[arg(long, value_name = "FLAGS", allow_hyphen_values = true)]
    pub asflags: Vec<String>,

    /// C compiler
    #[arg(long, value_name = "PROGRAM")]
    pub cc: Option<String>,

    /// Extra C compiler flags (repeatable)
    #[arg(long, value_name = "FLAGS", allow_hyphen_values = true)]
    pub cflags: Vec<String>,

    /// C++ compiler
    #[arg(long, value_name = "PROGRAM")]
    pub cxx: Option<String>,

    /// Extra C++ compiler flags (repeatable)
    #[arg(long, value_name = "FLAGS", allow_hyphen_values = true)]
    pub cxxflags: Vec<String>,

    /// Link driver, overriding the one picked from the source languages
    #[arg(long, value_name = "PROGRAM")]
    pub ld: Option<String>,

    /// Extra link flags (repeatable)
    #[arg(long, value_name = "FLAGS", allow_hyphen_values = true)]
    pub ldflags: Vec<String>,

    /// Add <PREFIX>/include and <PREFIX>/lib to the search paths (repeatable)
    #[arg(long, value_name = "PREFIX")]
    pub prefix: Vec<PathBuf>,

    /// Compile only, do not link
    #[arg(long)]
    pub without_link: bool,

    /// Objects to put first on the link line, comma separated
    #[arg(long, value_name = "NAMES")]
    pub link_order: Option<String>,

    /// Build with POSIX threads
    #[arg(long)]
    pub thread: bool,

    /// Optimization level passed as -O<LEVEL>
    #[arg(long, value_name = "LEVEL")]
    pub optimize: Option<String>,

    /// Emit debug information
    #[arg(long)]
    pub debug: bool,

    /// Define NDEBUG
    #[arg(long)]
    pub release: bool,

    /// Enable warnings and treat them as errors
    #[arg(long)]
    pub strict: bool,

    /// Build a shared library
    #[arg(long)]
    pub shared: bool,

    /// Enable link-time optimization
    #[arg(long)]
    pub lto: bool,

    /// Language standard, routed to the C or C++ flags
    #[arg(long, value_name = "STD", value_parser = STANDARDS)]
    pub std: Option<String>,
}

/// Append a flag to both the C and the C++ flags.
fn compile(config: &mut Configuration, flag: &str) {
    config.append(keys::CFLAGS, flag);
    config.append(keys::CXXFLAGS, flag);
}

fn switch(on: bool) -> &'static str {
    if on { "1" } else { "0" }
}

impl BuildArgs {
    /// Build the engine configuration.
    ///
    /// Presets are applied before the explicit `--*flags`, so explicit flags
    /// come last on every command line.
    pub fn to_configuration(&self) -> Configuration {
        let mut config = Configuration::defaults();
        config
            .set(keys::CLEAN, switch(self.clean))
            .set(keys::JOBS, self.jobs.to_string())
            .set(keys::VERBOSE, switch(self.verbose))
            .set(keys::WITHOUT_LINK, switch(self.without_link));

        if let Some(target) = &self.target {
            config.set(keys::TARGET, target.as_str());
        }
        if let Some(workdir) = &self.workdir {
            config.set(keys::WORKDIR, workdir.to_string_lossy());
        }
        if let Some(order) = &self.link_order {
            config.set(keys::LINK_ORDER, order.as_str());
        }

        for (key, program) in [
            (keys::AS, &self.assembler),
            (keys::CC, &self.cc),
            (keys::CXX, &self.cxx),
            (keys::LD, &self.ld),
        ] {
            if let Some(program) = program {
                config.set(key, program.as_str());
            }
        }

        self.apply_presets(&mut config);

        for (key, values) in [
            (keys::ASFLAGS, &self.asflags),
            (keys::CFLAGS, &self.cflags),
            (keys::CXXFLAGS, &self.cxxflags),
            (keys::LDFLAGS, &self.ldflags),
        ] {
            for value in values {
                config.append(key, value);
            }
        }

        config
    }

    fn apply_presets(&self, config: &mut Configuration) {
        for prefix in &self.prefix {
            let prefix = prefix.to_string_lossy();
            compile(config, &format!("-I{}/include", prefix));
            config.append(keys::LDFLAGS, &format!("-L{}/lib", prefix));
        }
        if self.thread {
            compile(config, "-pthread");
            config.append(keys::LDFLAGS, THREAD_LDFLAG);
        }
        if let Some(level) = &self.optimize {
            compile(config, &format!("-O{}", level));
        }
        if self.debug {
            compile(config, "-g");
        }
        if self.release {
            compile(config, "-DNDEBUG");
        }
        if self.strict {
            compile(config, "-Wall -Wextra -Werror");
        }
        if self.shared {
            compile(config, "-fPIC");
            config.append(keys::LDFLAGS, SHARED_LDFLAG);
        }
        if self.lto {
            config.append(keys::LDFLAGS, "-flto");
        }
        if let Some(std) = &self.std {
            let key = if std.starts_with("c++") {
                keys::CXXFLAGS
            } else {
                keys::CFLAGS
            };
            config.append(key, &format!("-std={}", std));
        }
    }
}
