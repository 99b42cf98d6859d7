//! Build command implementation for easybuild CLI.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;

use easybuild_core::analyze::LanguageTable;
use easybuild_core::config::keys;
use easybuild_core::host::resolve_program;
use easybuild_core::{BuildOrchestrator, Configuration, Language, ShellHost, discover, paths};

use crate::colors;
use crate::options::BuildArgs;
use crate::progress::TerminalProgress;

/// Build (or clean) the sources named on the command line.
pub fn execute(args: &BuildArgs) -> anyhow::Result<()> {
    let start = Instant::now();
    let config = args.to_configuration();

    let sources = discover::collect_sources(&args.paths)?;
    if sources.is_empty() {
        println!("{}No source files found.{}", colors::YELLOW, colors::RESET);
        return Ok(());
    }

    paths::ensure_workdir(&config.workdir()?)?;

    let clean = config.flag(keys::CLEAN)?;
    if !clean {
        warn_missing_tools(&config, &sources)?;
    }

    let target = config.target_path()?;
    let mut orchestrator = BuildOrchestrator::new(config, Arc::new(ShellHost::new()));
    orchestrator.set_callback(TerminalProgress::new(args.verbose));

    let report = orchestrator.run(&sources)?;

    if report.analyzed == 0 {
        println!(
            "{}No C, C++ or assembly sources found.{}",
            colors::YELLOW,
            colors::RESET
        );
    } else if clean {
        println!(
            "{}Cleaned{} {} files",
            colors::GREEN,
            colors::RESET,
            report.cleaned
        );
    } else if report.compiled == 0 && !report.linked && !args.without_link {
        println!(
            "{}{} is up to date.{}",
            colors::DIM,
            target.display(),
            colors::RESET
        );
    } else if args.verbose {
        println!(
            "{}Finished{} in {:.2?}",
            colors::GREEN,
            colors::RESET,
            start.elapsed()
        );
    }

    Ok(())
}

/// Warn about compilers that cannot be found for the languages present.
fn warn_missing_tools(config: &Configuration, sources: &[PathBuf]) -> anyhow::Result<()> {
    let languages = LanguageTable::default();
    let mut checked = Vec::new();

    for language in sources.iter().filter_map(|s| languages.classify(s)) {
        if checked.contains(&language) {
            continue;
        }
        checked.push(language);

        let key = match language {
            Language::C => keys::CC,
            Language::Cpp => keys::CXX,
            Language::Asm => keys::AS,
        };
        let program = config.get(key)?;
        if resolve_program(program).is_none() {
            tracing::warn!("{} compiler '{}' not found in PATH", language, program);
        }
    }
    Ok(())
}
