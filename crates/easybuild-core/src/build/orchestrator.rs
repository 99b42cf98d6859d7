//! Three-phase build driver.

use std::mem;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use crate::analyze::{Linker, SourceAnalyzer, SourceFile, object_path};
use crate::config::{Configuration, keys};
use crate::error::{Error, Result};
use crate::execute::{Executor, FailureFlag};
use crate::host::Host;
use crate::sync::Semaphore;

use super::callback::BuildCallback;
use super::link::{link_command, select_linker, sort_outputs};
use super::progress::{Progress, ProgressCounter};

/// Summary of one [`BuildOrchestrator::run`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BuildReport {
    /// Sources with a recognized extension
    pub analyzed: usize,
    /// Compile commands that succeeded
    pub compiled: usize,
    /// Whether the link command ran
    pub linked: bool,
    /// Files removed by a clean run
    pub cleaned: usize,
}

/// Options read once at the start of a run.
struct RunSettings {
    jobs: usize,
    clean: bool,
    without_link: bool,
    workdir: PathBuf,
    target: PathBuf,
    ldflags: String,
    link_order: Vec<String>,
}

impl RunSettings {
    fn from_config(config: &Configuration) -> Result<Self> {
        Ok(Self {
            jobs: config.jobs()?,
            clean: config.flag(keys::CLEAN)?,
            without_link: config.flag(keys::WITHOUT_LINK)?,
            workdir: config.workdir()?,
            target: config.target_path()?,
            ldflags: config.get(keys::LDFLAGS)?.to_string(),
            link_order: config.link_order()?,
        })
    }
}

/// Phase A accumulator.
#[derive(Default)]
struct Analysis {
    analyzed: usize,
    /// Object paths paired with the source that produces them
    outputs: Vec<(PathBuf, PathBuf)>,
    to_build: Vec<SourceFile>,
    linker: Linker,
    failures: Vec<(PathBuf, Error)>,
}

impl Analysis {
    fn record(&mut self, file: SourceFile) {
        self.analyzed += 1;
        self.outputs.push((file.output.clone(), file.source.clone()));
        self.linker = mem::take(&mut self.linker).max(file.linker.clone());
        if file.needs_rebuild() {
            self.to_build.push(file);
        }
    }
}

/// Phase B accumulator.
struct CompileTally {
    progress: ProgressCounter,
    compiled: usize,
    failures: Vec<PathBuf>,
}

/// Fail if two sources compile to the same object.
fn check_collisions(outputs: &mut [(PathBuf, PathBuf)]) -> Result<()> {
    outputs.sort();
    match outputs.windows(2).find(|pair| pair[0].0 == pair[1].0) {
        Some([(output, first), (_, second)]) => Err(Error::OutputCollision {
            output: output.clone(),
            first: first.clone(),
            second: second.clone(),
        }),
        _ => Ok(()),
    }
}

/// Lock a phase accumulator.
///
/// A poisoned lock means a job panicked; the data it guards is still a
/// plain accumulator, so keep using it.
fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Runs the analyze, compile and link phases over a set of sources.
///
/// Each phase fans its jobs out over a worker pool and waits on a
/// [`Semaphore`] for every one of them before the next phase begins.
///
/// The working directory must exist and be writable before [`run`] is
/// called; see [`ensure_workdir`](crate::paths::ensure_workdir).
///
/// [`run`]: BuildOrchestrator::run
pub struct BuildOrchestrator {
    config: Configuration,
    host: Arc<dyn Host>,
    callback: Option<Arc<dyn BuildCallback>>,
}

impl BuildOrchestrator {
    pub fn new(config: Configuration, host: Arc<dyn Host>) -> Self {
        Self {
            config,
            host,
            callback: None,
        }
    }

    /// Set the progress callback.
    pub fn set_callback(&mut self, callback: impl BuildCallback + 'static) {
        self.callback = Some(Arc::new(callback));
    }

    /// Build (or clean) the given sources.
    ///
    /// Fails with [`Error::DependencyScan`] if any C or C++ source could not
    /// be analyzed, [`Error::OutputCollision`] if two sources share an object
    /// path, [`Error::CompileFailed`] if a compile command failed, and
    /// [`Error::LinkFailed`] if the link command failed. Objects compiled
    /// before a failure stay on disk.
    ///
    /// A clean run tolerates scan failures and removes the object a failed
    /// source would have produced.
    pub fn run(&self, sources: &[PathBuf]) -> Result<BuildReport> {
        let settings = RunSettings::from_config(&self.config)?;
        let analyzer = Arc::new(SourceAnalyzer::new(&self.config, Arc::clone(&self.host))?);

        let mut executor = Executor::new();
        executor.start(settings.jobs)?;

        let Analysis {
            analyzed,
            mut outputs,
            to_build,
            linker,
            mut failures,
        } = self.analyze(&executor, &analyzer, sources);

        if settings.clean {
            for (source, err) in failures.drain(..) {
                tracing::warn!("Cleaning {} without a dependency listing: {}", source.display(), err);
                outputs.push((object_path(&settings.workdir, &source), source));
            }
        }
        if !failures.is_empty() {
            failures.sort_by(|a, b| a.0.cmp(&b.0));
            let (_, err) = failures.swap_remove(0);
            return Err(err);
        }
        if !settings.clean {
            check_collisions(&mut outputs)?;
        }

        let outputs = sort_outputs(
            outputs.into_iter().map(|(output, _)| output).collect(),
            &settings.link_order,
        );
        tracing::info!(
            "Analyzed {} sources, {} to build",
            analyzed,
            to_build.len()
        );
        if let Some(callback) = &self.callback {
            callback.on_analyzed(analyzed, to_build.len());
        }

        let mut report = BuildReport {
            analyzed,
            ..Default::default()
        };

        if settings.clean {
            report.cleaned = self.clean(&outputs, &settings.target)?;
            return Ok(report);
        }

        let steps = to_build.len() + usize::from(!settings.without_link);
        report.compiled = self.compile(&executor, to_build, steps)?;
        executor.stop(false);

        if settings.without_link {
            return Ok(report);
        }

        report.linked = self.link(linker, &outputs, report.compiled > 0, steps, &settings)?;
        Ok(report)
    }

    /// Phase A: analyze every source in parallel.
    fn analyze(
        &self,
        executor: &Executor,
        analyzer: &Arc<SourceAnalyzer>,
        sources: &[PathBuf],
    ) -> Analysis {
        let done = Arc::new(Semaphore::new(0));
        let analysis = Arc::new(Mutex::new(Analysis::default()));

        for source in sources {
            let source = source.clone();
            let analyzer = Arc::clone(analyzer);
            let analysis = Arc::clone(&analysis);
            let done = Arc::clone(&done);

            executor.push(move || {
                let result = analyzer.process(&source);
                {
                    let mut analysis = lock(&analysis);
                    match result {
                        Ok(Some(file)) => analysis.record(file),
                        Ok(None) => {}
                        Err(err) => {
                            tracing::error!("Dependency scan failed for {}", source.display());
                            analysis.failures.push((source, err));
                        }
                    }
                }
                done.post(1);
            });
        }

        done.wait(sources.len());
        mem::take(&mut *lock(&analysis))
    }

    /// Clean path: remove every known output and the target.
    fn clean(&self, outputs: &[PathBuf], target: &Path) -> Result<usize> {
        let mut removed = 0;
        for path in outputs.iter().map(PathBuf::as_path).chain([target]) {
            if !self.host.exists(path) {
                continue;
            }
            self.host.remove_file(path)?;
            if let Some(callback) = &self.callback {
                callback.on_clean(path);
            }
            removed += 1;
        }
        tracing::info!("Removed {} files", removed);
        Ok(removed)
    }

    /// Phase B: run every stale file's command, stopping new work after the
    /// first failure.
    fn compile(&self, executor: &Executor, mut to_build: Vec<SourceFile>, steps: usize) -> Result<usize> {
        if to_build.is_empty() {
            return Ok(0);
        }
        to_build.sort_by(|a, b| a.source.cmp(&b.source));
        if let Some(callback) = &self.callback {
            callback.on_build_started(&to_build);
        }

        let count = to_build.len();
        let failed = FailureFlag::new();
        let done = Arc::new(Semaphore::new(0));
        let tally = Arc::new(Mutex::new(CompileTally {
            progress: ProgressCounter::new(steps),
            compiled: 0,
            failures: Vec::new(),
        }));

        for file in to_build {
            let host = Arc::clone(&self.host);
            let callback = self.callback.clone();
            let failed = failed.clone();
            let tally = Arc::clone(&tally);
            let done = Arc::clone(&done);

            executor.push(move || {
                if failed.is_raised() {
                    tracing::debug!("Skipping {} after an earlier failure", file.source.display());
                } else {
                    {
                        let mut tally = lock(&tally);
                        let progress = tally.progress.advance();
                        if let Some(callback) = &callback {
                            callback.on_progress(&progress, &file);
                        }
                    }

                    let status = host.execute(&file.command);
                    if status == 0 {
                        lock(&tally).compiled += 1;
                    } else {
                        failed.raise();
                        tracing::error!(
                            "Compiling {} exited with status {}",
                            file.source.display(),
                            status
                        );
                        if let Some(callback) = &callback {
                            callback.on_compile_failed(&file, status);
                        }
                        lock(&tally).failures.push(file.source.clone());
                    }
                }
                done.post(1);
            });
        }

        done.wait(count);

        let mut tally = lock(&tally);
        if failed.is_raised() {
            let mut failures = mem::take(&mut tally.failures);
            failures.sort();
            return Err(Error::CompileFailed { failures });
        }
        Ok(tally.compiled)
    }

    /// Phase C: link if anything was rebuilt or the target is missing.
    fn link(
        &self,
        linker: Linker,
        outputs: &[PathBuf],
        rebuilt: bool,
        steps: usize,
        settings: &RunSettings,
    ) -> Result<bool> {
        if !rebuilt && self.host.exists(&settings.target) {
            tracing::info!("{} is up to date", settings.target.display());
            return Ok(false);
        }
        if outputs.is_empty() {
            tracing::warn!("No objects to link into {}", settings.target.display());
            return Ok(false);
        }

        let linker = select_linker([linker]);
        let command = link_command(&linker, &settings.ldflags, &settings.target, outputs);

        if let Some(callback) = &self.callback {
            callback.on_link(&Progress::new(steps, steps), &command, &settings.target);
        }
        tracing::info!("Linking {} with {}", settings.target.display(), linker.command());

        let status = self.host.execute(&command);
        if status != 0 {
            tracing::error!("Link exited with status {}", status);
            return Err(Error::LinkFailed { command, status });
        }
        Ok(true)
    }
}
