//! Batch execution
//!
//! Runs synthesized [`CommandGroup`]s against an [`Executor`]. The first failing
//! command aborts the whole batch. The process working directory is never
//! touched: every invocation carries explicit paths.

use crate::command::{CommandGroup, CompileCommand};
use crate::error::{BakeError, BakeResult};
use crate::types::TENSOR_OP_DIR;
use rayon::prelude::*;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

pub const SUCCESS_STATUS: i32 = 0;
pub const FAILURE_STATUS: i32 = 1;

/// Runs a single tool invocation to completion.
pub trait Executor: Sync {
    fn execute(&self, command: &CompileCommand) -> BakeResult<()>;
}

/// Spawns the real compiler/optimizer process and waits for it. Children
/// inherit the caller's working directory; all paths they get are explicit.
#[derive(Clone, Copy, Debug, Default)]
pub struct ProcessExecutor;

impl ProcessExecutor {
    pub fn new() -> Self {
        Self
    }
}

impl Executor for ProcessExecutor {
    fn execute(&self, command: &CompileCommand) -> BakeResult<()> {
        let program = command.program.display().to_string();

        let output = Command::new(&command.program)
            .args(command.args())
            .stdin(Stdio::null())
            .output()
            .map_err(|e| BakeError::Spawn {
                program: program.clone(),
                reason: e.to_string(),
            })?;

        let stdout = String::from_utf8_lossy(&output.stdout);
        if !stdout.trim().is_empty() {
            tracing::debug!(target: "spvbake::tool", "{}", stdout.trim_end());
        }

        if !output.status.success() {
            // glslang reports compile errors on stdout
            let stderr = String::from_utf8_lossy(&output.stderr);
            let message = if stderr.trim().is_empty() {
                stdout.into_owned()
            } else {
                stderr.into_owned()
            };
            return Err(BakeError::CommandFailed {
                program,
                code: output.status.code(),
                stderr: message,
            });
        }

        Ok(())
    }
}

/// Shared flag that stops a batch from starting further variants.
#[derive(Clone, Debug, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

/// Progress notification for one variant.
pub enum BuildEvent<'a> {
    Started {
        group: &'a CommandGroup,
        index: usize,
        total: usize,
    },
    Finished {
        group: &'a CommandGroup,
        index: usize,
        total: usize,
    },
    Failed {
        group: &'a CommandGroup,
        index: usize,
        error: &'a BakeError,
    },
}

pub type ProgressHandler = Box<dyn Fn(&BuildEvent<'_>) + Send + Sync>;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BatchSummary {
    pub variants: usize,
    pub commands: usize,
    pub elapsed: Duration,
}

pub struct BatchRunner<E: Executor> {
    executor: E,
    jobs: usize,
    cancel: CancelToken,
    progress: Option<ProgressHandler>,
}

impl<E: Executor> BatchRunner<E> {
    pub fn new(executor: E) -> Self {
        Self {
            executor,
            jobs: 1,
            cancel: CancelToken::new(),
            progress: None,
        }
    }

    /// Number of variants compiled concurrently. Commands of one variant always
    /// run in order on the same worker.
    pub fn with_jobs(mut self, jobs: usize) -> Self {
        self.jobs = jobs.max(1);
        self
    }

    pub fn with_cancel_token(mut self, cancel: CancelToken) -> Self {
        self.cancel = cancel;
        self
    }

    pub fn with_progress(mut self, handler: ProgressHandler) -> Self {
        self.progress = Some(handler);
        self
    }

    pub fn cancel_token(&self) -> CancelToken {
        self.cancel.clone()
    }

    pub fn executor(&self) -> &E {
        &self.executor
    }

    /// Creates the output directory, then runs every group.
    ///
    /// Stops at the first failure; groups after it are never started. Artifacts
    /// written before the failure are kept.
    pub fn run(&self, groups: &[CommandGroup], output_dir: &Path) -> BakeResult<BatchSummary> {
        let start = Instant::now();
        prepare_output_dir(output_dir)?;

        let commands: usize = groups.iter().map(|g| g.commands.len()).sum();
        tracing::info!(variants = groups.len(), commands, jobs = self.jobs, "starting batch");

        let result = if self.jobs > 1 && groups.len() > 1 {
            self.run_parallel(groups)
        } else {
            self.run_sequential(groups)
        };

        if let Err(err) = &result {
            tracing::warn!("batch aborted: {}", err);
        }
        result?;

        let summary = BatchSummary {
            variants: groups.len(),
            commands,
            elapsed: start.elapsed(),
        };
        tracing::info!(
            variants = summary.variants,
            elapsed_ms = summary.elapsed.as_millis() as u64,
            "batch finished"
        );
        Ok(summary)
    }

    fn run_sequential(&self, groups: &[CommandGroup]) -> BakeResult<()> {
        for (index, group) in groups.iter().enumerate() {
            if self.cancel.is_cancelled() {
                return Err(BakeError::Cancelled);
            }
            self.run_group(group, index, groups.len())?;
        }
        Ok(())
    }

    fn run_parallel(&self, groups: &[CommandGroup]) -> BakeResult<()> {
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(self.jobs)
            .thread_name(|i| format!("spvbake-worker-{}", i))
            .build()
            .map_err(|e| BakeError::ThreadPool(e.to_string()))?;

        let total = groups.len();
        let abort = AtomicBool::new(false);
        let skipped = AtomicBool::new(false);
        let failures: Mutex<Vec<(usize, BakeError)>> = Mutex::new(Vec::new());

        pool.install(|| {
            groups.par_iter().enumerate().for_each(|(index, group)| {
                if abort.load(Ordering::SeqCst) || self.cancel.is_cancelled() {
                    skipped.store(true, Ordering::SeqCst);
                    return;
                }
                if let Err(err) = self.run_group(group, index, total) {
                    abort.store(true, Ordering::SeqCst);
                    if let Ok(mut failures) = failures.lock() {
                        failures.push((index, err));
                    }
                }
            });
        });

        let mut failures = failures.into_inner().unwrap_or_else(|e| e.into_inner());
        failures.sort_by_key(|(index, _)| *index);
        if let Some((_, err)) = failures.into_iter().next() {
            return Err(err);
        }
        if skipped.load(Ordering::SeqCst) {
            return Err(BakeError::Cancelled);
        }
        Ok(())
    }

    fn run_group(&self, group: &CommandGroup, index: usize, total: usize) -> BakeResult<()> {
        self.notify(BuildEvent::Started { group, index, total });

        for command in &group.commands {
            tracing::debug!("{}", command.command_line());
            if let Err(error) = self.executor.execute(command) {
                self.notify(BuildEvent::Failed {
                    group,
                    index,
                    error: &error,
                });
                return Err(error);
            }
        }

        self.notify(BuildEvent::Finished { group, index, total });
        Ok(())
    }

    fn notify(&self, event: BuildEvent<'_>) {
        if let Some(handler) = &self.progress {
            handler(&event);
        }
    }
}

/// Creates `{output_dir}/TensorOp`. Existing directories are left as they are.
pub fn prepare_output_dir(output_dir: &Path) -> BakeResult<PathBuf> {
    let dir = output_dir.join(TENSOR_OP_DIR);
    std::fs::create_dir_all(&dir).map_err(|e| BakeError::CreateOutputDir {
        path: dir.display().to_string(),
        reason: e.to_string(),
    })?;
    Ok(dir)
}

/// Process exit status for a batch (or any command) result.
pub fn exit_status<T, E>(result: &Result<T, E>) -> i32 {
    match result {
        Ok(_) => SUCCESS_STATUS,
        Err(_) => FAILURE_STATUS,
    }
}
