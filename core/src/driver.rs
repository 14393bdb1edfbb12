//! Runs the external benchmark executables over a task sweep.
//!
//! One process at a time: every invocation blocks until the benchmark exits
//! and its stdout lands in the result file for that repetition.

use std::fs::File;
use std::io::Write;
use std::path::PathBuf;
use std::process::{Command, Stdio};

use anyhow::{Context, Result, anyhow, bail};
use tracing::{debug, info, warn};

use crate::config::BenchConfig;
use crate::kind::LockKind;
use crate::layout::ResultLayout;
use crate::workload::Profile;

/// One fully resolved benchmark run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    pub kind: LockKind,
    pub tasks: u32,
    pub repetition: u32,
    pub read: u32,
    pub write: u32,
    pub cores: u32,
    pub iterations: u64,
    pub program: String,
    pub sudo: bool,
    pub output: PathBuf,
}

impl Invocation {
    pub fn new(
        config: &BenchConfig,
        profile: Profile,
        layout: &ResultLayout,
        kind: LockKind,
        tasks: u32,
        repetition: u32,
    ) -> Result<Self> {
        let workload = profile
            .workload(kind)
            .ok_or_else(|| anyhow!("lock kind '{}' is not part of profile '{}'", kind, profile))?;
        let exe = config.executable(kind.backend());
        Ok(Self {
            kind,
            tasks,
            repetition,
            read: workload.read.resolve(tasks),
            write: workload.write.resolve(tasks),
            cores: config.cores_for(tasks),
            iterations: config.iterations_for(kind),
            program: exe.program.clone(),
            sudo: exe.sudo,
            output: layout.result_file(kind, tasks, repetition),
        })
    }

    /// Flags understood by both benchmark executables.
    pub fn bench_args(&self) -> Vec<String> {
        vec![
            "-t".to_string(),
            self.kind.lock_arg().to_string(),
            "-r".to_string(),
            self.read.to_string(),
            "-w".to_string(),
            self.write.to_string(),
            "-c".to_string(),
            self.cores.to_string(),
            "-i".to_string(),
            self.iterations.to_string(),
        ]
    }

    pub fn command(&self) -> Command {
        let mut cmd = if self.sudo {
            let mut cmd = Command::new("sudo");
            cmd.arg(&self.program);
            cmd
        } else {
            Command::new(&self.program)
        };
        cmd.args(self.bench_args());
        cmd
    }

    /// Shell-equivalent form of the invocation, redirect included.
    pub fn render(&self) -> String {
        let mut line = String::new();
        if self.sudo {
            line.push_str("sudo ");
        }
        line.push_str(&self.program);
        for arg in self.bench_args() {
            line.push(' ');
            line.push_str(&arg);
        }
        line.push_str(" > ");
        line.push_str(&self.output.display().to_string());
        line
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunOutcome {
    pub success: bool,
    pub code: Option<i32>,
}

impl RunOutcome {
    pub const SUCCESS: RunOutcome = RunOutcome {
        success: true,
        code: Some(0),
    };
}

pub trait Executor {
    fn execute(&mut self, invocation: &Invocation) -> Result<RunOutcome>;

    /// Whether result directories must exist before `execute` is called.
    fn writes_results(&self) -> bool {
        true
    }
}

/// Spawns the benchmark with stdout redirected into the result file.
#[derive(Debug, Default)]
pub struct ProcessExecutor;

impl Executor for ProcessExecutor {
    fn execute(&mut self, invocation: &Invocation) -> Result<RunOutcome> {
        let out = File::create(&invocation.output)
            .with_context(|| format!("create result file {}", invocation.output.display()))?;
        let status = invocation
            .command()
            .stdin(Stdio::null())
            .stdout(Stdio::from(out))
            .status()
            .with_context(|| format!("failed to spawn benchmark `{}`", invocation.render()))?;
        Ok(RunOutcome {
            success: status.success(),
            code: status.code(),
        })
    }
}

/// Prints each invocation instead of running it.
pub struct DryRun<W: Write> {
    out: W,
}

impl<W: Write> DryRun<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> Executor for DryRun<W> {
    fn execute(&mut self, invocation: &Invocation) -> Result<RunOutcome> {
        writeln!(self.out, "{}", invocation.render())?;
        Ok(RunOutcome::SUCCESS)
    }

    fn writes_results(&self) -> bool {
        false
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SweepStats {
    pub runs: usize,
    pub failures: usize,
}

pub struct Driver<'a, E: Executor> {
    config: &'a BenchConfig,
    profile: Profile,
    layout: ResultLayout,
    executor: E,
}

impl<'a, E: Executor> Driver<'a, E> {
    pub fn new(config: &'a BenchConfig, profile: Profile, layout: ResultLayout, executor: E) -> Self {
        Self {
            config,
            profile,
            layout,
            executor,
        }
    }

    pub fn into_executor(self) -> E {
        self.executor
    }

    /// Runs every repetition of `kind` at one task count.
    pub fn run_kind(&mut self, kind: LockKind, tasks: u32) -> Result<SweepStats> {
        if self.executor.writes_results() {
            self.layout.ensure_kind_dir(kind)?;
        }
        let mut stats = SweepStats::default();
        for repetition in 0..self.config.repetitions {
            let invocation = Invocation::new(self.config, self.profile, &self.layout, kind, tasks, repetition)?;
            debug!(target: "lockbench::driver", command = %invocation.render(), "running benchmark");
            let outcome = self.executor.execute(&invocation)?;
            stats.runs += 1;
            if !outcome.success {
                stats.failures += 1;
                if self.config.strict {
                    bail!(
                        "benchmark `{}` exited with {}",
                        invocation.render(),
                        describe_code(outcome.code)
                    );
                }
                warn!(
                    target: "lockbench::driver",
                    kind = %kind,
                    tasks,
                    repetition,
                    "benchmark exited with {}; result file may be incomplete",
                    describe_code(outcome.code)
                );
            }
        }
        Ok(stats)
    }

    /// Doubles the task count across the sweep, running each kind in turn.
    pub fn run_sweep(&mut self, kinds: &[LockKind]) -> Result<SweepStats> {
        for kind in kinds {
            if self.profile.workload(*kind).is_none() {
                bail!("lock kind '{}' is not part of profile '{}'", kind, self.profile);
            }
        }
        let mut total = SweepStats::default();
        for tasks in self.config.task_counts()? {
            info!(
                target: "lockbench::driver",
                tasks,
                cores = self.config.cores_for(tasks),
                "sweep step"
            );
            for kind in kinds {
                let stats = self.run_kind(*kind, tasks)?;
                total.runs += stats.runs;
                total.failures += stats.failures;
            }
        }
        info!(
            target: "lockbench::driver",
            runs = total.runs,
            failures = total.failures,
            root = %self.layout.root().display(),
            "sweep finished"
        );
        Ok(total)
    }
}

fn describe_code(code: Option<i32>) -> String {
    match code {
        Some(code) => format!("exit code {}", code),
        None => "no exit code (terminated by signal)".to_string(),
    }
}
