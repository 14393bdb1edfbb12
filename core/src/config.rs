//! Sweep configuration.
//!
//! Defaults reproduce the original benchmark scripts; a TOML file passed with
//! `--config` overrides any subset of the fields.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use anyhow::{Context, Result, anyhow, bail};
use serde::{Deserialize, Deserializer, Serialize};

use crate::kind::{Backend, LockKind};

pub const DEFAULT_MAX_CORES: u32 = 12;
pub const DEFAULT_REPETITIONS: u32 = 3;
pub const DEFAULT_ITERATIONS: u64 = 100_000;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Executable {
    pub program: String,
    /// Prefix the invocation with `sudo`.
    pub sudo: bool,
}

impl Executable {
    pub fn threadpool() -> Self {
        Self {
            program: "./threadpoolbench".to_string(),
            sudo: false,
        }
    }

    pub fn colocking() -> Self {
        Self {
            program: "./build/benchmarks/colocking_benchmarks".to_string(),
            sudo: true,
        }
    }

    fn merge(mut self, table: ExecutableTable) -> Self {
        if let Some(program) = table.program {
            self.program = program;
        }
        if let Some(sudo) = table.sudo {
            self.sudo = sudo;
        }
        self
    }
}

/// An `[threadpool]` / `[colocking]` table; absent keys keep the backend default.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct ExecutableTable {
    program: Option<String>,
    sudo: Option<bool>,
}

fn threadpool_table<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Executable, D::Error> {
    Ok(Executable::threadpool().merge(ExecutableTable::deserialize(deserializer)?))
}

fn colocking_table<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Executable, D::Error> {
    Ok(Executable::colocking().merge(ExecutableTable::deserialize(deserializer)?))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TaskSweep {
    pub start: u32,
    /// Number of doublings, `start` included.
    pub steps: u32,
}

impl Default for TaskSweep {
    fn default() -> Self {
        Self { start: 1, steps: 10 }
    }
}

impl TaskSweep {
    pub fn task_counts(&self) -> Result<Vec<u32>> {
        let mut out = Vec::with_capacity(self.steps as usize);
        let mut tasks = self.start;
        for step in 0..self.steps {
            out.push(tasks);
            if step + 1 < self.steps {
                tasks = tasks
                    .checked_mul(2)
                    .ok_or_else(|| anyhow!("task sweep overflows after {} steps from {}", step + 1, self.start))?;
            }
        }
        Ok(out)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct BenchConfig {
    #[serde(deserialize_with = "threadpool_table")]
    pub threadpool: Executable,
    #[serde(deserialize_with = "colocking_table")]
    pub colocking: Executable,
    pub max_cores: u32,
    pub repetitions: u32,
    pub iterations: u64,
    /// Iteration counts handed to the benchmark for specific kinds.
    pub iteration_overrides: BTreeMap<LockKind, u64>,
    /// Divide by the overridden iteration count when reporting. Off by default,
    /// so every column uses `iterations` like the original summary.
    pub report_overridden_iterations: bool,
    pub sweep: TaskSweep,
    /// Treat a non-zero benchmark exit status as fatal.
    pub strict: bool,
}

impl Default for BenchConfig {
    fn default() -> Self {
        let mut iteration_overrides = BTreeMap::new();
        iteration_overrides.insert(LockKind::SMutex, 1_000_000);
        Self {
            threadpool: Executable::threadpool(),
            colocking: Executable::colocking(),
            max_cores: DEFAULT_MAX_CORES,
            repetitions: DEFAULT_REPETITIONS,
            iterations: DEFAULT_ITERATIONS,
            iteration_overrides,
            report_overridden_iterations: false,
            sweep: TaskSweep::default(),
            strict: false,
        }
    }
}

impl BenchConfig {
    pub fn load(path: &Path) -> Result<Self> {
        let data = fs::read_to_string(path).with_context(|| format!("read config {}", path.display()))?;
        Self::from_toml_str(&data).with_context(|| format!("parse config {}", path.display()))
    }

    pub fn from_toml_str(data: &str) -> Result<Self> {
        let config: BenchConfig = toml::from_str(data)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.max_cores == 0 {
            bail!("max_cores must be at least 1");
        }
        if self.repetitions == 0 {
            bail!("repetitions must be at least 1");
        }
        if self.iterations == 0 {
            bail!("iterations must be at least 1");
        }
        if self.sweep.start == 0 {
            bail!("sweep.start must be at least 1");
        }
        if self.sweep.steps == 0 {
            bail!("sweep.steps must be at least 1");
        }
        for (kind, iterations) in &self.iteration_overrides {
            if *iterations == 0 {
                bail!("iteration_overrides.{} must be at least 1", kind);
            }
        }
        for exe in [&self.threadpool, &self.colocking] {
            if exe.program.trim().is_empty() {
                bail!("executable program must not be empty");
            }
        }
        self.sweep.task_counts()?;
        Ok(())
    }

    pub fn executable(&self, backend: Backend) -> &Executable {
        match backend {
            Backend::ThreadPool => &self.threadpool,
            Backend::Colocking => &self.colocking,
        }
    }

    /// Value of the benchmark's `-i` flag for `kind`.
    pub fn iterations_for(&self, kind: LockKind) -> u64 {
        self.iteration_overrides.get(&kind).copied().unwrap_or(self.iterations)
    }

    /// Iteration count the report divides by for `kind`.
    pub fn report_iterations_for(&self, kind: LockKind) -> u64 {
        if self.report_overridden_iterations {
            self.iterations_for(kind)
        } else {
            self.iterations
        }
    }

    /// Core count handed to the benchmark, capped at `max_cores`.
    pub fn cores_for(&self, tasks: u32) -> u32 {
        tasks.min(self.max_cores)
    }

    pub fn task_counts(&self) -> Result<Vec<u32>> {
        self.sweep.task_counts()
    }
}
