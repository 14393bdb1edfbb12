use anyhow::{Context, Result, bail};
use serde::Serialize;
use tracing::debug;

use crate::config::BenchConfig;
use crate::kind::LockKind;
use crate::layout::ResultLayout;
use crate::parse::read_elapsed;
use crate::workload::Profile;

pub fn average(samples: &[f64]) -> Result<f64> {
    if samples.is_empty() {
        bail!("cannot average an empty set of timings");
    }
    Ok(samples.iter().sum::<f64>() / samples.len() as f64)
}

/// Operations per second across all tasks: `tasks * iterations / average_secs`.
pub fn throughput(tasks: u32, iterations: u64, average_secs: f64) -> Result<f64> {
    if !average_secs.is_finite() || average_secs <= 0.0 {
        bail!("average elapsed time must be a positive number, got {}", average_secs);
    }
    Ok(tasks as f64 * iterations as f64 / average_secs)
}

/// Timings of every repetition of one kind at one task count.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct KindResult {
    pub kind: LockKind,
    pub iterations: u64,
    pub samples: Vec<f64>,
    pub mean_secs: f64,
    pub throughput: f64,
}

impl KindResult {
    pub fn from_samples(kind: LockKind, tasks: u32, iterations: u64, samples: Vec<f64>) -> Result<Self> {
        let mean_secs = average(&samples)?;
        let throughput = throughput(tasks, iterations, mean_secs)?;
        Ok(Self {
            kind,
            iterations,
            samples,
            mean_secs,
            throughput,
        })
    }

    pub fn load(layout: &ResultLayout, kind: LockKind, tasks: u32, repetitions: u32, iterations: u64) -> Result<Self> {
        let mut samples = Vec::with_capacity(repetitions as usize);
        for repetition in 0..repetitions {
            samples.push(read_elapsed(&layout.result_file(kind, tasks, repetition))?);
        }
        debug!(target: "lockbench::aggregate", kind = %kind, tasks, ?samples, "loaded timings");
        Self::from_samples(kind, tasks, iterations, samples)
            .with_context(|| format!("aggregate {} at {} tasks", kind, tasks))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SummaryRow {
    pub tasks: u32,
    pub results: Vec<KindResult>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Summary {
    pub profile: Profile,
    pub kinds: Vec<LockKind>,
    pub rows: Vec<SummaryRow>,
}

impl Summary {
    /// Loads one row per task count of the sweep. `kinds` must already be in
    /// column order.
    pub fn collect(config: &BenchConfig, profile: Profile, layout: &ResultLayout, kinds: &[LockKind]) -> Result<Self> {
        for kind in kinds {
            if profile.workload(*kind).is_none() {
                bail!("lock kind '{}' is not part of profile '{}'", kind, profile);
            }
        }
        let mut rows = Vec::new();
        for tasks in config.task_counts()? {
            let mut results = Vec::with_capacity(kinds.len());
            for kind in kinds {
                results.push(KindResult::load(
                    layout,
                    *kind,
                    tasks,
                    config.repetitions,
                    config.report_iterations_for(*kind),
                )?);
            }
            rows.push(SummaryRow { tasks, results });
        }
        Ok(Self {
            profile,
            kinds: kinds.to_vec(),
            rows,
        })
    }
}
