//! Drives external locking-primitive benchmarks over a geometric task sweep
//! and folds their captured timings into a throughput summary.

pub mod aggregate;
pub mod config;
pub mod driver;
pub mod kind;
pub mod layout;
pub mod parse;
pub mod report;
pub mod workload;

#[cfg(test)]
mod aggregate_test;
#[cfg(test)]
mod kind_test;
#[cfg(test)]
mod report_test;

pub use aggregate::{KindResult, Summary, SummaryRow, average, throughput};
pub use config::BenchConfig;
pub use driver::{DryRun, Driver, Executor, Invocation, ProcessExecutor, RunOutcome, SweepStats};
pub use kind::{Backend, LockKind};
pub use layout::ResultLayout;
pub use workload::{Profile, Weight, Workload};
