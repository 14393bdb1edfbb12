use std::fmt;
use std::str::FromStr;

use anyhow::anyhow;
use serde::{Deserialize, Serialize};

/// Which external executable runs a lock kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Backend {
    /// Preemptive thread-pool harness (`threadpoolbench`).
    ThreadPool,
    /// Cooperative coroutine harness (`colocking_benchmarks`).
    Colocking,
}

/// Lock kinds known to the sweep, declared in report column order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LockKind {
    Rcu,
    Mutex,
    CoMutex,
    Spinlock,
    CoSpinlock,
    SMutex,
    CoSMutex,
}

impl LockKind {
    pub const ALL: [LockKind; 7] = [
        LockKind::Rcu,
        LockKind::Mutex,
        LockKind::CoMutex,
        LockKind::Spinlock,
        LockKind::CoSpinlock,
        LockKind::SMutex,
        LockKind::CoSMutex,
    ];

    /// Directory name under the result root and CSV column header.
    pub fn label(self) -> &'static str {
        match self {
            LockKind::Rcu => "rcu",
            LockKind::Mutex => "mutex",
            LockKind::CoMutex => "comutex",
            LockKind::Spinlock => "spinlock",
            LockKind::CoSpinlock => "cospinlock",
            LockKind::SMutex => "smutex",
            LockKind::CoSMutex => "cosmutex",
        }
    }

    /// Value passed to the executable's `-t` flag.
    pub fn lock_arg(self) -> &'static str {
        match self {
            LockKind::Rcu => "rcu",
            LockKind::Mutex | LockKind::CoMutex => "mutex",
            LockKind::Spinlock | LockKind::CoSpinlock => "spinlock",
            LockKind::SMutex | LockKind::CoSMutex => "sharedmutex",
        }
    }

    pub fn backend(self) -> Backend {
        match self {
            LockKind::Mutex | LockKind::Spinlock | LockKind::SMutex => Backend::ThreadPool,
            LockKind::Rcu | LockKind::CoMutex | LockKind::CoSpinlock | LockKind::CoSMutex => Backend::Colocking,
        }
    }
}

impl fmt::Display for LockKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for LockKind {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let needle = s.trim();
        LockKind::ALL
            .into_iter()
            .find(|kind| kind.label().eq_ignore_ascii_case(needle))
            .ok_or_else(|| {
                let known: Vec<&str> = LockKind::ALL.iter().map(|k| k.label()).collect();
                anyhow!("unknown lock kind '{}' (expected one of: {})", needle, known.join(", "))
            })
    }
}

/// Returns `kinds` deduplicated and sorted into column order.
pub fn canonical_order(kinds: &[LockKind]) -> Vec<LockKind> {
    let mut out = kinds.to_vec();
    out.sort();
    out.dedup();
    out
}
