//! Read/write mixes and the named sweep profiles built from them.

use std::fmt;
use std::str::FromStr;

use anyhow::anyhow;
use serde::{Deserialize, Serialize};

use crate::kind::LockKind;

/// How a read or write weight is derived from the task count.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Weight {
    Zero,
    One,
    Tasks,
}

impl Weight {
    pub fn resolve(self, tasks: u32) -> u32 {
        match self {
            Weight::Zero => 0,
            Weight::One => 1,
            Weight::Tasks => tasks,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Workload {
    pub read: Weight,
    pub write: Weight,
}

impl Workload {
    const WRITERS_ONLY: Workload = Workload {
        read: Weight::Zero,
        write: Weight::Tasks,
    };
    const READERS_ONE_WRITER: Workload = Workload {
        read: Weight::Tasks,
        write: Weight::One,
    };
    const READERS_ONLY: Workload = Workload {
        read: Weight::Tasks,
        write: Weight::Zero,
    };
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Profile {
    /// Every lock kind, writers contend on exclusive locks. Results under `res/`.
    #[default]
    Contended,
    /// No writer on the shared-mutex kinds. Results under `noreading/`.
    NoReading,
}

impl Profile {
    pub fn name(self) -> &'static str {
        match self {
            Profile::Contended => "contended",
            Profile::NoReading => "no-reading",
        }
    }

    pub fn default_root(self) -> &'static str {
        match self {
            Profile::Contended => "res",
            Profile::NoReading => "noreading",
        }
    }

    /// Lock kinds this profile benchmarks, in column order.
    pub fn kinds(self) -> Vec<LockKind> {
        LockKind::ALL
            .into_iter()
            .filter(|kind| self.workload(*kind).is_some())
            .collect()
    }

    pub fn workload(self, kind: LockKind) -> Option<Workload> {
        match (self, kind) {
            (Profile::Contended, LockKind::Rcu) => Some(Workload::READERS_ONLY),
            (Profile::Contended, LockKind::SMutex | LockKind::CoSMutex) => Some(Workload::READERS_ONE_WRITER),
            (Profile::Contended, _) => Some(Workload::WRITERS_ONLY),
            (Profile::NoReading, LockKind::Mutex | LockKind::CoMutex) => Some(Workload::WRITERS_ONLY),
            (Profile::NoReading, LockKind::Rcu | LockKind::SMutex | LockKind::CoSMutex) => {
                Some(Workload::READERS_ONLY)
            }
            (Profile::NoReading, LockKind::Spinlock | LockKind::CoSpinlock) => None,
        }
    }
}

impl fmt::Display for Profile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Profile {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "contended" | "res" => Ok(Profile::Contended),
            "no-reading" | "noreading" => Ok(Profile::NoReading),
            other => Err(anyhow!("unknown profile '{}' (expected contended or no-reading)", other)),
        }
    }
}
