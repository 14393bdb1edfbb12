use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use crate::kind::LockKind;

pub const SUMMARY_CSV: &str = "res.csv";

/// On-disk layout of one profile's results:
/// `<root>/<kind>/task_<tasks>_<repetition>.txt` plus `<root>/res.csv`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResultLayout {
    root: PathBuf,
}

impl ResultLayout {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn kind_dir(&self, kind: LockKind) -> PathBuf {
        self.root.join(kind.label())
    }

    pub fn result_file(&self, kind: LockKind, tasks: u32, repetition: u32) -> PathBuf {
        self.kind_dir(kind).join(format!("task_{}_{}.txt", tasks, repetition))
    }

    pub fn summary_csv(&self) -> PathBuf {
        self.root.join(SUMMARY_CSV)
    }

    pub fn ensure_kind_dir(&self, kind: LockKind) -> Result<PathBuf> {
        let dir = self.kind_dir(kind);
        fs::create_dir_all(&dir).with_context(|| format!("create result directory {}", dir.display()))?;
        Ok(dir)
    }
}
